mod errors;
mod geo_types;

pub use errors::*;
pub use geo_types::*;
