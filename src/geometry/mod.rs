mod extrude;
mod projection;
mod transform;

pub use extrude::*;
pub use projection::*;
pub use transform::*;
