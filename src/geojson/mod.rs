mod loader;
mod map_plugin;
mod renderer;

pub use loader::*;
pub use map_plugin::*;
pub use renderer::*;
