pub mod console_logger;
pub mod file_logger;
pub mod grid_loader;
pub mod multi_logger;
pub mod noop_logger;
pub mod path_export;
pub mod svg_render;
pub mod tracing_setup;

pub use console_logger::*;
pub use file_logger::*;
pub use grid_loader::*;
pub use multi_logger::*;
pub use noop_logger::*;
pub use path_export::*;
pub use svg_render::*;
pub use tracing_setup::*;
