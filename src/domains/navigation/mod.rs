pub mod extractor;
pub mod field;
pub mod grid;
pub mod inflation;
pub mod ports;
pub mod statistics;

pub use extractor::*;
pub use field::*;
pub use grid::*;
pub use inflation::*;
pub use ports::*;
pub use statistics::*;
