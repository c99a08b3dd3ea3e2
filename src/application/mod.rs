pub mod evaluator;
pub mod navigation_service;

pub use evaluator::*;
pub use navigation_service::*;
