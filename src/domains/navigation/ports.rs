use crate::common::GridResult;
use crate::domains::navigation::grid::{Grid, Position};

/// A loaded map together with its resolved endpoints.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadedGrid {
    pub grid: Grid,
    pub start: Position,
    pub goal: Position,
}

/// Port through which the navigation domain obtains maps.
/// Adapters resolve `name` against their own storage (filesystem, embedded, ...).
pub trait GridSource: Send + Sync {
    fn load_grid(&self, name: &str) -> GridResult<LoadedGrid>;
}
