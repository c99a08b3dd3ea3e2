use thiserror::Error;

#[derive(Error, Debug)]
pub enum GridError {
    #[error("Map file not found: {path}")]
    NotFound { path: String },

    #[error("Failed to read map: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid token '{token}' on line {line}")]
    InvalidToken { line: usize, token: String },

    #[error("Unknown cell label {label} at ({row}, {col})")]
    UnknownLabel { label: i64, row: usize, col: usize },

    #[error("Row {row} has {found} cells, expected {expected}")]
    RaggedRow {
        row: usize,
        expected: usize,
        found: usize,
    },

    #[error("Map contains no cells")]
    Empty,

    #[error("Grid of {rows} x {cols} has {found} cells")]
    CellCount {
        rows: usize,
        cols: usize,
        found: usize,
    },

    #[error("Start point (2) not found in map")]
    MissingStart,

    #[error("Goal point (3) not found in map")]
    MissingGoal,

    #[error("Map has more than one {label} cell: ({first_row}, {first_col}) and ({second_row}, {second_col})")]
    DuplicateEndpoint {
        label: &'static str,
        first_row: usize,
        first_col: usize,
        second_row: usize,
        second_col: usize,
    },
}

#[derive(Error, Debug)]
pub enum ApplicationError {
    #[error("Grid error: {0}")]
    Grid(#[from] GridError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Configuration error: {0}")]
    Configuration(#[from] anyhow::Error),
}

pub type GridResult<T> = Result<T, GridError>;
pub type ApplicationResult<T> = Result<T, ApplicationError>;
