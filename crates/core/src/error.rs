use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ShapeError {
    #[error("shape matrix has no rows or no columns")]
    Empty,
    #[error("shape row {row} has {found} columns, expected {expected}")]
    Ragged {
        row: usize,
        expected: usize,
        found: usize,
    },
    #[error("shape {width}x{height} exceeds the {max} cell side limit")]
    TooLarge {
        width: usize,
        height: usize,
        max: usize,
    },
    #[error("shape matrix has no filled cells")]
    NoFilledCells,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CatalogueError {
    #[error("catalogue entry `{id}`: {source}")]
    InvalidShape {
        id: String,
        #[source]
        source: ShapeError,
    },
    #[error("duplicate catalogue id `{0}`")]
    DuplicateId(String),
    #[error("catalogue is empty")]
    Empty,
}
