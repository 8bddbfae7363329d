//! Error types shared across the solver.

use thiserror::Error as ThisError;

#[derive(Debug, ThisError)]
pub enum Error {
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    Csv(#[from] csv::Error),
    #[error("unknown circuit label '{0}'")]
    UnknownLabel(String),
    #[error("duplicate circuit label '{0}'")]
    DuplicateLabel(String),
    #[error("matrix is not square: {rows} rows but {cols} distance columns")]
    NotSquare { rows: usize, cols: usize },
    #[error("missing matrix entry for ('{from}', '{to}')")]
    MissingEntry { from: String, to: String },
    #[error("negative distance {distance} between '{from}' and '{to}'")]
    NegativeDistance {
        from: String,
        to: String,
        distance: f64,
    },
    #[error("at least 2 circuits are required, got {0}")]
    TooFewNodes(usize),
    #[error("invalid matrix file: {0}")]
    InvalidMatrix(String),
    #[error("invalid selection: {0}")]
    InvalidSelection(String),
}

pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    pub fn invalid_matrix(message: impl Into<String>) -> Self {
        Self::InvalidMatrix(message.into())
    }

    pub fn invalid_selection(message: impl Into<String>) -> Self {
        Self::InvalidSelection(message.into())
    }
}
