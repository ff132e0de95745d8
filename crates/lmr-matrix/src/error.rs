use thiserror::Error;

#[derive(Debug, Error)]
pub enum MatrixError {
    #[error("malformed distance matrix: {0}")]
    DataFormat(String),

    #[error("no distance entry from {origin:?} to {destination:?}")]
    MissingEntry { origin: String, destination: String },

    #[error("distance matrix has no entries")]
    EmptyMatrix,

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub type MatrixResult<T> = Result<T, MatrixError>;
