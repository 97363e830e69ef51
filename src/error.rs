use thiserror::Error;

#[derive(Error, Debug)]
pub enum QaError {
    #[error("Table error: {0}")]
    Table(String),

    #[error("Fallback model error: {0}")]
    Fallback(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Polars error: {0}")]
    Polars(#[from] polars::prelude::PolarsError),
}

pub type Result<T> = std::result::Result<T, QaError>;
