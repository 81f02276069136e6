use thiserror::Error;

#[derive(Debug, Error)]
pub enum CoreError {
    #[error("no record with id {0}")]
    NotFound(String),

    #[error("unknown column: {0}")]
    UnknownColumn(String),

    #[error("{0}")]
    Validation(String),

    #[error("Não há dados para exportar")]
    NothingToExport,

    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
