use thiserror::Error;

#[derive(Debug, Error)]
pub enum StockError {
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("{source_name} returned HTTP {status}")]
    Status {
        source_name: String,
        status: reqwest::StatusCode,
    },

    #[error("failed to read {path}: {err}")]
    Io {
        path: String,
        #[source]
        err: std::io::Error,
    },

    #[error("malformed JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("JSON structure is incorrect or missing expected key `{0}`")]
    MissingKey(&'static str),

    #[error("invalid date `{0}`")]
    InvalidDate(String),
}

pub type Result<T> = std::result::Result<T, StockError>;
