use thiserror::Error;

#[derive(Debug, Error)]
pub enum LeaseQuoteError {
    #[error("Invalid input: {field}: {reason}")]
    InvalidInput { field: String, reason: String },

    #[error("Missing parameters: {0}")]
    MissingParameters(String),

    #[error("Data load error: {0}")]
    DataLoad(String),

    #[error("Serialization error: {0}")]
    SerializationError(String),
}

impl From<serde_json::Error> for LeaseQuoteError {
    fn from(e: serde_json::Error) -> Self {
        LeaseQuoteError::SerializationError(e.to_string())
    }
}

impl From<std::io::Error> for LeaseQuoteError {
    fn from(e: std::io::Error) -> Self {
        LeaseQuoteError::DataLoad(e.to_string())
    }
}
