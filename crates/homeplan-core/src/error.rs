use thiserror::Error;

#[derive(Debug, Error)]
pub enum HomeplanError {
    #[error("Invalid input: {field} — {reason}")]
    InvalidInput { field: String, reason: String },

    #[error("Date error: {0}")]
    DateError(String),

    #[error("Serialization error: {0}")]
    SerializationError(String),
}

impl From<serde_json::Error> for HomeplanError {
    fn from(e: serde_json::Error) -> Self {
        HomeplanError::SerializationError(e.to_string())
    }
}
