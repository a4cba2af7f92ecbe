use thiserror::Error;

/// Failures talking to the backend REST service.
#[derive(Error, Debug)]
pub enum ApiError {
    /// Network failure, timeout, or a body that could not be decoded
    #[error("backend transport error: {0}")]
    Transport(#[from] reqwest::Error),
    /// The backend answered with a status we do not treat as success
    #[error("backend returned {status}: {body}")]
    Status {
        /// HTTP status code
        status: u16,
        /// Response body, for the log
        body: String,
    },
}

impl ApiError {
    /// True for the answers the backend uses to refuse a duplicate record.
    pub fn is_conflict(&self) -> bool {
        matches!(self, ApiError::Status { status: 400 | 409, .. })
    }
}

/// Failures talking to the messaging platform.
#[derive(Error, Debug)]
pub enum PlatformError {
    /// Error reported by the Telegram client
    #[error("telegram request failed: {0}")]
    Request(#[from] teloxide::RequestError),
    /// A chat reference could not be turned into something the platform accepts
    #[error("invalid chat reference: {0}")]
    InvalidChat(String),
}

/// Failures of the ephemeral draft store.
#[derive(Error, Debug)]
pub enum DraftError {
    /// SQLite backing failed
    #[error("draft store database error: {0}")]
    Database(#[from] sqlx::Error),
    /// A stored structured value could not be (de)serialized
    #[error("draft value is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),
    /// A stored value had an unexpected shape
    #[error("draft field {key} holds an invalid value: {value}")]
    InvalidValue {
        /// Full draft key
        key: String,
        /// Offending value
        value: String,
    },
}

/// Everything that can go wrong while handling one admin interaction or one
/// sweep. Validation and rights problems are not errors: they are replies.
#[derive(Error, Debug)]
pub enum BotError {
    /// Backend call failed
    #[error(transparent)]
    Api(#[from] ApiError),
    /// Platform call failed
    #[error(transparent)]
    Platform(#[from] PlatformError),
    /// Draft store failed
    #[error(transparent)]
    Draft(#[from] DraftError),
}

/// Result alias used across the conversation and scheduling code.
pub type BotResult<T> = Result<T, BotError>;
