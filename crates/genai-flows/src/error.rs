use thiserror::Error;

#[derive(Debug, Error)]
pub enum GenAiError {
    #[error("generation API key not set: export {0}")]
    MissingApiKey(String),

    #[error("invalid {flow} input: {reason}")]
    InvalidInput { flow: &'static str, reason: String },

    #[error(transparent)]
    Http(#[from] reqwest::Error),

    #[error("generation API returned {status}: {message}")]
    Api { status: u16, message: String },

    #[error("blocked by the safety filter: {0}")]
    SafetyBlocked(String),

    #[error("generation returned no candidates")]
    EmptyResponse,

    #[error("generation output is not valid JSON: {0}")]
    InvalidJson(String),

    #[error("generation output did not match the {flow} schema: {reason}")]
    SchemaMismatch { flow: &'static str, reason: String },
}

pub type Result<T> = std::result::Result<T, GenAiError>;
