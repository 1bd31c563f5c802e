//! Error types shared by every SecureSoul crate.

use thiserror::Error;

/// Result alias used across the assistant pipeline.
pub type SoulResult<T> = Result<T, SoulError>;

/// Errors raised while validating input or talking to the generative model.
#[derive(Error, Debug)]
pub enum SoulError {
    /// Input or model output did not match its schema.
    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Configuration error: {0}")]
    Config(String),

    /// The model API answered with a non-success status.
    #[error("Model API error {status}: {body}")]
    Llm { status: u16, body: String },

    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// The model answered but returned nothing usable.
    #[error("{0}")]
    EmptyOutput(String),

    #[error("Transcription failed: {0}")]
    Transcription(String),

    #[error("Speech synthesis failed: {0}")]
    Synthesis(String),
}

impl SoulError {
    pub fn validation(msg: impl Into<String>) -> Self {
        SoulError::Validation(msg.into())
    }

    /// True for schema violations, which are reported to the user as a data-format problem.
    pub fn is_validation(&self) -> bool {
        matches!(self, SoulError::Validation(_))
    }
}

impl From<config::ConfigError> for SoulError {
    fn from(err: config::ConfigError) -> Self {
        SoulError::Config(err.to_string())
    }
}
