//! Error types for the content generation and history system.

use thiserror::Error;

/// Storage-related errors
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Storage I/O error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Storage backend error: {0}")]
    Backend(String),

    #[error("Stored history is unreadable: {0}")]
    Corrupt(String),

    #[error("Failed to serialize history: {0}")]
    Serialization(String),
}

impl From<sled::Error> for StorageError {
    fn from(err: sled::Error) -> Self {
        StorageError::Backend(err.to_string())
    }
}

/// Domain errors surfaced by the generation pipeline and its collaborators.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("Failed to read attachment {file_name}: {reason}")]
    AttachmentRead { file_name: String, reason: String },

    #[error("Unsupported attachment type {media_type} for {file_name}")]
    UnsupportedAttachmentType {
        file_name: String,
        media_type: String,
    },

    #[error("Malformed response: {0}")]
    MalformedResponse(String),

    #[error("Generation failed: {0}")]
    GenerationFailed(String),

    #[error("Provider error: {0}")]
    ProviderError(String),

    #[error("Provider request failed: {0}")]
    ProviderRequestFailed(String),

    #[error("Provider authentication failed: {0}")]
    ProviderAuthFailed(String),

    #[error("Provider rate limit exceeded: {0}")]
    ProviderRateLimit(String),

    #[error("Provider model not found: {0}")]
    ProviderModelNotFound(String),

    #[error("History entry not found: {0}")]
    EntryNotFound(String),

    #[error("Storage error: {0}")]
    StorageError(#[from] StorageError),

    #[error("Configuration error: {0}")]
    ConfigError(String),
}

pub const VALIDATION_MESSAGE: &str = "Please enter some content or attach a file.";
pub const GENERATION_FAILED_MESSAGE: &str =
    "Failed to generate content. Please check your input and try again.";
pub const MALFORMED_RESPONSE_MESSAGE: &str =
    "The AI response did not match the expected format. Please try again.";

impl ApiError {
    /// Short message safe to show to the person at the keyboard.
    ///
    /// Internal causes stay in the logs; each category collapses to one line.
    pub fn user_message(&self) -> String {
        match self {
            ApiError::Validation(msg) => msg.clone(),
            ApiError::AttachmentRead { file_name, .. } => {
                format!("Could not read the attached file {}.", file_name)
            }
            ApiError::UnsupportedAttachmentType { file_name, .. } => format!(
                "The attached file {} is not supported. Use a text, image or PDF file.",
                file_name
            ),
            ApiError::MalformedResponse(_) => MALFORMED_RESPONSE_MESSAGE.to_string(),
            ApiError::GenerationFailed(_)
            | ApiError::ProviderError(_)
            | ApiError::ProviderRequestFailed(_)
            | ApiError::ProviderAuthFailed(_)
            | ApiError::ProviderRateLimit(_)
            | ApiError::ProviderModelNotFound(_) => GENERATION_FAILED_MESSAGE.to_string(),
            ApiError::EntryNotFound(id) => format!("No history entry with id {}.", id),
            ApiError::StorageError(_) => "History storage is unavailable.".to_string(),
            ApiError::ConfigError(msg) => format!("Configuration error: {}", msg),
        }
    }

    /// True for failures that originate at the provider or its transport.
    pub fn is_provider_failure(&self) -> bool {
        matches!(
            self,
            ApiError::GenerationFailed(_)
                | ApiError::ProviderError(_)
                | ApiError::ProviderRequestFailed(_)
                | ApiError::ProviderAuthFailed(_)
                | ApiError::ProviderRateLimit(_)
                | ApiError::ProviderModelNotFound(_)
        )
    }
}

impl From<config::ConfigError> for ApiError {
    fn from(err: config::ConfigError) -> Self {
        ApiError::ConfigError(err.to_string())
    }
}
