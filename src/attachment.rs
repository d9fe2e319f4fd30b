//! Attachment Encoding
//!
//! Turns a user-supplied file into content the prompt builder can carry: inline
//! text for text-like files, a base64 payload for images and PDFs. Anything
//! else is reported as unsupported and left to the caller's policy.

use crate::error::ApiError;
use base64::engine::general_purpose::STANDARD as BASE64_STANDARD;
use base64::Engine;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::debug;

/// A file handle with a declared media type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attachment {
    pub name: String,
    pub media_type: String,
    pub path: PathBuf,
}

impl Attachment {
    pub fn new(
        name: impl Into<String>,
        media_type: impl Into<String>,
        path: impl Into<PathBuf>,
    ) -> Self {
        Self {
            name: name.into(),
            media_type: media_type.into(),
            path: path.into(),
        }
    }

    /// Build an attachment from a path, inferring the media type from its extension.
    pub fn from_path(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref();
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());
        let media_type = mime_guess::from_path(path)
            .first_or_octet_stream()
            .to_string();
        Self::new(name, media_type, path)
    }

    pub fn kind(&self) -> MediaKind {
        MediaKind::of(&self.media_type)
    }
}

/// How a media type is carried to the generation service.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MediaKind {
    Text,
    Binary,
    Unsupported,
}

impl MediaKind {
    pub fn of(media_type: &str) -> Self {
        let media_type = media_type.trim().to_ascii_lowercase();
        if media_type.starts_with("text/") {
            MediaKind::Text
        } else if media_type.starts_with("image/") || media_type == "application/pdf" {
            MediaKind::Binary
        } else {
            MediaKind::Unsupported
        }
    }
}

/// Encoded attachment payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EncodedContent {
    /// Text inlined verbatim into the prompt context.
    Text { content: String },
    /// Bytes sent out of band as a structured part.
    Binary { base64: String },
    /// Media type neither text-like nor image/PDF; nothing was read.
    Unsupported,
}

/// An attachment after encoding, ready for the prompt builder.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncodedAttachment {
    pub file_name: String,
    pub media_type: String,
    pub content: EncodedContent,
}

/// What to do with attachments whose media type is not supported.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UnsupportedPolicy {
    /// Proceed with the typed context only.
    #[default]
    Ignore,
    /// Fail the submission with `UnsupportedAttachmentType`.
    Reject,
}

/// Read and encode an attachment according to its media type.
pub async fn encode(attachment: &Attachment) -> Result<EncodedAttachment, ApiError> {
    let content = match attachment.kind() {
        MediaKind::Text => {
            let bytes = read_bytes(attachment).await?;
            let content = String::from_utf8(bytes).map_err(|e| ApiError::AttachmentRead {
                file_name: attachment.name.clone(),
                reason: format!("not valid UTF-8 text: {}", e),
            })?;
            EncodedContent::Text { content }
        }
        MediaKind::Binary => {
            let bytes = read_bytes(attachment).await?;
            EncodedContent::Binary {
                base64: BASE64_STANDARD.encode(bytes),
            }
        }
        MediaKind::Unsupported => EncodedContent::Unsupported,
    };

    debug!(
        file_name = %attachment.name,
        media_type = %attachment.media_type,
        kind = ?attachment.kind(),
        "Encoded attachment"
    );

    Ok(EncodedAttachment {
        file_name: attachment.name.clone(),
        media_type: attachment.media_type.clone(),
        content,
    })
}

async fn read_bytes(attachment: &Attachment) -> Result<Vec<u8>, ApiError> {
    tokio::fs::read(&attachment.path)
        .await
        .map_err(|e| ApiError::AttachmentRead {
            file_name: attachment.name.clone(),
            reason: e.to_string(),
        })
}
