//! Core data types shared by the generation pipeline and the history log.

use serde::{Deserialize, Serialize};

/// The re-enterable form fields of a generation request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FormInputs {
    pub context: String,
    pub goal: String,
    pub platform: String,
    pub audience: String,
    pub tone: String,
}

/// Marketing copy produced by one successful generation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenerationResult {
    pub title: String,
    pub post: String,
    pub hashtags: Vec<String>,
}

/// Inputs as recorded in history: form fields plus the attachment's display name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoryInput {
    #[serde(flatten)]
    pub form: FormInputs,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file_name: Option<String>,
}

/// One persisted record of a past request and its result.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryEntry {
    pub id: String,
    /// Creation time in milliseconds since the Unix epoch.
    pub timestamp: i64,
    pub inputs: HistoryInput,
    pub result: GenerationResult,
}

/// Form state recovered from a history entry.
///
/// `file_name` is informational; the attachment bytes are never stored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReusedInputs {
    pub form: FormInputs,
    pub file_name: Option<String>,
}
