//! Generation result presentation: text and json.

use super::shared::{format_section_heading, to_pretty_json};
use crate::error::ApiError;
use crate::types::GenerationResult;
use owo_colors::OwoColorize;
use serde_json::json;

pub fn format_generation_result_text(result: &GenerationResult, note: Option<&str>) -> String {
    let mut out = String::new();
    out.push_str(&format!("{}\n", format_section_heading("Title")));
    out.push_str(&format!("{}\n\n", result.title.bold()));
    out.push_str(&format!("{}\n", format_section_heading("Post")));
    out.push_str(&format!("{}\n\n", result.post));
    out.push_str(&format!("{}\n", format_section_heading("Hashtags")));
    let tags: Vec<String> = result
        .hashtags
        .iter()
        .map(|tag| format!("{}", tag.cyan()))
        .collect();
    out.push_str(&tags.join(" "));
    if let Some(note) = note {
        out.push_str(&format!("\n\n{}", note.dimmed()));
    }
    out
}

pub fn format_generation_result_json(
    id: Option<&str>,
    result: &GenerationResult,
) -> Result<String, ApiError> {
    to_pretty_json(&json!({
        "id": id,
        "title": result.title,
        "post": result.post,
        "hashtags": result.hashtags,
    }))
}
