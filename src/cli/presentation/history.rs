//! History presentation: list table, entry detail, json.

use super::shared::{format_section_heading, format_timestamp, to_pretty_json, truncate};
use crate::error::ApiError;
use crate::types::HistoryEntry;
use comfy_table::presets::UTF8_FULL;
use comfy_table::Table;
use owo_colors::OwoColorize;

const TITLE_WIDTH: usize = 48;

pub fn format_history_list_text(entries: &[HistoryEntry], total: usize) -> String {
    if entries.is_empty() {
        return "No history yet.\n\nUse 'content-ai generate' to create your first post.".to_string();
    }
    let mut table = Table::new();
    table.load_preset(UTF8_FULL);
    table.set_header(vec!["ID", "Created", "Platform", "Title", "File"]);
    for entry in entries {
        table.add_row(vec![
            entry.id.clone(),
            format_timestamp(entry.timestamp),
            entry.inputs.form.platform.clone(),
            truncate(&entry.result.title, TITLE_WIDTH),
            entry.inputs.file_name.clone().unwrap_or_else(|| "-".to_string()),
        ]);
    }
    let footer = if entries.len() == total {
        format!("Total: {} entr{}", total, if total == 1 { "y" } else { "ies" })
    } else {
        format!("Showing {} of {} entries", entries.len(), total)
    };
    format!("{}\n\n{}", table, footer)
}

pub fn format_history_list_json(
    entries: &[HistoryEntry],
    total: usize,
) -> Result<String, ApiError> {
    to_pretty_json(&serde_json::json!({ "entries": entries, "total": total }))
}

pub fn format_history_entry_text(entry: &HistoryEntry) -> String {
    let form = &entry.inputs.form;
    let mut out = format!("{}\n", format_section_heading("Request"));
    out.push_str(&format!("  ID:       {}\n", entry.id));
    out.push_str(&format!("  Created:  {}\n", format_timestamp(entry.timestamp)));
    out.push_str(&format!("  Goal:     {}\n", form.goal));
    out.push_str(&format!("  Platform: {}\n", form.platform));
    out.push_str(&format!("  Audience: {}\n", form.audience));
    out.push_str(&format!("  Tone:     {}\n", form.tone));
    if let Some(file_name) = &entry.inputs.file_name {
        out.push_str(&format!("  File:     {}\n", file_name));
    }
    if form.context.is_empty() {
        out.push_str(&format!("  Context:  {}\n", "(none)".dimmed()));
    } else {
        out.push_str(&format!("  Context:  {}\n", form.context));
    }
    out.push('\n');
    out.push_str(&format!("{}\n", format_section_heading("Result")));
    out.push_str(&format!("{}\n\n{}\n\n", entry.result.title.bold(), entry.result.post));
    out.push_str(&entry.result.hashtags.join(" "));
    out
}

pub fn format_history_entry_json(entry: &HistoryEntry) -> Result<String, ApiError> {
    to_pretty_json(entry)
}
