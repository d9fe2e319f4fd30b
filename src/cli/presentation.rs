//! CLI presentation: text and json formatters per command family.

mod catalog;
mod generation;
mod history;
mod shared;

pub use catalog::{format_options_json, format_options_text};
pub use generation::{format_generation_result_json, format_generation_result_text};
pub use history::{
    format_history_entry_json, format_history_entry_text, format_history_list_json,
    format_history_list_text,
};
pub use shared::{format_section_heading, format_timestamp};
