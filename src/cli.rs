//! CLI domain: parse, route, help, output, and presentation only.
//! No domain orchestration; single route table dispatches to the controller and history.

mod help;
mod output;
mod parse;
mod presentation;
mod route;

pub use help::command_name;
pub use output::map_error;
pub use parse::{Cli, Commands, ConfigCommands, HistoryCommands};
pub use presentation::{
    format_generation_result_json, format_generation_result_text, format_history_entry_json,
    format_history_entry_text, format_history_list_json, format_history_list_text,
    format_options_json, format_options_text, format_section_heading, format_timestamp,
};
pub use route::RunContext;
