//! CLI help: stable command names for logging.

use crate::cli::parse::{Commands, ConfigCommands, HistoryCommands};

/// Command name string for log records (e.g. "generate", "history.list").
pub fn command_name(command: &Commands) -> String {
    match command {
        Commands::Generate { .. } => "generate".to_string(),
        Commands::History { command } => format!("history.{}", history_command_name(command)),
        Commands::Options { .. } => "options".to_string(),
        Commands::Config { command } => format!("config.{}", config_command_name(command)),
    }
}

pub fn history_command_name(command: &HistoryCommands) -> &'static str {
    match command {
        HistoryCommands::List { .. } => "list",
        HistoryCommands::Show { .. } => "show",
        HistoryCommands::Delete { .. } => "delete",
        HistoryCommands::Clear { .. } => "clear",
        HistoryCommands::Reuse { .. } => "reuse",
    }
}

pub fn config_command_name(command: &ConfigCommands) -> &'static str {
    match command {
        ConfigCommands::Show => "show",
        ConfigCommands::Validate => "validate",
    }
}
