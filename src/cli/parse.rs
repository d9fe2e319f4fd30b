//! CLI parse: clap types for content-ai. No behavior; definitions only.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// content-ai - Branded marketing copy from a short brief or an attached file
#[derive(Parser)]
#[command(name = "content-ai")]
#[command(about = "Generate a title, post and hashtags for a campaign, and keep a history of requests")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Directory searched for content-ai.toml
    #[arg(long, default_value = ".")]
    pub project_dir: PathBuf,

    /// Configuration file path (overrides default config loading)
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(long, default_value = "false")]
    pub verbose: bool,

    /// Disable logging entirely
    #[arg(long, default_value = "false")]
    pub quiet: bool,

    /// Log level (trace, debug, info, warn, error, off)
    #[arg(long)]
    pub log_level: Option<String>,

    /// Log format (json, text)
    #[arg(long)]
    pub log_format: Option<String>,

    /// Log output (stdout, stderr, file)
    #[arg(long)]
    pub log_output: Option<String>,

    /// Log file path (if output is "file")
    #[arg(long)]
    pub log_file: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Generate a title, post and hashtags
    Generate {
        /// Free-text brief
        #[arg(long, default_value = "")]
        context: String,
        /// File to attach (text, image or PDF)
        #[arg(long)]
        file: Option<PathBuf>,
        /// Goal of the post (defaults to the first catalog entry)
        #[arg(long)]
        goal: Option<String>,
        /// Publishing platform
        #[arg(long)]
        platform: Option<String>,
        /// Target audience
        #[arg(long)]
        audience: Option<String>,
        /// Desired tone
        #[arg(long)]
        tone: Option<String>,
        /// Output format (text or json)
        #[arg(long, default_value = "text")]
        format: String,
    },
    /// Request history (list, show, delete, clear, reuse)
    History {
        #[command(subcommand)]
        command: HistoryCommands,
    },
    /// List the selectable goals, platforms, audiences and tones
    Options {
        /// Output format (text or json)
        #[arg(long, default_value = "text")]
        format: String,
    },
    /// Configuration commands
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },
}

#[derive(Subcommand)]
pub enum HistoryCommands {
    /// List past requests, newest first
    List {
        /// Output format (text or json)
        #[arg(long, default_value = "text")]
        format: String,
        /// Show at most this many entries
        #[arg(long)]
        limit: Option<usize>,
    },
    /// Show one entry in full
    Show {
        /// Entry id
        id: String,
        /// Output format (text or json)
        #[arg(long, default_value = "text")]
        format: String,
    },
    /// Delete one entry
    Delete {
        /// Entry id
        id: String,
    },
    /// Delete every entry
    Clear {
        /// Skip the confirmation prompt
        #[arg(long)]
        yes: bool,
    },
    /// Regenerate from a past entry's inputs
    Reuse {
        /// Entry id
        id: String,
        /// Attach a file again (attachments are not stored in history)
        #[arg(long)]
        file: Option<PathBuf>,
        /// Output format (text or json)
        #[arg(long, default_value = "text")]
        format: String,
    },
}

#[derive(Subcommand)]
pub enum ConfigCommands {
    /// Print the effective configuration as TOML (API key redacted)
    Show,
    /// Validate the effective configuration
    Validate,
}
