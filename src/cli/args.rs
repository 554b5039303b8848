//! CLI argument definitions using clap

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// Export OpenReview forum discussions as threaded conversation transcripts
#[derive(Parser, Debug)]
#[command(name = "orview")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Increase verbosity (-d, -dd, -ddd)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub debug: u8,

    /// OpenReview API base URL (overrides config)
    #[arg(long, global = true, env = "ORVIEW_BASE_URL")]
    pub base_url: Option<String>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Fetch a forum and write the conversation transcript
    Export {
        /// Forum id (the paper's note id)
        forum: String,

        /// Transcript output file
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Skip the raw note structure dump
        #[arg(long)]
        no_dump: bool,

        /// Username for the authenticated fallback
        #[arg(short, long)]
        username: Option<String>,
    },

    /// Write the raw note structure dump only
    Dump {
        /// Forum id
        forum: String,

        /// Dump output file
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Username for the authenticated fallback
        #[arg(short, long)]
        username: Option<String>,
    },

    /// Show the main note of a forum on the console
    Info {
        /// Forum id
        forum: String,

        /// Username for the authenticated fallback
        #[arg(short, long)]
        username: Option<String>,
    },

    /// Manage settings
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },

    /// Generate shell completions
    Completion {
        /// Shell type
        #[arg(value_enum)]
        shell: clap_complete::Shell,
    },
}

#[derive(Subcommand, Debug)]
pub enum ConfigCommands {
    /// Show merged config
    Show,

    /// Create config template
    Init,

    /// Show config path
    Path,
}
