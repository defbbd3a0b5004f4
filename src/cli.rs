//! Command line interface for VoiceUp built on clap.
//!
//! [`Cli`] carries the global connection flags and a [`Command`] per
//! dashboard view or action.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// VoiceUp: triage civic issue reports from the terminal.
#[derive(Debug, Parser)]
#[command(name = "voiceup", version, about)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Root URL of the VoiceUp API.
    #[arg(long, global = true, env = "VOICEUP_API_URL")]
    pub api_url: Option<String>,

    /// Bearer token for status and achievement updates.
    #[arg(long, global = true, env = "VOICEUP_API_TOKEN", hide_env_values = true)]
    pub token: Option<String>,

    /// Enable debug logging.
    #[arg(long, short, global = true, default_value_t = false)]
    pub verbose: bool,

    /// Emit logs as JSON lines.
    #[arg(long, global = true, default_value_t = false)]
    pub json_logs: bool,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Show dashboard counters.
    Stats,

    /// List issues, newest first.
    List {
        /// Only issues in this status (e.g. "In Progress").
        #[arg(long)]
        status: Option<String>,

        #[arg(long)]
        limit: Option<u32>,

        #[arg(long, default_value_t = 0)]
        skip: u32,
    },

    /// List reposted issues.
    Reposted {
        #[arg(long)]
        limit: Option<u32>,

        #[arg(long, default_value_t = 0)]
        skip: u32,
    },

    /// Show one issue with its status progression and matching issues.
    Show { id: String },

    /// Free-text search over title, description and location.
    Search { query: String },

    /// File a new issue.
    Create {
        #[arg(long)]
        title: String,

        #[arg(long)]
        description: String,

        #[arg(long)]
        category: String,

        #[arg(long)]
        location: String,

        /// 1/critical, 2/medium or 3/low.
        #[arg(long, default_value = "3")]
        priority: String,

        #[arg(long, default_value = "Anonymous")]
        user_name: String,

        #[arg(long, default_value = "")]
        user_mobile: String,

        /// Uploaded image reference; repeat for several.
        #[arg(long = "image")]
        images: Vec<String>,
    },

    /// Move an issue to its next status after confirmation.
    Advance {
        id: String,

        /// Target status; only the stage right after the current one is accepted.
        #[arg(long)]
        to: Option<String>,

        /// Skip the confirmation prompt.
        #[arg(long, short, default_value_t = false)]
        yes: bool,
    },

    /// Record the achievement for a resolved issue.
    Achievement {
        id: String,

        /// Name of the government official met.
        #[arg(long)]
        official: String,

        #[arg(long)]
        designation: String,

        /// Meeting date as YYYY-MM-DD; defaults to today.
        #[arg(long)]
        meeting_date: Option<String>,

        /// Action taken by the authorities.
        #[arg(long)]
        action: String,

        #[arg(long, default_value = "Completed")]
        issue_status: String,

        #[arg(long)]
        document: Option<String>,
    },

    /// Write the achievements report for completed issues.
    Report {
        /// Output file; defaults to VoiceUp_Achievements_Report_<date>.txt.
        #[arg(long, short)]
        output: Option<PathBuf>,
    },

    /// Print the status pipeline.
    Stages,

    /// Exchange credentials for a token.
    Login {
        #[arg(long)]
        email: String,

        #[arg(long)]
        password: String,
    },

    /// Register a new account.
    Signup {
        #[arg(long)]
        email: String,

        #[arg(long)]
        password: String,

        #[arg(long)]
        name: Option<String>,
    },
}
