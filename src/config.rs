//! Command-line and environment configuration for the console binary.

use clap::{Parser, Subcommand};

/// Where the cluster's API server listens by default.
pub const DEFAULT_CLUSTER_URL: &str = "http://localhost:8000";

#[derive(Debug, Parser)]
#[command(
    name = "dfs-console",
    about = "Browse and edit files on the cluster and watch its health"
)]
pub struct ConsoleConfig {
    /// Base URL of the cluster API server.
    #[arg(long, env = "DFS_CLUSTER_URL", default_value = DEFAULT_CLUSTER_URL)]
    pub cluster_url: String,

    /// Log at DEBUG instead of INFO.
    #[arg(short, long)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// List files.
    Ls,
    /// Print a file's content.
    Cat { name: String },
    /// Create a new file.
    Create { name: String, content: String },
    /// Overwrite a file.
    Write { name: String, content: String },
    /// Append text to a file and print the result.
    Append { name: String, text: String },
    /// Delete a file.
    Rm {
        name: String,
        /// Do not ask for confirmation.
        #[arg(short, long)]
        yes: bool,
    },
    /// Show how a file's chunks are spread over the data nodes.
    Meta { name: String },
    /// Chunk placement table for the first files of the listing.
    Analytics,
    /// File-extension histogram of the listing.
    Types,
    /// One-shot cluster status.
    Status,
    /// Check whether the API server can reach the master.
    Health,
    /// Poll the cluster status and print each sample.
    Watch {
        /// Stop after this many samples instead of waiting for Ctrl-C.
        #[arg(long)]
        ticks: Option<u64>,
    },
}

impl ConsoleConfig {
    pub fn base_url(&self) -> String {
        normalize_base_url(&self.cluster_url)
    }
}

/// Blank falls back to the default, a missing scheme becomes `http://`, and
/// trailing slashes are dropped.
pub fn normalize_base_url(candidate: &str) -> String {
    let trimmed = candidate.trim();
    if trimmed.is_empty() {
        return DEFAULT_CLUSTER_URL.to_string();
    }

    let normalized = if trimmed.starts_with("http://") || trimmed.starts_with("https://") {
        trimmed.to_string()
    } else {
        format!("http://{}", trimmed)
    };

    normalized.trim_end_matches('/').to_string()
}
