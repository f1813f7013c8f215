//! Command-line argument definitions using clap derive.

use clap::{Args, Parser, Subcommand};
use quotekeeper_core::SyncConfig;
use std::path::PathBuf;
use std::time::Duration;

const DB_FILE_NAME: &str = "quotekeeper.sqlite3";

/// Keep, browse and sync short quotes.
#[derive(Parser, Debug)]
#[command(name = "quotekeeper", author, version, about, long_about = None)]
pub struct Cli {
    /// Quote database file
    #[arg(long, global = true, env = "QUOTEKEEPER_DB")]
    pub db: Option<PathBuf>,

    /// Log level (trace|debug|info|warn|error)
    #[arg(long, global = true)]
    pub log_level: Option<String>,

    /// Absolute directory for rolling log files; logging is off without it
    #[arg(long, global = true, env = "QUOTEKEEPER_LOG_DIR")]
    pub log_dir: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

impl Cli {
    /// Resolves the database path, defaulting to the system temp directory.
    pub fn db_path(&self) -> PathBuf {
        self.db
            .clone()
            .unwrap_or_else(|| std::env::temp_dir().join(DB_FILE_NAME))
    }
}

/// Available commands.
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Add a new quote
    Add { text: String, category: String },

    /// List quotes, optionally only one category
    List {
        #[arg(long)]
        category: Option<String>,
    },

    /// List distinct categories
    Categories,

    /// Show a random quote from the selected category
    Random,

    /// Select a category (or `all`) and show its featured quote
    Filter { category: String },

    /// Show the last displayed quote
    Last,

    /// Export all quotes as JSON
    Export {
        /// Output file; stdout when omitted
        #[arg(long)]
        out: Option<PathBuf>,
    },

    /// Import quotes from a JSON file
    Import {
        path: PathBuf,
        /// Append entries as-is instead of merging by text
        #[arg(long)]
        append: bool,
    },

    /// Sync once with the remote endpoint
    Sync(SyncArgs),

    /// Sync periodically until interrupted
    Watch(SyncArgs),
}

/// Remote sync options.
#[derive(Args, Debug, Clone)]
pub struct SyncArgs {
    /// Remote posts endpoint
    #[arg(long)]
    pub endpoint: Option<String>,

    /// Seconds between scheduled syncs
    #[arg(long)]
    pub interval_secs: Option<u64>,

    /// Per-request timeout in seconds
    #[arg(long)]
    pub timeout_secs: Option<u64>,
}

impl SyncArgs {
    /// Overlays explicit flags on the default sync configuration.
    pub fn to_config(&self) -> SyncConfig {
        let mut config = SyncConfig::default();
        if let Some(endpoint) = &self.endpoint {
            config = config.with_endpoint(endpoint.clone());
        }
        if let Some(secs) = self.interval_secs {
            config = config.with_interval(Duration::from_secs(secs));
        }
        if let Some(secs) = self.timeout_secs {
            config = config.with_timeout(Duration::from_secs(secs));
        }
        config
    }
}

#[cfg(test)]
mod tests {
    use super::{Cli, Command};
    use clap::{CommandFactory, Parser};
    use std::time::Duration;

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn sync_flags_override_defaults() {
        let cli = Cli::parse_from([
            "quotekeeper",
            "watch",
            "--endpoint",
            "http://localhost:9/posts",
            "--interval-secs",
            "5",
        ]);
        let Command::Watch(args) = cli.command else {
            panic!("expected watch command");
        };
        let config = args.to_config();
        assert_eq!(config.endpoint, "http://localhost:9/posts");
        assert_eq!(config.interval, Duration::from_secs(5));
        assert_eq!(config.limit, 5);
    }
}
