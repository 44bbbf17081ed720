//! CLI commands and argument parsing

use crate::types::PointType;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Cache-gated collector for GitHub point endpoints
#[derive(Parser, Debug)]
#[command(name = "point-collector")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Configuration file (YAML or JSON)
    #[arg(short = 'C', long, global = true)]
    pub config: Option<PathBuf>,

    /// Cache file (overrides `cache.path`)
    #[arg(long, global = true)]
    pub cache: Option<PathBuf>,

    /// Output directory for `.jsonl` files (overrides `output.directory`)
    #[arg(short, long, global = true)]
    pub output: Option<PathBuf>,

    /// GitHub API domain (overrides `api_domain`)
    #[arg(long, global = true)]
    pub api_domain: Option<String>,

    /// GitHub token
    #[arg(long, global = true, env = "GITHUB_TOKEN", hide_env_values = true)]
    pub token: Option<String>,

    /// Verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// CLI subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Collect one point type for one scope
    Collect {
        /// Scope identifier (organization id)
        #[arg(long)]
        scope_id: String,

        /// Scope display name (organization login)
        #[arg(long)]
        scope_name: String,

        /// Point type, e.g. Issues or PullRequests
        #[arg(long)]
        point_type: PointType,

        /// Initial endpoint URL
        #[arg(long)]
        url: String,

        /// Collect even if the cache says it is done
        #[arg(long)]
        ignore_cache: bool,

        /// API names for which the cache is bypassed (comma-separated)
        #[arg(long, value_delimiter = ',')]
        ignore_cache_for_apis: Vec<String>,
    },

    /// Collect every request listed in a JSON file
    CollectBatch {
        /// JSON array of collection requests
        #[arg(short, long)]
        input: PathBuf,

        /// Requests processed at once (overrides `concurrency`)
        #[arg(long)]
        concurrency: Option<usize>,
    },

    /// Inspect or reset the completion cache
    Cache {
        #[command(subcommand)]
        action: CacheAction,
    },
}

/// Cache subcommands
#[derive(Subcommand, Debug, Clone, Copy, PartialEq, Eq)]
pub enum CacheAction {
    /// Print every completion record
    Show,
    /// Remove every completion record
    Clear,
}
