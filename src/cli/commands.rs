use clap::{Parser, Subcommand};
use uuid::Uuid;

#[derive(Parser)]
#[command(
    name = "biaslens",
    version,
    about = "BIAS framework behavioral analysis server",
    long_about = None
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Override the config file path globally
    #[arg(short, long, global = true, default_value = "config.yaml")]
    pub config: String,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Start the HTTP API server
    Serve,

    /// Score an account from its public metrics
    Account {
        #[arg(short, long)]
        username: String,
        #[arg(long)]
        followers: u64,
        #[arg(long, default_value_t = 0)]
        following: u64,
        #[arg(long)]
        likes: u64,
        #[arg(long)]
        videos: u64,
        #[arg(long)]
        avg_views: Option<f64>,
        #[arg(long)]
        avg_comments: Option<f64>,
        #[arg(long)]
        avg_shares: Option<f64>,
        #[arg(long)]
        bio: Option<String>,
        #[command(flatten)]
        benchmark: BenchmarkArgs,
    },

    /// Score a single video from its metrics
    Video {
        #[arg(long)]
        views: u64,
        #[arg(long)]
        likes: u64,
        #[arg(long, default_value_t = 0)]
        comments: u64,
        #[arg(long, default_value_t = 0)]
        shares: u64,
        #[arg(long, default_value_t = 0)]
        saves: u64,
        /// Length in seconds
        #[arg(long, default_value_t = 0.0)]
        duration: f64,
        #[arg(short, long, default_value = "")]
        description: String,
        #[command(flatten)]
        benchmark: BenchmarkArgs,
    },

    /// Score a caption, script or post
    Text {
        content: String,
        /// creator or business
        #[arg(short, long, default_value = "creator")]
        mode: String,
    },

    /// Ask the knowledge router a question
    Ask {
        question: String,
        /// Rewrite the answer through the configured LLM providers
        #[arg(long)]
        enhance: bool,
    },

    /// Show stored analyses, newest first
    History {
        #[arg(short, long)]
        session: Option<String>,
        /// text, video or account
        #[arg(short, long)]
        kind: Option<String>,
        #[arg(short, long, default_value_t = 20)]
        limit: usize,
    },

    /// Moderate community glossary contributions
    Library {
        #[command(subcommand)]
        action: LibraryAction,
    },
}

#[derive(clap::Args)]
pub struct BenchmarkArgs {
    /// tiktok, instagram or youtube (defaults to the configured platform)
    #[arg(long)]
    pub platform: Option<String>,
    /// Content niche (defaults to the configured niche)
    #[arg(long)]
    pub niche: Option<String>,
}

#[derive(Subcommand)]
pub enum LibraryAction {
    /// List contributions, optionally by status
    List {
        #[arg(short, long)]
        status: Option<String>,
    },

    /// Approve a pending contribution
    Approve { id: Uuid },

    /// Reject a pending contribution
    Reject { id: Uuid },

    /// Delete a contribution
    Delete { id: Uuid },
}
