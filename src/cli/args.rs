use std::path::PathBuf;

use clap::{ArgGroup, Args, Parser, Subcommand, ValueEnum};
use serde::{Deserialize, Serialize};

#[derive(Parser)]
#[command(name = "athena")]
#[command(about = "Submit content for misinformation analysis, online or offline")]
#[command(long_about = "athena - misinformation analysis client

Submissions are written to a local offline queue first and delivered to
the analysis backend whenever it is reachable. Anything that cannot be
sent now is retried on the next run.

QUICK START:
  athena analyze \"Drinking bleach cures colds\"   Submit a claim
  athena feedback <id> --incorrect               Report a wrong verdict
  athena queue list                              Show what is waiting
  athena queue run                               Retry everything now
  athena history                                 Previous analyses
  athena learn                                   Educational articles

OUTPUT FORMATS:
  --output pretty    Human-readable colored output (default)
  --output json      Machine-readable JSON for scripting

For more information on a specific command, run:
  athena <command> --help")]
#[command(version, propagate_version = true)]
pub struct Cli {
    /// Output format for command results
    ///
    /// Use 'pretty' for human-readable colored output (default),
    /// or 'json' for machine-readable output suitable for scripting.
    #[arg(short, long, value_enum, default_value = "pretty", global = true)]
    pub output: OutputFormat,

    /// Data directory holding config.yaml and the queue database
    #[arg(long, env = "ATHENA_HOME", global = true)]
    pub home: Option<PathBuf>,

    /// Backend base URL, overriding api.base_url from config
    #[arg(long, env = "ATHENA_API_URL", global = true)]
    pub api_url: Option<String>,

    /// Treat the backend as unreachable; only touch the local queue
    #[arg(long, global = true)]
    pub offline: bool,

    /// Enable debug logging on stderr
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// Output format for command results.
#[derive(ValueEnum, Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Human-readable colored output.
    #[default]
    Pretty,
    /// Machine-readable JSON output.
    Json,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Submit content for analysis
    ///
    /// The submission is queued and, unless --offline is given, the queue
    /// is drained right away. If the backend cannot be reached the
    /// submission stays queued for the next run.
    ///
    /// # Examples
    ///
    ///   athena analyze "5G towers spread viruses"
    ///   athena analyze "..." --max-retries 10
    ///   athena --offline analyze "..."
    #[command(alias = "a")]
    Analyze(AnalyzeArgs),

    /// Report whether an analysis verdict was correct
    ///
    /// # Examples
    ///
    ///   athena feedback 42 --correct
    ///   athena feedback 42 --incorrect
    Feedback(FeedbackArgs),

    /// List previous analyses from the backend
    ///
    /// # Examples
    ///
    ///   athena history
    ///   athena history -n 5 -o json
    History {
        /// Show at most this many analyses
        #[arg(short = 'n', long)]
        limit: Option<usize>,
    },

    /// Show one analysis with its explanation and sources
    Show {
        /// Analysis id
        id: String,
    },

    /// Browse educational articles about misinformation
    Learn {
        /// Only show articles in this category
        #[arg(short, long)]
        category: Option<String>,
    },

    /// Inspect and manage the offline queue
    #[command(alias = "q")]
    Queue(QueueArgs),
}

#[derive(Args)]
pub struct AnalyzeArgs {
    /// Text to analyze
    pub content: String,

    /// Retries allowed after the first failed attempt
    #[arg(long)]
    pub max_retries: Option<u32>,
}

#[derive(Args)]
#[command(group(ArgGroup::new("verdict").required(true).args(["correct", "incorrect"])))]
pub struct FeedbackArgs {
    /// Id of the analysis being rated
    pub analysis_id: String,

    /// The verdict was right
    #[arg(long)]
    pub correct: bool,

    /// The verdict was wrong
    #[arg(long)]
    pub incorrect: bool,

    /// Retries allowed after the first failed attempt
    #[arg(long)]
    pub max_retries: Option<u32>,
}

#[derive(Args)]
pub struct QueueArgs {
    #[command(subcommand)]
    pub command: QueueCommands,
}

#[derive(Subcommand)]
pub enum QueueCommands {
    /// Show pending and retrying counts
    Status,

    /// List queued actions, oldest first
    #[command(alias = "ls")]
    List {
        /// Show at most this many actions
        #[arg(short = 'n', long)]
        limit: Option<usize>,
    },

    /// Queue an arbitrary action without sending it
    ///
    /// # Examples
    ///
    ///   athena queue add analyze --payload '{"content": "..."}'
    ///   athena queue add ping
    Add {
        /// Action type
        #[arg(value_name = "TYPE")]
        kind: String,

        /// JSON payload
        #[arg(long, default_value = "{}")]
        payload: String,

        /// Retries allowed after the first failed attempt
        #[arg(long)]
        max_retries: Option<u32>,
    },

    /// Try to send every queued action now
    Run,

    /// Remove every queued action
    Clear {
        /// Required; clearing cannot be undone
        #[arg(short, long)]
        force: bool,
    },
}
