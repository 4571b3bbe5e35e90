use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(
    name = "blindpair",
    version,
    about = "Blind pairwise human evaluation of prompt variants"
)]
pub struct Cli {
    #[command(subcommand)]
    pub cmd: Command,
}

impl Cli {
    pub fn config_path(&self) -> Option<&Path> {
        match &self.cmd {
            Command::Init(a) => Some(&a.config),
            Command::Import(a) => Some(&a.store.config),
            Command::Sample(a) => Some(&a.store.config),
            Command::Record(a) => Some(&a.store.config),
            Command::Stats(a) => Some(&a.store.config),
            Command::Reset(a) => Some(&a.store.config),
            Command::Version => None,
        }
    }
}

#[derive(Subcommand)]
pub enum Command {
    /// Write a sample config and create the database
    Init(InitArgs),
    /// Load generated interpretations from a JSONL file
    Import(ImportArgs),
    /// Draw blinded pairs for an evaluator
    Sample(SampleArgs),
    /// Record one judgment
    Record(RecordArgs),
    /// Aggregate all judgments into a report
    Stats(StatsArgs),
    /// Delete all interpretations and evaluations
    Reset(ResetArgs),
    Version,
}

impl Command {
    pub fn name(&self) -> &'static str {
        match self {
            Command::Init(_) => "init",
            Command::Import(_) => "import",
            Command::Sample(_) => "sample",
            Command::Record(_) => "record",
            Command::Stats(_) => "stats",
            Command::Reset(_) => "reset",
            Command::Version => "version",
        }
    }
}

#[derive(clap::Args, Clone)]
pub struct StoreArgs {
    #[arg(long, default_value = "blindpair.yaml")]
    pub config: PathBuf,

    /// database path (overrides config and BLINDPAIR_DB)
    #[arg(long)]
    pub db: Option<PathBuf>,

    /// fail on unknown config keys instead of warning
    #[arg(long)]
    pub strict: bool,
}

#[derive(Parser, Clone)]
pub struct InitArgs {
    #[arg(long, default_value = "blindpair.yaml")]
    pub config: PathBuf,

    /// generate .gitignore for the database directory
    #[arg(long)]
    pub gitignore: bool,
}

#[derive(Parser, Clone)]
pub struct ImportArgs {
    #[command(flatten)]
    pub store: StoreArgs,

    /// JSONL file, one interpretation per line
    pub input: PathBuf,
}

#[derive(Parser, Clone)]
pub struct SampleArgs {
    #[command(flatten)]
    pub store: StoreArgs,

    /// number of pairs to draw
    #[arg(long, default_value_t = 1)]
    pub count: u32,

    /// fixed seed (overrides sampling.seed)
    #[arg(long)]
    pub seed: Option<u64>,
}

#[derive(Parser, Clone)]
pub struct RecordArgs {
    #[command(flatten)]
    pub store: StoreArgs,

    /// instance id judged better (or either id for a tie)
    #[arg(long)]
    pub winner: String,

    /// instance id judged worse; omit to record a tie
    #[arg(long)]
    pub loser: Option<String>,

    #[arg(long, env = "BLINDPAIR_EVALUATOR")]
    pub evaluator: String,

    /// 1..=5, how much better the winner is (ties are always 3)
    #[arg(long)]
    pub rating: Option<u8>,

    #[arg(long)]
    pub feedback: Option<String>,
}

#[derive(Parser, Clone)]
pub struct StatsArgs {
    #[command(flatten)]
    pub store: StoreArgs,

    /// text|json|md (overrides report.format)
    #[arg(long)]
    pub format: Option<String>,

    /// write the report to a file instead of stdout
    #[arg(long)]
    pub out: Option<PathBuf>,
}

#[derive(Parser, Clone)]
pub struct ResetArgs {
    #[command(flatten)]
    pub store: StoreArgs,

    /// skip the confirmation prompt
    #[arg(long)]
    pub force: bool,
}
