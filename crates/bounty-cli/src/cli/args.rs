use bounty_core::config::DEFAULT_CONFIG_PATH;
use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

#[derive(Parser)]
#[command(
    name = "bounty",
    version,
    about = "Content reward contests judged by a two-evaluator validation consensus"
)]
pub struct Cli {
    /// Path to bounty.yaml (missing file means defaults)
    #[arg(
        long,
        global = true,
        env = "BOUNTY_CONFIG",
        default_value = DEFAULT_CONFIG_PATH
    )]
    pub config: PathBuf,

    /// Override the database path from the config
    #[arg(long, global = true, env = "BOUNTY_DATABASE")]
    pub database: Option<PathBuf>,

    #[arg(long, global = true, value_enum, default_value_t = LogFormat::Text)]
    pub log_format: LogFormat,

    #[command(subcommand)]
    pub cmd: Command,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum LogFormat {
    Text,
    Json,
}

#[derive(Subcommand)]
pub enum Command {
    /// Write a sample bounty.yaml
    Init(InitArgs),
    /// Create a contest owned by the calling account
    Create(CreateArgs),
    /// Submit a content URL to a contest
    Submit(SubmitArgs),
    /// Close a contest (creator only)
    Close(CloseArgs),
    /// Show one contest
    Show(ContestArgs),
    /// List all contests
    List,
    /// List the submissions of a contest in submission order
    Submissions(ContestArgs),
    /// List the accepted submitters of a contest
    Winners(ContestArgs),
    /// Show what an address submitted to a contest
    UserSubmission(UserSubmissionArgs),
    Version,
}

/// Who is calling, and when.
#[derive(Args, Debug, Clone)]
pub struct CallerArgs {
    /// Calling account
    #[arg(long = "as", env = "BOUNTY_ACCOUNT")]
    pub account: String,

    /// Call time in unix seconds (defaults to now)
    #[arg(long)]
    pub at: Option<i64>,
}

#[derive(Args, Debug, Clone)]
pub struct InitArgs {
    /// Overwrite an existing config
    #[arg(long)]
    pub force: bool,
}

#[derive(Args, Debug, Clone)]
pub struct CreateArgs {
    #[command(flatten)]
    pub caller: CallerArgs,

    /// Substring the content URL must contain ("*" admits any URL)
    #[arg(long, default_value = "*")]
    pub platform: String,

    #[arg(long)]
    pub topic: String,

    #[arg(long, default_value = "")]
    pub reward: String,

    #[arg(long)]
    pub max_winners: u32,

    /// Unix seconds after which submissions are refused; 0 for none
    #[arg(long, default_value_t = 0)]
    pub deadline: i64,
}

#[derive(Args, Debug, Clone)]
pub struct SubmitArgs {
    #[command(flatten)]
    pub caller: CallerArgs,

    pub contest_id: u64,

    pub url: String,
}

#[derive(Args, Debug, Clone)]
pub struct CloseArgs {
    #[command(flatten)]
    pub caller: CallerArgs,

    pub contest_id: u64,
}

#[derive(Args, Debug, Clone)]
pub struct ContestArgs {
    pub contest_id: u64,
}

#[derive(Args, Debug, Clone)]
pub struct UserSubmissionArgs {
    pub contest_id: u64,

    pub address: String,
}
