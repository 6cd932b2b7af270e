use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

use crate::snapshot::SnapshotType;

#[derive(Parser)]
#[command(name = "snapbrk")]
#[command(about = "List snapper snapshots and create pre/post pairs")]
#[command(version)]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalArgs,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Args, Debug, Clone, Default)]
pub struct GlobalArgs {
    /// Config file (defaults to ~/.config/snapbrk/config.toml)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Snapper configuration to operate on (overrides config_name)
    #[arg(long, global = true)]
    pub snapper_config: Option<String>,

    /// Increase log verbosity (-v info, -vv debug)
    #[arg(long, short = 'v', action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,
}

#[derive(Subcommand)]
pub enum Command {
    /// Check whether the snapper configuration is registered
    Configured,

    /// List existing snapshots
    List(ListArgs),

    /// Show one snapshot and the pre snapshot it is paired with
    Show(ShowArgs),

    /// Print the pre snapshot a new post snapshot would be paired with
    Pair(PairArgs),

    /// Create a single, pre or post snapshot
    Create(CreateArgs),
}

#[derive(Parser)]
pub struct ListArgs {
    /// Output as JSON instead of table
    #[arg(long, default_value_t = false)]
    pub json: bool,
}

#[derive(Parser)]
pub struct ShowArgs {
    /// Snapshot number
    pub number: u32,

    /// Output as JSON
    #[arg(long, default_value_t = false)]
    pub json: bool,
}

#[derive(Parser)]
pub struct PairArgs {
    /// Pre snapshot to pair with instead of the most recent open one
    #[arg(long)]
    pub pre_num: Option<u32>,
}

#[derive(Parser)]
pub struct CreateArgs {
    /// Kind of snapshot to create
    #[arg(value_enum)]
    pub kind: KindArg,

    /// Free text stored with the snapshot
    #[arg(long, short = 'd')]
    pub description: String,

    /// Pre snapshot a post snapshot belongs to (post only)
    #[arg(long)]
    pub pre_num: Option<u32>,

    /// Cleanup algorithm tag (number, timeline, empty-pre-post)
    #[arg(long)]
    pub cleanup: Option<String>,

    /// Mark the snapshot as important
    #[arg(long, default_value_t = false)]
    pub important: bool,

    /// Output the created snapshot as JSON
    #[arg(long, default_value_t = false)]
    pub json: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum KindArg {
    Single,
    Pre,
    Post,
}

impl From<KindArg> for SnapshotType {
    fn from(kind: KindArg) -> Self {
        match kind {
            KindArg::Single => SnapshotType::Single,
            KindArg::Pre => SnapshotType::Pre,
            KindArg::Post => SnapshotType::Post,
        }
    }
}
