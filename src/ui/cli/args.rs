// Wed Jan 15 2026 - Alex

use crate::utils::parse_hex_u64;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "heapsnap")]
#[command(author = "Alex")]
#[command(version = "1.0.0")]
#[command(about = "Post-mortem GC heap and async analysis for Native AOT snapshots", long_about = None)]
pub struct Args {
    #[command(subcommand)]
    pub command: Command,

    /// Snapshot manifest (JSON) describing the captured memory.
    #[arg(long, global = true, default_value = "snapshot.json")]
    pub snapshot: PathBuf,

    #[arg(long, global = true, default_value = "warn")]
    pub log_level: String,

    /// JSON config file; command-line flags override its values.
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Emit statistics and summaries as JSON.
    #[arg(long, global = true)]
    pub json: bool,

    #[arg(long, global = true)]
    pub no_color: bool,

    #[arg(long, global = true)]
    pub threads: Option<usize>,

    /// Walk heaps one at a time.
    #[arg(long, global = true)]
    pub sequential: bool,

    /// Show a spinner while heaps are walked.
    #[arg(long, global = true)]
    pub progress: bool,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// List heap objects and per-type statistics.
    #[command(name = "dumpheap")]
    DumpHeap(DumpHeapArgs),
    /// Check every object header on the GC heaps.
    #[command(name = "verifyheap")]
    VerifyHeap,
    /// Show async state machines and their continuation chains.
    #[command(name = "dumpasync")]
    DumpAsync(DumpAsyncArgs),
    /// Write the runtime stress log to a file.
    #[command(name = "dumplog")]
    DumpLog(DumpLogArgs),
    /// List runtime threads.
    #[command(name = "threads")]
    Threads,
}

#[derive(Parser, Debug, Default)]
pub struct DumpHeapArgs {
    /// Only objects whose type name contains this string.
    #[arg(short, long = "type")]
    pub type_name: Option<String>,

    /// Print addresses only.
    #[arg(long)]
    pub short: bool,

    /// Print the summary instead of individual objects.
    #[arg(short, long)]
    pub stat: bool,

    /// Sort statistics by total size.
    #[arg(long)]
    pub sort: bool,
}

#[derive(Parser, Debug, Default)]
pub struct DumpAsyncArgs {
    #[arg(short, long = "type")]
    pub type_name: Option<String>,

    /// Only the object at this hex address.
    #[arg(short, long = "addr", value_parser = parse_address)]
    pub address: Option<u64>,

    /// Include any task-derived object.
    #[arg(long)]
    pub tasks: bool,

    /// Print continuation chains.
    #[arg(long)]
    pub stacks: bool,

    /// Include operations that already completed.
    #[arg(long)]
    pub completed: bool,

    /// Match user-defined types by their fields. Slow.
    #[arg(short, long = "userdefined")]
    pub user_defined: bool,
}

#[derive(Parser, Debug)]
pub struct DumpLogArgs {
    #[arg(short, long, default_value = crate::stresslog::DEFAULT_LOG_FILE)]
    pub file: PathBuf,
}

fn parse_address(s: &str) -> Result<u64, String> {
    parse_hex_u64(s).ok_or_else(|| format!("'{}' is not a hex address", s))
}
