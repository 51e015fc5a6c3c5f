//! CLI argument definitions

use clap::Parser;
use std::path::PathBuf;

#[derive(Parser)]
#[command(
    name = "symsync",
    about = "Keep debugger symbol files in sync with a process's loaded modules",
    after_help = "\
EXAMPLES:
    symsync my-app                        Auto-detect PID by process name
    symsync --pid 1234                    Explicit PID, commands on stdout
    symsync --pid 1234 --filter libc      Only register matching modules
    symsync --pid 1234 --output syms.gdb  Write commands to a file"
)]
pub struct Args {
    /// Process name to sync (auto-detects PID)
    #[arg(value_name = "PROCESS")]
    pub process: Option<String>,

    /// Process ID to sync
    #[arg(short, long)]
    pub pid: Option<i32>,

    /// Only register new modules whose path matches this regex
    #[arg(short, long, value_name = "REGEX")]
    pub filter: Option<String>,

    /// Write the generated debugger commands to a file instead of stdout
    #[arg(long, value_name = "FILE")]
    pub output: Option<PathBuf>,

    /// Echo each issued action on stderr
    #[arg(short, long)]
    pub interactive: bool,

    /// Suppress non-essential output
    #[arg(short, long)]
    pub quiet: bool,
}
