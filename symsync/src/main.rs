//! # symsync - Main Entry Point
//!
//! One reconciliation pass per invocation: read the target's memory map,
//! compute load addresses for every file-backed module, and emit the
//! debugger commands on stdout (or into `--output`). Stderr carries the
//! banner, warnings and `--interactive` echoes, so stdout stays pipeable
//! into a debugger session.

use anyhow::{Context, Result};
use clap::Parser;
use regex::Regex;
use std::fs::File;
use std::io::{self, BufWriter, Write};

use symsync::cli::Args;
use symsync::domain::Pid;
use symsync::host::ScriptHost;
use symsync::introspection::{ToolIntrospector, ToolchainConfig};
use symsync::preflight::{check_maps_access, check_process_exists, check_tools_available};
use symsync::process_lookup::find_process_by_name;
use symsync::reconcile::{Reconciler, SyncSummary};

// Exit codes
const EXIT_SUCCESS: i32 = 0;
const EXIT_ERROR: i32 = 1;
const EXIT_USAGE: i32 = 2;

fn main() {
    env_logger::init();
    std::process::exit(match run() {
        Ok(()) => EXIT_SUCCESS,
        Err(e) => {
            let code = exit_code_for(&e);
            eprintln!("error: {e}");
            code
        }
    });
}

fn exit_code_for(err: &anyhow::Error) -> i32 {
    let msg = err.to_string().to_lowercase();
    if msg.contains("missing required argument") || msg.contains("cannot use process") {
        EXIT_USAGE
    } else {
        EXIT_ERROR
    }
}

/// Resolve the target PID from CLI arguments.
///
/// Supports two modes:
/// - `symsync my-app` - find process by name
/// - `symsync --pid 1234` - explicit PID
fn resolve_pid(args: &Args) -> Result<Pid> {
    if let Some(ref name) = args.process {
        if args.pid.is_some() {
            anyhow::bail!(
                "Cannot use PROCESS argument with --pid.\n\n\
                 Use either:\n  \
                 symsync my-app          (auto-detect)\n  \
                 symsync --pid 1234      (explicit PID)"
            );
        }
        let info = find_process_by_name(name)?;
        return Ok(info.pid);
    }

    if let Some(pid) = args.pid {
        return Ok(Pid(pid));
    }

    anyhow::bail!(
        "Missing required argument: PROCESS or --pid\n\n\
         Usage:\n  \
         symsync my-app          Auto-detect PID by process name\n  \
         symsync --pid 1234      Explicit PID\n\n\
         Run 'symsync --help' for more options"
    )
}

fn run() -> Result<()> {
    let args = Args::parse();

    let pid = resolve_pid(&args)?;
    let filter = args
        .filter
        .as_deref()
        .map(Regex::new)
        .transpose()
        .context("Invalid --filter pattern")?;

    check_process_exists(pid.0)?;
    check_maps_access(pid.0)?;
    let cfg = ToolchainConfig::default();
    check_tools_available(&cfg, args.quiet);

    if !args.quiet {
        eprintln!("symsync v{}", env!("CARGO_PKG_VERSION"));
        eprintln!("pid: {}", pid.0);
    }

    let introspector = ToolIntrospector::new(cfg);
    let mut reconciler = Reconciler::new();

    let summary = match args.output {
        Some(ref path) => {
            let file = File::create(path)
                .with_context(|| format!("Failed to create {}", path.display()))?;
            let mut host = ScriptHost::new(BufWriter::new(file), args.interactive);
            let summary = reconciler.sync(pid, filter.as_ref(), &introspector, &mut host)?;
            host.into_inner().flush().context("Failed to flush output file")?;
            summary
        }
        None => {
            let stdout = io::stdout();
            let mut host = ScriptHost::new(stdout.lock(), args.interactive);
            reconciler.sync(pid, filter.as_ref(), &introspector, &mut host)?
        }
    };

    print_summary(&args, &summary);
    Ok(())
}

fn print_summary(args: &Args, summary: &SyncSummary) {
    if args.quiet {
        return;
    }
    eprintln!(
        "registered: {}, unregistered: {}, skipped: {}",
        summary.registered, summary.unregistered, summary.skipped
    );
    if let Some(ref path) = args.output {
        eprintln!("saved: {}", path.display());
    }
}
