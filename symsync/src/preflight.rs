//! Pre-flight checks for symsync
//!
//! Validates that the target process and the external inspection tools are
//! usable before the first reconciliation pass. Provides clear, actionable
//! error messages when requirements aren't met.

use crate::introspection::ToolchainConfig;
use anyhow::{bail, Context, Result};
use std::path::Path;
use std::process::Command;

/// Check if the target process exists.
///
/// # Errors
/// Returns an error naming the PID if `/proc/<pid>` is absent.
pub fn check_process_exists(pid: i32) -> Result<()> {
    let proc_path = format!("/proc/{pid}");
    if !Path::new(&proc_path).exists() {
        bail!(
            "Process {pid} not found.\n\n\
             Is the process still running? Check with: ps -p {pid}"
        );
    }
    Ok(())
}

/// Check if we can read the process's memory maps.
///
/// # Errors
/// Returns an error explaining the likely causes if `/proc/<pid>/maps` is
/// unreadable.
pub fn check_maps_access(pid: i32) -> Result<()> {
    let maps_path = format!("/proc/{pid}/maps");
    std::fs::read_to_string(&maps_path).with_context(|| {
        format!(
            "Cannot read {maps_path}\n\n\
             This usually means:\n\
             - The process doesn't exist (check: ps -p {pid})\n\
             - Permission denied (run as the process owner or with sudo)\n\
             - /proc is not mounted"
        )
    })?;
    Ok(())
}

/// Warn about inspection tools that cannot be found on PATH.
///
/// Missing tools are not fatal: the fallback strategy needs only the
/// section-headers tool, and per-module failures are skipped anyway.
pub fn check_tools_available(cfg: &ToolchainConfig, quiet: bool) {
    if quiet {
        return;
    }
    for tool in [&cfg.file_cmd, &cfg.phdrs_cmd, &cfg.sections_cmd] {
        if Command::new(tool).arg("--version").output().is_err() {
            eprintln!("warning: {tool} not found, some modules may not be introspectable");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_process_not_found() {
        let result = check_process_exists(999_999_999);
        assert!(result.is_err());
        let err = result.unwrap_err().to_string();
        assert!(err.contains("not found"));
    }

    #[test]
    fn test_own_process_passes() {
        let pid = i32::try_from(std::process::id()).expect("pid fits in i32");
        check_process_exists(pid).expect("own process exists");
        check_maps_access(pid).expect("own maps readable");
    }

    #[test]
    fn test_maps_access_missing_process() {
        let result = check_maps_access(999_999_999);
        assert!(result.is_err());
    }
}
