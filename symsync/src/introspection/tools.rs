//! Blocking subprocess invocation of the inspection tools.
//!
//! Every call here runs an external tool to completion and captures its
//! output. A hang in a tool blocks the whole pass; cancellation, if any, is
//! the caller's concern.

use crate::domain::ToolError;
use std::process::Command;

/// Run an external tool and capture its combined stdout and stderr.
///
/// A tool that cannot be spawned or exits non-zero is a failure, whatever it
/// printed. Output is decoded lossily; the strategies only scan for ASCII
/// markers and hex fields.
///
/// # Errors
/// [`ToolError::Spawn`] if the program cannot be started,
/// [`ToolError::Failed`] on a non-zero exit status.
pub fn run_tool(program: &str, args: &[&str]) -> Result<String, ToolError> {
    let output = Command::new(program)
        .args(args)
        .output()
        .map_err(|source| ToolError::Spawn { program: program.to_string(), source })?;

    if !output.status.success() {
        return Err(ToolError::Failed { program: program.to_string(), status: output.status });
    }

    let mut text = String::from_utf8_lossy(&output.stdout).into_owned();
    text.push_str(&String::from_utf8_lossy(&output.stderr));
    Ok(text)
}
