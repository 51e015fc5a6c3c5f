//! Structured error types for symsync
//!
//! Using thiserror for automatic Display implementation and error chaining.
//!
//! The split mirrors the propagation policy: [`SyncError`] aborts a whole
//! reconciliation pass, [`IntrospectError`] only ever skips a single module,
//! and [`ToolError`]/[`StrategyError`] are the per-invocation failures the
//! introspector folds into those.

use super::types::Pid;
use std::process::ExitStatus;
use thiserror::Error;

/// Pass-level failures. Anything here aborts the current reconciliation.
#[derive(Error, Debug)]
pub enum SyncError {
    #[error("cannot read memory maps for process {pid}")]
    ProcessUnreadable {
        pid: Pid,
        #[source]
        source: std::io::Error,
    },
}

/// Per-module introspection failures. The reconciler logs and skips the
/// module; the rest of the pass continues.
#[derive(Error, Debug)]
pub enum IntrospectError {
    #[error("module {path} cannot be identified by external tools")]
    Unavailable {
        path: String,
        #[source]
        source: ToolError,
    },

    #[error("no offset strategy succeeded for module {path}")]
    OffsetUnresolvable { path: String },
}

/// Failure to run one external inspection tool.
#[derive(Error, Debug)]
pub enum ToolError {
    #[error("failed to spawn {program}: {source}")]
    Spawn {
        program: String,
        source: std::io::Error,
    },

    #[error("{program} exited with {status}")]
    Failed { program: String, status: ExitStatus },
}

/// Why a single offset-computation strategy produced no result.
///
/// These never escape the introspector; they exist so a failed strategy can
/// be logged with enough detail to diagnose a tool-version mismatch.
#[derive(Error, Debug)]
pub enum StrategyError {
    #[error(transparent)]
    Tool(#[from] ToolError),

    #[error("no line containing {marker:?} in {tool} output")]
    MarkerNotFound { tool: String, marker: String },

    #[error("field {index} missing on matching line")]
    FieldMissing { index: usize },

    #[error("field {index} is not a hex address: {text:?}")]
    BadHex { index: usize, text: String },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sync_error_display() {
        let err = SyncError::ProcessUnreadable {
            pid: Pid(1234),
            source: std::io::Error::from(std::io::ErrorKind::PermissionDenied),
        };
        assert_eq!(err.to_string(), "cannot read memory maps for process PID:1234");
    }

    #[test]
    fn test_offset_unresolvable_display() {
        let err = IntrospectError::OffsetUnresolvable { path: "/lib/x.so".to_string() };
        assert!(err.to_string().contains("/lib/x.so"));
    }

    #[test]
    fn test_bad_hex_display() {
        let err = StrategyError::BadHex { index: 3, text: "Name".to_string() };
        assert!(err.to_string().contains("field 3"));
        assert!(err.to_string().contains("Name"));
    }
}
