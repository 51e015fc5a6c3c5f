//! Seam between the reconciler and the debugger it drives.
//!
//! The reconciler only ever needs two opaque actions from its host: register
//! a symbol file at an address, and unregister one. [`ScriptHost`] renders
//! them as GDB command lines (`add-symbol-file` / `remove-symbol-file`)
//! suitable for piping into a session or sourcing from a file; tests supply
//! a recording implementation instead.

use anyhow::{Context, Result};
use std::io::Write;

/// Opaque symbol-file actions issued to the host debugger.
///
/// A failed action indicates the host's symbol state can no longer be
/// trusted, so implementations must report failures rather than swallow
/// them; the reconciler aborts the pass on the first one.
pub trait DebuggerHost {
    /// Register `path`'s symbols at the computed code address.
    ///
    /// # Errors
    /// Propagated to the caller; never silently dropped.
    fn register_symbol_file(&mut self, path: &str, address: u64) -> Result<()>;

    /// Drop a previous registration for `path`.
    ///
    /// # Errors
    /// Propagated to the caller; never silently dropped.
    fn unregister_symbol_file(&mut self, path: &str) -> Result<()>;
}

/// Host that emits GDB command lines to a writer.
///
/// When `interactive` is set, each action is also echoed as a human-readable
/// line on stderr. The flag affects verbosity only, never which commands are
/// emitted.
pub struct ScriptHost<W: Write> {
    out: W,
    interactive: bool,
}

impl<W: Write> ScriptHost<W> {
    pub fn new(out: W, interactive: bool) -> Self {
        Self { out, interactive }
    }

    /// Hand back the writer, e.g. to flush a buffered file.
    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write> DebuggerHost for ScriptHost<W> {
    fn register_symbol_file(&mut self, path: &str, address: u64) -> Result<()> {
        if self.interactive {
            eprintln!("  + {path} at 0x{address:x}");
        }
        writeln!(self.out, "add-symbol-file \"{path}\" 0x{address:x}")
            .context("Failed to write register command")
    }

    fn unregister_symbol_file(&mut self, path: &str) -> Result<()> {
        if self.interactive {
            eprintln!("  - {path}");
        }
        writeln!(self.out, "remove-symbol-file \"{path}\"")
            .context("Failed to write unregister command")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_register_command_format() {
        let mut host = ScriptHost::new(Vec::new(), false);
        host.register_symbol_file("/lib/x.so", 0x7f10_a3c2_6000).unwrap();
        let out = String::from_utf8(host.into_inner()).unwrap();
        assert_eq!(out, "add-symbol-file \"/lib/x.so\" 0x7f10a3c26000\n");
    }

    #[test]
    fn test_unregister_command_format() {
        let mut host = ScriptHost::new(Vec::new(), false);
        host.unregister_symbol_file("/lib/x.so").unwrap();
        let out = String::from_utf8(host.into_inner()).unwrap();
        assert_eq!(out, "remove-symbol-file \"/lib/x.so\"\n");
    }

    #[test]
    fn test_write_failure_propagates() {
        struct Broken;
        impl Write for Broken {
            fn write(&mut self, _buf: &[u8]) -> std::io::Result<usize> {
                Err(std::io::Error::from(std::io::ErrorKind::BrokenPipe))
            }
            fn flush(&mut self) -> std::io::Result<()> {
                Ok(())
            }
        }

        let mut host = ScriptHost::new(Broken, false);
        assert!(host.register_symbol_file("/lib/x.so", 0x1000).is_err());
    }
}
