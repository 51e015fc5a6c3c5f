//! Snapshot reconciliation: diff the live memory map against the last pass
//! and drive register/unregister actions.
//!
//! The [`Reconciler`] is the long-lived piece of the crate. It owns the
//! per-process module registries and, once per explicit invocation, compares
//! a fresh [`MapSnapshot`] against them: modules that vanished or moved are
//! unregistered, modules not seen before are introspected and registered.
//! One bad module never aborts the rest of the pass; a failed host action
//! always does.

use crate::domain::Pid;
use crate::host::DebuggerHost;
use crate::introspection::Introspector;
use crate::memory_maps::{self, MapSnapshot};
use anyhow::Result;
use log::{debug, info};
use regex::Regex;
use std::collections::HashMap;

/// Last-known base address per module path, for one process.
pub type ModuleRegistry = HashMap<String, u64>;

/// Action counts for one reconciliation pass.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct SyncSummary {
    /// Modules registered this pass.
    pub registered: usize,
    /// Modules unregistered this pass (vanished or moved).
    pub unregistered: usize,
    /// New modules skipped because introspection failed.
    pub skipped: usize,
    /// New modules skipped by the path filter.
    pub filtered: usize,
    /// Modules already registered at an unchanged base.
    pub unchanged: usize,
}

/// Per-process registration state across passes.
///
/// Lives as long as the debugging session that created it; state is keyed
/// per PID with no coupling between processes, and is never persisted.
#[derive(Debug, Default)]
pub struct Reconciler {
    state: HashMap<Pid, ModuleRegistry>,
}

impl Reconciler {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// The modules currently tracked for `pid`, if any pass has run.
    #[must_use]
    pub fn registry(&self, pid: Pid) -> Option<&ModuleRegistry> {
        self.state.get(&pid)
    }

    /// Run one reconciliation pass against the live process.
    ///
    /// # Errors
    /// Fatal if the process's memory maps cannot be read or a host action
    /// fails. Per-module introspection failures are logged and skipped.
    pub fn sync(
        &mut self,
        pid: Pid,
        filter: Option<&Regex>,
        introspector: &dyn Introspector,
        host: &mut dyn DebuggerHost,
    ) -> Result<SyncSummary> {
        let current = memory_maps::read_process_maps(pid)?;
        self.reconcile(pid, &current, filter, introspector, host)
    }

    /// Reconcile a snapshot against stored state.
    ///
    /// Split from [`Self::sync`] so the diff logic can be exercised without
    /// a live process.
    ///
    /// # Errors
    /// Host action failures abort the pass and propagate.
    pub fn reconcile(
        &mut self,
        pid: Pid,
        current: &MapSnapshot,
        filter: Option<&Regex>,
        introspector: &dyn Introspector,
        host: &mut dyn DebuggerHost,
    ) -> Result<SyncSummary> {
        let previous = self.state.entry(pid).or_default();
        let mut summary = SyncSummary::default();

        // Phase 1: drop registrations that no longer describe the process.
        // A moved module is dropped here and picked up again as new below.
        let stale: Vec<String> = previous
            .iter()
            .filter(|&(path, base)| current.get(path) != Some(base))
            .map(|(path, _)| path.clone())
            .collect();
        for path in stale {
            info!("unregistering {path}");
            host.unregister_symbol_file(&path)?;
            previous.remove(&path);
            summary.unregistered += 1;
        }

        // Phase 2: register modules not tracked yet.
        for (path, &base) in current {
            if previous.contains_key(path) {
                summary.unchanged += 1;
                continue;
            }
            if let Some(pattern) = filter {
                if !pattern.is_match(path) {
                    summary.filtered += 1;
                    continue;
                }
            }

            // Recorded before introspection so a module that cannot be
            // introspected is not re-probed on every subsequent pass.
            previous.insert(path.clone(), base);

            match introspector.register_address(path, base) {
                Ok(address) => {
                    info!("registering {path} at 0x{address:x}");
                    host.register_symbol_file(path, address)?;
                    summary.registered += 1;
                }
                Err(err) => {
                    debug!("skipping {path}: {err}");
                    summary.skipped += 1;
                }
            }
        }

        Ok(summary)
    }
}
