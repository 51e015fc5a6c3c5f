//! Memory map parsing for module discovery
//!
//! This module reads /proc/pid/maps to determine which file-backed modules
//! (shared libraries and the main executable) a process has loaded, and the
//! lowest address each one is mapped at. That lowest address is the module's
//! base, which the introspector later combines with the module's load offset
//! to produce the symbol registration address.

use crate::domain::{Pid, SyncError};
use std::collections::BTreeMap;
use std::fs;

/// Transient snapshot of a process's file-backed mappings:
/// module path -> lowest mapped base address.
///
/// Rebuilt fresh on every reconciliation pass and discarded afterwards.
pub type MapSnapshot = BTreeMap<String, u64>;

/// Read and parse `/proc/<pid>/maps` for a live process.
///
/// # Errors
/// Returns [`SyncError::ProcessUnreadable`] if the maps file cannot be
/// opened (process gone, permission denied, /proc not mounted). This is
/// fatal for the whole pass.
pub fn read_process_maps(pid: Pid) -> Result<MapSnapshot, SyncError> {
    let maps_path = format!("/proc/{}/maps", pid.0);
    let text = fs::read_to_string(&maps_path)
        .map_err(|source| SyncError::ProcessUnreadable { pid, source })?;
    Ok(parse_maps(&text))
}

/// Parse the text of a maps file into path -> lowest base address.
///
/// Each line has whitespace-separated fields:
/// `address-range perms offset dev inode [path]`.
///
/// Anonymous regions (inode `0`) and pathless entries are never tracked.
/// A module is usually mapped as several discontiguous segments (text,
/// rodata, data); the smallest start address across all of them is its base.
/// Lines that don't parse are ignored rather than failing the snapshot.
#[must_use]
pub fn parse_maps(text: &str) -> MapSnapshot {
    let mut snapshot = MapSnapshot::new();

    for line in text.lines() {
        let parts: Vec<&str> = line.split_whitespace().collect();
        if parts.len() < 6 {
            continue;
        }
        // parts: [range, perms, offset, dev, inode, path]
        if parts[4] == "0" {
            continue;
        }
        let Some(start_text) = parts[0].split('-').next() else {
            continue;
        };
        let Ok(start) = u64::from_str_radix(start_text, 16) else {
            continue;
        };

        snapshot
            .entry(parts[5].to_string())
            .and_modify(|base| *base = (*base).min(start))
            .or_insert(start);
    }

    snapshot
}
