//! # symsync - Live Symbol-File Synchronization
//!
//! symsync keeps a debugger's symbol-file registrations in step with the
//! shared libraries a live process actually has mapped. Dynamic loaders,
//! hot-reload workflows and emulation layers load, unload and relocate
//! modules at runtime, which silently invalidates a debugger's static
//! `add-symbol-file` registrations. Each symsync pass re-reads the process's
//! memory map, diffs it against the previous pass, and issues the register
//! and unregister actions needed to catch the debugger up.
//!
//! ## Architecture Overview
//!
//! ```text
//! /proc/<pid>/maps ──▶ ┌─────────────┐
//!                      │  Map Reader │  path -> lowest mapped base
//!                      └──────┬──────┘
//!                             ▼
//!                      ┌─────────────┐     ┌───────────────┐
//!                      │  Reconciler │────▶│ Introspection │
//!                      │ (diff vs.   │     │ file/readelf/ │
//!                      │  last pass) │     │ objdump       │
//!                      └──────┬──────┘     └───────────────┘
//!                             ▼
//!                      ┌─────────────┐
//!                      │ DebuggerHost│  add-symbol-file / remove-symbol-file
//!                      └─────────────┘
//! ```
//!
//! ## Module Structure
//!
//! - [`memory_maps`]: parse `/proc/<pid>/maps` into a snapshot of
//!   file-backed modules and their base addresses
//! - [`introspection`]: derive each module's load offset by shelling out to
//!   the standard ELF inspection tools, with an ordered strategy fallback
//! - [`reconcile`]: per-process registration state and the diff-and-act pass
//! - [`host`]: the narrow seam to the debugger (opaque register/unregister
//!   actions)
//! - [`cli`], [`process_lookup`], [`preflight`]: binary-side plumbing
//! - [`domain`]: core newtypes and structured errors
//!
//! ## Key Behaviors
//!
//! - A module whose base address changed is unregistered at its old state
//!   and re-registered at the new address in the same pass.
//! - Per-module introspection failures (stripped or unreadable files) skip
//!   that module only; the rest of the pass continues.
//! - Back-to-back passes over an unchanged process issue no actions.
//!
//! ## Typical Usage
//!
//! ```bash
//! # Emit registration commands for a running process
//! symsync --pid 1234 > syms.gdb
//!
//! # Limit registration to libc, echoing actions as they happen
//! symsync --pid 1234 --filter libc --interactive
//! ```

// Expose modules for testing
pub mod cli;
pub mod domain;
pub mod host;
pub mod introspection;
pub mod memory_maps;
pub mod preflight;
pub mod process_lookup;
pub mod reconcile;
