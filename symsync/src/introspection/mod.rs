//! Module introspection: derive the address at which a debugger should
//! register a module's code section.
//!
//! The debugger needs `base + offset`, where `base` is the module's lowest
//! mapped address (from the memory map) and `offset` is the delta between
//! the module's on-disk code section and its first loadable segment. This
//! crate never parses ELF structures itself; it shells out to the standard
//! inspection tools and scans their text output.
//!
//! Two independent strategies are tried in order; the first success wins:
//!
//! 1. [`Strategy::ProgramHeaders`]: segment base from the program headers,
//!    section address from the section headers, offset is their difference.
//! 2. [`Strategy::SectionFileOffset`]: the file-offset column of the section
//!    headers taken directly. Some tool versions encode the in-file load
//!    bias there, which is why the field position differs.

pub mod offsets;
pub mod tools;

pub use offsets::ToolchainConfig;

use crate::domain::{IntrospectError, StrategyError};
use log::{debug, info};
use std::fmt;

/// Which offset-computation strategy produced a result.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Strategy {
    /// Program-headers segment base combined with the section virtual
    /// address.
    ProgramHeaders,
    /// Section-headers file-offset column taken as the offset directly.
    SectionFileOffset,
}

impl fmt::Display for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ProgramHeaders => write!(f, "program-headers"),
            Self::SectionFileOffset => write!(f, "section-file-offset"),
        }
    }
}

/// Strategies in the order they are attempted.
pub const STRATEGY_ORDER: [Strategy; 2] = [Strategy::ProgramHeaders, Strategy::SectionFileOffset];

/// A successfully computed load offset, tagged with the strategy that
/// produced it.
#[derive(Debug, Clone, Copy)]
pub struct ResolvedOffset {
    pub offset: u64,
    pub strategy: Strategy,
}

/// Narrow seam between the reconciler and the tool-running code, so the
/// reconciler can be exercised without external tools.
pub trait Introspector {
    /// Compute the address at which the debugger should register `path`'s
    /// code, given the module's mapped base address.
    ///
    /// # Errors
    /// [`IntrospectError::Unavailable`] if the module cannot be identified
    /// at all, [`IntrospectError::OffsetUnresolvable`] if every strategy
    /// failed. Both mean "skip this module", never "abort the pass".
    fn register_address(&self, path: &str, base: u64) -> Result<u64, IntrospectError>;
}

/// Introspector backed by the external binutils-style tools.
pub struct ToolIntrospector {
    cfg: ToolchainConfig,
}

impl ToolIntrospector {
    #[must_use]
    pub fn new(cfg: ToolchainConfig) -> Self {
        Self { cfg }
    }

    /// Compute the load offset for `path`, trying each strategy in order.
    ///
    /// # Errors
    /// See [`Introspector::register_address`].
    pub fn load_offset(&self, path: &str) -> Result<ResolvedOffset, IntrospectError> {
        // Sanity check: a module the file-type tool cannot identify is not
        // worth probing further (dangling map entries, special files).
        if let Err(source) = tools::run_tool(&self.cfg.file_cmd, &[path]) {
            return Err(IntrospectError::Unavailable { path: path.to_string(), source });
        }

        for strategy in STRATEGY_ORDER {
            match self.try_strategy(strategy, path) {
                Ok(offset) => {
                    info!("resolved load offset 0x{offset:x} for {path} via {strategy}");
                    return Ok(ResolvedOffset { offset, strategy });
                }
                Err(err) => debug!("strategy {strategy} failed for {path}: {err}"),
            }
        }

        Err(IntrospectError::OffsetUnresolvable { path: path.to_string() })
    }

    fn try_strategy(&self, strategy: Strategy, path: &str) -> Result<u64, StrategyError> {
        match strategy {
            Strategy::ProgramHeaders => {
                let phdrs = self.run_listing(&self.cfg.phdrs_cmd, &self.cfg.phdrs_args, path)?;
                let segment_base = offsets::parse_segment_base(&phdrs, &self.cfg)?;
                let sections =
                    self.run_listing(&self.cfg.sections_cmd, &self.cfg.sections_args, path)?;
                let section_vma =
                    offsets::parse_section_field(&sections, self.cfg.section_vma_field, &self.cfg)?;
                // Code sections sit above the first load segment in a
                // well-formed module; modular arithmetic here and in
                // register_address keeps a malformed one non-fatal.
                Ok(section_vma.wrapping_sub(segment_base))
            }
            Strategy::SectionFileOffset => {
                let sections =
                    self.run_listing(&self.cfg.sections_cmd, &self.cfg.sections_args, path)?;
                offsets::parse_section_field(
                    &sections,
                    self.cfg.section_file_offset_field,
                    &self.cfg,
                )
            }
        }
    }

    fn run_listing(&self, cmd: &str, args: &[String], path: &str) -> Result<String, StrategyError> {
        let mut argv: Vec<&str> = args.iter().map(String::as_str).collect();
        argv.push(path);
        Ok(tools::run_tool(cmd, &argv)?)
    }
}

impl Introspector for ToolIntrospector {
    fn register_address(&self, path: &str, base: u64) -> Result<u64, IntrospectError> {
        let resolved = self.load_offset(path)?;
        Ok(base.wrapping_add(resolved.offset))
    }
}
