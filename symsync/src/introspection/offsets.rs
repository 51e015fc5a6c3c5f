//! Field-level parsing of program-header and section-header listings.
//!
//! The inspection tools emit semi-structured text whose column layout is
//! tool-version-specific. Everything fragile about that layout (markers and
//! field positions) lives in [`ToolchainConfig`] so it can be adjusted and
//! validated against the tool versions in the target environment, and the
//! parsers here are pure (`&str` in, result out) so they can be tested
//! without spawning anything.

use crate::domain::StrategyError;

/// Names, flags, markers and field positions of the external inspection
/// tools.
///
/// The defaults track GNU binutils output:
///
/// ```text
/// readelf -l:   LOAD  0x0000000000000000 0x0000000000000000 0x...
///                     ^offset            ^virtaddr (field 2)
/// objdump -h:   9 .text  0001a0c1  0000000000026000  0000000000026000  00026000  2**4
///                        ^size     ^vma (field 3)    ^lma              ^file off (field 5)
/// ```
#[derive(Debug, Clone)]
pub struct ToolchainConfig {
    /// File-type identification tool; only its exit status matters.
    pub file_cmd: String,
    /// Program-headers listing tool and its arguments.
    pub phdrs_cmd: String,
    pub phdrs_args: Vec<String>,
    /// Section-headers listing tool and its arguments.
    pub sections_cmd: String,
    pub sections_args: Vec<String>,
    /// Substring identifying a loadable-segment line in program-headers
    /// output.
    pub load_segment_marker: String,
    /// Substring identifying the executable code section in section-headers
    /// output.
    pub code_section_name: String,
    /// Field index of the segment virtual address on a load-segment line.
    pub segment_vaddr_field: usize,
    /// Field index of the section virtual address on a code-section line.
    pub section_vma_field: usize,
    /// Field index of the in-file load bias on a code-section line, used by
    /// the fallback strategy.
    pub section_file_offset_field: usize,
}

impl Default for ToolchainConfig {
    fn default() -> Self {
        Self {
            file_cmd: "file".to_string(),
            phdrs_cmd: "readelf".to_string(),
            phdrs_args: vec!["-l".to_string()],
            sections_cmd: "objdump".to_string(),
            sections_args: vec!["-h".to_string()],
            load_segment_marker: "LOAD".to_string(),
            code_section_name: ".text".to_string(),
            segment_vaddr_field: 2,
            section_vma_field: 3,
            section_file_offset_field: 5,
        }
    }
}

/// Extract the file-relative virtual address of the first loadable segment
/// from a program-headers listing.
///
/// # Errors
/// Fails if no line contains the load-segment marker, or the address field
/// is missing or not hexadecimal.
pub fn parse_segment_base(listing: &str, cfg: &ToolchainConfig) -> Result<u64, StrategyError> {
    first_matching_field(
        listing,
        &cfg.load_segment_marker,
        cfg.segment_vaddr_field,
        &cfg.phdrs_cmd,
    )
}

/// Extract a hex address field from the first line naming the code section
/// in a section-headers listing. Which field depends on the strategy.
///
/// # Errors
/// Fails if no line contains the code-section name, or the requested field
/// is missing or not hexadecimal.
pub fn parse_section_field(
    listing: &str,
    field: usize,
    cfg: &ToolchainConfig,
) -> Result<u64, StrategyError> {
    first_matching_field(listing, &cfg.code_section_name, field, &cfg.sections_cmd)
}

/// Scan for the first line containing `marker` and hex-parse its
/// `index`-th whitespace-separated field. The scan stops at the first
/// matching line; a bad field there fails the whole parse rather than
/// falling through to later lines.
fn first_matching_field(
    listing: &str,
    marker: &str,
    index: usize,
    tool: &str,
) -> Result<u64, StrategyError> {
    let line = listing.lines().find(|line| line.contains(marker)).ok_or_else(|| {
        StrategyError::MarkerNotFound { tool: tool.to_string(), marker: marker.to_string() }
    })?;
    let field = line
        .split_whitespace()
        .nth(index)
        .ok_or(StrategyError::FieldMissing { index })?;
    parse_hex(field).ok_or_else(|| StrategyError::BadHex { index, text: field.to_string() })
}

/// Parse an unsigned hex address, with or without a `0x` prefix.
/// readelf prints `0x`-prefixed addresses, objdump prints bare hex.
fn parse_hex(text: &str) -> Option<u64> {
    let digits = text.strip_prefix("0x").or_else(|| text.strip_prefix("0X")).unwrap_or(text);
    u64::from_str_radix(digits, 16).ok()
}
