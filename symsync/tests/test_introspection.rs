//! End-to-end introspection against fake inspection tools.
//!
//! Each test writes small shell scripts into a tempdir that stand in for
//! `file`, `readelf -l` and `objdump -h`, then points a `ToolchainConfig` at
//! them. This exercises the real subprocess runner and strategy fallback
//! without depending on the binutils installed on the test machine.

use std::fs;
use std::os::unix::fs::PermissionsExt;
use std::path::Path;
use symsync::domain::IntrospectError;
use symsync::introspection::{Strategy, ToolIntrospector, ToolchainConfig};

const READELF_L: &str = "\
Program Headers:
  Type           Offset             VirtAddr           PhysAddr
  PHDR           0x0000000000000040 0x0000000000000040 0x0000000000000040
  LOAD           0x0000000000000000 0x0000000000001000 0x0000000000001000
  LOAD           0x0000000000026000 0x0000000000027000 0x0000000000027000
";

const OBJDUMP_H: &str = "\
Sections:
Idx Name          Size      VMA               LMA               File off  Algn
  0 .interp       0000001c  0000000000000318  0000000000000318  00000318  2**0
  9 .text         0001a0c1  0000000000026000  0000000000026000  00028000  2**4
";

fn fake_tool(dir: &Path, name: &str, body: &str) -> String {
    let path = dir.join(name);
    fs::write(&path, format!("#!/bin/sh\n{body}\n")).unwrap();
    fs::set_permissions(&path, fs::Permissions::from_mode(0o755)).unwrap();
    path.to_string_lossy().into_owned()
}

fn fake_printer(dir: &Path, name: &str, listing: &str) -> String {
    fake_tool(dir, name, &format!("cat <<'LISTING'\n{listing}LISTING"))
}

fn config(file_cmd: String, phdrs_cmd: String, sections_cmd: String) -> ToolchainConfig {
    ToolchainConfig {
        file_cmd,
        phdrs_cmd,
        phdrs_args: vec![],
        sections_cmd,
        sections_args: vec![],
        ..ToolchainConfig::default()
    }
}

#[test]
fn primary_strategy_combines_segment_and_section() {
    let dir = tempfile::tempdir().unwrap();
    let cfg = config(
        fake_tool(dir.path(), "file", "exit 0"),
        fake_printer(dir.path(), "readelf", READELF_L),
        fake_printer(dir.path(), "objdump", OBJDUMP_H),
    );

    let introspector = ToolIntrospector::new(cfg);
    let resolved = introspector.load_offset("/lib/fake.so").unwrap();

    // .text VMA 0x26000 minus first LOAD VirtAddr 0x1000
    assert_eq!(resolved.offset, 0x25000);
    assert_eq!(resolved.strategy, Strategy::ProgramHeaders);
}

#[test]
fn register_address_adds_offset_to_base() {
    let dir = tempfile::tempdir().unwrap();
    let cfg = config(
        fake_tool(dir.path(), "file", "exit 0"),
        fake_printer(dir.path(), "readelf", READELF_L),
        fake_printer(dir.path(), "objdump", OBJDUMP_H),
    );

    use symsync::introspection::Introspector;
    let introspector = ToolIntrospector::new(cfg);
    let address = introspector.register_address("/lib/fake.so", 0x7f00_0000_0000).unwrap();
    assert_eq!(address, 0x7f00_0002_5000);
}

#[test]
fn fallback_uses_file_offset_when_phdrs_tool_fails() {
    let dir = tempfile::tempdir().unwrap();
    let cfg = config(
        fake_tool(dir.path(), "file", "exit 0"),
        fake_tool(dir.path(), "readelf", "exit 1"),
        fake_printer(dir.path(), "objdump", OBJDUMP_H),
    );

    let introspector = ToolIntrospector::new(cfg);
    let resolved = introspector.load_offset("/lib/fake.so").unwrap();

    // File off column of the .text line, taken directly
    assert_eq!(resolved.offset, 0x28000);
    assert_eq!(resolved.strategy, Strategy::SectionFileOffset);
}

#[test]
fn fallback_also_covers_primary_parse_failure() {
    let dir = tempfile::tempdir().unwrap();
    // Program-headers output with no load segment line at all
    let cfg = config(
        fake_tool(dir.path(), "file", "exit 0"),
        fake_printer(dir.path(), "readelf", "Program Headers:\n  PHDR 0x0 0x0 0x0\n"),
        fake_printer(dir.path(), "objdump", OBJDUMP_H),
    );

    let introspector = ToolIntrospector::new(cfg);
    let resolved = introspector.load_offset("/lib/fake.so").unwrap();
    assert_eq!(resolved.strategy, Strategy::SectionFileOffset);
}

#[test]
fn unidentifiable_module_is_unavailable() {
    let dir = tempfile::tempdir().unwrap();
    let cfg = config(
        fake_tool(dir.path(), "file", "exit 1"),
        fake_printer(dir.path(), "readelf", READELF_L),
        fake_printer(dir.path(), "objdump", OBJDUMP_H),
    );

    let introspector = ToolIntrospector::new(cfg);
    let err = introspector.load_offset("/lib/fake.so").unwrap_err();
    assert!(matches!(err, IntrospectError::Unavailable { .. }));
}

#[test]
fn both_strategies_failing_is_unresolvable() {
    let dir = tempfile::tempdir().unwrap();
    let cfg = config(
        fake_tool(dir.path(), "file", "exit 0"),
        fake_tool(dir.path(), "readelf", "exit 1"),
        fake_tool(dir.path(), "objdump", "exit 1"),
    );

    let introspector = ToolIntrospector::new(cfg);
    let err = introspector.load_offset("/lib/fake.so").unwrap_err();
    assert!(matches!(err, IntrospectError::OffsetUnresolvable { .. }));
}
