//! Core domain newtypes
//!
//! Raw integers travel a long way through this crate (process IDs, mapped
//! addresses). Wrapping the process ID in a newtype keeps signatures
//! self-documenting and stops PIDs from being mixed up with addresses.

use std::fmt;

/// Process identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Pid(pub i32);

impl fmt::Display for Pid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "PID:{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pid_display() {
        assert_eq!(Pid(1234).to_string(), "PID:1234");
    }
}
