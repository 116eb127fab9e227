//! Build request — immutable snapshot of one invocation.

use std::path::PathBuf;

use serde::Serialize;

use crate::args::registry::Flag;

/// Flags supplied on the command line.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct BuildFlags {
    pub input: Option<PathBuf>,
    pub output: Option<PathBuf>,
    pub force: bool,
    pub dry_run: bool,
    /// Kept signed so out-of-range values reach port validation.
    pub port: Option<i64>,
}

impl BuildFlags {
    /// Flags that were actually supplied, in registry order.
    pub fn supplied(&self) -> Vec<Flag> {
        let mut supplied = Vec::new();
        if self.input.is_some() {
            supplied.push(Flag::Input);
        }
        if self.output.is_some() {
            supplied.push(Flag::Output);
        }
        if self.force {
            supplied.push(Flag::Force);
        }
        if self.dry_run {
            supplied.push(Flag::DryRun);
        }
        if self.port.is_some() {
            supplied.push(Flag::Port);
        }
        supplied
    }
}

/// One build invocation: requested format tokens plus flags.
///
/// Token order is kept for messages; classification only looks at membership.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct BuildRequest {
    pub argv: Vec<String>,
    pub flags: BuildFlags,
}

impl BuildRequest {
    pub fn new(argv: Vec<String>, flags: BuildFlags) -> Self {
        Self { argv, flags }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn supplied_lists_only_present_flags() {
        let flags = BuildFlags {
            output: Some(PathBuf::from("out")),
            dry_run: true,
            ..Default::default()
        };
        assert_eq!(flags.supplied(), vec![Flag::Output, Flag::DryRun]);
    }

    #[test]
    fn default_flags_supply_nothing() {
        assert!(BuildFlags::default().supplied().is_empty());
    }
}
