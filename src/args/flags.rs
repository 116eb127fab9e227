//! Flag classifier — supplied flags → required-flag coverage.

use crate::args::registry::{BuildRules, Flag};

/// How many of the required flags were supplied.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FlagStatus {
    pub none_required: bool,
    pub some_required: bool,
    pub all_required: bool,
}

/// Classify supplied flags against the required set.
///
/// Inside a generated project the defaults fill in input and output later,
/// so coverage is reported as complete regardless of what was supplied.
pub fn classify_flags(supplied: &[Flag], rules: &BuildRules, in_project: bool) -> FlagStatus {
    if in_project {
        return FlagStatus {
            none_required: false,
            some_required: false,
            all_required: true,
        };
    }

    let required = rules.required_flags().count();
    let present = rules
        .required_flags()
        .filter(|def| supplied.contains(&def.flag))
        .count();

    FlagStatus {
        none_required: present == 0,
        some_required: present > 0 && present < required,
        all_required: present == required,
    }
}
