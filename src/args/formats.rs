//! Format classifier — requested tokens → recognized/unknown partition.

use std::collections::BTreeSet;

use serde::Serialize;

use crate::args::registry::{BuildRules, Flag, Format};

/// Result of classifying requested format tokens.
///
/// At most one of `single_format`, `exact_pair_match`, `pair_plus_extra` and
/// `multiple_unordered` holds, and exactly one holds whenever `recognized` is
/// non-empty.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ClassificationResult {
    /// Accepted formats that were requested, in canonical order.
    pub recognized: BTreeSet<Format>,
    /// Tokens outside the accepted set, deduplicated, in request order.
    pub unknown: Vec<String>,
    pub no_valid_formats: bool,
    pub exact_pair_match: bool,
    pub pair_plus_extra: bool,
    pub single_format: bool,
    pub multiple_unordered: bool,
    /// No tokens at all, but at least one flag: build everything.
    pub empty_args_with_flags: bool,
}

impl ClassificationResult {
    /// Whether the designated pair is fully requested (alone or with extras).
    pub fn has_pair(&self) -> bool {
        self.exact_pair_match || self.pair_plus_extra
    }
}

/// Classify requested tokens against the accepted formats.
///
/// Only set membership and cardinality matter; duplicates count once.
pub fn classify_formats(
    argv: &[String],
    supplied: &[Flag],
    rules: &BuildRules,
) -> ClassificationResult {
    let mut recognized = BTreeSet::new();
    let mut unknown: Vec<String> = Vec::new();

    for token in argv {
        match rules.accepts(token) {
            Some(format) => {
                recognized.insert(format);
            }
            None => {
                if !unknown.contains(token) {
                    unknown.push(token.clone());
                }
            }
        }
    }

    let (first, second) = rules.pair;
    let pair_present = recognized.contains(&first) && recognized.contains(&second);
    let count = recognized.len();

    // Exact means the pair and nothing else, so an unknown token breaks it.
    let exact_pair_match = pair_present && count == 2 && unknown.is_empty();
    let pair_plus_extra = pair_present && count > 2;
    let single_format = count == 1;
    let multiple_unordered = count >= 2 && !exact_pair_match && !pair_plus_extra;

    ClassificationResult {
        no_valid_formats: !argv.is_empty() && recognized.is_empty(),
        empty_args_with_flags: argv.is_empty() && !supplied.is_empty(),
        recognized,
        unknown,
        exact_pair_match,
        pair_plus_extra,
        single_format,
        multiple_unordered,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tokens(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    fn classify(items: &[&str]) -> ClassificationResult {
        classify_formats(&tokens(items), &[Flag::Input], &BuildRules::default())
    }

    #[test]
    fn pair_in_either_order_is_exact() {
        for argv in [["html", "pdf"], ["pdf", "html"]] {
            let result = classify(&argv);
            assert!(result.exact_pair_match);
            assert!(!result.pair_plus_extra);
            assert!(!result.multiple_unordered);
            assert!(!result.single_format);
        }
    }

    #[test]
    fn pair_with_third_format_is_plus_extra() {
        let result = classify(&["epub", "pdf", "html"]);
        assert!(result.pair_plus_extra);
        assert!(!result.exact_pair_match);
        assert!(result.has_pair());
    }

    #[test]
    fn two_formats_without_pair_are_unordered() {
        let result = classify(&["epub", "pdf"]);
        assert!(result.multiple_unordered);
        assert!(!result.has_pair());
    }

    #[test]
    fn unknown_tokens_are_deduplicated_in_order() {
        let result = classify(&["zip", "pdf", "docx", "zip"]);
        assert_eq!(result.unknown, tokens(&["zip", "docx"]));
        assert!(result.single_format);
        assert!(!result.no_valid_formats);
    }

    #[test]
    fn only_unknown_tokens_means_no_valid_formats() {
        let result = classify(&["docx", "odt"]);
        assert!(result.no_valid_formats);
        assert!(result.recognized.is_empty());
    }

    #[test]
    fn unknown_token_breaks_exact_pair() {
        let result = classify(&["html", "bogus", "pdf"]);
        assert!(!result.exact_pair_match);
        assert!(!result.pair_plus_extra);
        assert!(result.multiple_unordered);
        assert!(!result.has_pair());
    }

    #[test]
    fn single_format_with_unknown_token_stays_single() {
        let result = classify(&["pdf", "bogus"]);
        assert!(result.single_format);
        assert!(!result.multiple_unordered);
        assert_eq!(result.unknown, vec!["bogus".to_string()]);
    }

    #[test]
    fn duplicates_count_once() {
        let result = classify(&["pdf", "pdf"]);
        assert!(result.single_format);
        assert!(!result.multiple_unordered);
    }

    #[test]
    fn empty_args_need_a_flag_to_build_everything() {
        let rules = BuildRules::default();
        assert!(classify_formats(&[], &[Flag::DryRun], &rules).empty_args_with_flags);
        assert!(!classify_formats(&[], &[], &rules).empty_args_with_flags);
        assert!(!classify_formats(&[], &[], &rules).no_valid_formats);
    }

    #[test]
    fn classification_is_idempotent() {
        let argv = tokens(&["pdf", "bogus", "html"]);
        let rules = BuildRules::default();
        let first = classify_formats(&argv, &[Flag::Output], &rules);
        let second = classify_formats(&argv, &[Flag::Output], &rules);
        assert_eq!(first, second);
    }
}
