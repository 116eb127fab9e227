//! Integration tests for classification and evaluation.

mod common;

use std::path::PathBuf;

use bookbind::args::{
    classify_flags, classify_formats, evaluate, BuildDecision, BuildFlags, BuildRequest,
    BuildRules, Flag, Format, PdfRoute, ProjectSignal,
};
use bookbind::error::{ErrorKind, ReasonCode};
use common::raw_args;

fn valid_flags() -> BuildFlags {
    BuildFlags {
        input: Some(PathBuf::from("src/book.tex")),
        output: Some(PathBuf::from("dist")),
        ..Default::default()
    }
}

fn decide(argv: Vec<&str>, flags: BuildFlags) -> BuildDecision {
    evaluate(
        &BuildRequest::new(raw_args(argv), flags),
        &BuildRules::default(),
        None,
    )
}

// =============================================================================
// FORMAT CLASSIFIER TESTS
// =============================================================================

#[test]
fn exactly_one_shape_for_every_format_combination() {
    let rules = BuildRules::default();
    let all = ["html", "pdf", "epub"];

    for mask in 1u8..8 {
        let mut argv: Vec<&str> = all
            .iter()
            .enumerate()
            .filter(|(i, _)| mask & (1 << *i) != 0)
            .map(|(_, token)| *token)
            .collect();

        // Order must never matter, and an unknown token never hides a shape.
        for with_unknown in [false, true] {
            if with_unknown {
                argv.push("bogus");
            }
            for _ in 0..argv.len() {
                let result = classify_formats(&raw_args(argv.clone()), &[Flag::Input], &rules);
                let shapes = [
                    result.single_format,
                    result.exact_pair_match,
                    result.pair_plus_extra,
                    result.multiple_unordered,
                ];
                assert_eq!(
                    shapes.iter().filter(|s| **s).count(),
                    1,
                    "argv {:?} gave {:?}",
                    argv,
                    shapes
                );
                argv.rotate_left(1);
            }
        }
    }
}

#[test]
fn pair_shapes() {
    let rules = BuildRules::default();
    let exact = classify_formats(&raw_args(vec!["pdf", "html"]), &[], &rules);
    assert!(exact.exact_pair_match);
    assert!(!exact.pair_plus_extra);
    assert!(!exact.multiple_unordered);

    let extra = classify_formats(&raw_args(vec!["html", "epub", "pdf"]), &[], &rules);
    assert!(extra.pair_plus_extra);
    assert!(!extra.exact_pair_match);

    // "Exact" means the pair and nothing else.
    let with_unknown = classify_formats(&raw_args(vec!["html", "bogus", "pdf"]), &[], &rules);
    assert!(!with_unknown.exact_pair_match);
    assert!(!with_unknown.pair_plus_extra);
    assert!(with_unknown.multiple_unordered);
}

#[test]
fn pair_with_unknown_token_still_renders_pdf_from_html() {
    let decision = decide(vec!["html", "bogus", "pdf"], valid_flags());
    let BuildDecision::Ready { plan, warnings, .. } = decision else {
        panic!("expected ready");
    };
    assert_eq!(plan.normalized_formats, vec![Format::Html, Format::Pdf]);
    assert_eq!(plan.pdf_route, PdfRoute::Renderer);
    assert!(plan.classification.multiple_unordered);
    assert_eq!(warnings.len(), 1);
}

#[test]
fn recognized_set_is_canonical() {
    let result = classify_formats(
        &raw_args(vec!["epub", "html"]),
        &[],
        &BuildRules::default(),
    );
    let recognized: Vec<Format> = result.recognized.into_iter().collect();
    assert_eq!(recognized, vec![Format::Html, Format::Epub]);
}

// =============================================================================
// FLAG CLASSIFIER TESTS
// =============================================================================

#[test]
fn flag_coverage_levels() {
    let rules = BuildRules::default();
    assert!(classify_flags(&[], &rules, false).none_required);
    assert!(classify_flags(&[Flag::Input], &rules, false).some_required);
    assert!(classify_flags(&[Flag::Input, Flag::Output], &rules, false).all_required);
    assert!(classify_flags(&[Flag::Port], &rules, true).all_required);
}

// =============================================================================
// EVALUATOR TESTS
// =============================================================================

#[test]
fn nothing_at_all_is_blocked() {
    let decision = decide(vec![], BuildFlags::default());
    assert_eq!(decision.reason(), Some(ReasonCode::NoArgumentsAndNoFlags));
    assert!(decision.message().contains("no arguments and no flags"));
    assert_eq!(ReasonCode::NoArgumentsAndNoFlags.kind(), ErrorKind::Argument);
}

#[test]
fn only_unknown_tokens_list_exactly_those_tokens() {
    let decision = decide(vec!["docx", "odt", "docx"], valid_flags());
    match decision {
        BuildDecision::Blocked {
            reason,
            message,
            unknown,
        } => {
            assert_eq!(reason, ReasonCode::NoValidFormats);
            assert_eq!(unknown, raw_args(vec!["docx", "odt"]));
            assert!(message.contains("docx, odt"));
        }
        other => panic!("expected blocked, got {:?}", other),
    }
}

#[test]
fn unknown_token_warns_and_builds_the_rest() {
    let decision = decide(vec!["pdf", "bogus"], valid_flags());
    let BuildDecision::Ready { plan, warnings, .. } = decision else {
        panic!("expected ready");
    };
    assert_eq!(plan.normalized_formats, vec![Format::Pdf]);
    assert_eq!(warnings.len(), 1);
    assert!(warnings[0].contains("bogus"));
}

#[test]
fn missing_output_only() {
    let flags = BuildFlags {
        input: Some(PathBuf::from("src/book.tex")),
        ..Default::default()
    };
    let decision = decide(vec!["html"], flags);
    assert_eq!(decision.reason(), Some(ReasonCode::MissingOneRequiredFlag));
    assert!(decision.message().contains("--output"));
    assert!(!decision.message().contains("--input"));
}

#[test]
fn dry_run_alone_builds_nothing() {
    let flags = BuildFlags {
        dry_run: true,
        ..Default::default()
    };
    let decision = decide(vec![], flags);
    assert_eq!(decision.reason(), Some(ReasonCode::MissingAllRequiredFlags));
}

#[test]
fn empty_argv_with_flags_builds_everything() {
    let decision = decide(vec![], valid_flags());
    let BuildDecision::Ready { plan, message, .. } = decision else {
        panic!("expected ready");
    };
    assert_eq!(
        plan.normalized_formats,
        vec![Format::Html, Format::Pdf, Format::Epub]
    );
    assert_eq!(message, "starting build: html, pdf, epub");
}

#[test]
fn project_mode_needs_no_paths() {
    let signal = ProjectSignal {
        port_valid: true,
        port: Some(3000),
        default_input: PathBuf::from("./src/index.tex"),
        default_output: PathBuf::from("./index.html"),
    };
    let decision = evaluate(
        &BuildRequest::new(raw_args(vec!["html", "pdf"]), BuildFlags::default()),
        &BuildRules::default(),
        Some(&signal),
    );
    assert!(decision.is_ready());
}

#[test]
fn project_mode_bad_port_blocks() {
    let signal = ProjectSignal {
        port_valid: false,
        port: None,
        default_input: PathBuf::from("./src/index.tex"),
        default_output: PathBuf::from("./index.html"),
    };
    let decision = evaluate(
        &BuildRequest::new(raw_args(vec!["pdf"]), BuildFlags::default()),
        &BuildRules::default(),
        Some(&signal),
    );
    assert_eq!(decision.reason(), Some(ReasonCode::InvalidServerPort));
    assert_eq!(ReasonCode::InvalidServerPort.kind(), ErrorKind::ServerMode);
}
