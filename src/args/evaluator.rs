//! Condition evaluator — classifier outputs → build decision.
//!
//! Rules are checked in order and the first terminal verdict wins. Warnings
//! are collected along the way and never stop evaluation.

use serde::Serialize;

use crate::args::flags::{classify_flags, FlagStatus};
use crate::args::formats::{classify_formats, ClassificationResult};
use crate::args::registry::{BuildRules, Format};
use crate::args::request::{BuildFlags, BuildRequest};
use crate::args::ProjectSignal;
use crate::error::ReasonCode;

/// How the pdf artifact is produced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PdfRoute {
    /// Converted directly like every other format.
    Converter,
    /// Rendered from the freshly built html.
    Renderer,
}

/// Everything the later stages need to carry out a build.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BuildPlan {
    /// Formats to build, in canonical order.
    pub normalized_formats: Vec<Format>,
    /// Flags with project defaults substituted.
    pub flags: BuildFlags,
    pub argv: Vec<String>,
    pub classification: ClassificationResult,
    pub pdf_route: PdfRoute,
    /// Build-server port, only in project mode.
    pub port: Option<u16>,
    pub in_project: bool,
}

/// Outcome of evaluating a request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum BuildDecision {
    Blocked {
        reason: ReasonCode,
        message: String,
        /// Offending tokens for `NoValidFormats`.
        unknown: Vec<String>,
    },
    Ready {
        message: String,
        plan: BuildPlan,
        warnings: Vec<String>,
    },
}

impl BuildDecision {
    pub fn message(&self) -> &str {
        match self {
            BuildDecision::Blocked { message, .. } | BuildDecision::Ready { message, .. } => message,
        }
    }

    pub fn is_ready(&self) -> bool {
        matches!(self, BuildDecision::Ready { .. })
    }

    pub fn reason(&self) -> Option<ReasonCode> {
        match self {
            BuildDecision::Blocked { reason, .. } => Some(*reason),
            BuildDecision::Ready { .. } => None,
        }
    }
}

/// Inputs shared by every rule.
struct Facts<'a> {
    request: &'a BuildRequest,
    rules: &'a BuildRules,
    formats: ClassificationResult,
    flags: FlagStatus,
    project: Option<&'a ProjectSignal>,
}

enum Verdict {
    Block(ReasonCode, String),
    Warn(String),
    Build(Vec<Format>),
}

type Rule = fn(&Facts<'_>) -> Option<Verdict>;

/// Priority list; order is policy.
const RULES: &[(&str, Rule)] = &[
    ("no_arguments_and_no_flags", no_arguments_and_no_flags),
    ("missing_one_required_flag", missing_one_required_flag),
    ("missing_all_required_flags", missing_all_required_flags),
    ("no_valid_formats", no_valid_formats),
    ("unknown_formats", unknown_formats),
    ("invalid_server_port", invalid_server_port),
    ("requested_formats", requested_formats),
    ("all_formats", all_formats),
];

/// Evaluate a request into exactly one decision.
pub fn evaluate(
    request: &BuildRequest,
    rules: &BuildRules,
    project: Option<&ProjectSignal>,
) -> BuildDecision {
    let supplied = request.flags.supplied();
    let facts = Facts {
        request,
        rules,
        formats: classify_formats(&request.argv, &supplied, rules),
        flags: classify_flags(&supplied, rules, project.is_some()),
        project,
    };

    let mut warnings = Vec::new();
    for (name, rule) in RULES {
        match rule(&facts) {
            None => continue,
            Some(Verdict::Warn(warning)) => {
                tracing::warn!(rule = *name, "{}", warning);
                warnings.push(warning);
            }
            Some(Verdict::Block(reason, message)) => {
                tracing::debug!(rule = *name, reason = %reason, "build blocked");
                let unknown = if reason == ReasonCode::NoValidFormats {
                    facts.formats.unknown.clone()
                } else {
                    Vec::new()
                };
                return BuildDecision::Blocked {
                    reason,
                    message,
                    unknown,
                };
            }
            Some(Verdict::Build(formats)) => {
                tracing::debug!(rule = *name, "build ready");
                return ready(facts, formats, warnings);
            }
        }
    }

    // Past rules 0 and 3, either argv is empty with some flag supplied or at
    // least one format was recognized, so one of the last two rules fires.
    unreachable!("request matched no build rule: {:?}", request)
}

fn ready(facts: Facts<'_>, formats: Vec<Format>, warnings: Vec<String>) -> BuildDecision {
    let (first, second) = facts.rules.pair;
    let pdf_route = if formats.contains(&first) && formats.contains(&second) {
        PdfRoute::Renderer
    } else {
        PdfRoute::Converter
    };

    let mut flags = facts.request.flags.clone();
    if let Some(project) = facts.project {
        if flags.input.is_none() {
            flags.input = Some(project.default_input.clone());
        }
        if flags.output.is_none() {
            flags.output = Some(project.default_output.clone());
        }
    }

    let message = format!("starting build: {}", join(&formats));
    BuildDecision::Ready {
        message,
        plan: BuildPlan {
            normalized_formats: formats,
            flags,
            argv: facts.request.argv.clone(),
            classification: facts.formats,
            pdf_route,
            port: facts.project.and_then(|project| project.port),
            in_project: facts.project.is_some(),
        },
        warnings,
    }
}

fn no_arguments_and_no_flags(facts: &Facts<'_>) -> Option<Verdict> {
    (facts.request.argv.is_empty() && facts.request.flags.supplied().is_empty()).then(|| {
        Verdict::Block(
            ReasonCode::NoArgumentsAndNoFlags,
            format!(
                "no arguments and no flags given; request formats ({}) with {}",
                join(&facts.rules.formats),
                required_labels(facts),
            ),
        )
    })
}

fn missing_one_required_flag(facts: &Facts<'_>) -> Option<Verdict> {
    if facts.project.is_some() || !facts.flags.some_required {
        return None;
    }
    let supplied = facts.request.flags.supplied();
    let missing: Vec<String> = facts
        .rules
        .required_flags()
        .filter(|def| !supplied.contains(&def.flag))
        .map(|def| def.usage())
        .collect();
    Some(Verdict::Block(
        ReasonCode::MissingOneRequiredFlag,
        format!("missing required flag: {}", missing.join("; ")),
    ))
}

fn missing_all_required_flags(facts: &Facts<'_>) -> Option<Verdict> {
    if facts.project.is_some() || facts.flags.all_required {
        return None;
    }
    Some(Verdict::Block(
        ReasonCode::MissingAllRequiredFlags,
        format!(
            "missing required flags: {}",
            facts
                .rules
                .required_flags()
                .map(|def| def.usage())
                .collect::<Vec<_>>()
                .join("; ")
        ),
    ))
}

fn no_valid_formats(facts: &Facts<'_>) -> Option<Verdict> {
    if facts.formats.empty_args_with_flags || !facts.formats.no_valid_formats {
        return None;
    }
    Some(Verdict::Block(
        ReasonCode::NoValidFormats,
        format!(
            "no valid formats: {} (accepted: {})",
            facts.formats.unknown.join(", "),
            join(&facts.rules.formats),
        ),
    ))
}

fn unknown_formats(facts: &Facts<'_>) -> Option<Verdict> {
    if facts.formats.unknown.is_empty() || facts.formats.recognized.is_empty() {
        return None;
    }
    Some(Verdict::Warn(format!(
        "ignoring unknown formats: {}",
        facts.formats.unknown.join(", ")
    )))
}

fn invalid_server_port(facts: &Facts<'_>) -> Option<Verdict> {
    let project = facts.project?;
    if project.port_valid {
        return None;
    }
    let message = match facts.request.flags.port {
        Some(port) => format!("invalid build-server port: {} (expected 1-65535)", port),
        None => "invalid build-server port: the project descriptor has no usable port".to_string(),
    };
    Some(Verdict::Block(ReasonCode::InvalidServerPort, message))
}

fn requested_formats(facts: &Facts<'_>) -> Option<Verdict> {
    let formats = &facts.formats;
    let any = formats.single_format
        || formats.pair_plus_extra
        || formats.exact_pair_match
        || formats.multiple_unordered;
    any.then(|| Verdict::Build(formats.recognized.iter().copied().collect()))
}

fn all_formats(facts: &Facts<'_>) -> Option<Verdict> {
    facts
        .formats
        .empty_args_with_flags
        .then(|| Verdict::Build(facts.rules.formats.clone()))
}

fn required_labels(facts: &Facts<'_>) -> String {
    facts
        .rules
        .required_flags()
        .map(|def| def.label())
        .collect::<Vec<_>>()
        .join(", ")
}

fn join(formats: &[Format]) -> String {
    formats
        .iter()
        .map(Format::as_str)
        .collect::<Vec<_>>()
        .join(", ")
}
