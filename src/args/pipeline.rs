//! Pipeline — ties evaluation, probing and resolution together.
//!
//! ```text
//! Start → Evaluating → Blocked
//!                    → Probing → Resolved
//! ```
//!
//! `Blocked` short-circuits: nothing touches the disk. Probe failures never
//! re-drive the machine; they already collapsed to "does not exist".

use serde::Serialize;
use tracing::Instrument;

use crate::args::evaluator::{evaluate, BuildDecision, BuildPlan};
use crate::args::registry::BuildRules;
use crate::args::request::BuildRequest;
use crate::args::ProjectSignal;
use crate::probe::{probe, probe_paths, resolve, ProbeTargets, ResolvedOutput};

/// Driver state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Start,
    Evaluating,
    Blocked,
    Probing,
    Resolved,
}

/// Which of the two equivalent resolution paths runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResolutionPath {
    /// Path probes plus per-format existence, for overwrite warnings.
    WithExistence,
    /// Path probes only; the existence map stays empty.
    DecisionOnly,
}

impl ResolutionPath {
    /// Existence only feeds overwrite warnings, which `--force` makes moot.
    pub fn for_plan(plan: &BuildPlan) -> Self {
        if plan.flags.force {
            ResolutionPath::DecisionOnly
        } else {
            ResolutionPath::WithExistence
        }
    }
}

/// Terminal result of one pipeline run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "stage", rename_all = "snake_case")]
pub enum PipelineOutcome {
    Blocked {
        decision: BuildDecision,
    },
    Resolved {
        plan: BuildPlan,
        warnings: Vec<String>,
        output: ResolvedOutput,
    },
}

impl PipelineOutcome {
    pub fn message(&self) -> &str {
        match self {
            PipelineOutcome::Blocked { decision } => decision.message(),
            PipelineOutcome::Resolved { output, .. } => &output.message,
        }
    }

    /// Whether generation may proceed.
    pub fn should_continue(&self) -> bool {
        match self {
            PipelineOutcome::Blocked { .. } => false,
            PipelineOutcome::Resolved { output, .. } => output.continue_build,
        }
    }

    pub fn warnings(&self) -> &[String] {
        match self {
            PipelineOutcome::Blocked { .. } => &[],
            PipelineOutcome::Resolved { warnings, .. } => warnings,
        }
    }
}

fn enter(stage: Stage) {
    tracing::debug!(?stage, "pipeline stage");
}

/// Run a request through the whole pipeline, emitting exactly one outcome.
pub async fn run_pipeline(
    request: &BuildRequest,
    rules: &BuildRules,
    project: Option<&ProjectSignal>,
) -> PipelineOutcome {
    let span = tracing::info_span!("build", id = %uuid::Uuid::new_v4());
    drive(request, rules, project).instrument(span).await
}

async fn drive(
    request: &BuildRequest,
    rules: &BuildRules,
    project: Option<&ProjectSignal>,
) -> PipelineOutcome {
    enter(Stage::Start);

    enter(Stage::Evaluating);
    let (plan, mut warnings) = match evaluate(request, rules, project) {
        decision @ BuildDecision::Blocked { .. } => {
            enter(Stage::Blocked);
            return PipelineOutcome::Blocked { decision };
        }
        BuildDecision::Ready {
            message,
            plan,
            warnings,
        } => {
            tracing::info!("{}", message);
            (plan, warnings)
        }
    };

    enter(Stage::Probing);
    let targets = ProbeTargets::from_flags(&plan.flags);
    let formats = &plan.normalized_formats;
    let output = match ResolutionPath::for_plan(&plan) {
        ResolutionPath::WithExistence => {
            let result = probe(&targets, formats).await;
            resolve(formats, &targets, &result.paths, Some(&result.per_format_exists))
        }
        ResolutionPath::DecisionOnly => {
            let paths = probe_paths(&targets).await;
            resolve(formats, &targets, &paths, None)
        }
    };

    for format in output.existing_outputs() {
        let warning = format!(
            "{} already exists and will not be overwritten without --force",
            targets.target_in(&output.output_folder, format).display()
        );
        tracing::warn!("{}", warning);
        warnings.push(warning);
    }

    enter(Stage::Resolved);
    tracing::info!(
        continue_build = output.continue_build,
        truncate = output.truncate_output,
        "{}",
        output.message
    );
    PipelineOutcome::Resolved {
        plan,
        warnings,
        output,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::args::BuildFlags;
    use std::path::PathBuf;

    #[test]
    fn force_skips_existence() {
        let decision = evaluate(
            &BuildRequest::new(
                vec!["pdf".to_string()],
                BuildFlags {
                    input: Some(PathBuf::from("a.tex")),
                    output: Some(PathBuf::from("b")),
                    force: true,
                    ..Default::default()
                },
            ),
            &BuildRules::default(),
            None,
        );
        let BuildDecision::Ready { plan, .. } = decision else {
            panic!("expected ready");
        };
        assert_eq!(ResolutionPath::for_plan(&plan), ResolutionPath::DecisionOnly);
    }

    #[tokio::test]
    async fn blocked_never_probes() {
        let outcome = run_pipeline(&BuildRequest::default(), &BuildRules::default(), None).await;
        assert!(matches!(outcome, PipelineOutcome::Blocked { .. }));
        assert!(!outcome.should_continue());
        assert!(outcome.warnings().is_empty());
    }
}
