//! Build readiness pipeline for bookbind.
//!
//! Requested formats and flags flow through a fixed sequence of stages:
//!
//! ```text
//! BuildRequest → Classify formats ┐
//!                Classify flags   ┴→ Evaluate → (Blocked | Ready) → Probe → Resolve
//! ```
//!
//! Classification and evaluation are pure functions that can be unit-tested
//! independently. Only the probe stage touches the filesystem.

mod evaluator;
mod flags;
mod formats;
mod pipeline;
mod registry;
mod request;

pub use evaluator::{evaluate, BuildDecision, BuildPlan, PdfRoute};
pub use flags::{classify_flags, FlagStatus};
pub use formats::{classify_formats, ClassificationResult};
pub use pipeline::{run_pipeline, PipelineOutcome, ResolutionPath, Stage};
pub use registry::{flag_registry, BuildRules, Flag, FlagDef, Format};
pub use request::{BuildFlags, BuildRequest};

/// Signal from the project-mode detector.
///
/// Present only when the invocation happens inside a generated project.
/// The evaluator relaxes the required flags and substitutes default paths.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectSignal {
    /// Whether the effective build-server port passed validation.
    pub port_valid: bool,
    /// Effective port, if one could be determined.
    pub port: Option<u16>,
    /// Input path used when `--input` is absent.
    pub default_input: std::path::PathBuf,
    /// Output path used when `--output` is absent.
    pub default_output: std::path::PathBuf,
}
