//! Headless-browser renderer for exact pdf output.

use std::path::PathBuf;

use async_trait::async_trait;

use crate::args::Format;
use crate::config::RendererConfig;
use crate::error::BuildError;

/// One render: a page (URL or html file) printed to a pdf file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderJob {
    pub source: String,
    pub target: PathBuf,
}

#[async_trait]
pub trait Renderer: Send + Sync {
    /// Returns the name of this renderer for logging.
    fn name(&self) -> &str;

    async fn render(&self, job: &RenderJob) -> Result<(), BuildError>;
}

/// Runs the configured browser in print-to-pdf mode.
pub struct CommandRenderer {
    config: RendererConfig,
}

impl CommandRenderer {
    pub fn new(config: RendererConfig) -> Self {
        Self { config }
    }

    pub fn args(&self, job: &RenderJob) -> Vec<String> {
        let mut args = self.config.extra_args.clone();
        args.push(format!("--print-to-pdf={}", job.target.display()));
        args.push(job.source.clone());
        args
    }
}

#[async_trait]
impl Renderer for CommandRenderer {
    fn name(&self) -> &str {
        &self.config.program
    }

    async fn render(&self, job: &RenderJob) -> Result<(), BuildError> {
        let args = self.args(job);
        tracing::debug!(program = %self.config.program, ?args, "running renderer");

        let status = tokio::process::Command::new(&self.config.program)
            .args(&args)
            .status()
            .await
            .map_err(|e| BuildError::Spawn {
                program: self.config.program.clone(),
                format: Format::Pdf,
                source: e,
            })?;

        if !status.success() {
            return Err(BuildError::ToolFailed {
                program: self.config.program.clone(),
                format: Format::Pdf,
                status: status.code().unwrap_or(-1),
            });
        }
        Ok(())
    }
}
