//! External document converter.

use std::path::{Path, PathBuf};

use async_trait::async_trait;

use crate::args::Format;
use crate::config::ConverterConfig;
use crate::error::BuildError;

/// One conversion handed to the converter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConvertJob {
    pub input: PathBuf,
    /// Target path without extension; the format supplies it.
    pub output_base: PathBuf,
    pub format: Format,
    /// Format-specific options placed before configured extras.
    pub extra_options: Vec<String>,
    pub force_overwrite: bool,
}

impl ConvertJob {
    pub fn target(&self) -> PathBuf {
        with_format(&self.output_base, self.format)
    }
}

/// `base` plus `.{format}`, keeping any dots already in the name.
pub fn with_format(base: &Path, format: Format) -> PathBuf {
    let mut target = base.as_os_str().to_owned();
    target.push(".");
    target.push(format.as_str());
    PathBuf::from(target)
}

/// What a converter did with a job.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConvertStatus {
    Written(PathBuf),
    /// Target appeared after probing and overwrite was not forced.
    Skipped(PathBuf),
}

/// Anything that turns a source document into one output format.
#[async_trait]
pub trait Converter: Send + Sync {
    /// Returns the name of this converter for logging.
    fn name(&self) -> &str;

    async fn convert(&self, job: &ConvertJob) -> Result<ConvertStatus, BuildError>;
}

/// Runs the configured converter program as a child process.
pub struct CommandConverter {
    config: ConverterConfig,
}

impl CommandConverter {
    pub fn new(config: ConverterConfig) -> Self {
        Self { config }
    }

    /// Full argument list for a job.
    pub fn args(&self, job: &ConvertJob) -> Vec<String> {
        let mut args = vec![
            job.input.display().to_string(),
            "-o".to_string(),
            job.target().display().to_string(),
        ];
        args.extend(job.extra_options.iter().cloned());
        args.extend(self.config.extra_args.iter().cloned());
        args
    }
}

#[async_trait]
impl Converter for CommandConverter {
    fn name(&self) -> &str {
        &self.config.program
    }

    async fn convert(&self, job: &ConvertJob) -> Result<ConvertStatus, BuildError> {
        let target = job.target();
        if !job.force_overwrite && tokio::fs::metadata(&target).await.is_ok() {
            tracing::warn!(target = %target.display(), "target appeared after probing, skipping");
            return Ok(ConvertStatus::Skipped(target));
        }

        let args = self.args(job);
        tracing::debug!(program = %self.config.program, ?args, "running converter");

        let status = tokio::process::Command::new(&self.config.program)
            .args(&args)
            .status()
            .await
            .map_err(|e| BuildError::Spawn {
                program: self.config.program.clone(),
                format: job.format,
                source: e,
            })?;

        if !status.success() {
            return Err(BuildError::ToolFailed {
                program: self.config.program.clone(),
                format: job.format,
                status: status.code().unwrap_or(-1),
            });
        }

        Ok(ConvertStatus::Written(target))
    }
}
