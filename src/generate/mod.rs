//! Generation step — a resolved build → converter and renderer runs.

mod converter;
mod renderer;

use std::path::PathBuf;

use crate::args::{BuildPlan, Format, PdfRoute};
use crate::error::BuildError;
use crate::probe::ResolvedOutput;

pub use converter::{with_format, CommandConverter, ConvertJob, ConvertStatus, Converter};
pub use renderer::{CommandRenderer, RenderJob, Renderer};

/// A single unit of generation work.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Job {
    Convert(ConvertJob),
    Render(RenderJob),
}

impl Job {
    pub fn target(&self) -> PathBuf {
        match self {
            Job::Convert(job) => job.target(),
            Job::Render(job) => job.target.clone(),
        }
    }

    pub fn describe(&self) -> String {
        match self {
            Job::Convert(job) => format!(
                "convert {} -> {}",
                job.input.display(),
                job.target().display()
            ),
            Job::Render(job) => format!("render {} -> {}", job.source, job.target.display()),
        }
    }
}

/// Jobs to run plus targets left alone.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct JobList {
    pub jobs: Vec<Job>,
    pub skipped: Vec<PathBuf>,
}

/// What a generation run did.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GenerationReport {
    pub written: Vec<PathBuf>,
    pub skipped: Vec<PathBuf>,
    /// Filled instead of `written` on a dry run.
    pub planned: Vec<String>,
}

fn format_options(format: Format) -> Vec<String> {
    match format {
        Format::Html => vec!["--standalone".to_string()],
        Format::Pdf | Format::Epub => Vec::new(),
    }
}

/// Turn a plan and its resolved output into ordered jobs.
///
/// Existing targets are skipped unless `--force` was given. With the pdf
/// rendered from html, html always precedes the render.
pub fn plan_jobs(plan: &BuildPlan, output: &ResolvedOutput) -> JobList {
    let force = plan.flags.force;
    let input = plan.flags.input.clone().unwrap_or_default();
    let base = output.output_base();
    let mut list = JobList::default();

    for format in &plan.normalized_formats {
        let format = *format;
        let target = with_format(&base, format);
        let exists = output
            .file_output_existence
            .get(&format)
            .copied()
            .unwrap_or(false);
        if exists && !force {
            list.skipped.push(target);
            continue;
        }

        let job = match (format, plan.pdf_route) {
            (Format::Pdf, PdfRoute::Renderer) => {
                let source = match plan.port {
                    Some(port) if plan.in_project => format!(
                        "http://localhost:{}/{}.html",
                        port, output.output_file_name
                    ),
                    _ => with_format(&base, Format::Html).display().to_string(),
                };
                Job::Render(RenderJob { source, target })
            }
            _ => Job::Convert(ConvertJob {
                input: input.clone(),
                output_base: base.clone(),
                format,
                extra_options: format_options(format),
                force_overwrite: force,
            }),
        };
        list.jobs.push(job);
    }

    list
}

/// Run the generation step for a build that resolved with `continue = true`.
pub async fn generate(
    plan: &BuildPlan,
    output: &ResolvedOutput,
    converter: &dyn Converter,
    renderer: &dyn Renderer,
) -> Result<GenerationReport, BuildError> {
    let list = plan_jobs(plan, output);
    let mut report = GenerationReport {
        skipped: list.skipped,
        ..Default::default()
    };

    for target in &report.skipped {
        tracing::warn!(target = %target.display(), "skipping existing output");
    }

    if plan.flags.dry_run {
        report.planned = list.jobs.iter().map(Job::describe).collect();
        tracing::info!(jobs = report.planned.len(), "dry run, nothing written");
        return Ok(report);
    }

    for job in &list.jobs {
        tracing::info!("{}", job.describe());
        match job {
            Job::Convert(convert) => match converter.convert(convert).await? {
                ConvertStatus::Written(path) => report.written.push(path),
                ConvertStatus::Skipped(path) => report.skipped.push(path),
            },
            Job::Render(render) => {
                renderer.render(render).await?;
                report.written.push(job.target());
            }
        }
    }

    tracing::debug!(
        converter = converter.name(),
        renderer = renderer.name(),
        written = report.written.len(),
        "generation finished"
    );
    Ok(report)
}
