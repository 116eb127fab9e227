use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Context;
use clap::Parser;

use bookbind::args::{run_pipeline, BuildFlags, BuildRequest, BuildRules, PipelineOutcome};
use bookbind::config::{Config, LoggingConfig};
use bookbind::error::BuildError;
use bookbind::generate::{generate, CommandConverter, CommandRenderer};
use bookbind::logging::init_tracing;
use bookbind::project::detect_project;

/// Exit status for a refused build.
const EXIT_BLOCKED: u8 = 1;
/// Exit status for a build that failed at run time (config, descriptor,
/// or generation).
const EXIT_FAILED: u8 = 2;

#[derive(Parser, Debug)]
#[command(name = "bookbind", version, about = "Build html, pdf and epub from one source")]
struct Cli {
    /// Formats to build (html, pdf, epub). Empty means all of them.
    formats: Vec<String>,

    /// Source document to convert
    #[arg(short, long)]
    input: Option<PathBuf>,

    /// Output file or folder
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Overwrite existing output files
    #[arg(short, long)]
    force: bool,

    /// Plan the build without writing anything
    #[arg(long)]
    dry_run: bool,

    /// Build-server port used for exact pdf rendering
    #[arg(short, long, allow_negative_numbers = true)]
    port: Option<i64>,

    /// Print the final decision as JSON on stdout
    #[arg(long)]
    json: bool,

    /// Verbose logging
    #[arg(short, long)]
    verbose: bool,

    /// Config file (default: ~/.config/bookbind/config.toml)
    #[arg(long)]
    config: Option<PathBuf>,
}

impl Cli {
    fn request(&self) -> BuildRequest {
        BuildRequest::new(
            self.formats.clone(),
            BuildFlags {
                input: self.input.clone(),
                output: self.output.clone(),
                force: self.force,
                dry_run: self.dry_run,
                port: self.port,
            },
        )
    }
}

fn main() -> anyhow::Result<ExitCode> {
    let cli = Cli::parse();

    let loaded = match &cli.config {
        Some(path) => Config::load_from(path),
        None => Config::load(),
    };
    let config = match loaded {
        Ok(config) => config,
        Err(e) => {
            init_tracing(cli.verbose, &LoggingConfig::default());
            return Ok(failed(&BuildError::from(e)));
        }
    };

    init_tracing(cli.verbose, &config.logging);

    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .context("starting runtime")?;

    runtime.block_on(run(cli, config))
}

async fn run(cli: Cli, config: Config) -> anyhow::Result<ExitCode> {
    let cwd = std::env::current_dir().context("reading working directory")?;
    let request = cli.request();

    let project = match detect_project(&cwd, &config.project).await {
        Ok(context) => context.map(|context| context.signal(request.flags.port, &config.project)),
        Err(e) => return Ok(failed(&e)),
    };

    let outcome = run_pipeline(&request, &BuildRules::default(), project.as_ref()).await;

    for warning in outcome.warnings() {
        eprintln!("warning: {}", warning);
    }

    if cli.json {
        println!("{}", serde_json::to_string_pretty(&outcome)?);
    } else if outcome.should_continue() {
        println!("{}", outcome.message());
    }
    // A refused build explains itself on stderr, JSON or not.
    if !outcome.should_continue() {
        eprintln!("{}", outcome.message());
    }

    let PipelineOutcome::Resolved { plan, output, .. } = &outcome else {
        return Ok(ExitCode::from(EXIT_BLOCKED));
    };
    if !output.continue_build {
        return Ok(ExitCode::from(EXIT_BLOCKED));
    }

    let converter = CommandConverter::new(config.converter.clone());
    let renderer = CommandRenderer::new(config.renderer.clone());

    match generate(plan, output, &converter, &renderer).await {
        Ok(report) => {
            if !cli.json {
                for line in &report.planned {
                    println!("would {}", line);
                }
                for path in &report.written {
                    println!("wrote {}", path.display());
                }
            }
            Ok(ExitCode::SUCCESS)
        }
        Err(e) => Ok(failed(&e)),
    }
}

fn failed(error: &BuildError) -> ExitCode {
    tracing::error!(error_type = error.error_type(), "{}", error);
    eprintln!("error: {}", error);
    ExitCode::from(EXIT_FAILED)
}
