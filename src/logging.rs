use tracing_subscriber::EnvFilter;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt};

use crate::config::LoggingConfig;

/// Env var holding a filter directive that overrides the configured level.
pub const LOG_FILTER_ENV: &str = "BOOKBIND_LOG";
/// Env var holding a file path; logs go there instead of stderr.
pub const LOG_FILE_ENV: &str = "BOOKBIND_LOG_FILE";

/// Filter directive from the environment, `-v`, and config, in that order.
pub fn filter_directive(env: Option<String>, verbose: bool, config: &LoggingConfig) -> String {
    match env {
        Some(directive) if !directive.trim().is_empty() => directive,
        _ if verbose => "debug".to_string(),
        _ => config.level.clone(),
    }
}

/// Initialize tracing.
///
/// Logs go to stderr so stdout stays clean for `--json`. Set
/// `BOOKBIND_LOG_FILE` to log into a file instead; the file gets a unique
/// name, `{path}.{timestamp}.{pid}`, so concurrent builds never share one.
pub fn init_tracing(verbose: bool, config: &LoggingConfig) {
    let directive = filter_directive(std::env::var(LOG_FILTER_ENV).ok(), verbose, config);
    let filter = EnvFilter::try_new(&directive).unwrap_or_else(|_| EnvFilter::new("warn"));

    if let Ok(log_path) = std::env::var(LOG_FILE_ENV) {
        let pid = std::process::id();
        let timestamp = std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .map(|d| d.as_secs())
            .unwrap_or(0);
        let unique_path = format!("{}.{}.{}", log_path, timestamp, pid);

        match std::fs::File::create(&unique_path) {
            Ok(file) => {
                let file_layer = fmt::layer()
                    .with_writer(file)
                    .with_ansi(false)
                    .with_target(true)
                    .with_level(true);
                tracing_subscriber::registry()
                    .with(filter)
                    .with(file_layer)
                    .init();
                return;
            }
            Err(_) => eprintln!("Warning: Failed to create log file: {}", unique_path),
        }
    }

    let stderr_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(false)
        .without_time();

    tracing_subscriber::registry()
        .with(filter)
        .with(stderr_layer)
        .init();
}
