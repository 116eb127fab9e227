//! Configuration for bookbind.
//!
//! Loaded once from `~/.config/bookbind/config.toml`; a missing file means
//! defaults everywhere.

mod loader;
mod types;

pub use loader::ConfigError;
pub use types::{Config, ConverterConfig, LoggingConfig, ProjectConfig, RendererConfig};
