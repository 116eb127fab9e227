use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Root configuration container.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub converter: ConverterConfig,
    #[serde(default)]
    pub renderer: RendererConfig,
    #[serde(default)]
    pub project: ProjectConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// External document converter.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConverterConfig {
    /// Executable to run (default: "pandoc").
    #[serde(default = "default_converter_program")]
    pub program: String,
    /// Extra arguments appended to every conversion.
    #[serde(default)]
    pub extra_args: Vec<String>,
}

/// Headless-browser renderer used for exact pdf output.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RendererConfig {
    /// Executable to run (default: "chromium").
    #[serde(default = "default_renderer_program")]
    pub program: String,
    /// Arguments placed before the print target.
    #[serde(default = "default_renderer_args")]
    pub extra_args: Vec<String>,
}

/// Project-mode settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProjectConfig {
    /// Server descriptor path, relative to the working directory.
    #[serde(default = "default_descriptor")]
    pub descriptor: PathBuf,
    /// Input used inside a project when `--input` is absent.
    #[serde(default = "default_input")]
    pub default_input: PathBuf,
    /// Output used inside a project when `--output` is absent.
    #[serde(default = "default_output")]
    pub default_output: PathBuf,
}

/// Logging settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Level filter when `BOOKBIND_LOG` is unset (default: "warn").
    #[serde(default = "default_log_level")]
    pub level: String,
}

fn default_converter_program() -> String {
    "pandoc".to_string()
}

fn default_renderer_program() -> String {
    "chromium".to_string()
}

fn default_renderer_args() -> Vec<String> {
    vec!["--headless".to_string(), "--disable-gpu".to_string()]
}

fn default_descriptor() -> PathBuf {
    PathBuf::from(".bookbind/server.json")
}

fn default_input() -> PathBuf {
    PathBuf::from("./src/index.tex")
}

fn default_output() -> PathBuf {
    PathBuf::from("./index.html")
}

fn default_log_level() -> String {
    "warn".to_string()
}

impl Default for ConverterConfig {
    fn default() -> Self {
        Self {
            program: default_converter_program(),
            extra_args: Vec::new(),
        }
    }
}

impl Default for RendererConfig {
    fn default() -> Self {
        Self {
            program: default_renderer_program(),
            extra_args: default_renderer_args(),
        }
    }
}

impl Default for ProjectConfig {
    fn default() -> Self {
        Self {
            descriptor: default_descriptor(),
            default_input: default_input(),
            default_output: default_output(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}
