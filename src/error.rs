//! Error types for build readiness and generation.
//!
//! Readiness problems are not errors in the `Result` sense: they become a
//! blocked decision carrying a [`ReasonCode`]. [`BuildError`] covers failures
//! after a build was allowed to proceed.

use std::fmt;
use std::path::PathBuf;

use serde::Serialize;
use thiserror::Error;

use crate::args::Format;
use crate::config::ConfigError;

/// Broad category of a block reason.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    /// No arguments, or no usable formats.
    Argument,
    /// Required flags missing.
    Flag,
    /// Input or output path unusable.
    Path,
    /// Build-server port rejected.
    ServerMode,
}

/// Why a build was refused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ReasonCode {
    NoArgumentsAndNoFlags,
    MissingOneRequiredFlag,
    MissingAllRequiredFlags,
    NoValidFormats,
    InvalidServerPort,
    InvalidInputFile,
    InvalidOutputLocation,
    InvalidInputAndOutput,
}

impl ReasonCode {
    pub fn kind(&self) -> ErrorKind {
        match self {
            ReasonCode::NoArgumentsAndNoFlags | ReasonCode::NoValidFormats => ErrorKind::Argument,
            ReasonCode::MissingOneRequiredFlag | ReasonCode::MissingAllRequiredFlags => {
                ErrorKind::Flag
            }
            ReasonCode::InvalidServerPort => ErrorKind::ServerMode,
            ReasonCode::InvalidInputFile
            | ReasonCode::InvalidOutputLocation
            | ReasonCode::InvalidInputAndOutput => ErrorKind::Path,
        }
    }

    /// Stable identifier for logs and JSON output.
    pub fn as_str(&self) -> &'static str {
        match self {
            ReasonCode::NoArgumentsAndNoFlags => "no_arguments_and_no_flags",
            ReasonCode::MissingOneRequiredFlag => "missing_one_required_flag",
            ReasonCode::MissingAllRequiredFlags => "missing_all_required_flags",
            ReasonCode::NoValidFormats => "no_valid_formats",
            ReasonCode::InvalidServerPort => "invalid_server_port",
            ReasonCode::InvalidInputFile => "invalid_input_file",
            ReasonCode::InvalidOutputLocation => "invalid_output_location",
            ReasonCode::InvalidInputAndOutput => "invalid_input_and_output",
        }
    }
}

impl fmt::Display for ReasonCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Errors raised while generating output for a build that was allowed to run.
#[derive(Debug, Error)]
pub enum BuildError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Failed to start '{program}' for {format}: {source}")]
    Spawn {
        program: String,
        format: Format,
        #[source]
        source: std::io::Error,
    },

    #[error("'{program}' exited with status {status} while building {format}")]
    ToolFailed {
        program: String,
        format: Format,
        status: i32,
    },

    #[error("Failed to read server descriptor '{path}': {source}")]
    Descriptor {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl BuildError {
    /// Error type string for logs and JSON output.
    pub fn error_type(&self) -> &'static str {
        match self {
            BuildError::Config(_) => "config_error",
            BuildError::Spawn { .. } => "spawn_error",
            BuildError::ToolFailed { .. } => "tool_failed",
            BuildError::Descriptor { .. } => "descriptor_error",
        }
    }
}
