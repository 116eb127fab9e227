//! Project-mode detection.
//!
//! A generated project carries a server descriptor (JSON with the port of its
//! build server). Finding one means the invocation happens inside a project.

use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::args::ProjectSignal;
use crate::config::ProjectConfig;
use crate::error::BuildError;

#[derive(Debug, Deserialize)]
struct ServerDescriptor {
    port: Option<i64>,
}

/// A discovered project.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectContext {
    /// Path of the descriptor that was found.
    pub descriptor: PathBuf,
    /// Port from the descriptor; `None` when missing or unparsable.
    pub port: Option<i64>,
}

impl ProjectContext {
    /// Build the evaluator signal, letting `--port` override the descriptor.
    pub fn signal(&self, flag_port: Option<i64>, config: &ProjectConfig) -> ProjectSignal {
        let port = flag_port.or(self.port).and_then(validate_port);
        ProjectSignal {
            port_valid: port.is_some(),
            port,
            default_input: config.default_input.clone(),
            default_output: config.default_output.clone(),
        }
    }
}

/// A port is usable when it fits the TCP range and is not zero.
pub fn validate_port(port: i64) -> Option<u16> {
    u16::try_from(port).ok().filter(|port| *port != 0)
}

/// Look for the server descriptor under `root`.
///
/// Returns `Ok(None)` outside a project. A descriptor that exists but cannot
/// be parsed still marks project mode, just without a port.
pub async fn detect_project(
    root: &Path,
    config: &ProjectConfig,
) -> Result<Option<ProjectContext>, BuildError> {
    let descriptor = root.join(&config.descriptor);

    let content = match tokio::fs::read_to_string(&descriptor).await {
        Ok(content) => content,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            tracing::debug!(path = %descriptor.display(), "no server descriptor");
            return Ok(None);
        }
        Err(e) => {
            return Err(BuildError::Descriptor {
                path: descriptor,
                source: e,
            })
        }
    };

    let port = match serde_json::from_str::<ServerDescriptor>(&content) {
        Ok(parsed) => parsed.port,
        Err(e) => {
            tracing::warn!(path = %descriptor.display(), error = %e, "unparsable server descriptor");
            None
        }
    };

    tracing::debug!(path = %descriptor.display(), ?port, "project mode");
    Ok(Some(ProjectContext { descriptor, port }))
}
