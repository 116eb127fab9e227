//! Output resolver — probe outcomes → final output location.

use std::collections::BTreeMap;
use std::path::PathBuf;

use serde::Serialize;

use crate::args::Format;
use crate::error::ReasonCode;
use crate::probe::{FormatExistence, PathProbe, ProbeTargets};

/// Where generated files land, and whether the build may go on.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResolvedOutput {
    pub valid_input: bool,
    pub valid_output: bool,
    /// Base name of generated files, without extension.
    pub output_file_name: String,
    /// `true`: output names a new file inside its parent folder.
    /// `false`: output is an existing folder to write into.
    pub truncate_output: bool,
    /// Folder the generated files go to.
    pub output_folder: PathBuf,
    /// Formats whose target already exists there. Empty when existence was
    /// not checked.
    pub file_output_existence: BTreeMap<Format, bool>,
    #[serde(rename = "continue")]
    pub continue_build: bool,
    pub message: String,
    pub reason: Option<ReasonCode>,
}

impl ResolvedOutput {
    /// `{output_folder}/{output_file_name}`, handed to the converter.
    pub fn output_base(&self) -> PathBuf {
        self.output_folder.join(&self.output_file_name)
    }

    /// Formats that would overwrite an existing file.
    pub fn existing_outputs(&self) -> Vec<Format> {
        self.file_output_existence
            .iter()
            .filter(|(_, exists)| **exists)
            .map(|(format, _)| *format)
            .collect()
    }
}

/// Pick `(truncate_output, valid_output)` from the three output probes.
fn output_rule(probe: &PathProbe) -> (bool, bool) {
    if !probe.output_file_exists && !probe.truncated_folder_exists {
        // Nowhere usable to write.
        (false, false)
    } else if probe.output_folder_exists {
        (false, true)
    } else {
        (true, true)
    }
}

/// Combine path probes (and, when checked, per-format existence) into the
/// final output decision.
pub fn resolve(
    formats: &[Format],
    targets: &ProbeTargets,
    probe: &PathProbe,
    per_format: Option<&BTreeMap<Format, FormatExistence>>,
) -> ResolvedOutput {
    let valid_input = probe.input_exists;
    let (truncate_output, valid_output) = output_rule(probe);

    let output_folder = if truncate_output {
        targets.truncated.clone()
    } else {
        targets.output.clone()
    };

    let file_output_existence: BTreeMap<Format, bool> = per_format
        .map(|existence| {
            existence
                .iter()
                .map(|(format, found)| {
                    let exists = if truncate_output {
                        found.in_truncated_folder
                    } else {
                        found.in_output_folder
                    };
                    (*format, exists)
                })
                .collect()
        })
        .unwrap_or_default();

    let (message, reason) = match (valid_input, valid_output) {
        (true, true) => {
            let count = formats.len();
            (
                format!(
                    "ready to build: {} {} will be created in {}",
                    count,
                    if count == 1 { "file" } else { "files" },
                    output_folder.display()
                ),
                None,
            )
        }
        (false, true) => (
            format!("invalid input file: {}", targets.input.display()),
            Some(ReasonCode::InvalidInputFile),
        ),
        (true, false) => (
            format!(
                "invalid output location: {} (no existing folder to write into)",
                targets.output.display()
            ),
            Some(ReasonCode::InvalidOutputLocation),
        ),
        (false, false) => (
            format!(
                "invalid input file and invalid output location: {}, {}",
                targets.input.display(),
                targets.output.display()
            ),
            Some(ReasonCode::InvalidInputAndOutput),
        ),
    };

    ResolvedOutput {
        valid_input,
        valid_output,
        output_file_name: targets.file_name.clone(),
        truncate_output,
        output_folder,
        file_output_existence,
        continue_build: valid_input && valid_output,
        message,
        reason,
    }
}
