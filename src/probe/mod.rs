//! Filesystem prober.
//!
//! Every check is a read-only `stat`. Any failure to stat counts as "does not
//! exist"; claiming existence wrongly would make an overwrite ambiguous.

mod resolver;

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use tokio::task::JoinSet;

use crate::args::{BuildFlags, Format};

pub use resolver::{resolve, ResolvedOutput};

/// Used when neither output nor input yield a file name.
const FALLBACK_FILE_NAME: &str = "index";

/// Paths derived from the plan before anything touches the disk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProbeTargets {
    pub input: PathBuf,
    pub output: PathBuf,
    /// `output` with its last segment dropped.
    pub truncated: PathBuf,
    /// Base name for generated files, without extension.
    pub file_name: String,
}

impl ProbeTargets {
    pub fn from_flags(flags: &BuildFlags) -> Self {
        let input = flags.input.clone().unwrap_or_default();
        let output = flags.output.clone().unwrap_or_default();
        let truncated = truncate(&output);
        let file_name = file_name(&output, &input);
        Self {
            input,
            output,
            truncated,
            file_name,
        }
    }

    /// Candidate target for `format` inside `folder`.
    pub fn target_in(&self, folder: &Path, format: Format) -> PathBuf {
        folder.join(format!("{}.{}", self.file_name, format.as_str()))
    }
}

fn truncate(output: &Path) -> PathBuf {
    match output.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        Some(_) => PathBuf::from("."),
        None => output.to_path_buf(),
    }
}

/// Output's name component, falling back to the input's when the output is a
/// bare folder such as `.`.
fn file_name(output: &Path, input: &Path) -> String {
    [output, input]
        .iter()
        .filter_map(|path| path.file_stem())
        .map(|stem| stem.to_string_lossy().into_owned())
        .find(|stem| !stem.is_empty())
        .unwrap_or_else(|| FALLBACK_FILE_NAME.to_string())
}

/// Outcomes the resolver must wait for.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PathProbe {
    pub input_exists: bool,
    pub output_file_exists: bool,
    pub output_folder_exists: bool,
    pub truncated_folder_exists: bool,
}

/// Whether a format's target already exists in either candidate folder.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FormatExistence {
    pub in_truncated_folder: bool,
    pub in_output_folder: bool,
}

/// Full probe outcome for one request.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProbeResult {
    pub paths: PathProbe,
    pub per_format_exists: BTreeMap<Format, FormatExistence>,
}

async fn is_file(path: &Path) -> bool {
    tokio::fs::metadata(path)
        .await
        .map(|meta| meta.is_file())
        .unwrap_or(false)
}

async fn is_dir(path: &Path) -> bool {
    tokio::fs::metadata(path)
        .await
        .map(|meta| meta.is_dir())
        .unwrap_or(false)
}

async fn exists(path: PathBuf) -> bool {
    tokio::fs::metadata(&path).await.is_ok()
}

/// Run the four path checks concurrently.
pub async fn probe_paths(targets: &ProbeTargets) -> PathProbe {
    let (input_exists, output_file_exists, output_folder_exists, truncated_folder_exists) = tokio::join!(
        is_file(&targets.input),
        is_file(&targets.output),
        is_dir(&targets.output),
        is_dir(&targets.truncated),
    );

    let probe = PathProbe {
        input_exists,
        output_file_exists,
        output_folder_exists,
        truncated_folder_exists,
    };
    tracing::debug!(?probe, "path probes settled");
    probe
}

/// Check every format's target in both candidate folders concurrently.
pub async fn probe_formats(
    targets: &ProbeTargets,
    formats: &[Format],
) -> BTreeMap<Format, FormatExistence> {
    let mut existence: BTreeMap<Format, FormatExistence> = formats
        .iter()
        .map(|format| (*format, FormatExistence::default()))
        .collect();

    let mut checks = JoinSet::new();
    for format in formats {
        let format = *format;
        let in_truncated = targets.target_in(&targets.truncated, format);
        let in_output = targets.target_in(&targets.output, format);
        checks.spawn(async move {
            let (in_truncated_folder, in_output_folder) =
                tokio::join!(exists(in_truncated), exists(in_output));
            (
                format,
                FormatExistence {
                    in_truncated_folder,
                    in_output_folder,
                },
            )
        });
    }

    while let Some(joined) = checks.join_next().await {
        match joined {
            Ok((format, found)) => {
                existence.insert(format, found);
            }
            // Entry keeps its "does not exist" default.
            Err(e) => tracing::warn!(error = %e, "format probe did not complete"),
        }
    }

    existence
}

/// Run all probes for a request.
pub async fn probe(targets: &ProbeTargets, formats: &[Format]) -> ProbeResult {
    let (paths, per_format_exists) = tokio::join!(probe_paths(targets), probe_formats(targets, formats));
    ProbeResult {
        paths,
        per_format_exists,
    }
}
