//! Format and flag registry — single source of truth for what a build accepts.

use std::fmt;

use serde::Serialize;

/// An output document type.
///
/// Variant order is the canonical display order used in messages and plans.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Format {
    Html,
    Pdf,
    Epub,
}

impl Format {
    /// Token used on the command line and as the file extension.
    pub fn as_str(&self) -> &'static str {
        match self {
            Format::Html => "html",
            Format::Pdf => "pdf",
            Format::Epub => "epub",
        }
    }

    /// Exact token match; anything else is an unknown format.
    pub fn from_token(token: &str) -> Option<Self> {
        match token {
            "html" => Some(Format::Html),
            "pdf" => Some(Format::Pdf),
            "epub" => Some(Format::Epub),
            _ => None,
        }
    }
}

impl fmt::Display for Format {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A flag the build understands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Flag {
    Input,
    Output,
    Force,
    DryRun,
    Port,
}

/// A single flag definition.
#[derive(Debug, Clone)]
pub struct FlagDef {
    pub flag: Flag,
    /// Primary long form (e.g., "--input").
    pub long: &'static str,
    /// Optional short form (e.g., "-i").
    pub short: Option<&'static str>,
    /// Whether a standalone build refuses to start without it.
    pub required: bool,
    /// Human-readable description (for messages).
    pub description: &'static str,
}

impl FlagDef {
    /// `--input (-i)` style label for messages.
    pub fn label(&self) -> String {
        match self.short {
            Some(short) => format!("{} ({})", self.long, short),
            None => self.long.to_string(),
        }
    }

    /// Label followed by the description, for missing-flag messages.
    pub fn usage(&self) -> String {
        format!("{}: {}", self.label(), self.description)
    }
}

/// Read-only classification data injected into the evaluator.
#[derive(Debug, Clone)]
pub struct BuildRules {
    /// Accepted formats in canonical order.
    pub formats: Vec<Format>,
    /// The designated pair with combined handling: html built first, then
    /// rendered to an exact pdf.
    pub pair: (Format, Format),
    /// Every flag the build accepts.
    pub flags: Vec<FlagDef>,
}

impl BuildRules {
    /// Look up an accepted format by token.
    pub fn accepts(&self, token: &str) -> Option<Format> {
        Format::from_token(token).filter(|format| self.formats.contains(format))
    }

    /// Definitions of the flags a standalone build requires.
    pub fn required_flags(&self) -> impl Iterator<Item = &FlagDef> {
        self.flags.iter().filter(|def| def.required)
    }

    /// Definition of a single flag.
    pub fn flag_def(&self, flag: Flag) -> Option<&FlagDef> {
        self.flags.iter().find(|def| def.flag == flag)
    }
}

impl Default for BuildRules {
    fn default() -> Self {
        Self {
            formats: vec![Format::Html, Format::Pdf, Format::Epub],
            pair: (Format::Html, Format::Pdf),
            flags: flag_registry(),
        }
    }
}

/// Build the complete flag registry.
pub fn flag_registry() -> Vec<FlagDef> {
    vec![
        // === Required for standalone builds ===
        FlagDef {
            flag: Flag::Input,
            long: "--input",
            short: Some("-i"),
            required: true,
            description: "source document to convert",
        },
        FlagDef {
            flag: Flag::Output,
            long: "--output",
            short: Some("-o"),
            required: true,
            description: "output file or folder",
        },
        // === Optional ===
        FlagDef {
            flag: Flag::Force,
            long: "--force",
            short: Some("-f"),
            required: false,
            description: "overwrite existing output files",
        },
        FlagDef {
            flag: Flag::DryRun,
            long: "--dry-run",
            short: None,
            required: false,
            description: "plan the build without writing anything",
        },
        FlagDef {
            flag: Flag::Port,
            long: "--port",
            short: Some("-p"),
            required: false,
            description: "build-server port used for exact pdf rendering",
        },
    ]
}
