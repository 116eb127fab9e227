//! Shared test utilities.

#![allow(dead_code)]

use std::path::PathBuf;

use bookbind::args::{BuildFlags, BuildRequest};
use tempfile::TempDir;

pub fn raw_args(args: Vec<&str>) -> Vec<String> {
    args.into_iter().map(String::from).collect()
}

/// A temp dir holding `src/book.tex` and an empty `dist/` folder.
pub struct Workspace {
    pub dir: TempDir,
    pub input: PathBuf,
    pub dist: PathBuf,
}

impl Workspace {
    pub fn new() -> Self {
        let dir = TempDir::new().expect("Failed to create temp dir");
        let src = dir.path().join("src");
        std::fs::create_dir(&src).expect("Failed to create src");
        let input = src.join("book.tex");
        std::fs::write(&input, "\\documentclass{book}\n").expect("Failed to write input");
        let dist = dir.path().join("dist");
        std::fs::create_dir(&dist).expect("Failed to create dist");
        Self { dir, input, dist }
    }

    pub fn request(&self, formats: Vec<&str>, output: PathBuf) -> BuildRequest {
        BuildRequest::new(
            raw_args(formats),
            BuildFlags {
                input: Some(self.input.clone()),
                output: Some(output),
                ..Default::default()
            },
        )
    }
}
