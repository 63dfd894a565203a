//! Architectural Enforcement Integration Tests
//!
//! This package contains integration tests that enforce architectural principles:
//! - The face engine never sleeps or blocks on I/O while holding frame state
//! - Production code propagates errors instead of panicking
//! - File access stays in the configuration loader
//!
//! These tests are designed to catch violations early in the development cycle.

use std::fs;
use std::path::{Path, PathBuf};

/// One line of production code
#[derive(Clone, Debug)]
pub struct SourceLine {
    pub path: PathBuf,
    pub line_number: usize,
    /// The line with any trailing `//` comment removed
    pub code: String,
}

impl std::fmt::Display for SourceLine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}:{} - {}",
            self.path.display(),
            self.line_number,
            self.code.trim()
        )
    }
}

/// Workspace root (two levels above this package)
pub fn workspace_root() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("..")
        .join("..")
}

/// Non-test, non-comment lines of every `.rs` file under `dir`
///
/// Scanning of a file stops at its `#[cfg(test)]` module, which sits at the
/// bottom of every file in this workspace.
pub fn production_lines(dir: &Path) -> Vec<SourceLine> {
    let mut lines = Vec::new();
    for entry in walkdir::WalkDir::new(dir)
        .into_iter()
        .filter_map(|e| e.ok())
    {
        let path = entry.path();
        if path.extension().and_then(|s| s.to_str()) != Some("rs") {
            continue;
        }
        let Ok(content) = fs::read_to_string(path) else {
            continue;
        };
        for (idx, line) in content.lines().enumerate() {
            if line.trim_start().starts_with("#[cfg(test)]") {
                break;
            }
            let code = line.split("//").next().unwrap_or(line);
            if code.trim().is_empty() {
                continue;
            }
            lines.push(SourceLine {
                path: path.to_path_buf(),
                line_number: idx + 1,
                code: code.to_string(),
            });
        }
    }
    lines
}

/// Whether `line` lives in one of the allowlisted files
pub fn is_allowed(line: &SourceLine, allowlist: &[&str]) -> bool {
    line.path
        .file_name()
        .and_then(|n| n.to_str())
        .is_some_and(|name| allowlist.contains(&name))
}
