//! Stub file linting library for Stubborn.
//!
//! Checks that recorded stub files will load, and flags stubs that load but
//! can never be played back. Usable as a library or through the
//! `stubborn-lint` binary.
//!
//! # Example
//!
//! ```no_run
//! use stubborn_lint::{lint_file, lint_directory, LintOptions};
//! use std::path::Path;
//!
//! let result = lint_file(Path::new("LoginTests_testLogin.json"), &LintOptions::default());
//!
//! let result = lint_directory(Path::new("./stubs"), &LintOptions::default());
//! if result.has_errors() {
//!     eprintln!("Found {} errors", result.errors);
//! }
//! ```

mod types;
mod validator;

use std::path::Path;

pub use types::{LintIssue, LintOptions, LintResult, Severity};
pub use validator::{validate_headers, validate_stub, validate_stub_file};

/// Lint a single stub file.
pub fn lint_file(path: &Path, options: &LintOptions) -> LintResult {
    let content = match std::fs::read_to_string(path) {
        Ok(c) => c,
        Err(e) => {
            let mut result = LintResult::new();
            result.files_checked = 1;
            result.add_issue(LintIssue::error(
                "E001",
                format!("Failed to read file: {e}"),
                path,
            ));
            return result;
        }
    };

    lint_json(&content, path, options)
}

/// Lint all JSON files in a directory (non-recursive), in file name order.
pub fn lint_directory(path: &Path, options: &LintOptions) -> LintResult {
    let mut result = LintResult::new();

    let files = match collect_stub_files(path) {
        Ok(files) => files,
        Err(e) => {
            result.add_issue(LintIssue::error(
                "E001",
                format!("Failed to read directory: {e}"),
                path,
            ));
            return result;
        }
    };

    for file in files {
        result.merge(lint_file(&file, options));
    }
    result
}

/// The `.json` files directly inside `path`, sorted.
pub fn collect_stub_files(path: &Path) -> std::io::Result<Vec<std::path::PathBuf>> {
    let mut files: Vec<_> = std::fs::read_dir(path)?
        .flatten()
        .map(|entry| entry.path())
        .filter(|p| p.is_file() && p.extension().is_some_and(|ext| ext == "json"))
        .collect();
    files.sort();
    Ok(files)
}

/// Lint stub JSON held in memory. `source` names it in reported issues.
pub fn lint_json(json: &str, source: &Path, options: &LintOptions) -> LintResult {
    let value: serde_json::Value = match serde_json::from_str(json) {
        Ok(v) => v,
        Err(e) => {
            let mut result = LintResult::new();
            result.files_checked = 1;
            result.add_issue(
                LintIssue::error("E002", format!("Invalid JSON: {e}"), source)
                    .with_suggestion("Check for JSON syntax errors"),
            );
            return result;
        }
    };

    lint_value(&value, source, options)
}

/// Lint an already parsed stub file.
pub fn lint_value(value: &serde_json::Value, source: &Path, options: &LintOptions) -> LintResult {
    let mut result = LintResult::new();
    result.files_checked = 1;
    validate_stub_file(source, value, &mut result, options);
    result
}
