//! Issue and result types reported by the linter.

use serde::Serialize;
use stubborn_http::MatchOptions;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    /// The file will not load.
    Error,
    /// The file loads but probably does not do what was intended.
    Warning,
}

impl Severity {
    pub fn label(&self) -> &'static str {
        match self {
            Severity::Error => "error",
            Severity::Warning => "warning",
        }
    }
}

/// A single problem found in a stub file.
#[derive(Debug, Clone, Serialize)]
pub struct LintIssue {
    pub severity: Severity,
    /// Stable code, `E001`..`E008` or `W001`..`W002`
    pub code: &'static str,
    pub message: String,
    #[serde(serialize_with = "serialize_path")]
    pub file: PathBuf,
    /// Where in the file, e.g. `stubs[0].request.url`
    pub location: Option<String>,
    pub suggestion: Option<String>,
}

fn serialize_path<S>(path: &Path, serializer: S) -> Result<S::Ok, S::Error>
where
    S: serde::Serializer,
{
    serializer.serialize_str(&path.to_string_lossy())
}

impl LintIssue {
    fn new(severity: Severity, code: &'static str, message: String, file: &Path) -> Self {
        Self {
            severity,
            code,
            message,
            file: file.to_path_buf(),
            location: None,
            suggestion: None,
        }
    }

    pub fn error(code: &'static str, message: impl Into<String>, file: &Path) -> Self {
        Self::new(Severity::Error, code, message.into(), file)
    }

    pub fn warning(code: &'static str, message: impl Into<String>, file: &Path) -> Self {
        Self::new(Severity::Warning, code, message.into(), file)
    }

    pub fn with_location(mut self, location: impl Into<String>) -> Self {
        self.location = Some(location.into());
        self
    }

    pub fn with_suggestion(mut self, suggestion: impl Into<String>) -> Self {
        self.suggestion = Some(suggestion.into());
        self
    }
}

/// Result of linting one or more files.
#[derive(Debug, Default, Serialize)]
pub struct LintResult {
    pub issues: Vec<LintIssue>,
    pub files_checked: usize,
    pub errors: usize,
    pub warnings: usize,
}

impl LintResult {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_issue(&mut self, issue: LintIssue) {
        match issue.severity {
            Severity::Error => self.errors += 1,
            Severity::Warning => self.warnings += 1,
        }
        self.issues.push(issue);
    }

    pub fn has_errors(&self) -> bool {
        self.errors > 0
    }

    pub fn has_warnings(&self) -> bool {
        self.warnings > 0
    }

    /// Failed when there are errors, or warnings under `strict`.
    pub fn failed(&self, strict: bool) -> bool {
        self.has_errors() || (strict && self.has_warnings())
    }

    pub fn merge(&mut self, other: LintResult) {
        self.issues.extend(other.issues);
        self.files_checked += other.files_checked;
        self.errors += other.errors;
        self.warnings += other.warnings;
    }
}

#[derive(Debug, Clone, Default)]
pub struct LintOptions {
    /// Options the duplicate check (W002) compares requests with
    pub match_options: MatchOptions,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_counts_and_merge() {
        let file = Path::new("a.json");
        let mut a = LintResult::new();
        a.files_checked = 1;
        a.add_issue(LintIssue::error("E002", "bad", file));

        let mut b = LintResult::new();
        b.files_checked = 1;
        b.add_issue(LintIssue::warning("W001", "meh", file));

        a.merge(b);
        assert_eq!(a.files_checked, 2);
        assert_eq!((a.errors, a.warnings), (1, 1));
        assert!(a.failed(false));
    }

    #[test]
    fn test_strict_fails_on_warnings() {
        let mut result = LintResult::new();
        result.add_issue(LintIssue::warning("W001", "meh", Path::new("a.json")));
        assert!(!result.failed(false));
        assert!(result.failed(true));
    }

    #[test]
    fn test_issue_serializes_path_as_string() {
        let issue = LintIssue::error("E005", "Invalid request URL", Path::new("dir/a.json"))
            .with_location("stubs[0].request.url");
        let json = serde_json::to_value(&issue).unwrap();
        assert_eq!(json["file"], "dir/a.json");
        assert_eq!(json["severity"], "error");
        assert_eq!(json["location"], "stubs[0].request.url");
    }
}
