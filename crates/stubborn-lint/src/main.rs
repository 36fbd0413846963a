//! Stubborn stub file linter CLI
//!
//! Validates recorded stub files before tests load them.
//!
//! Usage:
//!   stubborn-lint <directory_or_file> [OPTIONS]

use clap::{Parser, ValueEnum};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use stubborn_lint::{collect_stub_files, lint_file, LintIssue, LintOptions, LintResult, Severity};
use tracing::debug;
use tracing_subscriber::EnvFilter;

// ANSI color codes
const GREEN: &str = "\x1b[32m";
const RED: &str = "\x1b[31m";
const YELLOW: &str = "\x1b[33m";
const CYAN: &str = "\x1b[36m";
const BOLD: &str = "\x1b[1m";
const DIM: &str = "\x1b[2m";
const RESET: &str = "\x1b[0m";

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    Text,
    Json,
}

/// Stubborn stub file linter
#[derive(Parser, Debug)]
#[command(name = "stubborn-lint")]
#[command(author, version, about = "Validate recorded stub files")]
struct Args {
    /// Stub file or directory containing stub files
    #[arg(required = true)]
    path: PathBuf,

    /// Output format
    #[arg(short, long, value_enum, default_value_t = OutputFormat::Text)]
    output: OutputFormat,

    /// Only show errors (hide warnings)
    #[arg(short = 'e', long)]
    errors_only: bool,

    /// Debug logging
    #[arg(short, long)]
    verbose: bool,

    /// Strict mode - treat warnings as errors
    #[arg(short, long)]
    strict: bool,
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let default_level = if args.verbose { "debug" } else { "warn" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_writer(std::io::stderr)
        .init();

    let files = stub_files(&args.path)?;
    if files.is_empty() {
        println!("{YELLOW}Warning:{RESET} No JSON files found in {:?}", args.path);
        return Ok(());
    }

    let options = LintOptions::default();
    let mut result = LintResult::new();
    for file in &files {
        debug!("Linting {}", file.display());
        result.merge(lint_file(file, &options));
    }

    match args.output {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&result)?),
        OutputFormat::Text => print_results(&args, files.len(), &result),
    }

    std::process::exit(if result.failed(args.strict) { 1 } else { 0 });
}

fn stub_files(path: &Path) -> anyhow::Result<Vec<PathBuf>> {
    if path.is_dir() {
        return Ok(collect_stub_files(path)?);
    }
    // a single file is linted whatever its extension, so read errors surface as E001
    Ok(vec![path.to_path_buf()])
}

fn print_results(args: &Args, file_count: usize, result: &LintResult) {
    println!("{BOLD}{CYAN}Stubborn Stub Linter{RESET}");
    println!("{DIM}━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━{RESET}");
    println!("{DIM}Scanning:{RESET} {CYAN}{}{RESET}", args.path.display());
    println!("{DIM}Found:{RESET}    {BOLD}{file_count}{RESET} stub file(s)\n");

    let mut issues_by_file: BTreeMap<&PathBuf, Vec<&LintIssue>> = BTreeMap::new();
    for issue in &result.issues {
        if args.errors_only && issue.severity != Severity::Error {
            continue;
        }
        issues_by_file.entry(&issue.file).or_default().push(issue);
    }

    if issues_by_file.is_empty() {
        println!("{GREEN}{BOLD}No issues found!{RESET}\n");
    }

    for (file, issues) in &issues_by_file {
        let file_errors = issues
            .iter()
            .filter(|i| i.severity == Severity::Error)
            .count();
        let file_warnings = issues.len() - file_errors;
        let file_name = file.file_name().unwrap_or_default().to_string_lossy();

        let status = if file_errors > 0 {
            format!("{RED}FAIL{RESET}")
        } else {
            format!("{YELLOW}WARN{RESET}")
        };
        println!(
            "{status} {BOLD}{CYAN}{file_name}{RESET} {DIM}({file_errors} error(s), {file_warnings} warning(s)){RESET}"
        );

        for issue in issues {
            let color = severity_color(issue.severity);
            let location = issue
                .location
                .as_ref()
                .map(|l| format!("{DIM}[{RESET}{CYAN}{l}{RESET}{DIM}]{RESET} "))
                .unwrap_or_default();

            println!(
                "  {color}|{RESET} {location}{BOLD}{color}{}{RESET}: {} {DIM}({}){RESET}",
                issue.severity.label(),
                issue.message,
                issue.code
            );
            if let Some(suggestion) = &issue.suggestion {
                println!("  {color}|{RESET}   {GREEN}-> {suggestion}{RESET}");
            }
        }
        println!();
    }

    println!("{DIM}━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━{RESET}");
    println!("{BOLD}{CYAN}Summary{RESET}");
    println!("  {DIM}Files checked:{RESET} {BOLD}{}{RESET}", result.files_checked);
    println!(
        "  {}Errors:{RESET}    {BOLD}{}{RESET}",
        if result.has_errors() { RED } else { GREEN },
        result.errors
    );
    println!(
        "  {}Warnings:{RESET}  {BOLD}{}{RESET}\n",
        if result.has_warnings() { YELLOW } else { DIM },
        result.warnings
    );

    if result.failed(args.strict) {
        println!("{RED}{BOLD}Linting failed{RESET}");
    } else if result.has_warnings() {
        println!("{YELLOW}{BOLD}Passed with warnings{RESET}");
    } else {
        println!("{GREEN}{BOLD}All checks passed!{RESET}");
    }
}

fn severity_color(severity: Severity) -> &'static str {
    match severity {
        Severity::Error => RED,
        Severity::Warning => YELLOW,
    }
}
