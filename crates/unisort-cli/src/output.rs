//! Output formatting for unisort
//!
//! Supports text (colored terminal), JSON and unified diff output formats.

use anyhow::Result;
use colored::*;
use serde::Serialize;
use std::path::Path;

/// Output format selection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
    Diff,
}

impl OutputFormat {
    pub fn parse(s: &str) -> Option<OutputFormat> {
        match s.to_lowercase().as_str() {
            "text" => Some(OutputFormat::Text),
            "json" => Some(OutputFormat::Json),
            "diff" => Some(OutputFormat::Diff),
            _ => None,
        }
    }
}

/// A single reported violation, positioned for humans
#[derive(Debug, Clone, Serialize)]
pub struct DiagnosticInfo {
    pub rule: String,
    pub message_id: String,
    pub line: usize,
    pub column: usize,
    pub message: String,
    pub fixable: bool,
}

/// Result of processing a single file
#[derive(Debug, Clone, Serialize)]
pub struct FileResult {
    pub path: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub diagnostics: Vec<DiagnosticInfo>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl FileResult {
    pub fn success(path: &Path, diagnostics: Vec<DiagnosticInfo>) -> Self {
        Self {
            path: path.display().to_string(),
            diagnostics,
            error: None,
        }
    }

    pub fn error(path: &Path, error: String) -> Self {
        Self {
            path: path.display().to_string(),
            diagnostics: Vec::new(),
            error: Some(error),
        }
    }
}

/// Summary statistics
#[derive(Debug, Clone, Default, Serialize)]
pub struct Summary {
    pub files_processed: usize,
    pub files_with_violations: usize,
    pub total_violations: usize,
    pub files_fixed: usize,
    pub errors: usize,
}

/// Full JSON output structure
#[derive(Debug, Serialize)]
pub struct JsonOutput {
    pub version: String,
    pub summary: Summary,
    pub files: Vec<FileResult>,
}

/// Reporter for accumulating and outputting results
pub struct Reporter {
    format: OutputFormat,
    verbose: bool,
    results: Vec<FileResult>,
    summary: Summary,
}

impl Reporter {
    pub fn new(format: OutputFormat, verbose: bool) -> Self {
        Self {
            format,
            verbose,
            results: Vec::new(),
            summary: Summary::default(),
        }
    }

    /// Report a file's violations without touching it
    pub fn report_check(
        &mut self,
        path: &Path,
        diagnostics: Vec<DiagnosticInfo>,
        old_source: &str,
        new_source: Option<&str>,
    ) {
        self.summary.files_processed += 1;

        if diagnostics.is_empty() {
            self.report_clean(path);
            return;
        }

        self.summary.files_with_violations += 1;
        self.summary.total_violations += diagnostics.len();

        match self.format {
            OutputFormat::Text => {
                println!("{}", path.display().to_string().bold());
                print_diagnostics(&diagnostics);
                if let Some(new_source) = new_source {
                    println!();
                    print_diff(old_source, new_source);
                }
                println!();
            }
            OutputFormat::Diff => {
                if let Some(new_source) = new_source {
                    print!("{}", unified_diff(path, old_source, new_source));
                }
            }
            OutputFormat::Json => {
                // JSON output is handled in finish()
            }
        }

        self.results.push(FileResult::success(path, diagnostics));
    }

    /// Report a file after writing its fixed source
    pub fn report_fix(&mut self, path: &Path, diagnostics: Vec<DiagnosticInfo>, fixed: bool) {
        self.summary.files_processed += 1;

        if diagnostics.is_empty() {
            self.report_clean(path);
            return;
        }

        self.summary.files_with_violations += 1;
        self.summary.total_violations += diagnostics.len();
        if fixed {
            self.summary.files_fixed += 1;
        }

        if self.format == OutputFormat::Text {
            println!("{}", path.display().to_string().bold());
            if fixed {
                println!(
                    "  {} Fixed {} violation(s)",
                    "OK".green(),
                    diagnostics.len()
                );
            } else {
                print_diagnostics(&diagnostics);
            }
            println!();
        }

        self.results.push(FileResult::success(path, diagnostics));
    }

    /// Report an error processing a file
    pub fn report_error(&mut self, path: &Path, error: &str) {
        self.summary.files_processed += 1;
        self.summary.errors += 1;

        if self.format == OutputFormat::Text {
            eprintln!(
                "{}: {} - {}",
                "Warning".yellow(),
                path.display(),
                error
            );
        }

        self.results.push(FileResult::error(path, error.to_string()));
    }

    fn report_clean(&mut self, path: &Path) {
        if self.verbose && self.format == OutputFormat::Text {
            println!("{}: No violations", path.display());
        }
        self.results.push(FileResult::success(path, vec![]));
    }

    /// Print final summary/output
    pub fn finish(self, check_mode: bool) -> Result<()> {
        match self.format {
            OutputFormat::Text => {
                println!();
                println!("{}", "Summary".bold().underline());
                println!("  Files processed: {}", self.summary.files_processed);
                println!(
                    "  Files with violations: {}",
                    self.summary.files_with_violations
                );
                println!("  Total violations: {}", self.summary.total_violations);
                if self.summary.files_fixed > 0 {
                    println!("  Files fixed: {}", self.summary.files_fixed);
                }
                if self.summary.errors > 0 {
                    println!("  Errors: {}", self.summary.errors);
                }

                if check_mode && self.summary.total_violations > 0 {
                    println!();
                    println!("{}", "Run with --fix to apply changes".yellow());
                }
            }
            OutputFormat::Json => {
                let output = JsonOutput {
                    version: env!("CARGO_PKG_VERSION").to_string(),
                    summary: self.summary,
                    files: self.results,
                };
                println!("{}", serde_json::to_string_pretty(&output)?);
            }
            OutputFormat::Diff => {
                // Patch-compatible output carries no summary
            }
        }

        Ok(())
    }

    /// Get summary for exit code determination
    pub fn summary(&self) -> &Summary {
        &self.summary
    }
}

fn print_diagnostics(diagnostics: &[DiagnosticInfo]) {
    for diagnostic in diagnostics {
        println!(
            "  {}:{}  {}  {}",
            diagnostic.line,
            diagnostic.column,
            diagnostic.message,
            diagnostic.rule.dimmed()
        );
    }
}

/// Print a colored diff between old and new content
fn print_diff(old: &str, new: &str) {
    for diff_result in diff::lines(old, new) {
        match diff_result {
            diff::Result::Left(l) => {
                println!("  {}", format!("- {}", l).red());
            }
            diff::Result::Right(r) => {
                println!("  {}", format!("+ {}", r).green());
            }
            diff::Result::Both(_, _) => {}
        }
    }
}

/// Render a unified diff (standard diff -u compatible)
fn unified_diff(path: &Path, old: &str, new: &str) -> String {
    use similar::{ChangeTag, TextDiff};
    use std::fmt::Write;

    let diff = TextDiff::from_lines(old, new);
    let path_str = path.display().to_string();
    let mut out = String::new();

    let _ = writeln!(out, "--- a/{}", path_str);
    let _ = writeln!(out, "+++ b/{}", path_str);

    for hunk in diff.unified_diff().context_radius(3).iter_hunks() {
        let _ = writeln!(out, "{}", hunk.header());
        for change in hunk.iter_changes() {
            let sign = match change.tag() {
                ChangeTag::Delete => "-",
                ChangeTag::Insert => "+",
                ChangeTag::Equal => " ",
            };
            let _ = write!(out, "{}{}", sign, change);
            if change.missing_newline() {
                out.push('\n');
            }
        }
    }

    out
}
