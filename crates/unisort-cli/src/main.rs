//! unisort CLI - keeps PHP union types in a consistent order
//!
//! Available rules:
//! - sort_union_types: Enforce sorted union types (`int|string`, not `string|int`)

mod config;
mod logging;
mod output;
mod process;

use anyhow::Result;
use clap::Parser;
use colored::*;
use rayon::prelude::*;
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use config::Config;
use output::{DiagnosticInfo, OutputFormat, Reporter};
use process::{process_file, write_file};
use unisort_rules::{RuleRegistry, SortOrder, SortType};

#[derive(Parser)]
#[command(name = "unisort")]
#[command(version)]
#[command(about = "Check and fix the order of PHP union types")]
#[command(author = "unisort contributors")]
struct Cli {
    /// Files or directories to process
    #[arg(required_unless_present = "list_rules")]
    paths: Vec<PathBuf>,

    /// Report violations without touching files (default mode)
    #[arg(long, conflicts_with = "fix")]
    check: bool,

    /// Rewrite files with sorted union types
    #[arg(long, conflicts_with = "check")]
    fix: bool,

    /// Show verbose output
    #[arg(long, short = 'v')]
    verbose: bool,

    /// Rules to run (can be specified multiple times). Overrides config file.
    #[arg(long, short = 'r', value_name = "RULE")]
    rule: Vec<String>,

    /// Sort type: alphabetical, natural, line-length. Overrides config file.
    #[arg(long = "type", value_name = "TYPE")]
    sort_type: Option<String>,

    /// Sort order: asc, desc. Overrides config file.
    #[arg(long, value_name = "ORDER")]
    order: Option<String>,

    /// Output format: text, json, diff
    #[arg(long, value_name = "FORMAT")]
    format: Option<String>,

    /// Shorthand for --format json
    #[arg(long, conflicts_with = "format")]
    json: bool,

    /// Path to config file (default: auto-detect .unisort.toml)
    #[arg(long, value_name = "PATH", conflicts_with = "no_config")]
    config: Option<PathBuf>,

    /// Ignore config files
    #[arg(long)]
    no_config: bool,

    /// List available rules and exit
    #[arg(long)]
    list_rules: bool,
}

fn main() -> ExitCode {
    match run() {
        Ok(code) => code,
        Err(e) => {
            eprintln!("{}: {:#}", "Error".red(), e);
            ExitCode::from(1)
        }
    }
}

fn run() -> Result<ExitCode> {
    let cli = Cli::parse();
    logging::init_tracing(cli.verbose);

    // Handle --list-rules
    if cli.list_rules {
        println!("{}", "Available rules:".bold());
        for (name, description) in RuleRegistry::new().list_rules() {
            println!("  {} - {}", name.green(), description);
        }
        return Ok(ExitCode::SUCCESS);
    }

    // Load config file
    let config = if cli.no_config {
        Config::default()
    } else if let Some(config_path) = &cli.config {
        Config::load_path(config_path)?
    } else {
        match Config::load()? {
            Some((cfg, path)) => {
                tracing::info!(path = %path.display(), "using config");
                cfg
            }
            None => Config::default(),
        }
    };

    // Determine output format: flag, then config, then text
    let output_format = if cli.json {
        OutputFormat::Json
    } else {
        match cli.format.as_deref().or(config.output.format.as_deref()) {
            Some(format) => OutputFormat::parse(format).ok_or_else(|| {
                anyhow::anyhow!(
                    "Invalid output format '{}'. Valid options: text, json, diff",
                    format
                )
            })?,
            None => OutputFormat::default(),
        }
    };

    // Resolve rule options, CLI flags win over the config file
    let mut options = config.rules_options();
    if let Some(sort_type) = &cli.sort_type {
        options.sort_union_types.sort_type = sort_type.parse::<SortType>()?;
    }
    if let Some(order) = &cli.order {
        options.sort_union_types.order = order.parse::<SortOrder>()?;
    }

    let registry = RuleRegistry::with_options(&options);
    let all_rules = registry.all_names();

    // Validate rule names from CLI
    for rule in &cli.rule {
        if !all_rules.contains(&rule.as_str()) {
            eprintln!(
                "{}: Unknown rule '{}'. Use --list-rules to see available rules.",
                "Error".red(),
                rule
            );
            return Ok(ExitCode::from(1));
        }
    }

    let enabled_rules = config.effective_rules(&all_rules, &cli.rule);
    if enabled_rules.is_empty() {
        eprintln!("{}: No rules enabled", "Error".red());
        return Ok(ExitCode::from(1));
    }

    let fix_mode = cli.fix;
    let check_mode = !fix_mode;

    if cli.verbose && output_format == OutputFormat::Text {
        println!(
            "{}: {}",
            "Mode".bold(),
            if fix_mode { "fix" } else { "check" }
        );
        println!(
            "{}: {} ({})",
            "Sorting".bold(),
            options.sort_union_types.sort_type,
            options.sort_union_types.order
        );
        println!();
    }

    let (file_paths, missing_paths) = collect_files(&cli.paths, &config);

    // Process files in parallel
    let results: Vec<FileResult> = file_paths
        .par_iter()
        .map(|path| process_file_to_result(path, &registry, &enabled_rules))
        .collect();

    // Sort results by path for deterministic output
    let mut sorted_results: Vec<_> = results.into_iter().zip(file_paths.iter()).collect();
    sorted_results.sort_by(|a, b| a.1.cmp(b.1));

    let mut reporter = Reporter::new(output_format, cli.verbose);

    for path in &missing_paths {
        reporter.report_error(path, "Path does not exist");
    }

    for (result, path) in sorted_results {
        report_result(path, result, fix_mode, &mut reporter);
    }

    // Determine exit code
    let summary = reporter.summary();
    let exit_code = if summary.errors > 0 {
        ExitCode::from(1)
    } else if check_mode && summary.total_violations > 0 {
        ExitCode::from(2)
    } else if fix_mode && summary.files_fixed < summary.files_with_violations {
        ExitCode::from(2)
    } else {
        ExitCode::SUCCESS
    };

    reporter.finish(check_mode)?;

    Ok(exit_code)
}

/// Expand the given paths into PHP files, split from paths that do not exist
fn collect_files(paths: &[PathBuf], config: &Config) -> (Vec<PathBuf>, Vec<PathBuf>) {
    let mut file_paths: Vec<PathBuf> = Vec::new();
    let mut missing_paths: Vec<PathBuf> = Vec::new();

    for path in paths {
        if path.is_file() {
            file_paths.push(path.clone());
        } else if path.is_dir() {
            for entry in walkdir::WalkDir::new(path)
                .into_iter()
                .filter_map(|e| e.ok())
                .filter(|e| e.file_type().is_file())
                .filter(|e| e.path().extension().is_some_and(|ext| ext == "php"))
            {
                let file_path = entry.path();
                if config.should_exclude(file_path) {
                    tracing::debug!(path = %file_path.display(), "excluded by config");
                } else {
                    file_paths.push(file_path.to_path_buf());
                }
            }
        } else {
            missing_paths.push(path.clone());
        }
    }

    (file_paths, missing_paths)
}

/// Result of processing a single file (for parallel processing)
enum FileResult {
    /// File has no violations
    Clean,
    /// File has violations to report or fix
    HasViolations {
        diagnostics: Vec<DiagnosticInfo>,
        old_source: String,
        new_source: Option<String>,
    },
    /// Parse error occurred
    ParseError,
    /// Other error occurred
    Error(String),
}

/// Process a file and return a result (no writes, suitable for parallel execution)
fn process_file_to_result(
    path: &Path,
    registry: &RuleRegistry,
    enabled_rules: &HashSet<String>,
) -> FileResult {
    match process_file(path, registry, enabled_rules) {
        Ok(Some(result)) => {
            if result.diagnostics.is_empty() {
                FileResult::Clean
            } else {
                FileResult::HasViolations {
                    diagnostics: result.diagnostics,
                    old_source: result.old_source,
                    new_source: result.new_source,
                }
            }
        }
        Ok(None) => FileResult::ParseError,
        Err(e) => FileResult::Error(format!("{:#}", e)),
    }
}

/// Report a file result and optionally write the fixed source
fn report_result(path: &Path, result: FileResult, fix_mode: bool, reporter: &mut Reporter) {
    match result {
        FileResult::Clean => {
            reporter.report_check(path, vec![], "", None);
        }
        FileResult::HasViolations {
            diagnostics,
            old_source,
            new_source,
        } => {
            if !fix_mode {
                reporter.report_check(path, diagnostics, &old_source, new_source.as_deref());
                return;
            }

            match new_source {
                Some(new_source) => match write_file(path, &new_source) {
                    Ok(()) => reporter.report_fix(path, diagnostics, true),
                    Err(e) => reporter.report_error(path, &format!("{:#}", e)),
                },
                None => reporter.report_fix(path, diagnostics, false),
            }
        }
        FileResult::ParseError => {
            reporter.report_error(path, "Parse error, skipping");
        }
        FileResult::Error(msg) => {
            reporter.report_error(path, &msg);
        }
    }
}
