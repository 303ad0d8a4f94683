//! File processing logic for unisort

use anyhow::{Context, Result};
use bumpalo::Bump;
use mago_database::file::FileId;
use std::collections::HashSet;
use std::path::Path;

use unisort_core::{apply_edits, non_overlapping, Diagnostic};
use unisort_rules::RuleRegistry;

use crate::output::DiagnosticInfo;

/// Upper bound on check-and-fix rounds for one file
pub const MAX_FIX_PASSES: usize = 10;

/// Result of processing a single file
pub struct ProcessResult {
    /// Diagnostics found in the original source
    pub diagnostics: Vec<DiagnosticInfo>,
    /// Original source code
    pub old_source: String,
    /// Source after fixes (only if any fix applied)
    pub new_source: Option<String>,
}

/// Parse `source` and run the enabled rules over it
///
/// Returns `None` if the source does not parse.
pub fn check_source(
    name: &str,
    source: &str,
    registry: &RuleRegistry,
    enabled: &HashSet<String>,
) -> Option<Vec<Diagnostic>> {
    let arena = Bump::new();
    let file_id = FileId::new(name);

    let (program, parse_error) = mago_syntax::parser::parse_file_content(&arena, file_id, source);

    if parse_error.is_some() {
        return None;
    }

    Some(registry.check_all(program, source, enabled))
}

/// Apply fixes repeatedly until none remain or the pass limit is reached
///
/// A pass whose output no longer parses is discarded and the loop stops,
/// so the result is always the last source that parsed.
pub fn fix_source(
    name: &str,
    source: &str,
    registry: &RuleRegistry,
    enabled: &HashSet<String>,
) -> Result<String> {
    let mut current = source.to_string();
    let Some(mut diagnostics) = check_source(name, &current, registry, enabled) else {
        return Ok(current);
    };

    for pass in 1..=MAX_FIX_PASSES {
        let fixes = non_overlapping(&Diagnostic::fixes(&diagnostics));
        if fixes.is_empty() {
            break;
        }

        tracing::debug!(file = name, pass, fixes = fixes.len(), "applying fixes");
        let fixed = apply_edits(&current, &fixes)
            .with_context(|| format!("Failed to apply fixes to {}", name))?;

        match check_source(name, &fixed, registry, enabled) {
            Some(next) => {
                current = fixed;
                diagnostics = next;
            }
            None => {
                tracing::warn!(file = name, pass, "fixed source no longer parses, discarding pass");
                break;
            }
        }
    }

    Ok(current)
}

/// Process a single PHP file and return the diagnostics found
pub fn process_file(
    path: &Path,
    registry: &RuleRegistry,
    enabled: &HashSet<String>,
) -> Result<Option<ProcessResult>> {
    let source_code = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read file: {}", path.display()))?;
    let name = path.to_string_lossy();

    let Some(diagnostics) = check_source(&name, &source_code, registry, enabled) else {
        return Ok(None);
    };

    if diagnostics.is_empty() {
        return Ok(Some(ProcessResult {
            diagnostics: vec![],
            old_source: source_code,
            new_source: None,
        }));
    }

    let infos: Vec<DiagnosticInfo> = diagnostics
        .iter()
        .map(|diagnostic| {
            let (line, column) = offset_to_line_column(&source_code, diagnostic.start_offset());
            DiagnosticInfo {
                rule: diagnostic.rule.to_string(),
                message_id: diagnostic.message_id.to_string(),
                line,
                column,
                message: diagnostic.message.clone(),
                fixable: diagnostic.fix.is_some(),
            }
        })
        .collect();

    let fixed = fix_source(&name, &source_code, registry, enabled)?;
    let new_source = (fixed != source_code).then_some(fixed);

    Ok(Some(ProcessResult {
        diagnostics: infos,
        old_source: source_code,
        new_source,
    }))
}

/// Write the processed result to the file
pub fn write_file(path: &Path, content: &str) -> Result<()> {
    std::fs::write(path, content)
        .with_context(|| format!("Failed to write file: {}", path.display()))
}

/// Convert byte offset to line and column numbers (1-based)
fn offset_to_line_column(source: &str, offset: usize) -> (usize, usize) {
    let mut line = 1;
    let mut column = 1;

    for (i, ch) in source.char_indices() {
        if i >= offset {
            break;
        }
        if ch == '\n' {
            line += 1;
            column = 1;
        } else {
            column += 1;
        }
    }

    (line, column)
}

#[cfg(test)]
mod tests {
    use super::*;
    use mago_syntax::ast::Program;
    use std::fs;
    use tempfile::TempDir;
    use unisort_core::Edit;
    use unisort_rules::{Rule, RulesOptions, SortOptions, SortOrder, SortType};

    fn enabled() -> HashSet<String> {
        ["sort_union_types".to_string()].into_iter().collect()
    }

    /// Rewrites a trailing `{}` into a dangling `{ (` once `trigger` appears
    struct UnbalancedBraceRule {
        trigger: &'static str,
    }

    impl Rule for UnbalancedBraceRule {
        fn name(&self) -> &'static str {
            "unbalanced_brace"
        }

        fn description(&self) -> &'static str {
            "Produces a fix that breaks parsing"
        }

        fn check<'a>(&self, _program: &Program<'a>, source: &str) -> Vec<Diagnostic> {
            if !source.contains(self.trigger) {
                return vec![];
            }
            let Some(start) = source.rfind("{}") else {
                return vec![];
            };
            let edit = Edit::from_offsets(start, start + 2, "{ (", "break").unwrap();
            vec![Diagnostic::new("unbalanced_brace", "unbalanced", "unbalanced", edit.span)
                .with_fix(edit)]
        }
    }

    #[test]
    fn test_offset_to_line_column() {
        let source = "line1\nline2\nline3";
        assert_eq!(offset_to_line_column(source, 0), (1, 1));
        assert_eq!(offset_to_line_column(source, 5), (1, 6));
        assert_eq!(offset_to_line_column(source, 6), (2, 1));
        assert_eq!(offset_to_line_column(source, 12), (3, 1));
    }

    #[test]
    fn test_check_source_parse_error() {
        let registry = RuleRegistry::new();
        assert!(check_source("bad.php", "<?php function (", &registry, &enabled()).is_none());
    }

    #[test]
    fn test_fix_source_sorts_every_union() {
        let registry = RuleRegistry::new();
        let source = "<?php\nfunction f(C|B|A $a): Y|X {}\n";
        let fixed = fix_source("test.php", source, &registry, &enabled()).unwrap();
        assert_eq!(fixed, "<?php\nfunction f(A|B|C $a): X|Y {}\n");
    }

    #[test]
    fn test_fix_source_uses_registry_options() {
        let registry = RuleRegistry::with_options(&RulesOptions {
            sort_union_types: SortOptions::new(SortType::Alphabetical, SortOrder::Desc),
        });
        let source = "<?php function f(A|B $a) {}";
        let fixed = fix_source("test.php", source, &registry, &enabled()).unwrap();
        assert_eq!(fixed, "<?php function f(B|A $a) {}");
    }

    #[test]
    fn test_fix_source_discards_unparseable_pass() {
        let mut registry = RuleRegistry::new();
        registry.register(Box::new(UnbalancedBraceRule { trigger: "" }));
        let enabled: HashSet<String> = ["unbalanced_brace".to_string()].into_iter().collect();

        let source = "<?php function f() {}";
        let fixed = fix_source("test.php", source, &registry, &enabled).unwrap();

        assert_eq!(fixed, source);
        assert!(check_source("test.php", &fixed, &registry, &enabled).is_some());
    }

    #[test]
    fn test_fix_source_keeps_last_parsed_pass() {
        let mut registry = RuleRegistry::new();
        registry.register(Box::new(UnbalancedBraceRule { trigger: "A|B" }));
        let enabled: HashSet<String> = ["sort_union_types".to_string(), "unbalanced_brace".to_string()]
            .into_iter()
            .collect();

        let source = "<?php function f(B|A $a) {}";
        let fixed = fix_source("test.php", source, &registry, &enabled).unwrap();

        assert_eq!(fixed, "<?php function f(A|B $a) {}");
    }

    #[test]
    fn test_fix_source_leaves_unparseable_input_alone() {
        let registry = RuleRegistry::new();
        let source = "<?php function (B|A";
        let fixed = fix_source("bad.php", source, &registry, &enabled()).unwrap();
        assert_eq!(fixed, source);
    }

    #[test]
    fn test_process_file() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("a.php");
        fs::write(&path, "<?php\nfunction f(string|int $a) {}\n").unwrap();

        let registry = RuleRegistry::new();
        let result = process_file(&path, &registry, &enabled()).unwrap().unwrap();

        assert_eq!(result.diagnostics.len(), 1);
        assert_eq!(result.diagnostics[0].line, 2);
        assert_eq!(result.diagnostics[0].column, 19);
        assert!(result.diagnostics[0].fixable);
        assert_eq!(
            result.new_source.as_deref(),
            Some("<?php\nfunction f(int|string $a) {}\n")
        );
    }

    #[test]
    fn test_process_clean_file() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("clean.php");
        fs::write(&path, "<?php function f(int|string $a) {}").unwrap();

        let registry = RuleRegistry::new();
        let result = process_file(&path, &registry, &enabled()).unwrap().unwrap();
        assert!(result.diagnostics.is_empty());
        assert!(result.new_source.is_none());
    }
}
