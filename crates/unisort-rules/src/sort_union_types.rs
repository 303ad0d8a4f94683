//! Rule: Enforce sorted union types
//!
//! Reports every adjacent pair of union type alternatives that is out of
//! order and offers a single fix per union that sorts all of them.
//!
//! Example:
//! ```php
//! // Before
//! function foo(string|int|null $x): Response|array {}
//!
//! // After (alphabetical, ascending)
//! function foo(int|null|string $x): Response|array {}
//! ```
//!
//! Configuration in .unisort.toml:
//! ```toml
//! [rules.sort_union_types]
//! type = "natural"   # alphabetical | natural | line-length
//! order = "desc"     # asc | desc
//! ```

use mago_span::HasSpan;
use mago_syntax::ast::*;
use unisort_core::{visit, Diagnostic, Edit, Visitor};

use crate::registry::Rule;
use crate::sorting::{build_fix, scan, SortOptions, SortingNode};

pub const RULE_NAME: &str = "sort_union_types";

/// Message identifier shared by every diagnostic of this rule
pub const MESSAGE_ID: &str = "unexpectedUnionTypesOrder";

/// Check a parsed PHP program for unsorted union types
pub fn check_sort_union_types<'a>(
    program: &Program<'a>,
    source: &str,
    options: &SortOptions,
) -> Vec<Diagnostic> {
    let mut checker = SortUnionTypesChecker {
        options,
        diagnostics: Vec::new(),
    };
    visit(&mut checker, program, source);
    checker.diagnostics
}

struct SortUnionTypesChecker<'o> {
    options: &'o SortOptions,
    diagnostics: Vec<Diagnostic>,
}

impl<'a> Visitor<'a> for SortUnionTypesChecker<'_> {
    fn visit_hint(&mut self, hint: &Hint<'a>, source: &str) -> bool {
        if !matches!(hint, Hint::Union(_)) {
            return true;
        }

        let mut alternatives = Vec::new();
        collect_alternatives(hint, &mut alternatives);
        self.check_union(&alternatives, source);

        // The nested unions were flattened into this one
        false
    }
}

impl SortUnionTypesChecker<'_> {
    fn check_union(&mut self, alternatives: &[&Hint<'_>], source: &str) {
        let nodes: Vec<SortingNode<'_>> = alternatives
            .iter()
            .map(|alternative| {
                let span = alternative.span();
                SortingNode::from_range(
                    source,
                    span.start.offset as usize..span.end.offset as usize,
                )
            })
            .collect();

        let violations = scan(&nodes, self.options);
        if violations.is_empty() {
            return;
        }

        tracing::debug!(
            alternatives = nodes.len(),
            violations = violations.len(),
            "unsorted union type"
        );

        let mut fix = match build_fix(&nodes, source, self.options) {
            Ok(Some(fix)) => match Edit::from_offsets(
                fix.range.start,
                fix.range.end,
                fix.replacement,
                "Sort union types",
            ) {
                Ok(edit) => Some(edit.with_rule(RULE_NAME)),
                Err(error) => {
                    tracing::warn!(%error, "skipping fix for union type");
                    None
                }
            },
            Ok(None) => None,
            Err(error) => {
                tracing::warn!(%error, "skipping fix for union type");
                None
            }
        };

        for violation in violations {
            let first = &nodes[violation.first];
            let second = &nodes[violation.second];

            let mut diagnostic = Diagnostic::new(
                RULE_NAME,
                MESSAGE_ID,
                format!(
                    "Expected \"{}\" to come before \"{}\"",
                    second.name, first.name
                ),
                alternatives[violation.second].span(),
            );

            // One fix per union, carried by its first diagnostic
            if let Some(edit) = fix.take() {
                diagnostic = diagnostic.with_fix(edit);
            }

            self.diagnostics.push(diagnostic);
        }
    }
}

/// Flatten a union hint into its alternatives, left to right
fn collect_alternatives<'h, 'a>(hint: &'h Hint<'a>, out: &mut Vec<&'h Hint<'a>>) {
    match hint {
        Hint::Union(union) => {
            collect_alternatives(&union.left, out);
            collect_alternatives(&union.right, out);
        }
        _ => out.push(hint),
    }
}

/// Rule enforcing sorted union types
pub struct SortUnionTypesRule {
    options: SortOptions,
}

impl SortUnionTypesRule {
    pub fn new(options: SortOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> &SortOptions {
        &self.options
    }
}

impl Default for SortUnionTypesRule {
    fn default() -> Self {
        Self::new(SortOptions::default())
    }
}

impl Rule for SortUnionTypesRule {
    fn name(&self) -> &'static str {
        RULE_NAME
    }

    fn description(&self) -> &'static str {
        "Enforce sorted union types"
    }

    fn check<'a>(&self, program: &Program<'a>, source: &str) -> Vec<Diagnostic> {
        check_sort_union_types(program, source, &self.options)
    }
}
