//! Rule trait and registry for unisort rules

use mago_syntax::ast::Program;
use std::collections::HashSet;
use unisort_core::Diagnostic;

use crate::sorting::SortOptions;

/// A rule that inspects a program and reports diagnostics, possibly with fixes
pub trait Rule: Send + Sync {
    /// The unique identifier for this rule (e.g., "sort_union_types")
    fn name(&self) -> &'static str;

    /// A short description of what this rule does
    fn description(&self) -> &'static str;

    /// Check a PHP program and return its diagnostics
    fn check<'a>(&self, program: &Program<'a>, source: &str) -> Vec<Diagnostic>;
}

/// Resolved per-rule options
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RulesOptions {
    pub sort_union_types: SortOptions,
}

/// Registry of all available rules
pub struct RuleRegistry {
    rules: Vec<Box<dyn Rule>>,
}

impl RuleRegistry {
    /// Create a new registry with all built-in rules at their default options
    pub fn new() -> Self {
        Self::with_options(&RulesOptions::default())
    }

    /// Create a registry with all built-in rules configured from `options`
    pub fn with_options(options: &RulesOptions) -> Self {
        let mut registry = Self { rules: Vec::new() };

        registry.register(Box::new(super::sort_union_types::SortUnionTypesRule::new(
            options.sort_union_types,
        )));

        registry
    }

    /// Register a new rule
    pub fn register(&mut self, rule: Box<dyn Rule>) {
        self.rules.push(rule);
    }

    /// Get all rule names
    pub fn all_names(&self) -> Vec<&'static str> {
        self.rules.iter().map(|r| r.name()).collect()
    }

    /// Get rules filtered by enabled names
    pub fn get_enabled(&self, enabled: &HashSet<String>) -> Vec<&dyn Rule> {
        self.rules
            .iter()
            .filter(|r| enabled.contains(r.name()))
            .map(|r| r.as_ref())
            .collect()
    }

    /// Get all rules with their descriptions (for --list-rules)
    pub fn list_rules(&self) -> Vec<(&'static str, &'static str)> {
        self.rules
            .iter()
            .map(|r| (r.name(), r.description()))
            .collect()
    }

    /// Run all enabled rules on a program
    pub fn check_all<'a>(
        &self,
        program: &Program<'a>,
        source: &str,
        enabled: &HashSet<String>,
    ) -> Vec<Diagnostic> {
        let mut diagnostics = Vec::new();
        for rule in self.get_enabled(enabled) {
            diagnostics.extend(rule.check(program, source));
        }
        diagnostics
    }
}

impl Default for RuleRegistry {
    fn default() -> Self {
        Self::new()
    }
}
