//! Rule diagnostics reported back to the host

use mago_span::Span;

use crate::edit::Edit;

/// A single rule violation, anchored at a node of the checked file
#[derive(Debug, Clone)]
pub struct Diagnostic {
    /// Name of the rule that reported this diagnostic
    pub rule: &'static str,
    /// Stable identifier of the message template
    pub message_id: &'static str,
    /// Rendered message
    pub message: String,
    /// The node the diagnostic is anchored at
    pub span: Span,
    /// Replacement that resolves this diagnostic (and possibly its siblings)
    pub fix: Option<Edit>,
}

impl Diagnostic {
    pub fn new(
        rule: &'static str,
        message_id: &'static str,
        message: impl Into<String>,
        span: Span,
    ) -> Self {
        Self {
            rule,
            message_id,
            message: message.into(),
            span,
            fix: None,
        }
    }

    pub fn with_fix(mut self, fix: Edit) -> Self {
        self.fix = Some(fix);
        self
    }

    /// Byte offset of the anchor node
    pub fn start_offset(&self) -> usize {
        self.span.start.offset as usize
    }

    /// Collect every fix attached to a set of diagnostics
    pub fn fixes(diagnostics: &[Diagnostic]) -> Vec<Edit> {
        diagnostics.iter().filter_map(|d| d.fix.clone()).collect()
    }
}
