//! Span-based source code editing

use mago_database::file::FileId;
use mago_span::{Position, Span};
use thiserror::Error;

/// Errors that can occur during edit application
#[derive(Error, Debug)]
pub enum EditError {
    #[error("Overlapping edits detected at offset {0}")]
    OverlappingEdits(usize),

    #[error("Edit span {start}..{end} out of bounds for source length {len}")]
    SpanOutOfBounds { start: usize, end: usize, len: usize },

    #[error("Offset {0} does not fit in a source span")]
    OffsetTooLarge(usize),
}

/// Represents a single code edit operation
#[derive(Debug, Clone)]
pub struct Edit {
    /// The source span to replace
    pub span: Span,
    /// The replacement text
    pub replacement: String,
    /// Human-readable description of the edit
    pub message: String,
    /// Name of the rule that produced this edit
    pub rule: Option<String>,
}

impl Edit {
    /// Create a new edit
    pub fn new(span: Span, replacement: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            span,
            replacement: replacement.into(),
            message: message.into(),
            rule: None,
        }
    }

    /// Create an edit from raw byte offsets into the source
    ///
    /// Fails with [`EditError::OffsetTooLarge`] when an offset exceeds the
    /// `u32` range of a span position.
    pub fn from_offsets(
        start: usize,
        end: usize,
        replacement: impl Into<String>,
        message: impl Into<String>,
    ) -> Result<Self, EditError> {
        let position = |offset: usize| {
            u32::try_from(offset)
                .map(Position::new)
                .map_err(|_| EditError::OffsetTooLarge(offset))
        };
        let span = Span::new(FileId::zero(), position(start)?, position(end)?);

        Ok(Self::new(span, replacement, message))
    }

    /// Attach the producing rule's name
    pub fn with_rule(mut self, rule: impl Into<String>) -> Self {
        self.rule = Some(rule.into());
        self
    }

    /// Get the byte offset where this edit starts
    pub fn start_offset(&self) -> usize {
        self.span.start.offset as usize
    }

    /// Get the byte offset where this edit ends
    pub fn end_offset(&self) -> usize {
        self.span.end.offset as usize
    }
}

/// Apply edits to source code
///
/// Edits are applied in reverse order (from end to start) to maintain
/// valid offsets throughout the process. Replacement text is inserted
/// verbatim; text outside every edit's span is left untouched.
///
/// # Returns
/// * `Ok(String)` - The modified source code
/// * `Err(EditError)` - If edits overlap or are out of bounds
pub fn apply_edits(source: &str, edits: &[Edit]) -> Result<String, EditError> {
    if edits.is_empty() {
        return Ok(source.to_string());
    }

    // Sort edits by start position (descending) for safe replacement
    let mut sorted_edits: Vec<&Edit> = edits.iter().collect();
    sorted_edits.sort_by(|a, b| b.start_offset().cmp(&a.start_offset()));

    let source_len = source.len();
    let mut prev_start: Option<usize> = None;

    for edit in &sorted_edits {
        let start = edit.start_offset();
        let end = edit.end_offset();

        if start > end || end > source_len {
            return Err(EditError::SpanOutOfBounds {
                start,
                end,
                len: source_len,
            });
        }

        if let Some(prev) = prev_start {
            if end > prev {
                return Err(EditError::OverlappingEdits(start));
            }
        }

        prev_start = Some(start);
    }

    let mut result = source.to_string();

    for edit in sorted_edits {
        result.replace_range(edit.start_offset()..edit.end_offset(), &edit.replacement);
    }

    Ok(result)
}

/// Keep only edits that do not overlap an earlier-starting edit
///
/// Used by hosts that run several rules over one file: the first edit
/// claiming a region wins, the rest wait for the next fix pass.
pub fn non_overlapping(edits: &[Edit]) -> Vec<Edit> {
    let mut sorted: Vec<&Edit> = edits.iter().collect();
    sorted.sort_by_key(|edit| (edit.start_offset(), edit.end_offset()));

    let mut kept: Vec<Edit> = Vec::new();
    let mut last_end = 0;

    for edit in sorted {
        if !kept.is_empty() && edit.start_offset() < last_end {
            continue;
        }
        last_end = edit.end_offset();
        kept.push(edit.clone());
    }

    kept
}
