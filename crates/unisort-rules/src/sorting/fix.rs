//! Reordering fix construction
//!
//! The fix replaces the text from the first node's start to the last node's
//! end. Nodes move together with the comments attached to them on their own
//! line; the separators between nodes (operators, whitespace, line breaks,
//! comments standing on their own line) stay where they were.

use std::ops::Range;

use thiserror::Error;

use super::{compare, SortOptions, SortingNode};

/// A single replacement reordering one list of siblings
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Fix {
    /// First node's start to last node's end
    pub range: Range<usize>,
    pub replacement: String,
}

/// Node ranges that cannot be rewritten safely
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FixError {
    #[error("node range {start}..{end} is reversed")]
    ReversedRange { start: usize, end: usize },

    #[error("node range {start}..{end} out of bounds for source length {len}")]
    OutOfBounds { start: usize, end: usize, len: usize },

    #[error("node starting at offset {0} overlaps or precedes the previous node")]
    Unordered(usize),

    #[error("offset {0} is not on a character boundary")]
    NotCharBoundary(usize),
}

/// Node indices in target order: a stable sort under `options`
pub fn sorted_indices(nodes: &[SortingNode<'_>], options: &SortOptions) -> Vec<usize> {
    let mut order: Vec<usize> = (0..nodes.len()).collect();
    order.sort_by(|&a, &b| compare(&nodes[a], &nodes[b], options));
    order
}

/// Build the replacement that puts `nodes` in fully sorted order
///
/// Returns `Ok(None)` when the nodes are already sorted.
pub fn build_fix(
    nodes: &[SortingNode<'_>],
    source: &str,
    options: &SortOptions,
) -> Result<Option<Fix>, FixError> {
    validate_ranges(nodes, source)?;

    let order = sorted_indices(nodes, options);
    if order.iter().enumerate().all(|(slot, &index)| slot == index) {
        return Ok(None);
    }

    let (Some(first), Some(last)) = (nodes.first(), nodes.last()) else {
        return Ok(None);
    };

    let gaps: Vec<Gap<'_>> = nodes
        .windows(2)
        .map(|pair| Gap::split(&source[pair[0].range.end..pair[1].range.start]))
        .collect();

    let mut replacement = String::with_capacity(last.range.end - first.range.start + 1);

    for (slot, &index) in order.iter().enumerate() {
        replacement.push_str(&source[nodes[index].range.clone()]);

        let carried = gaps.get(index);
        let needs_break = carried.is_some_and(|gap| gap.line_comment);
        if let Some(gap) = carried {
            replacement.push_str(gap.attached);
        }

        let separator = gaps.get(slot).map_or("", |gap| gap.structural);
        if needs_break && !starts_with_line_break(separator) {
            replacement.push_str(line_break(&gaps));
        }
        replacement.push_str(separator);
    }

    Ok(Some(Fix {
        range: first.range.start..last.range.end,
        replacement,
    }))
}

fn validate_ranges(nodes: &[SortingNode<'_>], source: &str) -> Result<(), FixError> {
    let mut previous_end = 0;

    for node in nodes {
        let (start, end) = (node.range.start, node.range.end);

        if start > end {
            return Err(FixError::ReversedRange { start, end });
        }
        if end > source.len() {
            return Err(FixError::OutOfBounds {
                start,
                end,
                len: source.len(),
            });
        }
        if start < previous_end {
            return Err(FixError::Unordered(start));
        }
        if !source.is_char_boundary(start) {
            return Err(FixError::NotCharBoundary(start));
        }
        if !source.is_char_boundary(end) {
            return Err(FixError::NotCharBoundary(end));
        }

        previous_end = end;
    }

    Ok(())
}

/// Text between two adjacent nodes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Gap<'s> {
    /// Comments on the preceding node's line, before any operator
    attached: &'s str,
    /// Everything else, kept in place
    structural: &'s str,
    /// `attached` ends in a `//` or `#` comment
    line_comment: bool,
}

impl<'s> Gap<'s> {
    fn split(text: &'s str) -> Self {
        let mut pos = 0;
        let mut attached_end = 0;
        let mut line_comment = false;

        loop {
            pos += text[pos..]
                .bytes()
                .take_while(|b| matches!(b, b' ' | b'\t'))
                .count();
            let rest = &text[pos..];

            if let Some(body) = rest.strip_prefix("/*") {
                let Some(close) = body.find("*/") else {
                    break;
                };
                pos += 2 + close + 2;
                attached_end = pos;
            } else if rest.starts_with("//") || rest.starts_with('#') {
                pos += rest.find(|c: char| c == '\n' || c == '\r').unwrap_or(rest.len());
                attached_end = pos;
                line_comment = true;
                break;
            } else {
                break;
            }
        }

        let (attached, structural) = text.split_at(attached_end);
        Self {
            attached,
            structural,
            line_comment,
        }
    }
}

fn starts_with_line_break(text: &str) -> bool {
    text.starts_with('\n') || text.starts_with('\r')
}

/// The first line break found between nodes, with the indentation after it
fn line_break<'s>(gaps: &[Gap<'s>]) -> &'s str {
    gaps.iter()
        .find_map(|gap| {
            let text = gap.structural;
            let newline = text.find('\n')?;
            let start = if text[..newline].ends_with('\r') {
                newline - 1
            } else {
                newline
            };
            let indent = text[newline + 1..]
                .bytes()
                .take_while(|b| matches!(b, b' ' | b'\t'))
                .count();
            Some(&text[start..newline + 1 + indent])
        })
        .unwrap_or("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sorting::{scan, SortOrder, SortType};

    /// Locate `names` left to right in `source`
    fn nodes_in<'s>(source: &'s str, names: &[&str]) -> Vec<SortingNode<'s>> {
        let mut offset = 0;
        names
            .iter()
            .map(|name| {
                let start = offset + source[offset..].find(name).unwrap();
                offset = start + name.len();
                SortingNode::from_range(source, start..offset)
            })
            .collect()
    }

    fn fix(source: &str, names: &[&str], options: SortOptions) -> Option<Fix> {
        build_fix(&nodes_in(source, names), source, &options).unwrap()
    }

    fn fixed_text(source: &str, names: &[&str], options: SortOptions) -> String {
        let fix = fix(source, names, options).expect("expected a fix");
        let mut result = source.to_string();
        result.replace_range(fix.range, &fix.replacement);
        result
    }

    #[test]
    fn test_reorders_alternatives() {
        let source = "banana | apple | cherry";
        let fix = fix(source, &["banana", "apple", "cherry"], SortOptions::default()).unwrap();
        assert_eq!(fix.range, 0..source.len());
        assert_eq!(fix.replacement, "apple | banana | cherry");
    }

    #[test]
    fn test_already_sorted_has_no_fix() {
        let source = "apple|banana|cherry";
        assert_eq!(fix(source, &["apple", "banana", "cherry"], SortOptions::default()), None);
    }

    #[test]
    fn test_span_stops_at_first_and_last_node() {
        let source = "<?php function f(B|A $x) {}";
        let fix = fix(source, &["B", "A"], SortOptions::default()).unwrap();
        assert_eq!(&source[fix.range.clone()], "B|A");
        assert_eq!(fix.replacement, "A|B");
    }

    #[test]
    fn test_separators_stay_positional() {
        let source = "C  |  B|A";
        let result = fixed_text(source, &["C", "B", "A"], SortOptions::default());
        assert_eq!(result, "A  |  B|C");
    }

    #[test]
    fn test_block_comment_moves_with_node() {
        let source = "B /* bee */ | A";
        let result = fixed_text(source, &["B", "A"], SortOptions::default());
        assert_eq!(result, "A | B /* bee */");
    }

    #[test]
    fn test_comment_after_operator_stays() {
        let source = "B | /* x */ A";
        let result = fixed_text(source, &["B", "A"], SortOptions::default());
        assert_eq!(result, "A | /* x */ B");
    }

    #[test]
    fn test_line_comment_moving_last_gets_line_break() {
        let source = "B // bee\n    | A";
        let result = fixed_text(source, &["B", "A"], SortOptions::default());
        assert_eq!(result, "A\n    | B // bee\n    ");
    }

    #[test]
    fn test_line_comment_before_inline_separator_gets_line_break() {
        let source = "B // bee\n  | A | C";
        let result = fixed_text(source, &["B", "A", "C"], SortOptions::default());
        assert_eq!(result, "A\n  | B // bee\n   | C");
    }

    #[test]
    fn test_crlf_line_break() {
        let source = "B # bee\r\n\t| A";
        let result = fixed_text(source, &["B", "A"], SortOptions::default());
        assert_eq!(result, "A\r\n\t| B # bee\r\n\t");
    }

    #[test]
    fn test_natural_fix() {
        let source = "a10|a2|a1";
        let options = SortOptions::new(SortType::Natural, SortOrder::Asc);
        assert_eq!(fixed_text(source, &["a10", "a2", "a1"], options), "a1|a2|a10");

        let alphabetical = fixed_text(source, &["a10", "a2", "a1"], SortOptions::default());
        assert_eq!(alphabetical, "a1|a10|a2");
    }

    #[test]
    fn test_line_length_fix() {
        let source = "xx|x";
        let options = SortOptions::new(SortType::LineLength, SortOrder::Asc);
        assert_eq!(fixed_text(source, &["xx", "x"], options), "x|xx");
    }

    #[test]
    fn test_descending_fix() {
        let source = "a | c | b";
        let options = SortOptions::new(SortType::Alphabetical, SortOrder::Desc);
        assert_eq!(fixed_text(source, &["a", "c", "b"], options), "c | b | a");
    }

    #[test]
    fn test_fix_converges() {
        let source = "string|null|Foo|int|array";
        let names = ["string", "null", "Foo", "int", "array"];
        let result = fixed_text(source, &names, SortOptions::default());
        assert_eq!(result, "Foo|array|int|null|string");

        let resorted: Vec<&str> = result.split('|').collect();
        let nodes = nodes_in(&result, &resorted);
        assert!(scan(&nodes, &SortOptions::default()).is_empty());
    }

    #[test]
    fn test_sorted_indices_is_stable() {
        let source = "x|a|x";
        let nodes = vec![
            SortingNode::from_range(source, 0..1),
            SortingNode::from_range(source, 2..3),
            SortingNode::from_range(source, 4..5),
        ];
        assert_eq!(sorted_indices(&nodes, &SortOptions::default()), vec![1, 0, 2]);
    }

    #[test]
    fn test_malformed_ranges() {
        let source = "B|A";
        let overlapping = vec![
            SortingNode::from_range(source, 0..2),
            SortingNode::from_range(source, 1..3),
        ];
        assert_eq!(
            build_fix(&overlapping, source, &SortOptions::default()),
            Err(FixError::Unordered(1))
        );

        let out_of_bounds = vec![SortingNode::from_range(source, 2..9)];
        assert!(matches!(
            build_fix(&out_of_bounds, source, &SortOptions::default()),
            Err(FixError::OutOfBounds { .. })
        ));
    }

    #[test]
    fn test_multibyte_names() {
        // Byte order puts ASCII before any multi-byte character
        assert_eq!(fix("Zoë|Äpfel", &["Zoë", "Äpfel"], SortOptions::default()), None);

        let result = fixed_text("Äpfel | Zoë", &["Äpfel", "Zoë"], SortOptions::default());
        assert_eq!(result, "Zoë | Äpfel");
    }

    #[test]
    fn test_gap_split() {
        let gap = Gap::split(" /* a */ /* b */ | ");
        assert_eq!(gap.attached, " /* a */ /* b */");
        assert_eq!(gap.structural, " | ");
        assert!(!gap.line_comment);

        let gap = Gap::split(" | ");
        assert_eq!(gap.attached, "");
        assert_eq!(gap.structural, " | ");

        let gap = Gap::split(" // note\n | ");
        assert_eq!(gap.attached, " // note");
        assert_eq!(gap.structural, "\n | ");
        assert!(gap.line_comment);
    }
}
