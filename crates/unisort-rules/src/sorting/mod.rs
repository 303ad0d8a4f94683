//! Ordering of sibling nodes: comparison, violation scanning and reordering
//!
//! The functions here never look at the AST. They work on [`SortingNode`]s,
//! byte-range views over the source text built by a rule from the sibling
//! nodes it wants ordered.

mod compare;
mod fix;
mod scan;

pub use compare::{compare, natural_cmp, violates_order};
pub use fix::{build_fix, sorted_indices, Fix, FixError};
pub use scan::{scan, Violation};

use serde::Deserialize;
use std::fmt;
use std::ops::Range;
use std::str::FromStr;
use thiserror::Error;

/// One sibling node, seen through its source text
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SortingNode<'s> {
    /// Exact source text spanned by the node
    pub name: &'s str,
    /// Byte length of the node's range
    pub size: usize,
    /// Byte offsets of the node in the source
    pub range: Range<usize>,
}

impl<'s> SortingNode<'s> {
    /// Build a node from its byte range in `source`
    ///
    /// A range that does not fall on the source yields an empty name.
    pub fn from_range(source: &'s str, range: Range<usize>) -> Self {
        Self {
            name: source.get(range.clone()).unwrap_or_default(),
            size: range.end.saturating_sub(range.start),
            range,
        }
    }
}

/// How names are compared
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SortType {
    /// Ordinal byte-wise comparison
    #[default]
    Alphabetical,
    /// Digit runs compared by numeric value
    Natural,
    /// Shorter first, ties broken alphabetically
    LineLength,
}

/// Direction of the ordering
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    #[default]
    #[serde(alias = "ascending")]
    Asc,
    #[serde(alias = "descending")]
    Desc,
}

/// Ordering policy applied to one list of siblings
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SortOptions {
    #[serde(rename = "type")]
    pub sort_type: SortType,
    pub order: SortOrder,
}

impl SortOptions {
    pub fn new(sort_type: SortType, order: SortOrder) -> Self {
        Self { sort_type, order }
    }
}

/// Unrecognized option value
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("invalid {kind} '{value}', expected one of: {expected}")]
pub struct ParseOptionError {
    kind: &'static str,
    value: String,
    expected: &'static str,
}

impl FromStr for SortType {
    type Err = ParseOptionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "alphabetical" => Ok(SortType::Alphabetical),
            "natural" => Ok(SortType::Natural),
            "line-length" => Ok(SortType::LineLength),
            _ => Err(ParseOptionError {
                kind: "sort type",
                value: s.to_string(),
                expected: "alphabetical, natural, line-length",
            }),
        }
    }
}

impl FromStr for SortOrder {
    type Err = ParseOptionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "asc" | "ascending" => Ok(SortOrder::Asc),
            "desc" | "descending" => Ok(SortOrder::Desc),
            _ => Err(ParseOptionError {
                kind: "sort order",
                value: s.to_string(),
                expected: "asc, desc",
            }),
        }
    }
}

impl fmt::Display for SortType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            SortType::Alphabetical => "alphabetical",
            SortType::Natural => "natural",
            SortType::LineLength => "line-length",
        })
    }
}

impl fmt::Display for SortOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            SortOrder::Asc => "asc",
            SortOrder::Desc => "desc",
        })
    }
}
