//! Adjacent-pair violation scanning

use super::{violates_order, SortOptions, SortingNode};

/// An adjacent pair found out of order
///
/// Both fields index into the scanned node list; `second` is always
/// `first + 1` and is the node a diagnostic gets anchored at.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Violation {
    pub first: usize,
    pub second: usize,
}

/// Report every adjacent pair that violates `options`
///
/// This is a local check: `b | c | a` yields a single violation (`c`, `a`)
/// even though `a` is also out of place relative to `b`.
pub fn scan(nodes: &[SortingNode<'_>], options: &SortOptions) -> Vec<Violation> {
    nodes
        .windows(2)
        .enumerate()
        .filter(|(_, pair)| violates_order(&pair[0], &pair[1], options))
        .map(|(index, _)| Violation {
            first: index,
            second: index + 1,
        })
        .collect()
}
