//! Comparison of sorting nodes under an ordering policy

use std::cmp::Ordering;

use super::{SortOptions, SortOrder, SortType, SortingNode};

/// Total order of two nodes under `options`
///
/// Every sort type breaks ties on the raw name, so two nodes compare
/// `Equal` only when their names are identical.
pub fn compare(a: &SortingNode<'_>, b: &SortingNode<'_>, options: &SortOptions) -> Ordering {
    let ordering = match options.sort_type {
        SortType::Alphabetical => a.name.cmp(b.name),
        SortType::Natural => natural_cmp(a.name, b.name),
        SortType::LineLength => a.size.cmp(&b.size).then_with(|| a.name.cmp(b.name)),
    };

    match options.order {
        SortOrder::Asc => ordering,
        SortOrder::Desc => ordering.reverse(),
    }
}

/// Whether `second` has to move before `first`
pub fn violates_order(
    first: &SortingNode<'_>,
    second: &SortingNode<'_>,
    options: &SortOptions,
) -> bool {
    compare(first, second, options) == Ordering::Greater
}

/// Compare two strings treating runs of ASCII digits as numbers
///
/// `item2` sorts before `item10`. Leading zeros do not change a run's value;
/// strings equal run by run fall back to byte-wise comparison.
pub fn natural_cmp(a: &str, b: &str) -> Ordering {
    let mut left = Runs::new(a);
    let mut right = Runs::new(b);

    loop {
        match (left.next(), right.next()) {
            (None, None) => return a.cmp(b),
            (None, Some(_)) => return Ordering::Less,
            (Some(_), None) => return Ordering::Greater,
            (Some(x), Some(y)) => match compare_runs(x, y) {
                Ordering::Equal => continue,
                other => return other,
            },
        }
    }
}

fn compare_runs(x: &str, y: &str) -> Ordering {
    if is_digit_run(x) && is_digit_run(y) {
        let x = x.trim_start_matches('0');
        let y = y.trim_start_matches('0');
        // Same digit count without leading zeros: byte order is numeric order
        x.len().cmp(&y.len()).then_with(|| x.cmp(y))
    } else {
        x.cmp(y)
    }
}

fn is_digit_run(run: &str) -> bool {
    run.as_bytes().first().is_some_and(u8::is_ascii_digit)
}

/// Splits a string into alternating digit and non-digit runs
struct Runs<'s> {
    rest: &'s str,
}

impl<'s> Runs<'s> {
    fn new(s: &'s str) -> Self {
        Self { rest: s }
    }
}

impl<'s> Iterator for Runs<'s> {
    type Item = &'s str;

    fn next(&mut self) -> Option<&'s str> {
        let first = *self.rest.as_bytes().first()?;
        let digits = first.is_ascii_digit();
        let len = self
            .rest
            .bytes()
            .position(|b| b.is_ascii_digit() != digits)
            .unwrap_or(self.rest.len());

        // ASCII digit boundaries are always char boundaries
        let (run, rest) = self.rest.split_at(len);
        self.rest = rest;
        Some(run)
    }
}
