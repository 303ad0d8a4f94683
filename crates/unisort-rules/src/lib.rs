//! unisort-rules: Rule implementations
//!
//! Available rules:
//! - sort_union_types: Sort the alternatives of union types (`B|A` to `A|B`)
//!
//! The ordering logic itself lives in [`sorting`] and works on byte ranges
//! of the source, independent of the PHP AST.

pub mod registry;
pub mod sort_union_types;
pub mod sorting;

pub use registry::{Rule, RuleRegistry, RulesOptions};
pub use sort_union_types::{check_sort_union_types, SortUnionTypesRule};
pub use sorting::{SortOptions, SortOrder, SortType};
