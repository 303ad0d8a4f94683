//! unisort-core: Host-side primitives for PHP union type checking
//!
//! This crate provides:
//! - `Edit`: A span-based code modification
//! - `apply_edits()`: Function to apply non-overlapping edits verbatim
//! - `Diagnostic`: A rule violation with an optional attached fix
//! - `Visitor`: Trait for reaching every type hint of a PHP AST

mod diagnostic;
mod edit;
pub mod visitor;

pub use diagnostic::Diagnostic;
pub use edit::{apply_edits, non_overlapping, Edit, EditError};
pub use visitor::{visit, Visitor};
