//! Syntax checking module
//!
//! Tree-sitter based syntax error detection for code written through the
//! file tools.

pub mod checker;

pub use checker::{IssueKind, SyntaxChecker, SyntaxIssue, SyntaxReport};
