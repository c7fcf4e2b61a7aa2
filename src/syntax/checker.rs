//! Syntax checker built on tree-sitter
//!
//! Walks the parse tree for error and missing nodes and reports them with
//! 1-based line and column positions. Only Lua is wired up; other language
//! names produce a descriptive error rather than a panic.

use crate::error::{Result, SyntaxError};

/// Kind of a reported syntax issue
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IssueKind {
    /// An ERROR node in the parse tree
    SyntaxError,

    /// A node the parser inserted to recover (missing token)
    MissingNode,

    /// A binary expression the parser could not complete
    IncompleteExpression,

    /// The tree reports an error that could not be localized
    General,
}

/// One syntax issue found in the checked code
#[derive(Debug, Clone)]
pub struct SyntaxIssue {
    /// 1-based line of the issue
    pub line: usize,

    /// 1-based column of the issue
    pub column: usize,

    /// Human-readable description
    pub message: String,

    /// Issue classification
    pub kind: IssueKind,
}

/// Result of a syntax check
#[derive(Debug, Clone)]
pub struct SyntaxReport {
    /// Language that was checked
    pub language: String,

    /// True when no issues were found
    pub is_valid: bool,

    /// Issues in source order of discovery
    pub issues: Vec<SyntaxIssue>,
}

/// Static syntax checker
pub struct SyntaxChecker;

impl SyntaxChecker {
    /// Check code in the named language
    pub fn check(code: &str, language: &str) -> Result<SyntaxReport> {
        match language.to_ascii_lowercase().as_str() {
            "lua" => Self::check_lua(code),
            other => Err(SyntaxError::UnsupportedLanguage {
                language: other.to_string(),
            }
            .into()),
        }
    }

    /// Check Lua code
    pub fn check_lua(code: &str) -> Result<SyntaxReport> {
        let mut parser = tree_sitter::Parser::new();
        parser
            .set_language(&tree_sitter_lua::LANGUAGE.into())
            .map_err(|e| SyntaxError::ParserInit {
                language: "lua".to_string(),
                message: e.to_string(),
            })?;

        let tree = parser
            .parse(code, None)
            .ok_or_else(|| SyntaxError::ParseFailed {
                language: "lua".to_string(),
            })?;

        let lines: Vec<&str> = code.split('\n').collect();
        let mut issues = Vec::new();
        collect_issues(tree.root_node(), &lines, &mut issues);

        // The tree can carry an error flag even when no ERROR or missing
        // node was reachable from the walk
        if issues.is_empty() && tree.root_node().has_error() {
            issues.push(SyntaxIssue {
                line: 1,
                column: 1,
                message: "Code contains syntax errors that could not be precisely located"
                    .to_string(),
                kind: IssueKind::General,
            });
        }

        Ok(SyntaxReport {
            language: "lua".to_string(),
            is_valid: issues.is_empty(),
            issues,
        })
    }

    /// Languages with a wired-up grammar
    pub fn supported_languages() -> &'static [&'static str] {
        &["lua"]
    }
}

/// Recursively collect issues from the parse tree
fn collect_issues(node: tree_sitter::Node, lines: &[&str], issues: &mut Vec<SyntaxIssue>) {
    let start = node.start_position();

    if node.is_error() {
        let snippet = error_snippet(&node, lines);
        let location = format!("line {}, column {}", start.row + 1, start.column + 1);
        let message = if snippet.trim().is_empty() {
            format!("Syntax error at {}", location)
        } else {
            format!("Syntax error at {}: '{}'", location, snippet)
        };
        issues.push(SyntaxIssue {
            line: start.row + 1,
            column: start.column + 1,
            message,
            kind: IssueKind::SyntaxError,
        });
    }

    if node.is_missing() {
        issues.push(SyntaxIssue {
            line: start.row + 1,
            column: start.column + 1,
            message: format!(
                "Missing {} at line {}, column {}",
                node.kind(),
                start.row + 1,
                start.column + 1
            ),
            kind: IssueKind::MissingNode,
        });
    }

    if node.kind() == "binary_expression" && node.child_count() < 3 {
        issues.push(SyntaxIssue {
            line: start.row + 1,
            column: start.column + 1,
            message: format!(
                "Incomplete binary expression at line {}, column {}",
                start.row + 1,
                start.column + 1
            ),
            kind: IssueKind::IncompleteExpression,
        });
    }

    let mut cursor = node.walk();
    for child in node.children(&mut cursor) {
        collect_issues(child, lines, issues);
    }
}

/// Source text under an error node, limited to its first line
fn error_snippet(node: &tree_sitter::Node, lines: &[&str]) -> String {
    let start = node.start_position();
    let end = node.end_position();

    let Some(line) = lines.get(start.row) else {
        return String::new();
    };
    if start.column >= line.len() {
        return String::new();
    }
    let slice_end = if end.row == start.row {
        end.column.min(line.len())
    } else {
        line.len()
    };
    line.get(start.column..slice_end).unwrap_or("").to_string()
}
