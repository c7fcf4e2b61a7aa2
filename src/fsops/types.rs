//! File operation result types
//!
//! Plain data carried from the operations core to the tool layer, which
//! renders them as text reports.

use serde::{Deserialize, Serialize};

use crate::error::{Result, ValidationError};
use crate::syntax::SyntaxReport;

/// One numbered line of file content
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NumberedLine {
    /// 1-based line number
    pub number: usize,

    /// Line content without the trailing newline
    pub content: String,
}

/// A window of lines read from a file
#[derive(Debug, Clone)]
pub struct ReadWindow {
    /// Path the window was read from
    pub path: String,

    /// Total number of lines in the file
    pub total_lines: usize,

    /// First line of the window (1-based)
    pub start_line: usize,

    /// Last line of the window (1-based, inclusive)
    pub end_line: usize,

    /// Number of lines that were requested
    pub requested: usize,

    /// The selected lines
    pub lines: Vec<NumberedLine>,
}

impl ReadWindow {
    /// Whether the file ended before the requested number of lines
    pub fn ended_early(&self) -> bool {
        self.lines.len() < self.requested
    }
}

/// Outcome of the automatic Lua check attached to write operations
#[derive(Debug, Clone)]
pub enum LuaCheck {
    /// Not a Lua file, no check performed
    NotApplicable,

    /// Lua file with blank content, check skipped
    SkippedBlank,

    /// Check ran and produced a report
    Checked(SyntaxReport),

    /// Check could not be run
    Failed(String),
}

/// Result of creating a file
#[derive(Debug, Clone)]
pub struct CreateReport {
    /// Path of the created file
    pub path: String,

    /// Size of the written content in bytes
    pub size_bytes: u64,

    /// Whether an existing file was overwritten
    pub overwrote: bool,

    /// Directories that had to be created
    pub created_dirs: Vec<String>,

    /// Lua syntax check outcome
    pub syntax: LuaCheck,
}

/// One line replacement request
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LineReplacement {
    /// Target line number (1-based)
    pub line: i64,

    /// New line content
    pub code: String,
}

/// Result of a batch line replacement
#[derive(Debug, Clone)]
pub struct ReplaceReport {
    /// Path of the edited file
    pub path: String,

    /// Line count before the edit
    pub original_lines: usize,

    /// Blank lines appended to fit replacements beyond the end of the file
    pub added_lines: usize,

    /// Number of lines replaced
    pub replaced: usize,

    /// Lua syntax check outcome
    pub syntax: LuaCheck,
}

impl ReplaceReport {
    /// Line count after the edit
    pub fn total_lines(&self) -> usize {
        self.original_lines + self.added_lines
    }
}

/// How search text is matched against each line
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchKind {
    /// Substring containment
    Exact,

    /// Regular expression search
    Regex,
}

impl MatchKind {
    /// Parse the wire value ("exact" or "regex")
    pub fn parse(value: &str) -> Result<Self> {
        match value {
            "exact" => Ok(MatchKind::Exact),
            "regex" => Ok(MatchKind::Regex),
            other => Err(ValidationError::InvalidMatchType {
                value: other.to_string(),
            }
            .into()),
        }
    }

    /// Wire name of the match kind
    pub fn as_str(&self) -> &'static str {
        match self {
            MatchKind::Exact => "exact",
            MatchKind::Regex => "regex",
        }
    }
}

/// One matching line from a search
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchMatch {
    /// 1-based line number of the match
    pub line: usize,

    /// Matching line content without the trailing newline
    pub content: String,
}

/// Result of a file search
#[derive(Debug, Clone)]
pub struct SearchReport {
    /// Path that was searched
    pub path: String,

    /// Total number of lines in the file
    pub total_lines: usize,

    /// The search text as given
    pub search_text: String,

    /// How the text was matched
    pub match_kind: MatchKind,

    /// Whether matching was case sensitive
    pub case_sensitive: bool,

    /// Total number of matching lines
    pub total_matches: usize,

    /// Matches shown in the report (capped)
    pub matches: Vec<SearchMatch>,
}

impl SearchReport {
    /// Matches beyond the display cap
    pub fn hidden_matches(&self) -> usize {
        self.total_matches - self.matches.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_match_kind_parse() {
        assert_eq!(MatchKind::parse("exact").unwrap(), MatchKind::Exact);
        assert_eq!(MatchKind::parse("regex").unwrap(), MatchKind::Regex);
        assert!(MatchKind::parse("fuzzy").is_err());
    }

    #[test]
    fn test_line_replacement_deserialize() {
        let json = r#"{"line": 3, "code": "local x = 1"}"#;
        let repl: LineReplacement = serde_json::from_str(json).unwrap();
        assert_eq!(repl.line, 3);
        assert_eq!(repl.code, "local x = 1");
    }

    #[test]
    fn test_read_window_ended_early() {
        let window = ReadWindow {
            path: "a.txt".to_string(),
            total_lines: 2,
            start_line: 1,
            end_line: 2,
            requested: 10,
            lines: vec![
                NumberedLine { number: 1, content: "a".to_string() },
                NumberedLine { number: 2, content: "b".to_string() },
            ],
        };
        assert!(window.ended_early());
    }
}
