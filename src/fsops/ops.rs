//! File operations core
//!
//! Implements the file-editing operations exposed as MCP tools. All
//! validation lives here so the tool layer only formats results.

use std::path::Path;

use regex::RegexBuilder;

use crate::config::Config;
use crate::error::{FileOpError, Result, ValidationError};
use crate::fsops::types::{
    CreateReport, LineReplacement, LuaCheck, MatchKind, NumberedLine, ReadWindow, ReplaceReport,
    SearchMatch, SearchReport,
};
use crate::syntax::SyntaxChecker;

/// File operations backing the MCP tools
pub struct FileOps {
    config: Config,
}

impl FileOps {
    /// Create a new operations core
    pub fn new(config: Config) -> Self {
        Self { config }
    }

    /// Operational limits in effect
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Read a window of lines from a UTF-8 text file
    pub fn read_window(&self, path: &str, start_line: i64, count: i64) -> Result<ReadWindow> {
        require_existing_file(path)?;

        if start_line < 1 {
            return Err(ValidationError::StartLineTooSmall.into());
        }
        if count < 1 {
            return Err(ValidationError::CountTooSmall.into());
        }
        let max = self.config.max_read_lines;
        if count as usize > max {
            return Err(ValidationError::CountTooLarge { max }.into());
        }

        let content = read_utf8(path)?;
        let lines: Vec<&str> = content.lines().collect();
        let total_lines = lines.len();

        let start_line = start_line as usize;
        let count = count as usize;

        if start_line > total_lines {
            return Err(ValidationError::StartBeyondEof {
                start_line,
                total_lines,
            }
            .into());
        }

        let end_line = (start_line + count - 1).min(total_lines);
        let selected = lines[start_line - 1..end_line]
            .iter()
            .enumerate()
            .map(|(i, line)| NumberedLine {
                number: start_line + i,
                content: (*line).to_string(),
            })
            .collect();

        tracing::debug!(path, start_line, end_line, "read window");

        Ok(ReadWindow {
            path: path.to_string(),
            total_lines,
            start_line,
            end_line,
            requested: count,
            lines: selected,
        })
    }

    /// Create a file, making missing parent directories as needed
    pub fn create_file(&self, path: &str, content: &str) -> Result<CreateReport> {
        if path.is_empty() {
            return Err(ValidationError::EmptyPath.into());
        }

        let target = Path::new(path);
        let mut created_dirs = Vec::new();

        if let Some(dir) = target.parent() {
            if !dir.as_os_str().is_empty() && !dir.exists() {
                std::fs::create_dir_all(dir).map_err(|e| map_dir_error(dir, e))?;
                created_dirs.push(dir.display().to_string());
            }
        }

        let overwrote = if target.exists() {
            if !target.is_file() {
                return Err(FileOpError::OccupiedByNonFile {
                    path: path.to_string(),
                }
                .into());
            }
            true
        } else {
            false
        };

        std::fs::write(target, content).map_err(|e| map_write_error(path, e))?;

        tracing::info!(path, bytes = content.len(), overwrote, "created file");

        Ok(CreateReport {
            path: path.to_string(),
            size_bytes: content.len() as u64,
            overwrote,
            created_dirs,
            syntax: lua_check(path, content),
        })
    }

    /// Replace lines by number, extending the file when a replacement
    /// targets a line beyond the current end
    pub fn replace_lines(
        &self,
        path: &str,
        replacements: &[LineReplacement],
    ) -> Result<ReplaceReport> {
        require_existing_file(path)?;

        if replacements.is_empty() {
            return Err(ValidationError::EmptyReplacements.into());
        }

        // Validate line numbers before touching the file
        let mut seen = std::collections::HashSet::new();
        let mut validated: Vec<(usize, &str)> = Vec::with_capacity(replacements.len());
        for (i, item) in replacements.iter().enumerate() {
            if item.line < 1 {
                return Err(ValidationError::LineNumberTooSmall {
                    index: i + 1,
                    line: item.line,
                }
                .into());
            }
            let line = item.line as usize;
            if !seen.insert(line) {
                return Err(ValidationError::DuplicateLineNumber { line }.into());
            }
            validated.push((line, item.code.as_str()));
        }

        let content = read_utf8(path)?;

        // Keep original line endings on untouched lines
        let mut new_lines: Vec<String> = content.split_inclusive('\n').map(String::from).collect();
        let original_lines = new_lines.len();

        let max_line = validated.iter().map(|(line, _)| *line).max().unwrap_or(0);
        let added_lines = max_line.saturating_sub(original_lines);
        for _ in 0..added_lines {
            new_lines.push("\n".to_string());
        }

        // Highest line first, so earlier replacements never shift later ones
        validated.sort_by(|a, b| b.0.cmp(&a.0));

        for (line, code) in &validated {
            let mut code = (*code).to_string();
            if !code.ends_with('\n') {
                code.push('\n');
            }
            new_lines[line - 1] = code;
        }

        let new_content = new_lines.concat();
        std::fs::write(path, &new_content).map_err(|e| map_write_error(path, e))?;

        tracing::info!(path, replaced = validated.len(), added_lines, "replaced lines");

        Ok(ReplaceReport {
            path: path.to_string(),
            original_lines,
            added_lines,
            replaced: validated.len(),
            syntax: lua_check(path, &new_content),
        })
    }

    /// Search a file line by line, exact or regex
    pub fn search(
        &self,
        path: &str,
        search_text: &str,
        match_kind: MatchKind,
        case_sensitive: bool,
    ) -> Result<SearchReport> {
        if path.is_empty() {
            return Err(ValidationError::EmptyPath.into());
        }
        if search_text.is_empty() {
            return Err(ValidationError::EmptySearchText.into());
        }
        require_existing_file(path)?;

        // Search tolerates non-UTF-8 content by decoding lossily
        let bytes = std::fs::read(path).map_err(|e| map_read_error(path, e))?;
        let content = String::from_utf8_lossy(&bytes);

        let pattern = match match_kind {
            MatchKind::Regex => Some(
                RegexBuilder::new(search_text)
                    .case_insensitive(!case_sensitive)
                    .build()
                    .map_err(|e| ValidationError::InvalidRegex {
                        message: e.to_string(),
                    })?,
            ),
            MatchKind::Exact => None,
        };
        let needle_lower = search_text.to_lowercase();

        let mut all_matches = Vec::new();
        let mut total_lines = 0;
        for (i, line) in content.lines().enumerate() {
            total_lines += 1;
            let hit = match &pattern {
                Some(re) => re.is_match(line),
                None if case_sensitive => line.contains(search_text),
                None => line.to_lowercase().contains(&needle_lower),
            };
            if hit {
                all_matches.push(SearchMatch {
                    line: i + 1,
                    content: line.to_string(),
                });
            }
        }

        let total_matches = all_matches.len();
        all_matches.truncate(self.config.max_search_results);

        tracing::debug!(path, total_matches, "search complete");

        Ok(SearchReport {
            path: path.to_string(),
            total_lines,
            search_text: search_text.to_string(),
            match_kind,
            case_sensitive,
            total_matches,
            matches: all_matches,
        })
    }
}

/// Run the automatic Lua check for write operations
fn lua_check(path: &str, content: &str) -> LuaCheck {
    let is_lua = Path::new(path)
        .extension()
        .map(|ext| ext.eq_ignore_ascii_case("lua"))
        .unwrap_or(false);
    if !is_lua {
        return LuaCheck::NotApplicable;
    }
    if content.trim().is_empty() {
        return LuaCheck::SkippedBlank;
    }
    match SyntaxChecker::check(content, "lua") {
        Ok(report) => LuaCheck::Checked(report),
        Err(e) => LuaCheck::Failed(e.to_string()),
    }
}

/// Require a non-empty path naming an existing regular file
fn require_existing_file(path: &str) -> Result<()> {
    if path.is_empty() {
        return Err(ValidationError::EmptyPath.into());
    }
    let target = Path::new(path);
    if !target.exists() {
        return Err(FileOpError::NotFound {
            path: path.to_string(),
        }
        .into());
    }
    if !target.is_file() {
        return Err(FileOpError::NotAFile {
            path: path.to_string(),
        }
        .into());
    }
    Ok(())
}

/// Read a file, requiring valid UTF-8 content
fn read_utf8(path: &str) -> Result<String> {
    let bytes = std::fs::read(path).map_err(|e| map_read_error(path, e))?;
    String::from_utf8(bytes).map_err(|_| {
        FileOpError::NotUtf8 {
            path: path.to_string(),
        }
        .into()
    })
}

fn map_read_error(path: &str, e: std::io::Error) -> crate::error::CodeOpsError {
    match e.kind() {
        std::io::ErrorKind::PermissionDenied => FileOpError::PermissionDenied {
            path: path.to_string(),
        }
        .into(),
        _ => FileOpError::ReadFailed {
            path: path.to_string(),
            message: e.to_string(),
        }
        .into(),
    }
}

fn map_write_error(path: &str, e: std::io::Error) -> crate::error::CodeOpsError {
    match e.kind() {
        std::io::ErrorKind::PermissionDenied => FileOpError::PermissionDenied {
            path: path.to_string(),
        }
        .into(),
        _ => FileOpError::WriteFailed {
            path: path.to_string(),
            message: e.to_string(),
        }
        .into(),
    }
}

fn map_dir_error(dir: &Path, e: std::io::Error) -> crate::error::CodeOpsError {
    match e.kind() {
        std::io::ErrorKind::PermissionDenied => FileOpError::PermissionDenied {
            path: dir.display().to_string(),
        }
        .into(),
        _ => FileOpError::DirCreationFailed {
            path: dir.display().to_string(),
            message: e.to_string(),
        }
        .into(),
    }
}
