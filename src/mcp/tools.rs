//! MCP Tool definitions and handlers
//!
//! Defines all available tools and their implementations. Every tool
//! converts failures into an error result; nothing here may take the
//! server process down.

use std::sync::Arc;

use serde::Deserialize;
use serde_json::{json, Value};

use crate::fsops::ops::FileOps;
use crate::fsops::types::{
    CreateReport, LineReplacement, LuaCheck, MatchKind, ReadWindow, ReplaceReport, SearchReport,
};
use crate::mcp::types::{CallToolResult, Tool};

/// Tool handler
pub struct ToolHandler {
    file_ops: Arc<FileOps>,
}

impl ToolHandler {
    /// Create a new tool handler
    pub fn new(file_ops: Arc<FileOps>) -> Self {
        Self { file_ops }
    }

    /// List all available tools
    pub fn list_tools(&self) -> Vec<Tool> {
        vec![
            tool_def(
                "read_text_file",
                "Reads a UTF-8 text file and returns line-numbered content",
                read_text_file_schema(),
            ),
            tool_def(
                "create_file",
                "Creates a file at the given path, creating missing parent directories; Lua files are syntax-checked",
                create_file_schema(),
            ),
            tool_def(
                "replace_code_by_line",
                "Replaces specific lines of a file by line number, extending the file when a line number is beyond the end",
                replace_code_by_line_schema(),
            ),
            tool_def(
                "search_in_file",
                "Searches a file for a string or regular expression and returns matching lines with line numbers",
                search_in_file_schema(),
            ),
        ]
    }

    /// Call a tool by name
    pub async fn call_tool(&self, name: &str, args: Value) -> CallToolResult {
        match name {
            "read_text_file" => self.handle_read_text_file(args).await,
            "create_file" => self.handle_create_file(args).await,
            "replace_code_by_line" => self.handle_replace_code_by_line(args).await,
            "search_in_file" => self.handle_search_in_file(args).await,
            _ => CallToolResult::error(format!("Unknown tool: {}", name)),
        }
    }

    // ==================== Tool Handlers ====================

    async fn handle_read_text_file(&self, args: Value) -> CallToolResult {
        #[derive(Deserialize)]
        struct Args {
            file_path: String,
            start_line: Option<i64>,
            count: Option<i64>,
        }

        let args: Args = match serde_json::from_value(args) {
            Ok(a) => a,
            Err(e) => return CallToolResult::error(format!("Invalid arguments: {}", e)),
        };

        let default_count = self.file_ops.config().max_read_lines as i64;
        let start_line = args.start_line.unwrap_or(1);
        let count = args.count.unwrap_or(default_count);

        match self.file_ops.read_window(&args.file_path, start_line, count) {
            Ok(window) => CallToolResult::text(format_read_window(&window)),
            Err(e) => CallToolResult::error(e.to_string()),
        }
    }

    async fn handle_create_file(&self, args: Value) -> CallToolResult {
        #[derive(Deserialize)]
        struct Args {
            file_path: String,
            #[serde(default)]
            content: String,
        }

        let args: Args = match serde_json::from_value(args) {
            Ok(a) => a,
            Err(e) => return CallToolResult::error(format!("Invalid arguments: {}", e)),
        };

        match self.file_ops.create_file(&args.file_path, &args.content) {
            Ok(report) => CallToolResult::text(format_create_report(&report)),
            Err(e) => CallToolResult::error(e.to_string()),
        }
    }

    async fn handle_replace_code_by_line(&self, args: Value) -> CallToolResult {
        #[derive(Deserialize)]
        struct Args {
            file_path: String,
            replacements: Vec<LineReplacement>,
        }

        let args: Args = match serde_json::from_value(args) {
            Ok(a) => a,
            Err(e) => return CallToolResult::error(format!("Invalid arguments: {}", e)),
        };

        match self
            .file_ops
            .replace_lines(&args.file_path, &args.replacements)
        {
            Ok(report) => CallToolResult::text(format_replace_report(&report)),
            Err(e) => CallToolResult::error(e.to_string()),
        }
    }

    async fn handle_search_in_file(&self, args: Value) -> CallToolResult {
        #[derive(Deserialize)]
        struct Args {
            file_path: String,
            search_text: String,
            match_type: Option<String>,
            case_sensitive: Option<bool>,
        }

        let args: Args = match serde_json::from_value(args) {
            Ok(a) => a,
            Err(e) => return CallToolResult::error(format!("Invalid arguments: {}", e)),
        };

        let match_kind = match MatchKind::parse(args.match_type.as_deref().unwrap_or("exact")) {
            Ok(kind) => kind,
            Err(e) => return CallToolResult::error(e.to_string()),
        };

        match self.file_ops.search(
            &args.file_path,
            &args.search_text,
            match_kind,
            args.case_sensitive.unwrap_or(false),
        ) {
            Ok(report) => CallToolResult::text(format_search_report(&report)),
            Err(e) => CallToolResult::error(e.to_string()),
        }
    }
}

// ==================== Report Formatting ====================

fn format_read_window(window: &ReadWindow) -> String {
    let mut text = format!(
        "File path: {}\nTotal lines: {}\nShowing lines: {}-{}\n{}\n",
        window.path,
        window.total_lines,
        window.start_line,
        window.end_line,
        "-".repeat(50)
    );

    let numbered: Vec<String> = window
        .lines
        .iter()
        .map(|line| format!("{}: {}", line.number, line.content))
        .collect();
    text.push_str(&numbered.join("\n"));

    if window.ended_early() {
        text.push_str(&format!(
            "\n\nNote: the file has fewer lines than requested; read {} lines",
            window.lines.len()
        ));
    }

    text
}

fn format_create_report(report: &CreateReport) -> String {
    let mut lines = vec![
        "File created successfully".to_string(),
        format!("File path: {}", report.path),
        format!("File size: {} bytes", report.size_bytes),
    ];

    if report.overwrote {
        lines.push("Overwrote existing file".to_string());
    } else {
        lines.push("Created new file".to_string());
    }

    if !report.created_dirs.is_empty() {
        lines.push(format!(
            "Created directories: {}",
            report.created_dirs.join(", ")
        ));
    }

    append_lua_check(&mut lines, &report.syntax);
    lines.join("\n")
}

fn format_replace_report(report: &ReplaceReport) -> String {
    let mut lines = vec![
        "Replacement complete".to_string(),
        format!("File path: {}", report.path),
        format!("Original line count: {}", report.original_lines),
    ];

    if report.added_lines > 0 {
        lines.push(format!("Lines added: {}", report.added_lines));
        lines.push(format!("New line count: {}", report.total_lines()));
    }

    lines.push(format!("Lines replaced: {}", report.replaced));

    append_lua_check(&mut lines, &report.syntax);
    lines.join("\n")
}

fn format_search_report(report: &SearchReport) -> String {
    let mut lines = vec![
        format!("File path: {}", report.path),
        format!("Total lines: {}", report.total_lines),
        format!("Search text: \"{}\"", report.search_text),
        format!("Match type: {}", report.match_kind.as_str()),
        format!(
            "Case sensitive: {}",
            if report.case_sensitive { "yes" } else { "no" }
        ),
        format!("Total matches: {}", report.total_matches),
    ];

    let hidden = report.hidden_matches();
    if hidden > 0 {
        lines.push(format!(
            "Showing {} matches ({} more not shown)",
            report.matches.len(),
            hidden
        ));
    }

    lines.push(String::new());

    if report.matches.is_empty() {
        lines.push("No matches found".to_string());
    } else {
        lines.push("Matches:".to_string());
        for m in &report.matches {
            lines.push(format!("line {}: {}", m.line, m.content));
        }
        if hidden > 0 {
            lines.push(String::new());
            lines.push(format!(
                "Note: only the first {} matching lines are shown",
                report.matches.len()
            ));
        }
    }

    lines.push(String::new());
    lines.push("Search complete".to_string());
    lines.join("\n")
}

fn append_lua_check(lines: &mut Vec<String>, check: &LuaCheck) {
    match check {
        LuaCheck::NotApplicable => {}
        LuaCheck::SkippedBlank => {
            lines.push(String::new());
            lines.push("Empty Lua file, syntax check skipped".to_string());
        }
        LuaCheck::Checked(report) => {
            lines.push(String::new());
            lines.push("Lua syntax check:".to_string());
            if report.is_valid {
                lines.push("Syntax OK".to_string());
            } else {
                lines.push("Syntax errors found:".to_string());
                for issue in &report.issues {
                    lines.push(format!("- {}", issue.message));
                }
            }
        }
        LuaCheck::Failed(message) => {
            lines.push(String::new());
            lines.push(format!("Syntax check failed: {}", message));
        }
    }
}

// ==================== Schema Definitions ====================

fn tool_def(name: &str, description: &str, input_schema: Value) -> Tool {
    Tool {
        name: name.to_string(),
        description: Some(description.to_string()),
        input_schema,
    }
}

fn read_text_file_schema() -> Value {
    json!({
        "type": "object",
        "properties": {
            "file_path": {
                "type": "string",
                "description": "Full path of the file to read"
            },
            "start_line": {
                "type": "integer",
                "description": "First line to read (1-based, default 1)"
            },
            "count": {
                "type": "integer",
                "description": "Number of lines to read, at most 100 (default 100)"
            }
        },
        "required": ["file_path"]
    })
}

fn create_file_schema() -> Value {
    json!({
        "type": "object",
        "properties": {
            "file_path": {
                "type": "string",
                "description": "Full path of the file to create; missing parent directories are created automatically"
            },
            "content": {
                "type": "string",
                "description": "Content to write, may be an empty string"
            }
        },
        "required": ["file_path"]
    })
}

fn replace_code_by_line_schema() -> Value {
    json!({
        "type": "object",
        "properties": {
            "file_path": {
                "type": "string",
                "description": "Full path of the file to edit"
            },
            "replacements": {
                "type": "array",
                "description": "Replacement list; each item needs both required fields: line (1-based line number) and code (new line content). Line numbers must be unique; numbers beyond the end of the file extend it with blank lines.",
                "items": {
                    "type": "object",
                    "properties": {
                        "line": {
                            "type": "integer",
                            "description": "Line number to replace (1-based)"
                        },
                        "code": {
                            "type": "string",
                            "description": "New content for the line"
                        }
                    },
                    "required": ["line", "code"]
                }
            }
        },
        "required": ["file_path", "replacements"]
    })
}

fn search_in_file_schema() -> Value {
    json!({
        "type": "object",
        "properties": {
            "file_path": {
                "type": "string",
                "description": "Full path of the file to search"
            },
            "search_text": {
                "type": "string",
                "description": "String or regular expression to search for"
            },
            "match_type": {
                "type": "string",
                "enum": ["exact", "regex"],
                "description": "Match type: 'exact' (substring) or 'regex' (default 'exact')"
            },
            "case_sensitive": {
                "type": "boolean",
                "description": "Whether matching is case sensitive (default false)"
            }
        },
        "required": ["file_path", "search_text"]
    })
}
