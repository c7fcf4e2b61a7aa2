//! Error types for the Code Operation MCP Server
//!
//! This module defines the error hierarchy for all operations in the server.

use thiserror::Error;

/// Main error type for the Code Operation MCP Server
#[derive(Error, Debug)]
pub enum CodeOpsError {
    /// File operation errors
    #[error("File operation error: {0}")]
    FileOp(#[from] FileOpError),

    /// Validation errors
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    /// Syntax checking errors
    #[error("Syntax check error: {0}")]
    Syntax(#[from] SyntaxError),

    /// MCP protocol errors
    #[error("MCP protocol error: {0}")]
    Mcp(#[from] McpError),

    /// I/O errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// File operation errors
#[derive(Error, Debug)]
pub enum FileOpError {
    #[error("File not found: {path}")]
    NotFound { path: String },

    #[error("Path is not a regular file: {path}")]
    NotAFile { path: String },

    #[error("Path exists and is not a regular file: {path}")]
    OccupiedByNonFile { path: String },

    #[error("Permission denied: {path}")]
    PermissionDenied { path: String },

    #[error("File is not valid UTF-8: {path}")]
    NotUtf8 { path: String },

    #[error("Failed to create directory {path}: {message}")]
    DirCreationFailed { path: String, message: String },

    #[error("Failed to write file {path}: {message}")]
    WriteFailed { path: String, message: String },

    #[error("Failed to read file {path}: {message}")]
    ReadFailed { path: String, message: String },
}

/// Validation errors for tool arguments
#[derive(Error, Debug)]
pub enum ValidationError {
    #[error("File path must not be empty")]
    EmptyPath,

    #[error("Search text must not be empty")]
    EmptySearchText,

    #[error("Start line must be at least 1")]
    StartLineTooSmall,

    #[error("Line count must be greater than 0")]
    CountTooSmall,

    #[error("Line count must not exceed {max}")]
    CountTooLarge { max: usize },

    #[error("Start line {start_line} is beyond the file's {total_lines} lines")]
    StartBeyondEof { start_line: usize, total_lines: usize },

    #[error("Replacement list must not be empty")]
    EmptyReplacements,

    #[error("Replacement {index} has line number {line}; line numbers start at 1")]
    LineNumberTooSmall { index: usize, line: i64 },

    #[error("Line number {line} appears more than once in the replacement list")]
    DuplicateLineNumber { line: usize },

    #[error("Match type must be 'exact' or 'regex', got '{value}'")]
    InvalidMatchType { value: String },

    #[error("Regex syntax error: {message}")]
    InvalidRegex { message: String },
}

/// Syntax checker errors
#[derive(Error, Debug)]
pub enum SyntaxError {
    #[error("Unsupported language: {language}. Currently only 'lua' is supported.")]
    UnsupportedLanguage { language: String },

    #[error("Failed to initialize {language} parser: {message}")]
    ParserInit { language: String, message: String },

    #[error("Parser produced no tree for {language} input")]
    ParseFailed { language: String },
}

/// MCP protocol errors
#[derive(Error, Debug)]
#[allow(dead_code)] // Some variants reserved for future use
pub enum McpError {
    #[error("Unknown tool: {name}")]
    UnknownTool { name: String },

    #[error("Invalid tool arguments: {message}")]
    InvalidArguments { message: String },

    #[error("Protocol error: {message}")]
    ProtocolError { message: String },

    #[error("Transport error: {message}")]
    TransportError { message: String },
}

/// Result type alias for Code Operation MCP Server operations
pub type Result<T> = std::result::Result<T, CodeOpsError>;
