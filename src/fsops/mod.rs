//! File operation module
//!
//! Contains types and the operations core backing the file-editing tools.

pub mod ops;
pub mod types;
