//! Error types for the documentation generator.
//!
//! Only structurally broken input is an error. Everything that merely makes
//! the documentation worse (missing module, duplicate module, dangling link)
//! is reported through the `warn` callback instead.

use std::path::PathBuf;
use thiserror::Error;

/// Result type for doxdown operations
pub type Result<T> = std::result::Result<T, DocError>;

#[derive(Debug, Error)]
pub enum DocError {
    #[error("invalid comment list: {0}")]
    Json(#[from] serde_json::Error),

    /// A continuation tag (no type) with no preceding tag to attach to
    #[error("tag continuation without a preceding tag in comment at line {line}")]
    OrphanContinuation { line: usize },

    #[error("unsupported input file: {0}")]
    UnsupportedInput(PathBuf),

    #[error("unknown format: {0}. Use markdown or json")]
    UnknownFormat(String),
}
