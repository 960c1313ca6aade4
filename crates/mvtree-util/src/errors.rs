use miette::Diagnostic;
use thiserror::Error;

/// Unified error type for mvtree operations outside the resolution core.
#[derive(Debug, Error, Diagnostic)]
pub enum MvtreeError {
    /// I/O operation failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Invalid or malformed request descriptor.
    #[error("Request error: {message}")]
    #[diagnostic(help("Check the request file for syntax errors"))]
    Request { message: String },

    /// An artifact pattern could not be turned into a filter.
    #[error("Invalid artifact pattern `{pattern}`: {message}")]
    #[diagnostic(help("Patterns look like group[:artifact[:type[:version]]], `*` and `?` are wildcards"))]
    Filter { pattern: String, message: String },

    /// A POM or repository metadata file could not be read.
    #[error("Repository error: {message}")]
    Repository { message: String },

    /// Catch-all for miscellaneous errors.
    #[error("{message}")]
    Generic { message: String },
}

/// Convenience alias for `miette::Result<T>`.
pub type MvtreeResult<T> = miette::Result<T>;
