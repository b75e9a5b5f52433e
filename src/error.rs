//! Error types for subnets.
//!
//! The matching core never fails: malformed input is rejected silently at
//! the [`Matcher`](crate::Matcher) boundary. These errors belong to the
//! text and file collaborators that feed it.

use thiserror::Error;

/// Error type for subnet list loading.
#[derive(Error, Debug)]
pub enum Error {
    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Invalid CIDR pattern
    #[error("invalid CIDR pattern: {0}")]
    InvalidCidr(String),

    /// Invalid CIDR pattern on a numbered input line
    #[error("line {line}: invalid CIDR pattern: {pattern}")]
    InvalidLine { line: usize, pattern: String },

    /// Invalid IP address
    #[error("invalid IP address: {0}")]
    InvalidAddress(String),
}

/// Result type alias for subnets operations.
pub type Result<T> = std::result::Result<T, Error>;
