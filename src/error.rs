// ABOUTME: Error types for all SANE protocol operations, from transport failures to
// ABOUTME: image-assembly invariant violations.

use std::io;
use thiserror::Error;

/// Comprehensive error type for SANE client operations.
#[derive(Debug, Error)]
pub enum SaneError {
    /// Underlying transport read/write failed.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// EOF or short read inside a framed unit (word, string, record).
    #[error("truncated stream: expected {expected} bytes, got {got}")]
    TruncatedStream { expected: usize, got: usize },

    /// Server status word was non-zero where zero was required.
    #[error("protocol status error: {0}")]
    ProtocolStatus(i32),

    /// A data-record length exceeded the implementation's maximum contiguous buffer.
    #[error("record length {0} exceeds maximum contiguous buffer size")]
    ProtocolOverflow(u32),

    /// Caller-supplied string contained a NUL byte, or another precondition was violated.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// Session operation invoked in the wrong state.
    #[error("illegal state: {0}")]
    IllegalState(String),

    /// Image builder could not produce a complete image.
    #[error("incomplete image: {0}")]
    IncompleteImage(String),

    /// Frame combination has no materializable raster layout.
    #[error("unsupported image layout: {0}")]
    UnsupportedImageLayout(String),

    /// OPEN or START returned a non-empty authorization resource string.
    #[error("authentication required for resource: {0}")]
    AuthRequired(String),
}

/// Result type alias for SANE operations.
pub type SaneResult<T> = Result<T, SaneError>;
