//! Error types for s-zip-chunk

use std::io;

/// Result type for chunk window operations
pub type Result<T> = std::result::Result<T, ChunkError>;

/// Error types that can occur while reading through a stream window
///
/// Every error is fatal to the operation that raised it. Nothing is retried
/// internally: repositioning is not safe to retry blindly once partial filter
/// state may have changed, so all failures propagate to the caller.
#[derive(Debug)]
pub enum ChunkError {
    /// I/O error while reading from the underlying stream
    Io(io::Error),
    /// The underlying stream is not seekable, or a raw seek failed
    Reposition(String),
    /// The underlying stream cannot report its position
    Position(String),
    /// Read attempted on a stream that is not open for reading
    NotReadable,
    /// Filter attach/detach invariant violated (double attach, detach with
    /// nothing attached, or a raw seek while a filter is still attached)
    FilterState(String),
}

impl std::fmt::Display for ChunkError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ChunkError::Io(e) => write!(f, "I/O error: {}", e),
            ChunkError::Reposition(msg) => write!(f, "Reposition failed: {}", msg),
            ChunkError::Position(msg) => write!(f, "Cannot report position: {}", msg),
            ChunkError::NotReadable => write!(f, "Stream is not open for reading"),
            ChunkError::FilterState(msg) => write!(f, "Filter state error: {}", msg),
        }
    }
}

impl std::error::Error for ChunkError {}

impl From<io::Error> for ChunkError {
    fn from(err: io::Error) -> Self {
        ChunkError::Io(err)
    }
}
