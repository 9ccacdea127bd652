//! State-layer error types.

use crate::file::FileMode;

/// Errors that can occur while looking up, creating or serialising state.
#[derive(Debug, thiserror::Error)]
pub enum StateError {
    /// No state record is registered under this name.
    #[error("state {0:?} not found")]
    NotFound(String),

    /// A state record with this name already exists.
    #[error("state {0:?} already exists")]
    AlreadyExists(String),

    /// The name does not correspond to any known state class.
    #[error("unknown state class {0:?}")]
    UnknownState(String),

    /// A fixed-capacity record ended before all of its entries were read.
    /// The unread entries have been zeroed.
    #[error("truncated {record}: read {entries_read} of {expected} entries")]
    TruncatedStream {
        /// Name of the record being read.
        record: &'static str,
        /// Entries fully read before the stream ran out.
        entries_read: usize,
        /// Declared capacity of the record.
        expected: usize,
    },

    /// A primitive read needed more bytes than the stream holds.
    #[error("unexpected end of stream: needed {needed} bytes, {remaining} remaining")]
    UnexpectedEof {
        /// Bytes requested.
        needed: usize,
        /// Bytes left in the stream.
        remaining: usize,
    },

    /// The save file was written by an incompatible version.
    #[error("save version mismatch: expected {expected:#x}, found {found:#x}")]
    VersionMismatch {
        /// Version this build reads and writes.
        expected: i32,
        /// Version found in the file.
        found: i32,
    },

    /// The operation requires the stream to be in the other mode.
    #[error("stream is not in {0:?} mode")]
    WrongMode(FileMode),

    /// A length-prefixed string was not valid UTF-8.
    #[error("invalid string in save stream: {0}")]
    InvalidString(#[from] std::string::FromUtf8Error),

    /// Reading or writing the backing file failed.
    #[error("save file I/O error: {0}")]
    Io(#[from] std::io::Error),
}
