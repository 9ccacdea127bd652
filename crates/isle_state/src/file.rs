//! Binary save stream.
//!
//! [`StateFile`] is an in-memory byte stream opened either for reading or
//! for writing. All primitives are little-endian and fixed-width, with no
//! padding between fields; strings are a `u16` byte length followed by
//! UTF-8 bytes. Every read checks the remaining length before touching the
//! buffer and fails with [`StateError::UnexpectedEof`] instead of reading
//! past the end.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::StateError;

/// Direction of a [`StateFile`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FileMode {
    Read,
    Write,
}

/// A save stream in either read or write mode.
#[derive(Debug, Clone)]
pub struct StateFile {
    mode: FileMode,
    buffer: Vec<u8>,
    /// Read cursor; unused in write mode.
    cursor: usize,
}

impl StateFile {
    /// Create an empty stream in write mode.
    #[must_use]
    pub fn writer() -> Self {
        Self {
            mode: FileMode::Write,
            buffer: Vec::new(),
            cursor: 0,
        }
    }

    /// Create a read-mode stream over the given bytes.
    #[must_use]
    pub fn reader(bytes: Vec<u8>) -> Self {
        Self {
            mode: FileMode::Read,
            buffer: bytes,
            cursor: 0,
        }
    }

    /// Read a save file from disk into a read-mode stream.
    ///
    /// # Errors
    ///
    /// Returns [`StateError::Io`] if the file cannot be read.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, StateError> {
        let path = path.as_ref();
        let bytes = fs::read(path)?;
        debug!(path = %path.display(), len = bytes.len(), "opened save file");
        Ok(Self::reader(bytes))
    }

    /// Write the contents of a write-mode stream to disk.
    ///
    /// # Errors
    ///
    /// Returns [`StateError::WrongMode`] for a read-mode stream and
    /// [`StateError::Io`] if the file cannot be written.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), StateError> {
        self.expect_mode(FileMode::Write)?;
        let path = path.as_ref();
        fs::write(path, &self.buffer)?;
        debug!(path = %path.display(), len = self.buffer.len(), "wrote save file");
        Ok(())
    }

    #[must_use]
    pub fn mode(&self) -> FileMode {
        self.mode
    }

    #[must_use]
    pub fn is_read_mode(&self) -> bool {
        self.mode == FileMode::Read
    }

    #[must_use]
    pub fn is_write_mode(&self) -> bool {
        self.mode == FileMode::Write
    }

    /// Bytes left to read. Always zero in write mode.
    #[must_use]
    pub fn remaining(&self) -> usize {
        match self.mode {
            FileMode::Read => self.buffer.len() - self.cursor,
            FileMode::Write => 0,
        }
    }

    /// Current read position, or the written length in write mode.
    #[must_use]
    pub fn position(&self) -> usize {
        match self.mode {
            FileMode::Read => self.cursor,
            FileMode::Write => self.buffer.len(),
        }
    }

    #[must_use]
    pub fn as_bytes(&self) -> &[u8] {
        &self.buffer
    }

    #[must_use]
    pub fn into_bytes(self) -> Vec<u8> {
        self.buffer
    }

    fn expect_mode(&self, mode: FileMode) -> Result<(), StateError> {
        if self.mode == mode {
            Ok(())
        } else {
            Err(StateError::WrongMode(mode))
        }
    }

    fn take<const N: usize>(&mut self) -> Result<[u8; N], StateError> {
        self.expect_mode(FileMode::Read)?;
        let remaining = self.remaining();
        if remaining < N {
            return Err(StateError::UnexpectedEof {
                needed: N,
                remaining,
            });
        }
        let mut bytes = [0u8; N];
        bytes.copy_from_slice(&self.buffer[self.cursor..self.cursor + N]);
        self.cursor += N;
        Ok(bytes)
    }

    fn put(&mut self, bytes: &[u8]) -> Result<(), StateError> {
        self.expect_mode(FileMode::Write)?;
        self.buffer.extend_from_slice(bytes);
        Ok(())
    }

    /// Read one byte.
    pub fn read_u8(&mut self) -> Result<u8, StateError> {
        self.take::<1>().map(|[b]| b)
    }

    /// Read a little-endian `u16`.
    pub fn read_u16(&mut self) -> Result<u16, StateError> {
        self.take().map(u16::from_le_bytes)
    }

    /// Read a little-endian `i16`.
    pub fn read_i16(&mut self) -> Result<i16, StateError> {
        self.take().map(i16::from_le_bytes)
    }

    /// Read a little-endian `u32`.
    pub fn read_u32(&mut self) -> Result<u32, StateError> {
        self.take().map(u32::from_le_bytes)
    }

    /// Read a little-endian `i32`.
    pub fn read_i32(&mut self) -> Result<i32, StateError> {
        self.take().map(i32::from_le_bytes)
    }

    /// Read a little-endian `f32`.
    pub fn read_f32(&mut self) -> Result<f32, StateError> {
        self.take().map(f32::from_le_bytes)
    }

    /// Read a `u16`-length-prefixed UTF-8 string.
    pub fn read_string(&mut self) -> Result<String, StateError> {
        let len = usize::from(self.read_u16()?);
        let remaining = self.remaining();
        if remaining < len {
            return Err(StateError::UnexpectedEof {
                needed: len,
                remaining,
            });
        }
        let bytes = self.buffer[self.cursor..self.cursor + len].to_vec();
        self.cursor += len;
        Ok(String::from_utf8(bytes)?)
    }

    /// Append one byte.
    pub fn write_u8(&mut self, value: u8) -> Result<(), StateError> {
        self.put(&[value])
    }

    /// Append a little-endian `u16`.
    pub fn write_u16(&mut self, value: u16) -> Result<(), StateError> {
        self.put(&value.to_le_bytes())
    }

    /// Append a little-endian `i16`.
    pub fn write_i16(&mut self, value: i16) -> Result<(), StateError> {
        self.put(&value.to_le_bytes())
    }

    /// Append a little-endian `u32`.
    pub fn write_u32(&mut self, value: u32) -> Result<(), StateError> {
        self.put(&value.to_le_bytes())
    }

    /// Append a little-endian `i32`.
    pub fn write_i32(&mut self, value: i32) -> Result<(), StateError> {
        self.put(&value.to_le_bytes())
    }

    /// Append a little-endian `f32`.
    pub fn write_f32(&mut self, value: f32) -> Result<(), StateError> {
        self.put(&value.to_le_bytes())
    }

    /// Write a `u16`-length-prefixed UTF-8 string.
    ///
    /// Strings longer than `u16::MAX` bytes are truncated at a char
    /// boundary.
    pub fn write_string(&mut self, value: &str) -> Result<(), StateError> {
        let mut end = value.len().min(usize::from(u16::MAX));
        while !value.is_char_boundary(end) {
            end -= 1;
        }
        // `end` fits in a u16 by construction.
        self.write_u16(end as u16)?;
        self.put(&value.as_bytes()[..end])
    }
}
