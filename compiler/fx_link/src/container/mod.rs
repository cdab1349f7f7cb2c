//! Binary container: the wire primitives of a compiled program.
//!
//! All integers are little-endian. A bool is one byte. Strings are a `u32`
//! byte length followed by UTF-8 without terminator. A tag is four ASCII
//! bytes read as a big-endian integer and written as a little-endian one,
//! so `b"VERT"` lands on disk as `TREV`.

use std::fs;
use std::path::Path;

#[derive(Debug, thiserror::Error)]
pub enum ContainerError {
    #[error("unexpected end of data at byte {offset}: {needed} more bytes needed")]
    Truncated { offset: usize, needed: usize },
    #[error("expected tag '{expected}' at byte {offset}, found '{found}'")]
    BadTag {
        offset: usize,
        expected: String,
        found: String,
    },
    #[error("string at byte {offset} is not valid UTF-8")]
    InvalidUtf8 { offset: usize },
    #[error("bool at byte {offset} has value {value}")]
    InvalidBool { offset: usize, value: u8 },
    #[error("unknown annotation value kind {kind} at byte {offset}")]
    InvalidValueKind { offset: usize, kind: u32 },
    #[error("binary length {len} at byte {offset} is not a whole number of words")]
    UnalignedBinary { offset: usize, len: u32 },
    #[error("{len} bytes left over after the program record")]
    TrailingBytes { len: usize },
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

fn tag_text(tag: [u8; 4]) -> String {
    String::from_utf8_lossy(&tag).into_owned()
}

/// Append-only writer over an in-memory buffer.
#[derive(Clone, Debug, Default)]
pub struct BinWriter {
    buf: Vec<u8>,
}

impl BinWriter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn write_bool(&mut self, value: bool) {
        self.buf.push(u8::from(value));
    }

    pub fn write_int(&mut self, value: i32) {
        self.buf.extend_from_slice(&value.to_le_bytes());
    }

    pub fn write_uint(&mut self, value: u32) {
        self.buf.extend_from_slice(&value.to_le_bytes());
    }

    pub fn write_float(&mut self, value: f32) {
        self.buf.extend_from_slice(&value.to_le_bytes());
    }

    pub fn write_double(&mut self, value: f64) {
        self.buf.extend_from_slice(&value.to_le_bytes());
    }

    /// Collection sizes are `u32` on the wire.
    #[expect(
        clippy::cast_possible_truncation,
        reason = "programs are far below 4 GiB"
    )]
    pub fn write_count(&mut self, count: usize) {
        self.write_uint(count as u32);
    }

    pub fn write_string(&mut self, value: &str) {
        self.write_count(value.len());
        self.buf.extend_from_slice(value.as_bytes());
    }

    pub fn write_tag(&mut self, tag: [u8; 4]) {
        self.write_uint(u32::from_be_bytes(tag));
    }

    /// Raw bytes with no length prefix.
    pub fn write_bytes(&mut self, bytes: &[u8]) {
        self.buf.extend_from_slice(bytes);
    }

    /// A word block: its byte length, then the words.
    pub fn write_words(&mut self, words: &[u32]) {
        self.write_count(words.len() * 4);
        for word in words {
            self.write_uint(*word);
        }
    }

    pub fn len(&self) -> usize {
        self.buf.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buf.is_empty()
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.buf
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.buf
    }

    /// Write the buffer to `path`, replacing the file.
    pub fn write_to(&self, path: &Path) -> Result<(), ContainerError> {
        fs::write(path, &self.buf)?;
        Ok(())
    }
}

/// Cursor over a compiled program, mirroring [`BinWriter`].
#[derive(Clone, Debug)]
pub struct BinReader<'a> {
    bytes: &'a [u8],
    pos: usize,
}

impl<'a> BinReader<'a> {
    pub fn new(bytes: &'a [u8]) -> Self {
        BinReader { bytes, pos: 0 }
    }

    pub fn position(&self) -> usize {
        self.pos
    }

    pub fn remaining(&self) -> usize {
        self.bytes.len() - self.pos
    }

    pub fn is_at_end(&self) -> bool {
        self.remaining() == 0
    }

    fn take<const N: usize>(&mut self) -> Result<[u8; N], ContainerError> {
        let slice = self.read_bytes(N)?;
        let mut out = [0u8; N];
        out.copy_from_slice(slice);
        Ok(out)
    }

    pub fn read_bytes(&mut self, len: usize) -> Result<&'a [u8], ContainerError> {
        if self.remaining() < len {
            return Err(ContainerError::Truncated {
                offset: self.pos,
                needed: len - self.remaining(),
            });
        }
        let slice = &self.bytes[self.pos..self.pos + len];
        self.pos += len;
        Ok(slice)
    }

    pub fn read_bool(&mut self) -> Result<bool, ContainerError> {
        let offset = self.pos;
        match self.take::<1>()? {
            [0] => Ok(false),
            [1] => Ok(true),
            [value] => Err(ContainerError::InvalidBool { offset, value }),
        }
    }

    pub fn read_int(&mut self) -> Result<i32, ContainerError> {
        self.take().map(i32::from_le_bytes)
    }

    pub fn read_uint(&mut self) -> Result<u32, ContainerError> {
        self.take().map(u32::from_le_bytes)
    }

    pub fn read_float(&mut self) -> Result<f32, ContainerError> {
        self.take().map(f32::from_le_bytes)
    }

    pub fn read_double(&mut self) -> Result<f64, ContainerError> {
        self.take().map(f64::from_le_bytes)
    }

    pub fn read_count(&mut self) -> Result<usize, ContainerError> {
        self.read_uint().map(|count| count as usize)
    }

    pub fn read_string(&mut self) -> Result<String, ContainerError> {
        let len = self.read_count()?;
        let offset = self.pos;
        let bytes = self.read_bytes(len)?;
        std::str::from_utf8(bytes)
            .map(str::to_owned)
            .map_err(|_| ContainerError::InvalidUtf8 { offset })
    }

    pub fn read_tag(&mut self) -> Result<[u8; 4], ContainerError> {
        self.read_uint().map(u32::to_be_bytes)
    }

    pub fn expect_tag(&mut self, expected: [u8; 4]) -> Result<(), ContainerError> {
        let offset = self.pos;
        let found = self.read_tag()?;
        if found != expected {
            return Err(ContainerError::BadTag {
                offset,
                expected: tag_text(expected),
                found: tag_text(found),
            });
        }
        Ok(())
    }

    pub fn read_words(&mut self) -> Result<Vec<u32>, ContainerError> {
        let offset = self.pos;
        let len = self.read_uint()?;
        if len % 4 != 0 {
            return Err(ContainerError::UnalignedBinary { offset, len });
        }
        let bytes = self.read_bytes(len as usize)?;
        Ok(bytes
            .chunks_exact(4)
            .map(|chunk| u32::from_le_bytes([chunk[0], chunk[1], chunk[2], chunk[3]]))
            .collect())
    }
}

#[cfg(test)]
#[expect(clippy::unwrap_used, reason = "Tests use unwrap for brevity")]
mod tests;
