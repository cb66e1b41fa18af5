//! Growable byte buffer used to build and hold text.
//!
//! `TextBuffer` is the byte-oriented sibling of an input buffer: every
//! mutation takes byte offsets, so callers working in characters convert with
//! the helpers in [`crate::utf8`] (or use the `*_chars` methods below).
//!
//! The backing storage always has room for one byte past the logical length,
//! and that byte is kept at zero so the contents can be handed to C-style
//! consumers as a terminated string.

use std::borrow::Cow;
use std::fmt;
use std::string::FromUtf8Error;

use crate::utf8;

/// Initial capacity, also the slack used by the shrink rule.
pub const DEFAULT_CAPACITY: usize = 16;

/// Byte buffer with doubling growth and hysteretic shrinking.
#[derive(Clone)]
pub struct TextBuffer {
    // data.len() is the capacity; data[len] is always 0
    data: Vec<u8>,
    len: usize,
}

impl TextBuffer {
    /// Create an empty buffer.
    pub fn new() -> Self {
        Self {
            data: vec![0; DEFAULT_CAPACITY],
            len: 0,
        }
    }

    /// Create a buffer holding `s`.
    pub fn from_text(s: &str) -> Self {
        let mut buf = Self::new();
        buf.assign(s);
        buf
    }

    /// Logical length in bytes.
    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Allocated size in bytes, terminator slot included.
    pub fn capacity(&self) -> usize {
        self.data.len()
    }

    /// Number of codepoints in the buffer.
    pub fn char_len(&self) -> usize {
        utf8::utf8_strlen(self.as_bytes())
    }

    /// Contents without the terminator.
    pub fn as_bytes(&self) -> &[u8] {
        &self.data[..self.len]
    }

    /// Contents followed by the terminating NUL byte.
    pub fn as_bytes_with_nul(&self) -> &[u8] {
        &self.data[..=self.len]
    }

    /// Contents as `&str`, or `None` if byte edits left invalid UTF-8 behind.
    pub fn to_str(&self) -> Option<&str> {
        std::str::from_utf8(self.as_bytes()).ok()
    }

    /// Contents as text, replacing invalid sequences with U+FFFD.
    pub fn to_string_lossy(&self) -> Cow<'_, str> {
        String::from_utf8_lossy(self.as_bytes())
    }

    /// Consume the buffer, returning its contents.
    pub fn into_string(mut self) -> Result<String, FromUtf8Error> {
        self.data.truncate(self.len);
        String::from_utf8(self.data)
    }

    /// Replace the entire contents.
    pub fn assign(&mut self, s: &str) {
        self.assign_bytes(s.as_bytes());
    }

    pub fn assign_bytes(&mut self, bytes: &[u8]) {
        self.resize_capacity(bytes.len() + 1);
        self.data[..bytes.len()].copy_from_slice(bytes);
        self.set_len(bytes.len());
    }

    /// Remove all contents.
    pub fn clear(&mut self) {
        self.assign_bytes(&[]);
    }

    /// Extend the contents in place.
    pub fn append(&mut self, s: &str) {
        self.append_bytes(s.as_bytes());
    }

    pub fn append_bytes(&mut self, bytes: &[u8]) {
        if bytes.is_empty() {
            return;
        }
        let new_len = self.len + bytes.len();
        self.resize_capacity(new_len + 1);
        self.data[self.len..new_len].copy_from_slice(bytes);
        self.set_len(new_len);
    }

    /// Append a single character.
    pub fn push(&mut self, c: char) {
        let mut buf = [0u8; 4];
        self.append(c.encode_utf8(&mut buf));
    }

    /// Insert `s` at byte offset `pos`, shifting the tail right.
    ///
    /// `pos` past the end is logged and the insert is skipped.
    pub fn insert(&mut self, pos: usize, s: &str) {
        self.insert_bytes(pos, s.as_bytes());
    }

    pub fn insert_bytes(&mut self, pos: usize, bytes: &[u8]) {
        if pos > self.len {
            tracing::warn!("insert position {} beyond length {}", pos, self.len);
            return;
        }
        if bytes.is_empty() {
            return;
        }
        let old_len = self.len;
        let new_len = old_len + bytes.len();
        self.resize_capacity(new_len + 1);
        self.data.copy_within(pos..old_len, pos + bytes.len());
        self.data[pos..pos + bytes.len()].copy_from_slice(bytes);
        self.set_len(new_len);
    }

    /// Insert a single character at byte offset `pos`.
    pub fn insert_char(&mut self, pos: usize, c: char) {
        let mut buf = [0u8; 4];
        self.insert(pos, c.encode_utf8(&mut buf));
    }

    /// Remove `len` bytes starting at `pos`.
    ///
    /// `None` erases everything from `pos` to the end. `Some(0)` is a no-op.
    /// `pos` past the end is logged and the erase is skipped; a range running
    /// past the end is clamped.
    pub fn erase(&mut self, pos: usize, len: Option<usize>) {
        if len == Some(0) {
            return;
        }
        if pos > self.len {
            tracing::warn!("erase position {} beyond length {}", pos, self.len);
            return;
        }

        let end = match len {
            Some(n) => pos.saturating_add(n).min(self.len),
            None => self.len,
        };
        let old_len = self.len;
        self.data.copy_within(end..old_len, pos);
        let new_len = old_len - (end - pos);
        self.resize_capacity(new_len + 1);
        self.set_len(new_len);
    }

    /// Replace bytes starting at `pos` with `s`, growing the buffer if `s`
    /// runs past the current end.
    pub fn overwrite(&mut self, pos: usize, s: &str) {
        self.overwrite_bytes(pos, s.as_bytes());
    }

    pub fn overwrite_bytes(&mut self, pos: usize, bytes: &[u8]) {
        if pos > self.len {
            tracing::warn!("overwrite position {} beyond length {}", pos, self.len);
            return;
        }
        let end = pos + bytes.len();
        let new_len = end.max(self.len);
        self.resize_capacity(new_len + 1);
        self.data[pos..end].copy_from_slice(bytes);
        self.set_len(new_len);
    }

    /// Insert `s` before the character at `char_index`.
    pub fn insert_at_char(&mut self, char_index: usize, s: &str) {
        let pos = utf8::offset_to_byte(self.as_bytes(), char_index);
        self.insert(pos, s);
    }

    /// Remove `n_chars` characters starting at `char_index`.
    ///
    /// Returns false if `char_index` is past the end.
    pub fn erase_chars(&mut self, char_index: usize, n_chars: usize) -> bool {
        if char_index > self.char_len() {
            return false;
        }
        let start = utf8::offset_to_byte(self.as_bytes(), char_index);
        let n_chars = n_chars.min(isize::MAX as usize) as isize;
        let end = utf8::seek(self.as_bytes(), start, n_chars);
        self.erase(start, Some(end - start));
        true
    }

    /// Remove the last character, returning false when empty.
    pub fn pop_char(&mut self) -> bool {
        match utf8::prev_char(self.as_bytes(), self.len) {
            Some(pos) => {
                self.erase(pos, None);
                true
            }
            None => false,
        }
    }

    fn set_len(&mut self, len: usize) {
        self.len = len;
        self.data[len] = 0;
    }

    // Double while too small; halve while far too large.
    fn resize_capacity(&mut self, required: usize) {
        let mut capacity = self.data.len();
        while required > capacity {
            capacity *= 2;
        }
        while required + DEFAULT_CAPACITY < capacity / 4 {
            capacity /= 2;
        }
        if capacity != self.data.len() {
            self.data.resize(capacity, 0);
        }
    }
}

impl Default for TextBuffer {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for TextBuffer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TextBuffer")
            .field("text", &self.to_string_lossy())
            .field("len", &self.len)
            .field("capacity", &self.capacity())
            .finish()
    }
}

impl fmt::Display for TextBuffer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_string_lossy())
    }
}

impl PartialEq for TextBuffer {
    fn eq(&self, other: &Self) -> bool {
        self.as_bytes() == other.as_bytes()
    }
}

impl Eq for TextBuffer {}

impl From<&str> for TextBuffer {
    fn from(s: &str) -> Self {
        Self::from_text(s)
    }
}
