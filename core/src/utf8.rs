//! UTF-8 helpers working on raw byte sequences.
//!
//! Everything here is stateless and operates on `&[u8]` (anything that is
//! `AsRef<[u8]>`, so `&str` works too). Byte offsets are `usize`, character
//! offsets count codepoints. The functions never panic on malformed input:
//! stray continuation bytes and truncated sequences decode to U+FFFD.

use std::cmp::Ordering;

/// The Unicode replacement character.
pub const REPLACEMENT_CHARACTER: u32 = 0xFFFD;

/// One past the largest valid codepoint.
pub const CODEPOINT_LIMIT: u32 = 0x11_0000;

/// Returns true if `byte` has the `10xxxxxx` continuation pattern.
#[inline]
pub fn is_continuation(byte: u8) -> bool {
    byte & 0b1100_0000 == 0b1000_0000
}

/// Count codepoints by counting bytes that are not continuation bytes.
pub fn utf8_strlen<S: AsRef<[u8]> + ?Sized>(s: &S) -> usize {
    s.as_ref().iter().filter(|&&b| !is_continuation(b)).count()
}

/// Like [`utf8_strlen`] but only looks at the first `max_bytes` bytes.
pub fn utf8_strnlen<S: AsRef<[u8]> + ?Sized>(s: &S, max_bytes: usize) -> usize {
    let bytes = s.as_ref();
    let end = max_bytes.min(bytes.len());
    utf8_strlen(&bytes[..end])
}

/// The leading slice of `s` holding at most `n_chars` codepoints.
pub fn utf8_prefix<S: AsRef<[u8]> + ?Sized>(s: &S, n_chars: usize) -> &[u8] {
    let bytes = s.as_ref();
    &bytes[..offset_to_byte(bytes, n_chars)]
}

/// Copy the first `n_chars` codepoints of `src` into `dst` and terminate it
/// with a NUL byte.
///
/// Only whole codepoints are copied; if `dst` is too small the copy stops at
/// the last codepoint that still leaves room for the terminator. Returns the
/// number of bytes written, terminator excluded. `n_chars == 0` writes
/// nothing at all.
pub fn utf8_strncpy(dst: &mut [u8], src: &[u8], n_chars: usize) -> usize {
    if n_chars == 0 || dst.is_empty() {
        return 0;
    }

    let room = dst.len() - 1;
    let mut end = 0;
    let mut copied = 0;
    while copied < n_chars && end < src.len() {
        let next = next_boundary(src, end);
        if next > room {
            break;
        }
        end = next;
        copied += 1;
    }

    dst[..end].copy_from_slice(&src[..end]);
    dst[end] = 0;
    end
}

/// Byte offset of the codepoint that starts before `pos`, or `None` at the
/// start of the buffer.
pub fn prev_char<S: AsRef<[u8]> + ?Sized>(s: &S, pos: usize) -> Option<usize> {
    let bytes = s.as_ref();
    let mut pos = pos.min(bytes.len());
    if pos == 0 {
        return None;
    }
    loop {
        pos -= 1;
        if pos == 0 || !is_continuation(bytes[pos]) {
            return Some(pos);
        }
    }
}

/// Byte offset of the codepoint following the one at `pos`, or `None` when
/// there is no further codepoint.
pub fn next_char<S: AsRef<[u8]> + ?Sized>(s: &S, pos: usize) -> Option<usize> {
    let bytes = s.as_ref();
    if pos >= bytes.len() {
        return None;
    }
    let next = next_boundary(bytes, pos);
    (next < bytes.len()).then_some(next)
}

/// Move `n` codepoints away from the byte offset `pos` (backwards when `n` is
/// negative), clamping at either end of the buffer.
pub fn seek<S: AsRef<[u8]> + ?Sized>(s: &S, pos: usize, n: isize) -> usize {
    let bytes = s.as_ref();
    let mut pos = pos.min(bytes.len());
    if n >= 0 {
        for _ in 0..n {
            if pos >= bytes.len() {
                break;
            }
            pos = next_boundary(bytes, pos);
        }
    } else {
        for _ in 0..n.unsigned_abs() {
            match prev_char(bytes, pos) {
                Some(prev) => pos = prev,
                None => break,
            }
        }
    }
    pos
}

/// Convert a character offset into a byte offset. Offsets past the end clamp
/// to the buffer length.
pub fn offset_to_byte<S: AsRef<[u8]> + ?Sized>(s: &S, offset_in_chars: usize) -> usize {
    seek(s, 0, offset_in_chars.min(isize::MAX as usize) as isize)
}

/// Convert a byte offset into a character offset.
pub fn byte_to_offset<S: AsRef<[u8]> + ?Sized>(s: &S, byte_pos: usize) -> usize {
    utf8_strnlen(s, byte_pos)
}

// Index just past the codepoint starting at `pos`.
fn next_boundary(bytes: &[u8], pos: usize) -> usize {
    let mut next = pos + 1;
    while next < bytes.len() && is_continuation(bytes[next]) {
        next += 1;
    }
    next
}

/// Decode UTF-8 into a sequence of codepoints.
///
/// Sequence lengths follow the lead-byte bit patterns. A stray continuation
/// byte, an invalid lead byte or a sequence cut short yields one U+FFFD and
/// decoding resumes at the next byte.
pub fn decode<S: AsRef<[u8]> + ?Sized>(s: &S) -> Vec<u32> {
    let bytes = s.as_ref();
    let mut out = Vec::with_capacity(bytes.len());
    let mut i = 0;

    while i < bytes.len() {
        let lead = bytes[i];
        let (len, init) = match lead {
            b if b & 0b1000_0000 == 0 => (1, b as u32),
            b if b & 0b1111_1000 == 0b1111_0000 => (4, (b & 0b0000_0111) as u32),
            b if b & 0b1111_0000 == 0b1110_0000 => (3, (b & 0b0000_1111) as u32),
            b if b & 0b1110_0000 == 0b1100_0000 => (2, (b & 0b0001_1111) as u32),
            _ => {
                out.push(REPLACEMENT_CHARACTER);
                i += 1;
                continue;
            }
        };

        let tail = bytes.get(i + 1..i + len);
        match tail {
            Some(tail) if tail.iter().all(|&b| is_continuation(b)) => {
                let cp = tail
                    .iter()
                    .fold(init, |acc, &b| (acc << 6) | (b & 0b0011_1111) as u32);
                out.push(cp);
                i += len;
            }
            _ => {
                out.push(REPLACEMENT_CHARACTER);
                i += 1;
            }
        }
    }

    out
}

/// Encode a single codepoint into `buf`, returning the number of bytes used.
///
/// Codepoints at or above 0x110000 are encoded as U+FFFD.
pub fn encode_char(cp: u32, buf: &mut [u8; 4]) -> usize {
    if cp < 0x80 {
        buf[0] = cp as u8;
        1
    } else if cp < 0x800 {
        buf[0] = 0b1100_0000 | (cp >> 6) as u8;
        buf[1] = 0b1000_0000 | (cp & 0b0011_1111) as u8;
        2
    } else if cp < 0x1_0000 {
        buf[0] = 0b1110_0000 | (cp >> 12) as u8;
        buf[1] = 0b1000_0000 | ((cp >> 6) & 0b0011_1111) as u8;
        buf[2] = 0b1000_0000 | (cp & 0b0011_1111) as u8;
        3
    } else if cp < CODEPOINT_LIMIT {
        buf[0] = 0b1111_0000 | (cp >> 18) as u8;
        buf[1] = 0b1000_0000 | ((cp >> 12) & 0b0011_1111) as u8;
        buf[2] = 0b1000_0000 | ((cp >> 6) & 0b0011_1111) as u8;
        buf[3] = 0b1000_0000 | (cp & 0b0011_1111) as u8;
        4
    } else {
        tracing::warn!("cannot convert {:#x} to UTF-8, using U+FFFD", cp);
        encode_char(REPLACEMENT_CHARACTER, buf)
    }
}

/// Encode a codepoint sequence back into UTF-8 bytes.
pub fn encode(cps: &[u32]) -> Vec<u8> {
    let mut out = Vec::with_capacity(cps.len());
    let mut buf = [0u8; 4];
    for &cp in cps {
        let n = encode_char(cp, &mut buf);
        out.extend_from_slice(&buf[..n]);
    }
    out
}

/// Three-way comparison of two UTF-8 strings by decoded codepoints.
///
/// Returns the signed difference of the first differing codepoints. A string
/// that ends first compares as if it continued with codepoint 0, so a proper
/// prefix sorts first.
pub fn collate<A, B>(a: &A, b: &B) -> i32
where
    A: AsRef<[u8]> + ?Sized,
    B: AsRef<[u8]> + ?Sized,
{
    let a = decode(a);
    let b = decode(b);
    let n = a.len().max(b.len());
    for i in 0..n {
        let x = a.get(i).copied().unwrap_or(0) as i64;
        let y = b.get(i).copied().unwrap_or(0) as i64;
        if x != y {
            return (x - y) as i32;
        }
    }
    0
}

/// [`collate`] mapped onto `Ordering`, for use with `sort_by`.
pub fn collate_ordering<A, B>(a: &A, b: &B) -> Ordering
where
    A: AsRef<[u8]> + ?Sized,
    B: AsRef<[u8]> + ?Sized,
{
    collate(a, b).cmp(&0)
}
