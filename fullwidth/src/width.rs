//! Half-width / full-width character mapping.
//!
//! Printable ASCII (`!` through `~`) maps onto the Halfwidth and Fullwidth
//! Forms block at U+FF01..U+FF5E, and space maps to the ideographic space
//! U+3000. Everything else passes through unchanged.

/// Ideographic space, the full-width counterpart of ASCII space.
pub const IDEOGRAPHIC_SPACE: char = '\u{3000}';

const ASCII_FIRST: u32 = 0x21;
const FULLWIDTH_FIRST: u32 = 0xff01;

/// Full-width form of a single character.
pub fn fullwidth_char(ch: char) -> char {
    match ch {
        ' ' => IDEOGRAPHIC_SPACE,
        '!'..='~' => char::from_u32(ch as u32 - ASCII_FIRST + FULLWIDTH_FIRST).unwrap_or(ch),
        _ => ch,
    }
}

/// Half-width form of a single character.
pub fn halfwidth_char(ch: char) -> char {
    match ch {
        IDEOGRAPHIC_SPACE => ' ',
        '\u{ff01}'..='\u{ff5e}' => {
            char::from_u32(ch as u32 - FULLWIDTH_FIRST + ASCII_FIRST).unwrap_or(ch)
        }
        _ => ch,
    }
}

/// Convert ASCII characters in `s` to their full-width equivalents.
pub fn to_fullwidth(s: &str) -> String {
    s.chars().map(fullwidth_char).collect()
}

/// Convert full-width characters in `s` back to ASCII.
pub fn to_halfwidth(s: &str) -> String {
    s.chars().map(halfwidth_char).collect()
}
