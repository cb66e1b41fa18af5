//! Key symbol values used in [`crate::CimEvent::keyval`].
//!
//! Values follow the X11 keysym numbering so GTK and Qt adapters can pass
//! their key values through mostly unchanged. Printable ASCII keys use their
//! character code (`SPACE` 0x20 through `ASCIITILDE` 0x7e).

pub const SPACE: u32 = 0x020;
pub const EXCLAM: u32 = 0x021;
pub const QUOTEDBL: u32 = 0x022;
pub const NUMBERSIGN: u32 = 0x023;
pub const DOLLAR: u32 = 0x024;
pub const PERCENT: u32 = 0x025;
pub const AMPERSAND: u32 = 0x026;
pub const APOSTROPHE: u32 = 0x027;
pub const PARENLEFT: u32 = 0x028;
pub const PARENRIGHT: u32 = 0x029;
pub const ASTERISK: u32 = 0x02a;
pub const PLUS: u32 = 0x02b;
pub const COMMA: u32 = 0x02c;
pub const MINUS: u32 = 0x02d;
pub const PERIOD: u32 = 0x02e;
pub const SLASH: u32 = 0x02f;
pub const KEY_0: u32 = 0x030;
pub const KEY_9: u32 = 0x039;
pub const COLON: u32 = 0x03a;
pub const SEMICOLON: u32 = 0x03b;
pub const LESS: u32 = 0x03c;
pub const EQUAL: u32 = 0x03d;
pub const GREATER: u32 = 0x03e;
pub const QUESTION: u32 = 0x03f;
pub const AT: u32 = 0x040;
pub const KEY_A: u32 = 0x041;
pub const KEY_Z: u32 = 0x05a;
pub const BRACKETLEFT: u32 = 0x05b;
pub const BACKSLASH: u32 = 0x05c;
pub const BRACKETRIGHT: u32 = 0x05d;
pub const ASCIICIRCUM: u32 = 0x05e;
pub const UNDERSCORE: u32 = 0x05f;
pub const GRAVE: u32 = 0x060;
pub const KEY_LOWER_A: u32 = 0x061;
pub const KEY_LOWER_Z: u32 = 0x07a;
pub const BRACELEFT: u32 = 0x07b;
pub const BAR: u32 = 0x07c;
pub const BRACERIGHT: u32 = 0x07d;
pub const ASCIITILDE: u32 = 0x07e;

pub const ISO_LEVEL3_SHIFT: u32 = 0xfe03;
pub const ISO_LEFT_TAB: u32 = 0xfe20;

pub const BACKSPACE: u32 = 0xff08;
pub const TAB: u32 = 0xff09;
pub const RETURN: u32 = 0xff0d;
pub const PAUSE: u32 = 0xff13;
pub const SCROLL_LOCK: u32 = 0xff14;
pub const SYS_REQ: u32 = 0xff15;
pub const ESCAPE: u32 = 0xff1b;
pub const MULTI_KEY: u32 = 0xff20;
pub const KANJI: u32 = 0xff21;
pub const KANA_SHIFT: u32 = 0xff2e;
pub const HANGUL: u32 = 0xff31;
pub const HANGUL_HANJA: u32 = 0xff34;

pub const HOME: u32 = 0xff50;
pub const LEFT: u32 = 0xff51;
pub const UP: u32 = 0xff52;
pub const RIGHT: u32 = 0xff53;
pub const DOWN: u32 = 0xff54;
pub const PAGE_UP: u32 = 0xff55;
pub const PAGE_DOWN: u32 = 0xff56;
pub const END: u32 = 0xff57;

pub const PRINT: u32 = 0xff61;
pub const EXECUTE: u32 = 0xff62;
pub const INSERT: u32 = 0xff63;
pub const MENU: u32 = 0xff67;
pub const BREAK: u32 = 0xff6b;

pub const KP_ENTER: u32 = 0xff8d;
pub const KP_LEFT: u32 = 0xff96;
pub const KP_UP: u32 = 0xff97;
pub const KP_RIGHT: u32 = 0xff98;
pub const KP_DOWN: u32 = 0xff99;
pub const KP_PAGE_UP: u32 = 0xff9a;
pub const KP_PAGE_DOWN: u32 = 0xff9b;
pub const KP_DELETE: u32 = 0xff9f;
pub const KP_MULTIPLY: u32 = 0xffaa;
pub const KP_ADD: u32 = 0xffab;
pub const KP_SUBTRACT: u32 = 0xffad;
pub const KP_DECIMAL: u32 = 0xffae;
pub const KP_DIVIDE: u32 = 0xffaf;
pub const KP_0: u32 = 0xffb0;
pub const KP_9: u32 = 0xffb9;

pub const F1: u32 = 0xffbe;
pub const F12: u32 = 0xffc9;

pub const SHIFT_L: u32 = 0xffe1;
pub const SHIFT_R: u32 = 0xffe2;
pub const CONTROL_L: u32 = 0xffe3;
pub const CONTROL_R: u32 = 0xffe4;
pub const CAPS_LOCK: u32 = 0xffe5;
pub const SHIFT_LOCK: u32 = 0xffe6;
pub const META_L: u32 = 0xffe7;
pub const META_R: u32 = 0xffe8;
pub const ALT_L: u32 = 0xffe9;
pub const ALT_R: u32 = 0xffea;
pub const SUPER_L: u32 = 0xffeb;
pub const SUPER_R: u32 = 0xffec;
pub const HYPER_L: u32 = 0xffed;
pub const HYPER_R: u32 = 0xffee;

pub const DELETE: u32 = 0xffff;
pub const VOID_SYMBOL: u32 = 0xffffff;

/// True for keysyms that produce a visible ASCII character (space excluded).
pub fn is_printable_ascii(keyval: u32) -> bool {
    (EXCLAM..=ASCIITILDE).contains(&keyval)
}

/// True for `F1` through `F12`.
pub fn is_function_key(keyval: u32) -> bool {
    (F1..=F12).contains(&keyval)
}

/// True for Shift/Control/Meta/Alt/Super/Hyper and the lock keys.
pub fn is_modifier_key(keyval: u32) -> bool {
    (SHIFT_L..=HYPER_R).contains(&keyval) || keyval == ISO_LEVEL3_SHIFT
}

/// The character a keysym types, for the ASCII range (space included).
pub fn to_char(keyval: u32) -> Option<char> {
    if keyval == SPACE || is_printable_ascii(keyval) {
        char::from_u32(keyval)
    } else {
        None
    }
}

/// The keysym for an ASCII character, the inverse of [`to_char`].
pub fn from_char(c: char) -> Option<u32> {
    let keyval = c as u32;
    (keyval == SPACE || is_printable_ascii(keyval)).then_some(keyval)
}
