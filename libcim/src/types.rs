//! Data exchanged between hosts and input-method backends.
//!
//! These are plain data carriers: hosts build `CimEvent`s and `Rect`s from
//! toolkit events, backends hand back `PreeditState` and `CandidateState`
//! snapshots, and hosts answer surrounding-text requests with
//! `SurroundState`.

/// Whether a key went down or up.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventType {
    KeyPress,
    KeyRelease,
}

/// Modifier state bits carried in [`CimEvent::state`].
pub mod modifier {
    pub const SHIFT: u32 = 1 << 0;
    pub const LOCK: u32 = 1 << 1;
    pub const CONTROL: u32 = 1 << 2;
    pub const MOD1: u32 = 1 << 3;
    pub const MOD2: u32 = 1 << 4;
    pub const MOD3: u32 = 1 << 5;
    pub const MOD4: u32 = 1 << 6;
    pub const MOD5: u32 = 1 << 7;
    pub const BUTTON1: u32 = 1 << 8;
    pub const BUTTON2: u32 = 1 << 9;
    pub const BUTTON3: u32 = 1 << 10;
    pub const BUTTON4: u32 = 1 << 11;
    pub const BUTTON5: u32 = 1 << 12;

    // virtual modifiers
    pub const SUPER: u32 = 1 << 26;
    pub const HYPER: u32 = 1 << 27;
    pub const META: u32 = 1 << 28;

    /// Every bit above.
    pub const MODIFIER_MASK: u32 = 0x1c00_1fff;
}

/// A key event as delivered by a host adapter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CimEvent {
    pub event_type: EventType,
    /// Modifier bitmask, see [`modifier`].
    pub state: u32,
    /// Key symbol, see [`crate::keysym`].
    pub keyval: u32,
    /// Hardware key code.
    pub keycode: u32,
}

impl CimEvent {
    pub fn key_press(keyval: u32, state: u32) -> Self {
        Self {
            event_type: EventType::KeyPress,
            state,
            keyval,
            keycode: 0,
        }
    }

    pub fn key_release(keyval: u32, state: u32) -> Self {
        Self {
            event_type: EventType::KeyRelease,
            state,
            keyval,
            keycode: 0,
        }
    }

    pub fn with_keycode(mut self, keycode: u32) -> Self {
        self.keycode = keycode;
        self
    }

    pub fn is_press(&self) -> bool {
        self.event_type == EventType::KeyPress
    }

    /// True if any of the bits in `mask` are set.
    pub fn has_modifier(&self, mask: u32) -> bool {
        self.state & mask != 0
    }
}

/// Absolute pixel geometry of the text cursor.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct Rect {
    pub x: i32,
    pub y: i32,
    pub width: i32,
    pub height: i32,
}

impl Rect {
    pub fn new(x: i32, y: i32, width: i32, height: i32) -> Self {
        Self { x, y, width, height }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PreeditAttrKind {
    Underline,
    Highlight,
}

/// Styling for a character range of the preedit text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PreeditAttr {
    pub kind: PreeditAttrKind,
    /// First character, in characters.
    pub start: usize,
    /// One past the last character, in characters.
    pub end: usize,
}

impl PreeditAttr {
    pub fn new(kind: PreeditAttrKind, start: usize, end: usize) -> Self {
        Self { kind, start, end }
    }
}

/// Snapshot of the text being composed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PreeditState {
    pub text: String,
    pub attrs: Vec<PreeditAttr>,
    /// Cursor position in characters.
    pub cursor: usize,
}

impl PreeditState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }
}

/// A single cell of the candidate table.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Item {
    Str(String),
}

impl Item {
    pub fn as_str(&self) -> &str {
        match self {
            Item::Str(s) => s,
        }
    }
}

impl From<&str> for Item {
    fn from(s: &str) -> Self {
        Item::Str(s.to_string())
    }
}

impl From<String> for Item {
    fn from(s: String) -> Self {
        Item::Str(s)
    }
}

/// Snapshot of the candidate window.
///
/// `page_index` starts at 0. The table is row-major.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CandidateState {
    pub page_index: usize,
    pub n_pages: usize,
    pub table: Vec<Vec<Item>>,
}

impl CandidateState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn n_rows(&self) -> usize {
        self.table.len()
    }

    /// Width of the widest row.
    pub fn n_cols(&self) -> usize {
        self.table.iter().map(Vec::len).max().unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.table.iter().all(Vec::is_empty)
    }

    pub fn get(&self, row: usize, col: usize) -> Option<&Item> {
        self.table.get(row).and_then(|r| r.get(col))
    }
}

/// Text around the host cursor, supplied on request.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SurroundState {
    pub text: String,
    /// Cursor position in characters.
    pub cursor: usize,
    /// Selection anchor in characters.
    pub anchor: usize,
}

impl SurroundState {
    pub fn new(text: impl Into<String>, cursor: usize, anchor: usize) -> Self {
        Self {
            text: text.into(),
            cursor,
            anchor,
        }
    }

    /// Length of `text` in bytes.
    pub fn len(&self) -> usize {
        self.text.len()
    }

    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }
}
