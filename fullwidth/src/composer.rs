//! The full-width composing backend.
//!
//! Typed ASCII accumulates in a preedit which the host shows in full-width
//! form. Committing sends either form to the host: full-width by default,
//! half-width with Shift+Return.

use libcim::callback::{Callback, CallbackKind, CallbackRegistry};
use libcim::context::InputMethod;
use libcim::keysym;
use libcim::types::{
    modifier, CandidateState, CimEvent, PreeditAttr, PreeditAttrKind, PreeditState, Rect,
};
use libcim_core::TextBuffer;

use crate::width::{to_fullwidth, IDEOGRAPHIC_SPACE};

/// Modifiers that turn a key into a shortcut rather than text.
const SHORTCUT_MASK: u32 =
    modifier::CONTROL | modifier::MOD1 | modifier::SUPER | modifier::HYPER | modifier::META;

/// Full-width composer state for one input context.
#[derive(Debug, Default)]
pub struct FullwidthIm {
    // half-width, ASCII only
    preedit: TextBuffer,
    callbacks: CallbackRegistry,
    cursor_area: Rect,
    focused: bool,
}

impl FullwidthIm {
    pub fn new() -> Self {
        Self::default()
    }

    /// The half-width text being composed.
    pub fn pending(&self) -> String {
        self.preedit.to_string_lossy().into_owned()
    }

    /// Last area passed to `set_cursor_pos`.
    pub fn cursor_area(&self) -> Rect {
        self.cursor_area
    }

    pub fn is_focused(&self) -> bool {
        self.focused
    }

    fn notify(&mut self) {
        if self.preedit.is_empty() {
            self.callbacks.emit_preedit_changed(&PreeditState::default());
            self.close_phases();
            return;
        }
        let preedit = self.get_preedit();
        let candidate = self.get_candidate();
        self.callbacks.update_preedit(&preedit);
        self.callbacks.update_candidate(&candidate);
    }

    fn close_phases(&mut self) {
        self.callbacks.finish_candidate();
        self.callbacks.finish_preedit();
    }

    /// Send `text` to the host and drop the preedit.
    fn commit(&mut self, text: &str) {
        let had_preedit = !self.preedit.is_empty();
        self.preedit.clear();
        if had_preedit {
            self.notify();
        }
        tracing::debug!(text, "commit");
        self.callbacks.emit_commit(text);
    }

    fn commit_preedit(&mut self, halfwidth: bool) {
        let half = self.pending();
        let text = if halfwidth { half } else { to_fullwidth(&half) };
        self.commit(&text);
    }

    fn cancel(&mut self) {
        self.preedit.clear();
        self.notify();
    }
}

impl InputMethod for FullwidthIm {
    fn name(&self) -> &str {
        crate::BACKEND_NAME
    }

    fn focus_in(&mut self) {
        self.focused = true;
    }

    fn focus_out(&mut self) {
        self.focused = false;
        if !self.preedit.is_empty() {
            self.commit_preedit(false);
        }
    }

    fn reset(&mut self) {
        self.preedit.clear();
        self.close_phases();
    }

    fn filter_event(&mut self, event: &CimEvent) -> bool {
        if !event.is_press() || event.has_modifier(SHORTCUT_MASK) {
            return false;
        }

        let composing = !self.preedit.is_empty();
        match event.keyval {
            keyval if keysym::is_printable_ascii(keyval) => {
                if let Some(ch) = keysym::to_char(keyval) {
                    self.preedit.push(ch);
                    self.notify();
                }
                true
            }
            keysym::SPACE => {
                if composing {
                    self.commit_preedit(false);
                } else {
                    self.commit(IDEOGRAPHIC_SPACE.encode_utf8(&mut [0; 4]));
                }
                true
            }
            keysym::RETURN | keysym::KP_ENTER if composing => {
                self.commit_preedit(event.has_modifier(modifier::SHIFT));
                true
            }
            keysym::BACKSPACE if composing => {
                self.preedit.pop_char();
                self.notify();
                true
            }
            keysym::ESCAPE if composing => {
                self.cancel();
                true
            }
            // swallowed mid-composition
            _ => composing,
        }
    }

    fn set_cursor_pos(&mut self, area: &Rect) {
        self.cursor_area = *area;
    }

    fn get_preedit(&self) -> PreeditState {
        if self.preedit.is_empty() {
            return PreeditState::default();
        }
        let n_chars = self.preedit.char_len();
        PreeditState {
            text: to_fullwidth(&self.preedit.to_string_lossy()),
            attrs: vec![PreeditAttr::new(PreeditAttrKind::Underline, 0, n_chars)],
            cursor: n_chars,
        }
    }

    fn get_candidate(&self) -> CandidateState {
        if self.preedit.is_empty() {
            return CandidateState::default();
        }
        let half = self.pending();
        CandidateState {
            page_index: 0,
            n_pages: 1,
            table: vec![vec![to_fullwidth(&half).into(), half.into()]],
        }
    }

    fn set_callback(&mut self, kind: CallbackKind, callback: Option<Callback>) {
        self.callbacks.set(kind, callback);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    fn recording() -> (FullwidthIm, Rc<RefCell<Vec<String>>>) {
        let log = Rc::new(RefCell::new(Vec::new()));
        let mut im = FullwidthIm::new();

        let l = log.clone();
        im.set_callback(
            CallbackKind::PreeditStart,
            Some(Callback::preedit_start(move || l.borrow_mut().push("preedit-start".into()))),
        );
        let l = log.clone();
        im.set_callback(
            CallbackKind::PreeditChanged,
            Some(Callback::preedit_changed(move |p| {
                l.borrow_mut().push(format!("preedit:{}", p.text))
            })),
        );
        let l = log.clone();
        im.set_callback(
            CallbackKind::PreeditEnd,
            Some(Callback::preedit_end(move || l.borrow_mut().push("preedit-end".into()))),
        );
        let l = log.clone();
        im.set_callback(
            CallbackKind::Commit,
            Some(Callback::commit(move |t| l.borrow_mut().push(format!("commit:{}", t)))),
        );
        (im, log)
    }

    fn press(im: &mut FullwidthIm, keyval: u32) -> bool {
        im.filter_event(&CimEvent::key_press(keyval, 0))
    }

    #[test]
    fn test_typing_builds_fullwidth_preedit() {
        let mut im = FullwidthIm::new();
        assert!(press(&mut im, keysym::KEY_LOWER_A));
        assert!(press(&mut im, keysym::KEY_0));

        let preedit = im.get_preedit();
        assert_eq!(preedit.text, "ａ０");
        assert_eq!(preedit.cursor, 2);
        assert_eq!(preedit.attrs, vec![PreeditAttr::new(PreeditAttrKind::Underline, 0, 2)]);

        let candidate = im.get_candidate();
        assert_eq!(candidate.n_pages, 1);
        assert_eq!(candidate.n_cols(), 2);
        assert_eq!(candidate.get(0, 1).map(|i| i.as_str()), Some("a0"));
    }

    #[test]
    fn test_return_commits_and_brackets_preedit() {
        let (mut im, log) = recording();
        press(&mut im, keysym::KEY_LOWER_A);
        press(&mut im, keysym::KEY_LOWER_Z);
        assert!(press(&mut im, keysym::RETURN));

        assert_eq!(
            *log.borrow(),
            vec![
                "preedit-start",
                "preedit:ａ",
                "preedit:ａｚ",
                "preedit:",
                "preedit-end",
                "commit:ａｚ",
            ]
        );
        assert!(im.pending().is_empty());
    }

    #[test]
    fn test_shift_return_commits_halfwidth() {
        let (mut im, log) = recording();
        press(&mut im, keysym::KEY_A);
        assert!(im.filter_event(&CimEvent::key_press(keysym::RETURN, modifier::SHIFT)));
        assert_eq!(log.borrow().last().map(String::as_str), Some("commit:A"));
    }

    #[test]
    fn test_space_on_empty_preedit_commits_ideographic_space() {
        let (mut im, log) = recording();
        assert!(press(&mut im, keysym::SPACE));
        assert_eq!(*log.borrow(), vec!["commit:\u{3000}"]);
    }

    #[test]
    fn test_backspace_and_escape() {
        let (mut im, log) = recording();
        press(&mut im, keysym::KEY_LOWER_A);
        press(&mut im, keysym::KEY_LOWER_A + 1);
        assert!(press(&mut im, keysym::BACKSPACE));
        assert_eq!(im.pending(), "a");

        assert!(press(&mut im, keysym::ESCAPE));
        assert!(im.pending().is_empty());
        assert!(!log.borrow().iter().any(|e| e.starts_with("commit:")));
        assert_eq!(log.borrow().last().map(String::as_str), Some("preedit-end"));

        // nothing left to edit
        assert!(!press(&mut im, keysym::BACKSPACE));
        assert!(!press(&mut im, keysym::ESCAPE));
    }

    #[test]
    fn test_pass_through_rules() {
        let mut im = FullwidthIm::new();
        assert!(!press(&mut im, keysym::RETURN));
        assert!(!press(&mut im, keysym::LEFT));
        assert!(!im.filter_event(&CimEvent::key_press(keysym::KEY_LOWER_A, modifier::CONTROL)));
        assert!(!im.filter_event(&CimEvent::key_release(keysym::KEY_LOWER_A, 0)));

        press(&mut im, keysym::KEY_LOWER_A);
        assert!(press(&mut im, keysym::LEFT), "navigation is swallowed mid-composition");
        assert!(!im.filter_event(&CimEvent::key_release(keysym::KEY_LOWER_A, 0)));
    }

    #[test]
    fn test_focus_out_commits_and_reset_discards() {
        let (mut im, log) = recording();
        im.focus_in();
        assert!(im.is_focused());
        press(&mut im, keysym::KEY_LOWER_A);
        im.focus_out();
        assert!(!im.is_focused());
        assert_eq!(log.borrow().last().map(String::as_str), Some("commit:ａ"));

        log.borrow_mut().clear();
        press(&mut im, keysym::KEY_LOWER_A);
        im.reset();
        assert_eq!(*log.borrow(), vec!["preedit-start", "preedit:ａ", "preedit-end"]);
        assert_eq!(im.get_preedit(), PreeditState::default());
        assert!(im.get_candidate().is_empty());
    }

    #[test]
    fn test_cursor_area_is_recorded() {
        let mut im = FullwidthIm::new();
        im.set_cursor_pos(&Rect::new(4, 8, 1, 18));
        assert_eq!(im.cursor_area(), Rect::new(4, 8, 1, 18));
    }
}
