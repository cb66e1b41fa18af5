//! A minimal text-field host: keeps a document, answers surrounding-text
//! requests from it, and records every callback as a line of transcript.

use std::cell::RefCell;
use std::rc::Rc;

use anyhow::{bail, Result};
use libcim::keysym;
use libcim::{
    Callback, CallbackKind, CandidateState, CimEvent, InputContext, PreeditState, SurroundState,
};
use libcim_core::TextBuffer;

#[derive(Default)]
struct State {
    document: TextBuffer,
    transcript: Vec<String>,
}

#[derive(Clone, Default)]
pub struct Host {
    state: Rc<RefCell<State>>,
}

impl Host {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a handler for every callback kind on `ctx`.
    pub fn attach(&self, ctx: &mut InputContext) {
        for kind in CallbackKind::ALL {
            ctx.set_callback(kind, Some(self.callback(kind)));
        }
    }

    pub fn document(&self) -> String {
        self.state.borrow().document.to_string_lossy().into_owned()
    }

    /// Drain the transcript recorded so far.
    pub fn take_transcript(&self) -> Vec<String> {
        std::mem::take(&mut self.state.borrow_mut().transcript)
    }

    /// Send `text` as key presses (and releases). `\n` is Return, `\x1b` is
    /// Escape and `\x08` is BackSpace. Returns how many presses were consumed.
    pub fn type_text(&self, ctx: &mut InputContext, text: &str) -> Result<usize> {
        let mut consumed = 0;
        for ch in text.chars() {
            let keyval = match ch {
                '\n' => keysym::RETURN,
                '\x1b' => keysym::ESCAPE,
                '\x08' => keysym::BACKSPACE,
                _ => match keysym::from_char(ch) {
                    Some(keyval) => keyval,
                    None => bail!("no key symbol for {:?}", ch),
                },
            };

            let handled = ctx.filter_event(&CimEvent::key_press(keyval, 0));
            ctx.filter_event(&CimEvent::key_release(keyval, 0));
            if handled {
                consumed += 1;
            } else if let Some(c) = keysym::to_char(keyval) {
                // unhandled keys type themselves, like a plain text field
                self.state.borrow_mut().document.push(c);
            }
            self.record(format!("key {:?} {}", ch, if handled { "consumed" } else { "passed" }));
        }
        Ok(consumed)
    }

    fn record(&self, line: String) {
        self.state.borrow_mut().transcript.push(line);
    }

    fn callback(&self, kind: CallbackKind) -> Callback {
        let host = self.clone();
        match kind {
            CallbackKind::PreeditStart => {
                Callback::preedit_start(move || host.record("preedit-start".into()))
            }
            CallbackKind::PreeditEnd => {
                Callback::preedit_end(move || host.record("preedit-end".into()))
            }
            CallbackKind::PreeditChanged => {
                Callback::preedit_changed(move |p| host.record(describe_preedit(p)))
            }
            CallbackKind::Commit => Callback::commit(move |text| {
                host.state.borrow_mut().document.append(text);
                host.record(format!("commit {:?}", text));
            }),
            CallbackKind::GetSurround => Callback::get_surround(move || {
                let state = host.state.borrow();
                let text = state.document.to_str()?.to_string();
                let cursor = state.document.char_len();
                Some(SurroundState::new(text, cursor, cursor))
            }),
            CallbackKind::DeleteSurround => Callback::delete_surround(move |offset, n_chars| {
                let ok = host.delete_surround(offset, n_chars);
                host.record(format!("delete-surround {} {} -> {}", offset, n_chars, ok));
                ok
            }),
            CallbackKind::CandidateStart => {
                Callback::candidate_start(move || host.record("candidate-start".into()))
            }
            CallbackKind::CandidateEnd => {
                Callback::candidate_end(move || host.record("candidate-end".into()))
            }
            CallbackKind::CandidateChanged => {
                Callback::candidate_changed(move |c| host.record(describe_candidate(c)))
            }
        }
    }

    // The cursor always sits at the end of the document.
    fn delete_surround(&self, offset: i32, n_chars: i32) -> bool {
        let mut state = self.state.borrow_mut();
        let start = state.document.char_len() as i64 + offset as i64;
        if start < 0 || n_chars < 0 {
            return false;
        }
        state.document.erase_chars(start as usize, n_chars as usize)
    }
}

fn describe_preedit(preedit: &PreeditState) -> String {
    format!(
        "preedit-changed {:?} cursor={} attrs={}",
        preedit.text,
        preedit.cursor,
        preedit.attrs.len()
    )
}

fn describe_candidate(candidate: &CandidateState) -> String {
    let rows: Vec<String> = candidate
        .table
        .iter()
        .map(|row| row.iter().map(|item| item.as_str()).collect::<Vec<_>>().join(" | "))
        .collect();
    format!(
        "candidate-changed page {}/{} [{}]",
        candidate.page_index + 1,
        candidate.n_pages,
        rows.join("; ")
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use cim_fullwidth::FullwidthIm;

    #[test]
    fn test_transcript_of_fullwidth_session() {
        let host = Host::new();
        let mut ctx = InputContext::from_backend(Box::new(FullwidthIm::new()));
        host.attach(&mut ctx);

        let consumed = host.type_text(&mut ctx, "ab\n").unwrap();
        assert_eq!(consumed, 3);
        assert_eq!(host.document(), "ａｂ");

        let transcript = host.take_transcript();
        assert_eq!(transcript.first().map(String::as_str), Some("preedit-start"));
        assert!(transcript.contains(&"candidate-changed page 1/1 [ａｂ | ab]".to_string()));
        assert!(transcript.contains(&"commit \"ａｂ\"".to_string()));
        assert!(host.take_transcript().is_empty());
    }

    #[test]
    fn test_null_context_types_plain_text() {
        let host = Host::new();
        let mut ctx = InputContext::null();
        host.attach(&mut ctx);

        assert_eq!(host.type_text(&mut ctx, "hi there").unwrap(), 0);
        assert_eq!(host.document(), "hi there");
        assert!(host.type_text(&mut ctx, "é").is_err());
    }

    #[test]
    fn test_delete_surround_from_end() {
        let host = Host::new();
        host.state.borrow_mut().document.assign("한글");
        assert!(host.delete_surround(-1, 1));
        assert_eq!(host.document(), "한");
        assert!(!host.delete_surround(-5, 1));
    }
}
