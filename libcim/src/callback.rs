//! Host callbacks invoked by backends.
//!
//! A host registers one closure per [`CallbackKind`] through
//! `InputContext::set_callback`; the backend keeps them in a
//! [`CallbackRegistry`] and calls back synchronously while it handles a
//! request. Closures capture whatever host state they need.
//!
//! Callback groups:
//! - preedit: `preedit_start`, `preedit_changed`*, `preedit_end`
//! - candidate: `candidate_start`, `candidate_changed`*, `candidate_end`
//! - `commit`, on its own
//! - `get_surround` / `delete_surround`, requests answered by the host

use std::fmt;

use crate::types::{CandidateState, PreeditState, SurroundState};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CallbackKind {
    PreeditStart,
    PreeditEnd,
    PreeditChanged,
    Commit,
    GetSurround,
    DeleteSurround,
    CandidateStart,
    CandidateEnd,
    CandidateChanged,
}

impl CallbackKind {
    pub const COUNT: usize = 9;

    pub const ALL: [CallbackKind; Self::COUNT] = [
        CallbackKind::PreeditStart,
        CallbackKind::PreeditEnd,
        CallbackKind::PreeditChanged,
        CallbackKind::Commit,
        CallbackKind::GetSurround,
        CallbackKind::DeleteSurround,
        CallbackKind::CandidateStart,
        CallbackKind::CandidateEnd,
        CallbackKind::CandidateChanged,
    ];

    pub fn index(self) -> usize {
        self as usize
    }

    pub fn name(self) -> &'static str {
        match self {
            CallbackKind::PreeditStart => "preedit-start",
            CallbackKind::PreeditEnd => "preedit-end",
            CallbackKind::PreeditChanged => "preedit-changed",
            CallbackKind::Commit => "commit",
            CallbackKind::GetSurround => "get-surround",
            CallbackKind::DeleteSurround => "delete-surround",
            CallbackKind::CandidateStart => "candidate-start",
            CallbackKind::CandidateEnd => "candidate-end",
            CallbackKind::CandidateChanged => "candidate-changed",
        }
    }
}

impl fmt::Display for CallbackKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A host-supplied handler, one variant per [`CallbackKind`].
pub enum Callback {
    PreeditStart(Box<dyn FnMut()>),
    PreeditEnd(Box<dyn FnMut()>),
    PreeditChanged(Box<dyn FnMut(&PreeditState)>),
    Commit(Box<dyn FnMut(&str)>),
    /// Answer with the text around the cursor, or `None` if unavailable.
    GetSurround(Box<dyn FnMut() -> Option<SurroundState>>),
    /// Delete `n_chars` characters starting `offset` characters from the
    /// cursor (negative is before it). Return whether it worked.
    DeleteSurround(Box<dyn FnMut(i32, i32) -> bool>),
    CandidateStart(Box<dyn FnMut()>),
    CandidateEnd(Box<dyn FnMut()>),
    CandidateChanged(Box<dyn FnMut(&CandidateState)>),
}

impl Callback {
    pub fn kind(&self) -> CallbackKind {
        match self {
            Callback::PreeditStart(_) => CallbackKind::PreeditStart,
            Callback::PreeditEnd(_) => CallbackKind::PreeditEnd,
            Callback::PreeditChanged(_) => CallbackKind::PreeditChanged,
            Callback::Commit(_) => CallbackKind::Commit,
            Callback::GetSurround(_) => CallbackKind::GetSurround,
            Callback::DeleteSurround(_) => CallbackKind::DeleteSurround,
            Callback::CandidateStart(_) => CallbackKind::CandidateStart,
            Callback::CandidateEnd(_) => CallbackKind::CandidateEnd,
            Callback::CandidateChanged(_) => CallbackKind::CandidateChanged,
        }
    }

    pub fn preedit_start(f: impl FnMut() + 'static) -> Self {
        Callback::PreeditStart(Box::new(f))
    }

    pub fn preedit_end(f: impl FnMut() + 'static) -> Self {
        Callback::PreeditEnd(Box::new(f))
    }

    pub fn preedit_changed(f: impl FnMut(&PreeditState) + 'static) -> Self {
        Callback::PreeditChanged(Box::new(f))
    }

    pub fn commit(f: impl FnMut(&str) + 'static) -> Self {
        Callback::Commit(Box::new(f))
    }

    pub fn get_surround(f: impl FnMut() -> Option<SurroundState> + 'static) -> Self {
        Callback::GetSurround(Box::new(f))
    }

    pub fn delete_surround(f: impl FnMut(i32, i32) -> bool + 'static) -> Self {
        Callback::DeleteSurround(Box::new(f))
    }

    pub fn candidate_start(f: impl FnMut() + 'static) -> Self {
        Callback::CandidateStart(Box::new(f))
    }

    pub fn candidate_end(f: impl FnMut() + 'static) -> Self {
        Callback::CandidateEnd(Box::new(f))
    }

    pub fn candidate_changed(f: impl FnMut(&CandidateState) + 'static) -> Self {
        Callback::CandidateChanged(Box::new(f))
    }
}

impl fmt::Debug for Callback {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Callback({})", self.kind())
    }
}

/// Per-handle table of host callbacks, owned by the backend.
///
/// Besides plain dispatch, the registry tracks whether a preedit or
/// candidate phase is open so backends can use [`update_preedit`] /
/// [`finish_preedit`] (and the candidate equivalents) without emitting
/// unbalanced start/end pairs.
///
/// [`update_preedit`]: CallbackRegistry::update_preedit
/// [`finish_preedit`]: CallbackRegistry::finish_preedit
#[derive(Default)]
pub struct CallbackRegistry {
    slots: [Option<Callback>; CallbackKind::COUNT],
    preedit_open: bool,
    candidate_open: bool,
}

impl CallbackRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `callback` for `kind`, replacing any previous handler.
    /// `None` clears the slot.
    ///
    /// A callback whose variant does not match `kind` is rejected with a
    /// warning and leaves the slot untouched.
    pub fn set(&mut self, kind: CallbackKind, callback: Option<Callback>) {
        if let Some(cb) = &callback {
            if cb.kind() != kind {
                tracing::warn!("refusing {} handler for the {} slot", cb.kind(), kind);
                return;
            }
        }
        self.slots[kind.index()] = callback;
    }

    pub fn is_set(&self, kind: CallbackKind) -> bool {
        self.slots[kind.index()].is_some()
    }

    pub fn is_preedit_open(&self) -> bool {
        self.preedit_open
    }

    pub fn is_candidate_open(&self) -> bool {
        self.candidate_open
    }

    pub fn emit_preedit_start(&mut self) {
        if let Some(Callback::PreeditStart(f)) = self.slot(CallbackKind::PreeditStart) {
            f();
        }
    }

    pub fn emit_preedit_end(&mut self) {
        if let Some(Callback::PreeditEnd(f)) = self.slot(CallbackKind::PreeditEnd) {
            f();
        }
    }

    pub fn emit_preedit_changed(&mut self, preedit: &PreeditState) {
        if let Some(Callback::PreeditChanged(f)) = self.slot(CallbackKind::PreeditChanged) {
            f(preedit);
        }
    }

    pub fn emit_commit(&mut self, text: &str) {
        if let Some(Callback::Commit(f)) = self.slot(CallbackKind::Commit) {
            f(text);
        }
    }

    /// Ask the host for the surrounding text. `None` if no handler is set or
    /// the host has none to offer.
    pub fn get_surround(&mut self) -> Option<SurroundState> {
        match self.slot(CallbackKind::GetSurround) {
            Some(Callback::GetSurround(f)) => f(),
            _ => None,
        }
    }

    /// Ask the host to delete surrounding text. False if no handler is set.
    pub fn delete_surround(&mut self, offset: i32, n_chars: i32) -> bool {
        match self.slot(CallbackKind::DeleteSurround) {
            Some(Callback::DeleteSurround(f)) => f(offset, n_chars),
            _ => false,
        }
    }

    pub fn emit_candidate_start(&mut self) {
        if let Some(Callback::CandidateStart(f)) = self.slot(CallbackKind::CandidateStart) {
            f();
        }
    }

    pub fn emit_candidate_end(&mut self) {
        if let Some(Callback::CandidateEnd(f)) = self.slot(CallbackKind::CandidateEnd) {
            f();
        }
    }

    pub fn emit_candidate_changed(&mut self, candidate: &CandidateState) {
        if let Some(Callback::CandidateChanged(f)) = self.slot(CallbackKind::CandidateChanged) {
            f(candidate);
        }
    }

    /// Emit `preedit_changed`, opening the preedit phase first if needed.
    pub fn update_preedit(&mut self, preedit: &PreeditState) {
        if !self.preedit_open {
            self.preedit_open = true;
            self.emit_preedit_start();
        }
        self.emit_preedit_changed(preedit);
    }

    /// Close the preedit phase if one is open.
    pub fn finish_preedit(&mut self) {
        if self.preedit_open {
            self.preedit_open = false;
            self.emit_preedit_end();
        }
    }

    /// Emit `candidate_changed`, opening the candidate phase first if needed.
    pub fn update_candidate(&mut self, candidate: &CandidateState) {
        if !self.candidate_open {
            self.candidate_open = true;
            self.emit_candidate_start();
        }
        self.emit_candidate_changed(candidate);
    }

    /// Close the candidate phase if one is open.
    pub fn finish_candidate(&mut self) {
        if self.candidate_open {
            self.candidate_open = false;
            self.emit_candidate_end();
        }
    }

    fn slot(&mut self, kind: CallbackKind) -> Option<&mut Callback> {
        self.slots[kind.index()].as_mut()
    }
}

impl fmt::Debug for CallbackRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let set: Vec<_> = CallbackKind::ALL
            .iter()
            .filter(|kind| self.is_set(**kind))
            .map(|kind| kind.name())
            .collect();
        f.debug_struct("CallbackRegistry")
            .field("set", &set)
            .field("preedit_open", &self.preedit_open)
            .field("candidate_open", &self.candidate_open)
            .finish()
    }
}
