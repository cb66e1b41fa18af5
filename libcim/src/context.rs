//! Input-method capability interface and the per-context handle.
//!
//! A backend implements [`InputMethod`]. Every method has a default, so a
//! backend only overrides what it supports:
//!
//! | capability       | default                                   |
//! |------------------|-------------------------------------------|
//! | `focus_in`       | no-op                                     |
//! | `focus_out`      | no-op                                     |
//! | `reset`          | no-op                                     |
//! | `filter_event`   | `false` (event not consumed)              |
//! | `set_cursor_pos` | no-op                                     |
//! | `get_preedit`    | empty text, no attributes, cursor 0       |
//! | `get_candidate`  | no pages, empty table                     |
//! | `set_callback`   | logged as an error, callback dropped      |
//!
//! `set_callback` is the one capability a real backend must provide: without
//! it the host never hears about committed text.
//!
//! Hosts never talk to a backend directly. They hold an [`InputContext`],
//! obtained from a [`crate::PluginLoader`], which forwards to whichever
//! backend was resolved and releases it when dropped.

use std::ffi::c_void;
use std::fmt;
use std::ptr::NonNull;
use std::sync::Arc;

use crate::callback::{Callback, CallbackKind};
use crate::loader::LoaderShared;
use crate::plugin::PluginFreeFn;
use crate::types::{CandidateState, CimEvent, PreeditState, Rect};

/// The capability set of an input-method backend.
pub trait InputMethod {
    /// Short name for diagnostics.
    fn name(&self) -> &str {
        "unnamed"
    }

    fn focus_in(&mut self) {}

    fn focus_out(&mut self) {}

    /// Drop any composition in progress.
    fn reset(&mut self) {}

    /// Offer a key event to the backend. `true` means it was consumed and
    /// the host must not process it further.
    fn filter_event(&mut self, _event: &CimEvent) -> bool {
        false
    }

    /// Cursor geometry in absolute pixels, for placing candidate windows.
    fn set_cursor_pos(&mut self, _area: &Rect) {}

    fn get_preedit(&self) -> PreeditState {
        PreeditState::default()
    }

    fn get_candidate(&self) -> CandidateState {
        CandidateState::default()
    }

    /// Register (or with `None`, clear) the host handler for `kind`.
    fn set_callback(&mut self, kind: CallbackKind, _callback: Option<Callback>) {
        tracing::error!(
            backend = self.name(),
            %kind,
            "set_callback() must be implemented by the input method backend"
        );
    }
}

/// Backend used when nothing could be resolved. Every capability keeps its
/// default.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullInputMethod;

impl InputMethod for NullInputMethod {
    fn name(&self) -> &str {
        "null"
    }
}

/// Where the backend behind a handle came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BackendKind {
    /// Created by a dynamically loaded module.
    Plugin,
    /// Created by a compiled-in factory, or wrapped directly by the host.
    Builtin,
    /// Nothing resolved; all capabilities use their defaults.
    Null,
}

pub(crate) enum Backend {
    Owned(Box<dyn InputMethod>),
    // Allocated by a plugin; must go back through its own free function.
    Plugin { raw: NonNull<c_void>, free: PluginFreeFn },
}

impl Backend {
    pub(crate) fn null() -> Self {
        Backend::Owned(Box::new(NullInputMethod))
    }
}

/// Handle to one input context.
///
/// Dropping the handle (or passing it to [`crate::PluginLoader::release`])
/// destroys the backend instance and gives the loader's reference back.
pub struct InputContext {
    backend: Backend,
    kind: BackendKind,
    loader: Option<Arc<LoaderShared>>,
}

impl InputContext {
    pub(crate) fn new(
        backend: Backend,
        kind: BackendKind,
        loader: Option<Arc<LoaderShared>>,
    ) -> Self {
        Self {
            backend,
            kind,
            loader,
        }
    }

    /// Wrap a backend instance directly, without going through a loader.
    pub fn from_backend(backend: Box<dyn InputMethod>) -> Self {
        Self::new(Backend::Owned(backend), BackendKind::Builtin, None)
    }

    /// A handle whose capabilities all take their defaults.
    pub fn null() -> Self {
        Self::new(Backend::null(), BackendKind::Null, None)
    }

    pub fn backend_kind(&self) -> BackendKind {
        self.kind
    }

    pub fn backend_name(&self) -> &str {
        self.backend().name()
    }

    pub fn focus_in(&mut self) {
        self.backend_mut().focus_in();
    }

    pub fn focus_out(&mut self) {
        self.backend_mut().focus_out();
    }

    pub fn reset(&mut self) {
        self.backend_mut().reset();
    }

    pub fn filter_event(&mut self, event: &CimEvent) -> bool {
        self.backend_mut().filter_event(event)
    }

    pub fn set_cursor_pos(&mut self, area: &Rect) {
        self.backend_mut().set_cursor_pos(area);
    }

    /// Current preedit. The snapshot reflects the state at the time of the
    /// call only.
    pub fn get_preedit(&self) -> PreeditState {
        self.backend().get_preedit()
    }

    pub fn get_candidate(&self) -> CandidateState {
        self.backend().get_candidate()
    }

    pub fn set_callback(&mut self, kind: CallbackKind, callback: Option<Callback>) {
        self.backend_mut().set_callback(kind, callback);
    }

    pub(crate) fn belongs_to(&self, loader: &Arc<LoaderShared>) -> bool {
        self.loader
            .as_ref()
            .is_some_and(|own| Arc::ptr_eq(own, loader))
    }

    fn backend(&self) -> &dyn InputMethod {
        match &self.backend {
            Backend::Owned(b) => b.as_ref(),
            // SAFETY: `raw` came from the plugin's `cim_plugin_new`, which
            // returns a `Box<Box<dyn InputMethod>>` leaked as a thin pointer,
            // and stays valid until we hand it to `free` in `drop`.
            Backend::Plugin { raw, .. } => unsafe {
                (*(raw.as_ptr() as *const Box<dyn InputMethod>)).as_ref()
            },
        }
    }

    fn backend_mut(&mut self) -> &mut dyn InputMethod {
        match &mut self.backend {
            Backend::Owned(b) => b.as_mut(),
            // SAFETY: see `backend`; `&mut self` guarantees exclusive access.
            Backend::Plugin { raw, .. } => unsafe {
                (*(raw.as_ptr() as *mut Box<dyn InputMethod>)).as_mut()
            },
        }
    }
}

impl Drop for InputContext {
    fn drop(&mut self) {
        // The instance has to be gone before the loader may unload the
        // module that owns its code.
        match std::mem::replace(&mut self.backend, Backend::null()) {
            Backend::Owned(b) => drop(b),
            // SAFETY: `raw` was produced by the matching `cim_plugin_new` and
            // is released exactly once, here.
            Backend::Plugin { raw, free } => unsafe { free(raw.as_ptr()) },
        }

        if let Some(loader) = self.loader.take() {
            loader.release_one();
        }
    }
}

impl fmt::Debug for InputContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("InputContext")
            .field("backend", &self.backend_name())
            .field("kind", &self.kind)
            .finish()
    }
}
