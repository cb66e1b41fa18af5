//! libcim crate root
//!
//! The layer between an application ("host") and an input-method backend.
//! The host obtains an [`InputContext`] per text field, forwards focus
//! changes, key events and cursor geometry to it, and receives preedit,
//! candidate and commit notifications through callbacks it registered.
//!
//! The backend is resolved by a [`PluginLoader`]: either a shared module at
//! `<user-config-dir>/cim.so` exporting `cim_plugin_new` / `cim_plugin_free`,
//! or a backend compiled into the process and registered by name. When
//! nothing can be resolved every handle is a null handle and the host keeps
//! working without an input method.
//!
//! Public API exported here:
//! - `acquire` / `release` on the process-wide loader
//! - `InputContext`, `InputMethod`, `BackendKind` from `context`
//! - `Callback`, `CallbackKind`, `CallbackRegistry` from `callback`
//! - event, preedit and candidate types from `types`

pub mod callback;
pub mod context;
pub mod keysym;
pub mod loader;
pub mod plugin;
pub mod registry;
pub mod types;

pub use callback::{Callback, CallbackKind, CallbackRegistry};
pub use context::{BackendKind, InputContext, InputMethod, NullInputMethod};
pub use loader::PluginLoader;
pub use registry::{register_backend, registered_backends, unregister_backend, BackendFactory};
pub use types::{
    modifier, CandidateState, CimEvent, EventType, Item, PreeditAttr, PreeditAttrKind,
    PreeditState, Rect, SurroundState,
};

pub use libcim_core::{Config, PluginSource};

/// Create an input context from the process-wide loader.
///
/// The first call after every handle has been released resolves the backend
/// again. Never fails; see [`PluginLoader::acquire`].
pub fn acquire() -> InputContext {
    PluginLoader::global().acquire()
}

/// Release an input context created by [`acquire`]. Dropping it does the
/// same.
pub fn release(ctx: InputContext) {
    PluginLoader::global().release(ctx);
}
