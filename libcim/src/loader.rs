//! Resolves the backend and hands out input contexts.
//!
//! A `PluginLoader` owns the resolved backend (a loaded module with its two
//! entry points, or a compiled-in factory) together with a count of live
//! [`InputContext`]s. The backend is resolved when the count goes from 0 to
//! 1 and dropped when it returns to 0, so the module stays mapped exactly as
//! long as some handle may still run its code.
//!
//! Resolution failures never reach the caller. They are logged, and every
//! handle acquired until the count drains back to zero is a null handle.
//! Only the next 0 → 1 transition tries again.
//!
//! Most hosts use the process-wide loader through [`crate::acquire`] and
//! [`crate::release`]; separate instances are handy in tests.

use anyhow::{anyhow, bail, Context, Result};
use libloading::Library;
use libcim_core::{Config, PluginSource};
use once_cell::sync::Lazy;
use std::path::{Path, PathBuf};
use std::ptr::NonNull;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};

use crate::context::{Backend, BackendKind, InputContext};
use crate::plugin::{PluginFreeFn, PluginNewFn, PLUGIN_FREE_SYMBOL, PLUGIN_NEW_SYMBOL};
use crate::registry::{self, BackendFactory};

static GLOBAL: Lazy<PluginLoader> =
    Lazy::new(|| PluginLoader::from_config(&Config::load_default()));

/// A shared module with both entry points resolved.
struct LoadedModule {
    path: PathBuf,
    new_fn: PluginNewFn,
    free_fn: PluginFreeFn,
    // Unloaded on drop; keep last.
    _library: Library,
}

impl LoadedModule {
    fn open(path: &Path) -> Result<Self> {
        if !path.exists() {
            bail!("{} not found", path.display());
        }

        // SAFETY: loading runs the module's initializers; the module is
        // trusted by virtue of living in the user's own config directory.
        let library = unsafe { Library::new(path) }
            .with_context(|| format!("failed to load {}", path.display()))?;

        // SAFETY: the symbol types are fixed by the plugin ABI.
        let new_fn = unsafe { library.get::<PluginNewFn>(PLUGIN_NEW_SYMBOL) }
            .map(|symbol| *symbol)
            .with_context(|| format!("missing symbol `cim_plugin_new` in {}", path.display()))?;
        // SAFETY: as above.
        let free_fn = unsafe { library.get::<PluginFreeFn>(PLUGIN_FREE_SYMBOL) }
            .map(|symbol| *symbol)
            .with_context(|| format!("missing symbol `cim_plugin_free` in {}", path.display()))?;

        Ok(Self {
            path: path.to_path_buf(),
            new_fn,
            free_fn,
            _library: library,
        })
    }
}

enum ResolvedBackend {
    Dynamic(LoadedModule),
    Builtin { name: String, factory: BackendFactory },
}

impl ResolvedBackend {
    fn resolve(source: &PluginSource) -> Result<Self> {
        match source {
            PluginSource::Builtin(name) => {
                let factory = registry::lookup_backend(name)
                    .ok_or_else(|| anyhow!("no compiled-in backend named `{}`", name))?;
                Ok(ResolvedBackend::Builtin {
                    name: name.clone(),
                    factory,
                })
            }
            PluginSource::Dynamic(path) => {
                let path = path
                    .as_deref()
                    .ok_or_else(|| anyhow!("cannot determine the user config directory"))?;
                LoadedModule::open(path).map(ResolvedBackend::Dynamic)
            }
        }
    }

    fn describe(&self) -> String {
        match self {
            ResolvedBackend::Dynamic(module) => module.path.display().to_string(),
            ResolvedBackend::Builtin { name, .. } => format!("builtin:{}", name),
        }
    }

    fn instantiate(&self) -> (Backend, BackendKind) {
        match self {
            ResolvedBackend::Dynamic(module) => {
                // SAFETY: entry point resolved from a module that stays
                // loaded while any handle is alive.
                let raw = unsafe { (module.new_fn)() };
                match NonNull::new(raw) {
                    Some(raw) => (
                        Backend::Plugin {
                            raw,
                            free: module.free_fn,
                        },
                        BackendKind::Plugin,
                    ),
                    None => {
                        tracing::warn!(
                            "cim_plugin_new in {} returned null, using null backend",
                            module.path.display()
                        );
                        (Backend::null(), BackendKind::Null)
                    }
                }
            }
            ResolvedBackend::Builtin { factory, .. } => {
                (Backend::Owned(factory()), BackendKind::Builtin)
            }
        }
    }
}

/// Loader state shared with every handle it produced.
pub(crate) struct LoaderShared {
    source: PluginSource,
    ref_count: AtomicUsize,
    // `Some` iff the last 0 -> 1 transition resolved a backend.
    state: Mutex<Option<ResolvedBackend>>,
}

impl LoaderShared {
    fn lock_state(&self) -> MutexGuard<'_, Option<ResolvedBackend>> {
        self.state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Called by a handle once its backend instance is destroyed.
    pub(crate) fn release_one(&self) {
        let mut state = self.lock_state();
        let previous = self
            .ref_count
            .fetch_update(Ordering::AcqRel, Ordering::Acquire, |n| n.checked_sub(1));

        match previous {
            Ok(1) => {
                if let Some(resolved) = state.take() {
                    tracing::debug!(
                        backend = %resolved.describe(),
                        "last input context released, unloading"
                    );
                }
            }
            Ok(_) => {}
            Err(_) => tracing::warn!("input context released more often than acquired"),
        }
    }
}

/// Owns the backend for a set of input contexts.
pub struct PluginLoader {
    shared: Arc<LoaderShared>,
}

impl PluginLoader {
    pub fn new(source: PluginSource) -> Self {
        Self {
            shared: Arc::new(LoaderShared {
                source,
                ref_count: AtomicUsize::new(0),
                state: Mutex::new(None),
            }),
        }
    }

    /// Loader for the module at `path`.
    pub fn with_path<P: Into<PathBuf>>(path: P) -> Self {
        Self::new(PluginSource::Dynamic(Some(path.into())))
    }

    /// Loader for a compiled-in backend.
    pub fn with_builtin(name: &str) -> Self {
        Self::new(PluginSource::Builtin(name.to_string()))
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(config.plugin_source())
    }

    /// The process-wide loader, configured from `<config>/cim.toml`.
    pub fn global() -> &'static PluginLoader {
        &GLOBAL
    }

    pub fn source(&self) -> &PluginSource {
        &self.shared.source
    }

    /// Number of live handles.
    pub fn ref_count(&self) -> usize {
        self.shared.ref_count.load(Ordering::Acquire)
    }

    /// Whether a backend is currently resolved.
    pub fn is_loaded(&self) -> bool {
        self.shared.lock_state().is_some()
    }

    /// Path of the loaded module or `builtin:<name>`, if resolved.
    pub fn loaded_backend(&self) -> Option<String> {
        self.shared.lock_state().as_ref().map(ResolvedBackend::describe)
    }

    /// Create a new input context.
    ///
    /// Never fails: if the backend cannot be resolved the handle is a null
    /// handle whose capabilities all take their defaults.
    pub fn acquire(&self) -> InputContext {
        let mut state = self.shared.lock_state();
        let previous = self.shared.ref_count.fetch_add(1, Ordering::AcqRel);

        if previous == 0 {
            *state = match ResolvedBackend::resolve(&self.shared.source) {
                Ok(resolved) => {
                    tracing::info!(backend = %resolved.describe(), "input method backend resolved");
                    Some(resolved)
                }
                Err(e) => {
                    tracing::warn!("input method backend unavailable, using null backend: {:#}", e);
                    None
                }
            };
        }

        let (backend, kind) = match state.as_ref() {
            Some(resolved) => resolved.instantiate(),
            None => (Backend::null(), BackendKind::Null),
        };
        drop(state);

        tracing::debug!(ref_count = previous + 1, ?kind, "input context acquired");
        InputContext::new(backend, kind, Some(self.shared.clone()))
    }

    /// Destroy an input context. Equivalent to dropping it.
    pub fn release(&self, ctx: InputContext) {
        if !ctx.belongs_to(&self.shared) {
            tracing::warn!("releasing an input context through a loader that did not create it");
        }
        drop(ctx);
    }
}

impl std::fmt::Debug for PluginLoader {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PluginLoader")
            .field("source", &self.shared.source)
            .field("ref_count", &self.ref_count())
            .field("loaded", &self.loaded_backend())
            .finish()
    }
}
