//! Compiled-in backends, looked up by name.
//!
//! Where dynamic loading is unavailable or unwanted, a backend linked into
//! the host registers a factory here and the loader is pointed at it with
//! `backend = "<name>"` in `cim.toml`.

use once_cell::sync::Lazy;
use std::collections::HashMap;
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use crate::context::InputMethod;

/// Creates a fresh backend instance for one input context.
pub type BackendFactory = fn() -> Box<dyn InputMethod>;

type Registry = HashMap<String, BackendFactory>;

static REGISTRY: Lazy<RwLock<Registry>> = Lazy::new(|| RwLock::new(HashMap::new()));

// A panic while holding the lock leaves the map itself intact.
fn read_registry() -> RwLockReadGuard<'static, Registry> {
    REGISTRY.read().unwrap_or_else(|poisoned| poisoned.into_inner())
}

fn write_registry() -> RwLockWriteGuard<'static, Registry> {
    REGISTRY.write().unwrap_or_else(|poisoned| poisoned.into_inner())
}

/// Register `factory` under `name`, replacing any earlier registration.
pub fn register_backend(name: &str, factory: BackendFactory) {
    if write_registry().insert(name.to_string(), factory).is_some() {
        tracing::debug!(name, "replaced compiled-in backend");
    }
}

/// Remove a registration. Returns true if `name` was registered.
pub fn unregister_backend(name: &str) -> bool {
    write_registry().remove(name).is_some()
}

pub fn lookup_backend(name: &str) -> Option<BackendFactory> {
    read_registry().get(name).copied()
}

/// Names of all registered backends, sorted.
pub fn registered_backends() -> Vec<String> {
    let mut names: Vec<String> = read_registry().keys().cloned().collect();
    names.sort();
    names
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::NullInputMethod;

    fn make_null() -> Box<dyn InputMethod> {
        Box::new(NullInputMethod)
    }

    #[test]
    fn test_register_lookup_unregister() {
        register_backend("registry-test", make_null);
        assert!(registered_backends().contains(&"registry-test".to_string()));

        let factory = lookup_backend("registry-test").expect("registered");
        assert_eq!(factory().name(), "null");

        assert!(unregister_backend("registry-test"));
        assert!(!unregister_backend("registry-test"));
        assert!(lookup_backend("registry-test").is_none());
    }

    #[test]
    fn test_poisoned_lock_still_registers() {
        let poisoner = std::thread::spawn(|| {
            let _guard = REGISTRY.write().unwrap();
            panic!("poison the registry lock");
        });
        assert!(poisoner.join().is_err());

        register_backend("registry-test-poisoned", make_null);
        assert!(lookup_backend("registry-test-poisoned").is_some());
        assert!(registered_backends().contains(&"registry-test-poisoned".to_string()));
        assert!(unregister_backend("registry-test-poisoned"));
    }
}
