//! cim-fullwidth crate root
//!
//! A small but complete libcim backend: typed ASCII is composed in a preedit
//! and committed as full-width text (`abc` → `ａｂｃ`).
//!
//! The crate builds two ways:
//! - as a `cdylib`: copy the library to `<user-config-dir>/cim.so` and every
//!   libcim host picks it up through the two exported plugin symbols
//! - as an `rlib`: call [`register`] at startup and set
//!   `backend = "fullwidth"` in `cim.toml`

pub mod composer;
pub mod width;

pub use composer::FullwidthIm;
pub use width::{to_fullwidth, to_halfwidth};

use libcim::InputMethod;

/// Name under which [`register`] publishes the backend.
pub const BACKEND_NAME: &str = "fullwidth";

libcim::export_plugin!(FullwidthIm::new);

fn create() -> Box<dyn InputMethod> {
    Box::new(FullwidthIm::new())
}

/// Make the backend available to loaders configured with
/// `backend = "fullwidth"`.
pub fn register() {
    libcim::register_backend(BACKEND_NAME, create);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exported_symbols_roundtrip() {
        let raw = cim_plugin_new();
        assert!(!raw.is_null());
        unsafe { cim_plugin_free(raw) };
        unsafe { cim_plugin_free(std::ptr::null_mut()) };
    }

    #[test]
    fn test_register_publishes_factory() {
        register();
        assert!(libcim::registered_backends().contains(&BACKEND_NAME.to_string()));
        let factory = libcim::registry::lookup_backend(BACKEND_NAME).expect("registered");
        assert_eq!(factory().name(), BACKEND_NAME);
    }
}
