//! Binary interface between the loader and a backend module.
//!
//! A backend module exports exactly two symbols:
//!
//! - `cim_plugin_new`: no arguments, returns a new backend instance
//! - `cim_plugin_free`: takes an instance returned by `cim_plugin_new`
//!
//! An instance crosses the boundary as a thin pointer to a heap-allocated
//! `Box<dyn InputMethod>`. Host and module must be built with the same
//! compiler and the same `libcim`, since trait-object layout is not a stable
//! ABI. [`export_plugin!`] generates both symbols for a backend type.

use std::ffi::c_void;

use crate::context::InputMethod;

/// Symbol name of the backend constructor.
pub const PLUGIN_NEW_SYMBOL: &[u8] = b"cim_plugin_new\0";

/// Symbol name of the backend destructor.
pub const PLUGIN_FREE_SYMBOL: &[u8] = b"cim_plugin_free\0";

/// `cim_plugin_new`. Returns null on failure.
pub type PluginNewFn = unsafe extern "C" fn() -> *mut c_void;

/// `cim_plugin_free`.
pub type PluginFreeFn = unsafe extern "C" fn(*mut c_void);

/// Leak a backend as the thin pointer `cim_plugin_new` returns.
pub fn into_raw(backend: Box<dyn InputMethod>) -> *mut c_void {
    Box::into_raw(Box::new(backend)) as *mut c_void
}

/// Reclaim a pointer produced by [`into_raw`].
///
/// # Safety
///
/// `ptr` must come from [`into_raw`] in the same module and must not be
/// used afterwards.
pub unsafe fn from_raw(ptr: *mut c_void) -> Box<dyn InputMethod> {
    *Box::from_raw(ptr as *mut Box<dyn InputMethod>)
}

/// Export `cim_plugin_new` / `cim_plugin_free` for a backend.
///
/// The argument is any expression callable with no arguments that returns a
/// value implementing [`InputMethod`], usually a constructor:
///
/// ```ignore
/// libcim::export_plugin!(MyBackend::new);
/// ```
#[macro_export]
macro_rules! export_plugin {
    ($ctor:expr) => {
        #[no_mangle]
        pub extern "C" fn cim_plugin_new() -> *mut ::std::ffi::c_void {
            let backend: ::std::boxed::Box<dyn $crate::InputMethod> =
                ::std::boxed::Box::new(($ctor)());
            $crate::plugin::into_raw(backend)
        }

        /// # Safety
        ///
        /// `ptr` must be a value returned by `cim_plugin_new` of this module.
        #[no_mangle]
        pub unsafe extern "C" fn cim_plugin_free(ptr: *mut ::std::ffi::c_void) {
            if !ptr.is_null() {
                drop(unsafe { $crate::plugin::from_raw(ptr) });
            }
        }
    };
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::NullInputMethod;

    #[test]
    fn test_raw_roundtrip_keeps_vtable() {
        let raw = into_raw(Box::new(NullInputMethod));
        assert!(!raw.is_null());
        let backend = unsafe { from_raw(raw) };
        assert_eq!(backend.name(), "null");
    }

    #[test]
    fn test_symbol_names_are_nul_terminated() {
        assert_eq!(PLUGIN_NEW_SYMBOL.last(), Some(&0));
        assert_eq!(PLUGIN_FREE_SYMBOL.last(), Some(&0));
    }
}
