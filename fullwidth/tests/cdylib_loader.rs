// fullwidth/tests/cdylib_loader.rs
//
// The cdylib build of this crate installed as `cim.so` and loaded through
// libloading, the way a host picks it up from the user config directory:
// - both plugin symbols resolve and the handle dispatches into the module
// - instances go back through cim_plugin_free
// - the module unloads after the last release and reloads on the next acquire

use std::cell::RefCell;
use std::path::PathBuf;
use std::rc::Rc;

use libcim::keysym;
use libcim::{BackendKind, Callback, CallbackKind, CimEvent, PluginLoader};

fn cdylib_path() -> PathBuf {
    let file_name = format!(
        "{}cim_fullwidth{}",
        std::env::consts::DLL_PREFIX,
        std::env::consts::DLL_SUFFIX
    );
    // target/<profile>/deps/<test binary>
    let exe = std::env::current_exe().expect("test binary path");
    let deps = exe.parent().expect("deps dir");
    [deps.to_path_buf(), deps.join("..")]
        .into_iter()
        .map(|dir| dir.join(&file_name))
        .find(|path| path.exists())
        .unwrap_or_else(|| panic!("cannot locate {} next to {}", file_name, exe.display()))
}

fn install_plugin() -> (tempfile::TempDir, PathBuf) {
    let dir = tempfile::tempdir().expect("create temp dir");
    let installed = dir.path().join(libcim_core::PLUGIN_FILE_NAME);
    std::fs::copy(cdylib_path(), &installed).expect("install cim.so");
    (dir, installed)
}

#[test]
fn cdylib_loads_dispatches_and_unloads() {
    let (_dir, plugin) = install_plugin();
    let loader = PluginLoader::with_path(&plugin);

    let mut ctx = loader.acquire();
    assert_eq!(ctx.backend_kind(), BackendKind::Plugin);
    assert_eq!(ctx.backend_name(), cim_fullwidth::BACKEND_NAME);
    assert_eq!(loader.loaded_backend(), Some(plugin.display().to_string()));

    let committed = Rc::new(RefCell::new(Vec::new()));
    let c = committed.clone();
    ctx.set_callback(
        CallbackKind::Commit,
        Some(Callback::commit(move |text| c.borrow_mut().push(text.to_string()))),
    );

    assert!(ctx.filter_event(&CimEvent::key_press(keysym::KEY_LOWER_A, 0)));
    let preedit = ctx.get_preedit();
    assert_eq!(preedit.text, "ａ");
    assert_eq!(preedit.cursor, 1);
    assert_eq!(ctx.get_candidate().n_cols(), 2);

    assert!(ctx.filter_event(&CimEvent::key_press(keysym::RETURN, 0)));
    assert_eq!(*committed.borrow(), vec!["ａ".to_string()]);
    assert!(ctx.get_preedit().is_empty());

    loader.release(ctx);
    assert_eq!(loader.ref_count(), 0);
    assert!(!loader.is_loaded(), "module unloaded after the last release");

    let again = loader.acquire();
    assert_eq!(again.backend_kind(), BackendKind::Plugin);
    assert!(loader.is_loaded());
    drop(again);
    assert!(!loader.is_loaded());
}

#[test]
fn cdylib_instances_are_independent() {
    let (_dir, plugin) = install_plugin();
    let loader = PluginLoader::with_path(&plugin);

    let mut first = loader.acquire();
    let mut second = loader.acquire();
    assert!(first.filter_event(&CimEvent::key_press(keysym::KEY_LOWER_A, 0)));
    assert!(second.filter_event(&CimEvent::key_press(keysym::KEY_LOWER_Z, 0)));
    assert_eq!(first.get_preedit().text, "ａ");
    assert_eq!(second.get_preedit().text, "ｚ");

    drop(first);
    assert!(loader.is_loaded(), "second handle keeps the module mapped");
    assert_eq!(second.get_preedit().text, "ｚ");
    drop(second);
    assert!(!loader.is_loaded());
}
