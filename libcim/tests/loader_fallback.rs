// libcim/tests/loader_fallback.rs
//
// Backend resolution failures must degrade to null handles:
// - missing module file
// - a file that is not a loadable library
// - a real library that lacks the plugin symbols
// - a compiled-in name nobody registered
// - a config that points at any of the above
// - acquire/release from many threads

use libcim::{BackendKind, CimEvent, Config, PluginLoader, PluginSource};
use std::io::Write;

fn assert_null_handle(loader: &PluginLoader) {
    let mut ctx = loader.acquire();
    assert_eq!(ctx.backend_kind(), BackendKind::Null);
    assert!(!ctx.filter_event(&CimEvent::key_press(0x61, 0)));
    assert!(ctx.get_preedit().is_empty());
    assert_eq!(ctx.get_candidate().n_pages, 0);
    assert!(!loader.is_loaded());
    loader.release(ctx);
    assert_eq!(loader.ref_count(), 0);
}

#[test]
fn missing_module_gives_null_handles() {
    let dir = tempfile::tempdir().unwrap();
    let loader = PluginLoader::with_path(dir.path().join("cim.so"));
    assert_null_handle(&loader);
}

#[test]
fn garbage_module_gives_null_handles() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("cim.so");
    let mut file = std::fs::File::create(&path).unwrap();
    file.write_all(b"definitely not an ELF object").unwrap();
    drop(file);

    let loader = PluginLoader::with_path(&path);
    assert_null_handle(&loader);
    // a second epoch retries and fails the same way
    assert_null_handle(&loader);
}

#[test]
fn unregistered_builtin_gives_null_handles() {
    let loader = PluginLoader::with_builtin("nobody-registered-this");
    assert_null_handle(&loader);
}

#[test]
fn loader_from_config_file() {
    let dir = tempfile::tempdir().unwrap();
    let config_path = dir.path().join("cim.toml");
    let plugin_path = dir.path().join("missing").join("cim.so");

    let config = Config {
        plugin_path: Some(plugin_path.clone()),
        backend: None,
    };
    config.save_toml(&config_path).unwrap();

    let loaded = Config::load_toml(&config_path).unwrap();
    let loader = PluginLoader::from_config(&loaded);
    assert_eq!(loader.source(), &PluginSource::Dynamic(Some(plugin_path)));
    assert_null_handle(&loader);
}

#[test]
fn many_handles_one_epoch() {
    let loader = PluginLoader::with_path("/nonexistent/libcim-tests/cim.so");
    let handles: Vec<_> = (0..8).map(|_| loader.acquire()).collect();
    assert_eq!(loader.ref_count(), 8);
    assert!(handles.iter().all(|h| h.backend_kind() == BackendKind::Null));

    for (i, handle) in handles.into_iter().enumerate() {
        loader.release(handle);
        assert_eq!(loader.ref_count(), 7 - i);
    }
}

#[cfg(target_os = "linux")]
#[test]
fn library_without_plugin_symbols_gives_null_handles() {
    const LIBM: &[&str] = &[
        "/lib/x86_64-linux-gnu/libm.so.6",
        "/usr/lib/x86_64-linux-gnu/libm.so.6",
        "/lib/aarch64-linux-gnu/libm.so.6",
        "/usr/lib/aarch64-linux-gnu/libm.so.6",
        "/lib64/libm.so.6",
        "/usr/lib64/libm.so.6",
        "/usr/lib/libm.so.6",
        "/lib/libm.so.6",
    ];
    let Some(libm) = LIBM.iter().map(std::path::Path::new).find(|p| p.exists()) else {
        eprintln!("no libm.so.6 found, skipping");
        return;
    };

    // loads fine, but exports neither cim_plugin_new nor cim_plugin_free
    let loader = PluginLoader::with_path(libm);
    assert_null_handle(&loader);
    assert_eq!(loader.loaded_backend(), None);
}

#[test]
fn threads_acquire_and_release_symmetrically() {
    let loader = PluginLoader::with_path("/nonexistent/libcim-tests/threads/cim.so");
    std::thread::scope(|scope| {
        for _ in 0..8 {
            scope.spawn(|| {
                for _ in 0..2000 {
                    let ctx = loader.acquire();
                    assert_eq!(ctx.backend_kind(), BackendKind::Null);
                    loader.release(ctx);
                }
            });
        }
    });
    assert_eq!(loader.ref_count(), 0);
    assert!(!loader.is_loaded());
}
