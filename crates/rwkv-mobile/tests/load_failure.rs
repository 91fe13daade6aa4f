//! Load-state semantics without a real runtime.
//!
//! On Linux the system C library stands in for "a library that loads but exports
//! none of our symbols", which separates `SymbolNotFound` from `NotLoaded`.

use std::path::{Path, PathBuf};

use rwkv_mobile::{BindingError, LoaderConfig, LogLevel, RuntimeHandle, RwkvMobile, SamplerParams};

fn unreachable_config() -> LoaderConfig {
    LoaderConfig {
        lib_dir: Some(PathBuf::from("/nonexistent/rwkv-mobile/lib")),
        ..Default::default()
    }
}

fn assert_not_loaded<T: std::fmt::Debug>(r: Result<T, BindingError>) {
    match r {
        Err(BindingError::NotLoaded { reason }) => assert!(!reason.is_empty()),
        other => panic!("expected NotLoaded, got {other:?}"),
    }
}

#[test]
fn failed_load_is_recorded_not_raised() {
    let rwkv = RwkvMobile::load(&unreachable_config());

    assert!(!rwkv.is_loaded());
    let state = rwkv.load_state();
    assert!(!state.loaded);
    assert!(state.error.as_deref().is_some_and(|e| !e.is_empty()));
    assert_eq!(rwkv.load_error(), state.error.as_deref());
}

#[test]
fn every_group_short_circuits_when_not_loaded() {
    let rwkv = RwkvMobile::load(&unreachable_config());
    let h = RuntimeHandle(0x1000);

    assert_not_loaded(rwkv.platform_name());
    assert_not_loaded(rwkv.set_log_level(LogLevel::Info));
    assert_not_loaded(rwkv.set_cache_dir(Path::new("/tmp")));
    assert_not_loaded(rwkv.runtime_init());
    assert_not_loaded(rwkv.runtime_release(h));
    assert_not_loaded(rwkv.get_available_backend_names(&mut [0u8; 64]));
    assert_not_loaded(rwkv.load_model(h, Path::new("/m.bin"), "cpu"));
    assert_not_loaded(rwkv.load_model_with_extra(h, Path::new("/m.bin"), "qnn", None));
    assert_not_loaded(rwkv.clear_state(h));
    assert_not_loaded(rwkv.is_generating(h));
    assert_not_loaded(rwkv.gen_completion(h, "hi", 8));
    assert_not_loaded(rwkv.gen_completion_stream(h, "hi", 8, |_| {}));
    assert_not_loaded(rwkv.set_sampler_params(
        h,
        SamplerParams {
            temperature: 1.0,
            top_p: 0.5,
            top_k: 10,
        },
    ));
    assert_not_loaded(rwkv.set_prompt(h, "sys"));
    assert_not_loaded(rwkv.avg_decode_speed(h));
    assert_not_loaded(rwkv.get_seed(h));
}

#[test]
fn invalid_arguments_fail_before_symbol_lookup() {
    let rwkv = RwkvMobile::load(&unreachable_config());
    let err = rwkv
        .set_prompt(RuntimeHandle(1), "bad\0prompt")
        .unwrap_err();
    assert!(matches!(err, BindingError::InvalidArgument { .. }));
}

#[cfg(target_os = "linux")]
mod with_system_library {
    use super::*;

    const LIBC: &str = "libc.so.6";

    #[test]
    fn missing_bridge_fails_the_whole_load() {
        let rwkv = RwkvMobile::load(&LoaderConfig {
            runtime_lib: LIBC.into(),
            bridge_lib: Some("/nonexistent/librwkv_jni.so".into()),
            ..Default::default()
        });
        assert!(!rwkv.is_loaded());
        assert!(rwkv.load_error().unwrap().contains("librwkv_jni"));
        assert_not_loaded(rwkv.soc_name());
    }

    #[test]
    fn loaded_library_without_symbols_reports_symbol_not_found() {
        let rwkv = RwkvMobile::load(&LoaderConfig {
            runtime_lib: LIBC.into(),
            bridge_lib: None,
            ..Default::default()
        });
        assert!(rwkv.is_loaded(), "{:?}", rwkv.load_error());

        match rwkv.runtime_init() {
            Err(BindingError::SymbolNotFound { symbol, reason }) => {
                assert_eq!(symbol, "rwkvmobile_runtime_init");
                assert!(!reason.is_empty());
            }
            other => panic!("expected SymbolNotFound, got {other:?}"),
        }

        // Helpers swallow it.
        assert_eq!(rwkv.available_backend_names(1024), None);
        let report = rwkv.device_info().to_string();
        assert_eq!(report.lines().count(), 5);
    }
}
