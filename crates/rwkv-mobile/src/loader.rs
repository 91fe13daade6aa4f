use libloading::Library;
use serde::Serialize;
use std::path::Path;

use crate::config::LoaderConfig;
use crate::errors::{BindingError, Result};

/// Outcome of the one-time library load. Never changes after construction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LibraryLoadState {
    pub loaded: bool,
    pub error: Option<String>,
}

impl LibraryLoadState {
    fn ok() -> Self {
        Self {
            loaded: true,
            error: None,
        }
    }

    fn failed(msg: String) -> Self {
        Self {
            loaded: false,
            error: Some(msg),
        }
    }
}

pub(crate) struct LoadedLibraries {
    // Field order is drop order: the bridge links against the runtime.
    bridge: Option<Library>,
    runtime: Library,
}

/// Runtime first, bridge second. Any failure aborts the whole load.
pub(crate) fn load_libraries(config: &LoaderConfig) -> (LibraryLoadState, Option<LoadedLibraries>) {
    let runtime_path = config.runtime_path();
    let runtime = match open(&runtime_path) {
        Ok(lib) => lib,
        Err(msg) => return (LibraryLoadState::failed(msg), None),
    };

    let bridge = match config.bridge_path() {
        Some(path) => match open(&path) {
            Ok(lib) => Some(lib),
            Err(msg) => return (LibraryLoadState::failed(msg), None),
        },
        None => {
            tracing::debug!("bridge library disabled by config");
            None
        }
    };

    (LibraryLoadState::ok(), Some(LoadedLibraries { bridge, runtime }))
}

fn open(path: &Path) -> std::result::Result<Library, String> {
    // SAFETY: loading runs the library's initializers; the runtime and bridge are
    // trusted native components shipped with the host application.
    match unsafe { Library::new(path) } {
        Ok(lib) => {
            tracing::info!(path = %path.display(), "loaded native library");
            Ok(lib)
        }
        Err(e) => {
            let msg = format!("failed to load {}: {e}", path.display());
            tracing::error!("{msg}");
            Err(msg)
        }
    }
}

impl LoadedLibraries {
    /// Resolve `symbol` in the bridge first, then the runtime.
    ///
    /// # Safety
    /// `T` must be the exact function pointer type the symbol was exported with,
    /// and the returned pointer must not outlive `self`.
    pub(crate) unsafe fn symbol<T: Copy>(&self, symbol: &'static str) -> Result<T> {
        if let Some(bridge) = &self.bridge {
            if let Ok(sym) = unsafe { bridge.get::<T>(symbol.as_bytes()) } {
                return Ok(*sym);
            }
        }
        match unsafe { self.runtime.get::<T>(symbol.as_bytes()) } {
            Ok(sym) => Ok(*sym),
            Err(e) => {
                tracing::warn!(symbol, "symbol lookup failed: {e}");
                Err(BindingError::SymbolNotFound {
                    symbol,
                    reason: e.to_string(),
                })
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn missing_dir_config(bridge: Option<&str>) -> LoaderConfig {
        LoaderConfig {
            lib_dir: Some(PathBuf::from("/nonexistent/rwkv-mobile/libs")),
            bridge_lib: bridge.map(str::to_string),
            ..Default::default()
        }
    }

    #[test]
    fn missing_runtime_records_error_and_loads_nothing() {
        let (state, libs) = load_libraries(&missing_dir_config(Some("rwkv_jni")));
        assert!(!state.loaded);
        assert!(libs.is_none());
        let err = state.error.expect("error recorded");
        assert!(!err.is_empty());
        assert!(err.contains("rwkv_mobile"), "runtime is attempted first: {err}");
    }

    #[test]
    fn bridge_is_never_attempted_when_runtime_fails() {
        let (state, _) = load_libraries(&missing_dir_config(Some("some_other_bridge")));
        let err = state.error.unwrap();
        assert!(!err.contains("some_other_bridge"));
    }
}
