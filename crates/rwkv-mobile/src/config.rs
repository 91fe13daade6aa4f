use serde::{Deserialize, Serialize};
use std::{
    env,
    ffi::OsStr,
    fs,
    path::{Path, PathBuf},
};

use rwkv_mobile_abi::ffi::{BRIDGE_LIB_NAME, RUNTIME_LIB_NAME};

use crate::errors::ConfigError;
use crate::paths::config_path;

pub const ENV_CONFIG: &str = "RWKV_MOBILE_CONFIG";
pub const ENV_LIB_DIR: &str = "RWKV_MOBILE_LIB_DIR";
pub const ENV_RUNTIME_LIB: &str = "RWKV_MOBILE_RUNTIME_LIB";
/// Empty value disables the bridge stage.
pub const ENV_BRIDGE_LIB: &str = "RWKV_MOBILE_BRIDGE_LIB";
pub const ENV_CACHE_DIR: &str = "RWKV_MOBILE_CACHE_DIR";

/// Where the native libraries live and how the runtime is prepared after init.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoaderConfig {
    /// Directory searched for both libraries. `None` defers to the system loader.
    pub lib_dir: Option<PathBuf>,
    /// Bare name (`rwkv_mobile`), file name, or path of the runtime library.
    pub runtime_lib: String,
    /// Same forms as `runtime_lib`. `None` skips the bridge stage.
    pub bridge_lib: Option<String>,
    pub cache_dir: Option<PathBuf>,
    pub qnn_library_path: Option<PathBuf>,
    pub adsp_library_paths: Vec<PathBuf>,
}

impl Default for LoaderConfig {
    fn default() -> Self {
        Self {
            lib_dir: None,
            runtime_lib: RUNTIME_LIB_NAME.to_string(),
            bridge_lib: Some(BRIDGE_LIB_NAME.to_string()),
            cache_dir: None,
            qnn_library_path: None,
            adsp_library_paths: Vec::new(),
        }
    }
}

impl LoaderConfig {
    /// Defaults, then the JSON config file (if any), then environment overrides.
    pub fn resolve() -> Result<Self, ConfigError> {
        let path = env::var_os(ENV_CONFIG)
            .map(PathBuf::from)
            .unwrap_or_else(config_path);
        let mut cfg = Self::from_file(&path)?.unwrap_or_default();
        cfg.apply_env_from(|k| env::var(k).ok());
        Ok(cfg)
    }

    /// `Ok(None)` when the file does not exist.
    pub fn from_file(path: &Path) -> Result<Option<Self>, ConfigError> {
        let bytes = match fs::read(path) {
            Ok(b) => b,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(source) => {
                return Err(ConfigError::Io {
                    path: path.to_path_buf(),
                    source,
                });
            }
        };
        let cfg = serde_json::from_slice::<LoaderConfig>(&bytes).map_err(|source| {
            ConfigError::Parse {
                path: path.to_path_buf(),
                source,
            }
        })?;
        tracing::debug!(path = %path.display(), "loaded config file");
        Ok(Some(cfg))
    }

    pub fn apply_env_from<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(dir) = lookup(ENV_LIB_DIR).filter(|v| !v.is_empty()) {
            self.lib_dir = Some(PathBuf::from(dir));
        }
        if let Some(name) = lookup(ENV_RUNTIME_LIB).filter(|v| !v.is_empty()) {
            self.runtime_lib = name;
        }
        if let Some(name) = lookup(ENV_BRIDGE_LIB) {
            self.bridge_lib = if name.is_empty() { None } else { Some(name) };
        }
        if let Some(dir) = lookup(ENV_CACHE_DIR).filter(|v| !v.is_empty()) {
            self.cache_dir = Some(PathBuf::from(dir));
        }
    }

    pub fn runtime_path(&self) -> PathBuf {
        self.library_path(&self.runtime_lib)
    }

    pub fn bridge_path(&self) -> Option<PathBuf> {
        self.bridge_lib.as_deref().map(|name| self.library_path(name))
    }

    /// Bare names get the platform decoration (`librwkv_mobile.so`); anything that
    /// already looks like a file is used as given. Relative results are joined
    /// onto `lib_dir` when one is configured.
    fn library_path(&self, name: &str) -> PathBuf {
        let given = Path::new(name);
        let file = if is_dylib(given) || given.components().count() > 1 {
            given.to_path_buf()
        } else {
            PathBuf::from(libloading::library_filename(name))
        };
        match &self.lib_dir {
            Some(dir) if file.is_relative() => dir.join(file),
            _ => file,
        }
    }
}

#[inline]
fn is_dylib(path: &Path) -> bool {
    let by_ext = matches!(
        path.extension().and_then(OsStr::to_str),
        Some("so" | "dylib" | "dll")
    );
    // versioned sonames: libfoo.so.1
    by_ext
        || path
            .file_name()
            .and_then(OsStr::to_str)
            .is_some_and(|n| n.contains(".so."))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::io::Write;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |k| map.get(k).cloned()
    }

    #[test]
    fn defaults_name_both_libraries() {
        let cfg = LoaderConfig::default();
        assert_eq!(cfg.runtime_lib, "rwkv_mobile");
        assert_eq!(cfg.bridge_lib.as_deref(), Some("rwkv_jni"));
        assert_eq!(
            cfg.runtime_path(),
            PathBuf::from(libloading::library_filename("rwkv_mobile"))
        );
    }

    #[test]
    fn lib_dir_is_joined_onto_decorated_names() {
        let cfg = LoaderConfig {
            lib_dir: Some(PathBuf::from("/data/app/lib/arm64")),
            ..Default::default()
        };
        let expected =
            Path::new("/data/app/lib/arm64").join(libloading::library_filename("rwkv_mobile"));
        assert_eq!(cfg.runtime_path(), expected);
    }

    #[test]
    fn explicit_file_names_are_not_decorated() {
        let cfg = LoaderConfig {
            lib_dir: Some(PathBuf::from("/opt/rwkv")),
            runtime_lib: "librwkv_mobile.so".into(),
            bridge_lib: Some("/abs/libshim.so.1".into()),
            ..Default::default()
        };
        assert_eq!(cfg.runtime_path(), PathBuf::from("/opt/rwkv/librwkv_mobile.so"));
        assert_eq!(cfg.bridge_path(), Some(PathBuf::from("/abs/libshim.so.1")));
    }

    #[test]
    fn env_overrides_and_empty_bridge_disables_it() {
        let mut cfg = LoaderConfig::default();
        cfg.apply_env_from(lookup(&[
            (ENV_LIB_DIR, "/tmp/libs"),
            (ENV_RUNTIME_LIB, "rwkv_mobile_qnn"),
            (ENV_BRIDGE_LIB, ""),
            (ENV_CACHE_DIR, "/tmp/cache"),
        ]));
        assert_eq!(cfg.lib_dir, Some(PathBuf::from("/tmp/libs")));
        assert_eq!(cfg.runtime_lib, "rwkv_mobile_qnn");
        assert_eq!(cfg.bridge_lib, None);
        assert_eq!(cfg.bridge_path(), None);
        assert_eq!(cfg.cache_dir, Some(PathBuf::from("/tmp/cache")));
    }

    #[test]
    fn missing_file_is_not_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let got = LoaderConfig::from_file(&dir.path().join("config.json")).unwrap();
        assert!(got.is_none());
    }

    #[test]
    fn partial_file_keeps_defaults_for_the_rest() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        let mut f = std::fs::File::create(&path).unwrap();
        write!(f, r#"{{ "lib_dir": "/vendor/lib64", "adsp_library_paths": ["/dsp"] }}"#).unwrap();

        let cfg = LoaderConfig::from_file(&path).unwrap().unwrap();
        assert_eq!(cfg.lib_dir, Some(PathBuf::from("/vendor/lib64")));
        assert_eq!(cfg.runtime_lib, "rwkv_mobile");
        assert_eq!(cfg.bridge_lib.as_deref(), Some("rwkv_jni"));
        assert_eq!(cfg.adsp_library_paths, vec![PathBuf::from("/dsp")]);
    }

    #[test]
    fn malformed_file_is_a_parse_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(&path, b"{ not json").unwrap();

        match LoaderConfig::from_file(&path) {
            Err(ConfigError::Parse { path: p, .. }) => assert_eq!(p, path),
            other => panic!("expected parse error, got {other:?}"),
        }
    }
}
