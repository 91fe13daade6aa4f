#![allow(dead_code)]

use std::env;
use std::ffi::CString;
use std::path::{Path, PathBuf};

use libloading::Library;
use rwkv_mobile::{LoaderConfig, RuntimeHandle, RwkvMobile};
use rwkv_mobile_fixture::{FixtureGetFn, FixtureSetFn, LIB_NAME};

/// Overrides where the built fixture library is looked up.
pub const ENV_FIXTURE_LIB: &str = "RWKV_MOBILE_FIXTURE_LIB";

/// The cdylib cargo built next to this test binary (`target/<profile>/deps` or
/// its parent).
pub fn fixture_path() -> PathBuf {
    if let Some(p) = env::var_os(ENV_FIXTURE_LIB) {
        return PathBuf::from(p);
    }
    let exe = env::current_exe().expect("test executable path");
    let deps = exe.parent().expect("test executable directory");
    let exact = libloading::library_filename(LIB_NAME);
    let prefix = format!("{}{LIB_NAME}", env::consts::DLL_PREFIX);

    for dir in [Some(deps), deps.parent()].into_iter().flatten() {
        let candidate = dir.join(&exact);
        if candidate.is_file() {
            return candidate;
        }
        if let Some(found) = newest_match(dir, &prefix) {
            return found;
        }
    }
    panic!(
        "{} not found next to {}; build the fixture crate or set {ENV_FIXTURE_LIB}",
        exact.to_string_lossy(),
        exe.display()
    );
}

fn newest_match(dir: &Path, prefix: &str) -> Option<PathBuf> {
    std::fs::read_dir(dir)
        .ok()?
        .filter_map(|e| e.ok())
        .filter(|e| {
            let name = e.file_name().to_string_lossy().into_owned();
            name.starts_with(prefix) && name.ends_with(env::consts::DLL_SUFFIX)
        })
        .filter_map(|e| Some((e.metadata().ok()?.modified().ok()?, e.path())))
        .max_by_key(|(modified, _)| *modified)
        .map(|(_, path)| path)
}

/// The binding pointed at the fixture, plus a second handle on the same library
/// for the control entry points.
pub struct Fixture {
    pub rwkv: RwkvMobile,
    lib: Library,
}

impl Fixture {
    pub fn load() -> Self {
        let path = fixture_path();
        let rwkv = RwkvMobile::load(&LoaderConfig {
            runtime_lib: path.to_string_lossy().into_owned(),
            bridge_lib: None,
            ..Default::default()
        });
        assert!(rwkv.is_loaded(), "fixture did not load: {:?}", rwkv.load_error());
        let lib = unsafe { Library::new(&path) }.expect("open fixture for control calls");
        Self { rwkv, lib }
    }

    pub fn set(&self, handle: RuntimeHandle, knob: &str, value: i64) {
        let name = CString::new(knob).unwrap();
        let f = unsafe { self.lib.get::<FixtureSetFn>(b"rwkv_fixture_set\0") }.unwrap();
        let rc = unsafe { f(handle.as_ptr(), name.as_ptr(), value) };
        assert_eq!(rc, 0, "fixture rejected knob {knob}");
    }

    pub fn get(&self, handle: RuntimeHandle, knob: &str) -> i64 {
        let name = CString::new(knob).unwrap();
        let f = unsafe { self.lib.get::<FixtureGetFn>(b"rwkv_fixture_get\0") }.unwrap();
        let v = unsafe { f(handle.as_ptr(), name.as_ptr()) };
        assert_ne!(v, i64::MIN, "fixture does not know knob {knob}");
        v
    }

    /// Fresh runtime, released (and checked) by the caller.
    pub fn runtime(&self) -> RuntimeHandle {
        self.rwkv.runtime_init().expect("fixture runtime_init")
    }
}
