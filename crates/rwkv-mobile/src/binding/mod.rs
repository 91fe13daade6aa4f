//! Typed pass-through over every `rwkvmobile_*` entry point.
//!
//! Each method resolves its symbol on call, so a missing export only affects the
//! operations that need it. Sentinels are turned into [`BindingError::NativeFailure`]
//! with the raw value preserved; null strings that mean "not available" come back
//! as `Ok(None)`.

mod device;
mod generation;
mod metrics;
mod model;
mod prompt;
mod runtime;
mod sampler;

use core::ffi::{CStr, c_char, c_int};
use std::ffi::CString;
use std::path::Path;

use crate::config::LoaderConfig;
use crate::errors::{BindingError, Result};
use crate::loader::{LibraryLoadState, LoadedLibraries, load_libraries};

/// The loaded runtime + bridge pair. Construct once at startup and share it by
/// reference (or `Arc`); it holds no other state.
///
/// No locking happens here: calls against one `RuntimeHandle` must be serialized
/// by the caller (see [`crate::worker::CallWorker`]).
pub struct RwkvMobile {
    state: LibraryLoadState,
    libs: Option<LoadedLibraries>,
}

impl RwkvMobile {
    /// Attempt the load. Never fails; inspect [`is_loaded`](Self::is_loaded).
    pub fn load(config: &LoaderConfig) -> Self {
        let (state, libs) = load_libraries(config);
        Self { state, libs }
    }

    pub fn is_loaded(&self) -> bool {
        self.state.loaded
    }

    pub fn load_error(&self) -> Option<&str> {
        self.state.error.as_deref()
    }

    pub fn load_state(&self) -> &LibraryLoadState {
        &self.state
    }

    /// Look up a native entry point.
    ///
    /// # Safety
    /// `T` must match the exported signature (see `rwkv_mobile_abi::ffi`).
    unsafe fn resolve<T: Copy>(&self, symbol: &'static str) -> Result<T> {
        match &self.libs {
            Some(libs) => unsafe { libs.symbol::<T>(symbol) },
            None => Err(BindingError::NotLoaded {
                reason: self
                    .state
                    .error
                    .clone()
                    .unwrap_or_else(|| "library not loaded".into()),
            }),
        }
    }
}

impl std::fmt::Debug for RwkvMobile {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RwkvMobile")
            .field("state", &self.state)
            .finish()
    }
}

// ---------- marshalling helpers ----------

fn make_cstring(op: &'static str, s: &str) -> Result<CString> {
    CString::new(s).map_err(|_| BindingError::InvalidArgument {
        op,
        reason: "string contains interior NUL".into(),
    })
}

fn path_cstring(op: &'static str, p: &Path) -> Result<CString> {
    let s = p.to_str().ok_or_else(|| BindingError::InvalidArgument {
        op,
        reason: format!("path not valid UTF-8: {}", p.display()),
    })?;
    make_cstring(op, s)
}

/// Copy a runtime-owned string. Null means "not available".
///
/// # Safety
/// `ptr` must be null or point to a NUL-terminated string valid for the call.
unsafe fn borrowed_string(ptr: *const c_char) -> Option<String> {
    if ptr.is_null() {
        return None;
    }
    let s = unsafe { CStr::from_ptr(ptr) };
    Some(s.to_string_lossy().into_owned())
}

/// Negative return codes are failures; everything else is passed through.
#[inline]
fn check_status(op: &'static str, rc: c_int) -> Result<c_int> {
    if rc < 0 {
        tracing::debug!(op, rc, "native call returned failure");
        Err(BindingError::NativeFailure {
            op,
            code: rc as i64,
        })
    } else {
        Ok(rc)
    }
}
