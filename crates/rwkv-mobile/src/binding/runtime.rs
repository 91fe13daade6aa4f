use core::ffi::{c_char, c_int};
use std::path::Path;

use rwkv_mobile_abi::RuntimeHandle;
use rwkv_mobile_abi::ffi::{
    GetBackendNamesFn, RC_OK, RuntimeInitFn, RuntimeStatusFn, RuntimeStrFn, symbols,
};

use super::{RwkvMobile, check_status, path_cstring};
use crate::errors::{BindingError, Result};

impl RwkvMobile {
    /// Create a runtime. A null native handle is reported as `NativeFailure { code: 0 }`.
    pub fn runtime_init(&self) -> Result<RuntimeHandle> {
        let f = unsafe { self.resolve::<RuntimeInitFn>(symbols::RUNTIME_INIT)? };
        let handle = RuntimeHandle::from_ptr(unsafe { f() });
        if handle.is_null() {
            tracing::warn!("runtime_init returned a null handle");
            return Err(BindingError::NativeFailure {
                op: "runtime_init",
                code: 0,
            });
        }
        tracing::debug!(%handle, "runtime initialized");
        Ok(handle)
    }

    /// Release a runtime. Call exactly once per handle; a second release is
    /// undefined on the native side and is not guarded here.
    pub fn runtime_release(&self, handle: RuntimeHandle) -> Result<()> {
        let f = unsafe { self.resolve::<RuntimeStatusFn>(symbols::RUNTIME_RELEASE)? };
        let rc = unsafe { f(handle.as_ptr()) };
        tracing::debug!(%handle, rc, "runtime released");
        if rc != RC_OK {
            return Err(BindingError::NativeFailure {
                op: "runtime_release",
                code: rc as i64,
            });
        }
        Ok(())
    }

    /// Fill `buffer` with comma-separated backend names; returns the byte count
    /// the runtime reports.
    pub fn get_available_backend_names(&self, buffer: &mut [u8]) -> Result<usize> {
        let f = unsafe {
            self.resolve::<GetBackendNamesFn>(symbols::GET_AVAILABLE_BACKEND_NAMES)?
        };
        let cap = c_int::try_from(buffer.len()).unwrap_or(c_int::MAX);
        let rc = unsafe { f(buffer.as_mut_ptr() as *mut c_char, cap) };
        let n = check_status("get_available_backend_names", rc)?;
        Ok(n as usize)
    }

    pub fn set_qnn_library_path(&self, handle: RuntimeHandle, path: &Path) -> Result<()> {
        self.runtime_path_call(
            "set_qnn_library_path",
            symbols::SET_QNN_LIBRARY_PATH,
            handle,
            path,
        )
    }

    pub fn add_adsp_library_path(&self, handle: RuntimeHandle, path: &Path) -> Result<()> {
        self.runtime_path_call(
            "add_adsp_library_path",
            symbols::ADD_ADSP_LIBRARY_PATH,
            handle,
            path,
        )
    }

    pub fn clear_state(&self, handle: RuntimeHandle) -> Result<()> {
        self.runtime_status_call("clear_state", symbols::CLEAR_STATE, handle)
            .map(|_| ())
    }

    pub fn load_initial_state(&self, handle: RuntimeHandle, state_path: &Path) -> Result<()> {
        self.runtime_path_call(
            "load_initial_state",
            symbols::LOAD_INITIAL_STATE,
            handle,
            state_path,
        )
    }

    pub fn unload_initial_state(&self, handle: RuntimeHandle) -> Result<()> {
        self.runtime_status_call("unload_initial_state", symbols::UNLOAD_INITIAL_STATE, handle)
            .map(|_| ())
    }

    pub(super) fn runtime_status_call(
        &self,
        op: &'static str,
        symbol: &'static str,
        handle: RuntimeHandle,
    ) -> Result<c_int> {
        let f = unsafe { self.resolve::<RuntimeStatusFn>(symbol)? };
        check_status(op, unsafe { f(handle.as_ptr()) })
    }

    pub(super) fn runtime_str_call(
        &self,
        op: &'static str,
        symbol: &'static str,
        handle: RuntimeHandle,
        value: &core::ffi::CStr,
    ) -> Result<()> {
        let f = unsafe { self.resolve::<RuntimeStrFn>(symbol)? };
        check_status(op, unsafe { f(handle.as_ptr(), value.as_ptr()) }).map(|_| ())
    }

    fn runtime_path_call(
        &self,
        op: &'static str,
        symbol: &'static str,
        handle: RuntimeHandle,
        path: &Path,
    ) -> Result<()> {
        let cpath = path_cstring(op, path)?;
        self.runtime_str_call(op, symbol, handle, &cpath)
    }
}
