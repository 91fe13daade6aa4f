use core::ffi::c_char;
use std::ffi::CString;
use std::path::Path;

use rwkv_mobile_abi::ffi::{LoadModelFn, LoadModelWithExtraFn, ReleaseModelFn, symbols};
use rwkv_mobile_abi::{ModelId, RuntimeHandle};

use super::{RwkvMobile, check_status, make_cstring, path_cstring};
use crate::errors::Result;

impl RwkvMobile {
    /// Load a model onto `backend` (a name from the backend list, e.g. "qnn").
    pub fn load_model(
        &self,
        handle: RuntimeHandle,
        model_path: &Path,
        backend: &str,
    ) -> Result<ModelId> {
        let cpath = path_cstring("load_model", model_path)?;
        let cbackend = make_cstring("load_model", backend)?;
        let f = unsafe { self.resolve::<LoadModelFn>(symbols::LOAD_MODEL)? };
        let rc = unsafe { f(handle.as_ptr(), cpath.as_ptr(), cbackend.as_ptr()) };
        let id = check_status("load_model", rc)?;
        tracing::info!(model = %model_path.display(), backend, id, "model loaded");
        Ok(ModelId(id))
    }

    /// Like [`load_model`](Self::load_model) with an implementation-specific
    /// parameter string; `None` is passed to the runtime as a null pointer.
    pub fn load_model_with_extra(
        &self,
        handle: RuntimeHandle,
        model_path: &Path,
        backend: &str,
        extra: Option<&str>,
    ) -> Result<ModelId> {
        let cpath = path_cstring("load_model_with_extra", model_path)?;
        let cbackend = make_cstring("load_model_with_extra", backend)?;
        let cextra: Option<CString> = extra
            .map(|e| make_cstring("load_model_with_extra", e))
            .transpose()?;
        let extra_ptr: *const c_char = cextra.as_ref().map_or(std::ptr::null(), |c| c.as_ptr());

        let f = unsafe { self.resolve::<LoadModelWithExtraFn>(symbols::LOAD_MODEL_WITH_EXTRA)? };
        let rc = unsafe { f(handle.as_ptr(), cpath.as_ptr(), cbackend.as_ptr(), extra_ptr) };
        let id = check_status("load_model_with_extra", rc)?;
        tracing::info!(model = %model_path.display(), backend, id, "model loaded (extra)");
        Ok(ModelId(id))
    }

    pub fn release_model(&self, handle: RuntimeHandle, model: ModelId) -> Result<()> {
        let f = unsafe { self.resolve::<ReleaseModelFn>(symbols::RELEASE_MODEL)? };
        check_status("release_model", unsafe { f(handle.as_ptr(), model.0) })?;
        tracing::debug!(%model, "model released");
        Ok(())
    }
}
