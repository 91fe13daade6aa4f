use rwkv_mobile_abi::RuntimeHandle;
use rwkv_mobile_abi::ffi::{RuntimeFloatFn, symbols};

use super::RwkvMobile;
use crate::errors::Result;

impl RwkvMobile {
    fn runtime_float(&self, symbol: &'static str, handle: RuntimeHandle) -> Result<f32> {
        let f = unsafe { self.resolve::<RuntimeFloatFn>(symbol)? };
        Ok(unsafe { f(handle.as_ptr()) })
    }

    /// Tokens per second.
    pub fn avg_decode_speed(&self, handle: RuntimeHandle) -> Result<f32> {
        self.runtime_float(symbols::GET_AVG_DECODE_SPEED, handle)
    }

    /// Tokens per second.
    pub fn avg_prefill_speed(&self, handle: RuntimeHandle) -> Result<f32> {
        self.runtime_float(symbols::GET_AVG_PREFILL_SPEED, handle)
    }

    /// 0.0 ..= 1.0
    pub fn prefill_progress(&self, handle: RuntimeHandle) -> Result<f32> {
        self.runtime_float(symbols::GET_PREFILL_PROGRESS, handle)
    }
}
