use core::ffi::c_int;

use rwkv_mobile_abi::ffi::{
    GetPenaltyParamsFn, GetSamplerParamsFn, GetSeedFn, SetPenaltyParamsFn, SetSamplerParamsFn,
    SetSeedFn, symbols,
};
use rwkv_mobile_abi::{PenaltyParams, RuntimeHandle, SamplerParams};

use super::{RwkvMobile, check_status};
use crate::errors::Result;

impl RwkvMobile {
    pub fn set_sampler_params(&self, handle: RuntimeHandle, params: SamplerParams) -> Result<()> {
        let f = unsafe { self.resolve::<SetSamplerParamsFn>(symbols::SET_SAMPLER_PARAMS)? };
        let rc = unsafe {
            f(
                handle.as_ptr(),
                params.temperature,
                params.top_p,
                params.top_k as c_int,
            )
        };
        check_status("set_sampler_params", rc).map(|_| ())
    }

    /// Flat `[temperature, top_p, top_k]`, the shape the runtime reports.
    /// See [`sampler_params`](Self::sampler_params) for the typed record.
    pub fn get_sampler_params(&self, handle: RuntimeHandle) -> Result<Vec<f32>> {
        let f = unsafe { self.resolve::<GetSamplerParamsFn>(symbols::GET_SAMPLER_PARAMS)? };
        let (mut temperature, mut top_p, mut top_k) = (0f32, 0f32, 0 as c_int);
        let rc = unsafe { f(handle.as_ptr(), &mut temperature, &mut top_p, &mut top_k) };
        check_status("get_sampler_params", rc)?;
        Ok(vec![temperature, top_p, top_k as f32])
    }

    pub fn set_penalty_params(&self, handle: RuntimeHandle, params: PenaltyParams) -> Result<()> {
        let f = unsafe { self.resolve::<SetPenaltyParamsFn>(symbols::SET_PENALTY_PARAMS)? };
        let rc = unsafe {
            f(
                handle.as_ptr(),
                params.presence_penalty,
                params.frequency_penalty,
                params.penalty_decay,
            )
        };
        check_status("set_penalty_params", rc).map(|_| ())
    }

    pub fn get_penalty_params(&self, handle: RuntimeHandle) -> Result<PenaltyParams> {
        let f = unsafe { self.resolve::<GetPenaltyParamsFn>(symbols::GET_PENALTY_PARAMS)? };
        let (mut presence, mut frequency, mut decay) = (0f32, 0f32, 0f32);
        let rc = unsafe { f(handle.as_ptr(), &mut presence, &mut frequency, &mut decay) };
        check_status("get_penalty_params", rc)?;
        Ok(PenaltyParams {
            presence_penalty: presence,
            frequency_penalty: frequency,
            penalty_decay: decay,
        })
    }

    pub fn set_seed(&self, handle: RuntimeHandle, seed: u64) -> Result<()> {
        let f = unsafe { self.resolve::<SetSeedFn>(symbols::SET_SEED)? };
        check_status("set_seed", unsafe { f(handle.as_ptr(), seed) }).map(|_| ())
    }

    pub fn get_seed(&self, handle: RuntimeHandle) -> Result<u64> {
        let f = unsafe { self.resolve::<GetSeedFn>(symbols::GET_SEED)? };
        Ok(unsafe { f(handle.as_ptr()) })
    }
}
