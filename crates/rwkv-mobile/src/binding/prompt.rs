use rwkv_mobile_abi::RuntimeHandle;
use rwkv_mobile_abi::ffi::{RuntimeStringFn, symbols};

use super::{RwkvMobile, borrowed_string, make_cstring};
use crate::errors::Result;

impl RwkvMobile {
    pub fn set_prompt(&self, handle: RuntimeHandle, prompt: &str) -> Result<()> {
        let c = make_cstring("set_prompt", prompt)?;
        self.runtime_str_call("set_prompt", symbols::SET_PROMPT, handle, &c)
    }

    pub fn get_prompt(&self, handle: RuntimeHandle) -> Result<Option<String>> {
        let f = unsafe { self.resolve::<RuntimeStringFn>(symbols::GET_PROMPT)? };
        Ok(unsafe { borrowed_string(f(handle.as_ptr())) })
    }

    pub fn set_bos_token(&self, handle: RuntimeHandle, token: &str) -> Result<()> {
        let c = make_cstring("set_bos_token", token)?;
        self.runtime_str_call("set_bos_token", symbols::SET_BOS_TOKEN, handle, &c)
    }

    pub fn set_eos_token(&self, handle: RuntimeHandle, token: &str) -> Result<()> {
        let c = make_cstring("set_eos_token", token)?;
        self.runtime_str_call("set_eos_token", symbols::SET_EOS_TOKEN, handle, &c)
    }

    /// Chat formatting: label of the user turn (e.g. "User").
    pub fn set_user_role(&self, handle: RuntimeHandle, role: &str) -> Result<()> {
        let c = make_cstring("set_user_role", role)?;
        self.runtime_str_call("set_user_role", symbols::SET_USER_ROLE, handle, &c)
    }

    /// Chat formatting: label of the model turn (e.g. "Assistant").
    pub fn set_response_role(&self, handle: RuntimeHandle, role: &str) -> Result<()> {
        let c = make_cstring("set_response_role", role)?;
        self.runtime_str_call("set_response_role", symbols::SET_RESPONSE_ROLE, handle, &c)
    }
}
