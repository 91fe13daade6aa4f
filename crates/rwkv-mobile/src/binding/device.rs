use std::path::Path;

use rwkv_mobile_abi::LogLevel;
use rwkv_mobile_abi::ffi::{SetCacheDirFn, SetLogLevelFn, StaticStringFn, symbols};

use super::{RwkvMobile, borrowed_string, path_cstring};
use crate::errors::Result;

impl RwkvMobile {
    fn static_string(&self, symbol: &'static str) -> Result<Option<String>> {
        let f = unsafe { self.resolve::<StaticStringFn>(symbol)? };
        Ok(unsafe { borrowed_string(f()) })
    }

    /// e.g. "Android"
    pub fn platform_name(&self) -> Result<Option<String>> {
        self.static_string(symbols::GET_PLATFORM_NAME)
    }

    pub fn soc_name(&self) -> Result<Option<String>> {
        self.static_string(symbols::GET_SOC_NAME)
    }

    pub fn soc_partname(&self) -> Result<Option<String>> {
        self.static_string(symbols::GET_SOC_PARTNAME)
    }

    /// Hexagon tensor processor architecture, when the SoC has one.
    pub fn htp_arch(&self) -> Result<Option<String>> {
        self.static_string(symbols::GET_HTP_ARCH)
    }

    /// Contents of the runtime's internal log buffer.
    pub fn dump_log(&self) -> Result<Option<String>> {
        self.static_string(symbols::DUMP_LOG)
    }

    pub fn set_log_level(&self, level: LogLevel) -> Result<()> {
        let f = unsafe { self.resolve::<SetLogLevelFn>(symbols::SET_LOGLEVEL)? };
        unsafe { f(level.as_raw()) };
        Ok(())
    }

    pub fn set_cache_dir(&self, path: &Path) -> Result<()> {
        let cpath = path_cstring("set_cache_dir", path)?;
        let f = unsafe { self.resolve::<SetCacheDirFn>(symbols::SET_CACHE_DIR)? };
        unsafe { f(cpath.as_ptr()) };
        Ok(())
    }
}
