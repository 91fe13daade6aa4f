use core::ffi::c_void;
use std::fmt;

use crate::ffi::RuntimePtr;

/// Live native runtime, carried as the integer value of its pointer.
/// `0` means "no runtime". Distinct from [`ModelId`] so the two can't be swapped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RuntimeHandle(pub i64);

impl RuntimeHandle {
    pub const NULL: RuntimeHandle = RuntimeHandle(0);

    #[inline]
    pub fn is_null(self) -> bool {
        self.0 == 0
    }

    #[inline]
    pub fn from_ptr(ptr: RuntimePtr) -> Self {
        RuntimeHandle(ptr as usize as i64)
    }

    #[inline]
    pub fn as_ptr(self) -> RuntimePtr {
        self.0 as usize as *mut c_void
    }
}

impl From<i64> for RuntimeHandle {
    #[inline]
    fn from(value: i64) -> Self {
        RuntimeHandle(value)
    }
}

impl From<RuntimeHandle> for i64 {
    #[inline]
    fn from(handle: RuntimeHandle) -> i64 {
        handle.0
    }
}

impl fmt::Display for RuntimeHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{:x}", self.0)
    }
}

/// Id of a model loaded into a runtime. Always >= 0 once constructed by the binding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Ord, PartialOrd)]
pub struct ModelId(pub i32);

impl From<i32> for ModelId {
    #[inline]
    fn from(value: i32) -> Self {
        ModelId(value)
    }
}

impl From<ModelId> for i32 {
    #[inline]
    fn from(id: ModelId) -> i32 {
        id.0
    }
}

impl fmt::Display for ModelId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn null_handle_is_zero() {
        assert!(RuntimeHandle::NULL.is_null());
        assert!(RuntimeHandle::from_ptr(std::ptr::null_mut()).is_null());
        assert!(!RuntimeHandle(0x7f00_1000).is_null());
    }

    #[test]
    fn handle_pointer_round_trip_keeps_value() {
        let h = RuntimeHandle(0x7f00_1000);
        assert_eq!(RuntimeHandle::from_ptr(h.as_ptr()), h);
    }

    #[test]
    fn handle_displays_as_hex() {
        assert_eq!(RuntimeHandle(0xdead_beef).to_string(), "0xdeadbeef");
        assert_eq!(RuntimeHandle::NULL.to_string(), "0x0");
    }
}
