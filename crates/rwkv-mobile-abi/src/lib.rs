//! rwkv-mobile ABI crate: the C contract exported by `librwkv_mobile` and the
//! small typed values that cross it.

pub mod ffi;
pub mod handle;
pub mod log_level;
pub mod sampler;

pub use handle::*;
pub use log_level::*;
pub use sampler::*;
