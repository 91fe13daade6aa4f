//! rwkv-mobile
//!
//! Dynamically loaded binding over `librwkv_mobile`'s C ABI.
//! - Loads the runtime, then the bridge, once; records the outcome instead of failing.
//! - Resolves each entry point on call and tags every failure
//!   (`NotLoaded` / `SymbolNotFound` vs. `NativeFailure`).
//! - Ships the small helpers hosts always end up writing (backend list, device
//!   report, sampler record) and a per-handle worker thread.
//!
//! No inference happens here; everything is forwarded to native code.

pub mod binding;
pub mod config;
pub mod errors;
pub mod helpers;
pub mod loader;
pub mod paths;
pub mod worker;

pub use binding::RwkvMobile;
pub use config::LoaderConfig;
pub use errors::{BindingError, ConfigError, Result};
pub use helpers::{DEFAULT_BACKEND_BUFFER_SIZE, DeviceInfo, UNKNOWN, backend_list};
pub use loader::LibraryLoadState;
pub use worker::{CallWorker, Pending, WorkerError};

pub use rwkv_mobile_abi::{LogLevel, ModelId, PenaltyParams, RuntimeHandle, SamplerParams};
