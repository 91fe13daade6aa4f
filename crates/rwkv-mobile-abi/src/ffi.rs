use core::ffi::{c_char, c_int, c_void};

/// Shared object holding the inference runtime. Loaded first.
pub const RUNTIME_LIB_NAME: &str = "rwkv_mobile";

/// Adapter library built on top of the runtime. Loaded second; it needs the
/// runtime's symbols to already be resident.
pub const BRIDGE_LIB_NAME: &str = "rwkv_jni";

pub const RC_OK: c_int = 0;

/// Opaque `rwkvmobile_runtime_t`.
pub type RuntimePtr = *mut c_void;

// ---------- Symbol names ----------

pub mod symbols {
    pub const GET_PLATFORM_NAME: &str = "rwkvmobile_get_platform_name";
    pub const GET_SOC_NAME: &str = "rwkvmobile_get_soc_name";
    pub const GET_SOC_PARTNAME: &str = "rwkvmobile_get_soc_partname";
    pub const GET_HTP_ARCH: &str = "rwkvmobile_get_htp_arch";

    pub const DUMP_LOG: &str = "rwkvmobile_dump_log";
    pub const SET_LOGLEVEL: &str = "rwkvmobile_set_loglevel";
    pub const SET_CACHE_DIR: &str = "rwkvmobile_set_cache_dir";

    pub const RUNTIME_INIT: &str = "rwkvmobile_runtime_init";
    pub const RUNTIME_RELEASE: &str = "rwkvmobile_runtime_release";

    pub const GET_AVAILABLE_BACKEND_NAMES: &str = "rwkvmobile_runtime_get_available_backend_names";
    pub const SET_QNN_LIBRARY_PATH: &str = "rwkvmobile_runtime_set_qnn_library_path";
    pub const ADD_ADSP_LIBRARY_PATH: &str = "rwkvmobile_runtime_add_adsp_library_path";

    pub const LOAD_MODEL: &str = "rwkvmobile_runtime_load_model";
    pub const LOAD_MODEL_WITH_EXTRA: &str = "rwkvmobile_runtime_load_model_with_extra";
    pub const RELEASE_MODEL: &str = "rwkvmobile_runtime_release_model";

    pub const CLEAR_STATE: &str = "rwkvmobile_runtime_clear_state";
    pub const LOAD_INITIAL_STATE: &str = "rwkvmobile_runtime_load_initial_state";
    pub const UNLOAD_INITIAL_STATE: &str = "rwkvmobile_runtime_unload_initial_state";

    pub const IS_GENERATING: &str = "rwkvmobile_runtime_is_generating";
    pub const STOP_GENERATION: &str = "rwkvmobile_runtime_stop_generation";
    pub const GEN_COMPLETION: &str = "rwkvmobile_runtime_gen_completion";
    pub const GEN_COMPLETION_ASYNC: &str = "rwkvmobile_runtime_gen_completion_async";
    pub const FREE_RESPONSE_BUFFER: &str = "rwkvmobile_runtime_free_response_buffer";
    pub const GET_RESPONSE_BUFFER_CONTENT: &str =
        "rwkvmobile_runtime_get_response_buffer_content";

    pub const SET_SAMPLER_PARAMS: &str = "rwkvmobile_runtime_set_sampler_params";
    pub const GET_SAMPLER_PARAMS: &str = "rwkvmobile_runtime_get_sampler_params";
    pub const SET_PENALTY_PARAMS: &str = "rwkvmobile_runtime_set_penalty_params";
    pub const GET_PENALTY_PARAMS: &str = "rwkvmobile_runtime_get_penalty_params";

    pub const SET_PROMPT: &str = "rwkvmobile_runtime_set_prompt";
    pub const GET_PROMPT: &str = "rwkvmobile_runtime_get_prompt";
    pub const SET_BOS_TOKEN: &str = "rwkvmobile_runtime_set_bos_token";
    pub const SET_EOS_TOKEN: &str = "rwkvmobile_runtime_set_eos_token";
    pub const SET_USER_ROLE: &str = "rwkvmobile_runtime_set_user_role";
    pub const SET_RESPONSE_ROLE: &str = "rwkvmobile_runtime_set_response_role";

    pub const GET_AVG_DECODE_SPEED: &str = "rwkvmobile_runtime_get_avg_decode_speed";
    pub const GET_AVG_PREFILL_SPEED: &str = "rwkvmobile_runtime_get_avg_prefill_speed";
    pub const GET_PREFILL_PROGRESS: &str = "rwkvmobile_runtime_get_prefill_progress";

    pub const SET_SEED: &str = "rwkvmobile_runtime_set_seed";
    pub const GET_SEED: &str = "rwkvmobile_runtime_get_seed";
}

// ---------- Function pointer types (C ABI) ----------

/// Static string owned by the runtime; never freed by the caller.
pub type StaticStringFn = unsafe extern "C" fn() -> *const c_char;
pub type SetLogLevelFn = unsafe extern "C" fn(loglevel: c_int);
pub type SetCacheDirFn = unsafe extern "C" fn(path: *const c_char);

pub type RuntimeInitFn = unsafe extern "C" fn() -> RuntimePtr;
/// Shared shape of every `int f(runtime)` entry point
/// (release, clear/unload state, is/stop generating).
pub type RuntimeStatusFn = unsafe extern "C" fn(runtime: RuntimePtr) -> c_int;
/// Shared shape of every `int f(runtime, const char*)` entry point
/// (library paths, initial state, prompt, BOS/EOS, roles).
pub type RuntimeStrFn = unsafe extern "C" fn(runtime: RuntimePtr, value: *const c_char) -> c_int;
/// String borrowed from the runtime's internal buffers.
pub type RuntimeStringFn = unsafe extern "C" fn(runtime: RuntimePtr) -> *const c_char;
pub type RuntimeFloatFn = unsafe extern "C" fn(runtime: RuntimePtr) -> f32;

/// Writes comma-separated names into `buffer`; returns bytes written or a negative code.
pub type GetBackendNamesFn = unsafe extern "C" fn(buffer: *mut c_char, buffer_size: c_int) -> c_int;

/// Returns a model id (>= 0) or a negative code.
pub type LoadModelFn = unsafe extern "C" fn(
    runtime: RuntimePtr,
    model_path: *const c_char,
    backend_name: *const c_char,
) -> c_int;
/// `extra_params` may be null.
pub type LoadModelWithExtraFn = unsafe extern "C" fn(
    runtime: RuntimePtr,
    model_path: *const c_char,
    backend_name: *const c_char,
    extra_params: *const c_char,
) -> c_int;
pub type ReleaseModelFn = unsafe extern "C" fn(runtime: RuntimePtr, model_id: c_int) -> c_int;

/// Returned buffer must go back through `FreeResponseBufferFn`.
pub type GenCompletionFn =
    unsafe extern "C" fn(runtime: RuntimePtr, prompt: *const c_char, max_tokens: c_int) -> *const c_char;
pub type FreeResponseBufferFn = unsafe extern "C" fn(buffer: *mut c_char);

pub type TokenCallbackFn = unsafe extern "C" fn(token: *const c_char, user_data: *mut c_void);
pub type CompletionCallbackFn = unsafe extern "C" fn(status: c_int, user_data: *mut c_void);
pub type GenCompletionAsyncFn = unsafe extern "C" fn(
    runtime: RuntimePtr,
    prompt: *const c_char,
    max_tokens: c_int,
    token_callback: Option<TokenCallbackFn>,
    completion_callback: Option<CompletionCallbackFn>,
    user_data: *mut c_void,
) -> c_int;

pub type SetSamplerParamsFn =
    unsafe extern "C" fn(runtime: RuntimePtr, temperature: f32, top_p: f32, top_k: c_int) -> c_int;
pub type GetSamplerParamsFn = unsafe extern "C" fn(
    runtime: RuntimePtr,
    temperature: *mut f32,
    top_p: *mut f32,
    top_k: *mut c_int,
) -> c_int;
pub type SetPenaltyParamsFn = unsafe extern "C" fn(
    runtime: RuntimePtr,
    presence_penalty: f32,
    frequency_penalty: f32,
    penalty_decay: f32,
) -> c_int;
pub type GetPenaltyParamsFn = unsafe extern "C" fn(
    runtime: RuntimePtr,
    presence_penalty: *mut f32,
    frequency_penalty: *mut f32,
    penalty_decay: *mut f32,
) -> c_int;

pub type SetSeedFn = unsafe extern "C" fn(runtime: RuntimePtr, seed: u64) -> c_int;
pub type GetSeedFn = unsafe extern "C" fn(runtime: RuntimePtr) -> u64;
