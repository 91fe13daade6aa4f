//! Stand-in for `librwkv_mobile`: every `rwkvmobile_*` export, answering from
//! memory, plus two control entry points (`rwkv_fixture_set` / `rwkv_fixture_get`)
//! that let a test pick the sentinel a call should return.
//!
//! Nothing here may panic: every export is reached from native frames.

use core::ffi::{CStr, c_char, c_int, c_void};
use std::collections::HashSet;
use std::ffi::CString;
use std::sync::atomic::{AtomicBool, AtomicI32, AtomicI64, AtomicU64, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};
use std::thread;
use std::time::Duration;

use rwkv_mobile_abi::ffi::{CompletionCallbackFn, RC_OK, RuntimePtr, TokenCallbackFn};

/// File stem of the built library (`librwkv_mobile_fixture.so` on Linux).
pub const LIB_NAME: &str = "rwkv_mobile_fixture";

pub const BACKENDS: &str = "cpu,qnn,webgpu";
pub const PLATFORM: &CStr = c"Fixture";
pub const SOC: &CStr = c"FX-1";
pub const HTP_ARCH: &CStr = c"V0";
pub const DUMP_LOG: &CStr = c"fixture log";
pub const RESPONSE_PREFIX: &str = "echo: ";
pub const STREAM_TOKENS: [&str; 3] = ["hello", " from", " fixture"];
pub const AVG_DECODE_SPEED: f32 = 12.5;
pub const AVG_PREFILL_SPEED: f32 = 100.0;

/// Failure code returned for a null runtime or a malformed control call.
pub const RC_BAD_ARG: c_int = -1;
/// Start status of [`stream::REFUSE`].
pub const RC_REFUSED: c_int = -5;
/// Completion status of [`stream::FAIL_LATE`].
pub const RC_FAILED_LATE: c_int = -2;

/// Values for the `stream_mode` knob.
pub mod stream {
    /// Tokens on a worker thread, then the completion callback with `0`.
    pub const COMPLETE: i64 = 0;
    /// One token on the caller's thread and no completion callback ever.
    pub const NO_COMPLETION: i64 = 1;
    /// Tokens until `stop_generation`, then idle without a completion callback.
    pub const UNTIL_STOPPED: i64 = 2;
    /// Start refused with `RC_REFUSED`; no callbacks.
    pub const REFUSE: i64 = 3;
    /// One token, then the completion callback with `RC_FAILED_LATE`.
    pub const FAIL_LATE: i64 = 4;
}

/// Knob names accepted by `rwkv_fixture_set` / `rwkv_fixture_get`.
pub mod knob {
    // process-wide; the runtime argument is ignored
    pub const INIT_NULL: &str = "init_null";
    pub const BACKENDS_RC: &str = "backends_rc";
    pub const LOG_LEVEL: &str = "log_level";

    // per runtime
    pub const LOAD_MODEL_RC: &str = "load_model_rc";
    pub const RELEASE_RC: &str = "release_rc";
    pub const STREAM_MODE: &str = "stream_mode";
    pub const GEN_NULL: &str = "gen_null";
    pub const EXTRA_WAS_NULL: &str = "extra_was_null";
    pub const RESPONSE_LIVE: &str = "response_live";
    pub const STOP_REQUESTED: &str = "stop_requested";
}

/// `rwkv_fixture_set(runtime, knob, value) -> status`
pub type FixtureSetFn = unsafe extern "C" fn(RuntimePtr, *const c_char, i64) -> c_int;
/// `rwkv_fixture_get(runtime, knob) -> value` (`i64::MIN` for an unknown knob)
pub type FixtureGetFn = unsafe extern "C" fn(RuntimePtr, *const c_char) -> i64;

// -----------------------------
// State
// -----------------------------

static INIT_NULL: AtomicBool = AtomicBool::new(false);
static BACKENDS_RC: AtomicI32 = AtomicI32::new(0);
static LOG_LEVEL: AtomicI32 = AtomicI32::new(-1);

/// Addresses handed out by `gen_completion` and not yet freed.
static LIVE_RESPONSES: Mutex<Option<HashSet<usize>>> = Mutex::new(None);

struct Runtime {
    load_model_rc: AtomicI32,
    release_rc: AtomicI32,
    next_model: AtomicI32,
    stream_mode: AtomicI64,
    gen_null: AtomicBool,
    extra_was_null: AtomicI32,
    last_response: AtomicUsize,
    generating: AtomicBool,
    stop_requested: AtomicBool,
    seed: AtomicU64,
    state: Mutex<State>,
}

struct State {
    sampler: (f32, f32, c_int),
    penalty: (f32, f32, f32),
    prompt: CString,
    response: CString,
}

impl Runtime {
    fn new() -> Self {
        Self {
            load_model_rc: AtomicI32::new(0),
            release_rc: AtomicI32::new(RC_OK),
            next_model: AtomicI32::new(0),
            stream_mode: AtomicI64::new(stream::COMPLETE),
            gen_null: AtomicBool::new(false),
            extra_was_null: AtomicI32::new(-1),
            last_response: AtomicUsize::new(0),
            generating: AtomicBool::new(false),
            stop_requested: AtomicBool::new(false),
            seed: AtomicU64::new(42),
            state: Mutex::new(State {
                sampler: (1.0, 0.85, 128),
                penalty: (0.0, 0.0, 0.996),
                prompt: CString::default(),
                response: CString::default(),
            }),
        }
    }

    fn state(&self) -> MutexGuard<'_, State> {
        lock(&self.state)
    }
}

fn lock<T>(m: &Mutex<T>) -> MutexGuard<'_, T> {
    m.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

/// # Safety
/// `ptr` must be null or a live pointer from `rwkvmobile_runtime_init`.
unsafe fn runtime<'a>(ptr: RuntimePtr) -> Option<&'a Runtime> {
    unsafe { (ptr as *const Runtime).as_ref() }
}

/// New strong reference for work that outlives the call.
///
/// # Safety
/// Same as [`runtime`], and `ptr` must be non-null.
unsafe fn runtime_arc(ptr: RuntimePtr) -> Arc<Runtime> {
    let raw = ptr as *const Runtime;
    unsafe {
        Arc::increment_strong_count(raw);
        Arc::from_raw(raw)
    }
}

unsafe fn with_runtime(ptr: RuntimePtr, f: impl FnOnce(&Runtime) -> c_int) -> c_int {
    match unsafe { runtime(ptr) } {
        Some(rt) => f(rt),
        None => RC_BAD_ARG,
    }
}

unsafe fn owned(s: *const c_char) -> Option<CString> {
    if s.is_null() {
        return None;
    }
    Some(unsafe { CStr::from_ptr(s) }.to_owned())
}

// -----------------------------
// Control
// -----------------------------

#[unsafe(no_mangle)]
pub unsafe extern "C" fn rwkv_fixture_set(runtime_ptr: RuntimePtr, name: *const c_char, value: i64) -> c_int {
    let Some(name) = (unsafe { owned(name) }) else {
        return RC_BAD_ARG;
    };
    let value32 = value.clamp(i32::MIN as i64, i32::MAX as i64) as i32;
    match name.to_str().unwrap_or_default() {
        knob::INIT_NULL => INIT_NULL.store(value != 0, Ordering::SeqCst),
        knob::BACKENDS_RC => BACKENDS_RC.store(value32, Ordering::SeqCst),
        other => {
            let Some(rt) = (unsafe { runtime(runtime_ptr) }) else {
                return RC_BAD_ARG;
            };
            match other {
                knob::LOAD_MODEL_RC => rt.load_model_rc.store(value32, Ordering::SeqCst),
                knob::RELEASE_RC => rt.release_rc.store(value32, Ordering::SeqCst),
                knob::STREAM_MODE => rt.stream_mode.store(value, Ordering::SeqCst),
                knob::GEN_NULL => rt.gen_null.store(value != 0, Ordering::SeqCst),
                _ => return RC_BAD_ARG,
            }
        }
    }
    RC_OK
}

#[unsafe(no_mangle)]
pub unsafe extern "C" fn rwkv_fixture_get(runtime_ptr: RuntimePtr, name: *const c_char) -> i64 {
    let Some(name) = (unsafe { owned(name) }) else {
        return i64::MIN;
    };
    match name.to_str().unwrap_or_default() {
        knob::INIT_NULL => INIT_NULL.load(Ordering::SeqCst) as i64,
        knob::BACKENDS_RC => BACKENDS_RC.load(Ordering::SeqCst) as i64,
        knob::LOG_LEVEL => LOG_LEVEL.load(Ordering::SeqCst) as i64,
        other => {
            let Some(rt) = (unsafe { runtime(runtime_ptr) }) else {
                return i64::MIN;
            };
            match other {
                knob::EXTRA_WAS_NULL => rt.extra_was_null.load(Ordering::SeqCst) as i64,
                knob::STOP_REQUESTED => rt.stop_requested.load(Ordering::SeqCst) as i64,
                knob::RESPONSE_LIVE => {
                    let addr = rt.last_response.load(Ordering::SeqCst);
                    let live = lock(&LIVE_RESPONSES);
                    live.as_ref().is_some_and(|set| set.contains(&addr)) as i64
                }
                _ => i64::MIN,
            }
        }
    }
}

// -----------------------------
// Device
// -----------------------------

#[unsafe(no_mangle)]
pub extern "C" fn rwkvmobile_get_platform_name() -> *const c_char {
    PLATFORM.as_ptr()
}

#[unsafe(no_mangle)]
pub extern "C" fn rwkvmobile_get_soc_name() -> *const c_char {
    SOC.as_ptr()
}

/// Not known on this "device".
#[unsafe(no_mangle)]
pub extern "C" fn rwkvmobile_get_soc_partname() -> *const c_char {
    std::ptr::null()
}

#[unsafe(no_mangle)]
pub extern "C" fn rwkvmobile_get_htp_arch() -> *const c_char {
    HTP_ARCH.as_ptr()
}

#[unsafe(no_mangle)]
pub extern "C" fn rwkvmobile_dump_log() -> *const c_char {
    DUMP_LOG.as_ptr()
}

#[unsafe(no_mangle)]
pub extern "C" fn rwkvmobile_set_loglevel(loglevel: c_int) {
    LOG_LEVEL.store(loglevel, Ordering::SeqCst);
}

#[unsafe(no_mangle)]
pub extern "C" fn rwkvmobile_set_cache_dir(_path: *const c_char) {}

// -----------------------------
// Runtime lifecycle
// -----------------------------

#[unsafe(no_mangle)]
pub extern "C" fn rwkvmobile_runtime_init() -> RuntimePtr {
    if INIT_NULL.load(Ordering::SeqCst) {
        return std::ptr::null_mut();
    }
    Arc::into_raw(Arc::new(Runtime::new())) as RuntimePtr
}

#[unsafe(no_mangle)]
pub unsafe extern "C" fn rwkvmobile_runtime_release(runtime_ptr: RuntimePtr) -> c_int {
    if runtime_ptr.is_null() {
        return RC_BAD_ARG;
    }
    let rt = unsafe { Arc::from_raw(runtime_ptr as *const Runtime) };
    rt.release_rc.load(Ordering::SeqCst)
}

/// Copies as much of [`BACKENDS`] as fits and returns the bytes written.
#[unsafe(no_mangle)]
pub unsafe extern "C" fn rwkvmobile_runtime_get_available_backend_names(
    buffer: *mut c_char,
    buffer_size: c_int,
) -> c_int {
    let rc = BACKENDS_RC.load(Ordering::SeqCst);
    if rc < 0 {
        return rc;
    }
    if buffer.is_null() || buffer_size <= 0 {
        return RC_BAD_ARG;
    }
    let n = BACKENDS.len().min(buffer_size as usize);
    unsafe { std::ptr::copy_nonoverlapping(BACKENDS.as_ptr(), buffer as *mut u8, n) };
    n as c_int
}

#[unsafe(no_mangle)]
pub unsafe extern "C" fn rwkvmobile_runtime_set_qnn_library_path(runtime_ptr: RuntimePtr, _path: *const c_char) -> c_int {
    unsafe { with_runtime(runtime_ptr, |_| RC_OK) }
}

#[unsafe(no_mangle)]
pub unsafe extern "C" fn rwkvmobile_runtime_add_adsp_library_path(runtime_ptr: RuntimePtr, _path: *const c_char) -> c_int {
    unsafe { with_runtime(runtime_ptr, |_| RC_OK) }
}

// -----------------------------
// Models and state
// -----------------------------

fn next_model(rt: &Runtime) -> c_int {
    let rc = rt.load_model_rc.load(Ordering::SeqCst);
    if rc < 0 {
        return rc;
    }
    rt.next_model.fetch_add(1, Ordering::SeqCst)
}

#[unsafe(no_mangle)]
pub unsafe extern "C" fn rwkvmobile_runtime_load_model(
    runtime_ptr: RuntimePtr,
    _model_path: *const c_char,
    _backend_name: *const c_char,
) -> c_int {
    unsafe { with_runtime(runtime_ptr, next_model) }
}

#[unsafe(no_mangle)]
pub unsafe extern "C" fn rwkvmobile_runtime_load_model_with_extra(
    runtime_ptr: RuntimePtr,
    _model_path: *const c_char,
    _backend_name: *const c_char,
    extra_params: *const c_char,
) -> c_int {
    unsafe {
        with_runtime(runtime_ptr, |rt| {
            rt.extra_was_null
                .store(extra_params.is_null() as i32, Ordering::SeqCst);
            next_model(rt)
        })
    }
}

#[unsafe(no_mangle)]
pub unsafe extern "C" fn rwkvmobile_runtime_release_model(runtime_ptr: RuntimePtr, model_id: c_int) -> c_int {
    unsafe {
        with_runtime(runtime_ptr, |rt| {
            if model_id < 0 || model_id >= rt.next_model.load(Ordering::SeqCst) {
                RC_BAD_ARG
            } else {
                RC_OK
            }
        })
    }
}

#[unsafe(no_mangle)]
pub unsafe extern "C" fn rwkvmobile_runtime_clear_state(runtime_ptr: RuntimePtr) -> c_int {
    unsafe { with_runtime(runtime_ptr, |_| RC_OK) }
}

#[unsafe(no_mangle)]
pub unsafe extern "C" fn rwkvmobile_runtime_load_initial_state(runtime_ptr: RuntimePtr, _path: *const c_char) -> c_int {
    unsafe { with_runtime(runtime_ptr, |_| RC_OK) }
}

#[unsafe(no_mangle)]
pub unsafe extern "C" fn rwkvmobile_runtime_unload_initial_state(runtime_ptr: RuntimePtr) -> c_int {
    unsafe { with_runtime(runtime_ptr, |_| RC_OK) }
}

// -----------------------------
// Generation
// -----------------------------

#[unsafe(no_mangle)]
pub unsafe extern "C" fn rwkvmobile_runtime_is_generating(runtime_ptr: RuntimePtr) -> c_int {
    unsafe { with_runtime(runtime_ptr, |rt| rt.generating.load(Ordering::SeqCst) as c_int) }
}

#[unsafe(no_mangle)]
pub unsafe extern "C" fn rwkvmobile_runtime_stop_generation(runtime_ptr: RuntimePtr) -> c_int {
    unsafe {
        with_runtime(runtime_ptr, |rt| {
            rt.stop_requested.store(true, Ordering::SeqCst);
            RC_OK
        })
    }
}

/// Echoes the prompt behind [`RESPONSE_PREFIX`] in a buffer the caller must free.
#[unsafe(no_mangle)]
pub unsafe extern "C" fn rwkvmobile_runtime_gen_completion(
    runtime_ptr: RuntimePtr,
    prompt: *const c_char,
    _max_tokens: c_int,
) -> *const c_char {
    let Some(rt) = (unsafe { runtime(runtime_ptr) }) else {
        return std::ptr::null();
    };
    if rt.gen_null.load(Ordering::SeqCst) {
        return std::ptr::null();
    }
    let prompt = unsafe { owned(prompt) }.unwrap_or_default();
    let text = format!("{RESPONSE_PREFIX}{}", prompt.to_string_lossy());
    let response = CString::new(text).unwrap_or_default();
    rt.state().response = response.clone();

    let ptr = response.into_raw();
    lock(&LIVE_RESPONSES)
        .get_or_insert_with(HashSet::new)
        .insert(ptr as usize);
    rt.last_response.store(ptr as usize, Ordering::SeqCst);
    ptr
}

#[unsafe(no_mangle)]
pub unsafe extern "C" fn rwkvmobile_runtime_free_response_buffer(buffer: *mut c_char) {
    if buffer.is_null() {
        return;
    }
    let known = lock(&LIVE_RESPONSES)
        .as_mut()
        .is_some_and(|set| set.remove(&(buffer as usize)));
    // Only buffers this library handed out go back through `from_raw`.
    if known {
        drop(unsafe { CString::from_raw(buffer) });
    }
}

#[unsafe(no_mangle)]
pub unsafe extern "C" fn rwkvmobile_runtime_get_response_buffer_content(runtime_ptr: RuntimePtr) -> *const c_char {
    match unsafe { runtime(runtime_ptr) } {
        Some(rt) => rt.state().response.as_ptr(),
        None => std::ptr::null(),
    }
}

/// Raw callback context carried onto a worker thread.
#[derive(Clone, Copy)]
struct Callbacks {
    token: Option<TokenCallbackFn>,
    completion: Option<CompletionCallbackFn>,
    user_data: usize,
}

impl Callbacks {
    fn token(&self, text: &CStr) {
        if let Some(cb) = self.token {
            unsafe { cb(text.as_ptr(), self.user_data as *mut c_void) };
        }
    }

    fn complete(&self, status: c_int) {
        if let Some(cb) = self.completion {
            unsafe { cb(status, self.user_data as *mut c_void) };
        }
    }
}

fn token_cstrings() -> Vec<CString> {
    STREAM_TOKENS
        .iter()
        .filter_map(|t| CString::new(*t).ok())
        .collect()
}

/// Behaviour is picked by the runtime's `stream_mode` knob (see [`stream`]).
#[unsafe(no_mangle)]
pub unsafe extern "C" fn rwkvmobile_runtime_gen_completion_async(
    runtime_ptr: RuntimePtr,
    _prompt: *const c_char,
    _max_tokens: c_int,
    token_callback: Option<TokenCallbackFn>,
    completion_callback: Option<CompletionCallbackFn>,
    user_data: *mut c_void,
) -> c_int {
    let Some(rt) = (unsafe { runtime(runtime_ptr) }) else {
        return RC_BAD_ARG;
    };
    let cb = Callbacks {
        token: token_callback,
        completion: completion_callback,
        user_data: user_data as usize,
    };
    let mode = rt.stream_mode.load(Ordering::SeqCst);
    if mode == stream::REFUSE {
        return RC_REFUSED;
    }
    if mode == stream::NO_COMPLETION {
        if let Some(first) = token_cstrings().first() {
            cb.token(first);
        }
        return RC_OK;
    }

    rt.stop_requested.store(false, Ordering::SeqCst);
    rt.generating.store(true, Ordering::SeqCst);
    let rt = unsafe { runtime_arc(runtime_ptr) };
    let spawned = thread::Builder::new()
        .name("fixture-generate".into())
        .spawn(move || {
            let tokens = token_cstrings();
            match mode {
                stream::UNTIL_STOPPED => {
                    for t in tokens.iter().cycle() {
                        if rt.stop_requested.load(Ordering::SeqCst) {
                            break;
                        }
                        cb.token(t);
                        thread::sleep(Duration::from_millis(10));
                    }
                }
                stream::FAIL_LATE => {
                    if let Some(first) = tokens.first() {
                        cb.token(first);
                    }
                    cb.complete(RC_FAILED_LATE);
                }
                _ => {
                    for t in &tokens {
                        cb.token(t);
                        thread::sleep(Duration::from_millis(5));
                    }
                    cb.complete(RC_OK);
                }
            }
            // No callback may run after this.
            rt.generating.store(false, Ordering::SeqCst);
        });
    match spawned {
        Ok(_) => RC_OK,
        Err(_) => {
            // `rt` moved into the failed closure and was dropped with it.
            if let Some(rt) = unsafe { runtime(runtime_ptr) } {
                rt.generating.store(false, Ordering::SeqCst);
            }
            RC_BAD_ARG
        }
    }
}

// -----------------------------
// Sampling
// -----------------------------

#[unsafe(no_mangle)]
pub unsafe extern "C" fn rwkvmobile_runtime_set_sampler_params(
    runtime_ptr: RuntimePtr,
    temperature: f32,
    top_p: f32,
    top_k: c_int,
) -> c_int {
    unsafe {
        with_runtime(runtime_ptr, |rt| {
            rt.state().sampler = (temperature, top_p, top_k);
            RC_OK
        })
    }
}

#[unsafe(no_mangle)]
pub unsafe extern "C" fn rwkvmobile_runtime_get_sampler_params(
    runtime_ptr: RuntimePtr,
    temperature: *mut f32,
    top_p: *mut f32,
    top_k: *mut c_int,
) -> c_int {
    if temperature.is_null() || top_p.is_null() || top_k.is_null() {
        return RC_BAD_ARG;
    }
    unsafe {
        with_runtime(runtime_ptr, |rt| {
            let (t, p, k) = rt.state().sampler;
            *temperature = t;
            *top_p = p;
            *top_k = k;
            RC_OK
        })
    }
}

#[unsafe(no_mangle)]
pub unsafe extern "C" fn rwkvmobile_runtime_set_penalty_params(
    runtime_ptr: RuntimePtr,
    presence_penalty: f32,
    frequency_penalty: f32,
    penalty_decay: f32,
) -> c_int {
    unsafe {
        with_runtime(runtime_ptr, |rt| {
            rt.state().penalty = (presence_penalty, frequency_penalty, penalty_decay);
            RC_OK
        })
    }
}

#[unsafe(no_mangle)]
pub unsafe extern "C" fn rwkvmobile_runtime_get_penalty_params(
    runtime_ptr: RuntimePtr,
    presence_penalty: *mut f32,
    frequency_penalty: *mut f32,
    penalty_decay: *mut f32,
) -> c_int {
    if presence_penalty.is_null() || frequency_penalty.is_null() || penalty_decay.is_null() {
        return RC_BAD_ARG;
    }
    unsafe {
        with_runtime(runtime_ptr, |rt| {
            let (p, f, d) = rt.state().penalty;
            *presence_penalty = p;
            *frequency_penalty = f;
            *penalty_decay = d;
            RC_OK
        })
    }
}

#[unsafe(no_mangle)]
pub unsafe extern "C" fn rwkvmobile_runtime_set_seed(runtime_ptr: RuntimePtr, seed: u64) -> c_int {
    unsafe {
        with_runtime(runtime_ptr, |rt| {
            rt.seed.store(seed, Ordering::SeqCst);
            RC_OK
        })
    }
}

#[unsafe(no_mangle)]
pub unsafe extern "C" fn rwkvmobile_runtime_get_seed(runtime_ptr: RuntimePtr) -> u64 {
    match unsafe { runtime(runtime_ptr) } {
        Some(rt) => rt.seed.load(Ordering::SeqCst),
        None => 0,
    }
}

// -----------------------------
// Prompt
// -----------------------------

unsafe fn store_prompt(runtime_ptr: RuntimePtr, value: *const c_char) -> c_int {
    let Some(value) = (unsafe { owned(value) }) else {
        return RC_BAD_ARG;
    };
    unsafe {
        with_runtime(runtime_ptr, |rt| {
            rt.state().prompt = value;
            RC_OK
        })
    }
}

unsafe fn accept_string(runtime_ptr: RuntimePtr, value: *const c_char) -> c_int {
    if value.is_null() {
        return RC_BAD_ARG;
    }
    unsafe { with_runtime(runtime_ptr, |_| RC_OK) }
}

#[unsafe(no_mangle)]
pub unsafe extern "C" fn rwkvmobile_runtime_set_prompt(runtime_ptr: RuntimePtr, prompt: *const c_char) -> c_int {
    unsafe { store_prompt(runtime_ptr, prompt) }
}

#[unsafe(no_mangle)]
pub unsafe extern "C" fn rwkvmobile_runtime_get_prompt(runtime_ptr: RuntimePtr) -> *const c_char {
    match unsafe { runtime(runtime_ptr) } {
        Some(rt) => rt.state().prompt.as_ptr(),
        None => std::ptr::null(),
    }
}

#[unsafe(no_mangle)]
pub unsafe extern "C" fn rwkvmobile_runtime_set_bos_token(runtime_ptr: RuntimePtr, token: *const c_char) -> c_int {
    unsafe { accept_string(runtime_ptr, token) }
}

#[unsafe(no_mangle)]
pub unsafe extern "C" fn rwkvmobile_runtime_set_eos_token(runtime_ptr: RuntimePtr, token: *const c_char) -> c_int {
    unsafe { accept_string(runtime_ptr, token) }
}

#[unsafe(no_mangle)]
pub unsafe extern "C" fn rwkvmobile_runtime_set_user_role(runtime_ptr: RuntimePtr, role: *const c_char) -> c_int {
    unsafe { accept_string(runtime_ptr, role) }
}

#[unsafe(no_mangle)]
pub unsafe extern "C" fn rwkvmobile_runtime_set_response_role(runtime_ptr: RuntimePtr, role: *const c_char) -> c_int {
    unsafe { accept_string(runtime_ptr, role) }
}

// -----------------------------
// Metrics
// -----------------------------

#[unsafe(no_mangle)]
pub extern "C" fn rwkvmobile_runtime_get_avg_decode_speed(runtime_ptr: RuntimePtr) -> f32 {
    if runtime_ptr.is_null() { -1.0 } else { AVG_DECODE_SPEED }
}

#[unsafe(no_mangle)]
pub extern "C" fn rwkvmobile_runtime_get_avg_prefill_speed(runtime_ptr: RuntimePtr) -> f32 {
    if runtime_ptr.is_null() { -1.0 } else { AVG_PREFILL_SPEED }
}

#[unsafe(no_mangle)]
pub extern "C" fn rwkvmobile_runtime_get_prefill_progress(runtime_ptr: RuntimePtr) -> f32 {
    if runtime_ptr.is_null() { -1.0 } else { 1.0 }
}
