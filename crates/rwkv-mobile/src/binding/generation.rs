use core::ffi::{CStr, c_char, c_int, c_void};
use std::panic::{AssertUnwindSafe, catch_unwind};
use std::sync::{Mutex, mpsc};
use std::time::{Duration, Instant};

use rwkv_mobile_abi::RuntimeHandle;
use rwkv_mobile_abi::ffi::{
    FreeResponseBufferFn, GenCompletionAsyncFn, GenCompletionFn, RuntimeStatusFn,
    RuntimeStringFn, symbols,
};

use super::{RwkvMobile, borrowed_string, check_status, make_cstring};
use crate::errors::{BindingError, Result};

/// How often a streaming call checks on the runtime while waiting for completion.
const STREAM_POLL: Duration = Duration::from_millis(50);
/// Consecutive idle answers from `is_generating` before a stream is given up.
const STREAM_IDLE_POLLS: u32 = 4;

impl RwkvMobile {
    pub fn is_generating(&self, handle: RuntimeHandle) -> Result<bool> {
        self.runtime_status_call("is_generating", symbols::IS_GENERATING, handle)
            .map(|flag| flag != 0)
    }

    /// Advisory: asks the runtime to stop. A `gen_completion` already blocked in
    /// native code may or may not return early.
    pub fn stop_generation(&self, handle: RuntimeHandle) -> Result<()> {
        self.runtime_status_call("stop_generation", symbols::STOP_GENERATION, handle)
            .map(|_| ())
    }

    /// Blocking generation. A null response is `NativeFailure { code: 0 }`.
    pub fn gen_completion(
        &self,
        handle: RuntimeHandle,
        prompt: &str,
        max_tokens: i32,
    ) -> Result<String> {
        let cprompt = make_cstring("gen_completion", prompt)?;
        let f = unsafe { self.resolve::<GenCompletionFn>(symbols::GEN_COMPLETION)? };
        let ptr = unsafe { f(handle.as_ptr(), cprompt.as_ptr(), max_tokens as c_int) };
        let Some(text) = (unsafe { borrowed_string(ptr) }) else {
            return Err(BindingError::NativeFailure {
                op: "gen_completion",
                code: 0,
            });
        };
        self.free_response_buffer(ptr as *mut c_char);
        Ok(text)
    }

    /// Streaming generation. `on_token` runs on whichever thread the runtime
    /// calls back from; this call blocks until the completion callback fires.
    /// Returns the completion status reported by the runtime.
    ///
    /// Requires `rwkvmobile_runtime_is_generating`: if the runtime goes idle
    /// without calling back, the wait ends with [`BindingError::NoCompletion`].
    pub fn gen_completion_stream<F>(
        &self,
        handle: RuntimeHandle,
        prompt: &str,
        max_tokens: i32,
        on_token: F,
    ) -> Result<i32>
    where
        F: FnMut(&str) + Send,
    {
        self.stream_completion(handle, prompt, max_tokens, None, on_token)
    }

    /// [`gen_completion_stream`](Self::gen_completion_stream) with a deadline.
    /// Once `timeout` passes, generation is stopped and, after the runtime goes
    /// idle, [`BindingError::TimedOut`] is returned.
    pub fn gen_completion_stream_timeout<F>(
        &self,
        handle: RuntimeHandle,
        prompt: &str,
        max_tokens: i32,
        timeout: Duration,
        on_token: F,
    ) -> Result<i32>
    where
        F: FnMut(&str) + Send,
    {
        self.stream_completion(handle, prompt, max_tokens, Some(timeout), on_token)
    }

    fn stream_completion<F>(
        &self,
        handle: RuntimeHandle,
        prompt: &str,
        max_tokens: i32,
        timeout: Option<Duration>,
        mut on_token: F,
    ) -> Result<i32>
    where
        F: FnMut(&str) + Send,
    {
        const OP: &str = "gen_completion_async";
        let cprompt = make_cstring(OP, prompt)?;
        let start = unsafe { self.resolve::<GenCompletionAsyncFn>(symbols::GEN_COMPLETION_ASYNC)? };
        let generating = unsafe { self.resolve::<RuntimeStatusFn>(symbols::IS_GENERATING)? };

        let (done_tx, done_rx) = mpsc::channel::<c_int>();
        let on_token: &mut (dyn FnMut(&str) + Send) = &mut on_token;
        let stream = StreamState {
            on_token: Mutex::new(on_token),
            done: done_tx,
        };
        let user_data = &stream as *const StreamState<'_> as *mut c_void;

        let rc = unsafe {
            start(
                handle.as_ptr(),
                cprompt.as_ptr(),
                max_tokens as c_int,
                Some(token_trampoline),
                Some(completion_trampoline),
                user_data,
            )
        };
        // Refused to start: no callbacks will arrive.
        check_status(OP, rc)?;

        // `stream` must outlive every callback. The loop only ends once the
        // completion callback fired or the runtime reports it is idle.
        let deadline = timeout.map(|t| Instant::now() + t);
        let mut stopped = false;
        let mut idle_polls = 0u32;
        let status = loop {
            if let Ok(status) = done_rx.recv_timeout(STREAM_POLL) {
                break Some(status);
            }
            if unsafe { generating(handle.as_ptr()) } > 0 {
                idle_polls = 0;
            } else {
                idle_polls += 1;
            }
            if idle_polls >= STREAM_IDLE_POLLS {
                // A completion may have raced the idle check.
                break done_rx.try_recv().ok();
            }
            if !stopped && deadline.is_some_and(|d| Instant::now() >= d) {
                tracing::warn!(%handle, "stream deadline passed; stopping generation");
                if let Err(e) = self.stop_generation(handle) {
                    tracing::warn!(%handle, "stop_generation: {e}");
                }
                stopped = true;
            }
        };
        drop(stream);

        match (status, timeout) {
            (_, Some(after)) if stopped => Err(BindingError::TimedOut { op: OP, after }),
            (Some(status), _) => check_status(OP, status),
            (None, _) => {
                tracing::warn!(%handle, "runtime went idle without a completion callback");
                Err(BindingError::NoCompletion { op: OP })
            }
        }
    }

    pub fn get_response_buffer_content(&self, handle: RuntimeHandle) -> Result<Option<String>> {
        let f = unsafe {
            self.resolve::<RuntimeStringFn>(symbols::GET_RESPONSE_BUFFER_CONTENT)?
        };
        Ok(unsafe { borrowed_string(f(handle.as_ptr())) })
    }

    fn free_response_buffer(&self, buffer: *mut c_char) {
        match unsafe { self.resolve::<FreeResponseBufferFn>(symbols::FREE_RESPONSE_BUFFER) } {
            Ok(free) => unsafe { free(buffer) },
            // Leaks one response; nothing else to do without the symbol.
            Err(e) => tracing::warn!("cannot free response buffer: {e}"),
        }
    }
}

/// Shared by both trampolines, possibly from different native threads at once;
/// only ever reached through `&`.
struct StreamState<'a> {
    on_token: Mutex<&'a mut (dyn FnMut(&str) + Send)>,
    done: mpsc::Sender<c_int>,
}

unsafe extern "C" fn token_trampoline(token: *const c_char, user_data: *mut c_void) {
    if token.is_null() || user_data.is_null() {
        return;
    }
    let state = unsafe { &*(user_data as *const StreamState<'_>) };
    let text = unsafe { CStr::from_ptr(token) }.to_string_lossy();
    let mut guard = state
        .on_token
        .lock()
        .unwrap_or_else(|poisoned| poisoned.into_inner());
    let on_token: &mut (dyn FnMut(&str) + Send) = &mut **guard;
    // Panics must not unwind into native frames.
    if catch_unwind(AssertUnwindSafe(|| on_token(&text))).is_err() {
        tracing::error!("token callback panicked; token dropped");
    }
}

unsafe extern "C" fn completion_trampoline(status: c_int, user_data: *mut c_void) {
    if user_data.is_null() {
        return;
    }
    let state = unsafe { &*(user_data as *const StreamState<'_>) };
    let _ = state.done.send(status);
}
