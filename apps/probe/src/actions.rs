use std::io::{self, Write};
use std::path::PathBuf;
use std::sync::{Arc, mpsc};

use rwkv_mobile::helpers::decode_backend_buffer;
use rwkv_mobile::{
    BindingError, CallWorker, DEFAULT_BACKEND_BUFFER_SIZE, LoaderConfig, LogLevel, ModelId,
    RuntimeHandle, RwkvMobile, SamplerParams, UNKNOWN, WorkerError, backend_list,
};
use thiserror::Error;

use crate::transcript::Transcript;

#[derive(Debug, Error)]
pub enum CallError {
    #[error(transparent)]
    Binding(#[from] BindingError),

    #[error(transparent)]
    Worker(#[from] WorkerError),
}

#[derive(Debug, Clone, Default)]
pub struct GenerateOptions {
    pub model: PathBuf,
    pub backend: String,
    pub extra: Option<String>,
    pub prompt: String,
    pub max_tokens: i32,
    pub stream: bool,
    pub temperature: Option<f32>,
    pub top_p: Option<f32>,
    pub top_k: Option<i32>,
    pub seed: Option<u64>,
    pub system_prompt: Option<String>,
    pub user_role: Option<String>,
    pub response_role: Option<String>,
    pub initial_state: Option<PathBuf>,
}

/// Drives the binding the way a host app would: every native call goes through one
/// worker thread, results are appended to the transcript on the calling thread.
pub struct Probe {
    rwkv: Arc<RwkvMobile>,
    config: LoaderConfig,
    worker: CallWorker,
    log: Transcript,
    json: bool,
}

impl Probe {
    pub fn new(rwkv: Arc<RwkvMobile>, config: LoaderConfig) -> io::Result<Self> {
        let worker = CallWorker::spawn("rwkv-probe-worker")?;
        Ok(Self {
            rwkv,
            config,
            worker,
            log: Transcript::new(),
            json: false,
        })
    }

    /// Also print structured reports as JSON.
    pub fn with_json(mut self, json: bool) -> Self {
        self.json = json;
        self
    }

    #[cfg(test)]
    pub fn transcript(&self) -> &Transcript {
        &self.log
    }

    pub fn flush_to<W: Write>(&mut self, out: &mut W) -> io::Result<()> {
        self.log.flush_to(out)
    }

    fn call<T, F>(&self, f: F) -> Result<T, CallError>
    where
        T: Send + 'static,
        F: FnOnce(&RwkvMobile) -> rwkv_mobile::Result<T> + Send + 'static,
    {
        let rwkv = Arc::clone(&self.rwkv);
        Ok(self.worker.run(move || f(&rwkv))??)
    }

    fn report(&mut self, err: &CallError) {
        match err {
            CallError::Binding(e) if e.is_symbol_error() => {
                self.log.fail(format!("Symbol error: {e}"));
                self.log
                    .detail("Note: Function may not be exported or has different signature");
            }
            CallError::Binding(e) => self.log.fail(format!("Native failure: {e}")),
            CallError::Worker(e) => self.log.fail(format!("Worker error: {e}")),
        }
    }

    fn ensure_loaded(&mut self) -> bool {
        if self.rwkv.is_loaded() {
            return true;
        }
        self.log.fail("Library not loaded!");
        self.log.blank();
        false
    }

    pub fn header(&mut self) {
        self.log.line("=== RWKV Mobile Probe ===");
        self.log.line("Testing librwkv_mobile native calls");
        self.log.blank();
        match self.rwkv.load_error() {
            None => self.log.ok("Library pre-loaded successfully"),
            Some(err) => self.log.fail(format!("Library not loaded: {err}")),
        }
        self.log.blank();
    }

    /// Post-load setup from config and flags. Failures are logged, not fatal.
    pub fn prepare(&mut self, native_log_level: Option<LogLevel>) {
        if !self.rwkv.is_loaded() {
            return;
        }
        if let Some(level) = native_log_level {
            if let Err(e) = self.call(move |r| r.set_log_level(level)) {
                tracing::warn!(%level, "set_log_level: {e}");
            }
        }
        if let Some(dir) = self.config.cache_dir.clone() {
            let shown = dir.display().to_string();
            match self.call(move |r| r.set_cache_dir(&dir)) {
                Ok(()) => tracing::info!(cache_dir = %shown, "runtime cache dir set"),
                Err(e) => tracing::warn!(cache_dir = %shown, "set_cache_dir: {e}"),
            }
        }
    }

    pub fn library(&mut self) {
        self.log.section("Testing Library Loading");
        match self.rwkv.load_error() {
            None => self.log.ok("Library is loaded!"),
            Some(err) => {
                let err = err.to_string();
                self.log.fail("Library not loaded!");
                self.log.detail(format!("Error: {err}"));
            }
        }
        if self.json {
            match serde_json::to_string_pretty(self.rwkv.load_state()) {
                Ok(js) => self.log.line(js),
                Err(e) => self.log.fail(format!("JSON error: {e}")),
            }
        }
        self.log.blank();
    }

    pub fn backends(&mut self) {
        self.log.section("Testing Get Available Backends");
        if !self.ensure_loaded() {
            return;
        }
        let listed = self.call(|r| {
            let mut buffer = vec![0u8; DEFAULT_BACKEND_BUFFER_SIZE];
            let written = r.get_available_backend_names(&mut buffer)?;
            Ok(decode_backend_buffer(&buffer, written))
        });
        match listed {
            Ok(raw) => {
                let names = backend_list(&raw);
                if names.is_empty() {
                    self.log.detail("No backends returned (empty or null)");
                } else {
                    self.log.ok("Available backends:");
                    for name in names {
                        self.log.detail(format!("- {name}"));
                    }
                }
            }
            Err(e) => self.report(&e),
        }
        self.log.blank();
    }

    pub fn runtime(&mut self) {
        self.log.section("Testing Runtime Init/Release");
        if !self.ensure_loaded() {
            return;
        }
        tracing::info!("calling runtime_init");
        match self.call(|r| r.runtime_init()) {
            Ok(handle) => {
                self.log.ok("Runtime initialized!");
                self.log.detail(format!("Handle: {handle}"));
                tracing::info!(%handle, "calling runtime_release");
                match self.call(move |r| r.runtime_release(handle)) {
                    Ok(()) => self.log.ok("Runtime released successfully!"),
                    Err(CallError::Binding(BindingError::NativeFailure { code, .. })) => {
                        self.log.fail(format!("Runtime release returned: {code}"))
                    }
                    Err(e) => self.report(&e),
                }
            }
            Err(CallError::Binding(BindingError::NativeFailure { code: 0, .. })) => {
                self.log.fail("Runtime init returned null handle")
            }
            Err(e) => self.report(&e),
        }
        self.log.blank();
    }

    pub fn platform(&mut self) {
        self.log.section("Testing Platform Info");
        if !self.ensure_loaded() {
            return;
        }
        let rwkv = Arc::clone(&self.rwkv);
        let answers = self.worker.run(move || {
            [
                rwkv.platform_name(),
                rwkv.soc_name(),
                rwkv.soc_partname(),
                rwkv.htp_arch(),
            ]
        });
        match answers {
            Ok([platform, soc, part, arch]) => {
                self.log.ok("Platform Info:");
                self.log.detail(format!("Platform: {}", inline(platform)));
                self.log.detail(format!("SoC Name: {}", inline(soc)));
                self.log.detail(format!("SoC Part: {}", inline(part)));
                self.log.detail(format!("HTP Arch: {}", inline(arch)));
            }
            Err(e) => self.report(&e.into()),
        }
        self.log.blank();
    }

    pub fn device_info(&mut self) {
        self.log.section("Device Info");
        if !self.ensure_loaded() {
            return;
        }
        let rwkv = Arc::clone(&self.rwkv);
        match self.worker.run(move || rwkv.device_info()) {
            Ok(info) => {
                for l in info.to_string().lines() {
                    self.log.detail(l);
                }
                if self.json {
                    match serde_json::to_string_pretty(&info) {
                        Ok(js) => self.log.line(js),
                        Err(e) => self.log.fail(format!("JSON error: {e}")),
                    }
                }
            }
            Err(e) => self.report(&e.into()),
        }
        self.log.blank();
    }

    pub fn dump_native_log(&mut self) {
        self.log.section("Native Log");
        if !self.ensure_loaded() {
            return;
        }
        match self.call(|r| r.dump_log()) {
            Ok(Some(text)) => {
                for l in text.lines() {
                    self.log.detail(l);
                }
            }
            Ok(None) => self.log.detail("(empty)"),
            Err(e) => self.report(&e),
        }
        self.log.blank();
    }

    /// Library, backends, runtime and platform, in that order.
    pub fn all(&mut self) {
        self.library();
        self.backends();
        self.runtime();
        self.platform();
    }

    /// Init, configure, load, generate, report speeds, release.
    pub fn generate(&mut self, opts: &GenerateOptions) {
        self.log.section("Testing Generation");
        if !self.ensure_loaded() {
            return;
        }
        let handle = match self.call(|r| r.runtime_init()) {
            Ok(h) => {
                self.log.ok(format!("Runtime initialized: {h}"));
                h
            }
            Err(e) => {
                self.report(&e);
                self.log.blank();
                return;
            }
        };

        self.apply_library_paths(handle);
        self.configure(handle, opts);
        match self.load_model(handle, opts) {
            Ok(model) => {
                self.with_initial_state(handle, opts);
                self.report_stats(handle);
                match self.call(move |r| r.release_model(handle, model)) {
                    Ok(()) => self.log.ok(format!("Model {model} released")),
                    Err(e) => self.report(&e),
                }
            }
            Err(e) => self.report(&e),
        }

        match self.call(move |r| r.runtime_release(handle)) {
            Ok(()) => self.log.ok("Runtime released"),
            Err(e) => self.report(&e),
        }
        self.log.blank();
    }

    fn apply_library_paths(&mut self, handle: RuntimeHandle) {
        if let Some(path) = self.config.qnn_library_path.clone() {
            let shown = path.display().to_string();
            match self.call(move |r| r.set_qnn_library_path(handle, &path)) {
                Ok(()) => self.log.ok(format!("QNN library path: {shown}")),
                Err(e) => self.report(&e),
            }
        }
        for path in self.config.adsp_library_paths.clone() {
            let shown = path.display().to_string();
            match self.call(move |r| r.add_adsp_library_path(handle, &path)) {
                Ok(()) => self.log.ok(format!("ADSP library path: {shown}")),
                Err(e) => self.report(&e),
            }
        }
    }

    /// Each step reports on its own; a failure does not skip the rest.
    fn configure(&mut self, handle: RuntimeHandle, opts: &GenerateOptions) {
        if opts.temperature.is_some() || opts.top_p.is_some() || opts.top_k.is_some() {
            self.configure_sampler(handle, opts);
        }
        if let Some(seed) = opts.seed {
            match self.call(move |r| r.set_seed(handle, seed)) {
                Ok(()) => self.log.ok(format!("Seed: {seed}")),
                Err(e) => self.report(&e),
            }
        }
        if let Some(role) = opts.user_role.clone() {
            match self.call(move |r| r.set_user_role(handle, &role)) {
                Ok(()) => self.log.ok("User role set"),
                Err(e) => self.report(&e),
            }
        }
        if let Some(role) = opts.response_role.clone() {
            match self.call(move |r| r.set_response_role(handle, &role)) {
                Ok(()) => self.log.ok("Response role set"),
                Err(e) => self.report(&e),
            }
        }
        if let Some(system) = opts.system_prompt.clone() {
            let echoed = self.call(move |r| {
                r.set_prompt(handle, &system)?;
                r.get_prompt(handle)
            });
            match echoed {
                Ok(echoed) => self.log.ok(format!(
                    "System prompt: {}",
                    echoed.as_deref().unwrap_or(UNKNOWN)
                )),
                Err(e) => self.report(&e),
            }
        }
    }

    fn configure_sampler(&mut self, handle: RuntimeHandle, opts: &GenerateOptions) {
        let current = match self.call(move |r| Ok(r.sampler_params(handle))) {
            Ok(current) => current,
            Err(e) => {
                self.report(&e);
                return;
            }
        };
        let Some(params) = merge_sampler(current, opts.temperature, opts.top_p, opts.top_k) else {
            self.log
                .fail("Sampler params unavailable; pass all of --temperature --top-p --top-k");
            return;
        };
        match self.call(move |r| r.set_sampler_params(handle, params)) {
            Ok(()) => self.log.ok(format!(
                "Sampler: temperature {} top_p {} top_k {}",
                params.temperature, params.top_p, params.top_k
            )),
            Err(e) => self.report(&e),
        }
    }

    fn load_model(&mut self, handle: RuntimeHandle, opts: &GenerateOptions) -> Result<ModelId, CallError> {
        let model = opts.model.clone();
        let backend = opts.backend.clone();
        let extra = opts.extra.clone();
        let id = self.call(move |r| match extra.as_deref() {
            Some(_) => r.load_model_with_extra(handle, &model, &backend, extra.as_deref()),
            None => r.load_model(handle, &model, &backend),
        })?;
        self.log.ok(format!(
            "Model loaded: {} on {} (id {id})",
            opts.model.display(),
            opts.backend
        ));
        Ok(id)
    }

    /// Runs the completion, wrapped in load/unload of the initial state when one is given.
    fn with_initial_state(&mut self, handle: RuntimeHandle, opts: &GenerateOptions) {
        let Some(state) = opts.initial_state.clone() else {
            if let Err(e) = self.complete(handle, opts) {
                self.report(&e);
            }
            return;
        };
        let shown = state.display().to_string();
        match self.call(move |r| r.load_initial_state(handle, &state)) {
            Ok(()) => self.log.ok(format!("Initial state loaded: {shown}")),
            Err(e) => {
                self.report(&e);
                return;
            }
        }
        if let Err(e) = self.complete(handle, opts) {
            self.report(&e);
        }
        if let Err(e) = self.call(move |r| {
            r.unload_initial_state(handle)?;
            r.clear_state(handle)
        }) {
            self.report(&e);
        }
    }

    /// Post-run readbacks; each line stands on its own.
    fn report_stats(&mut self, handle: RuntimeHandle) {
        let rwkv = Arc::clone(&self.rwkv);
        let stats = self.worker.run(move || {
            (
                rwkv.is_generating(handle),
                rwkv.prefill_progress(handle),
                rwkv.get_penalty_params(handle),
                rwkv.get_seed(handle),
            )
        });
        match stats {
            Ok((generating, progress, penalty, seed)) => {
                match generating {
                    Ok(g) => self.log.detail(format!("Generating: {g}")),
                    Err(e) => self.report(&e.into()),
                }
                match progress {
                    Ok(p) => self.log.detail(format!("Prefill progress: {p:.2}")),
                    Err(e) => self.report(&e.into()),
                }
                match penalty {
                    Ok(p) => self.log.detail(format!(
                        "Penalties: presence {} frequency {} decay {}",
                        p.presence_penalty, p.frequency_penalty, p.penalty_decay
                    )),
                    Err(e) => self.report(&e.into()),
                }
                match seed {
                    Ok(s) => self.log.detail(format!("Seed: {s}")),
                    Err(e) => self.report(&e.into()),
                }
            }
            Err(e) => self.report(&e.into()),
        }
    }

    fn complete(&mut self, handle: RuntimeHandle, opts: &GenerateOptions) -> Result<(), CallError> {
        let text = if opts.stream {
            self.stream_completion(handle, opts)?
        } else {
            let prompt = opts.prompt.clone();
            let max_tokens = opts.max_tokens;
            self.call(move |r| r.gen_completion(handle, &prompt, max_tokens))?
        };
        self.log.ok("Response:");
        for l in text.lines() {
            self.log.detail(l);
        }

        let (prefill, decode) =
            self.call(move |r| Ok((r.avg_prefill_speed(handle)?, r.avg_decode_speed(handle)?)))?;
        self.log
            .detail(format!("Prefill: {prefill:.2} tok/s, Decode: {decode:.2} tok/s"));
        Ok(())
    }

    /// Tokens arrive on the runtime's thread and are forwarded here over a channel.
    fn stream_completion(&mut self, handle: RuntimeHandle, opts: &GenerateOptions) -> Result<String, CallError> {
        let (token_tx, token_rx) = mpsc::channel::<String>();
        let rwkv = Arc::clone(&self.rwkv);
        let prompt = opts.prompt.clone();
        let max_tokens = opts.max_tokens;
        let pending = self.worker.submit(move || {
            rwkv.gen_completion_stream(handle, &prompt, max_tokens, move |token| {
                let _ = token_tx.send(token.to_string());
            })
        });

        let mut text = String::new();
        let mut count = 0usize;
        for token in token_rx {
            tracing::trace!(%token, "token");
            text.push_str(&token);
            count += 1;
        }
        let status = pending.wait()??;
        self.log
            .ok(format!("Streamed {count} tokens (status {status})"));
        Ok(text)
    }
}

fn inline(answer: rwkv_mobile::Result<Option<String>>) -> String {
    match answer {
        Ok(Some(s)) => s,
        Ok(None) => UNKNOWN.to_string(),
        Err(e) => format!("Error: {e}"),
    }
}

/// Fill unset knobs from what the runtime reports. `None` when something is
/// unset and the runtime reported nothing.
pub fn merge_sampler(
    current: Option<SamplerParams>,
    temperature: Option<f32>,
    top_p: Option<f32>,
    top_k: Option<i32>,
) -> Option<SamplerParams> {
    if let (Some(temperature), Some(top_p), Some(top_k)) = (temperature, top_p, top_k) {
        return Some(SamplerParams {
            temperature,
            top_p,
            top_k,
        });
    }
    let base = current?;
    Some(SamplerParams {
        temperature: temperature.unwrap_or(base.temperature),
        top_p: top_p.unwrap_or(base.top_p),
        top_k: top_k.unwrap_or(base.top_k),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn unloaded_probe() -> Probe {
        let cfg = LoaderConfig {
            lib_dir: Some(PathBuf::from("/nonexistent/rwkv-mobile")),
            ..Default::default()
        };
        let rwkv = Arc::new(RwkvMobile::load(&cfg));
        Probe::new(rwkv, cfg).unwrap()
    }

    #[test]
    fn every_dependent_action_short_circuits() {
        let mut probe = unloaded_probe();
        probe.backends();
        probe.runtime();
        probe.platform();
        probe.device_info();
        probe.dump_native_log();
        probe.generate(&GenerateOptions::default());

        let lines = probe.transcript().lines();
        let sections: Vec<usize> = lines
            .iter()
            .enumerate()
            .filter(|(_, l)| l.starts_with("--- "))
            .map(|(i, _)| i)
            .collect();
        assert_eq!(sections.len(), 6);
        for i in sections {
            assert_eq!(lines[i + 1], "✗ Library not loaded!");
            assert_eq!(lines[i + 2], "");
        }
    }

    #[test]
    fn library_action_reports_the_load_error() {
        let mut probe = unloaded_probe();
        probe.header();
        probe.library();

        let lines = probe.transcript().lines();
        assert!(lines.iter().any(|l| l.starts_with("✗ Library not loaded: ")));
        let at = lines
            .iter()
            .position(|l| l == "--- Testing Library Loading ---")
            .unwrap();
        assert_eq!(lines[at + 1], "✗ Library not loaded!");
        assert!(lines[at + 2].starts_with("  Error: "));
    }

    #[test]
    fn all_runs_the_four_sections_in_order() {
        let mut probe = unloaded_probe();
        probe.all();
        let sections: Vec<&str> = probe
            .transcript()
            .lines()
            .iter()
            .filter(|l| l.starts_with("--- "))
            .map(String::as_str)
            .collect();
        assert_eq!(
            sections,
            [
                "--- Testing Library Loading ---",
                "--- Testing Get Available Backends ---",
                "--- Testing Runtime Init/Release ---",
                "--- Testing Platform Info ---",
            ]
        );
    }

    #[test]
    fn sampler_merge_prefers_flags_then_runtime() {
        let current = SamplerParams {
            temperature: 1.0,
            top_p: 0.85,
            top_k: 128,
        };
        let merged = merge_sampler(Some(current), Some(0.7), None, None).unwrap();
        assert_eq!(
            merged,
            SamplerParams {
                temperature: 0.7,
                top_p: 0.85,
                top_k: 128
            }
        );

        assert_eq!(merge_sampler(None, Some(0.7), None, Some(3)), None);
        assert_eq!(
            merge_sampler(None, Some(0.7), Some(0.5), Some(3)),
            Some(SamplerParams {
                temperature: 0.7,
                top_p: 0.5,
                top_k: 3
            })
        );
    }

    #[cfg(target_os = "linux")]
    #[test]
    fn missing_exports_render_as_symbol_errors() {
        let cfg = LoaderConfig {
            runtime_lib: "libc.so.6".into(),
            bridge_lib: None,
            ..Default::default()
        };
        let rwkv = Arc::new(RwkvMobile::load(&cfg));
        assert!(rwkv.is_loaded());
        let mut probe = Probe::new(rwkv, cfg).unwrap();
        probe.runtime();
        probe.platform();

        let lines = probe.transcript().lines();
        assert!(lines[1].starts_with("✗ Symbol error: missing symbol rwkvmobile_runtime_init"));
        assert!(lines.iter().any(|l| l == "✓ Platform Info:"));
        assert!(lines.iter().any(|l| l.starts_with("  Platform: Error: ")));
    }

    #[cfg(target_os = "linux")]
    #[test]
    fn configure_reports_every_failing_step() {
        let cfg = LoaderConfig {
            runtime_lib: "libc.so.6".into(),
            bridge_lib: None,
            ..Default::default()
        };
        let rwkv = Arc::new(RwkvMobile::load(&cfg));
        let mut probe = Probe::new(rwkv, cfg).unwrap();
        let opts = GenerateOptions {
            temperature: Some(0.5),
            seed: Some(7),
            user_role: Some("User".into()),
            response_role: Some("Assistant".into()),
            system_prompt: Some("Be brief.".into()),
            ..Default::default()
        };
        // No native code runs: every symbol is missing.
        probe.configure(RuntimeHandle(0x1000), &opts);

        let lines = probe.transcript().lines();
        assert!(lines.iter().any(|l| l.starts_with("✗ Sampler params unavailable")));
        let missing: Vec<&str> = lines
            .iter()
            .filter_map(|l| l.strip_prefix("✗ Symbol error: missing symbol "))
            .collect();
        for symbol in [
            "rwkvmobile_runtime_set_seed",
            "rwkvmobile_runtime_set_user_role",
            "rwkvmobile_runtime_set_response_role",
            "rwkvmobile_runtime_set_prompt",
        ] {
            assert!(
                missing.iter().any(|m| m.starts_with(symbol)),
                "no failure line for {symbol}: {lines:?}"
            );
        }
    }
}
