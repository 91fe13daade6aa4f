//! `rwkv-probe`: loads `librwkv_mobile` through the binding and exercises it,
//! printing a ✓/✗ transcript to stdout. Diagnostics go to stderr (`RUST_LOG`).

mod actions;
mod logging;
mod transcript;

use std::io;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use rwkv_mobile::{LoaderConfig, LogLevel, RwkvMobile};

use actions::{GenerateOptions, Probe};

#[derive(Parser)]
#[command(name = "rwkv-probe")]
#[command(about = "Probe a librwkv_mobile build through its C ABI", long_about = None)]
struct Cli {
    /// Directory holding the runtime and bridge libraries
    #[arg(long, global = true, env = "RWKV_MOBILE_LIB_DIR")]
    lib_dir: Option<PathBuf>,

    /// Runtime library name, file name, or path
    #[arg(long, global = true)]
    runtime_lib: Option<String>,

    /// Bridge library name, file name, or path
    #[arg(long, global = true, conflicts_with = "no_bridge")]
    bridge_lib: Option<String>,

    /// Load only the runtime library
    #[arg(long, global = true)]
    no_bridge: bool,

    /// Runtime cache directory, applied right after loading
    #[arg(long, global = true)]
    cache_dir: Option<PathBuf>,

    /// Native log level (debug, info, warn, error or 0-3)
    #[arg(long, global = true)]
    native_log_level: Option<LogLevel>,

    /// Append the runtime's own log buffer to the transcript
    #[arg(long, global = true)]
    dump_log: bool,

    /// Also print load state and device info as JSON
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Report whether the libraries loaded
    Library,
    /// List available inference backends
    Backends,
    /// Create and release a runtime
    Runtime,
    /// Query platform, SoC and HTP details
    Platform,
    /// Print the five-line device report
    DeviceInfo,
    /// Load a model and run one completion
    Generate(GenerateArgs),
    /// Library, backends, runtime and platform in order (default)
    All,
}

#[derive(Args)]
struct GenerateArgs {
    /// Model file
    #[arg(long)]
    model: PathBuf,

    /// Backend name as listed by `backends`
    #[arg(long, default_value = "cpu")]
    backend: String,

    /// Backend-specific load parameter
    #[arg(long)]
    extra: Option<String>,

    #[arg(long, default_value = "The Eiffel Tower is located in")]
    prompt: String,

    #[arg(long, default_value_t = 64)]
    max_tokens: i32,

    /// Use the callback-based generation entry point
    #[arg(long)]
    stream: bool,

    #[arg(long)]
    temperature: Option<f32>,

    #[arg(long)]
    top_p: Option<f32>,

    #[arg(long)]
    top_k: Option<i32>,

    #[arg(long)]
    seed: Option<u64>,

    /// Set as the runtime prompt before generating
    #[arg(long)]
    system_prompt: Option<String>,

    #[arg(long)]
    user_role: Option<String>,

    #[arg(long)]
    response_role: Option<String>,

    /// State file loaded before and unloaded after the completion
    #[arg(long)]
    initial_state: Option<PathBuf>,
}

impl From<GenerateArgs> for GenerateOptions {
    fn from(a: GenerateArgs) -> Self {
        Self {
            model: a.model,
            backend: a.backend,
            extra: a.extra,
            prompt: a.prompt,
            max_tokens: a.max_tokens,
            stream: a.stream,
            temperature: a.temperature,
            top_p: a.top_p,
            top_k: a.top_k,
            seed: a.seed,
            system_prompt: a.system_prompt,
            user_role: a.user_role,
            response_role: a.response_role,
            initial_state: a.initial_state,
        }
    }
}

impl Cli {
    fn apply_to(&self, cfg: &mut LoaderConfig) {
        if let Some(dir) = &self.lib_dir {
            cfg.lib_dir = Some(dir.clone());
        }
        if let Some(name) = &self.runtime_lib {
            cfg.runtime_lib = name.clone();
        }
        if self.no_bridge {
            cfg.bridge_lib = None;
        } else if let Some(name) = &self.bridge_lib {
            cfg.bridge_lib = Some(name.clone());
        }
        if let Some(dir) = &self.cache_dir {
            cfg.cache_dir = Some(dir.clone());
        }
    }
}

fn main() -> Result<()> {
    logging::init("info");
    let cli = Cli::parse();

    let mut cfg = LoaderConfig::resolve().context("reading loader config")?;
    cli.apply_to(&mut cfg);
    tracing::debug!(?cfg, "loader config");

    let rwkv = Arc::new(RwkvMobile::load(&cfg));
    let mut probe = Probe::new(rwkv, cfg)
        .context("spawning call worker")?
        .with_json(cli.json);

    probe.header();
    probe.prepare(cli.native_log_level);

    match cli.command.unwrap_or(Command::All) {
        Command::Library => probe.library(),
        Command::Backends => probe.backends(),
        Command::Runtime => probe.runtime(),
        Command::Platform => probe.platform(),
        Command::DeviceInfo => probe.device_info(),
        Command::Generate(args) => probe.generate(&args.into()),
        Command::All => probe.all(),
    }
    if cli.dump_log {
        probe.dump_native_log();
    }

    probe
        .flush_to(&mut io::stdout().lock())
        .context("writing transcript")?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cli_definition_is_consistent() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }

    #[test]
    fn flags_override_resolved_config() {
        let cli = Cli::parse_from([
            "rwkv-probe",
            "--lib-dir",
            "/opt/rwkv",
            "--runtime-lib",
            "librwkv_mobile.so",
            "--no-bridge",
            "--native-log-level",
            "warn",
            "backends",
        ]);
        let mut cfg = LoaderConfig::default();
        cli.apply_to(&mut cfg);

        assert_eq!(cfg.lib_dir, Some(PathBuf::from("/opt/rwkv")));
        assert_eq!(cfg.runtime_path(), PathBuf::from("/opt/rwkv/librwkv_mobile.so"));
        assert_eq!(cfg.bridge_lib, None);
        assert_eq!(cli.native_log_level, Some(LogLevel::Warn));
        assert!(matches!(cli.command, Some(Command::Backends)));
    }

    #[test]
    fn generate_args_carry_through() {
        let cli = Cli::parse_from([
            "rwkv-probe",
            "generate",
            "--model",
            "/m/rwkv7.bin",
            "--backend",
            "qnn",
            "--top-k",
            "20",
            "--stream",
        ]);
        let Some(Command::Generate(args)) = cli.command else {
            panic!("expected generate");
        };
        let opts: GenerateOptions = args.into();
        assert_eq!(opts.backend, "qnn");
        assert_eq!(opts.max_tokens, 64);
        assert_eq!(opts.top_k, Some(20));
        assert!(opts.stream);
        assert_eq!(opts.temperature, None);
    }
}
