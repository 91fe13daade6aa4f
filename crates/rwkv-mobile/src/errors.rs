use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;

/// Outcome of a binding call that did not produce a value.
///
/// `NotLoaded` and `SymbolNotFound` mean no foreign code ran (packaging or build
/// mismatch). `NativeFailure` means the runtime ran and answered with its failure
/// sentinel; `code` is that value, unchanged (`0` for a null pointer result).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BindingError {
    #[error("native library not loaded: {reason}")]
    NotLoaded { reason: String },

    #[error("missing symbol {symbol}: {reason}")]
    SymbolNotFound { symbol: &'static str, reason: String },

    #[error("{op} failed with native code {code}")]
    NativeFailure { op: &'static str, code: i64 },

    #[error("invalid argument for {op}: {reason}")]
    InvalidArgument { op: &'static str, reason: String },

    /// The runtime accepted a streaming request, then went idle without ever
    /// reporting completion.
    #[error("{op} stopped without a completion callback")]
    NoCompletion { op: &'static str },

    /// The caller's deadline passed; generation was stopped before returning.
    #[error("{op} did not complete within {after:?}")]
    TimedOut { op: &'static str, after: Duration },
}

impl BindingError {
    /// True when the call never reached native code because the library or
    /// the symbol was unavailable.
    pub fn is_symbol_error(&self) -> bool {
        matches!(
            self,
            BindingError::NotLoaded { .. } | BindingError::SymbolNotFound { .. }
        )
    }

    pub fn native_code(&self) -> Option<i64> {
        match self {
            BindingError::NativeFailure { code, .. } => Some(*code),
            _ => None,
        }
    }
}

pub type Result<T> = std::result::Result<T, BindingError>;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("I/O error reading {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed config {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn symbol_errors_are_distinguished_from_native_failures() {
        let missing = BindingError::SymbolNotFound {
            symbol: "rwkvmobile_runtime_init",
            reason: "undefined symbol".into(),
        };
        let not_loaded = BindingError::NotLoaded {
            reason: "librwkv_mobile.so: cannot open shared object file".into(),
        };
        let failed = BindingError::NativeFailure {
            op: "load_model",
            code: -3,
        };

        assert!(missing.is_symbol_error());
        assert!(not_loaded.is_symbol_error());
        assert!(!failed.is_symbol_error());
        assert_eq!(failed.native_code(), Some(-3));
        assert_eq!(missing.native_code(), None);
    }

    #[test]
    fn messages_name_the_symbol_and_code() {
        let e = BindingError::SymbolNotFound {
            symbol: "rwkvmobile_get_soc_name",
            reason: "nope".into(),
        };
        assert_eq!(e.to_string(), "missing symbol rwkvmobile_get_soc_name: nope");

        let e = BindingError::NativeFailure {
            op: "runtime_release",
            code: -1,
        };
        assert_eq!(e.to_string(), "runtime_release failed with native code -1");

        let e = BindingError::TimedOut {
            op: "gen_completion_async",
            after: Duration::from_millis(250),
        };
        assert_eq!(e.to_string(), "gen_completion_async did not complete within 250ms");
        assert!(!e.is_symbol_error());
        assert_eq!(e.native_code(), None);
    }
}
