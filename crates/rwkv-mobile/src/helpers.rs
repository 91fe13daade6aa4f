//! Convenience wrappers over the raw binding: backend names as text, the
//! device report, and the typed sampler record.

use std::fmt;

use rwkv_mobile_abi::{RuntimeHandle, SamplerParams};
use serde::Serialize;

use crate::binding::RwkvMobile;
use crate::errors::Result;

pub const DEFAULT_BACKEND_BUFFER_SIZE: usize = 1024;
pub const UNKNOWN: &str = "Unknown";

/// Decode the first `written` bytes of the enumeration buffer as UTF-8.
/// `written` is clamped to the buffer.
pub fn decode_backend_buffer(buffer: &[u8], written: usize) -> String {
    let n = written.min(buffer.len());
    String::from_utf8_lossy(&buffer[..n]).into_owned()
}

/// Split the comma-joined list, trimming and dropping empty segments.
pub fn backend_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

/// Five-line device summary. Absent fields render as `Unknown`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct DeviceInfo {
    pub platform: Option<String>,
    pub soc: Option<String>,
    pub soc_part: Option<String>,
    pub htp_arch: Option<String>,
    pub backends: Option<String>,
}

impl fmt::Display for DeviceInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let or_unknown = |v: &Option<String>| v.clone().unwrap_or_else(|| UNKNOWN.to_string());
        writeln!(f, "Platform: {}", or_unknown(&self.platform))?;
        writeln!(f, "SoC: {}", or_unknown(&self.soc))?;
        writeln!(f, "SoC Part: {}", or_unknown(&self.soc_part))?;
        writeln!(f, "HTP Arch: {}", or_unknown(&self.htp_arch))?;
        writeln!(f, "Available Backends: {}", or_unknown(&self.backends))
    }
}

/// Errors are logged and folded into `None`.
fn absent_on_error<T>(what: &str, r: Result<Option<T>>) -> Option<T> {
    r.unwrap_or_else(|e| {
        tracing::warn!("{what}: {e}");
        None
    })
}

impl RwkvMobile {
    /// Comma-joined backend names, or `None` on a negative result or any binding
    /// error (logged, not propagated).
    pub fn available_backend_names(&self, buffer_size: usize) -> Option<String> {
        let mut buffer = vec![0u8; buffer_size];
        match self.get_available_backend_names(&mut buffer) {
            Ok(n) => Some(decode_backend_buffer(&buffer, n)),
            Err(e) => {
                tracing::warn!("available_backend_names: {e}");
                None
            }
        }
    }

    pub fn device_info(&self) -> DeviceInfo {
        DeviceInfo {
            platform: absent_on_error("platform_name", self.platform_name()),
            soc: absent_on_error("soc_name", self.soc_name()),
            soc_part: absent_on_error("soc_partname", self.soc_partname()),
            htp_arch: absent_on_error("htp_arch", self.htp_arch()),
            backends: self.available_backend_names(DEFAULT_BACKEND_BUFFER_SIZE),
        }
    }

    /// Typed view of [`get_sampler_params`](Self::get_sampler_params); `None` when
    /// the runtime reports nothing usable.
    pub fn sampler_params(&self, handle: RuntimeHandle) -> Option<SamplerParams> {
        match self.get_sampler_params(handle) {
            Ok(values) => SamplerParams::from_array(&values),
            Err(e) => {
                tracing::warn!("sampler_params: {e}");
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::LoaderConfig;
    use std::path::PathBuf;

    #[test]
    fn decodes_exactly_the_written_prefix() {
        let mut buf = vec![0u8; 16];
        buf[..11].copy_from_slice(b"cpu,qnn,gpu");
        assert_eq!(decode_backend_buffer(&buf, 7), "cpu,qnn");
        assert_eq!(decode_backend_buffer(&buf, 0), "");
        assert_eq!(decode_backend_buffer(&buf, 999).len(), 16);
    }

    #[test]
    fn backend_list_has_no_empty_segments() {
        assert_eq!(backend_list(" cpu, qnn ,,gpu,"), vec!["cpu", "qnn", "gpu"]);
        assert!(backend_list("").is_empty());
        assert!(backend_list(" , ").is_empty());
    }

    #[test]
    fn device_report_has_five_lines_in_order() {
        let info = DeviceInfo {
            platform: Some("Android".into()),
            soc: Some("SM8650".into()),
            soc_part: None,
            htp_arch: Some("V75".into()),
            backends: None,
        };
        let text = info.to_string();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(
            lines,
            vec![
                "Platform: Android",
                "SoC: SM8650",
                "SoC Part: Unknown",
                "HTP Arch: V75",
                "Available Backends: Unknown",
            ]
        );
    }

    #[test]
    fn unloaded_helpers_fall_back_quietly() {
        let rwkv = RwkvMobile::load(&LoaderConfig {
            lib_dir: Some(PathBuf::from("/nonexistent/rwkv-mobile")),
            ..Default::default()
        });
        assert_eq!(rwkv.available_backend_names(DEFAULT_BACKEND_BUFFER_SIZE), None);
        assert_eq!(rwkv.sampler_params(RuntimeHandle(1)), None);

        let report = rwkv.device_info().to_string();
        assert_eq!(report.lines().count(), 5);
        assert!(report.lines().all(|l| l.ends_with(": Unknown")));
    }
}
