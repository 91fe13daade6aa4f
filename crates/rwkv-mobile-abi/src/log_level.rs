use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Native log levels accepted by `rwkvmobile_set_loglevel`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
#[repr(i32)]
pub enum LogLevel {
    Debug = 0,
    Info = 1,
    Warn = 2,
    Error = 3,
}

impl LogLevel {
    pub const LOG_LEVEL_DEBUG: i32 = 0;
    pub const LOG_LEVEL_INFO: i32 = 1;
    pub const LOG_LEVEL_WARN: i32 = 2;
    pub const LOG_LEVEL_ERROR: i32 = 3;

    #[inline]
    pub fn as_raw(self) -> i32 {
        self as i32
    }
}

impl TryFrom<i32> for LogLevel {
    type Error = String;

    fn try_from(value: i32) -> Result<Self, String> {
        match value {
            Self::LOG_LEVEL_DEBUG => Ok(LogLevel::Debug),
            Self::LOG_LEVEL_INFO => Ok(LogLevel::Info),
            Self::LOG_LEVEL_WARN => Ok(LogLevel::Warn),
            Self::LOG_LEVEL_ERROR => Ok(LogLevel::Error),
            other => Err(format!("unknown log level {other} (expected 0..=3)")),
        }
    }
}

impl FromStr for LogLevel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, String> {
        match s.trim().to_ascii_lowercase().as_str() {
            "debug" | "0" => Ok(LogLevel::Debug),
            "info" | "1" => Ok(LogLevel::Info),
            "warn" | "warning" | "2" => Ok(LogLevel::Warn),
            "error" | "3" => Ok(LogLevel::Error),
            other => Err(format!("unknown log level '{other}'")),
        }
    }
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            LogLevel::Debug => "debug",
            LogLevel::Info => "info",
            LogLevel::Warn => "warn",
            LogLevel::Error => "error",
        };
        f.write_str(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn raw_values_match_native_constants() {
        assert_eq!(LogLevel::Debug.as_raw(), 0);
        assert_eq!(LogLevel::Info.as_raw(), 1);
        assert_eq!(LogLevel::Warn.as_raw(), 2);
        assert_eq!(LogLevel::Error.as_raw(), 3);
    }

    #[test]
    fn parses_names_and_digits() {
        assert_eq!("WARN".parse::<LogLevel>().unwrap(), LogLevel::Warn);
        assert_eq!("3".parse::<LogLevel>().unwrap(), LogLevel::Error);
        assert!("verbose".parse::<LogLevel>().is_err());
        assert!(LogLevel::try_from(4).is_err());
        assert_eq!(LogLevel::try_from(0).unwrap(), LogLevel::Debug);
    }
}
