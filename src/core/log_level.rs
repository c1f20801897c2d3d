//! Log level definitions

use super::error::LoggerError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[derive(Default)]
pub enum LogLevel {
    Trace = 0,
    Debug = 1,
    #[default]
    Info = 2,
    Warn = 3,
    Error = 4,
    Fatal = 5,
}

/// Tokens that declare "no explicit level here" in configuration
const UNSET_TOKENS: [&str; 5] = ["", "UNSET", "NONE", "NIL", "NULL"];

impl LogLevel {
    pub const ALL: [LogLevel; 6] = [
        LogLevel::Trace,
        LogLevel::Debug,
        LogLevel::Info,
        LogLevel::Warn,
        LogLevel::Error,
        LogLevel::Fatal,
    ];

    pub fn to_str(&self) -> &'static str {
        match self {
            LogLevel::Trace => "TRACE",
            LogLevel::Debug => "DEBUG",
            LogLevel::Info => "INFO",
            LogLevel::Warn => "WARN",
            LogLevel::Error => "ERROR",
            LogLevel::Fatal => "FATAL",
        }
    }

    pub(crate) fn as_u8(self) -> u8 {
        self as u8
    }

    pub(crate) fn from_u8(value: u8) -> Self {
        match value {
            0 => LogLevel::Trace,
            1 => LogLevel::Debug,
            2 => LogLevel::Info,
            3 => LogLevel::Warn,
            4 => LogLevel::Error,
            _ => LogLevel::Fatal,
        }
    }

    /// Parse a configuration level token.
    ///
    /// Returns `Ok(None)` for the unset tokens (`""`, `unset`, `none`, `nil`,
    /// `null`), which make a logger fall back to inheritance.
    pub fn parse_setting(s: &str) -> Result<Option<Self>, LoggerError> {
        let token = s.trim().to_uppercase();
        if UNSET_TOKENS.contains(&token.as_str()) {
            return Ok(None);
        }
        token.parse().map(Some).map_err(|_| LoggerError::invalid_level(s))
    }

    #[cfg(feature = "console")]
    pub fn color_code(&self) -> colored::Color {
        use colored::Color::*;
        match self {
            LogLevel::Trace => BrightBlack,
            LogLevel::Debug => Blue,
            LogLevel::Info => Green,
            LogLevel::Warn => Yellow,
            LogLevel::Error => Red,
            LogLevel::Fatal => BrightRed,
        }
    }
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_str())
    }
}

impl FromStr for LogLevel {
    type Err = LoggerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_uppercase().as_str() {
            "TRACE" => Ok(LogLevel::Trace),
            "DEBUG" => Ok(LogLevel::Debug),
            "INFO" => Ok(LogLevel::Info),
            "WARN" | "WARNING" => Ok(LogLevel::Warn),
            "ERROR" => Ok(LogLevel::Error),
            "FATAL" => Ok(LogLevel::Fatal),
            _ => Err(LoggerError::invalid_level(s)),
        }
    }
}

/// Where a node stands in the propagate/commit cycle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ResolutionPhase {
    /// Created, never propagated
    Unresolved,
    /// Candidate state computed, not yet visible to readers
    Pending,
    /// Candidate state copied into the live fields
    Committed,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_level_names() {
        assert_eq!("info".parse::<LogLevel>().unwrap(), LogLevel::Info);
        assert_eq!("Warning".parse::<LogLevel>().unwrap(), LogLevel::Warn);
        assert_eq!(" FATAL ".parse::<LogLevel>().unwrap(), LogLevel::Fatal);
        assert!(matches!(
            "verbose".parse::<LogLevel>(),
            Err(LoggerError::InvalidLevel { .. })
        ));
    }

    #[test]
    fn test_parse_setting_unset_tokens() {
        for token in ["", "unset", "None", "nil", "NULL", "  "] {
            assert_eq!(LogLevel::parse_setting(token).unwrap(), None, "{token:?}");
        }
        assert_eq!(
            LogLevel::parse_setting("debug").unwrap(),
            Some(LogLevel::Debug)
        );
        assert!(LogLevel::parse_setting("loud").is_err());
    }

    #[test]
    fn test_u8_conversion() {
        for level in LogLevel::ALL {
            assert_eq!(LogLevel::from_u8(level.as_u8()), level);
        }
    }
}
