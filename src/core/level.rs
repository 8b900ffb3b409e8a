//! Log level definitions and the pre-rendered severity color table

use colored::Colorize;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
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

/// All levels in ascending severity order, used to pre-render the color table.
pub const ALL_LEVELS: [LogLevel; 6] = [
    LogLevel::Trace,
    LogLevel::Debug,
    LogLevel::Info,
    LogLevel::Warn,
    LogLevel::Error,
    LogLevel::Fatal,
];

impl LogLevel {
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

    /// The level label, capitalized or lowercase, optionally truncated
    /// to at most four characters (`DEBUG` becomes `DEBU`).
    pub fn label(&self, capitalize: bool, truncate: bool) -> String {
        let mut label = if capitalize {
            self.to_str().to_string()
        } else {
            self.to_str().to_lowercase()
        };
        if truncate {
            label.truncate(4);
        }
        label
    }

    pub fn color_code(&self) -> colored::Color {
        use colored::Color::*;
        match self {
            LogLevel::Trace => BrightBlack,
            LogLevel::Debug => Magenta,
            LogLevel::Info => Blue,
            LogLevel::Warn => Yellow,
            LogLevel::Error => Red,
            LogLevel::Fatal => Red,
        }
    }
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_str())
    }
}

impl FromStr for LogLevel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_uppercase().as_str() {
            "TRACE" => Ok(LogLevel::Trace),
            "DEBUG" => Ok(LogLevel::Debug),
            "INFO" => Ok(LogLevel::Info),
            "WARN" | "WARNING" => Ok(LogLevel::Warn),
            "ERROR" => Ok(LogLevel::Error),
            "FATAL" => Ok(LogLevel::Fatal),
            _ => Err(format!("Invalid log level: '{}'", s)),
        }
    }
}

/// Severity-to-color lookup, rendered once at configuration time.
///
/// Each entry is the full `"\x1b[<code>m<LABEL>\x1b[0m"` string so the
/// per-event encode path is a plain indexed lookup with no formatting.
#[derive(Debug, Clone)]
pub struct LevelColors {
    rendered: [String; 6],
}

impl LevelColors {
    pub fn new(capitalize: bool, truncate: bool) -> Self {
        let rendered = ALL_LEVELS.map(|level| {
            let label = level.label(capitalize, truncate);
            label.as_str().color(level.color_code()).to_string()
        });
        Self { rendered }
    }

    pub fn lookup(&self, level: LogLevel) -> &str {
        &self.rendered[level as usize]
    }
}

impl Default for LevelColors {
    fn default() -> Self {
        Self::new(true, true)
    }
}
