//! Error-severity-filtered file sink

use super::rotating_file::{RotatingFileSink, RotationPolicy};
use super::Sink;
use crate::core::error::Result;
use crate::core::level::LogLevel;
use std::path::Path;

/// Rotating file writer that only records entries at or above a
/// severity threshold, by default `Error`.
pub struct ErrorFileSink {
    inner: RotatingFileSink,
    min_level: LogLevel,
}

impl ErrorFileSink {
    pub fn new<P: AsRef<Path>>(path: P) -> Result<Self> {
        Ok(Self {
            inner: RotatingFileSink::new(path)?,
            min_level: LogLevel::Error,
        })
    }

    pub fn with_policy<P: AsRef<Path>>(path: P, policy: RotationPolicy) -> Result<Self> {
        Ok(Self {
            inner: RotatingFileSink::with_policy(path, policy)?,
            min_level: LogLevel::Error,
        })
    }

    #[must_use]
    pub fn with_min_level(mut self, level: LogLevel) -> Self {
        self.min_level = level;
        self
    }
}

impl Sink for ErrorFileSink {
    fn write_line(&mut self, level: LogLevel, line: &[u8]) -> Result<()> {
        if level < self.min_level {
            return Ok(());
        }
        self.inner.write_line(level, line)
    }

    fn flush(&mut self) -> Result<()> {
        self.inner.flush()
    }

    fn name(&self) -> &str {
        "error_file"
    }
}
