//! Console sink

use super::Sink;
use crate::core::error::Result;
use crate::core::level::LogLevel;
use std::io::Write;

/// Writes finished lines to standard output.
///
/// Lines arrive already terminated, so no extra newline is added.
pub struct ConsoleSink;

impl ConsoleSink {
    pub fn new() -> Self {
        Self
    }
}

impl Default for ConsoleSink {
    fn default() -> Self {
        Self::new()
    }
}

impl Sink for ConsoleSink {
    fn write_line(&mut self, _level: LogLevel, line: &[u8]) -> Result<()> {
        let mut stdout = std::io::stdout().lock();
        stdout.write_all(line)?;
        Ok(())
    }

    fn flush(&mut self) -> Result<()> {
        std::io::stdout().flush()?;
        Ok(())
    }

    fn name(&self) -> &str {
        "console"
    }
}
