//! Sinks: destinations for finished encoded lines
//!
//! A sink accepts one finished line of bytes per event. The buffer the
//! line arrives in is owned by the caller and returns to the pool after
//! every sink has written it out.

pub mod console;
pub mod error_file;
pub mod rotating_file;

use crate::core::error::Result;
use crate::core::level::LogLevel;
use parking_lot::Mutex;
use std::sync::Arc;

pub use console::ConsoleSink;
pub use error_file::ErrorFileSink;
pub use rotating_file::{RotatingFileSink, RotationPolicy};

pub trait Sink: Send + Sync {
    /// Write one finished line. The severity accompanies the bytes so
    /// level-filtered sinks can drop entries without re-parsing them.
    fn write_line(&mut self, level: LogLevel, line: &[u8]) -> Result<()>;
    fn flush(&mut self) -> Result<()>;
    fn name(&self) -> &str;
}

/// Shared handle to a sink, used when a background task (the daily
/// rotation trigger) needs access to the same writer as the logger.
pub struct SharedSink<S: Sink> {
    inner: Arc<Mutex<S>>,
}

impl<S: Sink> SharedSink<S> {
    pub fn new(sink: S) -> Self {
        Self {
            inner: Arc::new(Mutex::new(sink)),
        }
    }

    pub fn handle(&self) -> Arc<Mutex<S>> {
        Arc::clone(&self.inner)
    }
}

impl<S: Sink> Sink for SharedSink<S> {
    fn write_line(&mut self, level: LogLevel, line: &[u8]) -> Result<()> {
        self.inner.lock().write_line(level, line)
    }

    fn flush(&mut self) -> Result<()> {
        self.inner.lock().flush()
    }

    fn name(&self) -> &str {
        "shared"
    }
}
