//! # Bracket Log
//!
//! A structured-logging front end that formats log events into bracketed,
//! human-readable text lines, with severity-colored level tags, crash-stream
//! capture, and rotating file output.
//!
//! ## Features
//!
//! - **Bracketed Text Encoding**: `[time][LEVEL] [key: value] - message`
//!   lines with correct escaping and pooled buffers on the hot path
//! - **Colored Levels**: severity color tags pre-rendered at configuration
//!   time
//! - **Rotating Files**: size-triggered and daily rotation with optional
//!   compression, plus an error-only file
//! - **Crash Capture**: redirects the process error stream to a file before
//!   any logging occurs

pub mod core;
pub mod crash;
pub mod encoder;
pub mod macros;
pub mod rotation;
pub mod sinks;

pub mod prelude {
    pub use crate::core::{
        global, init, reconfigure, Caller, Entry, Field, FieldValue, LevelColors, LogConfig,
        LogLevel, Logger, LoggerError, ObjectMarshaler, Result,
    };
    pub use crate::core::{debug, error, error_with, fatal, info, info_with, trace, warn};
    pub use crate::encoder::{Buffer, EncoderConfig, TextEncoder};
    pub use crate::sinks::{
        ConsoleSink, ErrorFileSink, RotatingFileSink, RotationPolicy, Sink,
    };
}

pub use crate::core::{
    global, init, reconfigure, Caller, Entry, Field, FieldValue, LevelColors, LogConfig, LogLevel,
    Logger, LoggerError, ObjectMarshaler, Result,
};
pub use crate::core::{debug, error, error_with, fatal, info, info_with, trace, warn};
pub use crate::crash::redirect_crash_log;
pub use crate::encoder::{Buffer, EncoderConfig, TextEncoder};
pub use crate::rotation::RotationScheduler;
pub use crate::sinks::{ConsoleSink, ErrorFileSink, RotatingFileSink, RotationPolicy, Sink};
