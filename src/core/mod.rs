//! Core types: levels, events, fields, errors, and the logger facade

pub mod entry;
pub mod error;
pub mod field;
pub mod level;
pub mod logger;

pub use entry::{Caller, Entry};
pub use error::{LoggerError, Result};
pub use field::{Field, FieldValue, ObjectMarshaler};
pub use level::{LevelColors, LogLevel};
pub use logger::{
    debug, error, error_with, fatal, global, info, info_with, init, reconfigure, trace, warn,
    LogConfig, Logger,
};
