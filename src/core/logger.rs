//! Logger facade and the process-wide default logger
//!
//! The logger is thin glue around the encoder: it snapshots each call
//! into an [`Entry`], clones the base encoder (fresh buffer, shared
//! configuration), and hands the finished line to every sink. The
//! default logger lives behind an explicit `init`/`reconfigure` pair
//! rather than being mutable from arbitrary call sites.

use super::entry::Entry;
use super::error::Result;
use super::field::Field;
use super::level::{LevelColors, LogLevel};
use crate::crash;
use crate::encoder::{EncoderConfig, TextEncoder};
use crate::rotation::RotationScheduler;
use crate::sinks::{
    ConsoleSink, ErrorFileSink, RotatingFileSink, RotationPolicy, SharedSink, Sink,
};
use lazy_static::lazy_static;
use parking_lot::{Mutex, RwLock};
use std::backtrace::Backtrace;
use std::panic::Location;
use std::sync::Arc;

/// Configuration bundle for building a [`Logger`].
///
/// Empty file names disable the corresponding output; the default
/// configuration logs to the console only and touches no files.
#[derive(Debug, Clone)]
pub struct LogConfig {
    pub level: LogLevel,
    pub enable_colors: bool,
    /// File that receives the process's low-level error stream. Fatal
    /// at build time if it cannot be opened.
    pub crash_log_filename: String,
    /// Main rotating log file, rolled daily and by size.
    pub filename: String,
    /// Error-and-above rotating log file.
    pub error_log_filename: String,
    pub enable_caller: bool,
    pub enable_level_truncation: bool,
    pub enable_capital_level: bool,
    /// Attach a captured backtrace to Error and above.
    pub enable_error_stacktrace: bool,
    pub timestamp_format: String,
    pub name: String,
    pub rotation: RotationPolicy,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: LogLevel::Debug,
            enable_colors: true,
            crash_log_filename: String::new(),
            filename: String::new(),
            error_log_filename: String::new(),
            enable_caller: true,
            enable_level_truncation: true,
            enable_capital_level: true,
            enable_error_stacktrace: false,
            timestamp_format: "%Y-%m-%d %H:%M:%S%.3f".to_string(),
            name: String::new(),
            rotation: RotationPolicy::default(),
        }
    }
}

impl LogConfig {
    /// The configuration used for file-backed deployments: crash, main,
    /// and error logs under `./logs`, with stacktraces on errors.
    pub fn with_log_files() -> Self {
        Self {
            crash_log_filename: "./logs/crash.log".to_string(),
            filename: "./logs/log.log".to_string(),
            error_log_filename: "./logs/error.log".to_string(),
            enable_error_stacktrace: true,
            ..Self::default()
        }
    }

    /// Build a logger: set up the crash channel, pre-render the color
    /// table, construct the encoder template, and open the sinks.
    pub fn build(self) -> Result<Logger> {
        if !self.crash_log_filename.is_empty() {
            crash::redirect_crash_log(&self.crash_log_filename)?;
        }

        let colors = if self.enable_colors {
            Some(LevelColors::new(
                self.enable_capital_level,
                self.enable_level_truncation,
            ))
        } else {
            None
        };
        let encoder_config = EncoderConfig::bracketed(
            &self.timestamp_format,
            colors,
            self.enable_capital_level,
            self.enable_level_truncation,
        );
        let encoder = TextEncoder::new(Arc::new(encoder_config));

        let mut sinks: Vec<Box<dyn Sink>> = vec![Box::new(ConsoleSink::new())];
        let mut schedulers = Vec::new();

        if !self.filename.is_empty() {
            let sink = RotatingFileSink::with_policy(&self.filename, self.rotation.clone())?;
            let shared = SharedSink::new(sink);
            schedulers.push(RotationScheduler::start(shared.handle()));
            sinks.push(Box::new(shared));
        }

        if !self.error_log_filename.is_empty() {
            let sink =
                ErrorFileSink::with_policy(&self.error_log_filename, self.rotation.clone())?;
            sinks.push(Box::new(sink));
        }

        Ok(Logger {
            min_level: RwLock::new(self.level),
            name: if self.name.is_empty() {
                None
            } else {
                Some(format!("[{}]", self.name))
            },
            enable_caller: self.enable_caller,
            enable_error_stacktrace: self.enable_error_stacktrace,
            encoder,
            sinks: Mutex::new(sinks),
            _schedulers: schedulers,
        })
    }
}

pub struct Logger {
    min_level: RwLock<LogLevel>,
    name: Option<String>,
    enable_caller: bool,
    enable_error_stacktrace: bool,
    /// Read-only template; every call clones it for an owned buffer.
    encoder: TextEncoder,
    sinks: Mutex<Vec<Box<dyn Sink>>>,
    _schedulers: Vec<RotationScheduler>,
}

impl Logger {
    pub fn set_min_level(&self, level: LogLevel) {
        *self.min_level.write() = level;
    }

    pub fn min_level(&self) -> LogLevel {
        *self.min_level.read()
    }

    pub fn add_sink(&self, sink: Box<dyn Sink>) {
        self.sinks.lock().push(sink);
    }

    #[track_caller]
    pub fn log(&self, level: LogLevel, message: impl Into<String>) {
        self.log_with(level, message, Vec::new());
    }

    #[track_caller]
    pub fn log_with(&self, level: LogLevel, message: impl Into<String>, fields: Vec<Field>) {
        if level < self.min_level() {
            return;
        }

        let mut entry = Entry::new(level, message).with_fields(fields);
        if let Some(name) = &self.name {
            entry = entry.with_name(name.clone());
        }
        if self.enable_caller {
            let location = Location::caller();
            entry = entry.with_caller(location.file(), location.line());
        }
        if self.enable_error_stacktrace && level >= LogLevel::Error {
            entry = entry.with_stack(Backtrace::force_capture().to_string());
        }

        self.emit(&entry);
    }

    fn emit(&self, entry: &Entry) {
        let encoder = self.encoder.clone();
        match encoder.encode_entry(entry) {
            Ok(line) => {
                let mut sinks = self.sinks.lock();
                for sink in sinks.iter_mut() {
                    if let Err(e) = sink.write_line(entry.level, line.as_bytes()) {
                        eprintln!("[WARN] Sink '{}' write failed: {}", sink.name(), e);
                    }
                }
                // Dropping the line returns its buffer to the pool.
            }
            Err(e) => eprintln!("[WARN] Failed to encode log entry: {}", e),
        }
    }

    pub fn flush(&self) -> Result<()> {
        let mut sinks = self.sinks.lock();
        for sink in sinks.iter_mut() {
            sink.flush()?;
        }
        Ok(())
    }

    #[track_caller]
    pub fn trace(&self, message: impl Into<String>) {
        self.log(LogLevel::Trace, message);
    }

    #[track_caller]
    pub fn debug(&self, message: impl Into<String>) {
        self.log(LogLevel::Debug, message);
    }

    #[track_caller]
    pub fn info(&self, message: impl Into<String>) {
        self.log(LogLevel::Info, message);
    }

    #[track_caller]
    pub fn warn(&self, message: impl Into<String>) {
        self.log(LogLevel::Warn, message);
    }

    #[track_caller]
    pub fn error(&self, message: impl Into<String>) {
        self.log(LogLevel::Error, message);
    }

    #[track_caller]
    pub fn fatal(&self, message: impl Into<String>) {
        self.log(LogLevel::Fatal, message);
    }

    #[track_caller]
    pub fn info_with(&self, message: impl Into<String>, fields: Vec<Field>) {
        self.log_with(LogLevel::Info, message, fields);
    }

    #[track_caller]
    pub fn warn_with(&self, message: impl Into<String>, fields: Vec<Field>) {
        self.log_with(LogLevel::Warn, message, fields);
    }

    #[track_caller]
    pub fn error_with(&self, message: impl Into<String>, fields: Vec<Field>) {
        self.log_with(LogLevel::Error, message, fields);
    }
}

lazy_static! {
    static ref GLOBAL_LOGGER: RwLock<Arc<Logger>> = RwLock::new(Arc::new(
        LogConfig::default()
            .build()
            .expect("console-only logger construction performs no IO")
    ));
}

/// Install a configured logger as the process-wide default.
pub fn init(config: LogConfig) -> Result<()> {
    let logger = config.build()?;
    *GLOBAL_LOGGER.write() = Arc::new(logger);
    Ok(())
}

/// Replace the process-wide default logger. Identical to [`init`];
/// the separate name marks deliberate reconfiguration at call sites.
pub fn reconfigure(config: LogConfig) -> Result<()> {
    init(config)
}

/// The current process-wide default logger.
pub fn global() -> Arc<Logger> {
    GLOBAL_LOGGER.read().clone()
}

/// Log a trace message through the process-wide default logger.
#[track_caller]
pub fn trace(message: impl Into<String>) {
    global().trace(message);
}

/// Log a debug message through the process-wide default logger.
#[track_caller]
pub fn debug(message: impl Into<String>) {
    global().debug(message);
}

/// Log an info message through the process-wide default logger.
#[track_caller]
pub fn info(message: impl Into<String>) {
    global().info(message);
}

/// Log a warning through the process-wide default logger.
#[track_caller]
pub fn warn(message: impl Into<String>) {
    global().warn(message);
}

/// Log an error through the process-wide default logger.
#[track_caller]
pub fn error(message: impl Into<String>) {
    global().error(message);
}

/// Log a fatal message through the process-wide default logger.
#[track_caller]
pub fn fatal(message: impl Into<String>) {
    global().fatal(message);
}

/// Log an info message with fields through the process-wide default
/// logger.
#[track_caller]
pub fn info_with(message: impl Into<String>, fields: Vec<Field>) {
    global().info_with(message, fields);
}

/// Log an error with fields through the process-wide default logger.
#[track_caller]
pub fn error_with(message: impl Into<String>, fields: Vec<Field>) {
    global().error_with(message, fields);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::field::Field;

    #[test]
    fn test_default_config_builds() {
        let logger = LogConfig::default().build().unwrap();
        assert_eq!(logger.min_level(), LogLevel::Debug);
    }

    #[test]
    fn test_min_level_filtering() {
        let logger = LogConfig::default().build().unwrap();
        logger.set_min_level(LogLevel::Warn);
        // Below the threshold: must not panic or write.
        logger.debug("suppressed");
        logger.warn("emitted");
        assert_eq!(logger.min_level(), LogLevel::Warn);
    }

    #[test]
    fn test_log_with_fields() {
        let logger = LogConfig::default().build().unwrap();
        logger.info_with(
            "request handled",
            vec![Field::new("status", 200), Field::new("path", "/health")],
        );
        logger.flush().unwrap();
    }

    #[test]
    fn test_global_logger_available() {
        let logger = global();
        logger.info("global logger reachable without explicit wiring");
    }

    #[test]
    fn test_free_functions_delegate_to_global() {
        info("free-function info");
        error_with("free-function error", vec![Field::new("code", 7)]);
    }
}
