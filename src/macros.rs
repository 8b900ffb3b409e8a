//! Logging macros for ergonomic log message formatting.
//!
//! These macros provide a convenient interface for logging with automatic
//! string formatting, similar to `println!` and `format!`.
//!
//! # Examples
//!
//! ```
//! use bracket_log::prelude::*;
//! use bracket_log::info;
//!
//! let logger = LogConfig::default().build().unwrap();
//!
//! // Basic logging
//! info!(logger, "Server started");
//!
//! // With format arguments
//! let port = 8080;
//! info!(logger, "Server listening on port {}", port);
//! ```

/// Log a message with automatic formatting.
///
/// # Examples
///
/// ```
/// # use bracket_log::prelude::*;
/// # let logger = LogConfig::default().build().unwrap();
/// use bracket_log::log;
/// log!(logger, LogLevel::Info, "Simple message");
/// log!(logger, LogLevel::Error, "Error code: {}", 500);
/// ```
#[macro_export]
macro_rules! log {
    ($logger:expr, $level:expr, $($arg:tt)+) => {
        $logger.log($level, format!($($arg)+))
    };
}

/// Log a trace-level message.
#[macro_export]
macro_rules! trace {
    ($logger:expr, $($arg:tt)+) => {
        $crate::log!($logger, $crate::LogLevel::Trace, $($arg)+)
    };
}

/// Log a debug-level message.
#[macro_export]
macro_rules! debug {
    ($logger:expr, $($arg:tt)+) => {
        $crate::log!($logger, $crate::LogLevel::Debug, $($arg)+)
    };
}

/// Log an info-level message.
///
/// # Examples
///
/// ```
/// # use bracket_log::prelude::*;
/// # let logger = LogConfig::default().build().unwrap();
/// use bracket_log::info;
/// info!(logger, "Application started");
/// info!(logger, "Processing {} items", 100);
/// ```
#[macro_export]
macro_rules! info {
    ($logger:expr, $($arg:tt)+) => {
        $crate::log!($logger, $crate::LogLevel::Info, $($arg)+)
    };
}

/// Log a warning-level message.
#[macro_export]
macro_rules! warn {
    ($logger:expr, $($arg:tt)+) => {
        $crate::log!($logger, $crate::LogLevel::Warn, $($arg)+)
    };
}

/// Log an error-level message.
#[macro_export]
macro_rules! error {
    ($logger:expr, $($arg:tt)+) => {
        $crate::log!($logger, $crate::LogLevel::Error, $($arg)+)
    };
}

/// Log a fatal-level message.
#[macro_export]
macro_rules! fatal {
    ($logger:expr, $($arg:tt)+) => {
        $crate::log!($logger, $crate::LogLevel::Fatal, $($arg)+)
    };
}

#[cfg(test)]
mod tests {
    use crate::core::{LogConfig, LogLevel};

    #[test]
    fn test_log_macro() {
        let logger = LogConfig::default().build().unwrap();
        log!(logger, LogLevel::Info, "Test message");
        log!(logger, LogLevel::Info, "Formatted: {}", 42);
    }

    #[test]
    fn test_level_macros() {
        let logger = LogConfig::default().build().unwrap();
        logger.set_min_level(LogLevel::Trace);
        trace!(logger, "Trace message");
        debug!(logger, "Count: {}", 5);
        info!(logger, "Items: {}", 100);
        warn!(logger, "Retry {} of {}", 1, 3);
        error!(logger, "Code: {}", 500);
        fatal!(logger, "Critical failure: {}", "system");
    }
}
