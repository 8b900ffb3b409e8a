//! Error types for the logging front end

pub type Result<T> = std::result::Result<T, LoggerError>;

#[derive(Debug, thiserror::Error)]
pub enum LoggerError {
    /// IO error with context
    #[error("IO error while {operation}: {message}")]
    IoOperation {
        operation: String,
        message: String,
        #[source]
        source: std::io::Error,
    },

    /// Generic IO error
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    /// Serialization failure while encoding a reflected field value
    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),

    /// Caller-supplied object/array marshaling callback failed
    #[error("Field marshaling failed for '{key}': {message}")]
    MarshalError { key: String, message: String },

    /// Crash-log redirection could not be set up
    #[error("Crash log setup failed for '{path}': {message}")]
    CrashLogError { path: String, message: String },

    /// Invalid configuration with details
    #[error("Invalid configuration for {component}: {message}")]
    InvalidConfiguration { component: String, message: String },

    /// Sink error with path
    #[error("Sink error for '{path}': {message}")]
    SinkError { path: String, message: String },

    /// File rotation error
    #[error("File rotation failed for '{path}': {message}")]
    RotationError { path: String, message: String },

    /// Writer error (generic)
    #[error("Writer error: {0}")]
    WriterError(String),

    /// Generic error
    #[error("{0}")]
    Other(String),
}

impl LoggerError {
    /// Create an IO operation error with context
    pub fn io_operation(
        operation: impl Into<String>,
        message: impl Into<String>,
        source: std::io::Error,
    ) -> Self {
        LoggerError::IoOperation {
            operation: operation.into(),
            message: message.into(),
            source,
        }
    }

    /// Create a marshal error for a structured field
    pub fn marshal(key: impl Into<String>, message: impl Into<String>) -> Self {
        LoggerError::MarshalError {
            key: key.into(),
            message: message.into(),
        }
    }

    /// Create a crash-log setup error
    pub fn crash_log(path: impl Into<String>, message: impl Into<String>) -> Self {
        LoggerError::CrashLogError {
            path: path.into(),
            message: message.into(),
        }
    }

    /// Create an invalid configuration error
    pub fn config(component: impl Into<String>, message: impl Into<String>) -> Self {
        LoggerError::InvalidConfiguration {
            component: component.into(),
            message: message.into(),
        }
    }

    /// Create a sink error
    pub fn sink(path: impl Into<String>, message: impl Into<String>) -> Self {
        LoggerError::SinkError {
            path: path.into(),
            message: message.into(),
        }
    }

    /// Create a file rotation error
    pub fn rotation(path: impl Into<String>, message: impl Into<String>) -> Self {
        LoggerError::RotationError {
            path: path.into(),
            message: message.into(),
        }
    }

    /// Create a writer error (generic)
    pub fn writer<S: Into<String>>(msg: S) -> Self {
        LoggerError::WriterError(msg.into())
    }

    /// Create a generic error
    pub fn other<S: Into<String>>(msg: S) -> Self {
        LoggerError::Other(msg.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_creation() {
        let err = LoggerError::config("RotatingFileSink", "max_size_mb must be non-zero");
        assert!(matches!(err, LoggerError::InvalidConfiguration { .. }));

        let err = LoggerError::sink("/var/log/app.log", "Permission denied");
        assert!(matches!(err, LoggerError::SinkError { .. }));

        let err = LoggerError::marshal("request", "missing body");
        assert!(matches!(err, LoggerError::MarshalError { .. }));
    }

    #[test]
    fn test_error_display() {
        let err = LoggerError::rotation("/var/log/app.log", "Disk full");
        assert_eq!(
            err.to_string(),
            "File rotation failed for '/var/log/app.log': Disk full"
        );

        let err = LoggerError::crash_log("./logs/crash.log", "read-only filesystem");
        assert_eq!(
            err.to_string(),
            "Crash log setup failed for './logs/crash.log': read-only filesystem"
        );
    }

    #[test]
    fn test_io_operation_error() {
        let io_err = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "access denied");
        let err = LoggerError::io_operation("opening crash log", "cannot open file", io_err);

        assert!(matches!(err, LoggerError::IoOperation { .. }));
        assert!(err.to_string().contains("opening crash log"));
        assert!(err.to_string().contains("cannot open file"));
    }
}
