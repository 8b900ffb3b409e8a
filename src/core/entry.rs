//! Log event snapshot

use super::field::Field;
use super::level::LogLevel;
use chrono::{DateTime, Local};

/// Call-site metadata for an event.
///
/// Presence of the struct is the "defined" flag; events without caller
/// capture simply carry `None`.
#[derive(Debug, Clone)]
pub struct Caller {
    pub file: String,
    pub line: u32,
}

impl Caller {
    pub fn new(file: impl Into<String>, line: u32) -> Self {
        Self {
            file: file.into(),
            line,
        }
    }

    /// Render as ` file.rs:42`, keeping only the final path component.
    ///
    /// The leading space separates the caller column from the rest of
    /// the preamble, which is concatenated without separators.
    pub fn trimmed(&self) -> String {
        let base = self
            .file
            .rsplit(['/', '\\'])
            .next()
            .unwrap_or(self.file.as_str());
        format!(" {}:{}", base, self.line)
    }
}

/// Immutable snapshot of one log call.
///
/// Produced once per log call, consumed exactly once by the encoder,
/// never mutated after creation.
#[derive(Debug, Clone)]
pub struct Entry {
    pub timestamp: DateTime<Local>,
    pub level: LogLevel,
    pub logger_name: Option<String>,
    pub caller: Option<Caller>,
    pub message: String,
    pub stack: Option<String>,
    pub fields: Vec<Field>,
}

impl Entry {
    pub fn new(level: LogLevel, message: impl Into<String>) -> Self {
        Self {
            timestamp: Local::now(),
            level,
            logger_name: None,
            caller: None,
            message: message.into(),
            stack: None,
            fields: Vec::new(),
        }
    }

    #[must_use]
    pub fn with_timestamp(mut self, timestamp: DateTime<Local>) -> Self {
        self.timestamp = timestamp;
        self
    }

    #[must_use]
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.logger_name = Some(name.into());
        self
    }

    #[must_use]
    pub fn with_caller(mut self, file: impl Into<String>, line: u32) -> Self {
        self.caller = Some(Caller::new(file, line));
        self
    }

    #[must_use]
    pub fn with_stack(mut self, stack: impl Into<String>) -> Self {
        self.stack = Some(stack.into());
        self
    }

    #[must_use]
    pub fn with_fields(mut self, fields: Vec<Field>) -> Self {
        self.fields = fields;
        self
    }

    #[must_use]
    pub fn with_field(mut self, field: Field) -> Self {
        self.fields.push(field);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_caller_trimmed() {
        let caller = Caller::new("src/server/handler.rs", 42);
        assert_eq!(caller.trimmed(), " handler.rs:42");

        let caller = Caller::new("main.rs", 7);
        assert_eq!(caller.trimmed(), " main.rs:7");
    }

    #[test]
    fn test_entry_builder() {
        let entry = Entry::new(LogLevel::Info, "server started")
            .with_name("gateway")
            .with_caller("src/main.rs", 10)
            .with_field(Field::new("port", 8080));

        assert_eq!(entry.level, LogLevel::Info);
        assert_eq!(entry.logger_name.as_deref(), Some("gateway"));
        assert!(entry.caller.is_some());
        assert_eq!(entry.fields.len(), 1);
        assert!(entry.stack.is_none());
    }
}
