//! Encoder configuration: structural keys, formatter callbacks, line ending
//!
//! An empty structural key disables that column entirely. Formatter
//! callbacks render into the preamble array encoder; the configuration
//! is read-only and shared across encoder clones.

use super::array::ArrayEncoder;
use crate::core::entry::Caller;
use crate::core::level::{LevelColors, LogLevel};
use chrono::{DateTime, Local};
use std::sync::Arc;
use std::time::Duration;

pub const DEFAULT_LINE_ENDING: &str = "\n";

pub type TimeFormatter = Arc<dyn Fn(&DateTime<Local>, &mut ArrayEncoder) + Send + Sync>;
pub type LevelFormatter = Arc<dyn Fn(LogLevel, &mut ArrayEncoder) + Send + Sync>;
pub type CallerFormatter = Arc<dyn Fn(&Caller, &mut ArrayEncoder) + Send + Sync>;
pub type DurationFormatter = Arc<dyn Fn(Duration) -> String + Send + Sync>;

#[derive(Clone)]
pub struct EncoderConfig {
    pub time_key: String,
    pub level_key: String,
    pub name_key: String,
    pub caller_key: String,
    pub message_key: String,
    pub stacktrace_key: String,
    /// Appended to every finished line; empty falls back to
    /// [`DEFAULT_LINE_ENDING`].
    pub line_ending: String,
    /// Include a space after key colons and element commas.
    pub spaced: bool,
    pub encode_time: Option<TimeFormatter>,
    pub encode_level: Option<LevelFormatter>,
    pub encode_caller: Option<CallerFormatter>,
    pub encode_duration: Option<DurationFormatter>,
}

impl Default for EncoderConfig {
    fn default() -> Self {
        Self {
            time_key: "T".to_string(),
            level_key: "L".to_string(),
            name_key: "N".to_string(),
            caller_key: "C".to_string(),
            message_key: "M".to_string(),
            stacktrace_key: "S".to_string(),
            line_ending: DEFAULT_LINE_ENDING.to_string(),
            spaced: true,
            encode_time: None,
            encode_level: None,
            encode_caller: None,
            encode_duration: None,
        }
    }
}

impl EncoderConfig {
    /// The stock bracketed-text configuration: `[time]` and `[LEVL]`
    /// preamble columns, trimmed ` file.rs:42` caller, human-readable
    /// durations.
    pub fn bracketed(
        timestamp_format: &str,
        colors: Option<LevelColors>,
        capitalize: bool,
        truncate: bool,
    ) -> Self {
        let encode_level = match colors {
            Some(colors) => colored_level_formatter(colors),
            None => plain_level_formatter(capitalize, truncate),
        };

        Self {
            encode_time: Some(bracket_time_formatter(timestamp_format)),
            encode_level: Some(encode_level),
            encode_caller: Some(trimmed_caller_formatter()),
            encode_duration: Some(string_duration_formatter()),
            ..Self::default()
        }
    }
}

/// Renders the event time as `[<strftime>]`.
pub fn bracket_time_formatter(format: &str) -> TimeFormatter {
    let format = format.to_string();
    Arc::new(move |time: &DateTime<Local>, arr: &mut ArrayEncoder| {
        arr.append_string(format!("[{}]", time.format(&format)));
    })
}

/// Renders the level as an uncolored `[LEVL]` tag.
pub fn plain_level_formatter(capitalize: bool, truncate: bool) -> LevelFormatter {
    Arc::new(move |level: LogLevel, arr: &mut ArrayEncoder| {
        arr.append_string(format!("[{}]", level.label(capitalize, truncate)));
    })
}

/// Renders the level through the pre-rendered color table; the hot path
/// is a table lookup plus the surrounding brackets.
pub fn colored_level_formatter(colors: LevelColors) -> LevelFormatter {
    Arc::new(move |level: LogLevel, arr: &mut ArrayEncoder| {
        arr.append_string(format!("[{}]", colors.lookup(level)));
    })
}

/// Renders the call site as ` file.rs:42`.
pub fn trimmed_caller_formatter() -> CallerFormatter {
    Arc::new(|caller: &Caller, arr: &mut ArrayEncoder| {
        arr.append_string(caller.trimmed());
    })
}

/// Renders durations in their human-readable form (`1.5s`, `250ms`).
pub fn string_duration_formatter() -> DurationFormatter {
    Arc::new(|d: Duration| format!("{:?}", d))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::encoder::array;

    #[test]
    fn test_default_keys_enabled() {
        let config = EncoderConfig::default();
        assert_eq!(config.message_key, "M");
        assert!(config.spaced);
        assert!(config.encode_time.is_none());
    }

    #[test]
    fn test_bracket_time_formatter() {
        let f = bracket_time_formatter("%Y-%m-%d");
        let mut arr = array::get();
        let time = Local::now();
        f(&time, &mut arr);
        let rendered = &arr.elems()[0];
        assert!(rendered.starts_with('['));
        assert!(rendered.ends_with(']'));
    }

    #[test]
    fn test_plain_level_formatter() {
        let f = plain_level_formatter(true, true);
        let mut arr = array::get();
        f(LogLevel::Debug, &mut arr);
        assert_eq!(arr.elems(), &["[DEBU]"]);
    }

    #[test]
    fn test_duration_formatter() {
        let f = string_duration_formatter();
        assert_eq!(f(Duration::from_millis(1500)), "1.5s");
    }
}
