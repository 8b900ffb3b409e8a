//! Entry encoder: pooled buffers, preamble array encoder, and the
//! bracketed text encoder itself.

pub mod array;
pub mod buffer;
pub mod config;
pub mod text;

pub use array::ArrayEncoder;
pub use buffer::Buffer;
pub use config::{
    bracket_time_formatter, colored_level_formatter, plain_level_formatter,
    string_duration_formatter, trimmed_caller_formatter, CallerFormatter, DurationFormatter,
    EncoderConfig, LevelFormatter, TimeFormatter, DEFAULT_LINE_ENDING,
};
pub use text::TextEncoder;
