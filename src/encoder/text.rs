//! Bracketed text encoder
//!
//! Turns one [`Entry`] into a single output line:
//!
//! ```text
//! [2024-01-02 03:04:05.000][INFO] main.rs:10 [port: 8080] - server started
//! ```
//!
//! The preamble columns are concatenated without separators, structured
//! fields render as `[key: value]` tokens separated by `, `, and the
//! message follows after a literal ` - `. Strings are escaped but not
//! quoted; this intentionally diverges from strict JSON to keep lines
//! human-scannable.

use super::array;
use super::buffer::{self, Buffer};
use super::config::{EncoderConfig, DEFAULT_LINE_ENDING};
use crate::core::entry::Entry;
use crate::core::error::Result;
use crate::core::field::{Field, FieldValue};
use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use std::sync::Arc;
use std::time::Duration;

const HEX: &[u8; 16] = b"0123456789abcdef";

/// Single-pass encoder over one pooled buffer.
///
/// The configuration is a read-only template shared across clones; the
/// buffer and open-namespace counter are per-instance. A logging core
/// holds one base encoder and clones it per call, so no instance is
/// ever written to by more than one call at a time.
pub struct TextEncoder {
    config: Arc<EncoderConfig>,
    buf: Buffer,
    spaced: bool,
    open_namespaces: usize,
    // Scratch buffer for reflected values, created on first use.
    reflect_buf: Option<Buffer>,
}

impl TextEncoder {
    pub fn new(config: Arc<EncoderConfig>) -> Self {
        let spaced = config.spaced;
        Self {
            config,
            buf: buffer::get(),
            spaced,
            open_namespaces: 0,
            reflect_buf: None,
        }
    }

    pub fn config(&self) -> &Arc<EncoderConfig> {
        &self.config
    }

    pub fn as_bytes(&self) -> &[u8] {
        self.buf.as_bytes()
    }

    pub fn open_namespaces(&self) -> usize {
        self.open_namespaces
    }

    /// Independent encoder sharing this one's configuration and
    /// namespace depth, starting with an empty buffer.
    fn clone_empty(&self) -> Self {
        Self {
            config: Arc::clone(&self.config),
            buf: buffer::get(),
            spaced: self.spaced,
            open_namespaces: self.open_namespaces,
            reflect_buf: None,
        }
    }

    // ------------------------------------------------------------------
    // Entry assembly
    // ------------------------------------------------------------------

    /// Encode one event into a pooled output buffer.
    ///
    /// Success-only except for errors bubbled up from nested
    /// object/array marshaling callbacks. The returned buffer goes back
    /// to the pool when its final consumer drops it.
    pub fn encode_entry(&self, entry: &Entry) -> Result<Buffer> {
        let mut line = buffer::get();
        let config = &self.config;

        {
            let mut arr = array::get();
            if !config.time_key.is_empty() {
                if let Some(encode_time) = &config.encode_time {
                    encode_time(&entry.timestamp, &mut arr);
                }
            }
            if !config.level_key.is_empty() {
                if let Some(encode_level) = &config.encode_level {
                    encode_level(entry.level, &mut arr);
                }
            }
            if let Some(name) = &entry.logger_name {
                if !config.name_key.is_empty() {
                    arr.append_string(name.as_str());
                }
            }
            if let Some(caller) = &entry.caller {
                if !config.caller_key.is_empty() {
                    if let Some(encode_caller) = &config.encode_caller {
                        encode_caller(caller, &mut arr);
                    }
                }
            }
            // Preamble columns are flattened by plain concatenation.
            for elem in arr.elems() {
                line.append_str(elem);
            }
        }

        self.write_context(&mut line, &entry.fields)?;

        if !config.message_key.is_empty() {
            line.append_str(" - ");
            line.append_str(&entry.message);
        }

        // No stacktrace key means the user wants single-line output.
        if let Some(stack) = &entry.stack {
            if !stack.is_empty() && !config.stacktrace_key.is_empty() {
                line.push(b'\n');
                line.append_str(stack);
            }
        }

        if config.line_ending.is_empty() {
            line.append_str(DEFAULT_LINE_ENDING);
        } else {
            line.append_str(&config.line_ending);
        }

        Ok(line)
    }

    /// Serialize the event's structured fields into a scratch encoder
    /// and splice the bytes in only when something was produced, so a
    /// zero-field event never carries a dangling separator.
    fn write_context(&self, line: &mut Buffer, fields: &[Field]) -> Result<()> {
        let mut context = self.clone_empty();
        for field in fields {
            context.add_field(&field.key, &field.value)?;
        }
        if context.buf.is_empty() {
            return Ok(());
        }
        line.push(b' ');
        line.extend_from_slice(context.buf.as_bytes());
        Ok(())
    }

    // ------------------------------------------------------------------
    // Field accumulator
    // ------------------------------------------------------------------

    /// Append one `[key: value]` token for any supported value kind.
    pub fn add_field(&mut self, key: &str, value: &FieldValue) -> Result<()> {
        match value {
            FieldValue::Bool(v) => {
                self.add_key(key);
                self.add_element_separator();
                self.buf.append_bool(*v);
                self.buf.push(b']');
            }
            FieldValue::Int(v) => {
                self.add_key(key);
                self.add_element_separator();
                self.buf.append_int(*v);
                self.buf.push(b']');
            }
            FieldValue::Uint(v) => {
                self.add_key(key);
                self.add_element_separator();
                self.buf.append_uint(*v);
                self.buf.push(b']');
            }
            FieldValue::Float(v) => {
                self.add_key(key);
                self.append_float_checked(*v);
                self.buf.push(b']');
            }
            FieldValue::Complex { re, im } => {
                self.add_key(key);
                self.add_element_separator();
                self.append_complex(*re, *im);
                self.buf.push(b']');
            }
            FieldValue::Str(s) => {
                self.add_key(key);
                self.add_element_separator();
                self.safe_add_string(s);
                self.buf.push(b']');
            }
            FieldValue::Bytes(b) => {
                self.add_key(key);
                self.add_element_separator();
                self.buf.push(b'"');
                self.safe_add_bytes(b);
                self.buf.push(b'"');
                self.buf.push(b']');
            }
            FieldValue::Binary(b) => {
                let encoded = BASE64.encode(b);
                self.add_key(key);
                self.add_element_separator();
                self.safe_add_string(&encoded);
                self.buf.push(b']');
            }
            FieldValue::Duration(d) => {
                self.add_key(key);
                self.append_duration(*d);
                self.buf.push(b']');
            }
            FieldValue::Time(t) => {
                self.add_key(key);
                self.append_time(t);
                self.buf.push(b']');
            }
            FieldValue::Object(marshaler) => {
                self.add_key(key);
                self.add_element_separator();
                self.buf.push(b'{');
                marshaler.marshal(self)?;
                self.buf.push(b'}');
                self.buf.push(b']');
            }
            FieldValue::Array(values) => {
                self.add_key(key);
                self.add_element_separator();
                self.buf.push(b'[');
                for v in values {
                    self.append_value(v)?;
                }
                self.buf.push(b']');
                self.buf.push(b']');
            }
            FieldValue::Reflected(v) => {
                self.add_reflected(key, v)?;
            }
        }
        Ok(())
    }

    /// Open a nesting scope: appends `[key: {` and nothing else.
    ///
    /// The encoder never closes namespaces on its own when a line
    /// finishes; an opened-but-unclosed namespace is the caller's
    /// responsibility and leaves the output unbalanced.
    pub fn open_namespace(&mut self, key: &str) {
        self.add_key(key);
        self.buf.push(b'{');
        self.open_namespaces += 1;
    }

    /// Close the most recently opened namespace. No-op at depth zero.
    pub fn close_namespace(&mut self) {
        if self.open_namespaces == 0 {
            return;
        }
        self.buf.push(b'}');
        self.buf.push(b']');
        self.open_namespaces -= 1;
    }

    /// Serialize an arbitrary value through the generic JSON encoder
    /// into a scratch buffer, trim the trailing newline, and splice the
    /// bytes in verbatim after the key token. This is the one path that
    /// formats through a generic mechanism.
    pub fn add_reflected(&mut self, key: &str, value: &serde_json::Value) -> Result<()> {
        let mut rbuf = self.reflect_buf.take().unwrap_or_else(buffer::get);
        rbuf.reset();
        serde_json::to_writer(&mut rbuf, value)?;
        rbuf.trim_newline();
        self.add_key(key);
        self.buf.extend_from_slice(rbuf.as_bytes());
        self.buf.push(b']');
        self.reflect_buf = Some(rbuf);
        Ok(())
    }

    /// Append a bare value without key wrapping, used for array
    /// elements.
    fn append_value(&mut self, value: &FieldValue) -> Result<()> {
        match value {
            FieldValue::Bool(v) => {
                self.add_element_separator();
                self.buf.append_bool(*v);
            }
            FieldValue::Int(v) => {
                self.add_element_separator();
                self.buf.append_int(*v);
            }
            FieldValue::Uint(v) => {
                self.add_element_separator();
                self.buf.append_uint(*v);
            }
            FieldValue::Float(v) => {
                self.append_float_checked(*v);
            }
            FieldValue::Complex { re, im } => {
                self.add_element_separator();
                self.append_complex(*re, *im);
            }
            FieldValue::Str(s) => {
                self.add_element_separator();
                self.safe_add_string(s);
            }
            FieldValue::Bytes(b) => {
                self.add_element_separator();
                self.buf.push(b'"');
                self.safe_add_bytes(b);
                self.buf.push(b'"');
            }
            FieldValue::Binary(b) => {
                let encoded = BASE64.encode(b);
                self.add_element_separator();
                self.safe_add_string(&encoded);
            }
            FieldValue::Duration(d) => {
                self.append_duration(*d);
            }
            FieldValue::Time(t) => {
                self.append_time(t);
            }
            FieldValue::Object(marshaler) => {
                self.add_element_separator();
                self.buf.push(b'{');
                marshaler.marshal(self)?;
                self.buf.push(b'}');
            }
            FieldValue::Array(values) => {
                self.add_element_separator();
                self.buf.push(b'[');
                for v in values {
                    self.append_value(v)?;
                }
                self.buf.push(b']');
            }
            FieldValue::Reflected(v) => {
                let mut rbuf = self.reflect_buf.take().unwrap_or_else(buffer::get);
                rbuf.reset();
                serde_json::to_writer(&mut rbuf, v)?;
                rbuf.trim_newline();
                self.add_element_separator();
                self.buf.extend_from_slice(rbuf.as_bytes());
                self.reflect_buf = Some(rbuf);
            }
        }
        Ok(())
    }

    // ------------------------------------------------------------------
    // Primitive appenders
    // ------------------------------------------------------------------

    fn add_key(&mut self, key: &str) {
        self.add_element_separator();
        self.buf.push(b'[');
        self.safe_add_string(key);
        self.buf.push(b':');
        if self.spaced {
            self.buf.push(b' ');
        }
    }

    fn add_element_separator(&mut self) {
        match self.buf.last() {
            None | Some(b'{') | Some(b'[') | Some(b':') | Some(b',') | Some(b' ') => {}
            Some(_) => {
                self.buf.push(b',');
                if self.spaced {
                    self.buf.push(b' ');
                }
            }
        }
    }

    /// NaN and the infinities have no bare JSON representation, so they
    /// render as quoted literals.
    fn append_float_checked(&mut self, v: f64) {
        self.add_element_separator();
        if v.is_nan() {
            self.buf.append_str("\"NaN\"");
        } else if v == f64::INFINITY {
            self.buf.append_str("\"+Inf\"");
        } else if v == f64::NEG_INFINITY {
            self.buf.append_str("\"-Inf\"");
        } else {
            self.buf.append_float(v);
        }
    }

    fn append_complex(&mut self, re: f64, im: f64) {
        // Always inside a quoted string, so the parts need no special
        // casing for NaN and the infinities.
        self.buf.push(b'"');
        self.buf.append_float(re);
        self.buf.push(b'+');
        self.buf.append_float(im);
        self.buf.push(b'i');
        self.buf.push(b'"');
    }

    /// With no duration formatter configured, fall back to the
    /// nanosecond count so the line stays well-formed.
    fn append_duration(&mut self, d: Duration) {
        match self.config.encode_duration.clone() {
            Some(encode_duration) => {
                let rendered = encode_duration(d);
                self.add_element_separator();
                self.safe_add_string(&rendered);
            }
            None => {
                self.add_element_separator();
                let nanos = d.as_nanos().min(u64::MAX as u128) as u64;
                self.buf.append_uint(nanos);
            }
        }
    }

    /// With no time formatter configured, fall back to nanoseconds
    /// since the epoch.
    fn append_time(&mut self, t: &chrono::DateTime<chrono::Local>) {
        match self.config.encode_time.clone() {
            Some(encode_time) => {
                let mut arr = array::get();
                encode_time(t, &mut arr);
                self.add_element_separator();
                for elem in arr.elems() {
                    self.safe_add_string(elem);
                }
            }
            None => {
                self.add_element_separator();
                self.buf.append_int(t.timestamp_nanos_opt().unwrap_or(0));
            }
        }
    }

    /// Append a string one logical character at a time, escaping
    /// control bytes, the escape character, and the quote character.
    /// Output is not wrapped in quotes.
    fn safe_add_string(&mut self, s: &str) {
        for c in s.chars() {
            self.append_char(c);
        }
    }

    /// Byte-string variant: invalid encoding units degrade to the
    /// replacement-character escape, one per rejected byte, so output
    /// is always produced.
    fn safe_add_bytes(&mut self, s: &[u8]) {
        for chunk in s.utf8_chunks() {
            for c in chunk.valid().chars() {
                self.append_char(c);
            }
            for _ in chunk.invalid() {
                self.buf.append_str("\\ufffd");
            }
        }
    }

    fn append_char(&mut self, c: char) {
        if !c.is_ascii() {
            let mut utf8 = [0u8; 4];
            self.buf.append_str(c.encode_utf8(&mut utf8));
            return;
        }
        let b = c as u8;
        if b >= 0x20 && b != b'\\' && b != b'"' {
            self.buf.push(b);
            return;
        }
        match b {
            b'\\' | b'"' => {
                self.buf.push(b'\\');
                self.buf.push(b);
            }
            b'\n' => self.buf.append_str("\\n"),
            b'\r' => self.buf.append_str("\\r"),
            b'\t' => self.buf.append_str("\\t"),
            _ => {
                // Control bytes below 0x20 without a short escape.
                self.buf.append_str("\\u00");
                self.buf.push(HEX[(b >> 4) as usize]);
                self.buf.push(HEX[(b & 0xF) as usize]);
            }
        }
    }
}

impl Clone for TextEncoder {
    fn clone(&self) -> Self {
        let mut clone = self.clone_empty();
        clone.buf.extend_from_slice(self.buf.as_bytes());
        clone
    }
}
