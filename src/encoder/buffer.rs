//! Pooled growable byte buffers for the encode hot path
//!
//! Buffers are acquired from a process-wide free-list before formatting
//! begins and are returned automatically when dropped by their final
//! consumer. Release-by-drop makes double-release impossible and keeps
//! the acquire/release pair safe under concurrent callers.

use lazy_static::lazy_static;
use parking_lot::Mutex;
use std::fmt;
use std::mem;

const INITIAL_CAPACITY: usize = 256;

/// Free-list entries beyond this are dropped instead of retained.
const MAX_IDLE: usize = 64;

lazy_static! {
    static ref BUFFER_POOL: Pool = Pool::new();
}

struct Pool {
    free: Mutex<Vec<Vec<u8>>>,
}

impl Pool {
    fn new() -> Self {
        Self {
            free: Mutex::new(Vec::new()),
        }
    }

    fn take(&self) -> Vec<u8> {
        self.free
            .lock()
            .pop()
            .unwrap_or_else(|| Vec::with_capacity(INITIAL_CAPACITY))
    }

    fn reclaim(&self, mut bytes: Vec<u8>) {
        bytes.clear();
        let mut free = self.free.lock();
        if free.len() < MAX_IDLE {
            free.push(bytes);
        }
    }

    #[cfg(test)]
    fn idle(&self) -> usize {
        self.free.lock().len()
    }
}

/// Acquire a cleared buffer from the process-wide pool.
pub fn get() -> Buffer {
    Buffer {
        bytes: BUFFER_POOL.take(),
    }
}

/// A growable byte buffer with pool-managed lifetime.
///
/// Exclusively owned by one encoding operation; never shared between
/// concurrent encode calls. Dropping the buffer returns its storage to
/// the pool.
#[derive(Default, Debug)]
pub struct Buffer {
    bytes: Vec<u8>,
}

impl Buffer {
    pub fn push(&mut self, b: u8) {
        self.bytes.push(b);
    }

    pub fn extend_from_slice(&mut self, bytes: &[u8]) {
        self.bytes.extend_from_slice(bytes);
    }

    pub fn append_str(&mut self, s: &str) {
        self.bytes.extend_from_slice(s.as_bytes());
    }

    pub fn append_bool(&mut self, v: bool) {
        self.append_str(if v { "true" } else { "false" });
    }

    pub fn append_int(&mut self, v: i64) {
        let _ = fmt::Write::write_fmt(self, format_args!("{}", v));
    }

    pub fn append_uint(&mut self, v: u64) {
        let _ = fmt::Write::write_fmt(self, format_args!("{}", v));
    }

    /// Append a finite float in its shortest round-trippable decimal
    /// form. NaN and infinities are the caller's concern.
    pub fn append_float(&mut self, v: f64) {
        let _ = fmt::Write::write_fmt(self, format_args!("{}", v));
    }

    /// Drop a single trailing newline, if present.
    pub fn trim_newline(&mut self) {
        if self.bytes.last() == Some(&b'\n') {
            self.bytes.pop();
        }
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn last(&self) -> Option<u8> {
        self.bytes.last().copied()
    }

    pub fn reset(&mut self) {
        self.bytes.clear();
    }
}

impl fmt::Write for Buffer {
    fn write_str(&mut self, s: &str) -> fmt::Result {
        self.bytes.extend_from_slice(s.as_bytes());
        Ok(())
    }
}

impl std::io::Write for Buffer {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        self.bytes.extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> std::io::Result<()> {
        Ok(())
    }
}

impl Drop for Buffer {
    fn drop(&mut self) {
        BUFFER_POOL.reclaim(mem::take(&mut self.bytes));
    }
}
