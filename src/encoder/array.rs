//! Pooled sub-encoder for the fixed line preamble
//!
//! The preamble columns (rendered time, level tag, logger name, caller)
//! are collected in insertion order and later concatenated with no
//! separators; the format favors compact order-significant columns over
//! key-labeled ones.

use lazy_static::lazy_static;
use parking_lot::Mutex;
use std::fmt::Write;
use std::mem;

const MAX_IDLE: usize = 32;

lazy_static! {
    static ref ARRAY_POOL: Mutex<Vec<Vec<String>>> = Mutex::new(Vec::new());
}

/// Acquire a reset array encoder from the process-wide pool.
pub fn get() -> ArrayEncoder {
    let elems = ARRAY_POOL
        .lock()
        .pop()
        .unwrap_or_else(|| Vec::with_capacity(4));
    ArrayEncoder { elems }
}

/// Collects a flat ordered list of rendered values without any
/// key/bracket wrapping. Reset and returned to the pool on drop.
#[derive(Default)]
pub struct ArrayEncoder {
    elems: Vec<String>,
}

impl ArrayEncoder {
    pub fn append_string(&mut self, s: impl Into<String>) {
        self.elems.push(s.into());
    }

    pub fn append_int(&mut self, v: i64) {
        self.append_display(v);
    }

    pub fn append_uint(&mut self, v: u64) {
        self.append_display(v);
    }

    pub fn append_float(&mut self, v: f64) {
        self.append_display(v);
    }

    pub fn append_bool(&mut self, v: bool) {
        self.append_display(v);
    }

    fn append_display(&mut self, v: impl std::fmt::Display) {
        let mut s = String::new();
        let _ = write!(s, "{}", v);
        self.elems.push(s);
    }

    pub fn elems(&self) -> &[String] {
        &self.elems
    }

    pub fn len(&self) -> usize {
        self.elems.len()
    }

    pub fn is_empty(&self) -> bool {
        self.elems.is_empty()
    }
}

impl Drop for ArrayEncoder {
    fn drop(&mut self) {
        let mut elems = mem::take(&mut self.elems);
        elems.clear();
        let mut pool = ARRAY_POOL.lock();
        if pool.len() < MAX_IDLE {
            pool.push(elems);
        }
    }
}
