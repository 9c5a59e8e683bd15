//! Pooled scratch text buffers.
//!
//! A [`ScratchBuffer`] is borrowed from a [`ScratchPool`] and handed back when
//! it is dropped, so the buffer is recycled on every exit path: normal return,
//! early `?` return, or unwinding.

use std::fmt;
use std::ops::{Deref, DerefMut};
use std::sync::LazyLock;

use parking_lot::Mutex;

use super::constants::{DEFAULT_SCRATCH_RETENTION, MAX_SCRATCH_CAPACITY};

/// Process-wide pool used by [`acquire`].
static SHARED: LazyLock<ScratchPool> = LazyLock::new(ScratchPool::new);

/// Borrow a scratch buffer from the process-wide pool.
pub fn acquire() -> ScratchBuffer<'static> {
    SHARED.acquire()
}

/// A pool of reusable `String` buffers.
#[derive(Debug)]
pub struct ScratchPool {
    free: Mutex<Vec<String>>,
    retention: usize,
}

impl ScratchPool {
    pub fn new() -> Self {
        Self::with_retention(DEFAULT_SCRATCH_RETENTION)
    }

    /// Create a pool keeping at most `retention` idle buffers.
    pub fn with_retention(retention: usize) -> Self {
        Self {
            free: Mutex::new(Vec::with_capacity(retention)),
            retention,
        }
    }

    /// Borrow an empty buffer, reusing an idle one when available.
    pub fn acquire(&self) -> ScratchBuffer<'_> {
        let buf = self.free.lock().pop().unwrap_or_default();
        ScratchBuffer { pool: self, buf }
    }

    /// Number of idle buffers currently held by the pool.
    pub fn retained(&self) -> usize {
        self.free.lock().len()
    }

    fn recycle(&self, mut buf: String) {
        if buf.capacity() > MAX_SCRATCH_CAPACITY {
            return;
        }
        buf.clear();
        let mut free = self.free.lock();
        if free.len() < self.retention {
            free.push(buf);
        }
    }
}

impl Default for ScratchPool {
    fn default() -> Self {
        Self::new()
    }
}

/// A buffer on loan from a [`ScratchPool`]; returned to it on drop.
pub struct ScratchBuffer<'a> {
    pool: &'a ScratchPool,
    buf: String,
}

impl ScratchBuffer<'_> {
    pub fn as_str(&self) -> &str {
        &self.buf
    }
}

impl Deref for ScratchBuffer<'_> {
    type Target = String;

    fn deref(&self) -> &String {
        &self.buf
    }
}

impl DerefMut for ScratchBuffer<'_> {
    fn deref_mut(&mut self) -> &mut String {
        &mut self.buf
    }
}

impl fmt::Write for ScratchBuffer<'_> {
    fn write_str(&mut self, s: &str) -> fmt::Result {
        self.buf.push_str(s);
        Ok(())
    }
}

impl fmt::Debug for ScratchBuffer<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("ScratchBuffer").field(&self.buf).finish()
    }
}

impl Drop for ScratchBuffer<'_> {
    fn drop(&mut self) {
        self.pool.recycle(std::mem::take(&mut self.buf));
    }
}
