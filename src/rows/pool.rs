// Scratch buffer pool
// Row serialization scans each row into a Vec<Value> holder. Holders are
// kept here between calls so repeated serializations do not reallocate them.

use super::Value;
use std::ops::{Deref, DerefMut};
use std::sync::Mutex;

/// Maximum number of idle holders kept by a pool
pub const MAX_POOLED_BUFFERS: usize = 64;

/// Process-wide pool used by the row serializers
pub static VALUE_POOL: ValuePool = ValuePool::new();

/// A pool of reusable row value holders
///
/// Safe to share between threads: each `acquire` hands out a holder that is
/// used exclusively by its caller until it is dropped.
#[derive(Debug)]
pub struct ValuePool {
    idle: Mutex<Vec<Vec<Value>>>,
}

impl ValuePool {
    pub const fn new() -> Self {
        Self {
            idle: Mutex::new(Vec::new()),
        }
    }

    /// Take a holder with exactly `size` null slots
    ///
    /// Capacity of a reused holder only grows.
    pub fn acquire(&self, size: usize) -> ValueBuffer<'_> {
        let mut values = self
            .idle
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .pop()
            .unwrap_or_default();

        values.clear();
        values.resize(size, Value::Null);

        ValueBuffer { pool: self, values }
    }

    /// Number of idle holders currently pooled
    pub fn idle_count(&self) -> usize {
        self.idle
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .len()
    }

    fn release(&self, mut values: Vec<Value>) {
        // Drop cell contents now rather than when the holder is reused
        values.clear();

        let mut idle = self
            .idle
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        if idle.len() < MAX_POOLED_BUFFERS {
            idle.push(values);
        }
    }
}

impl Default for ValuePool {
    fn default() -> Self {
        Self::new()
    }
}

/// A holder borrowed from a `ValuePool`, returned to it when dropped
#[derive(Debug)]
pub struct ValueBuffer<'a> {
    pool: &'a ValuePool,
    values: Vec<Value>,
}

impl ValueBuffer<'_> {
    pub fn capacity(&self) -> usize {
        self.values.capacity()
    }
}

impl Deref for ValueBuffer<'_> {
    type Target = [Value];

    fn deref(&self) -> &[Value] {
        &self.values
    }
}

impl DerefMut for ValueBuffer<'_> {
    fn deref_mut(&mut self) -> &mut [Value] {
        &mut self.values
    }
}

impl Drop for ValueBuffer<'_> {
    fn drop(&mut self) {
        self.pool.release(std::mem::take(&mut self.values));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_acquire_sizes_buffer() {
        let pool = ValuePool::new();
        let buf = pool.acquire(3);

        assert_eq!(buf.len(), 3);
        assert!(buf.iter().all(Value::is_null));
    }

    #[test]
    fn test_released_buffer_is_reused() {
        let pool = ValuePool::new();

        let mut buf = pool.acquire(8);
        buf[0] = Value::from("leftover");
        let capacity = buf.capacity();
        drop(buf);
        assert_eq!(pool.idle_count(), 1);

        // A smaller request reuses the same allocation and does not shrink it
        let buf = pool.acquire(2);
        assert_eq!(pool.idle_count(), 0);
        assert_eq!(buf.len(), 2);
        assert_eq!(buf.capacity(), capacity);
        assert!(buf.iter().all(Value::is_null));
    }

    #[test]
    fn test_buffer_grows_on_demand() {
        let pool = ValuePool::new();
        drop(pool.acquire(2));

        let buf = pool.acquire(16);
        assert_eq!(buf.len(), 16);
        assert!(buf.capacity() >= 16);
    }

    #[test]
    fn test_pool_depth_is_capped() {
        let pool = ValuePool::new();
        let held: Vec<_> = (0..MAX_POOLED_BUFFERS + 4).map(|_| pool.acquire(1)).collect();
        drop(held);

        assert_eq!(pool.idle_count(), MAX_POOLED_BUFFERS);
    }

    #[test]
    fn test_shared_across_threads() {
        let pool = ValuePool::new();

        std::thread::scope(|s| {
            for i in 0..4 {
                let pool = &pool;
                s.spawn(move || {
                    let mut buf = pool.acquire(i + 1);
                    buf[i] = Value::from(i);
                    assert_eq!(buf[i], Value::UInt(i as u64));
                });
            }
        });

        assert!(pool.idle_count() >= 1);
    }
}
