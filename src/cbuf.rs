// Copyright 2026 The pl011-uart Authors
//
// Use of this source code is governed by a MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT

//! Circular Buffer
//!
//! Fixed-capacity byte queue between the RX interrupt handler (sole
//! producer) and the reader thread (sole consumer). The queue itself needs
//! no internal locking for that pairing; the driver wraps it in a lock only
//! so the interrupt mask decision can be made atomically with the fullness
//! observation.
//!
//! Storage is handed in once at initialization and never resized.

use alloc::boxed::Box;

/// Fixed-capacity byte ring.
pub struct Cbuf {
    buf: Option<Box<[u8]>>,
    head: usize,
    tail: usize,
    count: usize,
}

impl Cbuf {
    /// An uninitialized buffer with no storage. Until [`initialize`] is
    /// called it reports itself full, so producers back off rather than
    /// write into nothing.
    ///
    /// [`initialize`]: Cbuf::initialize
    pub const fn new() -> Self {
        Self {
            buf: None,
            head: 0,
            tail: 0,
            count: 0,
        }
    }

    /// Install the backing storage. One-time: a second call, or zero-length
    /// storage, is a driver bug and panics.
    pub fn initialize(&mut self, storage: Box<[u8]>) {
        assert!(self.buf.is_none(), "cbuf: already initialized");
        assert!(!storage.is_empty(), "cbuf: zero capacity");
        self.buf = Some(storage);
    }

    pub fn is_initialized(&self) -> bool {
        self.buf.is_some()
    }

    pub fn capacity(&self) -> usize {
        self.buf.as_ref().map_or(0, |b| b.len())
    }

    pub fn len(&self) -> usize {
        self.count
    }

    pub fn is_empty(&self) -> bool {
        self.count == 0
    }

    pub fn is_full(&self) -> bool {
        self.count == self.capacity()
    }

    /// Append a byte. Producer-side only; the caller must have already
    /// checked [`is_full`], pushing into a full buffer is a contract
    /// violation rather than a runtime-checked error.
    ///
    /// [`is_full`]: Cbuf::is_full
    pub fn push(&mut self, c: u8) {
        debug_assert!(!self.is_full(), "cbuf: push into full buffer");
        let buf = match self.buf.as_mut() {
            Some(buf) => buf,
            None => return,
        };
        buf[self.head] = c;
        self.head = (self.head + 1) % buf.len();
        self.count += 1;
    }

    /// Remove and return the oldest byte, or `None` if empty. An empty pop
    /// does not mutate any state.
    pub fn pop(&mut self) -> Option<u8> {
        if self.count == 0 {
            return None;
        }
        let buf = self.buf.as_ref()?;
        let c = buf[self.tail];
        self.tail = (self.tail + 1) % buf.len();
        self.count -= 1;
        Some(c)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::vec;

    fn cbuf(capacity: usize) -> Cbuf {
        let mut c = Cbuf::new();
        c.initialize(vec![0u8; capacity].into_boxed_slice());
        c
    }

    #[test]
    fn test_uninitialized_reports_full() {
        let c = Cbuf::new();
        assert!(!c.is_initialized());
        assert_eq!(c.capacity(), 0);
        assert!(c.is_full());
        assert!(c.is_empty());
    }

    #[test]
    #[should_panic(expected = "already initialized")]
    fn test_double_initialize_panics() {
        let mut c = cbuf(4);
        c.initialize(vec![0u8; 4].into_boxed_slice());
    }

    #[test]
    #[should_panic(expected = "zero capacity")]
    fn test_zero_capacity_panics() {
        let mut c = Cbuf::new();
        c.initialize(vec![0u8; 0].into_boxed_slice());
    }

    #[test]
    fn test_push_pop_fifo_order() {
        let mut c = cbuf(8);
        for &b in b"hello" {
            c.push(b);
        }
        assert_eq!(c.len(), 5);
        for &b in b"hello" {
            assert_eq!(c.pop(), Some(b));
        }
        assert_eq!(c.pop(), None);
    }

    #[test]
    fn test_pop_empty_does_not_mutate() {
        let mut c = cbuf(4);
        assert_eq!(c.pop(), None);
        assert!(c.is_empty());
        assert_eq!(c.len(), 0);

        c.push(b'x');
        assert_eq!(c.pop(), Some(b'x'));
        assert_eq!(c.pop(), None);
        assert_eq!(c.len(), 0);
    }

    #[test]
    fn test_fills_to_exact_capacity() {
        let mut c = cbuf(4);
        for &b in b"ABCD" {
            assert!(!c.is_full());
            c.push(b);
        }
        assert!(c.is_full());
        assert_eq!(c.len(), 4);

        assert_eq!(c.pop(), Some(b'A'));
        assert!(!c.is_full());
    }

    #[test]
    fn test_wraparound_preserves_order() {
        let mut c = cbuf(4);
        for round in 0u8..10 {
            c.push(round);
            c.push(round.wrapping_add(100));
            assert_eq!(c.pop(), Some(round));
            assert_eq!(c.pop(), Some(round.wrapping_add(100)));
        }
        assert!(c.is_empty());
    }
}
