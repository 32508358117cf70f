// Copyright 2026 The pl011-uart Authors
//
// Use of this source code is governed by a MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT

//! Autounsignal Event
//!
//! A coalescing, level-triggered wake signal. Any number of `signal` calls
//! before a `wait` collapse into a single pending wake; `wait` consumes the
//! signal and returns. There is no count and no payload, so a woken waiter
//! must recheck whatever condition it was waiting for.

use core::sync::atomic::{AtomicBool, AtomicU64, Ordering};

/// Auto-resetting wake signal.
pub struct AutounsignalEvent {
    signaled: AtomicBool,
    waits: AtomicU64,
}

impl AutounsignalEvent {
    pub const fn new() -> Self {
        Self {
            signaled: AtomicBool::new(false),
            waits: AtomicU64::new(0),
        }
    }

    /// Mark the event signaled. Wakes at most one waiter; repeated signals
    /// before a wait coalesce.
    pub fn signal(&self) {
        self.signaled.store(true, Ordering::Release);
    }

    /// Consume a pending signal, spinning until one is present. A wake says
    /// only that something changed; callers recheck their condition.
    pub fn wait(&self) {
        self.waits.fetch_add(1, Ordering::Relaxed);
        while !self.signaled.swap(false, Ordering::AcqRel) {
            core::hint::spin_loop();
        }
    }

    pub fn is_signaled(&self) -> bool {
        self.signaled.load(Ordering::Acquire)
    }

    /// Number of times `wait` has been entered over the life of the event.
    pub fn wait_count(&self) -> u64 {
        self.waits.load(Ordering::Relaxed)
    }
}

impl Default for AutounsignalEvent {
    fn default() -> Self {
        Self::new()
    }
}
