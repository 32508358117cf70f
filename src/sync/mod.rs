// Copyright 2026 The pl011-uart Authors
//
// Use of this source code is governed by a MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT

//! Synchronization Primitives
//!
//! The two primitives the driver needs to mediate between interrupt
//! context and blocked callers:
//!
//! - [`spin::IrqSpinLock`]: a spinlock that also disables local CPU
//!   interrupts while held, so an interrupt handler on the same CPU cannot
//!   deadlock against a lock holder.
//! - [`event::AutounsignalEvent`]: a coalescing, auto-resetting wake
//!   signal carrying no count, only "something changed, recheck".

pub mod event;
pub mod spin;

pub use event::AutounsignalEvent;
pub use spin::{IrqSpinLock, IrqSpinLockGuard};
