// Copyright 2026 The pl011-uart Authors
//
// Use of this source code is governed by a MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT

//! IRQ-Disabling Spinlock
//!
//! Driver state is shared between ordinary threads and the interrupt
//! handler, and the handler can preempt a lock holder on the same CPU. A
//! plain spinlock would deadlock there, so this lock saves and disables
//! local interrupt delivery for as long as the guard lives; the spinlock
//! underneath provides cross-core exclusion.
//!
//! Interrupt state is routed through the [`UartHardware`] capability so
//! simulated instances can observe save/restore pairing under test.

use core::mem::ManuallyDrop;
use core::ops::{Deref, DerefMut};

use crate::hw::{IrqState, UartHardware};

/// A spinlock that disables local interrupts while held.
pub struct IrqSpinLock<T> {
    inner: spin::Mutex<T>,
}

impl<T> IrqSpinLock<T> {
    pub const fn new(data: T) -> Self {
        Self {
            inner: spin::Mutex::new(data),
        }
    }

    /// Disable local interrupts, then spin until the lock is acquired.
    /// Dropping the guard releases the lock and restores the saved
    /// interrupt state, in that order.
    pub fn lock_irqsave<'a, H: UartHardware>(&'a self, hw: &'a H) -> IrqSpinLockGuard<'a, T, H> {
        let saved = hw.save_and_disable_interrupts();
        IrqSpinLockGuard {
            inner: ManuallyDrop::new(self.inner.lock()),
            hw,
            saved,
        }
    }
}

/// RAII guard for an [`IrqSpinLock`].
pub struct IrqSpinLockGuard<'a, T, H: UartHardware> {
    inner: ManuallyDrop<spin::MutexGuard<'a, T>>,
    hw: &'a H,
    saved: IrqState,
}

impl<'a, T, H: UartHardware> Drop for IrqSpinLockGuard<'a, T, H> {
    fn drop(&mut self) {
        // Release the lock before turning interrupts back on.
        unsafe { ManuallyDrop::drop(&mut self.inner) };
        self.hw.restore_interrupts(self.saved);
    }
}

impl<'a, T, H: UartHardware> Deref for IrqSpinLockGuard<'a, T, H> {
    type Target = T;

    fn deref(&self) -> &T {
        &self.inner
    }
}

impl<'a, T, H: UartHardware> DerefMut for IrqSpinLockGuard<'a, T, H> {
    fn deref_mut(&mut self) -> &mut T {
        &mut self.inner
    }
}
