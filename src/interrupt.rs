// Copyright 2026 The pl011-uart Authors
//
// Use of this source code is governed by a MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT

//! Interrupt-Controller Capability
//!
//! The driver does not own interrupt dispatch; it registers itself as a
//! sink with whatever controller the platform provides (GIC, APIC, a test
//! double) and receives calls through a single dispatch entry point.

use alloc::sync::Arc;

use crate::err::ConfigError;

/// End-of-interrupt disposition returned by a sink.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InterruptEoi {
    /// Acknowledge and deactivate the interrupt at the controller.
    Deactivate,
}

/// A device-side interrupt handler with a single dispatch entry point.
///
/// Implementations must complete in bounded time and never suspend.
pub trait InterruptSink: Send + Sync {
    fn on_interrupt(&self) -> InterruptEoi;
}

/// The platform's interrupt controller, as consumed by this driver.
pub trait InterruptController {
    /// Attach `sink` to `irq` so the controller dispatches to it.
    fn register_handler(
        &self,
        irq: u32,
        sink: Arc<dyn InterruptSink>,
    ) -> Result<(), ConfigError>;

    /// Allow `irq` to be delivered.
    fn unmask_interrupt(&self, irq: u32);
}
