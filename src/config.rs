// Copyright 2026 The pl011-uart Authors
//
// Use of this source code is governed by a MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT

//! Driver Configuration
//!
//! The values here come from boot-time configuration (device tree, ZBI,
//! command line); parsing them is the platform's job, the driver only
//! validates what it is handed.

use crate::regs::RXBUF_SIZE;

/// Boot-supplied configuration for one UART instance.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UartConfig {
    /// Physical address of the MMIO register window.
    pub mmio_phys: u64,
    /// IRQ line the device is wired to.
    pub irq: u32,
    /// Capacity of the software RX ring buffer, in bytes.
    pub rx_buffer_size: usize,
    /// Skip interrupt-driven TX entirely (e.g. a log-bypass boot mode).
    /// Blocking writes then fall back to polling.
    pub tx_bypass: bool,
}

impl UartConfig {
    /// Configuration with the driver's default buffer size and TX mode.
    pub fn new(mmio_phys: u64, irq: u32) -> Self {
        Self {
            mmio_phys,
            irq,
            rx_buffer_size: RXBUF_SIZE,
            tx_bypass: false,
        }
    }
}
