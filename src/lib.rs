// Copyright 2026 The pl011-uart Authors
//
// Use of this source code is governed by a MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT

//! PL011 UART Driver
//!
//! Interrupt-driven driver core for the ARM PrimeCell PL011 UART: an RX
//! path that drains the hardware FIFO into a software ring with
//! mask-based backpressure, a TX path that blocks on a coalescing wake
//! signal (or polls) when the FIFO fills, and a lock-free polled path for
//! panic-time use.
//!
//! The driver is one owned [`Pl011Uart`] value per device. Hardware
//! access, address translation and the interrupt controller are consumed
//! as capabilities, so the same code runs against MMIO on a real system
//! and against simulated devices under test.
//!
//! # Bring-up
//!
//! ```ignore
//! let config = UartConfig::new(mmio_phys, irq);
//! let uart = Arc::new(Pl011Uart::from_platform(&config, &translator)?);
//! // Early console output works from here (polling).
//! Pl011Uart::init(&uart, &interrupt_controller, &config)?;
//! // Interrupt-driven RX/TX works from here.
//! ```

#![cfg_attr(not(test), no_std)]

extern crate alloc;

pub mod cbuf;
pub mod config;
pub mod err;
pub mod hw;
pub mod interrupt;
pub mod regs;
pub mod sync;
pub mod uart;

#[cfg(test)]
pub(crate) mod testutil;

pub use config::UartConfig;
pub use err::ConfigError;
pub use hw::{AddressTranslator, IrqState, MmioUart, UartHardware};
pub use interrupt::{InterruptController, InterruptEoi, InterruptSink};
pub use uart::{Pl011Uart, UartDriver};
