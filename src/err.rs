// Copyright 2026 The pl011-uart Authors
//
// Use of this source code is governed by a MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT

//! Driver Error Codes
//!
//! Initialization is the only phase that can fail with an error value; the
//! driver cannot exist without a valid MMIO base and IRQ line, so these are
//! fatal to startup. After init, transient conditions (empty buffer, full
//! FIFO) are reported as `Option` sentinels and hardware overrun loss is
//! silently accepted, never surfaced.

use core::fmt;

/// Fatal configuration errors reported during driver initialization.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigError {
    /// No MMIO base address was supplied.
    MissingMmioBase,
    /// No IRQ line was supplied.
    MissingIrq,
    /// The MMIO base could not be mapped into the virtual address space.
    UnmappedMmio,
    /// The RX ring buffer was configured with zero capacity.
    ZeroRxBuffer,
    /// The interrupt controller refused the handler registration.
    HandlerRegistration,
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::MissingMmioBase => write!(f, "missing MMIO base address"),
            ConfigError::MissingIrq => write!(f, "missing IRQ line"),
            ConfigError::UnmappedMmio => write!(f, "MMIO base could not be mapped"),
            ConfigError::ZeroRxBuffer => write!(f, "RX buffer capacity is zero"),
            ConfigError::HandlerRegistration => {
                write!(f, "interrupt handler registration failed")
            }
        }
    }
}
