// Copyright 2026 The pl011-uart Authors
//
// Use of this source code is governed by a MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT

//! Hardware Capability
//!
//! The driver never touches registers or CPU interrupt state directly; it
//! goes through [`UartHardware`]. On real hardware that is volatile MMIO
//! plus the architecture's interrupt-disable sequence ([`MmioUart`]); under
//! test it is a simulated device, which is what lets the driver exist as an
//! owned instance value with no process-wide state.

use crate::err::ConfigError;

/// Saved local interrupt state, opaque to the driver.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct IrqState(pub u64);

/// Register access and local CPU interrupt control for one UART instance.
pub trait UartHardware: Send + Sync {
    /// Read a 32-bit register at the given byte offset.
    fn read_reg(&self, offset: usize) -> u32;

    /// Write a 32-bit register at the given byte offset.
    fn write_reg(&self, offset: usize, value: u32);

    /// Disable local interrupt delivery, returning the prior state.
    fn save_and_disable_interrupts(&self) -> IrqState;

    /// Restore interrupt state previously returned by
    /// [`save_and_disable_interrupts`](UartHardware::save_and_disable_interrupts).
    fn restore_interrupts(&self, state: IrqState);

    /// Give the CPU away briefly without sleeping; the polling TX path
    /// calls this between FIFO-full rechecks.
    fn yield_cpu(&self);
}

/// Physical-to-virtual translation for the peripheral window. Owned by the
/// platform; the driver only consumes it during early init.
pub trait AddressTranslator {
    /// Map a physical MMIO address, or `None` if it cannot be mapped.
    fn phys_to_virt(&self, paddr: u64) -> Option<usize>;
}

// ============================================================================
// MMIO-backed hardware
// ============================================================================

/// Real PL011 hardware behind a mapped MMIO window.
pub struct MmioUart {
    base: usize,
}

impl MmioUart {
    /// # Safety
    ///
    /// `base` must be the virtual address of a mapped PL011 register window
    /// exclusively owned by this driver instance.
    pub unsafe fn new(base: usize) -> Self {
        Self { base }
    }

    /// Map `mmio_phys` through the translator and take ownership of the
    /// window.
    pub fn map(mmio_phys: u64, translator: &dyn AddressTranslator) -> Result<Self, ConfigError> {
        let base = translator
            .phys_to_virt(mmio_phys)
            .ok_or(ConfigError::UnmappedMmio)?;
        // Safety: the translator vouches for the mapping; exclusive
        // ownership is the platform's contract for handing us the address.
        Ok(unsafe { Self::new(base) })
    }
}

impl UartHardware for MmioUart {
    #[inline]
    fn read_reg(&self, offset: usize) -> u32 {
        unsafe { core::ptr::read_volatile((self.base + offset) as *const u32) }
    }

    #[inline]
    fn write_reg(&self, offset: usize, value: u32) {
        unsafe { core::ptr::write_volatile((self.base + offset) as *mut u32, value) }
    }

    fn save_and_disable_interrupts(&self) -> IrqState {
        #[cfg(target_arch = "x86_64")]
        {
            let was_enabled = x86_64::instructions::interrupts::are_enabled();
            x86_64::instructions::interrupts::disable();
            IrqState(u64::from(was_enabled))
        }

        #[cfg(target_arch = "aarch64")]
        {
            let daif: u64;
            unsafe {
                core::arch::asm!("mrs {0}, daif", out(reg) daif);
                core::arch::asm!("msr daifset, #2");
            }
            IrqState(daif)
        }

        #[cfg(not(any(target_arch = "x86_64", target_arch = "aarch64")))]
        {
            IrqState(0)
        }
    }

    fn restore_interrupts(&self, state: IrqState) {
        #[cfg(target_arch = "x86_64")]
        {
            if state.0 != 0 {
                x86_64::instructions::interrupts::enable();
            }
        }

        #[cfg(target_arch = "aarch64")]
        {
            unsafe {
                core::arch::asm!("msr daif, {0}", in(reg) state.0);
            }
        }

        #[cfg(not(any(target_arch = "x86_64", target_arch = "aarch64")))]
        {
            let _ = state;
        }
    }

    fn yield_cpu(&self) {
        core::hint::spin_loop();
    }
}
