// Copyright 2026 The pl011-uart Authors
//
// Use of this source code is governed by a MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT

//! PL011 UART Driver Core
//!
//! One [`Pl011Uart`] value is one logical device instance; nothing here is
//! process-wide, so tests run multiple simulated instances side by side.
//!
//! The synchronization contract:
//!
//! - **RX**: the interrupt handler drains the hardware FIFO into the
//!   software ring buffer. When the ring fills, the handler masks the
//!   receive sources instead of dropping bytes; the consumer re-arms them
//!   after every successful read. Both the fullness check and the mask
//!   decision happen under the ring buffer's lock, so neither side can
//!   observe the other mid-decision. Hardware FIFO overrun while masked
//!   loses bytes silently; backpressure is preferred over buffering
//!   guarantees and the loss is never surfaced.
//! - **TX**: for the PL011, the TX interrupt means "ready to transmit", so
//!   it stays masked except while a blocked writer is waiting for FIFO
//!   space. Writers and the handler serialize over the FIFO and the wake
//!   event through an interrupt-disabling spinlock.
//! - **Panic**: once [`start_panic`] runs, blocking TX is permanently off
//!   and the polled `pputc`/`pgetc` pair works with no locks at all, on
//!   the assumption that other contexts are halted.
//!
//! [`start_panic`]: Pl011Uart::start_panic

use alloc::sync::Arc;
use alloc::vec;
use core::sync::atomic::{AtomicBool, Ordering};

use log::info;

use crate::cbuf::Cbuf;
use crate::config::UartConfig;
use crate::err::ConfigError;
use crate::hw::{AddressTranslator, MmioUart, UartHardware};
use crate::interrupt::{InterruptController, InterruptEoi, InterruptSink};
use crate::regs::*;
use crate::sync::{AutounsignalEvent, IrqSpinLock};

// ============================================================================
// Driver ops surface
// ============================================================================

/// The operations a platform holds a UART behind once it is brought up.
pub trait UartDriver: Send + Sync {
    /// Read one received byte. `None` means "nothing available right now"
    /// and is only possible with `wait = false`.
    fn getc(&self, wait: bool) -> Option<u8>;

    /// Transmit `data` in order. See [`Pl011Uart::write`].
    fn write(&self, data: &[u8], block: bool, map_newline: bool);

    /// Panic-time polled transmit of one byte.
    fn pputc(&self, c: u8);

    /// Panic-time polled receive. `None` if the hardware FIFO is empty.
    fn pgetc(&self) -> Option<u8>;

    /// Enter panic mode: permanently disable interrupt-driven TX.
    fn start_panic(&self);
}

// ============================================================================
// Driver instance
// ============================================================================

/// One PL011 device instance.
pub struct Pl011Uart<H: UartHardware> {
    hw: H,
    irq: u32,
    /// Software RX ring. The lock also covers the RX interrupt mask
    /// decision, see the module docs.
    rx_buf: IrqSpinLock<Cbuf>,
    rx_event: AutounsignalEvent,
    /// Serializes writers and the interrupt handler over the TX FIFO and
    /// the wake event.
    tx_lock: IrqSpinLock<()>,
    tx_event: AutounsignalEvent,
    tx_irq_enabled: AtomicBool,
}

impl Pl011Uart<MmioUart> {
    /// Build an instance from boot configuration, mapping the MMIO window
    /// through the platform's translator. Fatal if the base or IRQ line is
    /// missing or the window cannot be mapped.
    pub fn from_platform(
        config: &UartConfig,
        translator: &dyn AddressTranslator,
    ) -> Result<Self, ConfigError> {
        if config.mmio_phys == 0 {
            return Err(ConfigError::MissingMmioBase);
        }
        let hw = MmioUart::map(config.mmio_phys, translator)?;
        Self::init_early(hw, config.irq)
    }
}

impl<H: UartHardware> Pl011Uart<H> {
    /// Minimal bring-up usable before general interrupt dispatch exists:
    /// validates the IRQ line and enables transmit. Everything else waits
    /// for [`init`](Pl011Uart::init).
    pub fn init_early(hw: H, irq: u32) -> Result<Self, ConfigError> {
        if irq == 0 {
            return Err(ConfigError::MissingIrq);
        }
        let uart = Self {
            hw,
            irq,
            rx_buf: IrqSpinLock::new(Cbuf::new()),
            rx_event: AutounsignalEvent::new(),
            tx_lock: IrqSpinLock::new(()),
            tx_event: AutounsignalEvent::new(),
            tx_irq_enabled: AtomicBool::new(false),
        };
        uart.hw
            .write_reg(UART_CR, (Control::TXE | Control::UARTEN).bits());
        Ok(uart)
    }

    /// Full bring-up: allocate the RX ring, register with the interrupt
    /// controller, enable receive and start interrupt-driven operation.
    /// Takes the driver through an `Arc` because the interrupt controller
    /// keeps a sink reference to it.
    ///
    /// This is the last allocation the driver ever makes; every operation
    /// after it reports failure through explicit values only.
    pub fn init(
        uart: &Arc<Self>,
        intc: &dyn InterruptController,
        config: &UartConfig,
    ) -> Result<(), ConfigError>
    where
        H: 'static,
    {
        if config.rx_buffer_size == 0 {
            return Err(ConfigError::ZeroRxBuffer);
        }
        uart.rx_buf
            .lock_irqsave(&uart.hw)
            .initialize(vec![0u8; config.rx_buffer_size].into_boxed_slice());

        let sink: Arc<dyn InterruptSink> = Arc::<Self>::clone(uart);
        intc.register_handler(uart.irq, sink)?;

        uart.hw.write_reg(UART_ICR, ICR_ALL_CLEAR);
        uart.hw.write_reg(UART_IFLS, IFLS_DEFAULT);
        uart.hw
            .write_reg(UART_IMSC, (Interrupts::RX | Interrupts::RT).bits());
        let cr = uart.hw.read_reg(UART_CR);
        uart.hw.write_reg(UART_CR, cr | Control::RXE.bits());
        intc.unmask_interrupt(uart.irq);

        if config.tx_bypass {
            uart.tx_irq_enabled.store(false, Ordering::Release);
        } else {
            info!("uart: started IRQ driven TX");
            uart.tx_irq_enabled.store(true, Ordering::Release);
        }
        Ok(())
    }

    /// Whether blocking writes currently use interrupt-driven TX.
    pub fn tx_irq_enabled(&self) -> bool {
        self.tx_irq_enabled.load(Ordering::Acquire)
    }

    fn flags(&self) -> Flags {
        Flags::from_bits_truncate(self.hw.read_reg(UART_FR))
    }

    fn mask_tx(&self) {
        let imsc = self.hw.read_reg(UART_IMSC);
        self.hw.write_reg(UART_IMSC, imsc & !Interrupts::TX.bits());
    }

    fn unmask_tx(&self) {
        let imsc = self.hw.read_reg(UART_IMSC);
        self.hw.write_reg(UART_IMSC, imsc | Interrupts::TX.bits());
    }

    fn mask_rx(&self) {
        let imsc = self.hw.read_reg(UART_IMSC);
        self.hw
            .write_reg(UART_IMSC, imsc & !(Interrupts::RX | Interrupts::RT).bits());
    }

    fn unmask_rx(&self) {
        let imsc = self.hw.read_reg(UART_IMSC);
        self.hw
            .write_reg(UART_IMSC, imsc | (Interrupts::RX | Interrupts::RT).bits());
    }

    // ------------------------------------------------------------------------
    // Interrupt handler
    // ------------------------------------------------------------------------

    /// Device interrupt dispatch. Runs in interrupt context: bounded time,
    /// never suspends.
    pub fn handle_irq(&self) -> InterruptEoi {
        let isr = Interrupts::from_bits_truncate(self.hw.read_reg(UART_TMIS));

        if isr.intersects(Interrupts::RX | Interrupts::RT) {
            let mut delivered = false;
            // While the hardware FIFO has bytes, move them into the ring.
            while !self.flags().contains(Flags::RXFE) {
                let mut rx_buf = self.rx_buf.lock_irqsave(&self.hw);
                if rx_buf.is_full() {
                    // Out of ring space: mask instead of dropping. Bytes
                    // still in the hardware FIFO stay there; if it
                    // overruns while masked, those bytes are lost.
                    self.mask_rx();
                    break;
                }
                let c = (self.hw.read_reg(UART_DR) & 0xFF) as u8;
                rx_buf.push(c);
                delivered = true;
            }
            if delivered {
                self.rx_event.signal();
            }
        }

        if isr.contains(Interrupts::TX) {
            // Wake one blocked writer and mask TX again; it would keep
            // firing until a waiter re-arms it by blocking.
            let guard = self.tx_lock.lock_irqsave(&self.hw);
            self.tx_event.signal();
            self.mask_tx();
            drop(guard);
        }

        InterruptEoi::Deactivate
    }

    // ------------------------------------------------------------------------
    // RX consumer side
    // ------------------------------------------------------------------------

    /// Read one byte from the RX ring.
    ///
    /// With `wait = false` an empty ring returns `None` immediately and
    /// mutates nothing. With `wait = true` the caller suspends until the
    /// interrupt handler delivers a byte.
    pub fn getc(&self, wait: bool) -> Option<u8> {
        loop {
            {
                let mut rx_buf = self.rx_buf.lock_irqsave(&self.hw);
                if let Some(c) = rx_buf.pop() {
                    // Re-arm the receive sources under the same lock the
                    // handler holds for its mask decision, so a slot freed
                    // here is never missed.
                    self.unmask_rx();
                    return Some(c);
                }
            }
            if !wait {
                return None;
            }
            self.rx_event.wait();
        }
    }

    // ------------------------------------------------------------------------
    // TX path
    // ------------------------------------------------------------------------

    /// Transmit `data` in order.
    ///
    /// With `map_newline`, every `\n` is preceded by an injected `\r`; the
    /// injection consumes one extra FIFO slot and the original `\n` goes
    /// out on the following step.
    ///
    /// When the hardware FIFO is full: with `block = true` and
    /// interrupt-driven TX enabled, the caller unmasks the TX interrupt
    /// and suspends on the wake event; otherwise it yields the CPU and
    /// polls. Either way the fullness check repeats after every wake, since
    /// wakes carry no guarantee of space. The lock is released around both
    /// kinds of waiting and between bytes, so concurrent writers may
    /// interleave at byte granularity while one is parked.
    pub fn write(&self, data: &[u8], block: bool, map_newline: bool) {
        let block = block && self.tx_irq_enabled.load(Ordering::Acquire);
        let mut pending_cr = false;
        let mut i = 0;

        while i < data.len() {
            let c = data[i];
            let mut guard = self.tx_lock.lock_irqsave(&self.hw);
            while self.flags().contains(Flags::TXFF) {
                if block {
                    // Arm the "ready to transmit" interrupt before parking.
                    self.unmask_tx();
                    drop(guard);
                    self.tx_event.wait();
                } else {
                    drop(guard);
                    self.hw.yield_cpu();
                }
                guard = self.tx_lock.lock_irqsave(&self.hw);
            }
            if map_newline && c == b'\n' && !pending_cr {
                pending_cr = true;
                self.hw.write_reg(UART_DR, u32::from(b'\r'));
            } else {
                pending_cr = false;
                self.hw.write_reg(UART_DR, u32::from(c));
                i += 1;
            }
            drop(guard);
        }
    }

    // ------------------------------------------------------------------------
    // Panic-time path
    // ------------------------------------------------------------------------

    /// Permanently disable interrupt-driven TX. Called once when the
    /// system can no longer trust scheduling or interrupt delivery; there
    /// is no way back.
    pub fn start_panic(&self) {
        self.tx_irq_enabled.store(false, Ordering::Release);
    }

    /// Polled transmit of one byte: spin on FIFO-full, then write. No
    /// locking; panic mode assumes a single running context.
    pub fn pputc(&self, c: u8) {
        while self.flags().contains(Flags::TXFF) {
            core::hint::spin_loop();
        }
        self.hw.write_reg(UART_DR, u32::from(c));
    }

    /// Polled receive of one byte straight from the hardware FIFO,
    /// bypassing the RX ring. `None` if the FIFO is empty.
    pub fn pgetc(&self) -> Option<u8> {
        if self.flags().contains(Flags::RXFE) {
            return None;
        }
        Some((self.hw.read_reg(UART_DR) & 0xFF) as u8)
    }
}

impl<H: UartHardware + 'static> InterruptSink for Pl011Uart<H> {
    fn on_interrupt(&self) -> InterruptEoi {
        self.handle_irq()
    }
}

impl<H: UartHardware> UartDriver for Pl011Uart<H> {
    fn getc(&self, wait: bool) -> Option<u8> {
        Pl011Uart::getc(self, wait)
    }

    fn write(&self, data: &[u8], block: bool, map_newline: bool) {
        Pl011Uart::write(self, data, block, map_newline)
    }

    fn pputc(&self, c: u8) {
        Pl011Uart::pputc(self, c)
    }

    fn pgetc(&self) -> Option<u8> {
        Pl011Uart::pgetc(self)
    }

    fn start_panic(&self) {
        Pl011Uart::start_panic(self)
    }
}

// ============================================================================
// Tests
// ============================================================================
