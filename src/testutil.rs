// Copyright 2026 The pl011-uart Authors
//
// Use of this source code is governed by a MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT

//! Test Doubles
//!
//! A simulated PL011 ([`FakeUart`]) plus fake platform collaborators, so
//! driver tests run real interleavings against recorded hardware state.
//! The fake models exactly the register semantics the driver relies on:
//! FR fullness/emptiness, DR FIFO movement, IMSC masking and the derived
//! TMIS status.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::{Arc, Mutex};

use crate::err::ConfigError;
use crate::hw::{AddressTranslator, IrqState, UartHardware};
use crate::interrupt::{InterruptController, InterruptEoi, InterruptSink};
use crate::regs::*;

#[derive(Default)]
struct FakeRegs {
    imsc: u32,
    cr: u32,
    ifls: u32,
    rx_fifo: VecDeque<u8>,
    tx_fifo: VecDeque<u8>,
    /// Every byte ever written to DR, in order.
    tx_log: Vec<u8>,
    /// FR reads that observed TXFF set.
    tx_full_reads: u64,
}

struct Inner {
    regs: Mutex<FakeRegs>,
    tx_fifo_depth: usize,
    irq_disable_depth: AtomicI64,
}

/// Simulated PL011 device. Clones share the same underlying device state,
/// so a test can hand one clone to the driver and poke the other.
#[derive(Clone)]
pub struct FakeUart {
    inner: Arc<Inner>,
}

impl FakeUart {
    pub fn new(tx_fifo_depth: usize) -> Self {
        assert!(tx_fifo_depth > 0);
        Self {
            inner: Arc::new(Inner {
                regs: Mutex::new(FakeRegs::default()),
                tx_fifo_depth,
                irq_disable_depth: AtomicI64::new(0),
            }),
        }
    }

    /// Simulate bytes arriving on the wire into the hardware RX FIFO.
    pub fn push_rx(&self, bytes: &[u8]) {
        let mut r = self.inner.regs.lock().unwrap();
        r.rx_fifo.extend(bytes.iter().copied());
    }

    /// Simulate the transmitter sending up to `n` bytes out of the FIFO.
    pub fn drain_tx(&self, n: usize) -> Vec<u8> {
        let mut r = self.inner.regs.lock().unwrap();
        let mut out = Vec::new();
        for _ in 0..n {
            match r.tx_fifo.pop_front() {
                Some(b) => out.push(b),
                None => break,
            }
        }
        out
    }

    /// Every byte the driver has written to DR, in order, drained or not.
    pub fn tx_bytes(&self) -> Vec<u8> {
        self.inner.regs.lock().unwrap().tx_log.clone()
    }

    pub fn rx_fifo_len(&self) -> usize {
        self.inner.regs.lock().unwrap().rx_fifo.len()
    }

    pub fn cr(&self) -> u32 {
        self.inner.regs.lock().unwrap().cr
    }

    /// Whether both receive sources (RX and timeout) are unmasked.
    pub fn rx_enabled(&self) -> bool {
        let imsc = Interrupts::from_bits_truncate(self.inner.regs.lock().unwrap().imsc);
        imsc.contains(Interrupts::RX | Interrupts::RT)
    }

    pub fn tx_irq_unmasked(&self) -> bool {
        let imsc = Interrupts::from_bits_truncate(self.inner.regs.lock().unwrap().imsc);
        imsc.contains(Interrupts::TX)
    }

    /// Force the TX interrupt mask bit, as a parked writer would.
    pub fn set_imsc_tx(&self, unmasked: bool) {
        let mut r = self.inner.regs.lock().unwrap();
        if unmasked {
            r.imsc |= Interrupts::TX.bits();
        } else {
            r.imsc &= !Interrupts::TX.bits();
        }
    }

    pub fn tx_full_reads(&self) -> u64 {
        self.inner.regs.lock().unwrap().tx_full_reads
    }

    /// Current nesting of save-and-disable calls minus restores.
    pub fn irq_disable_depth(&self) -> i64 {
        self.inner.irq_disable_depth.load(Ordering::SeqCst)
    }
}

impl UartHardware for FakeUart {
    fn read_reg(&self, offset: usize) -> u32 {
        let mut r = self.inner.regs.lock().unwrap();
        match offset {
            UART_FR => {
                let mut fr = Flags::empty();
                if r.rx_fifo.is_empty() {
                    fr |= Flags::RXFE;
                }
                if r.tx_fifo.len() >= self.inner.tx_fifo_depth {
                    fr |= Flags::TXFF;
                    r.tx_full_reads += 1;
                }
                if r.tx_fifo.is_empty() {
                    fr |= Flags::TXFE;
                }
                fr.bits()
            }
            UART_DR => r.rx_fifo.pop_front().map_or(0, u32::from),
            UART_IMSC => r.imsc,
            UART_TMIS => {
                let mut isr = 0;
                if !r.rx_fifo.is_empty() {
                    isr |= r.imsc & (Interrupts::RX | Interrupts::RT).bits();
                }
                if r.tx_fifo.len() < self.inner.tx_fifo_depth {
                    isr |= r.imsc & Interrupts::TX.bits();
                }
                isr
            }
            UART_CR => r.cr,
            UART_IFLS => r.ifls,
            _ => 0,
        }
    }

    fn write_reg(&self, offset: usize, value: u32) {
        let mut r = self.inner.regs.lock().unwrap();
        match offset {
            UART_DR => {
                // The driver only writes when FR reported space.
                if r.tx_fifo.len() < self.inner.tx_fifo_depth {
                    let b = (value & 0xFF) as u8;
                    r.tx_fifo.push_back(b);
                    r.tx_log.push(b);
                }
            }
            UART_IMSC => r.imsc = value,
            UART_CR => r.cr = value,
            UART_IFLS => r.ifls = value,
            UART_ICR => {}
            _ => {}
        }
    }

    fn save_and_disable_interrupts(&self) -> IrqState {
        self.inner.irq_disable_depth.fetch_add(1, Ordering::SeqCst);
        IrqState(0)
    }

    fn restore_interrupts(&self, _state: IrqState) {
        self.inner.irq_disable_depth.fetch_sub(1, Ordering::SeqCst);
    }

    fn yield_cpu(&self) {
        std::thread::yield_now();
    }
}

/// Recording interrupt controller.
#[derive(Default)]
pub struct FakeIntc {
    registered: Mutex<Vec<(u32, Arc<dyn InterruptSink>)>>,
    unmasked: Mutex<Vec<u32>>,
}

impl FakeIntc {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn registered_irqs(&self) -> Vec<u32> {
        self.registered
            .lock()
            .unwrap()
            .iter()
            .map(|(irq, _)| *irq)
            .collect()
    }

    pub fn unmasked_irqs(&self) -> Vec<u32> {
        self.unmasked.lock().unwrap().clone()
    }

    /// Deliver an interrupt to the sink registered for `irq`.
    pub fn dispatch(&self, irq: u32) -> Option<InterruptEoi> {
        let sink = self
            .registered
            .lock()
            .unwrap()
            .iter()
            .find(|(line, _)| *line == irq)
            .map(|(_, sink)| Arc::clone(sink))?;
        Some(sink.on_interrupt())
    }
}

impl InterruptController for FakeIntc {
    fn register_handler(
        &self,
        irq: u32,
        sink: Arc<dyn InterruptSink>,
    ) -> Result<(), ConfigError> {
        self.registered.lock().unwrap().push((irq, sink));
        Ok(())
    }

    fn unmask_interrupt(&self, irq: u32) {
        self.unmasked.lock().unwrap().push(irq);
    }
}

/// Translator with nothing mapped; init must treat this as fatal.
pub struct NullTranslator;

impl AddressTranslator for NullTranslator {
    fn phys_to_virt(&self, _paddr: u64) -> Option<usize> {
        None
    }
}
