// Copyright 2026 The pl011-uart Authors
//
// Use of this source code is governed by a MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT

//! PL011 Register Map
//!
//! Register offsets and bit definitions for the ARM PrimeCell PL011 UART.
//!
//! | Offset | Name    | Description                |
//! |--------|---------|----------------------------|
//! | 0x00   | DR      | Data Register              |
//! | 0x04   | RSR     | Receive Status Register    |
//! | 0x18   | FR      | Flag Register              |
//! | 0x24   | IBRD    | Integer Baud Rate Divisor  |
//! | 0x28   | FBRD    | Fractional Baud Rate Div.  |
//! | 0x2C   | LCRH    | Line Control Register      |
//! | 0x30   | CR      | Control Register           |
//! | 0x34   | IFLS    | Interrupt FIFO Level Select|
//! | 0x38   | IMSC    | Interrupt Mask Set/Clear   |
//! | 0x3C   | TRIS    | Raw Interrupt Status       |
//! | 0x40   | TMIS    | Masked Interrupt Status    |
//! | 0x44   | ICR     | Interrupt Clear Register   |
//! | 0x48   | DMACR   | DMA Control Register       |

use bitflags::bitflags;

// ============================================================================
// Register Offsets
// ============================================================================

pub const UART_DR: usize = 0x00; // Data Register
pub const UART_RSR: usize = 0x04; // Receive Status Register
pub const UART_FR: usize = 0x18; // Flag Register
pub const UART_ILPR: usize = 0x20; // IrDA Low-Power Counter
pub const UART_IBRD: usize = 0x24; // Integer Baud Rate Divisor
pub const UART_FBRD: usize = 0x28; // Fractional Baud Rate Divisor
pub const UART_LCRH: usize = 0x2C; // Line Control Register
pub const UART_CR: usize = 0x30; // Control Register
pub const UART_IFLS: usize = 0x34; // Interrupt FIFO Level Select
pub const UART_IMSC: usize = 0x38; // Interrupt Mask Set/Clear
pub const UART_TRIS: usize = 0x3C; // Raw Interrupt Status
pub const UART_TMIS: usize = 0x40; // Masked Interrupt Status
pub const UART_ICR: usize = 0x44; // Interrupt Clear Register
pub const UART_DMACR: usize = 0x48; // DMA Control Register

// ============================================================================
// Register Bits
// ============================================================================

bitflags! {
    /// Flag Register (FR) bits.
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct Flags: u32 {
        /// TX FIFO empty
        const TXFE = 1 << 7;
        /// RX FIFO full
        const RXFF = 1 << 6;
        /// TX FIFO full
        const TXFF = 1 << 5;
        /// RX FIFO empty
        const RXFE = 1 << 4;
        /// UART busy
        const BUSY = 1 << 3;
    }
}

bitflags! {
    /// Interrupt source bits, shared by IMSC, TRIS, TMIS and ICR.
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct Interrupts: u32 {
        /// Overrun error
        const OE = 1 << 10;
        /// Break error
        const BE = 1 << 9;
        /// Parity error
        const PE = 1 << 8;
        /// Framing error
        const FE = 1 << 7;
        /// Receive timeout
        const RT = 1 << 6;
        /// Transmit (FIFO ready for more data)
        const TX = 1 << 5;
        /// Receive
        const RX = 1 << 4;
    }
}

bitflags! {
    /// Control Register (CR) bits.
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct Control: u32 {
        /// CTS hardware flow control enable
        const CTSEN = 1 << 15;
        /// RTS hardware flow control enable
        const RTSEN = 1 << 14;
        /// Request to send
        const RTS = 1 << 11;
        /// Receive enable
        const RXE = 1 << 9;
        /// Transmit enable
        const TXE = 1 << 8;
        /// Loopback enable
        const LBE = 1 << 7;
        /// UART enable
        const UARTEN = 1 << 0;
    }
}

// ============================================================================
// Constants
// ============================================================================

/// ICR value that clears every interrupt source, including the modem bits
/// below the range `Interrupts` models.
pub const ICR_ALL_CLEAR: u32 = 0x3FF;

/// Default FIFO trigger level: 1/8 RX FIFO, 1/8 TX FIFO.
pub const IFLS_DEFAULT: u32 = 0;

/// Default capacity of the software RX ring buffer, in bytes.
pub const RXBUF_SIZE: usize = 16;
