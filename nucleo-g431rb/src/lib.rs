//! CAN-FD diagnostic firmware for the Nucleo-G431RB board.
//!
//! To use this crate on other STM32G4 boards, update the chip name in `Cargo.toml`
//! and `.cargo/config.toml`.
//!
//! The `transmitter` feature selects the transmitter role, the receiver runs otherwise.
//! The `loop-back` feature starts the bus in external loop-back mode, which requires no
//! transceiver. Output frames can then be observed on the PA12 pin.
//!
//! Debug lines go to LPUART1 (PA2, ST-LINK virtual COM port) and USART1 (PC4), 115200 8N1.

#![no_std]

pub mod board;
pub mod sink;
pub mod transport;

use fdcan_diag::link::Clock;
use fdcan_diag::time::Instant;

/// Embassy time driver clock
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Instant {
        Instant::now()
    }
}
