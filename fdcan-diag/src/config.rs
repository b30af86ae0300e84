//! Firmware configuration
//!
//! All values are fixed at compile time. `Config` is assembled once at start-up.

use crate::frame::{DataLength, Id};
use crate::scheduler::Descriptor;
use crate::time::Duration;

/// Identifiers the receiver reports on the debug channel
pub const ALLOW_LIST: &[Id] = &[
    Id::from_truncating(0xa0),
    Id::from_truncating(0x60),
    Id::from_truncating(0x100),
    Id::from_truncating(0xea),
    Id::from_truncating(0x125),
];

/// Number of distinct identifiers the receiver can track
pub const TABLE_CAPACITY: usize = 100;

pub const DRAIN_PERIOD: Duration = Duration::from_millis(100);

pub const TX_TIMEOUT: Duration = Duration::from_millis(100);

pub const DESCRIPTOR_COUNT: usize = 4;

/// Test frames emitted by the transmitter, in firing order
pub const DESCRIPTORS: [Descriptor; DESCRIPTOR_COUNT] = [
    descriptor(0x801, 8, 10),
    descriptor(0x7df, 16, 10),
    descriptor(0x712, 32, 100),
    descriptor(0x1ba, 32, 10),
];

const fn descriptor(id: u32, length: usize, period_ms: u64) -> Descriptor {
    Descriptor::new(
        Id::from_truncating(id),
        DataLength::new(length).unwrap(),
        Duration::from_millis(period_ms),
    )
}

/// Board role, fixed for the lifetime of the firmware
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Role {
    /// Emits the test frames
    Transmitter,
    /// Tracks the latest frame per identifier and reports it
    Receiver,
}

/// Allowed frame format for reception and transmission
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum FrameFormat {
    /// Receive and transmit classic frames only
    Classic,
    /// Receive classic and FD frames; transmit FD frames without bit rate switch
    Fd,
    /// Receive classic and FD frames; transmit FD frames with bit rate switch
    FdBrs,
}

impl FrameFormat {
    pub fn fd(self) -> bool {
        match self {
            FrameFormat::Classic => false,
            FrameFormat::Fd => true,
            FrameFormat::FdBrs => true,
        }
    }

    pub fn bit_rate_switch(self) -> bool {
        match self {
            FrameFormat::Classic => false,
            FrameFormat::Fd => false,
            FrameFormat::FdBrs => true,
        }
    }
}

/// Run loop configuration
#[non_exhaustive]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Config {
    pub role: Role,
    /// Frame format of the bus. Transports use it to build and filter frames.
    pub frame_format: FrameFormat,
    /// Test frames fired by the transmitter
    pub descriptors: [Descriptor; DESCRIPTOR_COUNT],
    /// Identifiers reported by the receiver
    pub allow_list: &'static [Id],
    /// Minimum interval between receiver reports
    pub drain_period: Duration,
    /// Maximum wait for the bus to accept a frame
    pub tx_timeout: Duration,
    /// Write every submitted frame to the debug sink
    pub echo_transmitted: bool,
    /// Join the bus without acknowledging frames or transmitting
    pub listen_only: bool,
}

impl Config {
    pub const fn new(role: Role) -> Self {
        Self {
            role,
            frame_format: FrameFormat::FdBrs,
            descriptors: DESCRIPTORS,
            allow_list: ALLOW_LIST,
            drain_period: DRAIN_PERIOD,
            tx_timeout: TX_TIMEOUT,
            echo_transmitted: false,
            listen_only: matches!(role, Role::Receiver),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::new(Role::Receiver)
    }
}
