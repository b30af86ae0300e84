//! CAN-FD bus diagnostics
//!
//! The crate holds the board-independent core of a diagnostic firmware that runs in one of
//! two fixed roles:
//! * a transmitter that periodically emits a set of test frames, each at its own rate
//! * a receiver that keeps the latest frame per identifier and periodically reports the
//!   allow-listed ones over a debug channel
//!
//! Both roles share a single cooperative run loop, `runner::Runner`. The loop owns all state
//! exclusively and talks to the board through the traits in `link`: a monotonic `Clock`,
//! a frame `Transport` and a text `DebugSink`. Board crates implement these traits on top of
//! their HAL and hand the runner to an executor task.
//!
//! Failures never stop the loop. A transmit timeout, a full table or an overlong log line
//! only skip the affected item; the runner counts them in `runner::Counters`.

#![no_std]

// This mod MUST go first, so that the others see its macros.
pub(crate) mod fmt;

pub mod config;
pub mod format;
pub mod frame;
pub mod link;
pub mod runner;
pub mod scheduler;
pub mod table;

pub mod time {
    pub use embassy_time::{Duration, Instant};
}
