//! Collaborators driven by the run loop
//!
//! The run loop depends on three capabilities provided by the board:
//! * `Clock` reads a monotonic timestamp
//! * `Transport` hands frames to the bus and polls for received ones
//! * `DebugSink` emits text lines to the serial debug channel

use crate::frame::Frame;
use crate::time::{Duration, Instant};

/// Monotonic time source
pub trait Clock {
    fn now(&self) -> Instant;
}

impl<C: Clock + ?Sized> Clock for &C {
    fn now(&self) -> Instant {
        (**self).now()
    }
}

/// The frame was not accepted by the bus within the allotted time
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct TransmitTimeout;

/// Frame transport
///
/// Submission blocks for at most the given timeout. Reception never blocks.
#[allow(async_fn_in_trait)]
pub trait Transport {
    /// Submits a frame for transmission.
    ///
    /// The result is advisory; callers are free to discard it.
    async fn submit(&mut self, frame: &Frame, timeout: Duration) -> Result<(), TransmitTimeout>;

    /// Fetches a received frame if one is available.
    fn try_receive(&mut self) -> Option<Frame>;
}

/// Fire-and-forget text output
///
/// Implementations must not block indefinitely and report no errors to the caller.
pub trait DebugSink {
    fn write(&mut self, text: &str);
}

impl<S: DebugSink + ?Sized> DebugSink for &mut S {
    fn write(&mut self, text: &str) {
        (**self).write(text)
    }
}
