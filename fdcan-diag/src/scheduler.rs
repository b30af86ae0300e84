//! Periodic multi-rate frame scheduler

use heapless::Vec;

use crate::frame::{Data, DataLength, Frame, Id};
use crate::time::{Duration, Instant};

/// Static description of a periodically transmitted frame
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Descriptor {
    id: Id,
    length: DataLength,
    period: Duration,
    last_sent: Instant,
}

impl Descriptor {
    /// Creates a descriptor that has notionally last fired at the clock origin.
    pub const fn new(id: Id, length: DataLength, period: Duration) -> Self {
        Self {
            id,
            length,
            period,
            last_sent: Instant::MIN,
        }
    }

    pub fn id(&self) -> Id {
        self.id
    }

    pub fn length(&self) -> DataLength {
        self.length
    }

    pub fn period(&self) -> Duration {
        self.period
    }

    pub fn last_sent(&self) -> Instant {
        self.last_sent
    }

    fn is_due(&self, now: Instant) -> bool {
        now.checked_duration_since(self.last_sent)
            .is_some_and(|elapsed| elapsed >= self.period)
    }
}

/// Fires descriptors whose period has elapsed
///
/// A single send counter is shared by all descriptors. It stamps the payload of every frame
/// fired within a tick and advances once per tick, whether or not anything fired.
pub struct Scheduler<const N: usize> {
    descriptors: [Descriptor; N],
    counter: u32,
}

impl<const N: usize> Scheduler<N> {
    pub const fn new(descriptors: [Descriptor; N]) -> Self {
        Self {
            descriptors,
            counter: 0,
        }
    }

    /// Returns the frames due at `now` in declaration order and advances the send counter.
    pub fn tick(&mut self, now: Instant) -> Vec<Frame, N> {
        let mut due = Vec::new();
        for descriptor in self.descriptors.iter_mut() {
            if descriptor.is_due(now) {
                descriptor.last_sent = now;
                // One frame per descriptor at most
                unwrap!(due.push(make_frame(
                    descriptor.id,
                    descriptor.length,
                    self.counter
                )));
            }
        }
        self.counter = self.counter.wrapping_add(1);
        due
    }

    pub fn counter(&self) -> u32 {
        self.counter
    }

    pub fn descriptors(&self) -> &[Descriptor] {
        &self.descriptors
    }
}

/// Builds a test frame with `payload[i] = (i * counter) mod 256`.
pub fn make_frame(id: Id, length: DataLength, counter: u32) -> Frame {
    let mut data = Data::new_zeros(length);
    for (i, byte) in data.iter_mut().enumerate() {
        *byte = (i as u32).wrapping_mul(counter) as u8;
    }
    Frame { id, data }
}
