//! Latest-value table
//!
//! The receiver keeps the most recent frame per identifier in a fixed array of slots.
//! Slots are claimed in index order on first sight of an identifier and are never released.
//! Once every slot is claimed, frames with unseen identifiers are dropped.

use crate::format::{LOG_LINE_CAPACITY, LogLine, LogRecord, format_record};
use crate::frame::{Frame, Id};
use crate::link::DebugSink;
use crate::time::{Duration, Instant};

/// Fixed set of identifiers eligible for log output
#[derive(Debug, Clone, Copy)]
pub struct AllowList<'a>(&'a [Id]);

impl<'a> AllowList<'a> {
    pub const fn new(ids: &'a [Id]) -> Self {
        Self(ids)
    }

    pub fn contains(&self, id: Id) -> bool {
        self.0.iter().any(|&entry| entry == id)
    }

    pub fn ids(&self) -> &'a [Id] {
        self.0
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Slot {
    id: Id,
    frame: Frame,
    has_update: bool,
}

impl Slot {
    const VACANT: Slot = Slot {
        id: Id::VACANT,
        frame: Frame::EMPTY,
        has_update: false,
    };

    /// Claimed identifier, `None` for a vacant slot
    pub fn id(&self) -> Option<Id> {
        (!self.id.is_vacant()).then_some(self.id)
    }

    pub fn frame(&self) -> &Frame {
        &self.frame
    }

    pub fn has_update(&self) -> bool {
        self.has_update
    }
}

/// Every slot is claimed by another identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct TableFull;

/// Outcome of a drain pass
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct DrainSummary {
    /// Lines written to the debug sink
    pub logged: usize,
    /// Pending updates cleared without output
    pub suppressed: usize,
    /// Written lines that lost payload bytes
    pub truncated: usize,
}

pub struct LatestTable<'a, const N: usize> {
    slots: [Slot; N],
    allow_list: AllowList<'a>,
    drain_period: Duration,
    last_drain: Instant,
}

impl<'a, const N: usize> LatestTable<'a, N> {
    pub const fn new(allow_list: AllowList<'a>, drain_period: Duration) -> Self {
        Self {
            slots: [Slot::VACANT; N],
            allow_list,
            drain_period,
            last_drain: Instant::MIN,
        }
    }

    /// Stores the frame in the slot of its identifier, claiming the first vacant slot if needed.
    ///
    /// Returns the slot index. A frame with the vacant identifier is stored in the first vacant
    /// slot without claiming it.
    pub fn admit(&mut self, frame: &Frame) -> Result<usize, TableFull> {
        let idx = self
            .slots
            .iter()
            .position(|slot| slot.id == frame.id || slot.id.is_vacant())
            .ok_or(TableFull)?;

        let slot = &mut self.slots[idx];
        slot.id = frame.id;
        slot.frame = *frame;
        slot.has_update = true;
        Ok(idx)
    }

    pub fn is_drain_due(&self, now: Instant) -> bool {
        now.checked_duration_since(self.last_drain)
            .is_some_and(|elapsed| elapsed >= self.drain_period)
    }

    /// Reports pending updates if the drain period has elapsed; returns `None` otherwise.
    ///
    /// Every pending flag is cleared. Only allow-listed identifiers produce a line.
    pub fn drain<S: DebugSink>(&mut self, now: Instant, sink: &mut S) -> Option<DrainSummary> {
        if !self.is_drain_due(now) {
            return None;
        }
        self.last_drain = now;

        let mut summary = DrainSummary::default();
        for slot in self.slots.iter_mut().filter(|slot| slot.has_update) {
            slot.has_update = false;

            if !self.allow_list.contains(slot.frame.id) {
                summary.suppressed += 1;
                continue;
            }

            let line: LogLine<LOG_LINE_CAPACITY> = format_record(&LogRecord::received(&slot.frame));
            if line.is_truncated() {
                summary.truncated += 1;
            }
            sink.write(&line);
            summary.logged += 1;
        }
        Some(summary)
    }

    pub fn get(&self, id: Id) -> Option<&Slot> {
        self.slots.iter().find(|slot| slot.id() == Some(id))
    }

    pub fn slots(&self) -> &[Slot] {
        &self.slots
    }

    /// Number of claimed slots
    pub fn len(&self) -> usize {
        self.slots.iter().filter(|slot| slot.id().is_some()).count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub const fn capacity(&self) -> usize {
        N
    }

    pub fn last_drain(&self) -> Instant {
        self.last_drain
    }
}
