//! Cooperative run loop
//!
//! A `Runner` owns the role state, the board collaborators and the counters. Each `step`
//! yields to the executor once and then performs exactly one role step:
//! * transmitter: fire due descriptors and submit their frames
//! * receiver: admit at most one received frame, then drain the table if due

use embassy_futures::yield_now;

use crate::config::{Config, DESCRIPTOR_COUNT, Role, TABLE_CAPACITY};
use crate::format::{LINE_TERMINATOR, LOG_LINE_CAPACITY, LogLine, LogRecord, format_record};
use crate::link::{Clock, DebugSink, Transport};
use crate::scheduler::Scheduler;
use crate::table::{AllowList, LatestTable};

pub const INIT_SUCCESS_MESSAGE: &str = "CAN FD initialized in normal mode";
pub const INIT_FAILURE_MESSAGE: &str = "CAN FD initialization failed";

/// Event counters
///
/// All counters wrap on overflow.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Counters {
    /// Scheduler ticks
    pub ticks: u32,
    /// Frames accepted by the transport
    pub frames_submitted: u32,
    /// Frames not accepted within the transmit timeout
    pub transmit_timeouts: u32,
    /// Frames fetched from the transport
    pub frames_received: u32,
    /// Frames dropped by a full table
    pub frames_dropped: u32,
    /// Lines written by drain passes
    pub lines_logged: u32,
    /// Pending updates cleared without output
    pub updates_suppressed: u32,
    /// Lines that lost payload bytes
    pub lines_truncated: u32,
}

enum RoleState {
    Transmitter(Scheduler<DESCRIPTOR_COUNT>),
    Receiver(LatestTable<'static, TABLE_CAPACITY>),
}

pub struct Runner<T: Transport, C: Clock, S: DebugSink> {
    config: Config,
    role: RoleState,
    transport: T,
    clock: C,
    sink: S,
    counters: Counters,
}

impl<T: Transport, C: Clock, S: DebugSink> Runner<T, C, S> {
    pub fn new(config: Config, transport: T, clock: C, sink: S) -> Self {
        let role = match config.role {
            Role::Transmitter => RoleState::Transmitter(Scheduler::new(config.descriptors)),
            Role::Receiver => RoleState::Receiver(LatestTable::new(
                AllowList::new(config.allow_list),
                config.drain_period,
            )),
        };
        Self {
            config,
            role,
            transport,
            clock,
            sink,
            counters: Counters::default(),
        }
    }

    /// Reports the bus initialization outcome on the debug channel.
    pub fn announce(&mut self, bus_ready: bool) {
        let message = if bus_ready {
            info!("bus ready, role: {:?}", self.config.role);
            INIT_SUCCESS_MESSAGE
        } else {
            error!("bus initialization failed");
            INIT_FAILURE_MESSAGE
        };
        self.sink.write(message);
        self.sink.write(LINE_TERMINATOR);
    }

    pub async fn run(&mut self) -> ! {
        loop {
            self.step().await;
        }
    }

    /// Performs a single loop iteration.
    pub async fn step(&mut self) {
        yield_now().await;

        match &mut self.role {
            RoleState::Transmitter(scheduler) => {
                let frames = scheduler.tick(self.clock.now());
                self.counters.ticks = self.counters.ticks.wrapping_add(1);

                for frame in frames.iter() {
                    match self.transport.submit(frame, self.config.tx_timeout).await {
                        Ok(()) => {
                            trace!("submitted frame {:?}", frame.id);
                            self.counters.frames_submitted =
                                self.counters.frames_submitted.wrapping_add(1);
                            if self.config.echo_transmitted {
                                let line: LogLine<LOG_LINE_CAPACITY> =
                                    format_record(&LogRecord::transmitted(frame));
                                self.sink.write(&line);
                            }
                        }
                        Err(_) => {
                            warn!("transmit timeout, frame {:?} discarded", frame.id);
                            self.counters.transmit_timeouts =
                                self.counters.transmit_timeouts.wrapping_add(1);
                        }
                    }
                }
            }
            RoleState::Receiver(table) => {
                if let Some(frame) = self.transport.try_receive() {
                    self.counters.frames_received = self.counters.frames_received.wrapping_add(1);
                    if table.admit(&frame).is_err() {
                        debug!("table full, frame {:?} dropped", frame.id);
                        self.counters.frames_dropped = self.counters.frames_dropped.wrapping_add(1);
                    }
                }

                if let Some(summary) = table.drain(self.clock.now(), &mut self.sink) {
                    let counters = &mut self.counters;
                    counters.lines_logged = counters.lines_logged.wrapping_add(summary.logged as u32);
                    counters.updates_suppressed = counters
                        .updates_suppressed
                        .wrapping_add(summary.suppressed as u32);
                    counters.lines_truncated =
                        counters.lines_truncated.wrapping_add(summary.truncated as u32);
                    debug!("drain: {:?}, totals: {:?}", summary, self.counters);
                }
            }
        }
    }

    pub fn role(&self) -> Role {
        self.config.role
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn counters(&self) -> &Counters {
        &self.counters
    }

    pub fn scheduler(&self) -> Option<&Scheduler<DESCRIPTOR_COUNT>> {
        match &self.role {
            RoleState::Transmitter(scheduler) => Some(scheduler),
            RoleState::Receiver(_) => None,
        }
    }

    pub fn table(&self) -> Option<&LatestTable<'static, TABLE_CAPACITY>> {
        match &self.role {
            RoleState::Transmitter(_) => None,
            RoleState::Receiver(table) => Some(table),
        }
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }
}
