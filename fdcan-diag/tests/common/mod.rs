#![allow(dead_code)]

use std::cell::{Cell, RefCell};
use std::collections::VecDeque;
use std::string::String;
use std::vec::Vec;

use fdcan_diag::frame::{Frame, Id};
use fdcan_diag::link::{Clock, DebugSink, TransmitTimeout, Transport};
use fdcan_diag::time::{Duration, Instant};

pub fn ts(ms: u64) -> Instant {
    Instant::MIN.saturating_add(Duration::from_millis(ms))
}

pub fn frame(id: u32, data: &[u8]) -> Frame {
    Frame::new(Id::from_truncating(id), data).unwrap()
}

/// Manually driven clock
pub struct TestClock(Cell<Instant>);

impl TestClock {
    pub fn new() -> Self {
        Self(Cell::new(ts(0)))
    }

    pub fn set(&self, ms: u64) {
        self.0.set(ts(ms));
    }
}

impl Clock for TestClock {
    fn now(&self) -> Instant {
        self.0.get()
    }
}

/// In-memory bus
///
/// Received frames are queued by the test, submitted frames are recorded unless the bus
/// is set to reject them.
#[derive(Default)]
pub struct TestBus {
    pub rx: RefCell<VecDeque<Frame>>,
    pub tx: RefCell<Vec<Frame>>,
    pub reject: Cell<bool>,
    pub timeouts: RefCell<Vec<Duration>>,
}

impl TestBus {
    pub fn push_rx(&self, frame: Frame) {
        self.rx.borrow_mut().push_back(frame);
    }

    pub fn take_tx(&self) -> Vec<Frame> {
        self.tx.take()
    }
}

impl Transport for &TestBus {
    async fn submit(&mut self, frame: &Frame, timeout: Duration) -> Result<(), TransmitTimeout> {
        self.timeouts.borrow_mut().push(timeout);
        if self.reject.get() {
            return Err(TransmitTimeout);
        }
        self.tx.borrow_mut().push(*frame);
        Ok(())
    }

    fn try_receive(&mut self) -> Option<Frame> {
        self.rx.borrow_mut().pop_front()
    }
}

/// Debug output collected as text
#[derive(Default)]
pub struct TestSink(RefCell<String>);

impl TestSink {
    /// Takes the complete lines written so far.
    pub fn take_lines(&self) -> Vec<String> {
        let text = self.0.take();
        assert!(text.is_empty() || text.ends_with("\r\n"), "partial line: {text:?}");
        text.split_terminator("\r\n").map(String::from).collect()
    }
}

impl DebugSink for &TestSink {
    fn write(&mut self, text: &str) {
        self.0.borrow_mut().push_str(text);
    }
}
