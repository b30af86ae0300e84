mod common;

use common::{TestBus, TestClock, TestSink, ts};
use fdcan_diag::config::{Config, Role, TX_TIMEOUT};
use fdcan_diag::runner::Runner;
use futures_executor::block_on;
use std::vec::Vec;

#[test]
fn test_startup_banner() {
    let (bus, clock, sink) = (TestBus::default(), TestClock::new(), TestSink::default());
    let mut runner = Runner::new(Config::new(Role::Transmitter), &bus, &clock, &sink);

    runner.announce(true);
    runner.announce(false);
    assert_eq!(
        sink.take_lines(),
        [
            "CAN FD initialized in normal mode",
            "CAN FD initialization failed"
        ]
    );
}

#[test]
fn test_multi_rate_schedule() {
    let (bus, clock, sink) = (TestBus::default(), TestClock::new(), TestSink::default());
    let mut runner = Runner::new(Config::new(Role::Transmitter), &bus, &clock, &sink);

    for ms in 0..=300 {
        clock.set(ms);
        block_on(runner.step());
    }

    let frames = bus.take_tx();
    let count = |id: u32| frames.iter().filter(|f| f.id.as_raw() == id).count();
    assert_eq!(count(0x801), 30);
    assert_eq!(count(0x7df), 30);
    assert_eq!(count(0x712), 3);
    assert_eq!(count(0x1ba), 30);
    assert_eq!(runner.counters().ticks, 301);
    assert_eq!(runner.counters().frames_submitted, 93);
    assert!(bus.timeouts.borrow().iter().all(|&t| t == TX_TIMEOUT));

    // Declaration order within a tick
    let ids: Vec<u32> = frames[27..31].iter().map(|f| f.id.as_raw()).collect();
    assert_eq!(ids, [0x801, 0x7df, 0x712, 0x1ba]);

    // Transmitter never writes log lines unless echo is enabled
    assert!(sink.take_lines().is_empty());
}

#[test]
fn test_payload_stamp() {
    let (bus, clock, sink) = (TestBus::default(), TestClock::new(), TestSink::default());
    let mut runner = Runner::new(Config::new(Role::Transmitter), &bus, &clock, &sink);

    for ms in 0..=10 {
        clock.set(ms);
        block_on(runner.step());
    }

    // Eleventh tick: counter value 10
    let frames = bus.take_tx();
    assert_eq!(frames.len(), 3);
    assert_eq!(frames[0].id.as_raw(), 0x801);
    assert_eq!(&frames[0].data[..], &[0, 10, 20, 30, 40, 50, 60, 70]);
    assert_eq!(frames[1].data.len(), 16);
    assert_eq!(frames[1].data[15], 150);
    assert_eq!(frames[2].id.as_raw(), 0x1ba);
    assert_eq!(frames[2].data.len(), 32);
    assert_eq!(frames[2].data[31], (31 * 10 % 256) as u8);
    assert_eq!(runner.scheduler().unwrap().counter(), 11);
}

#[test]
fn test_transmit_timeout_discarded() {
    let (bus, clock, sink) = (TestBus::default(), TestClock::new(), TestSink::default());
    let mut runner = Runner::new(Config::new(Role::Transmitter), &bus, &clock, &sink);

    bus.reject.set(true);
    clock.set(10);
    block_on(runner.step());
    assert_eq!(runner.counters().transmit_timeouts, 3);
    assert_eq!(runner.counters().frames_submitted, 0);
    assert!(bus.take_tx().is_empty());

    // Rejected frames are not retried
    bus.reject.set(false);
    clock.set(15);
    block_on(runner.step());
    assert!(bus.take_tx().is_empty());

    clock.set(20);
    block_on(runner.step());
    assert_eq!(bus.take_tx().len(), 3);
    assert_eq!(runner.counters().frames_submitted, 3);
    assert!(
        runner
            .scheduler()
            .unwrap()
            .descriptors()
            .iter()
            .filter(|d| d.period().as_millis() == 10)
            .all(|d| d.last_sent() == ts(20))
    );
}

#[test]
fn test_transmit_echo() {
    let (bus, clock, sink) = (TestBus::default(), TestClock::new(), TestSink::default());
    let mut config = Config::new(Role::Transmitter);
    config.echo_transmitted = true;
    let mut runner = Runner::new(config, &bus, &clock, &sink);

    clock.set(10);
    block_on(runner.step());

    let lines = sink.take_lines();
    assert_eq!(lines.len(), 3);
    assert_eq!(lines[0], "CAN FD TX: ID=0x801, DLC=8, Data=00 00 00 00 00 00 00 00 ");
    assert!(lines[1].starts_with("CAN FD TX: ID=0x7DF, DLC=16, Data="));
    assert!(lines[2].starts_with("CAN FD TX: ID=0x1BA, DLC=32, Data="));

    // Rejected frames are not echoed
    bus.reject.set(true);
    clock.set(20);
    block_on(runner.step());
    assert!(sink.take_lines().is_empty());
}
