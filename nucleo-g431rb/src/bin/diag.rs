//! CAN-FD diagnostic firmware.
//!
//! The role is fixed at build time by the `transmitter` feature.

#![no_std]
#![no_main]

use defmt::*;
use embassy_executor::Spawner;
use embassy_stm32::usart::UartTx;
use embassy_stm32::{bind_interrupts, can, peripherals};
use fdcan_diag::config::{Config, Role};
use fdcan_diag::runner::Runner;
use nucleo_g431rb::sink::UartSink;
use nucleo_g431rb::transport::FdcanTransport;
use nucleo_g431rb::{SystemClock, board};
use static_cell::StaticCell;
use {defmt_rtt as _, panic_probe as _};

bind_interrupts!(struct Irqs {
    FDCAN1_IT0 => can::IT0InterruptHandler<peripherals::FDCAN1>;
    FDCAN1_IT1 => can::IT1InterruptHandler<peripherals::FDCAN1>;
});

#[cfg(feature = "transmitter")]
const ROLE: Role = Role::Transmitter;
#[cfg(not(feature = "transmitter"))]
const ROLE: Role = Role::Receiver;

type DiagRunner = Runner<FdcanTransport<'static>, SystemClock, UartSink<'static>>;

#[embassy_executor::main]
async fn main(_spawner: Spawner) {
    let p = embassy_stm32::init(board::make_peripheral_config());

    let sink = {
        let usb = unwrap!(UartTx::new_blocking(
            p.LPUART1,
            p.PA2,
            board::make_uart_config()
        ));
        let ext = unwrap!(UartTx::new_blocking(
            p.USART1,
            p.PC4,
            board::make_uart_config()
        ));
        UartSink::new(usb, ext)
    };

    let config = Config::new(ROLE);
    let mut can = can::CanConfigurator::new(p.FDCAN1, p.PA11, p.PA12, Irqs);
    can.set_config(board::make_can_config());
    let can = can.start(board::operating_mode(&config));
    let transport = FdcanTransport::new(can, config.frame_format);

    let runner = {
        static CELL: StaticCell<DiagRunner> = StaticCell::new();
        CELL.init(Runner::new(config, transport, SystemClock, sink))
    };

    // The configurator applies its settings infallibly once the bus is started
    runner.announce(true);
    info!("running as {}", ROLE);
    runner.run().await
}
