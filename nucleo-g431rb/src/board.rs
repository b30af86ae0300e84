use core::num::NonZero;

use embassy_stm32::can;

pub const DEBUG_BAUDRATE: u32 = 115_200;

pub fn operating_mode(config: &fdcan_diag::config::Config) -> can::OperatingMode {
    if cfg!(feature = "loop-back") {
        can::OperatingMode::ExternalLoopbackMode
    } else if config.listen_only {
        // Bus monitoring: no ACK, no transmission
        can::OperatingMode::BusMonitoringMode
    } else {
        can::OperatingMode::NormalOperationMode
    }
}

pub fn make_peripheral_config() -> embassy_stm32::Config {
    use embassy_stm32::rcc;
    use embassy_stm32::time::Hertz;

    let mut config = embassy_stm32::Config::default();
    config.rcc.hsi = false;
    config.rcc.hse = Some(rcc::Hse {
        freq: Hertz::mhz(24),
        mode: rcc::HseMode::Oscillator,
    });
    config.rcc.pll = Some(rcc::Pll {
        source: rcc::PllSource::HSE,
        prediv: rcc::PllPreDiv::DIV3,
        mul: rcc::PllMul::MUL40, // 320 MHz
        divp: None,
        divq: Some(rcc::PllQDiv::DIV8), // 40 MHz for CAN
        divr: Some(rcc::PllRDiv::DIV2), // 160 MHz sysclock
    });
    config.rcc.sys = rcc::Sysclk::PLL1_R;
    config.rcc.boost = true; // Required for freq > 150MHz
    config.rcc.mux.fdcansel = rcc::mux::Fdcansel::PLL1_Q;
    config
}

pub fn make_can_config() -> can::config::FdCanConfig {
    use can::config;
    config::FdCanConfig {
        nbtr: config::NominalBitTiming {
            // 500kBps, Sample point location: 0.875
            prescaler: NonZero::new(5).unwrap(),
            seg1: NonZero::new(13).unwrap(),
            seg2: NonZero::new(2).unwrap(),
            sync_jump_width: NonZero::new(2).unwrap(),
        },
        // 2MBps, Sample point location: 0.8
        dbtr: config::DataBitTiming {
            transceiver_delay_compensation: false,
            prescaler: NonZero::new(1).unwrap(),
            seg1: NonZero::new(15).unwrap(),
            seg2: NonZero::new(4).unwrap(),
            sync_jump_width: NonZero::new(4).unwrap(),
        },
        automatic_retransmit: true,
        frame_transmit: config::FrameTransmissionConfig::AllowFdCanAndBRS,
        timestamp_source: config::TimestampSource::Prescaler(config::TimestampPrescaler::_1),
        // No acceptance filters are configured: every data frame goes to FIFO 0
        global_filter: config::GlobalFilter {
            handle_standard_frames: config::NonMatchingFilter::IntoRxFifo0,
            handle_extended_frames: config::NonMatchingFilter::IntoRxFifo0,
            reject_remote_standard_frames: true,
            reject_remote_extended_frames: true,
        },
        ..Default::default()
    }
}

pub fn make_uart_config() -> embassy_stm32::usart::Config {
    use embassy_stm32::usart;

    let mut config = usart::Config::default();
    config.baudrate = DEBUG_BAUDRATE;
    config.data_bits = usart::DataBits::DataBits8;
    config.parity = usart::Parity::ParityNone;
    config.stop_bits = usart::StopBits::STOP1;
    config
}
