//! Debug text output over the board UARTs

use embassy_stm32::mode::Blocking;
use embassy_stm32::usart::UartTx;
use fdcan_diag::link::DebugSink;

/// Writes every line to the ST-LINK virtual COM port and to the external header UART
pub struct UartSink<'a> {
    usb: UartTx<'a, Blocking>,
    ext: UartTx<'a, Blocking>,
}

impl<'a> UartSink<'a> {
    pub fn new(usb: UartTx<'a, Blocking>, ext: UartTx<'a, Blocking>) -> Self {
        Self { usb, ext }
    }
}

impl DebugSink for UartSink<'_> {
    fn write(&mut self, text: &str) {
        for port in [&mut self.usb, &mut self.ext] {
            if let Err(err) = port.blocking_write(text.as_bytes()) {
                defmt::trace!("uart write failed: {}", err);
            }
        }
    }
}
