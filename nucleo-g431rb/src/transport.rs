//! Frame transport over the embassy FDCAN driver

use core::task::Poll;

use embassy_futures::poll_once;
use embassy_stm32::can;
use embassy_time::with_timeout;
use embedded_can::{ExtendedId, Id, StandardId};
use fdcan_diag::config::FrameFormat;
use fdcan_diag::frame;
use fdcan_diag::link::{TransmitTimeout, Transport};
use fdcan_diag::time::Duration;

pub struct FdcanTransport<'a> {
    tx: can::CanTx<'a>,
    rx: can::CanRx<'a>,
    frame_format: FrameFormat,
}

impl<'a> FdcanTransport<'a> {
    pub fn new(can: can::Can<'a>, frame_format: FrameFormat) -> Self {
        let (tx, rx, _) = can.split();
        Self {
            tx,
            rx,
            frame_format,
        }
    }
}

impl Transport for FdcanTransport<'_> {
    async fn submit(
        &mut self,
        frame: &frame::Frame,
        timeout: Duration,
    ) -> Result<(), TransmitTimeout> {
        let raw_frame = make_raw_frame(frame, self.frame_format);
        match with_timeout(timeout, self.tx.write_fd(&raw_frame)).await {
            Ok(None) => Ok(()),
            Ok(Some(_)) => {
                // A pending lower-priority frame gave up its buffer and is lost
                defmt::trace!("pending frame preempted");
                Ok(())
            }
            Err(_) => Err(TransmitTimeout),
        }
    }

    fn try_receive(&mut self) -> Option<frame::Frame> {
        match poll_once(self.rx.read_fd()) {
            Poll::Ready(Ok(envelope)) => {
                if envelope.frame.header().fdcan() && !self.frame_format.fd() {
                    return None;
                }
                convert_raw_frame(&envelope.frame)
            }
            Poll::Ready(Err(err)) => {
                defmt::debug!("bus error: {}", err);
                None
            }
            Poll::Pending => None,
        }
    }
}

fn make_raw_id(id: frame::Id) -> Id {
    if id.is_extended() {
        defmt::unwrap!(ExtendedId::new(id.as_raw())).into()
    } else {
        defmt::unwrap!(StandardId::new(id.as_raw() as u16)).into()
    }
}

fn make_raw_frame(frame: &frame::Frame, format: FrameFormat) -> can::frame::FdFrame {
    let id = make_raw_id(frame.id);
    let length = frame.data.len() as u8;

    let header = if format.fd() {
        can::frame::Header::new_fd(id, length, false, format.bit_rate_switch())
    } else {
        can::frame::Header::new(id, length, false)
    };
    defmt::unwrap!(can::frame::FdFrame::new(header, &frame.data))
}

fn convert_raw_frame(raw_frame: &can::frame::FdFrame) -> Option<frame::Frame> {
    let id = match raw_frame.id() {
        Id::Standard(id) => u32::from(id.as_raw()),
        Id::Extended(id) => id.as_raw(),
    };
    let length = usize::from(raw_frame.header().len());
    Some(frame::Frame {
        id: frame::Id::new(id)?,
        data: frame::Data::new(raw_frame.data().get(..length)?).ok()?,
    })
}
