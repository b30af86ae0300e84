//! Debug log line formatting

use core::fmt::Write;
use heapless::String;

use crate::frame::{DataLength, Frame, Id};

/// Capacity of a firmware log line, terminator included
pub const LOG_LINE_CAPACITY: usize = 256;

pub const LINE_TERMINATOR: &str = "\r\n";

/// Rendered width of a single payload byte: two hex digits and a separator
const BYTE_WIDTH: usize = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum RecordKind {
    Received,
    Transmitted,
}

impl RecordKind {
    fn prefix(self) -> &'static str {
        match self {
            RecordKind::Received => "CAN FD RX",
            RecordKind::Transmitted => "CAN FD TX",
        }
    }
}

/// Frame report to be rendered as a single text line
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LogRecord<'a> {
    pub kind: RecordKind,
    pub id: Id,
    pub length: DataLength,
    pub bytes: &'a [u8],
}

impl<'a> LogRecord<'a> {
    pub fn received(frame: &'a Frame) -> Self {
        Self::from_frame(RecordKind::Received, frame)
    }

    pub fn transmitted(frame: &'a Frame) -> Self {
        Self::from_frame(RecordKind::Transmitted, frame)
    }

    fn from_frame(kind: RecordKind, frame: &'a Frame) -> Self {
        Self {
            kind,
            id: frame.id,
            length: frame.length(),
            bytes: &frame.data,
        }
    }
}

/// Bounded text line
///
/// A line that could not hold every payload byte is marked as truncated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogLine<const N: usize> {
    text: String<N>,
    truncated: bool,
}

impl<const N: usize> LogLine<N> {
    pub fn as_str(&self) -> &str {
        &self.text
    }

    pub fn is_truncated(&self) -> bool {
        self.truncated
    }
}

impl<const N: usize> core::ops::Deref for LogLine<N> {
    type Target = str;

    fn deref(&self) -> &Self::Target {
        &self.text
    }
}

/// Renders a record as `<prefix>: ID=0x<id>, DLC=<length>, Data=<XX >...\r\n`.
///
/// The identifier is upper-case hex without padding, each byte is two upper-case hex digits
/// followed by a space. Bytes that do not fit in front of the terminator are omitted.
pub fn format_record<const N: usize>(record: &LogRecord<'_>) -> LogLine<N> {
    let mut text = String::new();
    let mut truncated = write!(
        text,
        "{}: ID=0x{:X}, DLC={}, Data=",
        record.kind.prefix(),
        record.id.as_raw(),
        record.length.as_usize()
    )
    .is_err();

    if !truncated {
        for byte in record.bytes {
            if text.len() + BYTE_WIDTH + LINE_TERMINATOR.len() > N
                || write!(text, "{:02X} ", byte).is_err()
            {
                truncated = true;
                break;
            }
        }
    }

    // Only fails if the header alone overflowed the line
    if text.push_str(LINE_TERMINATOR).is_err() {
        truncated = true;
    }

    LogLine { text, truncated }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn frame(id: u32, data: &[u8]) -> Frame {
        Frame::new(Id::from_truncating(id), data).unwrap()
    }

    #[test]
    fn test_received_line() {
        let frame = frame(0xea, &[0x01, 0x02, 0x03]);
        let line: LogLine<LOG_LINE_CAPACITY> = format_record(&LogRecord::received(&frame));
        assert_eq!(line.as_str(), "CAN FD RX: ID=0xEA, DLC=3, Data=01 02 03 \r\n");
        assert!(!line.is_truncated());
    }

    #[test]
    fn test_transmitted_line() {
        let frame = frame(0x801, &[0x00, 0xab]);
        let line: LogLine<LOG_LINE_CAPACITY> = format_record(&LogRecord::transmitted(&frame));
        assert_eq!(&*line, "CAN FD TX: ID=0x801, DLC=2, Data=00 AB \r\n");
    }

    #[test]
    fn test_empty_payload() {
        let frame = frame(0x60, &[]);
        let line: LogLine<LOG_LINE_CAPACITY> = format_record(&LogRecord::received(&frame));
        assert_eq!(line.as_str(), "CAN FD RX: ID=0x60, DLC=0, Data=\r\n");
    }

    #[test]
    fn test_full_frame_fits() {
        let frame = frame(0x1fff_ffff, &[0xff; 64]);
        let line: LogLine<LOG_LINE_CAPACITY> = format_record(&LogRecord::received(&frame));
        assert!(!line.is_truncated());
        assert!(line.ends_with("FF \r\n"));
        assert_eq!(line.matches("FF ").count(), 64);
    }

    #[test]
    fn test_truncated_payload() {
        // Header is 32 characters long, two bytes and the terminator fit into 40
        let frame = frame(0xea, &[0x01, 0x02, 0x03, 0x04]);
        let line: LogLine<40> = format_record(&LogRecord::received(&frame));
        assert!(line.is_truncated());
        assert_eq!(line.as_str(), "CAN FD RX: ID=0xEA, DLC=4, Data=01 02 \r\n");
        assert!(line.len() <= 40);
    }

    #[test]
    fn test_truncated_header() {
        let frame = frame(0xea, &[0x01]);
        let line: LogLine<16> = format_record(&LogRecord::received(&frame));
        assert!(line.is_truncated());
        assert!(line.len() <= 16);
    }
}
