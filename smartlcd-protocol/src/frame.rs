//! Serial transport framing
//!
//! Frame format:
//! ```text
//! ┌────────┬────────┬─────────────────────┐
//! │ OPCODE │ LENGTH │ PAYLOAD             │
//! │ 1B     │ 1B     │ 0-48B               │
//! └────────┴────────┴─────────────────────┘
//! ```
//!
//! `0x00` bytes between frames are idle fill and are skipped, so a
//! receiver that lost sync recovers at the next non-zero byte.

use heapless::Vec;

use crate::command::PAYLOAD_SIZE;
use crate::opcode::OPCODE_NONE;

/// Framing errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum FrameError {
    /// Length byte exceeds the payload buffer
    PayloadTooLarge(u8),
}

/// One received command frame
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Frame {
    /// Raw opcode byte, never `0x00`
    pub opcode: u8,
    pub payload: Vec<u8, PAYLOAD_SIZE>,
}

impl Frame {
    /// Encode into `buf`, returning the number of bytes written
    pub fn encode(&self, buf: &mut [u8]) -> Option<usize> {
        let len = 2 + self.payload.len();
        if buf.len() < len {
            return None;
        }
        buf[0] = self.opcode;
        buf[1] = self.payload.len() as u8;
        buf[2..len].copy_from_slice(&self.payload);
        Some(len)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ParseState {
    WaitingForOpcode,
    WaitingForLength,
    ReadingPayload,
}

/// Byte-at-a-time frame parser
pub struct FrameParser {
    state: ParseState,
    opcode: u8,
    expected_length: u8,
    buffer: Vec<u8, PAYLOAD_SIZE>,
}

impl Default for FrameParser {
    fn default() -> Self {
        Self::new()
    }
}

impl FrameParser {
    pub const fn new() -> Self {
        Self {
            state: ParseState::WaitingForOpcode,
            opcode: OPCODE_NONE,
            expected_length: 0,
            buffer: Vec::new(),
        }
    }

    pub fn reset(&mut self) {
        self.state = ParseState::WaitingForOpcode;
        self.opcode = OPCODE_NONE;
        self.expected_length = 0;
        self.buffer.clear();
    }

    /// Feed a single byte
    ///
    /// Returns `Ok(Some(frame))` once a frame is complete and `Ok(None)`
    /// while more bytes are needed. An error resets the parser.
    pub fn feed(&mut self, byte: u8) -> Result<Option<Frame>, FrameError> {
        match self.state {
            ParseState::WaitingForOpcode => {
                if byte != OPCODE_NONE {
                    self.opcode = byte;
                    self.state = ParseState::WaitingForLength;
                }
                Ok(None)
            }
            ParseState::WaitingForLength => {
                if usize::from(byte) > PAYLOAD_SIZE {
                    self.reset();
                    return Err(FrameError::PayloadTooLarge(byte));
                }
                self.expected_length = byte;
                self.buffer.clear();
                if byte == 0 {
                    return Ok(Some(self.finish()));
                }
                self.state = ParseState::ReadingPayload;
                Ok(None)
            }
            ParseState::ReadingPayload => {
                // Cannot overflow: the length was checked above
                let _ = self.buffer.push(byte);
                if self.buffer.len() == usize::from(self.expected_length) {
                    return Ok(Some(self.finish()));
                }
                Ok(None)
            }
        }
    }

    fn finish(&mut self) -> Frame {
        let frame = Frame {
            opcode: self.opcode,
            payload: self.buffer.clone(),
        };
        self.reset();
        frame
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn feed_all(parser: &mut FrameParser, bytes: &[u8]) -> std::vec::Vec<Frame> {
        bytes
            .iter()
            .filter_map(|&b| parser.feed(b).ok().flatten())
            .collect()
    }

    #[test]
    fn test_parse_frame() {
        let mut parser = FrameParser::new();
        let frames = feed_all(&mut parser, &[0x30, 3, 10, 20, 1]);
        assert_eq!(frames.len(), 1);
        assert_eq!(frames[0].opcode, 0x30);
        assert_eq!(frames[0].payload, [10, 20, 1]);
    }

    #[test]
    fn test_empty_payload_completes_on_length() {
        let mut parser = FrameParser::new();
        assert_eq!(parser.feed(0x02), Ok(None));
        let frame = parser.feed(0).unwrap().unwrap();
        assert_eq!(frame.opcode, 0x02);
        assert!(frame.payload.is_empty());
    }

    #[test]
    fn test_idle_bytes_skipped() {
        let mut parser = FrameParser::new();
        let frames = feed_all(&mut parser, &[0, 0, 0x11, 2, 5, 6, 0, 0x02, 0]);
        assert_eq!(frames.len(), 2);
        assert_eq!(frames[0].payload, [5, 6]);
        assert_eq!(frames[1].opcode, 0x02);
    }

    #[test]
    fn test_oversized_length_resets() {
        let mut parser = FrameParser::new();
        parser.feed(0x20).unwrap();
        assert_eq!(parser.feed(49), Err(FrameError::PayloadTooLarge(49)));

        let frames = feed_all(&mut parser, &[0x10, 1, 2]);
        assert_eq!(frames[0].opcode, 0x10);
    }

    #[test]
    fn test_encode_then_parse() {
        let frame = Frame {
            opcode: 0x20,
            payload: Vec::from_slice(&[2, b'h', b'i']).unwrap(),
        };
        let mut buf = [0u8; 8];
        let len = frame.encode(&mut buf).unwrap();
        assert_eq!(&buf[..len], &[0x20, 3, 2, b'h', b'i']);
        assert!(frame.encode(&mut [0u8; 4]).is_none());

        let mut parser = FrameParser::new();
        assert_eq!(feed_all(&mut parser, &buf[..len]), [frame]);
    }
}
