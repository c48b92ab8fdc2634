//! Typed remote commands
//!
//! Payload layouts (all values are single bytes):
//!
//! | Opcode | Payload |
//! |---|---|
//! | `Reset`, `ClearScreen` | none |
//! | `SetPixelType` | `[type]` |
//! | `SetPosition` | `[x, y]` |
//! | `Write` | `[len, bytes...]` |
//! | `DrawLine` | `[to_x, to_y, type]` |
//! | `DrawRect`, `DrawFilledRect` | `[width, height, type]` |
//! | `DrawCircle`, `DrawFilledCircle` | `[radius, type]` |

use heapless::{String, Vec};

use crate::opcode::Opcode;
use crate::pixel::{PixelSelect, PixelType};

/// Size of the command slot payload buffer in bytes
pub const PAYLOAD_SIZE: usize = 48;

/// Maximum text length of a `Write` command (payload minus length prefix)
pub const MAX_TEXT_LEN: usize = PAYLOAD_SIZE - 1;

/// Errors that can occur while decoding a payload
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum PayloadError {
    /// Payload is shorter than the opcode requires
    TooShort,
    /// Pixel type byte is neither a known type nor the pen default marker
    InvalidPixelType(u8),
    /// Text length prefix exceeds the payload buffer
    TextTooLong,
    /// Text bytes are not valid UTF-8
    InvalidText,
}

/// A decoded remote command
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum RemoteCommand {
    Reset,
    ClearScreen,
    SetPixelType(PixelType),
    SetPosition { x: u8, y: u8 },
    Write(String<MAX_TEXT_LEN>),
    DrawLine { to_x: u8, to_y: u8, pixel: PixelSelect },
    DrawRect { width: u8, height: u8, pixel: PixelSelect },
    DrawFilledRect { width: u8, height: u8, pixel: PixelSelect },
    DrawCircle { radius: u8, pixel: PixelSelect },
    DrawFilledCircle { radius: u8, pixel: PixelSelect },
}

impl RemoteCommand {
    /// Decode a command from its opcode and payload bytes
    ///
    /// Trailing payload bytes beyond what the opcode needs are ignored, since
    /// the slot buffer is fixed-size.
    pub fn decode(opcode: Opcode, payload: &[u8]) -> Result<Self, PayloadError> {
        if payload.len() < opcode.min_payload_len() {
            return Err(PayloadError::TooShort);
        }

        let cmd = match opcode {
            Opcode::Reset => RemoteCommand::Reset,
            Opcode::ClearScreen => RemoteCommand::ClearScreen,
            Opcode::SetPixelType => {
                // The pen default marker makes no sense as a new default
                let pixel = PixelType::from_u8(payload[0])
                    .ok_or(PayloadError::InvalidPixelType(payload[0]))?;
                RemoteCommand::SetPixelType(pixel)
            }
            Opcode::SetPosition => RemoteCommand::SetPosition {
                x: payload[0],
                y: payload[1],
            },
            Opcode::Write => RemoteCommand::Write(decode_text(payload)?),
            Opcode::DrawLine => RemoteCommand::DrawLine {
                to_x: payload[0],
                to_y: payload[1],
                pixel: decode_pixel(payload[2])?,
            },
            Opcode::DrawRect => RemoteCommand::DrawRect {
                width: payload[0],
                height: payload[1],
                pixel: decode_pixel(payload[2])?,
            },
            Opcode::DrawFilledRect => RemoteCommand::DrawFilledRect {
                width: payload[0],
                height: payload[1],
                pixel: decode_pixel(payload[2])?,
            },
            Opcode::DrawCircle => RemoteCommand::DrawCircle {
                radius: payload[0],
                pixel: decode_pixel(payload[1])?,
            },
            Opcode::DrawFilledCircle => RemoteCommand::DrawFilledCircle {
                radius: payload[0],
                pixel: decode_pixel(payload[1])?,
            },
        };

        Ok(cmd)
    }

    /// Get the opcode of this command
    pub fn opcode(&self) -> Opcode {
        match self {
            RemoteCommand::Reset => Opcode::Reset,
            RemoteCommand::ClearScreen => Opcode::ClearScreen,
            RemoteCommand::SetPixelType(_) => Opcode::SetPixelType,
            RemoteCommand::SetPosition { .. } => Opcode::SetPosition,
            RemoteCommand::Write(_) => Opcode::Write,
            RemoteCommand::DrawLine { .. } => Opcode::DrawLine,
            RemoteCommand::DrawRect { .. } => Opcode::DrawRect,
            RemoteCommand::DrawFilledRect { .. } => Opcode::DrawFilledRect,
            RemoteCommand::DrawCircle { .. } => Opcode::DrawCircle,
            RemoteCommand::DrawFilledCircle { .. } => Opcode::DrawFilledCircle,
        }
    }

    /// Encode the payload of this command (for the sending side and tests)
    pub fn encode_payload(&self) -> Vec<u8, PAYLOAD_SIZE> {
        let mut buf = [0u8; PAYLOAD_SIZE];
        let len = match self {
            RemoteCommand::Reset | RemoteCommand::ClearScreen => 0,
            RemoteCommand::SetPixelType(pixel) => {
                buf[0] = pixel.as_u8();
                1
            }
            RemoteCommand::SetPosition { x, y } => {
                buf[..2].copy_from_slice(&[*x, *y]);
                2
            }
            RemoteCommand::Write(text) => {
                let bytes = text.as_bytes();
                buf[0] = bytes.len() as u8;
                buf[1..1 + bytes.len()].copy_from_slice(bytes);
                1 + bytes.len()
            }
            RemoteCommand::DrawLine { to_x, to_y, pixel } => {
                buf[..3].copy_from_slice(&[*to_x, *to_y, pixel.as_u8()]);
                3
            }
            RemoteCommand::DrawRect {
                width,
                height,
                pixel,
            }
            | RemoteCommand::DrawFilledRect {
                width,
                height,
                pixel,
            } => {
                buf[..3].copy_from_slice(&[*width, *height, pixel.as_u8()]);
                3
            }
            RemoteCommand::DrawCircle { radius, pixel }
            | RemoteCommand::DrawFilledCircle { radius, pixel } => {
                buf[..2].copy_from_slice(&[*radius, pixel.as_u8()]);
                2
            }
        };
        // len never exceeds PAYLOAD_SIZE, text is bounded by MAX_TEXT_LEN
        Vec::from_slice(&buf[..len]).unwrap_or_default()
    }
}

fn decode_pixel(byte: u8) -> Result<PixelSelect, PayloadError> {
    PixelSelect::from_u8(byte).ok_or(PayloadError::InvalidPixelType(byte))
}

fn decode_text(payload: &[u8]) -> Result<String<MAX_TEXT_LEN>, PayloadError> {
    let len = payload[0] as usize;
    if len > MAX_TEXT_LEN {
        return Err(PayloadError::TextTooLong);
    }
    let bytes = payload.get(1..1 + len).ok_or(PayloadError::TooShort)?;
    let text = core::str::from_utf8(bytes).map_err(|_| PayloadError::InvalidText)?;

    let mut out = String::new();
    out.push_str(text).map_err(|_| PayloadError::TextTooLong)?;
    Ok(out)
}
