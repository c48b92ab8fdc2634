//! Opcode byte values
//!
//! Opcode `0x00` is reserved: an empty command slot holds it, and the
//! interpreter acknowledges "nothing pending" with it.

/// Opcode value of an empty command slot
pub const OPCODE_NONE: u8 = 0x00;

/// Remote command opcodes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u8)]
pub enum Opcode {
    /// Clear render cache and reinitialize the controller
    Reset = 0x01,
    /// Clear render cache and the display RAM
    ClearScreen = 0x02,
    /// Set the pen's default pixel type
    SetPixelType = 0x10,
    /// Move the pen without drawing
    SetPosition = 0x11,
    /// Draw text at the pen position
    Write = 0x20,
    /// Line from the pen to a target, pen follows
    DrawLine = 0x30,
    /// Rectangle frame at the pen origin
    DrawRect = 0x31,
    /// Filled rectangle at the pen origin
    DrawFilledRect = 0x32,
    /// Circle centred at the pen
    DrawCircle = 0x33,
    /// Filled circle centred at the pen
    DrawFilledCircle = 0x34,
}

impl Opcode {
    /// Get the opcode as a byte value
    pub fn as_u8(self) -> u8 {
        self as u8
    }

    /// Create an opcode from a byte value
    pub fn from_u8(value: u8) -> Option<Self> {
        match value {
            0x01 => Some(Opcode::Reset),
            0x02 => Some(Opcode::ClearScreen),
            0x10 => Some(Opcode::SetPixelType),
            0x11 => Some(Opcode::SetPosition),
            0x20 => Some(Opcode::Write),
            0x30 => Some(Opcode::DrawLine),
            0x31 => Some(Opcode::DrawRect),
            0x32 => Some(Opcode::DrawFilledRect),
            0x33 => Some(Opcode::DrawCircle),
            0x34 => Some(Opcode::DrawFilledCircle),
            _ => None,
        }
    }

    /// Minimum number of payload bytes this opcode requires
    ///
    /// For [`Opcode::Write`] this covers only the length prefix.
    pub const fn min_payload_len(self) -> usize {
        match self {
            Opcode::Reset | Opcode::ClearScreen => 0,
            Opcode::SetPixelType | Opcode::Write => 1,
            Opcode::SetPosition | Opcode::DrawCircle | Opcode::DrawFilledCircle => 2,
            Opcode::DrawLine | Opcode::DrawRect | Opcode::DrawFilledRect => 3,
        }
    }

    /// Whether executing this opcode wipes the whole screen
    pub const fn clears_screen(self) -> bool {
        matches!(self, Opcode::Reset | Opcode::ClearScreen)
    }
}
