//! Remote drawing commands
//!
//! The transport submits raw commands into a [`CommandSlot`]; the
//! foreground loop polls an [`Interpreter`] once per tick to execute them.

pub mod interpreter;
pub mod slot;

pub use interpreter::{Interpreter, Pen};
pub use slot::{CommandSlot, SubmitError};

use smartlcd_protocol::PayloadError;

use crate::controller::InitError;

/// A command that was taken from the slot but not executed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum CommandError {
    /// Opcode byte is not part of the protocol
    UnknownOpcode(u8),
    /// Payload does not decode for its opcode
    Payload(PayloadError),
    /// Controller did not come back after a reset command
    ResetFailed(InitError),
}

impl From<PayloadError> for CommandError {
    fn from(err: PayloadError) -> Self {
        CommandError::Payload(err)
    }
}
