//! Single-entry command slot
//!
//! The transport writes one raw command; the interpreter takes it exactly
//! once. Both sides go through the same critical section, so the payload
//! can never change under a decode in progress.

use core::cell::RefCell;

use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::blocking_mutex::Mutex;
use smartlcd_protocol::opcode::OPCODE_NONE;
use smartlcd_protocol::{Opcode, RemoteCommand, PAYLOAD_SIZE};

use super::CommandError;

/// Why a command was not accepted into the slot
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum SubmitError {
    /// The previous command has not been taken yet
    Busy,
    /// Opcode 0 marks an empty slot
    EmptyOpcode,
    /// Payload does not fit the slot buffer
    PayloadTooLarge,
}

struct Raw {
    opcode: u8,
    payload: [u8; PAYLOAD_SIZE],
    len: usize,
}

/// Depth-1 queue between the transport and the interpreter
pub struct CommandSlot {
    raw: Mutex<CriticalSectionRawMutex, RefCell<Raw>>,
}

impl CommandSlot {
    pub const fn new() -> Self {
        Self {
            raw: Mutex::new(RefCell::new(Raw {
                opcode: OPCODE_NONE,
                payload: [0; PAYLOAD_SIZE],
                len: 0,
            })),
        }
    }

    /// Store a raw command
    ///
    /// Unknown opcodes are accepted here and rejected by the interpreter.
    pub fn submit(&self, opcode: u8, payload: &[u8]) -> Result<(), SubmitError> {
        if opcode == OPCODE_NONE {
            return Err(SubmitError::EmptyOpcode);
        }
        if payload.len() > PAYLOAD_SIZE {
            return Err(SubmitError::PayloadTooLarge);
        }

        self.raw.lock(|raw| {
            let mut raw = raw.borrow_mut();
            if raw.opcode != OPCODE_NONE {
                return Err(SubmitError::Busy);
            }
            raw.payload[..payload.len()].copy_from_slice(payload);
            raw.len = payload.len();
            raw.opcode = opcode;
            Ok(())
        })
    }

    pub fn is_pending(&self) -> bool {
        self.raw.lock(|raw| raw.borrow().opcode != OPCODE_NONE)
    }

    /// Take and decode the pending command, freeing the slot
    ///
    /// Returns `None` when the slot is empty. A command that fails to
    /// decode still frees the slot.
    pub fn take(&self) -> Option<Result<RemoteCommand, CommandError>> {
        self.raw.lock(|raw| {
            let mut raw = raw.borrow_mut();
            let opcode = raw.opcode;
            if opcode == OPCODE_NONE {
                return None;
            }
            raw.opcode = OPCODE_NONE;

            let decoded = match Opcode::from_u8(opcode) {
                Some(op) => {
                    RemoteCommand::decode(op, &raw.payload[..raw.len]).map_err(CommandError::Payload)
                }
                None => Err(CommandError::UnknownOpcode(opcode)),
            };
            Some(decoded)
        })
    }
}

impl Default for CommandSlot {
    fn default() -> Self {
        Self::new()
    }
}
