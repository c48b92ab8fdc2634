//! Smart-LCD Remote Drawing Protocol
//!
//! This crate defines the bit-exact command surface of the display: an
//! opcode byte followed by a fixed-size payload buffer. Commands drive a
//! turtle-graphics style pen that keeps its position and default pixel
//! type between commands.
//!
//! # Command Overview
//!
//! ```text
//! ┌────────┬──────────────────────────────────────────┐
//! │ OPCODE │ PAYLOAD (opcode specific, max 48 bytes)  │
//! │ 1B     │ 0–48B                                    │
//! └────────┴──────────────────────────────────────────┘
//! ```
//!
//! On the serial line each command travels as an opcode byte, a length
//! byte and the payload; see [`frame`].

#![cfg_attr(not(any(test, feature = "std")), no_std)]
#![deny(unsafe_code)]

pub mod command;
pub mod frame;
pub mod opcode;
pub mod pixel;

pub use command::{PayloadError, RemoteCommand, MAX_TEXT_LEN, PAYLOAD_SIZE};
pub use frame::{Frame, FrameError, FrameParser};
pub use opcode::Opcode;
pub use pixel::{PixelSelect, PixelType, PIXEL_PEN_DEFAULT};
