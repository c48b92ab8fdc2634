//! Smart-LCD Hardware Abstraction Layer
//!
//! This crate defines the pin-level traits the LCD bus transport is built on.
//! Chip-specific HALs implement them so the same driver code runs on
//! different microcontrollers and on the host with mock pins.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────┐
//! │  smartlcd-core (bus transport, driver)  │
//! └─────────────────────────────────────────┘
//!                     │
//!                     ▼
//! ┌─────────────────────────────────────────┐
//! │  smartlcd-hal (this crate - traits)     │
//! └─────────────────────────────────────────┘
//!                     │
//!                     ▼
//!             ┌───────────────┐
//!             │ smartlcd-hal- │
//!             │   stm32f0     │
//!             └───────────────┘
//! ```
//!
//! # Traits
//!
//! - [`gpio::OutputPin`], [`gpio::InputPin`] - Digital I/O for the control lines
//! - [`bus::DataPort`] - Bidirectional 8-bit data bus

#![no_std]
#![deny(unsafe_code)]

pub mod bus;
pub mod gpio;

// Re-export key traits at crate root for convenience
pub use bus::{BusLine, DataPort};
pub use gpio::{InputPin, OutputPin};
