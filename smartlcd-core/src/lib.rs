//! Board-agnostic core of the Smart-LCD display firmware
//!
//! This crate turns interrupt-safe field updates and remote drawing
//! commands into a correctly sequenced stream of bus transactions against
//! a UC1608 monochrome LCD controller:
//!
//! - Bus transport over an 8-bit parallel interface
//! - Controller driver with explicit addressing and read-pipeline state
//! - Staged update store written by producers from any context
//! - Field renderer draining one staged fact per foreground tick
//! - Remote command slot and interpreter with a persistent pen
//! - Animation and diagnostics session for the self-test mode
//!
//! Pixel plotting, the render cache, wall-clock time and the backlight
//! background job are consumed through the traits in [`traits`].

#![cfg_attr(not(test), no_std)]
#![deny(unsafe_code)]

pub mod animation;
pub mod backlight;
pub mod bus;
pub mod config;
pub mod controller;
pub mod remote;
pub mod renderer;
pub mod staged;
pub mod testpattern;
pub mod traits;

#[cfg(test)]
pub(crate) mod mock;

pub use animation::{AnimationFlag, AnimationSession, Step};
pub use backlight::{backlight_pwm, BacklightOutput, BacklightTask, LightSensorCell};
pub use bus::{LcdBus, ParallelBus};
pub use controller::{ControllerError, InitError, Uc1608};
pub use remote::{CommandError, CommandSlot, Interpreter, SubmitError};
pub use renderer::FieldRenderer;
pub use staged::StagedStore;
pub use testpattern::run_test_pattern;
