//! Local frame buffer for the Smart-LCD panel
//!
//! This crate provides:
//! - [`FrameBuffer`], a page-ordered copy of display RAM implementing the
//!   core [`Plotter`](smartlcd_core::traits::Plotter) with embedded-graphics
//!   primitives and text
//! - [`DisplayBackend`], the page transfer seam implemented for the UC1608
//!   driver
//!
//! Drawing only touches the local frame. Dirty pages reach the panel when
//! the caller flushes.

#![cfg_attr(not(test), no_std)]

pub mod backend;
pub mod framebuffer;

pub use backend::{DisplayBackend, DisplayError};
pub use framebuffer::{FrameBuffer, SYSTEM_FONT};
