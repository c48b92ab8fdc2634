//! STM32F0-specific HAL for the Smart-LCD firmware
//!
//! This crate implements the `smartlcd-hal` pin traits on top of
//! `embassy-stm32` GPIO and carries the command channel UART settings.
//! It supports STM32F072 chips:
//!
//! - STM32F072RB (64-pin, data bus on one full port)
//! - STM32F072CB (48-pin)
//!
//! # Features
//!
//! - `stm32f072rb` / `stm32f072cb` - Select the chip
//! - `defmt` - Enable debug formatting support
//!
//! # Usage
//!
//! The firmware takes the pins from `embassy_stm32::init`, wraps them in
//! [`gpio::ControlPin`] and [`gpio::FlexDataPort`], and hands those to the
//! bus transport in `smartlcd-core`.

#![no_std]

pub mod gpio;
pub mod uart;

pub use gpio::{ButtonPin, ControlPin, FlexDataPort};
pub use uart::{UartBusError, UartConfig};
