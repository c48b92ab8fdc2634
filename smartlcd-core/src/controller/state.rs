//! Controller state tracking
//!
//! The UC1608 keeps its own address and read pipeline state. The driver
//! mirrors it here so that every operation knows where the device's
//! pointers are and whether the next RAM read returns a stale byte.

use crate::config::{PAGES, WIDTH};

use super::ControllerError;

/// Power state of the controller
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum PowerState {
    /// Display off, or never initialized
    Disabled,
    /// Reset issued, waiting for the status check
    PoweringUp,
    /// Power-on sequence complete, display on
    Enabled,
}

/// Read pipeline state
///
/// The controller's internal read pointer lags one access behind the
/// visible address after every address change.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ReadPipeline {
    /// No address set since reset
    Unaddressed,
    /// Address changed; the next read must discard one byte
    Stale,
    /// Reads return data directly
    Valid,
}

/// Mirror of the controller's internal state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ControllerState {
    power: PowerState,
    page: Option<u8>,
    column: Option<u8>,
    cursor_mode: bool,
    contrast: u8,
    pipeline: ReadPipeline,
}

impl ControllerState {
    pub const fn new(contrast: u8) -> Self {
        Self {
            power: PowerState::Disabled,
            page: None,
            column: None,
            cursor_mode: false,
            contrast: contrast & 0x3F,
            pipeline: ReadPipeline::Unaddressed,
        }
    }

    pub fn power(&self) -> PowerState {
        self.power
    }

    pub fn page(&self) -> Option<u8> {
        self.page
    }

    pub fn column(&self) -> Option<u8> {
        self.column
    }

    pub fn cursor_mode(&self) -> bool {
        self.cursor_mode
    }

    pub fn contrast(&self) -> u8 {
        self.contrast
    }

    pub fn pipeline(&self) -> ReadPipeline {
        self.pipeline
    }

    /// Reset command issued: every address is unknown again
    pub fn reset(&mut self) {
        self.power = PowerState::PoweringUp;
        self.page = None;
        self.column = None;
        self.cursor_mode = false;
        self.pipeline = ReadPipeline::Unaddressed;
    }

    pub fn set_power(&mut self, power: PowerState) {
        self.power = power;
    }

    pub fn set_contrast(&mut self, pm: u8) {
        self.contrast = pm & 0x3F;
    }

    pub fn set_cursor_mode(&mut self, on: bool) {
        self.cursor_mode = on;
    }

    /// Page address changed
    pub fn address_page(&mut self, page: u8) -> Result<(), ControllerError> {
        if page >= PAGES {
            return Err(ControllerError::PageOutOfRange(page));
        }
        self.page = Some(page);
        self.pipeline = ReadPipeline::Stale;
        Ok(())
    }

    /// Column address changed
    pub fn address_column(&mut self, column: u8) -> Result<(), ControllerError> {
        if column >= WIDTH {
            return Err(ControllerError::ColumnOutOfRange(column));
        }
        self.column = Some(column);
        self.pipeline = ReadPipeline::Stale;
        Ok(())
    }

    /// One RAM byte read or written: the column auto-increments and wraps
    /// onto the next page
    pub fn advance(&mut self) {
        if let Some(column) = self.column {
            if column + 1 >= WIDTH {
                self.column = Some(0);
                self.page = self.page.map(|page| (page + 1) % PAGES);
            } else {
                self.column = Some(column + 1);
            }
        }
    }

    /// Claim the next RAM read
    ///
    /// Returns whether the bus must flush a stale byte first. Reading
    /// before any address was set since reset is rejected.
    pub fn take_read_flush(&mut self) -> Result<bool, ControllerError> {
        match self.pipeline {
            ReadPipeline::Unaddressed => Err(ControllerError::NotAddressed),
            ReadPipeline::Stale => {
                self.pipeline = ReadPipeline::Valid;
                Ok(true)
            }
            ReadPipeline::Valid => Ok(false),
        }
    }
}
