//! Display backend abstraction
//!
//! The frame buffer only needs to move whole page runs in and out of
//! display RAM, so the backend is reduced to two page operations.

use embedded_hal::delay::DelayNs;
use smartlcd_core::{ControllerError, ParallelBus, Uc1608};

/// Display operation errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum DisplayError {
    /// Controller rejected the transfer
    Controller(ControllerError),
}

impl From<ControllerError> for DisplayError {
    fn from(e: ControllerError) -> Self {
        DisplayError::Controller(e)
    }
}

/// Page-oriented display RAM access
pub trait DisplayBackend {
    /// Write column bytes into `page` starting at `column`
    fn write_page(&mut self, page: u8, column: u8, data: &[u8]) -> Result<(), DisplayError>;

    /// Read column bytes of `page` starting at `column`
    ///
    /// Returns how many bytes were filled.
    fn read_page(&mut self, page: u8, column: u8, buf: &mut [u8]) -> Result<usize, DisplayError>;
}

impl<B: ParallelBus, D: DelayNs> DisplayBackend for Uc1608<B, D> {
    fn write_page(&mut self, page: u8, column: u8, data: &[u8]) -> Result<(), DisplayError> {
        Ok(Uc1608::write_page(self, page, column, data)?)
    }

    fn read_page(&mut self, page: u8, column: u8, buf: &mut [u8]) -> Result<usize, DisplayError> {
        Ok(Uc1608::read_page(self, page, column, buf)?)
    }
}
