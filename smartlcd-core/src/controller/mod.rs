//! UC1608 display controller driver
//!
//! Power sequencing, page/column addressing, clearing and contrast on top
//! of a [`ParallelBus`]. The driver owns the bus and the busy-delay used
//! while the controller resets.

pub mod state;

pub use state::{ControllerState, PowerState, ReadPipeline};

use embedded_hal::delay::DelayNs;

use crate::bus::ParallelBus;
use crate::config::{ControllerConfig, PAGES, WIDTH};

/// Command bytes; parameter bits are OR'd into the low bits
pub mod cmd {
    pub const SET_COLUMN_LSB: u8 = 0b0000_0000;
    pub const SET_COLUMN_MSB: u8 = 0b0001_0000;
    pub const SET_MR_TC: u8 = 0b0010_0000;
    pub const SET_POWER_CONTROL: u8 = 0b0010_1000;
    pub const SET_START_LINE: u8 = 0b0100_0000;
    /// First byte of the two-byte gain/PM command
    pub const SET_GAIN_PM: u8 = 0b1000_0001;
    pub const SET_RAM_ADDRESS_CONTROL: u8 = 0b1000_1000;
    pub const SET_FIXED_LINES: u8 = 0b1001_0000;
    pub const ALL_PIXELS_ON: u8 = 0b1010_0100;
    pub const INVERSE: u8 = 0b1010_0110;
    pub const DISPLAY_ENABLE: u8 = 0b1010_1110;
    pub const SET_PAGE: u8 = 0b1011_0000;
    pub const SET_MAPPING: u8 = 0b1100_0000;
    pub const SYSTEM_RESET: u8 = 0b1110_0010;
    pub const SET_BIAS_RATIO: u8 = 0b1110_1000;
    pub const RESET_CURSOR_MODE: u8 = 0b1110_1110;
    pub const SET_CURSOR_MODE: u8 = 0b1110_1111;
}

/// Controller did not come up after reset
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum InitError {
    /// Status byte read after reset had a busy bit set
    ControllerNotReady { status: u8 },
}

/// Rejected controller operation
///
/// The device is left untouched when one of these is returned.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ControllerError {
    /// Page outside 0..16
    PageOutOfRange(u8),
    /// Column outside 0..240
    ColumnOutOfRange(u8),
    /// RAM read before any address was set since reset
    NotAddressed,
}

/// UC1608 driver
pub struct Uc1608<B, D> {
    bus: B,
    delay: D,
    config: ControllerConfig,
    state: ControllerState,
}

impl<B: ParallelBus, D: DelayNs> Uc1608<B, D> {
    pub fn new(bus: B, delay: D, config: ControllerConfig) -> Self {
        Self {
            bus,
            delay,
            state: ControllerState::new(config.pm),
            config,
        }
    }

    pub fn state(&self) -> &ControllerState {
        &self.state
    }

    pub fn config(&self) -> &ControllerConfig {
        &self.config
    }

    /// Give back the bus and the delay
    pub fn release(self) -> (B, D) {
        (self.bus, self.delay)
    }

    #[cfg(test)]
    pub(crate) fn bus_mut(&mut self) -> &mut B {
        &mut self.bus
    }

    /// Reset the controller, check it responds, then power it up and clear
    /// the display RAM
    ///
    /// Not retried here; the caller decides what to do on failure.
    pub fn initialize(&mut self) -> Result<(), InitError> {
        self.bus.write_command(cmd::SYSTEM_RESET);
        self.state.reset();
        self.delay.delay_ms(self.config.reset_settle_ms);

        let status = self.bus.read_status();
        if status & self.config.status_busy_mask != 0 {
            self.state.set_power(PowerState::Disabled);
            return Err(InitError::ControllerNotReady { status });
        }

        self.enable(true);
        self.clear();
        Ok(())
    }

    /// Reset the controller and let the panel discharge
    pub fn shutdown(&mut self) {
        self.bus.write_command(cmd::SYSTEM_RESET);
        self.state.reset();
        self.delay.delay_ms(self.config.shutdown_ms);
        self.state.set_power(PowerState::Disabled);
    }

    /// Run the power-on sequence, or turn the display off
    ///
    /// Turning off issues only the display-off command; all other
    /// controller settings are kept.
    pub fn enable(&mut self, on: bool) {
        if !on {
            self.bus.write_command(cmd::DISPLAY_ENABLE);
            self.state.set_power(PowerState::Disabled);
            return;
        }

        let config = self.config;
        self.bus
            .write_command(cmd::SET_POWER_CONTROL | (config.power_control & 0b111));
        self.bus.write_command(cmd::SET_MR_TC | (config.mr_tc & 0b111));
        self.bus
            .write_command(cmd::SET_BIAS_RATIO | (config.bias_ratio & 0b11));
        self.write_gain_pm();

        self.bus.write_command(cmd::SET_MAPPING | (config.mapping & 0b111));
        self.bus
            .write_command(cmd::SET_RAM_ADDRESS_CONTROL | (config.address_control & 0b111));

        self.bus.write_command(cmd::SET_START_LINE);
        self.bus.write_command(cmd::SET_FIXED_LINES);

        self.home();

        // Set then reset: the cursor row follows the column address
        self.bus.write_command(cmd::SET_CURSOR_MODE);
        self.bus.write_command(cmd::RESET_CURSOR_MODE);
        self.state.set_cursor_mode(false);

        self.bus.write_command(cmd::ALL_PIXELS_ON);
        self.bus.write_command(cmd::INVERSE);
        self.bus.write_command(cmd::DISPLAY_ENABLE | 1);
        self.state.set_power(PowerState::Enabled);
    }

    /// Select the page for following RAM accesses
    pub fn set_page(&mut self, page: u8) -> Result<(), ControllerError> {
        self.state.address_page(page)?;
        self.bus.write_command(cmd::SET_PAGE | page);
        Ok(())
    }

    /// Select the column for following RAM accesses
    pub fn set_column(&mut self, column: u8) -> Result<(), ControllerError> {
        self.state.address_column(column)?;
        self.write_column(column);
        Ok(())
    }

    /// Column 0 of the current page
    pub fn carriage_return(&mut self) {
        // Column 0 is always in range
        let _ = self.state.address_column(0);
        self.write_column(0);
    }

    /// Page 0, column 0
    pub fn home(&mut self) {
        let _ = self.state.address_page(0);
        self.bus.write_command(cmd::SET_PAGE);
        self.carriage_return();
    }

    /// Zero the whole display RAM, then home
    pub fn clear(&mut self) {
        for page in 0..PAGES {
            let _ = self.state.address_page(page);
            self.bus.write_command(cmd::SET_PAGE | page);
            let _ = self.state.address_column(0);
            self.write_column(0);

            for _ in 0..WIDTH {
                self.write_data(0);
            }
        }

        self.home();
    }

    /// Store a new 6-bit contrast value and send it
    pub fn update_contrast(&mut self, pm: u8) {
        self.state.set_contrast(pm);
        self.write_gain_pm();
    }

    /// Write one byte at the current address; the column auto-increments
    pub fn write_data(&mut self, byte: u8) {
        self.bus.write_data(byte);
        self.state.advance();
    }

    /// Write a run of column bytes into one page starting at `column`
    ///
    /// Bytes past the right edge are dropped.
    pub fn write_page(&mut self, page: u8, column: u8, data: &[u8]) -> Result<(), ControllerError> {
        self.set_page(page)?;
        self.set_column(column)?;

        let room = usize::from(WIDTH - column);
        for &byte in data.iter().take(room) {
            self.write_data(byte);
        }
        Ok(())
    }

    /// Read one byte at the current address
    ///
    /// The first read after an address change discards the stale byte
    /// still in the controller's read pipeline.
    pub fn read_data(&mut self) -> Result<u8, ControllerError> {
        let flush = self.state.take_read_flush()?;
        let byte = self.bus.read_data(flush);
        self.state.advance();
        Ok(byte)
    }

    /// Read column bytes of one page starting at `column` into `buf`
    ///
    /// Returns the number of bytes read, limited by the right edge.
    pub fn read_page(
        &mut self,
        page: u8,
        column: u8,
        buf: &mut [u8],
    ) -> Result<usize, ControllerError> {
        self.set_page(page)?;
        self.set_column(column)?;

        let count = buf.len().min(usize::from(WIDTH - column));
        for slot in buf.iter_mut().take(count) {
            *slot = self.read_data()?;
        }
        Ok(count)
    }

    pub fn read_status(&mut self) -> u8 {
        self.bus.read_status()
    }

    fn write_column(&mut self, column: u8) {
        self.bus.write_command(cmd::SET_COLUMN_LSB | (column & 0x0F));
        self.bus
            .write_command(cmd::SET_COLUMN_MSB | ((column >> 4) & 0x0F));
    }

    fn write_gain_pm(&mut self) {
        self.bus.write_command(cmd::SET_GAIN_PM);
        self.bus
            .write_command(self.config.gain_pm_byte(self.state.contrast()));
    }
}
