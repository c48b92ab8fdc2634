//! Parallel data bus abstraction
//!
//! The LCD controller is attached through an 8-bit bidirectional data bus
//! plus three control lines. Switching the bus between driving and sensing
//! must never leave both sides driving at once, so the port exposes the two
//! directions as explicit operations.

/// Logical control lines of the parallel LCD interface
///
/// Only the bus transport toggles these lines.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum BusLine {
    /// Data bus direction (drive vs. sense)
    DataDirection,
    /// Command (low) or display RAM (high) select, `CD`
    CommandSelect,
    /// Read (high) or write (low), `RW`
    ReadWrite,
    /// Enable strobe, `EN`
    Enable,
}

/// Bidirectional 8-bit data port
///
/// Implementations map the eight data lines onto one GPIO port or onto
/// individually addressed pins.
pub trait DataPort {
    /// Enable the output drivers and put `byte` on the bus
    fn drive(&mut self, byte: u8);

    /// Disable the output drivers and enable pull-ups so the
    /// controller can drive the bus
    fn release(&mut self);

    /// Sample the current level of all eight data lines
    fn sample(&self) -> u8;

    /// Check whether the port currently drives the bus
    fn is_driving(&self) -> bool;
}
