//! Display configuration
//!
//! Geometry of the panel plus the compile-time tunables of the controller,
//! the field layout and the animation session. Every struct has a
//! `const fn` constructor so it can live in a `static`.

pub mod layout;

pub use layout::LayoutConfig;

/// Panel width in pixels (controller columns)
pub const WIDTH: u8 = 240;

/// Panel height in pixels
pub const HEIGHT: u8 = 128;

/// Vertical pixels packed into one display RAM byte
pub const PIXELS_PER_BYTE: u8 = 8;

/// Number of controller pages (bands of 8 rows)
pub const PAGES: u8 = HEIGHT / PIXELS_PER_BYTE;

/// UC1608 controller configuration
///
/// Each value is OR'd into the fixed bits of its command byte during the
/// power-on sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ControllerConfig {
    /// Power control bits PC[2:0]
    pub power_control: u8,
    /// Multiplex rate and temperature compensation bits MR, TC[1:0]
    pub mr_tc: u8,
    /// LCD bias ratio BR[1:0]
    pub bias_ratio: u8,
    /// Gain bits (upper two bits of the gain/PM byte)
    pub gain: u8,
    /// Potentiometer (contrast), 6 bits
    pub pm: u8,
    /// Mapping control MY, MX, MSF
    pub mapping: u8,
    /// RAM address control AC[2:0]
    pub address_control: u8,
    /// Status bits that must read clear after reset
    pub status_busy_mask: u8,
    /// Settle time after the reset command (ms)
    pub reset_settle_ms: u32,
    /// Discharge time after the shutdown reset (ms)
    pub shutdown_ms: u32,
}

impl ControllerConfig {
    /// Default configuration for the 240x128 panel
    pub const fn new() -> Self {
        Self {
            power_control: 0b111,
            mr_tc: 0b100,
            bias_ratio: 0b11,
            gain: 0b11,
            pm: 0x20,
            mapping: 0b100,
            address_control: 0b001,
            status_busy_mask: 0b1000_0000,
            reset_settle_ms: 20,
            shutdown_ms: 2,
        }
    }

    /// Second byte of the gain/PM command pair for a contrast value
    pub const fn gain_pm_byte(&self, pm: u8) -> u8 {
        ((self.gain & 0b11) << 6) | (pm & 0x3F)
    }
}

impl Default for ControllerConfig {
    fn default() -> Self {
        Self::new()
    }
}

/// Animation and diagnostics session timing
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct AnimationConfig {
    /// Seconds between sprite motion ticks
    pub motion_period_s: f32,
    /// Seconds between diagnostics overlay ticks
    pub diagnostics_period_s: f32,
    /// Minimum temperature change that triggers a redraw
    pub temperature_hysteresis: f32,
    /// Minimum light change that triggers a redraw
    pub light_hysteresis: f32,
    /// Pixels the sprite travels past either screen edge before turning
    pub bounce_margin: i16,
}

impl AnimationConfig {
    pub const fn new() -> Self {
        Self {
            motion_period_s: 0.04,
            diagnostics_period_s: 0.5,
            temperature_hysteresis: 0.01,
            light_hysteresis: 0.1,
            bounce_margin: 10,
        }
    }
}

impl Default for AnimationConfig {
    fn default() -> Self {
        Self::new()
    }
}
