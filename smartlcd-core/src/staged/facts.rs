//! Displayable facts
//!
//! Values arrive already decoded from their producers: fixed-point parts
//! are split into integer and fraction fields the way they are shown.

/// UTC time of day
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct TimeOfDay {
    pub hour: u8,
    pub minute: u8,
    pub second: u8,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Date {
    pub year: u16,
    pub month: u8,
    pub day: u8,
}

/// Reference clock lock state and phase error
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ClockState {
    /// Lock state nibble
    pub state: u8,
    /// Phase in hundredths of a degree
    pub phase100: i16,
}

/// Frequency deviation in parts per million
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Ppm {
    pub int: i16,
    pub frac1000: u16,
}

/// Oscillator pull PWM ratio in 1/256 steps
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Pwm {
    pub int: u8,
    pub frac1000: u16,
}

/// Oscillator pull voltage
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct PullVoltage {
    pub int: u8,
    pub frac1000: u16,
}

/// Satellites visible west and east, and used for the fix
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct SatUse {
    pub west: u8,
    pub east: u8,
    pub used: u8,
}

/// Dilution of precision, scaled by 100
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct SatDop {
    pub dop100: u16,
}

/// GPS fix indicator and 2D/3D mode
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct PosState {
    pub fi: u8,
    pub m2: u8,
}

/// Latitude or longitude in degrees and decimal minutes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Coordinate {
    /// Hemisphere letter (`N`, `S`, `E`, `W`)
    pub sign: char,
    pub deg: u8,
    pub min_int: u8,
    pub min_frac10000: u16,
}

impl Coordinate {
    pub const fn new() -> Self {
        Self {
            sign: ' ',
            deg: 0,
            min_int: 0,
            min_frac10000: 0,
        }
    }
}

impl Default for Coordinate {
    fn default() -> Self {
        Self::new()
    }
}

/// Height above sea level in metres
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Height {
    pub metres: i16,
}

/// Render code returned for the time fact
pub const CODE_TIME: u8 = 255;
/// Render code returned for the date fact
pub const CODE_DATE: u8 = 254;
/// Render code returned for the clock state fact
pub const CODE_CLOCK_STATE: u8 = 253;

/// Number of rotating slot facts
pub const SLOT_COUNT: u8 = 9;

/// A fact taken out of the store for rendering
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Fact {
    Time(TimeOfDay),
    Date(Date),
    ClockState(ClockState),
    Ppm(Ppm),
    Pwm(Pwm),
    PullVoltage(PullVoltage),
    SatUse(SatUse),
    SatDop(SatDop),
    PosState(PosState),
    Latitude(Coordinate),
    Longitude(Coordinate),
    Height(Height),
}

impl Fact {
    /// Code returned by the renderer after drawing this fact
    ///
    /// Always-tier facts count down from 255; slot facts return their slot
    /// number 1..=9.
    pub fn code(&self) -> u8 {
        match self {
            Fact::Time(_) => CODE_TIME,
            Fact::Date(_) => CODE_DATE,
            Fact::ClockState(_) => CODE_CLOCK_STATE,
            Fact::Ppm(_) => 1,
            Fact::Pwm(_) => 2,
            Fact::PullVoltage(_) => 3,
            Fact::SatUse(_) => 4,
            Fact::SatDop(_) => 5,
            Fact::PosState(_) => 6,
            Fact::Latitude(_) => 7,
            Fact::Longitude(_) => 8,
            Fact::Height(_) => 9,
        }
    }

    /// Text row of the fact's line
    pub fn row(&self) -> u8 {
        match self {
            Fact::ClockState(_) => 0,
            Fact::Date(_) => 1,
            Fact::Time(_) => 2,
            slot => slot.code() + 2,
        }
    }

    pub fn is_always(&self) -> bool {
        matches!(self, Fact::Time(_) | Fact::Date(_) | Fact::ClockState(_))
    }
}
