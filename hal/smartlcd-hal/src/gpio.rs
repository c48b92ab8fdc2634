//! Single-line pins
//!
//! The LCD control lines (CD, RW, EN) are outputs that the bus transport
//! drives from inside its critical section, so none of these operations
//! may block or fail. Inputs cover the board's push buttons.

/// Output line with a readable latch
pub trait OutputPin {
    fn set_high(&mut self);

    fn set_low(&mut self);

    /// Level most recently written, not the sensed pad level
    fn is_set_high(&self) -> bool;

    /// Drive `high` onto the line
    fn set_state(&mut self, high: bool) {
        if high {
            self.set_high();
        } else {
            self.set_low();
        }
    }

    /// One high pulse, ending low
    ///
    /// The controller latches on the falling edge; the pulse width is
    /// whatever two back-to-back pin writes take on the target.
    fn pulse(&mut self) {
        self.set_high();
        self.set_low();
    }
}

/// Sensed input line
pub trait InputPin {
    fn is_high(&self) -> bool;

    fn is_low(&self) -> bool {
        !self.is_high()
    }
}
