//! GPIO implementations for STM32F0
//!
//! The LCD control lines are push-pull outputs. The data bus uses `Flex`
//! pins that switch between push-pull output and pulled-up input.

use embassy_stm32::gpio::{Flex, Input, Level, Output, Pull, Speed};
use smartlcd_hal::{DataPort, InputPin, OutputPin};

/// LCD control line (CD, RW or EN)
pub struct ControlPin<'d>(Output<'d>);

impl<'d> ControlPin<'d> {
    pub fn new(pin: Output<'d>) -> Self {
        Self(pin)
    }
}

impl OutputPin for ControlPin<'_> {
    fn set_high(&mut self) {
        self.0.set_high();
    }

    fn set_low(&mut self) {
        self.0.set_low();
    }

    fn is_set_high(&self) -> bool {
        self.0.is_set_high()
    }
}

/// Active-low push button
pub struct ButtonPin<'d>(Input<'d>);

impl<'d> ButtonPin<'d> {
    pub fn new(pin: Input<'d>) -> Self {
        Self(pin)
    }
}

impl InputPin for ButtonPin<'_> {
    fn is_high(&self) -> bool {
        self.0.is_high()
    }
}

/// Eight individually addressed data lines, D0 first
pub struct FlexDataPort<'d> {
    lines: [Flex<'d>; 8],
    driving: bool,
}

impl<'d> FlexDataPort<'d> {
    /// Take the eight data pins; the port starts released
    pub fn new(lines: [Flex<'d>; 8]) -> Self {
        let mut port = Self {
            lines,
            driving: true,
        };
        port.release();
        port
    }
}

impl DataPort for FlexDataPort<'_> {
    fn drive(&mut self, byte: u8) {
        // Levels first so the lines never glitch when the drivers turn on
        for (bit, line) in self.lines.iter_mut().enumerate() {
            line.set_level(Level::from(byte & (1 << bit) != 0));
        }
        if !self.driving {
            for line in self.lines.iter_mut() {
                line.set_as_output(Speed::High);
            }
            self.driving = true;
        }
    }

    fn release(&mut self) {
        if self.driving {
            for line in self.lines.iter_mut() {
                line.set_as_input(Pull::Up);
            }
            self.driving = false;
        }
    }

    fn sample(&self) -> u8 {
        self.lines
            .iter()
            .enumerate()
            .fold(0, |byte, (bit, line)| {
                if line.is_high() {
                    byte | (1 << bit)
                } else {
                    byte
                }
            })
    }

    fn is_driving(&self) -> bool {
        self.driving
    }
}
