//! Line sweep overlay
//!
//! One line per animation iteration, sweeping through a band near the
//! top of the screen: first rocking the right end downwards, then walking
//! both ends across. Each full pass switches the pixel type.

use smartlcd_protocol::PixelType;

use crate::config::WIDTH;
use crate::traits::Plotter;

/// Top row of the band
const TOP: u16 = 10;
/// Band height
const BAND: u16 = 18;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct LineSweep {
    step: u16,
    pass: u8,
}

impl LineSweep {
    pub const fn new() -> Self {
        Self { step: 0, pass: 0 }
    }

    pub fn pixel(&self) -> PixelType {
        PixelType::cycle(self.pass)
    }

    /// Draw the next line, or wrap to the next pass
    pub fn advance<P: Plotter + ?Sized>(&mut self, plotter: &mut P) {
        let width = u16::from(WIDTH);
        let pixel = self.pixel();
        let previous = self.step;
        self.step += 1;
        let step = self.step;

        if previous < BAND {
            plotter.draw_line(
                0,
                (TOP + step) as u8,
                (width - 1) as u8,
                (TOP + BAND - step - 1) as u8,
                pixel,
            );
        } else if step < BAND + width {
            let x = step - BAND;
            plotter.draw_line(
                x as u8,
                (TOP + BAND - 1) as u8,
                (width - x - 1) as u8,
                TOP as u8,
                pixel,
            );
        } else {
            self.step = 0;
            self.pass = (self.pass + 1) % 3;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mock::{DrawOp, RecordingPlotter};

    #[test]
    fn test_first_lines() {
        let mut sweep = LineSweep::new();
        let mut plotter = RecordingPlotter::default();
        sweep.advance(&mut plotter);
        sweep.advance(&mut plotter);

        assert_eq!(
            plotter.ops,
            [
                DrawOp::Line(0, 11, 239, 26, PixelType::Clear),
                DrawOp::Line(0, 12, 239, 25, PixelType::Clear),
            ]
        );
    }

    #[test]
    fn test_walk_phase_and_wrap() {
        let mut sweep = LineSweep::new();
        let mut plotter = RecordingPlotter::default();
        for _ in 0..19 {
            sweep.advance(&mut plotter);
        }
        assert_eq!(
            plotter.ops.last(),
            Some(&DrawOp::Line(1, 27, 238, 10, PixelType::Clear))
        );

        // Remaining walk lines, then one silent wrap
        for _ in 19..(18 + 240) {
            sweep.advance(&mut plotter);
        }
        assert_eq!(plotter.ops.len(), 18 + 239);
        assert_eq!(sweep.pixel(), PixelType::Set);
    }

    #[test]
    fn test_pixel_cycles() {
        let mut sweep = LineSweep::new();
        let mut plotter = RecordingPlotter::default();
        let mut seen = Vec::new();
        for _ in 0..3 {
            seen.push(sweep.pixel());
            for _ in 0..(18 + 240) {
                sweep.advance(&mut plotter);
            }
        }
        assert_eq!(seen, [PixelType::Clear, PixelType::Set, PixelType::Invert]);
        assert_eq!(sweep.pixel(), PixelType::Clear);
    }
}
