//! Field renderer
//!
//! Drains the staged store one fact per foreground tick and draws it as a
//! labelled text line. The clock state additionally draws the phase bar
//! along the bottom of the screen.

use core::fmt::Write;

use heapless::String;
use smartlcd_protocol::PixelType;

use crate::config::LayoutConfig;
use crate::staged::{ClockState, Fact, SlotCursor, StagedStore};
use crate::traits::Plotter;

/// Returned by [`FieldRenderer::poll_render`] when nothing was dirty
pub const NO_UPDATE: u8 = 0;

/// Phase clamp, hundredths of a degree
const PHASE_LIMIT: i16 = 18000;

type Line = String<48>;

/// Renders staged facts with a persistent slot cursor
pub struct FieldRenderer {
    cursor: SlotCursor,
    layout: LayoutConfig,
}

impl FieldRenderer {
    pub const fn new(layout: LayoutConfig) -> Self {
        Self {
            cursor: SlotCursor::new(),
            layout,
        }
    }

    pub fn cursor(&self) -> SlotCursor {
        self.cursor
    }

    /// Render at most one dirty fact
    ///
    /// Returns 255/254/253 for time, date and clock state, the slot number
    /// 1..=9 for slot facts, or [`NO_UPDATE`].
    pub fn poll_render<P: Plotter + ?Sized>(&mut self, store: &StagedStore, plotter: &mut P) -> u8 {
        // The store lock is released before any drawing
        let Some(fact) = store.take_next(&mut self.cursor) else {
            return NO_UPDATE;
        };

        self.draw(&fact, plotter);
        fact.code()
    }

    fn draw<P: Plotter + ?Sized>(&self, fact: &Fact, plotter: &mut P) {
        let mut line = Line::new();
        // Every label fits the line buffer
        let _ = match fact {
            Fact::Time(t) => write!(
                line,
                "UTC     : {:02}:{:02}.{:02}",
                t.hour, t.minute, t.second
            ),
            Fact::Date(d) => write!(line, "Date    : {:02}.{:02}.{:04}", d.day, d.month, d.year),
            Fact::ClockState(c) => write!(line, "ClkState: 0x{:01X}", c.state),
            Fact::Ppm(p) => write!(line, "Precis. : {:03}.{:03} ppm", p.int, p.frac1000),
            Fact::Pwm(p) => write!(line, "PWM     : {:3}.{:03} / 256 %", p.int, p.frac1000),
            Fact::PullVoltage(v) => write!(line, "PullVolt: {:1}.{:03} V", v.int, v.frac1000),
            Fact::SatUse(s) => write!(
                line,
                "SatUse  : West={:02} East={:02} Used={:02} sats",
                s.west, s.east, s.used
            ),
            Fact::SatDop(s) => write!(line, "Sat DOP : {:03}.{:02}", s.dop100 / 100, s.dop100 % 100),
            Fact::PosState(s) => write!(line, "SatState: FI={:1} M2={:1}", s.fi, s.m2),
            Fact::Latitude(c) => write!(
                line,
                "Sat Lat : {}  {:02}^{:02}.{:04}'",
                c.sign, c.deg, c.min_int, c.min_frac10000
            ),
            Fact::Longitude(c) => write!(
                line,
                "Sat Lon : {} {:03}^{:02}.{:04}'",
                c.sign, c.deg, c.min_int, c.min_frac10000
            ),
            Fact::Height(h) => write!(line, "Sat Hgt : {:04} m", h.metres),
        };

        plotter.draw_string(&line, self.layout.line_left, self.layout.line_y(fact.row()));

        if let Fact::ClockState(state) = fact {
            self.draw_phase_bar(state, plotter);
        }
    }

    fn draw_phase_bar<P: Plotter + ?Sized>(&self, clock: &ClockState, plotter: &mut P) {
        let layout = &self.layout;
        let phase = clock.phase100.clamp(-PHASE_LIMIT, PHASE_LIMIT);
        let dx = i32::from(phase) * i32::from(layout.phase_half_span) / i32::from(PHASE_LIMIT);

        plotter.draw_string("Phase   :", 0, layout.phase_bar_y);
        plotter.draw_filled_rect(
            layout.phase_bar_left,
            layout.phase_bar_y,
            layout.phase_bar_width,
            layout.phase_bar_height,
            PixelType::Clear,
        );

        if dx == 0 {
            plotter.draw_line(
                layout.phase_center_x,
                layout.phase_bar_y + 1,
                layout.phase_center_x,
                layout.phase_bar_y + 5,
                PixelType::Set,
            );
            return;
        }

        // Bar grows left of centre for negative phase
        let width = dx.unsigned_abs() as u8;
        let left = if dx < 0 {
            layout.phase_center_x - width
        } else {
            layout.phase_center_x
        };

        match clock.state {
            0xF => plotter.draw_filled_rect(
                left,
                layout.phase_bar_y,
                width,
                layout.phase_bar_height,
                PixelType::Set,
            ),
            0x7 => plotter.draw_rect(
                left,
                layout.phase_bar_y,
                width,
                layout.phase_bar_height,
                PixelType::Set,
            ),
            0x1..=0x3 => plotter.draw_filled_rect(
                layout.phase_bar_left,
                layout.phase_bar_y,
                layout.phase_bar_width,
                3,
                PixelType::Set,
            ),
            _ => {}
        }
    }
}

impl Default for FieldRenderer {
    fn default() -> Self {
        Self::new(LayoutConfig::new())
    }
}
