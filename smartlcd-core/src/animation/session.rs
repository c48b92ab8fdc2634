//! Animation and diagnostics session
//!
//! A cooperative task: the caller drives [`AnimationSession::step`] from
//! its loop with the current time, and stops when it returns
//! [`Step::Finished`].

use core::fmt::Write;

use heapless::String;
use smartlcd_protocol::PixelType;

use crate::config::{AnimationConfig, PAGES, PIXELS_PER_BYTE, WIDTH};
use crate::traits::{BackgroundTask, DiagnosticsSource, Plotter};

use super::sprite::{Sprite, SPRITE_LEN};
use super::sweep::LineSweep;
use super::{AnimationFlag, Step};

/// Diagnostics overlay position
const OVERLAY_X: u8 = 180;
const TEMPERATURE_Y: u8 = 70;
const LIGHT_Y: u8 = 80;
const BUTTONS_Y: u8 = 90;

/// Largest overlay readings, 99.99 °C and 9999.9
const TEMPERATURE_MAX_CENTI: i32 = 9999;
const LIGHT_MAX_TENTHS: i32 = 99_999;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum SessionState {
    Idle,
    Running,
}

/// Last drawn overlay values; `None` forces a redraw
#[derive(Debug, Clone, Copy, Default)]
struct Overlay {
    temperature: Option<f32>,
    light: Option<f32>,
    buttons: Option<u8>,
}

pub struct AnimationSession {
    config: AnimationConfig,
    state: SessionState,
    sprite: Sprite,
    /// Left edge of the sprite; off-screen values are allowed
    origin: i16,
    /// -1, 0 or +1
    dx: i8,
    last_motion: Option<f32>,
    last_diagnostics: Option<f32>,
    overlay: Overlay,
    sweep: LineSweep,
}

impl AnimationSession {
    pub const fn new(config: AnimationConfig) -> Self {
        Self {
            config,
            state: SessionState::Idle,
            sprite: Sprite::empty(),
            origin: 0,
            dx: 0,
            last_motion: None,
            last_diagnostics: None,
            overlay: Overlay {
                temperature: None,
                light: None,
                buttons: None,
            },
            sweep: LineSweep::new(),
        }
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn is_running(&self) -> bool {
        self.state == SessionState::Running
    }

    pub fn origin(&self) -> i16 {
        self.origin
    }

    pub fn direction(&self) -> i8 {
        self.dx
    }

    /// Lowest sprite origin before turning right
    pub fn min_origin(&self) -> i16 {
        -(SPRITE_LEN as i16) - self.config.bounce_margin
    }

    /// Highest sprite origin before turning left
    pub fn max_origin(&self) -> i16 {
        i16::from(WIDTH) + self.config.bounce_margin
    }

    /// Build the sprite, park it off the left edge and blank its strip
    pub fn prepare<P: Plotter + ?Sized>(&mut self, plotter: &mut P) {
        self.sprite = Sprite::build();
        self.origin = -(SPRITE_LEN as i16);
        self.dx = 1;
        self.last_motion = None;
        self.last_diagnostics = None;
        self.overlay = Overlay::default();
        self.sweep = LineSweep::new();

        plotter.draw_filled_rect(
            0,
            (PAGES - 1) * PIXELS_PER_BYTE,
            WIDTH,
            PIXELS_PER_BYTE,
            PixelType::Clear,
        );
        self.state = SessionState::Running;
    }

    /// Run one iteration
    ///
    /// Finishes, clearing `flag`, once the flag is cleared or the sprite
    /// stops moving.
    pub fn step<P, T, S>(
        &mut self,
        now: f32,
        flag: &AnimationFlag,
        plotter: &mut P,
        background: &mut T,
        sensors: &S,
    ) -> Step
    where
        P: Plotter + ?Sized,
        T: BackgroundTask + ?Sized,
        S: DiagnosticsSource + ?Sized,
    {
        if self.state != SessionState::Running || !flag.is_set() || self.dx == 0 {
            flag.clear();
            self.state = SessionState::Idle;
            return Step::Finished;
        }

        if due(self.last_motion, now, self.config.motion_period_s) {
            self.last_motion = Some(now);
            self.advance_sprite();
            self.blit_sprite(plotter);
        }

        if due(self.last_diagnostics, now, self.config.diagnostics_period_s) {
            self.last_diagnostics = Some(now);
            self.draw_diagnostics(sensors, plotter);
        }

        self.sweep.advance(plotter);
        background.run();

        Step::Continue
    }

    fn advance_sprite(&mut self) {
        self.origin += i16::from(self.dx);

        if self.origin <= self.min_origin() {
            self.dx = 1;
        } else if self.origin >= self.max_origin() {
            self.dx = -1;
        }
    }

    fn blit_sprite<P: Plotter + ?Sized>(&self, plotter: &mut P) {
        let bitmap = self.sprite.facing(self.dx);
        let page = PAGES - 1;

        if (0..i16::from(WIDTH)).contains(&self.origin) {
            // The plotter clips the part past the right edge
            plotter.put_page(bitmap, page, self.origin as u8);
        } else if -(SPRITE_LEN as i16) < self.origin && self.origin < 0 {
            let hidden = self.origin.unsigned_abs() as usize;
            plotter.put_page(&bitmap[hidden..], page, 0);
        }
    }

    fn draw_diagnostics<S, P>(&mut self, sensors: &S, plotter: &mut P)
    where
        S: DiagnosticsSource + ?Sized,
        P: Plotter + ?Sized,
    {
        let mut line: String<16> = String::new();

        // Fixed-point values are clamped to the field widths, so every
        // line fits the buffer
        let temperature = sensors.temperature().max(0.0);
        if changed(self.overlay.temperature, temperature, self.config.temperature_hysteresis) {
            self.overlay.temperature = Some(temperature);
            let centi = ((temperature * 100.0) as i32).clamp(0, TEMPERATURE_MAX_CENTI);
            let _ = write!(line, " T={:2}.{:02}^C ", centi / 100, centi % 100);
            plotter.draw_string(&line, OVERLAY_X, TEMPERATURE_Y);
        }

        let light = sensors.light().max(0.0);
        if changed(self.overlay.light, light, self.config.light_hysteresis) {
            self.overlay.light = Some(light);
            line.clear();
            let tenths = ((light * 10.0) as i32).clamp(0, LIGHT_MAX_TENTHS);
            let _ = write!(line, " L={:4}.{:01} ", tenths / 10, tenths % 10);
            plotter.draw_string(&line, OVERLAY_X, LIGHT_Y);
        }

        let buttons = sensors.buttons();
        if self.overlay.buttons != Some(buttons) {
            self.overlay.buttons = Some(buttons);
            line.clear();
            let _ = write!(line, " B=0x{:02X} ", buttons);
            plotter.draw_string(&line, OVERLAY_X, BUTTONS_Y);
        }
    }
}

impl Default for AnimationSession {
    fn default() -> Self {
        Self::new(AnimationConfig::new())
    }
}

fn due(last: Option<f32>, now: f32, period: f32) -> bool {
    match last {
        Some(last) => now - last >= period,
        None => true,
    }
}

fn changed(last: Option<f32>, value: f32, hysteresis: f32) -> bool {
    match last {
        Some(last) => {
            let delta = value - last;
            delta >= hysteresis || delta <= -hysteresis
        }
        None => true,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mock::{CountingTask, DrawOp, RecordingPlotter, Sensors};
    use proptest::prelude::*;

    struct Rig {
        session: AnimationSession,
        flag: AnimationFlag,
        plotter: RecordingPlotter,
        task: CountingTask,
        sensors: Sensors,
    }

    impl Rig {
        fn prepared() -> Self {
            let mut rig = Self {
                session: AnimationSession::default(),
                flag: AnimationFlag::new(),
                plotter: RecordingPlotter::default(),
                task: CountingTask::default(),
                sensors: Sensors::default(),
            };
            rig.session.prepare(&mut rig.plotter);
            rig.flag.set();
            rig
        }

        fn step(&mut self, now: f32) -> Step {
            self.session.step(
                now,
                &self.flag,
                &mut self.plotter,
                &mut self.task,
                &self.sensors,
            )
        }
    }

    #[test]
    fn test_prepare_blanks_strip() {
        let rig = Rig::prepared();
        assert_eq!(
            rig.plotter.ops,
            [DrawOp::FilledRect(0, 120, 240, 8, PixelType::Clear)]
        );
        assert!(rig.session.is_running());
        assert_eq!(rig.session.origin(), -61);
        assert_eq!(rig.session.direction(), 1);
    }

    #[test]
    fn test_first_step_enters_from_left() {
        let mut rig = Rig::prepared();
        rig.plotter.ops.clear();
        assert_eq!(rig.step(0.0), Step::Continue);

        assert_eq!(rig.session.origin(), -60);
        let pages = rig.plotter.pages();
        assert_eq!(pages.len(), 1);
        let (data, page, column) = pages[0];
        assert_eq!((data.len(), page, column), (1, 15, 0));
        assert_eq!(rig.task.runs, 1);
    }

    #[test]
    fn test_motion_is_time_gated() {
        let mut rig = Rig::prepared();
        rig.step(1.0);
        rig.step(1.01);
        rig.step(1.02);
        assert_eq!(rig.session.origin(), -60);
        rig.step(1.05);
        assert_eq!(rig.session.origin(), -59);
        assert_eq!(rig.task.runs, 4);
    }

    #[test]
    fn test_full_sprite_on_screen() {
        let mut rig = Rig::prepared();
        for i in 0..=100 {
            rig.step(i as f32 * 0.05);
        }
        assert_eq!(rig.session.origin(), 40);
        let (data, page, column) = *rig.plotter.pages().last().unwrap();
        assert_eq!((data.len(), page, column), (61, 15, 40));
        assert_eq!(data, rig.session.sprite.facing(1));
    }

    #[test]
    fn test_cleared_flag_finishes() {
        let mut rig = Rig::prepared();
        rig.step(0.0);
        rig.flag.clear();
        let runs = rig.task.runs;

        assert_eq!(rig.step(0.1), Step::Finished);
        assert_eq!(rig.session.state(), SessionState::Idle);
        assert_eq!(rig.task.runs, runs);
        assert_eq!(rig.step(0.2), Step::Finished);
    }

    #[test]
    fn test_unprepared_session_finishes_and_clears_flag() {
        let mut session = AnimationSession::default();
        let flag = AnimationFlag::new();
        flag.set();
        let step = session.step(
            0.0,
            &flag,
            &mut RecordingPlotter::default(),
            &mut CountingTask::default(),
            &Sensors::default(),
        );
        assert_eq!(step, Step::Finished);
        assert!(!flag.is_set());
    }

    #[test]
    fn test_diagnostics_redraw_on_change_only() {
        let mut rig = Rig::prepared();
        rig.sensors = Sensors {
            temperature: 23.456,
            light: 12.3,
            buttons: 0x05,
        };
        rig.step(0.0);
        assert_eq!(
            rig.plotter.texts(),
            [" T=23.45^C ", " L=  12.3 ", " B=0x05 "]
        );

        // Below both thresholds, same buttons
        rig.sensors.temperature = 23.46;
        rig.sensors.light = 12.35;
        rig.plotter.ops.clear();
        rig.step(0.6);
        assert!(rig.plotter.texts().is_empty());

        rig.sensors.temperature = -4.0;
        rig.sensors.buttons = 0x06;
        rig.plotter.ops.clear();
        rig.step(1.2);
        assert_eq!(rig.plotter.texts(), [" T= 0.00^C ", " B=0x06 "]);
    }

    #[test]
    fn test_diagnostics_clamped_to_field_width() {
        let mut rig = Rig::prepared();
        rig.sensors = Sensors {
            temperature: 250.0,
            light: 1.0e6,
            buttons: 0xFF,
        };
        rig.step(0.0);
        assert_eq!(
            rig.plotter.texts(),
            [" T=99.99^C ", " L=9999.9 ", " B=0xFF "]
        );
    }

    proptest! {
        #[test]
        fn test_bounce_stays_in_bounds(ticks in 1usize..1500) {
            let mut rig = Rig::prepared();
            let low = rig.session.min_origin();
            let high = rig.session.max_origin();
            prop_assert_eq!((low, high), (-71, 250));

            for i in 0..ticks {
                let before = rig.session.direction();
                rig.step(i as f32 * 0.05);
                let origin = rig.session.origin();
                prop_assert!(origin >= low && origin <= high);

                let after = rig.session.direction();
                if after != before {
                    prop_assert!(origin == low || origin == high);
                }
                if origin == high {
                    prop_assert_eq!(after, -1);
                }
                if origin == low {
                    prop_assert_eq!(after, 1);
                }
            }
        }
    }
}
