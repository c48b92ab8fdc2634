//! Ambient-light driven backlight
//!
//! The light sensor interrupt records raw ADC samples; the background
//! task turns the latest one into a backlight PWM duty whenever it
//! changes.

use core::cell::Cell;

use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::blocking_mutex::Mutex;

use crate::traits::BackgroundTask;

/// Intensity reported for a fully dark sensor (ADC reads 0)
pub const MAX_INTENSITY: u16 = 10_000;

/// Intensity at and above which the backlight is switched off
pub const OFF_INTENSITY: u16 = 1_000;

/// Lowest duty while the backlight is on (about 10 %)
pub const MIN_DUTY: u8 = 26;

/// Relative light intensity from a raw sensor sample
///
/// The sensor voltage falls with brightness, so intensity is inversely
/// proportional to the sample.
pub fn light_intensity(adc: u16) -> u16 {
    if adc == 0 {
        MAX_INTENSITY
    } else {
        (MAX_INTENSITY / 2) / adc
    }
}

/// Backlight duty (0..=255) for a raw sensor sample
pub fn backlight_pwm(adc: u16) -> u8 {
    let intensity = u32::from(light_intensity(adc));
    if intensity >= u32::from(OFF_INTENSITY) {
        return 0;
    }

    let span = u32::from(u8::MAX - MIN_DUTY);
    MIN_DUTY + (span * intensity / u32::from(OFF_INTENSITY)) as u8
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct LightSample {
    pub last: u16,
    pub current: u16,
}

/// Latest two light sensor samples, written from interrupt context
pub struct LightSensorCell {
    samples: Mutex<CriticalSectionRawMutex, Cell<LightSample>>,
}

impl LightSensorCell {
    pub const fn new() -> Self {
        Self {
            samples: Mutex::new(Cell::new(LightSample {
                last: 0,
                current: 0,
            })),
        }
    }

    pub fn record(&self, adc: u16) {
        self.samples.lock(|samples| {
            let previous = samples.get().current;
            samples.set(LightSample {
                last: previous,
                current: adc,
            });
        });
    }

    pub fn get(&self) -> LightSample {
        self.samples.lock(|samples| samples.get())
    }
}

impl Default for LightSensorCell {
    fn default() -> Self {
        Self::new()
    }
}

/// PWM output driving the backlight
pub trait BacklightOutput {
    fn set_duty(&mut self, duty: u8);
}

/// Background job updating the backlight from the light sensor
pub struct BacklightTask<'a, O> {
    sensor: &'a LightSensorCell,
    output: O,
    applied: Option<u16>,
}

impl<'a, O: BacklightOutput> BacklightTask<'a, O> {
    pub fn new(sensor: &'a LightSensorCell, output: O) -> Self {
        Self {
            sensor,
            output,
            applied: None,
        }
    }

    pub fn output(&self) -> &O {
        &self.output
    }
}

impl<O: BacklightOutput> BackgroundTask for BacklightTask<'_, O> {
    fn run(&mut self) {
        let sample = self.sensor.get().current;
        if self.applied == Some(sample) {
            return;
        }
        self.applied = Some(sample);
        self.output.set_duty(backlight_pwm(sample));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Default)]
    struct Duty(Vec<u8>);

    impl BacklightOutput for Duty {
        fn set_duty(&mut self, duty: u8) {
            self.0.push(duty);
        }
    }

    #[test]
    fn test_curve() {
        // Dark: intensity saturates, backlight off
        assert_eq!(backlight_pwm(0), 0);
        assert_eq!(backlight_pwm(5), 0);
        // 5000 / 6 = 833
        assert_eq!(backlight_pwm(6), 26 + (229 * 833 / 1000) as u8);
        assert_eq!(backlight_pwm(5000), 26);
        assert_eq!(backlight_pwm(u16::MAX), 26);
    }

    #[test]
    fn test_intensity() {
        assert_eq!(light_intensity(0), 10_000);
        assert_eq!(light_intensity(1), 5_000);
        assert_eq!(light_intensity(100), 50);
    }

    #[test]
    fn test_cell_keeps_previous_sample() {
        let cell = LightSensorCell::new();
        cell.record(10);
        cell.record(20);
        assert_eq!(cell.get(), LightSample { last: 10, current: 20 });
    }

    #[test]
    fn test_task_updates_on_change_only() {
        let cell = LightSensorCell::new();
        let mut task = BacklightTask::new(&cell, Duty::default());

        cell.record(50);
        task.run();
        task.run();
        cell.record(500);
        task.run();

        assert_eq!(task.output().0, [backlight_pwm(50), backlight_pwm(500)]);
    }
}
