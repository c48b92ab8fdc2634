//! Board glue between embassy peripherals and the display core

use core::cell::Cell;

use embassy_stm32::peripherals::TIM3;
use embassy_stm32::timer::simple_pwm::SimplePwm;
use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::blocking_mutex::Mutex;
use embassy_time::Instant;
use smartlcd_core::backlight::light_intensity;
use smartlcd_core::traits::{seconds_between, Clock, DiagnosticsSource};
use smartlcd_core::{BacklightOutput, LightSensorCell};

/// Internal sensor voltage at 25 °C (V)
const TEMP_V25: f32 = 1.43;
/// Internal sensor slope (V/°C)
const TEMP_SLOPE: f32 = 0.0043;
const VDDA: f32 = 3.3;
const ADC_FULL_SCALE: f32 = 4095.0;

/// Board temperature from a raw internal sensor sample
pub fn temperature_from_adc(raw: u16) -> f32 {
    let volts = f32::from(raw) * VDDA / ADC_FULL_SCALE;
    (TEMP_V25 - volts) / TEMP_SLOPE + 25.0
}

/// Seconds since the clock was started
pub struct Uptime {
    origin: Instant,
}

impl Uptime {
    pub fn starting_now() -> Self {
        Self {
            origin: Instant::now(),
        }
    }
}

impl Clock for Uptime {
    fn now(&self) -> f32 {
        seconds_between(self.origin.as_micros(), Instant::now().as_micros())
    }
}

/// Latest temperature sample and button state
pub struct Readings {
    temperature: Mutex<CriticalSectionRawMutex, Cell<f32>>,
    buttons: Mutex<CriticalSectionRawMutex, Cell<u8>>,
}

impl Readings {
    pub const fn new() -> Self {
        Self {
            temperature: Mutex::new(Cell::new(0.0)),
            buttons: Mutex::new(Cell::new(0)),
        }
    }

    pub fn set_temperature(&self, celsius: f32) {
        self.temperature.lock(|t| t.set(celsius));
    }

    pub fn set_buttons(&self, mask: u8) {
        self.buttons.lock(|b| b.set(mask));
    }
}

/// Diagnostics overlay source backed by the shared readings
pub struct BoardSensors {
    pub readings: &'static Readings,
    pub light: &'static LightSensorCell,
}

impl DiagnosticsSource for BoardSensors {
    fn temperature(&self) -> f32 {
        self.readings.temperature.lock(|t| t.get())
    }

    fn light(&self) -> f32 {
        f32::from(light_intensity(self.light.get().current))
    }

    fn buttons(&self) -> u8 {
        self.readings.buttons.lock(|b| b.get())
    }
}

/// Backlight on TIM3 channel 1
pub struct PwmBacklight {
    pwm: SimplePwm<'static, TIM3>,
}

impl PwmBacklight {
    pub fn new(mut pwm: SimplePwm<'static, TIM3>) -> Self {
        pwm.ch1().set_duty_cycle_fully_off();
        pwm.ch1().enable();
        Self { pwm }
    }
}

impl BacklightOutput for PwmBacklight {
    fn set_duty(&mut self, duty: u8) {
        self.pwm
            .ch1()
            .set_duty_cycle_fraction(u16::from(duty), u16::from(u8::MAX));
    }
}
