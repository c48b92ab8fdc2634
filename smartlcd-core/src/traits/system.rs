//! Time, background work and sensor readings

/// Monotonic wall clock
pub trait Clock {
    /// Seconds since an arbitrary fixed origin
    fn now(&self) -> f32;
}

/// Seconds from `origin_us` to `now_us` on a microsecond counter
///
/// The difference is taken in integers so the result keeps millisecond
/// resolution however long the counter has been running.
pub fn seconds_between(origin_us: u64, now_us: u64) -> f32 {
    now_us.saturating_sub(origin_us) as f32 / 1_000_000.0
}

/// Ancillary job run once per animation iteration
pub trait BackgroundTask {
    fn run(&mut self);
}

/// Values shown by the diagnostics overlay
pub trait DiagnosticsSource {
    /// Board temperature in degrees Celsius
    fn temperature(&self) -> f32;

    /// Ambient light intensity
    fn light(&self) -> f32;

    /// Button state bitmask
    fn buttons(&self) -> u8;
}

impl<T: BackgroundTask + ?Sized> BackgroundTask for &mut T {
    fn run(&mut self) {
        (**self).run()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_seconds_between_keeps_resolution_after_days() {
        let six_days_us = 6 * 24 * 3600 * 1_000_000u64;
        let a = seconds_between(six_days_us, six_days_us + 40_000);
        let b = seconds_between(six_days_us, six_days_us + 80_000);
        assert!((b - a - 0.04).abs() < 1e-5);

        // Absolute uptime in f32 cannot tell these two instants apart
        let coarse = (six_days_us + 40_000) as f32 / 1_000_000.0
            - (six_days_us + 20_000) as f32 / 1_000_000.0;
        assert_ne!(coarse, 0.02);
    }

    #[test]
    fn test_seconds_between_before_origin() {
        assert_eq!(seconds_between(5_000, 1_000), 0.0);
    }
}
