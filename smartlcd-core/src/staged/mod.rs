//! Staged update store
//!
//! Producers push decoded values from any context; the renderer drains
//! them one at a time. A setter only marks its fact dirty when a
//! component actually changed, so steady producers cost nothing.
//!
//! Every access runs under a critical section. The renderer clears a dirty
//! flag in the same section that copies the value out, so a producer
//! racing the renderer either lands before the copy or re-dirties the
//! fact for the next pass.

pub mod facts;

use core::cell::RefCell;

use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::blocking_mutex::Mutex;

pub use facts::{
    ClockState, Coordinate, Date, Fact, Height, PosState, Ppm, PullVoltage, Pwm, SatDop, SatUse,
    TimeOfDay, SLOT_COUNT,
};

/// A value with a changed-but-not-yet-rendered flag
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Staged<T> {
    value: T,
    dirty: bool,
    /// Taken at least once, so it is on screen
    shown: bool,
}

impl<T: Copy + PartialEq> Staged<T> {
    pub const fn new(value: T) -> Self {
        Self {
            value,
            dirty: false,
            shown: false,
        }
    }

    /// Store a value; returns whether it differed from the stored one
    pub fn set(&mut self, value: T) -> bool {
        if self.value == value {
            return false;
        }
        self.value = value;
        self.dirty = true;
        true
    }

    /// Copy the value out if dirty, clearing the flag
    pub fn take(&mut self) -> Option<T> {
        if !self.dirty {
            return None;
        }
        self.dirty = false;
        self.shown = true;
        Some(self.value)
    }

    /// Re-dirty a value that was already rendered
    ///
    /// Facts never taken stay clean so their placeholder is not drawn.
    pub fn invalidate(&mut self) {
        if self.shown {
            self.dirty = true;
        }
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    pub fn value(&self) -> T {
        self.value
    }
}

/// All staged facts
struct Facts {
    time: Staged<TimeOfDay>,
    date: Staged<Date>,
    clock_state: Staged<ClockState>,
    ppm: Staged<Ppm>,
    pwm: Staged<Pwm>,
    pull_voltage: Staged<PullVoltage>,
    sat_use: Staged<SatUse>,
    sat_dop: Staged<SatDop>,
    pos_state: Staged<PosState>,
    latitude: Staged<Coordinate>,
    longitude: Staged<Coordinate>,
    height: Staged<Height>,
}

impl Facts {
    const fn new() -> Self {
        Self {
            time: Staged::new(TimeOfDay {
                hour: 0,
                minute: 0,
                second: 0,
            }),
            date: Staged::new(Date {
                year: 0,
                month: 0,
                day: 0,
            }),
            clock_state: Staged::new(ClockState {
                state: 0,
                phase100: 0,
            }),
            ppm: Staged::new(Ppm { int: 0, frac1000: 0 }),
            pwm: Staged::new(Pwm { int: 0, frac1000: 0 }),
            pull_voltage: Staged::new(PullVoltage { int: 0, frac1000: 0 }),
            sat_use: Staged::new(SatUse {
                west: 0,
                east: 0,
                used: 0,
            }),
            sat_dop: Staged::new(SatDop { dop100: 0 }),
            pos_state: Staged::new(PosState { fi: 0, m2: 0 }),
            latitude: Staged::new(Coordinate::new()),
            longitude: Staged::new(Coordinate::new()),
            height: Staged::new(Height { metres: 0 }),
        }
    }

    /// Always tier, in priority order
    fn take_always(&mut self) -> Option<Fact> {
        if let Some(time) = self.time.take() {
            return Some(Fact::Time(time));
        }
        if let Some(date) = self.date.take() {
            return Some(Fact::Date(date));
        }
        self.clock_state.take().map(Fact::ClockState)
    }

    /// Slot tier, by zero-based slot index
    fn take_slot(&mut self, index: u8) -> Option<Fact> {
        match index {
            0 => self.ppm.take().map(Fact::Ppm),
            1 => self.pwm.take().map(Fact::Pwm),
            2 => self.pull_voltage.take().map(Fact::PullVoltage),
            3 => self.sat_use.take().map(Fact::SatUse),
            4 => self.sat_dop.take().map(Fact::SatDop),
            5 => self.pos_state.take().map(Fact::PosState),
            6 => self.latitude.take().map(Fact::Latitude),
            7 => self.longitude.take().map(Fact::Longitude),
            8 => self.height.take().map(Fact::Height),
            _ => None,
        }
    }
}

/// Rotating position in the slot tier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct SlotCursor(u8);

impl SlotCursor {
    pub const fn new() -> Self {
        Self(0)
    }

    /// Zero-based slot index the next scan starts at
    pub fn index(&self) -> u8 {
        self.0
    }
}

/// Shared store of staged facts
///
/// Const-constructible so it can be a `static` written from interrupt
/// handlers and read by the foreground renderer.
pub struct StagedStore {
    facts: Mutex<CriticalSectionRawMutex, RefCell<Facts>>,
}

impl StagedStore {
    pub const fn new() -> Self {
        Self {
            facts: Mutex::new(RefCell::new(Facts::new())),
        }
    }

    fn update<R>(&self, f: impl FnOnce(&mut Facts) -> R) -> R {
        self.facts.lock(|facts| f(&mut facts.borrow_mut()))
    }

    /// Each setter returns whether the fact became dirty
    pub fn set_time(&self, hour: u8, minute: u8, second: u8) -> bool {
        self.update(|f| {
            f.time.set(TimeOfDay {
                hour,
                minute,
                second,
            })
        })
    }

    pub fn set_date(&self, year: u16, month: u8, day: u8) -> bool {
        self.update(|f| f.date.set(Date { year, month, day }))
    }

    pub fn set_clock_state(&self, state: u8, phase100: i16) -> bool {
        self.update(|f| f.clock_state.set(ClockState { state, phase100 }))
    }

    pub fn set_ppm(&self, int: i16, frac1000: u16) -> bool {
        self.update(|f| f.ppm.set(Ppm { int, frac1000 }))
    }

    pub fn set_pwm(&self, int: u8, frac1000: u16) -> bool {
        self.update(|f| f.pwm.set(Pwm { int, frac1000 }))
    }

    pub fn set_pull_voltage(&self, int: u8, frac1000: u16) -> bool {
        self.update(|f| f.pull_voltage.set(PullVoltage { int, frac1000 }))
    }

    pub fn set_sat_use(&self, west: u8, east: u8, used: u8) -> bool {
        self.update(|f| f.sat_use.set(SatUse { west, east, used }))
    }

    pub fn set_sat_dop(&self, dop100: u16) -> bool {
        self.update(|f| f.sat_dop.set(SatDop { dop100 }))
    }

    pub fn set_pos_state(&self, fi: u8, m2: u8) -> bool {
        self.update(|f| f.pos_state.set(PosState { fi, m2 }))
    }

    pub fn set_position_lat(&self, sign: char, deg: u8, min_int: u8, min_frac10000: u16) -> bool {
        self.update(|f| {
            f.latitude.set(Coordinate {
                sign,
                deg,
                min_int,
                min_frac10000,
            })
        })
    }

    pub fn set_position_lon(&self, sign: char, deg: u8, min_int: u8, min_frac10000: u16) -> bool {
        self.update(|f| {
            f.longitude.set(Coordinate {
                sign,
                deg,
                min_int,
                min_frac10000,
            })
        })
    }

    pub fn set_position_height(&self, metres: i16) -> bool {
        self.update(|f| f.height.set(Height { metres }))
    }

    /// Take the most urgent dirty fact
    ///
    /// Always-tier facts come first in priority order. Otherwise the slot
    /// tier is scanned circularly from `cursor`; the cursor moves past the
    /// slot taken, or back to the first slot when nothing is dirty.
    pub fn take_next(&self, cursor: &mut SlotCursor) -> Option<Fact> {
        self.update(|facts| {
            if let Some(fact) = facts.take_always() {
                return Some(fact);
            }

            for offset in 0..SLOT_COUNT {
                let index = (cursor.0 + offset) % SLOT_COUNT;
                if let Some(fact) = facts.take_slot(index) {
                    cursor.0 = (index + 1) % SLOT_COUNT;
                    return Some(fact);
                }
            }

            cursor.0 = 0;
            None
        })
    }

    /// Queue every rendered fact for another draw
    ///
    /// Called after the screen was wiped behind the renderer's back, so
    /// facts whose values never change come back.
    pub fn invalidate_all(&self) {
        self.update(|f| {
            f.time.invalidate();
            f.date.invalidate();
            f.clock_state.invalidate();
            f.ppm.invalidate();
            f.pwm.invalidate();
            f.pull_voltage.invalidate();
            f.sat_use.invalidate();
            f.sat_dop.invalidate();
            f.pos_state.invalidate();
            f.latitude.invalidate();
            f.longitude.invalidate();
            f.height.invalidate();
        })
    }

    /// Whether any fact waits for rendering
    pub fn has_pending(&self) -> bool {
        self.update(|f| {
            f.time.is_dirty()
                || f.date.is_dirty()
                || f.clock_state.is_dirty()
                || f.ppm.is_dirty()
                || f.pwm.is_dirty()
                || f.pull_voltage.is_dirty()
                || f.sat_use.is_dirty()
                || f.sat_dop.is_dirty()
                || f.pos_state.is_dirty()
                || f.latitude.is_dirty()
                || f.longitude.is_dirty()
                || f.height.is_dirty()
        })
    }
}

impl Default for StagedStore {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_staged_set_only_on_change() {
        let mut staged = Staged::new(5u8);
        assert!(!staged.set(5));
        assert!(!staged.is_dirty());
        assert!(staged.set(6));
        assert_eq!(staged.take(), Some(6));
        assert_eq!(staged.take(), None);
    }

    #[test]
    fn test_setter_idempotent() {
        let store = StagedStore::new();
        assert!(store.set_time(12, 30, 15));
        assert!(!store.set_time(12, 30, 15));

        let mut cursor = SlotCursor::new();
        assert!(matches!(store.take_next(&mut cursor), Some(Fact::Time(_))));
        assert_eq!(store.take_next(&mut cursor), None);
    }

    #[test]
    fn test_every_component_compared() {
        let store = StagedStore::new();
        store.set_position_lat('N', 48, 7, 1234);
        let mut cursor = SlotCursor::new();
        store.take_next(&mut cursor);

        assert!(store.set_position_lat('N', 48, 8, 1234));
        assert!(store.set_position_lon('E', 11, 0, 0));
        assert!(store.set_position_lon('E', 12, 0, 0));
    }

    #[test]
    fn test_always_priority_order() {
        let store = StagedStore::new();
        store.set_ppm(1, 0);
        store.set_clock_state(0xF, 100);
        store.set_date(2024, 5, 1);
        store.set_time(1, 2, 3);

        let mut cursor = SlotCursor::new();
        let codes: Vec<u8> = core::iter::from_fn(|| store.take_next(&mut cursor))
            .map(|f| f.code())
            .collect();
        assert_eq!(codes, [255, 254, 253, 1]);
    }

    #[test]
    fn test_cursor_advances_and_resets() {
        let store = StagedStore::new();
        store.set_sat_dop(150);
        store.set_pwm(10, 0);

        let mut cursor = SlotCursor::new();
        assert_eq!(store.take_next(&mut cursor).map(|f| f.code()), Some(2));
        assert_eq!(cursor.index(), 2);
        assert_eq!(store.take_next(&mut cursor).map(|f| f.code()), Some(5));
        assert_eq!(cursor.index(), 5);
        assert_eq!(store.take_next(&mut cursor), None);
        assert_eq!(cursor.index(), 0);
    }

    #[test]
    fn test_scan_wraps_past_last_slot() {
        let store = StagedStore::new();
        store.set_position_height(400);
        let mut cursor = SlotCursor::new();
        store.take_next(&mut cursor);
        assert_eq!(cursor.index(), 0);

        store.set_position_height(401);
        store.set_ppm(3, 0);
        store.set_sat_use(1, 2, 3);
        // Start past ppm: sat use is found first, ppm only after wrapping
        cursor.0 = 2;
        assert_eq!(store.take_next(&mut cursor).map(|f| f.code()), Some(4));
        assert_eq!(store.take_next(&mut cursor).map(|f| f.code()), Some(9));
        assert_eq!(cursor.index(), 0);
        assert_eq!(store.take_next(&mut cursor).map(|f| f.code()), Some(1));
    }

    #[test]
    fn test_invalidate_only_rendered() {
        let mut staged = Staged::new(0u8);
        staged.invalidate();
        assert_eq!(staged.take(), None);

        staged.set(3);
        assert_eq!(staged.take(), Some(3));
        staged.invalidate();
        assert_eq!(staged.take(), Some(3));
    }

    #[test]
    fn test_invalidate_all_keeps_unset_facts_clean() {
        let store = StagedStore::new();
        store.set_date(2024, 5, 17);
        store.set_position_height(320);
        let mut cursor = SlotCursor::new();
        while store.take_next(&mut cursor).is_some() {}

        store.invalidate_all();
        let codes: Vec<u8> = core::iter::from_fn(|| store.take_next(&mut cursor))
            .map(|f| f.code())
            .collect();
        assert_eq!(codes, [254, 9]);
    }

    #[test]
    fn test_has_pending() {
        let store = StagedStore::new();
        assert!(!store.has_pending());
        store.set_pos_state(1, 0);
        assert!(store.has_pending());
    }
}
