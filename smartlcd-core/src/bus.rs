//! Parallel bus transport
//!
//! Every transaction with the controller is one bus cycle: select command
//! or display RAM, set the direction, strobe enable high then low, and
//! drive or sample the data lines. Each cycle runs inside a critical
//! section so an interrupt can never split it.
//!
//! The bus performs no integrity checks. A sampled byte is trusted as is,
//! since the physical protocol offers no way to detect corruption.

use smartlcd_hal::{DataPort, OutputPin};

/// Byte-level access to the LCD controller
pub trait ParallelBus {
    /// Write a command byte (`CD` low)
    fn write_command(&mut self, code: u8);

    /// Write a display RAM byte (`CD` high)
    fn write_data(&mut self, byte: u8);

    /// Read the status byte (`CD` low)
    fn read_status(&mut self) -> u8;

    /// Read a display RAM byte (`CD` high)
    ///
    /// With `flush_stale` set, one extra enable strobe first discards the
    /// byte the controller's read pipeline still holds from before the
    /// last address change.
    fn read_data(&mut self, flush_stale: bool) -> u8;
}

/// 8-bit parallel bus built from three control lines and a data port
pub struct LcdBus<CD, RW, EN, D> {
    /// Command (low) / display RAM (high) select
    cd: CD,
    /// Read (high) / write (low)
    rw: RW,
    /// Enable strobe
    en: EN,
    data: D,
}

impl<CD, RW, EN, D> LcdBus<CD, RW, EN, D>
where
    CD: OutputPin,
    RW: OutputPin,
    EN: OutputPin,
    D: DataPort,
{
    /// Create a bus with the enable strobe idle and the data port released
    pub fn new(cd: CD, rw: RW, en: EN, data: D) -> Self {
        let mut bus = Self { cd, rw, en, data };
        bus.en.set_low();
        bus.data.release();
        bus
    }

    /// Give back the pins
    pub fn release(self) -> (CD, RW, EN, D) {
        (self.cd, self.rw, self.en, self.data)
    }

    fn write_cycle(&mut self, ram: bool, byte: u8) {
        critical_section::with(|_| {
            self.data.drive(byte);
            self.cd.set_state(ram);
            self.rw.set_low();
            self.en.pulse();
        });
    }

    fn read_cycle(&mut self, ram: bool, flush_stale: bool) -> u8 {
        critical_section::with(|_| {
            // Drivers off before the controller starts driving
            self.data.release();
            self.cd.set_state(ram);
            self.rw.set_high();
            self.en.pulse();

            if flush_stale {
                let _ = self.data.sample();
                self.en.pulse();
            }

            self.data.sample()
        })
    }
}

impl<CD, RW, EN, D> ParallelBus for LcdBus<CD, RW, EN, D>
where
    CD: OutputPin,
    RW: OutputPin,
    EN: OutputPin,
    D: DataPort,
{
    fn write_command(&mut self, code: u8) {
        self.write_cycle(false, code);
    }

    fn write_data(&mut self, byte: u8) {
        self.write_cycle(true, byte);
    }

    fn read_status(&mut self) -> u8 {
        self.read_cycle(false, false)
    }

    fn read_data(&mut self, flush_stale: bool) -> u8 {
        self.read_cycle(true, flush_stale)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use smartlcd_hal::BusLine;
    use std::cell::RefCell;
    use std::collections::VecDeque;
    use std::rc::Rc;
    use std::vec::Vec;

    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    enum Wire {
        Set(BusLine, bool),
        Drive(u8),
        Release,
        Sample(u8),
    }

    /// Simulated bus: the controller latches the next queued byte on each
    /// falling enable edge
    #[derive(Default)]
    struct Sim {
        log: Vec<Wire>,
        queue: VecDeque<u8>,
        latched: u8,
        driving: bool,
    }

    struct Pin {
        line: BusLine,
        high: bool,
        sim: Rc<RefCell<Sim>>,
    }

    impl OutputPin for Pin {
        fn set_high(&mut self) {
            self.high = true;
            self.sim.borrow_mut().log.push(Wire::Set(self.line, true));
        }

        fn set_low(&mut self) {
            let falling = self.high;
            self.high = false;
            let mut sim = self.sim.borrow_mut();
            sim.log.push(Wire::Set(self.line, false));
            if self.line == BusLine::Enable && falling && !sim.driving {
                sim.latched = sim.queue.pop_front().unwrap_or(0xEE);
            }
        }

        fn is_set_high(&self) -> bool {
            self.high
        }
    }

    struct Port {
        sim: Rc<RefCell<Sim>>,
    }

    impl DataPort for Port {
        fn drive(&mut self, byte: u8) {
            let mut sim = self.sim.borrow_mut();
            sim.driving = true;
            sim.log.push(Wire::Drive(byte));
        }

        fn release(&mut self) {
            let mut sim = self.sim.borrow_mut();
            sim.driving = false;
            sim.log.push(Wire::Release);
        }

        fn sample(&self) -> u8 {
            let mut sim = self.sim.borrow_mut();
            let value = sim.latched;
            sim.log.push(Wire::Sample(value));
            value
        }

        fn is_driving(&self) -> bool {
            self.sim.borrow().driving
        }
    }

    fn bus(sim: &Rc<RefCell<Sim>>) -> LcdBus<Pin, Pin, Pin, Port> {
        let pin = |line| Pin {
            line,
            high: false,
            sim: sim.clone(),
        };
        let bus = LcdBus::new(
            pin(BusLine::CommandSelect),
            pin(BusLine::ReadWrite),
            pin(BusLine::Enable),
            Port { sim: sim.clone() },
        );
        sim.borrow_mut().log.clear();
        bus
    }

    fn strobes(log: &[Wire]) -> usize {
        log.iter()
            .filter(|w| **w == Wire::Set(BusLine::Enable, true))
            .count()
    }

    #[test]
    fn test_write_command_cycle() {
        let sim = Rc::new(RefCell::new(Sim::default()));
        let mut bus = bus(&sim);
        bus.write_command(0xE2);

        assert_eq!(
            sim.borrow().log,
            [
                Wire::Drive(0xE2),
                Wire::Set(BusLine::CommandSelect, false),
                Wire::Set(BusLine::ReadWrite, false),
                Wire::Set(BusLine::Enable, true),
                Wire::Set(BusLine::Enable, false),
            ]
        );
    }

    #[test]
    fn test_write_data_selects_ram() {
        let sim = Rc::new(RefCell::new(Sim::default()));
        let mut bus = bus(&sim);
        bus.write_data(0x55);

        let log = &sim.borrow().log;
        assert!(log.contains(&Wire::Set(BusLine::CommandSelect, true)));
        assert_eq!(strobes(log), 1);
    }

    #[test]
    fn test_read_releases_bus_before_strobe() {
        let sim = Rc::new(RefCell::new(Sim::default()));
        sim.borrow_mut().queue.push_back(0x10);
        let mut bus = bus(&sim);

        assert_eq!(bus.read_status(), 0x10);
        let log = &sim.borrow().log;
        let release = log.iter().position(|w| *w == Wire::Release).unwrap();
        let strobe = log
            .iter()
            .position(|w| *w == Wire::Set(BusLine::Enable, true))
            .unwrap();
        assert!(release < strobe);
        assert!(log.contains(&Wire::Set(BusLine::ReadWrite, true)));
    }

    #[test]
    fn test_read_data_flushes_one_stale_byte() {
        let sim = Rc::new(RefCell::new(Sim::default()));
        sim.borrow_mut().queue.extend([0xAA, 0x42, 0x43]);
        let mut bus = bus(&sim);

        assert_eq!(bus.read_data(true), 0x42);
        assert_eq!(strobes(&sim.borrow().log), 2);

        sim.borrow_mut().log.clear();
        assert_eq!(bus.read_data(false), 0x43);
        assert_eq!(strobes(&sim.borrow().log), 1);
    }
}
