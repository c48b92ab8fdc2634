//! Remote command interpreter
//!
//! Executes one command from the slot per call against the plotter and
//! the controller, with a persistent turtle-graphics pen.

use embedded_hal::delay::DelayNs;
use smartlcd_protocol::opcode::OPCODE_NONE;
use smartlcd_protocol::{PixelSelect, PixelType, RemoteCommand};

use crate::bus::ParallelBus;
use crate::controller::Uc1608;
use crate::traits::Plotter;

use super::{CommandError, CommandSlot};

/// Drawing position and default pixel type
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Pen {
    pub x: u8,
    pub y: u8,
    pub pixel: PixelType,
}

impl Pen {
    pub const fn new() -> Self {
        Self {
            x: 0,
            y: 0,
            pixel: PixelType::Set,
        }
    }

    fn resolve(&self, select: PixelSelect) -> PixelType {
        select.resolve(self.pixel)
    }
}

impl Default for Pen {
    fn default() -> Self {
        Self::new()
    }
}

/// Interpreter state between commands
#[derive(Debug, Default)]
pub struct Interpreter {
    pen: Pen,
}

impl Interpreter {
    pub const fn new() -> Self {
        Self { pen: Pen::new() }
    }

    pub fn pen(&self) -> Pen {
        self.pen
    }

    /// Execute the pending command, if any
    ///
    /// Returns the executed opcode as acknowledgement, or 0 when the slot
    /// was empty. The slot is freed even when the command is rejected.
    pub fn poll_remote_command<B, D, P>(
        &mut self,
        slot: &CommandSlot,
        controller: &mut Uc1608<B, D>,
        plotter: &mut P,
    ) -> Result<u8, CommandError>
    where
        B: ParallelBus,
        D: DelayNs,
        P: Plotter + ?Sized,
    {
        // Decoded under the slot lock; drawing happens after release
        let Some(decoded) = slot.take() else {
            return Ok(OPCODE_NONE);
        };
        let command = decoded?;

        self.execute(&command, controller, plotter)?;
        plotter.cache_clear();
        Ok(command.opcode().as_u8())
    }

    /// Execute one decoded command
    pub fn execute<B, D, P>(
        &mut self,
        command: &RemoteCommand,
        controller: &mut Uc1608<B, D>,
        plotter: &mut P,
    ) -> Result<(), CommandError>
    where
        B: ParallelBus,
        D: DelayNs,
        P: Plotter + ?Sized,
    {
        let pen = self.pen;

        match command {
            RemoteCommand::Reset => {
                plotter.clear();
                plotter.cache_clear();
                controller.initialize().map_err(CommandError::ResetFailed)?;
                self.pen = Pen::new();
            }
            RemoteCommand::ClearScreen => {
                plotter.clear();
                plotter.cache_clear();
                controller.clear();
            }
            RemoteCommand::SetPixelType(pixel) => {
                self.pen.pixel = *pixel;
            }
            RemoteCommand::SetPosition { x, y } => {
                self.pen.x = *x;
                self.pen.y = *y;
            }
            RemoteCommand::Write(text) => {
                plotter.draw_string(text, pen.x, pen.y);
            }
            RemoteCommand::DrawLine { to_x, to_y, pixel } => {
                plotter.draw_line(pen.x, pen.y, *to_x, *to_y, pen.resolve(*pixel));
                self.pen.x = *to_x;
                self.pen.y = *to_y;
            }
            RemoteCommand::DrawRect {
                width,
                height,
                pixel,
            } => {
                plotter.draw_rect(pen.x, pen.y, *width, *height, pen.resolve(*pixel));
            }
            RemoteCommand::DrawFilledRect {
                width,
                height,
                pixel,
            } => {
                plotter.draw_filled_rect(pen.x, pen.y, *width, *height, pen.resolve(*pixel));
            }
            RemoteCommand::DrawCircle { radius, pixel } => {
                plotter.draw_circle(pen.x, pen.y, *radius, pen.resolve(*pixel));
            }
            RemoteCommand::DrawFilledCircle { radius, pixel } => {
                plotter.draw_filled_circle(pen.x, pen.y, *radius, pen.resolve(*pixel));
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ControllerConfig;
    use crate::controller::InitError;
    use crate::mock::{DrawOp, MockBus, NoDelay, RecordingPlotter};
    use proptest::prelude::*;
    use smartlcd_protocol::{Opcode, PayloadError};

    struct Rig {
        slot: CommandSlot,
        interpreter: Interpreter,
        controller: Uc1608<MockBus, NoDelay>,
        plotter: RecordingPlotter,
    }

    impl Rig {
        fn new() -> Self {
            Self {
                slot: CommandSlot::new(),
                interpreter: Interpreter::new(),
                controller: Uc1608::new(
                    MockBus::default(),
                    NoDelay::default(),
                    ControllerConfig::new(),
                ),
                plotter: RecordingPlotter::default(),
            }
        }

        fn run(&mut self, opcode: Opcode, payload: &[u8]) -> Result<u8, CommandError> {
            self.slot.submit(opcode.as_u8(), payload).unwrap();
            self.poll()
        }

        fn poll(&mut self) -> Result<u8, CommandError> {
            self.interpreter
                .poll_remote_command(&self.slot, &mut self.controller, &mut self.plotter)
        }
    }

    #[test]
    fn test_nothing_pending() {
        let mut rig = Rig::new();
        assert_eq!(rig.poll(), Ok(0));
        assert!(rig.plotter.ops.is_empty());
    }

    #[test]
    fn test_line_from_pen_with_default_pixel() {
        let mut rig = Rig::new();
        assert_eq!(rig.run(Opcode::SetPosition, &[10, 10]), Ok(0x11));
        assert_eq!(rig.run(Opcode::DrawLine, &[50, 50, 255]), Ok(0x30));

        assert_eq!(
            rig.plotter.ops,
            [
                DrawOp::CacheClear,
                DrawOp::Line(10, 10, 50, 50, PixelType::Set),
                DrawOp::CacheClear,
            ]
        );
        assert_eq!((rig.interpreter.pen().x, rig.interpreter.pen().y), (50, 50));
    }

    #[test]
    fn test_pen_default_pixel_type() {
        let mut rig = Rig::new();
        rig.run(Opcode::SetPixelType, &[2]).unwrap();
        rig.run(Opcode::SetPosition, &[20, 30]).unwrap();
        rig.run(Opcode::DrawFilledRect, &[5, 6, 255]).unwrap();
        rig.run(Opcode::DrawRect, &[5, 6, 0]).unwrap();
        rig.run(Opcode::DrawCircle, &[4, 255]).unwrap();
        rig.run(Opcode::DrawFilledCircle, &[4, 1]).unwrap();

        let draws: Vec<_> = rig
            .plotter
            .ops
            .iter()
            .filter(|op| **op != DrawOp::CacheClear)
            .cloned()
            .collect();
        assert_eq!(
            draws,
            [
                DrawOp::FilledRect(20, 30, 5, 6, PixelType::Invert),
                DrawOp::Rect(20, 30, 5, 6, PixelType::Clear),
                DrawOp::Circle(20, 30, 4, PixelType::Invert),
                DrawOp::FilledCircle(20, 30, 4, PixelType::Set),
            ]
        );
    }

    #[test]
    fn test_write_text_at_pen() {
        let mut rig = Rig::new();
        rig.run(Opcode::SetPosition, &[3, 4]).unwrap();
        assert_eq!(rig.run(Opcode::Write, &[2, b'h', b'i']), Ok(0x20));
        assert!(rig.plotter.ops.contains(&DrawOp::Text("hi".into(), 3, 4)));
        assert_eq!(rig.interpreter.pen().x, 3);
    }

    #[test]
    fn test_clear_screen() {
        let mut rig = Rig::new();
        assert_eq!(rig.run(Opcode::ClearScreen, &[]), Ok(0x02));
        assert_eq!(rig.plotter.ops[..2], [DrawOp::Clear, DrawOp::CacheClear]);
        assert_eq!(rig.controller.state().page(), Some(0));
    }

    #[test]
    fn test_reset_reinitializes() {
        let mut rig = Rig::new();
        rig.run(Opcode::SetPosition, &[9, 9]).unwrap();
        assert_eq!(rig.run(Opcode::Reset, &[]), Ok(0x01));
        assert_eq!(rig.interpreter.pen(), Pen::new());

        rig.controller = Uc1608::new(
            MockBus {
                status: 0x80,
                ..MockBus::default()
            },
            NoDelay::default(),
            ControllerConfig::new(),
        );
        assert_eq!(
            rig.run(Opcode::Reset, &[]),
            Err(CommandError::ResetFailed(InitError::ControllerNotReady {
                status: 0x80
            }))
        );
        assert!(!rig.slot.is_pending());
    }

    #[test]
    fn test_rejected_commands() {
        let mut rig = Rig::new();
        rig.slot.submit(0x99, &[]).unwrap();
        assert_eq!(rig.poll(), Err(CommandError::UnknownOpcode(0x99)));
        assert!(rig.plotter.ops.is_empty());

        rig.slot.submit(0x10, &[255]).unwrap();
        assert_eq!(
            rig.poll(),
            Err(CommandError::Payload(PayloadError::InvalidPixelType(255)))
        );
        assert_eq!(rig.poll(), Ok(0));
    }

    fn resolved_pixels(ops: &[DrawOp]) -> Vec<PixelType> {
        ops.iter()
            .filter_map(|op| match op {
                DrawOp::Line(.., p)
                | DrawOp::Rect(.., p)
                | DrawOp::FilledRect(.., p)
                | DrawOp::Circle(.., p)
                | DrawOp::FilledCircle(.., p) => Some(*p),
                _ => None,
            })
            .collect()
    }

    proptest! {
        #[test]
        fn test_sentinel_never_reaches_plotter(
            default in 0u8..3,
            opcode in prop::sample::select(vec![
                Opcode::DrawLine,
                Opcode::DrawRect,
                Opcode::DrawFilledRect,
                Opcode::DrawCircle,
                Opcode::DrawFilledCircle,
            ]),
            a in any::<u8>(),
            b in any::<u8>(),
        ) {
            let mut rig = Rig::new();
            rig.run(Opcode::SetPixelType, &[default]).unwrap();
            let payload = match opcode {
                Opcode::DrawCircle | Opcode::DrawFilledCircle => vec![a, 255],
                _ => vec![a, b, 255],
            };
            let ack = rig.run(opcode, &payload).unwrap();
            prop_assert_eq!(ack, opcode.as_u8());

            let pixels = resolved_pixels(&rig.plotter.ops);
            prop_assert_eq!(pixels.len(), 1);
            prop_assert_eq!(pixels[0], PixelType::from_u8(default).unwrap());
        }
    }
}
