//! Built-in self-test patterns
//!
//! | Bit | Pattern |
//! |---|---|
//! | 0 | byte ramp written straight into RAM from the current address |
//! | 1 | page 2 stripe of `0` glyphs written straight into RAM |
//! | 2 | pixel zig-zag |
//! | 3 | diagonal line |
//! | 4 | rectangle and filled rectangle |
//! | 5 | circle and filled circle |
//! | 6 | banner text |
//! | 7 | animation session |
//!
//! Patterns written straight into display RAM are read back and copied
//! into the plotter so the next flush does not undo them.

use embedded_hal::delay::DelayNs;
use smartlcd_protocol::PixelType;

use crate::animation::{AnimationFlag, AnimationSession};
use crate::bus::ParallelBus;
use crate::config::{PAGES, WIDTH};
use crate::controller::{ControllerError, Uc1608};
use crate::traits::Plotter;

const STRIPE_PAGE: u8 = 2;

/// Columns of a `0` glyph, repeated after every blank column
const STRIPE_GLYPH: [u8; 6] = [0x3E, 0x51, 0x49, 0x45, 0x3E, 0x00];

const ZIGZAG: [(u8, u8); 9] = [
    (0, 0),
    (1, 1),
    (2, 2),
    (3, 3),
    (2, 4),
    (1, 5),
    (2, 6),
    (3, 7),
    (4, 8),
];

pub const BANNER: &str = "Smart-LCD";

/// Draw the patterns selected by `bitmask`
///
/// Bit 7 prepares the animation session and sets its flag; the caller's
/// loop then drives the session.
pub fn run_test_pattern<B, D, P>(
    bitmask: u8,
    controller: &mut Uc1608<B, D>,
    plotter: &mut P,
    session: &mut AnimationSession,
    flag: &AnimationFlag,
) -> Result<(), ControllerError>
where
    B: ParallelBus,
    D: DelayNs,
    P: Plotter + ?Sized,
{
    let selected = |bit: u8| bitmask & (1 << bit) != 0;

    if selected(0) {
        let page = controller.state().page().unwrap_or(0);
        let column = controller.state().column().unwrap_or(0);
        let mut ramp = [0u8; WIDTH as usize];
        for (i, byte) in ramp.iter_mut().enumerate() {
            *byte = i as u8;
        }

        // A full page from mid-row runs on into the next page
        let (head, tail) = ramp.split_at(usize::from(WIDTH - column));
        write_through(controller, plotter, page, column, head)?;
        if !tail.is_empty() {
            write_through(controller, plotter, (page + 1) % PAGES, 0, tail)?;
        }
        controller.set_page(page)?;
        controller.set_column(column)?;
    }

    if selected(1) {
        let mut stripe = [0u8; WIDTH as usize];
        for (column, byte) in stripe.iter_mut().enumerate() {
            *byte = match column % 7 {
                0 => 0,
                n => STRIPE_GLYPH[n - 1],
            };
        }
        write_through(controller, plotter, STRIPE_PAGE, 0, &stripe)?;
        controller.set_page(STRIPE_PAGE)?;
        controller.carriage_return();
    }

    if selected(2) {
        for (dx, dy) in ZIGZAG {
            plotter.draw_pixel(4 + dx, 40 + dy, PixelType::Set);
        }
    }

    if selected(3) {
        plotter.draw_line(0, 16, WIDTH - 1, 31, PixelType::Set);
    }

    if selected(4) {
        plotter.draw_rect(70, 48, 40, 40, PixelType::Set);
        plotter.draw_filled_rect(170, 48, 40, 40, PixelType::Set);
    }

    if selected(5) {
        plotter.draw_circle(10, 80, 10, PixelType::Set);
        plotter.draw_filled_circle(40, 80, 10, PixelType::Set);
    }

    if selected(6) {
        plotter.draw_string(BANNER, 70, 32);
    }

    if selected(7) {
        session.prepare(plotter);
        flag.set();
    }

    Ok(())
}

/// Write a run of bytes into display RAM, read it back and mirror it into
/// the plotter
fn write_through<B, D, P>(
    controller: &mut Uc1608<B, D>,
    plotter: &mut P,
    page: u8,
    column: u8,
    data: &[u8],
) -> Result<(), ControllerError>
where
    B: ParallelBus,
    D: DelayNs,
    P: Plotter + ?Sized,
{
    controller.write_page(page, column, data)?;

    let mut readback = [0u8; WIDTH as usize];
    let count = controller.read_page(page, column, &mut readback[..data.len()])?;
    plotter.put_page(&readback[..count], page, column);
    Ok(())
}
