//! Page frame buffer
//!
//! A local copy of display RAM laid out the way the UC1608 stores it: one
//! byte per column per page, least significant bit on top. Drawing marks
//! pages dirty; [`FrameBuffer::flush`] writes only those back.

use core::convert::Infallible;

use embedded_graphics::mono_font::ascii::FONT_5X8;
use embedded_graphics::mono_font::{MonoFont, MonoTextStyleBuilder};
use embedded_graphics::pixelcolor::BinaryColor;
use embedded_graphics::prelude::*;
use embedded_graphics::primitives::{Circle, Line, PrimitiveStyle, Rectangle};
use embedded_graphics::text::{Baseline, Text};
use smartlcd_core::config::{HEIGHT, PAGES, PIXELS_PER_BYTE, WIDTH};
use smartlcd_core::traits::Plotter;
use smartlcd_protocol::PixelType;

use crate::backend::{DisplayBackend, DisplayError};

/// System font used by [`Plotter::draw_string`]
pub const SYSTEM_FONT: &MonoFont<'static> = &FONT_5X8;

const ALL_PAGES: u16 = u16::MAX >> (16 - PAGES as u32);

pub struct FrameBuffer {
    pages: [[u8; WIDTH as usize]; PAGES as usize],
    /// One bit per page
    dirty: u16,
    /// Next flush writes every page
    force: bool,
}

impl FrameBuffer {
    /// Blank frame; the first flush writes everything
    pub const fn new() -> Self {
        Self {
            pages: [[0; WIDTH as usize]; PAGES as usize],
            dirty: 0,
            force: true,
        }
    }

    pub fn pixel(&self, x: u8, y: u8) -> bool {
        if x >= WIDTH || y >= HEIGHT {
            return false;
        }
        let (page, mask) = locate(y);
        self.pages[page][usize::from(x)] & mask != 0
    }

    pub fn page(&self, page: u8) -> Option<&[u8; WIDTH as usize]> {
        self.pages.get(usize::from(page))
    }

    pub fn is_dirty(&self, page: u8) -> bool {
        page < PAGES && (self.force || self.dirty & (1 << page) != 0)
    }

    /// Apply a pixel operation, ignoring points off the panel
    pub fn apply(&mut self, x: i32, y: i32, pixel: PixelType) {
        if !(0..i32::from(WIDTH)).contains(&x) || !(0..i32::from(HEIGHT)).contains(&y) {
            return;
        }
        let (page, mask) = locate(y as u8);
        let byte = &mut self.pages[page][x as usize];
        let on = *byte & mask != 0;
        if pixel.apply(on) {
            *byte |= mask;
        } else {
            *byte &= !mask;
        }
        self.dirty |= 1 << page;
    }

    /// Write dirty pages to the display
    ///
    /// Returns how many pages were written. A page stays dirty if its
    /// write fails.
    pub fn flush<B: DisplayBackend + ?Sized>(&mut self, backend: &mut B) -> Result<u8, DisplayError> {
        let mut written = 0;
        for page in 0..PAGES {
            if !self.is_dirty(page) {
                continue;
            }
            backend.write_page(page, 0, &self.pages[usize::from(page)])?;
            self.dirty &= !(1 << page);
            written += 1;
        }
        self.force = false;
        Ok(written)
    }

    /// Replace one page with what the display RAM currently holds
    pub fn load_page<B: DisplayBackend + ?Sized>(
        &mut self,
        backend: &mut B,
        page: u8,
    ) -> Result<(), DisplayError> {
        let mut buf = [0u8; WIDTH as usize];
        let count = backend.read_page(page, 0, &mut buf)?;
        if let Some(target) = self.pages.get_mut(usize::from(page)) {
            target[..count].copy_from_slice(&buf[..count]);
            self.dirty &= !(1 << page);
        }
        Ok(())
    }

    fn paint<T>(&mut self, item: &T, pixel: PixelType)
    where
        T: Drawable<Color = BinaryColor>,
    {
        let mut target = PenTarget { frame: self, pixel };
        let _ = item.draw(&mut target);
    }
}

impl Default for FrameBuffer {
    fn default() -> Self {
        Self::new()
    }
}

fn locate(y: u8) -> (usize, u8) {
    (
        usize::from(y / PIXELS_PER_BYTE),
        1 << (y % PIXELS_PER_BYTE),
    )
}

fn point(x: u8, y: u8) -> Point {
    Point::new(i32::from(x), i32::from(y))
}

impl Plotter for FrameBuffer {
    fn draw_pixel(&mut self, x: u8, y: u8, pixel: PixelType) {
        self.apply(i32::from(x), i32::from(y), pixel);
    }

    fn draw_line(&mut self, x1: u8, y1: u8, x2: u8, y2: u8, pixel: PixelType) {
        let line = Line::new(point(x1, y1), point(x2, y2))
            .into_styled(PrimitiveStyle::with_stroke(BinaryColor::On, 1));
        self.paint(&line, pixel);
    }

    fn draw_rect(&mut self, x: u8, y: u8, width: u8, height: u8, pixel: PixelType) {
        let rect = Rectangle::new(point(x, y), Size::new(width.into(), height.into()))
            .into_styled(PrimitiveStyle::with_stroke(BinaryColor::On, 1));
        self.paint(&rect, pixel);
    }

    fn draw_filled_rect(&mut self, x: u8, y: u8, width: u8, height: u8, pixel: PixelType) {
        let rect = Rectangle::new(point(x, y), Size::new(width.into(), height.into()))
            .into_styled(PrimitiveStyle::with_fill(BinaryColor::On));
        self.paint(&rect, pixel);
    }

    fn draw_circle(&mut self, x: u8, y: u8, radius: u8, pixel: PixelType) {
        let circle = Circle::with_center(point(x, y), 2 * u32::from(radius) + 1)
            .into_styled(PrimitiveStyle::with_stroke(BinaryColor::On, 1));
        self.paint(&circle, pixel);
    }

    fn draw_filled_circle(&mut self, x: u8, y: u8, radius: u8, pixel: PixelType) {
        let circle = Circle::with_center(point(x, y), 2 * u32::from(radius) + 1)
            .into_styled(PrimitiveStyle::with_fill(BinaryColor::On));
        self.paint(&circle, pixel);
    }

    fn draw_string(&mut self, text: &str, x: u8, y: u8) {
        let style = MonoTextStyleBuilder::new()
            .font(SYSTEM_FONT)
            .text_color(BinaryColor::On)
            .background_color(BinaryColor::Off)
            .build();
        let text = Text::with_baseline(text, point(x, y), style, Baseline::Top);
        self.paint(&text, PixelType::Set);
    }

    fn put_page(&mut self, data: &[u8], page: u8, column: u8) {
        let Some(target) = self.pages.get_mut(usize::from(page)) else {
            return;
        };
        let start = usize::from(column.min(WIDTH));
        let count = data.len().min(target.len() - start);
        target[start..start + count].copy_from_slice(&data[..count]);
        self.dirty |= 1 << page;
    }

    fn clear(&mut self) {
        self.pages = [[0; WIDTH as usize]; PAGES as usize];
        self.dirty = ALL_PAGES;
    }

    fn cache_clear(&mut self) {
        self.force = true;
    }
}

/// Draw target that applies a pen pixel type to `On` pixels
///
/// `Off` pixels (text background) are always cleared.
struct PenTarget<'a> {
    frame: &'a mut FrameBuffer,
    pixel: PixelType,
}

impl DrawTarget for PenTarget<'_> {
    type Color = BinaryColor;
    type Error = Infallible;

    fn draw_iter<I>(&mut self, pixels: I) -> Result<(), Self::Error>
    where
        I: IntoIterator<Item = Pixel<Self::Color>>,
    {
        for Pixel(at, color) in pixels {
            let pixel = if color.is_on() {
                self.pixel
            } else {
                PixelType::Clear
            };
            self.frame.apply(at.x, at.y, pixel);
        }
        Ok(())
    }
}

impl OriginDimensions for PenTarget<'_> {
    fn size(&self) -> Size {
        Size::new(WIDTH.into(), HEIGHT.into())
    }
}
