//! Pixel plotting primitives

use smartlcd_protocol::PixelType;

/// Pixel plotter with a render cache
///
/// Implementations draw into a local page cache that is flushed to the
/// controller separately. All primitives clip to the visible frame, so
/// callers may pass shapes that extend past the panel edges.
pub trait Plotter {
    /// Draw a single pixel
    fn draw_pixel(&mut self, x: u8, y: u8, pixel: PixelType);

    /// Draw a line between two points (both inclusive)
    fn draw_line(&mut self, x1: u8, y1: u8, x2: u8, y2: u8, pixel: PixelType);

    /// Draw a rectangle outline with its top-left corner at (x, y)
    fn draw_rect(&mut self, x: u8, y: u8, width: u8, height: u8, pixel: PixelType);

    /// Fill a rectangle with its top-left corner at (x, y)
    fn draw_filled_rect(&mut self, x: u8, y: u8, width: u8, height: u8, pixel: PixelType);

    /// Draw a circle outline centred at (x, y), all quadrants
    fn draw_circle(&mut self, x: u8, y: u8, radius: u8, pixel: PixelType);

    /// Fill a circle centred at (x, y), all quadrants
    fn draw_filled_circle(&mut self, x: u8, y: u8, radius: u8, pixel: PixelType);

    /// Draw text in the system font with its top-left corner at (x, y)
    ///
    /// Glyph cells are drawn opaque: background pixels are cleared.
    fn draw_string(&mut self, text: &str, x: u8, y: u8);

    /// Copy raw column bytes into one page, starting at `column`
    fn put_page(&mut self, data: &[u8], page: u8, column: u8);

    /// Blank the whole local frame
    fn clear(&mut self);

    /// Invalidate the render cache so the next flush is unconditional
    fn cache_clear(&mut self);
}
