//! Screen layout of the staged facts

/// Text line geometry and clock-phase bar placement
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct LayoutConfig {
    /// Left edge of every text line
    pub line_left: u8,
    /// Top of line 0
    pub line_top: u8,
    /// Vertical distance between text lines
    pub line_height: u8,
    /// Top row of the clock-phase bar
    pub phase_bar_y: u8,
    /// Height of the clock-phase bar
    pub phase_bar_height: u8,
    /// Left edge of the clock-phase bar area
    pub phase_bar_left: u8,
    /// Width of the clock-phase bar area
    pub phase_bar_width: u8,
    /// X position of zero phase
    pub phase_center_x: u8,
    /// Bar length at ±180°
    pub phase_half_span: u8,
}

impl LayoutConfig {
    pub const fn new() -> Self {
        Self {
            line_left: 0,
            line_top: 0,
            line_height: 10,
            phase_bar_y: 120,
            phase_bar_height: 7,
            phase_bar_left: 60,
            phase_bar_width: 180,
            phase_center_x: 150,
            phase_half_span: 90,
        }
    }

    /// Y position of a text line
    pub const fn line_y(&self, row: u8) -> u8 {
        self.line_top + row * self.line_height
    }
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self::new()
    }
}
