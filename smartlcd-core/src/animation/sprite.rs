//! Train sprite for the animation strip
//!
//! Described as run-length segments of column bytes; each byte is one
//! column of the bottom page (LSB at the top).

/// Wagons pulled by the locomotive
pub const WAGONS: usize = 4;

const WAGON: [u8; 11] = [
    0x40, 0x40, 0x40, 0xF8, 0xF8, 0xC8, 0xF8, 0xF8, 0xC8, 0xF8, 0xF8,
];

/// Sprite width in columns, including a blank column at each end
pub const SPRITE_LEN: usize = 1 + 15 + WAGONS * WAGON.len() + 1;

/// `repeat` copies of `pattern`
struct Segment {
    repeat: usize,
    pattern: &'static [u8],
}

const fn seg(repeat: usize, pattern: &'static [u8]) -> Segment {
    Segment { repeat, pattern }
}

/// Left-facing train: locomotive first, then the wagons
const SEGMENTS: [Segment; 8] = [
    seg(1, &[0x00]),
    // Locomotive
    seg(1, &[0xF8]),
    seg(1, &[0xD8]),
    seg(2, &[0xDF]),
    seg(6, &[0xD8]),
    seg(5, &[0xF8]),
    seg(WAGONS, &WAGON),
    seg(1, &[0x00]),
];

/// The train bitmap in both directions
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Sprite {
    left: [u8; SPRITE_LEN],
    right: [u8; SPRITE_LEN],
}

impl Sprite {
    /// Blank sprite, before [`Sprite::build`]
    pub const fn empty() -> Self {
        Self {
            left: [0; SPRITE_LEN],
            right: [0; SPRITE_LEN],
        }
    }

    /// Materialize the segment list and its mirror image
    pub fn build() -> Self {
        let mut left = [0u8; SPRITE_LEN];
        let columns = SEGMENTS.iter().flat_map(|s| {
            s.pattern
                .iter()
                .copied()
                .cycle()
                .take(s.repeat * s.pattern.len())
        });
        for (slot, byte) in left.iter_mut().zip(columns) {
            *slot = byte;
        }

        let mut right = left;
        right.reverse();

        Self { left, right }
    }

    /// Bitmap for a travel direction; negative means moving left
    pub fn facing(&self, dx: i8) -> &[u8; SPRITE_LEN] {
        if dx < 0 {
            &self.left
        } else {
            &self.right
        }
    }
}
