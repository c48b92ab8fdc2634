//! Animation and diagnostics self-test mode
//!
//! A train sprite bounces along the bottom page while a line sweep and a
//! sensor overlay are redrawn. The mode is exclusive with normal field
//! rendering and is cancelled by clearing its [`AnimationFlag`].

pub mod session;
pub mod sprite;
pub mod sweep;

pub use session::{AnimationSession, SessionState};
pub use sprite::{Sprite, SPRITE_LEN};
pub use sweep::LineSweep;

use portable_atomic::{AtomicBool, Ordering};

/// Outcome of one animation iteration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Step {
    /// Call again on the next iteration
    Continue,
    /// Session ended; the flag has been cleared
    Finished,
}

/// Session-enabled flag, settable from any context
#[derive(Debug, Default)]
pub struct AnimationFlag(AtomicBool);

impl AnimationFlag {
    pub const fn new() -> Self {
        Self(AtomicBool::new(false))
    }

    pub fn set(&self) {
        self.0.store(true, Ordering::Release);
    }

    pub fn clear(&self) {
        self.0.store(false, Ordering::Release);
    }

    pub fn is_set(&self) -> bool {
        self.0.load(Ordering::Acquire)
    }
}
