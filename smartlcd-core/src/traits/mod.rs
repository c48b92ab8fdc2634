//! Collaborator traits
//!
//! These traits define the interface between the display core and the
//! components it does not implement itself: the pixel plotter with its
//! render cache, the wall clock, the background job and the sensors shown
//! by the diagnostics overlay.

pub mod plotter;
pub mod system;

pub use plotter::Plotter;
pub use system::{seconds_between, BackgroundTask, Clock, DiagnosticsSource};
