//! Core types shared by the skyline crates.
//!
//! The scene engine only ever observes these: the host owns the theme
//! selector, measures the viewport and provides the clock.

mod clock;
mod theme;
mod viewport;

pub use clock::{Clock, ManualClock, SystemClock};
pub use theme::{Theme, ThemeSelector, ThemeWatch};
pub use viewport::Viewport;
