//! Twinkling stars (dark theme, stateful).

use fastrand::Rng;
use skyline_core::Viewport;

use super::{sanitize, uniform};

/// Dimmest a star may get.
pub const MIN_OPACITY: f64 = 0.2;
/// Brightest a star may get.
pub const MAX_OPACITY: f64 = 1.0;

const MIN_SIZE: f64 = 1.0;
const MAX_SIZE: f64 = 3.0;
const MIN_TWINKLE_SPEED: f64 = 0.01;
const MAX_TWINKLE_SPEED: f64 = 0.03;

/// State for a single star.
#[derive(Debug, Clone, PartialEq)]
pub struct Star {
    pub id: usize,
    /// Horizontal position in scene pixels.
    pub x: f64,
    /// Vertical position in scene pixels.
    pub y: f64,
    /// Diameter in scene pixels, always positive.
    pub size: f64,
    /// Current brightness in `[MIN_OPACITY, MAX_OPACITY]`.
    pub opacity: f64,
    /// Angular speed of the twinkle, in radians per millisecond.
    pub twinkle_speed: f64,
}

/// Generate a fresh star pool scattered over the viewport.
pub fn generate(count: usize, viewport: Viewport, rng: &mut Rng) -> Vec<Star> {
    (0..count)
        .map(|id| Star {
            id,
            x: uniform(rng, 0.0, viewport.width),
            y: uniform(rng, 0.0, viewport.height),
            size: uniform(rng, MIN_SIZE, MAX_SIZE),
            opacity: uniform(rng, MIN_OPACITY, MAX_OPACITY),
            twinkle_speed: uniform(rng, MIN_TWINKLE_SPEED, MAX_TWINKLE_SPEED),
        })
        .collect()
}

/// Opacity of a star with the given speed at a wall-clock instant.
///
/// Depends only on the timestamp, never on the previous tick, so the phase
/// survives pauses without drifting.
pub fn twinkle_opacity(now_ms: u64, twinkle_speed: f64) -> f64 {
    let wave = (now_ms as f64 * twinkle_speed).sin().abs();
    sanitize(MIN_OPACITY + wave * 0.8, MIN_OPACITY, MAX_OPACITY)
}

/// Update every star's opacity from one shared timestamp.
pub fn twinkle(stars: &mut [Star], now_ms: u64) {
    for star in stars {
        star.opacity = twinkle_opacity(now_ms, star.twinkle_speed);
    }
}
