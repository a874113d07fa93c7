//! Birds crossing the day sky (light theme, stateful).

use std::f64::consts::TAU;

use fastrand::Rng;
use skyline_core::Viewport;

use super::uniform;

/// Distance past either horizontal edge where birds turn around.
pub const WRAP_MARGIN: f64 = 100.0;
/// Top of the band birds fly in.
pub const FLIGHT_BAND_TOP: f64 = 60.0;
/// Bottom of the band birds fly in.
pub const FLIGHT_BAND_BOTTOM: f64 = 180.0;
/// Wing phase advance per flight tick, in radians.
pub const WING_STEP: f64 = 0.3;

const MIN_SPEED: f64 = 0.4;
const MAX_SPEED: f64 = 1.6;
const BOB_AMPLITUDE: f64 = 2.0;

/// State for a single bird.
#[derive(Debug, Clone, PartialEq)]
pub struct Bird {
    pub id: usize,
    /// Left edge in scene pixels.
    pub x: f64,
    /// Top edge in scene pixels.
    pub y: f64,
    /// Pixels travelled per flight tick.
    pub speed: f64,
    /// Wing phase in radians. Grows without bound; only read through `sin`.
    pub wing_phase: f64,
}

/// Generate a fresh flock spread across (and just left of) the viewport.
pub fn generate(count: usize, viewport: Viewport, rng: &mut Rng) -> Vec<Bird> {
    (0..count)
        .map(|id| Bird {
            id,
            x: uniform(rng, -WRAP_MARGIN, viewport.width - WRAP_MARGIN),
            y: uniform(rng, FLIGHT_BAND_TOP, FLIGHT_BAND_BOTTOM),
            speed: uniform(rng, MIN_SPEED, MAX_SPEED),
            wing_phase: uniform(rng, 0.0, TAU),
        })
        .collect()
}

/// Advance every bird by one flight tick from a shared timestamp.
///
/// Birds that leave the right edge re-enter from the left at a new height.
/// Returns how many birds wrapped.
pub fn fly(birds: &mut [Bird], now_ms: u64, width: f64, rng: &mut Rng) -> usize {
    let t = now_ms as f64 * 0.001;
    let mut wrapped = 0;

    for bird in birds {
        bird.x += bird.speed;
        // Per-bird phase offset keeps the flock from bobbing in unison
        bird.y += (t + bird.id as f64 * 0.5).sin() * BOB_AMPLITUDE;
        bird.wing_phase += WING_STEP;

        if bird.x > width + WRAP_MARGIN {
            bird.x = -WRAP_MARGIN;
            bird.y = uniform(rng, FLIGHT_BAND_TOP, FLIGHT_BAND_BOTTOM);
            wrapped += 1;
        }
    }

    wrapped
}
