//! Animated entity pools and the sampling helpers they share.

pub mod bird;
pub mod star;

use fastrand::Rng;

/// Sample uniformly from `[low, high)`.
pub(crate) fn uniform(rng: &mut Rng, low: f64, high: f64) -> f64 {
    low + rng.f64() * (high - low)
}

/// Clamp a value into `[low, high]`, mapping NaN to `low`.
///
/// Every number that leaves the engine goes through here so a bad value can
/// never reach the display.
pub(crate) fn sanitize(value: f64, low: f64, high: f64) -> f64 {
    if value.is_nan() {
        low
    } else {
        value.clamp(low, high)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_uniform_stays_in_range() {
        let mut rng = Rng::with_seed(7);
        for _ in 0..1_000 {
            let v = uniform(&mut rng, -100.0, 924.0);
            assert!((-100.0..924.0).contains(&v));
        }
    }

    #[test]
    fn test_sanitize() {
        assert_eq!(sanitize(0.5, 0.2, 1.0), 0.5);
        assert_eq!(sanitize(f64::NAN, 0.2, 1.0), 0.2);
        assert_eq!(sanitize(f64::INFINITY, 0.2, 1.0), 1.0);
        assert_eq!(sanitize(f64::NEG_INFINITY, 0.2, 1.0), 0.2);
        assert_eq!(sanitize(-3.0, 0.2, 1.0), 0.2);
    }
}
