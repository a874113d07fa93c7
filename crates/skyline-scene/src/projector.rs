//! Maps scene state to drawable primitives.
//!
//! Projection is pure: it reads the pools and the viewport and returns the
//! primitives in paint order, back to front. Nothing here mutates state or
//! depends on when it is called, except [`pulse_opacity`] and
//! [`float_offset`], which the painter evaluates per frame.

use std::f64::consts::TAU;

use skyline_core::{Theme, Viewport};

use crate::clouds::{CLOUDS, CloudSize};
use crate::entities::bird::{Bird, FLIGHT_BAND_TOP, WRAP_MARGIN};
use crate::entities::sanitize;
use crate::entities::star::{MAX_OPACITY, MIN_OPACITY, Star};

/// A position in scene pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn offset(self, dx: f64, dy: f64) -> Self {
        Self::new(self.x + dx, self.y + dy)
    }
}

/// Which flock a bird silhouette belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FlockTier {
    Primary,
    Seagull,
    Distant,
}

impl FlockTier {
    /// Unscaled sprite size in scene pixels.
    pub fn sprite_size(self) -> (f64, f64) {
        match self {
            FlockTier::Primary => (24.0, 16.0),
            FlockTier::Seagull => (28.0, 14.0),
            FlockTier::Distant => (16.0, 8.0),
        }
    }
}

/// How a tier animates its wings from the bird's wing phase.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum WingStroke {
    /// Both wings rotate about the body, mirrored, by up to `amplitude_deg`.
    Rotate { amplitude_deg: f64 },
    /// The whole V-shape stretches vertically around `base`.
    Flex { base: f64, amplitude: f64 },
}

/// Wing shape of one bird in one frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum WingPose {
    /// Left wing rotated by `degrees`, right wing by `-degrees`.
    Rotation { degrees: f64 },
    /// Vertical scale of a V-shaped silhouette.
    Flex { scale_y: f64 },
}

/// A read-only projection of the bird pool into one flock.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FlockView {
    pub tier: FlockTier,
    /// Only the first `take` birds of the pool join this flock.
    pub take: Option<usize>,
    pub offset: Point,
    pub base_scale: f64,
    pub scale_swing: f64,
    /// Added to the wing phase before any trig.
    pub phase_shift: f64,
    pub stroke: WingStroke,
}

/// The three flocks drawn in the day sky, back to front.
pub const FLOCKS: [FlockView; 3] = [
    FlockView {
        tier: FlockTier::Primary,
        take: None,
        offset: Point::new(0.0, 0.0),
        base_scale: 0.8,
        scale_swing: 0.1,
        phase_shift: 0.0,
        stroke: WingStroke::Rotate {
            amplitude_deg: 15.0,
        },
    },
    FlockView {
        tier: FlockTier::Seagull,
        take: Some(3),
        offset: Point::new(200.0, 40.0),
        base_scale: 0.6,
        scale_swing: 0.08,
        phase_shift: 1.0,
        stroke: WingStroke::Rotate {
            amplitude_deg: 20.0,
        },
    },
    FlockView {
        tier: FlockTier::Distant,
        take: Some(4),
        offset: Point::new(-150.0, -30.0),
        base_scale: 0.3,
        scale_swing: 0.05,
        phase_shift: 2.0,
        stroke: WingStroke::Flex {
            base: 0.8,
            amplitude: 0.3,
        },
    },
];

impl FlockView {
    /// The slice of the pool this flock shows.
    pub fn members<'a>(&self, pool: &'a [Bird]) -> &'a [Bird] {
        let count = self.take.map_or(pool.len(), |take| take.min(pool.len()));
        &pool[..count]
    }

    /// Project one bird of the pool into this flock.
    pub fn project(&self, bird: &Bird, viewport: Viewport) -> Primitive {
        let phase = bird.wing_phase + self.phase_shift;
        // Wing phase only ever feeds trig, so a non-finite phase is folded to 0
        let wave = if phase.is_finite() { phase.sin() } else { 0.0 };

        let x = sanitize(
            bird.x + self.offset.x,
            -2.0 * WRAP_MARGIN - viewport.width,
            2.0 * viewport.width + 2.0 * WRAP_MARGIN,
        );
        let y = sanitize(
            bird.y + self.offset.y,
            FLIGHT_BAND_TOP - 2.0 * WRAP_MARGIN - viewport.height,
            2.0 * viewport.height + 2.0 * WRAP_MARGIN,
        );

        let wing = match self.stroke {
            WingStroke::Rotate { amplitude_deg } => WingPose::Rotation {
                degrees: wave * amplitude_deg,
            },
            WingStroke::Flex { base, amplitude } => WingPose::Flex {
                scale_y: base + wave * amplitude,
            },
        };

        Primitive::Bird {
            tier: self.tier,
            position: Point::new(x, y),
            scale: self.base_scale + wave * self.scale_swing,
            wing,
        }
    }
}

/// A drawable element of the sky.
#[derive(Debug, Clone, PartialEq)]
pub enum Primitive {
    /// Static moon, with a soft glow around it.
    Moon {
        center: Point,
        radius: f64,
        glow_radius: f64,
    },
    /// A glowing dot.
    Star {
        center: Point,
        diameter: f64,
        opacity: f64,
        blur_radius: f64,
        glow_opacity: f64,
    },
    /// Pulsing sun disc.
    Sun {
        center: Point,
        radius: f64,
        pulse_delay_s: f64,
    },
    /// One ray around the sun. Angle 0 points straight up, clockwise.
    SunRay {
        center: Point,
        angle_deg: f64,
        inner_radius: f64,
        length: f64,
        pulse_delay_s: f64,
    },
    /// Bird silhouette; `position` is the unscaled sprite's top-left corner.
    Bird {
        tier: FlockTier,
        position: Point,
        scale: f64,
        wing: WingPose,
    },
    /// Cloud body; `origin` is its top-left corner.
    Cloud {
        origin: Point,
        size: CloudSize,
        float_delay_s: f64,
    },
}

const MOON_INSET: f64 = 96.0;
const MOON_BOX: f64 = 80.0;
const MOON_RADIUS: f64 = 38.0;
const MOON_GLOW_RADIUS: f64 = 48.0;

const SUN_INSET: f64 = 80.0;
const SUN_RADIUS: f64 = 32.0;
const SUN_RAYS: usize = 8;
const RAY_DISTANCE: f64 = 40.0;
const RAY_LENGTH: f64 = 24.0;
const RAY_STAGGER_S: f64 = 0.2;

const PULSE_PERIOD_MS: u64 = 2_000;
const FLOAT_PERIOD_MS: u64 = 6_000;
const FLOAT_RISE_PX: f64 = 10.0;

/// Project the scene into primitives for the given theme.
///
/// An invalid viewport projects to nothing.
pub fn project(theme: Theme, viewport: Viewport, stars: &[Star], birds: &[Bird]) -> Vec<Primitive> {
    if !viewport.is_valid() {
        return Vec::new();
    }
    match theme {
        Theme::Dark => project_night(viewport, stars),
        Theme::Light => project_day(viewport, birds),
    }
}

fn project_night(viewport: Viewport, stars: &[Star]) -> Vec<Primitive> {
    let mut primitives = Vec::with_capacity(stars.len() + 1);

    let half = MOON_BOX / 2.0;
    primitives.push(Primitive::Moon {
        center: Point::new(viewport.width - MOON_INSET - half, MOON_INSET + half),
        radius: MOON_RADIUS,
        glow_radius: MOON_GLOW_RADIUS,
    });

    primitives.extend(stars.iter().map(|star| project_star(star, viewport)));
    primitives
}

fn project_star(star: &Star, viewport: Viewport) -> Primitive {
    let diameter = sanitize(star.size, f64::MIN_POSITIVE, f64::MAX);
    let opacity = sanitize(star.opacity, MIN_OPACITY, MAX_OPACITY);
    Primitive::Star {
        center: Point::new(
            sanitize(star.x, 0.0, viewport.width),
            sanitize(star.y, 0.0, viewport.height),
        ),
        diameter,
        opacity,
        blur_radius: diameter * 2.0,
        glow_opacity: opacity * 0.5,
    }
}

fn project_day(viewport: Viewport, birds: &[Bird]) -> Vec<Primitive> {
    let mut primitives = Vec::with_capacity(1 + SUN_RAYS + birds.len() * 2 + CLOUDS.len());

    let center = Point::new(
        viewport.width - SUN_INSET - SUN_RADIUS,
        SUN_INSET + SUN_RADIUS,
    );
    primitives.push(Primitive::Sun {
        center,
        radius: SUN_RADIUS,
        pulse_delay_s: 0.0,
    });
    primitives.extend((0..SUN_RAYS).map(|i| Primitive::SunRay {
        center,
        angle_deg: i as f64 * 360.0 / SUN_RAYS as f64,
        inner_radius: RAY_DISTANCE - RAY_LENGTH / 2.0,
        length: RAY_LENGTH,
        pulse_delay_s: i as f64 * RAY_STAGGER_S,
    }));

    for flock in &FLOCKS {
        primitives.extend(
            flock
                .members(birds)
                .iter()
                .map(|bird| flock.project(bird, viewport)),
        );
    }

    primitives.extend(CLOUDS.iter().map(|cloud| Primitive::Cloud {
        origin: cloud.origin(viewport),
        size: cloud.size,
        float_delay_s: cloud.delay_s,
    }));

    primitives
}

/// Position within a repeating animation, in `[0, 1)`.
fn cycle(now_ms: u64, delay_s: f64, period_ms: u64) -> f64 {
    let delay_ms = (sanitize(delay_s, 0.0, 3_600.0) * 1_000.0) as u64;
    (now_ms.wrapping_sub(delay_ms) % period_ms) as f64 / period_ms as f64
}

/// Opacity of a pulsing element: 1 at the start of each 2 s cycle, 0.5
/// halfway through.
pub fn pulse_opacity(now_ms: u64, delay_s: f64) -> f64 {
    let phase = cycle(now_ms, delay_s, PULSE_PERIOD_MS);
    0.75 + 0.25 * (phase * TAU).cos()
}

/// Vertical offset of a floating cloud: rises 10 px and settles back over 6 s.
pub fn float_offset(now_ms: u64, delay_s: f64) -> f64 {
    let phase = cycle(now_ms, delay_s, FLOAT_PERIOD_MS);
    -FLOAT_RISE_PX * (0.5 - 0.5 * (phase * TAU).cos())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn viewport() -> Viewport {
        Viewport::new(1024.0, 768.0)
    }

    fn bird(id: usize, wing_phase: f64) -> Bird {
        Bird {
            id,
            x: 100.0 + id as f64,
            y: 120.0,
            speed: 1.0,
            wing_phase,
        }
    }

    fn star(opacity: f64) -> Star {
        Star {
            id: 0,
            x: 10.0,
            y: 20.0,
            size: 2.0,
            opacity,
            twinkle_speed: 0.02,
        }
    }

    #[test]
    fn test_night_has_moon_then_one_dot_per_star() {
        let stars = vec![star(0.5), star(0.9)];
        let primitives = project(Theme::Dark, viewport(), &stars, &[bird(0, 0.0)]);

        assert_eq!(primitives.len(), 3);
        assert_eq!(
            primitives[0],
            Primitive::Moon {
                center: Point::new(888.0, 136.0),
                radius: 38.0,
                glow_radius: 48.0,
            }
        );
        assert_eq!(
            primitives[1],
            Primitive::Star {
                center: Point::new(10.0, 20.0),
                diameter: 2.0,
                opacity: 0.5,
                blur_radius: 4.0,
                glow_opacity: 0.25,
            }
        );
        assert!(
            !primitives
                .iter()
                .any(|p| matches!(p, Primitive::Bird { .. } | Primitive::Sun { .. }))
        );
    }

    #[test]
    fn test_day_layout() {
        let birds: Vec<Bird> = (0..8).map(|i| bird(i, 0.0)).collect();
        let primitives = project(Theme::Light, viewport(), &[star(0.5)], &birds);

        let count = |tier| {
            primitives
                .iter()
                .filter(|p| matches!(p, Primitive::Bird { tier: t, .. } if *t == tier))
                .count()
        };
        assert_eq!(count(FlockTier::Primary), 8);
        assert_eq!(count(FlockTier::Seagull), 3);
        assert_eq!(count(FlockTier::Distant), 4);

        let rays: Vec<_> = primitives
            .iter()
            .filter_map(|p| match p {
                Primitive::SunRay {
                    angle_deg,
                    pulse_delay_s,
                    ..
                } => Some((*angle_deg, *pulse_delay_s)),
                _ => None,
            })
            .collect();
        assert_eq!(rays.len(), 8);
        for (i, (angle, delay)) in rays.iter().enumerate() {
            assert!((angle - i as f64 * 45.0).abs() < 1e-9);
            assert!((delay - i as f64 * 0.2).abs() < 1e-9);
        }

        let clouds = primitives
            .iter()
            .filter(|p| matches!(p, Primitive::Cloud { .. }))
            .count();
        assert_eq!(clouds, 13);
        assert!(!primitives.iter().any(|p| matches!(p, Primitive::Star { .. })));
        // Sun first, clouds last
        assert!(matches!(primitives[0], Primitive::Sun { .. }));
        assert!(matches!(primitives.last(), Some(Primitive::Cloud { .. })));
    }

    #[test]
    fn test_flock_views_apply_offsets_and_amplitudes() {
        let phase = 0.7;
        let b = bird(0, phase);

        let primary = FLOCKS[0].project(&b, viewport());
        assert_eq!(
            primary,
            Primitive::Bird {
                tier: FlockTier::Primary,
                position: Point::new(100.0, 120.0),
                scale: 0.8 + phase.sin() * 0.1,
                wing: WingPose::Rotation {
                    degrees: phase.sin() * 15.0
                },
            }
        );

        let seagull = FLOCKS[1].project(&b, viewport());
        assert_eq!(
            seagull,
            Primitive::Bird {
                tier: FlockTier::Seagull,
                position: Point::new(300.0, 160.0),
                scale: 0.6 + (phase + 1.0).sin() * 0.08,
                wing: WingPose::Rotation {
                    degrees: (phase + 1.0).sin() * 20.0
                },
            }
        );

        let distant = FLOCKS[2].project(&b, viewport());
        assert_eq!(
            distant,
            Primitive::Bird {
                tier: FlockTier::Distant,
                position: Point::new(-50.0, 90.0),
                scale: 0.3 + (phase + 2.0).sin() * 0.05,
                wing: WingPose::Flex {
                    scale_y: 0.8 + (phase + 2.0).sin() * 0.3
                },
            }
        );
    }

    #[test]
    fn test_members_handles_small_pools() {
        let birds = vec![bird(0, 0.0), bird(1, 0.0)];
        assert_eq!(FLOCKS[1].members(&birds).len(), 2);
        assert_eq!(FLOCKS[0].members(&birds).len(), 2);
        assert!(FLOCKS[2].members(&[]).is_empty());
    }

    #[test]
    fn test_invalid_viewport_projects_nothing() {
        let primitives = project(Theme::Light, Viewport::new(0.0, 0.0), &[], &[bird(0, 0.0)]);
        assert!(primitives.is_empty());
    }

    #[test]
    fn test_nan_values_are_clamped() {
        let mut bad = star(f64::NAN);
        bad.x = f64::NAN;
        bad.size = f64::NAN;
        match project_star(&bad, viewport()) {
            Primitive::Star {
                center,
                diameter,
                opacity,
                ..
            } => {
                assert_eq!(center.x, 0.0);
                assert!(diameter > 0.0);
                assert_eq!(opacity, MIN_OPACITY);
            }
            other => panic!("unexpected primitive {other:?}"),
        }

        let mut lost = bird(0, f64::NAN);
        lost.y = f64::INFINITY;
        match FLOCKS[0].project(&lost, viewport()) {
            Primitive::Bird {
                position,
                scale,
                wing,
                ..
            } => {
                assert!(position.y.is_finite());
                assert_eq!(scale, 0.8);
                assert_eq!(wing, WingPose::Rotation { degrees: 0.0 });
            }
            other => panic!("unexpected primitive {other:?}"),
        }
    }

    #[test]
    fn test_pulse_and_float_cycles() {
        assert!((pulse_opacity(0, 0.0) - 1.0).abs() < 1e-12);
        assert!((pulse_opacity(1_000, 0.0) - 0.5).abs() < 1e-12);
        assert!((pulse_opacity(2_000, 0.0) - 1.0).abs() < 1e-12);
        // Delay shifts the cycle
        assert!((pulse_opacity(1_200, 0.2) - 0.5).abs() < 1e-12);

        assert!(float_offset(0, 0.0).abs() < 1e-12);
        assert!((float_offset(3_000, 0.0) + 10.0).abs() < 1e-12);
    }
}
