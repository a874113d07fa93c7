//! Static cloud layout for the day sky.

use skyline_core::Viewport;

use crate::projector::Point;

use Anchor::{Left, Right};
use CloudSize::{Large, Medium, Small};
use Offset::{Fraction, Px};

/// Size tier of a cloud.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CloudSize {
    Small,
    Medium,
    Large,
}

impl CloudSize {
    /// Body width and height in scene pixels.
    pub fn dimensions(self) -> (f64, f64) {
        match self {
            CloudSize::Small => (64.0, 40.0),
            CloudSize::Medium => (80.0, 48.0),
            CloudSize::Large => (96.0, 56.0),
        }
    }

    /// The two puffs on top of the body as `(left, top, width, height)`
    /// relative to the body's top-left corner. The first puff is lit, the
    /// second one shaded.
    pub fn puffs(self) -> [(f64, f64, f64, f64); 2] {
        let (width, _) = self.dimensions();
        match self {
            CloudSize::Small => [(12.0, -8.0, 40.0, 24.0), (width - 12.0 - 24.0, -4.0, 24.0, 16.0)],
            CloudSize::Medium => [(16.0, -8.0, 48.0, 32.0), (width - 16.0 - 32.0, -4.0, 32.0, 24.0)],
            CloudSize::Large => [(20.0, -8.0, 56.0, 40.0), (width - 20.0 - 40.0, -4.0, 40.0, 32.0)],
        }
    }
}

/// Distance from a viewport edge.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Offset {
    Px(f64),
    /// Fraction of the viewport width.
    Fraction(f64),
}

impl Offset {
    fn resolve(self, extent: f64) -> f64 {
        match self {
            Offset::Px(px) => px,
            Offset::Fraction(f) => extent * f,
        }
    }
}

/// Which vertical edge a cloud is positioned from.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Anchor {
    Left(Offset),
    Right(Offset),
}

/// A fixed, non-animated cloud placement.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CloudDescriptor {
    pub top_px: f64,
    pub anchor: Anchor,
    /// Start delay of the float animation, in seconds.
    pub delay_s: f64,
    pub size: CloudSize,
}

impl CloudDescriptor {
    const fn new(top_px: f64, anchor: Anchor, delay_s: f64, size: CloudSize) -> Self {
        Self {
            top_px,
            anchor,
            delay_s,
            size,
        }
    }

    /// Top-left corner of the cloud body in this viewport.
    pub fn origin(&self, viewport: Viewport) -> Point {
        let (width, _) = self.size.dimensions();
        let x = match self.anchor {
            Anchor::Left(offset) => offset.resolve(viewport.width),
            Anchor::Right(offset) => viewport.width - offset.resolve(viewport.width) - width,
        };
        Point::new(x, self.top_px)
    }
}

/// Every cloud in the day sky, back to front.
pub const CLOUDS: [CloudDescriptor; 13] = [
    // Left side
    CloudDescriptor::new(160.0, Left(Px(64.0)), 3.0, Medium),
    CloudDescriptor::new(288.0, Left(Px(48.0)), 6.0, Small),
    CloudDescriptor::new(112.0, Left(Fraction(0.25)), 1.0, Medium),
    // Center
    CloudDescriptor::new(128.0, Left(Fraction(1.0 / 3.0)), 0.5, Medium),
    CloudDescriptor::new(256.0, Left(Fraction(0.5)), 3.5, Large),
    CloudDescriptor::new(48.0, Left(Fraction(0.4)), 5.0, Small),
    CloudDescriptor::new(192.0, Left(Fraction(0.5)), 2.0, Medium),
    // Right side
    CloudDescriptor::new(96.0, Right(Fraction(0.25)), 1.5, Large),
    CloudDescriptor::new(240.0, Right(Px(40.0)), 1.5, Small),
    CloudDescriptor::new(272.0, Right(Px(80.0)), 5.5, Small),
    CloudDescriptor::new(40.0, Right(Fraction(1.0 / 3.0)), 0.8, Medium),
    // Scattered
    CloudDescriptor::new(208.0, Left(Fraction(0.75)), 6.5, Small),
    CloudDescriptor::new(32.0, Left(Fraction(0.6)), 7.0, Large),
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_left_anchor() {
        let viewport = Viewport::new(1000.0, 800.0);
        assert_eq!(CLOUDS[0].origin(viewport), Point::new(64.0, 160.0));
        assert_eq!(CLOUDS[2].origin(viewport), Point::new(250.0, 112.0));
    }

    #[test]
    fn test_right_anchor_accounts_for_width() {
        let viewport = Viewport::new(1000.0, 800.0);
        // right-10 small cloud: 1000 - 40 - 64
        assert_eq!(CLOUDS[8].origin(viewport), Point::new(896.0, 240.0));
    }

    #[test]
    fn test_puffs_sit_inside_body_width() {
        for size in [Small, Medium, Large] {
            let (width, _) = size.dimensions();
            for (left, _, w, _) in size.puffs() {
                assert!(left >= 0.0 && left + w <= width);
            }
        }
    }
}
