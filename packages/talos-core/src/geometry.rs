//! Field geometry.
//!
//! Positions are measured in inches from the center of the field. Headings
//! are compass-style: degrees clockwise from the positive y axis, normalized
//! to `[0, 360)`.

use core::fmt;

pub use mint::Point2;

/// A position on the field, in inches.
pub type Point = Point2<f64>;

/// A position on the field paired with a heading.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Pose {
    /// Field x coordinate in inches.
    pub x: f64,
    /// Field y coordinate in inches.
    pub y: f64,
    /// Compass heading in degrees, normalized to `[0, 360)`.
    pub heading: f64,
}

impl Pose {
    /// The pose at the field origin facing heading zero.
    pub const ZERO: Self = Self {
        x: 0.0,
        y: 0.0,
        heading: 0.0,
    };

    /// Creates a pose, wrapping `heading` into `[0, 360)`.
    #[must_use]
    pub fn new(x: f64, y: f64, heading: f64) -> Self {
        Self {
            x,
            y,
            heading: normalize_heading(heading),
        }
    }

    /// This pose's position with the heading dropped.
    #[must_use]
    pub fn position(&self) -> Point {
        Point {
            x: self.x,
            y: self.y,
        }
    }

    /// Straight-line distance from this pose to `point`, in inches.
    #[must_use]
    pub fn distance_to(&self, point: Point) -> f64 {
        (point.x - self.x).hypot(point.y - self.y)
    }

    /// Returns this pose with the heading replaced and re-normalized.
    #[must_use]
    pub fn with_heading(self, heading: f64) -> Self {
        Self::new(self.x, self.y, heading)
    }
}

impl fmt::Display for Pose {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({:.2}, {:.2}) @ {:.2}°", self.x, self.y, self.heading)
    }
}

impl From<Pose> for Point {
    fn from(pose: Pose) -> Self {
        pose.position()
    }
}

/// Wraps a heading in degrees into `[0, 360)`.
#[must_use]
pub fn normalize_heading(degrees: f64) -> f64 {
    degrees.rem_euclid(360.0)
}

/// The smallest signed rotation from `from` to `to`, in degrees.
///
/// Positive results are clockwise. The output lies in `[-180, 180)`.
#[must_use]
pub fn heading_error(from: f64, to: f64) -> f64 {
    let diff = normalize_heading(to) - normalize_heading(from);

    if diff >= 180.0 {
        diff - 360.0
    } else if diff < -180.0 {
        diff + 360.0
    } else {
        diff
    }
}
