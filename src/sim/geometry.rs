//! Line-segment and rectangle geometry for collision queries
//!
//! The tricky part of Breakline: finding the exact point where a ball's
//! per-tick trajectory first crosses a rectangle side, with tolerances that
//! survive near-parallel, collinear and vertical configurations. Every
//! comparison goes through the shared epsilon so repeated velocity
//! application cannot drift a boundary test out of agreement with another
//! module.
//!
//! Coordinates are screen-style: x grows right, y grows down.

use std::fmt;

use glam::DVec2;
use serde::{Deserialize, Serialize};

use crate::approx_eq;
use crate::consts::EPSILON;

/// Component-wise point equality within [`EPSILON`].
#[inline]
pub fn points_approx_eq(a: DVec2, b: DVec2) -> bool {
    approx_eq(a.x, b.x) && approx_eq(a.y, b.y)
}

/// Invalid geometric construction. Always a setup bug, never a steady-state
/// condition; callers abort the operation that triggered it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GeometryError {
    /// Segment endpoints coincide within tolerance
    DegenerateSegment,
    /// Rectangle width or height is zero (or negative) within tolerance
    EmptyRect,
}

impl fmt::Display for GeometryError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::DegenerateSegment => write!(f, "segment endpoints coincide"),
            Self::EmptyRect => write!(f, "rectangle has no area"),
        }
    }
}

impl std::error::Error for GeometryError {}

/// A directed line segment between two distinct points.
///
/// The start/end order matters to callers (trajectories measure distance
/// from `start`) but not to equality: two segments with swapped endpoints
/// compare equal through [`Segment::approx_eq`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Segment {
    start: DVec2,
    end: DVec2,
}

impl Segment {
    /// Build a segment, rejecting degenerate (zero-length) input.
    pub fn new(start: DVec2, end: DVec2) -> Result<Self, GeometryError> {
        if points_approx_eq(start, end) {
            return Err(GeometryError::DegenerateSegment);
        }
        Ok(Self { start, end })
    }

    /// Internal constructor for endpoints already known to be distinct
    /// (rectangle corners of a validated [`Rect`]).
    pub(crate) fn from_corners(start: DVec2, end: DVec2) -> Self {
        debug_assert!(!points_approx_eq(start, end));
        Self { start, end }
    }

    #[inline]
    pub fn start(&self) -> DVec2 {
        self.start
    }

    #[inline]
    pub fn end(&self) -> DVec2 {
        self.end
    }

    pub fn length(&self) -> f64 {
        self.start.distance(self.end)
    }

    pub fn midpoint(&self) -> DVec2 {
        (self.start + self.end) / 2.0
    }

    /// Whether the segment is vertical within tolerance.
    #[inline]
    pub fn is_vertical(&self) -> bool {
        approx_eq(self.start.x, self.end.x)
    }

    /// Slope of the carrier line, `f64::INFINITY` when vertical.
    pub fn slope(&self) -> f64 {
        if self.is_vertical() {
            return f64::INFINITY;
        }
        (self.end.y - self.start.y) / (self.end.x - self.start.x)
    }

    /// Y-intercept of the carrier line. Meaningless for vertical segments;
    /// intersection code branches on `is_vertical` before calling this.
    pub fn y_intercept(&self) -> f64 {
        self.end.y - self.slope() * self.end.x
    }

    /// Whether a point on the carrier line falls within this segment's
    /// extent. Pure bounding-box test with epsilon slack: callers only pass
    /// candidates already known to lie on the carrier line.
    pub fn contains_point(&self, p: DVec2) -> bool {
        let min_x = self.start.x.min(self.end.x);
        let max_x = self.start.x.max(self.end.x);
        let min_y = self.start.y.min(self.end.y);
        let max_y = self.start.y.max(self.end.y);

        p.x >= min_x - EPSILON
            && p.x <= max_x + EPSILON
            && p.y >= min_y - EPSILON
            && p.y <= max_y + EPSILON
    }

    /// Order-independent endpoint equality within tolerance.
    pub fn approx_eq(&self, other: &Self) -> bool {
        (points_approx_eq(self.start, other.start) && points_approx_eq(self.end, other.end))
            || (points_approx_eq(self.start, other.end) && points_approx_eq(self.end, other.start))
    }

    /// Contact point for two vertical segments on the same x.
    ///
    /// Only segments meeting end-to-end report a contact; an interior
    /// overlap has no single contact point and resolves to `None`.
    fn vertical_contact(&self, other: &Self) -> Option<DVec2> {
        let min1 = self.start.y.min(self.end.y);
        let max1 = self.start.y.max(self.end.y);
        let min2 = other.start.y.min(other.end.y);
        let max2 = other.start.y.max(other.end.y);
        let x = other.start.x;

        if approx_eq(max1, min2) {
            Some(DVec2::new(x, max1))
        } else if approx_eq(min1, max2) {
            Some(DVec2::new(x, min1))
        } else {
            None
        }
    }

    /// Contact point for collinear non-vertical segments.
    ///
    /// The segments intersect only when exactly one of the four endpoints
    /// lies on both. More than one shared endpoint means an overlapping
    /// span, which is deliberately reported as no intersection.
    fn collinear_contact(&self, other: &Self) -> Option<DVec2> {
        let endpoints = [self.start, self.end, other.start, other.end];
        let mut contact = None;

        for p in endpoints {
            if self.contains_point(p) && other.contains_point(p) {
                if contact.is_some() {
                    return None;
                }
                contact = Some(p);
            }
        }
        contact
    }

    /// Intersection point of two segments, or `None` when they do not meet.
    ///
    /// Branch order is load-bearing: vertical-vertical first, then exactly
    /// one vertical, then the general slope equation. This keeps every
    /// division away from a near-zero denominator.
    pub fn intersection(&self, other: &Self) -> Option<DVec2> {
        if self.is_vertical() && other.is_vertical() {
            if approx_eq(self.start.x, other.start.x) {
                return self.vertical_contact(other);
            }
            return None;
        }

        let candidate = if self.is_vertical() {
            let x = self.start.x;
            DVec2::new(x, other.slope() * x + other.y_intercept())
        } else if other.is_vertical() {
            let x = other.start.x;
            DVec2::new(x, self.slope() * x + self.y_intercept())
        } else {
            let slope1 = self.slope();
            let slope2 = other.slope();
            if approx_eq(slope1, slope2) {
                if approx_eq(self.y_intercept(), other.y_intercept()) {
                    return self.collinear_contact(other);
                }
                // Parallel on distinct carrier lines
                return None;
            }
            let x = (other.y_intercept() - self.y_intercept()) / (slope1 - slope2);
            DVec2::new(x, slope1 * x + self.y_intercept())
        };

        if self.contains_point(candidate) && other.contains_point(candidate) {
            Some(candidate)
        } else {
            None
        }
    }

    /// The rectangle-side intersection nearest this segment's start.
    pub fn closest_intersection_to_start(&self, rect: &Rect) -> Option<DVec2> {
        let mut closest = None;
        let mut best = f64::MAX;

        for p in rect.intersection_points(self) {
            let d = self.start.distance(p);
            if d < best {
                best = d;
                closest = Some(p);
            }
        }
        closest
    }
}

/// An axis-aligned rectangle anchored at its upper-left corner.
///
/// The four corners stay consistent with anchor + size by construction;
/// sides are derived on demand as [`Segment`]s.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    upper_left: DVec2,
    width: f64,
    height: f64,
}

impl Rect {
    /// Build a rectangle, rejecting zero or negative extents. Degenerate
    /// rectangles would yield degenerate side segments, so they fail fast
    /// here instead.
    pub fn new(upper_left: DVec2, width: f64, height: f64) -> Result<Self, GeometryError> {
        if width < EPSILON || height < EPSILON {
            return Err(GeometryError::EmptyRect);
        }
        Ok(Self {
            upper_left,
            width,
            height,
        })
    }

    #[inline]
    pub fn upper_left(&self) -> DVec2 {
        self.upper_left
    }

    #[inline]
    pub fn width(&self) -> f64 {
        self.width
    }

    #[inline]
    pub fn height(&self) -> f64 {
        self.height
    }

    pub fn upper_right(&self) -> DVec2 {
        self.upper_left + DVec2::new(self.width, 0.0)
    }

    pub fn lower_left(&self) -> DVec2 {
        self.upper_left + DVec2::new(0.0, self.height)
    }

    pub fn lower_right(&self) -> DVec2 {
        self.upper_left + DVec2::new(self.width, self.height)
    }

    pub fn left_side(&self) -> Segment {
        Segment::from_corners(self.lower_left(), self.upper_left)
    }

    pub fn right_side(&self) -> Segment {
        Segment::from_corners(self.lower_right(), self.upper_right())
    }

    pub fn top_side(&self) -> Segment {
        Segment::from_corners(self.upper_right(), self.upper_left)
    }

    pub fn bottom_side(&self) -> Segment {
        Segment::from_corners(self.lower_left(), self.lower_right())
    }

    /// Same extents re-anchored at a new upper-left corner. Cannot fail:
    /// the extents were validated when `self` was built.
    pub fn with_upper_left(&self, upper_left: DVec2) -> Self {
        Self {
            upper_left,
            width: self.width,
            height: self.height,
        }
    }

    /// All four sides, in the order collision responses probe them.
    pub fn sides(&self) -> [Segment; 4] {
        [
            self.bottom_side(),
            self.left_side(),
            self.right_side(),
            self.top_side(),
        ]
    }

    /// Every point where `seg` crosses one of this rectangle's sides.
    /// A segment grazing a corner can report the same point from two sides.
    pub fn intersection_points(&self, seg: &Segment) -> Vec<DVec2> {
        self.sides()
            .iter()
            .filter_map(|side| seg.intersection(side))
            .collect()
    }
}
