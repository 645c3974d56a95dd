//! Real-valued and discrete geometry primitives.

use std::fmt;
use std::ops::{Add, Sub};

/// Tolerance applied to span overlap tests.
///
/// Entities placed in adjacent cells share an edge; floating-point
/// rounding of `center ± half_extent` must not turn that shared edge
/// into a spurious overlap.
pub const SPAN_EPSILON: f64 = 1e-9;

/// A point or extent in real (arena-unit) coordinates.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Vec2 {
    /// X component.
    pub x: f64,
    /// Y component.
    pub y: f64,
}

impl Vec2 {
    /// Construct a vector from its components.
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Euclidean length.
    pub fn length(self) -> f64 {
        self.x.hypot(self.y)
    }

    /// `true` if both components are finite.
    pub fn is_finite(self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }
}

impl Add for Vec2 {
    type Output = Vec2;

    fn add(self, rhs: Vec2) -> Vec2 {
        Vec2::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl Sub for Vec2 {
    type Output = Vec2;

    fn sub(self, rhs: Vec2) -> Vec2 {
        Vec2::new(self.x - rhs.x, self.y - rhs.y)
    }
}

impl fmt::Display for Vec2 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({:.3}, {:.3})", self.x, self.y)
    }
}

/// A discrete grid coordinate `(x, y)`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CellCoord {
    /// Column index.
    pub x: usize,
    /// Row index.
    pub y: usize,
}

impl CellCoord {
    /// Construct a coordinate from its components.
    pub const fn new(x: usize, y: usize) -> Self {
        Self { x, y }
    }
}

impl fmt::Display for CellCoord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

/// A closed-open real interval `[lb, ub)` along one axis.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Span {
    lb: f64,
    ub: f64,
}

impl Span {
    /// Construct a span. Bounds are reordered if given backwards.
    pub fn new(lb: f64, ub: f64) -> Self {
        if lb <= ub {
            Self { lb, ub }
        } else {
            Self { lb: ub, ub: lb }
        }
    }

    /// Span of an extent `dim` wide centred on `center`.
    pub fn from_center(center: f64, dim: f64) -> Self {
        let half = dim / 2.0;
        Self::new(center - half, center + half)
    }

    /// Lower bound.
    pub fn lb(&self) -> f64 {
        self.lb
    }

    /// Upper bound.
    pub fn ub(&self) -> f64 {
        self.ub
    }

    /// Width of the span.
    pub fn span(&self) -> f64 {
        self.ub - self.lb
    }

    /// `true` if the interiors of the two spans intersect.
    ///
    /// Spans that merely touch at an endpoint do not overlap.
    pub fn overlaps_with(&self, other: &Span) -> bool {
        self.lb < other.ub - SPAN_EPSILON && other.lb < self.ub - SPAN_EPSILON
    }

    /// `true` if `v` lies in `[lb, ub)`.
    pub fn contains(&self, v: f64) -> bool {
        v >= self.lb && v < self.ub
    }
}

impl fmt::Display for Span {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{:.3}-{:.3})", self.lb, self.ub)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn adjacent_spans_do_not_overlap() {
        let a = Span::from_center(0.5 * 0.2, 0.2);
        let b = Span::from_center(1.5 * 0.2, 0.2);
        assert!(!a.overlaps_with(&b));
        assert!(!b.overlaps_with(&a));
    }

    #[test]
    fn nested_spans_overlap() {
        let outer = Span::new(0.0, 4.0);
        let inner = Span::new(1.0, 2.0);
        assert!(outer.overlaps_with(&inner));
        assert!(inner.overlaps_with(&outer));
    }

    #[test]
    fn contains_is_closed_open() {
        let s = Span::new(1.0, 2.0);
        assert!(s.contains(1.0));
        assert!(s.contains(1.999));
        assert!(!s.contains(2.0));
        assert!(!s.contains(0.999));
    }

    #[test]
    fn new_reorders_bounds() {
        let s = Span::new(3.0, 1.0);
        assert_eq!(s.lb(), 1.0);
        assert_eq!(s.ub(), 3.0);
    }

    proptest! {
        #[test]
        fn overlap_is_symmetric(
            a in -100.0f64..100.0, aw in 0.0f64..10.0,
            b in -100.0f64..100.0, bw in 0.0f64..10.0,
        ) {
            let sa = Span::from_center(a, aw);
            let sb = Span::from_center(b, bw);
            prop_assert_eq!(sa.overlaps_with(&sb), sb.overlaps_with(&sa));
        }

        #[test]
        fn shared_point_implies_overlap(
            c in -100.0f64..100.0, aw in 0.1f64..10.0, bw in 0.1f64..10.0,
        ) {
            // Two non-degenerate spans centred on the same point always overlap.
            let sa = Span::from_center(c, aw);
            let sb = Span::from_center(c, bw);
            prop_assert!(sa.overlaps_with(&sb));
        }
    }
}
