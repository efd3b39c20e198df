//! Vertical extent of tokens for volumetric measurement.

/// A closed vertical interval `[bottom, top]` in scene units.
///
/// A token standing at elevation `e` with vertical extent `h` occupies
/// `[e, e + h]`. A bare point is the degenerate interval `[e, e]`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ElevationInterval {
    /// Lowest elevation occupied.
    pub bottom: f64,
    /// Highest elevation occupied.
    pub top: f64,
}

impl ElevationInterval {
    /// Interval from `bottom` spanning `height` scene units upward.
    ///
    /// Negative heights are treated as zero.
    pub fn new(bottom: f64, height: f64) -> Self {
        Self {
            bottom,
            top: bottom + height.max(0.0),
        }
    }

    /// The degenerate interval of a bare point.
    pub fn point(elevation: f64) -> Self {
        Self {
            bottom: elevation,
            top: elevation,
        }
    }

    /// Whether the two intervals share at least one elevation.
    ///
    /// Touching intervals (`a.top == b.bottom`) overlap.
    pub fn overlaps(&self, other: &ElevationInterval) -> bool {
        self.bottom <= other.top && other.bottom <= self.top
    }

    /// Size of the empty vertical gap between two intervals.
    ///
    /// Zero when they overlap.
    pub fn vertical_gap(&self, other: &ElevationInterval) -> f64 {
        if self.overlaps(other) {
            0.0
        } else if self.top < other.bottom {
            other.bottom - self.top
        } else {
            self.bottom - other.top
        }
    }

    /// Vertical offset from a bare point at `elevation` to this interval.
    ///
    /// A point inside the interval is clamped into it and contributes no
    /// offset; otherwise the offset is the excess above `top` or below
    /// `bottom`.
    pub fn probe(&self, elevation: f64) -> f64 {
        if elevation > self.top {
            elevation - self.top
        } else if elevation < self.bottom {
            self.bottom - elevation
        } else {
            0.0
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn disjoint_gap() {
        let low = ElevationInterval::new(0.0, 5.0);
        let high = ElevationInterval::new(10.0, 5.0);
        assert!(!low.overlaps(&high));
        assert_eq!(low.vertical_gap(&high), 5.0);
        assert_eq!(high.vertical_gap(&low), 5.0);
    }

    #[test]
    fn touching_intervals_overlap() {
        let low = ElevationInterval::new(0.0, 5.0);
        let high = ElevationInterval::new(5.0, 5.0);
        assert!(low.overlaps(&high));
        assert_eq!(low.vertical_gap(&high), 0.0);
    }

    #[test]
    fn probe_clamps_inside() {
        let token = ElevationInterval::new(10.0, 5.0);
        assert_eq!(token.probe(12.0), 0.0);
        assert_eq!(token.probe(20.0), 5.0);
        assert_eq!(token.probe(4.0), 6.0);
    }

    #[test]
    fn negative_height_is_flat() {
        let i = ElevationInterval::new(3.0, -2.0);
        assert_eq!(i, ElevationInterval::point(3.0));
    }

    proptest! {
        #[test]
        fn gap_is_symmetric_and_non_negative(
            a in -100.0f64..100.0, ha in 0.0f64..50.0,
            b in -100.0f64..100.0, hb in 0.0f64..50.0,
        ) {
            let x = ElevationInterval::new(a, ha);
            let y = ElevationInterval::new(b, hb);
            prop_assert!(x.vertical_gap(&y) >= 0.0);
            prop_assert!((x.vertical_gap(&y) - y.vertical_gap(&x)).abs() < 1e-9);
            prop_assert_eq!(x.overlaps(&y), x.vertical_gap(&y) == 0.0);
        }
    }
}
