//! Footprint shapes derived from placeable bounds.

use vantage_core::{Bounds, Point};

/// Discriminant of a [`Shape`].
///
/// Variants are declared in name order so that the derived `Ord` sorts
/// pair keys the same way for every caller.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ShapeKind {
    /// [`Shape::Circle`].
    Circle,
    /// [`Shape::Ellipse`].
    Ellipse,
    /// [`Shape::Rectangle`].
    Rectangle,
}

/// A token footprint in pixel space.
///
/// Shapes are values: they are rebuilt from the current bounds for every
/// query and never mutated, since placeables move every frame.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Shape {
    /// Axis-aligned rectangle with top-left corner `(x, y)`.
    Rectangle {
        /// Left edge.
        x: f64,
        /// Top edge.
        y: f64,
        /// Width.
        w: f64,
        /// Height.
        h: f64,
    },
    /// Circle centered at `(x, y)`.
    Circle {
        /// Center x.
        x: f64,
        /// Center y.
        y: f64,
        /// Radius.
        r: f64,
    },
    /// Axis-aligned ellipse centered at `(x, y)`.
    Ellipse {
        /// Center x.
        x: f64,
        /// Center y.
        y: f64,
        /// Horizontal semi-axis.
        rx: f64,
        /// Vertical semi-axis.
        ry: f64,
    },
}

impl Shape {
    /// Rectangle covering `bounds`.
    pub fn rect(bounds: &Bounds) -> Self {
        Self::Rectangle {
            x: bounds.x,
            y: bounds.y,
            w: bounds.width,
            h: bounds.height,
        }
    }

    /// Footprint shape of a placeable.
    ///
    /// Square tokens are rectangles. Round tokens are circles when their
    /// bounds are square and ellipses otherwise.
    pub fn from_bounds(bounds: &Bounds, round: bool) -> Self {
        if !round {
            return Self::rect(bounds);
        }
        let c = bounds.center();
        let rx = bounds.width / 2.0;
        let ry = bounds.height / 2.0;
        if (rx - ry).abs() < f64::EPSILON {
            Self::Circle { x: c.x, y: c.y, r: rx }
        } else {
            Self::Ellipse { x: c.x, y: c.y, rx, ry }
        }
    }

    /// Which variant this is.
    pub fn kind(&self) -> ShapeKind {
        match self {
            Self::Rectangle { .. } => ShapeKind::Rectangle,
            Self::Circle { .. } => ShapeKind::Circle,
            Self::Ellipse { .. } => ShapeKind::Ellipse,
        }
    }

    /// Geometric center.
    pub fn center(&self) -> Point {
        match *self {
            Self::Rectangle { x, y, w, h } => Point::new(x + w / 2.0, y + h / 2.0),
            Self::Circle { x, y, .. } | Self::Ellipse { x, y, .. } => Point::new(x, y),
        }
    }

    /// Axis-aligned bounding box.
    pub fn bounds(&self) -> Bounds {
        match *self {
            Self::Rectangle { x, y, w, h } => Bounds::new(x, y, w, h),
            Self::Circle { x, y, r } => Bounds::new(x - r, y - r, 2.0 * r, 2.0 * r),
            Self::Ellipse { x, y, rx, ry } => Bounds::new(x - rx, y - ry, 2.0 * rx, 2.0 * ry),
        }
    }

    /// Whether `p` lies inside or on the boundary.
    pub fn contains(&self, p: &Point) -> bool {
        match *self {
            Self::Rectangle { x, y, w, h } => Bounds::new(x, y, w, h).contains(p),
            Self::Circle { x, y, r } => (p.x - x).hypot(p.y - y) <= r,
            Self::Ellipse { x, y, rx, ry } => ellipse_metric(x, y, rx, ry, p) <= 1.0,
        }
    }
}

/// Implicit-form value `dx²/rx² + dy²/ry²`: `≤ 1` inside the ellipse.
///
/// Degenerate (zero) semi-axes only contain points on their axis.
pub(crate) fn ellipse_metric(cx: f64, cy: f64, rx: f64, ry: f64, p: &Point) -> f64 {
    let term = |d: f64, r: f64| {
        if r > 0.0 {
            (d * d) / (r * r)
        } else if d == 0.0 {
            0.0
        } else {
            f64::INFINITY
        }
    };
    term(p.x - cx, rx) + term(p.y - cy, ry)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kinds_sort_by_name() {
        assert!(ShapeKind::Circle < ShapeKind::Ellipse);
        assert!(ShapeKind::Ellipse < ShapeKind::Rectangle);
    }

    #[test]
    fn from_bounds_variants() {
        let square = Bounds::new(0.0, 0.0, 100.0, 100.0);
        let wide = Bounds::new(0.0, 0.0, 200.0, 100.0);
        assert_eq!(Shape::from_bounds(&square, false).kind(), ShapeKind::Rectangle);
        assert_eq!(
            Shape::from_bounds(&square, true),
            Shape::Circle { x: 50.0, y: 50.0, r: 50.0 }
        );
        assert_eq!(
            Shape::from_bounds(&wide, true),
            Shape::Ellipse { x: 100.0, y: 50.0, rx: 100.0, ry: 50.0 }
        );
    }

    #[test]
    fn bounds_round_trip() {
        let b = Bounds::new(10.0, 20.0, 30.0, 40.0);
        assert_eq!(Shape::from_bounds(&b, false).bounds(), b);
        assert_eq!(Shape::from_bounds(&b, true).bounds(), b);
    }

    #[test]
    fn containment() {
        let e = Shape::Ellipse { x: 0.0, y: 0.0, rx: 20.0, ry: 10.0 };
        assert!(e.contains(&Point::new(19.0, 0.0)));
        assert!(!e.contains(&Point::new(0.0, 11.0)));
        let c = Shape::Circle { x: 0.0, y: 0.0, r: 5.0 };
        assert!(c.contains(&Point::new(3.0, 4.0)));
    }

    #[test]
    fn degenerate_ellipse_metric() {
        let p = Point::new(0.0, 3.0);
        assert_eq!(ellipse_metric(0.0, 0.0, 0.0, 5.0, &p), 9.0 / 25.0);
        assert!(ellipse_metric(0.0, 0.0, 0.0, 5.0, &Point::new(1.0, 0.0)).is_infinite());
    }
}
