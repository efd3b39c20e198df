//! Closest-point solver between footprint shapes.
//!
//! Pairs are dispatched on a sorted [`ShapeKind`] key so each of the six
//! unordered combinations is written once; the three mirrored orderings
//! are answered by solving the canonical pair and swapping the outputs.
//! All results are ground-level points; callers tag elevation.

use crate::shape::{ellipse_metric, Shape, ShapeKind};
use vantage_core::{Bounds, Point};

/// Refinement steps for the ellipse/rectangle fixed-point search.
const ELLIPSE_RECT_ITERATIONS: usize = 8;

/// Nearest points between two shapes, as `(on_a, on_b)`.
///
/// Overlapping shapes return the same point twice. Round shapes with
/// coincident centers have no defined direction and return their centers
/// unchanged.
///
/// # Examples
///
/// ```
/// use vantage_core::Point;
/// use vantage_geom::{closest, Shape};
///
/// let a = Shape::Rectangle { x: 0.0, y: 0.0, w: 100.0, h: 100.0 };
/// let b = Shape::Circle { x: 300.0, y: 50.0, r: 50.0 };
/// let (pa, pb) = closest(&a, &b);
/// assert_eq!(pa, Point::new(100.0, 50.0));
/// assert_eq!(pb, Point::new(250.0, 50.0));
/// ```
pub fn closest(a: &Shape, b: &Shape) -> (Point, Point) {
    if a.kind() <= b.kind() {
        closest_canonical(a, b)
    } else {
        let (pb, pa) = closest_canonical(b, a);
        (pa, pb)
    }
}

/// Nearest point on `shape` to an external point.
///
/// Points already inside the shape are returned as-is.
pub fn closest_to_point(shape: &Shape, p: Point) -> Point {
    let p = Point::new(p.x, p.y);
    match *shape {
        Shape::Rectangle { x, y, w, h } => clamp_to_rect(&Bounds::new(x, y, w, h), p),
        Shape::Circle { x, y, r } => project_from_center(Point::new(x, y), r, r, p),
        Shape::Ellipse { x, y, rx, ry } => project_from_center(Point::new(x, y), rx, ry, p),
    }
}

/// Solve a pair whose kinds are already in sorted order.
fn closest_canonical(a: &Shape, b: &Shape) -> (Point, Point) {
    use Shape::{Circle, Ellipse, Rectangle};
    match (*a, *b) {
        (Rectangle { x, y, w, h }, Rectangle { x: bx, y: by, w: bw, h: bh }) => {
            rect_rect(&Bounds::new(x, y, w, h), &Bounds::new(bx, by, bw, bh))
        }
        (Circle { x, y, r }, Circle { x: bx, y: by, r: br }) => {
            round_round(Point::new(x, y), (r, r), Point::new(bx, by), (br, br))
        }
        (Circle { x, y, r }, Ellipse { x: bx, y: by, rx, ry }) => {
            round_round(Point::new(x, y), (r, r), Point::new(bx, by), (rx, ry))
        }
        (Ellipse { x, y, rx, ry }, Ellipse { x: bx, y: by, rx: brx, ry: bry }) => {
            let ca = Point::new(x, y);
            let cb = Point::new(bx, by);
            // Either center inside the other ellipse: overlapping or
            // contained, so both sides share the midpoint.
            if ellipse_metric(x, y, rx, ry, &cb) <= 1.0
                || ellipse_metric(bx, by, brx, bry, &ca) <= 1.0
            {
                let m = ca.midpoint(&cb);
                return (m, m);
            }
            round_round(ca, (rx, ry), cb, (brx, bry))
        }
        (Circle { x, y, r }, Rectangle { x: bx, y: by, w, h }) => {
            round_rect(Point::new(x, y), (r, r), &Bounds::new(bx, by, w, h))
        }
        (Ellipse { x, y, rx, ry }, Rectangle { x: bx, y: by, w, h }) => {
            round_rect(Point::new(x, y), (rx, ry), &Bounds::new(bx, by, w, h))
        }
        (a, b) => unreachable!(
            "shape pair ({:?}, {:?}) is not in canonical order",
            a.kind(),
            b.kind()
        ),
    }
}

/// Per-axis clamp: exact and O(1).
fn rect_rect(a: &Bounds, b: &Bounds) -> (Point, Point) {
    let (ax, bx) = axis_closest(a.x, a.right(), b.x, b.right());
    let (ay, by) = axis_closest(a.y, a.bottom(), b.y, b.bottom());
    (Point::new(ax, ay), Point::new(bx, by))
}

/// Closest coordinates of two intervals; overlapping intervals share the
/// midpoint of their overlap.
fn axis_closest(a0: f64, a1: f64, b0: f64, b1: f64) -> (f64, f64) {
    if a1 < b0 {
        (a1, b0)
    } else if b1 < a0 {
        (a0, b1)
    } else {
        let m = (a0.max(b0) + a1.min(b1)) / 2.0;
        (m, m)
    }
}

/// Distance from an ellipse center to its boundary along unit `(ux, uy)`.
fn reach(rx: f64, ry: f64, ux: f64, uy: f64) -> f64 {
    let term = |u: f64, r: f64| {
        if r > 0.0 {
            (u * u) / (r * r)
        } else if u == 0.0 {
            0.0
        } else {
            f64::INFINITY
        }
    };
    1.0 / (term(ux, rx) + term(uy, ry)).sqrt()
}

/// Unit direction and length from `from` to `to`; `None` if coincident.
fn direction(from: Point, to: Point) -> Option<(f64, f64, f64)> {
    let dx = to.x - from.x;
    let dy = to.y - from.y;
    let len = dx.hypot(dy);
    if len == 0.0 {
        None
    } else {
        Some((dx / len, dy / len, len))
    }
}

/// Circle or ellipse pair: project each center along the inter-center
/// direction onto its own boundary.
fn round_round(ca: Point, (rxa, rya): (f64, f64), cb: Point, (rxb, ryb): (f64, f64)) -> (Point, Point) {
    let Some((ux, uy, len)) = direction(ca, cb) else {
        return (ca, cb);
    };
    let ta = reach(rxa, rya, ux, uy);
    let tb = reach(rxb, ryb, ux, uy);
    let pa = Point::new(ca.x + ta * ux, ca.y + ta * uy);
    let pb = Point::new(cb.x - tb * ux, cb.y - tb * uy);
    if ta + tb >= len {
        let m = pa.midpoint(&pb);
        return (m, m);
    }
    (pa, pb)
}

/// Circle or ellipse against a rectangle.
///
/// Exact for circles. Ellipses refine the rectangle point by repeatedly
/// projecting toward it and clamping back, which converges quickly for
/// the token-sized shapes this is used with.
fn round_rect(c: Point, (rx, ry): (f64, f64), rect: &Bounds) -> (Point, Point) {
    let mut q = clamp_to_rect(rect, c);
    for _ in 0..ELLIPSE_RECT_ITERATIONS {
        if ellipse_metric(c.x, c.y, rx, ry, &q) <= 1.0 {
            return (q, q);
        }
        let Some((ux, uy, _)) = direction(c, q) else {
            return (q, q);
        };
        let t = reach(rx, ry, ux, uy);
        let pe = Point::new(c.x + t * ux, c.y + t * uy);
        let next = clamp_to_rect(rect, pe);
        if (rx - ry).abs() < f64::EPSILON || next == q {
            return (pe, q);
        }
        q = next;
    }
    let (ux, uy, _) = direction(c, q).unwrap_or((1.0, 0.0, 0.0));
    let t = reach(rx, ry, ux, uy);
    (Point::new(c.x + t * ux, c.y + t * uy), q)
}

fn clamp_to_rect(rect: &Bounds, p: Point) -> Point {
    Point::new(p.x.clamp(rect.x, rect.right()), p.y.clamp(rect.y, rect.bottom()))
}

fn project_from_center(c: Point, rx: f64, ry: f64, p: Point) -> Point {
    if ellipse_metric(c.x, c.y, rx, ry, &p) <= 1.0 {
        return p;
    }
    match direction(c, p) {
        Some((ux, uy, _)) => {
            let t = reach(rx, ry, ux, uy);
            Point::new(c.x + t * ux, c.y + t * uy)
        }
        None => p,
    }
}
