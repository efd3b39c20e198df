//! Pixel-space points and bounds, and grid-unit footprints.

use crate::elevation::ElevationInterval;

/// A point in scene pixel space with an optional elevation.
///
/// `x` and `y` are pixels. `elevation` is in scene units (e.g. feet) and
/// defaults to `0.0`; it is converted to pixels only when a measurement
/// needs a vertical component, using the grid's `size / distance` ratio.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Point {
    /// Horizontal pixel coordinate.
    pub x: f64,
    /// Vertical pixel coordinate (down is positive).
    pub y: f64,
    /// Elevation in scene units.
    pub elevation: f64,
}

impl Point {
    /// A point at ground level.
    pub const fn new(x: f64, y: f64) -> Self {
        Self {
            x,
            y,
            elevation: 0.0,
        }
    }

    /// A copy of this point at the given elevation.
    pub const fn at_elevation(self, elevation: f64) -> Self {
        Self { elevation, ..self }
    }

    /// Planar (x, y) Euclidean distance in pixels. Elevation is ignored.
    pub fn distance_to(&self, other: &Point) -> f64 {
        (other.x - self.x).hypot(other.y - self.y)
    }

    /// Midpoint of the planar segment; elevation is averaged.
    pub fn midpoint(&self, other: &Point) -> Point {
        Point {
            x: (self.x + other.x) / 2.0,
            y: (self.y + other.y) / 2.0,
            elevation: (self.elevation + other.elevation) / 2.0,
        }
    }
}

/// An axis-aligned pixel rectangle: a placeable's on-scene bounds.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Bounds {
    /// Left edge.
    pub x: f64,
    /// Top edge.
    pub y: f64,
    /// Width in pixels.
    pub width: f64,
    /// Height in pixels.
    pub height: f64,
}

impl Bounds {
    /// Construct bounds from top-left corner and size.
    pub const fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Right edge (`x + width`).
    pub fn right(&self) -> f64 {
        self.x + self.width
    }

    /// Bottom edge (`y + height`).
    pub fn bottom(&self) -> f64 {
        self.y + self.height
    }

    /// Center point at ground level.
    pub fn center(&self) -> Point {
        Point::new(self.x + self.width / 2.0, self.y + self.height / 2.0)
    }

    /// Whether `p` lies inside or on the edge of the rectangle.
    pub fn contains(&self, p: &Point) -> bool {
        p.x >= self.x && p.x <= self.right() && p.y >= self.y && p.y <= self.bottom()
    }

    /// Grow the rectangle by `amount` pixels on every side.
    pub fn expand(&self, amount: f64) -> Bounds {
        Bounds {
            x: self.x - amount,
            y: self.y - amount,
            width: self.width + 2.0 * amount,
            height: self.height + 2.0 * amount,
        }
    }
}

/// A placeable's occupied size in grid units.
///
/// A 1×1 footprint covers one cell; fractional footprints (e.g. 0.5 for a
/// tiny creature) still occupy the cell they sit in.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Footprint {
    /// Width in grid units.
    pub width: f64,
    /// Height in grid units.
    pub height: f64,
}

impl Footprint {
    /// A `width × height` footprint.
    pub const fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    /// A square `size × size` footprint.
    pub const fn square(size: f64) -> Self {
        Self {
            width: size,
            height: size,
        }
    }

    /// The longer side, used as the token's vertical extent.
    pub fn max_side(&self) -> f64 {
        self.width.max(self.height)
    }

    /// Whether width equals height.
    pub fn is_square(&self) -> bool {
        (self.width - self.height).abs() < f64::EPSILON
    }

    /// Vertical interval of a token with this footprint standing at
    /// `elevation`.
    ///
    /// Tokens are treated as cubes: the vertical extent is the longer
    /// side converted to scene units with `distance_per_cell`.
    pub fn vertical_interval(&self, elevation: f64, distance_per_cell: f64) -> ElevationInterval {
        ElevationInterval::new(elevation, self.max_side() * distance_per_cell)
    }
}

impl Default for Footprint {
    fn default() -> Self {
        Self::square(1.0)
    }
}
