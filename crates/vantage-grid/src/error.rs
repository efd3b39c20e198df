//! Error types for grid construction.

use std::fmt;

/// Errors arising from grid topology construction.
#[derive(Debug, Clone, PartialEq)]
pub enum GridError {
    /// Cell size in pixels is zero, negative, or not finite.
    InvalidCellSize {
        /// The rejected value.
        value: f64,
    },
    /// Scene distance per cell is zero, negative, or not finite.
    InvalidDistance {
        /// The rejected value.
        value: f64,
    },
    /// Scene has no area.
    EmptyScene,
    /// The scene would need more rows or columns than `i32` offsets hold.
    DimensionTooLarge {
        /// Which axis overflowed.
        name: &'static str,
        /// The computed row or column count.
        value: f64,
    },
}

impl fmt::Display for GridError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidCellSize { value } => {
                write!(f, "cell size must be finite and positive, got {value}")
            }
            Self::InvalidDistance { value } => {
                write!(f, "distance per cell must be finite and positive, got {value}")
            }
            Self::EmptyScene => write!(f, "scene must have a positive width and height"),
            Self::DimensionTooLarge { name, value } => {
                write!(f, "{name} = {value} exceeds the maximum grid extent")
            }
        }
    }
}

impl std::error::Error for GridError {}
