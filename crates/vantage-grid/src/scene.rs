//! Shared validated scene parameters for every grid backend.

use crate::error::GridError;
use vantage_core::GridInstanceId;

/// Validated cell size, distance, units, and extent of a scene.
#[derive(Debug, Clone)]
pub(crate) struct SceneParams {
    pub(crate) size: f64,
    pub(crate) distance: f64,
    pub(crate) units: String,
    pub(crate) rows: i32,
    pub(crate) cols: i32,
    pub(crate) instance_id: GridInstanceId,
}

impl SceneParams {
    /// Validate inputs and derive the row/column extent.
    ///
    /// `row_pitch` and `col_pitch` are the pixel spacing between
    /// consecutive rows and columns for the backend's cell layout.
    pub(crate) fn new(
        size: f64,
        distance: f64,
        units: &str,
        width_px: f64,
        height_px: f64,
        row_pitch: f64,
        col_pitch: f64,
    ) -> Result<Self, GridError> {
        if !size.is_finite() || size <= 0.0 {
            return Err(GridError::InvalidCellSize { value: size });
        }
        if !distance.is_finite() || distance <= 0.0 {
            return Err(GridError::InvalidDistance { value: distance });
        }
        if !(width_px.is_finite() && height_px.is_finite()) || width_px <= 0.0 || height_px <= 0.0
        {
            return Err(GridError::EmptyScene);
        }
        let rows = extent("rows", height_px / row_pitch)?;
        let cols = extent("cols", width_px / col_pitch)?;
        Ok(Self {
            size,
            distance,
            units: units.to_string(),
            rows,
            cols,
            instance_id: GridInstanceId::next(),
        })
    }
}

fn extent(name: &'static str, cells: f64) -> Result<i32, GridError> {
    let value = cells.ceil();
    if value > i32::MAX as f64 {
        return Err(GridError::DimensionTooLarge { name, value });
    }
    Ok((value as i32).max(1))
}
