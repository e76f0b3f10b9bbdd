use serde::{Deserialize, Serialize};

use crate::PickerError;

/// Tunable thresholds of the frame picker.
///
/// Fractions marked "of the image area" are multiplied by `width * height`;
/// the move threshold is relative to the mean image side `(width + height) / 2`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PickerParams {
    /// Width of the border band, as a fraction of each image side.
    pub margin_frac: f32,
    /// Initial coverage weight of cells inside the central region.
    pub center_weight: u8,
    /// Initial coverage weight of cells in the border band.
    pub margin_weight: u8,
    /// Minimal board quad area, as a fraction of the image area.
    pub min_area_frac: f32,
    /// Minimal coverage score gain, as a fraction of the image area.
    pub min_coverage_gain_frac: f32,
    /// Minimal centroid displacement, as a fraction of the mean image side.
    pub min_move_frac: f32,
    /// Two nearby boards with every corner angle closer than this (degrees)
    /// are considered the same pose.
    pub min_angle_change_deg: f32,
    /// Boards with any interior corner angle below this (degrees) are too
    /// oblique to be useful.
    pub min_corner_angle_deg: f32,
    /// Number of accepted samples after which the session is complete.
    pub max_samples: usize,
}

impl Default for PickerParams {
    fn default() -> Self {
        Self {
            margin_frac: 0.1,
            center_weight: 1,
            margin_weight: 5,
            min_area_frac: 0.04,
            min_coverage_gain_frac: 0.005,
            min_move_frac: 0.08,
            min_angle_change_deg: 5.0,
            min_corner_angle_deg: 40.0,
            max_samples: 45,
        }
    }
}

impl PickerParams {
    /// Check every threshold for finiteness and range.
    pub fn validate(&self) -> Result<(), PickerError> {
        fn unit(name: &'static str, value: f32) -> Result<(), PickerError> {
            if value.is_finite() && (0.0..=1.0).contains(&value) {
                Ok(())
            } else {
                Err(PickerError::InvalidParam {
                    name,
                    value: value as f64,
                })
            }
        }

        unit("min_area_frac", self.min_area_frac)?;
        unit("min_coverage_gain_frac", self.min_coverage_gain_frac)?;
        unit("min_move_frac", self.min_move_frac)?;

        if !(self.margin_frac.is_finite() && (0.0..0.5).contains(&self.margin_frac)) {
            return Err(PickerError::InvalidParam {
                name: "margin_frac",
                value: self.margin_frac as f64,
            });
        }
        if !(self.min_angle_change_deg.is_finite() && self.min_angle_change_deg >= 0.0) {
            return Err(PickerError::InvalidParam {
                name: "min_angle_change_deg",
                value: self.min_angle_change_deg as f64,
            });
        }
        if !(self.min_corner_angle_deg.is_finite()
            && (0.0..=90.0).contains(&self.min_corner_angle_deg))
        {
            return Err(PickerError::InvalidParam {
                name: "min_corner_angle_deg",
                value: self.min_corner_angle_deg as f64,
            });
        }
        if self.max_samples == 0 {
            return Err(PickerError::InvalidParam {
                name: "max_samples",
                value: 0.0,
            });
        }
        Ok(())
    }

    /// Minimal board area in square pixels for a `width x height` image.
    pub fn min_area_px(&self, width: usize, height: usize) -> f64 {
        self.min_area_frac as f64 * width as f64 * height as f64
    }

    /// Minimal coverage score for a `width x height` image.
    pub fn min_coverage_gain(&self, width: usize, height: usize) -> f64 {
        self.min_coverage_gain_frac as f64 * width as f64 * height as f64
    }

    /// Centroid distance, in pixels, below which two boards share a position.
    pub fn move_threshold_px(&self, width: usize, height: usize) -> f64 {
        self.min_move_frac as f64 * (width as f64 + height as f64) / 2.0
    }
}
