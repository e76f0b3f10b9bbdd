//! JSON configuration helpers for picker sessions.

use serde::{Deserialize, Serialize};
use std::{fs, path::Path};

use crate::{AutoImagePicker, PickerError, PickerParams};

#[derive(thiserror::Error, Debug)]
pub enum PickerIoError {
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

/// Session configuration: camera resolution, board size and thresholds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PickerConfig {
    pub image_width: usize,
    pub image_height: usize,
    /// Inner corners per board row.
    pub board_cols: usize,
    /// Inner corners per board column.
    pub board_rows: usize,
    #[serde(default)]
    pub params: Option<PickerParams>,
}

impl PickerConfig {
    /// Load a JSON config from disk.
    pub fn load_json(path: impl AsRef<Path>) -> Result<Self, PickerIoError> {
        let raw = fs::read_to_string(path)?;
        Ok(serde_json::from_str(&raw)?)
    }

    /// Write this config to disk as pretty JSON.
    pub fn write_json(&self, path: impl AsRef<Path>) -> Result<(), PickerIoError> {
        let json = serde_json::to_string_pretty(self)?;
        fs::write(path, json)?;
        Ok(())
    }

    /// Thresholds from the config, or the defaults when absent.
    pub fn build_params(&self) -> PickerParams {
        self.params.clone().unwrap_or_default()
    }

    /// Build a picker from this config.
    pub fn build_picker(&self) -> Result<AutoImagePicker, PickerError> {
        AutoImagePicker::with_params(
            self.image_width,
            self.image_height,
            self.board_cols,
            self.board_rows,
            self.build_params(),
        )
    }
}
