use calib_picker_core::GridIndexError;

/// Errors returned by the frame picker.
///
/// A rejected frame is not an error; see [`crate::Verdict`].
#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum PickerError {
    #[error("image size must be non-zero, got {width}x{height}")]
    InvalidImageSize { width: usize, height: usize },
    #[error("board needs at least 2x2 inner corners, got {cols}x{rows}")]
    InvalidBoardSize { cols: usize, rows: usize },
    #[error("expected {expected} corners for the board, got {got}")]
    CornerCount { expected: usize, got: usize },
    #[error("invalid picker parameter {name} = {value}")]
    InvalidParam { name: &'static str, value: f64 },
}

impl From<GridIndexError> for PickerError {
    fn from(err: GridIndexError) -> Self {
        match err {
            GridIndexError::BoardTooSmall { cols, rows } => Self::InvalidBoardSize { cols, rows },
            GridIndexError::CornerCount { expected, got } => Self::CornerCount { expected, got },
        }
    }
}
