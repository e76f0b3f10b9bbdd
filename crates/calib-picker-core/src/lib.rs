//! Core geometry for calibration frame selection.
//!
//! This crate is purely geometric. It knows nothing about corner detectors,
//! images or the selection policy; it only turns the extremal corners of a
//! detected chessboard into a [`BoardSquare`] descriptor.

mod board_square;
mod logger;

pub use board_square::{
    corner_angle_deg, extremal_corner_indices, quad_area, BoardSquare, GridIndexError,
};

#[cfg(feature = "tracing")]
pub use logger::init_tracing;

pub use logger::{init_from_env, init_with_level, LOG_ENV_VAR};
