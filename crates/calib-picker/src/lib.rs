//! Online selection of chessboard frames for camera intrinsic calibration.
//!
//! A capture loop detects chessboard corners in every frame and offers them to
//! an [`AutoImagePicker`]. The picker keeps a frame only when it adds something
//! to the sample set: a new board position, unspent image area (the border
//! band weighs more than the center), or a new pose at a known position. It
//! turns away boards that are too small, too oblique or degenerate.
//!
//! ## Quickstart
//!
//! ```
//! use calib_picker::AutoImagePicker;
//! use nalgebra::Point2;
//!
//! let mut picker = AutoImagePicker::new(640, 480, 9, 6)?;
//!
//! let corners: Vec<Point2<f32>> = (0..6)
//!     .flat_map(|j| (0..9).map(move |i| Point2::new(160.0 + 40.0 * i as f32, 120.0 + 48.0 * j as f32)))
//!     .collect();
//! assert!(picker.add_image(&corners)?);
//! assert!(!picker.add_image(&corners)?);
//! assert!(!picker.status());
//! # Ok::<(), calib_picker::PickerError>(())
//! ```

pub mod acceptance;
mod coverage;
mod error;
mod io;
mod params;
mod picker;

pub use acceptance::{AcceptReason, RejectReason, Verdict};
pub use coverage::{CoverageGrid, Footprint};
pub use error::PickerError;
pub use io::{PickerConfig, PickerIoError};
pub use params::PickerParams;
pub use picker::{AutoImagePicker, PickedSample};

pub use calib_picker_core::BoardSquare;
