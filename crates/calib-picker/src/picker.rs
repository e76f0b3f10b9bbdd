use calib_picker_core::{extremal_corner_indices, BoardSquare};
use log::{debug, info};
use nalgebra::Point2;
use serde::Serialize;

#[cfg(feature = "tracing")]
use tracing::instrument;

use crate::acceptance::{self, Thresholds, Verdict};
use crate::{CoverageGrid, PickerError, PickerParams};

/// One accepted calibration frame.
#[derive(Clone, Debug, Serialize)]
pub struct PickedSample {
    /// Geometry of the extremal corners.
    pub square: BoardSquare,
    /// Full row-major corner set, handed to the calibration solve as-is.
    pub corners: Vec<Point2<f32>>,
}

/// Online selector of calibration frames.
///
/// Feed every detected corner set to [`AutoImagePicker::add_image`] and stop
/// capturing once [`AutoImagePicker::status`] returns `true`. The picker is
/// not internally synchronized; share it across threads behind a `Mutex`.
#[derive(Clone, Debug)]
pub struct AutoImagePicker {
    width: usize,
    height: usize,
    board_cols: usize,
    board_rows: usize,
    params: PickerParams,
    thresholds: Thresholds,
    coverage: CoverageGrid,
    samples: Vec<PickedSample>,
}

impl AutoImagePicker {
    /// Create a picker with default thresholds.
    ///
    /// `board_cols`/`board_rows` are inner corner counts per row/column.
    pub fn new(
        width: usize,
        height: usize,
        board_cols: usize,
        board_rows: usize,
    ) -> Result<Self, PickerError> {
        Self::with_params(width, height, board_cols, board_rows, PickerParams::default())
    }

    /// Create a picker with explicit thresholds.
    pub fn with_params(
        width: usize,
        height: usize,
        board_cols: usize,
        board_rows: usize,
        params: PickerParams,
    ) -> Result<Self, PickerError> {
        // The grid holds one byte per pixel.
        let addressable = width
            .checked_mul(height)
            .is_some_and(|pixels| pixels <= isize::MAX as usize);
        if width == 0 || height == 0 || !addressable {
            return Err(PickerError::InvalidImageSize { width, height });
        }
        if board_cols < 2 || board_rows < 2 {
            return Err(PickerError::InvalidBoardSize {
                cols: board_cols,
                rows: board_rows,
            });
        }
        params.validate()?;

        let coverage = CoverageGrid::new(
            width,
            height,
            params.margin_frac,
            params.center_weight,
            params.margin_weight,
        );
        let thresholds = Thresholds::resolve(&params, width, height);

        Ok(Self {
            width,
            height,
            board_cols,
            board_rows,
            params,
            thresholds,
            coverage,
            samples: Vec::new(),
        })
    }

    /// Offer one detection; returns whether it was kept.
    pub fn add_image(&mut self, corners: &[Point2<f32>]) -> Result<bool, PickerError> {
        self.evaluate(corners).map(|v| v.is_accepted())
    }

    /// Offer one detection and report which pipeline stage decided.
    ///
    /// On acceptance the sample is appended to the history and its footprint
    /// is spent on the coverage grid. A rejection leaves the picker untouched.
    #[cfg_attr(feature = "tracing", instrument(level = "debug", skip(self, corners), fields(corners = corners.len(), samples = self.samples.len())))]
    pub fn evaluate(&mut self, corners: &[Point2<f32>]) -> Result<Verdict, PickerError> {
        let [tl, tr, bl, br] =
            extremal_corner_indices(self.board_cols, self.board_rows, corners.len())?;
        let board = BoardSquare::new(corners[tl], corners[tr], corners[bl], corners[br]);

        let coverage = &self.coverage;
        let verdict = acceptance::evaluate(
            &board,
            self.samples.iter().map(|s| &s.square),
            &self.thresholds,
            |b| coverage.score(coverage.footprint(b)),
        );

        match verdict {
            Verdict::Accepted(reason) => {
                let fp = self.coverage.footprint(&board);
                self.coverage.consume(fp);
                self.samples.push(PickedSample {
                    square: board,
                    corners: corners.to_vec(),
                });
                debug!(
                    "accepted sample #{} ({:?}), footprint {} px, covered {:.1}%",
                    self.samples.len(),
                    reason,
                    fp.pixel_count(),
                    100.0 * self.coverage.covered_fraction()
                );
                if self.samples.len() == self.params.max_samples {
                    info!(
                        "enough selected images: {} samples collected",
                        self.samples.len()
                    );
                }
            }
            Verdict::Rejected(reason) => {
                debug!("rejected candidate ({:?})", reason);
            }
        }

        Ok(verdict)
    }

    /// True once `max_samples` frames have been accepted.
    #[inline]
    pub fn status(&self) -> bool {
        self.samples.len() >= self.params.max_samples
    }

    /// Coverage score of `board` against the current grid, without spending it.
    pub fn area_score(&self, board: &BoardSquare) -> u64 {
        self.coverage.score(self.coverage.footprint(board))
    }

    /// Accepted samples in acceptance order.
    #[inline]
    pub fn samples(&self) -> &[PickedSample] {
        &self.samples
    }

    /// Board descriptors of the accepted samples.
    pub fn boards(&self) -> impl Iterator<Item = &BoardSquare> + '_ {
        self.samples.iter().map(|s| &s.square)
    }

    /// Raw corner sets of the accepted samples, ready for calibration.
    pub fn corner_sets(&self) -> impl Iterator<Item = &[Point2<f32>]> + '_ {
        self.samples.iter().map(|s| s.corners.as_slice())
    }

    #[inline]
    pub fn sample_count(&self) -> usize {
        self.samples.len()
    }

    /// Image size as `(width, height)`.
    #[inline]
    pub fn image_size(&self) -> (usize, usize) {
        (self.width, self.height)
    }

    /// Board size as `(cols, rows)` inner corners.
    #[inline]
    pub fn board_size(&self) -> (usize, usize) {
        (self.board_cols, self.board_rows)
    }

    #[inline]
    pub fn params(&self) -> &PickerParams {
        &self.params
    }

    #[inline]
    pub fn coverage(&self) -> &CoverageGrid {
        &self.coverage
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::acceptance::{AcceptReason, RejectReason};

    fn grid(cols: usize, rows: usize, tl: (f32, f32), step: (f32, f32)) -> Vec<Point2<f32>> {
        (0..rows)
            .flat_map(|j| {
                (0..cols).map(move |i| {
                    Point2::new(tl.0 + i as f32 * step.0, tl.1 + j as f32 * step.1)
                })
            })
            .collect()
    }

    #[test]
    fn construction_fails_fast() {
        assert_eq!(
            AutoImagePicker::new(0, 480, 9, 6).unwrap_err(),
            PickerError::InvalidImageSize {
                width: 0,
                height: 480
            }
        );
        assert_eq!(
            AutoImagePicker::new(640, 480, 1, 6).unwrap_err(),
            PickerError::InvalidBoardSize { cols: 1, rows: 6 }
        );
        let params = PickerParams {
            margin_frac: -0.1,
            ..PickerParams::default()
        };
        assert!(AutoImagePicker::with_params(640, 480, 9, 6, params).is_err());
    }

    #[test]
    fn oversized_image_is_an_error() {
        for (width, height) in [(usize::MAX / 2, 4), (usize::MAX, 1), (4, usize::MAX)] {
            assert_eq!(
                AutoImagePicker::new(width, height, 9, 6).unwrap_err(),
                PickerError::InvalidImageSize { width, height }
            );
        }
    }

    #[test]
    fn accepting_tracks_spent_pixels() {
        let mut picker = AutoImagePicker::new(640, 480, 9, 6).expect("picker");
        let corners = grid(9, 6, (160.0, 120.0), (40.0, 48.0));
        assert_eq!(picker.coverage().spent_pixels(), 0);
        assert_eq!(picker.add_image(&corners), Ok(true));
        // Extremal corners span [160, 480) x [120, 360).
        assert_eq!(picker.coverage().spent_pixels(), 320 * 240);
        assert!((picker.coverage().covered_fraction() - 0.25).abs() < 1e-12);
    }

    #[test]
    fn wrong_corner_count_is_an_error() {
        let mut picker = AutoImagePicker::new(640, 480, 9, 6).expect("picker");
        let corners = grid(9, 5, (100.0, 100.0), (30.0, 30.0));
        assert_eq!(
            picker.add_image(&corners),
            Err(PickerError::CornerCount {
                expected: 54,
                got: 45
            })
        );
        assert_eq!(picker.sample_count(), 0);
    }

    #[test]
    fn duplicate_frame_is_redundant() {
        let mut picker = AutoImagePicker::new(640, 480, 9, 6).expect("picker");
        let corners = grid(9, 6, (160.0, 120.0), (40.0, 48.0));

        assert_eq!(
            picker.evaluate(&corners),
            Ok(Verdict::Accepted(AcceptReason::Moved))
        );
        assert_eq!(picker.area_score(picker.boards().next().expect("one")), 0);
        assert_eq!(
            picker.evaluate(&corners),
            Ok(Verdict::Rejected(RejectReason::RedundantPose))
        );
        assert_eq!(picker.sample_count(), 1);
        assert_eq!(picker.corner_sets().next(), Some(corners.as_slice()));
    }

    #[test]
    fn rejection_leaves_grid_untouched() {
        let mut picker = AutoImagePicker::new(640, 480, 9, 6).expect("picker");
        let before = picker.coverage().remaining_weight();
        let tiny = grid(9, 6, (10.0, 10.0), (5.0, 5.0));
        assert_eq!(picker.add_image(&tiny), Ok(false));
        assert_eq!(picker.coverage().remaining_weight(), before);
        assert!(picker.samples().is_empty());
    }
}
