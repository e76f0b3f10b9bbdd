//! Ordered acceptance pipeline for candidate boards.
//!
//! ```text
//! validity ──reject──▶ TooSmall / TooOblique / Degenerate
//!    │
//! displaced? ──yes──▶ Accepted(Moved)
//!    │ no
//! new coverage? ──yes──▶ Accepted(NewCoverage)
//!    │ no
//! same pose as a nearby sample? ──yes──▶ Rejected(RedundantPose)
//!    │ no
//!    ▼
//! Accepted(NovelPose)
//! ```
//!
//! Every stage is a pure function of the candidate, the accepted history and
//! precomputed pixel thresholds, so each one can be tested on literal values.

use calib_picker_core::BoardSquare;
use serde::Serialize;

use crate::PickerParams;

/// Why a candidate was admitted.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AcceptReason {
    /// Far enough from every accepted sample.
    Moved,
    /// Covers enough still-unspent image area.
    NewCoverage,
    /// Close to an earlier sample but seen at a different angle.
    NovelPose,
}

/// Why a candidate was turned away.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RejectReason {
    /// Collapsed quad: zero area or undefined corner angles.
    Degenerate,
    /// Board area below the minimum fraction of the image.
    TooSmall,
    /// Some interior corner angle below the minimum.
    TooOblique,
    /// Same position and pose as an accepted sample.
    RedundantPose,
}

/// Outcome of running the pipeline on one candidate.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Verdict {
    Accepted(AcceptReason),
    Rejected(RejectReason),
}

impl Verdict {
    #[inline]
    pub fn is_accepted(&self) -> bool {
        matches!(self, Verdict::Accepted(_))
    }
}

/// Pixel-space thresholds resolved from [`PickerParams`] for one image size.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Thresholds {
    pub min_area_px: f64,
    pub min_corner_angle_deg: f32,
    pub move_px: f64,
    pub min_coverage_gain: f64,
    pub min_angle_change_deg: f32,
}

impl Thresholds {
    pub fn resolve(params: &PickerParams, width: usize, height: usize) -> Self {
        Self {
            min_area_px: params.min_area_px(width, height),
            min_corner_angle_deg: params.min_corner_angle_deg,
            move_px: params.move_threshold_px(width, height),
            min_coverage_gain: params.min_coverage_gain(width, height),
            min_angle_change_deg: params.min_angle_change_deg,
        }
    }
}

/// Reject boards that are collapsed, too far away or seen too obliquely.
pub fn check_validity(board: &BoardSquare, th: &Thresholds) -> Result<(), RejectReason> {
    if board.is_degenerate() {
        return Err(RejectReason::Degenerate);
    }
    if (board.area() as f64) < th.min_area_px {
        return Err(RejectReason::TooSmall);
    }
    if board
        .angles()
        .iter()
        .any(|&a| a < th.min_corner_angle_deg)
    {
        return Err(RejectReason::TooOblique);
    }
    Ok(())
}

#[inline]
fn is_near(board: &BoardSquare, other: &BoardSquare, move_px: f64) -> bool {
    (board.distance_to(other) as f64) < move_px
}

/// True if the centroid is at least `move_px` away from every accepted sample.
pub fn is_displaced<'a>(
    board: &BoardSquare,
    history: impl IntoIterator<Item = &'a BoardSquare>,
    move_px: f64,
) -> bool {
    history
        .into_iter()
        .all(|prev| !is_near(board, prev, move_px))
}

/// True if the coverage score under the footprint reaches the gain threshold.
#[inline]
pub fn covers_new_area(score: u64, min_coverage_gain: f64) -> bool {
    score as f64 >= min_coverage_gain
}

/// True if every corner angle differs from `other` by less than `max_change_deg`.
pub fn same_pose(board: &BoardSquare, other: &BoardSquare, max_change_deg: f32) -> bool {
    board
        .angles()
        .iter()
        .zip(other.angles().iter())
        .all(|(a, b)| (a - b).abs() < max_change_deg)
}

/// True unless some nearby accepted sample shows the board in the same pose.
pub fn has_novel_pose<'a>(
    board: &BoardSquare,
    history: impl IntoIterator<Item = &'a BoardSquare>,
    th: &Thresholds,
) -> bool {
    !history.into_iter().any(|prev| {
        is_near(board, prev, th.move_px) && same_pose(board, prev, th.min_angle_change_deg)
    })
}

/// Run the full pipeline.
///
/// `coverage_score` is only called when the displacement test fails.
pub fn evaluate<'a, H, F>(
    board: &BoardSquare,
    history: H,
    th: &Thresholds,
    coverage_score: F,
) -> Verdict
where
    H: IntoIterator<Item = &'a BoardSquare> + Clone,
    F: FnOnce(&BoardSquare) -> u64,
{
    if let Err(reason) = check_validity(board, th) {
        return Verdict::Rejected(reason);
    }
    if is_displaced(board, history.clone(), th.move_px) {
        return Verdict::Accepted(AcceptReason::Moved);
    }
    if covers_new_area(coverage_score(board), th.min_coverage_gain) {
        return Verdict::Accepted(AcceptReason::NewCoverage);
    }
    if has_novel_pose(board, history, th) {
        Verdict::Accepted(AcceptReason::NovelPose)
    } else {
        Verdict::Rejected(RejectReason::RedundantPose)
    }
}
