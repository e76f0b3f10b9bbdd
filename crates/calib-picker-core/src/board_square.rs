//! Geometric descriptor of a detected chessboard.
//!
//! A [`BoardSquare`] is built from the four extremal inner corners of a
//! detection (top-left, top-right, bottom-left, bottom-right) and caches the
//! quantities the frame picker compares between candidates: bounding box,
//! centroid, quad area and the four interior corner angles.

use nalgebra::Point2;
use serde::Serialize;

/// Errors raised when locating the extremal corners in a row-major corner array.
#[derive(thiserror::Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum GridIndexError {
    #[error("board needs at least 2x2 inner corners, got {cols}x{rows}")]
    BoardTooSmall { cols: usize, rows: usize },
    #[error("expected {expected} corners for the board, got {got}")]
    CornerCount { expected: usize, got: usize },
}

/// Index of the four extremal corners `[tl, tr, bl, br]` in a row-major grid.
pub fn extremal_corner_indices(
    cols: usize,
    rows: usize,
    len: usize,
) -> Result<[usize; 4], GridIndexError> {
    if cols < 2 || rows < 2 {
        return Err(GridIndexError::BoardTooSmall { cols, rows });
    }
    let total = cols
        .checked_mul(rows)
        .ok_or(GridIndexError::CornerCount {
            expected: usize::MAX,
            got: len,
        })?;
    if len != total {
        return Err(GridIndexError::CornerCount {
            expected: total,
            got: len,
        });
    }
    Ok([0, cols - 1, total - cols, total - 1])
}

/// Shoelace area of a quad given in winding order.
pub fn quad_area(pts: &[Point2<f32>; 4]) -> f32 {
    let mut twice = 0.0f32;
    for k in 0..4 {
        let a = pts[k];
        let b = pts[(k + 1) % 4];
        twice += a.x * b.y - b.x * a.y;
    }
    0.5 * twice.abs()
}

/// Angle in degrees at `vertex` between the edges towards `a` and `b`.
///
/// Returns `NaN` when either edge has zero length.
pub fn corner_angle_deg(vertex: Point2<f32>, a: Point2<f32>, b: Point2<f32>) -> f32 {
    let u = a - vertex;
    let v = b - vertex;
    let denom = u.norm() * v.norm();
    if denom == 0.0 || !denom.is_finite() {
        return f32::NAN;
    }
    let cos = (u.dot(&v) / denom).clamp(-1.0, 1.0);
    cos.acos().to_degrees()
}

/// Bounding box, centroid, area and corner angles of one detected board.
///
/// All fields are computed once in [`BoardSquare::new`]; the value is
/// immutable afterwards.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct BoardSquare {
    corners: [Point2<f32>; 4],
    min_x: f32,
    max_x: f32,
    min_y: f32,
    max_y: f32,
    midpoint: Point2<f32>,
    area: f32,
    angle_left_top: f32,
    angle_right_top: f32,
    angle_left_bottom: f32,
    angle_right_bottom: f32,
}

impl BoardSquare {
    /// Build from the four extremal corners of a detection.
    pub fn new(
        left_top: Point2<f32>,
        right_top: Point2<f32>,
        left_bottom: Point2<f32>,
        right_bottom: Point2<f32>,
    ) -> Self {
        let corners = [left_top, right_top, left_bottom, right_bottom];

        let (mut min_x, mut max_x) = (f32::INFINITY, f32::NEG_INFINITY);
        let (mut min_y, mut max_y) = (f32::INFINITY, f32::NEG_INFINITY);
        let (mut sx, mut sy) = (0.0f32, 0.0f32);
        for p in &corners {
            min_x = min_x.min(p.x);
            max_x = max_x.max(p.x);
            min_y = min_y.min(p.y);
            max_y = max_y.max(p.y);
            sx += p.x;
            sy += p.y;
        }

        // TL -> TR -> BR -> BL keeps the quad non self-intersecting.
        let area = quad_area(&[left_top, right_top, right_bottom, left_bottom]);

        Self {
            corners,
            min_x,
            max_x,
            min_y,
            max_y,
            midpoint: Point2::new(sx / 4.0, sy / 4.0),
            area,
            angle_left_top: corner_angle_deg(left_top, right_top, left_bottom),
            angle_right_top: corner_angle_deg(right_top, left_top, right_bottom),
            angle_left_bottom: corner_angle_deg(left_bottom, left_top, right_bottom),
            angle_right_bottom: corner_angle_deg(right_bottom, right_top, left_bottom),
        }
    }

    /// Build from a full row-major corner array of a `cols x rows` board.
    pub fn from_grid(
        corners: &[Point2<f32>],
        cols: usize,
        rows: usize,
    ) -> Result<Self, GridIndexError> {
        let [tl, tr, bl, br] = extremal_corner_indices(cols, rows, corners.len())?;
        Ok(Self::new(corners[tl], corners[tr], corners[bl], corners[br]))
    }

    /// Input corners in `[left_top, right_top, left_bottom, right_bottom]` order.
    #[inline]
    pub fn corners(&self) -> &[Point2<f32>; 4] {
        &self.corners
    }

    #[inline]
    pub fn min_x(&self) -> f32 {
        self.min_x
    }

    #[inline]
    pub fn max_x(&self) -> f32 {
        self.max_x
    }

    #[inline]
    pub fn min_y(&self) -> f32 {
        self.min_y
    }

    #[inline]
    pub fn max_y(&self) -> f32 {
        self.max_y
    }

    /// Centroid of the four corners.
    #[inline]
    pub fn midpoint(&self) -> Point2<f32> {
        self.midpoint
    }

    /// Quad area in square pixels.
    #[inline]
    pub fn area(&self) -> f32 {
        self.area
    }

    #[inline]
    pub fn angle_left_top(&self) -> f32 {
        self.angle_left_top
    }

    #[inline]
    pub fn angle_right_top(&self) -> f32 {
        self.angle_right_top
    }

    #[inline]
    pub fn angle_left_bottom(&self) -> f32 {
        self.angle_left_bottom
    }

    #[inline]
    pub fn angle_right_bottom(&self) -> f32 {
        self.angle_right_bottom
    }

    /// Corner angles in `[left_top, right_top, left_bottom, right_bottom]` order.
    pub fn angles(&self) -> [f32; 4] {
        [
            self.angle_left_top,
            self.angle_right_top,
            self.angle_left_bottom,
            self.angle_right_bottom,
        ]
    }

    /// Euclidean distance between the centroids of two boards.
    pub fn distance_to(&self, other: &BoardSquare) -> f32 {
        (self.midpoint - other.midpoint).norm()
    }

    /// True for collapsed quads: non-positive or non-finite area, or any
    /// undefined corner angle.
    pub fn is_degenerate(&self) -> bool {
        !self.area.is_finite()
            || self.area <= 0.0
            || self.angles().iter().any(|a| !a.is_finite())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn rect(x0: f32, y0: f32, x1: f32, y1: f32) -> BoardSquare {
        BoardSquare::new(
            Point2::new(x0, y0),
            Point2::new(x1, y0),
            Point2::new(x0, y1),
            Point2::new(x1, y1),
        )
    }

    #[test]
    fn axis_aligned_rectangle() {
        let b = rect(10.0, 20.0, 110.0, 70.0);
        assert_relative_eq!(b.area(), 5000.0);
        assert_relative_eq!(b.midpoint().x, 60.0);
        assert_relative_eq!(b.midpoint().y, 45.0);
        assert_eq!((b.min_x(), b.max_x()), (10.0, 110.0));
        assert_eq!((b.min_y(), b.max_y()), (20.0, 70.0));
        for a in b.angles() {
            assert_relative_eq!(a, 90.0, epsilon = 1e-3);
        }
        assert!(!b.is_degenerate());
    }

    #[test]
    fn trapezoid_angles_sum_to_full_turn() {
        let b = BoardSquare::new(
            Point2::new(40.0, 0.0),
            Point2::new(60.0, 0.0),
            Point2::new(0.0, 50.0),
            Point2::new(100.0, 50.0),
        );
        let sum: f32 = b.angles().iter().sum();
        assert_relative_eq!(sum, 360.0, epsilon = 1e-2);
        assert!(b.angle_left_bottom() < 90.0);
        assert!(b.angle_left_top() > 90.0);
        assert_relative_eq!(b.area(), 0.5 * (20.0 + 100.0) * 50.0, epsilon = 1e-2);
    }

    #[test]
    fn area_ignores_winding_direction() {
        let pts = [
            Point2::new(0.0, 0.0),
            Point2::new(4.0, 0.0),
            Point2::new(4.0, 3.0),
            Point2::new(0.0, 3.0),
        ];
        let mut rev = pts;
        rev.reverse();
        assert_relative_eq!(quad_area(&pts), 12.0);
        assert_relative_eq!(quad_area(&rev), 12.0);
    }

    #[test]
    fn collapsed_corners_are_degenerate() {
        let p = Point2::new(5.0, 5.0);
        let b = BoardSquare::new(p, p, p, p);
        assert_eq!(b.area(), 0.0);
        assert!(b.angle_left_top().is_nan());
        assert!(b.is_degenerate());

        let line = BoardSquare::new(
            Point2::new(0.0, 0.0),
            Point2::new(10.0, 0.0),
            Point2::new(20.0, 0.0),
            Point2::new(30.0, 0.0),
        );
        assert!(line.is_degenerate());
    }

    #[test]
    fn extremal_indices_for_9x6() {
        assert_eq!(extremal_corner_indices(9, 6, 54), Ok([0, 8, 45, 53]));
        assert_eq!(
            extremal_corner_indices(9, 6, 53),
            Err(GridIndexError::CornerCount {
                expected: 54,
                got: 53
            })
        );
        assert_eq!(
            extremal_corner_indices(1, 6, 6),
            Err(GridIndexError::BoardTooSmall { cols: 1, rows: 6 })
        );
    }

    #[test]
    fn from_grid_picks_extremal_corners() {
        let (cols, rows) = (3usize, 2usize);
        let corners: Vec<Point2<f32>> = (0..rows)
            .flat_map(|j| (0..cols).map(move |i| Point2::new(i as f32 * 10.0, j as f32 * 10.0)))
            .collect();
        let b = BoardSquare::from_grid(&corners, cols, rows).expect("valid grid");
        assert_eq!(
            b.corners(),
            &[
                Point2::new(0.0, 0.0),
                Point2::new(20.0, 0.0),
                Point2::new(0.0, 10.0),
                Point2::new(20.0, 10.0),
            ]
        );
        assert!(BoardSquare::from_grid(&corners[..5], cols, rows).is_err());
    }
}
