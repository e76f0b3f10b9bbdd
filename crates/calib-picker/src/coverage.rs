//! Per-pixel coverage weights.
//!
//! Every pixel carries a desirability weight. The border band starts higher
//! than the center so that boards near the image edges, which constrain lens
//! distortion the most, are encouraged. Accepting a board spends its footprint:
//! the weights under its bounding box drop to zero and never come back.

use calib_picker_core::BoardSquare;
use serde::Serialize;

/// Half-open pixel rectangle `[x0, x1) x [y0, y1)` clamped to the image.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct Footprint {
    pub x0: usize,
    pub x1: usize,
    pub y0: usize,
    pub y1: usize,
}

impl Footprint {
    /// Bounding box of `board`, truncated to whole pixels and clamped to a
    /// `width x height` image.
    pub fn of_board(board: &BoardSquare, width: usize, height: usize) -> Self {
        // `as usize` saturates negatives and NaN to zero.
        let x0 = (board.min_x() as usize).min(width);
        let y0 = (board.min_y() as usize).min(height);
        let x1 = (board.max_x() as usize).min(width).max(x0);
        let y1 = (board.max_y() as usize).min(height).max(y0);
        Self { x0, x1, y0, y1 }
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.x0 == self.x1 || self.y0 == self.y1
    }

    /// Number of pixels covered.
    #[inline]
    pub fn pixel_count(&self) -> usize {
        (self.x1 - self.x0) * (self.y1 - self.y0)
    }
}

/// Dense row-major grid of coverage weights at image resolution.
#[derive(Clone, Debug)]
pub struct CoverageGrid {
    width: usize,
    height: usize,
    weights: Vec<u8>,
    /// Number of zero-weight pixels.
    spent: usize,
}

impl CoverageGrid {
    /// Build a fresh grid: `margin_weight` everywhere, then `center_weight`
    /// inside the region left after trimming `floor(margin_frac * side)`
    /// pixels from each edge.
    pub fn new(
        width: usize,
        height: usize,
        margin_frac: f32,
        center_weight: u8,
        margin_weight: u8,
    ) -> Self {
        let mut weights = vec![margin_weight; width * height];

        let dh = (margin_frac as f64 * height as f64) as usize;
        let dw = (margin_frac as f64 * width as f64) as usize;
        if height > 2 * dh && width > 2 * dw {
            for row in weights
                .chunks_exact_mut(width)
                .skip(dh)
                .take(height - 2 * dh)
            {
                row[dw..width - dw].fill(center_weight);
            }
        }

        let spent = weights.iter().filter(|&&w| w == 0).count();
        Self {
            width,
            height,
            weights,
            spent,
        }
    }

    #[inline]
    pub fn width(&self) -> usize {
        self.width
    }

    #[inline]
    pub fn height(&self) -> usize {
        self.height
    }

    /// Weight of pixel `(x, y)`, or `None` outside the image.
    pub fn weight_at(&self, x: usize, y: usize) -> Option<u8> {
        if x >= self.width || y >= self.height {
            return None;
        }
        Some(self.weights[y * self.width + x])
    }

    /// Footprint of `board` on this grid.
    #[inline]
    pub fn footprint(&self, board: &BoardSquare) -> Footprint {
        Footprint::of_board(board, self.width, self.height)
    }

    /// Sum of weights inside `fp`.
    pub fn score(&self, fp: Footprint) -> u64 {
        if fp.is_empty() {
            return 0;
        }
        self.weights
            .chunks_exact(self.width)
            .skip(fp.y0)
            .take(fp.y1 - fp.y0)
            .map(|row| row[fp.x0..fp.x1].iter().map(|&w| w as u64).sum::<u64>())
            .sum()
    }

    /// Zero every weight inside `fp`. Costs O(footprint).
    pub fn consume(&mut self, fp: Footprint) {
        if fp.is_empty() {
            return;
        }
        let width = self.width;
        for row in self
            .weights
            .chunks_exact_mut(width)
            .skip(fp.y0)
            .take(fp.y1 - fp.y0)
        {
            let span = &mut row[fp.x0..fp.x1];
            self.spent += span.iter().filter(|&&w| w != 0).count();
            span.fill(0);
        }
    }

    /// Sum of all weights still available.
    pub fn remaining_weight(&self) -> u64 {
        self.weights.iter().map(|&w| w as u64).sum()
    }

    /// Number of pixels whose weight is zero.
    #[inline]
    pub fn spent_pixels(&self) -> usize {
        self.spent
    }

    /// Fraction of pixels whose weight has been spent.
    pub fn covered_fraction(&self) -> f64 {
        if self.weights.is_empty() {
            return 0.0;
        }
        self.spent as f64 / self.weights.len() as f64
    }
}
