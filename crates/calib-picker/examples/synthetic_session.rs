//! Drive a picker with a synthetic capture loop.
//!
//! Usage: `synthetic_session [config.json]`. Without a config the session
//! uses a 640x480 camera and a 9x6 board. Set `CALIB_PICKER_LOG=debug` to see
//! every verdict.

use calib_picker::{AutoImagePicker, PickerConfig, Verdict};
use nalgebra::Point2;

#[cfg(not(feature = "tracing"))]
use calib_picker_core::init_from_env;
#[cfg(feature = "tracing")]
use calib_picker_core::init_tracing;

#[cfg(not(feature = "tracing"))]
use log::{info, warn, LevelFilter};
#[cfg(feature = "tracing")]
use tracing::{info, warn};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    #[cfg(not(feature = "tracing"))]
    init_from_env(LevelFilter::Info)?;
    #[cfg(feature = "tracing")]
    init_tracing(false);

    let cfg = match std::env::args().nth(1) {
        Some(path) => PickerConfig::load_json(path)?,
        None => PickerConfig {
            image_width: 640,
            image_height: 480,
            board_cols: 9,
            board_rows: 6,
            params: None,
        },
    };
    let mut picker = cfg.build_picker()?;

    let mut frame = 0usize;
    let mut rejected = 0usize;
    while !picker.status() && frame < 2000 {
        let corners = synthetic_frame(&picker, frame);
        match picker.evaluate(&corners)? {
            Verdict::Accepted(_) => {}
            Verdict::Rejected(_) => rejected += 1,
        }
        frame += 1;
    }

    if picker.status() {
        info!(
            "session complete after {frame} frames: {} kept, {rejected} rejected, {:.1}% of the image covered",
            picker.sample_count(),
            100.0 * picker.coverage().covered_fraction()
        );
    } else {
        warn!(
            "gave up after {frame} frames with {} samples",
            picker.sample_count()
        );
    }
    Ok(())
}

/// A board drifting over the image on a Lissajous path while its
/// perspective keystone and scale oscillate.
fn synthetic_frame(picker: &AutoImagePicker, frame: usize) -> Vec<Point2<f32>> {
    let (width, height) = picker.image_size();
    let (cols, rows) = picker.board_size();
    let (w, h) = (width as f32, height as f32);

    let t = frame as f32 * 0.21;
    let cx = w * (0.5 + 0.38 * (1.3 * t).sin());
    let cy = h * (0.5 + 0.36 * (0.7 * t).cos());
    let scale = 0.3 + 0.08 * (0.5 * t).sin();
    let (bw, bh) = (scale * w, scale * h);
    let k = 0.15 * bw * (0.9 * t).sin();

    let tl = Point2::new(cx - bw / 2.0 + k.max(0.0), cy - bh / 2.0);
    let tr = Point2::new(cx + bw / 2.0 - k.max(0.0), cy - bh / 2.0);
    let bl = Point2::new(cx - bw / 2.0 - k.min(0.0), cy + bh / 2.0);
    let br = Point2::new(cx + bw / 2.0 + k.min(0.0), cy + bh / 2.0);

    let mut corners = Vec::with_capacity(cols * rows);
    for j in 0..rows {
        let v = j as f32 / (rows - 1) as f32;
        let left = tl + (bl - tl) * v;
        let right = tr + (br - tr) * v;
        for i in 0..cols {
            let u = i as f32 / (cols - 1) as f32;
            corners.push(left + (right - left) * u);
        }
    }
    corners
}
