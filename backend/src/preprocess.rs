//! Turns encoded image bytes into the model's input batch.
//!
//! The steps mirror the training-time pipeline: RGB pixels as floats,
//! bilinear stretch to 128x128 (aspect ratio is not kept), scale into
//! `[0, 1]`, then a leading batch axis.

use crate::error::PredictionError;
use image::RgbImage;
use ndarray::{Array3, Array4, ArrayView3, Axis};

/// Model input height and width.
pub const IMAGE_SIZE: (usize, usize) = (128, 128);
pub const CHANNELS: usize = 3;
pub const RESCALE_FACTOR: f32 = 1.0 / 255.0;

pub fn decode_rgb(bytes: &[u8]) -> Result<RgbImage, PredictionError> {
    Ok(image::load_from_memory(bytes)?.to_rgb8())
}

/// `(height, width, 3)` array with raw channel values in `[0, 255]`.
pub fn image_to_array(image: &RgbImage) -> Result<Array3<f32>, PredictionError> {
    let (width, height) = image.dimensions();
    let data = image.as_raw().iter().map(|&v| v as f32).collect();
    Ok(Array3::from_shape_vec(
        (height as usize, width as usize, CHANNELS),
        data,
    )?)
}

/// Bilinear resize with half-pixel centers and no antialiasing.
pub fn resize_bilinear(
    input: ArrayView3<f32>,
    out_height: usize,
    out_width: usize,
) -> Result<Array3<f32>, PredictionError> {
    let (in_height, in_width, channels) = input.dim();
    if in_height == 0 || in_width == 0 {
        return Err(PredictionError::Shape(format!(
            "cannot resize an empty {}x{} image",
            in_width, in_height
        )));
    }

    let rows = interpolation_taps(in_height, out_height);
    let cols = interpolation_taps(in_width, out_width);

    let mut output = Array3::<f32>::zeros((out_height, out_width, channels));
    for (y, &(top, bottom, dy)) in rows.iter().enumerate() {
        for (x, &(left, right, dx)) in cols.iter().enumerate() {
            for c in 0..channels {
                let top_left = input[[top, left, c]];
                let top_right = input[[top, right, c]];
                let bottom_left = input[[bottom, left, c]];
                let bottom_right = input[[bottom, right, c]];

                let upper = top_left + (top_right - top_left) * dx;
                let lower = bottom_left + (bottom_right - bottom_left) * dx;
                output[[y, x, c]] = upper + (lower - upper) * dy;
            }
        }
    }
    Ok(output)
}

/// For every output index: (lower source index, upper source index, weight of upper).
fn interpolation_taps(in_size: usize, out_size: usize) -> Vec<(usize, usize, f32)> {
    let scale = in_size as f32 / out_size as f32;
    let last = in_size - 1;
    (0..out_size)
        .map(|i| {
            let source = (i as f32 + 0.5) * scale - 0.5;
            let floor = source.floor();
            let lower = (floor.max(0.0) as usize).min(last);
            let upper = (source.ceil().max(0.0) as usize).min(last);
            (lower, upper, source - floor)
        })
        .collect()
}

/// Full pipeline: decode, resize, rescale, batch. Output shape is `(1, 128, 128, 3)`.
pub fn prepare_batch(bytes: &[u8]) -> Result<Array4<f32>, PredictionError> {
    let image = decode_rgb(bytes)?;
    let pixels = image_to_array(&image)?;
    let resized = resize_bilinear(pixels.view(), IMAGE_SIZE.0, IMAGE_SIZE.1)?;
    let normalized = resized.mapv(|v| v * RESCALE_FACTOR);
    Ok(normalized.insert_axis(Axis(0)))
}
