use crate::api::{KMeans, KMeansConfig};
use crate::error::{Error, Result};
use image::{DynamicImage, GrayImage, RgbImage};
use log::{error, info};
use ndarray::Array2;
use std::path::Path;

/// Pixel geometry needed to rebuild an image from a flattened point table.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PixelShape {
    pub height: usize,
    pub width: usize,
    pub channels: usize,
}

impl PixelShape {
    pub fn n_pixels(&self) -> usize {
        self.height * self.width
    }
}

/// Decodes an image into a (height·width) × channels point table.
///
/// 8-bit grayscale images keep a single channel; every other format is
/// converted to RGB (3 channels). Channel values are widened to `f32` in the
/// 0–255 range.
pub fn load_image_points(path: impl AsRef<Path>) -> Result<(Array2<f32>, PixelShape)> {
    let img = image::open(path.as_ref())?;

    let (raw, width, height, channels) = match img {
        DynamicImage::ImageLuma8(gray) => {
            let (w, h) = gray.dimensions();
            (gray.into_raw(), w, h, 1)
        }
        other => {
            let rgb = other.to_rgb8();
            let (w, h) = rgb.dimensions();
            (rgb.into_raw(), w, h, 3)
        }
    };

    let shape = PixelShape {
        height: height as usize,
        width: width as usize,
        channels,
    };
    let values: Vec<f32> = raw.into_iter().map(|v| v as f32).collect();
    let points = Array2::from_shape_vec((shape.n_pixels(), channels), values)
        .map_err(|e| Error::InvalidInput(format!("pixel buffer shape mismatch: {e}")))?;

    Ok((points, shape))
}

/// Quantizes the colors of `input` down to `n_clusters` and writes the result
/// to `output`.
///
/// Each pixel is replaced by the center color of its cluster. Returns
/// `Ok(true)` when the output file was written and `Ok(false)` when the write
/// failed (the failure is logged, not propagated). Validation and decode
/// errors propagate as `Err`.
pub fn quantize_image(
    input: impl AsRef<Path>,
    output: impl AsRef<Path>,
    n_clusters: usize,
    max_iterations: usize,
) -> Result<bool> {
    let (points, shape) = load_image_points(&input)?;

    let config = KMeansConfig::new()
        .with_n_clusters(n_clusters as f64)?
        .with_max_iterations(max_iterations as f64)?;
    let mut engine = KMeans::new(config);
    engine.fit(&points, None)?;

    info!(
        "quantized {} pixels into {} colors in {} iterations (converged: {})",
        shape.n_pixels(),
        n_clusters,
        engine.iterations().unwrap_or(0),
        engine.converged().unwrap_or(false),
    );

    let centers = engine.centers().expect("fit succeeded");
    let assignments = engine.assignments().expect("fit succeeded");

    let mut quantized = Array2::<f32>::zeros(points.raw_dim());
    for (cluster, members) in assignments.iter().enumerate() {
        let center = centers.row(cluster);
        for &row in members {
            quantized.row_mut(row).assign(&center);
        }
    }

    Ok(save_image(output, &quantized, shape))
}

/// Writes a flattened pixel table back to an image file.
///
/// Channel values are rounded and clamped to 0–255 before the `u8` narrowing.
/// A write failure is logged and reported through the `false` return value
/// rather than aborting the caller.
pub fn save_image(path: impl AsRef<Path>, pixels: &Array2<f32>, shape: PixelShape) -> bool {
    match write_image(path.as_ref(), pixels, shape) {
        Ok(()) => true,
        Err(e) => {
            error!("error saving image {}: {e}", path.as_ref().display());
            false
        }
    }
}

fn write_image(path: &Path, pixels: &Array2<f32>, shape: PixelShape) -> Result<()> {
    if pixels.nrows() != shape.n_pixels() || pixels.ncols() != shape.channels {
        return Err(Error::InvalidInput(format!(
            "pixel table is {}x{}, expected {}x{}",
            pixels.nrows(),
            pixels.ncols(),
            shape.n_pixels(),
            shape.channels
        )));
    }

    let bytes: Vec<u8> = pixels
        .iter()
        .map(|&v| v.round().clamp(0.0, 255.0) as u8)
        .collect();
    let width = shape.width as u32;
    let height = shape.height as u32;

    match shape.channels {
        1 => {
            let img = GrayImage::from_raw(width, height, bytes)
                .ok_or_else(|| Error::InvalidInput("pixel buffer too small for image".into()))?;
            img.save(path)?;
        }
        3 => {
            let img = RgbImage::from_raw(width, height, bytes)
                .ok_or_else(|| Error::InvalidInput("pixel buffer too small for image".into()))?;
            img.save(path)?;
        }
        c => {
            return Err(Error::InvalidInput(format!(
                "unsupported channel count {c} (expected 1 or 3)"
            )));
        }
    }

    Ok(())
}
