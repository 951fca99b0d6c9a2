use std::path::Path;
use std::sync::Arc;

use anyhow::Context as _;

use crate::foundation::error::{ClipError, ClipResult};
use crate::foundation::math::premultiply_rgba8_in_place;

#[derive(Clone, Debug)]
/// Prepared raster image in premultiplied RGBA8 form.
pub struct PreparedImage {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
    /// Pixel bytes in row-major premultiplied RGBA8.
    pub rgba8_premul: Arc<Vec<u8>>,
}

/// Decode an encoded raster image into premultiplied RGBA8.
pub fn decode_image(bytes: &[u8]) -> ClipResult<PreparedImage> {
    let dyn_img = image::load_from_memory(bytes).context("decode image from memory")?;
    Ok(prepare_rgba(dyn_img.to_rgba8()))
}

/// Read an image file, scale it uniformly by `scale_factor` and premultiply it.
///
/// Scaling is anchored on the width: the new width is `floor(width * scale_factor)` and the
/// height follows from the aspect ratio.
pub fn load_scaled_image(path: &Path, scale_factor: f64) -> ClipResult<PreparedImage> {
    let bytes = std::fs::read(path).map_err(|e| ClipError::missing_asset(path, e))?;
    let dyn_img = image::load_from_memory(&bytes)
        .with_context(|| format!("decode image '{}'", path.display()))?;
    let (w0, h0) = (dyn_img.width(), dyn_img.height());
    let (w, h) = scaled_size(w0, h0, scale_factor)?;

    let rgba = if (w, h) == (w0, h0) {
        dyn_img.to_rgba8()
    } else {
        image::imageops::resize(
            &dyn_img.to_rgba8(),
            w,
            h,
            image::imageops::FilterType::Lanczos3,
        )
    };
    tracing::info!(
        path = %path.display(),
        original = %format!("{w0}x{h0}"),
        scaled = %format!("{w}x{h}"),
        scale_factor,
        "loaded background image"
    );
    Ok(prepare_rgba(rgba))
}

/// Compute the width-anchored scaled size of a `width`x`height` image.
pub fn scaled_size(width: u32, height: u32, scale_factor: f64) -> ClipResult<(u32, u32)> {
    if width == 0 || height == 0 {
        return Err(ClipError::validation("image has zero width or height"));
    }
    if !scale_factor.is_finite() || scale_factor <= 0.0 {
        return Err(ClipError::validation("scale factor must be finite and > 0"));
    }
    let w = ((f64::from(width) * scale_factor).floor() as u32).max(1);
    let h = ((f64::from(height) * f64::from(w) / f64::from(width)).floor() as u32).max(1);
    Ok((w, h))
}

fn prepare_rgba(rgba: image::RgbaImage) -> PreparedImage {
    let (width, height) = rgba.dimensions();
    let mut rgba8_premul = rgba.into_raw();
    premultiply_rgba8_in_place(&mut rgba8_premul);
    PreparedImage {
        width,
        height,
        rgba8_premul: Arc::new(rgba8_premul),
    }
}
