use std::path::Path;

use image::{ImageFormat, Rgba, RgbaImage};
use ndarray::Array2;

use crate::contour::Segment;
use crate::error::SourceError;
use crate::image_data::Image;
use crate::palette::Palette;
use crate::render::Raster;

/// Load a raster image file (PNG, TIFF, JPEG, ...) as a grayscale plane.
/// Values are scaled from 16-bit to [0.0, 1.0].
pub fn load_image(path: &Path) -> Result<Image, SourceError> {
    let img = image::open(path)?;
    let gray = img.to_luma16();
    let (w, h) = gray.dimensions();
    let mut data = Array2::<f32>::zeros((h as usize, w as usize));

    for row in 0..h as usize {
        for col in 0..w as usize {
            let pixel = gray.get_pixel(col as u32, row as u32);
            data[[row, col]] = pixel.0[0] as f32 / 65535.0;
        }
    }

    Image::new(data)
}

/// Convert a rendered raster to an 8-bit RGBA image through `palette`,
/// with its contour lines drawn on top.
pub fn raster_to_rgba(raster: &Raster, palette: Palette) -> RgbaImage {
    let (w, h) = (raster.width() as u32, raster.height() as u32);
    let pixels: Vec<u8> = raster.to_rgba(palette).into_iter().flatten().collect();
    let mut img = RgbaImage::from_raw(w, h, pixels).unwrap_or_else(|| RgbaImage::new(w, h));
    if let Some(overlay) = raster.contours() {
        for segment in &overlay.segments {
            draw_segment(&mut img, segment, Rgba(overlay.color));
        }
    }
    img
}

/// One-pixel line from `segment.start` to `segment.end` (screen pixel
/// coordinates, pixel `(x, y)` covering `[x, x+1) x [y, y+1)`). Points
/// outside the image are clipped.
pub fn draw_segment(img: &mut RgbaImage, segment: &Segment, color: Rgba<u8>) {
    let (x0, y0) = segment.start;
    let (x1, y1) = segment.end;
    let (w, h) = (img.width() as f64, img.height() as f64);
    if x0.max(x1) < 0.0 || y0.max(y1) < 0.0 || x0.min(x1) >= w || y0.min(y1) >= h {
        return;
    }
    let steps = (x1 - x0).abs().max((y1 - y0).abs()).ceil().max(1.0);
    if !steps.is_finite() {
        return;
    }
    let n = steps as usize;
    for k in 0..=n {
        let t = k as f64 / steps;
        let x = (x0 + (x1 - x0) * t).floor();
        let y = (y0 + (y1 - y0) * t).floor();
        if (0.0..w).contains(&x) && (0.0..h).contains(&y) {
            img.put_pixel(x as u32, y as u32, color);
        }
    }
}

/// Save a rendered raster as an 8-bit RGBA PNG.
pub fn save_png(raster: &Raster, palette: Palette, path: &Path) -> Result<(), SourceError> {
    raster_to_rgba(raster, palette).save_with_format(path, ImageFormat::Png)?;
    Ok(())
}
