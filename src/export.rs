// src/export.rs

use std::io::Cursor;

use image::codecs::png::PngEncoder;
use image::{ExtendedColorType, ImageEncoder, Rgba, RgbaImage};

use crate::color::HexColor;
use crate::config::ExportConfig;
use crate::error::ExportError;
use crate::geometry::{BoundingBox, PolygonShape};

fn framing(shape: &PolygonShape, padding: f64) -> Result<BoundingBox, ExportError> {
    if shape.len() < 3 {
        return Err(ExportError::DegenerateShape);
    }
    shape
        .bounding_box()
        .map(|bbox| bbox.padded(padding))
        .ok_or(ExportError::DegenerateShape)
}

/// Standalone SVG document framing the shape's bounding box plus `padding`.
/// The background is left transparent.
pub fn render_svg(shape: &PolygonShape, fill: HexColor, padding: f64) -> Result<String, ExportError> {
    let frame = framing(shape, padding)?;
    let (w, h) = (frame.width(), frame.height());
    Ok(format!(
        concat!(
            r#"<svg xmlns="http://www.w3.org/2000/svg" width="{w}" height="{h}" viewBox="{x} {y} {w} {h}">"#,
            r#"<polygon points="{points}" fill="{fill}"/>"#,
            "</svg>\n"
        ),
        w = w,
        h = h,
        x = frame.min.x,
        y = frame.min.y,
        points = shape.svg_points(),
        fill = fill,
    ))
}

/// Rasterizes the same framing as [`render_svg`] at `config.png_scale` pixels
/// per canvas unit and encodes it as PNG.
pub fn render_png(shape: &PolygonShape, fill: HexColor, config: &ExportConfig) -> Result<Vec<u8>, ExportError> {
    let image = rasterize(shape, fill, config)?;
    let mut bytes = Vec::new();
    PngEncoder::new(Cursor::new(&mut bytes))
        .write_image(image.as_raw(), image.width(), image.height(), ExtendedColorType::Rgba8)
        .map_err(|err| ExportError::Encode(err.to_string()))?;
    log::info!("encoded {}x{} PNG ({} bytes)", image.width(), image.height(), bytes.len());
    Ok(bytes)
}

/// Non-zero winding scanline fill with `supersample`^2 coverage samples per
/// pixel. Uncovered pixels are fully transparent.
pub fn rasterize(shape: &PolygonShape, fill: HexColor, config: &ExportConfig) -> Result<RgbaImage, ExportError> {
    let frame = framing(shape, config.padding)?;
    let scale = config.png_scale;
    let width = (frame.width() * scale).ceil() as u32;
    let height = (frame.height() * scale).ceil() as u32;
    if width == 0 || height == 0 || width > config.max_png_side || height > config.max_png_side {
        return Err(ExportError::Dimensions { width, height });
    }

    let ss = config.supersample.max(1) as usize;
    let sub_width = width as usize * ss;
    let full = (ss * ss) as u32;
    let mut coverage = vec![0u32; width as usize * height as usize];
    let mut crossings: Vec<(f64, i32)> = Vec::with_capacity(shape.len());
    let points = shape.points();

    for sub_row in 0..height as usize * ss {
        // Sample centre of this sub-row, back in canvas units.
        let y = frame.min.y + (sub_row as f64 + 0.5) / (ss as f64 * scale);

        crossings.clear();
        for (i, a) in points.iter().enumerate() {
            let b = &points[(i + 1) % points.len()];
            if (a.y <= y) == (b.y <= y) {
                continue;
            }
            let t = (y - a.y) / (b.y - a.y);
            let winding = if b.y > a.y { 1 } else { -1 };
            crossings.push((a.x + t * (b.x - a.x), winding));
        }
        crossings.sort_by(|l, r| l.0.total_cmp(&r.0));

        let pixel_row = (sub_row / ss) * width as usize;
        let mut winding = 0;
        for pair in crossings.windows(2) {
            winding += pair[0].1;
            if winding == 0 {
                continue;
            }
            // Sub-columns whose centres fall in [x0, x1).
            let to_sub = |x: f64| (x - frame.min.x) * scale * ss as f64 - 0.5;
            let first = to_sub(pair[0].0).ceil().max(0.0) as usize;
            let end = (to_sub(pair[1].0).ceil().max(0.0) as usize).min(sub_width);
            for sub_col in first..end {
                coverage[pixel_row + sub_col / ss] += 1;
            }
        }
    }

    let mut image = RgbaImage::new(width, height);
    for (pixel, &hits) in image.pixels_mut().zip(coverage.iter()) {
        if hits > 0 {
            let alpha = (hits * 255 + full / 2) / full;
            *pixel = Rgba([fill.r, fill.g, fill.b, alpha as u8]);
        }
    }
    Ok(image)
}
