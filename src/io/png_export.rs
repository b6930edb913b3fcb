//! Software rasterizer for the export scene.
//!
//! Shapes are filled by sampling pixel centres. Text is laid out with
//! `fontdue` using egui's bundled proportional font.

use std::io::Cursor;

use fontdue::layout::{CoordinateSystem, Layout, LayoutSettings};
use fontdue::{Font, FontSettings};
use image::{ImageFormat, Rgba, RgbaImage};
use log::debug;

use super::canvas::{build_scene, Paint, Scene, Shape, TextAnchor, TextStyle};
use super::{ExportContext, ExportError};
use crate::model::Plan;

/// PNG bytes of the same scene the SVG export writes.
pub fn build_png(plan: &Plan, ctx: &ExportContext) -> Result<Vec<u8>, ExportError> {
    let image = rasterize(&build_scene(plan, ctx))?;
    let mut bytes = Cursor::new(Vec::new());
    image.write_to(&mut bytes, ImageFormat::Png)?;
    Ok(bytes.into_inner())
}

pub fn rasterize(scene: &Scene) -> Result<RgbaImage, ExportError> {
    let width = scene.width.ceil().max(0.0) as u32;
    let height = scene.height.ceil().max(0.0) as u32;
    if width == 0 || height == 0 {
        return Err(ExportError::EmptyCanvas { width, height });
    }
    debug!("rasterizing {} shapes into {width}x{height}", scene.shapes.len());

    let font = load_export_font()?;
    let [r, g, b] = scene.background.to_array();
    let mut image = RgbaImage::from_pixel(width, height, Rgba([r, g, b, 255]));
    for shape in &scene.shapes {
        draw_shape(&mut image, &font, shape);
    }
    Ok(image)
}

/// The first proportional face egui ships with.
fn load_export_font() -> Result<Font, ExportError> {
    let definitions = egui::FontDefinitions::default();
    let data = definitions
        .families
        .get(&egui::FontFamily::Proportional)
        .and_then(|names| names.first())
        .and_then(|name| definitions.font_data.get(name))
        .ok_or(ExportError::Font("no proportional font bundled"))?;
    let settings = FontSettings {
        collection_index: data.index,
        ..FontSettings::default()
    };
    Font::from_bytes(data.font.as_ref(), settings).map_err(ExportError::Font)
}

fn draw_shape(image: &mut RgbaImage, font: &Font, shape: &Shape) {
    match shape {
        Shape::Rect {
            x,
            y,
            width,
            height,
            radius,
            fill,
        } => draw_rect_filled(image, *x, *y, *width, *height, *radius, *fill),
        Shape::Circle { cx, cy, r, fill } => {
            fill_where(image, (cx - r, cy - r, cx + r, cy + r), *fill, |px, py| {
                (px - cx).powi(2) + (py - cy).powi(2) <= r * r
            })
        }
        Shape::Polygon { points, fill } => draw_polygon(image, points, *fill),
        Shape::Line { from, to, stroke } => draw_line(image, *from, *to, *stroke),
        Shape::Text {
            x,
            y,
            style,
            anchor,
            text,
        } => draw_text(image, font, text, *style, *anchor, (*x, *y)),
    }
}

fn text_layout(font: &Font, text: &str, size: f32, x: f32, top: f32) -> Layout {
    let mut layout = Layout::new(CoordinateSystem::PositiveYDown);
    layout.reset(&LayoutSettings {
        x,
        y: top,
        ..LayoutSettings::default()
    });
    layout.append(&[font], &fontdue::layout::TextStyle::new(text, size, 0));
    layout
}

/// Draws `text` with its baseline at `y`.
fn draw_text(
    image: &mut RgbaImage,
    font: &Font,
    text: &str,
    style: TextStyle,
    anchor: TextAnchor,
    (x, y): (f32, f32),
) {
    let size = style.font_size();
    let ascent = font
        .horizontal_line_metrics(size)
        .map_or(size * 0.8, |metrics| metrics.ascent);
    let mut layout = text_layout(font, text, size, x, y - ascent);
    if anchor == TextAnchor::Middle {
        let width = layout
            .glyphs()
            .iter()
            .map(|glyph| glyph.x + glyph.width as f32 - x)
            .fold(0.0_f32, f32::max);
        layout = text_layout(font, text, size, x - width / 2.0, y - ascent);
    }

    let color = style.color();
    for glyph in layout.glyphs() {
        if glyph.width == 0 || glyph.height == 0 {
            continue;
        }
        let (metrics, coverage) = font.rasterize_indexed(glyph.key.glyph_index, glyph.key.px);
        let (left, top) = (glyph.x.floor() as i64, glyph.y.floor() as i64);
        for (i, &alpha) in coverage.iter().enumerate() {
            if alpha == 0 {
                continue;
            }
            let (col, row) = ((i % metrics.width) as i64, (i / metrics.width) as i64);
            blend_pixel(image, left + col, top + row, Paint::new(color, f32::from(alpha) / 255.0));
        }
    }
}

fn draw_rect_filled(image: &mut RgbaImage, x: f32, y: f32, width: f32, height: f32, radius: f32, fill: Paint) {
    let radius = radius.min(width / 2.0).min(height / 2.0).max(0.0);
    let (right, bottom) = (x + width, y + height);
    fill_where(image, (x, y, right, bottom), fill, |px, py| {
        if px < x || px >= right || py < y || py >= bottom {
            return false;
        }
        if radius <= 0.0 {
            return true;
        }
        // inside the rounded corners
        let cx = px.clamp(x + radius, right - radius);
        let cy = py.clamp(y + radius, bottom - radius);
        (px - cx).powi(2) + (py - cy).powi(2) <= radius * radius
    });
}

fn draw_polygon(image: &mut RgbaImage, points: &[(f32, f32)], fill: Paint) {
    if points.len() < 3 {
        return;
    }
    let bounds = points.iter().fold(
        (f32::MAX, f32::MAX, f32::MIN, f32::MIN),
        |(x0, y0, x1, y1), &(x, y)| (x0.min(x), y0.min(y), x1.max(x), y1.max(y)),
    );
    fill_where(image, bounds, fill, |px, py| contains(points, px, py));
}

/// Even-odd point-in-polygon test.
fn contains(points: &[(f32, f32)], px: f32, py: f32) -> bool {
    let mut inside = false;
    let mut j = points.len() - 1;
    for i in 0..points.len() {
        let (xi, yi) = points[i];
        let (xj, yj) = points[j];
        if (yi > py) != (yj > py) && px < (xj - xi) * (py - yi) / (yj - yi) + xi {
            inside = !inside;
        }
        j = i;
    }
    inside
}

/// One-pixel Bresenham line.
fn draw_line(image: &mut RgbaImage, from: (f32, f32), to: (f32, f32), stroke: Paint) {
    let (mut x0, mut y0) = (from.0.floor() as i64, from.1.floor() as i64);
    let (x1, y1) = (to.0.floor() as i64, to.1.floor() as i64);
    let dx = (x1 - x0).abs();
    let dy = -(y1 - y0).abs();
    let sx = if x0 < x1 { 1 } else { -1 };
    let sy = if y0 < y1 { 1 } else { -1 };
    let mut err = dx + dy;
    loop {
        blend_pixel(image, x0, y0, stroke);
        if x0 == x1 && y0 == y1 {
            break;
        }
        let e2 = 2 * err;
        if e2 >= dy {
            err += dy;
            x0 += sx;
        }
        if e2 <= dx {
            err += dx;
            y0 += sy;
        }
    }
}

/// Blend `fill` into every pixel of `bounds` whose centre passes `inside`.
fn fill_where(
    image: &mut RgbaImage,
    (x0, y0, x1, y1): (f32, f32, f32, f32),
    fill: Paint,
    inside: impl Fn(f32, f32) -> bool,
) {
    let (width, height) = image.dimensions();
    let clip = |v: f32, max: u32| (v.max(0.0) as u32).min(max);
    let (min_x, max_x) = (clip(x0.floor(), width), clip(x1.ceil(), width));
    let (min_y, max_y) = (clip(y0.floor(), height), clip(y1.ceil(), height));
    for py in min_y..max_y {
        for px in min_x..max_x {
            if inside(px as f32 + 0.5, py as f32 + 0.5) {
                blend_pixel(image, i64::from(px), i64::from(py), fill);
            }
        }
    }
}

fn blend_pixel(image: &mut RgbaImage, x: i64, y: i64, paint: Paint) {
    let (width, height) = image.dimensions();
    if x < 0 || y < 0 || x >= i64::from(width) || y >= i64::from(height) {
        return;
    }
    let alpha = paint.opacity.clamp(0.0, 1.0);
    let inv = 1.0 - alpha;
    let pixel = image.get_pixel_mut(x as u32, y as u32);
    let src = paint.color.to_array();
    for (channel, value) in pixel.0.iter_mut().take(3).zip(src) {
        *channel = (f32::from(value) * alpha + f32::from(*channel) * inv).round() as u8;
    }
    pixel.0[3] = 255;
}
