mod font;

pub use font::{OverlayFont, resolve_overlay_font};

use anyhow::{Context, Result, anyhow};
use image::RgbaImage;
use resvg::render;
use std::sync::Arc;
use tiny_skia::Pixmap;
use usvg::{Options, Tree, fontdb};

use crate::ocr::{RegionMode, TranslatedRegion};

/// Distance from the box edges at which overlay text starts.
pub const TEXT_INSET: u32 = 10;
pub const DEFAULT_FONT_SIZE: f32 = 16.0;

#[derive(Debug, Clone)]
pub struct RedrawStyle {
    pub text_color: String,
    pub fill_color: String,
    pub stroke_color: String,
    pub font_size: f32,
}

impl Default for RedrawStyle {
    fn default() -> Self {
        Self {
            text_color: "#000000".to_string(),
            fill_color: "#ffffff".to_string(),
            stroke_color: "#000000".to_string(),
            font_size: DEFAULT_FONT_SIZE,
        }
    }
}

/// Erase each region and draw its replacement text, mutating the page in
/// place.
///
/// Every region gets an opaque fill over its exact bounding box and the
/// translated text left-aligned at the box's top-left with a fixed inset. In
/// whole-page mode the single band additionally gets a border stroke. Text
/// that overflows its box is drawn as-is; there is no wrapping or clipping.
pub fn redraw(
    page: &mut RgbaImage,
    regions: &[TranslatedRegion],
    mode: RegionMode,
    style: &RedrawStyle,
    font: &OverlayFont,
) -> Result<()> {
    if regions.is_empty() {
        return Ok(());
    }
    let svg = overlay_svg(page.width(), page.height(), regions, mode, style, font.family());
    let overlay = rasterize(&svg, page.width(), page.height(), font.data())?;
    blit(page, &overlay);
    Ok(())
}

fn overlay_svg(
    width: u32,
    height: u32,
    regions: &[TranslatedRegion],
    mode: RegionMode,
    style: &RedrawStyle,
    font_family: Option<&str>,
) -> String {
    let mut svg = String::new();
    svg.push_str(&format!(
        r#"<svg xmlns="http://www.w3.org/2000/svg" width="{w}" height="{h}" viewBox="0 0 {w} {h}">"#,
        w = width,
        h = height
    ));

    let font_size = style.font_size;
    let line_height = font_size * 1.2;

    for translated in regions {
        let region = &translated.region;
        match mode {
            RegionMode::WholePage => {
                svg.push_str(&format!(
                    r#"<rect x="{x}" y="{y}" width="{w}" height="{h}" fill="{fill}" stroke="{stroke}" stroke-width="2"/>"#,
                    x = region.x,
                    y = region.y,
                    w = region.width,
                    h = region.height,
                    fill = &style.fill_color,
                    stroke = &style.stroke_color
                ));
            }
            RegionMode::PerRegion => {
                svg.push_str(&format!(
                    r#"<rect x="{x}" y="{y}" width="{w}" height="{h}" fill="{fill}"/>"#,
                    x = region.x,
                    y = region.y,
                    w = region.width,
                    h = region.height,
                    fill = &style.fill_color
                ));
            }
        }

        let text_x = region.x + TEXT_INSET;
        let text_y = (region.y + TEXT_INSET) as f32 + font_size;
        if let Some(family) = font_family {
            svg.push_str(&format!(
                r#"<text x="{x}" y="{y}" font-size="{size}" fill="{color}" font-family="{family}">"#,
                x = text_x,
                y = text_y,
                size = font_size,
                color = &style.text_color,
                family = escape_xml(family)
            ));
        } else {
            svg.push_str(&format!(
                r#"<text x="{x}" y="{y}" font-size="{size}" fill="{color}">"#,
                x = text_x,
                y = text_y,
                size = font_size,
                color = &style.text_color
            ));
        }
        for (idx, line) in translated.translated_text.lines().enumerate() {
            let escaped = escape_xml(line);
            if idx == 0 {
                svg.push_str(&escaped);
            } else {
                svg.push_str(&format!(
                    r#"<tspan x="{x}" dy="{dy}">{text}</tspan>"#,
                    x = text_x,
                    dy = line_height,
                    text = escaped
                ));
            }
        }
        svg.push_str("</text>");
    }

    svg.push_str("</svg>");
    svg
}

fn rasterize(svg: &str, width: u32, height: u32, font_data: Option<&[u8]>) -> Result<Pixmap> {
    let mut db = fontdb::Database::new();
    db.load_system_fonts();
    if let Some(data) = font_data {
        db.load_font_data(data.to_vec());
    }
    let options = Options {
        fontdb: Arc::new(db),
        ..Options::default()
    };
    let tree = Tree::from_str(svg, &options).with_context(|| "failed to parse overlay SVG")?;
    let mut pixmap = Pixmap::new(width, height).ok_or_else(|| anyhow!("empty overlay canvas"))?;
    let mut pixmap_mut = pixmap.as_mut();
    render(&tree, tiny_skia::Transform::identity(), &mut pixmap_mut);
    Ok(pixmap)
}

fn blit(page: &mut RgbaImage, overlay: &Pixmap) {
    let width = page.width().min(overlay.width());
    let height = page.height().min(overlay.height());
    let pixels = overlay.pixels();
    for y in 0..height {
        for x in 0..width {
            let src = pixels[(y * overlay.width() + x) as usize].demultiply();
            let alpha = src.alpha() as u32;
            if alpha == 0 {
                continue;
            }
            let dst = page.get_pixel_mut(x, y);
            let inv = 255 - alpha;
            dst[0] = ((src.red() as u32 * alpha + dst[0] as u32 * inv) / 255) as u8;
            dst[1] = ((src.green() as u32 * alpha + dst[1] as u32 * inv) / 255) as u8;
            dst[2] = ((src.blue() as u32 * alpha + dst[2] as u32 * inv) / 255) as u8;
            dst[3] = (alpha + dst[3] as u32 * inv / 255) as u8;
        }
    }
}

fn escape_xml(value: &str) -> String {
    value
        .replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&apos;")
}
