use std::{
    path::Path,
    sync::{Arc, OnceLock},
};

use image::{DynamicImage, RgbImage, RgbaImage, imageops::FilterType};

use crate::{
    foundation::error::{SlipError, SlipResult},
    receipt::svg::{LogoBox, ReceiptLayout},
};

/// Largest raster edge we are willing to allocate.
pub const MAX_RASTER_DIM: u32 = 16_384;

/// Rasterize a laid-out receipt onto an opaque white page at `scale` pixels per unit.
///
/// Pages too tall for `scale` are rendered at the largest scale that fits (see [`fit_scale`]).
/// When `logo` is given it is fitted into the layout's logo box. A logo that cannot be read is
/// logged and left out; it never fails the receipt.
#[tracing::instrument(skip(layout, logo), fields(w = layout.width, h = layout.height))]
pub fn rasterize_receipt(
    layout: &ReceiptLayout,
    scale: f32,
    logo: Option<&Path>,
) -> SlipResult<RgbImage> {
    let scale = fit_scale(layout.width, layout.height, scale)?;
    let (width, height) = raster_size(layout.width, layout.height, scale)?;

    let opts = usvg::Options {
        fontdb: shared_fontdb(),
        font_resolver: make_font_resolver(),
        ..Default::default()
    };
    let tree = usvg::Tree::from_str(&layout.svg, &opts)
        .map_err(|e| SlipError::render(format!("parse receipt svg: {e}")))?;

    let mut pixmap = resvg::tiny_skia::Pixmap::new(width, height)
        .ok_or_else(|| SlipError::render("failed to allocate receipt pixmap"))?;
    pixmap.fill(resvg::tiny_skia::Color::WHITE);
    let xform = resvg::tiny_skia::Transform::from_scale(scale, scale);
    resvg::render(&tree, xform, &mut pixmap.as_mut());

    // The page is opaque, so premultiplied and straight RGBA coincide.
    let mut page = RgbaImage::from_raw(width, height, pixmap.take())
        .ok_or_else(|| SlipError::render("pixmap size mismatch"))?;

    if let Some(path) = logo {
        match load_logo(path, layout.logo_box, scale) {
            Ok((img, x, y)) => image::imageops::overlay(&mut page, &img, x, y),
            Err(e) => tracing::warn!(path = %path.display(), error = %e, "skipping receipt logo"),
        }
    }

    Ok(DynamicImage::ImageRgba8(page).to_rgb8())
}

/// Pixel size of a `width x height` page rendered at `scale`.
pub fn raster_size(width: u32, height: u32, scale: f32) -> SlipResult<(u32, u32)> {
    if !scale.is_finite() || scale <= 0.0 {
        return Err(SlipError::render(format!("invalid raster scale {scale}")));
    }
    let w = ((width as f32) * scale).ceil().max(1.0) as u32;
    let h = ((height as f32) * scale).ceil().max(1.0) as u32;
    if w > MAX_RASTER_DIM || h > MAX_RASTER_DIM {
        return Err(SlipError::render(format!(
            "receipt raster too large: {w}x{h} (max {MAX_RASTER_DIM}x{MAX_RASTER_DIM})"
        )));
    }
    Ok((w, h))
}

/// The scale actually used for a `width x height` page.
///
/// `requested` is kept when the raster fits within [`MAX_RASTER_DIM`]. Otherwise it drops to the
/// largest scale that fits, which must still be at least 1.
pub fn fit_scale(width: u32, height: u32, requested: f32) -> SlipResult<f32> {
    if !requested.is_finite() || requested <= 0.0 {
        return Err(SlipError::render(format!("invalid raster scale {requested}")));
    }
    if raster_size(width, height, requested).is_ok() {
        return Ok(requested);
    }

    // One pixel of slack keeps `ceil(edge * scale)` inside the bound despite f32 rounding.
    let edge = width.max(height).max(1);
    let fitted = (MAX_RASTER_DIM - 1) as f32 / edge as f32;
    if fitted < 1.0 {
        return Err(SlipError::render(format!(
            "receipt page {width}x{height} exceeds {MAX_RASTER_DIM} pixels even at scale 1"
        )));
    }
    tracing::warn!(requested, fitted, width, height, "receipt scale reduced to fit raster bound");
    Ok(fitted.min(requested))
}

/// Decode the logo and fit it (aspect preserved) into the scaled logo box, centered.
fn load_logo(path: &Path, area: LogoBox, scale: f32) -> SlipResult<(RgbaImage, i64, i64)> {
    let bytes = std::fs::read(path)
        .map_err(|e| SlipError::render(format!("read logo '{}': {e}", path.display())))?;
    let decoded = image::load_from_memory(&bytes)
        .map_err(|e| SlipError::render(format!("decode logo '{}': {e}", path.display())))?;

    let box_w = (area.width * scale).round().max(1.0) as u32;
    let box_h = (area.height * scale).round().max(1.0) as u32;
    let fitted = decoded.resize(box_w, box_h, FilterType::Lanczos3).to_rgba8();

    let x = (area.x * scale).round() as i64 + i64::from(box_w.saturating_sub(fitted.width()) / 2);
    let y = (area.y * scale).round() as i64 + i64::from(box_h.saturating_sub(fitted.height()) / 2);
    Ok((fitted, x, y))
}

fn shared_fontdb() -> Arc<usvg::fontdb::Database> {
    static FONTDB: OnceLock<Arc<usvg::fontdb::Database>> = OnceLock::new();
    FONTDB
        .get_or_init(|| {
            let mut db = usvg::fontdb::Database::new();
            db.load_system_fonts();
            tracing::debug!(faces = db.len(), "loaded system fonts");
            Arc::new(db)
        })
        .clone()
}

/// Family, weight and style lookup that degrades to any sans-serif face, then to any face at
/// all, so receipts still carry text on hosts without the requested fonts.
fn make_font_resolver() -> usvg::FontResolver<'static> {
    use usvg::FontResolver;

    FontResolver {
        select_font: Box::new(|font, fontdb| {
            let mut families = Vec::<usvg::fontdb::Family<'_>>::new();
            for family in font.families() {
                families.push(match family {
                    usvg::FontFamily::Serif => usvg::fontdb::Family::Serif,
                    usvg::FontFamily::SansSerif => usvg::fontdb::Family::SansSerif,
                    usvg::FontFamily::Cursive => usvg::fontdb::Family::Cursive,
                    usvg::FontFamily::Fantasy => usvg::fontdb::Family::Fantasy,
                    usvg::FontFamily::Monospace => usvg::fontdb::Family::Monospace,
                    usvg::FontFamily::Named(s) => usvg::fontdb::Family::Name(s),
                });
            }
            families.push(usvg::fontdb::Family::SansSerif);

            let style = match font.style() {
                usvg::FontStyle::Normal => usvg::fontdb::Style::Normal,
                usvg::FontStyle::Italic => usvg::fontdb::Style::Italic,
                usvg::FontStyle::Oblique => usvg::fontdb::Style::Oblique,
            };

            let query = usvg::fontdb::Query {
                families: &families,
                weight: usvg::fontdb::Weight(font.weight()),
                stretch: usvg::fontdb::Stretch::Normal,
                style,
            };

            if let Some(id) = fontdb.query(&query) {
                return Some(id);
            }
            fontdb.faces().next().map(|f| f.id)
        }),
        select_fallback: FontResolver::default_fallback_selector(),
    }
}

#[cfg(test)]
#[path = "../../tests/unit/receipt/raster.rs"]
mod tests;
