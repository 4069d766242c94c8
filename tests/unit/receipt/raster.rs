use std::path::PathBuf;

use chrono::NaiveDate;

use super::*;
use crate::{
    config::settings::SlipConfig,
    form::state::FormState,
    receipt::{code::TransactionCode, document::render_receipt_document, svg::layout_receipt},
};

fn layout() -> ReceiptLayout {
    let form = FormState {
        full_name: "Juan M. Dela Cruz".to_string(),
        rank: "Teacher I".to_string(),
        time_out: "08:00".to_string(),
        time_return: "10:00".to_string(),
        places_to_visit: "Division Office".to_string(),
        reason_for_visit: String::new(),
        agreed: true,
    };
    let at = NaiveDate::from_ymd_opt(2026, 10, 16)
        .unwrap()
        .and_hms_opt(9, 0, 0)
        .unwrap();
    let doc = render_receipt_document(
        &form,
        TransactionCode::new(12_345).unwrap(),
        &SlipConfig::default(),
        at,
    );
    layout_receipt(&doc)
}

fn close(px: &image::Rgb<u8>, want: [u8; 3], tol: u8) -> bool {
    px.0.iter().zip(want).all(|(a, b)| a.abs_diff(b) <= tol)
}

#[test]
fn raster_size_scales_and_bounds() {
    assert_eq!(raster_size(850, 1100, 2.0).unwrap(), (1700, 2200));
    assert_eq!(raster_size(850, 1100, 1.0).unwrap(), (850, 1100));
    assert!(raster_size(850, 1100, 0.0).is_err());
    assert!(raster_size(850, 1100, f32::NAN).is_err());
    assert!(raster_size(850, 20_000, 1.0).is_err());
}

#[test]
fn fit_scale_keeps_scales_that_fit() {
    assert_eq!(fit_scale(850, 1100, 2.0).unwrap(), 2.0);
    assert_eq!(fit_scale(850, 1100, 0.5).unwrap(), 0.5);
    assert!(fit_scale(850, 1100, 0.0).is_err());
    assert!(fit_scale(850, 1100, f32::INFINITY).is_err());
}

#[test]
fn fit_scale_shrinks_tall_pages_down_to_one() {
    let s = fit_scale(850, 10_817, 2.0).unwrap();
    assert!(s < 2.0 && s >= 1.0, "{s}");
    let (w, h) = raster_size(850, 10_817, s).unwrap();
    assert!(h <= MAX_RASTER_DIM && h > MAX_RASTER_DIM - 4, "{h}");
    assert!(w < 1700);

    let edge = MAX_RASTER_DIM - 1;
    let s = fit_scale(850, edge, 3.0).unwrap();
    assert_eq!(s, 1.0);
    assert_eq!(raster_size(850, edge, s).unwrap().1, edge);
    assert!(fit_scale(850, 20_000, 1.0).is_err());
    assert!(fit_scale(850, 20_000, 0.5).is_ok());
}

#[test]
fn page_is_white_with_blue_frame() {
    let layout = layout();
    let img = rasterize_receipt(&layout, 1.0, None).unwrap();
    assert_eq!(img.dimensions(), (layout.width, layout.height));

    // Outside the rounded corner.
    assert!(close(img.get_pixel(0, 0), [255, 255, 255], 0));
    // Middle of the top border stroke.
    assert!(close(img.get_pixel(425, 3), [0x1e, 0x40, 0xaf], 8));
    // Left margin inside the page.
    assert!(close(img.get_pixel(20, 600), [255, 255, 255], 0));
}

#[test]
fn scale_doubles_pixels() {
    let layout = layout();
    let img = rasterize_receipt(&layout, 2.0, None).unwrap();
    assert_eq!(img.dimensions(), (layout.width * 2, layout.height * 2));
    assert!(close(img.get_pixel(850, 6), [0x1e, 0x40, 0xaf], 8));
}

#[test]
fn logo_is_composited_into_its_box() {
    let dir = PathBuf::from("target").join("raster_logo");
    std::fs::create_dir_all(&dir).unwrap();
    let logo_path = dir.join("logo.png");
    image::RgbImage::from_pixel(20, 10, image::Rgb([220, 20, 20]))
        .save(&logo_path)
        .unwrap();

    let layout = layout();
    let img = rasterize_receipt(&layout, 1.0, Some(&logo_path)).unwrap();
    let b = layout.logo_box;
    let cx = (b.x + b.width / 2.0) as u32;
    let cy = (b.y + b.height / 2.0) as u32;
    assert!(close(img.get_pixel(cx, cy), [220, 20, 20], 12));
}

#[test]
fn unreadable_logo_is_skipped() {
    let layout = layout();
    let missing = PathBuf::from("target/raster_logo/missing.png");
    let img = rasterize_receipt(&layout, 1.0, Some(&missing)).unwrap();
    let b = layout.logo_box;
    let cx = (b.x + b.width / 2.0) as u32;
    let cy = (b.y + b.height / 2.0) as u32;
    assert!(close(img.get_pixel(cx, cy), [255, 255, 255], 0));
}
