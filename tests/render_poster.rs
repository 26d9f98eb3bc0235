use std::sync::Arc;

use base64::Engine as _;
use plakat::{AspectRatio, BrandVisual, RenderRequest, render_poster, render_variants};

const LOGO_SVG: &str = r##"<svg xmlns="http://www.w3.org/2000/svg" width="40" height="20"><rect width="40" height="20" fill="#00ff00"/></svg>"##;

fn init_tracing() {
    let _ = tracing_subscriber::fmt().with_test_writer().try_init();
}

fn visual() -> BrandVisual {
    serde_json::from_value(serde_json::json!({
        "palette": {
            "background": "#f5f1e8",
            "primary": "#1d3557",
            "accent": "#e63946"
        },
        "typography": {
            "sizes": { "sm": 28.0, "md": 44.0, "lg": 64.0, "display": 92.0 }
        },
        "layouts": ["split", "overlay", "type-only", "card", "full-bleed"]
    }))
    .unwrap()
}

fn visual_with_data_uri_logo() -> BrandVisual {
    let mut v = visual();
    let encoded = base64::engine::general_purpose::STANDARD.encode(LOGO_SVG);
    v.logo.dark = Some(format!("data:image/svg+xml;base64,{encoded}").into());
    v
}

fn content_png() -> Arc<Vec<u8>> {
    let mut img = image::RgbaImage::new(64, 48);
    for px in img.pixels_mut() {
        *px = image::Rgba([40, 90, 160, 255]);
    }
    let mut out = std::io::Cursor::new(Vec::new());
    img.write_to(&mut out, image::ImageFormat::Png).unwrap();
    Arc::new(out.into_inner())
}

fn count_pure_green(png: &[u8]) -> usize {
    let img = image::load_from_memory(png).unwrap().to_rgba8();
    img.pixels()
        .filter(|p| p.0[0] < 30 && p.0[1] > 220 && p.0[2] < 30)
        .count()
}

#[test]
fn render_produces_a_decodable_png_at_the_requested_ratio() {
    init_tracing();
    let v = visual();
    let mut req = RenderRequest::new("acme", "Hello poster world", AspectRatio::Landscape);
    req.topic = Some("launch".to_string());
    let png = render_poster(&v, &req).unwrap();

    let decoded = image::load_from_memory(&png).unwrap();
    assert_eq!(decoded.width(), 1200);
    assert_eq!(decoded.height(), 675);
}

#[test]
fn identical_requests_render_byte_identical_posters() {
    let v = visual();
    let mut req = RenderRequest::new("acme", "Same in, same out", AspectRatio::Square);
    req.topic = Some("abc".to_string());
    req.seed = Some("abc".to_string());
    req.content_image = Some(content_png());

    let a = render_poster(&v, &req).unwrap();
    let b = render_poster(&v, &req).unwrap();
    assert_eq!(a, b);
}

#[test]
fn no_logo_leaves_no_logo_pixels() {
    init_tracing();
    let v = visual_with_data_uri_logo();

    let mut with_logo = RenderRequest::new("acme", "Logo check", AspectRatio::Square);
    with_logo.seed = Some("logo-seed".to_string());
    let png_with = render_poster(&v, &with_logo).unwrap();
    assert!(count_pure_green(&png_with) > 0, "logo should paint green pixels");

    let mut suppressed = with_logo.clone();
    suppressed.no_logo = true;
    let png_without = render_poster(&v, &suppressed).unwrap();
    assert_eq!(count_pure_green(&png_without), 0);
}

#[test]
fn missing_content_image_keeps_the_zone_empty_but_renders() {
    // An image layout with no decodable content image still renders the
    // background and gradient; the zone simply stays photo-free.
    let v = visual();
    let mut req = RenderRequest::new("acme", "No photo today", AspectRatio::Portrait);
    req.topic = Some("no-photo".to_string());
    req.content_image = Some(Arc::new(b"definitely not an image".to_vec()));

    let png = render_poster(&v, &req).unwrap();
    let decoded = image::load_from_memory(&png).unwrap();
    assert_eq!(decoded.width(), 1080);
    assert_eq!(decoded.height(), 1350);
}

#[test]
fn unreadable_brand_font_degrades_instead_of_failing() {
    let mut v = visual();
    v.typography.font_file = Some("/definitely/missing/font.ttf".into());
    let req = RenderRequest::new("acme", "Fallback serif speaking", AspectRatio::Square);
    render_poster(&v, &req).unwrap();
}

#[test]
fn invalid_config_fails_the_call() {
    let mut v = visual();
    v.layouts.clear();
    let req = RenderRequest::new("acme", "x", AspectRatio::Square);
    assert!(matches!(
        render_poster(&v, &req),
        Err(plakat::PlakatError::Config(_))
    ));
}

#[test]
fn variant_fanout_preserves_slot_order_and_partial_success() {
    let v = visual();
    let mut base = RenderRequest::new("acme", "Moodboard", AspectRatio::Square);
    base.content_image = Some(content_png());
    base.topic = Some("board".to_string());

    let seeds: Vec<String> = (0..9).map(|i| format!("board-{i}")).collect();
    let variants = render_variants(&v, &base, &seeds);
    assert_eq!(variants.len(), 9);
    assert!(variants.iter().all(Option::is_some));

    // Seeded slots are themselves reproducible.
    let again = render_variants(&v, &base, &seeds);
    assert_eq!(variants, again);
}

#[test]
fn variant_fanout_never_panics_when_every_item_fails() {
    // A brand whose only layout is unknown to the engine fails each render;
    // the fan-out must report per-slot failures, not abort.
    let mut v = visual();
    v.layouts = vec!["mosaic".to_string()];
    let mut base = RenderRequest::new("acme", "Broken brand", AspectRatio::Square);
    base.content_image = Some(content_png());

    let seeds: Vec<String> = (0..4).map(|i| format!("s{i}")).collect();
    let variants = render_variants(&v, &base, &seeds);
    assert_eq!(variants.len(), 4);
    assert!(variants.iter().all(Option::is_none));
}
