use tracing::{debug, warn};

use crate::{
    assets::{
        decode::{PreparedImage, center_crop},
        fonts::FontHandle,
    },
    brand::model::{Alignment, BackgroundMode, Palette, Typography},
    foundation::{
        error::PlakatResult,
        geom::{PixelZone, Rgba8},
    },
    layout::engine::{LAYOUT_SPLIT, LayoutResult},
    render::surface::{Surface, TextStyle},
};

/// Dimming floor: the content image is never faded below this alpha,
/// whatever dim strength the layout asks for.
pub const MIN_IMAGE_ALPHA: f32 = 0.3;

/// Opacity of the black contrast backing painted behind dark-mode text.
const CONTRAST_BACKING_ALPHA: u8 = 38;

/// Peak opacity of the accent gradient across the image zone's lower edge.
const GRADIENT_PEAK_ALPHA: f32 = 0.15;

/// Fraction of the image zone's height covered by the accent gradient.
const GRADIENT_COVERAGE: f64 = 0.4;

const TEXT_LIGHT: Rgba8 = Rgba8::rgb(0xf7, 0xf6, 0xf2);
const TEXT_DARK: Rgba8 = Rgba8::rgb(0x17, 0x17, 0x17);

/// Horizontal text inset as a fraction of the text zone's width.
const TEXT_PADDING_RATIO: f32 = 0.06;

/// Stage 1: background color, accent gradient, contrast backing.
pub(crate) fn paint_graphic(
    surface: &mut dyn Surface,
    layout: &LayoutResult,
    rotation: &[Rgba8; 4],
    accent: Rgba8,
) {
    let background = rotation[layout.bg_color_index as usize % rotation.len()];
    let canvas = PixelZone::new(0, 0, surface.width(), surface.height());
    surface.fill_rect(canvas, background);

    if !layout.image_zone.is_empty() {
        let z = layout.image_zone;
        let gradient_h = (f64::from(z.height) * GRADIENT_COVERAGE).round() as u32;
        let gradient = PixelZone::new(z.x, z.bottom() - gradient_h, z.width, gradient_h);
        surface.fill_vertical_gradient(gradient, accent, 0.0, GRADIENT_PEAK_ALPHA);
    }

    if layout.background == BackgroundMode::Dark && !layout.text_zone.is_empty() {
        surface.fill_rect(
            layout.text_zone,
            Rgba8::rgba(0, 0, 0, CONTRAST_BACKING_ALPHA),
        );
    }
}

/// Stage 2: cover-fit content image, dimmed per the layout.
///
/// A missing image or an empty zone is a no-op; the background and gradient
/// still show through.
pub(crate) fn paint_image(
    surface: &mut dyn Surface,
    layout: &LayoutResult,
    content: Option<&PreparedImage>,
) -> PlakatResult<()> {
    let zone = layout.image_zone;
    let Some(image) = content else {
        return Ok(());
    };
    if zone.is_empty() || image.width == 0 || image.height == 0 {
        debug!(layout = %layout.name, "image layer skipped: empty zone or degenerate image");
        return Ok(());
    }

    let scale = (f64::from(zone.width) / f64::from(image.width))
        .max(f64::from(zone.height) / f64::from(image.height));
    let crop_w = (f64::from(zone.width) / scale).round() as u32;
    let crop_h = (f64::from(zone.height) / scale).round() as u32;
    let cropped = center_crop(image, crop_w, crop_h);

    let alpha = (1.0 - layout.image_dim).max(MIN_IMAGE_ALPHA);
    surface.draw_image(&cropped, zone, alpha)
}

/// Stage 3: contain-fit logo, placed per layout and alignment.
pub(crate) fn paint_logo(
    surface: &mut dyn Surface,
    layout: &LayoutResult,
    alignment: Alignment,
    logo: Option<&PreparedImage>,
) -> PlakatResult<()> {
    let Some(image) = logo else {
        return Ok(());
    };
    let zone = layout.logo_zone;
    if zone.is_empty() || image.width == 0 || image.height == 0 {
        return Ok(());
    }

    let scale = (f64::from(zone.width) / f64::from(image.width))
        .min(f64::from(zone.height) / f64::from(image.height));
    let dw = ((f64::from(image.width) * scale).round() as u32).max(1);
    let dh = ((f64::from(image.height) * scale).round() as u32).max(1);

    let x = if layout.name == LAYOUT_SPLIT {
        layout.text_zone.x + layout.text_zone.width.saturating_sub(dw) / 2
    } else if alignment == Alignment::Center {
        surface.width().saturating_sub(dw) / 2
    } else {
        zone.x
    };
    let y = zone.y + zone.height.saturating_sub(dh) / 2;

    surface.draw_image(image, PixelZone::new(x, y, dw, dh), 1.0)
}

/// Text inputs for the type layer.
pub(crate) struct TypeContent<'a> {
    pub headline: &'a str,
    pub eyebrow: Option<&'a str>,
    pub caption: Option<&'a str>,
}

/// Stage 4: eyebrow, wrapped headline, caption.
///
/// Words accumulate greedily while the measured line width fits inside the
/// padded zone; lines past the zone's vertical space are dropped outright.
pub(crate) fn paint_type(
    surface: &mut dyn Surface,
    layout: &LayoutResult,
    typography: &Typography,
    palette: &Palette,
    alignment: Alignment,
    font: Option<FontHandle>,
    content: &TypeContent<'_>,
) -> PlakatResult<()> {
    let Some(font) = font else {
        warn!("no usable font resolved; skipping type layer");
        return Ok(());
    };
    let zone = layout.text_zone;
    if zone.is_empty() {
        return Ok(());
    }

    let text_color = match layout.background {
        BackgroundMode::Dark => palette.light.unwrap_or(TEXT_LIGHT),
        BackgroundMode::Light | BackgroundMode::Warm => palette.dark.unwrap_or(TEXT_DARK),
    };
    let headline_size = typography.sizes.for_category(layout.text_size);
    let pad = (zone.width as f32 * TEXT_PADDING_RATIO).round();
    let max_width = zone.width as f32 - 2.0 * pad;
    let bottom = zone.bottom() as f32 - pad;
    let mut cursor = zone.y as f32 + pad;

    if let Some(eyebrow) = content.eyebrow {
        let style = TextStyle {
            font: font.clone(),
            size_px: typography.sizes.sm,
            weight: typography.weight,
            color: palette.accent,
        };
        let line_h = typography.sizes.sm * typography.line_height;
        let text = eyebrow.to_uppercase();
        if cursor + line_h <= bottom {
            let width = surface.measure_text(&text, &style)?;
            draw_line(surface, &text, width, zone, pad, cursor, max_width, alignment, &style)?;
            cursor += line_h + headline_size * 0.25;
        }
    }

    let headline = if typography.uppercase {
        content.headline.to_uppercase()
    } else {
        content.headline.to_string()
    };
    let headline_style = TextStyle {
        font: font.clone(),
        size_px: headline_size,
        weight: typography.weight,
        color: text_color,
    };
    let line_h = headline_size * typography.line_height;
    for (line, width) in wrap_text(surface, &headline, max_width, &headline_style)? {
        if cursor + line_h > bottom {
            debug!(layout = %layout.name, "headline overflow: dropping remaining lines");
            break;
        }
        draw_line(surface, &line, width, zone, pad, cursor, max_width, alignment, &headline_style)?;
        cursor += line_h;
    }

    if let Some(caption) = content.caption {
        let style = TextStyle {
            font,
            size_px: typography.sizes.sm,
            weight: typography.weight,
            color: text_color.with_alpha(200),
        };
        let caption_h = typography.sizes.sm * typography.line_height;
        cursor += headline_size * 0.25;
        for (line, width) in wrap_text(surface, caption, max_width, &style)? {
            if cursor + caption_h > bottom {
                break;
            }
            draw_line(surface, &line, width, zone, pad, cursor, max_width, alignment, &style)?;
            cursor += caption_h;
        }
    }

    Ok(())
}

/// Greedy measured-width word wrap. A word that alone exceeds the width
/// still gets its own line; there is no intra-word breaking.
fn wrap_text(
    surface: &mut dyn Surface,
    text: &str,
    max_width: f32,
    style: &TextStyle,
) -> PlakatResult<Vec<(String, f32)>> {
    let mut lines = Vec::new();
    let mut current = String::new();
    let mut current_width = 0.0f32;

    for word in text.split_whitespace() {
        let candidate = if current.is_empty() {
            word.to_string()
        } else {
            format!("{current} {word}")
        };
        let width = surface.measure_text(&candidate, style)?;
        if width <= max_width || current.is_empty() {
            current = candidate;
            current_width = width;
        } else {
            lines.push((current, current_width));
            current = word.to_string();
            current_width = surface.measure_text(&current, style)?;
        }
    }
    if !current.is_empty() {
        lines.push((current, current_width));
    }
    Ok(lines)
}

#[allow(clippy::too_many_arguments)]
fn draw_line(
    surface: &mut dyn Surface,
    text: &str,
    line_width: f32,
    zone: PixelZone,
    pad: f32,
    y: f32,
    max_width: f32,
    alignment: Alignment,
    style: &TextStyle,
) -> PlakatResult<()> {
    let x = zone.x as f32
        + pad
        + if alignment == Alignment::Center {
            ((max_width - line_width) / 2.0).max(0.0)
        } else {
            0.0
        };
    surface.fill_text(text, x, y, style)
}
