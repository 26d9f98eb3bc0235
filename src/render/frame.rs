use rayon::prelude::*;
use tracing::{debug, warn};

use crate::{
    assets::{
        decode::{PreparedImage, decode_image},
        fonts::{FontHandle, fallback_serif, register_font},
        logo::{load_logo, resolve_logo},
    },
    brand::model::{BrandVisual, RenderRequest, Typography},
    foundation::error::{PlakatError, PlakatResult},
    layout::engine::compute_layout,
    render::{
        cpu::CpuSurface,
        layers::{TypeContent, paint_graphic, paint_image, paint_logo, paint_type},
        surface::FrameRgba,
    },
    style::{palette::build_palette, planner::build_style_plan},
};

/// Compose one poster and encode it as PNG bytes.
///
/// The stages run strictly in order — plan, layout, the four paint layers,
/// encode — with no branching or revisiting. Asset-level failures (content
/// image, logo, font) degrade the output and keep going; config, layout and
/// encode failures fail this call.
#[tracing::instrument(skip(visual, request), fields(brand = %request.brand_id, ratio = request.ratio.as_str()))]
pub fn render_poster(visual: &BrandVisual, request: &RenderRequest) -> PlakatResult<Vec<u8>> {
    visual.validate()?;
    let (width, height) = request.ratio.dimensions();

    let font = resolve_font(&visual.typography);
    let has_image = request.content_image.is_some();
    let topic = request.topic.as_deref();
    let seed = request.seed.as_deref();

    let plan = build_style_plan(visual, topic, has_image, seed);
    let layout = compute_layout(&plan, width, height, visual, topic, seed)?;
    debug!(layout = %layout.name, density = ?plan.density, background = ?plan.background, "style resolved");

    let content = request
        .content_image
        .as_deref()
        .and_then(|bytes| match decode_image(bytes) {
            Ok(image) => Some(image),
            Err(e) => {
                warn!(error = %e, "content image undecodable; rendering without it");
                None
            }
        });

    let logo: Option<PreparedImage> =
        resolve_logo(visual, plan.background, request.logo_path.as_deref(), request.no_logo)
            .and_then(|source| match load_logo(&source, layout.logo_zone) {
                Ok(image) => Some(image),
                Err(e) => {
                    warn!(error = %e, "logo unusable; skipping logo layer");
                    None
                }
            });

    let rotation = build_palette(visual, plan.background);

    let mut surface = CpuSurface::new(width, height)?;
    paint_graphic(&mut surface, &layout, &rotation, visual.palette.accent);
    paint_image(&mut surface, &layout, content.as_ref())?;
    paint_logo(&mut surface, &layout, plan.alignment, logo.as_ref())?;
    paint_type(
        &mut surface,
        &layout,
        &visual.typography,
        &visual.palette,
        plan.alignment,
        font,
        &TypeContent {
            headline: &request.headline,
            eyebrow: request.eyebrow.as_deref(),
            caption: request.caption.as_deref(),
        },
    )?;

    encode_png(&surface.into_frame()?)
}

/// Render one seeded variant per entry in `seeds`, in parallel.
///
/// Each failure is isolated to a `None` in its slot; siblings always run to
/// completion (a moodboard with seven of nine posters beats no moodboard).
pub fn render_variants(
    visual: &BrandVisual,
    base: &RenderRequest,
    seeds: &[String],
) -> Vec<Option<Vec<u8>>> {
    seeds
        .par_iter()
        .map(|seed| {
            let mut request = base.clone();
            request.seed = Some(seed.clone());
            match render_poster(visual, &request) {
                Ok(bytes) => Some(bytes),
                Err(e) => {
                    warn!(seed = %seed, error = %e, "variant render failed; siblings continue");
                    None
                }
            }
        })
        .collect()
}

/// Register the brand's font file (idempotent, process-wide) and fall back
/// to a generic system serif when it is absent or unreadable.
fn resolve_font(typography: &Typography) -> Option<FontHandle> {
    typography
        .font_file
        .as_deref()
        .and_then(register_font)
        .or_else(fallback_serif)
}

fn encode_png(frame: &FrameRgba) -> PlakatResult<Vec<u8>> {
    use image::ImageEncoder as _;

    let mut out = Vec::new();
    let encoder = image::codecs::png::PngEncoder::new(&mut out);
    encoder
        .write_image(
            &frame.data,
            frame.width,
            frame.height,
            image::ExtendedColorType::Rgba8,
        )
        .map_err(|e| PlakatError::encode(e.to_string()))?;
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn encode_png_produces_a_png_signature() {
        let frame = FrameRgba {
            width: 2,
            height: 2,
            data: vec![255u8; 16],
            premultiplied: true,
        };
        let bytes = encode_png(&frame).unwrap();
        assert_eq!(&bytes[0..8], b"\x89PNG\r\n\x1a\n");
    }

    #[test]
    fn encode_png_rejects_short_buffers() {
        let frame = FrameRgba {
            width: 4,
            height: 4,
            data: vec![0u8; 4],
            premultiplied: true,
        };
        assert!(matches!(encode_png(&frame), Err(PlakatError::Encode(_))));
    }
}
