use serde::Serialize;

use crate::{
    brand::model::{Alignment, BackgroundMode, BrandVisual, TextSize},
    foundation::{
        error::{PlakatError, PlakatResult},
        geom::PixelZone,
        math::hash_str,
    },
    style::planner::StylePlan,
};

pub const LAYOUT_SPLIT: &str = "split";
pub const LAYOUT_OVERLAY: &str = "overlay";
pub const LAYOUT_TYPE_ONLY: &str = "type-only";
pub const LAYOUT_CARD: &str = "card";
pub const LAYOUT_FULL_BLEED: &str = "full-bleed";

/// The complete set of layout templates the engine knows how to place.
pub const KNOWN_LAYOUTS: [&str; 5] = [
    LAYOUT_SPLIT,
    LAYOUT_OVERLAY,
    LAYOUT_TYPE_ONLY,
    LAYOUT_CARD,
    LAYOUT_FULL_BLEED,
];

/// A split stacks vertically once the canvas is taller than this
/// height/width ratio (strictly greater; a square canvas stacks).
const VERTICAL_SPLIT_RATIO: f64 = 0.85;

/// Absolute pixel zones for one render. Computed once per call.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct LayoutResult {
    pub name: String,
    pub image_zone: PixelZone,
    pub text_zone: PixelZone,
    pub logo_zone: PixelZone,
    pub background: BackgroundMode,
    pub text_size: TextSize,
    pub bg_color_index: u32,
    /// Strength of the dimming overlay applied to the content image, 0..1.
    pub image_dim: f32,
}

/// Map a style plan onto absolute pixel zones for the given canvas.
///
/// Zone edges are computed in f64 and rounded independently, so every
/// non-empty zone is contained in the canvas by construction. A layout name
/// outside [`KNOWN_LAYOUTS`] means the planner contract is broken and fails
/// loudly.
pub fn compute_layout(
    plan: &StylePlan,
    width: u32,
    height: u32,
    visual: &BrandVisual,
    topic: Option<&str>,
    seed: Option<&str>,
) -> PlakatResult<LayoutResult> {
    let w = f64::from(width);
    let h = f64::from(height);
    let margin = plan.density.margin_ratio() * w.min(h);

    let (image_zone, text_zone, logo_zone, text_size, image_dim) = match plan.layout.as_str() {
        LAYOUT_SPLIT => split_zones(w, h, margin, plan.alignment),
        LAYOUT_OVERLAY => overlay_zones(w, h, margin, plan.alignment),
        LAYOUT_TYPE_ONLY => type_only_zones(w, h, margin, plan.alignment),
        LAYOUT_CARD => card_zones(w, h, margin, plan.alignment),
        LAYOUT_FULL_BLEED => full_bleed_zones(w, h, margin, plan.alignment),
        other => {
            return Err(PlakatError::layout(format!(
                "unknown layout '{other}' reached the layout engine"
            )));
        }
    };

    Ok(LayoutResult {
        name: plan.layout.clone(),
        image_zone,
        text_zone,
        logo_zone,
        background: plan.background,
        text_size,
        bg_color_index: bg_color_index(visual, topic, seed),
        image_dim,
    })
}

/// Background-color cycling is decoupled from the chosen geometry: it hashes
/// only the seed/topic against the brand's rotation count.
fn bg_color_index(visual: &BrandVisual, topic: Option<&str>, seed: Option<&str>) -> u32 {
    let key = seed.or(topic).unwrap_or("default");
    hash_str(key) % visual.palette_rotation.max(1)
}

fn zone_from_edges(x0: f64, y0: f64, x1: f64, y1: f64) -> PixelZone {
    let xa = round_px(x0);
    let ya = round_px(y0);
    let xb = round_px(x1);
    let yb = round_px(y1);
    PixelZone::new(xa, ya, xb.saturating_sub(xa), yb.saturating_sub(ya))
}

fn round_px(v: f64) -> u32 {
    v.round().max(0.0) as u32
}

/// Logo slot shared by every layout: bottom-right by default, bottom-left
/// when the alignment is asymmetric, hoisted to the top edge on request.
fn logo_slot(w: f64, h: f64, margin: f64, alignment: Alignment, top: bool) -> PixelZone {
    let min_dim = w.min(h);
    let lw = min_dim * 0.16;
    let lh = min_dim * 0.08;
    let x0 = if alignment == Alignment::Asymmetric {
        margin
    } else {
        w - margin - lw
    };
    let y0 = if top { margin } else { h - margin - lh };
    zone_from_edges(x0, y0, x0 + lw, y0 + lh)
}

type Zones = (PixelZone, PixelZone, PixelZone, TextSize, f32);

fn split_zones(w: f64, h: f64, m: f64, alignment: Alignment) -> Zones {
    let logo = logo_slot(w, h, m, alignment, false);
    let logo_h = w.min(h) * 0.08;

    if h / w > VERTICAL_SPLIT_RATIO {
        // Portrait-ish canvas: image over text.
        let image_bottom = m + (h - 2.0 * m) * 0.55;
        let image = zone_from_edges(m, m, w - m, image_bottom);
        let text = zone_from_edges(
            m,
            image_bottom + m,
            w - m,
            h - m - logo_h - 0.5 * m,
        );
        (image, text, logo, TextSize::Lg, 0.0)
    } else {
        // Wide canvas: image left, text right.
        let inner_w = w - 2.0 * m;
        let inner_h = h - 2.0 * m;
        let image = zone_from_edges(m, m, m + inner_w * 0.5, h - m);
        let text_x0 = m + inner_w * 0.5 + m;
        let (text_y0, text_y1) = if alignment == Alignment::Center {
            let th = inner_h * 0.5;
            ((h - th) / 2.0, (h + th) / 2.0)
        } else {
            let y0 = m + inner_h * 0.1;
            (y0, y0 + inner_h * 0.6)
        };
        let text = zone_from_edges(text_x0, text_y0, w - m, text_y1);
        (image, text, logo, TextSize::Lg, 0.0)
    }
}

fn overlay_zones(w: f64, h: f64, m: f64, alignment: Alignment) -> Zones {
    let image = zone_from_edges(0.0, 0.0, w, h);
    let tw = w * 0.7;
    let th = h * 0.45;
    let text_x0 = match alignment {
        Alignment::Center => (w - tw) / 2.0,
        Alignment::Asymmetric => w - m - tw,
        Alignment::Left => m,
    };
    let text_y0 = (h - th) / 2.0;
    let text = zone_from_edges(text_x0, text_y0, text_x0 + tw, text_y0 + th);
    let logo = logo_slot(w, h, m, alignment, false);
    // Text sits on the photo; dim it enough to keep the headline legible.
    (image, text, logo, TextSize::Lg, 0.4)
}

fn type_only_zones(w: f64, h: f64, m: f64, alignment: Alignment) -> Zones {
    let inner_h = h - 2.0 * m;
    let th = inner_h * 0.65;
    let text_y0 = m + (inner_h - th) / 2.0;
    let text = zone_from_edges(m, text_y0, w - m, text_y0 + th);
    let logo = logo_slot(w, h, m, alignment, false);
    (PixelZone::EMPTY, text, logo, TextSize::Display, 0.0)
}

fn card_zones(w: f64, h: f64, m: f64, alignment: Alignment) -> Zones {
    let inner_h = h - 2.0 * m;
    let logo_h = w.min(h) * 0.08;
    let image_bottom = m + inner_h * 0.65;
    let image = zone_from_edges(m, m, w - m, image_bottom);
    let text = zone_from_edges(
        m,
        image_bottom + 0.5 * m,
        w - m,
        h - m - logo_h - 0.5 * m,
    );
    let logo = logo_slot(w, h, m, alignment, false);
    (image, text, logo, TextSize::Md, 0.0)
}

fn full_bleed_zones(w: f64, h: f64, m: f64, alignment: Alignment) -> Zones {
    let image = zone_from_edges(0.0, 0.0, w, h);
    let caption_h = h * 0.12;
    let text = zone_from_edges(m, h - m - caption_h, m + w * 0.55, h - m);
    let logo = logo_slot(w, h, m, alignment, true);
    (image, text, logo, TextSize::Sm, 0.15)
}
