use crate::{
    brand::model::{BackgroundMode, BrandVisual},
    foundation::geom::Rgba8,
};

/// Anchor color closing the dark-mode rotation; independent of any brand.
pub const NAVY_ANCHOR: Rgba8 = Rgba8::rgb(0x1f, 0x2a, 0x44);

/// Stand-in when a dark-mode brand declares no dark palette entry.
pub const CHARCOAL_FALLBACK: Rgba8 = Rgba8::rgb(0x14, 0x18, 0x1f);

/// Derive the ordered background-color rotation for a render.
///
/// The graphic layer indexes into this with `bg_color_index`, so the order
/// per mode is part of the reproducibility contract.
pub fn build_palette(visual: &BrandVisual, mode: BackgroundMode) -> [Rgba8; 4] {
    let p = &visual.palette;
    match mode {
        BackgroundMode::Dark => [
            p.primary,
            p.dark.unwrap_or(CHARCOAL_FALLBACK),
            p.accent,
            NAVY_ANCHOR,
        ],
        BackgroundMode::Warm => [
            p.warm.unwrap_or(p.background),
            p.background,
            p.accent,
            p.primary,
        ],
        BackgroundMode::Light => [
            p.background,
            p.warm.unwrap_or(p.background),
            p.accent,
            p.primary,
        ],
    }
}
