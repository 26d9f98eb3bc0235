//! Plakat is a deterministic brand-poster composition and rendering engine.
//!
//! Given a brand's visual configuration, a headline and an optional content
//! image, plakat turns them into a PNG through a fixed pipeline:
//!
//! 1. **Plan**: `BrandVisual + topic/seed -> StylePlan` (which template, how
//!    dense, how aligned, on what background)
//! 2. **Layout**: `StylePlan + canvas -> LayoutResult` (absolute pixel zones
//!    for image, text and logo)
//! 3. **Paint**: four layers in fixed z-order — graphic, image, logo, type —
//!    over a CPU raster surface
//! 4. **Encode**: the composed frame as PNG bytes
//!
//! The key design constraints:
//!
//! - **No unsafe**: `unsafe` is forbidden in this crate.
//! - **Deterministic-by-default**: planning and layout are pure; identical
//!   `(visual, topic, has_image, seed)` inputs reproduce identical posters.
//! - **Graceful asset degradation**: an unreadable logo or font never fails
//!   a render, it only reduces fidelity.
//! - **Premultiplied RGBA8** end-to-end on the paint surface.
#![forbid(unsafe_code)]

mod assets;
mod brand;
mod foundation;
mod layout;
mod render;
mod style;

pub use assets::decode::{PreparedImage, decode_image, parse_svg, rasterize_svg};
pub use assets::fonts::{FontHandle, fallback_serif, register_font};
pub use assets::logo::{LogoSource, load_logo, resolve_logo};
pub use brand::model::{
    Alignment, AspectRatio, BackgroundMode, BrandVisual, Density, LogoAssets, Palette,
    RenderRequest, SizeTable, TextSize, Typography, Variants,
};
pub use foundation::error::{PlakatError, PlakatResult};
pub use foundation::geom::{PixelZone, Rgba8};
pub use layout::engine::{
    KNOWN_LAYOUTS, LAYOUT_CARD, LAYOUT_FULL_BLEED, LAYOUT_OVERLAY, LAYOUT_SPLIT, LAYOUT_TYPE_ONLY,
    LayoutResult, compute_layout,
};
pub use render::cpu::CpuSurface;
pub use render::frame::{render_poster, render_variants};
pub use render::layers::MIN_IMAGE_ALPHA;
pub use render::surface::{FrameRgba, Surface, TextStyle};
pub use style::palette::{CHARCOAL_FALLBACK, NAVY_ANCHOR, build_palette};
pub use style::planner::{StylePlan, build_style_plan};
