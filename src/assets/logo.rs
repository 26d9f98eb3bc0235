use std::path::{Path, PathBuf};

use anyhow::Context;
use base64::Engine as _;

use crate::{
    assets::decode::{PreparedImage, decode_image, parse_svg, rasterize_svg},
    brand::model::{BackgroundMode, BrandVisual},
    foundation::{
        error::{PlakatError, PlakatResult},
        geom::PixelZone,
    },
};

/// Where the logo layer should read its artwork from.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum LogoSource {
    File(PathBuf),
    /// An inline `data:` URI, e.g. `data:image/svg+xml;base64,...`.
    DataUri(String),
}

/// Resolve the effective logo source for a render.
///
/// `no_logo` suppresses the layer unconditionally. Otherwise the brand's
/// background-appropriate variant wins (light artwork on dark backgrounds,
/// dark artwork on light/warm), falling back to whichever variant the brand
/// declares, then to the caller-supplied override.
pub fn resolve_logo(
    visual: &BrandVisual,
    background: BackgroundMode,
    override_path: Option<&Path>,
    no_logo: bool,
) -> Option<LogoSource> {
    if no_logo {
        return None;
    }

    let logo = &visual.logo;
    let brand_pick = match background {
        BackgroundMode::Dark => logo.light.as_ref().or(logo.dark.as_ref()),
        BackgroundMode::Light | BackgroundMode::Warm => logo.dark.as_ref().or(logo.light.as_ref()),
    };

    if let Some(path) = brand_pick {
        return Some(into_source(path.clone()));
    }
    override_path.map(|p| into_source(p.to_path_buf()))
}

fn into_source(path: PathBuf) -> LogoSource {
    let s = path.to_string_lossy();
    if s.starts_with("data:") {
        LogoSource::DataUri(s.into_owned())
    } else {
        LogoSource::File(path)
    }
}

/// Load and decode a logo, sized for the target zone.
///
/// SVG artwork is rasterized at the contain-fit size so it stays crisp;
/// raster artwork is returned at its native size and scaled at paint time.
pub fn load_logo(source: &LogoSource, zone: PixelZone) -> PlakatResult<PreparedImage> {
    match source {
        LogoSource::DataUri(uri) => {
            let bytes = decode_data_uri(uri)?;
            rasterize_svg_to_fit(&bytes, zone)
        }
        LogoSource::File(path) => {
            let bytes = std::fs::read(path)
                .with_context(|| format!("read logo '{}'", path.display()))
                .map_err(|e| PlakatError::asset(format!("{e:#}")))?;
            let is_svg = path
                .extension()
                .and_then(|s| s.to_str())
                .is_some_and(|ext| ext.eq_ignore_ascii_case("svg"));
            if is_svg {
                rasterize_svg_to_fit(&bytes, zone)
            } else {
                decode_image(&bytes)
            }
        }
    }
}

fn rasterize_svg_to_fit(bytes: &[u8], zone: PixelZone) -> PlakatResult<PreparedImage> {
    let tree = parse_svg(bytes)?;
    let (sw, sh) = (tree.size().width(), tree.size().height());
    if !sw.is_finite() || !sh.is_finite() || sw <= 0.0 || sh <= 0.0 {
        return Err(PlakatError::asset("svg logo has invalid intrinsic size"));
    }
    let scale = (zone.width as f32 / sw).min(zone.height as f32 / sh);
    let w = ((sw * scale).round() as u32).max(1);
    let h = ((sh * scale).round() as u32).max(1);
    rasterize_svg(&tree, w, h)
}

fn decode_data_uri(uri: &str) -> PlakatResult<Vec<u8>> {
    let rest = uri
        .strip_prefix("data:")
        .ok_or_else(|| PlakatError::asset("logo data URI missing 'data:' prefix"))?;
    let (meta, payload) = rest
        .split_once(',')
        .ok_or_else(|| PlakatError::asset("logo data URI missing ',' separator"))?;
    if !meta.ends_with(";base64") {
        return Err(PlakatError::asset(
            "only base64-encoded logo data URIs are supported",
        ));
    }
    base64::engine::general_purpose::STANDARD
        .decode(payload.trim())
        .map_err(|e| PlakatError::asset(format!("logo data URI payload: {e}")))
}
