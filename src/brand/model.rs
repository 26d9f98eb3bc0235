use std::{collections::BTreeMap, path::PathBuf, sync::Arc};

use serde::{Deserialize, Serialize};

use crate::foundation::{
    error::{PlakatError, PlakatResult},
    geom::Rgba8,
};

/// A brand's visual configuration: palette, typography, logo assets and the
/// variant axes the style planner may roll over.
///
/// Supplied read-only by a brand-loading subsystem; optional fields fall back
/// to documented defaults instead of erroring.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct BrandVisual {
    pub palette: Palette,
    pub typography: Typography,
    #[serde(default)]
    pub logo: LogoAssets,
    /// Layout templates this brand may use. Must be non-empty.
    pub layouts: Vec<String>,
    #[serde(default)]
    pub density: Density,
    #[serde(default)]
    pub alignment: Alignment,
    #[serde(default)]
    pub background: BackgroundMode,
    /// How many background-color variants the graphic layer cycles through.
    #[serde(default = "default_palette_rotation")]
    pub palette_rotation: u32,
    #[serde(default)]
    pub variants: Variants,
}

fn default_palette_rotation() -> u32 {
    4
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Palette {
    pub background: Rgba8,
    pub primary: Rgba8,
    pub accent: Rgba8,
    #[serde(default)]
    pub secondary: Option<Rgba8>,
    #[serde(default)]
    pub warm: Option<Rgba8>,
    #[serde(default)]
    pub dark: Option<Rgba8>,
    #[serde(default)]
    pub light: Option<Rgba8>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Typography {
    /// Custom headline font file (TTF/OTF). Absent or unreadable falls back
    /// to a generic system serif.
    #[serde(default)]
    pub font_file: Option<PathBuf>,
    #[serde(default = "default_font_weight")]
    pub weight: u16,
    /// Line height as a multiple of the font size.
    #[serde(default = "default_line_height")]
    pub line_height: f32,
    pub sizes: SizeTable,
    #[serde(default)]
    pub uppercase: bool,
}

fn default_font_weight() -> u16 {
    700
}

fn default_line_height() -> f32 {
    1.2
}

/// Headline pixel sizes per text-size category.
#[derive(Clone, Copy, Debug, Serialize, Deserialize)]
pub struct SizeTable {
    pub sm: f32,
    pub md: f32,
    pub lg: f32,
    pub display: f32,
}

impl SizeTable {
    pub fn for_category(&self, size: TextSize) -> f32 {
        match size {
            TextSize::Sm => self.sm,
            TextSize::Md => self.md,
            TextSize::Lg => self.lg,
            TextSize::Display => self.display,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TextSize {
    Sm,
    Md,
    Lg,
    Display,
}

/// Logo raster/SVG asset paths, one per background polarity.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct LogoAssets {
    /// Light-on-dark variant, used on dark backgrounds.
    #[serde(default)]
    pub light: Option<PathBuf>,
    /// Dark-on-light variant, used on light and warm backgrounds.
    #[serde(default)]
    pub dark: Option<PathBuf>,
}

/// Margin scale as a fraction of the canvas's minimum dimension.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Density {
    Relaxed,
    #[default]
    Moderate,
    Tight,
}

impl Density {
    pub fn margin_ratio(self) -> f64 {
        match self {
            Density::Relaxed => 0.08,
            Density::Moderate => 0.05,
            Density::Tight => 0.025,
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Alignment {
    #[default]
    Left,
    Center,
    Asymmetric,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BackgroundMode {
    #[default]
    Light,
    Dark,
    Warm,
}

/// Per-axis alternate choices the planner rolls over. Empty lists mean the
/// axis is pinned to the brand's single configured default.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct Variants {
    /// Relative selection weight per layout name. Unlisted layouts weigh 1.
    #[serde(default)]
    pub layout_weights: BTreeMap<String, u32>,
    #[serde(default)]
    pub densities: Vec<Density>,
    #[serde(default)]
    pub alignments: Vec<Alignment>,
    #[serde(default)]
    pub backgrounds: Vec<BackgroundMode>,
}

impl BrandVisual {
    pub fn validate(&self) -> PlakatResult<()> {
        if self.layouts.is_empty() {
            return Err(PlakatError::config("brand layout set must be non-empty"));
        }
        if self.palette_rotation == 0 {
            return Err(PlakatError::config("palette_rotation must be >= 1"));
        }
        if !(1..=1000).contains(&self.typography.weight) {
            return Err(PlakatError::config("typography weight must be in 1..=1000"));
        }
        if !self.typography.line_height.is_finite() || self.typography.line_height <= 0.0 {
            return Err(PlakatError::config(
                "typography line_height must be finite and > 0",
            ));
        }
        let s = self.typography.sizes;
        for (name, v) in [
            ("sm", s.sm),
            ("md", s.md),
            ("lg", s.lg),
            ("display", s.display),
        ] {
            if !v.is_finite() || v <= 0.0 {
                return Err(PlakatError::config(format!(
                    "typography size '{name}' must be finite and > 0"
                )));
            }
        }
        Ok(())
    }
}

/// Canvas presets keyed by the social aspect-ratio names callers pass in.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AspectRatio {
    #[default]
    Square,
    Portrait,
    Story,
    Landscape,
    Wide,
}

impl AspectRatio {
    /// Fixed pixel dimensions per ratio key. Public contract; do not change
    /// without re-rendering every stored poster.
    pub fn dimensions(self) -> (u32, u32) {
        match self {
            AspectRatio::Square => (1080, 1080),
            AspectRatio::Portrait => (1080, 1350),
            AspectRatio::Story => (1080, 1920),
            AspectRatio::Landscape => (1200, 675),
            AspectRatio::Wide => (1200, 627),
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            AspectRatio::Square => "square",
            AspectRatio::Portrait => "portrait",
            AspectRatio::Story => "story",
            AspectRatio::Landscape => "landscape",
            AspectRatio::Wide => "wide",
        }
    }
}

/// One render call's inputs. Created and discarded per call.
#[derive(Clone, Debug, Default)]
pub struct RenderRequest {
    pub brand_id: String,
    pub headline: String,
    /// Short accent-colored line drawn above the headline.
    pub eyebrow: Option<String>,
    /// Smaller line drawn below the headline.
    pub caption: Option<String>,
    /// Encoded content-image bytes (any decodable raster). Absence forces
    /// type-only treatment in the planner.
    pub content_image: Option<Arc<Vec<u8>>>,
    pub ratio: AspectRatio,
    /// Caller-supplied logo path, used when the brand declares none.
    pub logo_path: Option<PathBuf>,
    /// Suppresses the logo layer unconditionally.
    pub no_logo: bool,
    pub topic: Option<String>,
    pub seed: Option<String>,
}

impl RenderRequest {
    pub fn new(brand_id: impl Into<String>, headline: impl Into<String>, ratio: AspectRatio) -> Self {
        Self {
            brand_id: brand_id.into(),
            headline: headline.into(),
            ratio,
            ..Self::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn basic_visual() -> BrandVisual {
        serde_json::from_value(serde_json::json!({
            "palette": {
                "background": "#f5f1e8",
                "primary": "#1d3557",
                "accent": "#e63946"
            },
            "typography": {
                "sizes": { "sm": 28.0, "md": 44.0, "lg": 64.0, "display": 92.0 }
            },
            "layouts": ["split", "overlay", "type-only"]
        }))
        .unwrap()
    }

    #[test]
    fn deserializes_with_defaults() {
        let v = basic_visual();
        assert_eq!(v.density, Density::Moderate);
        assert_eq!(v.alignment, Alignment::Left);
        assert_eq!(v.background, BackgroundMode::Light);
        assert_eq!(v.palette_rotation, 4);
        assert_eq!(v.typography.weight, 700);
        assert!(v.variants.layout_weights.is_empty());
        v.validate().unwrap();
    }

    #[test]
    fn validate_rejects_empty_layout_set() {
        let mut v = basic_visual();
        v.layouts.clear();
        assert!(matches!(v.validate(), Err(PlakatError::Config(_))));
    }

    #[test]
    fn validate_rejects_degenerate_sizes() {
        let mut v = basic_visual();
        v.typography.sizes.lg = 0.0;
        assert!(v.validate().is_err());
        v.typography.sizes.lg = f32::NAN;
        assert!(v.validate().is_err());
    }

    #[test]
    fn validate_rejects_zero_rotation() {
        let mut v = basic_visual();
        v.palette_rotation = 0;
        assert!(v.validate().is_err());
    }

    #[test]
    fn ratio_table_is_fixed() {
        assert_eq!(AspectRatio::Square.dimensions(), (1080, 1080));
        assert_eq!(AspectRatio::Portrait.dimensions(), (1080, 1350));
        assert_eq!(AspectRatio::Story.dimensions(), (1080, 1920));
        assert_eq!(AspectRatio::Landscape.dimensions(), (1200, 675));
        assert_eq!(AspectRatio::Wide.dimensions(), (1200, 627));
    }
}
