/// Convenience result type used across plakat.
pub type PlakatResult<T> = Result<T, PlakatError>;

/// Top-level error taxonomy used by engine APIs.
///
/// Asset-level failures (unreadable logo or font files) are handled locally
/// by the layer that hit them and never surface here; everything that does
/// surface fails the render call it belongs to.
#[derive(thiserror::Error, Debug)]
pub enum PlakatError {
    /// Invalid or incomplete brand visual configuration.
    #[error("config error: {0}")]
    Config(String),

    /// A declared asset could not be read or decoded.
    #[error("asset error: {0}")]
    Asset(String),

    /// A layout name outside the known set reached the layout engine.
    #[error("layout error: {0}")]
    Layout(String),

    /// Final raster encoding failed.
    #[error("encode error: {0}")]
    Encode(String),

    /// Wrapped lower-level error from dependencies or IO.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl PlakatError {
    /// Build a [`PlakatError::Config`] value.
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Build a [`PlakatError::Asset`] value.
    pub fn asset(msg: impl Into<String>) -> Self {
        Self::Asset(msg.into())
    }

    /// Build a [`PlakatError::Layout`] value.
    pub fn layout(msg: impl Into<String>) -> Self {
        Self::Layout(msg.into())
    }

    /// Build a [`PlakatError::Encode`] value.
    pub fn encode(msg: impl Into<String>) -> Self {
        Self::Encode(msg.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn constructors_map_to_variants() {
        assert!(matches!(PlakatError::config("x"), PlakatError::Config(_)));
        assert!(matches!(PlakatError::asset("x"), PlakatError::Asset(_)));
        assert!(matches!(PlakatError::layout("x"), PlakatError::Layout(_)));
        assert!(matches!(PlakatError::encode("x"), PlakatError::Encode(_)));
    }

    #[test]
    fn display_includes_taxonomy_prefix() {
        let e = PlakatError::layout("unknown layout 'hero'");
        assert_eq!(e.to_string(), "layout error: unknown layout 'hero'");
    }
}
