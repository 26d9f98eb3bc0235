use crate::{
    assets::{decode::PreparedImage, fonts::FontHandle},
    foundation::{
        error::PlakatResult,
        geom::{PixelZone, Rgba8},
    },
};

/// One composed frame in row-major RGBA8.
#[derive(Clone, Debug)]
pub struct FrameRgba {
    pub width: u32,
    pub height: u32,
    pub data: Vec<u8>,
    pub premultiplied: bool,
}

/// Styling for a single measured/painted text line.
#[derive(Clone, Debug)]
pub struct TextStyle {
    pub font: FontHandle,
    pub size_px: f32,
    pub weight: u16,
    pub color: Rgba8,
}

/// Minimal drawing-surface capability the four layers paint against.
///
/// Keeping the layer code behind this seam means the zone math never has to
/// change when the concrete rasterizer does.
pub trait Surface {
    fn width(&self) -> u32;
    fn height(&self) -> u32;

    fn fill_rect(&mut self, zone: PixelZone, color: Rgba8);

    /// Vertical alpha ramp of `color` from `alpha_top` at the zone's top edge
    /// to `alpha_bottom` at its bottom edge.
    fn fill_vertical_gradient(
        &mut self,
        zone: PixelZone,
        color: Rgba8,
        alpha_top: f32,
        alpha_bottom: f32,
    );

    /// Paint `image` scaled to exactly cover `dest`, modulated by `alpha`.
    fn draw_image(&mut self, image: &PreparedImage, dest: PixelZone, alpha: f32)
    -> PlakatResult<()>;

    /// Advance width of `text` laid out as one unwrapped line.
    fn measure_text(&mut self, text: &str, style: &TextStyle) -> PlakatResult<f32>;

    /// Paint `text` as one line with its line-box origin at `(x, y)`.
    fn fill_text(&mut self, text: &str, x: f32, y: f32, style: &TextStyle) -> PlakatResult<()>;
}
