use std::sync::Arc;

use anyhow::Context;

use crate::foundation::{
    error::{PlakatError, PlakatResult},
    math::mul_div255_u8,
};

/// Decoded raster in premultiplied RGBA8 form, ready for the paint surface.
#[derive(Clone, Debug)]
pub struct PreparedImage {
    pub width: u32,
    pub height: u32,
    /// Pixel bytes in row-major premultiplied RGBA8.
    pub rgba8_premul: Arc<Vec<u8>>,
}

/// Decode encoded image bytes and convert to premultiplied RGBA8.
pub fn decode_image(bytes: &[u8]) -> PlakatResult<PreparedImage> {
    let dyn_img = image::load_from_memory(bytes)
        .context("decode image from memory")
        .map_err(|e| PlakatError::asset(format!("{e:#}")))?;
    let rgba = dyn_img.to_rgba8();
    let (width, height) = rgba.dimensions();

    let mut rgba8_premul = rgba.into_raw();
    premultiply_rgba8_in_place(&mut rgba8_premul);

    Ok(PreparedImage {
        width,
        height,
        rgba8_premul: Arc::new(rgba8_premul),
    })
}

/// Parse SVG bytes into a `usvg` tree.
pub fn parse_svg(bytes: &[u8]) -> PlakatResult<usvg::Tree> {
    let opts = usvg::Options::default();
    usvg::Tree::from_data(bytes, &opts)
        .context("parse svg tree")
        .map_err(|e| PlakatError::asset(format!("{e:#}")))
}

/// Rasterize an SVG tree at the given pixel size.
///
/// The output is premultiplied RGBA8 (tiny-skia's native pixel format).
pub fn rasterize_svg(tree: &usvg::Tree, width: u32, height: u32) -> PlakatResult<PreparedImage> {
    if width == 0 || height == 0 {
        return Err(PlakatError::asset("svg raster size must be non-zero"));
    }
    let mut pixmap = resvg::tiny_skia::Pixmap::new(width, height)
        .ok_or_else(|| PlakatError::asset("failed to allocate svg pixmap"))?;

    let sx = (width as f32) / tree.size().width();
    let sy = (height as f32) / tree.size().height();
    let xform = resvg::tiny_skia::Transform::from_scale(sx, sy);

    resvg::render(tree, xform, &mut pixmap.as_mut());
    Ok(PreparedImage {
        width,
        height,
        rgba8_premul: Arc::new(pixmap.data().to_vec()),
    })
}

/// Extract a centered sub-rectangle of a prepared image.
///
/// Used by the cover-fit image layer: the crop is sized so that scaling it
/// to the destination zone fills the zone exactly, with overflow discarded
/// symmetrically.
pub fn center_crop(src: &PreparedImage, crop_w: u32, crop_h: u32) -> PreparedImage {
    let crop_w = crop_w.clamp(1, src.width);
    let crop_h = crop_h.clamp(1, src.height);
    if crop_w == src.width && crop_h == src.height {
        return src.clone();
    }

    let x0 = ((src.width - crop_w) / 2) as usize;
    let y0 = ((src.height - crop_h) / 2) as usize;
    let src_stride = src.width as usize * 4;
    let row_bytes = crop_w as usize * 4;

    let mut out = Vec::with_capacity(row_bytes * crop_h as usize);
    for row in 0..crop_h as usize {
        let start = (y0 + row) * src_stride + x0 * 4;
        out.extend_from_slice(&src.rgba8_premul[start..start + row_bytes]);
    }

    PreparedImage {
        width: crop_w,
        height: crop_h,
        rgba8_premul: Arc::new(out),
    }
}

fn premultiply_rgba8_in_place(rgba: &mut [u8]) {
    for px in rgba.chunks_exact_mut(4) {
        let a = u16::from(px[3]);
        if a == 0 {
            px[0] = 0;
            px[1] = 0;
            px[2] = 0;
            continue;
        }
        px[0] = mul_div255_u8(u16::from(px[0]), a);
        px[1] = mul_div255_u8(u16::from(px[1]), a);
        px[2] = mul_div255_u8(u16::from(px[2]), a);
    }
}
