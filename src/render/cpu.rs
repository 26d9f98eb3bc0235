use std::{borrow::Cow, collections::HashMap, sync::Arc};

use crate::{
    assets::{decode::PreparedImage, fonts::FontHandle},
    foundation::{
        error::{PlakatError, PlakatResult},
        geom::{PixelZone, Rgba8},
    },
    render::surface::{FrameRgba, Surface, TextStyle},
};

/// CPU raster surface backed by a `vello_cpu` render context.
pub struct CpuSurface {
    width: u32,
    height: u32,
    ctx: vello_cpu::RenderContext,
    typesetter: TypeSetter,
}

impl CpuSurface {
    pub fn new(width: u32, height: u32) -> PlakatResult<Self> {
        let w: u16 = width
            .try_into()
            .map_err(|_| PlakatError::config("canvas width exceeds u16"))?;
        let h: u16 = height
            .try_into()
            .map_err(|_| PlakatError::config("canvas height exceeds u16"))?;
        if w == 0 || h == 0 {
            return Err(PlakatError::config("canvas dimensions must be non-zero"));
        }

        Ok(Self {
            width,
            height,
            ctx: vello_cpu::RenderContext::new(w, h),
            typesetter: TypeSetter::new(),
        })
    }

    /// Flush all queued paint ops and read the frame back.
    pub fn into_frame(mut self) -> PlakatResult<FrameRgba> {
        let w = self.width as u16;
        let h = self.height as u16;
        let mut pixmap = vello_cpu::Pixmap::new(w, h);
        self.ctx.flush();
        self.ctx.render_to_pixmap(&mut pixmap);
        Ok(FrameRgba {
            width: self.width,
            height: self.height,
            data: pixmap.data_as_u8_slice().to_vec(),
            premultiplied: true,
        })
    }

    fn zone_rect(zone: PixelZone) -> vello_cpu::kurbo::Rect {
        vello_cpu::kurbo::Rect::new(
            f64::from(zone.x),
            f64::from(zone.y),
            f64::from(zone.right()),
            f64::from(zone.bottom()),
        )
    }
}

impl Surface for CpuSurface {
    fn width(&self) -> u32 {
        self.width
    }

    fn height(&self) -> u32 {
        self.height
    }

    fn fill_rect(&mut self, zone: PixelZone, color: Rgba8) {
        if zone.is_empty() || color.a == 0 {
            return;
        }
        self.ctx.set_transform(vello_cpu::kurbo::Affine::IDENTITY);
        self.ctx.set_paint(vello_cpu::peniko::Color::from_rgba8(
            color.r, color.g, color.b, color.a,
        ));
        self.ctx.fill_rect(&Self::zone_rect(zone));
    }

    fn fill_vertical_gradient(
        &mut self,
        zone: PixelZone,
        color: Rgba8,
        alpha_top: f32,
        alpha_bottom: f32,
    ) {
        if zone.is_empty() {
            return;
        }
        self.ctx.set_transform(vello_cpu::kurbo::Affine::IDENTITY);
        let denom = zone.height.saturating_sub(1).max(1) as f32;
        for row in 0..zone.height {
            let t = row as f32 / denom;
            let alpha = alpha_top + (alpha_bottom - alpha_top) * t;
            let a8 = (alpha.clamp(0.0, 1.0) * f32::from(color.a)).round() as u8;
            if a8 == 0 {
                continue;
            }
            self.ctx.set_paint(vello_cpu::peniko::Color::from_rgba8(
                color.r, color.g, color.b, a8,
            ));
            self.ctx.fill_rect(&vello_cpu::kurbo::Rect::new(
                f64::from(zone.x),
                f64::from(zone.y + row),
                f64::from(zone.right()),
                f64::from(zone.y + row + 1),
            ));
        }
    }

    fn draw_image(
        &mut self,
        image: &PreparedImage,
        dest: PixelZone,
        alpha: f32,
    ) -> PlakatResult<()> {
        if dest.is_empty() || alpha <= 0.0 {
            return Ok(());
        }
        let pixmap = premul_bytes_to_pixmap(&image.rgba8_premul, image.width, image.height)?;
        let paint = vello_cpu::Image {
            image: vello_cpu::ImageSource::Pixmap(Arc::new(pixmap)),
            sampler: vello_cpu::peniko::ImageSampler::default(),
        };

        let sx = f64::from(dest.width) / f64::from(image.width);
        let sy = f64::from(dest.height) / f64::from(image.height);
        self.ctx.set_transform(
            vello_cpu::kurbo::Affine::translate((f64::from(dest.x), f64::from(dest.y)))
                * vello_cpu::kurbo::Affine::scale_non_uniform(sx, sy),
        );
        self.ctx.set_paint(paint);

        let opacity = alpha.min(1.0);
        if opacity < 1.0 {
            self.ctx.push_opacity_layer(opacity);
        }
        self.ctx.fill_rect(&vello_cpu::kurbo::Rect::new(
            0.0,
            0.0,
            f64::from(image.width),
            f64::from(image.height),
        ));
        if opacity < 1.0 {
            self.ctx.pop_layer();
        }
        Ok(())
    }

    fn measure_text(&mut self, text: &str, style: &TextStyle) -> PlakatResult<f32> {
        let layout = self.typesetter.layout_line(text, style)?;
        let mut width = 0.0f32;
        for line in layout.lines() {
            width = width.max(line.metrics().advance);
        }
        Ok(width)
    }

    fn fill_text(&mut self, text: &str, x: f32, y: f32, style: &TextStyle) -> PlakatResult<()> {
        let layout = self.typesetter.layout_line(text, style)?;
        let font = vello_cpu::peniko::FontData::new(
            vello_cpu::peniko::Blob::from(style.font.bytes.as_ref().clone()),
            style.font.index,
        );

        self.ctx
            .set_transform(vello_cpu::kurbo::Affine::translate((
                f64::from(x),
                f64::from(y),
            )));
        for line in layout.lines() {
            for item in line.items() {
                let parley::layout::PositionedLayoutItem::GlyphRun(run) = item else {
                    continue;
                };

                let brush = run.style().brush;
                self.ctx.set_paint(vello_cpu::peniko::Color::from_rgba8(
                    brush.r, brush.g, brush.b, brush.a,
                ));

                let glyphs = run.glyphs().map(|g| vello_cpu::Glyph {
                    id: g.id,
                    x: g.x,
                    y: g.y,
                });
                self.ctx
                    .glyph_run(&font)
                    .font_size(run.run().font_size())
                    .fill_glyphs(glyphs);
            }
        }
        Ok(())
    }
}

/// RGBA8 brush color carried through Parley text layouts.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub(crate) struct TextBrushRgba8 {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

/// Builds and measures Parley layouts from raw font bytes.
///
/// Font registrations into the Parley collection are cached per byte blob so
/// repeated measurement during word wrapping registers each font once.
struct TypeSetter {
    font_ctx: parley::FontContext,
    layout_ctx: parley::LayoutContext<TextBrushRgba8>,
    families: HashMap<usize, String>,
}

impl TypeSetter {
    fn new() -> Self {
        Self {
            font_ctx: parley::FontContext::default(),
            layout_ctx: parley::LayoutContext::new(),
            families: HashMap::new(),
        }
    }

    fn family_for(&mut self, font: &FontHandle) -> PlakatResult<String> {
        let key = Arc::as_ptr(&font.bytes) as *const u8 as usize;
        if let Some(name) = self.families.get(&key) {
            return Ok(name.clone());
        }

        let families = self.font_ctx.collection.register_fonts(
            parley::fontique::Blob::from(font.bytes.as_ref().clone()),
            None,
        );
        let family_id = families
            .first()
            .map(|(id, _)| *id)
            .ok_or_else(|| PlakatError::asset("no font families registered from font bytes"))?;
        let name = self
            .font_ctx
            .collection
            .family_name(family_id)
            .ok_or_else(|| PlakatError::asset("registered font family has no name"))?
            .to_string();

        self.families.insert(key, name.clone());
        Ok(name)
    }

    fn layout_line(
        &mut self,
        text: &str,
        style: &TextStyle,
    ) -> PlakatResult<parley::Layout<TextBrushRgba8>> {
        if !style.size_px.is_finite() || style.size_px <= 0.0 {
            return Err(PlakatError::config("text size must be finite and > 0"));
        }
        let family = self.family_for(&style.font)?;
        let brush = TextBrushRgba8 {
            r: style.color.r,
            g: style.color.g,
            b: style.color.b,
            a: style.color.a,
        };

        let mut builder = self
            .layout_ctx
            .ranged_builder(&mut self.font_ctx, text, 1.0, true);
        builder.push_default(parley::style::StyleProperty::FontStack(
            parley::style::FontStack::Source(Cow::Owned(family)),
        ));
        builder.push_default(parley::style::StyleProperty::FontSize(style.size_px));
        builder.push_default(parley::style::StyleProperty::FontWeight(
            parley::style::FontWeight::new(f32::from(style.weight)),
        ));
        builder.push_default(parley::style::StyleProperty::Brush(brush));

        let mut layout: parley::Layout<TextBrushRgba8> = builder.build(text);
        layout.break_all_lines(None);
        Ok(layout)
    }
}

fn premul_bytes_to_pixmap(
    rgba8_premul: &[u8],
    width: u32,
    height: u32,
) -> PlakatResult<vello_cpu::Pixmap> {
    let w: u16 = width
        .try_into()
        .map_err(|_| PlakatError::asset("image width exceeds u16"))?;
    let h: u16 = height
        .try_into()
        .map_err(|_| PlakatError::asset("image height exceeds u16"))?;
    if rgba8_premul.len() != width as usize * height as usize * 4 {
        return Err(PlakatError::asset("prepared image byte length mismatch"));
    }

    let mut may_have_opacities = false;
    let mut pixels = Vec::with_capacity(width as usize * height as usize);
    for px in rgba8_premul.chunks_exact(4) {
        let a = px[3];
        may_have_opacities |= a != 255;
        pixels.push(vello_cpu::peniko::color::PremulRgba8 {
            r: px[0],
            g: px[1],
            b: px[2],
            a,
        });
    }

    Ok(vello_cpu::Pixmap::from_parts_with_opacity(
        pixels,
        w,
        h,
        may_have_opacities,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assets::fonts::fallback_serif;

    fn pixel(frame: &FrameRgba, x: u32, y: u32) -> [u8; 4] {
        let idx = ((y * frame.width + x) * 4) as usize;
        frame.data[idx..idx + 4].try_into().unwrap()
    }

    #[test]
    fn fill_rect_paints_requested_zone_only() {
        let mut s = CpuSurface::new(8, 8).unwrap();
        s.fill_rect(PixelZone::new(0, 0, 8, 8), Rgba8::rgb(0, 0, 255));
        s.fill_rect(PixelZone::new(2, 2, 2, 2), Rgba8::rgb(255, 0, 0));
        let frame = s.into_frame().unwrap();
        assert_eq!(pixel(&frame, 3, 3), [255, 0, 0, 255]);
        assert_eq!(pixel(&frame, 6, 6), [0, 0, 255, 255]);
    }

    #[test]
    fn draw_image_covers_destination_zone() {
        let img = PreparedImage {
            width: 2,
            height: 2,
            rgba8_premul: Arc::new(vec![
                0, 255, 0, 255, 0, 255, 0, 255, 0, 255, 0, 255, 0, 255, 0, 255,
            ]),
        };
        let mut s = CpuSurface::new(8, 8).unwrap();
        s.fill_rect(PixelZone::new(0, 0, 8, 8), Rgba8::rgb(0, 0, 0));
        s.draw_image(&img, PixelZone::new(4, 4, 4, 4), 1.0).unwrap();
        let frame = s.into_frame().unwrap();
        assert_eq!(pixel(&frame, 6, 6), [0, 255, 0, 255]);
        assert_eq!(pixel(&frame, 1, 1), [0, 0, 0, 255]);
    }

    #[test]
    fn vertical_gradient_gets_denser_toward_the_bottom() {
        let mut s = CpuSurface::new(4, 64).unwrap();
        s.fill_rect(PixelZone::new(0, 0, 4, 64), Rgba8::rgb(0, 0, 0));
        s.fill_vertical_gradient(PixelZone::new(0, 0, 4, 64), Rgba8::rgb(255, 0, 0), 0.0, 1.0);
        let frame = s.into_frame().unwrap();
        assert!(pixel(&frame, 2, 62)[0] > pixel(&frame, 2, 8)[0]);
    }

    #[test]
    fn measure_text_grows_with_content() {
        let Some(font) = fallback_serif() else {
            // No system fonts in this environment; nothing to measure.
            return;
        };
        let mut s = CpuSurface::new(64, 64).unwrap();
        let style = TextStyle {
            font,
            size_px: 24.0,
            weight: 400,
            color: Rgba8::rgb(0, 0, 0),
        };
        let short = s.measure_text("hi", &style).unwrap();
        let long = s.measure_text("hi there, poster", &style).unwrap();
        assert!(long > short);
        assert!(short > 0.0);
    }

    #[test]
    fn fill_text_leaves_ink_on_the_canvas() {
        let Some(font) = fallback_serif() else {
            return;
        };
        let mut s = CpuSurface::new(128, 64).unwrap();
        s.fill_rect(PixelZone::new(0, 0, 128, 64), Rgba8::rgb(255, 255, 255));
        let style = TextStyle {
            font,
            size_px: 32.0,
            weight: 700,
            color: Rgba8::rgb(0, 0, 0),
        };
        s.fill_text("Ox", 8.0, 8.0, &style).unwrap();
        let frame = s.into_frame().unwrap();
        let any_dark = frame
            .data
            .chunks_exact(4)
            .any(|px| px[0] < 200 && px[3] == 255);
        assert!(any_dark, "expected glyph coverage to darken some pixels");
    }
}
