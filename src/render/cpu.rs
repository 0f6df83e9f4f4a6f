use std::sync::Arc;

use vello_cpu::peniko::color::PremulRgba8;

use crate::{
    foundation::core::{Affine, BezPath},
    foundation::error::{TableauError, TableauResult},
};

pub(crate) fn surface_dims(width: u32, height: u32) -> TableauResult<(u16, u16)> {
    let w: u16 = width
        .try_into()
        .map_err(|_| TableauError::render("surface width exceeds u16"))?;
    let h: u16 = height
        .try_into()
        .map_err(|_| TableauError::render("surface height exceeds u16"))?;
    if w == 0 || h == 0 {
        return Err(TableauError::render("surface dimensions must be > 0"));
    }
    Ok((w, h))
}

pub(crate) fn new_context(width: u32, height: u32) -> TableauResult<vello_cpu::RenderContext> {
    let (w, h) = surface_dims(width, height)?;
    let mut ctx = vello_cpu::RenderContext::new(w, h);
    ctx.reset();
    ctx.set_blend_mode(vello_cpu::peniko::BlendMode::default());
    ctx.set_paint_transform(vello_cpu::kurbo::Affine::IDENTITY);
    Ok(ctx)
}

/// Flush `ctx` and read its premultiplied RGBA8 pixels back.
pub(crate) fn finish_context(
    mut ctx: vello_cpu::RenderContext,
    width: u32,
    height: u32,
) -> TableauResult<Vec<u8>> {
    let (w, h) = surface_dims(width, height)?;
    let mut pixmap = vello_cpu::Pixmap::new(w, h);
    ctx.flush();
    ctx.render_to_pixmap(&mut pixmap);
    Ok(pixmap.data_as_u8_slice().to_vec())
}

/// Draw a premultiplied source buffer into a fresh `dst_w x dst_h` surface under `transform`.
pub(crate) fn resample_premul(
    src: &[u8],
    src_w: u32,
    src_h: u32,
    transform: Affine,
    dst_w: u32,
    dst_h: u32,
) -> TableauResult<Vec<u8>> {
    let pixmap = pixmap_from_premul_bytes(src, src_w, src_h)?;
    let paint = vello_cpu::Image {
        image: vello_cpu::ImageSource::Pixmap(Arc::new(pixmap)),
        sampler: vello_cpu::peniko::ImageSampler::default(),
    };
    let mut ctx = new_context(dst_w, dst_h)?;
    ctx.set_transform(affine_to_cpu(transform));
    ctx.set_paint(paint);
    ctx.fill_rect(&vello_cpu::kurbo::Rect::new(
        0.0,
        0.0,
        f64::from(src_w),
        f64::from(src_h),
    ));
    finish_context(ctx, dst_w, dst_h)
}

pub(crate) fn straight_color(rgba: [u8; 4]) -> vello_cpu::peniko::Color {
    vello_cpu::peniko::Color::from_rgba8(rgba[0], rgba[1], rgba[2], rgba[3])
}

pub(crate) fn affine_to_cpu(a: Affine) -> vello_cpu::kurbo::Affine {
    vello_cpu::kurbo::Affine::new(a.as_coeffs())
}

pub(crate) fn bezpath_to_cpu(path: &BezPath) -> vello_cpu::kurbo::BezPath {
    use kurbo::PathEl;

    let mut out = vello_cpu::kurbo::BezPath::new();
    for &el in path.elements() {
        match el {
            PathEl::MoveTo(p) => out.move_to(vello_cpu::kurbo::Point::new(p.x, p.y)),
            PathEl::LineTo(p) => out.line_to(vello_cpu::kurbo::Point::new(p.x, p.y)),
            PathEl::QuadTo(p1, p2) => out.quad_to(
                vello_cpu::kurbo::Point::new(p1.x, p1.y),
                vello_cpu::kurbo::Point::new(p2.x, p2.y),
            ),
            PathEl::CurveTo(p1, p2, p3) => out.curve_to(
                vello_cpu::kurbo::Point::new(p1.x, p1.y),
                vello_cpu::kurbo::Point::new(p2.x, p2.y),
                vello_cpu::kurbo::Point::new(p3.x, p3.y),
            ),
            PathEl::ClosePath => out.close_path(),
        }
    }
    out
}

fn pixmap_from_premul_bytes(
    bytes: &[u8],
    width: u32,
    height: u32,
) -> TableauResult<vello_cpu::Pixmap> {
    let (w, h) = surface_dims(width, height)?;
    if bytes.len()
        != (width as usize)
            .saturating_mul(height as usize)
            .saturating_mul(4)
    {
        return Err(TableauError::render("pixmap byte len mismatch"));
    }
    // Pixmap stores PremulRgba8; our bytes are already premultiplied.
    let pixels: Vec<PremulRgba8> = bytes
        .chunks_exact(4)
        .map(|px| PremulRgba8::from_u8_array([px[0], px[1], px[2], px[3]]))
        .collect();
    Ok(vello_cpu::Pixmap::from_parts_with_opacity(pixels, w, h, true))
}
