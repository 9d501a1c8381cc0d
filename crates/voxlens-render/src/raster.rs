//! Painter's-algorithm rasteriser: depth-sort flat quads, then scan-fill them
//! into an RGBA buffer.

use glam::Vec2;

use crate::color::Rgba;

/// A projected, shaded face ready for rasterisation.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FaceQuad {
    /// Screen-space corners in winding order.
    pub points: [Vec2; 4],
    /// Mean camera-space depth of the corners; larger is farther.
    pub depth: f32,
    pub color: Rgba,
}

impl FaceQuad {
    fn is_finite(&self) -> bool {
        self.depth.is_finite() && self.points.iter().all(|p| p.is_finite())
    }
}

/// Order quads farthest first. The sort is stable, so equal depths keep
/// their input order.
pub fn sort_back_to_front(quads: &mut [FaceQuad]) {
    quads.sort_by(|a, b| b.depth.total_cmp(&a.depth));
}

/// Row-major RGBA8 pixel storage with a top-left origin.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PixelBuffer {
    width: u32,
    height: u32,
    data: Vec<u8>,
}

impl PixelBuffer {
    /// A buffer with every pixel set to `color`.
    pub fn filled(width: u32, height: u32, color: Rgba) -> Self {
        let pixels = width as usize * height as usize;
        Self {
            width,
            height,
            data: color.to_array().repeat(pixels),
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn pixel(&self, x: u32, y: u32) -> Option<Rgba> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let i = (y as usize * self.width as usize + x as usize) * 4;
        let p = &self.data[i..i + 4];
        Some(Rgba::new(p[0], p[1], p[2], p[3]))
    }

    /// Overwrite pixels `x0..=x1` of row `y`. Out-of-range pixels are clipped.
    pub fn fill_span(&mut self, y: u32, x0: u32, x1: u32, color: Rgba) {
        if y >= self.height || x0 > x1 || x0 >= self.width {
            return;
        }
        let x1 = x1.min(self.width - 1);
        let row = y as usize * self.width as usize;
        let start = (row + x0 as usize) * 4;
        let end = (row + x1 as usize + 1) * 4;
        let rgba = color.to_array();
        for px in self.data[start..end].chunks_exact_mut(4) {
            px.copy_from_slice(&rgba);
        }
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.data
    }

    pub fn into_raw(self) -> Vec<u8> {
        self.data
    }
}

/// Scan-fill one quad with its flat colour.
///
/// Rows are sampled at their centres. An edge with `y0 < y1` crosses the
/// scanline when `y0 <= scan < y1`; each pair of sorted crossings fills the
/// pixels whose centres lie between them.
pub fn fill_quad(buffer: &mut PixelBuffer, quad: &FaceQuad) {
    if !quad.is_finite() {
        return;
    }
    let (min_y, max_y) = quad
        .points
        .iter()
        .fold((f32::INFINITY, f32::NEG_INFINITY), |(lo, hi), p| {
            (lo.min(p.y), hi.max(p.y))
        });
    let first = min_y.floor().max(0.0) as u32;
    let last = max_y.ceil().min(buffer.height as f32);
    if last <= 0.0 {
        return;
    }
    let last = last as u32;
    let max_x = buffer.width as f32 - 1.0;

    for y in first..last {
        let scan = y as f32 + 0.5;
        let mut crossings = [0.0f32; 4];
        let mut count = 0;
        for i in 0..4 {
            let (mut a, mut b) = (quad.points[i], quad.points[(i + 1) % 4]);
            if a.y > b.y {
                std::mem::swap(&mut a, &mut b);
            }
            if a.y <= scan && scan < b.y {
                crossings[count] = a.x + (scan - a.y) / (b.y - a.y) * (b.x - a.x);
                count += 1;
            }
        }
        let crossings = &mut crossings[..count];
        crossings.sort_by(f32::total_cmp);

        for pair in crossings.chunks_exact(2) {
            let x0 = (pair[0] + 0.5).floor().max(0.0);
            let x1 = (pair[1] - 0.5).floor().min(max_x);
            if x0 <= x1 {
                buffer.fill_span(y, x0 as u32, x1 as u32, quad.color);
            }
        }
    }
}

/// Paint `quads` back to front over a `background`-filled buffer.
pub fn rasterize(
    mut quads: Vec<FaceQuad>,
    width: u32,
    height: u32,
    background: Rgba,
) -> PixelBuffer {
    let mut buffer = PixelBuffer::filled(width, height, background);
    sort_back_to_front(&mut quads);
    for quad in &quads {
        fill_quad(&mut buffer, quad);
    }
    buffer
}
