pub mod blend;
pub mod draw;

use crate::math::{Cplx, Vec2};

pub use blend::Argb;

pub type P2 = Vec2<i32>;

pub(crate) trait Pixel: Copy + Clone + Sized + std::fmt::Debug {
    fn black() -> Self;
    fn white() -> Self;
    fn trans() -> Self;

    fn mix(self, other: Self) -> Self;

    fn set_alpha(self, alpha: u8) -> Self;

    fn decompose(self) -> [u8; 4];
    fn compose(array: [u8; 4]) -> Self;
}

/// The drawing contract the animation paints through.
///
/// Implementations only ever get written to; nothing reads pixels back
/// during a frame.
pub trait Surface {
    fn size(&self) -> (usize, usize);

    /// Blends `color` over the rectangle starting at `(x, y)`.
    fn fill_rect(&mut self, x: i32, y: i32, w: usize, h: usize, color: Argb);

    /// Blends `color` over a filled circle.
    fn fill_circle(&mut self, center: Cplx, radius: f32, color: Argb);

    /// Blends `color` over the whole surface.
    fn fill(&mut self, color: Argb) {
        let (w, h) = self.size();
        self.fill_rect(0, 0, w, h, color);
    }
}

/// Software pixel buffer the bubbles are painted into.
pub struct Canvas {
    buffer: Vec<Argb>,
    width: usize,
    height: usize,
}

impl Canvas {
    pub fn new(w: usize, h: usize) -> Self {
        Self {
            buffer: vec![Argb::black(); w * h],
            width: w,
            height: h,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }

    /// Resizing wipes the buffer to black.
    pub fn resize(&mut self, w: usize, h: usize) {
        self.width = w;
        self.height = h;
        self.buffer.clear();
        self.buffer.resize(w * h, Argb::black());
    }

    // Softbuffer wants 0RGB words, so the alpha byte is dropped. The
    // destination may be wider than the canvas (e.g. after a resize that
    // has not reached us yet); extra columns and rows are left alone.
    pub fn present_to(&self, dest: &mut [u32], dest_width: usize) {
        if self.is_empty() || dest_width == 0 {
            return;
        }

        self.buffer
            .chunks_exact(self.width)
            .zip(dest.chunks_mut(dest_width))
            .for_each(|(src_row, dst_row)| {
                src_row
                    .iter()
                    .zip(dst_row.iter_mut())
                    .for_each(|(src, dst)| *dst = src & 0x00_FF_FF_FF);
            });
    }
}

#[cfg(test)]
impl Canvas {
    pub fn pixel(&self, x: usize, y: usize) -> Option<Argb> {
        if x >= self.width {
            return None;
        }
        self.buffer.get(y * self.width + x).copied()
    }

    pub fn as_slice(&self) -> &[Argb] {
        &self.buffer
    }
}

impl Surface for Canvas {
    fn size(&self) -> (usize, usize) {
        (self.width, self.height)
    }

    fn fill_rect(&mut self, x: i32, y: i32, w: usize, h: usize, color: Argb) {
        let ps = P2::new(x, y);
        let pe = P2::new(
            x.saturating_add(w.min(i32::MAX as usize) as i32),
            y.saturating_add(h.min(i32::MAX as usize) as i32),
        );
        draw::draw_rect_by(
            &mut self.buffer,
            self.width,
            self.height,
            ps,
            pe,
            color,
            Argb::mix,
        );
    }

    fn fill_circle(&mut self, center: Cplx, radius: f32, color: Argb) {
        draw::draw_circle_by(
            &mut self.buffer,
            self.width,
            self.height,
            center,
            radius,
            color,
            Argb::mix,
        );
    }
}
