use super::{blend::Mixer, Argb, P2};
use crate::math::Cplx;

pub fn draw_rect_by(
    canvas: &mut [Argb],
    cwidth: usize,
    cheight: usize,
    ps: P2,
    pe: P2,
    c: Argb,
    b: Mixer,
) {
    let xs = ps.x.clamp(0, cwidth as i32) as usize;
    let ys = ps.y.clamp(0, cheight as i32) as usize;
    let xe = pe.x.clamp(0, cwidth as i32) as usize;
    let ye = pe.y.clamp(0, cheight as i32) as usize;

    if xs >= xe || ys >= ye {
        return;
    }

    for line in canvas.chunks_exact_mut(cwidth).skip(ys).take(ye - ys) {
        draw_span_by(line, xs, xe, c, b);
    }
}

fn draw_span_by(line: &mut [Argb], xs: usize, xe: usize, c: Argb, b: Mixer) {
    if let Some(chunk) = line.get_mut(xs..xe) {
        for p in chunk {
            *p = b(*p, c);
        }
    }
}

/// Scanline fill of a circle. A pixel is covered when its centre lies
/// inside the circle, and every covered pixel is blended exactly once.
pub fn draw_circle_by(
    canvas: &mut [Argb],
    cwidth: usize,
    cheight: usize,
    center: Cplx,
    radius: f32,
    c: Argb,
    b: Mixer,
) {
    if radius.is_nan() || radius <= 0.0 || !radius.is_finite() || !center.is_finite() {
        return;
    }

    let r2 = radius * radius;

    let ys = ((center.y - radius - 0.5).ceil() as i64).max(0);
    let ye = ((center.y + radius - 0.5).floor() as i64).min(cheight as i64 - 1);

    for y in ys..=ye {
        let dy = y as f32 + 0.5 - center.y;
        let rem = r2 - dy * dy;

        if rem < 0.0 {
            continue;
        }

        let half = rem.sqrt();

        let xs = ((center.x - half - 0.5).ceil() as i64).max(0);
        let xe = ((center.x + half - 0.5).floor() as i64 + 1).min(cwidth as i64);

        if xs >= xe {
            continue;
        }

        let start = y as usize * cwidth;
        let line = &mut canvas[start..start + cwidth];
        draw_span_by(line, xs as usize, xe as usize, c, b);
    }
}
