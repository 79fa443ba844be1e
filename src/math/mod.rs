pub mod vec2;

#[derive(Debug, Copy, Clone, Default, PartialEq)]
pub struct Vec2<T> {
    pub x: T,
    pub y: T,
}

pub type Cplx = Vec2<f32>;

/// Euclidean distance between two points.
pub fn distance(a: Cplx, b: Cplx) -> f32 {
    (a - b).mag()
}
