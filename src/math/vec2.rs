use std::ops::{Add, AddAssign, Sub};

use super::Vec2;

impl<T> Add for Vec2<T>
where
    T: Add<Output = T> + Copy,
{
    type Output = Vec2<T>;
    fn add(self, other: Vec2<T>) -> Vec2<T> {
        Vec2::<T> {
            x: self.x + other.x,
            y: self.y + other.y,
        }
    }
}

impl<T> AddAssign for Vec2<T>
where
    T: AddAssign + Copy,
{
    fn add_assign(&mut self, other: Vec2<T>) {
        self.x += other.x;
        self.y += other.y;
    }
}

impl<T> Sub for Vec2<T>
where
    T: Sub<Output = T> + Copy,
{
    type Output = Vec2<T>;
    fn sub(self, other: Vec2<T>) -> Vec2<T> {
        Vec2::<T> {
            x: self.x - other.x,
            y: self.y - other.y,
        }
    }
}

impl Vec2<f32> {
    pub const fn new(x: f32, y: f32) -> Vec2<f32> {
        Vec2::<f32> { x, y }
    }

    pub fn mag(self) -> f32 {
        self.x.hypot(self.y)
    }

    pub fn is_finite(self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }
}

impl Vec2<i32> {
    pub const fn new(x: i32, y: i32) -> Vec2<i32> {
        Vec2::<i32> { x, y }
    }
}

#[cfg(test)]
mod tests {
    use super::super::{distance, Cplx};

    #[test]
    fn distance_is_hypot() {
        let a = Cplx::new(1.0, 1.0);
        let b = Cplx::new(4.0, 5.0);
        assert_eq!(distance(a, b), 5.0);
        assert_eq!(distance(b, a), 5.0);
    }

    #[test]
    fn add_assign_accumulates() {
        let mut p = Cplx::new(1.0, 2.0);
        p += Cplx::new(0.5, -2.0);
        assert_eq!(p, Cplx::new(1.5, 0.0));
    }

    #[test]
    fn non_finite_detected() {
        assert!(Cplx::new(0.0, 3.0).is_finite());
        assert!(!Cplx::new(f32::NAN, 0.0).is_finite());
        assert!(!Cplx::new(0.0, f32::INFINITY).is_finite());
    }
}
