use serde::{Deserialize, Serialize};

use crate::{
    graphics::{Argb, Surface},
    math::{distance, Cplx},
};

/// Radius below which a shrinking bubble starts growing again.
pub const MIN_RADIUS: f32 = 2.0;

/// How a bubble's radius turns around.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum GrowthPolicy {
    /// Reverses at `MIN_RADIUS` and at the bubble's own `max_radius`.
    #[default]
    Bounded,
    /// Reverses only after dipping below `MIN_RADIUS`.
    Unbounded,
}

#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Bubble {
    pos: Cplx,
    radius: f32,
    max_radius: f32,
    growth_velocity: f32,
    color: Argb,
    active: bool,
}

impl Bubble {
    pub fn new(pos: Cplx, radius: f32, max_radius: f32, growth_velocity: f32, color: Argb) -> Self {
        Self {
            pos,
            radius,
            max_radius,
            growth_velocity,
            color,
            active: false,
        }
    }

    pub fn pos(&self) -> Cplx {
        self.pos
    }

    pub fn radius(&self) -> f32 {
        self.radius
    }

    #[cfg(test)]
    pub fn max_radius(&self) -> f32 {
        self.max_radius
    }

    pub fn growth_velocity(&self) -> f32 {
        self.growth_velocity
    }

    pub fn reverse_growth(&mut self) {
        self.growth_velocity = -self.growth_velocity;
    }

    pub fn color(&self) -> Argb {
        self.color
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    /// Returns false when the bubble was skipped because its geometry is
    /// not drawable.
    pub fn draw<S: Surface + ?Sized>(&self, surface: &mut S) -> bool {
        if !self.pos.is_finite() || !self.radius.is_finite() || self.radius < 0.0 {
            return false;
        }

        surface.fill_circle(self.pos, self.radius, self.color);
        true
    }

    pub fn move_by(&mut self, dx: f32, dy: f32) {
        self.pos += Cplx::new(dx, dy);
    }

    pub fn update(&mut self, policy: GrowthPolicy) {
        match policy {
            GrowthPolicy::Unbounded => {
                self.radius += self.growth_velocity;

                if self.radius < MIN_RADIUS {
                    self.reverse_growth();
                }
            }

            GrowthPolicy::Bounded => {
                let speed = self.growth_velocity.abs();

                // Turn before stepping so the radius never leaves
                // [MIN_RADIUS, max_radius).
                if self.radius + speed >= self.max_radius {
                    self.growth_velocity = -speed;
                } else if self.radius - speed < MIN_RADIUS {
                    self.growth_velocity = speed;
                }

                self.radius += self.growth_velocity;
            }
        }
    }

    /// Boundary inclusive.
    pub fn is_clicked(&self, px: f32, py: f32) -> bool {
        distance(Cplx::new(px, py), self.pos) <= self.radius
    }

    pub fn press(&mut self) {
        self.active = true;
    }

    pub fn release(&mut self) {
        self.active = false;
    }
}
