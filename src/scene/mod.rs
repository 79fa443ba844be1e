pub mod bubble;
pub mod palette;
pub mod world;

pub use bubble::GrowthPolicy;
pub use palette::Palette;
pub use world::{Placement, World};
