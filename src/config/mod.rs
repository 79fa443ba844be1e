// Every field falls back to the literal constants through `#[serde(default)]`,
// so a config file only needs to name what it overrides.

use serde::{Deserialize, Serialize};
use std::{fs, path::Path};

use crate::{
    error::{Error, Result},
    scene::{bubble::MIN_RADIUS, palette::DEFAULT_COLORS, GrowthPolicy, Placement},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum)]
pub enum Variant {
    /// Six opaque bubbles, no upper size bound, collisions on.
    Classic,
    /// Ten translucent bubbles bounded by a per-bubble max radius.
    #[default]
    Bounded,
}

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
#[serde(default)]
pub struct WindowConfig {
    pub width: u32,
    pub height: u32,
    pub title: String,
    /// Frames requested per second.
    pub fps: f32,
}
impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            width: 800,
            height: 600,
            title: "bubbles".into(),
            fps: 60.0,
        }
    }
}

#[derive(Debug, Deserialize, Serialize, Clone, Copy, PartialEq)]
#[serde(default)]
pub struct SpawnRange<T> {
    pub min: T,
    pub max: T,
}
impl<T: Default> Default for SpawnRange<T> {
    fn default() -> Self {
        Self {
            min: Default::default(),
            max: Default::default(),
        }
    }
}

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
#[serde(default)]
pub struct BubbleConfig {
    pub count: usize,
    pub initial_radius: f32,
    pub growth_velocity: SpawnRange<f32>,
    /// Only consulted by `GrowthPolicy::Bounded`.
    pub max_radius: SpawnRange<f32>,
    pub growth: GrowthPolicy,
    pub placement: Placement,
}
impl Default for BubbleConfig {
    fn default() -> Self {
        Self {
            count: 10,
            initial_radius: 50.0,
            growth_velocity: SpawnRange { min: 0.1, max: 0.6 },
            max_radius: SpawnRange {
                min: 60.0,
                max: 120.0,
            },
            growth: GrowthPolicy::Bounded,
            placement: Placement::RadiusInset,
        }
    }
}

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
#[serde(default)]
pub struct PaletteConfig {
    pub colors: Vec<String>,
    /// Applied to every palette entry.
    pub alpha: u8,
}
impl Default for PaletteConfig {
    fn default() -> Self {
        Self {
            colors: DEFAULT_COLORS.iter().map(|c| c.to_string()).collect(),
            alpha: 0xCC,
        }
    }
}

#[derive(Debug, Deserialize, Serialize, Clone, Copy, PartialEq)]
#[serde(default)]
pub struct CollisionConfig {
    pub enabled: bool,
    /// Pair every bubble with itself as well as with the others.
    pub include_self_pairs: bool,
}
impl Default for CollisionConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            include_self_pairs: true,
        }
    }
}

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
#[serde(default)]
pub struct Config {
    pub window: WindowConfig,
    pub bubbles: BubbleConfig,
    pub palette: PaletteConfig,
    /// ARGB bytes of the per-frame background wash.
    pub background: [u8; 4],
    pub collisions: CollisionConfig,
    /// Fixed RNG seed; a fresh one is drawn when absent.
    pub seed: Option<u64>,
}
impl Default for Config {
    fn default() -> Self {
        Self::preset(Variant::Bounded)
    }
}

impl Config {
    pub fn preset(variant: Variant) -> Self {
        let base = Self {
            window: WindowConfig::default(),
            bubbles: BubbleConfig::default(),
            palette: PaletteConfig::default(),
            background: [230, 20, 20, 20],
            collisions: CollisionConfig::default(),
            seed: None,
        };

        match variant {
            Variant::Bounded => base,
            Variant::Classic => Self {
                bubbles: BubbleConfig {
                    count: 6,
                    growth: GrowthPolicy::Unbounded,
                    ..base.bubbles
                },
                palette: PaletteConfig {
                    alpha: 0xFF,
                    ..base.palette
                },
                collisions: CollisionConfig {
                    enabled: true,
                    ..base.collisions
                },
                ..base
            },
        }
    }

    pub fn from_ron_str(s: &str) -> Result<Self> {
        Ok(ron::from_str(s)?)
    }

    pub fn load_from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = fs::read_to_string(path)
            .map_err(|e| Error::Config(format!("{}: read error: {e}", path.display())))?;
        ron::from_str(&text)
            .map_err(|e| Error::Config(format!("{}: parse error: {e}", path.display())))
    }

    /// Produce validation warnings (non-fatal) for suspicious values.
    pub fn validate(&self) -> Vec<String> {
        let mut w = Vec::new();
        let b = &self.bubbles;

        if b.count == 0 {
            w.push("bubbles.count is 0; nothing will be drawn".into());
        }

        if b.initial_radius < MIN_RADIUS {
            w.push(format!(
                "bubbles.initial_radius {} is below the minimum radius {MIN_RADIUS}",
                b.initial_radius
            ));
        }

        if b.growth_velocity.min < 0.0 {
            w.push("bubbles.growth_velocity.min is negative; bubbles start out shrinking".into());
        }

        if b.growth == GrowthPolicy::Bounded {
            if b.max_radius.min <= b.initial_radius {
                w.push(format!(
                    "bubbles.max_radius.min {} does not exceed initial_radius {}",
                    b.max_radius.min, b.initial_radius
                ));
            }

            let span = b.max_radius.min - MIN_RADIUS;
            if b.growth_velocity.max * 2.0 >= span {
                w.push(format!(
                    "bubbles.growth_velocity.max {} is too large for the radius span {span}",
                    b.growth_velocity.max
                ));
            }
        }

        for (label, r) in [("growth_velocity", &b.growth_velocity), ("max_radius", &b.max_radius)] {
            if r.min > r.max {
                w.push(format!("bubbles.{label} min {} > max {}", r.min, r.max));
            }
        }

        if self.palette.colors.is_empty() {
            w.push("palette.colors is empty".into());
        }

        if self.palette.alpha == 0 {
            w.push("palette.alpha is 0; bubbles are invisible".into());
        }

        if self.window.fps.is_nan() || self.window.fps <= 0.0 {
            w.push(format!("window.fps {} must be positive", self.window.fps));
        }

        if self.window.width == 0 || self.window.height == 0 {
            w.push(format!(
                "window size {}x{} is empty",
                self.window.width, self.window.height
            ));
        }

        w
    }
}
