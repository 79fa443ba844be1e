use std::{path::PathBuf, str::FromStr};

use clap::Parser;
use tracing::warn;

use crate::{
    config::{Config, Variant},
    error::Result,
    scene::Placement,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Size {
    pub width: u32,
    pub height: u32,
}

impl FromStr for Size {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let (w, h) = s
            .split_once('x')
            .ok_or_else(|| format!("expected WIDTHxHEIGHT, got {s:?}"))?;

        let parse = |v: &str| {
            v.trim()
                .parse::<u32>()
                .map_err(|e| format!("invalid dimension {v:?}: {e}"))
        };

        let size = Size {
            width: parse(w)?,
            height: parse(h)?,
        };

        if size.width == 0 || size.height == 0 {
            return Err("size must be larger than 0x0".into());
        }

        Ok(size)
    }
}

#[derive(Parser, Debug)]
#[command(author, version, about = "Pulsing, draggable bubbles", long_about = None)]
pub struct Args {
    /// RON config file; fields left out keep their defaults.
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Start from a built-in preset instead of the defaults.
    #[arg(long, value_enum)]
    pub variant: Option<Variant>,

    #[arg(long)]
    pub seed: Option<u64>,

    #[arg(long)]
    pub count: Option<usize>,

    /// Window size, e.g. 800x600.
    #[arg(long)]
    pub size: Option<Size>,

    #[arg(long)]
    pub fps: Option<f32>,

    /// Reverse the growth of overlapping bubbles every frame.
    #[arg(long)]
    pub collisions: bool,

    /// Leave out self pairs from the collision pass.
    #[arg(long)]
    pub no_self_pairs: bool,

    /// Keep whole bubbles inside the window when placing them.
    #[arg(long)]
    pub diameter_inset: bool,
}

impl Args {
    /// Config file (or preset), then command line overrides.
    pub fn resolve(&self) -> Result<Config> {
        let mut cfg = match (&self.config, self.variant) {
            (Some(path), variant) => {
                if variant.is_some() {
                    warn!("--variant is ignored when --config is given");
                }
                Config::load_from_file(path)?
            }
            (None, Some(variant)) => Config::preset(variant),
            (None, None) => Config::default(),
        };

        if let Some(seed) = self.seed {
            cfg.seed = Some(seed);
        }

        if let Some(count) = self.count {
            cfg.bubbles.count = count;
        }

        if let Some(Size { width, height }) = self.size {
            cfg.window.width = width;
            cfg.window.height = height;
        }

        if let Some(fps) = self.fps {
            cfg.window.fps = fps;
        }

        if self.collisions {
            cfg.collisions.enabled = true;
        }

        if self.no_self_pairs {
            cfg.collisions.include_self_pairs = false;
        }

        if self.diameter_inset {
            cfg.bubbles.placement = Placement::DiameterInset;
        }

        Ok(cfg)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scene::GrowthPolicy;
    use std::io::Write;

    fn parse(args: &[&str]) -> Args {
        Args::try_parse_from(std::iter::once("bubbles").chain(args.iter().copied()))
            .expect("args")
    }

    #[test]
    fn no_args_gives_defaults() {
        assert_eq!(parse(&[]).resolve().unwrap(), Config::default());
    }

    #[test]
    fn variant_selects_preset() {
        let cfg = parse(&["--variant", "classic"]).resolve().unwrap();
        assert_eq!(cfg, Config::preset(Variant::Classic));
        assert_eq!(cfg.bubbles.growth, GrowthPolicy::Unbounded);
    }

    #[test]
    fn overrides_apply_on_top() {
        let cfg = parse(&[
            "--seed",
            "42",
            "--count",
            "3",
            "--size",
            "640x480",
            "--fps",
            "30",
            "--collisions",
            "--no-self-pairs",
            "--diameter-inset",
        ])
        .resolve()
        .unwrap();

        assert_eq!(cfg.seed, Some(42));
        assert_eq!(cfg.bubbles.count, 3);
        assert_eq!((cfg.window.width, cfg.window.height), (640, 480));
        assert_eq!(cfg.window.fps, 30.0);
        assert!(cfg.collisions.enabled);
        assert!(!cfg.collisions.include_self_pairs);
        assert_eq!(cfg.bubbles.placement, Placement::DiameterInset);
    }

    #[test]
    fn config_file_is_loaded() {
        let mut f = tempfile::NamedTempFile::new().unwrap();
        f.write_all(b"(bubbles: (count: 2), seed: Some(5))").unwrap();

        let path = f.path().to_str().unwrap();
        let cfg = parse(&["--config", path, "--count", "4"]).resolve().unwrap();

        assert_eq!(cfg.seed, Some(5));
        assert_eq!(cfg.bubbles.count, 4);
    }

    #[test]
    fn bad_sizes_are_rejected() {
        assert!("800".parse::<Size>().is_err());
        assert!("0x600".parse::<Size>().is_err());
        assert!("axb".parse::<Size>().is_err());
        assert_eq!(
            "1024x768".parse::<Size>(),
            Ok(Size {
                width: 1024,
                height: 768
            })
        );
        assert!(Args::try_parse_from(["bubbles", "--size", "wide"]).is_err());
    }
}
