pub mod args;
pub mod delta;

use std::time::Duration;

use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use tracing::{debug, info, trace, warn};

use crate::{
    config::Config,
    error::Result,
    graphics::{Argb, Canvas, Pixel},
    math::Cplx,
    scene::{Palette, World},
};
use delta::FrameClock;

pub const MAX_FPS: f32 = 240.0;
pub const STATS_INTERVAL: Duration = Duration::from_secs(5);

#[derive(Debug, PartialEq, Clone, Copy)]
pub enum Command {
    CursorMoved(f32, f32),
    CursorLeft,
    PointerDown,
    PointerUp,
    Resize(u32, u32),
    Close,
}

impl Command {
    pub fn is_close_requested(&self) -> bool {
        *self == Command::Close
    }
}

/// Owns the one `World` of the session together with the canvas it is
/// painted into. Window events reach the bubbles only through here.
pub(crate) struct Program {
    config: Config,

    pub pix: Canvas,

    world: World,

    background: Argb,

    rng: ChaCha8Rng,
    seed: u64,

    clock: FrameClock,
    last_report: Duration,
    frames_since_report: u64,

    /// Last cursor position, `None` until the cursor enters the window.
    cursor: Option<Cplx>,
}

impl Program {
    pub fn new(config: Config) -> Result<Self> {
        let palette = Palette::from_hex(&config.palette.colors, config.palette.alpha)?;

        let world = World::new(config.bubbles.clone(), config.collisions, palette);

        let seed = config.seed.unwrap_or_else(rand::random);

        Ok(Self {
            pix: Canvas::new(config.window.width as usize, config.window.height as usize),
            world,
            background: Argb::compose(config.background),
            rng: ChaCha8Rng::seed_from_u64(seed),
            seed,
            clock: FrameClock::new(),
            last_report: Duration::ZERO,
            frames_since_report: 0,
            cursor: None,
            config,
        })
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn world(&self) -> &World {
        &self.world
    }

    #[cfg(test)]
    pub fn seed(&self) -> u64 {
        self.seed
    }

    pub fn print_startup_info(&self) {
        let b = &self.config.bubbles;
        info!(
            "{} bubbles, {:?} growth, {:?} placement, seed {}",
            b.count, b.growth, b.placement, self.seed
        );
        info!(
            "collisions {} (self pairs {})",
            if self.config.collisions.enabled { "on" } else { "off" },
            self.config.collisions.include_self_pairs
        );
    }

    pub fn frame_interval(&self) -> Duration {
        let fps = self.config.window.fps;
        let fps = if fps.is_finite() && fps > 0.0 {
            fps.min(MAX_FPS)
        } else {
            60.0
        };
        Duration::from_secs_f32(1.0 / fps)
    }

    /// Sizes the canvas to the viewport and creates the bubbles.
    pub fn start(&mut self, w: u32, h: u32) -> Result<()> {
        self.pix.resize(w as usize, h as usize);

        let count = self.config.bubbles.count;
        self.world
            .populate(count, &mut self.rng, (w as usize, h as usize))?;

        info!("populated {} bubbles in a {}x{} viewport", self.world.len(), w, h);
        Ok(())
    }

    /// One frame tick. Does nothing until `start` succeeded or while the
    /// canvas has no area.
    pub fn render(&mut self) -> bool {
        if !self.world.is_running() || self.pix.is_empty() {
            return false;
        }

        let tick = self.clock.tick();
        let skipped = self.world.frame(&mut self.pix, self.background);

        if skipped > 0 {
            warn!("frame {}: skipped {} undrawable bubbles", tick.frame, skipped);
        }

        trace!("frame {} at {:?}", tick.frame, tick.timestamp);

        self.frames_since_report += 1;
        let since = tick.timestamp.saturating_sub(self.last_report);
        if since >= STATS_INTERVAL {
            debug!(
                "{:.1} fps over the last {:.1}s",
                self.frames_since_report as f32 / since.as_secs_f32(),
                since.as_secs_f32()
            );
            self.last_report = tick.timestamp;
            self.frames_since_report = 0;
        }

        true
    }

    pub fn resize(&mut self, w: u32, h: u32) {
        self.pix.resize(w as usize, h as usize);
        debug!("canvas resized to {}x{}", w, h);
    }

    pub fn cursor_moved(&mut self, x: f32, y: f32) {
        let to = Cplx::new(x, y);

        if let Some(from) = self.cursor.replace(to) {
            let d = to - from;
            if let Err(e) = self.world.pointer_move(d.x, d.y) {
                warn!("ignoring pointer move: {e}");
            }
        }
    }

    pub fn cursor_left(&mut self) {
        self.cursor = None;
    }

    pub fn mouse_pressed(&mut self) {
        let Some(p) = self.cursor else {
            return;
        };

        match self.world.pointer_down(p.x, p.y) {
            Ok(0) => {}
            Ok(n) => debug!("grabbed {} bubble(s) at ({:.0}, {:.0})", n, p.x, p.y),
            Err(e) => warn!("ignoring pointer down: {e}"),
        }
    }

    pub fn mouse_released(&mut self) {
        self.world.pointer_up();
    }

    /// Returns whether the command needs a redraw.
    pub fn eval_command(&mut self, cmd: &Command) -> bool {
        use Command::*;

        match *cmd {
            CursorMoved(x, y) => self.cursor_moved(x, y),
            CursorLeft => self.cursor_left(),
            PointerDown => self.mouse_pressed(),
            PointerUp => self.mouse_released(),
            Resize(w, h) => {
                self.resize(w, h);
                return true;
            }
            Close => {}
        }

        false
    }
}
