use rand::Rng;
use serde::{Deserialize, Serialize};

use super::{
    bubble::{Bubble, GrowthPolicy, MIN_RADIUS},
    palette::Palette,
};
use crate::{
    config::{BubbleConfig, CollisionConfig, SpawnRange},
    error::{Error, Result},
    graphics::{Argb, Surface},
    math::{distance, Cplx},
};

/// How far from the right and bottom edges a bubble centre may be placed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Placement {
    /// Centre sampled from `[0, size - radius)`. Lets bubbles poke out past
    /// the right and bottom edges.
    #[default]
    RadiusInset,
    /// Centre sampled from `[0, size - 2 * radius)`.
    DiameterInset,
}

impl Placement {
    fn inset(self, radius: f32) -> f32 {
        match self {
            Placement::RadiusInset => radius,
            Placement::DiameterInset => 2.0 * radius,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WorldState {
    Uninitialized,
    Running,
}

/// Owns every bubble and runs the per-frame draw/update pass.
pub struct World {
    bubbles: Vec<Bubble>,
    settings: BubbleConfig,
    collisions: CollisionConfig,
    palette: Palette,
    state: WorldState,
}

fn sample<R: Rng>(rng: &mut R, range: &SpawnRange<f32>) -> f32 {
    if range.min < range.max {
        rng.gen_range(range.min..range.max)
    } else {
        range.min
    }
}

fn check_range(label: &str, range: &SpawnRange<f32>) -> Result<()> {
    if !range.min.is_finite() || !range.max.is_finite() || range.min > range.max {
        return Err(Error::InvalidInput(format!(
            "{label} range must be finite with min <= max (got {}..{})",
            range.min, range.max
        )));
    }
    Ok(())
}

// A bounded radius can only stay in [MIN_RADIUS, max_radius) when it starts
// there and the band is at least two steps wide.
fn check_bounded_growth(settings: &BubbleConfig) -> Result<()> {
    let radius = settings.initial_radius;
    let max = settings.max_radius.min;
    let speed = settings
        .growth_velocity
        .min
        .abs()
        .max(settings.growth_velocity.max.abs());

    if radius < MIN_RADIUS || radius >= max {
        return Err(Error::InvalidInput(format!(
            "initial radius {radius} must lie in [{MIN_RADIUS}, {max}) for bounded growth"
        )));
    }

    if max - MIN_RADIUS < 2.0 * speed {
        return Err(Error::InvalidInput(format!(
            "growth velocity {speed} is too large for the radius band [{MIN_RADIUS}, {max})"
        )));
    }

    Ok(())
}

impl World {
    pub fn new(settings: BubbleConfig, collisions: CollisionConfig, palette: Palette) -> Self {
        Self {
            bubbles: Vec::new(),
            settings,
            collisions,
            palette,
            state: WorldState::Uninitialized,
        }
    }

    /// A running world made of prebuilt bubbles.
    #[cfg(test)]
    pub fn from_bubbles(
        bubbles: Vec<Bubble>,
        settings: BubbleConfig,
        collisions: CollisionConfig,
    ) -> Self {
        Self {
            bubbles,
            settings,
            collisions,
            palette: Palette::default(),
            state: WorldState::Running,
        }
    }

    pub fn is_running(&self) -> bool {
        self.state == WorldState::Running
    }

    pub fn bubbles(&self) -> &[Bubble] {
        &self.bubbles
    }

    #[cfg(test)]
    pub fn bubble_mut(&mut self, index: usize) -> Option<&mut Bubble> {
        self.bubbles.get_mut(index)
    }

    pub fn len(&self) -> usize {
        self.bubbles.len()
    }

    /// Creates `count` bubbles inside a `viewport` sized area. Only valid
    /// once per world.
    pub fn populate<R: Rng>(
        &mut self,
        count: usize,
        rng: &mut R,
        viewport: (usize, usize),
    ) -> Result<()> {
        if self.state == WorldState::Running {
            return Err(Error::AlreadyPopulated);
        }

        if count == 0 {
            return Err(Error::InvalidInput("bubble count must be at least 1".into()));
        }

        let radius = self.settings.initial_radius;

        if !radius.is_finite() || radius < 0.0 {
            return Err(Error::InvalidInput(format!(
                "initial radius must be finite and non-negative (got {radius})"
            )));
        }

        check_range("growth velocity", &self.settings.growth_velocity)?;
        check_range("max radius", &self.settings.max_radius)?;

        if self.settings.growth == GrowthPolicy::Bounded {
            check_bounded_growth(&self.settings)?;
        }

        let inset = self.settings.placement.inset(radius);
        let (w, h) = (viewport.0 as f32, viewport.1 as f32);

        if w - inset <= 0.0 || h - inset <= 0.0 {
            return Err(Error::InvalidInput(format!(
                "viewport {}x{} cannot fit a bubble of radius {radius}",
                viewport.0, viewport.1
            )));
        }

        self.bubbles = (0..count)
            .map(|i| {
                let pos = Cplx::new(rng.gen_range(0.0..w - inset), rng.gen_range(0.0..h - inset));
                let growth_velocity = sample(rng, &self.settings.growth_velocity);
                let max_radius = sample(rng, &self.settings.max_radius);

                Bubble::new(pos, radius, max_radius, growth_velocity, self.palette.get(i))
            })
            .collect();

        self.state = WorldState::Running;

        Ok(())
    }

    /// Returns how many bubbles were skipped as undrawable.
    pub fn draw<S: Surface + ?Sized>(&self, surface: &mut S) -> usize {
        self.bubbles
            .iter()
            .filter(|bubble| !bubble.draw(surface))
            .count()
    }

    pub fn update(&mut self) {
        let policy = self.settings.growth;
        self.bubbles.iter_mut().for_each(|b| b.update(policy));
    }

    /// Reverses the growth of both bubbles of every overlapping pair. With
    /// `include_self_pairs` each bubble is also paired with itself; that pair
    /// always overlaps and reverses the same bubble twice, leaving it as it was.
    pub fn resolve_collisions(&mut self) {
        let n = self.bubbles.len();
        let self_pairs = self.collisions.include_self_pairs;

        for i in 0..n {
            let start = if self_pairs { i } else { i + 1 };

            for j in start..n {
                let (a, b) = (self.bubbles[i], self.bubbles[j]);

                if distance(a.pos(), b.pos()) < 1.0 + (a.radius() + b.radius()) {
                    self.bubbles[i].reverse_growth();
                    self.bubbles[j].reverse_growth();
                }
            }
        }
    }

    /// One frame: translucent background, bubbles, then growth.
    pub fn frame<S: Surface + ?Sized>(&mut self, surface: &mut S, background: Argb) -> usize {
        surface.fill(background);
        let skipped = self.draw(surface);

        self.update();

        if self.collisions.enabled {
            self.resolve_collisions();
        }

        skipped
    }

    /// Activates every bubble under the pointer; returns how many.
    pub fn pointer_down(&mut self, x: f32, y: f32) -> Result<usize> {
        if !x.is_finite() || !y.is_finite() {
            return Err(Error::InvalidInput(format!("pointer position ({x}, {y})")));
        }

        let mut hits = 0;
        for bubble in self.bubbles.iter_mut().filter(|b| b.is_clicked(x, y)) {
            bubble.press();
            hits += 1;
        }

        Ok(hits)
    }

    /// Drags every active bubble; returns how many moved.
    pub fn pointer_move(&mut self, dx: f32, dy: f32) -> Result<usize> {
        if !dx.is_finite() || !dy.is_finite() {
            return Err(Error::InvalidInput(format!("pointer delta ({dx}, {dy})")));
        }

        let mut moved = 0;
        for bubble in self.bubbles.iter_mut().filter(|b| b.is_active()) {
            bubble.move_by(dx, dy);
            moved += 1;
        }

        Ok(moved)
    }

    pub fn pointer_up(&mut self) {
        self.bubbles.iter_mut().for_each(Bubble::release);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::scene::palette::DEFAULT_COLORS;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    #[derive(Default)]
    struct Recorder {
        calls: Vec<String>,
    }

    impl Surface for Recorder {
        fn size(&self) -> (usize, usize) {
            (800, 600)
        }

        fn fill_rect(&mut self, x: i32, y: i32, w: usize, h: usize, color: Argb) {
            self.calls.push(format!("rect {x} {y} {w} {h} {color:08x}"));
        }

        fn fill_circle(&mut self, center: Cplx, radius: f32, color: Argb) {
            self.calls
                .push(format!("circle {} {} {} {color:08x}", center.x, center.y, radius));
        }
    }

    fn settings(count: usize) -> BubbleConfig {
        BubbleConfig {
            count,
            ..BubbleConfig::default()
        }
    }

    fn world(count: usize) -> World {
        let palette = Palette::from_hex(&DEFAULT_COLORS, 0xFF).unwrap();
        World::new(settings(count), CollisionConfig::default(), palette)
    }

    fn at(x: f32, y: f32, r: f32) -> Bubble {
        Bubble::new(Cplx::new(x, y), r, 100.0, 0.5, 0xFF_FF_FF_FF)
    }

    fn velocities(world: &World) -> Vec<f32> {
        world.bubbles().iter().map(Bubble::growth_velocity).collect()
    }

    #[test]
    fn populate_respects_count_and_bounds() {
        for n in [1, 6, 10, 37] {
            let mut w = world(n);
            let mut rng = ChaCha8Rng::seed_from_u64(n as u64);
            w.populate(n, &mut rng, (800, 600)).unwrap();

            assert_eq!(w.len(), n);
            assert!(w.is_running());

            for b in w.bubbles() {
                let p = b.pos();
                assert!(p.x >= 0.0 && p.x < 800.0 - b.radius());
                assert!(p.y >= 0.0 && p.y < 600.0 - b.radius());
                assert!(b.growth_velocity() >= 0.1 && b.growth_velocity() < 0.6);
                assert!(b.max_radius() >= 60.0 && b.max_radius() < 120.0);
            }
        }
    }

    #[test]
    fn diameter_inset_keeps_bubbles_further_in() {
        let mut w = World::new(
            BubbleConfig {
                placement: Placement::DiameterInset,
                ..settings(50)
            },
            CollisionConfig::default(),
            Palette::default(),
        );
        let mut rng = ChaCha8Rng::seed_from_u64(9);
        w.populate(50, &mut rng, (300, 200)).unwrap();

        for b in w.bubbles() {
            assert!(b.pos().x < 300.0 - 2.0 * b.radius());
            assert!(b.pos().y < 200.0 - 2.0 * b.radius());
        }
    }

    #[test]
    fn populate_is_deterministic_for_a_seed() {
        let mut a = world(6);
        let mut b = world(6);
        a.populate(6, &mut ChaCha8Rng::seed_from_u64(42), (800, 600)).unwrap();
        b.populate(6, &mut ChaCha8Rng::seed_from_u64(42), (800, 600)).unwrap();
        assert_eq!(a.bubbles(), b.bubbles());
    }

    #[test]
    fn populate_rejects_degenerate_setup() {
        let mut rng = ChaCha8Rng::seed_from_u64(1);

        assert!(matches!(
            world(6).populate(6, &mut rng, (0, 0)),
            Err(Error::InvalidInput(_))
        ));
        assert!(matches!(
            world(6).populate(6, &mut rng, (50, 600)),
            Err(Error::InvalidInput(_))
        ));
        assert!(matches!(
            world(6).populate(0, &mut rng, (800, 600)),
            Err(Error::InvalidInput(_))
        ));

        let mut w = world(6);
        w.populate(6, &mut rng, (800, 600)).unwrap();
        assert_eq!(
            w.populate(6, &mut rng, (800, 600)),
            Err(Error::AlreadyPopulated)
        );
        assert_eq!(w.len(), 6);
    }

    #[test]
    fn populate_rejects_inverted_ranges() {
        let mut w = World::new(
            BubbleConfig {
                growth_velocity: SpawnRange { min: 0.6, max: 0.1 },
                ..settings(3)
            },
            CollisionConfig::default(),
            Palette::default(),
        );
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        assert!(w.populate(3, &mut rng, (800, 600)).is_err());
        assert!(!w.is_running());
    }

    #[test]
    fn populate_rejects_bounds_the_radius_cannot_keep() {
        let mut rng = ChaCha8Rng::seed_from_u64(3);

        let too_fast = BubbleConfig {
            initial_radius: 2.5,
            growth_velocity: SpawnRange { min: 1.0, max: 1.0 },
            max_radius: SpawnRange { min: 3.0, max: 3.0 },
            ..settings(1)
        };
        let starts_above = BubbleConfig {
            max_radius: SpawnRange { min: 40.0, max: 45.0 },
            ..settings(1)
        };
        let starts_below = BubbleConfig {
            initial_radius: 1.0,
            ..settings(1)
        };

        for bad in [too_fast, starts_above, starts_below] {
            let mut w = World::new(bad, CollisionConfig::default(), Palette::default());
            assert!(matches!(
                w.populate(1, &mut rng, (800, 600)),
                Err(Error::InvalidInput(_))
            ));
            assert!(!w.is_running());
        }

        // Unbounded growth has no upper band to respect.
        let mut w = World::new(
            BubbleConfig {
                growth: GrowthPolicy::Unbounded,
                max_radius: SpawnRange { min: 40.0, max: 45.0 },
                ..settings(1)
            },
            CollisionConfig::default(),
            Palette::default(),
        );
        assert!(w.populate(1, &mut rng, (800, 600)).is_ok());
    }

    #[test]
    fn draw_paints_in_insertion_order() {
        let w = World::from_bubbles(
            vec![at(10.0, 10.0, 3.0), at(20.0, 20.0, 4.0)],
            settings(2),
            CollisionConfig::default(),
        );
        let mut rec = Recorder::default();

        assert_eq!(w.draw(&mut rec), 0);
        assert_eq!(
            rec.calls,
            vec!["circle 10 10 3 ffffffff", "circle 20 20 4 ffffffff"]
        );
    }

    #[test]
    fn frame_clears_then_draws_then_grows() {
        let mut w = World::from_bubbles(
            vec![at(10.0, 10.0, 3.0)],
            settings(1),
            CollisionConfig::default(),
        );
        let mut rec = Recorder::default();

        w.frame(&mut rec, 0xE6_14_14_14);

        assert_eq!(rec.calls[0], "rect 0 0 800 600 e6141414");
        assert_eq!(rec.calls[1], "circle 10 10 3 ffffffff");
        assert_eq!(w.bubbles()[0].radius(), 3.5);
    }

    #[test]
    fn collisions_skip_disjoint_pairs() {
        let mut w = World::from_bubbles(
            vec![at(0.0, 0.0, 5.0), at(100.0, 0.0, 5.0)],
            settings(2),
            CollisionConfig {
                enabled: true,
                include_self_pairs: false,
            },
        );
        w.resolve_collisions();
        assert_eq!(velocities(&w), vec![0.5, 0.5]);
    }

    #[test]
    fn collisions_flip_overlapping_pair() {
        // 10.5 apart, threshold 1 + 5 + 5 = 11.
        let mut w = World::from_bubbles(
            vec![at(0.0, 0.0, 5.0), at(10.5, 0.0, 5.0), at(300.0, 0.0, 5.0)],
            settings(3),
            CollisionConfig {
                enabled: true,
                include_self_pairs: false,
            },
        );
        w.resolve_collisions();
        assert_eq!(velocities(&w), vec![-0.5, -0.5, 0.5]);
    }

    #[test]
    fn self_pairs_leave_bubbles_unchanged() {
        let mut w = World::from_bubbles(
            vec![at(0.0, 0.0, 5.0), at(10.5, 0.0, 5.0), at(300.0, 0.0, 5.0)],
            settings(3),
            CollisionConfig {
                enabled: true,
                include_self_pairs: true,
            },
        );
        w.resolve_collisions();
        // Only the overlapping pair turns around.
        assert_eq!(velocities(&w), vec![-0.5, -0.5, 0.5]);
    }

    #[test]
    fn classic_frames_grow_loners_and_hold_overlapping_pairs() {
        let config = Config::preset(crate::config::Variant::Classic);
        let mut w = World::from_bubbles(
            vec![
                Bubble::new(Cplx::new(0.0, 0.0), 50.0, 0.0, 0.3, 0xFF_41_3C_58),
                Bubble::new(Cplx::new(1000.0, 0.0), 50.0, 0.0, 0.3, 0xFF_A3_C4_BC),
                Bubble::new(Cplx::new(1050.0, 0.0), 50.0, 0.0, 0.3, 0xFF_6B_AB_90),
            ],
            config.bubbles.clone(),
            config.collisions,
        );
        let mut rec = Recorder::default();

        for _ in 0..100 {
            w.frame(&mut rec, 0);
        }

        let radii: Vec<_> = w.bubbles().iter().map(Bubble::radius).collect();
        assert!((radii[0] - 80.0).abs() < 0.01, "loner radius {}", radii[0]);
        assert!((radii[1] - 50.0).abs() < 0.5, "pair radius {}", radii[1]);
        assert!((radii[2] - 50.0).abs() < 0.5, "pair radius {}", radii[2]);
    }

    #[test]
    fn collisions_only_run_when_enabled() {
        let mut w = World::from_bubbles(
            vec![at(0.0, 0.0, 5.0), at(1.0, 0.0, 5.0)],
            settings(2),
            CollisionConfig {
                enabled: false,
                include_self_pairs: false,
            },
        );
        let mut rec = Recorder::default();
        w.frame(&mut rec, 0);
        assert_eq!(velocities(&w), vec![0.5, 0.5]);
    }

    #[test]
    fn pointer_down_activates_every_hit() {
        let mut w = World::from_bubbles(
            vec![at(0.0, 0.0, 10.0), at(5.0, 0.0, 10.0), at(100.0, 0.0, 10.0)],
            settings(3),
            CollisionConfig::default(),
        );

        assert_eq!(w.pointer_down(3.0, 0.0), Ok(2));
        let active: Vec<_> = w.bubbles().iter().map(Bubble::is_active).collect();
        assert_eq!(active, vec![true, true, false]);

        assert_eq!(w.pointer_down(500.0, 500.0), Ok(0));
    }

    #[test]
    fn non_finite_pointer_input_is_rejected() {
        let mut w = World::from_bubbles(
            vec![at(0.0, 0.0, 10.0)],
            settings(1),
            CollisionConfig::default(),
        );
        w.pointer_down(0.0, 0.0).unwrap();

        assert!(w.pointer_move(f32::NAN, 1.0).is_err());
        assert!(w.pointer_move(1.0, f32::INFINITY).is_err());
        assert!(w.pointer_down(f32::NAN, 0.0).is_err());
        assert_eq!(w.bubbles()[0].pos(), Cplx::new(0.0, 0.0));
    }

    #[test]
    fn end_to_end_drag_session() {
        let config = Config::default();
        let palette = Palette::from_hex(&config.palette.colors, 0xFF).unwrap();
        let mut w = World::new(
            BubbleConfig {
                growth_velocity: SpawnRange { min: 0.3, max: 0.3 },
                ..settings(6)
            },
            CollisionConfig::default(),
            palette.clone(),
        );

        let mut rng = ChaCha8Rng::seed_from_u64(42);
        w.populate(6, &mut rng, (800, 600)).unwrap();

        assert_eq!(w.len(), 6);
        for (i, b) in w.bubbles().iter().enumerate() {
            assert_eq!(b.radius(), 50.0);
            assert_eq!(b.color(), palette.get(i));
        }

        w.update();
        assert!(w.bubbles().iter().all(|b| (b.radius() - 50.3).abs() < 1e-4));

        // Park the others far away so only bubble 0 is under the pointer.
        let origin = w.bubbles()[0].pos();
        for i in 1..6 {
            let p = w.bubbles()[i].pos();
            let far = Cplx::new(origin.x + 1000.0 * i as f32, origin.y);
            w.bubble_mut(i).unwrap().move_by(far.x - p.x, far.y - p.y);
        }
        let before: Vec<_> = w.bubbles().iter().map(Bubble::pos).collect();

        assert_eq!(w.pointer_down(origin.x + 10.0, origin.y), Ok(1));
        assert_eq!(w.pointer_move(10.0, -5.0), Ok(1));

        assert_eq!(w.bubbles()[0].pos(), before[0] + Cplx::new(10.0, -5.0));
        for i in 1..6 {
            assert_eq!(w.bubbles()[i].pos(), before[i]);
        }

        w.pointer_up();
        assert!(w.bubbles().iter().all(|b| !b.is_active()));

        let after_up: Vec<_> = w.bubbles().iter().map(Bubble::pos).collect();
        assert_eq!(w.pointer_move(10.0, -5.0), Ok(0));
        assert_eq!(w.bubbles().iter().map(Bubble::pos).collect::<Vec<_>>(), after_up);
    }
}
