//! The particle field: generation, per-tick physics, and fade-out.
//!
//! ```text
//!             *  *           ← star cluster, `star_lift` px above the apex
//!              ·             ← layer 0: narrowest, fewest particles
//!            · · ·
//!          · · · · ·
//!            …
//!    · · · · · · · · · · ·   ← layer N-1: full width, most particles
//! ```
//!
//! The field owns its particles outright.  [`ParticleField::spawn`] replaces
//! the whole set; [`ParticleField::dissipate`] fades and shrinks it one step;
//! [`ParticleField::advance`] runs every animation tick whatever else is
//! going on.

use std::f32::consts::TAU;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::palette;
use crate::particle::Particle;
use crate::surface::{Surface, GLOW_RADIUS};

// ════════════════════════════════════════════════════════════════════════════
// TreeConfig: silhouette and particle budget
// ════════════════════════════════════════════════════════════════════════════

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TreeConfig {
    /// Horizontal bands from apex to base.
    pub layers:          usize,
    /// Particles in the apex layer.
    pub base_count:      usize,
    /// Extra particles per layer going down.
    pub count_step:      usize,
    /// Tree height as a fraction of the viewport height …
    pub height_fraction: f32,
    /// … capped at this many pixels.
    pub max_height:      f32,
    /// Base width relative to tree height.
    pub width_ratio:     f32,
    /// Each layer is this much narrower (as a fraction of the base width)
    /// than the one below it.
    pub taper:           f32,
    /// Width floor for the top layers so the taper never goes negative.
    pub min_width_fraction: f32,
    /// Total vertical scatter within a layer (pixels).
    pub jitter:          f32,
    pub star_count:      usize,
    /// Star height above the apex layer (pixels).
    pub star_lift:       f32,
}

impl Default for TreeConfig {
    fn default() -> Self {
        TreeConfig {
            layers:             8,
            base_count:         15,
            count_step:         3,
            height_fraction:    0.6,
            max_height:         400.0,
            width_ratio:        0.6,
            taper:              0.15,
            min_width_fraction: 0.05,
            jitter:             30.0,
            star_count:         5,
            star_lift:          20.0,
        }
    }
}

impl TreeConfig {
    /// Particles produced by one `spawn()`; independent of the random draw.
    pub fn particle_count(&self) -> usize {
        (0..self.layers)
            .map(|k| self.base_count + k * self.count_step)
            .sum::<usize>()
            + self.star_count
    }
}

// ════════════════════════════════════════════════════════════════════════════
// PhysicsConfig: motion and fade constants
// ════════════════════════════════════════════════════════════════════════════

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PhysicsConfig {
    /// Radius of the twinkle orbit around the anchor (pixels).
    pub twinkle_amplitude: f32,
    /// Fraction of the anchor→position gap closed per tick.
    pub follow:            f32,
    /// Speed kept after hitting a viewport edge.
    pub bounce_damping:    f32,
    /// Opacity lost per `dissipate()` call.
    pub fade_step:         f32,
    /// Size multiplier per `dissipate()` call.
    pub shrink_factor:     f32,
    /// Particles smaller than this are dropped while dissipating.
    pub min_size:          f32,
}

impl Default for PhysicsConfig {
    fn default() -> Self {
        PhysicsConfig {
            twinkle_amplitude: 5.0,
            follow:            0.1,
            bounce_damping:    0.8,
            fade_step:         0.02,
            shrink_factor:     0.97,
            min_size:          0.5,
        }
    }
}

// ════════════════════════════════════════════════════════════════════════════
// ParticleField
// ════════════════════════════════════════════════════════════════════════════

pub struct ParticleField {
    particles: Vec<Particle>,
    width:     f32,
    height:    f32,
    center_x:  f32,
    center_y:  f32,
    tree:      TreeConfig,
    physics:   PhysicsConfig,
    rng:       StdRng,
}

impl ParticleField {
    /// An empty field over a `width × height` viewport.  `seed` makes every
    /// spawn reproducible; `None` seeds from the OS.
    pub fn new(
        width:   usize,
        height:  usize,
        tree:    TreeConfig,
        physics: PhysicsConfig,
        seed:    Option<u64>,
    ) -> Self {
        let rng = match seed {
            Some(s) => StdRng::seed_from_u64(s),
            None    => StdRng::from_entropy(),
        };
        let mut field = ParticleField {
            particles: Vec::new(),
            width:     0.0,
            height:    0.0,
            center_x:  0.0,
            center_y:  0.0,
            tree,
            physics,
            rng,
        };
        field.resize(width, height);
        field
    }

    // ── accessors ─────────────────────────────────────────────────────────

    pub fn particles(&self) -> &[Particle] { &self.particles }
    pub fn len(&self)       -> usize       { self.particles.len() }
    pub fn is_empty(&self)  -> bool        { self.particles.is_empty() }
    pub fn width(&self)     -> f32         { self.width }
    pub fn height(&self)    -> f32         { self.height }
    pub fn center(&self)    -> (f32, f32)  { (self.center_x, self.center_y) }
    pub fn tree(&self)      -> &TreeConfig { &self.tree }

    /// Track a new viewport size.  Live particles stay where they are; only
    /// the next `spawn()` uses the new centre.
    pub fn resize(&mut self, width: usize, height: usize) {
        self.width    = width as f32;
        self.height   = height as f32;
        self.center_x = self.width / 2.0;
        self.center_y = self.height / 2.0;
    }

    // ── spawn ─────────────────────────────────────────────────────────────

    /// Discard every particle and grow a fresh tree around the viewport
    /// centre.
    pub fn spawn(&mut self) {
        let t = &self.tree;
        let tree_h = (self.height * t.height_fraction).min(t.max_height);
        let tree_w = tree_h * t.width_ratio;
        let top    = self.center_y - tree_h / 2.0;

        let mut particles = Vec::with_capacity(t.particle_count());

        for layer in 0..t.layers {
            let layer_y = top + layer as f32 * tree_h / t.layers as f32;
            let steps_from_base = (t.layers - 1 - layer) as f32;
            let width_factor = (1.0 - steps_from_base * t.taper).max(t.min_width_fraction);
            let half_w = tree_w * width_factor / 2.0;
            let count  = t.base_count + layer * t.count_step;

            for i in 0..count {
                let angle  = TAU * i as f32 / count as f32;
                let radius = half_w * self.rng.gen_range(0.5..=1.0);
                let x = self.center_x + angle.cos() * radius;
                let y = layer_y + (self.rng.gen::<f32>() - 0.5) * t.jitter;

                particles.push(Particle {
                    vx:            self.rng.gen_range(-0.25..0.25),
                    vy:            self.rng.gen_range(-0.25..0.25),
                    size:          self.rng.gen_range(2.0..5.0),
                    color:         palette::pick(&mut self.rng),
                    opacity:       self.rng.gen_range(0.7..=1.0),
                    twinkle:       self.rng.gen_range(0.0..TAU),
                    twinkle_speed: self.rng.gen_range(0.02..0.05),
                    ..Particle::at(x, y)
                });
            }
        }

        let star_y = top - t.star_lift;
        for _ in 0..t.star_count {
            particles.push(Particle {
                vx:            self.rng.gen_range(-0.15..0.15),
                vy:            self.rng.gen_range(-0.15..0.15),
                size:          self.rng.gen_range(4.0..8.0),
                color:         palette::STAR,
                opacity:       self.rng.gen_range(0.8..=1.0),
                twinkle:       self.rng.gen_range(0.0..TAU),
                twinkle_speed: self.rng.gen_range(0.05..0.10),
                ..Particle::at(self.center_x, star_y)
            });
        }

        debug!(
            "spawned {} particles, tree {:.0}×{:.0} at ({:.0}, {:.0})",
            particles.len(), tree_w, tree_h, self.center_x, self.center_y
        );
        self.particles = particles;
    }

    // ── dissipate ─────────────────────────────────────────────────────────

    /// One fade step: dim and shrink every particle, dropping the ones that
    /// have gone dark or too small.  Harmless on an empty field.
    pub fn dissipate(&mut self) {
        let fade   = self.physics.fade_step;
        let shrink = self.physics.shrink_factor;
        let floor  = self.physics.min_size;
        self.particles.retain_mut(|p| {
            p.opacity -= fade;
            p.size    *= shrink;
            p.opacity > 0.0 && p.size >= floor
        });
    }

    // ── advance ───────────────────────────────────────────────────────────

    /// One animation tick of motion.  Every particle ends the tick inside
    /// `[0, width] × [0, height]`.
    pub fn advance(&mut self) {
        let ph = &self.physics;
        let (w, h) = (self.width, self.height);

        for p in &mut self.particles {
            // Orbit the anchor.
            p.x = p.base_x + p.twinkle.sin() * ph.twinkle_amplitude;
            p.y = p.base_y + p.twinkle.cos() * ph.twinkle_amplitude;

            p.x += p.vx;
            p.y += p.vy;

            if p.x < 0.0 || p.x > w {
                p.vx = -p.vx * ph.bounce_damping;
                p.x  = p.x.clamp(0.0, w);
            }
            if p.y < 0.0 || p.y > h {
                p.vy = -p.vy * ph.bounce_damping;
                p.y  = p.y.clamp(0.0, h);
            }

            p.twinkle += p.twinkle_speed;

            p.base_x += (p.x - p.base_x) * ph.follow;
            p.base_y += (p.y - p.base_y) * ph.follow;
        }

        self.particles.retain(Particle::is_visible);
    }

    // ── render ────────────────────────────────────────────────────────────

    /// Clear `surface` and draw every particle as a glowing disc.
    pub fn render<S: Surface + ?Sized>(&self, surface: &mut S) {
        surface.clear();
        for p in &self.particles {
            surface.fill_glow_disc(p.x, p.y, p.size, p.color, p.opacity, GLOW_RADIUS);
        }
    }

    /// Replace the particle set directly; used to stage edge cases.
    pub fn set_particles(&mut self, particles: Vec<Particle>) {
        self.particles = particles;
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Tests
// ════════════════════════════════════════════════════════════════════════════

#[cfg(test)]
mod tests {
    use super::*;
    use crate::framebuffer::Framebuffer;

    fn field(seed: u64) -> ParticleField {
        ParticleField::new(800, 600, TreeConfig::default(), PhysicsConfig::default(), Some(seed))
    }

    #[test]
    fn default_tree_has_209_particles() {
        assert_eq!(TreeConfig::default().particle_count(), 209);
        for seed in 0..5 {
            let mut f = field(seed);
            f.spawn();
            assert_eq!(f.len(), 209);
        }
    }

    #[test]
    fn star_cluster_sits_above_apex() {
        let mut f = field(1);
        f.spawn();
        let stars = &f.particles()[f.len() - 5..];
        // 600 * 0.6 = 360 tall, centred on y = 300 → apex at 120, star at 100.
        for s in stars {
            assert_eq!(s.color, palette::STAR);
            assert_eq!((s.base_x, s.base_y), (400.0, 100.0));
            assert!(s.size >= 4.0 && s.size < 8.0);
        }
    }

    #[test]
    fn tree_height_is_capped() {
        let mut f = ParticleField::new(
            2000, 2000, TreeConfig { jitter: 0.0, star_count: 0, ..Default::default() },
            PhysicsConfig::default(), Some(3),
        );
        f.spawn();
        let min_y = f.particles().iter().map(|p| p.y).fold(f32::MAX, f32::min);
        let max_y = f.particles().iter().map(|p| p.y).fold(f32::MIN, f32::max);
        // Layers start at 1000 - 200 and step 50 px: last layer at 1150.
        assert_eq!(min_y, 800.0);
        assert_eq!(max_y, 1150.0);
    }

    #[test]
    fn base_is_wider_than_apex() {
        let mut f = field(9);
        f.spawn();
        let cfg = f.tree().clone();
        let spread = |layer: usize| {
            let start: usize = (0..layer).map(|k| cfg.base_count + k * cfg.count_step).sum();
            let n = cfg.base_count + layer * cfg.count_step;
            f.particles()[start..start + n]
                .iter()
                .map(|p| (p.x - 400.0).abs())
                .fold(0.0_f32, f32::max)
        };
        assert!(spread(7) > spread(0) * 4.0);
    }

    #[test]
    fn spawn_replaces_previous_generation() {
        let mut f = field(2);
        f.spawn();
        for _ in 0..10 { f.dissipate(); }
        let before = f.len();
        f.spawn();
        assert_eq!(f.len(), 209);
        assert!(before <= 209);
        assert!(f.particles().iter().all(|p| p.opacity >= 0.7));
    }

    #[test]
    fn same_seed_same_tree() {
        let mut a = field(42);
        let mut b = field(42);
        a.spawn();
        b.spawn();
        assert_eq!(a.particles(), b.particles());
    }

    #[test]
    fn dissipate_empties_in_bounded_calls() {
        let mut f = field(5);
        f.spawn();
        let mut calls = 0;
        while !f.is_empty() {
            f.dissipate();
            calls += 1;
            assert!(calls <= 60, "still {} particles after {} calls", f.len(), calls);
        }
    }

    #[test]
    fn dissipate_on_empty_is_noop() {
        let mut f = field(0);
        f.dissipate();
        f.dissipate();
        assert!(f.is_empty());
    }

    #[test]
    fn dissipate_drops_tiny_particles() {
        let mut f = field(0);
        let mut small = Particle::at(10.0, 10.0);
        small.size = 0.51;
        f.set_particles(vec![small, Particle::at(20.0, 20.0)]);
        f.dissipate();
        assert_eq!(f.len(), 1);
        assert_eq!(f.particles()[0].base_x, 20.0);
    }

    #[test]
    fn advance_stays_in_bounds() {
        let mut f = field(11);
        f.spawn();
        let mut runaway = Particle::at(795.0, 5.0);
        runaway.vx = 40.0;
        runaway.vy = -40.0;
        let mut all = f.particles().to_vec();
        all.push(runaway);
        f.set_particles(all);

        for _ in 0..500 {
            f.advance();
            for p in f.particles() {
                assert!((0.0..=800.0).contains(&p.x), "x = {}", p.x);
                assert!((0.0..=600.0).contains(&p.y), "y = {}", p.y);
            }
        }
    }

    #[test]
    fn edge_hit_reverses_and_damps_velocity() {
        let mut f = field(0);
        let mut p = Particle::at(799.0, 300.0);
        p.twinkle = std::f32::consts::FRAC_PI_2; // sin = 1 → pushed right
        p.vx = 3.0;
        f.set_particles(vec![p]);
        f.advance();
        let p = &f.particles()[0];
        assert_eq!(p.x, 800.0);
        assert!((p.vx + 2.4).abs() < 1e-5);
    }

    #[test]
    fn anchor_trails_position() {
        let mut f = field(0);
        let mut p = Particle::at(100.0, 100.0);
        p.vx = 10.0;
        f.set_particles(vec![p]);
        f.advance();
        let p = &f.particles()[0];
        // twinkle 0: x = 100 + 0 + 10, y = 100 + 5
        assert_eq!((p.x, p.y), (110.0, 105.0));
        assert!((p.base_x - 101.0).abs() < 1e-4);
        assert!((p.base_y - 100.5).abs() < 1e-4);
    }

    #[test]
    fn advance_drops_dark_particles() {
        let mut f = field(0);
        let mut dark = Particle::at(50.0, 50.0);
        dark.opacity = 0.0;
        f.set_particles(vec![dark, Particle::at(60.0, 60.0)]);
        f.advance();
        assert_eq!(f.len(), 1);
    }

    #[test]
    fn advance_and_render_tolerate_empty_field() {
        let mut f = field(0);
        let mut fb = Framebuffer::new(800, 600, 0xFF000000);
        f.advance();
        f.render(&mut fb);
        assert!(f.is_empty());
        assert_eq!(fb.lit_pixels(), 0);
    }

    #[test]
    fn resize_moves_centre_not_particles() {
        let mut f = field(4);
        f.spawn();
        let before = f.particles().to_vec();
        f.resize(1600, 1200);
        assert_eq!(f.center(), (800.0, 600.0));
        assert_eq!(f.particles(), &before[..]);
    }

    #[test]
    fn render_does_not_touch_particles() {
        let mut f = field(8);
        f.spawn();
        let before = f.particles().to_vec();
        let mut fb = Framebuffer::new(800, 600, 0xFF000000);
        f.render(&mut fb);
        assert_eq!(f.particles(), &before[..]);
        assert!(fb.lit_pixels() > 0);
    }
}
