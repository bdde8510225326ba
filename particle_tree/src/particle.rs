//! A single glowing point of the tree.

/// One particle.  Lives for a single spawn/dissipate cycle.
#[derive(Clone, Debug, PartialEq)]
pub struct Particle {
    /// Rendered position (pixels).
    pub x:      f32,
    pub y:      f32,
    /// Anchor the particle floats around; trails `x, y` slowly.
    pub base_x: f32,
    pub base_y: f32,
    /// Drift per tick (pixels).
    pub vx:     f32,
    pub vy:     f32,
    /// Disc radius (pixels).
    pub size:   f32,
    /// Packed ARGB.
    pub color:  u32,
    /// 0.0–1.0; the particle is dropped once this reaches zero.
    pub opacity: f32,
    /// Oscillator phase (radians).  Only its sine and cosine are used, so it
    /// is left to grow without wrapping.
    pub twinkle:       f32,
    pub twinkle_speed: f32,
}

impl Particle {
    /// A particle at rest at `(x, y)` with its anchor on the same spot.
    pub fn at(x: f32, y: f32) -> Self {
        Particle {
            x,
            y,
            base_x: x,
            base_y: y,
            vx: 0.0,
            vy: 0.0,
            size: 1.0,
            color: crate::palette::GREEN,
            opacity: 1.0,
            twinkle: 0.0,
            twinkle_speed: 0.0,
        }
    }

    pub fn is_visible(&self) -> bool {
        self.opacity > 0.0
    }
}
