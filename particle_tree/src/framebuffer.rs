//! Software render target: a packed-ARGB pixel buffer with alpha blending.
//!
//! This is the same layout `minifb` consumes (`0x00RRGGBB` with the alpha
//! byte ignored), so a host window can blit [`Framebuffer::pixels`] directly.

use crate::surface::Surface;

/// Peak halo opacity relative to the disc itself.
const GLOW_STRENGTH: f32 = 0.35;

pub struct Framebuffer {
    width:      usize,
    height:     usize,
    background: u32,
    buf:        Vec<u32>,
}

impl Framebuffer {
    pub fn new(width: usize, height: usize, background: u32) -> Self {
        Framebuffer { width, height, background, buf: vec![background; width * height] }
    }

    pub fn width(&self)      -> usize  { self.width }
    pub fn height(&self)     -> usize  { self.height }
    pub fn background(&self) -> u32    { self.background }
    pub fn pixels(&self)     -> &[u32] { &self.buf }

    /// Reallocate for a new size; contents reset to the background.
    pub fn resize(&mut self, width: usize, height: usize) {
        self.width  = width;
        self.height = height;
        self.buf = vec![self.background; width * height];
    }

    pub fn pixel(&self, x: usize, y: usize) -> Option<u32> {
        (x < self.width && y < self.height).then(|| self.buf[y * self.width + x])
    }

    /// Pixels that differ from the background.
    pub fn lit_pixels(&self) -> usize {
        self.buf.iter().filter(|&&p| p != self.background).count()
    }

    // ── primitive drawing helpers ─────────────────────────────────────────

    pub fn set_pixel(&mut self, x: usize, y: usize, color: u32) {
        if x < self.width && y < self.height {
            self.buf[y * self.width + x] = color;
        }
    }

    pub fn blend_pixel(&mut self, x: usize, y: usize, color: u32, alpha: f32) {
        if x < self.width && y < self.height {
            let i = y * self.width + x;
            self.buf[i] = blend(self.buf[i], color, alpha);
        }
    }

    pub fn fill_rect(&mut self, x: usize, y: usize, w: usize, h: usize, color: u32) {
        for row in y..(y + h).min(self.height) {
            for col in x..(x + w).min(self.width) {
                self.buf[row * self.width + col] = color;
            }
        }
    }

    /// Translucent rectangle, for overlays drawn on top of the particles.
    pub fn shade_rect(&mut self, x: usize, y: usize, w: usize, h: usize, color: u32, alpha: f32) {
        for row in y..(y + h).min(self.height) {
            for col in x..(x + w).min(self.width) {
                let i = row * self.width + col;
                self.buf[i] = blend(self.buf[i], color, alpha);
            }
        }
    }
}

impl Surface for Framebuffer {
    fn size(&self) -> (usize, usize) { (self.width, self.height) }

    fn clear(&mut self) {
        self.buf.fill(self.background);
    }

    fn fill_glow_disc(&mut self, x: f32, y: f32, radius: f32, color: u32, opacity: f32, glow: f32) {
        if opacity <= 0.0 || self.width == 0 || self.height == 0 {
            return;
        }
        let radius = radius.max(0.0);
        let glow   = glow.max(0.0);
        let reach  = radius + glow;

        let col0 = ((x - reach).floor() as isize).max(0);
        let col1 = ((x + reach).ceil() as isize).min(self.width as isize - 1);
        let row0 = ((y - reach).floor() as isize).max(0);
        let row1 = ((y + reach).ceil() as isize).min(self.height as isize - 1);

        for row in row0..=row1 {
            for col in col0..=col1 {
                // Sample at the pixel centre.
                let dx = col as f32 + 0.5 - x;
                let dy = row as f32 + 0.5 - y;
                let d  = (dx * dx + dy * dy).sqrt();

                // One-pixel soft edge on the disc.
                let cover = (radius + 0.5 - d).clamp(0.0, 1.0);
                let halo = if glow > 0.0 && d < reach {
                    let t = 1.0 - (d - radius).max(0.0) / glow;
                    GLOW_STRENGTH * t * t
                } else {
                    0.0
                };

                let a = opacity.min(1.0) * cover.max(halo);
                if a > 0.0 {
                    self.blend_pixel(col as usize, row as usize, color, a);
                }
            }
        }
    }
}

/// Alpha-blend two ARGB colors. `t` = 0.0 → all `a`, `t` = 1.0 → all `b`.
pub fn blend(a: u32, b: u32, t: f32) -> u32 {
    let t = t.clamp(0.0, 1.0);
    let lerp = |ca: u32, cb: u32| (ca as f32 * (1.0 - t) + cb as f32 * t).round() as u32;
    let ar = (a >> 16) & 0xFF; let br = (b >> 16) & 0xFF;
    let ag = (a >>  8) & 0xFF; let bg = (b >>  8) & 0xFF;
    let ab =  a        & 0xFF; let bb =  b        & 0xFF;
    0xFF000000 | (lerp(ar, br) << 16) | (lerp(ag, bg) << 8) | lerp(ab, bb)
}

// ════════════════════════════════════════════════════════════════════════════
// Tests
// ════════════════════════════════════════════════════════════════════════════

#[cfg(test)]
mod tests {
    use super::*;

    const BG: u32 = 0xFF000000;

    #[test]
    fn blend_endpoints() {
        assert_eq!(blend(BG, 0xFFFF8000, 0.0), BG);
        assert_eq!(blend(BG, 0xFFFF8000, 1.0), 0xFFFF8000);
        assert_eq!(blend(BG, 0xFFFFFFFF, 0.5), 0xFF808080);
    }

    #[test]
    fn opaque_disc_centre_takes_color() {
        let mut fb = Framebuffer::new(32, 32, BG);
        fb.fill_glow_disc(10.5, 10.5, 3.0, 0xFF00FF00, 1.0, 0.0);
        assert_eq!(fb.pixel(10, 10), Some(0xFF00FF00));
        assert_eq!(fb.pixel(20, 20), Some(BG));
    }

    #[test]
    fn half_opacity_blends() {
        let mut fb = Framebuffer::new(8, 8, BG);
        fb.fill_glow_disc(4.5, 4.5, 2.0, 0xFFFFFFFF, 0.5, 0.0);
        assert_eq!(fb.pixel(4, 4), Some(0xFF808080));
    }

    #[test]
    fn glow_reaches_past_radius_but_dimmer() {
        let mut fb = Framebuffer::new(64, 64, BG);
        fb.fill_glow_disc(32.5, 32.5, 2.0, 0xFFFF0000, 1.0, 10.0);
        let core = fb.pixel(32, 32).unwrap();
        let halo = fb.pixel(37, 32).unwrap();
        assert_eq!(core, 0xFFFF0000);
        assert_ne!(halo, BG);
        assert!((halo >> 16) & 0xFF < 0xFF);
        assert_eq!(fb.pixel(50, 32), Some(BG));
    }

    #[test]
    fn offscreen_disc_is_clipped() {
        let mut fb = Framebuffer::new(16, 16, BG);
        fb.fill_glow_disc(-50.0, -50.0, 4.0, 0xFFFFFFFF, 1.0, 10.0);
        fb.fill_glow_disc(500.0, 8.0, 4.0, 0xFFFFFFFF, 1.0, 10.0);
        assert_eq!(fb.lit_pixels(), 0);
        fb.fill_glow_disc(0.0, 0.0, 4.0, 0xFFFFFFFF, 1.0, 0.0);
        assert!(fb.lit_pixels() > 0);
    }

    #[test]
    fn clear_restores_background() {
        let mut fb = Framebuffer::new(16, 16, BG);
        fb.fill_rect(0, 0, 4, 4, 0xFFFFFFFF);
        assert_eq!(fb.lit_pixels(), 16);
        fb.clear();
        assert_eq!(fb.lit_pixels(), 0);
    }

    #[test]
    fn resize_reallocates() {
        let mut fb = Framebuffer::new(4, 4, BG);
        fb.resize(10, 3);
        assert_eq!(fb.pixels().len(), 30);
        assert_eq!(fb.size(), (10, 3));
        assert_eq!(fb.pixel(9, 2), Some(BG));
        assert_eq!(fb.pixel(10, 2), None);
    }
}
