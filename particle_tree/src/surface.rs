//! The drawing primitives the particle field needs from a render target.

/// Halo width drawn around every particle (pixels).
pub const GLOW_RADIUS: f32 = 10.0;

/// A 2D target with alpha compositing.
pub trait Surface {
    /// `(width, height)` in pixels.
    fn size(&self) -> (usize, usize);

    /// Reset every pixel to the background.
    fn clear(&mut self);

    /// Composite a filled disc of `radius` at `(x, y)` with `opacity`,
    /// surrounded by a soft halo `glow` pixels wide.  Parts outside the
    /// surface are clipped.
    fn fill_glow_disc(&mut self, x: f32, y: f32, radius: f32, color: u32, opacity: f32, glow: f32);
}
