//! Software-rendered window using `minifb`.
//!
//! The particle field is drawn into a [`Framebuffer`] by `AppState`; this
//! module owns the window, turns key presses into [`SimInput`]s and paints
//! the status bar on top before presenting.
//!
//! ```text
//! ┌──────────────────────────────────────────────┐
//! │                      *                       │
//! │                    .:::.                     │
//! │                  .:::::::.                   │
//! │                .:::::::::::.                 │
//! │▒ status line ▒▒▒▒▒▒▒▒▒▒▒▒▒▒▒▒▒▒▒▒▒▒▒▒▒▒▒▒▒▒▒│
//! │▒ key legend  ▒▒▒▒▒▒▒▒▒▒▒▒▒▒▒▒▒▒▒▒▒▒▒▒▒▒▒▒▒▒▒│
//! └──────────────────────────────────────────────┘
//! ```

use std::sync::mpsc::Sender;
use std::time::Duration;

use minifb::{Key, KeyRepeat, Window, WindowOptions};

use hand_gesture::Pose;
use particle_tree::Framebuffer;

use crate::config::WindowConfig;
use crate::error::AppError;
use crate::gesture::SimInput;

// ════════════════════════════════════════════════════════════════════════════
// Layout constants
// ════════════════════════════════════════════════════════════════════════════

const TEXT_SCALE:   usize = 2;
const LINE_H:       usize = 6 * TEXT_SCALE;
const BAR_PAD:      usize = 6;
const BAR_H:        usize = 2 * LINE_H + 3 * BAR_PAD;
const BAR_COLOR:    u32   = 0xFF0F1A2E;
const BAR_ALPHA:    f32   = 0.75;
const STATUS_COLOR: u32   = 0xFFEEEEEE;
const LEGEND_COLOR: u32   = 0xFF888888;

#[cfg(not(feature = "leap"))]
const LEGEND: &str = "O=open  C=fist  P=peace  I=point  H=hide  M=mirror  Q=quit";
#[cfg(feature = "leap")]
const LEGEND: &str = "open hand = grow   fist = fade   Q=quit";

// ════════════════════════════════════════════════════════════════════════════
// Visualizer
// ════════════════════════════════════════════════════════════════════════════

pub struct Visualizer {
    window: Window,
    sim_tx: Sender<SimInput>,
}

impl Visualizer {
    pub fn new(cfg: &WindowConfig, sim_tx: Sender<SimInput>) -> Result<Self, AppError> {
        let mut window = Window::new(
            &cfg.title,
            cfg.width, cfg.height,
            WindowOptions {
                resize: cfg.resizable,
                ..WindowOptions::default()
            },
        )?;

        window.limit_update_rate(Some(Duration::from_millis(16))); // ~60fps

        Ok(Visualizer { window, sim_tx })
    }

    /// Returns false when the window should close.
    pub fn is_open(&self) -> bool { self.window.is_open() }

    /// Current client area, which follows user resizes.
    pub fn size(&self) -> (usize, usize) { self.window.get_size() }

    /// Poll keyboard inputs and translate to SimInput events.
    /// Returns false once the user asked to quit.
    pub fn poll_input(&mut self) -> bool {
        if !self.window.is_open() { return false; }

        let pressed = |k: Key| self.window.is_key_pressed(k, KeyRepeat::No);

        if pressed(Key::Q) || pressed(Key::Escape) {
            let _ = self.sim_tx.send(SimInput::Quit);
            return false;
        }

        let bindings = [
            (Key::O, SimInput::Show(Pose::Open)),
            (Key::C, SimInput::Show(Pose::Fist)),
            (Key::P, SimInput::Show(Pose::Peace)),
            (Key::I, SimInput::Show(Pose::Point)),
            (Key::H, SimInput::Hide),
            (Key::M, SimInput::ToggleMirror),
        ];
        for (key, input) in bindings {
            if pressed(key) {
                // The hardware build has no simulated hand listening.
                let _ = self.sim_tx.send(input);
            }
        }

        true
    }

    /// Paint the status bar over whatever the field rendered.
    pub fn draw_status(&self, fb: &mut Framebuffer, status: &str) {
        draw_status_bar(fb, status, LEGEND);
    }

    pub fn present(&mut self, fb: &Framebuffer) -> Result<(), AppError> {
        self.window.update_with_buffer(fb.pixels(), fb.width(), fb.height())?;
        Ok(())
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Status bar and text
// ════════════════════════════════════════════════════════════════════════════

pub fn draw_status_bar(fb: &mut Framebuffer, status: &str, legend: &str) {
    if fb.height() < BAR_H { return; }
    let y = fb.height() - BAR_H;
    fb.shade_rect(0, y, fb.width(), BAR_H, BAR_COLOR, BAR_ALPHA);
    draw_text(fb, status, BAR_PAD, y + BAR_PAD,                   TEXT_SCALE, STATUS_COLOR);
    draw_text(fb, legend, BAR_PAD, y + 2 * BAR_PAD + LINE_H,      TEXT_SCALE, LEGEND_COLOR);
}

/// Horizontal advance of `text` in pixels.
pub fn text_width(text: &str, scale: usize) -> usize {
    text.chars().count() * 4 * scale
}

/// Draw `text` with the 3×5 font, each font pixel a `scale`×`scale` block.
/// Stops at the right edge.
pub fn draw_text(fb: &mut Framebuffer, text: &str, x: usize, y: usize, scale: usize, color: u32) {
    let mut cx = x;
    for ch in text.chars() {
        if cx + 3 * scale > fb.width() { break; }
        let bits = glyph(ch);
        for row in 0..5 {
            for col in 0..3 {
                if bits & (1 << (14 - (row * 3 + col))) != 0 {
                    fb.fill_rect(cx + col * scale, y + row * scale, scale, scale, color);
                }
            }
        }
        cx += 4 * scale;
    }
}

// ────────────────────────────────────────────────────────────────────────────
// 3×5 bitmap font: 15 bits, five rows of three, top row in the high bits
// ────────────────────────────────────────────────────────────────────────────

fn glyph(c: char) -> u16 {
    match c.to_ascii_lowercase() {
        '0' => 0b111_101_101_101_111,
        '1' => 0b010_110_010_010_111,
        '2' => 0b111_001_111_100_111,
        '3' => 0b111_001_111_001_111,
        '4' => 0b101_101_111_001_001,
        '5' => 0b111_100_111_001_111,
        '6' => 0b111_100_111_101_111,
        '7' => 0b111_001_001_001_001,
        '8' => 0b111_101_111_101_111,
        '9' => 0b111_101_111_001_111,
        'a' => 0b111_101_111_101_101,
        'b' => 0b110_101_110_101_110,
        'c' => 0b111_100_100_100_111,
        'd' => 0b110_101_101_101_110,
        'e' => 0b111_100_111_100_111,
        'f' => 0b111_100_111_100_100,
        'g' => 0b111_100_101_101_111,
        'h' => 0b101_101_111_101_101,
        'i' => 0b111_010_010_010_111,
        'j' => 0b001_001_001_101_111,
        'k' => 0b101_101_110_101_101,
        'l' => 0b100_100_100_100_111,
        'm' => 0b101_111_101_101_101,
        'n' => 0b111_101_101_101_101,
        'o' => 0b111_101_101_101_111,
        'p' => 0b111_101_111_100_100,
        'q' => 0b111_101_101_111_001,
        'r' => 0b110_101_110_101_101,
        's' => 0b111_100_111_001_111,
        't' => 0b111_010_010_010_010,
        'u' => 0b101_101_101_101_111,
        'v' => 0b101_101_101_010_010,
        'w' => 0b101_101_101_111_101,
        'x' => 0b101_101_010_101_101,
        'y' => 0b101_101_111_010_010,
        'z' => 0b111_001_010_100_111,
        '/' => 0b001_001_010_100_100,
        '-' => 0b000_000_111_000_000,
        '.' => 0b000_000_000_000_010,
        ',' => 0b000_000_000_010_100,
        ':' => 0b000_010_000_010_000,
        '=' => 0b000_111_000_111_000,
        '+' => 0b000_010_111_010_000,
        '|' => 0b010_010_010_010_010,
        '(' => 0b010_100_100_100_010,
        ')' => 0b010_001_001_001_010,
        ' ' => 0,
        _   => 0b000_000_010_000_000,
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Tests
// ════════════════════════════════════════════════════════════════════════════

#[cfg(test)]
mod tests {
    use super::*;

    const BG: u32 = 0xFF000000;

    #[test]
    fn glyphs_ignore_case() {
        assert_eq!(glyph('A'), glyph('a'));
        assert_eq!(glyph('Q'), glyph('q'));
        assert_eq!(glyph(' '), 0);
    }

    #[test]
    fn unknown_char_is_dot() {
        assert_eq!(glyph('~'), glyph('\u{2603}'));
        assert_eq!(glyph('~').count_ones(), 1);
    }

    #[test]
    fn draw_one_scaled() {
        let mut fb = Framebuffer::new(20, 20, BG);
        draw_text(&mut fb, "1", 0, 0, 2, 0xFFFFFFFF);
        // "1" has 8 set bits, each a 2×2 block.
        assert_eq!(fb.lit_pixels(), 8 * 4);
        assert_eq!(fb.pixel(2, 0), Some(0xFFFFFFFF));
        assert_eq!(fb.pixel(0, 0), Some(BG));
    }

    #[test]
    fn text_is_clipped_at_right_edge() {
        let mut fb = Framebuffer::new(10, 8, BG);
        draw_text(&mut fb, "888888", 0, 0, 1, 0xFFFFFFFF);
        // Only two glyphs fit in ten columns.
        assert_eq!(fb.lit_pixels(), 2 * glyph('8').count_ones() as usize);
    }

    #[test]
    fn width_counts_chars() {
        assert_eq!(text_width("abc", 2), 24);
        assert_eq!(text_width("", 2), 0);
    }

    #[test]
    fn status_bar_skipped_on_tiny_framebuffer() {
        let mut fb = Framebuffer::new(50, 10, BG);
        draw_status_bar(&mut fb, "status", "legend");
        assert_eq!(fb.lit_pixels(), 0);
    }

    #[test]
    fn status_bar_shades_bottom_only() {
        let mut fb = Framebuffer::new(200, 100, BG);
        draw_status_bar(&mut fb, "ok", "q=quit");
        assert_eq!(fb.pixel(0, 0), Some(BG));
        assert_ne!(fb.pixel(0, 99), Some(BG));
    }
}
