//! Decorative colors, packed `0xAARRGGBB` like every buffer in this project.

use rand::seq::SliceRandom;
use rand::Rng;

pub const GREEN:       u32 = 0xFF00FF00;
pub const DARK_GREEN:  u32 = 0xFF00CC00;
pub const LIGHT_GREEN: u32 = 0xFF66FF66;
pub const RED:         u32 = 0xFFFF0000;
pub const ORANGE:      u32 = 0xFFFF6600;
pub const YELLOW:      u32 = 0xFFFFFF00;
pub const MAGENTA:     u32 = 0xFFFF00FF;
pub const CYAN:        u32 = 0xFF00FFFF;
pub const WHITE:       u32 = 0xFFFFFFFF;

/// Star cluster color at the apex.
pub const STAR: u32 = YELLOW;

/// `(color, weight)`: foliage greens carry most of the weight, the rest are
/// ornaments.
pub const TREE_PALETTE: [(u32, u32); 9] = [
    (GREEN,       4),
    (DARK_GREEN,  4),
    (LIGHT_GREEN, 3),
    (RED,         1),
    (ORANGE,      1),
    (YELLOW,      1),
    (MAGENTA,     1),
    (CYAN,        1),
    (WHITE,       1),
];

/// Draw one foliage/ornament color.
pub fn pick<R: Rng + ?Sized>(rng: &mut R) -> u32 {
    TREE_PALETTE
        .choose_weighted(rng, |&(_, w)| w)
        .map(|&(c, _)| c)
        .unwrap_or(GREEN)
}

pub fn is_green(color: u32) -> bool {
    matches!(color, GREEN | DARK_GREEN | LIGHT_GREEN)
}
