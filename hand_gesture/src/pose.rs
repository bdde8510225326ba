//! Synthetic hand poses.
//!
//! These stand in for a landmark detector when no tracking hardware is
//! attached: the desktop host's keyboard simulator emits them, and the
//! classifier tests are written against them.
//!
//! The hand is a right hand seen palm-on from the camera, fingers pointing
//! up the image (y grows downward), thumb on the left.

use crate::landmark::{HandLandmarks, Landmark, LANDMARK_COUNT};

/// A named hand shape.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Pose {
    /// All five digits straight.
    Open,
    /// All five digits curled.
    Fist,
    /// Index and middle straight, the rest curled.  Two extended digits is
    /// neither open nor closed.
    Peace,
    /// Only the index straight.
    Point,
}

impl Pose {
    pub fn name(self) -> &'static str {
        match self {
            Pose::Open  => "open",
            Pose::Fist  => "fist",
            Pose::Peace => "peace",
            Pose::Point => "point",
        }
    }

    /// Which digits (thumb, index, middle, ring, little) are straight.
    pub fn extended(self) -> [bool; 5] {
        match self {
            Pose::Open  => [true,  true,  true,  true,  true ],
            Pose::Fist  => [false, false, false, false, false],
            Pose::Peace => [false, true,  true,  false, false],
            Pose::Point => [false, true,  false, false, false],
        }
    }

    /// Build the 21 landmarks for this pose.  `mirrored` flips the hand
    /// horizontally, as a selfie camera or a left hand would.
    pub fn landmarks(self, mirrored: bool) -> HandLandmarks {
        let points = build(self.extended());
        let points = if mirrored { points.map(|p| p.mirrored()) } else { points };
        HandLandmarks::from_points_unchecked(points)
    }
}

// ── geometry ─────────────────────────────────────────────────────────────

const WRIST_POS: (f32, f32) = (0.50, 0.85);
const KNUCKLE_Y: f32        = 0.60;
const KNUCKLE_X: [f32; 4]   = [0.42, 0.48, 0.54, 0.60];

fn build(extended: [bool; 5]) -> [Landmark; LANDMARK_COUNT] {
    let mut pts = [Landmark::default(); LANDMARK_COUNT];
    pts[0] = Landmark::new(WRIST_POS.0, WRIST_POS.1);

    // Thumb: swings out to the left when straight, folds across the palm
    // when curled.
    let thumb: [(f32, f32); 4] = if extended[0] {
        [(0.40, 0.80), (0.34, 0.74), (0.29, 0.68), (0.26, 0.60)]
    } else {
        [(0.40, 0.80), (0.37, 0.72), (0.40, 0.66), (0.45, 0.64)]
    };
    for (i, &(x, y)) in thumb.iter().enumerate() {
        pts[1 + i] = Landmark::new(x, y);
    }

    // Fingers: MCP, PIP, DIP, TIP straight up, or a short hook back toward
    // the palm.  A straight tip sits 0.20 above its PIP, which keeps every
    // straight finger passing against its neighbour's tip whether that
    // neighbour is straight or curled.
    for (f, &x) in KNUCKLE_X.iter().enumerate() {
        let chain: [f32; 4] = if extended[f + 1] {
            [KNUCKLE_Y, 0.48, 0.38, 0.28]
        } else {
            [KNUCKLE_Y, 0.53, 0.58, 0.55]
        };
        let base = 5 + f * 4;
        for (j, &y) in chain.iter().enumerate() {
            pts[base + j] = Landmark::new(x, y);
        }
    }
    pts
}
