//! The 21-point hand landmark scheme.
//!
//! Landmarks arrive in normalized image space: `x` and `y` in `[0, 1]`, with
//! `z` carried along when the detector supplies it.  The index of each point
//! is fixed by anatomy (wrist first, then four joints per digit from the
//! palm outward).

use serde::{Deserialize, Serialize};
use thiserror::Error;

// ════════════════════════════════════════════════════════════════════════════
// Landmark indices
// ════════════════════════════════════════════════════════════════════════════

pub const LANDMARK_COUNT: usize = 21;

pub const WRIST:      usize = 0;
pub const THUMB_CMC:  usize = 1;
pub const THUMB_MCP:  usize = 2;
pub const THUMB_IP:   usize = 3;
pub const THUMB_TIP:  usize = 4;
pub const INDEX_MCP:  usize = 5;
pub const INDEX_PIP:  usize = 6;
pub const INDEX_DIP:  usize = 7;
pub const INDEX_TIP:  usize = 8;
pub const MIDDLE_MCP: usize = 9;
pub const MIDDLE_PIP: usize = 10;
pub const MIDDLE_DIP: usize = 11;
pub const MIDDLE_TIP: usize = 12;
pub const RING_MCP:   usize = 13;
pub const RING_PIP:   usize = 14;
pub const RING_DIP:   usize = 15;
pub const RING_TIP:   usize = 16;
pub const LITTLE_MCP: usize = 17;
pub const LITTLE_PIP: usize = 18;
pub const LITTLE_DIP: usize = 19;
pub const LITTLE_TIP: usize = 20;

// ════════════════════════════════════════════════════════════════════════════
// Finger
// ════════════════════════════════════════════════════════════════════════════

/// The five digits, in landmark order.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Finger {
    Thumb,
    Index,
    Middle,
    Ring,
    Little,
}

impl Finger {
    pub const ALL: [Finger; 5] = [
        Finger::Thumb, Finger::Index, Finger::Middle, Finger::Ring, Finger::Little,
    ];

    /// Landmark index of the fingertip.
    pub fn tip(self) -> usize {
        match self {
            Finger::Thumb  => THUMB_TIP,
            Finger::Index  => INDEX_TIP,
            Finger::Middle => MIDDLE_TIP,
            Finger::Ring   => RING_TIP,
            Finger::Little => LITTLE_TIP,
        }
    }

    /// Landmark index of the middle joint: PIP for the four fingers, IP for
    /// the thumb.
    pub fn middle_joint(self) -> usize {
        match self {
            Finger::Thumb  => THUMB_IP,
            Finger::Index  => INDEX_PIP,
            Finger::Middle => MIDDLE_PIP,
            Finger::Ring   => RING_PIP,
            Finger::Little => LITTLE_PIP,
        }
    }

    /// The landmark two positions before the middle joint.  For the index
    /// finger that is the thumb tip, for the middle, ring and little fingers
    /// the tip of the neighbouring finger, and for the thumb its CMC joint.
    pub fn base_joint(self) -> usize {
        self.middle_joint() - 2
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Landmark
// ════════════════════════════════════════════════════════════════════════════

/// A single tracked keypoint in normalized image coordinates.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Landmark {
    pub x: f32,
    pub y: f32,
    #[serde(default)]
    pub z: f32,
}

impl Landmark {
    pub const fn new(x: f32, y: f32) -> Self {
        Landmark { x, y, z: 0.0 }
    }

    /// Planar Euclidean distance.  Depth is ignored; only ratios of these
    /// distances are ever compared, so no unit calibration is needed.
    pub fn distance(&self, other: &Landmark) -> f32 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        (dx * dx + dy * dy).sqrt()
    }

    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite() && self.z.is_finite()
    }

    /// Reflect across the vertical centre line of the image.
    pub fn mirrored(&self) -> Self {
        Landmark { x: 1.0 - self.x, ..*self }
    }
}

// ════════════════════════════════════════════════════════════════════════════
// HandLandmarks: a validated 21-point set
// ════════════════════════════════════════════════════════════════════════════

#[derive(Debug, Error, Clone, PartialEq)]
pub enum LandmarkError {
    #[error("expected {expected} landmarks, got {got}")]
    WrongCount { expected: usize, got: usize },

    #[error("landmark {index} has a non-finite coordinate")]
    NonFinite { index: usize },
}

/// One hand's worth of landmarks, checked for length and finiteness.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct HandLandmarks([Landmark; LANDMARK_COUNT]);

impl HandLandmarks {
    pub fn new(points: [Landmark; LANDMARK_COUNT]) -> Result<Self, LandmarkError> {
        if let Some(index) = points.iter().position(|p| !p.is_finite()) {
            return Err(LandmarkError::NonFinite { index });
        }
        Ok(HandLandmarks(points))
    }

    /// For point sets built from known-finite constants.
    pub(crate) fn from_points_unchecked(points: [Landmark; LANDMARK_COUNT]) -> Self {
        HandLandmarks(points)
    }

    pub fn points(&self) -> &[Landmark; LANDMARK_COUNT] { &self.0 }

    pub fn get(&self, index: usize) -> &Landmark { &self.0[index] }

    /// The same hand seen in a horizontally flipped camera image.
    pub fn mirrored(&self) -> Self {
        HandLandmarks(self.0.map(|p| p.mirrored()))
    }
}

/// Accepts any slice of at least 21 points; extra points (some detectors
/// append auxiliary keypoints) are ignored.
impl TryFrom<&[Landmark]> for HandLandmarks {
    type Error = LandmarkError;

    fn try_from(points: &[Landmark]) -> Result<Self, Self::Error> {
        if points.len() < LANDMARK_COUNT {
            return Err(LandmarkError::WrongCount {
                expected: LANDMARK_COUNT,
                got:      points.len(),
            });
        }
        let mut out = [Landmark::default(); LANDMARK_COUNT];
        out.copy_from_slice(&points[..LANDMARK_COUNT]);
        HandLandmarks::new(out)
    }
}

impl std::ops::Index<usize> for HandLandmarks {
    type Output = Landmark;
    fn index(&self, index: usize) -> &Landmark { &self.0[index] }
}

// ════════════════════════════════════════════════════════════════════════════
// Tests
// ════════════════════════════════════════════════════════════════════════════
