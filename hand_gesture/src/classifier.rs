//! Open / closed hand classification.
//!
//! # Algorithm
//!
//! Each digit is tested for extension independently, then the extended
//! digits are counted:
//!
//! * **Fingers** (index, middle, ring, little): with tip `T`, PIP joint `P`
//!   and `M` the landmark two indices before `P`, the finger is extended
//!   when `|T − P| > extension_ratio · |P − M|`.  `M` is the tip of the
//!   neighbouring digit on the thumb side (the thumb tip for the index
//!   finger), not the finger's own knuckle.  A curled fingertip folds back
//!   onto its PIP joint and `|T − P|` collapses.
//! * **Thumb**: it swings sideways rather than bending, so the test is
//!   horizontal and depends on which way the hand faces.  The sign of
//!   `index_mcp.x − little_mcp.x` gives the orientation; positive means the
//!   thumb is out when `tip.x > ip.x`, otherwise when `tip.x < ip.x`.
//!
//! `count >= open_min_extended` is **open**, `count <= closed_max_extended`
//! is **closed**, anything in between is **unknown**.

use std::fmt;

use serde::{Deserialize, Serialize};
use tracing::trace;

use crate::landmark::{Finger, HandLandmarks, Landmark, INDEX_MCP, LITTLE_MCP};

// ════════════════════════════════════════════════════════════════════════════
// GestureLabel
// ════════════════════════════════════════════════════════════════════════════

/// Per-frame classification result.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GestureLabel {
    Open,
    Closed,
    /// No strong signal either way.  Never reported as a transition.
    Unknown,
}

impl GestureLabel {
    pub fn as_str(self) -> &'static str {
        match self {
            GestureLabel::Open    => "open",
            GestureLabel::Closed  => "closed",
            GestureLabel::Unknown => "unknown",
        }
    }
}

impl fmt::Display for GestureLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ════════════════════════════════════════════════════════════════════════════
// ClassifierConfig
// ════════════════════════════════════════════════════════════════════════════

/// Tuned thresholds.  The defaults were picked empirically against a webcam
/// hand tracker.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClassifierConfig {
    /// Distal/proximal segment ratio above which a finger counts as straight.
    pub extension_ratio:     f32,
    /// Extended digits needed for `Open`.  4 tolerates one lazy finger.
    pub open_min_extended:   usize,
    /// Extended digits allowed for `Closed`.
    pub closed_max_extended: usize,
}

impl Default for ClassifierConfig {
    fn default() -> Self {
        ClassifierConfig {
            extension_ratio:     0.8,
            open_min_extended:   4,
            closed_max_extended: 1,
        }
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Classifier
// ════════════════════════════════════════════════════════════════════════════

/// Stateless classifier; holds only its thresholds.
#[derive(Clone, Debug, Default)]
pub struct Classifier {
    pub config: ClassifierConfig,
}

impl Classifier {
    pub fn new(config: ClassifierConfig) -> Self {
        Classifier { config }
    }

    /// Classify one frame.  Short or non-finite input is `Unknown`.
    pub fn classify(&self, landmarks: &[Landmark]) -> GestureLabel {
        match HandLandmarks::try_from(landmarks) {
            Ok(hand) => self.classify_hand(&hand),
            Err(e) => {
                trace!("unclassifiable frame: {}", e);
                GestureLabel::Unknown
            }
        }
    }

    pub fn classify_hand(&self, hand: &HandLandmarks) -> GestureLabel {
        let count = self.extended_count(hand);
        if count >= self.config.open_min_extended {
            GestureLabel::Open
        } else if count <= self.config.closed_max_extended {
            GestureLabel::Closed
        } else {
            GestureLabel::Unknown
        }
    }

    /// Number of extended digits, 0–5.
    pub fn extended_count(&self, hand: &HandLandmarks) -> usize {
        Finger::ALL.iter().filter(|&&f| self.is_extended(hand, f)).count()
    }

    pub fn is_extended(&self, hand: &HandLandmarks, finger: Finger) -> bool {
        match finger {
            Finger::Thumb => thumb_extended(hand),
            _ => {
                let tip  = hand.get(finger.tip());
                let pip  = hand.get(finger.middle_joint());
                let base = hand.get(finger.base_joint());
                tip.distance(pip) > pip.distance(base) * self.config.extension_ratio
            }
        }
    }
}

fn thumb_extended(hand: &HandLandmarks) -> bool {
    let tip = hand.get(Finger::Thumb.tip());
    let ip  = hand.get(Finger::Thumb.middle_joint());
    let orientation = hand.get(INDEX_MCP).x - hand.get(LITTLE_MCP).x;
    if orientation > 0.0 {
        tip.x > ip.x
    } else {
        tip.x < ip.x
    }
}

/// Classify with the default thresholds.
pub fn classify(landmarks: &[Landmark]) -> GestureLabel {
    Classifier::default().classify(landmarks)
}

// ════════════════════════════════════════════════════════════════════════════
// Tests
// ════════════════════════════════════════════════════════════════════════════

#[cfg(test)]
mod tests {
    use super::*;
    use crate::landmark::{INDEX_TIP, THUMB_TIP};
    use crate::pose::Pose;

    fn label(pose: Pose, mirrored: bool) -> GestureLabel {
        classify(pose.landmarks(mirrored).points())
    }

    #[test]
    fn open_palm_is_open() {
        assert_eq!(label(Pose::Open, false), GestureLabel::Open);
    }

    #[test]
    fn fist_is_closed() {
        assert_eq!(label(Pose::Fist, false), GestureLabel::Closed);
    }

    #[test]
    fn single_finger_is_still_closed() {
        assert_eq!(label(Pose::Point, false), GestureLabel::Closed);
    }

    #[test]
    fn two_fingers_is_unknown() {
        assert_eq!(label(Pose::Peace, false), GestureLabel::Unknown);
    }

    #[test]
    fn mirroring_preserves_label() {
        for pose in [Pose::Open, Pose::Fist, Pose::Peace, Pose::Point] {
            assert_eq!(label(pose, false), label(pose, true), "pose {}", pose.name());
        }
    }

    #[test]
    fn extended_count_matches_pose() {
        let c = Classifier::default();
        for pose in [Pose::Open, Pose::Fist, Pose::Peace, Pose::Point] {
            let want = pose.extended().iter().filter(|&&e| e).count();
            for m in [false, true] {
                assert_eq!(c.extended_count(&pose.landmarks(m)), want, "pose {}", pose.name());
            }
        }
    }

    #[test]
    fn every_digit_extended_is_open() {
        let c = Classifier::default();
        for m in [false, true] {
            let hand = Pose::Open.landmarks(m);
            for f in Finger::ALL {
                assert!(c.is_extended(&hand, f), "{:?} mirrored={}", f, m);
            }
            assert_eq!(c.extended_count(&hand), 5);
            assert_eq!(c.classify_hand(&hand), GestureLabel::Open);
        }
    }

    #[test]
    fn index_is_measured_against_thumb_tip() {
        // Straight index, thumb tip dragged far from the index PIP: the
        // reference segment grows and the index no longer counts.
        let mut pts = *Pose::Open.landmarks(false).points();
        let c = Classifier::default();
        pts[THUMB_TIP] = Landmark::new(0.05, 0.95);
        let hand = HandLandmarks::new(pts).unwrap();
        assert!(!c.is_extended(&hand, Finger::Index));
        assert!(c.is_extended(&hand, Finger::Middle));
    }

    #[test]
    fn one_lazy_finger_still_open() {
        // Curl the index fingertip back onto its PIP joint.
        let mut pts = *Pose::Open.landmarks(false).points();
        pts[INDEX_TIP] = pts[INDEX_TIP - 2];
        let c = Classifier::default();
        let hand = HandLandmarks::new(pts).unwrap();
        assert_eq!(c.extended_count(&hand), 4);
        assert_eq!(c.classify_hand(&hand), GestureLabel::Open);
    }

    #[test]
    fn thumb_rule_follows_orientation() {
        // Same thumb, flipped orientation: the test must flip with it.
        let mut pts = *Pose::Open.landmarks(false).points();
        let c = Classifier::default();
        assert!(c.is_extended(&HandLandmarks::new(pts).unwrap(), Finger::Thumb));
        pts.swap(INDEX_MCP, LITTLE_MCP);
        assert!(!c.is_extended(&HandLandmarks::new(pts).unwrap(), Finger::Thumb));
        pts[THUMB_TIP].x = 0.9;
        assert!(c.is_extended(&HandLandmarks::new(pts).unwrap(), Finger::Thumb));
    }

    #[test]
    fn short_frame_is_unknown() {
        let hand = Pose::Open.landmarks(false);
        let pts = &hand.points()[..20];
        assert_eq!(classify(pts), GestureLabel::Unknown);
        assert_eq!(classify(&[]), GestureLabel::Unknown);
    }

    #[test]
    fn nan_frame_is_unknown() {
        let mut pts = *Pose::Fist.landmarks(false).points();
        pts[3].x = f32::INFINITY;
        assert_eq!(classify(&pts), GestureLabel::Unknown);
    }

    #[test]
    fn stricter_ratio_can_close_hand() {
        // Every open-pose finger has |T − P| / |P − M| of 1.0 or less, so
        // only the thumb survives a 1.5 threshold.
        let c = Classifier::new(ClassifierConfig { extension_ratio: 1.5, ..Default::default() });
        assert_eq!(c.extended_count(&Pose::Open.landmarks(false)), 1);
        assert_eq!(c.classify_hand(&Pose::Open.landmarks(false)), GestureLabel::Closed);
    }

    #[test]
    fn label_serializes_lowercase() {
        assert_eq!(serde_json::to_string(&GestureLabel::Open).unwrap(), "\"open\"");
        assert_eq!(GestureLabel::Closed.to_string(), "closed");
    }
}
