//! Edge-triggered gesture tracking.
//!
//! [`GestureTracker`] wraps a [`Classifier`] and remembers only the last label
//! it emitted.  It reports a label when it differs from that one and is not
//! `Unknown`, so a held pose produces a single event rather than one per
//! frame.

use tracing::debug;

use crate::classifier::{Classifier, ClassifierConfig, GestureLabel};
use crate::landmark::Landmark;

/// What one frame produced.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Observation {
    /// Per-frame label; `None` when no hand was in the frame.
    pub label:   Option<GestureLabel>,
    /// Set only on a transition.
    pub emitted: Option<GestureLabel>,
}

#[derive(Clone, Debug, Default)]
pub struct GestureTracker {
    classifier:   Classifier,
    last_emitted: Option<GestureLabel>,
}

impl GestureTracker {
    pub fn new(config: ClassifierConfig) -> Self {
        GestureTracker { classifier: Classifier::new(config), last_emitted: None }
    }

    pub fn classifier(&self) -> &Classifier { &self.classifier }

    /// The label most recently emitted, or `None` after a handless frame.
    pub fn last_emitted(&self) -> Option<GestureLabel> { self.last_emitted }

    /// Feed one detector frame (`None` = no hand found) and return the new
    /// label if this frame is a transition.
    pub fn on_frame(&mut self, hand: Option<&[Landmark]>) -> Option<GestureLabel> {
        self.observe(hand).emitted
    }

    pub fn observe(&mut self, hand: Option<&[Landmark]>) -> Observation {
        let Some(points) = hand else {
            if self.last_emitted.take().is_some() {
                debug!("hand lost, edge state reset");
            }
            return Observation { label: None, emitted: None };
        };

        let label = self.classifier.classify(points);
        let emitted = if label != GestureLabel::Unknown && Some(label) != self.last_emitted {
            self.last_emitted = Some(label);
            debug!("gesture transition → {}", label);
            Some(label)
        } else {
            None
        };
        Observation { label: Some(label), emitted }
    }

    /// Forget the last emitted label, as if the hand had left the frame.
    pub fn reset(&mut self) {
        self.last_emitted = None;
    }
}
