//! # hand_gesture
//!
//! Turns a stream of 21-point hand landmark frames into discrete
//! **open** / **closed** transitions.
//!
//! ## Pieces
//!
//! | Item | Role |
//! |---|---|
//! | [`Landmark`], [`HandLandmarks`] | the fixed anatomical point scheme |
//! | [`Classifier`], [`classify`] | one frame → [`GestureLabel`] |
//! | [`GestureTracker`] | edge-triggered wrapper: reports label *changes* only |
//! | [`Pose`] | synthetic hands for simulation and tests |
//! | [`replay`] | JSON-lines recordings of detector output |
//!
//! ## Quick start
//!
//! ```rust
//! use hand_gesture::{GestureTracker, GestureLabel, Pose};
//!
//! let mut tracker = GestureTracker::default();
//! let open = Pose::Open.landmarks(false);
//!
//! assert_eq!(tracker.on_frame(Some(open.points())), Some(GestureLabel::Open));
//! assert_eq!(tracker.on_frame(Some(open.points())), None);   // held, no repeat
//! assert_eq!(tracker.on_frame(None), None);                  // hand gone, re-armed
//! assert_eq!(tracker.on_frame(Some(open.points())), Some(GestureLabel::Open));
//! ```

pub mod landmark;
pub mod classifier;
pub mod tracker;
pub mod pose;
pub mod replay;

pub use classifier::{classify, Classifier, ClassifierConfig, GestureLabel};
pub use landmark::{Finger, HandLandmarks, Landmark, LandmarkError, LANDMARK_COUNT};
pub use pose::Pose;
pub use tracker::{GestureTracker, Observation};
