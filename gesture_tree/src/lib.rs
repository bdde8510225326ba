//! # gesture_tree
//!
//! Hand-gesture controlled particle tree.  A detector thread classifies
//! each frame of hand landmarks; the render loop grows a glowing tree of
//! particles when the hand opens and lets it fade when the hand closes.
//!
//! ## Gesture → Action mapping
//!
//! | Gesture | Condition | Action |
//! |---|---|---|
//! | Open hand (≥ 4 digits extended) | cooldown elapsed | Replace the field with a fresh tree |
//! | Closed hand (≤ 1 digit extended) | tree shown | Fade every particle out |
//! | Anything else | | Ignored |
//!
//! Gestures are edge-triggered: holding a pose fires once, and losing the
//! hand re-arms the trigger.
//!
//! ## Feature flags
//!
//! * (default): **Simulation mode**, the keyboard drives a synthetic hand.
//! * `leap`: **Hardware mode**, landmarks come from a LeapMotion controller via LeapC.
//!
//! ### Simulation keyboard shortcuts
//!
//! | Key | Hand pose |
//! |---|---|
//! | `O` | Open palm |
//! | `C` | Fist |
//! | `P` | Peace sign (unknown) |
//! | `I` | Pointing index (closed) |
//! | `H` | Hide the hand |
//! | `M` | Mirror left/right |
//! | `Q` / `Esc` | Quit |

pub mod config;
pub mod error;
pub mod gesture;
pub mod visualizer;
pub mod app;

pub use app::{run, AppState, Coordinator, FieldRequest, TreePhase};
pub use config::{AppConfig, SimConfig, WindowConfig};
pub use error::AppError;
pub use gesture::{spawn_detector, DetectorFrame, FrameSink, GestureEvent, LandmarkSource, SimInput, SimLandmarkSource};
