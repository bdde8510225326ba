//! Landmark sources and the detector thread.
//!
//! A [`LandmarkSource`] produces one [`DetectorFrame`] per camera/tracker
//! frame.  [`spawn_detector`] runs it on its own thread, classifies every
//! frame there, and delivers only the resulting [`GestureEvent`]s over a
//! `mpsc` channel.  The render loop never sees raw landmarks and the detector
//! thread never touches particles.
//!
//! Consumers don't need to know whether frames came from real hardware or
//! the keyboard simulator.

use std::sync::mpsc::{self, Receiver, RecvTimeoutError, Sender};
use std::thread;
use std::time::Duration;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::{debug, info};

use hand_gesture::{ClassifierConfig, GestureLabel, GestureTracker, Landmark, Pose};

use crate::config::SimConfig;

// ════════════════════════════════════════════════════════════════════════════
// Frames and events
// ════════════════════════════════════════════════════════════════════════════

/// One frame of detector output.
#[derive(Clone, Debug, PartialEq)]
pub enum DetectorFrame {
    /// Landmarks of the single tracked hand.
    Hand(Vec<Landmark>),
    /// The detector ran and found no hand.
    NoHand,
    /// The input wasn't ready; nothing was detected either way.
    Skipped,
}

/// What the detector thread reports to the render loop.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GestureEvent {
    /// The classified gesture changed.  Never `Unknown`.
    Transition(GestureLabel),
    /// A hand entered (`true`) or left (`false`) the frame.
    Presence(bool),
    /// The source stopped producing frames.
    SourceClosed,
}

// ════════════════════════════════════════════════════════════════════════════
// FrameSink: the classifier side of the detector thread
// ════════════════════════════════════════════════════════════════════════════

/// Receives frames from a source, runs the edge-triggered classifier, and
/// forwards events.
pub struct FrameSink {
    tracker:      GestureTracker,
    tx:           Sender<GestureEvent>,
    hand_present: bool,
    frames:       u64,
}

impl FrameSink {
    pub fn new(config: ClassifierConfig, tx: Sender<GestureEvent>) -> Self {
        FrameSink { tracker: GestureTracker::new(config), tx, hand_present: false, frames: 0 }
    }

    pub fn frames(&self) -> u64 { self.frames }

    /// Process one frame.  Returns `false` once nobody is listening, which
    /// tells the source to stop.
    pub fn submit(&mut self, frame: DetectorFrame) -> bool {
        let hand = match &frame {
            DetectorFrame::Hand(points) => Some(points.as_slice()),
            DetectorFrame::NoHand       => None,
            DetectorFrame::Skipped      => return true,
        };
        self.frames += 1;

        let present = hand.is_some();
        if present != self.hand_present {
            self.hand_present = present;
            if self.tx.send(GestureEvent::Presence(present)).is_err() {
                return false;
            }
        }

        match self.tracker.on_frame(hand) {
            Some(label) => self.tx.send(GestureEvent::Transition(label)).is_ok(),
            None        => true,
        }
    }
}

// ════════════════════════════════════════════════════════════════════════════
// LandmarkSource trait: unified interface for hw and sim
// ════════════════════════════════════════════════════════════════════════════

/// Anything that can feed detector frames into a [`FrameSink`].
pub trait LandmarkSource: Send + 'static {
    /// Produce frames until the source is exhausted or `submit` returns
    /// `false`.
    fn run(self: Box<Self>, sink: &mut FrameSink);
}

/// Spawn a source plus classifier on its own thread and return the receiving
/// end of its event stream.
pub fn spawn_detector<S: LandmarkSource>(source: S, config: ClassifierConfig) -> Receiver<GestureEvent> {
    let (tx, rx) = mpsc::channel();
    thread::spawn(move || {
        let mut sink = FrameSink::new(config, tx.clone());
        Box::new(source).run(&mut sink);
        info!("landmark source finished after {} frames", sink.frames());
        let _ = tx.send(GestureEvent::SourceClosed);
    });
    rx
}

// ════════════════════════════════════════════════════════════════════════════
// SimLandmarkSource: keyboard-driven synthetic hand (always available)
// ════════════════════════════════════════════════════════════════════════════

/// Raw input from the simulation window.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SimInput {
    /// Hold this pose in front of the "camera".
    Show(Pose),
    /// Take the hand out of view.
    Hide,
    /// Flip the hand horizontally.
    ToggleMirror,
    Quit,
}

/// Emits a jittered synthetic hand every `frame_interval`, like a detector
/// running on a live camera.  The pose follows [`SimInput`]s sent by the
/// visualizer.
pub struct SimLandmarkSource {
    rx:       Receiver<SimInput>,
    pose:     Option<Pose>,
    mirrored: bool,
    interval: Duration,
    jitter:   f32,
    rng:      StdRng,
}

impl SimLandmarkSource {
    pub fn new(rx: Receiver<SimInput>, cfg: &SimConfig, seed: Option<u64>) -> Self {
        let rng = match seed {
            Some(s) => StdRng::seed_from_u64(s ^ 0x5EED_0F_4A4D),
            None    => StdRng::from_entropy(),
        };
        SimLandmarkSource {
            rx,
            pose:     None,
            mirrored: false,
            interval: Duration::from_millis(cfg.frame_interval_ms.max(1)),
            jitter:   cfg.jitter,
            rng,
        }
    }

    fn apply(&mut self, input: SimInput) {
        match input {
            SimInput::Show(pose)   => self.pose = Some(pose),
            SimInput::Hide         => self.pose = None,
            SimInput::ToggleMirror => self.mirrored = !self.mirrored,
            SimInput::Quit         => {}
        }
        debug!("sim hand: {:?} mirrored={}", self.pose.map(Pose::name), self.mirrored);
    }

    /// The frame a detector would report right now.
    pub fn current_frame(&mut self) -> DetectorFrame {
        let Some(pose) = self.pose else {
            return DetectorFrame::NoHand;
        };
        let j = self.jitter;
        let points = pose
            .landmarks(self.mirrored)
            .points()
            .iter()
            .map(|p| {
                if j > 0.0 {
                    Landmark {
                        x: p.x + self.rng.gen_range(-j..=j),
                        y: p.y + self.rng.gen_range(-j..=j),
                        z: p.z,
                    }
                } else {
                    *p
                }
            })
            .collect();
        DetectorFrame::Hand(points)
    }
}

impl LandmarkSource for SimLandmarkSource {
    fn run(mut self: Box<Self>, sink: &mut FrameSink) {
        loop {
            match self.rx.recv_timeout(self.interval) {
                Ok(SimInput::Quit)                   => return,
                Ok(input)                            => self.apply(input),
                Err(RecvTimeoutError::Timeout)       => {}
                Err(RecvTimeoutError::Disconnected)  => return,
            }
            let frame = self.current_frame();
            if !sink.submit(frame) {
                return;
            }
        }
    }
}

// ════════════════════════════════════════════════════════════════════════════
// LeapLandmarkSource: real hardware (feature = "leap")
// ════════════════════════════════════════════════════════════════════════════

/// Landmark source backed by a LeapMotion controller.
///
/// Requires the `leap` feature flag and the LeapC shared library installed.
///
/// # Mapping
///
/// LeapC reports four bones per digit.  The 21-point scheme takes, per
/// digit, the start of the proximal, intermediate and distal bones plus the
/// distal end (the tip), with the wrist at the base of the middle
/// metacarpal.  Millimetres above the device are scaled into `[0, 1]` over
/// a 400 mm box, y flipped so it grows downward like image rows.
#[cfg(feature = "leap")]
pub struct LeapLandmarkSource;

#[cfg(feature = "leap")]
impl LandmarkSource for LeapLandmarkSource {
    fn run(self: Box<Self>, sink: &mut FrameSink) {
        use leaprs::*;
        use tracing::error;

        let mut connection = match Connection::create(ConnectionConfig::default()) {
            Ok(c)  => c,
            Err(e) => { error!("failed to create LeapC connection: {:?}", e); return; }
        };
        if let Err(e) = connection.open() {
            error!("failed to open LeapMotion device: {:?}", e);
            return;
        }
        info!("LeapMotion connection open");

        loop {
            let msg = match connection.poll(100) {
                Ok(m)  => m,
                Err(_) => {
                    // Nothing this round; the tracker is simply not ready.
                    if !sink.submit(DetectorFrame::Skipped) { return; }
                    continue;
                }
            };

            let frame = match msg.event() {
                Event::Tracking(frame) => match frame.hands().next() {
                    Some(hand) => DetectorFrame::Hand(leap_landmarks(&hand)),
                    None       => DetectorFrame::NoHand,
                },
                _ => continue,
            };
            if !sink.submit(frame) {
                return;
            }
        }
    }
}

#[cfg(feature = "leap")]
fn leap_landmarks(hand: &leaprs::Hand) -> Vec<Landmark> {
    const BOX_MM: f32 = 400.0;

    let digits: Vec<_> = hand.digits().collect();
    if digits.len() < 5 {
        return Vec::new();
    }

    let mut out = Vec::with_capacity(hand_gesture::LANDMARK_COUNT);
    let mut push = |x: f32, y: f32, z: f32| out.push(Landmark {
        x: (x + BOX_MM / 2.0) / BOX_MM,
        y: 1.0 - y / BOX_MM,
        z: z / BOX_MM,
    });

    let wrist = digits[2].metacarpal().prev_joint();
    push(wrist.x, wrist.y, wrist.z);
    for d in &digits {
        let joints = [
            d.proximal().prev_joint(),
            d.intermediate().prev_joint(),
            d.distal().prev_joint(),
            d.distal().next_joint(),
        ];
        for j in joints {
            push(j.x, j.y, j.z);
        }
    }
    out
}

// ════════════════════════════════════════════════════════════════════════════
// Tests
// ════════════════════════════════════════════════════════════════════════════
