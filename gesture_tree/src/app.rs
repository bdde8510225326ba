//! Top-level application state machine.
//!
//! `AppState` owns the `ParticleField` and the `Coordinator`.  It turns
//! `GestureEvent`s from the detector thread into queued field requests and
//! drives the particle animation each frame.

use std::collections::VecDeque;
use std::sync::mpsc::{self, TryRecvError};
use std::time::{Duration, Instant};

use tracing::{debug, info};

use hand_gesture::GestureLabel;
use particle_tree::{Framebuffer, ParticleField};

use crate::config::AppConfig;
use crate::error::AppError;
use crate::gesture::{spawn_detector, GestureEvent, SimInput};
use crate::visualizer::Visualizer;

// ════════════════════════════════════════════════════════════════════════════
// TreePhase / FieldRequest
// ════════════════════════════════════════════════════════════════════════════

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TreePhase {
    /// Nothing on screen.
    Idle,
    /// A tree is up and floating.
    Shown,
    /// The tree is fading out; one dissipate step per frame.
    Dissipating,
}

impl TreePhase {
    pub fn name(self) -> &'static str {
        match self {
            TreePhase::Idle        => "idle",
            TreePhase::Shown       => "shown",
            TreePhase::Dissipating => "fading",
        }
    }
}

/// A change the render loop should make to the particle field.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FieldRequest {
    Spawn,
    Dissipate,
}

// ════════════════════════════════════════════════════════════════════════════
// Coordinator: gesture transitions → field requests, with a cooldown
// ════════════════════════════════════════════════════════════════════════════

/// Decides what each gesture transition should do to the tree.
///
/// No request is issued while the last accepted transition is less than
/// `cooldown` old.  Past that:
///
/// * `open` grows a new tree.  A fading tree is replaced.
/// * `closed` starts the fade, but only while a tree is shown.
pub struct Coordinator {
    phase:              TreePhase,
    cooldown:           Duration,
    last_transition_at: Option<Instant>,
}

impl Coordinator {
    pub fn new(cooldown: Duration) -> Self {
        Coordinator { phase: TreePhase::Idle, cooldown, last_transition_at: None }
    }

    pub fn phase(&self) -> TreePhase { self.phase }

    pub fn cooldown_elapsed(&self, now: Instant) -> bool {
        match self.last_transition_at {
            Some(t) => now.saturating_duration_since(t) >= self.cooldown,
            None    => true,
        }
    }

    pub fn handle(&mut self, label: GestureLabel, now: Instant) -> Option<FieldRequest> {
        if label == GestureLabel::Unknown {
            return None;
        }
        if !self.cooldown_elapsed(now) {
            debug!("{} ignored: cooldown", label);
            return None;
        }
        match label {
            GestureLabel::Open => {
                self.phase = TreePhase::Shown;
                self.last_transition_at = Some(now);
                Some(FieldRequest::Spawn)
            }
            GestureLabel::Closed => {
                if self.phase != TreePhase::Shown {
                    return None;
                }
                self.phase = TreePhase::Dissipating;
                self.last_transition_at = Some(now);
                Some(FieldRequest::Dissipate)
            }
            GestureLabel::Unknown => None,
        }
    }

    /// The fade has run its course.
    pub fn field_emptied(&mut self) {
        if self.phase == TreePhase::Dissipating {
            self.phase = TreePhase::Idle;
        }
    }
}

// ════════════════════════════════════════════════════════════════════════════
// AppState
// ════════════════════════════════════════════════════════════════════════════

pub struct AppState {
    field:       ParticleField,
    coordinator: Coordinator,
    /// Requests issued by gesture transitions, applied at the next tick.
    pending:     VecDeque<FieldRequest>,
    /// Set by an applied `Dissipate`, cleared by `Spawn` or an empty field.
    fading:      bool,

    // ── status ────────────────────────────────────────────────────────────
    hand_present:   bool,
    last_gesture:   Option<GestureLabel>,
    source_closed:  bool,
    pub status:     String,
}

impl AppState {
    pub fn new(cfg: &AppConfig) -> Self {
        AppState {
            field: ParticleField::new(
                cfg.window.width,
                cfg.window.height,
                cfg.tree.clone(),
                cfg.physics.clone(),
                cfg.seed,
            ),
            coordinator:   Coordinator::new(cfg.cooldown()),
            pending:       VecDeque::new(),
            fading:        false,
            hand_present:  false,
            last_gesture:  None,
            source_closed: false,
            status:        "Ready: show an open hand to grow the tree".to_string(),
        }
    }

    // ── process one GestureEvent ─────────────────────────────────────────

    pub fn handle_event(&mut self, event: GestureEvent, now: Instant) {
        match event {
            GestureEvent::Transition(label) => {
                self.last_gesture = Some(label);
                match self.coordinator.handle(label, now) {
                    Some(req) => {
                        info!("{} → {:?}", label, req);
                        self.status = match req {
                            FieldRequest::Spawn     => "OPEN: growing the tree".to_string(),
                            FieldRequest::Dissipate => "CLOSED: fading the particles".to_string(),
                        };
                        self.pending.push_back(req);
                    }
                    None => {
                        self.status = format!("{}: ignored ({})", label, self.coordinator.phase().name());
                    }
                }
            }
            GestureEvent::Presence(present) => {
                self.hand_present = present;
                if !present {
                    self.last_gesture = None;
                }
            }
            GestureEvent::SourceClosed => {
                self.source_closed = true;
                self.status = "Landmark source stopped".to_string();
            }
        }
    }

    // ── Per-frame tick ────────────────────────────────────────────────────

    pub fn tick(&mut self) {
        while let Some(req) = self.pending.pop_front() {
            match req {
                FieldRequest::Spawn => {
                    self.field.spawn();
                    self.fading = false;
                }
                FieldRequest::Dissipate => self.fading = true,
            }
        }

        // One fade step per tick until nothing is left.
        if self.fading {
            self.field.dissipate();
            if self.field.is_empty() {
                self.fading = false;
                self.coordinator.field_emptied();
                info!("tree dissipated");
                self.status = "Ready: show an open hand to grow the tree".to_string();
            }
        }

        self.field.advance();
    }

    pub fn resize(&mut self, width: usize, height: usize) {
        self.field.resize(width, height);
    }

    pub fn render(&self, fb: &mut Framebuffer) {
        self.field.render(fb);
    }

    // ── Accessors for the render loop ─────────────────────────────────────

    pub fn field(&self)        -> &ParticleField { &self.field }
    pub fn phase(&self)        -> TreePhase      { self.coordinator.phase() }
    pub fn hand_present(&self) -> bool           { self.hand_present }
    pub fn source_closed(&self) -> bool          { self.source_closed }

    /// One-line summary for the status bar.
    pub fn status_line(&self) -> String {
        format!(
            "{}   |   hand: {}   gesture: {}   tree: {}   particles: {}",
            self.status,
            if self.hand_present { "yes" } else { "no" },
            self.last_gesture.map(|g| g.as_str()).unwrap_or("-"),
            self.phase().name(),
            self.field.len(),
        )
    }
}

// ════════════════════════════════════════════════════════════════════════════
// run(): the main application loop
// ════════════════════════════════════════════════════════════════════════════

/// Run the full application.
///
/// Creates the visualizer, the landmark source (simulation by default,
/// hardware with `--features leap`) on its detector thread, and drives the
/// event/animate/render loop at ~60 fps.
pub fn run(cfg: AppConfig) -> Result<(), AppError> {
    cfg.validate()?;

    // ── Sim input channel ─────────────────────────────────────────────────
    let (sim_tx, sim_rx) = mpsc::channel::<SimInput>();

    #[cfg(not(feature = "leap"))]
    let source = crate::gesture::SimLandmarkSource::new(sim_rx, &cfg.sim, cfg.seed);
    #[cfg(feature = "leap")]
    let source = {
        drop(sim_rx);
        crate::gesture::LeapLandmarkSource
    };
    let events = spawn_detector(source, cfg.classifier.clone());

    // ── Visualizer (owns the window and the sim input sender) ────────────
    let mut vis = Visualizer::new(&cfg.window, sim_tx)?;
    let mut fb  = Framebuffer::new(cfg.window.width, cfg.window.height, cfg.window.background);

    let mut app = AppState::new(&cfg);
    info!("window {}×{}, cooldown {:?}", cfg.window.width, cfg.window.height, cfg.cooldown());

    // ── Main loop ─────────────────────────────────────────────────────────
    while vis.is_open() {
        // 1. Poll window input → SimInput
        if !vis.poll_input() { break; }

        // 2. Follow the window size
        let (w, h) = vis.size();
        if (w, h) != (fb.width(), fb.height()) && w > 0 && h > 0 {
            debug!("resize to {}×{}", w, h);
            fb.resize(w, h);
            app.resize(w, h);
        }

        // 3. Drain gesture events
        loop {
            match events.try_recv() {
                Ok(evt)                         => app.handle_event(evt, Instant::now()),
                Err(TryRecvError::Empty)        => break,
                Err(TryRecvError::Disconnected) => break,
            }
        }

        // 4. Per-frame logic
        app.tick();

        // 5. Render
        app.render(&mut fb);
        vis.draw_status(&mut fb, &app.status_line());
        vis.present(&fb)?;
    }

    info!("window closed");
    Ok(())
}

// ════════════════════════════════════════════════════════════════════════════
// Tests
// ════════════════════════════════════════════════════════════════════════════

#[cfg(test)]
mod tests {
    use super::*;

    const COOLDOWN: Duration = Duration::from_millis(1000);

    fn make_app() -> AppState {
        AppState::new(&AppConfig { seed: Some(1), ..AppConfig::default() })
    }

    fn ms(t0: Instant, n: u64) -> Instant { t0 + Duration::from_millis(n) }

    #[test]
    fn open_spawns_when_idle() {
        let mut c = Coordinator::new(COOLDOWN);
        let t0 = Instant::now();
        assert_eq!(c.handle(GestureLabel::Open, t0), Some(FieldRequest::Spawn));
        assert_eq!(c.phase(), TreePhase::Shown);
    }

    #[test]
    fn open_within_cooldown_ignored() {
        let mut c = Coordinator::new(COOLDOWN);
        let t0 = Instant::now();
        c.handle(GestureLabel::Open, t0);
        assert_eq!(c.handle(GestureLabel::Open, ms(t0, 999)), None);
        assert_eq!(c.handle(GestureLabel::Open, ms(t0, 1000)), Some(FieldRequest::Spawn));
    }

    #[test]
    fn closed_only_fades_a_shown_tree() {
        let mut c = Coordinator::new(COOLDOWN);
        let t0 = Instant::now();
        assert_eq!(c.handle(GestureLabel::Closed, t0), None);
        c.handle(GestureLabel::Open, t0);
        assert_eq!(c.handle(GestureLabel::Closed, ms(t0, 1000)), Some(FieldRequest::Dissipate));
        assert_eq!(c.phase(), TreePhase::Dissipating);
        assert_eq!(c.handle(GestureLabel::Closed, ms(t0, 2500)), None);
    }

    #[test]
    fn closed_within_cooldown_ignored() {
        let mut c = Coordinator::new(COOLDOWN);
        let t0 = Instant::now();
        c.handle(GestureLabel::Open, t0);
        assert_eq!(c.handle(GestureLabel::Closed, ms(t0, 50)), None);
        assert_eq!(c.phase(), TreePhase::Shown);
        assert_eq!(c.handle(GestureLabel::Closed, ms(t0, 999)), None);
        assert_eq!(c.handle(GestureLabel::Closed, ms(t0, 1000)), Some(FieldRequest::Dissipate));
    }

    #[test]
    fn cooldown_counts_from_last_transition() {
        let mut c = Coordinator::new(COOLDOWN);
        let t0 = Instant::now();
        c.handle(GestureLabel::Open, t0);
        c.handle(GestureLabel::Closed, ms(t0, 1500));
        assert_eq!(c.handle(GestureLabel::Open, ms(t0, 2000)), None);
        assert_eq!(c.handle(GestureLabel::Open, ms(t0, 2500)), Some(FieldRequest::Spawn));
    }

    #[test]
    fn unknown_does_nothing() {
        let mut c = Coordinator::new(COOLDOWN);
        assert_eq!(c.handle(GestureLabel::Unknown, Instant::now()), None);
        assert_eq!(c.phase(), TreePhase::Idle);
    }

    #[test]
    fn open_request_applied_on_tick() {
        let mut app = make_app();
        app.handle_event(GestureEvent::Transition(GestureLabel::Open), Instant::now());
        assert!(app.field().is_empty());
        app.tick();
        assert_eq!(app.field().len(), 209);
        assert_eq!(app.phase(), TreePhase::Shown);
    }

    #[test]
    fn closed_fades_to_idle() {
        let mut app = make_app();
        let t0 = Instant::now();
        app.handle_event(GestureEvent::Transition(GestureLabel::Open), t0);
        app.tick();
        app.handle_event(GestureEvent::Transition(GestureLabel::Closed), ms(t0, 1100));

        let mut ticks = 0;
        while app.phase() != TreePhase::Idle {
            app.tick();
            ticks += 1;
            assert!(ticks < 100, "fade never finished");
        }
        assert!(app.field().is_empty());
    }

    #[test]
    fn dissipate_request_starts_fade_on_tick() {
        let mut app = make_app();
        let t0 = Instant::now();
        app.handle_event(GestureEvent::Transition(GestureLabel::Open), t0);
        app.tick();
        let opacity = |app: &AppState| app.field().particles().iter().map(|p| p.opacity).sum::<f32>();
        let before = opacity(&app);

        app.handle_event(GestureEvent::Transition(GestureLabel::Closed), ms(t0, 1100));
        assert_eq!(app.phase(), TreePhase::Dissipating);
        assert_eq!(opacity(&app), before);

        app.tick();
        assert!(opacity(&app) < before);
    }

    #[test]
    fn early_fist_leaves_tree_standing() {
        let mut app = make_app();
        let t0 = Instant::now();
        app.handle_event(GestureEvent::Transition(GestureLabel::Open), t0);
        app.tick();
        app.handle_event(GestureEvent::Transition(GestureLabel::Closed), ms(t0, 50));
        for _ in 0..100 { app.tick(); }
        assert_eq!(app.phase(), TreePhase::Shown);
        assert_eq!(app.field().len(), 209);
    }

    #[test]
    fn shown_tree_keeps_its_particles() {
        let mut app = make_app();
        app.handle_event(GestureEvent::Transition(GestureLabel::Open), Instant::now());
        for _ in 0..300 { app.tick(); }
        assert_eq!(app.field().len(), 209);
    }

    #[test]
    fn reopen_during_fade_replaces_tree() {
        let mut app = make_app();
        let t0 = Instant::now();
        app.handle_event(GestureEvent::Transition(GestureLabel::Open), t0);
        app.tick();
        app.handle_event(GestureEvent::Transition(GestureLabel::Closed), ms(t0, 1200));
        for _ in 0..10 { app.tick(); }
        app.handle_event(GestureEvent::Transition(GestureLabel::Open), ms(t0, 2400));
        app.tick();
        assert_eq!(app.phase(), TreePhase::Shown);
        assert_eq!(app.field().len(), 209);
    }

    #[test]
    fn presence_clears_last_gesture() {
        let mut app = make_app();
        let t0 = Instant::now();
        app.handle_event(GestureEvent::Presence(true), t0);
        app.handle_event(GestureEvent::Transition(GestureLabel::Closed), t0);
        assert!(app.status_line().contains("gesture: closed"));
        app.handle_event(GestureEvent::Presence(false), t0);
        assert!(!app.hand_present());
        assert!(app.status_line().contains("gesture: -"));
    }

    #[test]
    fn source_closed_is_recorded() {
        let mut app = make_app();
        app.handle_event(GestureEvent::SourceClosed, Instant::now());
        assert!(app.source_closed());
    }
}
