//! Application configuration.
//!
//! Every field has a default, so a config file only needs the keys it
//! changes:
//!
//! ```toml
//! cooldown_ms = 800
//! seed = 7
//!
//! [window]
//! width = 1920
//! height = 1080
//!
//! [classifier]
//! extension_ratio = 0.75
//!
//! [tree]
//! layers = 10
//!
//! [physics]
//! fade_step = 0.03
//! ```

use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use hand_gesture::ClassifierConfig;
use particle_tree::{PhysicsConfig, TreeConfig};

use crate::error::AppError;

// ════════════════════════════════════════════════════════════════════════════
// WindowConfig
// ════════════════════════════════════════════════════════════════════════════

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WindowConfig {
    pub title:      String,
    pub width:      usize,
    pub height:     usize,
    pub resizable:  bool,
    /// Packed ARGB clear color.
    pub background: u32,
}

impl Default for WindowConfig {
    fn default() -> Self {
        WindowConfig {
            title:      "Gesture Tree: open hand to grow, close to fade".to_string(),
            width:      1280,
            height:     720,
            resizable:  true,
            background: 0xFF05070F,
        }
    }
}

// ════════════════════════════════════════════════════════════════════════════
// SimConfig: the keyboard-driven synthetic hand
// ════════════════════════════════════════════════════════════════════════════

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimConfig {
    /// Time between synthetic detector frames.
    pub frame_interval_ms: u64,
    /// Per-coordinate landmark noise (normalized units).
    pub jitter:            f32,
}

impl Default for SimConfig {
    fn default() -> Self {
        SimConfig { frame_interval_ms: 33, jitter: 0.004 }
    }
}

// ════════════════════════════════════════════════════════════════════════════
// AppConfig
// ════════════════════════════════════════════════════════════════════════════

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub window:      WindowConfig,
    pub classifier:  ClassifierConfig,
    pub tree:        TreeConfig,
    pub physics:     PhysicsConfig,
    pub sim:         SimConfig,
    /// Minimum time between two tree spawns.
    pub cooldown_ms: u64,
    /// Fixed RNG seed for reproducible trees.
    pub seed:        Option<u64>,
}

impl Default for AppConfig {
    fn default() -> Self {
        AppConfig {
            window:      WindowConfig::default(),
            classifier:  ClassifierConfig::default(),
            tree:        TreeConfig::default(),
            physics:     PhysicsConfig::default(),
            sim:         SimConfig::default(),
            cooldown_ms: 1000,
            seed:        None,
        }
    }
}

impl AppConfig {
    pub fn cooldown(&self) -> Duration {
        Duration::from_millis(self.cooldown_ms)
    }

    /// Load from a TOML file; missing keys keep their defaults.
    pub fn load(path: &Path) -> Result<Self, AppError> {
        let text = std::fs::read_to_string(path).map_err(|source| AppError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let cfg = Self::from_toml(&text).map_err(|e| match e {
            AppError::Config { source, .. } => AppError::Config { path: path.to_path_buf(), source },
            other => other,
        })?;
        Ok(cfg)
    }

    pub fn from_toml(text: &str) -> Result<Self, AppError> {
        let cfg: AppConfig = toml::from_str(text).map_err(|source| AppError::Config {
            path: "<inline>".into(),
            source,
        })?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// Reject settings that would hang or break the animation.
    pub fn validate(&self) -> Result<(), AppError> {
        let bad = |msg: String| Err(AppError::Invalid(msg));

        if self.window.width == 0 || self.window.height == 0 {
            return bad(format!("window size {}×{}", self.window.width, self.window.height));
        }
        let c = &self.classifier;
        if !(c.extension_ratio.is_finite() && c.extension_ratio > 0.0) {
            return bad(format!("classifier.extension_ratio = {}", c.extension_ratio));
        }
        if c.open_min_extended > 5 || c.closed_max_extended >= c.open_min_extended {
            return bad(format!(
                "need closed_max_extended < open_min_extended <= 5, got {} / {}",
                c.closed_max_extended, c.open_min_extended
            ));
        }
        let p = &self.physics;
        // Dissipation must make progress or the tree never disappears.
        if p.fade_step <= 0.0 && (p.shrink_factor >= 1.0 || p.min_size <= 0.0) {
            return bad("physics: fade_step, shrink_factor and min_size never remove a particle".into());
        }
        if !(0.0..=1.0).contains(&p.follow) || !(0.0..=1.0).contains(&p.bounce_damping) {
            return bad("physics.follow and physics.bounce_damping must be within 0–1".into());
        }
        if self.sim.jitter < 0.0 {
            return bad(format!("sim.jitter = {}", self.sim.jitter));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        assert!(AppConfig::default().validate().is_ok());
    }

    #[test]
    fn partial_file_keeps_defaults() {
        let cfg = AppConfig::from_toml(
            "cooldown_ms = 250\nseed = 9\n[tree]\nlayers = 10\n[classifier]\nextension_ratio = 0.7\n",
        )
        .unwrap();
        assert_eq!(cfg.cooldown(), Duration::from_millis(250));
        assert_eq!(cfg.seed, Some(9));
        assert_eq!(cfg.tree.layers, 10);
        assert_eq!(cfg.tree.base_count, 15);
        assert_eq!(cfg.classifier.extension_ratio, 0.7);
        assert_eq!(cfg.classifier.open_min_extended, 4);
        assert_eq!(cfg.window, WindowConfig::default());
    }

    #[test]
    fn empty_file_is_default() {
        assert_eq!(AppConfig::from_toml("").unwrap(), AppConfig::default());
    }

    #[test]
    fn syntax_error_is_config_error() {
        assert!(matches!(AppConfig::from_toml("cooldown_ms = ["), Err(AppError::Config { .. })));
    }

    #[test]
    fn non_terminating_fade_rejected() {
        let err = AppConfig::from_toml("[physics]\nfade_step = 0.0\nshrink_factor = 1.0\n");
        assert!(matches!(err, Err(AppError::Invalid(_))));
    }

    #[test]
    fn overlapping_thresholds_rejected() {
        let err = AppConfig::from_toml("[classifier]\nopen_min_extended = 2\nclosed_max_extended = 2\n");
        assert!(matches!(err, Err(AppError::Invalid(_))));
    }

    #[test]
    fn missing_file_is_io_error() {
        let err = AppConfig::load(Path::new("/definitely/not/here.toml"));
        assert!(matches!(err, Err(AppError::Io { .. })));
    }
}
