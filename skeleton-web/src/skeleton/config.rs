//! Animator configuration
//!
//! Everything has a default; a config JSON only needs the fields it changes.

use serde::{Deserialize, Serialize};

use super::frames::FrameNames;
use super::torso::TorsoNames;
use crate::error::Result;
use crate::kinematics::FilterKind;

/// Default tick rate (Hz)
pub const DEFAULT_RATE_HZ: f64 = 50.0;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnimatorConfig {
    /// Smoothing strategy for every joint
    pub filter: FilterKind,
    /// Ticks per second
    pub rate_hz: f64,
    pub torso: TorsoNames,
    #[serde(flatten)]
    pub frames: FrameNames,
}

impl Default for AnimatorConfig {
    fn default() -> Self {
        Self {
            filter: FilterKind::default(),
            rate_hz: DEFAULT_RATE_HZ,
            torso: TorsoNames::default(),
            frames: FrameNames::default(),
        }
    }
}

impl AnimatorConfig {
    pub fn from_json(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.filter.validate()?;
        Ok(config)
    }

    /// Seconds between ticks
    pub fn period(&self) -> f64 {
        if self.rate_hz > 0.0 {
            1.0 / self.rate_hz
        } else {
            1.0 / DEFAULT_RATE_HZ
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::AnimatorError;

    #[test]
    fn test_empty_json_is_default() {
        assert_eq!(AnimatorConfig::from_json("{}").unwrap(), AnimatorConfig::default());
    }

    #[test]
    fn test_partial_override() {
        let config = AnimatorConfig::from_json(
            r#"{"rate_hz": 30, "filter": {"kind": "moving_average", "window": 10},
                "world_frame": "map", "torso": {"hip_center": "Pelvis"}}"#,
        )
        .unwrap();
        assert_eq!(config.filter, FilterKind::MovingAverage { window: 10 });
        assert!((config.period() - 1.0 / 30.0).abs() < 1e-12);
        assert_eq!(config.frames.world_frame, "map");
        assert_eq!(config.frames.link_suffix, "_link");
        assert_eq!(config.torso.hip_center, "Pelvis");
        assert_eq!(config.torso.shoulder_center, "SpineShoulder");
    }

    #[test]
    fn test_non_positive_rate_falls_back() {
        let config = AnimatorConfig { rate_hz: 0.0, ..AnimatorConfig::default() };
        assert!((config.period() - 0.02).abs() < 1e-12);
    }

    #[test]
    fn test_oversized_window_is_config_error() {
        let err = AnimatorConfig::from_json(
            r#"{"filter": {"kind": "moving_average", "window": 18446744073709551615}}"#,
        )
        .unwrap_err();
        assert!(matches!(err, AnimatorError::InvalidConfig(_)), "{err}");
    }
}
