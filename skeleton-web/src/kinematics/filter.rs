//! Position filter contract - pluggable smoothing per joint
//!
//! Separates what the sensor reported (the sample history) from what the
//! skeleton currently shows (the read value). Resolution writes corrected
//! positions through `override_position` without touching the history.

use nalgebra::Vector3;
use serde::{Deserialize, Serialize};

use super::kalman::KalmanFilter;
use crate::error::{AnimatorError, Result};
use super::moving_average::{MovingAverage, DEFAULT_WINDOW, MAX_WINDOW};
use super::one_euro::OneEuroFilter3D;

/// Smoothing strategy held by every joint
pub trait PositionFilter {
    /// Feed a new raw sample; clears any override
    fn append(&mut self, sample: Vector3<f64>);

    /// Current position: the override if set, else the filtered estimate
    fn read(&self) -> Vector3<f64>;

    /// Replace the read value until the next `append`
    fn override_position(&mut self, position: Vector3<f64>);
}

/// Which smoothing strategy to build for the joints of a tree
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum FilterKind {
    /// Mean of the last `window` samples
    MovingAverage {
        #[serde(default = "default_window")]
        window: usize,
    },
    /// Constant-velocity Kalman filter
    Kalman {
        #[serde(default = "default_process_noise")]
        process_noise: f64,
        #[serde(default = "default_measurement_noise")]
        measurement_noise: f64,
    },
    /// Adaptive low-pass (One Euro) filter
    OneEuro {
        #[serde(default = "default_min_cutoff")]
        min_cutoff: f64,
        #[serde(default = "default_beta")]
        beta: f64,
    },
}

fn default_window() -> usize { DEFAULT_WINDOW }
fn default_process_noise() -> f64 { 0.01 }
fn default_measurement_noise() -> f64 { 0.005 }
fn default_min_cutoff() -> f64 { 1.0 }
fn default_beta() -> f64 { 0.15 }

impl Default for FilterKind {
    fn default() -> Self {
        FilterKind::MovingAverage { window: DEFAULT_WINDOW }
    }
}

impl FilterKind {
    /// Reject parameters no filter can run with
    pub fn validate(&self) -> Result<()> {
        match *self {
            FilterKind::MovingAverage { window } => {
                if window > MAX_WINDOW {
                    return Err(AnimatorError::invalid_config(format!(
                        "moving average window {window} exceeds {MAX_WINDOW}"
                    )));
                }
            }
            FilterKind::Kalman { process_noise, measurement_noise } => {
                if !(process_noise.is_finite() && process_noise > 0.0)
                    || !(measurement_noise.is_finite() && measurement_noise > 0.0)
                {
                    return Err(AnimatorError::invalid_config(
                        "kalman noise terms must be positive and finite",
                    ));
                }
            }
            FilterKind::OneEuro { min_cutoff, beta } => {
                if !(min_cutoff.is_finite() && min_cutoff > 0.0) || !(beta.is_finite() && beta >= 0.0) {
                    return Err(AnimatorError::invalid_config(
                        "one euro needs min_cutoff > 0 and beta >= 0",
                    ));
                }
            }
        }
        Ok(())
    }

    /// Build a fresh filter; `dt` is the tick period in seconds
    pub fn build(&self, dt: f64) -> Box<dyn PositionFilter> {
        match *self {
            FilterKind::MovingAverage { window } => Box::new(MovingAverage::new(window)),
            FilterKind::Kalman { process_noise, measurement_noise } => {
                Box::new(KalmanFilter::new(dt, process_noise, measurement_noise))
            }
            FilterKind::OneEuro { min_cutoff, beta } => {
                Box::new(OneEuroFilter3D::new(dt, min_cutoff, beta))
            }
        }
    }
}
