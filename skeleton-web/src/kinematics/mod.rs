//! Kinematics module - per-joint smoothing and rotation math
//!
//! Re-exports only. All logic in submodules.

mod filter;
mod kalman;
mod moving_average;
mod one_euro;
mod vector;

pub use filter::{FilterKind, PositionFilter};
pub use kalman::KalmanFilter;
pub use moving_average::{MovingAverage, DEFAULT_WINDOW, MAX_WINDOW};
pub use one_euro::OneEuroFilter3D;
pub use vector::{
    any_perpendicular, midpoint, normalize_or, rotate_about, rotation_between, try_normalize,
    DEGENERATE_EPSILON, HORIZONTAL_AXIS, REFERENCE_AXIS,
};
