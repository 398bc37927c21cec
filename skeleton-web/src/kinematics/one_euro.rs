//! One Euro position filter - adaptive low-pass for jitter reduction
//!
//! Smooth when a joint is still, responsive when it moves fast. Each axis
//! gets its own adaptive cutoff from its own speed. Samples arrive once per
//! tick, so the filter's clock advances by the tick period.

use std::cell::Cell;
use std::f64::consts::PI;

use nalgebra::Vector3;

use super::filter::PositionFilter;

/// Cutoff (Hz) for the speed estimate
const SPEED_CUTOFF: f64 = 1.0;

/// Smoothing factor for a low-pass at `cutoff` Hz over `period` seconds
fn smoothing_factor(period: f64, cutoff: f64) -> f64 {
    let r = 2.0 * PI * cutoff * period;
    r / (r + 1.0)
}

/// One Euro filter over a 3D joint position
pub struct OneEuroFilter3D {
    /// Minimum cutoff (Hz); lower is smoother at rest
    min_cutoff: f64,
    /// Speed coefficient; higher means less lag during fast motion
    beta: f64,
    dt: f64,
    /// Filtered position, `None` until the first sample
    position: Option<Vector3<f64>>,
    speed: Vector3<f64>,
    overridden: Cell<Option<Vector3<f64>>>,
}

impl OneEuroFilter3D {
    /// `dt` is the tick period in seconds
    pub fn new(dt: f64, min_cutoff: f64, beta: f64) -> Self {
        Self {
            min_cutoff,
            beta,
            dt,
            position: None,
            speed: Vector3::zeros(),
            overridden: Cell::new(None),
        }
    }

    fn smooth(&mut self, sample: Vector3<f64>) -> Vector3<f64> {
        let Some(previous) = self.position else {
            return sample;
        };
        if self.dt <= 0.0 {
            return previous;
        }

        let a_speed = smoothing_factor(self.dt, SPEED_CUTOFF);
        let raw_speed = (sample - previous) / self.dt;
        self.speed = raw_speed * a_speed + self.speed * (1.0 - a_speed);

        // per axis: faster axes get a higher cutoff
        let (min_cutoff, beta, dt) = (self.min_cutoff, self.beta, self.dt);
        let alpha = self
            .speed
            .map(|v| smoothing_factor(dt, min_cutoff + beta * v.abs()));
        sample.component_mul(&alpha) + previous.component_mul(&alpha.map(|a| 1.0 - a))
    }
}

impl PositionFilter for OneEuroFilter3D {
    fn append(&mut self, sample: Vector3<f64>) {
        self.overridden.set(None);
        let smoothed = self.smooth(sample);
        self.position = Some(smoothed);
    }

    fn read(&self) -> Vector3<f64> {
        self.overridden
            .get()
            .or(self.position)
            .unwrap_or_else(Vector3::zeros)
    }

    fn override_position(&mut self, position: Vector3<f64>) {
        self.overridden.set(Some(position));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reads_origin_before_any_sample() {
        let f = OneEuroFilter3D::new(0.02, 1.0, 0.15);
        assert_eq!(f.read(), Vector3::zeros());
    }

    #[test]
    fn test_first_sample_passes_through() {
        let mut f = OneEuroFilter3D::new(0.02, 1.0, 0.15);
        f.append(Vector3::new(0.7, -0.2, 1.5));
        assert_eq!(f.read(), Vector3::new(0.7, -0.2, 1.5));
    }

    #[test]
    fn test_step_is_smoothed_per_axis() {
        let mut f = OneEuroFilter3D::new(0.02, 1.0, 0.0);
        f.append(Vector3::zeros());
        f.append(Vector3::new(1.0, 0.0, 0.0));
        let p = f.read();
        assert!(p.x > 0.0 && p.x < 1.0);
        assert_eq!(p.y, 0.0);
        assert_eq!(p.z, 0.0);
    }

    #[test]
    fn test_fast_motion_lags_less() {
        let mut slow = OneEuroFilter3D::new(0.02, 1.0, 0.0);
        let mut fast = OneEuroFilter3D::new(0.02, 1.0, 5.0);
        for f in [&mut slow, &mut fast] {
            f.append(Vector3::zeros());
            f.append(Vector3::new(1.0, 0.0, 0.0));
        }
        assert!(fast.read().x > slow.read().x);
    }

    #[test]
    fn test_zero_period_holds_value() {
        let mut f = OneEuroFilter3D::new(0.0, 1.0, 0.15);
        f.append(Vector3::new(0.5, 0.5, 0.5));
        f.append(Vector3::new(9.0, 9.0, 9.0));
        assert_eq!(f.read(), Vector3::new(0.5, 0.5, 0.5));
    }

    #[test]
    fn test_settles_on_target() {
        let mut f = OneEuroFilter3D::new(0.02, 1.0, 0.15);
        let target = Vector3::new(1.0, -1.0, 0.5);
        for _ in 0..500 {
            f.append(target);
        }
        assert!((f.read() - target).norm() < 1e-6);
    }
}
