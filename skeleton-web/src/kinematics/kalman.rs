//! Kalman filter position cell
//!
//! State vector: [x, y, z, vx, vy, vz]ᵀ (6 elements)
//! One predict + update per appended sample, stepped by the tick period.

use std::cell::Cell;

use nalgebra::{SMatrix, SVector, Vector3};

use super::filter::PositionFilter;

/// 6-element state vector type
type State = SVector<f64, 6>;
/// 6x6 matrix type
type Matrix6 = SMatrix<f64, 6, 6>;
/// 3x6 matrix type (observation)
type Matrix3x6 = SMatrix<f64, 3, 6>;
/// 6x3 matrix type (Kalman gain)
type Matrix6x3 = SMatrix<f64, 6, 3>;
/// 3x3 matrix type
type Matrix3 = SMatrix<f64, 3, 3>;

/// Velocity decay per step, keeps the estimate from drifting between samples
const VELOCITY_DECAY: f64 = 0.98;

/// Constant-velocity Kalman filter for one joint
pub struct KalmanFilter {
    /// State: [x, y, z, vx, vy, vz]
    state: State,

    /// State covariance matrix (uncertainty)
    covariance: Matrix6,

    /// Process noise (how much we trust the motion model)
    process_noise: Matrix6,

    /// Measurement noise covariance
    measurement_noise: Matrix3,

    /// Step between samples (seconds)
    dt: f64,

    initialized: bool,

    overridden: Cell<Option<Vector3<f64>>>,
}

impl KalmanFilter {
    pub fn new(dt: f64, process_noise: f64, measurement_noise: f64) -> Self {
        // Positions are trusted more than velocities
        let mut q = Matrix6::zeros();
        for i in 0..3 {
            q[(i, i)] = process_noise * 0.1;
            q[(i + 3, i + 3)] = process_noise;
        }

        Self {
            state: State::zeros(),
            covariance: Matrix6::identity() * 0.1,
            process_noise: q,
            measurement_noise: Matrix3::identity() * measurement_noise,
            dt,
            initialized: false,
            overridden: Cell::new(None),
        }
    }

    /// Build transition matrix F for given timestep
    ///
    /// ```text
    /// | I  dt·I |
    /// | 0   I   |
    /// ```
    fn transition_matrix(dt: f64) -> Matrix6 {
        let mut f = Matrix6::identity();
        for i in 0..3 {
            f[(i, i + 3)] = dt;
        }
        f
    }

    /// Observation matrix H (we only measure position)
    fn observation_matrix() -> Matrix3x6 {
        let mut h = Matrix3x6::zeros();
        for i in 0..3 {
            h[(i, i)] = 1.0;
        }
        h
    }

    /// Predict step
    pub fn predict(&mut self, dt: f64) {
        let f = Self::transition_matrix(dt);

        // State prediction: x = F * x
        self.state = f * self.state;

        // Covariance prediction: P = F * P * Fᵀ + Q
        self.covariance = f * self.covariance * f.transpose() + self.process_noise;

        for i in 3..6 {
            self.state[i] *= VELOCITY_DECAY;
        }
    }

    /// Update step with a measured position
    pub fn update(&mut self, measured: Vector3<f64>) {
        let h = Self::observation_matrix();

        // Innovation: y = z - H * x
        let innovation = measured - h * self.state;

        // Innovation covariance: S = H * P * Hᵀ + R
        let s = h * self.covariance * h.transpose() + self.measurement_noise;

        // Kalman gain: K = P * Hᵀ * S⁻¹
        let s_inv = s.try_inverse().unwrap_or_else(Matrix3::identity);
        let k: Matrix6x3 = self.covariance * h.transpose() * s_inv;

        // State update: x = x + K * y
        self.state += k * innovation;

        // Covariance update: P = (I - K * H) * P
        self.covariance = (Matrix6::identity() - k * h) * self.covariance;
    }

    /// Estimated position
    pub fn position(&self) -> Vector3<f64> {
        self.state.fixed_rows::<3>(0).into_owned()
    }

    /// Estimated velocity
    pub fn velocity(&self) -> Vector3<f64> {
        self.state.fixed_rows::<3>(3).into_owned()
    }

    /// Initialize filter with first measurement
    pub fn initialize(&mut self, position: Vector3<f64>) {
        self.state = State::zeros();
        self.state.fixed_rows_mut::<3>(0).copy_from(&position);
        self.initialized = true;
    }
}

impl PositionFilter for KalmanFilter {
    fn append(&mut self, sample: Vector3<f64>) {
        self.overridden.set(None);
        if !self.initialized {
            self.initialize(sample);
            return;
        }
        self.predict(self.dt);
        self.update(sample);
    }

    fn read(&self) -> Vector3<f64> {
        self.overridden.get().unwrap_or_else(|| self.position())
    }

    fn override_position(&mut self, position: Vector3<f64>) {
        self.overridden.set(Some(position));
    }
}
