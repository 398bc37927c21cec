//! Moving-average position cell
//!
//! Bounded sample window with a lazily computed mean. The window starts
//! with a single origin sample so the mean is defined before any data.

use std::cell::Cell;
use std::collections::VecDeque;

use nalgebra::Vector3;

use super::filter::PositionFilter;

/// Default number of samples averaged
pub const DEFAULT_WINDOW: usize = 100;

/// Largest window a config may ask for
pub const MAX_WINDOW: usize = 10_000;

/// Mean of the most recent `window` samples
pub struct MovingAverage {
    /// Oldest sample at the front
    samples: VecDeque<Vector3<f64>>,
    window: usize,
    /// Cached mean, or the override written during resolution.
    /// `None` means stale.
    current: Cell<Option<Vector3<f64>>>,
}

impl MovingAverage {
    pub fn new(window: usize) -> Self {
        let window = window.max(1);
        let mut samples = VecDeque::with_capacity(window.min(MAX_WINDOW));
        samples.push_back(Vector3::zeros());
        Self {
            samples,
            window,
            current: Cell::new(None),
        }
    }

    /// Number of samples currently averaged (including the seed)
    #[cfg(test)]
    fn len(&self) -> usize {
        self.samples.len()
    }

    #[cfg(test)]
    fn window(&self) -> usize {
        self.window
    }

    fn mean(&self) -> Vector3<f64> {
        let sum = self
            .samples
            .iter()
            .fold(Vector3::zeros(), |acc, s| acc + s);
        sum / self.samples.len() as f64
    }
}

impl PositionFilter for MovingAverage {
    fn append(&mut self, sample: Vector3<f64>) {
        if self.samples.len() == self.window {
            self.samples.pop_front();
        }
        self.samples.push_back(sample);
        self.current.set(None);
    }

    fn read(&self) -> Vector3<f64> {
        if let Some(p) = self.current.get() {
            return p;
        }
        let mean = self.mean();
        self.current.set(Some(mean));
        mean
    }

    fn override_position(&mut self, position: Vector3<f64>) {
        self.current.set(Some(position));
    }
}

impl Default for MovingAverage {
    fn default() -> Self {
        Self::new(DEFAULT_WINDOW)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fresh_cell_reads_origin() {
        let cell = MovingAverage::default();
        assert_eq!(cell.read(), Vector3::zeros());
        assert_eq!(cell.len(), 1);
    }

    #[test]
    fn test_mean_includes_zero_seed_before_window_fills() {
        let mut cell = MovingAverage::new(10);
        cell.append(Vector3::new(3.0, 0.0, 0.0));
        cell.append(Vector3::new(6.0, 3.0, 0.0));
        // (0 + 3 + 6) / 3, (0 + 0 + 3) / 3
        assert!((cell.read() - Vector3::new(3.0, 1.0, 0.0)).norm() < 1e-12);
    }

    #[test]
    fn test_oldest_sample_evicted() {
        let mut cell = MovingAverage::new(3);
        for x in 1..=5 {
            cell.append(Vector3::new(x as f64, 0.0, 0.0));
        }
        assert_eq!(cell.len(), 3);
        // mean of 3, 4, 5
        assert!((cell.read().x - 4.0).abs() < 1e-12);
    }

    #[test]
    fn test_cache_invalidated_by_append() {
        let mut cell = MovingAverage::new(2);
        cell.append(Vector3::new(2.0, 0.0, 0.0));
        assert!((cell.read().x - 1.0).abs() < 1e-12);
        cell.append(Vector3::new(4.0, 0.0, 0.0));
        assert!((cell.read().x - 3.0).abs() < 1e-12);
    }

    #[test]
    fn test_override_is_exact_until_next_append() {
        let mut cell = MovingAverage::new(4);
        cell.append(Vector3::new(1.0, 1.0, 1.0));
        let forced = Vector3::new(0.1, 0.2, 0.3);
        cell.override_position(forced);
        assert_eq!(cell.read(), forced);
        assert_eq!(cell.read(), forced);

        cell.append(Vector3::new(1.0, 1.0, 1.0));
        // history is untouched by the override: (0 + 1 + 1) / 3
        assert!((cell.read() - Vector3::repeat(2.0 / 3.0)).norm() < 1e-12);
    }

    #[test]
    fn test_zero_window_is_clamped() {
        let mut cell = MovingAverage::new(0);
        cell.append(Vector3::new(7.0, 0.0, 0.0));
        assert_eq!(cell.window(), 1);
        assert_eq!(cell.read(), Vector3::new(7.0, 0.0, 0.0));
    }

    #[test]
    fn test_huge_window_does_not_preallocate() {
        let mut cell = MovingAverage::new(usize::MAX);
        cell.append(Vector3::new(2.0, 0.0, 0.0));
        assert_eq!(cell.len(), 2);
        assert_eq!(cell.read(), Vector3::new(1.0, 0.0, 0.0));
    }
}
