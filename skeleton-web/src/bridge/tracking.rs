//! Tracked joint storage and JS bridge
//!
//! Receives body-tracking joint positions from JavaScript and holds the
//! latest one per joint name for the animator to collect.

use std::cell::RefCell;
use std::collections::HashMap;

use nalgebra::Vector3;
use wasm_bindgen::prelude::*;

use crate::skeleton::TransformSource;

// ============================================================================
// TRACKING STORE
// ============================================================================

/// Latest tracked position per joint name
#[derive(Debug, Default, Clone)]
pub struct TrackingStore {
    positions: HashMap<String, Vector3<f64>>,
}

impl TrackingStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn update(&mut self, name: &str, position: Vector3<f64>) {
        self.positions.insert(name.to_string(), position);
    }

    /// Store a batch: `names` paired with consecutive xyz triples in `data`.
    /// Returns how many joints were stored.
    pub fn update_batch<'a>(
        &mut self,
        names: impl IntoIterator<Item = &'a str>,
        data: &[f64],
    ) -> usize {
        let mut stored = 0;
        for (name, xyz) in names.into_iter().zip(data.chunks_exact(3)) {
            self.update(name, Vector3::new(xyz[0], xyz[1], xyz[2]));
            stored += 1;
        }
        stored
    }

    pub fn remove(&mut self, name: &str) {
        self.positions.remove(name);
    }

    pub fn clear(&mut self) {
        self.positions.clear();
    }

    pub fn len(&self) -> usize {
        self.positions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }
}

impl TransformSource for TrackingStore {
    fn lookup(&self, frame: &str, _stamp: f64) -> Option<Vector3<f64>> {
        self.positions.get(frame).copied()
    }
}

// Thread-local storage (WASM is single-threaded)
thread_local! {
    pub(crate) static TRACKING: RefCell<TrackingStore> = RefCell::new(TrackingStore::new());
}

// ============================================================================
// WASM-BINDGEN ENTRY POINTS
// ============================================================================

/// Store one tracked joint position
#[wasm_bindgen]
pub fn update_joint(name: &str, x: f64, y: f64, z: f64) {
    TRACKING.with(|store| store.borrow_mut().update(name, Vector3::new(x, y, z)));
}

/// Store a batch of joints: comma-separated names and a flat
/// Float64Array of xyz triples in the same order
#[wasm_bindgen]
pub fn update_joints(names: &str, data: &[f64]) {
    let names: Vec<&str> = names.split(',').map(str::trim).collect();
    if data.len() != names.len() * 3 {
        web_sys::console::warn_1(
            &format!(
                "Invalid joint data length: {} (expected {})",
                data.len(),
                names.len() * 3
            )
            .into(),
        );
        return;
    }

    TRACKING.with(|store| {
        store.borrow_mut().update_batch(names, data);
    });
}

/// Forget a joint (the tracker lost it)
#[wasm_bindgen]
pub fn remove_joint(name: &str) {
    TRACKING.with(|store| store.borrow_mut().remove(name));
}

/// Forget all tracked joints
#[wasm_bindgen]
pub fn clear_joints() {
    TRACKING.with(|store| store.borrow_mut().clear());
}
