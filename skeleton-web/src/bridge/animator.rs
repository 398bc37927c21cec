//! Animator lifecycle for JavaScript
//!
//! JS initialises the skeleton once, then calls `animator_tick` at the
//! configured rate (see `get_tick_period`) and reads `get_poses_json`.

use std::cell::RefCell;

use wasm_bindgen::prelude::*;

use super::poses::POSES;
use super::tracking::TRACKING;
use crate::error::AnimatorError;
use crate::skeleton::{Animator, DEFAULT_TOPOLOGY};

thread_local! {
    static ANIMATOR: RefCell<Option<Animator>> = RefCell::new(None);
}

/// Install an animator built by the caller
fn install(animator: Animator) {
    ANIMATOR.with(|slot| *slot.borrow_mut() = Some(animator));
}

/// Build the skeleton from a topology JSON and optional config JSON.
/// Replaces any previous skeleton.
#[wasm_bindgen]
pub fn init_skeleton(topology_json: &str, config_json: Option<String>) -> Result<(), JsValue> {
    let animator = Animator::from_json(topology_json, config_json.as_deref())?;
    web_sys::console::log_1(
        &format!(
            "🦴 Skeleton ready: {} joints @ {} Hz",
            animator.tree().len(),
            animator.config().rate_hz
        )
        .into(),
    );
    install(animator);
    Ok(())
}

/// Build the embedded default body skeleton
#[wasm_bindgen]
pub fn init_default_skeleton(config_json: Option<String>) -> Result<(), JsValue> {
    init_skeleton(DEFAULT_TOPOLOGY, config_json)
}

/// Run one tick: collect tracked joints, resolve, publish into the pose buffer.
/// `stamp` is in seconds; defaults to the browser clock.
#[wasm_bindgen]
pub fn animator_tick(stamp: Option<f64>) -> Result<(), JsValue> {
    let stamp = stamp.unwrap_or_else(|| js_sys::Date::now() / 1000.0);

    ANIMATOR.with(|slot| -> Result<(), JsValue> {
        let mut slot = slot.borrow_mut();
        let animator = slot.as_mut().ok_or(AnimatorError::NotInitialized)?;

        TRACKING.with(|tracking| {
            POSES.with(|poses| {
                let mut poses = poses.borrow_mut();
                poses.clear();
                animator.tick(&*tracking.borrow(), &mut *poses, stamp);
            })
        });
        Ok(())
    })
}

/// Seconds between ticks for the current skeleton
#[wasm_bindgen]
pub fn get_tick_period() -> Result<f64, JsValue> {
    ANIMATOR.with(|slot| -> Result<f64, JsValue> {
        let slot = slot.borrow();
        let animator = slot.as_ref().ok_or(AnimatorError::NotInitialized)?;
        Ok(animator.config().period())
    })
}

/// Topology of the current skeleton as JSON
#[wasm_bindgen]
pub fn export_topology() -> Result<String, JsValue> {
    ANIMATOR.with(|slot| -> Result<String, JsValue> {
        let slot = slot.borrow();
        let animator = slot.as_ref().ok_or(AnimatorError::NotInitialized)?;
        Ok(animator.tree().to_topology().to_json()?)
    })
}

/// Debug summary of the current skeleton
#[wasm_bindgen]
pub fn get_debug_info() -> String {
    ANIMATOR.with(|slot| match slot.borrow().as_ref() {
        Some(animator) => format!(
            "joints={} ticks={} tracked={}",
            animator.tree().len(),
            animator.ticks(),
            TRACKING.with(|t| t.borrow().len()),
        ),
        None => "skeleton not initialized".to_string(),
    })
}
