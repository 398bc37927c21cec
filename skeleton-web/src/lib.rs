//! Skeleton Web - smoothed, length-constrained skeleton from body tracking
//! 
//! Entry point for WASM module. Only contains:
//! - Module declarations
//! - wasm_bindgen entry points that delegate to submodules

mod bridge;
mod error;
pub mod kinematics;
pub mod skeleton;

use wasm_bindgen::prelude::*;

// Re-export wasm_bindgen functions for JS access
pub use bridge::{
    animator_tick, clear_joints, export_topology, get_debug_info, get_pose_count,
    get_poses_json, get_tick_period, init_default_skeleton, init_skeleton, remove_joint,
    update_joint, update_joints,
};
pub use bridge::{PoseBuffer, PublishedFrame, TrackingStore};
pub use error::{AnimatorError, Result};
pub use skeleton::{Animator, AnimatorConfig, JointTree, Pose, PoseSink, TopologyNode, TransformSource};

// ============================================================================
// CONSOLE LOGGING
// ============================================================================

#[wasm_bindgen]
extern "C" {
    #[wasm_bindgen(js_namespace = console)]
    fn log(s: &str);
}

macro_rules! console_log {
    ($($t:tt)*) => (log(&format_args!($($t)*).to_string()))
}

// ============================================================================
// WASM ENTRY POINTS
// ============================================================================

/// Called automatically when WASM module loads
///
/// Also routes `tracing` events to the browser console. Safe to call again.
#[wasm_bindgen(start)]
pub fn init_panic_hook() {
    console_error_panic_hook::set_once();
    #[cfg(target_arch = "wasm32")]
    {
        // already installed on a second call
        let _ = tracing_wasm::try_set_as_global_default();
    }
}

/// Initialize with the embedded body skeleton and default config
#[wasm_bindgen]
pub fn init() -> std::result::Result<(), JsValue> {
    bridge::init_default_skeleton(None)?;
    console_log!("✅ Animator initialized, call animator_tick() every {:.0} ms", bridge::get_tick_period()? * 1000.0);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_start_hook_is_idempotent() {
        init_panic_hook();
        init_panic_hook();
    }
}
