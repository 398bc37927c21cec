//! Bridge module - JS ↔ Rust communication
//! 
//! All #[wasm_bindgen] entry points live here.
//! Re-exports only in mod.rs, logic in submodules.

mod animator;
mod poses;
mod tracking;

pub use animator::{
    // WASM entry points
    init_skeleton,
    init_default_skeleton,
    animator_tick,
    get_tick_period,
    export_topology,
    get_debug_info,
};

pub use poses::{
    get_poses_json,
    get_pose_count,
    // Internal API
    PoseBuffer,
    PublishedFrame,
};

pub use tracking::{
    update_joint,
    update_joints,
    remove_joint,
    clear_joints,
    // Internal API
    TrackingStore,
};
