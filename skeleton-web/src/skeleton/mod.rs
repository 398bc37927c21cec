//! Skeleton module - joint tree and the per-tick retargeting pipeline
//!
//! Re-exports only. All logic in submodules.

mod animator;
mod config;
mod frames;
mod joint;
mod limbs;
mod resolve;
mod symmetry;
mod topology;
mod torso;
mod tree;

pub use animator::Animator;
pub use config::{AnimatorConfig, DEFAULT_RATE_HZ};
pub use frames::{FrameNames, Pose, PoseSink, TransformSource};
pub use joint::{Constraint, Joint, JointId};
pub use symmetry::{ShoulderSymmetry, Triad};
pub use topology::{TopologyNode, DEFAULT_TOPOLOGY};
pub use torso::{TorsoNames, TorsoRig};
pub use tree::JointTree;
