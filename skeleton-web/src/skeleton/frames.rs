//! Frame I/O - where samples come from and where poses go
//!
//! Collection pulls one position per joint name from a [`TransformSource`];
//! publishing pushes joint and bone poses into a [`PoseSink`].

use nalgebra::{UnitQuaternion, Vector3};
use serde::{Deserialize, Serialize};

use super::joint::JointId;
use super::tree::JointTree;

/// Rigid pose of a frame in the world
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Pose {
    pub position: Vector3<f64>,
    pub orientation: UnitQuaternion<f64>,
}

impl Pose {
    pub fn new(position: Vector3<f64>, orientation: UnitQuaternion<f64>) -> Self {
        Self { position, orientation }
    }

    /// Position with identity orientation
    pub fn at(position: Vector3<f64>) -> Self {
        Self::new(position, UnitQuaternion::identity())
    }
}

/// Raw tracked positions, looked up by joint name
pub trait TransformSource {
    /// Latest position of `frame` at `stamp`, or `None` if the tracker has
    /// nothing for it. Absence is not an error.
    fn lookup(&self, frame: &str, stamp: f64) -> Option<Vector3<f64>>;
}

/// Consumer of published poses
pub trait PoseSink {
    fn publish(&mut self, frame: &str, pose: &Pose, parent_frame: &str);
}

/// Naming of published frames
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FrameNames {
    /// Parent frame of every published pose
    pub world_frame: String,
    /// Appended to a joint name to form its frame name
    pub link_suffix: String,
}

impl Default for FrameNames {
    fn default() -> Self {
        Self {
            world_frame: "/world".to_string(),
            link_suffix: "_link".to_string(),
        }
    }
}

impl FrameNames {
    pub fn joint_frame(&self, joint: &str) -> String {
        format!("{joint}{}", self.link_suffix)
    }

    pub fn bone_frame(&self, parent: &str, child: &str) -> String {
        format!("{parent}_{child}")
    }
}

impl JointTree {
    /// Pull a sample for every joint; returns how many joints got one
    ///
    /// A joint with a new sample has its per-tick state reset. Joints the
    /// source has nothing for are left untouched.
    pub fn collect(&mut self, source: &impl TransformSource, stamp: f64) -> usize {
        let mut collected = 0;
        for index in 0..self.len() {
            let joint = self.joint_mut(JointId(index));
            let Some(sample) = source.lookup(&joint.name, stamp) else {
                continue;
            };
            joint.position.append(sample);
            joint.reset_transient();
            collected += 1;
        }
        collected
    }

    /// Emit each joint's pose and the pose of every bone to its children
    pub fn publish(&self, sink: &mut impl PoseSink, names: &FrameNames) {
        for joint in self.iter() {
            sink.publish(
                &names.joint_frame(joint.name()),
                &Pose::at(joint.position()),
                &names.world_frame,
            );
            for &child in joint.children() {
                let child = &self[child];
                sink.publish(
                    &names.bone_frame(joint.name(), child.name()),
                    &Pose::new(child.limb_position(), child.limb_rotation()),
                    &names.world_frame,
                );
            }
        }
    }
}
