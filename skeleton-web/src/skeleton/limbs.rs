//! Limb connection - bone midpoints and orientations
//!
//! The bone between a joint and its child sits halfway between them and is
//! oriented so the reference axis points from child to parent (or from
//! parent to child when the child is flagged `invert`).

use super::joint::JointId;
use super::tree::JointTree;
use crate::kinematics::{midpoint, normalize_or, rotation_between, REFERENCE_AXIS};

impl JointTree {
    /// Derive limb pose for every parent → child bone
    pub fn connect_limbs(&mut self) {
        for index in 0..self.len() {
            let parent = JointId(index);
            let p = self[parent].position();
            for child in self[parent].children.clone() {
                let c = self[child].position();
                let joint = self.joint_mut(child);

                let along = if joint.invert { c - p } else { p - c };
                // Zero-length bones get the unrotated orientation
                let direction = normalize_or(&along, REFERENCE_AXIS);

                joint.limb_position = midpoint(&p, &c);
                joint.limb_rotation = rotation_between(&REFERENCE_AXIS, &direction);
            }
        }
    }
}
