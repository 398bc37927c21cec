//! Torso refinement - square the shoulder and hip lines
//!
//! The shoulder-center's bone orientation (the spine) is composed with the
//! rotation that takes the horizontal axis onto the right→left line of each
//! triad. The side joints and everything hanging off them are then moved
//! rigidly to where the spine rotation about the center puts them.

use nalgebra::UnitQuaternion;
use serde::{Deserialize, Serialize};

use super::symmetry::{ShoulderSymmetry, Triad};
use super::tree::JointTree;
use crate::error::Result;
use crate::kinematics::{normalize_or, rotate_about, rotation_between, HORIZONTAL_AXIS};

/// Names of the joints the torso rig works on
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TorsoNames {
    pub shoulder_center: String,
    pub shoulder_left: String,
    pub shoulder_right: String,
    pub hip_center: String,
    pub hip_left: String,
    pub hip_right: String,
}

impl Default for TorsoNames {
    fn default() -> Self {
        Self {
            shoulder_center: "SpineShoulder".to_string(),
            shoulder_left: "ShoulderLeft".to_string(),
            shoulder_right: "ShoulderRight".to_string(),
            hip_center: "SpineBase".to_string(),
            hip_left: "HipLeft".to_string(),
            hip_right: "HipRight".to_string(),
        }
    }
}

/// Shoulder and hip triads, resolved against one tree
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TorsoRig {
    pub shoulders: Triad,
    pub hips: Triad,
}

impl TorsoRig {
    /// Fails if any of the six joints is missing
    pub fn find(tree: &JointTree, names: &TorsoNames) -> Result<Self> {
        Ok(Self {
            shoulders: Triad::find(
                tree,
                &names.shoulder_center,
                &names.shoulder_left,
                &names.shoulder_right,
            )?,
            hips: Triad::find(tree, &names.hip_center, &names.hip_left, &names.hip_right)?,
        })
    }

    pub fn shoulder_symmetry(&self) -> ShoulderSymmetry {
        ShoulderSymmetry::new(self.shoulders)
    }

    /// Recompute torso orientation and straighten both side lines
    ///
    /// Must run after `connect_limbs`.
    pub fn refine(&self, tree: &mut JointTree) {
        let spine = tree[self.shoulders.center].limb_rotation();
        square_triad(tree, &self.shoulders, spine);
        square_triad(tree, &self.hips, spine);
    }
}

/// Orient `triad.center` by `across * base` and swing the sides by `base`
fn square_triad(tree: &mut JointTree, triad: &Triad, base: UnitQuaternion<f64>) {
    let across = tree[triad.right].position() - tree[triad.left].position();
    let across = normalize_or(&across, HORIZONTAL_AXIS);
    let level = rotation_between(&HORIZONTAL_AXIS, &across);
    tree.joint_mut(triad.center).limb_rotation = level * base;

    let origin = tree[triad.center].position();
    for side in [triad.right, triad.left] {
        let p = tree[side].position();
        let delta = rotate_about(&base, &p, &origin) - p;
        tree.apply_displacement(side, delta);
    }
}
