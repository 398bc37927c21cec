//! Shoulder symmetry - rigid, level shoulder line
//!
//! Assumes the shoulders sit level with the shoulder-center (same z) and
//! are centred on it horizontally. Applied right after the shoulder-center
//! resolves, so the corrected targets flow through the shoulders' own
//! length constraints.

use super::joint::JointId;
use super::tree::JointTree;
use crate::error::Result;
use crate::kinematics::midpoint;

/// A center joint with a left and right partner
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Triad {
    pub center: JointId,
    pub left: JointId,
    pub right: JointId,
}

impl Triad {
    /// Look up the three joints; any missing name is an error
    pub fn find(tree: &JointTree, center: &str, left: &str, right: &str) -> Result<Self> {
        Ok(Self {
            center: tree.find(center)?,
            left: tree.find(left)?,
            right: tree.find(right)?,
        })
    }
}

/// Level and centre the shoulders on the shoulder-center
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ShoulderSymmetry {
    pub shoulders: Triad,
}

impl ShoulderSymmetry {
    pub fn new(shoulders: Triad) -> Self {
        Self { shoulders }
    }

    /// Replace the shoulders' pending displacement with the symmetric target
    pub fn apply(&self, tree: &mut JointTree) {
        let Triad { center, left, right } = self.shoulders;
        let c = tree[center].position();

        let mut l = tree[left].position() + tree[left].displacement();
        let mut r = tree[right].position() + tree[right].displacement();
        l.z = c.z;
        r.z = c.z;

        let offset = c - midpoint(&l, &r);
        l += offset;
        r += offset;

        let l_displacement = l - tree[left].position();
        let r_displacement = r - tree[right].position();
        tree.joint_mut(left).displacement = l_displacement;
        tree.joint_mut(right).displacement = r_displacement;
    }

    /// Resolve hook: fires only once the shoulder-center is settled
    pub fn after_resolve(&self, tree: &mut JointTree, id: JointId) {
        if id == self.shoulders.center {
            self.apply(tree);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::kinematics::{MovingAverage, PositionFilter};
    use crate::skeleton::TopologyNode;
    use nalgebra::Vector3;

    fn torso() -> (JointTree, ShoulderSymmetry) {
        let topology = TopologyNode::new("Center", 0.0)
            .with_child(TopologyNode::new("Left", 0.2).with_child(TopologyNode::new("ElbowL", 0.3)))
            .with_child(TopologyNode::new("Right", 0.2));
        let tree = JointTree::build(&topology, || Box::new(MovingAverage::new(1))).unwrap();
        let triad = Triad::find(&tree, "Center", "Left", "Right").unwrap();
        (tree, ShoulderSymmetry::new(triad))
    }

    fn feed(tree: &mut JointTree, name: &str, p: Vector3<f64>) {
        let id = tree.find(name).unwrap();
        tree.joint_mut(id).position.append(p);
    }

    #[test]
    fn test_shoulders_level_and_centred() {
        let (mut tree, rule) = torso();
        feed(&mut tree, "Center", Vector3::new(0.5, 0.1, 1.4));
        feed(&mut tree, "Left", Vector3::new(0.6, 0.35, 1.5));
        feed(&mut tree, "Right", Vector3::new(0.45, -0.1, 1.2));
        tree.resolve_positions_with(|tree, id| rule.after_resolve(tree, id));

        let c = tree.joint("Center").unwrap().position();
        let l = tree.joint("Left").unwrap().position();
        let r = tree.joint("Right").unwrap().position();
        assert!((l.z - c.z).abs() < 1e-9);
        assert!((r.z - c.z).abs() < 1e-9);
        let mid = midpoint(&l, &r);
        assert!((mid.x - c.x).abs() < 1e-9);
        assert!((mid.y - c.y).abs() < 1e-9);
        assert!(((l - c).norm() - 0.2).abs() < 1e-9);
    }

    #[test]
    fn test_missing_shoulder_is_error() {
        let (tree, _) = torso();
        assert!(Triad::find(&tree, "Center", "Left", "Nope").is_err());
    }

    #[test]
    fn test_displacement_replaced_not_added() {
        let (mut tree, rule) = torso();
        let left = tree.find("Left").unwrap();
        tree.joint_mut(left).displacement = Vector3::new(100.0, 0.0, 0.0);
        rule.apply(&mut tree);
        // Both shoulders start at origin with the left pushed 100 in x;
        // the centred pair straddles the origin
        let l = tree[left].position() + tree[left].displacement();
        assert!((l - Vector3::new(50.0, 0.0, 0.0)).norm() < 1e-12);
    }
}
