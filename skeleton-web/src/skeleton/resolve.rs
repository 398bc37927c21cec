//! Position resolution - enforce anchors and bone lengths
//!
//! Runs in depth-first order so a parent is always resolved before its
//! children. Each joint turns its inherited displacement plus the smoothed
//! sample into a constrained position, then hands the correction it made on
//! to its children.

use nalgebra::Vector3;

use super::joint::{Constraint, JointId};
use super::tree::JointTree;
use crate::kinematics::{try_normalize, REFERENCE_AXIS};

impl JointTree {
    /// Resolve every joint in traversal order
    pub fn resolve_positions(&mut self) {
        self.resolve_positions_with(|_, _| {});
    }

    /// Resolve every joint, calling `after` once each joint is settled and
    /// before any of its children are
    pub fn resolve_positions_with(&mut self, mut after: impl FnMut(&mut JointTree, JointId)) {
        for index in 0..self.len() {
            let id = JointId(index);
            self.resolve_joint(id);
            after(self, id);
        }
    }

    /// Resolve one joint; its parent must already be resolved
    pub fn resolve_joint(&mut self, id: JointId) {
        let joint = &self[id];
        let current = joint.position();

        let displacement = match joint.constraint() {
            Constraint::Fixed(anchor) => {
                self.joint_mut(id).set_position(anchor);
                anchor - current
            }
            Constraint::Parent(parent) => {
                let origin = self[parent].position();
                let sensed = current + joint.displacement;
                let direction = try_normalize(&(sensed - origin)).unwrap_or_else(|| {
                    tracing::warn!(
                        "joint '{}' coincides with its parent, placing along reference axis",
                        joint.name
                    );
                    REFERENCE_AXIS
                });
                let resolved = origin + direction * joint.length;
                self.joint_mut(id).set_position(resolved);
                resolved - current
            }
            Constraint::Free => Vector3::zeros(),
        };

        for child in self[id].children.clone() {
            self.joint_mut(child).displacement += displacement;
        }
        self.joint_mut(id).displacement = Vector3::zeros();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::kinematics::{MovingAverage, PositionFilter};
    use crate::skeleton::TopologyNode;

    fn chain() -> JointTree {
        let topology = TopologyNode::new("root", 0.0).with_child(
            TopologyNode::new("a", 1.0).with_child(TopologyNode::new("b", 1.0)),
        );
        JointTree::build(&topology, || Box::new(MovingAverage::new(1))).unwrap()
    }

    fn feed(tree: &mut JointTree, name: &str, p: Vector3<f64>) {
        let id = tree.find(name).unwrap();
        tree.joint_mut(id).position.append(p);
    }

    #[test]
    fn test_free_root_keeps_smoothed_position() {
        let mut tree = chain();
        feed(&mut tree, "root", Vector3::new(0.3, 0.2, 0.1));
        tree.resolve_positions();
        let root = tree.joint("root").unwrap();
        assert_eq!(root.position(), Vector3::new(0.3, 0.2, 0.1));
        assert_eq!(root.displacement(), Vector3::zeros());
    }

    #[test]
    fn test_lengths_hold_after_resolution() {
        let mut tree = chain();
        feed(&mut tree, "root", Vector3::new(0.1, 0.0, 0.0));
        feed(&mut tree, "a", Vector3::new(0.7, 3.0, -1.0));
        feed(&mut tree, "b", Vector3::new(-2.0, 0.5, 4.0));
        tree.resolve_positions();

        for id in tree.ids() {
            let joint = &tree[id];
            if let Some(parent) = joint.parent() {
                let d = (joint.position() - tree[parent].position()).norm();
                assert!((d - joint.length()).abs() < 1e-9);
            }
            assert_eq!(joint.displacement(), Vector3::zeros());
        }
    }

    #[test]
    fn test_displacement_propagates_to_children() {
        let mut tree = chain();
        feed(&mut tree, "a", Vector3::new(2.0, 0.0, 0.0));
        feed(&mut tree, "b", Vector3::new(4.0, 0.0, 0.0));
        tree.resolve_positions();
        assert!((tree.joint("a").unwrap().position() - Vector3::new(1.0, 0.0, 0.0)).norm() < 1e-12);
        assert!((tree.joint("b").unwrap().position() - Vector3::new(2.0, 0.0, 0.0)).norm() < 1e-12);
    }

    #[test]
    fn test_fixed_frame_is_exact_and_ignores_parent() {
        let topology = TopologyNode::new("root", 0.0)
            .with_child(TopologyNode::new("pin", 3.0).with_fixed_frame([5.0, 5.0, 5.0]));
        let mut tree = JointTree::build(&topology, || Box::new(MovingAverage::new(4))).unwrap();
        for sample in [Vector3::new(0.1, 0.2, 0.3), Vector3::new(-9.0, 1.0, 2.5)] {
            feed(&mut tree, "root", Vector3::new(1.0, 0.0, 0.0));
            feed(&mut tree, "pin", sample);
            tree.resolve_positions();
            assert_eq!(tree.joint("pin").unwrap().position(), Vector3::new(5.0, 5.0, 5.0));
        }
    }

    #[test]
    fn test_coincident_child_uses_reference_axis() {
        let mut tree = chain();
        feed(&mut tree, "root", Vector3::new(1.0, 1.0, 1.0));
        feed(&mut tree, "a", Vector3::new(1.0, 1.0, 1.0));
        tree.resolve_positions();
        let a = tree.joint("a").unwrap().position();
        assert!((a - Vector3::new(1.0, 1.0, 2.0)).norm() < 1e-12);
    }

    #[test]
    fn test_hook_runs_before_children() {
        let mut tree = chain();
        let mut order = Vec::new();
        tree.resolve_positions_with(|tree, id| order.push(tree[id].name().to_string()));
        assert_eq!(order, ["root", "a", "b"]);
    }

    #[test]
    fn test_read_after_resolution_is_override() {
        let mut tree = chain();
        feed(&mut tree, "a", Vector3::new(0.0, 5.0, 0.0));
        tree.resolve_positions();
        let a = tree.find("a").unwrap();
        assert_eq!(tree[a].position.read(), Vector3::new(0.0, 1.0, 0.0));
    }
}
