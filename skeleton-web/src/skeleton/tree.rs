//! Joint tree - arena of joints stored in depth-first pre-order
//!
//! Children are owned through index lists; the parent link is a plain
//! index used for reads only. Because joints are pushed in pre-order while
//! building, storage order *is* traversal order, and every parent sits at a
//! lower index than its children.

use std::collections::HashSet;
use std::ops::Index;

use nalgebra::Vector3;

use super::joint::{Joint, JointId};
use super::topology::TopologyNode;
use crate::error::{AnimatorError, Result};
use crate::kinematics::{FilterKind, PositionFilter};

pub struct JointTree {
    joints: Vec<Joint>,
}

impl JointTree {
    /// Build from a topology; `make_filter` is called once per joint
    pub fn build(
        root: &TopologyNode,
        mut make_filter: impl FnMut() -> Box<dyn PositionFilter>,
    ) -> Result<Self> {
        let mut tree = Self {
            joints: Vec::with_capacity(root.count()),
        };
        let mut seen = HashSet::new();
        tree.push_subtree(root, None, &mut make_filter, &mut seen)?;
        tracing::info!("joint tree built with {} joints", tree.len());
        Ok(tree)
    }

    /// Build with every joint smoothed by `filter`, sampled every `dt` seconds
    pub fn from_topology(root: &TopologyNode, filter: &FilterKind, dt: f64) -> Result<Self> {
        filter.validate()?;
        Self::build(root, || filter.build(dt))
    }

    fn push_subtree(
        &mut self,
        node: &TopologyNode,
        parent: Option<JointId>,
        make_filter: &mut impl FnMut() -> Box<dyn PositionFilter>,
        seen: &mut HashSet<String>,
    ) -> Result<JointId> {
        if node.name.is_empty() {
            return Err(AnimatorError::invalid_topology("joint with empty name"));
        }
        if !seen.insert(node.name.clone()) {
            return Err(AnimatorError::DuplicateJoint(node.name.clone()));
        }

        let id = JointId(self.joints.len());
        self.joints.push(Joint::new(
            node.name.clone(),
            parent,
            node.length,
            node.invert,
            node.fixed_frame.map(Vector3::from),
            make_filter(),
        ));

        for child in &node.children {
            let child_id = self.push_subtree(child, Some(id), make_filter, seen)?;
            self.joints[id.0].children.push(child_id);
        }
        Ok(id)
    }

    /// Topology description equivalent to this tree (no runtime state)
    pub fn to_topology(&self) -> TopologyNode {
        self.topology_of(self.root())
    }

    fn topology_of(&self, id: JointId) -> TopologyNode {
        let joint = &self[id];
        TopologyNode {
            name: joint.name.clone(),
            length: joint.length,
            invert: joint.invert,
            fixed_frame: joint.fixed_frame.map(|v| [v.x, v.y, v.z]),
            children: joint.children.iter().map(|&c| self.topology_of(c)).collect(),
        }
    }

    pub fn root(&self) -> JointId {
        JointId(0)
    }

    pub fn len(&self) -> usize {
        self.joints.len()
    }

    pub fn is_empty(&self) -> bool {
        self.joints.is_empty()
    }

    /// Joint ids in depth-first pre-order
    pub fn ids(&self) -> impl Iterator<Item = JointId> {
        (0..self.joints.len()).map(JointId)
    }

    /// Joints in depth-first pre-order
    pub fn iter(&self) -> impl Iterator<Item = &Joint> {
        self.joints.iter()
    }

    pub fn get(&self, id: JointId) -> Option<&Joint> {
        self.joints.get(id.0)
    }

    pub(crate) fn joint_mut(&mut self, id: JointId) -> &mut Joint {
        &mut self.joints[id.0]
    }

    /// First joint in traversal order with this name
    pub fn find(&self, name: &str) -> Result<JointId> {
        self.ids()
            .find(|&id| self[id].name == name)
            .ok_or_else(|| AnimatorError::joint_not_found(name))
    }

    /// Joint by name
    pub fn joint(&self, name: &str) -> Result<&Joint> {
        self.find(name).map(|id| &self[id])
    }

    /// `id` and all its descendants, depth-first
    pub fn subtree(&self, id: JointId) -> Vec<JointId> {
        let mut out = Vec::new();
        let mut stack = vec![id];
        while let Some(next) = stack.pop() {
            out.push(next);
            stack.extend(self[next].children.iter().rev().copied());
        }
        out
    }

    /// Rigidly shift a joint, its descendants, and their limb midpoints
    pub fn apply_displacement(&mut self, id: JointId, delta: Vector3<f64>) {
        for member in self.subtree(id) {
            let joint = self.joint_mut(member);
            let moved = joint.position() + delta;
            joint.set_position(moved);
            joint.limb_position += delta;
        }
    }
}

impl Index<JointId> for JointTree {
    type Output = Joint;

    fn index(&self, id: JointId) -> &Joint {
        &self.joints[id.0]
    }
}

impl std::fmt::Debug for JointTree {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_list().entries(self.joints.iter()).finish()
    }
}
