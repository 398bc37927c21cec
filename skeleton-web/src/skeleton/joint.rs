//! Joint - one node of the skeleton
//!
//! Structure (name, edges, length, invert, anchor) is fixed at build time.
//! Position lives in the joint's filter; displacement and limb pose are
//! per-tick scratch state reset whenever a fresh sample arrives.

use nalgebra::{UnitQuaternion, Vector3};

use crate::kinematics::PositionFilter;

/// Index of a joint inside its tree
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct JointId(pub(crate) usize);

impl JointId {
    pub fn index(self) -> usize {
        self.0
    }
}

/// How a joint's position is decided each tick
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Constraint {
    /// Pinned to an absolute position; the parent is ignored
    Fixed(Vector3<f64>),
    /// Kept at `length` from the parent, along the sensed direction
    Parent(JointId),
    /// Root without anchor: follows the smoothed sample
    Free,
}

pub struct Joint {
    pub(crate) name: String,
    pub(crate) parent: Option<JointId>,
    pub(crate) children: Vec<JointId>,
    pub(crate) length: f64,
    pub(crate) invert: bool,
    pub(crate) fixed_frame: Option<Vector3<f64>>,

    pub(crate) position: Box<dyn PositionFilter>,

    /// Correction inherited from the parent, not yet absorbed
    pub(crate) displacement: Vector3<f64>,
    /// Midpoint of the bone from the parent to this joint
    pub(crate) limb_position: Vector3<f64>,
    /// Orientation of the bone from the parent to this joint
    pub(crate) limb_rotation: UnitQuaternion<f64>,
}

impl Joint {
    pub(crate) fn new(
        name: String,
        parent: Option<JointId>,
        length: f64,
        invert: bool,
        fixed_frame: Option<Vector3<f64>>,
        position: Box<dyn PositionFilter>,
    ) -> Self {
        Self {
            name,
            parent,
            children: Vec::new(),
            length,
            invert,
            fixed_frame,
            position,
            displacement: Vector3::zeros(),
            limb_position: Vector3::zeros(),
            limb_rotation: UnitQuaternion::identity(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn parent(&self) -> Option<JointId> {
        self.parent
    }

    pub fn children(&self) -> &[JointId] {
        &self.children
    }

    pub fn length(&self) -> f64 {
        self.length
    }

    pub fn is_inverted(&self) -> bool {
        self.invert
    }

    pub fn fixed_frame(&self) -> Option<Vector3<f64>> {
        self.fixed_frame
    }

    /// Anchor wins over parent; a root without anchor is free
    pub fn constraint(&self) -> Constraint {
        match (self.fixed_frame, self.parent) {
            (Some(anchor), _) => Constraint::Fixed(anchor),
            (None, Some(parent)) => Constraint::Parent(parent),
            (None, None) => Constraint::Free,
        }
    }

    /// Current (smoothed or resolved) position
    pub fn position(&self) -> Vector3<f64> {
        self.position.read()
    }

    pub fn displacement(&self) -> Vector3<f64> {
        self.displacement
    }

    pub fn limb_position(&self) -> Vector3<f64> {
        self.limb_position
    }

    pub fn limb_rotation(&self) -> UnitQuaternion<f64> {
        self.limb_rotation
    }

    pub(crate) fn set_position(&mut self, position: Vector3<f64>) {
        self.position.override_position(position);
    }

    pub(crate) fn reset_transient(&mut self) {
        self.displacement = Vector3::zeros();
        self.limb_position = Vector3::zeros();
        self.limb_rotation = UnitQuaternion::identity();
    }
}

impl std::fmt::Debug for Joint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Joint")
            .field("name", &self.name)
            .field("parent", &self.parent)
            .field("children", &self.children)
            .field("length", &self.length)
            .field("position", &self.position())
            .finish_non_exhaustive()
    }
}
