//! Animator - the per-tick pipeline over one skeleton
//!
//! collect → resolve (with shoulder symmetry) → connect limbs →
//! torso refinement → publish. All state lives here; the host calls
//! [`Animator::tick`] once per period.

use super::config::AnimatorConfig;
use super::frames::{PoseSink, TransformSource};
use super::topology::{TopologyNode, DEFAULT_TOPOLOGY};
use super::torso::TorsoRig;
use super::tree::JointTree;
use crate::error::Result;

pub struct Animator {
    tree: JointTree,
    rig: TorsoRig,
    config: AnimatorConfig,
    ticks: u64,
}

impl Animator {
    /// Build the tree and locate the torso joints; a missing torso joint
    /// is a configuration error
    pub fn new(topology: &TopologyNode, config: AnimatorConfig) -> Result<Self> {
        let tree = JointTree::from_topology(topology, &config.filter, config.period())?;
        let rig = TorsoRig::find(&tree, &config.torso)?;
        tracing::info!(
            "animator ready: {} joints at {} Hz, filter {:?}",
            tree.len(),
            config.rate_hz,
            config.filter
        );
        Ok(Self {
            tree,
            rig,
            config,
            ticks: 0,
        })
    }

    /// Build from JSON topology and optional JSON config
    pub fn from_json(topology: &str, config: Option<&str>) -> Result<Self> {
        let topology = TopologyNode::from_json(topology)?;
        let config = match config {
            Some(json) => AnimatorConfig::from_json(json)?,
            None => AnimatorConfig::default(),
        };
        Self::new(&topology, config)
    }

    /// Default body topology with default config
    pub fn with_default_topology() -> Result<Self> {
        Self::from_json(DEFAULT_TOPOLOGY, None)
    }

    /// Run one full tick
    pub fn tick(&mut self, source: &impl TransformSource, sink: &mut impl PoseSink, stamp: f64) {
        let collected = self.tree.collect(source, stamp);

        let symmetry = self.rig.shoulder_symmetry();
        self.tree
            .resolve_positions_with(|tree, id| symmetry.after_resolve(tree, id));

        self.tree.connect_limbs();
        self.rig.refine(&mut self.tree);
        self.tree.publish(sink, &self.config.frames);

        self.ticks += 1;
        tracing::debug!(
            "tick {} at {:.3}: {}/{} joints sampled",
            self.ticks,
            stamp,
            collected,
            self.tree.len()
        );
    }

    pub fn tree(&self) -> &JointTree {
        &self.tree
    }

    pub fn rig(&self) -> &TorsoRig {
        &self.rig
    }

    pub fn config(&self) -> &AnimatorConfig {
        &self.config
    }

    /// Ticks run so far
    pub fn ticks(&self) -> u64 {
        self.ticks
    }
}

impl std::fmt::Debug for Animator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Animator")
            .field("joints", &self.tree.len())
            .field("ticks", &self.ticks)
            .field("config", &self.config)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::AnimatorError;

    #[test]
    fn test_default_topology_builds() {
        let animator = Animator::with_default_topology().unwrap();
        assert_eq!(animator.tree().len(), 25);
        assert_eq!(animator.ticks(), 0);
    }

    #[test]
    fn test_topology_without_torso_is_rejected() {
        let topology = TopologyNode::new("Root", 0.0).with_child(TopologyNode::new("Tip", 1.0));
        let err = Animator::new(&topology, AnimatorConfig::default()).unwrap_err();
        assert!(matches!(err, AnimatorError::JointNotFound(_)));
    }

    #[test]
    fn test_bad_json_is_parse_error() {
        let err = Animator::from_json("{not json", None).unwrap_err();
        assert!(matches!(err, AnimatorError::Parse(_)));
    }
}
