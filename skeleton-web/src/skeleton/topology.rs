//! Topology description - the static shape of the joint tree
//!
//! Each node is a single-key JSON object, name → body:
//!
//! ```text
//! {"SpineBase": {"length": 0, "invert": false, "fixedFrame": null,
//!                "children": [{"SpineMid": {"length": 0.3, ...}}]}}
//! ```

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::error::Result;

/// Default Kinect v2 body topology
pub const DEFAULT_TOPOLOGY: &str = include_str!("../../assets/body_tree.json");

/// One joint in the topology, with its nested children
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(
    try_from = "BTreeMap<String, NodeBody>",
    into = "BTreeMap<String, NodeBody>"
)]
pub struct TopologyNode {
    pub name: String,
    /// Distance to the parent joint
    pub length: f64,
    /// Flip the bone direction towards the child
    pub invert: bool,
    /// Pin the joint to this position, ignoring the parent
    pub fixed_frame: Option<[f64; 3]>,
    pub children: Vec<TopologyNode>,
}

/// Body of a topology node as written in JSON
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NodeBody {
    #[serde(default)]
    length: f64,
    #[serde(default)]
    invert: bool,
    #[serde(default, rename = "fixedFrame")]
    fixed_frame: Option<[f64; 3]>,
    #[serde(default)]
    children: Vec<TopologyNode>,
}

impl TryFrom<BTreeMap<String, NodeBody>> for TopologyNode {
    type Error = String;

    fn try_from(map: BTreeMap<String, NodeBody>) -> std::result::Result<Self, Self::Error> {
        if map.len() != 1 {
            return Err(format!(
                "topology node must have exactly one name, found {}",
                map.len()
            ));
        }
        let mut entries = map.into_iter();
        let Some((name, body)) = entries.next() else {
            return Err("empty topology node".to_string());
        };
        Ok(TopologyNode {
            name,
            length: body.length,
            invert: body.invert,
            fixed_frame: body.fixed_frame,
            children: body.children,
        })
    }
}

impl From<TopologyNode> for BTreeMap<String, NodeBody> {
    fn from(node: TopologyNode) -> Self {
        let body = NodeBody {
            length: node.length,
            invert: node.invert,
            fixed_frame: node.fixed_frame,
            children: node.children,
        };
        BTreeMap::from([(node.name, body)])
    }
}

impl TopologyNode {
    /// Leaf node with the given length
    pub fn new(name: impl Into<String>, length: f64) -> Self {
        Self {
            name: name.into(),
            length,
            invert: false,
            fixed_frame: None,
            children: Vec::new(),
        }
    }

    pub fn with_child(mut self, child: TopologyNode) -> Self {
        self.children.push(child);
        self
    }

    pub fn with_fixed_frame(mut self, anchor: [f64; 3]) -> Self {
        self.fixed_frame = Some(anchor);
        self
    }

    pub fn inverted(mut self) -> Self {
        self.invert = true;
        self
    }

    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }

    /// Number of joints in this subtree
    pub fn count(&self) -> usize {
        1 + self.children.iter().map(TopologyNode::count).sum::<usize>()
    }
}
