//! Error types for skeleton construction and animation.

use thiserror::Error;
use wasm_bindgen::JsValue;

/// Errors raised while building or driving a skeleton.
#[derive(Debug, Error)]
pub enum AnimatorError {
    /// A joint required by the rig is missing from the topology.
    #[error("there is no joint in the tree named '{0}'")]
    JointNotFound(String),

    /// Two joints in one topology share a name.
    #[error("duplicate joint name '{0}' in topology")]
    DuplicateJoint(String),

    /// Topology description is structurally wrong.
    #[error("invalid topology: {0}")]
    InvalidTopology(String),

    /// A config value is out of range.
    #[error("invalid config: {0}")]
    InvalidConfig(String),

    /// JSON could not be parsed.
    #[error("parse error: {0}")]
    Parse(#[from] serde_json::Error),

    /// Bridge called before `init_skeleton`.
    #[error("skeleton not initialized")]
    NotInitialized,
}

impl AnimatorError {
    /// Creates a joint-not-found error.
    #[must_use]
    pub fn joint_not_found(name: impl Into<String>) -> Self {
        Self::JointNotFound(name.into())
    }

    /// Creates an invalid topology error.
    #[must_use]
    pub fn invalid_topology(reason: impl Into<String>) -> Self {
        Self::InvalidTopology(reason.into())
    }

    /// Creates an invalid config error.
    #[must_use]
    pub fn invalid_config(reason: impl Into<String>) -> Self {
        Self::InvalidConfig(reason.into())
    }
}

impl From<AnimatorError> for JsValue {
    fn from(err: AnimatorError) -> Self {
        JsValue::from_str(&err.to_string())
    }
}

/// Result alias for skeleton operations.
pub type Result<T> = std::result::Result<T, AnimatorError>;
