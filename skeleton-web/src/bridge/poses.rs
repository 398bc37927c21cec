//! Published pose storage
//!
//! The animator publishes into a buffer; JavaScript reads the last tick's
//! frames back as JSON.

use std::cell::RefCell;

use serde::Serialize;
use wasm_bindgen::prelude::*;

use crate::skeleton::{Pose, PoseSink};

/// One published frame
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PublishedFrame {
    pub frame: String,
    pub parent: String,
    #[serde(flatten)]
    pub pose: Pose,
}

/// Frames published during the last tick, in publish order
#[derive(Debug, Default, Clone)]
pub struct PoseBuffer {
    frames: Vec<PublishedFrame>,
}

impl PoseBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn clear(&mut self) {
        self.frames.clear();
    }

    pub fn frames(&self) -> &[PublishedFrame] {
        &self.frames
    }

    pub fn get(&self, frame: &str) -> Option<&Pose> {
        self.frames.iter().find(|f| f.frame == frame).map(|f| &f.pose)
    }

    pub fn len(&self) -> usize {
        self.frames.len()
    }

    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(&self.frames)
    }
}

impl PoseSink for PoseBuffer {
    fn publish(&mut self, frame: &str, pose: &Pose, parent_frame: &str) {
        self.frames.push(PublishedFrame {
            frame: frame.to_string(),
            parent: parent_frame.to_string(),
            pose: *pose,
        });
    }
}

thread_local! {
    pub(crate) static POSES: RefCell<PoseBuffer> = RefCell::new(PoseBuffer::new());
}

/// Poses from the last tick as a JSON array of
/// `{frame, parent, position: [x, y, z], orientation: [x, y, z, w]}`
#[wasm_bindgen]
pub fn get_poses_json() -> String {
    POSES.with(|buffer| {
        buffer.borrow().to_json().unwrap_or_else(|e| {
            web_sys::console::error_1(&format!("Pose serialization failed: {e}").into());
            "[]".to_string()
        })
    })
}

/// Number of frames published last tick
#[wasm_bindgen]
pub fn get_pose_count() -> usize {
    POSES.with(|buffer| buffer.borrow().len())
}

#[cfg(test)]
mod tests {
    use super::*;
    use nalgebra::Vector3;

    #[test]
    fn test_records_in_order() {
        let mut buffer = PoseBuffer::new();
        buffer.publish("a_link", &Pose::at(Vector3::new(1.0, 0.0, 0.0)), "/world");
        buffer.publish("b_link", &Pose::at(Vector3::new(2.0, 0.0, 0.0)), "/world");
        assert_eq!(buffer.len(), 2);
        assert_eq!(buffer.frames()[1].frame, "b_link");
        assert_eq!(buffer.get("a_link").map(|p| p.position.x), Some(1.0));
    }

    #[test]
    fn test_json_shape() {
        let mut buffer = PoseBuffer::new();
        buffer.publish("a_link", &Pose::at(Vector3::new(1.0, 2.0, 3.0)), "/world");
        let value: serde_json::Value = serde_json::from_str(&buffer.to_json().unwrap()).unwrap();
        let frame = &value[0];
        assert_eq!(frame["frame"], "a_link");
        assert_eq!(frame["parent"], "/world");
        assert_eq!(frame["position"], serde_json::json!([1.0, 2.0, 3.0]));
        assert_eq!(frame["orientation"], serde_json::json!([0.0, 0.0, 0.0, 1.0]));
    }
}
