//! File-backed pose samples, loaded once at startup.

use std::path::Path;

use serde::Deserialize;

use crate::ros_msg::{
    ColorRGBA, Header, Marker, MarkerArray, Point, Pose, Quaternion, Vector3D,
};
use crate::snapshot::{SnapshotError, SnapshotSource};

#[derive(Debug, Deserialize)]
struct FrameRecord {
    name: String,
    position: [f64; 3],
    orientation: [f64; 4],
    #[serde(default)]
    time: f64,
}

#[derive(Debug, Deserialize)]
struct FrameStoreDocument {
    frames: Vec<FrameRecord>,
}

/// A single named pose sample drawn from a frame store.
#[derive(Debug, Clone, PartialEq)]
pub struct Frame {
    pub name: String,
    pub pose: Pose,
    /// Sample time offset recorded in the store, in seconds
    pub time: f64,
}

impl Frame {
    /// Render the pose as a marker array: a sphere at the position plus a
    /// text label above it. Stamps are left for the publisher to fill in.
    pub fn to_marker_array(&self, frame_id: &str) -> MarkerArray {
        let header = Header {
            frame_id: frame_id.to_string(),
            ..Default::default()
        };
        let sphere = Marker {
            header: header.clone(),
            ns: self.name.clone(),
            id: 0,
            type_: Marker::SPHERE,
            action: Marker::ADD,
            pose: self.pose,
            scale: Vector3D {
                x: 0.2,
                y: 0.2,
                z: 0.2,
            },
            color: ColorRGBA {
                r: 0.0,
                g: 0.4,
                b: 1.0,
                a: 1.0,
            },
            ..Default::default()
        };
        let label = Marker {
            header,
            ns: self.name.clone(),
            id: 1,
            type_: Marker::TEXT_VIEW_FACING,
            action: Marker::ADD,
            pose: Pose {
                position: Point {
                    z: self.pose.position.z + 0.3,
                    ..self.pose.position
                },
                orientation: Quaternion::default(),
            },
            scale: Vector3D {
                z: 0.15,
                ..Default::default()
            },
            color: ColorRGBA {
                r: 1.0,
                g: 1.0,
                b: 1.0,
                a: 1.0,
            },
            text: self.name.clone(),
            ..Default::default()
        };
        MarkerArray {
            markers: vec![sphere, label],
        }
    }
}

/// Indexed, immutable collection of frames loaded from a JSON file.
pub struct FrameStore {
    frames: Vec<Frame>,
}

impl FrameStore {
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, SnapshotError> {
        let raw = std::fs::read_to_string(path)?;
        let doc: FrameStoreDocument = serde_json::from_str(&raw)?;
        let frames = doc
            .frames
            .into_iter()
            .map(|r| Frame {
                name: r.name,
                pose: Pose {
                    position: Point::new(r.position[0], r.position[1], r.position[2]),
                    orientation: Quaternion {
                        x: r.orientation[0],
                        y: r.orientation[1],
                        z: r.orientation[2],
                        w: r.orientation[3],
                    },
                },
                time: r.time,
            })
            .collect();
        Ok(Self { frames })
    }

    pub fn len(&self) -> usize {
        self.frames.len()
    }

    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    /// Look up a frame by sample index. The stored pose values are returned
    /// unmodified.
    pub fn get_frame(&self, index: usize) -> Result<&Frame, SnapshotError> {
        self.frames
            .get(index)
            .ok_or(SnapshotError::IndexOutOfBounds {
                index,
                len: self.frames.len(),
            })
    }
}

/// Snapshot source wrapping one frame picked from a store.
pub struct FrameSnapshot {
    frame: Frame,
    frame_id: String,
}

impl FrameSnapshot {
    pub fn new(store: &FrameStore, index: usize) -> Result<Self, SnapshotError> {
        let frame = store.get_frame(index)?.clone();
        Ok(Self {
            frame,
            frame_id: "map".to_string(),
        })
    }

    pub fn with_frame_id<S: AsRef<str>>(mut self, frame_id: S) -> Self {
        self.frame_id = frame_id.as_ref().to_owned();
        self
    }

    pub fn frame(&self) -> &Frame {
        &self.frame
    }
}

impl SnapshotSource for FrameSnapshot {
    fn current_snapshot(&self) -> MarkerArray {
        self.frame.to_marker_array(&self.frame_id)
    }
}
