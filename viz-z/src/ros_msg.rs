use crate::entity::{TypeHash, TypeInfo};
use serde::{Deserialize, Serialize};
use std::time::{SystemTime, UNIX_EPOCH};

/// Trait for ROS messages that have associated type information
pub trait WithTypeInfo {
    fn type_info() -> TypeInfo;
}

#[derive(Debug, Serialize, Deserialize, Default, Clone, Copy, PartialEq)]
pub struct Time {
    pub sec: i32,
    pub nanosec: u32,
}

impl Time {
    /// Wall-clock time since the unix epoch, as stamped into headers.
    pub fn now() -> Self {
        let elapsed = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap_or_default();
        Self {
            sec: elapsed.as_secs() as i32,
            nanosec: elapsed.subsec_nanos(),
        }
    }
}

impl PartialOrd for Time {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some((self.sec, self.nanosec).cmp(&(other.sec, other.nanosec)))
    }
}

/// builtin_interfaces/Duration
#[derive(Debug, Serialize, Deserialize, Default, Clone, Copy, PartialEq)]
pub struct RosDuration {
    pub sec: i32,
    pub nanosec: u32,
}

#[derive(Debug, Serialize, Deserialize, Default, Clone, PartialEq)]
pub struct Header {
    pub stamp: Time,
    pub frame_id: String,
}

#[derive(Debug, Serialize, Deserialize, Default, Clone, Copy, PartialEq)]
pub struct Point {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl Point {
    pub fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }
}

#[derive(Debug, Serialize, Deserialize, Default, Clone, Copy, PartialEq)]
pub struct Vector3D {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq)]
pub struct Quaternion {
    pub x: f64,
    pub y: f64,
    pub z: f64,
    pub w: f64,
}

impl Default for Quaternion {
    fn default() -> Self {
        // Identity rotation
        Self {
            x: 0.0,
            y: 0.0,
            z: 0.0,
            w: 1.0,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, Default, Clone, Copy, PartialEq)]
pub struct Pose {
    pub position: Point,
    pub orientation: Quaternion,
}

#[derive(Debug, Serialize, Deserialize, Default, Clone, Copy, PartialEq)]
pub struct ColorRGBA {
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub a: f32,
}

/// visualization_msgs/Marker
#[derive(Debug, Serialize, Deserialize, Default, Clone, PartialEq)]
pub struct Marker {
    pub header: Header,
    pub ns: String,
    pub id: i32,
    pub type_: i32,
    pub action: i32,
    pub pose: Pose,
    pub scale: Vector3D,
    pub color: ColorRGBA,
    pub lifetime: RosDuration,
    pub frame_locked: bool,
    pub points: Vec<Point>,
    pub colors: Vec<ColorRGBA>,
    pub text: String,
    pub mesh_resource: String,
    pub mesh_use_embedded_materials: bool,
}

impl Marker {
    // Shape type constants
    pub const ARROW: i32 = 0;
    pub const CUBE: i32 = 1;
    pub const SPHERE: i32 = 2;
    pub const CYLINDER: i32 = 3;
    pub const LINE_STRIP: i32 = 4;
    pub const LINE_LIST: i32 = 5;
    pub const CUBE_LIST: i32 = 6;
    pub const SPHERE_LIST: i32 = 7;
    pub const POINTS: i32 = 8;
    pub const TEXT_VIEW_FACING: i32 = 9;
    pub const MESH_RESOURCE: i32 = 10;
    pub const TRIANGLE_LIST: i32 = 11;

    // Action constants
    pub const ADD: i32 = 0;
    pub const MODIFY: i32 = 0;
    pub const DELETE: i32 = 2;
    pub const DELETEALL: i32 = 3;
}

impl WithTypeInfo for Marker {
    fn type_info() -> TypeInfo {
        // TODO: compute the RIHS01 hash for visualization_msgs to interop with rmw_zenoh peers
        TypeInfo::new("visualization_msgs::msg::dds_::Marker_", TypeHash::zero())
    }
}

/// visualization_msgs/MarkerArray
#[derive(Debug, Serialize, Deserialize, Default, Clone, PartialEq)]
pub struct MarkerArray {
    pub markers: Vec<Marker>,
}

impl MarkerArray {
    /// Overwrite every marker's header stamp, as done once per publish cycle.
    pub fn restamp(&mut self, stamp: Time) {
        for marker in &mut self.markers {
            marker.header.stamp = stamp;
        }
    }
}

impl WithTypeInfo for MarkerArray {
    fn type_info() -> TypeInfo {
        TypeInfo::new(
            "visualization_msgs::msg::dds_::MarkerArray_",
            TypeHash::zero(),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::msg::ZMessage;

    #[test]
    fn default_quaternion_is_identity() {
        let q = Quaternion::default();
        assert_eq!(q.w, 1.0);
        assert_eq!((q.x, q.y, q.z), (0.0, 0.0, 0.0));
    }

    #[test]
    fn marker_cdr_roundtrip() {
        let msg = Marker {
            ns: "obstacle".into(),
            id: 7,
            type_: Marker::LINE_STRIP,
            action: Marker::ADD,
            points: vec![Point::new(0.0, 0.0, 0.0), Point::new(1.0, 0.0, 0.0)],
            ..Default::default()
        };
        let bytes = ZMessage::serialize(&msg).unwrap();
        let decoded = <Marker as ZMessage>::deserialize(&bytes).unwrap();
        assert_eq!(decoded, msg);
    }

    #[test]
    fn restamp_touches_every_marker() {
        let mut array = MarkerArray {
            markers: vec![Marker::default(), Marker::default()],
        };
        let stamp = Time {
            sec: 12,
            nanosec: 34,
        };
        array.restamp(stamp);
        assert!(array.markers.iter().all(|m| m.header.stamp == stamp));
    }
}
