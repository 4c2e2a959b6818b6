use std::fmt;

use crate::ros_msg::{ColorRGBA, Marker, MarkerArray, Point, Vector3D};

/// Failures raised while constructing or indexing snapshot data.
#[derive(Debug)]
pub enum SnapshotError {
    /// A polygon needs at least 3 vertices to render meaningfully
    DegeneratePolygon { points: usize },
    /// Frame index is beyond the store's extent
    IndexOutOfBounds { index: usize, len: usize },
    Io(std::io::Error),
    Parse(serde_json::Error),
}

impl fmt::Display for SnapshotError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::DegeneratePolygon { points } => {
                write!(f, "polygon needs at least 3 points, got {}", points)
            }
            Self::IndexOutOfBounds { index, len } => {
                write!(f, "frame index {} out of bounds (store holds {})", index, len)
            }
            Self::Io(e) => write!(f, "failed to read frame store: {}", e),
            Self::Parse(e) => write!(f, "failed to parse frame store: {}", e),
        }
    }
}

impl std::error::Error for SnapshotError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io(e) => Some(e),
            Self::Parse(e) => Some(e),
            _ => None,
        }
    }
}

impl From<std::io::Error> for SnapshotError {
    fn from(e: std::io::Error) -> Self {
        Self::Io(e)
    }
}

impl From<serde_json::Error> for SnapshotError {
    fn from(e: serde_json::Error) -> Self {
        Self::Parse(e)
    }
}

/// An immutable geometric state that can be rendered as markers.
///
/// Implementations must be pure: calling `current_snapshot` twice in a row
/// yields identical content, and nothing is mutated by the call.
pub trait SnapshotSource {
    fn current_snapshot(&self) -> MarkerArray;
}

/// Fixed obstacle outline: an ordered 3D vertex list rendered as a line strip.
/// Vertex order is significant, it defines the edge order of the outline.
#[derive(Debug, Clone, PartialEq)]
pub struct Polygon {
    points: Vec<Point>,
    ns: String,
    id: i32,
    frame_id: String,
    color: ColorRGBA,
    line_width: f64,
}

impl Polygon {
    pub fn new(points: Vec<Point>) -> Result<Self, SnapshotError> {
        if points.len() < 3 {
            return Err(SnapshotError::DegeneratePolygon {
                points: points.len(),
            });
        }
        Ok(Self {
            points,
            ns: "obstacle".to_string(),
            id: 0,
            frame_id: "map".to_string(),
            color: ColorRGBA {
                r: 1.0,
                g: 0.0,
                b: 0.0,
                a: 1.0,
            },
            line_width: 0.05,
        })
    }

    pub fn with_ns<S: AsRef<str>>(mut self, ns: S) -> Self {
        self.ns = ns.as_ref().to_owned();
        self
    }

    pub fn with_id(mut self, id: i32) -> Self {
        self.id = id;
        self
    }

    pub fn with_frame_id<S: AsRef<str>>(mut self, frame_id: S) -> Self {
        self.frame_id = frame_id.as_ref().to_owned();
        self
    }

    pub fn with_color(mut self, color: ColorRGBA) -> Self {
        self.color = color;
        self
    }

    pub fn points(&self) -> &[Point] {
        &self.points
    }

    /// Render as a line-strip marker. The marker's point list equals the
    /// polygon's vertices in insertion order, the stamp is left for the
    /// publisher to fill in.
    pub fn to_marker(&self) -> Marker {
        Marker {
            header: crate::ros_msg::Header {
                frame_id: self.frame_id.clone(),
                ..Default::default()
            },
            ns: self.ns.clone(),
            id: self.id,
            type_: Marker::LINE_STRIP,
            action: Marker::ADD,
            scale: Vector3D {
                x: self.line_width,
                ..Default::default()
            },
            color: self.color,
            points: self.points.clone(),
            ..Default::default()
        }
    }
}

impl SnapshotSource for Polygon {
    fn current_snapshot(&self) -> MarkerArray {
        MarkerArray {
            markers: vec![self.to_marker()],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::msg::ZMessage;

    fn unit_square() -> Vec<Point> {
        vec![
            Point::new(0.0, 0.0, 0.0),
            Point::new(1.0, 0.0, 0.0),
            Point::new(1.0, 1.0, 0.0),
            Point::new(0.0, 1.0, 0.0),
        ]
    }

    #[test]
    fn rejects_degenerate_polygons() {
        for n in 0..3 {
            let points = unit_square().into_iter().take(n).collect();
            assert!(matches!(
                Polygon::new(points),
                Err(SnapshotError::DegeneratePolygon { .. })
            ));
        }
    }

    #[test]
    fn marker_points_preserve_insertion_order() {
        let polygon = Polygon::new(unit_square()).unwrap();
        let marker = polygon.to_marker();
        assert_eq!(marker.type_, Marker::LINE_STRIP);
        assert_eq!(marker.points, unit_square());
    }

    #[test]
    fn snapshot_is_idempotent() {
        let polygon = Polygon::new(unit_square()).unwrap().with_ns("walls");
        let first = polygon.current_snapshot().serialize().unwrap();
        let second = polygon.current_snapshot().serialize().unwrap();
        assert_eq!(first, second);
    }
}
