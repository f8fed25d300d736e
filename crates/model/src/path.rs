use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::point::{ProjectedPoint, SpatialReference};

/// A drawn line feature. One feature may consist of several disconnected segments.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct Path {
    pub segments: Vec<Vec<ProjectedPoint>>,
}

impl Path {
    pub fn new(segments: Vec<Vec<ProjectedPoint>>) -> Self {
        Self { segments }
    }

    /// Builds a path from raw `[x, y]` pairs that all share one spatial reference,
    /// the way the sketch tool reports polyline paths.
    pub fn from_coordinates(
        paths: &[Vec<[f64; 2]>],
        spatial_reference: Option<SpatialReference>,
    ) -> Self {
        Self {
            segments: paths
                .iter()
                .map(|segment| {
                    segment
                        .iter()
                        .map(|[x, y]| ProjectedPoint {
                            x: *x,
                            y: *y,
                            spatial_reference,
                        })
                        .collect()
                })
                .collect(),
        }
    }

    pub fn num_points(&self) -> usize {
        self.segments.iter().map(Vec::len).sum()
    }
}

/// Geometry of a feature completed with the sketch tool.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum SketchGeometry {
    Polyline(Path),
    Polygon(Path),
    Point(ProjectedPoint),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_coordinates_keeps_segments_and_reference() {
        let path = Path::from_coordinates(
            &[vec![[0.0, 0.0], [1.0, 1.0]], vec![[5.0, 5.0]]],
            Some(SpatialReference::WEB_MERCATOR),
        );
        assert_eq!(path.segments.len(), 2);
        assert_eq!(path.num_points(), 3);
        assert_eq!(path.segments[1][0].x, 5.0);
        assert_eq!(
            path.segments[0][1].spatial_reference,
            Some(SpatialReference::WEB_MERCATOR)
        );
    }
}
