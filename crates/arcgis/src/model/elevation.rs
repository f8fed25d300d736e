use model::{ElevationSample, GeoPoint};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ElevationResponse {
    pub result: ElevationResult,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ElevationResult {
    #[serde(default)]
    pub points: Vec<ElevationPoint>,
}

/// Point in WGS84 with its elevation in meters.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct ElevationPoint {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl From<ElevationPoint> for ElevationSample {
    fn from(point: ElevationPoint) -> Self {
        ElevationSample {
            point: GeoPoint::new(point.x, point.y),
            z: point.z,
        }
    }
}
