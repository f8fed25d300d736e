use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use utility::geo::round_to;

use crate::point::GeoPoint;

/// One point of an elevation service response, as reported by the service.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct ElevationSample {
    pub point: GeoPoint,
    pub z: f64,
}

/// An enriched point as displayed by the elevation charts.
///
/// The elevation is rounded to centimeters when the observation is created and
/// is read-only afterwards.
#[derive(Debug, Clone, PartialEq, Serialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct ElevationObservation {
    #[serde(flatten)]
    point: GeoPoint,
    elevation_meters: f64,
    label: String,
}

impl ElevationObservation {
    pub fn new<S: Into<String>>(point: GeoPoint, elevation: f64, label: S) -> Self {
        Self {
            point,
            elevation_meters: round_to(elevation, 2),
            label: label.into(),
        }
    }

    pub fn from_sample<S: Into<String>>(sample: ElevationSample, label: S) -> Self {
        Self::new(sample.point, sample.z, label)
    }

    pub fn point(&self) -> GeoPoint {
        self.point
    }

    pub fn elevation_meters(&self) -> f64 {
        self.elevation_meters
    }

    pub fn label(&self) -> &str {
        &self.label
    }
}
