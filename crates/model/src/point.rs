use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use utility::geo::{WEB_MERCATOR_WKID, WGS84_WKID};

/// A coordinate in the canonical geographic reference (WGS84 longitude/latitude).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct GeoPoint {
    pub longitude: f64,
    pub latitude: f64,
}

impl GeoPoint {
    pub const fn new(longitude: f64, latitude: f64) -> Self {
        Self {
            longitude,
            latitude,
        }
    }
}

/// Identifies the spatial reference of a projected coordinate. Features drawn on
/// the map report both the legacy id and the latest id of the same reference.
#[serde_with::skip_serializing_none]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct SpatialReference {
    pub wkid: Option<u32>,
    pub latest_wkid: Option<u32>,
}

impl SpatialReference {
    pub const WGS84: SpatialReference = SpatialReference::from_wkid(WGS84_WKID);
    pub const WEB_MERCATOR: SpatialReference =
        SpatialReference::from_wkid(WEB_MERCATOR_WKID);

    pub const fn from_wkid(wkid: u32) -> Self {
        Self {
            wkid: Some(wkid),
            latest_wkid: None,
        }
    }

    pub fn is_wgs84(&self) -> bool {
        self.wkid == Some(WGS84_WKID) || self.latest_wkid == Some(WGS84_WKID)
    }

    /// The id used to look up a projection, preferring the latest id.
    pub fn effective_wkid(&self) -> Option<u32> {
        self.latest_wkid.or(self.wkid)
    }
}

/// A point in an arbitrary, possibly non-geographic, spatial reference.
#[serde_with::skip_serializing_none]
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct ProjectedPoint {
    pub x: f64,
    pub y: f64,
    pub spatial_reference: Option<SpatialReference>,
}

impl ProjectedPoint {
    pub fn new(x: f64, y: f64, spatial_reference: SpatialReference) -> Self {
        Self {
            x,
            y,
            spatial_reference: Some(spatial_reference),
        }
    }

    pub fn geographic(longitude: f64, latitude: f64) -> Self {
        Self::new(longitude, latitude, SpatialReference::WGS84)
    }

    pub fn is_wgs84(&self) -> bool {
        self.spatial_reference
            .map(|reference| reference.is_wgs84())
            .unwrap_or(false)
    }
}
