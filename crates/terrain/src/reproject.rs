use std::{
    collections::HashMap,
    error, fmt,
    sync::{Arc, Mutex},
};

use model::{GeoPoint, ProjectedPoint};
use proj4rs::{proj::Proj, transform::transform};
use tokio::sync::OnceCell;
use utility::geo::{to_degrees, to_radians, WEB_MERCATOR_WKID};

const WGS84_DEFINITION: &str = "+proj=longlat +datum=WGS84 +no_defs";
const WEB_MERCATOR_DEFINITION: &str =
    "+proj=merc +a=6378137 +b=6378137 +lat_ts=0 +lon_0=0 +x_0=0 +y_0=0 +k=1 +units=m +no_defs";
/// Web Mercator is inverted onto the sphere it was projected from, without a datum shift.
const WEB_MERCATOR_GEOGRAPHIC_DEFINITION: &str = "+proj=longlat +a=6378137 +b=6378137 +no_defs";
const NAD83_DEFINITION: &str = "+proj=longlat +datum=NAD83 +no_defs";

#[derive(Debug, Clone, PartialEq)]
pub enum ReprojectError {
    InvalidDefinition { definition: String, reason: String },
    UnsupportedReference(u32),
    Transform(String),
}

impl error::Error for ReprojectError {}

impl fmt::Display for ReprojectError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            ReprojectError::InvalidDefinition { definition, reason } => {
                write!(f, "invalid projection '{}': {}", definition, reason)
            }
            ReprojectError::UnsupportedReference(wkid) => {
                write!(f, "unsupported spatial reference: {}", wkid)
            }
            ReprojectError::Transform(reason) => write!(f, "transform failed: {}", reason),
        }
    }
}

fn is_web_mercator(wkid: u32) -> bool {
    matches!(wkid, 3857 | 102100 | 102113 | 900913)
}

/// PROJ.4 definition of a supported source reference and whether it is
/// geographic (degrees) rather than projected (meters).
fn source_definition(wkid: u32) -> Option<(String, bool)> {
    match wkid {
        4269 => Some((NAD83_DEFINITION.to_owned(), true)),
        32601..=32660 => Some((
            format!("+proj=utm +zone={} +datum=WGS84 +units=m +no_defs", wkid - 32600),
            false,
        )),
        32701..=32760 => Some((
            format!(
                "+proj=utm +zone={} +south +datum=WGS84 +units=m +no_defs",
                wkid - 32700
            ),
            false,
        )),
        _ => None,
    }
}

fn parse(definition: &str) -> Result<Proj, ReprojectError> {
    Proj::from_proj_string(definition).map_err(|why| ReprojectError::InvalidDefinition {
        definition: definition.to_owned(),
        reason: why.to_string(),
    })
}

struct SourceProjection {
    proj: Proj,
    geographic: bool,
}

/// Parsed projection definitions shared by all transforms of a session.
pub struct ProjectionEngine {
    wgs84: Proj,
    web_mercator: Proj,
    web_mercator_geographic: Proj,
    /// Other source references, parsed on first use.
    sources: Mutex<HashMap<u32, Arc<SourceProjection>>>,
}

impl ProjectionEngine {
    fn load() -> Result<Self, ReprojectError> {
        Ok(Self {
            wgs84: parse(WGS84_DEFINITION)?,
            web_mercator: parse(WEB_MERCATOR_DEFINITION)?,
            web_mercator_geographic: parse(WEB_MERCATOR_GEOGRAPHIC_DEFINITION)?,
            sources: Mutex::new(HashMap::new()),
        })
    }

    fn source(&self, wkid: u32) -> Result<Arc<SourceProjection>, ReprojectError> {
        let mut sources = self
            .sources
            .lock()
            .map_err(|_| ReprojectError::Transform("projection cache poisoned".to_owned()))?;
        if let Some(source) = sources.get(&wkid) {
            return Ok(source.clone());
        }
        let (definition, geographic) =
            source_definition(wkid).ok_or(ReprojectError::UnsupportedReference(wkid))?;
        let source = Arc::new(SourceProjection {
            proj: parse(&definition)?,
            geographic,
        });
        sources.insert(wkid, source.clone());
        Ok(source)
    }

    /// Number of source references parsed so far, besides Web Mercator.
    pub fn num_cached_sources(&self) -> usize {
        self.sources.lock().map(|sources| sources.len()).unwrap_or(0)
    }

    /// Transforms a coordinate of the reference `wkid` into WGS84.
    pub fn to_wgs84(&self, x: f64, y: f64, wkid: u32) -> Result<GeoPoint, ReprojectError> {
        let cached;
        let (source, target, geographic) = if is_web_mercator(wkid) {
            (&self.web_mercator, &self.web_mercator_geographic, false)
        } else {
            cached = self.source(wkid)?;
            (&cached.proj, &self.wgs84, cached.geographic)
        };

        // geographic coordinates go in and come out in radians
        let mut point = if geographic {
            (to_radians(x), to_radians(y), 0.0)
        } else {
            (x, y, 0.0)
        };
        transform(source, target, &mut point)
            .map_err(|why| ReprojectError::Transform(why.to_string()))?;

        let longitude = to_degrees(point.0);
        let latitude = to_degrees(point.1);
        if !longitude.is_finite() || !latitude.is_finite() {
            return Err(ReprojectError::Transform(format!(
                "({}, {}) has no finite WGS84 coordinate",
                x, y
            )));
        }
        Ok(GeoPoint::new(longitude, latitude))
    }
}

/// Converts points of drawn features into WGS84 longitude/latitude.
///
/// The projection engine is set up lazily on the first point that actually needs
/// a transform. Points that cannot be transformed are passed through with their
/// raw coordinates, which may be geometrically wrong.
#[derive(Default)]
pub struct Reprojector {
    engine: OnceCell<ProjectionEngine>,
}

impl Reprojector {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets up the projection engine. Can be called any number of times; the
    /// setup runs once and is retried only if it failed before.
    pub async fn ensure_initialized(&self) -> Result<&ProjectionEngine, ReprojectError> {
        self.engine
            .get_or_try_init(|| async {
                log::info!("loading projection engine...");
                ProjectionEngine::load()
            })
            .await
    }

    pub fn is_initialized(&self) -> bool {
        self.engine.initialized()
    }

    pub async fn reproject(&self, point: &ProjectedPoint) -> GeoPoint {
        if point.is_wgs84() {
            return GeoPoint::new(point.x, point.y);
        }
        let wkid = point
            .spatial_reference
            .and_then(|reference| reference.effective_wkid())
            .unwrap_or(WEB_MERCATOR_WKID);

        match self.try_reproject(point.x, point.y, wkid).await {
            Ok(geo_point) => geo_point,
            Err(why) => {
                log::warn!(
                    "error projecting ({}, {}) from wkid {}: {}; using raw coordinates",
                    point.x,
                    point.y,
                    wkid,
                    why
                );
                GeoPoint::new(point.x, point.y)
            }
        }
    }

    async fn try_reproject(&self, x: f64, y: f64, wkid: u32) -> Result<GeoPoint, ReprojectError> {
        self.ensure_initialized().await?.to_wgs84(x, y, wkid)
    }
}

#[cfg(test)]
mod tests {
    use model::SpatialReference;

    use super::*;

    fn assert_close(actual: GeoPoint, longitude: f64, latitude: f64) {
        assert!(
            (actual.longitude - longitude).abs() < 1e-6
                && (actual.latitude - latitude).abs() < 1e-6,
            "expected ({}, {}), got {:?}",
            longitude,
            latitude,
            actual
        );
    }

    #[tokio::test]
    async fn wgs84_points_pass_through_without_engine() {
        let reprojector = Reprojector::new();
        for (x, y) in [(106.8451, -6.2088), (-180.0, 90.0), (0.0, 0.0), (1e9, -1e9)] {
            let point = ProjectedPoint::geographic(x, y);
            assert_eq!(reprojector.reproject(&point).await, GeoPoint::new(x, y));
        }
        let latest = ProjectedPoint::new(
            12.5,
            55.0,
            SpatialReference {
                wkid: Some(102100),
                latest_wkid: Some(4326),
            },
        );
        assert_eq!(reprojector.reproject(&latest).await, GeoPoint::new(12.5, 55.0));
        assert!(!reprojector.is_initialized());
    }

    #[tokio::test]
    async fn web_mercator_is_transformed() {
        let reprojector = Reprojector::new();
        let origin = ProjectedPoint::new(0.0, 0.0, SpatialReference::WEB_MERCATOR);
        assert_close(reprojector.reproject(&origin).await, 0.0, 0.0);

        let north = ProjectedPoint::new(
            10018754.171394622,
            5621521.486192066,
            SpatialReference::from_wkid(102100),
        );
        assert_close(reprojector.reproject(&north).await, 90.0, 45.0);
        assert!(reprojector.is_initialized());
    }

    #[tokio::test]
    async fn missing_reference_defaults_to_web_mercator() {
        let reprojector = Reprojector::new();
        let point = ProjectedPoint {
            x: -10018754.171394622,
            y: -5621521.486192066,
            spatial_reference: None,
        };
        assert_close(reprojector.reproject(&point).await, -90.0, -45.0);
    }

    #[tokio::test]
    async fn utm_zone_center_maps_to_central_meridian() {
        let reprojector = Reprojector::new();
        let point = ProjectedPoint::new(500000.0, 0.0, SpatialReference::from_wkid(32633));
        assert_close(reprojector.reproject(&point).await, 15.0, 0.0);
    }

    #[tokio::test]
    async fn nad83_is_close_to_wgs84() {
        let reprojector = Reprojector::new();
        let point = ProjectedPoint::new(-77.0365, 38.8977, SpatialReference::from_wkid(4269));
        assert_close(reprojector.reproject(&point).await, -77.0365, 38.8977);
    }

    #[tokio::test]
    async fn source_references_are_parsed_once() {
        let reprojector = Reprojector::new();
        for x in [400_000.0, 500_000.0, 600_000.0] {
            let point = ProjectedPoint::new(x, 1_000_000.0, SpatialReference::from_wkid(32648));
            reprojector.reproject(&point).await;
        }
        let engine = reprojector.ensure_initialized().await.unwrap();
        assert_eq!(engine.num_cached_sources(), 1);

        let south = ProjectedPoint::new(500_000.0, 9_300_000.0, SpatialReference::from_wkid(32748));
        let geo_point = reprojector.reproject(&south).await;
        assert!((geo_point.longitude - 105.0).abs() < 1e-6);
        assert!(geo_point.latitude < -6.2 && geo_point.latitude > -6.4);
        reprojector
            .reproject(&ProjectedPoint::new(0.0, 0.0, SpatialReference::WEB_MERCATOR))
            .await;
        assert_eq!(engine.num_cached_sources(), 2);
    }

    #[tokio::test]
    async fn unsupported_reference_falls_back_to_raw_coordinates() {
        let reprojector = Reprojector::new();
        let point = ProjectedPoint::new(1_570_000.0, 5_180_000.0, SpatialReference::from_wkid(2193));
        assert_eq!(
            reprojector.reproject(&point).await,
            GeoPoint::new(1_570_000.0, 5_180_000.0)
        );
    }

    #[tokio::test]
    async fn initialization_runs_once() {
        let reprojector = Reprojector::new();
        let first = reprojector.ensure_initialized().await.unwrap() as *const ProjectionEngine;
        let second = reprojector.ensure_initialized().await.unwrap() as *const ProjectionEngine;
        assert_eq!(first, second);
    }
}
