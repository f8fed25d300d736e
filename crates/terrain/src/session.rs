use std::sync::atomic::{AtomicUsize, Ordering};

use futures::future::join_all;
use model::{ElevationObservation, GeoPoint, GeocodeCandidate, SketchGeometry};
use serde::Serialize;
use tokio::sync::RwLock;
use utility::geo::coordinate_label;

use crate::{
    buffer::{BufferMode, ElevationBuffer},
    config::SessionConfig,
    fetcher::ElevationFetcher,
    reproject::Reprojector,
    sampler::PathSampler,
    search::SearchBox,
    suggestion::{NavigationKey, SearchView},
    ElevationService, GeocodingService,
};

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Viewport {
    pub center: GeoPoint,
    pub zoom: u8,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProfileOutcome {
    /// The buffer now holds this many observations of the drawn line.
    Replaced(usize),
    NoData,
    /// Not a polyline.
    Ignored,
    /// Another line was drawn or the line was deleted while fetching.
    Superseded,
}

#[derive(Debug, Clone, PartialEq)]
pub enum AdHocOutcome {
    Appended(ElevationObservation),
    /// Fetched, but a drawn line owns the buffer.
    NotDisplayed(ElevationObservation),
    NoData,
}

/// Counts an elevation lookup as outstanding until dropped.
struct Loading<'a>(&'a AtomicUsize);

impl<'a> Loading<'a> {
    fn start(outstanding: &'a AtomicUsize) -> Self {
        outstanding.fetch_add(1, Ordering::SeqCst);
        Self(outstanding)
    }
}

impl Drop for Loading<'_> {
    fn drop(&mut self) {
        self.0.fetch_sub(1, Ordering::SeqCst);
    }
}

/// One map with its drawn line, elevation chart and address search.
pub struct MapSession<E, G> {
    sampler: PathSampler,
    reprojector: Reprojector,
    fetcher: ElevationFetcher<E>,
    buffer: RwLock<ElevationBuffer>,
    search: SearchBox<G>,
    viewport: RwLock<Viewport>,
    focus_zoom: u8,
    loading: AtomicUsize,
}

impl<E: ElevationService, G: GeocodingService> MapSession<E, G> {
    pub fn new(elevation: E, geocoding: G, config: &SessionConfig) -> Self {
        Self {
            sampler: PathSampler::new(config.max_samples),
            reprojector: Reprojector::new(),
            fetcher: ElevationFetcher::from_config(elevation, config),
            buffer: RwLock::new(ElevationBuffer::new(config.ad_hoc_capacity)),
            search: SearchBox::from_config(geocoding, config),
            viewport: RwLock::new(Viewport {
                center: config.initial_center,
                zoom: config.initial_zoom,
            }),
            focus_zoom: config.focus_zoom,
            loading: AtomicUsize::new(0),
        }
    }

    pub fn reprojector(&self) -> &Reprojector {
        &self.reprojector
    }

    /// Builds the elevation profile of a finished drawing.
    pub async fn on_sketch_create(&self, geometry: &SketchGeometry) -> ProfileOutcome {
        let path = match geometry {
            SketchGeometry::Polyline(path) => path,
            _ => {
                log::debug!("ignoring sketch that is not a polyline");
                return ProfileOutcome::Ignored;
            }
        };

        let lease = self.buffer.write().await.begin_profile();
        let samples = self.sampler.sample(path);
        log::info!(
            "sampled {} of {} points in {} segments",
            samples.len(),
            path.num_points(),
            path.segments.len()
        );
        let points = join_all(samples.iter().map(|point| self.reprojector.reproject(point))).await;

        let fetched = {
            let _loading = Loading::start(&self.loading);
            self.fetcher.fetch_elevations(&points).await
        };
        match fetched {
            Ok(observations) => {
                let num_observations = observations.len();
                match self.buffer.write().await.replace_profile(lease, observations) {
                    Ok(()) => ProfileOutcome::Replaced(num_observations),
                    Err(why) => {
                        log::info!("discarding profile of {} points: {}", num_observations, why);
                        ProfileOutcome::Superseded
                    }
                }
            }
            Err(why) => {
                log::warn!("no elevation profile: {}", why);
                match self.buffer.write().await.abandon_profile(lease) {
                    Ok(()) => ProfileOutcome::NoData,
                    Err(_) => ProfileOutcome::Superseded,
                }
            }
        }
    }

    pub async fn on_sketch_delete(&self) {
        self.buffer.write().await.clear();
    }

    pub async fn on_map_click(&self, point: GeoPoint) -> AdHocOutcome {
        let label = coordinate_label(point.latitude, point.longitude);
        self.enrich(point, label).await
    }

    async fn enrich(&self, point: GeoPoint, label: String) -> AdHocOutcome {
        let fetched = {
            let _loading = Loading::start(&self.loading);
            self.fetcher.fetch_elevation(point, label).await
        };
        let Some(observation) = fetched else {
            return AdHocOutcome::NoData;
        };
        match self.buffer.write().await.append_ad_hoc(observation.clone()) {
            Ok(()) => AdHocOutcome::Appended(observation),
            Err(why) => {
                log::debug!("not showing {}: {}", observation.label(), why);
                AdHocOutcome::NotDisplayed(observation)
            }
        }
    }

    async fn go_to(&self, candidate: GeocodeCandidate) -> AdHocOutcome {
        *self.viewport.write().await = Viewport {
            center: candidate.location,
            zoom: self.focus_zoom,
        };
        self.enrich(candidate.location, candidate.address).await
    }

    pub async fn search_input(&self, text: &str) -> bool {
        self.search.input(text).await
    }

    /// Forwards a key to the search box. A resolved address recentres the map
    /// and is looked up like a click.
    pub async fn search_key(&self, key: NavigationKey) -> Option<AdHocOutcome> {
        let candidate = self.search.key(key).await?;
        Some(self.go_to(candidate).await)
    }

    pub async fn search_select(&self, index: usize) -> Option<AdHocOutcome> {
        let candidate = self.search.select(index).await?;
        Some(self.go_to(candidate).await)
    }

    pub async fn search_dismiss(&self) {
        self.search.dismiss().await;
    }

    pub async fn search_clear(&self) {
        self.search.clear().await;
    }

    pub async fn search_focus(&self) {
        self.search.focus().await;
    }

    pub async fn search_view(&self) -> SearchView {
        self.search.view().await
    }

    pub async fn snapshot(&self) -> Vec<ElevationObservation> {
        self.buffer.read().await.snapshot()
    }

    pub async fn buffer_mode(&self) -> BufferMode {
        self.buffer.read().await.mode()
    }

    pub async fn viewport(&self) -> Viewport {
        *self.viewport.read().await
    }

    /// Whether an elevation lookup is outstanding.
    pub fn is_loading(&self) -> bool {
        self.loading.load(Ordering::SeqCst) > 0
    }
}
