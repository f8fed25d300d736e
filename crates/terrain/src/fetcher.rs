use std::{error, fmt, time::Duration};

use model::{ElevationObservation, GeoPoint};
use tokio::time::sleep;

use crate::{config::SessionConfig, ElevationService, MAX_POINTS_PER_REQUEST};

pub const DEFAULT_BATCH_DELAY: Duration = Duration::from_millis(100);

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchError {
    /// Not a single chunk of the batch produced an observation.
    NoResults {
        requested: usize,
        failed_chunks: usize,
    },
}

impl error::Error for FetchError {}

impl fmt::Display for FetchError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            FetchError::NoResults {
                requested,
                failed_chunks,
            } => write!(
                f,
                "no elevation data retrieved for {} points ({} failed requests)",
                requested, failed_chunks
            ),
        }
    }
}

/// Fetches elevations in chunks the remote service accepts, one chunk at a time.
pub struct ElevationFetcher<S> {
    service: S,
    batch_size: usize,
    batch_delay: Duration,
}

impl<S: ElevationService> ElevationFetcher<S> {
    pub fn new(service: S) -> Self {
        Self::with_batching(service, MAX_POINTS_PER_REQUEST, DEFAULT_BATCH_DELAY)
    }

    pub fn with_batching(service: S, batch_size: usize, batch_delay: Duration) -> Self {
        Self {
            service,
            batch_size: batch_size.clamp(1, MAX_POINTS_PER_REQUEST),
            batch_delay,
        }
    }

    pub fn from_config(service: S, config: &SessionConfig) -> Self {
        Self::with_batching(service, config.batch_size, config.batch_delay)
    }

    pub fn service(&self) -> &S {
        &self.service
    }

    /// Fetches the elevation of every point, labelled `Point 1`, `Point 2`, ... by
    /// input position. A failing chunk is logged and skipped; the observations of
    /// all other chunks are returned.
    pub async fn fetch_elevations(
        &self,
        points: &[GeoPoint],
    ) -> Result<Vec<ElevationObservation>, FetchError> {
        let num_chunks = points.len().div_ceil(self.batch_size);
        let mut observations = Vec::with_capacity(points.len());
        let mut failed_chunks = 0;

        for (chunk_index, chunk) in points.chunks(self.batch_size).enumerate() {
            let offset = chunk_index * self.batch_size;
            match self.service.elevations(chunk).await {
                Ok(samples) => {
                    if samples.len() != chunk.len() {
                        log::warn!(
                            "requested {} elevations starting at index {}, got {}",
                            chunk.len(),
                            offset,
                            samples.len()
                        );
                    }
                    observations.extend(
                        samples
                            .into_iter()
                            .take(chunk.len())
                            .enumerate()
                            .map(|(index, sample)| {
                                ElevationObservation::from_sample(
                                    sample,
                                    format!("Point {}", offset + index + 1),
                                )
                            }),
                    );
                }
                Err(why) => {
                    failed_chunks += 1;
                    log::error!(
                        "error getting elevation for batch starting at index {}: {}",
                        offset,
                        why
                    );
                }
            }

            // pace requests to stay below the rate limit of the service
            if chunk_index + 1 < num_chunks {
                sleep(self.batch_delay).await;
            }
        }

        if observations.is_empty() {
            let why = FetchError::NoResults {
                requested: points.len(),
                failed_chunks,
            };
            log::error!("{}", why);
            return Err(why);
        }
        Ok(observations)
    }

    /// Fetches the elevation of a single point. Never fails: a missing
    /// observation is logged and returned as `None`.
    pub async fn fetch_elevation<L: Into<String>>(
        &self,
        point: GeoPoint,
        label: L,
    ) -> Option<ElevationObservation> {
        let label = label.into();
        match self.service.elevations(&[point]).await {
            Ok(samples) => match samples.into_iter().next() {
                Some(sample) => {
                    let observation = ElevationObservation::new(point, sample.z, label);
                    log::info!(
                        "Elevation at {}: {}m",
                        observation.label(),
                        observation.elevation_meters()
                    );
                    Some(observation)
                }
                None => {
                    log::warn!("no elevation returned for {}", label);
                    None
                }
            },
            Err(why) => {
                log::error!("elevation error at {}: {}", label, why);
                None
            }
        }
    }
}
