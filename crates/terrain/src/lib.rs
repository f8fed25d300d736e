use std::{error::Error, sync::Arc};

use async_trait::async_trait;
use model::{
    ElevationSample, GeoPoint, GeocodeCandidate, ResolutionKey, SuggestionCandidate,
};

pub mod buffer;
pub mod config;
pub mod fetcher;
pub mod reproject;
pub mod sampler;
pub mod search;
pub mod session;
pub mod suggestion;

#[cfg(test)]
mod mock;

pub use config::SessionConfig;
pub use session::{AdHocOutcome, MapSession, ProfileOutcome, Viewport};

/// The elevation service accepts at most this many coordinates per request.
pub const MAX_POINTS_PER_REQUEST: usize = 100;

/// A remote service returning the elevation of geographic points.
#[async_trait]
pub trait ElevationService: Send + Sync {
    type Error: Error + Send + Sync + 'static;

    /// Looks up the elevation of up to `MAX_POINTS_PER_REQUEST` points. The
    /// response lists the points in request order.
    async fn elevations(
        &self,
        points: &[GeoPoint],
    ) -> Result<Vec<ElevationSample>, Self::Error>;
}

/// A remote service suggesting addresses for free text and resolving them.
#[async_trait]
pub trait GeocodingService: Send + Sync {
    type Error: Error + Send + Sync + 'static;

    /// Returns up to `max_suggestions` candidates for `text`, ranked around
    /// `location`.
    async fn suggest(
        &self,
        text: &str,
        location: GeoPoint,
        max_suggestions: usize,
    ) -> Result<Vec<SuggestionCandidate>, Self::Error>;

    /// Redeems a resolution key. Candidates are ranked, best match first.
    async fn geocode(
        &self,
        key: ResolutionKey,
    ) -> Result<Vec<GeocodeCandidate>, Self::Error>;
}

#[async_trait]
impl<T: ElevationService> ElevationService for Arc<T> {
    type Error = T::Error;

    async fn elevations(
        &self,
        points: &[GeoPoint],
    ) -> Result<Vec<ElevationSample>, Self::Error> {
        (**self).elevations(points).await
    }
}

#[async_trait]
impl<T: GeocodingService> GeocodingService for Arc<T> {
    type Error = T::Error;

    async fn suggest(
        &self,
        text: &str,
        location: GeoPoint,
        max_suggestions: usize,
    ) -> Result<Vec<SuggestionCandidate>, Self::Error> {
        (**self).suggest(text, location, max_suggestions).await
    }

    async fn geocode(
        &self,
        key: ResolutionKey,
    ) -> Result<Vec<GeocodeCandidate>, Self::Error> {
        (**self).geocode(key).await
    }
}
