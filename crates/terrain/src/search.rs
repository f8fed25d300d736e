use model::{GeoPoint, GeocodeCandidate};
use tokio::sync::Mutex;

use crate::{
    config::SessionConfig,
    suggestion::{Commit, NavigationKey, SearchView, SuggestionSession},
    GeocodingService,
};

/// Runs a suggestion session against a geocoding service.
///
/// The session lock is never held while a request is outstanding, so input
/// keeps flowing while earlier lookups are still on their way.
pub struct SearchBox<G> {
    service: G,
    session: Mutex<SuggestionSession>,
    location: GeoPoint,
    max_suggestions: usize,
}

impl<G: GeocodingService> SearchBox<G> {
    pub fn new(service: G, location: GeoPoint, max_suggestions: usize) -> Self {
        Self {
            service,
            session: Mutex::new(SuggestionSession::new()),
            location,
            max_suggestions,
        }
    }

    pub fn from_config(service: G, config: &SessionConfig) -> Self {
        Self::new(service, config.search_location, config.max_suggestions)
    }

    /// Handles a change of the query text. Returns whether the response of the
    /// lookup was applied.
    pub async fn input(&self, text: &str) -> bool {
        let Some(request) = self.session.lock().await.change_text(text) else {
            return false;
        };
        let result = self
            .service
            .suggest(&request.text, self.location, self.max_suggestions)
            .await;
        self.session
            .lock()
            .await
            .receive_suggestions(request.ticket, result)
    }

    /// Handles a navigation key. Returns the resolved location when `Enter`
    /// committed a candidate.
    pub async fn key(&self, key: NavigationKey) -> Option<GeocodeCandidate> {
        let commit = self.session.lock().await.key(key)?;
        self.resolve(commit).await
    }

    pub async fn select(&self, index: usize) -> Option<GeocodeCandidate> {
        let commit = self.session.lock().await.select(index)?;
        self.resolve(commit).await
    }

    async fn resolve(&self, commit: Commit) -> Option<GeocodeCandidate> {
        let Commit { ticket, candidate } = commit;
        let display_text = candidate.display_text;

        let candidates = match self.service.geocode(candidate.resolution_key).await {
            Ok(candidates) => candidates,
            Err(why) => {
                log::error!("error geocoding '{}': {}", display_text, why);
                return None;
            }
        };
        let Some(best) = candidates.into_iter().next() else {
            log::warn!("no location found for '{}'", display_text);
            return None;
        };

        log::debug!("'{}' resolved to {} (score {})", display_text, best.address, best.score);
        if !self.session.lock().await.complete_commit(ticket, &best.address) {
            log::debug!("query changed while resolving '{}'", display_text);
        }
        Some(best)
    }

    pub async fn dismiss(&self) {
        self.session.lock().await.dismiss();
    }

    pub async fn clear(&self) {
        self.session.lock().await.clear();
    }

    pub async fn focus(&self) {
        self.session.lock().await.focus();
    }

    pub async fn view(&self) -> SearchView {
        self.session.lock().await.view()
    }
}
