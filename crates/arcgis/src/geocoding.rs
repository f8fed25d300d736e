use async_trait::async_trait;
use model::{GeoPoint, GeocodeCandidate, ResolutionKey, SuggestionCandidate};
use terrain::GeocodingService;

use crate::{
    client::ArcGisClient,
    model::geocoding::{GeocodeResponse, SuggestResponse},
    ApiError,
};

/// Address suggestions for a partial text, ranked around `location`.
pub async fn get_suggestions(
    client: &ArcGisClient,
    text: &str,
    location: GeoPoint,
    max_suggestions: usize,
) -> Result<Vec<SuggestionCandidate>, ApiError> {
    let response: SuggestResponse = client
        .get(
            &format!("{}/suggest", client.geocode_url()),
            &[
                ("text", text.to_owned()),
                (
                    "location",
                    format!("{},{}", location.longitude, location.latitude),
                ),
                ("maxSuggestions", max_suggestions.to_string()),
            ],
        )
        .await?;

    Ok(response.suggestions.into_iter().map(Into::into).collect())
}

/// Candidates of a suggestion, best match first.
pub async fn find_address_candidates(
    client: &ArcGisClient,
    key: ResolutionKey,
) -> Result<Vec<GeocodeCandidate>, ApiError> {
    let response: GeocodeResponse = client
        .get(
            &format!("{}/findAddressCandidates", client.geocode_url()),
            &[("magicKey", key.into_inner()), ("outFields", "*".to_owned())],
        )
        .await?;

    let mut candidates = response
        .candidates
        .into_iter()
        .map(GeocodeCandidate::from)
        .collect::<Vec<_>>();
    candidates.sort_by(|a, b| b.score.total_cmp(&a.score));
    Ok(candidates)
}

#[async_trait]
impl GeocodingService for ArcGisClient {
    type Error = ApiError;

    async fn suggest(
        &self,
        text: &str,
        location: GeoPoint,
        max_suggestions: usize,
    ) -> Result<Vec<SuggestionCandidate>, Self::Error> {
        get_suggestions(self, text, location, max_suggestions).await
    }

    async fn geocode(
        &self,
        key: ResolutionKey,
    ) -> Result<Vec<GeocodeCandidate>, Self::Error> {
        find_address_candidates(self, key).await
    }
}
