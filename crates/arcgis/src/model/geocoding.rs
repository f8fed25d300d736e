use model::{GeoPoint, GeocodeCandidate, ResolutionKey, SuggestionCandidate};
use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize, Deserialize)]
pub struct SuggestResponse {
    #[serde(default)]
    pub suggestions: Vec<Suggestion>,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Suggestion {
    pub text: String,
    pub magic_key: String,
    #[serde(default)]
    pub is_collection: bool,
}

impl From<Suggestion> for SuggestionCandidate {
    fn from(suggestion: Suggestion) -> Self {
        SuggestionCandidate::new(suggestion.text, ResolutionKey::new(suggestion.magic_key))
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct GeocodeResponse {
    #[serde(default)]
    pub candidates: Vec<AddressCandidate>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AddressCandidate {
    pub address: String,
    pub location: Location,
    #[serde(default)]
    pub score: f64,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Location {
    pub x: f64,
    pub y: f64,
}

impl From<AddressCandidate> for GeocodeCandidate {
    fn from(candidate: AddressCandidate) -> Self {
        GeocodeCandidate {
            address: candidate.address,
            location: GeoPoint::new(candidate.location.x, candidate.location.y),
            score: candidate.score,
        }
    }
}
