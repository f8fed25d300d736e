use std::fmt;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::point::GeoPoint;

/// Opaque token of a suggestion, redeemable for a precise location.
///
/// Keys are not `Clone`: redeeming one consumes it.
#[derive(PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(transparent)]
pub struct ResolutionKey(String);

impl ResolutionKey {
    pub fn new<S: Into<String>>(key: S) -> Self {
        Self(key.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_inner(self) -> String {
        self.0
    }
}

impl fmt::Debug for ResolutionKey {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        // keys are long and not meant to be read
        write!(f, "ResolutionKey(..{})", self.0.len())
    }
}

#[derive(Debug, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct SuggestionCandidate {
    pub display_text: String,
    #[serde(skip_serializing)]
    pub resolution_key: ResolutionKey,
}

impl SuggestionCandidate {
    pub fn new<S: Into<String>>(display_text: S, resolution_key: ResolutionKey) -> Self {
        Self {
            display_text: display_text.into(),
            resolution_key,
        }
    }
}

/// A location returned by the geocoder for a resolution key.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct GeocodeCandidate {
    pub address: String,
    pub location: GeoPoint,
    pub score: f64,
}
