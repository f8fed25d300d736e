use serde::{Deserialize, Serialize};

pub mod elevation;
pub mod geocoding;

/// Body of the `error` member the services respond with on failure.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServiceError {
    pub code: i64,
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub details: Vec<String>,
}
