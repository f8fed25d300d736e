use std::error;
use std::fmt;
use std::sync::Arc;

pub mod client;
pub mod elevation;
pub mod geocoding;
pub mod model;

pub use client::{ArcGisClient, ArcGisCredentials};

#[derive(Debug, Clone)]
pub enum ApiError {
    RequestError(Arc<reqwest::Error>),
    JsonError(Arc<serde_json::Error>),
    InvalidResponse {
        status_code: reqwest::StatusCode,
        url: String,
        response: Option<String>,
    },
    /// Error envelope returned by the service with a successful HTTP status.
    Service {
        code: i64,
        message: String,
    },
    RateLimitReached,
    TooManyPoints(usize),
    Other(String),
}

impl error::Error for ApiError {}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            ApiError::RequestError(e) => write!(f, "HTTP request error: {}", e),
            ApiError::JsonError(e) => write!(f, "JSON parse error: {}", e),
            ApiError::InvalidResponse {
                status_code,
                url,
                response,
            } => match response {
                Some(text) => {
                    write!(f, "Invalid Response ({}) {}: {}", status_code, text, url)
                }
                None => write!(f, "Invalid Response({}) {}", status_code, url),
            },
            ApiError::Service { code, message } => {
                write!(f, "Service error {}: {}", code, message)
            }
            ApiError::RateLimitReached => write!(f, "Rate limit reached."),
            ApiError::TooManyPoints(n) => write!(
                f,
                "{} points exceed the limit of {} per request",
                n,
                terrain::MAX_POINTS_PER_REQUEST
            ),
            ApiError::Other(e) => write!(f, "{e}"),
        }
    }
}

impl From<reqwest::Error> for ApiError {
    fn from(e: reqwest::Error) -> Self {
        ApiError::RequestError(Arc::new(e))
    }
}

impl From<serde_json::Error> for ApiError {
    fn from(e: serde_json::Error) -> Self {
        ApiError::JsonError(Arc::new(e))
    }
}
