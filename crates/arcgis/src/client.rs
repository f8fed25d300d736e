use std::env;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use tokio::sync::RwLock;

use chrono::Local;

use crate::model::ServiceError;
use crate::ApiError;

pub const ELEVATION_API_URL: &str =
    "https://elevation-api.arcgis.com/arcgis/rest/services/elevation-service/v1";
pub const GEOCODE_API_URL: &str =
    "https://geocode-api.arcgis.com/arcgis/rest/services/World/GeocodeServer";

/// Error code the services use when the key exceeded its quota.
const RATE_LIMIT_CODE: i64 = 429;

#[serde_with::skip_serializing_none]
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ArcGisCredentials {
    pub api_key: String,
    pub rate_limit_per_minute: Option<u64>,
    pub proxy: Option<String>,
}

impl ArcGisCredentials {
    /// Reads `ARCGIS_API_KEY`, `ARCGIS_RATE_LIMIT_PER_MINUTE` and `ARCGIS_PROXY`.
    /// Returns `None` without an api key.
    pub fn from_env() -> Option<Self> {
        let api_key = env::var("ARCGIS_API_KEY").ok()?;
        let rate_limit_per_minute = env::var("ARCGIS_RATE_LIMIT_PER_MINUTE")
            .ok()
            .and_then(|limit| match limit.parse() {
                Ok(limit) => Some(limit),
                Err(_) => {
                    log::warn!("ignoring invalid rate limit '{}'", limit);
                    None
                }
            });

        Some(Self {
            api_key,
            rate_limit_per_minute,
            proxy: env::var("ARCGIS_PROXY").ok(),
        })
    }
}

struct ArcGisClientState {
    pub available_requests: u64,
    pub last_refill: chrono::DateTime<Local>,
}

pub struct ArcGisClient {
    pub credentials: ArcGisCredentials,
    http: reqwest::Client,
    elevation_url: String,
    geocode_url: String,
    state: RwLock<ArcGisClientState>,
}

impl ArcGisClient {
    pub fn new(credentials: &ArcGisCredentials) -> Result<Self, ApiError> {
        Self::with_urls(credentials, ELEVATION_API_URL, GEOCODE_API_URL)
    }

    /// Client for services hosted somewhere else, e.g. an enterprise portal.
    pub fn with_urls(
        credentials: &ArcGisCredentials,
        elevation_url: &str,
        geocode_url: &str,
    ) -> Result<Self, ApiError> {
        /* build the http client with optional proxy */
        let http = if let Some(proxy_url) = &credentials.proxy {
            log::info!("Using proxy '{proxy_url}'.");
            reqwest::Client::builder()
                .proxy(reqwest::Proxy::all(proxy_url)?)
                .build()?
        } else {
            reqwest::Client::new()
        };

        Ok(Self {
            credentials: credentials.clone(),
            http,
            elevation_url: elevation_url.trim_end_matches('/').to_owned(),
            geocode_url: geocode_url.trim_end_matches('/').to_owned(),
            state: RwLock::new(ArcGisClientState {
                available_requests: credentials.rate_limit_per_minute.unwrap_or(0),
                last_refill: chrono::offset::Local::now(),
            }),
        })
    }

    pub fn elevation_url(&self) -> &str {
        &self.elevation_url
    }

    pub fn geocode_url(&self) -> &str {
        &self.geocode_url
    }

    pub async fn available_requests(&self) -> u64 {
        self.state.read().await.available_requests
    }

    async fn try_decrement_available_requests(&self) -> Result<(), ApiError> {
        if let Some(rate_limit_minutes) = self.credentials.rate_limit_per_minute {
            let mut state = self.state.write().await;

            let minutes_since_last_refill =
                (chrono::offset::Local::now() - state.last_refill).num_minutes();
            if minutes_since_last_refill >= 1 {
                state.available_requests = rate_limit_minutes;
                state.last_refill = chrono::offset::Local::now();
            }

            if state.available_requests != 0 {
                state.available_requests -= 1;
            } else {
                return Err(ApiError::RateLimitReached);
            }
        }
        Ok(())
    }

    fn params<'a>(&'a self, params: &[(&'a str, String)]) -> Vec<(&'a str, String)> {
        let mut all = params.to_vec();
        all.push(("f", "json".to_owned()));
        all.push(("token", self.credentials.api_key.clone()));
        all
    }

    /// Query an endpoint with url parameters.
    pub async fn get<T: DeserializeOwned>(
        &self,
        url: &str,
        params: &[(&str, String)],
    ) -> Result<T, ApiError> {
        self.try_decrement_available_requests().await?;
        log::debug!("Requesting '{url}'.");

        let response = self.http.get(url).query(&self.params(params)).send().await?;
        let status = response.status();
        parse_response(status, url, response.text().await)
    }

    /// Post form encoded parameters to an endpoint.
    pub async fn post_form<T: DeserializeOwned>(
        &self,
        url: &str,
        params: &[(&str, String)],
    ) -> Result<T, ApiError> {
        self.try_decrement_available_requests().await?;
        log::debug!("Posting to '{url}'.");

        let response = self.http.post(url).form(&self.params(params)).send().await?;
        let status = response.status();
        parse_response(status, url, response.text().await)
    }
}

/// Maps a response body to `T`, or to an error when the status or the error
/// envelope says the request failed.
pub(crate) fn parse_response<T: DeserializeOwned>(
    status: reqwest::StatusCode,
    url: &str,
    body: Result<String, reqwest::Error>,
) -> Result<T, ApiError> {
    match status {
        reqwest::StatusCode::OK => {}
        reqwest::StatusCode::TOO_MANY_REQUESTS => return Err(ApiError::RateLimitReached),
        other => {
            return Err(ApiError::InvalidResponse {
                status_code: other,
                url: url.to_owned(),
                response: body.ok(),
            })
        }
    }

    /* the services report errors inside a successful response */
    let value: serde_json::Value = serde_json::from_str(&body?)?;
    if let Some(error) = value.get("error") {
        let error: ServiceError = serde_json::from_value(error.clone())?;
        if !error.details.is_empty() {
            log::debug!("{}: {}", error.message, error.details.join("; "));
        }
        return Err(match error.code {
            RATE_LIMIT_CODE => ApiError::RateLimitReached,
            code => ApiError::Service {
                code,
                message: error.message,
            },
        });
    }
    Ok(serde_json::from_value(value)?)
}
