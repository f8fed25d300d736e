use std::{env, str::FromStr, time::Duration};

use model::GeoPoint;
use serde::{Deserialize, Serialize};
use serde_with::{serde_as, DurationMilliSeconds};

use crate::{
    buffer::DEFAULT_AD_HOC_CAPACITY, fetcher::DEFAULT_BATCH_DELAY,
    sampler::DEFAULT_MAX_SAMPLES, MAX_POINTS_PER_REQUEST,
};

/// Jakarta, where the map opens and suggestions are ranked around.
pub const DEFAULT_LOCATION: GeoPoint = GeoPoint::new(106.8451, -6.2088);

#[serde_as]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SessionConfig {
    /// Upper bound of sampled points per segment of a drawn line.
    pub max_samples: usize,
    /// Coordinates per elevation request.
    pub batch_size: usize,
    /// Pause between two consecutive elevation requests of one profile.
    #[serde_as(as = "DurationMilliSeconds<u64>")]
    pub batch_delay: Duration,
    /// Number of single point observations kept for display.
    pub ad_hoc_capacity: usize,
    pub max_suggestions: usize,
    /// Location suggestions are biased towards.
    pub search_location: GeoPoint,
    pub initial_center: GeoPoint,
    pub initial_zoom: u8,
    /// Zoom level used when the map is recentred on a search result.
    pub focus_zoom: u8,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            max_samples: DEFAULT_MAX_SAMPLES,
            batch_size: MAX_POINTS_PER_REQUEST,
            batch_delay: DEFAULT_BATCH_DELAY,
            ad_hoc_capacity: DEFAULT_AD_HOC_CAPACITY,
            max_suggestions: 5,
            search_location: DEFAULT_LOCATION,
            initial_center: DEFAULT_LOCATION,
            initial_zoom: 10,
            focus_zoom: 15,
        }
    }
}

impl SessionConfig {
    /// Default configuration with overrides taken from the environment.
    pub fn from_env() -> Self {
        let mut config = Self::default();
        if let Some(max_samples) = env_var("TERRAIN_MAX_SAMPLES") {
            config.max_samples = max_samples;
        }
        if let Some(batch_size) = env_var("TERRAIN_BATCH_SIZE") {
            config.batch_size = batch_size;
        }
        if let Some(millis) = env_var("TERRAIN_BATCH_DELAY_MS") {
            config.batch_delay = Duration::from_millis(millis);
        }
        if let Some(capacity) = env_var("TERRAIN_AD_HOC_CAPACITY") {
            config.ad_hoc_capacity = capacity;
        }
        if let Some(max_suggestions) = env_var("TERRAIN_MAX_SUGGESTIONS") {
            config.max_suggestions = max_suggestions;
        }
        config
    }
}

fn env_var<T: FromStr>(key: &str) -> Option<T> {
    let value = env::var(key).ok()?;
    match value.parse() {
        Ok(parsed) => Some(parsed),
        Err(_) => {
            log::warn!("ignoring invalid value '{}' of {}", value, key);
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_json_keeps_defaults() {
        let config: SessionConfig =
            serde_json::from_str(r#"{ "maxSamples": 30, "batchDelay": 250 }"#).unwrap();
        assert_eq!(config.max_samples, 30);
        assert_eq!(config.batch_delay, Duration::from_millis(250));
        assert_eq!(config.batch_size, 100);
        assert_eq!(config.ad_hoc_capacity, 10);
        assert_eq!(config.search_location, DEFAULT_LOCATION);
    }

    #[test]
    fn environment_overrides_defaults() {
        env::set_var("TERRAIN_MAX_SAMPLES", "30");
        env::set_var("TERRAIN_BATCH_DELAY_MS", "250");
        env::set_var("TERRAIN_AD_HOC_CAPACITY", "3");
        env::set_var("TERRAIN_BATCH_SIZE", "fifty");
        env::set_var("TERRAIN_MAX_SUGGESTIONS", "-1");

        let config = SessionConfig::from_env();

        for key in [
            "TERRAIN_MAX_SAMPLES",
            "TERRAIN_BATCH_DELAY_MS",
            "TERRAIN_AD_HOC_CAPACITY",
            "TERRAIN_BATCH_SIZE",
            "TERRAIN_MAX_SUGGESTIONS",
        ] {
            env::remove_var(key);
        }
        assert_eq!(config.max_samples, 30);
        assert_eq!(config.batch_delay, Duration::from_millis(250));
        assert_eq!(config.ad_hoc_capacity, 3);
        // invalid values keep the defaults
        assert_eq!(config.batch_size, 100);
        assert_eq!(config.max_suggestions, 5);
    }

    #[test]
    fn serializes_delay_as_milliseconds() {
        let json = serde_json::to_value(SessionConfig::default()).unwrap();
        assert_eq!(json["batchDelay"], 100);
        assert_eq!(json["maxSuggestions"], 5);
    }
}
