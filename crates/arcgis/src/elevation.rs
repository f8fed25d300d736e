use async_trait::async_trait;
use model::{ElevationSample, GeoPoint};
use terrain::{ElevationService, MAX_POINTS_PER_REQUEST};

use crate::{client::ArcGisClient, model::elevation::ElevationResponse, ApiError};

/// Elevations of up to `MAX_POINTS_PER_REQUEST` points, in request order.
pub async fn get_elevations(
    client: &ArcGisClient,
    points: &[GeoPoint],
) -> Result<Vec<ElevationSample>, ApiError> {
    if points.len() > MAX_POINTS_PER_REQUEST {
        return Err(ApiError::TooManyPoints(points.len()));
    }
    let coordinates = points
        .iter()
        .map(|point| [point.longitude, point.latitude])
        .collect::<Vec<_>>();

    /* fetch data */
    let response: ElevationResponse = client
        .post_form(
            &format!("{}/elevation/at-many-points", client.elevation_url()),
            &[("coordinates", serde_json::to_string(&coordinates)?)],
        )
        .await?;

    Ok(response.result.points.into_iter().map(Into::into).collect())
}

#[async_trait]
impl ElevationService for ArcGisClient {
    type Error = ApiError;

    async fn elevations(
        &self,
        points: &[GeoPoint],
    ) -> Result<Vec<ElevationSample>, Self::Error> {
        get_elevations(self, points).await
    }
}

#[cfg(test)]
mod tests {
    use crate::client::ArcGisCredentials;

    use super::*;

    #[tokio::test]
    async fn oversized_batches_are_rejected_locally() {
        let client = ArcGisClient::new(&ArcGisCredentials {
            api_key: "test-key".to_owned(),
            rate_limit_per_minute: Some(5),
            proxy: None,
        })
        .unwrap();
        let points = vec![GeoPoint::new(106.8, -6.2); MAX_POINTS_PER_REQUEST + 1];

        let result = client.elevations(&points).await;

        assert!(matches!(result, Err(ApiError::TooManyPoints(101))));
        assert_eq!(client.available_requests().await, 5);
    }

    #[test]
    fn response_points_become_samples() {
        let response: ElevationResponse = serde_json::from_str(
            r#"{
                "result": {
                    "points": [
                        { "x": 106.8451, "y": -6.2088, "z": 8.123 },
                        { "x": 106.9, "y": -6.3, "z": -1.5 }
                    ],
                    "spatialReference": { "wkid": 4326 }
                }
            }"#,
        )
        .unwrap();
        let samples = response
            .result
            .points
            .into_iter()
            .map(ElevationSample::from)
            .collect::<Vec<_>>();
        assert_eq!(samples.len(), 2);
        assert_eq!(samples[0].point, GeoPoint::new(106.8451, -6.2088));
        assert_eq!(samples[0].z, 8.123);
        assert_eq!(samples[1].z, -1.5);
    }
}
