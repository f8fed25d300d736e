use std::sync::Arc;

use arcgis::{ArcGisClient, ArcGisCredentials};
use model::{GeoPoint, Path, SketchGeometry, SpatialReference};
use terrain::{suggestion::NavigationKey, MapSession, SessionConfig};

#[tokio::main]
async fn main() {
    env_logger::init();

    let credentials = ArcGisCredentials::from_env().expect("Expected ARCGIS_API_KEY.");
    let client = Arc::new(ArcGisClient::new(&credentials).expect("Expected a valid proxy."));
    let session = MapSession::new(client.clone(), client, &SessionConfig::from_env());

    /* a line across central Jakarta, as drawn on the web map */
    let line = Path::from_coordinates(
        &[vec![
            [11_888_000.0, -690_000.0],
            [11_890_500.0, -691_200.0],
            [11_893_000.0, -692_800.0],
            [11_896_000.0, -693_500.0],
            [11_899_000.0, -695_000.0],
        ]],
        Some(SpatialReference::from_wkid(102100)),
    );
    let outcome = session
        .on_sketch_create(&SketchGeometry::Polyline(line))
        .await;
    log::info!("profile: {:?}", outcome);
    let json = serde_json::to_string_pretty(&session.snapshot().await).unwrap();
    println!("profile: {}", json);
    session.on_sketch_delete().await;

    /* search an address and pick the first suggestion */
    if session.search_input("Monas").await {
        println!(
            "suggestions: {}",
            serde_json::to_string_pretty(&session.search_view().await).unwrap()
        );
        session.search_key(NavigationKey::ArrowDown).await;
        let outcome = session.search_key(NavigationKey::Enter).await;
        log::info!("search: {:?}", outcome);
    }

    session.on_map_click(GeoPoint::new(106.8456, -6.1751)).await;

    println!(
        "viewport: {}",
        serde_json::to_string_pretty(&session.viewport().await).unwrap()
    );
    println!(
        "observations: {}",
        serde_json::to_string_pretty(&session.snapshot().await).unwrap()
    );
}
