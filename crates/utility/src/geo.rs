/// Spatial reference id of geographic WGS84 longitude/latitude.
pub const WGS84_WKID: u32 = 4326;

/// Spatial reference id of Web Mercator, the default reference of drawn features.
pub const WEB_MERCATOR_WKID: u32 = 3857;

pub fn to_radians(degrees: f64) -> f64 {
    degrees * std::f64::consts::PI / 180.0
}

pub fn to_degrees(radians: f64) -> f64 {
    radians * 180.0 / std::f64::consts::PI
}

/// Rounds a value to the given number of decimal places. Halves round up,
/// towards positive infinity, also for negative values.
pub fn round_to(value: f64, decimals: i32) -> f64 {
    let factor = 10f64.powi(decimals);
    (value * factor + 0.5).floor() / factor
}

/// Human readable label of a coordinate, e.g. `-6.2088, 106.8451`.
pub fn coordinate_label(latitude: f64, longitude: f64) -> String {
    format!("{:.4}, {:.4}", latitude, longitude)
}
