use serde::{Deserialize, Serialize};

/// Geographic position in degrees.
#[derive(Debug, Copy, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct GeoPoint {
    #[serde(rename = "lat")]
    pub lat_deg: f64,
    #[serde(rename = "lng")]
    pub lng_deg: f64,
}

impl GeoPoint {
    /// Latitude clamped to `[-90, 90]`, longitude wrapped to `[-180, 180)`.
    pub fn new(lat_deg: f64, lng_deg: f64) -> Self {
        Self {
            lat_deg: lat_deg.clamp(-90.0, 90.0),
            lng_deg: wrap_longitude(lng_deg),
        }
    }
}

pub fn wrap_longitude(lng_deg: f64) -> f64 {
    if !lng_deg.is_finite() {
        return 0.0;
    }
    (lng_deg + 180.0).rem_euclid(360.0) - 180.0
}

/// Camera target of the orbital engine: where it looks and from how high.
///
/// `altitude` is in globe radii above the surface.
#[derive(Debug, Copy, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ViewportState {
    pub altitude: f64,
    pub center: GeoPoint,
}

impl ViewportState {
    pub fn new(center: GeoPoint, altitude: f64) -> Self {
        Self {
            altitude: if altitude.is_nan() { 0.0 } else { altitude.max(0.0) },
            center: GeoPoint::new(center.lat_deg, center.lng_deg),
        }
    }
}
