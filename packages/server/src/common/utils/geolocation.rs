use serde::{Deserialize, Serialize};

/// Mean Earth radius used by the Haversine formula
pub const EARTH_RADIUS_KM: f64 = 6371.0;

/// Approximate length of one degree of latitude
pub const KM_PER_DEGREE: f64 = 111.32;

/// Coarse rectangular area around a point, used as a pre-filter before the
/// exact distance check. May include points slightly outside the radius.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoundingBox {
    pub min_lat: f64,
    pub max_lat: f64,
    pub min_lon: f64,
    pub max_lon: f64,
}

impl BoundingBox {
    pub fn contains(&self, lat: f64, lon: f64) -> bool {
        lat >= self.min_lat && lat <= self.max_lat && lon >= self.min_lon && lon <= self.max_lon
    }
}

/// Round to 2 decimal places
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Calculate distance between two coordinates in kilometers
///
/// Uses the Haversine formula; the result is rounded to 2 decimal places.
///
/// # Example
/// ```
/// use marketplace_core::common::utils::calculate_distance;
///
/// assert_eq!(calculate_distance(6.5244, 3.3792, 6.5244, 3.3792), 0.0);
/// ```
pub fn calculate_distance(lat1: f64, lon1: f64, lat2: f64, lon2: f64) -> f64 {
    let dlat = (lat2 - lat1).to_radians();
    let dlon = (lon2 - lon1).to_radians();

    let a = (dlat / 2.0).sin().powi(2)
        + lat1.to_radians().cos() * lat2.to_radians().cos() * (dlon / 2.0).sin().powi(2);

    let c = 2.0 * a.sqrt().atan2((1.0 - a).sqrt());

    round2(EARTH_RADIUS_KM * c)
}

/// True iff both values are finite and inside the WGS84 ranges
pub fn validate_coordinates(lat: f64, lon: f64) -> bool {
    lat.is_finite()
        && lon.is_finite()
        && (-90.0..=90.0).contains(&lat)
        && (-180.0..=180.0).contains(&lon)
}

pub fn is_within_radius(
    center_lat: f64,
    center_lon: f64,
    lat: f64,
    lon: f64,
    radius_km: f64,
) -> bool {
    calculate_distance(center_lat, center_lon, lat, lon) <= radius_km
}

/// Approximate bounding box of `radius_km` around a center point
///
/// Latitude span uses 111.32 km/degree; longitude span is widened by
/// 1/cos(latitude). When the box would cross a pole or the antimeridian the
/// affected axis falls back to its full range.
pub fn get_bounding_box(center_lat: f64, center_lon: f64, radius_km: f64) -> BoundingBox {
    let lat_delta = radius_km / KM_PER_DEGREE;
    let cos_lat = center_lat.to_radians().cos();

    let min_lat = center_lat - lat_delta;
    let max_lat = center_lat + lat_delta;

    let (min_lon, max_lon) = if cos_lat <= f64::EPSILON || min_lat < -90.0 || max_lat > 90.0 {
        (-180.0, 180.0)
    } else {
        let lon_delta = radius_km / (KM_PER_DEGREE * cos_lat);
        let (min_lon, max_lon) = (center_lon - lon_delta, center_lon + lon_delta);
        if min_lon < -180.0 || max_lon > 180.0 {
            (-180.0, 180.0)
        } else {
            (min_lon, max_lon)
        }
    };

    BoundingBox {
        min_lat: min_lat.max(-90.0),
        max_lat: max_lat.min(90.0),
        min_lon,
        max_lon,
    }
}
