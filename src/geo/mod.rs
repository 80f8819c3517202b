use serde_json::Value;

use crate::models::restaurant::GeoPoint;

const EARTH_RADIUS_KM: f64 = 6_371.0;

/// Great-circle distance on a spherical Earth. Symmetric, zero for identical
/// points. Callers must pass validated coordinates; non-finite components
/// propagate as NaN rather than erroring.
pub fn haversine_km(a: &GeoPoint, b: &GeoPoint) -> f64 {
    let lat1 = a.lat.to_radians();
    let lat2 = b.lat.to_radians();
    let delta_lat = (b.lat - a.lat).to_radians();
    let delta_lng = (b.lng - a.lng).to_radians();

    let sin_lat = (delta_lat / 2.0).sin();
    let sin_lng = (delta_lng / 2.0).sin();

    let haversine = sin_lat * sin_lat + lat1.cos() * lat2.cos() * sin_lng * sin_lng;
    let central_angle = 2.0 * haversine.sqrt().asin();

    EARTH_RADIUS_KM * central_angle
}

/// Validates a raw stored location into a coordinate.
///
/// Accepts exactly a two-element JSON array of finite numbers, `[lng, lat]`.
/// Anything else (strings, short arrays, NaN-producing values) is rejected so
/// malformed orders degrade to a statistic instead of poisoning distances.
pub fn parse_location(raw: &Value) -> Option<GeoPoint> {
    let parts = raw.as_array()?;
    if parts.len() != 2 {
        return None;
    }

    let lng = parts[0].as_f64()?;
    let lat = parts[1].as_f64()?;
    if !lng.is_finite() || !lat.is_finite() {
        return None;
    }

    Some(GeoPoint { lat, lng })
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::{haversine_km, parse_location};
    use crate::models::restaurant::GeoPoint;

    #[test]
    fn zero_distance_for_same_point() {
        let p = GeoPoint {
            lat: 53.5511,
            lng: 9.9937,
        };
        let distance = haversine_km(&p, &p);
        assert!(distance < 1e-9);
    }

    #[test]
    fn distance_is_symmetric() {
        let a = GeoPoint {
            lat: 30.0444,
            lng: 31.2357,
        };
        let b = GeoPoint {
            lat: 31.2001,
            lng: 29.9187,
        };
        assert_eq!(haversine_km(&a, &b), haversine_km(&b, &a));
    }

    #[test]
    fn london_to_paris_is_around_343_km() {
        let london = GeoPoint {
            lat: 51.5074,
            lng: -0.1278,
        };
        let paris = GeoPoint {
            lat: 48.8566,
            lng: 2.3522,
        };
        let distance = haversine_km(&london, &paris);
        assert!((distance - 343.0).abs() < 5.0);
    }

    #[test]
    fn parse_location_accepts_lng_lat_pair() {
        let point = parse_location(&json!([31.2357, 30.0444])).unwrap();
        assert_eq!(point.lng, 31.2357);
        assert_eq!(point.lat, 30.0444);
    }

    #[test]
    fn parse_location_rejects_malformed_values() {
        assert!(parse_location(&json!("invalid")).is_none());
        assert!(parse_location(&json!([1.0])).is_none());
        assert!(parse_location(&json!([1.0, 2.0, 3.0])).is_none());
        assert!(parse_location(&json!([1.0, "x"])).is_none());
        assert!(parse_location(&json!(null)).is_none());
    }
}
