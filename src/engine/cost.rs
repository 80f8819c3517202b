use crate::geo::haversine_km;
use crate::models::grouping::{Candidate, RouteGroup, RouteStop};
use crate::models::restaurant::GeoPoint;

/// Minutes of driving per kilometre, a fixed 20 km/h effective speed.
const MINUTES_PER_KM: f64 = 3.0;

/// Prices a sequenced route as a closed loop:
/// restaurant → stop₁ → … → stopₙ → restaurant.
///
/// The return leg deliberately over-counts one-way trips; it stands in for
/// the driver's return-to-base overhead as a conservative estimate.
pub fn estimate_route(stops: Vec<Candidate>, origin: &GeoPoint) -> RouteGroup {
    let mut position = *origin;
    let mut total_km = 0.0;
    let mut legs = Vec::with_capacity(stops.len());

    for candidate in stops {
        let leg_km = haversine_km(&position, &candidate.location);
        total_km += leg_km;
        position = candidate.location;
        legs.push(RouteStop {
            leg_km,
            order: candidate,
        });
    }

    if !legs.is_empty() {
        total_km += haversine_km(&position, origin);
    }

    RouteGroup {
        stops: legs,
        total_distance_km: total_km,
        estimated_minutes: (total_km * MINUTES_PER_KM).round() as u32,
    }
}

#[cfg(test)]
mod tests {
    use uuid::Uuid;

    use super::estimate_route;
    use crate::geo::haversine_km;
    use crate::models::grouping::Candidate;
    use crate::models::restaurant::GeoPoint;

    fn candidate(lng: f64, lat: f64) -> Candidate {
        Candidate {
            order_id: Uuid::new_v4(),
            customer_name: "test".to_string(),
            customer_email: "test@example.com".to_string(),
            address: "somewhere".to_string(),
            location: GeoPoint { lat, lng },
            delivery_price: 10.0,
            distance_from_restaurant_km: 0.0,
        }
    }

    const ORIGIN: GeoPoint = GeoPoint { lat: 0.0, lng: 0.0 };

    #[test]
    fn single_stop_is_a_round_trip() {
        let stop = candidate(0.05, 0.0);
        let one_way = haversine_km(&ORIGIN, &stop.location);

        let route = estimate_route(vec![stop], &ORIGIN);

        assert!((route.total_distance_km - 2.0 * one_way).abs() < 1e-9);
        assert_eq!(route.stops.len(), 1);
        assert!((route.stops[0].leg_km - one_way).abs() < 1e-9);
    }

    #[test]
    fn legs_sum_plus_return_equals_total() {
        let stops = vec![candidate(0.01, 0.0), candidate(0.02, 0.01)];
        let last = stops[1].location;

        let route = estimate_route(stops, &ORIGIN);

        let legs_sum: f64 = route.stops.iter().map(|s| s.leg_km).sum();
        let return_leg = haversine_km(&last, &ORIGIN);
        assert!((route.total_distance_km - (legs_sum + return_leg)).abs() < 1e-9);
    }

    #[test]
    fn eta_uses_three_minutes_per_km() {
        let route = estimate_route(vec![candidate(0.1, 0.0)], &ORIGIN);

        let expected = (route.total_distance_km * 3.0).round() as u32;
        assert_eq!(route.estimated_minutes, expected);
    }

    #[test]
    fn empty_route_costs_nothing() {
        let route = estimate_route(Vec::new(), &ORIGIN);

        assert_eq!(route.total_distance_km, 0.0);
        assert_eq!(route.estimated_minutes, 0);
        assert!(route.stops.is_empty());
    }
}
