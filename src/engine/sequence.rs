use crate::geo::haversine_km;
use crate::models::grouping::Candidate;
use crate::models::restaurant::GeoPoint;

/// Splits one cluster into driver trips of at most `max_group_size` stops.
///
/// Greedy nearest-neighbor: starting at the restaurant, repeatedly take the
/// closest unvisited order and advance to it; when the trip is full, start a
/// new one from the restaurant. First order wins distance ties, so output is
/// deterministic for a fixed candidate ordering. O(m²) per cluster, which is
/// fine at per-restaurant batch sizes.
pub fn sequence_routes(
    cluster: Vec<Candidate>,
    origin: &GeoPoint,
    max_group_size: usize,
) -> Vec<Vec<Candidate>> {
    if cluster.is_empty() {
        return Vec::new();
    }
    if cluster.len() == 1 {
        return vec![cluster];
    }

    let group_size = max_group_size.max(1);
    let mut remaining = cluster;
    let mut routes = Vec::new();

    while !remaining.is_empty() {
        let mut position = *origin;
        let mut route = Vec::with_capacity(group_size.min(remaining.len()));

        while route.len() < group_size && !remaining.is_empty() {
            let nearest_idx = remaining
                .iter()
                .enumerate()
                .min_by(|a, b| {
                    haversine_km(&position, &a.1.location)
                        .total_cmp(&haversine_km(&position, &b.1.location))
                })
                .map(|(idx, _)| idx)
                .unwrap_or(0);

            // remove (not swap_remove) keeps the scan order of the leftovers
            // stable, so tie-breaks stay deterministic across trips.
            let next = remaining.remove(nearest_idx);
            position = next.location;
            route.push(next);
        }

        routes.push(route);
    }

    routes
}
