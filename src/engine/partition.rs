use std::collections::BTreeMap;

use serde::Deserialize;

use crate::geo::haversine_km;
use crate::models::grouping::Candidate;
use crate::models::restaurant::GeoPoint;

const KMEANS_MAX_ITERATIONS: usize = 10;
const KMEANS_CONVERGENCE_KM: f64 = 0.01;

#[derive(Debug, Clone, Copy)]
pub struct PartitionParams {
    pub max_group_size: usize,
    pub max_distance_km: f64,
}

/// Which partitioner a suggestion request should use.
#[derive(Debug, Clone, Copy, Default, PartialEq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Strategy {
    #[default]
    Grid,
    Kmeans,
}

impl Strategy {
    pub fn partitioner(self) -> Box<dyn Partitioner> {
        match self {
            Strategy::Grid => Box::new(GridPartitioner),
            Strategy::Kmeans => Box::new(KMeansPartitioner),
        }
    }
}

/// Divides the candidate set into spatial clusters. Clusters may exceed
/// `max_group_size`; the sequencer subdivides them into trips.
pub trait Partitioner: Send + Sync {
    fn partition(
        &self,
        candidates: Vec<Candidate>,
        origin: &GeoPoint,
        params: &PartitionParams,
    ) -> Vec<Vec<Candidate>>;
}

/// Fixed-grid bucketing by coordinate cell.
///
/// Cell edge is `max_distance_km / sqrt(2)` so any two points in the same
/// cell are within `max_distance_km` of each other. Known, accepted
/// limitations: longitude degrees shrink with latitude (the cell mapping
/// ignores this), and close points straddling a cell boundary land in
/// different clusters.
pub struct GridPartitioner;

impl Partitioner for GridPartitioner {
    fn partition(
        &self,
        candidates: Vec<Candidate>,
        _origin: &GeoPoint,
        params: &PartitionParams,
    ) -> Vec<Vec<Candidate>> {
        let cell = params.max_distance_km / std::f64::consts::SQRT_2;

        // BTreeMap keeps cluster order independent of hashing.
        let mut cells: BTreeMap<(i64, i64), Vec<Candidate>> = BTreeMap::new();
        for candidate in candidates {
            let key = (
                (candidate.location.lng / cell).floor() as i64,
                (candidate.location.lat / cell).floor() as i64,
            );
            cells.entry(key).or_default().push(candidate);
        }

        cells.into_values().collect()
    }
}

/// Lloyd's algorithm with `k = ceil(n / max_group_size)` clusters.
///
/// Centroids are seeded from the first k candidates, so results depend on
/// candidate ordering; that is an accepted property of this heuristic, not a
/// correctness requirement. Empty clusters are reseeded deterministically to
/// the candidate farthest from its current centroid (the original random
/// restart could cycle).
pub struct KMeansPartitioner;

impl Partitioner for KMeansPartitioner {
    fn partition(
        &self,
        candidates: Vec<Candidate>,
        _origin: &GeoPoint,
        params: &PartitionParams,
    ) -> Vec<Vec<Candidate>> {
        if candidates.is_empty() {
            return Vec::new();
        }

        let group_size = params.max_group_size.max(1);
        let k = candidates.len().div_ceil(group_size);

        let mut centroids: Vec<GeoPoint> = candidates
            .iter()
            .take(k)
            .map(|candidate| candidate.location)
            .collect();

        for _ in 0..KMEANS_MAX_ITERATIONS {
            let memberships = assign_to_nearest(&candidates, &centroids);

            let mut max_movement = 0.0_f64;
            for (cluster_idx, members) in memberships.iter().enumerate() {
                let new_centroid = if members.is_empty() {
                    farthest_candidate(&candidates, &centroids)
                } else {
                    mean_point(members.iter().map(|&i| candidates[i].location))
                };

                let movement = haversine_km(&centroids[cluster_idx], &new_centroid);
                max_movement = max_movement.max(movement);
                centroids[cluster_idx] = new_centroid;
            }

            if max_movement < KMEANS_CONVERGENCE_KM {
                break;
            }
        }

        // Final assignment against the settled centroids.
        let memberships = assign_to_nearest(&candidates, &centroids);

        let mut clusters: Vec<Vec<Candidate>> = vec![Vec::new(); k];
        let mut slots: Vec<Option<Candidate>> = candidates.into_iter().map(Some).collect();
        for (cluster_idx, members) in memberships.iter().enumerate() {
            for &candidate_idx in members {
                if let Some(candidate) = slots[candidate_idx].take() {
                    clusters[cluster_idx].push(candidate);
                }
            }
        }

        clusters.retain(|cluster| !cluster.is_empty());
        clusters
    }
}

fn assign_to_nearest(candidates: &[Candidate], centroids: &[GeoPoint]) -> Vec<Vec<usize>> {
    let mut memberships: Vec<Vec<usize>> = vec![Vec::new(); centroids.len()];

    for (candidate_idx, candidate) in candidates.iter().enumerate() {
        let nearest = centroids
            .iter()
            .enumerate()
            .min_by(|a, b| {
                haversine_km(&candidate.location, a.1)
                    .total_cmp(&haversine_km(&candidate.location, b.1))
            })
            .map(|(idx, _)| idx)
            .unwrap_or(0);
        memberships[nearest].push(candidate_idx);
    }

    memberships
}

fn mean_point(points: impl Iterator<Item = GeoPoint>) -> GeoPoint {
    let mut lat_sum = 0.0;
    let mut lng_sum = 0.0;
    let mut count = 0usize;
    for point in points {
        lat_sum += point.lat;
        lng_sum += point.lng;
        count += 1;
    }

    GeoPoint {
        lat: lat_sum / count as f64,
        lng: lng_sum / count as f64,
    }
}

/// Deterministic reseed target for an emptied cluster: the candidate whose
/// distance to its nearest centroid is largest.
fn farthest_candidate(candidates: &[Candidate], centroids: &[GeoPoint]) -> GeoPoint {
    candidates
        .iter()
        .max_by(|a, b| {
            min_centroid_distance(&a.location, centroids)
                .total_cmp(&min_centroid_distance(&b.location, centroids))
        })
        .map(|candidate| candidate.location)
        .unwrap_or(centroids[0])
}

fn min_centroid_distance(point: &GeoPoint, centroids: &[GeoPoint]) -> f64 {
    centroids
        .iter()
        .map(|centroid| haversine_km(point, centroid))
        .fold(f64::INFINITY, f64::min)
}
