//! Aggregator: turns clustered sample groups into scored, ranked, optionally
//! reverse-geocoded `Cluster`s.

use crate::pipeline::cache::TtlCache;
use crate::pipeline::client::{INCIDENT_TIMEOUT, reverse_geocode_url};
use crate::pipeline::geo::LatLon;
use crate::pipeline::types::{Cluster, Incident, SamplePoint};
use reqwest::Client;
use serde::Deserialize;
use std::{sync::Arc, time::Duration};

/// Minimum incident-proximity radius used when scoring a cluster, regardless of how
/// small the caller's `incident_radius_m` is.
pub const MIN_INCIDENT_PROXIMITY_M: f64 = 150.0;
/// TTL for the reverse-geocode cache, keyed by 5-decimal-rounded coordinates.
pub const GEOCODE_CACHE_TTL: Duration = Duration::from_secs(300);

pub type GeocodeCache = TtlCache<(i64, i64), Option<Arc<str>>>;

pub fn new_geocode_cache() -> GeocodeCache {
	TtlCache::new(GEOCODE_CACHE_TTL)
}

fn rounded_key(lat: f64, lon: f64) -> (i64, i64) {
	((lat * 100_000.0).round() as i64, (lon * 100_000.0).round() as i64)
}

/// Aggregates one cluster's members into scored summary statistics. Returns `None`
/// if the member weights sum to zero or less (should not happen for non-empty
/// DBSCAN clusters, but guards against degenerate input).
fn summarize(members: &[SamplePoint], incidents: &[Incident], incident_radius_m: f64) -> Option<(LatLon, f64, f64, usize, bool)> {
	let total_w: f64 = members.iter().map(|s| s.weight).sum();
	if total_w <= 0.0 {
		return None;
	}

	let center_lat = members.iter().map(|s| s.lat * s.weight).sum::<f64>() / total_w;
	let center_lon = members.iter().map(|s| s.lon * s.weight).sum::<f64>() / total_w;
	let mean_severity = members.iter().map(|s| s.severity * s.weight).sum::<f64>() / total_w;

	let mut severities: Vec<f64> = members.iter().map(|s| s.severity).collect();
	severities.sort_by(|a, b| a.partial_cmp(b).unwrap());
	let peak_severity = if severities.len() == 1 {
		severities[0]
	} else {
		severities[(0.9 * (severities.len() - 1) as f64).floor() as usize]
	};

	let center = LatLon::new(center_lat, center_lon);
	let proximity_radius = incident_radius_m.max(MIN_INCIDENT_PROXIMITY_M);
	let nearby: Vec<&Incident> = incidents.iter().filter(|inc| center.haversine_m(&inc.point) <= proximity_radius).collect();
	let incident_count = nearby.len();
	let closure = nearby.iter().any(|inc| inc.closed);

	Some((center, mean_severity, peak_severity, incident_count, closure))
}

fn bonus(closure: bool, incident_count: usize) -> f64 {
	let a = if closure { 0.1 } else { 0.0 };
	let b = if incident_count > 0 { 0.1 } else { 0.0 };
	a.max(b)
}

fn score(mean_severity: f64, peak_severity: f64, bonus: f64) -> f64 {
	100.0 * (0.6 * mean_severity + 0.3 * peak_severity + 0.1 * bonus)
}

/// Aggregates every non-empty cluster, assigns stable `cp_<index>` ids after sorting
/// descending by score, and (if `include_geocode`) resolves each centroid to a
/// street name via the cached reverse-geocoder. Geocode failures never fail the
/// cluster — they simply leave `road_name` as `None`.
pub async fn aggregate(
	cluster_groups: Vec<Vec<SamplePoint>>,
	incidents: &[Incident],
	incident_radius_m: f64,
	include_geocode: bool,
	client: &Client,
	search_key: Option<&str>,
	geocode_cache: &GeocodeCache,
) -> Vec<Cluster> {
	let mut clusters: Vec<Cluster> = Vec::new();
	for members in &cluster_groups {
		let Some((center, mean_severity, peak_severity, incident_count, closure)) = summarize(members, incidents, incident_radius_m) else {
			continue;
		};
		let support: f64 = members.iter().map(|s| s.weight).sum();
		let b = bonus(closure, incident_count);
		clusters.push(Cluster {
			id: String::new(),
			center,
			score: score(mean_severity, peak_severity, b),
			severity_mean: mean_severity,
			severity_peak: peak_severity,
			incident_count,
			closure,
			support,
			count: members.len(),
			road_name: None,
		});
	}

	clusters.sort_by(|a, b| b.score.partial_cmp(&a.score).unwrap());
	for (index, cluster) in clusters.iter_mut().enumerate() {
		cluster.id = format!("cp_{index}");
	}

	if include_geocode {
		if let Some(key) = search_key {
			for cluster in clusters.iter_mut() {
				cluster.road_name = reverse_geocode(client, key, geocode_cache, cluster.center).await;
			}
		}
	}

	clusters
}

async fn reverse_geocode(client: &Client, key: &str, cache: &GeocodeCache, point: LatLon) -> Option<String> {
	let cache_key = rounded_key(point.lat, point.lon);
	if let Some(cached) = cache.get(&cache_key).await {
		return cached.map(|s| s.to_string());
	}

	let name = fetch_street_name(client, key, point).await;
	cache.insert(cache_key, name.clone().map(Arc::from)).await;
	name
}

#[derive(Deserialize)]
struct ReverseGeocodeResponse {
	addresses: Option<Vec<ReverseGeocodeAddress>>,
}

#[derive(Deserialize)]
struct ReverseGeocodeAddress {
	address: Option<ReverseGeocodeAddressFields>,
}

#[derive(Deserialize)]
struct ReverseGeocodeAddressFields {
	#[serde(rename = "streetName")]
	street_name: Option<String>,
}

async fn fetch_street_name(client: &Client, key: &str, point: LatLon) -> Option<String> {
	let url = reverse_geocode_url(point.lat, point.lon, key);
	let response = client.get(url).timeout(INCIDENT_TIMEOUT).send().await.ok()?;
	if !response.status().is_success() {
		return None;
	}
	let parsed: ReverseGeocodeResponse = response.json().await.ok()?;
	parsed.addresses?.into_iter().find_map(|a| a.address?.street_name)
}
