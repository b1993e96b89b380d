//! IncidentFetcher and IncidentBoost: retrieves current incidents (splitting large
//! bboxes and deduplicating by id), then boosts nearby sample weights.

use crate::pipeline::client::{INCIDENT_TIMEOUT, incident_details_url};
use crate::pipeline::geo::BoundingBox;
use crate::pipeline::types::{Incident, SamplePoint};
use reqwest::Client;
use serde::Deserialize;
use std::collections::HashSet;
use std::sync::Arc;
use tokio::sync::Semaphore;

/// Area above which an incident bbox is split in half rather than queried directly.
pub const SPLIT_THRESHOLD_KM2: f64 = 8_000.0;
/// Multiplicative boost applied to a sample's weight per nearby incident.
pub const BOOST_FACTOR: f64 = 1.5;
/// Upper bound on concurrent outbound incident requests across the whole split tree.
pub const CONCURRENCY: usize = 8;

/// The incidents response may be a bare list or an object wrapping one; both are
/// normalized to the same list at the boundary.
#[derive(Deserialize)]
#[serde(untagged)]
enum IncidentsShape {
	List(Vec<RawIncident>),
	Envelope { incidents: Vec<RawIncident> },
}

#[derive(Deserialize)]
struct RawIncident {
	properties: Option<RawProperties>,
	geometry: Option<RawGeometry>,
}

#[derive(Deserialize, Default)]
struct RawProperties {
	id: Option<String>,
	#[serde(rename = "roadClosed")]
	road_closed: Option<bool>,
}

#[derive(Deserialize)]
struct RawGeometry {
	#[serde(rename = "type")]
	kind: String,
	coordinates: serde_json::Value,
}

fn first_point(geometry: &RawGeometry) -> Option<[f64; 2]> {
	match geometry.kind.as_str() {
		"Point" => {
			let arr = geometry.coordinates.as_array()?;
			Some([arr.first()?.as_f64()?, arr.get(1)?.as_f64()?])
		}
		"LineString" => {
			let lines = geometry.coordinates.as_array()?;
			let first = lines.first()?.as_array()?;
			Some([first.first()?.as_f64()?, first.get(1)?.as_f64()?])
		}
		_ => None,
	}
}

/// Issues one request for "present" incidents within `bbox`, bounded by `semaphore`.
/// Non-2xx or transport failures return an empty list without raising — incident
/// data is best-effort.
async fn fetch_incidents_single(client: &Client, key: &str, bbox: &BoundingBox, semaphore: &Semaphore) -> Vec<Incident> {
	let Ok(_permit) = semaphore.acquire().await else {
		return Vec::new();
	};
	let url = incident_details_url(bbox.min_lon, bbox.min_lat, bbox.max_lon, bbox.max_lat, key);
	let response = match client.get(url).timeout(INCIDENT_TIMEOUT).send().await {
		Ok(r) if r.status().is_success() => r,
		Ok(r) => {
			log::warn!("incident fetch returned {}", r.status());
			return Vec::new();
		}
		Err(e) => {
			log::warn!("incident fetch failed: {e:#}");
			return Vec::new();
		}
	};
	let shape: IncidentsShape = match response.json().await {
		Ok(s) => s,
		Err(e) => {
			log::warn!("incident response parse failed: {e:#}");
			return Vec::new();
		}
	};
	let raw = match shape {
		IncidentsShape::List(v) => v,
		IncidentsShape::Envelope { incidents } => incidents,
	};
	raw
		.into_iter()
		.filter_map(|r| {
			let geometry = r.geometry.as_ref()?;
			let [lon, lat] = first_point(geometry)?;
			let props = r.properties.unwrap_or_default();
			Some(Incident {
				id: props.id,
				point: crate::pipeline::geo::LatLon::new(lat, lon),
				closed: props.road_closed.unwrap_or(false),
			})
		})
		.collect()
}

/// Fetches incidents for `bbox`, recursively splitting along the longer axis while
/// its area exceeds [`SPLIT_THRESHOLD_KM2`], fanning out sub-bbox requests bounded
/// to [`CONCURRENCY`] concurrent outbound requests, and deduplicating the merged
/// result by incident id.
pub async fn fetch_incidents(client: &Client, key: &str, bbox: &BoundingBox) -> Vec<Incident> {
	let semaphore = Arc::new(Semaphore::new(CONCURRENCY));
	let incidents = fetch_incidents_recursive(client, key, bbox, semaphore).await;
	dedup_by_id(incidents)
}

fn fetch_incidents_recursive<'a>(
	client: &'a Client,
	key: &'a str,
	bbox: &'a BoundingBox,
	semaphore: Arc<Semaphore>,
) -> std::pin::Pin<Box<dyn std::future::Future<Output = Vec<Incident>> + Send + 'a>> {
	Box::pin(async move {
		if bbox.area_km2() <= SPLIT_THRESHOLD_KM2 {
			return fetch_incidents_single(client, key, bbox, &semaphore).await;
		}
		let (a, b) = bbox.split_longer_axis();
		let (ra, rb) = tokio::join!(
			fetch_incidents_recursive(client, key, &a, semaphore.clone()),
			fetch_incidents_recursive(client, key, &b, semaphore.clone())
		);
		[ra, rb].concat()
	})
}

/// Deduplicates by incident id, keeping the first occurrence; incidents without an
/// id (never deduplicated, since it cannot be known whether they refer to the same
/// upstream event) always pass through.
pub fn dedup_by_id(incidents: Vec<Incident>) -> Vec<Incident> {
	let mut seen = HashSet::new();
	let mut result = Vec::with_capacity(incidents.len());
	for incident in incidents {
		match &incident.id {
			Some(id) if !seen.insert(id.clone()) => continue,
			_ => result.push(incident),
		}
	}
	result
}

/// For each sample, multiplies its weight by [`BOOST_FACTOR`] once per incident
/// within `radius_m`. Mutates `samples` in place.
pub fn boost_samples(samples: &mut [SamplePoint], incidents: &[Incident], radius_m: f64) {
	for sample in samples.iter_mut() {
		for incident in incidents {
			if sample.latlon().haversine_m(&incident.point) <= radius_m {
				sample.weight *= BOOST_FACTOR;
			}
		}
	}
}
