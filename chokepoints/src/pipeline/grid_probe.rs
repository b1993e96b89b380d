//! Terminal fallback when tiles yield zero samples at every relaxation/zoom step:
//! probes the point-query flow-segment endpoint on a lattice over the bbox.

use crate::pipeline::client::{INCIDENT_TIMEOUT, flow_segment_url};
use crate::pipeline::geo::BoundingBox;
use crate::pipeline::types::SamplePoint;
use futures::future::join_all;
use reqwest::Client;
use serde::Deserialize;
use std::sync::Arc;
use tokio::sync::Semaphore;

/// Upper bound on concurrent outbound grid-probe requests.
pub const CONCURRENCY: usize = 8;
/// Upper bound on lattice points probed.
pub const MAX_POINTS: usize = 80;

#[derive(Deserialize)]
struct FlowSegmentResponse {
	#[serde(rename = "flowSegmentData")]
	flow_segment_data: Option<FlowSegmentData>,
}

#[derive(Deserialize)]
struct FlowSegmentData {
	#[serde(rename = "currentSpeed")]
	current_speed: Option<f64>,
	#[serde(rename = "freeFlowSpeed")]
	free_flow_speed: Option<f64>,
	confidence: Option<f64>,
}

async fn probe_point(client: &Client, key: &str, lat: f64, lon: f64) -> Option<SamplePoint> {
	let url = flow_segment_url(lat, lon, key);
	let response = client.get(url).timeout(INCIDENT_TIMEOUT).send().await.ok()?;
	if !response.status().is_success() {
		return None;
	}
	let parsed: FlowSegmentResponse = response.json().await.ok()?;
	let data = parsed.flow_segment_data?;
	let current = data.current_speed?;
	let free = data.free_flow_speed?;
	if free <= 0.0 {
		return None;
	}
	let severity = 1.0 - current / free;
	if severity <= 0.0 {
		return None;
	}
	let confidence = data.confidence.unwrap_or(1.0);
	let mut sample = SamplePoint::new(lat, lon, severity);
	sample.weight = severity * confidence;
	Some(sample)
}

/// Builds a `ceil(sqrt(N))` × `ceil(sqrt(N))` lattice over `bbox`, trimmed to at
/// most [`MAX_POINTS`] cells, and queries each cell concurrently.
pub async fn probe_grid(client: &Client, key: &str, bbox: &BoundingBox) -> Vec<SamplePoint> {
	let side = (MAX_POINTS as f64).sqrt().ceil() as usize;
	let mut points = Vec::with_capacity(side * side);
	for row in 0..side {
		for col in 0..side {
			let lat = bbox.min_lat + (bbox.max_lat - bbox.min_lat) * (row as f64 + 0.5) / side as f64;
			let lon = bbox.min_lon + (bbox.max_lon - bbox.min_lon) * (col as f64 + 0.5) / side as f64;
			points.push((lat, lon));
		}
	}
	points.truncate(MAX_POINTS);

	let semaphore = Arc::new(Semaphore::new(CONCURRENCY));
	let jobs = points.into_iter().map(|(lat, lon)| {
		let client = client.clone();
		let key = key.to_string();
		let semaphore = semaphore.clone();
		async move {
			let _permit = semaphore.acquire_owned().await.ok()?;
			probe_point(&client, &key, lat, lon).await
		}
	});
	join_all(jobs).await.into_iter().flatten().collect()
}
