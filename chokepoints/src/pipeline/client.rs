//! Shared HTTP client and upstream endpoint URL construction.
//!
//! One `reqwest::Client` is built per process and threaded through every stage; no
//! stage constructs its own client per call.

use anyhow::Result;
use reqwest::Client;
use std::time::Duration;

/// Per-request timeout for tile and flow-segment fetches.
pub const TILE_TIMEOUT: Duration = Duration::from_secs(6);
/// Per-request timeout for incident and reverse-geocode fetches (heavier payloads).
pub const INCIDENT_TIMEOUT: Duration = Duration::from_secs(10);

/// Builds the process-wide HTTP client, matching the connection-pooling and
/// TLS settings already established for outbound HTTP in this workspace.
pub fn build_client() -> Result<Client> {
	Ok(Client::builder()
		.tcp_keepalive(Duration::from_secs(600))
		.use_rustls_tls()
		.build()?)
}

/// Flow-style priority list tried by the tile fetcher until one yields a non-empty tile.
pub const FLOW_STYLES: [&str; 4] = ["relative", "absolute", "relative-delay", "relative-categorized"];

pub fn tile_url(style: &str, z: u32, x: u32, y: u32, key: &str) -> String {
	format!("https://api.tomtom.com/traffic/map/4/tile/flow/{style}/{z}/{x}/{y}.pbf?key={key}")
}

pub fn flow_segment_url(lat: f64, lon: f64, key: &str) -> String {
	format!(
		"https://api.tomtom.com/traffic/services/4/flowSegmentData/absolute/10/json?key={key}&point={lat},{lon}&unit=KMPH"
	)
}

pub fn incident_details_url(min_lon: f64, min_lat: f64, max_lon: f64, max_lat: f64, key: &str) -> String {
	format!(
		"https://api.tomtom.com/traffic/services/5/incidentDetails?key={key}&bbox={min_lon},{min_lat},{max_lon},{max_lat}&language=en-GB&timeValidityFilter=present&fields={{incidents{{type,geometry{{type,coordinates}},properties{{id,iconCategory,roadClosed}}}}}}"
	)
}

pub fn reverse_geocode_url(lat: f64, lon: f64, key: &str) -> String {
	format!("https://api.tomtom.com/search/2/reverseGeocode/{lat},{lon}.json?key={key}&radius=50")
}
