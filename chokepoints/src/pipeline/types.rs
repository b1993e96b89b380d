//! Domain types shared across pipeline stages.

use crate::pipeline::geo::LatLon;
use serde::Serialize;

/// A single severity observation, derived either from a decoded tile feature or from
/// a grid-probe flow-segment query.
#[derive(Clone, Debug, PartialEq)]
pub struct SamplePoint {
	pub lat: f64,
	pub lon: f64,
	pub severity: f64,
	pub weight: f64,
}

impl SamplePoint {
	pub fn new(lat: f64, lon: f64, severity: f64) -> SamplePoint {
		SamplePoint { lat, lon, severity, weight: severity.max(f64::EPSILON) }
	}

	pub fn latlon(&self) -> LatLon {
		LatLon::new(self.lat, self.lon)
	}
}

/// A traffic incident, normalized from whichever JSON envelope shape the upstream
/// feed used for a given response.
#[derive(Clone, Debug, PartialEq)]
pub struct Incident {
	pub id: Option<String>,
	pub point: LatLon,
	pub closed: bool,
}

/// A scored, ranked group of nearby severe samples — the unit the pipeline returns.
#[derive(Clone, Debug, PartialEq)]
pub struct Cluster {
	pub id: String,
	pub center: LatLon,
	pub score: f64,
	pub severity_mean: f64,
	pub severity_peak: f64,
	pub incident_count: usize,
	pub closure: bool,
	pub support: f64,
	pub count: usize,
	pub road_name: Option<String>,
}

/// The JSON-serializable result envelope returned to the caller.
#[derive(Debug, Serialize)]
pub struct ResultEnvelope {
	pub clusters: Vec<ClusterView>,
}

#[derive(Debug, Serialize)]
pub struct ClusterView {
	pub id: String,
	pub center: CenterView,
	pub score: f64,
	pub severity_mean: f64,
	pub severity_peak: f64,
	pub incident_count: usize,
	pub closure: bool,
	pub support: f64,
	pub count: usize,
	pub road_name: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct CenterView {
	pub lat: f64,
	pub lon: f64,
}

fn round_to(value: f64, decimals: i32) -> f64 {
	let factor = 10f64.powi(decimals);
	(value * factor).round() / factor
}

impl From<&Cluster> for ClusterView {
	fn from(c: &Cluster) -> ClusterView {
		ClusterView {
			id: c.id.clone(),
			center: CenterView { lat: c.center.lat, lon: c.center.lon },
			score: round_to(c.score, 1),
			severity_mean: round_to(c.severity_mean, 3),
			severity_peak: round_to(c.severity_peak, 3),
			incident_count: c.incident_count,
			closure: c.closure,
			support: round_to(c.support, 2),
			count: c.count,
			road_name: c.road_name.clone(),
		}
	}
}

impl ResultEnvelope {
	pub fn from_clusters(clusters: &[Cluster]) -> ResultEnvelope {
		ResultEnvelope { clusters: clusters.iter().map(ClusterView::from).collect() }
	}

	pub fn empty() -> ResultEnvelope {
		ResultEnvelope { clusters: vec![] }
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn sample_point_weight_floors_at_epsilon() {
		let s = SamplePoint::new(1.0, 2.0, 0.0);
		assert!(s.weight > 0.0);
	}

	#[test]
	fn rounding_matches_envelope_precision() {
		assert_eq!(round_to(0.123456, 3), 0.123);
		assert_eq!(round_to(83.45, 1), 83.5);
	}
}
