//! SeverityExtractor: resolves a normalized severity from whichever property a
//! feature carries, and projects its representative point to geographic coordinates.

use crate::pipeline::decode::DecodedFeature;
use crate::pipeline::geo::tile_point_to_lonlat;
use crate::pipeline::types::SamplePoint;
use versatiles_geometry::geo::{GeoProperties, GeoValue};

/// The schema-less upstream property dictionary reduced to one of four known shapes,
/// in the first-match order the extractor checks them.
#[derive(Debug, Clone, PartialEq)]
enum SeveritySource {
	JamFactor(f64),
	TrafficLevelNumeric(f64),
	TrafficLevelLabel(String),
	SpeedPair(f64, f64),
}

fn as_f64(value: &GeoValue) -> Option<f64> {
	match value {
		GeoValue::Double(v) => Some(*v),
		GeoValue::Float(v) => Some(f64::from(*v)),
		GeoValue::Int(v) => Some(*v as f64),
		GeoValue::UInt(v) => Some(*v as f64),
		GeoValue::String(s) => s.parse::<f64>().ok(),
		GeoValue::Bool(_) | GeoValue::Null => None,
	}
}

fn as_str(value: &GeoValue) -> Option<&str> {
	match value {
		GeoValue::String(s) => Some(s.as_str()),
		_ => None,
	}
}

fn find_numeric(props: &GeoProperties, keys: &[&str]) -> Option<f64> {
	keys.iter().find_map(|k| props.get(*k).and_then(as_f64))
}

/// First-match severity source resolution, per property name.
fn resolve_source(props: &GeoProperties) -> Option<SeveritySource> {
	for (key, value) in props.iter() {
		let lower = key.to_lowercase();
		if lower.contains("jam") || lower == "jf" || lower == "jam_factor" {
			if let Some(v) = as_f64(value) {
				return Some(SeveritySource::JamFactor(v));
			}
		}
	}

	if let Some(value) = props.get("traffic_level") {
		if let Some(v) = as_f64(value) {
			return Some(SeveritySource::TrafficLevelNumeric(v));
		}
		if let Some(s) = as_str(value) {
			return Some(SeveritySource::TrafficLevelLabel(s.to_lowercase()));
		}
	}

	let current = find_numeric(props, &["currentSpeed", "current_speed", "cs"]);
	let free = find_numeric(props, &["freeFlowSpeed", "free_flow_speed", "ffs"]);
	if let (Some(cur), Some(free)) = (current, free) {
		return Some(SeveritySource::SpeedPair(cur, free));
	}

	None
}

fn severity_from_source(source: &SeveritySource) -> Option<f64> {
	match source {
		SeveritySource::JamFactor(v) => Some(v.clamp(0.0, 10.0) / 10.0),
		SeveritySource::TrafficLevelNumeric(v) => Some(if *v <= 1.0 {
			v.clamp(0.0, 1.0)
		} else if *v <= 5.0 {
			v / 5.0
		} else {
			v / 10.0
		}),
		SeveritySource::TrafficLevelLabel(label) => match label.as_str() {
			"free" => Some(0.0),
			"low" | "light" => Some(0.2),
			"moderate" | "medium" => Some(0.5),
			"high" | "heavy" => Some(0.8),
			"severe" => Some(0.9),
			"critical" => Some(1.0),
			_ => None,
		},
		SeveritySource::SpeedPair(current, free) => {
			if *free > 0.0 {
				Some(1.0 - (current / free).clamp(0.0, 1.0))
			} else {
				None
			}
		}
	}
}

/// Resolves a feature's properties to a severity in [0, 1], or `None` if no known
/// severity-bearing property is present.
fn extract_severity(props: &GeoProperties) -> Option<f64> {
	resolve_source(props).and_then(|s| severity_from_source(&s))
}

/// Walks decoded features, keeping those whose severity clears `jf_min` (on the
/// jam-factor-equivalent 0..10 scale), and projects their representative point.
pub fn extract_samples(features: &[DecodedFeature], jf_min: f64) -> Vec<SamplePoint> {
	let mut samples = Vec::new();
	for feature in features {
		let Some(severity) = extract_severity(&feature.properties) else { continue };
		if severity * 10.0 < jf_min {
			continue;
		}
		let Some([tx, ty]) = feature.geometry.representative_point() else { continue };
		let point = tile_point_to_lonlat(feature.z, feature.x, feature.y, tx, ty, feature.extent as f64);
		samples.push(SamplePoint::new(point.lat, point.lon, severity));
	}
	samples
}
