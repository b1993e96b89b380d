//! Runtime configuration for the chokepoint detection pipeline.
//!
//! Settings are read from environment variables (optionally loaded from a
//! `.env` file by the host process before [`Settings::from_env`] runs). All
//! four upstream credentials default to the same demo key the deployment
//! ships with, matching the provider's free-tier behavior of accepting one
//! key for every role unless role-specific keys are configured.

use anyhow::{Context, Result, bail};
use std::env;

/// Pinned Bangalore deployment extent: `[minLon, minLat, maxLon, maxLat]`.
///
/// The live pipeline ignores any inbound bbox and always queries this
/// extent; see the `liveChokepoints` entry point.
pub const DEPLOYMENT_BBOX: [f64; 4] = [77.6234, 12.9037, 77.6625, 12.9247];

/// Upstream credentials and pipeline defaults.
///
/// Mirrors the provider's role-specific key split (maps/traffic/search/stats):
/// most deployments configure one key for all roles, but a key can be
/// overridden per role via its own environment variable.
#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
	pub tomtom_maps_api_key: String,
	pub tomtom_traffic_api_key: String,
	pub tomtom_search_api_key: String,
	pub tomtom_stats_api_key: String,
}

impl Settings {
	/// Reads credentials from `TOMTOM_MAPS_API_KEY`, `TOMTOM_TRAFFIC_API_KEY`,
	/// `TOMTOM_SEARCH_API_KEY` and `TOMTOM_STATS_API_KEY`. A role-specific variable
	/// that is unset or empty falls back to `TOMTOM_MAPS_API_KEY`.
	///
	/// Every value is trimmed of surrounding whitespace and a single pair of
	/// enclosing quotes, since `.env` loaders commonly leave those in place.
	pub fn from_env() -> Result<Settings> {
		let maps = clean(env::var("TOMTOM_MAPS_API_KEY").unwrap_or_default());
		let traffic = clean(env::var("TOMTOM_TRAFFIC_API_KEY").unwrap_or_default());
		let search = clean(env::var("TOMTOM_SEARCH_API_KEY").unwrap_or_default());
		let stats = clean(env::var("TOMTOM_STATS_API_KEY").unwrap_or_default());

		Ok(Settings {
			tomtom_traffic_api_key: or_fallback(traffic, &maps),
			tomtom_search_api_key: or_fallback(search, &maps),
			tomtom_stats_api_key: or_fallback(stats, &maps),
			tomtom_maps_api_key: maps,
		})
	}

	/// The credential used for tile/flow-segment/incident requests.
	///
	/// A missing credential is a configuration error: it is the one failure
	/// mode the pipeline surfaces to the caller instead of degrading quietly.
	pub fn traffic_api_key(&self) -> Result<&str> {
		require_key(&self.tomtom_traffic_api_key).context("traffic API key is not configured")
	}

	/// The credential used for reverse-geocode requests.
	pub fn search_api_key(&self) -> Result<&str> {
		require_key(&self.tomtom_search_api_key).context("search API key is not configured")
	}
}

fn require_key(key: &str) -> Result<&str> {
	if key.is_empty() { bail!("missing TomTom API key") } else { Ok(key) }
}

fn or_fallback(value: String, fallback: &str) -> String {
	if value.is_empty() { fallback.to_string() } else { value }
}

fn clean(raw: String) -> String {
	let trimmed = raw.trim();
	let unquoted = trimmed
		.strip_prefix('"')
		.and_then(|s| s.strip_suffix('"'))
		.or_else(|| trimmed.strip_prefix('\'').and_then(|s| s.strip_suffix('\'')))
		.unwrap_or(trimmed);
	unquoted.trim().to_string()
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn clean_strips_whitespace_and_quotes() {
		assert_eq!(clean("  abc  ".to_string()), "abc");
		assert_eq!(clean("\"abc\"".to_string()), "abc");
		assert_eq!(clean("'abc'".to_string()), "abc");
		assert_eq!(clean(" \"  abc  \" ".to_string()), "abc");
	}

	#[test]
	fn role_specific_key_falls_back_to_maps_key() {
		let value = or_fallback(String::new(), "maps-key");
		assert_eq!(value, "maps-key");
		let value = or_fallback("traffic-key".to_string(), "maps-key");
		assert_eq!(value, "traffic-key");
	}

	#[test]
	fn require_key_rejects_empty() {
		assert!(require_key("").is_err());
		assert!(require_key("k").is_ok());
	}
}
