//! The live chokepoint detection pipeline: tile coverage, concurrent fetch/decode,
//! severity extraction with fallbacks, incident fusion, clustering, and scoring.

pub mod aggregate;
pub mod cache;
pub mod client;
pub mod cluster;
pub mod coverage;
pub mod decode;
pub mod geo;
pub mod grid_probe;
pub mod incidents;
pub mod severity;
pub mod tile_fetch;
pub mod types;

use crate::config::{DEPLOYMENT_BBOX, Settings};
use aggregate::{GeocodeCache, new_geocode_cache};
use anyhow::{Context, Result, ensure};
use geo::BoundingBox;
use std::{sync::Arc, time::Duration};
use tile_fetch::{TileCache, new_tile_cache};
use types::ResultEnvelope;

/// Maximum tile count on the primary (non-probe) coverage path.
const LIVE_TILE_CAP: usize = 16;
/// Maximum tile count when the fallback ladder escalates zoom.
const ESCALATED_TILE_CAP: usize = 32;
/// Minimum jam factor below which samples are dropped before the relaxation ladder.
const JF_MIN_RELAXATION: [f64; 2] = [2.0, 0.5];
/// Zoom levels tried, in order, once relaxation alone still yields nothing.
const ESCALATED_ZOOMS: [u32; 2] = [13, 14];

/// Parameters accepted by [`LivePipeline::run`], mirroring `liveChokepoints`'s
/// optional arguments and their defaults.
#[derive(Clone, Debug)]
pub struct PipelineParams {
	pub z: u32,
	pub eps_m: f64,
	pub min_samples: f64,
	pub jf_min: f64,
	pub incident_radius_m: f64,
	pub include_geocode: bool,
}

impl Default for PipelineParams {
	fn default() -> PipelineParams {
		PipelineParams { z: 13, eps_m: 150.0, min_samples: 4.0, jf_min: 4.0, incident_radius_m: 100.0, include_geocode: false }
	}
}

/// Owns the process-wide HTTP client and the two long-lived caches (tile, result)
/// plus the reverse-geocode sub-cache. Construct once at process start.
pub struct LivePipeline {
	client: reqwest::Client,
	settings: Settings,
	tile_cache: TileCache,
	geocode_cache: GeocodeCache,
	result_cache: cache::TtlCache<String, Arc<ResultEnvelope>>,
}

impl LivePipeline {
	pub fn new(settings: Settings) -> Result<LivePipeline> {
		Ok(LivePipeline {
			client: client::build_client()?,
			settings,
			tile_cache: new_tile_cache(),
			geocode_cache: new_geocode_cache(),
			result_cache: cache::TtlCache::new(Duration::from_secs(60)),
		})
	}

	/// Runs (or returns the cached result of) one `liveChokepoints` request against
	/// the deployment-pinned bbox. The inbound bbox parameter from section 6 of the
	/// design is intentionally absent from this signature: the live path always
	/// uses [`DEPLOYMENT_BBOX`].
	pub async fn run(&self, params: &PipelineParams) -> Result<Arc<ResultEnvelope>> {
		let bbox = BoundingBox::from_array(DEPLOYMENT_BBOX);
		let cache_key = result_cache_key(&bbox, params);

		if let Some(cached) = self.result_cache.get(&cache_key).await {
			log::debug!("result cache hit for {cache_key}");
			return Ok(cached);
		}

		let traffic_key = self.settings.traffic_api_key().context("configuration error")?.to_string();
		let result = self.compute(&bbox, params, &traffic_key).await?;
		let result = Arc::new(result);
		self.result_cache.insert(cache_key, result.clone()).await;
		Ok(result)
	}

	async fn compute(&self, bbox: &BoundingBox, params: &PipelineParams, traffic_key: &str) -> Result<ResultEnvelope> {
		let samples = self.samples_via_fallback_ladder(bbox, params, traffic_key).await;
		let mut samples = samples;

		let incidents = incidents::fetch_incidents(&self.client, traffic_key, bbox).await;
		incidents::boost_samples(&mut samples, &incidents, params.incident_radius_m);

		if samples.is_empty() {
			return Ok(ResultEnvelope::empty());
		}

		let groups = cluster::cluster(&samples, params.eps_m, params.min_samples);
		let search_key = self.settings.search_api_key().ok();
		let clusters = aggregate::aggregate(
			groups,
			&incidents,
			params.incident_radius_m,
			params.include_geocode,
			&self.client,
			search_key,
			&self.geocode_cache,
		)
		.await;

		Ok(ResultEnvelope::from_clusters(&clusters))
	}

	/// Orchestrates the fallback ladder: requested `jfMin` → relaxed thresholds →
	/// escalated zoom → terminal grid probe.
	async fn samples_via_fallback_ladder(&self, bbox: &BoundingBox, params: &PipelineParams, traffic_key: &str) -> Vec<types::SamplePoint> {
		let (z, tiles) = coverage::coverage_within_budget(bbox, params.z, LIVE_TILE_CAP);
		let (features, style) = tile_fetch::fetch_tiles_multi(&self.client, traffic_key, &self.tile_cache, &tiles).await;

		let mut jf_candidates = vec![params.jf_min];
		jf_candidates.extend(JF_MIN_RELAXATION);

		for jf_min in jf_candidates {
			let samples = severity::extract_samples(&features, jf_min);
			if !samples.is_empty() {
				log::debug!("samples found at jf_min={jf_min} via style={style}");
				return samples;
			}
		}

		if z < 14 {
			for escalated_z in ESCALATED_ZOOMS {
				if escalated_z <= z {
					continue;
				}
				let (_, tiles) = coverage::coverage_within_budget(bbox, escalated_z, ESCALATED_TILE_CAP);
				let (features, _) = tile_fetch::fetch_tiles_multi(&self.client, traffic_key, &self.tile_cache, &tiles).await;
				let samples = severity::extract_samples(&features, params.jf_min);
				if !samples.is_empty() {
					log::debug!("samples found after escalating to z={escalated_z}");
					return samples;
				}
			}
		}

		log::debug!("falling back to grid probe");
		grid_probe::probe_grid(&self.client, traffic_key, bbox).await
	}
}

fn result_cache_key(bbox: &BoundingBox, params: &PipelineParams) -> String {
	let (lon0, lat0, lon1, lat1) = bbox.rounded();
	format!(
		"{lon0},{lat0},{lon1},{lat1}|z={}|eps={}|min={}|jf={}|ir={}|geocode={}",
		params.z, params.eps_m, params.min_samples, params.jf_min, params.incident_radius_m, params.include_geocode
	)
}

/// Runs the pipeline once with default parameters against the deployment bbox.
pub async fn live_chokepoints(pipeline: &LivePipeline) -> Result<Arc<ResultEnvelope>> {
	let params = PipelineParams::default();
	ensure!(params.min_samples > 0.0, "min_samples must be positive");
	pipeline.run(&params).await
}
