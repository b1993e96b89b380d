//! TileFetcher: bounded-concurrency tile retrieval with a per-tile TTL cache and
//! flow-style fallback.

use crate::pipeline::cache::TtlCache;
use crate::pipeline::client::{FLOW_STYLES, TILE_TIMEOUT, tile_url};
use crate::pipeline::decode::{DecodedFeature, decode};
use crate::pipeline::geo::TileIndex;
use futures::future::join_all;
use reqwest::Client;
use std::{sync::Arc, time::Duration};
use tokio::sync::Semaphore;
use versatiles_core::Blob;
use versatiles_derive::context;

/// Upper bound on concurrent outbound tile requests.
pub const CONCURRENCY: usize = 8;
/// Per-tile cache TTL.
pub const TILE_CACHE_TTL: Duration = Duration::from_secs(60);

/// Cache key: `(style, z, x, y)`.
pub type TileCacheKey = (String, u32, u32, u32);

pub type TileCache = TtlCache<TileCacheKey, Arc<Blob>>;

pub fn new_tile_cache() -> TileCache {
	TtlCache::new(TILE_CACHE_TTL)
}

#[context("while fetching tile {style}/{}/{}/{}", tile.z, tile.x, tile.y)]
async fn fetch_one(client: &Client, key: &str, style: &str, tile: TileIndex) -> anyhow::Result<Blob> {
	let url = tile_url(style, tile.z, tile.x, tile.y, key);
	let response = client.get(url).timeout(TILE_TIMEOUT).send().await?;
	anyhow::ensure!(response.status().is_success(), "upstream returned {}", response.status());
	let bytes = response.bytes().await?;
	Ok(Blob::from(&*bytes))
}

/// Fetches one tile for `style`, returning the cached/fresh payload. Transport and
/// non-2xx failures are logged and swallowed — a missing tile never fails the batch.
async fn fetch_tile_cached(client: &Client, key: &str, cache: &TileCache, style: &str, tile: TileIndex) -> Option<Arc<Blob>> {
	let cache_key = (style.to_string(), tile.z, tile.x, tile.y);
	if let Some(blob) = cache.get(&cache_key).await {
		return Some(blob);
	}
	match fetch_one(client, key, style, tile).await {
		Ok(blob) => {
			let blob = Arc::new(blob);
			cache.insert(cache_key, blob.clone()).await;
			Some(blob)
		}
		Err(e) => {
			log::warn!("tile fetch failed for {style}/{}/{}/{}: {e:#}", tile.z, tile.x, tile.y);
			None
		}
	}
}

/// Fetches every tile in `tiles` for one `style`, bounded to [`CONCURRENCY`]
/// concurrent requests, and decodes each into its feature list.
async fn fetch_and_decode(client: &Client, key: &str, cache: &TileCache, tiles: &[TileIndex], style: &str) -> Vec<DecodedFeature> {
	let semaphore = Arc::new(Semaphore::new(CONCURRENCY));
	let jobs = tiles.iter().map(|&tile| {
		let client = client.clone();
		let cache = cache.clone();
		let semaphore = semaphore.clone();
		let style = style.to_string();
		let key = key.to_string();
		async move {
			let _permit = semaphore.acquire_owned().await.ok()?;
			let blob = fetch_tile_cached(&client, &key, &cache, &style, tile).await?;
			match decode(&blob, tile.z, tile.x, tile.y) {
				Ok(features) => Some(features),
				Err(e) => {
					log::warn!("failed to decode tile {}/{}/{}: {e:#}", tile.z, tile.x, tile.y);
					None
				}
			}
		}
	});
	join_all(jobs).await.into_iter().flatten().flatten().collect()
}

/// Tries each style in [`FLOW_STYLES`] in order, returning the first that yields at
/// least one decoded feature (and which style won).
pub async fn fetch_tiles_multi(client: &Client, key: &str, cache: &TileCache, tiles: &[TileIndex]) -> (Vec<DecodedFeature>, &'static str) {
	for style in FLOW_STYLES {
		let features = fetch_and_decode(client, key, cache, tiles, style).await;
		if !features.is_empty() {
			return (features, style);
		}
	}
	(Vec::new(), FLOW_STYLES[0])
}
