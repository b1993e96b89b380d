//! A narrow `get`/`insert` TTL cache capability, backed by `moka`.
//!
//! The pipeline needs three independent short-lived caches (per-tile, result,
//! reverse-geocode) that differ only in key/value type and TTL. Rather than hand-roll
//! expiry bookkeeping for each, this wraps `moka::future::Cache` behind the minimal
//! shape the design calls for.

use moka::future::Cache as MokaCache;
use std::{hash::Hash, time::Duration};

/// A keyed cache with a fixed per-entry time-to-live.
#[derive(Clone)]
pub struct TtlCache<K, V>
where
	K: Hash + Eq + Send + Sync + 'static,
	V: Clone + Send + Sync + 'static,
{
	inner: MokaCache<K, V>,
}

impl<K, V> TtlCache<K, V>
where
	K: Hash + Eq + Send + Sync + 'static,
	V: Clone + Send + Sync + 'static,
{
	pub fn new(ttl: Duration) -> TtlCache<K, V> {
		TtlCache { inner: MokaCache::builder().time_to_live(ttl).build() }
	}

	pub async fn get(&self, key: &K) -> Option<V> {
		self.inner.get(key).await
	}

	pub async fn insert(&self, key: K, value: V) {
		self.inner.insert(key, value).await;
	}
}
