//! TileDecoder: turns a raw MVT payload into a flat list of features, each carrying
//! its originating tile address and extent so the severity extractor can project
//! tile-local coordinates back to geographic ones.

use anyhow::Result;
use versatiles_geometry::geo::GeoProperties;
use versatiles_geometry::vector_tile::{TileGeometry, VectorTile};
use versatiles_core::Blob;

/// A decoded feature, flattened out of its originating layer.
#[derive(Clone, Debug)]
pub struct DecodedFeature {
	pub layer_name: String,
	pub geometry: TileGeometry,
	pub properties: GeoProperties,
	pub z: u32,
	pub x: u32,
	pub y: u32,
	pub extent: u32,
}

/// Decodes every layer of a tile payload into a flat feature list.
///
/// Malformed features are skipped (and logged) rather than failing the whole tile:
/// a single corrupt feature must not discard the rest of an otherwise-good tile.
pub fn decode(blob: &Blob, z: u32, x: u32, y: u32) -> Result<Vec<DecodedFeature>> {
	let tile = VectorTile::from_blob(blob)?;
	let mut features = Vec::new();
	for layer in &tile.layers {
		for (_id, geometry, properties) in layer.decoded_features() {
			features.push(DecodedFeature {
				layer_name: layer.name.clone(),
				geometry,
				properties,
				z,
				x,
				y,
				extent: layer.extent,
			});
		}
	}
	Ok(features)
}
