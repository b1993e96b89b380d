//! Hand-encoded MVT tile fixtures shared by the pipeline's integration tests.
//!
//! The vector-tile codec only exposes its decode-side types (`VectorTile`,
//! `VectorTileLayer`) publicly; the encode-side feature/property builders are
//! crate-internal. These helpers build tiles the same way those internal builders
//! do — same field order, same wire types — using only the codec's public
//! `ValueWriter` trait, the way `VectorTileFeature`/`VectorTileLayer`/`VectorTile`
//! encode themselves.

use chokepoints::core::Blob;
use chokepoints::core::io::{ValueWriter, ValueWriterBlob};

const GEOM_TYPE_POINT: u64 = 1;

fn point_geometry(tx: i64, ty: i64) -> anyhow::Result<Blob> {
	let mut writer = ValueWriterBlob::new_le();
	writer.write_varint((1u64 << 3) | 1)?; // MoveTo, count = 1
	writer.write_svarint(tx)?;
	writer.write_svarint(ty)?;
	Ok(writer.into_blob())
}

fn double_value(v: f64) -> anyhow::Result<Blob> {
	let mut writer = ValueWriterBlob::new_le();
	writer.write_pbf_key(3, 1)?; // Tile.Value.double_value
	writer.write_f64(v)?;
	Ok(writer.into_blob())
}

/// A single-layer ("flow") tile with one point feature per entry in `points`, all
/// sharing the same `properties` (tag ids 0.. in order, reused by every feature).
pub fn multi_point_tile(properties: &[(&str, f64)], points: &[(i64, i64)]) -> anyhow::Result<Blob> {
	let mut tag_ids = Vec::with_capacity(properties.len() * 2);
	for i in 0..properties.len() as u32 {
		tag_ids.push(i);
		tag_ids.push(i);
	}

	let mut layer = ValueWriterBlob::new_le();
	layer.write_pbf_key(1, 2)?; // name
	layer.write_pbf_string("flow")?;

	for &(tx, ty) in points {
		let mut feature = ValueWriterBlob::new_le();
		feature.write_pbf_key(2, 2)?; // tags
		feature.write_pbf_packed_uint32(&tag_ids)?;
		feature.write_pbf_key(3, 0)?; // geom_type
		feature.write_varint(GEOM_TYPE_POINT)?;
		feature.write_pbf_key(4, 2)?; // geometry
		feature.write_pbf_blob(&point_geometry(tx, ty)?)?;
		layer.write_pbf_key(2, 2)?;
		layer.write_pbf_blob(&feature.into_blob())?;
	}

	for (key, _) in properties {
		layer.write_pbf_key(3, 2)?; // key
		layer.write_pbf_string(key)?;
	}
	for (_, value) in properties {
		layer.write_pbf_key(4, 2)?; // value
		layer.write_pbf_blob(&double_value(*value)?)?;
	}
	let layer_blob = layer.into_blob();

	let mut tile = ValueWriterBlob::new_le();
	tile.write_pbf_key(3, 2)?; // layers
	tile.write_pbf_blob(&layer_blob)?;
	Ok(tile.into_blob())
}

/// An MVT tile with zero layers: always decodes to zero features.
pub fn empty_tile() -> Blob {
	ValueWriterBlob::new_le().into_blob()
}
