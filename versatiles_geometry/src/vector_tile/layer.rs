use super::{feature::VectorTileFeature, property_manager::PropertyManager, value::GeoValuePBF};
use crate::geo::{GeoProperties, GeoValue};
use anyhow::{Context, Result, anyhow, bail};
use byteorder::LE;
use versatiles_core::{Blob, io::*};

/// A named layer inside a [`super::tile::VectorTile`]: its features reference
/// properties by tag id pairs resolved against `property_manager`.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct VectorTileLayer {
	pub extent: u32,
	pub features: Vec<VectorTileFeature>,
	pub name: String,
	pub property_manager: PropertyManager,
	pub version: u32,
}

impl VectorTileLayer {
	pub fn read(reader: &mut dyn ValueReader<'_, LE>) -> Result<VectorTileLayer> {
		let mut extent = 4096;
		let mut features: Vec<VectorTileFeature> = Vec::new();
		let mut name = None;
		let mut property_manager = PropertyManager::new();
		let mut version = 1;

		while reader.has_remaining() {
			match reader.read_pbf_key().context("Failed to read PBF key")? {
				(1, 2) => name = Some(reader.read_pbf_string().context("Failed to read layer name")?),
				(2, 2) => features.push(
					VectorTileFeature::read(
						reader
							.get_pbf_sub_reader()
							.context("Failed to get PBF sub-reader for feature")?
							.as_mut(),
					)
					.context("Failed to read VectorTileFeature")?,
				),
				(3, 2) => {
					property_manager.add_key(reader.read_pbf_string().context("Failed to read property key")?);
				}
				(4, 2) => {
					property_manager.add_val(
						GeoValue::read(
							reader
								.get_pbf_sub_reader()
								.context("Failed to get PBF sub-reader for property value")?
								.as_mut(),
						)
						.context("Failed to read GeoValue")?,
					);
				}
				(5, 0) => extent = reader.read_varint().context("Failed to read extent")? as u32,
				(15, 0) => version = reader.read_varint().context("Failed to read version")? as u32,
				(f, w) => bail!("Unexpected combination of field number ({f}) and wire type ({w})"),
			}
		}

		Ok(VectorTileLayer {
			extent,
			features,
			name: name.ok_or_else(|| anyhow!("Layer name is required")).context("Failed to get layer name")?,
			property_manager,
			version,
		})
	}

	pub fn to_blob(&self) -> Result<Blob> {
		let mut writer = ValueWriterBlob::new_le();

		writer.write_pbf_key(1, 2).context("Failed to write PBF key for layer name")?;
		writer.write_pbf_string(&self.name).context("Failed to write layer name")?;

		for feature in self.features.iter() {
			writer.write_pbf_key(2, 2).context("Failed to write PBF key for feature")?;
			writer
				.write_pbf_blob(&feature.to_blob().context("Failed to convert feature to blob")?)
				.context("Failed to write feature blob")?;
		}

		for key in self.property_manager.iter_key() {
			writer
				.write_pbf_key(3, 2)
				.context("Failed to write PBF key for property key")?;
			writer.write_pbf_string(key).context("Failed to write property key")?;
		}

		for value in self.property_manager.iter_val() {
			writer
				.write_pbf_key(4, 2)
				.context("Failed to write PBF key for property value")?;
			writer
				.write_pbf_blob(&value.to_blob().context("Failed to convert property value to blob")?)
				.context("Failed to write property value blob")?;
		}

		if self.extent != 4096 {
			writer.write_pbf_key(5, 0).context("Failed to write PBF key for extent")?;
			writer.write_varint(self.extent as u64).context("Failed to write extent")?;
		}

		if self.version != 1 {
			writer.write_pbf_key(15, 0).context("Failed to write PBF key for version")?;
			writer.write_varint(self.version as u64).context("Failed to write version")?;
		}

		Ok(writer.into_blob())
	}

	pub fn decode_tag_ids(&self, tag_ids: &[u32]) -> Result<GeoProperties> {
		self.property_manager.decode_tag_ids(tag_ids)
	}

	/// Decodes every feature's geometry and properties, skipping (with a logged
	/// warning) any feature this decoder cannot represent, e.g. polygons.
	pub fn decoded_features(&self) -> Vec<(Option<u64>, super::geometry::TileGeometry, GeoProperties)> {
		self
			.features
			.iter()
			.filter_map(|f| match (f.to_geometry(), f.decode_properties(&self.property_manager)) {
				(Ok(geometry), Ok(properties)) => Some((f.id, geometry, properties)),
				(Err(e), _) | (_, Err(e)) => {
					log::warn!("skipping feature in layer '{}': {e:#}", self.name);
					None
				}
			})
			.collect()
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_read_vector_tile_layer() -> Result<()> {
		let data = vec![
			0x0A, 0x05, b'h', b'e', b'l', b'l', b'o', // name: "hello"
			18, 50, 8, 3, 18, 2, 1, 2, 24, 3, 34, 40, 9, 0, 0, 18, 10, 0, 3, 8, 7, 9, 1, 5, 18, 2, 2, 0, 1, 7, 9, 6, 1,
			26, 6, 0, 0, 8, 5, 0, 7, 9, 2, 5, 26, 0, 4, 2, 0, 0, 3, 7, // feature
			0x1A, 0x03, b'k', b'e', b'y', // property key: "key"
			0x22, 0x04, 0x0A, 0x02, b'v', b'l', // property value: "vl"
		];
		let mut reader = ValueReaderSlice::new_le(&data);
		let layer = VectorTileLayer::read(&mut reader)?;

		assert_eq!(layer.name, "hello");
		assert_eq!(layer.features.len(), 1);
		assert_eq!(layer.extent, 4096);
		assert_eq!(layer.version, 1);
		Ok(())
	}

	#[test]
	fn test_decode_tag_ids() -> Result<()> {
		let mut layer = VectorTileLayer {
			name: "hello".to_string(),
			extent: 4096,
			version: 1,
			..Default::default()
		};
		layer.property_manager = PropertyManager::from_slices(&["key"], &["value"]);
		assert_eq!(layer.decode_tag_ids(&[0, 0])?, GeoProperties::from(vec![("key", GeoValue::from("value"))]));
		Ok(())
	}
}
