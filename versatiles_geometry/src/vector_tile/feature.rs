use super::{geometry::TileGeometry, geometry_type::GeomType, property_manager::PropertyManager};
use crate::geo::GeoProperties;
use anyhow::{Context, Result, bail, ensure};
use byteorder::LE;
use versatiles_core::{Blob, io::*};

#[derive(Clone, Debug, Default, PartialEq)]
pub struct VectorTileFeature {
	pub id: Option<u64>,
	pub tag_ids: Vec<u32>,
	pub geom_type: GeomType,
	pub geom_data: Blob,
}

impl VectorTileFeature {
	pub fn read(reader: &mut dyn ValueReader<'_, LE>) -> Result<VectorTileFeature> {
		let mut f = VectorTileFeature::default();

		while reader.has_remaining() {
			match reader.read_pbf_key().context("Failed to read PBF key")? {
				(1, 0) => f.id = Some(reader.read_varint().context("Failed to read feature ID")?),
				(2, 2) => f.tag_ids = reader.read_pbf_packed_uint32().context("Failed to read tag IDs")?,
				(3, 0) => {
					f.geom_type = GeomType::from(reader.read_varint().context("Failed to read geometry type")?);
				}
				(4, 2) => f.geom_data = reader.read_pbf_blob().context("Failed to read geometry data")?,
				(f, w) => bail!("Unexpected combination of field number ({f}) and wire type ({w})"),
			}
		}

		Ok(f)
	}

	pub fn to_blob(&self) -> Result<Blob> {
		let mut writer = ValueWriterBlob::new_le();

		if let Some(id) = self.id {
			writer.write_pbf_key(1, 0).context("Failed to write PBF key for feature ID")?;
			writer.write_varint(id).context("Failed to write feature ID")?;
		}

		if !self.tag_ids.is_empty() {
			writer
				.write_pbf_key(2, 2)
				.context("Failed to write PBF key for tag IDs")?;
			writer
				.write_pbf_packed_uint32(&self.tag_ids)
				.context("Failed to write tag IDs")?;
		}

		writer
			.write_pbf_key(3, 0)
			.context("Failed to write PBF key for geometry type")?;
		writer
			.write_varint(self.geom_type.as_u64())
			.context("Failed to write geometry type")?;

		if !self.geom_data.is_empty() {
			writer
				.write_pbf_key(4, 2)
				.context("Failed to write PBF key for geometry data")?;
			writer
				.write_pbf_blob(&self.geom_data)
				.context("Failed to write geometry data")?;
		}

		Ok(writer.into_blob())
	}

	/// Decodes the MVT command stream into tile-local rings (one per `MoveTo`).
	///
	/// See <https://github.com/mapbox/vector-tile-spec/blob/master/2.1/README.md#43-geometry-encoding>
	fn decode_rings(&self) -> Result<Vec<Vec<[f64; 2]>>> {
		let mut reader = ValueReaderSlice::new_le(self.geom_data.as_slice());
		let mut rings: Vec<Vec<[f64; 2]>> = Vec::new();
		let mut line: Vec<[f64; 2]> = Vec::new();
		let mut x = 0i64;
		let mut y = 0i64;

		while reader.has_remaining() {
			let value = reader.read_varint().context("Failed to read varint for geometry command")?;
			let command = value & 0x7;
			let count = value >> 3;

			match command {
				1 | 2 => {
					for _ in 0..count {
						if command == 1 && !line.is_empty() {
							rings.push(line);
							line = Vec::new();
						}
						x += reader.read_svarint().context("Failed to read x coordinate")?;
						y += reader.read_svarint().context("Failed to read y coordinate")?;
						line.push([x as f64, y as f64]);
					}
				}
				7 => {
					ensure!(!line.is_empty(), "ClosePath command found on an empty ring");
					line.push(line[0]);
				}
				_ => bail!("Unknown geometry command {command}"),
			}
		}

		if !line.is_empty() {
			rings.push(line);
		}

		Ok(rings)
	}

	/// Reconstructs the feature's geometry in tile-local coordinates.
	///
	/// Traffic flow tiles only ever carry point and line features; `Polygon` is
	/// rejected rather than silently misinterpreted.
	pub fn to_geometry(&self) -> Result<TileGeometry> {
		let rings = self.decode_rings().context("Failed to decode geometry command stream")?;

		match self.geom_type {
			GeomType::Unknown => bail!("Unknown geometry type"),

			GeomType::Point => {
				ensure!(!rings.is_empty(), "(Multi)Points must not be empty");
				let points: Vec<[f64; 2]> = rings
					.into_iter()
					.map(|mut ring| {
						ensure!(ring.len() == 1, "(Multi)Point entries must have exactly one entry");
						Ok(ring.pop().unwrap())
					})
					.collect::<Result<_>>()?;
				if points.len() == 1 {
					Ok(TileGeometry::Point(points[0]))
				} else {
					Ok(TileGeometry::MultiPoint(points))
				}
			}

			GeomType::LineString => {
				ensure!(!rings.is_empty(), "LineStrings must have at least one entry");
				for ring in &rings {
					ensure!(ring.len() >= 2, "Each entry in (Multi)LineStrings must have at least two points");
				}
				if rings.len() == 1 {
					Ok(TileGeometry::LineString(rings.into_iter().next().unwrap()))
				} else {
					Ok(TileGeometry::MultiLineString(rings))
				}
			}

			GeomType::Polygon => bail!("polygon geometries are not used in traffic tiles and are not decoded"),
		}
	}

	pub fn decode_properties(&self, manager: &PropertyManager) -> Result<GeoProperties> {
		manager.decode_tag_ids(&self.tag_ids)
	}
}
