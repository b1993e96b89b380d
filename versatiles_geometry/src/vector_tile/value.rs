use crate::geo::GeoValue;
use anyhow::{Context, Result, bail};
use byteorder::LE;
use versatiles_core::{Blob, io::*};

/// Reads/writes a [`GeoValue`] as an MVT `Tile.Value` message.
///
/// See <https://github.com/mapbox/vector-tile-spec/blob/master/2.1/README.md#44-feature-attributes>
pub trait GeoValuePBF: Sized {
	fn read(reader: &mut dyn ValueReader<'_, LE>) -> Result<Self>;
	fn to_blob(&self) -> Result<Blob>;
}

impl GeoValuePBF for GeoValue {
	fn read(reader: &mut dyn ValueReader<'_, LE>) -> Result<GeoValue> {
		let mut value = GeoValue::Null;

		while reader.has_remaining() {
			match reader.read_pbf_key().context("Failed to read PBF key")? {
				(1, 2) => value = GeoValue::String(reader.read_pbf_string().context("Failed to read string value")?),
				(2, 5) => value = GeoValue::Float(reader.read_f32().context("Failed to read float value")?),
				(3, 1) => value = GeoValue::Double(reader.read_f64().context("Failed to read double value")?),
				(4, 0) => value = GeoValue::Int(reader.read_varint().context("Failed to read int value")? as i64),
				(5, 0) => value = GeoValue::UInt(reader.read_varint().context("Failed to read uint value")?),
				(6, 0) => {
					value = GeoValue::Int(reader.read_svarint().context("Failed to read sint value")?);
				}
				(7, 0) => value = GeoValue::Bool(reader.read_varint().context("Failed to read bool value")? != 0),
				(f, w) => bail!("Unexpected combination of field number ({f}) and wire type ({w})"),
			}
		}

		Ok(value)
	}

	fn to_blob(&self) -> Result<Blob> {
		let mut writer = ValueWriterBlob::new_le();

		match self {
			GeoValue::String(s) => {
				writer.write_pbf_key(1, 2)?;
				writer.write_pbf_string(s)?;
			}
			GeoValue::Float(v) => {
				writer.write_pbf_key(2, 5)?;
				writer.write_f32(*v)?;
			}
			GeoValue::Double(v) => {
				writer.write_pbf_key(3, 1)?;
				writer.write_f64(*v)?;
			}
			GeoValue::Int(v) => {
				writer.write_pbf_key(6, 0)?;
				writer.write_svarint(*v)?;
			}
			GeoValue::UInt(v) => {
				writer.write_pbf_key(5, 0)?;
				writer.write_varint(*v)?;
			}
			GeoValue::Bool(v) => {
				writer.write_pbf_key(7, 0)?;
				writer.write_varint(u64::from(*v))?;
			}
			GeoValue::Null => {}
		}

		Ok(writer.into_blob())
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	fn round_trip(value: GeoValue) -> GeoValue {
		let blob = value.to_blob().unwrap();
		let mut reader = ValueReaderSlice::new_le(blob.as_slice());
		GeoValue::read(&mut reader).unwrap()
	}

	#[test]
	fn string_round_trip() {
		assert_eq!(round_trip(GeoValue::String("hi".into())), GeoValue::String("hi".into()));
	}

	#[test]
	fn bool_round_trip() {
		assert_eq!(round_trip(GeoValue::Bool(true)), GeoValue::Bool(true));
		assert_eq!(round_trip(GeoValue::Bool(false)), GeoValue::Bool(false));
	}

	#[test]
	fn double_round_trip() {
		assert_eq!(round_trip(GeoValue::Double(1.5)), GeoValue::Double(1.5));
	}

	#[test]
	fn uint_round_trip() {
		assert_eq!(round_trip(GeoValue::UInt(42)), GeoValue::UInt(42));
	}
}
