/// Decoded feature geometry in tile-local coordinates (the integer extent grid the
/// tile was encoded against), as produced by [`super::feature::VectorTileFeature::to_geometry`].
///
/// Traffic flow tiles only ever carry point and line features: polygon rings are
/// rejected during decoding rather than represented here.
#[derive(Clone, Debug, PartialEq)]
pub enum TileGeometry {
	Point([f64; 2]),
	MultiPoint(Vec<[f64; 2]>),
	LineString(Vec<[f64; 2]>),
	MultiLineString(Vec<Vec<[f64; 2]>>),
}

impl TileGeometry {
	/// Returns every vertex of the geometry, flattened, in encounter order.
	pub fn points(&self) -> Vec<[f64; 2]> {
		match self {
			TileGeometry::Point(p) => vec![*p],
			TileGeometry::MultiPoint(pts) => pts.clone(),
			TileGeometry::LineString(line) => line.clone(),
			TileGeometry::MultiLineString(lines) => lines.iter().flatten().copied().collect(),
		}
	}

	/// The midpoint of the first line (or the point itself), used as a feature's
	/// representative location when it carries a severity sample.
	pub fn representative_point(&self) -> Option<[f64; 2]> {
		match self {
			TileGeometry::Point(p) => Some(*p),
			TileGeometry::MultiPoint(pts) => pts.first().copied(),
			TileGeometry::LineString(line) => mid_point(line),
			TileGeometry::MultiLineString(lines) => lines.first().and_then(|line| mid_point(line)),
		}
	}
}

fn mid_point(line: &[[f64; 2]]) -> Option<[f64; 2]> {
	if line.is_empty() {
		return None;
	}
	Some(line[line.len() / 2])
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn representative_point_of_line_is_mid_vertex() {
		let g = TileGeometry::LineString(vec![[0.0, 0.0], [1.0, 1.0], [2.0, 2.0]]);
		assert_eq!(g.representative_point(), Some([1.0, 1.0]));
	}

	#[test]
	fn representative_point_of_point() {
		let g = TileGeometry::Point([5.0, 6.0]);
		assert_eq!(g.representative_point(), Some([5.0, 6.0]));
	}

	#[test]
	fn points_flattens_multilinestring() {
		let g = TileGeometry::MultiLineString(vec![vec![[0.0, 0.0], [1.0, 0.0]], vec![[2.0, 0.0]]]);
		assert_eq!(g.points(), vec![[0.0, 0.0], [1.0, 0.0], [2.0, 0.0]]);
	}
}
