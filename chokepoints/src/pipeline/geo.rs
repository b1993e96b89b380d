//! Coordinate types and the handful of trigonometric conversions the pipeline
//! needs: slippy-tile projection, tile-local-to-geographic projection, and
//! haversine distance.

use std::f64::consts::PI;

/// Mean Earth radius in meters, used by every haversine computation in the pipeline.
pub const EARTH_RADIUS_M: f64 = 6_371_000.0;

/// A geographic point. Upstream responses hand back `[lon, lat]` pairs in several
/// incompatible orders; every boundary translates into this type exactly once so the
/// rest of the pipeline never juggles raw coordinate pairs.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct LatLon {
	pub lat: f64,
	pub lon: f64,
}

impl LatLon {
	pub fn new(lat: f64, lon: f64) -> LatLon {
		LatLon { lat, lon }
	}

	/// Builds a `LatLon` from an upstream `[lon, lat]` coordinate pair.
	pub fn from_lon_lat(pair: [f64; 2]) -> LatLon {
		LatLon { lon: pair[0], lat: pair[1] }
	}

	/// Great-circle distance to `other`, in meters.
	pub fn haversine_m(&self, other: &LatLon) -> f64 {
		haversine_m(self.lat, self.lon, other.lat, other.lon)
	}
}

/// Great-circle distance between two lat/lon points (degrees), in meters.
pub fn haversine_m(lat1: f64, lon1: f64, lat2: f64, lon2: f64) -> f64 {
	let (lat1, lat2) = (lat1.to_radians(), lat2.to_radians());
	let dlat = lat2 - lat1;
	let dlon = (lon2 - lon1).to_radians();
	let a = (dlat / 2.0).sin().powi(2) + lat1.cos() * lat2.cos() * (dlon / 2.0).sin().powi(2);
	2.0 * EARTH_RADIUS_M * a.sqrt().asin()
}

/// A WGS84 bounding box: `[minLon, minLat, maxLon, maxLat]`.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct BoundingBox {
	pub min_lon: f64,
	pub min_lat: f64,
	pub max_lon: f64,
	pub max_lat: f64,
}

impl BoundingBox {
	pub fn new(min_lon: f64, min_lat: f64, max_lon: f64, max_lat: f64) -> BoundingBox {
		BoundingBox { min_lon, min_lat, max_lon, max_lat }
	}

	pub fn from_array(a: [f64; 4]) -> BoundingBox {
		BoundingBox::new(a[0], a[1], a[2], a[3])
	}

	/// Approximate area in km², via two independent haversine edges (width at the
	/// southern edge times height along the western edge). Good enough to drive the
	/// incident-fetch split guard; not a geodesic-exact area computation.
	pub fn area_km2(&self) -> f64 {
		let width_m = haversine_m(self.min_lat, self.min_lon, self.min_lat, self.max_lon);
		let height_m = haversine_m(self.min_lat, self.min_lon, self.max_lat, self.min_lon);
		(width_m * height_m) / 1_000_000.0
	}

	/// Splits along the longer axis at its midpoint, inclusive on both halves.
	pub fn split_longer_axis(&self) -> (BoundingBox, BoundingBox) {
		let lon_span = self.max_lon - self.min_lon;
		let lat_span = self.max_lat - self.min_lat;
		if lon_span >= lat_span {
			let mid = (self.min_lon + self.max_lon) / 2.0;
			(
				BoundingBox::new(self.min_lon, self.min_lat, mid, self.max_lat),
				BoundingBox::new(mid, self.min_lat, self.max_lon, self.max_lat),
			)
		} else {
			let mid = (self.min_lat + self.max_lat) / 2.0;
			(
				BoundingBox::new(self.min_lon, self.min_lat, self.max_lon, mid),
				BoundingBox::new(self.min_lon, mid, self.max_lon, self.max_lat),
			)
		}
	}

	/// 5-decimal-rounded cache key component; matches the result cache's canonicalization.
	pub fn rounded(&self) -> (f64, f64, f64, f64) {
		let r = |v: f64| (v * 100_000.0).round() / 100_000.0;
		(r(self.min_lon), r(self.min_lat), r(self.max_lon), r(self.max_lat))
	}
}

/// A slippy-map tile address.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct TileIndex {
	pub z: u32,
	pub x: u32,
	pub y: u32,
}

impl TileIndex {
	pub fn new(z: u32, x: u32, y: u32) -> TileIndex {
		TileIndex { z, x, y }
	}
}

/// `x = floor(((lon+180)/360) * 2^z)`.
pub fn lon_to_tile_x(lon: f64, z: u32) -> i64 {
	(((lon + 180.0) / 360.0) * 2f64.powi(z as i32)).floor() as i64
}

/// `y = floor((1 - asinh(tan(lat_rad))/pi) / 2 * 2^z)`.
pub fn lat_to_tile_y(lat: f64, z: u32) -> i64 {
	let lat_rad = lat.to_radians();
	(((1.0 - lat_rad.tan().asinh() / PI) / 2.0) * 2f64.powi(z as i32)).floor() as i64
}

/// Converts a tile-local point `(tx, ty)` within `[0, extent]` of tile `(z, x, y)` to
/// geographic `(lon, lat)` degrees, inverting the Web-Mercator slippy-tile projection.
pub fn tile_point_to_lonlat(z: u32, x: u32, y: u32, tx: f64, ty: f64, extent: f64) -> LatLon {
	let n = 2f64.powi(z as i32);
	let u = (x as f64 + tx / extent) / n;
	let v = (y as f64 + ty / extent) / n;
	let lon = u * 360.0 - 180.0;
	let lat = (PI * (1.0 - 2.0 * v)).sinh().atan().to_degrees();
	LatLon::new(lat, lon)
}

#[cfg(test)]
mod tests {
	use super::*;
	use rstest::rstest;

	#[test]
	fn haversine_is_symmetric_and_zero_at_identity() {
		let a = LatLon::new(12.9716, 77.5946);
		let b = LatLon::new(12.9352, 77.6146);
		assert_eq!(a.haversine_m(&a), 0.0);
		assert!((a.haversine_m(&b) - b.haversine_m(&a)).abs() < 1e-9);
		assert!(a.haversine_m(&b) > 0.0);
	}

	#[rstest]
	#[case(0.0, 0.0, 12, 2048, 2048)]
	#[case(77.6234, 12.9037, 13, 7439, 4167)]
	fn tile_projection_roundtrips_upper_left_corner(#[case] lon: f64, #[case] lat: f64, #[case] z: u32, #[case] ex_x: i64, #[case] ex_y: i64) {
		let x = lon_to_tile_x(lon, z);
		let y = lat_to_tile_y(lat, z);
		assert_eq!(x, ex_x);
		assert_eq!(y, ex_y);

		let corner = tile_point_to_lonlat(z, x as u32, y as u32, 0.0, 0.0, 4096.0);
		// The tile's own upper-left corner projects back within a tile-width tolerance
		// of the original point (the point need not sit exactly on a tile boundary).
		let tile_deg = 360.0 / 2f64.powi(z as i32);
		assert!((corner.lon - lon).abs() <= tile_deg + 1e-6);
		assert!((corner.lat - lat).abs() <= tile_deg + 1e-6);
	}

	#[test]
	fn bbox_area_and_split() {
		let bbox = BoundingBox::new(77.0, 12.0, 78.5, 13.5);
		assert!(bbox.area_km2() > 8_000.0);
		let (a, b) = bbox.split_longer_axis();
		assert!(a.area_km2() < bbox.area_km2());
		assert!(b.area_km2() < bbox.area_km2());
	}

	#[test]
	fn small_bbox_does_not_exceed_split_threshold() {
		let bbox = BoundingBox::from_array(crate::config::DEPLOYMENT_BBOX);
		assert!(bbox.area_km2() < 8_000.0);
	}
}
