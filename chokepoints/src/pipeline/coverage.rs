//! TileCoverage: maps a bounding box and zoom to the set of slippy tiles covering it.

use crate::pipeline::geo::{BoundingBox, TileIndex, lat_to_tile_y, lon_to_tile_x};

/// Floor below which coverage refuses to compute tiles; matches the upstream provider's
/// minimum useful zoom for traffic-flow tiles.
pub const MIN_ZOOM: u32 = 12;

/// Inclusive rectangle of (x, y) tile indices at `z` covering `bbox`.
pub fn tiles_for_bbox(bbox: &BoundingBox, z: u32) -> Vec<TileIndex> {
	let x_min = lon_to_tile_x(bbox.min_lon, z).max(0);
	let x_max = lon_to_tile_x(bbox.max_lon, z).max(0);
	// Latitude and tile-y move in opposite directions.
	let y_min = lat_to_tile_y(bbox.max_lat, z).max(0);
	let y_max = lat_to_tile_y(bbox.min_lat, z).max(0);

	let (x_lo, x_hi) = (x_min.min(x_max), x_min.max(x_max));
	let (y_lo, y_hi) = (y_min.min(y_max), y_min.max(y_max));

	let mut tiles = Vec::with_capacity(((x_hi - x_lo + 1) * (y_hi - y_lo + 1)) as usize);
	for x in x_lo..=x_hi {
		for y in y_lo..=y_hi {
			tiles.push(TileIndex::new(z, x as u32, y as u32));
		}
	}
	tiles
}

/// Computes tile coverage at `z` (floored to [`MIN_ZOOM`]), reducing zoom by one at a
/// time while the tile count exceeds `max_tiles`. Returns the final `(zoom, tiles)`.
pub fn coverage_within_budget(bbox: &BoundingBox, z: u32, max_tiles: usize) -> (u32, Vec<TileIndex>) {
	let mut z = z.max(MIN_ZOOM);
	loop {
		let tiles = tiles_for_bbox(bbox, z);
		if tiles.len() <= max_tiles || z <= MIN_ZOOM {
			return (z, tiles);
		}
		z -= 1;
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn coverage_includes_boundary_tiles() {
		let bbox = BoundingBox::new(77.6234, 12.9037, 77.6625, 12.9247);
		let tiles = tiles_for_bbox(&bbox, 13);
		assert!(!tiles.is_empty());
		for t in &tiles {
			assert_eq!(t.z, 13);
		}
	}

	#[test]
	fn budget_reduces_zoom_by_exactly_one_step_at_a_time() {
		let bbox = BoundingBox::new(77.0, 12.0, 78.0, 13.0);
		let (z_full, tiles_full) = coverage_within_budget(&bbox, 18, 16);
		assert!(tiles_full.len() <= 16);
		let (z_one_less, _) = coverage_within_budget(&bbox, 18, tiles_for_bbox(&bbox, 18).len() - 1);
		assert!(z_one_less <= 17);
		assert!(z_full <= 18);
	}

	#[test]
	fn never_goes_below_min_zoom() {
		let bbox = BoundingBox::new(70.0, 5.0, 90.0, 25.0);
		let (z, _) = coverage_within_budget(&bbox, 30, 1);
		assert_eq!(z, MIN_ZOOM);
	}
}
