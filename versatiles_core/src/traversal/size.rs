//! Module for representing and manipulating ranges of block sizes for tile traversal.
//!
//! A `TraversalSize` encodes a range of block sizes as powers of two (log2 values),
//! controlling how many tiles are grouped per traversal block.

use anyhow::{Result, ensure};
use std::fmt::Debug;

/// Represents allowed sizes of a block of tiles
/// The size is represented as log2(size).
/// For example, TraversalSize { max: 6 } represents block of sizes up to 64 tiles.
#[derive(Clone, PartialEq)]
pub struct TraversalSize {
	min: u8,
	max: u8,
}

impl TraversalSize {
	/// Create a new `TraversalSize` covering sizes from `min_size` up to `max_size`.
	///
	/// Both `min_size` and `max_size` must be positive powers of two, and `min_size <= max_size`.
	///
	/// # Errors
	/// Returns an error if sizes are zero, not powers of two, out of order, or too large.
	pub fn new(min_size: u32, max_size: u32) -> Result<TraversalSize> {
		ensure!(min_size <= max_size, "min size must be less than or equal to max size");
		Ok(TraversalSize {
			min: size_to_bits(min_size)?,
			max: size_to_bits(max_size)?,
		})
	}

	/// Return a default `TraversalSize` covering the full range of valid sizes (1 to 2^31).
	pub const fn new_default() -> Self {
		TraversalSize { min: 0, max: 31 }
	}

	/// Shortcut to create a `TraversalSize` with minimum size 1 and maximum size `size`.
	pub fn new_max(size: u32) -> Result<TraversalSize> {
		TraversalSize::new(1, size)
	}

	/// Check whether the size range is empty (min > max).
	pub fn is_empty(&self) -> bool {
		self.min > self.max
	}

	/// Compute the maximum block size (2^max) in tile count.
	///
	/// # Errors
	/// Returns an error if the range is empty or `max` is out of bounds.
	pub fn get_max_size(&self) -> Result<u32> {
		ensure!(!self.is_empty(), "TraversalSize is empty: {self:?}");
		ensure!(self.max < 32, "TraversalSize max is too large: {self:?}");
		Ok(1 << self.max)
	}

	/// Restrict this range to the intersection with another `TraversalSize`.
	///
	/// # Errors
	/// Returns an error if the resulting range is empty (no overlap).
	pub fn intersect(&mut self, other: &TraversalSize) -> Result<()> {
		self.min = self.min.max(other.min);
		self.max = self.max.min(other.max);
		ensure!(
			!self.is_empty(),
			"Non-overlapping traversal sizes: {self:?} and {other:?}"
		);
		Ok(())
	}
}

impl Default for TraversalSize {
	fn default() -> Self {
		TraversalSize::new_default()
	}
}

impl Debug for TraversalSize {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		write!(f, "TraversalSize ({} .. {})", 1 << self.min, 1 << self.max)
	}
}

/// Convert a block size (power of two) into its log2 (bit) representation.
///
/// # Errors
/// Returns an error if `size` is zero, not a power of two, or too large.
fn size_to_bits(size: u32) -> Result<u8> {
	ensure!(size > 0, "Size must be greater than zero");
	ensure!(size.is_power_of_two(), "Size must be a power of two: {size}");
	let bits = (size as f64).log2().floor() as u8;
	ensure!(bits < 32, "Size is too large: {size}");
	Ok(bits)
}
