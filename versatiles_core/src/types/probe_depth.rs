//! Types used for handling tile streams and probing depths in tile containers.
//!
//! This module provides types and utilities for defining the depth level of probing
//! operations on tile data. Depending on the probe depth, certain levels of the tile
//! container (container metadata, tile entries, tile contents) may be interrogated.

/// An enum representing the depth of probing for a tile container.
///
/// Each variant indicates how deeply to analyze tile data. Higher-depth variants are
/// supersets of shallower ones, meaning that if you probe at a "Tiles" level,
/// you might retrieve more detailed information than a "Shallow" or "Container" probe.
///
/// # Usage
///
/// ```rust
/// use versatiles_core::ProbeDepth;
///
/// fn probe(depth: ProbeDepth) {
///     match depth {
///         ProbeDepth::Shallow => println!("Performing a shallow probe"),
///         ProbeDepth::Container => println!("Probing container-level metadata"),
///         ProbeDepth::Tiles => println!("Probing each tile's metadata"),
///         ProbeDepth::TileContents => println!("Probing tile contents in detail"),
///     }
/// }
///
/// probe(ProbeDepth::Shallow);
/// probe(ProbeDepth::TileContents);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProbeDepth {
	/// Shallow probing depth:
	/// Only gather minimal metadata about the container or its format.
	Shallow = 0,

	/// Container-level probing depth:
	/// Retrieve container-wide metadata or summary, but do not iterate tiles.
	Container = 1,

	/// Tiles-level probing depth:
	/// Inspect each tile's basic metadata (e.g., tile count, bounding boxes),
	/// but do not examine tile contents.
	Tiles = 2,

	/// Tile contents-level probing depth:
	/// Fully read the tile data, including its uncompressed or detailed structure.
	TileContents = 3,
}
