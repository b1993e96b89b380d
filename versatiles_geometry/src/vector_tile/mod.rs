//! Vector Tile (MVT) support.
//!
//! This module implements a low-level decoder for the Mapbox Vector Tile
//! (MVT) protobuf format, used to read traffic-flow tiles into tile-local
//! feature geometry and properties.
//!
//! This module re-exports the most commonly used types for convenience:
//! [`VectorTileLayer`], [`VectorTile`] and [`TileGeometry`].

mod feature;
mod geometry;
mod geometry_type;
mod layer;
mod property_manager;
mod tile;
mod value;

pub use geometry::TileGeometry;
pub use geometry_type::GeomType;
pub use layer::VectorTileLayer;
pub use tile::VectorTile;
