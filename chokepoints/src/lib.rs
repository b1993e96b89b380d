//! # chokepoints
//!
//! A live traffic chokepoint detection pipeline: it fuses vector traffic-flow tiles,
//! a point-query flow-segment fallback, and an incident feed from a commercial
//! traffic provider into a ranked leaderboard of the current worst congestion
//! clusters inside a fixed deployment bounding box.
//!
//! ## Usage Example
//!
//! ```rust,no_run
//! use chokepoints::{config::Settings, pipeline::LivePipeline};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let settings = Settings::from_env()?;
//!     let pipeline = LivePipeline::new(settings)?;
//!     let result = chokepoints::pipeline::live_chokepoints(&pipeline).await?;
//!     println!("{}", serde_json::to_string_pretty(&*result)?);
//!     Ok(())
//! }
//! ```

pub mod config;
pub mod pipeline;

pub use versatiles_core as core;
pub use versatiles_derive as derive;
pub use versatiles_geometry as geometry;
