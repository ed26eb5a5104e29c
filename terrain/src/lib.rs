//! # Terrain
//!
//! `terrain` provides the geodesy and elevation plumbing shared by
//! the propagation models: great-circle distances, a batched and
//! cached front end for elevation providers, and sampled terrain
//! profiles between two points.

mod batched;
mod error;
pub mod math;
mod profile;
mod source;

pub use crate::{
    batched::{BatchedElevation, Elevations, DEFAULT_BATCH_SIZE, FALLBACK_SUFFIX},
    error::TerrainError,
    profile::{Profile, ProfileBuilder},
    source::{ElevationSource, FlatTerrain},
};
pub use geo;
