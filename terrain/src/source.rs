//! Elevation providers.

use crate::TerrainError;
use geo::geometry::Coord;

/// A provider of terrain elevation samples.
///
/// Implementations typically sit on top of a DEM or a remote lookup
/// service. Callers should not use a provider directly, but wrap it
/// in a [`BatchedElevation`](crate::BatchedElevation) which takes care
/// of batching, caching, and degrading to flat terrain on failure.
pub trait ElevationSource {
    /// Provenance reported alongside every lookup.
    fn name(&self) -> &str;

    /// Returns one elevation (meters) per coordinate in `coords`.
    ///
    /// Coordinates are `x: longitude, y: latitude` in degrees.
    fn elevations(&self, coords: &[Coord<f64>]) -> Result<Vec<f64>, TerrainError>;
}

impl<S: ElevationSource + ?Sized> ElevationSource for Box<S> {
    fn name(&self) -> &str {
        (**self).name()
    }

    fn elevations(&self, coords: &[Coord<f64>]) -> Result<Vec<f64>, TerrainError> {
        (**self).elevations(coords)
    }
}

/// Sea-level earth.
///
/// Used when no real terrain model is wired in.
#[derive(Debug, Clone, Copy, Default)]
pub struct FlatTerrain;

impl ElevationSource for FlatTerrain {
    fn name(&self) -> &str {
        "flat"
    }

    fn elevations(&self, coords: &[Coord<f64>]) -> Result<Vec<f64>, TerrainError> {
        Ok(vec![0.0; coords.len()])
    }
}
