//! Batched and cached elevation lookups.

use crate::{ElevationSource, TerrainError};
use dashmap::DashMap;
use geo::geometry::Coord;
use log::{debug, warn};
use std::sync::Arc;

/// Maximum number of coordinates sent to a provider per call.
pub const DEFAULT_BATCH_SIZE: usize = 100;

/// Marker appended to the provenance when any batch fell back to flat
/// terrain.
pub const FALLBACK_SUFFIX: &str = "|fallback";

/// Exact bit patterns of a batch's `(lat, lon)` pairs.
type BatchKey = Box<[(u64, u64)]>;

/// Elevation samples and where they came from.
#[derive(Debug, Clone, PartialEq)]
pub struct Elevations {
    /// One elevation (meters) per requested coordinate.
    pub elevations_m: Vec<f64>,

    /// Provider name, suffixed with [`FALLBACK_SUFFIX`] if any batch
    /// failed.
    pub source: String,
}

impl Elevations {
    pub fn is_fallback(&self) -> bool {
        self.source.ends_with(FALLBACK_SUFFIX)
    }
}

/// Front end for an [`ElevationSource`].
///
/// Lookups are split into batches of at most `batch_size`
/// coordinates. Each successful batch is cached under the exact
/// coordinates it was requested with, so repeating a lookup never
/// calls the provider twice. A batch that fails is replaced by flat
/// (0 m) terrain and is not cached; lookups never fail.
pub struct BatchedElevation<S> {
    /// The wrapped provider.
    source: S,

    /// Coordinates per provider call.
    batch_size: usize,

    /// Batches which have been fetched on demand.
    cache: DashMap<BatchKey, Arc<[f64]>>,
}

impl<S: ElevationSource> BatchedElevation<S> {
    pub fn new(source: S) -> Self {
        Self {
            source,
            batch_size: DEFAULT_BATCH_SIZE,
            cache: DashMap::new(),
        }
    }

    /// Coordinates per provider call (defaults to 100, minimum 1).
    #[must_use]
    pub fn batch_size(mut self, batch_size: usize) -> Self {
        self.batch_size = batch_size.max(1);
        self
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    /// Number of batches currently held in the cache.
    pub fn cached_batches(&self) -> usize {
        self.cache.len()
    }

    /// Returns one elevation per coordinate in `coords`.
    pub fn lookup(&self, coords: &[Coord<f64>]) -> Elevations {
        let mut elevations_m = Vec::with_capacity(coords.len());
        let mut fallback = false;

        for chunk in coords.chunks(self.batch_size) {
            match self.batch(chunk) {
                Ok(batch) => elevations_m.extend_from_slice(&batch),
                Err(e) => {
                    warn!("{e}; using flat terrain for {} points", chunk.len());
                    fallback = true;
                    elevations_m.resize(elevations_m.len() + chunk.len(), 0.0);
                }
            }
        }

        let source = if fallback {
            format!("{}{FALLBACK_SUFFIX}", self.source.name())
        } else {
            self.source.name().to_owned()
        };

        Elevations {
            elevations_m,
            source,
        }
    }
}

/// Private API.
impl<S: ElevationSource> BatchedElevation<S> {
    /// Returns the cached batch for `chunk`, fetching it on a miss.
    ///
    /// The provider is called while the cache shard's write lock is
    /// held, so a slow (e.g. network backed) provider blocks other
    /// lookups whose batches hash to the same shard until it returns.
    fn batch(&self, chunk: &[Coord<f64>]) -> Result<Arc<[f64]>, TerrainError> {
        let key: BatchKey = chunk
            .iter()
            .map(|Coord { x, y }| (y.to_bits(), x.to_bits()))
            .collect();
        self.cache
            .entry(key)
            .or_try_insert_with(|| {
                debug!(
                    "fetching {} elevations from {}",
                    chunk.len(),
                    self.source.name()
                );
                let elevations = self.source.elevations(chunk)?;
                Ok(Arc::from(fit_len(elevations, chunk.len())))
            })
            .map(|r| r.clone())
    }
}

/// Pads a short provider answer with its last value (or 0) and
/// truncates a long one.
fn fit_len(mut elevations: Vec<f64>, len: usize) -> Vec<f64> {
    if elevations.len() != len {
        debug!(
            "provider returned {} elevations for {len} points",
            elevations.len()
        );
    }
    let pad = elevations.last().copied().unwrap_or(0.0);
    elevations.resize(len, pad);
    elevations
}
