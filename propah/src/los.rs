//! Terrain-aware line of sight with first fresnel zone clearance.

use crate::{
    component::Component,
    error::PropahError,
    fresnel::{earth_bulge, freq_to_wavelen, fresnel, DEFAULT_K_FACTOR},
    fspl::fspl_db,
};
use geo::geometry::Coord;
use log::debug;
use serde::{Deserialize, Serialize};
use terrain::{BatchedElevation, ElevationSource, Profile};

pub const DEFAULT_FREQ_MHZ: f64 = 118.1;
pub const DEFAULT_SAMPLES: usize = 128;
pub const MIN_SAMPLES: usize = 16;
pub const MAX_SAMPLES: usize = 2048;

/// Fresnel clearance reported where the zone has no radius.
pub const NO_FRESNEL_PCT: f64 = 999.0;

/// Minimum first fresnel zone clearance (percent, exclusive) for a
/// clear path.
pub const CLEAR_FRESNEL_PCT: f64 = 60.0;

/// One sample along a LOS path.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ProfilePoint {
    /// Distance from the transmitter (meters).
    pub d_m: f64,

    /// Terrain elevation (meters).
    pub elev_m: f64,

    /// Height of the direct ray, lowered by earth bulge (meters).
    pub ray_h_m: f64,

    /// First fresnel zone radius (meters).
    pub f1_m: f64,

    /// `ray_h_m - elev_m`.
    pub clearance_m: f64,
}

impl ProfilePoint {
    /// Clearance as a percentage of the first fresnel zone radius.
    pub fn fresnel_pct(&self) -> f64 {
        if self.f1_m == 0.0 {
            NO_FRESNEL_PCT
        } else {
            self.clearance_m / self.f1_m * 100.0
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LosReport {
    pub has_los: bool,

    /// Great circle distance between the endpoints (meters).
    pub distance_m: f64,

    /// Free space path loss over `distance_m`.
    pub fspl_db: f64,

    /// `samples + 1` points, transmitter first.
    pub profile: Vec<ProfilePoint>,

    /// Elevation provenance.
    pub source: String,

    pub fresnel_clearance_min_pct: f64,

    pub clearance_worst_point_m: f64,
}

impl LosReport {
    pub fn builder() -> LosBuilder {
        LosBuilder {
            tx: None,
            rx: None,
            freq_mhz: DEFAULT_FREQ_MHZ,
            k_factor: DEFAULT_K_FACTOR,
            samples: DEFAULT_SAMPLES,
        }
    }
}

#[derive(Debug, Clone, Copy)]
struct Endpoint {
    coord: Coord<f64>,
    abs_height_m: f64,
}

impl From<&Component> for Endpoint {
    fn from(component: &Component) -> Self {
        Endpoint {
            coord: component.coord(),
            abs_height_m: component.abs_height_m(),
        }
    }
}

pub struct LosBuilder {
    /// Transmitter (required).
    tx: Option<Endpoint>,

    /// Receiver (required).
    rx: Option<Endpoint>,

    /// Frequency of signal (MHz, defaults to 118.1).
    freq_mhz: f64,

    /// Effective earth radius multiplier (defaults to 1.33).
    k_factor: f64,

    /// Number of intervals along the path (defaults to 128).
    samples: usize,
}

impl LosBuilder {
    /// Transmitter (required).
    #[must_use]
    pub fn tx(mut self, component: &Component) -> Self {
        self.tx = Some(component.into());
        self
    }

    /// Receiver (required).
    #[must_use]
    pub fn rx(mut self, component: &Component) -> Self {
        self.rx = Some(component.into());
        self
    }

    /// Frequency of signal (MHz, defaults to 118.1).
    #[must_use]
    pub fn freq(mut self, freq_mhz: f64) -> Self {
        self.freq_mhz = freq_mhz;
        self
    }

    /// Effective earth radius multiplier (defaults to 1.33,
    /// non-positive values fall back to it).
    #[must_use]
    pub fn k_factor(mut self, k_factor: f64) -> Self {
        self.k_factor = k_factor;
        self
    }

    /// Number of intervals along the path (defaults to 128, clamped
    /// to 16..=2048).
    #[must_use]
    pub fn samples(mut self, samples: usize) -> Self {
        self.samples = samples;
        self
    }

    pub fn build<S>(&self, elevation: &BatchedElevation<S>) -> Result<LosReport, PropahError>
    where
        S: ElevationSource,
    {
        let tx = self.tx.ok_or(PropahError::Builder("tx"))?;
        let rx = self.rx.ok_or(PropahError::Builder("rx"))?;
        let samples = self.samples.clamp(MIN_SAMPLES, MAX_SAMPLES);

        let now = std::time::Instant::now();

        let Profile {
            distance_m,
            distances_m,
            terrain_elev_m,
            source,
            ..
        } = Profile::builder()
            .start(tx.coord)
            .end(rx.coord)
            .steps(samples)
            .build(elevation)?;

        let wavelen_m = freq_to_wavelen(self.freq_mhz * 1e6);
        let rise_m = rx.abs_height_m - tx.abs_height_m;

        let profile: Vec<ProfilePoint> = distances_m
            .iter()
            .zip(&terrain_elev_m)
            .enumerate()
            .map(|(i, (&d_m, &elev_m))| {
                let t = i as f64 / samples as f64;
                let ray_h_m =
                    tx.abs_height_m + rise_m * t - earth_bulge(d_m, distance_m, self.k_factor);
                ProfilePoint {
                    d_m,
                    elev_m,
                    ray_h_m,
                    f1_m: fresnel(1, wavelen_m, d_m, distance_m),
                    clearance_m: ray_h_m - elev_m,
                }
            })
            .collect();

        let clearance_worst_point_m = profile
            .iter()
            .map(|point| point.clearance_m)
            .fold(f64::INFINITY, f64::min);
        let fresnel_clearance_min_pct = profile
            .iter()
            .map(ProfilePoint::fresnel_pct)
            .fold(f64::INFINITY, f64::min);

        // Nothing can obstruct a zero length path.
        let has_los = distance_m <= 0.0
            || (clearance_worst_point_m > 0.0 && fresnel_clearance_min_pct > CLEAR_FRESNEL_PCT);

        debug!(
            "los; len: {}, distance_m: {:.1}, has_los: {}, exec: {:?}",
            profile.len(),
            distance_m,
            has_los,
            now.elapsed()
        );

        Ok(LosReport {
            has_los,
            distance_m,
            fspl_db: fspl_db(distance_m / 1000.0, self.freq_mhz),
            profile,
            source,
            fresnel_clearance_min_pct,
            clearance_worst_point_m,
        })
    }
}

/// A LOS question as it arrives over the wire.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LosRequest {
    pub tx: Component,
    pub rx: Component,
    #[serde(default = "default_freq_mhz")]
    pub freq_mhz: f64,
    #[serde(default = "default_k_factor")]
    pub k_factor: f64,
    #[serde(default = "default_samples")]
    pub samples: usize,
}

fn default_freq_mhz() -> f64 {
    DEFAULT_FREQ_MHZ
}

fn default_k_factor() -> f64 {
    DEFAULT_K_FACTOR
}

fn default_samples() -> usize {
    DEFAULT_SAMPLES
}

impl LosRequest {
    pub fn analyze<S>(&self, elevation: &BatchedElevation<S>) -> Result<LosReport, PropahError>
    where
        S: ElevationSource,
    {
        LosReport::builder()
            .tx(&self.tx)
            .rx(&self.rx)
            .freq(self.freq_mhz)
            .k_factor(self.k_factor)
            .samples(self.samples)
            .build(elevation)
    }
}
