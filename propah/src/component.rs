//! Geolocated radio entities.

use geo::geometry::Coord;
use serde::{Deserialize, Serialize};
use std::fmt;

/// What a [`Component`] is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Kind {
    Tower,
    Antenna,
    Aircraft,
    Receiver,
}

impl fmt::Display for Kind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Kind::Tower => "tower",
            Kind::Antenna => "antenna",
            Kind::Aircraft => "aircraft",
            Kind::Receiver => "receiver",
        };
        f.write_str(name)
    }
}

/// A radio entity placed on the map.
///
/// Only components with both a frequency and a transmit power take
/// part in RF calculations; see [`Component::emitter`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Component {
    /// Unique within a request.
    pub id: String,

    /// Display name.
    #[serde(default)]
    pub name: String,

    pub kind: Kind,

    /// Latitude (degrees).
    pub lat: f64,

    /// Longitude (degrees).
    pub lon: f64,

    /// Terrain elevation at the component's location (meters).
    #[serde(default)]
    pub terrain_elev_m: f64,

    /// Height above terrain (meters).
    #[serde(default)]
    pub height_m: f64,

    /// Carrier frequency (MHz).
    #[serde(default)]
    pub freq_mhz: Option<f64>,

    /// Transmit power (dBm).
    #[serde(default)]
    pub power_dbm: Option<f64>,

    /// Heading (degrees).
    #[serde(default)]
    pub heading_deg: Option<f64>,
}

impl Component {
    pub fn new(id: impl Into<String>, kind: Kind, lat: f64, lon: f64) -> Self {
        let id = id.into();
        Self {
            name: id.clone(),
            id,
            kind,
            lat,
            lon,
            terrain_elev_m: 0.0,
            height_m: 0.0,
            freq_mhz: None,
            power_dbm: None,
            heading_deg: None,
        }
    }

    /// Carrier frequency (MHz) and transmit power (dBm).
    #[must_use]
    pub fn radio(mut self, freq_mhz: f64, power_dbm: f64) -> Self {
        self.freq_mhz = Some(freq_mhz);
        self.power_dbm = Some(power_dbm);
        self
    }

    /// Receive-only channel (MHz).
    #[must_use]
    pub fn tuned(mut self, freq_mhz: f64) -> Self {
        self.freq_mhz = Some(freq_mhz);
        self
    }

    /// Terrain elevation (meters) and height above it (meters).
    #[must_use]
    pub fn elevation(mut self, terrain_elev_m: f64, height_m: f64) -> Self {
        self.terrain_elev_m = terrain_elev_m;
        self.height_m = height_m;
        self
    }

    /// Location as `x: longitude, y: latitude`.
    pub fn coord(&self) -> Coord<f64> {
        Coord {
            x: self.lon,
            y: self.lat,
        }
    }

    /// Antenna height above the elevation datum (meters).
    pub fn abs_height_m(&self) -> f64 {
        self.terrain_elev_m + self.height_m
    }

    /// Returns the transmitting side of this component, if it has both
    /// a frequency and a power.
    pub fn emitter(&self) -> Option<Emitter<'_>> {
        match (self.freq_mhz, self.power_dbm) {
            (Some(freq_mhz), Some(power_dbm)) => Some(Emitter {
                id: &self.id,
                coord: self.coord(),
                freq_mhz,
                power_dbm,
            }),
            _ => None,
        }
    }
}

/// A component that is able to transmit.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Emitter<'a> {
    pub id: &'a str,
    pub coord: Coord<f64>,
    pub freq_mhz: f64,
    pub power_dbm: f64,
}

/// Returns every emitter in `components`, preserving order.
pub fn emitters(components: &[Component]) -> Vec<Emitter<'_>> {
    components.iter().filter_map(Component::emitter).collect()
}
