//! Carrier-only received power around a point.
//!
//! The area is sampled as concentric rings `step_m` apart, each ring
//! holding roughly one point per `step_m` of circumference, and every
//! sample is scored with the power sum of the in-window carriers after
//! filtering. Intermodulation is left to
//! [`InterferenceRequest`](crate::InterferenceRequest).

use crate::{
    component::{emitters, Component},
    interference::Passband,
    power::sum_dbm,
    rejection::RejectionCurve,
};
use geo::geometry::Coord;
use log::debug;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use std::f64::consts::PI;

pub const DEFAULT_RADIUS_KM: f64 = 3.0;
pub const DEFAULT_STEP_M: f64 = 200.0;
pub const DEFAULT_F_RX_MHZ: f64 = 118.0;
pub const DEFAULT_WINDOW_KHZ: f64 = 150.0;

/// Meters per degree of latitude, and of longitude at the equator.
const M_PER_DEG: f64 = 111_000.0;

/// Lower bound on arc length between ring points (meters).
const MIN_ARC_M: f64 = 50.0;

const MIN_RING_POINTS: usize = 6;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HeatmapRequest {
    pub center_lat: f64,
    pub center_lon: f64,

    #[serde(default = "default_radius_km")]
    pub radius_km: f64,

    /// Distance between rings (meters).
    #[serde(default = "default_step_m")]
    pub step_m: f64,

    #[serde(default = "default_f_rx_mhz")]
    pub f_rx_mhz: f64,

    #[serde(default = "default_window_khz")]
    pub window_khz: f64,

    /// Accepted for symmetry with interference requests; heatmaps only
    /// score carriers.
    #[serde(default = "default_max_order")]
    pub max_order: u8,

    #[serde(default = "RejectionCurve::standard")]
    pub filter: RejectionCurve,

    #[serde(default)]
    pub transmitters: Vec<Component>,
}

fn default_radius_km() -> f64 {
    DEFAULT_RADIUS_KM
}

fn default_step_m() -> f64 {
    DEFAULT_STEP_M
}

fn default_f_rx_mhz() -> f64 {
    DEFAULT_F_RX_MHZ
}

fn default_window_khz() -> f64 {
    DEFAULT_WINDOW_KHZ
}

fn default_max_order() -> u8 {
    crate::interference::DEFAULT_MAX_ORDER
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HeatPoint {
    pub lat: f64,
    pub lon: f64,
    pub score_dbm: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HeatmapMeta {
    pub step_m: f64,
    pub radius_km: f64,

    /// Number of rings around the center.
    pub rings: usize,

    /// Number of points, center included.
    pub points: usize,

    pub f_rx_mhz: f64,
    pub window_khz: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Heatmap {
    /// Center first, then ring by ring outwards.
    pub points: Vec<HeatPoint>,
    pub meta: HeatmapMeta,
}

/// Returns `center` followed by the points of every ring within
/// `radius_km`, innermost first, along with the number of rings.
///
/// Rings are `step_m` apart. Each holds `2πr / max(step_m, 50)`
/// points, but never fewer than six.
pub fn ring_points(center: Coord<f64>, radius_km: f64, step_m: f64) -> (Vec<Coord<f64>>, usize) {
    let mut points = vec![center];
    // Also rejects NaN.
    if !(radius_km > 0.0 && step_m > 0.0) {
        return (points, 0);
    }

    let radius_m = radius_km * 1000.0;
    let m_per_deg_lon = M_PER_DEG * center.y.to_radians().cos();
    let arc_m = step_m.max(MIN_ARC_M);

    let mut rings = 0;
    loop {
        // Multiply rather than accumulate to keep the last ring exact.
        let r_m = (rings + 1) as f64 * step_m;
        if r_m > radius_m {
            break;
        }
        rings += 1;

        let n = MIN_RING_POINTS.max((2.0 * PI * r_m / arc_m) as usize);
        points.extend((0..n).map(|k| {
            let angle = 2.0 * PI * k as f64 / n as f64;
            Coord {
                x: center.x + r_m * angle.sin() / m_per_deg_lon,
                y: center.y + r_m * angle.cos() / M_PER_DEG,
            }
        }));
    }

    (points, rings)
}

impl HeatmapRequest {
    pub fn center(&self) -> Coord<f64> {
        Coord {
            x: self.center_lon,
            y: self.center_lat,
        }
    }

    pub fn sample(&self) -> Heatmap {
        let now = std::time::Instant::now();

        let (coords, rings) = ring_points(self.center(), self.radius_km, self.step_m);
        let emitters = emitters(&self.transmitters);
        let passband = Passband {
            rx_freq_mhz: Some(self.f_rx_mhz),
            window_khz: self.window_khz,
            filter: &self.filter,
        };

        let points: Vec<HeatPoint> = coords
            .par_iter()
            .map(|&coord| HeatPoint {
                lat: coord.y,
                lon: coord.x,
                score_dbm: sum_dbm(
                    passband
                        .carriers(coord, &emitters)
                        .map(|(_, _, filtered)| filtered.after_filter_dbm),
                ),
            })
            .collect();

        debug!(
            "heatmap; rings: {}, points: {}, transmitters: {}, exec: {:?}",
            rings,
            points.len(),
            emitters.len(),
            now.elapsed()
        );

        Heatmap {
            meta: HeatmapMeta {
                step_m: self.step_m,
                radius_km: self.radius_km,
                rings,
                points: points.len(),
                f_rx_mhz: self.f_rx_mhz,
                window_khz: self.window_khz,
            },
            points,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{ring_points, HeatmapRequest};
    use crate::{
        component::{Component, Kind},
        fspl::fspl_db,
        power::FLOOR_DBM,
        rejection::RejectionCurve,
    };
    use approx::assert_relative_eq;
    use geo::Coord;
    use terrain::math::distance_km;

    const CENTER: Coord = Coord {
        x: -71.30830716441369,
        y: 44.28309806603165,
    };

    fn request(radius_km: f64, step_m: f64, transmitters: Vec<Component>) -> HeatmapRequest {
        HeatmapRequest {
            center_lat: CENTER.y,
            center_lon: CENTER.x,
            radius_km,
            step_m,
            f_rx_mhz: 118.0,
            window_khz: 150.0,
            max_order: 3,
            filter: RejectionCurve::standard(),
            transmitters,
        }
    }

    fn tower() -> Component {
        Component::new("TWR", Kind::Tower, 44.25628098424278, -71.2672073283768).radio(118.05, 40.0)
    }

    #[test]
    fn test_zero_radius_is_center() {
        let heatmap = request(0.0, 200.0, vec![tower()]).sample();
        assert_eq!(heatmap.points.len(), 1);
        assert_eq!(heatmap.meta.rings, 0);
        assert_eq!(heatmap.meta.points, 1);

        let point = heatmap.points[0];
        assert_eq!(point.lat, CENTER.y);
        assert_eq!(point.lon, CENTER.x);

        // 50 kHz off channel is 10 dB down on the standard curve.
        let tx = tower();
        let expected = 40.0 - fspl_db(distance_km(tx.coord(), CENTER), 118.05) - 10.0;
        assert_relative_eq!(point.score_dbm, expected, epsilon = 1e-6);
    }

    #[test]
    fn test_bad_step_is_center() {
        assert_eq!(ring_points(CENTER, 3.0, 0.0), (vec![CENTER], 0));
        assert_eq!(ring_points(CENTER, 3.0, -10.0), (vec![CENTER], 0));
        assert_eq!(ring_points(CENTER, -1.0, 200.0), (vec![CENTER], 0));
        assert_eq!(ring_points(CENTER, f64::NAN, 200.0), (vec![CENTER], 0));
    }

    #[test]
    fn test_ring_counts() {
        let (points, rings) = ring_points(CENTER, 0.5, 200.0);
        assert_eq!(rings, 2);
        assert_eq!(points.len(), 1 + 6 + 12);

        // Arc length never drops below 50 m, but rings keep 6 points.
        let (points, rings) = ring_points(CENTER, 0.05, 20.0);
        assert_eq!(rings, 2);
        assert_eq!(points.len(), 1 + 6 + 6);

        // Defaults.
        let (points, rings) = ring_points(CENTER, 3.0, 200.0);
        assert_eq!(rings, 15);
        assert_eq!(points.len(), 747);
    }

    #[test]
    fn test_ring_geometry() {
        let (points, _) = ring_points(CENTER, 0.2, 200.0);
        assert_eq!(points[0], CENTER);
        // First point of each ring is due north.
        assert_relative_eq!(points[1].y, CENTER.y + 200.0 / 111_000.0, epsilon = 1e-12);
        assert_relative_eq!(points[1].x, CENTER.x, epsilon = 1e-12);
        for point in &points[1..] {
            assert_relative_eq!(distance_km(CENTER, *point), 0.2, epsilon = 0.01);
        }
    }

    #[test]
    fn test_scores() {
        let off_channel = Component::new("FM", Kind::Tower, 44.27, -71.29).radio(100.1, 70.0);
        let marker = Component::new("A1", Kind::Aircraft, 44.27, -71.29);
        let heatmap = request(0.5, 200.0, vec![tower(), off_channel, marker]).sample();
        assert_eq!(heatmap.points.len(), heatmap.meta.points);
        assert!(heatmap
            .points
            .iter()
            .all(|p| p.score_dbm > FLOOR_DBM && p.score_dbm < 0.0));

        let silent = request(0.5, 200.0, vec![]).sample();
        assert!(silent.points.iter().all(|p| p.score_dbm == FLOOR_DBM));
    }

    #[test]
    fn test_request_defaults() {
        let json = r#"{"center_lat": 44.28, "center_lon": -71.31}"#;
        let request: HeatmapRequest = serde_json::from_str(json).unwrap();
        assert_eq!(request.radius_km, 3.0);
        assert_eq!(request.step_m, 200.0);
        assert_eq!(request.f_rx_mhz, 118.0);
        assert_eq!(request.window_khz, 150.0);
        assert_eq!(request.max_order, 3);
        assert_eq!(request.filter, RejectionCurve::standard());
        assert!(request.transmitters.is_empty());
    }
}
