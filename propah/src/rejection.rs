//! Receiver filter rejection curves.
//!
//! A curve is a table of `(offset_khz, rejection_db)` breakpoints,
//! linearly interpolated in between and held flat beyond either end.
//!
//! Curves travel as JSON objects keyed by offset:
//!
//! ```json
//! { "0": 0, "50": 10, "100": 20, "200": 40, "300": 60, "500": 80 }
//! ```
//!
//! or, for a notch filter whose offsets are measured from a fixed
//! center rather than from the receiver's channel:
//!
//! ```json
//! { "center_MHz": 100.0, "curve": { "0": 80, "50": 60, "100": 40 } }
//! ```
//!
//! Anything that does not parse as one of those shapes is treated as
//! no filtering at all.

use log::debug;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::{fmt, str::FromStr};

const CENTER_KEY: &str = "center_MHz";
const CURVE_KEY: &str = "curve";

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(from = "Value", into = "Value")]
pub struct RejectionCurve {
    /// Sorted by offset, no duplicate offsets.
    breakpoints: Vec<(f64, f64)>,

    /// Offset reference for notch filters (MHz).
    center_mhz: Option<f64>,
}

impl RejectionCurve {
    /// Returns a curve from `(offset_khz, rejection_db)` pairs in any
    /// order. For repeated offsets the first pair wins.
    pub fn new<I>(breakpoints: I) -> Self
    where
        I: IntoIterator<Item = (f64, f64)>,
    {
        let mut breakpoints: Vec<(f64, f64)> = breakpoints.into_iter().collect();
        breakpoints.sort_by(|a, b| a.0.total_cmp(&b.0));
        breakpoints.dedup_by(|later, earlier| later.0 == earlier.0);
        Self {
            breakpoints,
            center_mhz: None,
        }
    }

    /// Returns a notch curve whose offsets are measured from
    /// `center_mhz`.
    pub fn notch<I>(center_mhz: f64, breakpoints: I) -> Self
    where
        I: IntoIterator<Item = (f64, f64)>,
    {
        Self {
            center_mhz: Some(center_mhz),
            ..Self::new(breakpoints)
        }
    }

    /// The default receiver filter.
    pub fn standard() -> Self {
        Self::new([
            (0.0, 0.0),
            (50.0, 10.0),
            (100.0, 20.0),
            (200.0, 40.0),
            (300.0, 60.0),
            (500.0, 80.0),
        ])
    }

    pub fn breakpoints(&self) -> &[(f64, f64)] {
        &self.breakpoints
    }

    pub fn center_mhz(&self) -> Option<f64> {
        self.center_mhz
    }

    /// True if this curve never rejects anything.
    pub fn is_empty(&self) -> bool {
        self.breakpoints.is_empty()
    }

    /// Returns the rejection (dB) at `offset_khz`.
    pub fn rejection_at(&self, offset_khz: f64) -> f64 {
        let (Some(&(x_first, y_first)), Some(&(x_last, y_last))) =
            (self.breakpoints.first(), self.breakpoints.last())
        else {
            return 0.0;
        };

        if offset_khz.is_nan() {
            return 0.0;
        }
        if offset_khz <= x_first {
            return y_first;
        }
        if offset_khz >= x_last {
            return y_last;
        }

        // x_first < offset_khz < x_last, so 1 <= idx < len.
        let idx = self.breakpoints.partition_point(|(x, _)| *x <= offset_khz);
        let (x1, y1) = self.breakpoints[idx - 1];
        let (x2, y2) = self.breakpoints[idx];
        y1 + (offset_khz - x1) / (x2 - x1) * (y2 - y1)
    }

    /// Returns the offset (kHz) of `tx_freq_mhz` from this filter's
    /// reference: the notch center if there is one, otherwise the
    /// receiver's channel.
    pub fn offset_khz(&self, rx_freq_mhz: f64, tx_freq_mhz: f64) -> f64 {
        let reference = self.center_mhz.unwrap_or(rx_freq_mhz);
        ((tx_freq_mhz - reference) * 1e3).abs()
    }

    /// Parses either JSON curve shape, returning `None` if anything in
    /// it is not numeric.
    pub fn from_json(value: &Value) -> Option<Self> {
        let object = value.as_object()?;
        let center_mhz = match object.get(CENTER_KEY) {
            Some(center) => Some(number(center)?),
            None => None,
        };
        let table = match object.get(CURVE_KEY) {
            Some(curve) => curve.as_object()?,
            None => object,
        };
        let breakpoints = table
            .iter()
            .filter(|(key, _)| key.as_str() != CENTER_KEY)
            .map(|(key, value)| Some((parse_finite(key)?, number(value)?)))
            .collect::<Option<Vec<_>>>()?;
        Some(Self {
            center_mhz,
            ..Self::new(breakpoints)
        })
    }
}

impl From<Value> for RejectionCurve {
    fn from(value: Value) -> Self {
        Self::from_json(&value).unwrap_or_else(|| {
            if !value.is_null() {
                debug!("unusable rejection curve {value}, filtering disabled");
            }
            Self::default()
        })
    }
}

impl From<RejectionCurve> for Value {
    fn from(curve: RejectionCurve) -> Value {
        let table: Map<String, Value> = curve
            .breakpoints
            .iter()
            .map(|(offset, rejection)| (offset.to_string(), Value::from(*rejection)))
            .collect();
        match curve.center_mhz {
            None => Value::Object(table),
            Some(center) => {
                let mut notch = Map::new();
                notch.insert(CENTER_KEY.to_owned(), Value::from(center));
                notch.insert(CURVE_KEY.to_owned(), Value::Object(table));
                Value::Object(notch)
            }
        }
    }
}

fn number(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64().filter(|n| n.is_finite()),
        Value::String(s) => parse_finite(s),
        _ => None,
    }
}

fn parse_finite(s: &str) -> Option<f64> {
    s.trim().parse::<f64>().ok().filter(|n| n.is_finite())
}

/// Named filters offered to planners.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FilterPreset {
    /// 8 pole cavity for the VHF COM band.
    #[serde(rename = "cavity_8p")]
    Cavity8Pole,

    /// Commercial band-pass filter, 200 kHz wide.
    #[serde(rename = "bpf_200k")]
    Bpf200k,

    /// FM broadcast notch centered on 100 MHz.
    #[serde(rename = "notch_fm_100")]
    NotchFm100,
}

impl FilterPreset {
    pub const ALL: [FilterPreset; 3] = [Self::Cavity8Pole, Self::Bpf200k, Self::NotchFm100];

    pub fn id(self) -> &'static str {
        match self {
            Self::Cavity8Pole => "cavity_8p",
            Self::Bpf200k => "bpf_200k",
            Self::NotchFm100 => "notch_fm_100",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Cavity8Pole => "Cavity 8 pole (VHF COM)",
            Self::Bpf200k => "Commercial BPF (200 kHz wide)",
            Self::NotchFm100 => "FM notch (100 MHz center)",
        }
    }

    pub fn curve(self) -> RejectionCurve {
        match self {
            Self::Cavity8Pole => RejectionCurve::new([
                (0.0, 0.0),
                (12.5, 12.0),
                (25.0, 25.0),
                (50.0, 48.0),
                (75.0, 60.0),
                (100.0, 72.0),
                (150.0, 85.0),
                (200.0, 95.0),
                (300.0, 110.0),
                (500.0, 120.0),
            ]),
            Self::Bpf200k => RejectionCurve::new([
                (0.0, 0.0),
                (25.0, 8.0),
                (50.0, 14.0),
                (100.0, 24.0),
                (150.0, 35.0),
                (200.0, 45.0),
                (300.0, 60.0),
                (500.0, 80.0),
            ]),
            Self::NotchFm100 => RejectionCurve::notch(
                100.0,
                [
                    (0.0, 80.0),
                    (50.0, 60.0),
                    (100.0, 40.0),
                    (200.0, 20.0),
                    (400.0, 8.0),
                    (800.0, 2.0),
                ],
            ),
        }
    }
}

impl fmt::Display for FilterPreset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

impl FromStr for FilterPreset {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|preset| preset.id() == s)
            .ok_or_else(|| {
                let known: Vec<&str> = Self::ALL.iter().map(|p| p.id()).collect();
                format!("unknown filter '{s}', expected one of {}", known.join(", "))
            })
    }
}
