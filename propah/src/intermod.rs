//! Intermodulation product enumeration.
//!
//! Every product is attenuated relative to its weakest contributor by a
//! fixed, order dependent penalty (see [`penalty_db`]). Products are
//! listed by order, then by tone, then by partner tone, and are never
//! deduplicated: two different mixes that land on the same frequency
//! are reported twice.

use crate::component::Emitter;
use log::debug;
use serde::Serialize;

/// Highest order [`products`] will enumerate.
pub const MAX_ORDER: u8 = 5;

/// A transmitted carrier taking part in mixing.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Tone<'a> {
    pub id: &'a str,
    pub freq_mhz: f64,
    pub power_dbm: f64,
}

impl<'a> From<Emitter<'a>> for Tone<'a> {
    fn from(emitter: Emitter<'a>) -> Self {
        Tone {
            id: emitter.id,
            freq_mhz: emitter.freq_mhz,
            power_dbm: emitter.power_dbm,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Product<'a> {
    /// Product frequency (MHz).
    pub freq_mhz: f64,

    /// One tone for harmonics, two for mixes (the tone whose multiple
    /// is taken first).
    pub contributors: Vec<&'a str>,

    pub order: u8,

    pub level_dbm: f64,
}

/// Returns how far (dB) an order `order` product sits below its weakest
/// contributor.
pub fn penalty_db(order: u8) -> f64 {
    match order {
        0 | 1 => 0.0,
        2 => 30.0,
        n => 40.0 + 10.0 * f64::from(n - 3),
    }
}

/// Enumerates every product of order 2 through `max_order` (clamped to
/// [`MAX_ORDER`]).
///
/// - order 2: `2·f_i` for each tone; `f_i + f_j` and `|f_i - f_j|` for
///   each unordered pair.
/// - order n > 2: `n·f_i` for each tone; `(n-1)·f_i + f_j` and
///   `|(n-1)·f_i - f_j|` for each ordered pair.
pub fn products<'a>(tones: &[Tone<'a>], max_order: u8) -> Vec<Product<'a>> {
    let now = std::time::Instant::now();
    let max_order = max_order.min(MAX_ORDER);
    let mut out = Vec::new();

    for order in 2..=max_order {
        let penalty = penalty_db(order);
        let n = f64::from(order);

        for (i, a) in tones.iter().enumerate() {
            out.push(Product {
                freq_mhz: n * a.freq_mhz,
                contributors: vec![a.id],
                order,
                level_dbm: a.power_dbm - penalty,
            });

            for (j, b) in tones.iter().enumerate() {
                // Second order mixes are symmetric, so only visit i < j.
                let skip = if order == 2 { j <= i } else { j == i };
                if skip {
                    continue;
                }
                let level_dbm = a.power_dbm.min(b.power_dbm) - penalty;
                let multiple = (n - 1.0) * a.freq_mhz;
                for freq_mhz in [multiple + b.freq_mhz, (multiple - b.freq_mhz).abs()] {
                    out.push(Product {
                        freq_mhz,
                        contributors: vec![a.id, b.id],
                        order,
                        level_dbm,
                    });
                }
            }
        }
    }

    debug!(
        "intermod; tones: {}, max_order: {}, products: {}, exec: {:?}",
        tones.len(),
        max_order,
        out.len(),
        now.elapsed()
    );

    out
}
