//! Ranked interference at a single receiver.

use crate::{
    component::{emitters, Component, Emitter},
    fspl::{fspl_db, rx_power_dbm},
    intermod::{products, Tone},
    power::sum_dbm,
    rejection::RejectionCurve,
};
use geo::geometry::Coord;
use log::debug;
use serde::{Deserialize, Serialize};
use terrain::math::distance_km;

/// Longest item list a report carries.
pub const MAX_ITEMS: usize = 500;

pub const DEFAULT_MAX_ORDER: u8 = 3;
pub const DEFAULT_WINDOW_KHZ: f64 = 500.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ItemKind {
    Carrier,
    Im2,
    Im3,
    ImN,
}

impl ItemKind {
    fn of_order(order: u8) -> Self {
        match order {
            0 | 1 => ItemKind::Carrier,
            2 => ItemKind::Im2,
            3 => ItemKind::Im3,
            _ => ItemKind::ImN,
        }
    }
}

/// One signal landing in the receiver's window.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InterferenceItem {
    pub kind: ItemKind,

    /// Frequency of the signal (MHz).
    pub freq_mhz: f64,

    /// Ids of the transmitters producing it.
    pub contributors: Vec<String>,

    /// 1 for carriers.
    pub order: u8,

    /// Level at the receiver before filtering (dBm).
    pub raw_level_dbm: f64,

    /// Level at the receiver after filtering (dBm).
    pub after_filter_dbm: f64,

    /// Offset from the filter's reference frequency (kHz).
    pub offset_khz: f64,
}

/// The receiver's front end: which frequencies get in and how hard
/// they are attenuated.
#[derive(Debug, Clone, Copy)]
pub(crate) struct Passband<'a> {
    /// `None` lets every frequency through the window.
    pub rx_freq_mhz: Option<f64>,
    pub window_khz: f64,
    pub filter: &'a RejectionCurve,
}

/// A signal that made it through a [`Passband`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct Filtered {
    pub offset_khz: f64,
    pub after_filter_dbm: f64,
}

impl Passband<'_> {
    pub fn admits(&self, freq_mhz: f64) -> bool {
        match self.rx_freq_mhz {
            Some(rx_freq_mhz) => ((freq_mhz - rx_freq_mhz) * 1e3).abs() <= self.window_khz,
            None => true,
        }
    }

    /// Filters a signal at `freq_mhz` arriving with `level_dbm`, or
    /// returns `None` if it falls outside the window.
    pub fn pass(&self, freq_mhz: f64, level_dbm: f64) -> Option<Filtered> {
        if !self.admits(freq_mhz) {
            return None;
        }
        let offset_khz = self
            .filter
            .offset_khz(self.rx_freq_mhz.unwrap_or(0.0), freq_mhz);
        Some(Filtered {
            offset_khz,
            after_filter_dbm: level_dbm - self.filter.rejection_at(offset_khz),
        })
    }

    /// After-filter level of every carrier from `emitters` received at
    /// `rx`, in emitter order.
    pub fn carriers<'e>(
        &'e self,
        rx: Coord<f64>,
        emitters: &'e [Emitter<'e>],
    ) -> impl Iterator<Item = (&'e Emitter<'e>, f64, Filtered)> + 'e {
        emitters.iter().filter_map(move |emitter| {
            let raw_level_dbm = received_dbm(emitter, rx);
            self.pass(emitter.freq_mhz, raw_level_dbm)
                .map(|filtered| (emitter, raw_level_dbm, filtered))
        })
    }
}

/// Path loss (dB) from `emitter` to `rx`.
fn path_loss_db(emitter: &Emitter<'_>, rx: Coord<f64>) -> f64 {
    fspl_db(distance_km(emitter.coord, rx), emitter.freq_mhz)
}

/// Power (dBm) from `emitter` arriving at `rx`.
pub(crate) fn received_dbm(emitter: &Emitter<'_>, rx: Coord<f64>) -> f64 {
    rx_power_dbm(emitter.power_dbm, path_loss_db(emitter, rx))
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InterferenceRequest {
    pub receiver: Component,

    #[serde(default)]
    pub transmitters: Vec<Component>,

    #[serde(default = "default_max_order")]
    pub max_order: u8,

    #[serde(default = "default_window_khz")]
    pub window_khz: f64,

    #[serde(default = "RejectionCurve::standard")]
    pub filter: RejectionCurve,
}

fn default_max_order() -> u8 {
    DEFAULT_MAX_ORDER
}

fn default_window_khz() -> f64 {
    DEFAULT_WINDOW_KHZ
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InterferenceReport {
    /// Path loss from each transmitting component, in request order.
    pub fspl_db: Vec<f64>,

    /// Power sum of every windowed item, including any beyond
    /// [`MAX_ITEMS`].
    pub rx_power_sum_dbm: f64,

    /// Strongest first, at most [`MAX_ITEMS`].
    pub items: Vec<InterferenceItem>,
}

impl InterferenceRequest {
    pub fn new(receiver: Component, transmitters: Vec<Component>) -> Self {
        Self {
            receiver,
            transmitters,
            max_order: DEFAULT_MAX_ORDER,
            window_khz: DEFAULT_WINDOW_KHZ,
            filter: RejectionCurve::standard(),
        }
    }

    pub fn analyze(&self) -> InterferenceReport {
        let now = std::time::Instant::now();

        let rx = self.receiver.coord();
        let passband = Passband {
            rx_freq_mhz: self.receiver.freq_mhz,
            window_khz: self.window_khz,
            filter: &self.filter,
        };
        let emitters = emitters(&self.transmitters);

        let fspl_db = emitters
            .iter()
            .map(|emitter| path_loss_db(emitter, rx))
            .collect();

        let mut items: Vec<InterferenceItem> = passband
            .carriers(rx, &emitters)
            .map(|(emitter, raw_level_dbm, filtered)| InterferenceItem {
                kind: ItemKind::Carrier,
                freq_mhz: emitter.freq_mhz,
                contributors: vec![emitter.id.to_owned()],
                order: 1,
                raw_level_dbm,
                after_filter_dbm: filtered.after_filter_dbm,
                offset_khz: filtered.offset_khz,
            })
            .collect();

        // Mixing happens in the receiver's front end, so tones are taken
        // at their received level.
        let tones: Vec<Tone<'_>> = emitters
            .iter()
            .map(|emitter| Tone {
                power_dbm: received_dbm(emitter, rx),
                ..Tone::from(*emitter)
            })
            .collect();

        for product in products(&tones, self.max_order) {
            if let Some(filtered) = passband.pass(product.freq_mhz, product.level_dbm) {
                items.push(InterferenceItem {
                    kind: ItemKind::of_order(product.order),
                    freq_mhz: product.freq_mhz,
                    contributors: product.contributors.iter().map(|id| id.to_string()).collect(),
                    order: product.order,
                    raw_level_dbm: product.level_dbm,
                    after_filter_dbm: filtered.after_filter_dbm,
                    offset_khz: filtered.offset_khz,
                });
            }
        }

        // Stable, so equal levels keep enumeration order.
        items.sort_by(|a, b| b.after_filter_dbm.total_cmp(&a.after_filter_dbm));

        let rx_power_sum_dbm = sum_dbm(items.iter().map(|item| item.after_filter_dbm));
        let windowed = items.len();
        items.truncate(MAX_ITEMS);

        debug!(
            "interference; transmitters: {}, windowed: {}, sum_dbm: {:.2}, exec: {:?}",
            emitters.len(),
            windowed,
            rx_power_sum_dbm,
            now.elapsed()
        );

        InterferenceReport {
            fspl_db,
            rx_power_sum_dbm,
            items,
        }
    }
}
