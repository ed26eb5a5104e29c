//! # Radio Frequency Propogation
//!
//! `propah` estimates how radio signals between geolocated
//! [`Component`]s behave:
//!
//! - [`LosReport`]: terrain-aware line of sight with first fresnel zone
//!   clearance.
//! - [`InterferenceRequest`]: ranked carriers and intermodulation
//!   products landing in a receiver's window.
//! - [`HeatmapRequest`]: carrier-only received power sampled around a
//!   point.
//!
//! Path loss is free space only and antenna gains are not modeled.

pub mod component;
mod error;
pub mod fresnel;
pub mod fspl;
pub mod heatmap;
pub mod interference;
pub mod intermod;
pub mod los;
pub mod power;
pub mod rejection;

pub use {
    crate::{
        component::{Component, Emitter, Kind},
        error::PropahError,
        heatmap::{HeatPoint, Heatmap, HeatmapMeta, HeatmapRequest},
        interference::{InterferenceItem, InterferenceReport, InterferenceRequest, ItemKind},
        intermod::{Product, Tone},
        los::{LosReport, LosRequest, ProfilePoint},
        rejection::{FilterPreset, RejectionCurve},
    },
    geo, terrain,
};
