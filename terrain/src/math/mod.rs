mod haversine;
mod linspace;

pub use {
    haversine::{distance_km, MEAN_EARTH_RADIUS_KM},
    linspace::linspace,
};
