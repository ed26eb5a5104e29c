use geo::{geometry::Coord, CoordFloat};
use num_traits::FromPrimitive;

/// Spherical earth radius used for all great-circle distances.
pub const MEAN_EARTH_RADIUS_KM: f64 = 6371.0;

/// Returns the great-circle distance, in kilometers, between `start`
/// and `end`.
///
/// Coordinates are `x: longitude, y: latitude` in degrees.
pub fn distance_km<T>(start: Coord<T>, end: Coord<T>) -> T
where
    T: CoordFloat + FromPrimitive,
{
    let one = T::one();
    let two = one + one;
    let radius = T::from_f64(MEAN_EARTH_RADIUS_KM).unwrap_or_else(T::zero);

    let lat1 = start.y.to_radians();
    let lat2 = end.y.to_radians();
    let d_lat = (end.y - start.y).to_radians();
    let d_lon = (end.x - start.x).to_radians();

    let a = (d_lat / two).sin().powi(2) + lat1.cos() * lat2.cos() * (d_lon / two).sin().powi(2);
    // Rounding can push `a` a hair outside [0, 1] for antipodal points.
    let a = a.max(T::zero()).min(one);

    two * radius * a.sqrt().asin()
}

#[cfg(test)]
mod tests {
    use super::distance_km;
    use approx::assert_relative_eq;
    use geo::{coord, Coord};

    const MT_WASHINGTON: Coord = Coord {
        y: 44.2705,
        x: -71.30325,
    };

    const PINKHAM_NOTCH: Coord = Coord {
        y: 44.2575,
        x: -71.2535,
    };

    #[test]
    fn test_identical_points() {
        assert_eq!(distance_km(MT_WASHINGTON, MT_WASHINGTON), 0.0);
    }

    #[test]
    fn test_symmetric() {
        assert_relative_eq!(
            distance_km(MT_WASHINGTON, PINKHAM_NOTCH),
            distance_km(PINKHAM_NOTCH, MT_WASHINGTON),
            epsilon = f64::EPSILON
        );
    }

    #[test]
    fn test_one_degree_of_latitude() {
        let start = coord! { x: 0.0, y: 0.0 };
        let end = coord! { x: 0.0, y: 1.0 };
        assert_relative_eq!(
            distance_km(start, end),
            111.194_926_644_558_73,
            epsilon = 1e-9
        );
    }

    #[test]
    fn test_f32() {
        let start = coord! { x: 0.0_f32, y: 0.0 };
        let end = coord! { x: 1.0_f32, y: 0.0 };
        assert_relative_eq!(distance_km(start, end), 111.194_93_f32, epsilon = 1e-3);
    }
}
