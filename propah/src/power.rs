//! Power in the logarithmic domain.

/// Level reported for "nothing received".
pub const FLOOR_DBM: f64 = -200.0;

/// Converts dBm to milliwatts.
pub fn dbm_to_mw(dbm: f64) -> f64 {
    10.0_f64.powf(dbm / 10.0)
}

/// Sums `levels_dbm` as linear powers and returns the total in dBm.
///
/// An empty sum is [`FLOOR_DBM`].
pub fn sum_dbm<I>(levels_dbm: I) -> f64
where
    I: IntoIterator<Item = f64>,
{
    let total_mw: f64 = levels_dbm.into_iter().map(dbm_to_mw).sum();
    if total_mw > 0.0 {
        10.0 * total_mw.log10()
    } else {
        FLOOR_DBM
    }
}

#[cfg(test)]
mod tests {
    use super::{dbm_to_mw, sum_dbm, FLOOR_DBM};
    use approx::assert_relative_eq;

    #[test]
    fn test_empty_sum() {
        assert_eq!(sum_dbm(std::iter::empty()), FLOOR_DBM);
        assert_eq!(sum_dbm(Vec::new()), -200.0);
    }

    #[test]
    fn test_sum() {
        assert_relative_eq!(sum_dbm([0.0]), 0.0);
        assert_relative_eq!(sum_dbm([0.0, 0.0]), 3.010_299_956_639_812, epsilon = 1e-12);
        assert_relative_eq!(
            sum_dbm([-20.0, -20.0, -20.0, -20.0]),
            -13.979_400_086_720_377,
            epsilon = 1e-12
        );
    }

    #[test]
    fn test_dbm_to_mw() {
        assert_relative_eq!(dbm_to_mw(30.0), 1_000.0, epsilon = 1e-9);
        assert_relative_eq!(dbm_to_mw(-30.0), 0.001, epsilon = 1e-15);
    }
}
