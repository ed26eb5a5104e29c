//! Free-space path loss.

/// Distances below this (km) are treated as this.
pub const MIN_DISTANCE_KM: f64 = 1e-6;

/// Returns free-space path loss (dB) over `distance_km` at `freq_mhz`.
///
/// Returns exactly 0 dB when either input is not strictly positive.
pub fn fspl_db(distance_km: f64, freq_mhz: f64) -> f64 {
    // Written so that NaN also lands in the guard.
    if !(distance_km > 0.0 && freq_mhz > 0.0) {
        return 0.0;
    }
    32.44 + 20.0 * distance_km.max(MIN_DISTANCE_KM).log10() + 20.0 * freq_mhz.log10()
}

/// Received power (dBm) after `path_loss_db`; antenna gains are not
/// modeled.
pub fn rx_power_dbm(tx_power_dbm: f64, path_loss_db: f64) -> f64 {
    tx_power_dbm - path_loss_db
}

#[cfg(test)]
mod tests {
    use super::{fspl_db, rx_power_dbm};
    use approx::assert_relative_eq;

    #[test]
    fn test_fspl() {
        assert_relative_eq!(fspl_db(1.0, 1.0), 32.44);
        assert_relative_eq!(fspl_db(10.0, 100.0), 92.44, epsilon = 1e-12);
        assert_relative_eq!(fspl_db(4.427, 118.1), 86.81, epsilon = 0.01);
    }

    #[test]
    fn test_zero_guard() {
        assert_eq!(fspl_db(0.0, 100.0), 0.0);
        assert_eq!(fspl_db(10.0, 0.0), 0.0);
        assert_eq!(fspl_db(-1.0, 100.0), 0.0);
        assert_eq!(fspl_db(10.0, -5.0), 0.0);
        assert_eq!(fspl_db(f64::NAN, 100.0), 0.0);
    }

    #[test]
    fn test_tiny_distance_is_floored() {
        assert_eq!(fspl_db(1e-9, 100.0), fspl_db(1e-6, 100.0));
    }

    #[test]
    fn test_monotonic() {
        let distances = [0.001, 0.1, 1.0, 5.0, 50.0, 500.0];
        let freqs = [1.0, 30.0, 118.1, 900.0, 5_800.0];
        for f in freqs {
            for pair in distances.windows(2) {
                assert!(fspl_db(pair[0], f) <= fspl_db(pair[1], f));
            }
        }
        for d in distances {
            for pair in freqs.windows(2) {
                assert!(fspl_db(d, pair[0]) <= fspl_db(d, pair[1]));
            }
        }
    }

    #[test]
    fn test_rx_power() {
        assert_eq!(rx_power_dbm(40.0, 92.44), 40.0 - 92.44);
        assert_eq!(rx_power_dbm(10.0, 0.0), 10.0);
    }
}
