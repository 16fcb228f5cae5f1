use anyhow::{Result, bail};

use crate::utils::maths_utils::window_mean;

/// Simple moving average.
///
/// The output has one value per input. Index `i` holds the mean of
/// `data[i + 1 - period..=i]`; the first `period - 1` positions have no full
/// window yet and are `NaN`. A period longer than the series gives all `NaN`.
pub fn calculate_ma(data: &[f64], period: usize) -> Result<Vec<f64>> {
    if period == 0 {
        bail!("moving average period must be >= 1");
    }

    let mut output = vec![f64::NAN; data.len()];
    for (i, window) in data.windows(period).enumerate() {
        output[i + period - 1] = window_mean(window);
    }
    Ok(output)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn three_period_average() {
        let ma = calculate_ma(&[1.0, 2.0, 3.0, 4.0, 5.0], 3).unwrap();
        assert_eq!(ma.len(), 5);
        assert!(ma[0].is_nan() && ma[1].is_nan());
        assert_eq!(&ma[2..], &[2.0, 3.0, 4.0]);
    }

    #[test]
    fn every_defined_value_is_the_window_mean() {
        let data: Vec<f64> = (0..50).map(|i| ((i * 7919) % 101) as f64 * 0.37).collect();
        let period = 9;
        let ma = calculate_ma(&data, period).unwrap();
        for (i, value) in ma.iter().enumerate() {
            if i + 1 < period {
                assert!(value.is_nan(), "index {i} should be missing");
            } else {
                let expected: f64 =
                    data[i + 1 - period..=i].iter().sum::<f64>() / period as f64;
                assert!((value - expected).abs() < 1e-12);
            }
        }
    }

    #[test]
    fn period_longer_than_series_is_all_missing() {
        let ma = calculate_ma(&[1.0, 2.0], 3).unwrap();
        assert_eq!(ma.len(), 2);
        assert!(ma.iter().all(|v| v.is_nan()));
    }

    #[test]
    fn period_one_is_identity() {
        let data = [4.0, -1.5, 8.25];
        assert_eq!(calculate_ma(&data, 1).unwrap(), data.to_vec());
    }

    #[test]
    fn zero_period_is_rejected() {
        assert!(calculate_ma(&[1.0], 0).is_err());
    }
}
