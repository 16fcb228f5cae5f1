use anyhow::{Result, bail};
use serde::Serialize;

use super::ma::calculate_ma;
use crate::utils::maths_utils::population_std_dev_about;

#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct BollingerBands {
    pub upper: Vec<f64>,
    pub middle: Vec<f64>,
    pub lower: Vec<f64>,
}

/// Bollinger Bands: moving average +/- `std_dev` population standard deviations.
/// The deviation of each window is taken about the moving-average value already
/// computed for that index.
pub fn calculate_bollinger_bands(
    data: &[f64],
    period: usize,
    std_dev: f64,
) -> Result<BollingerBands> {
    if std_dev.is_nan() || std_dev < 0.0 {
        bail!("Bollinger std-dev multiplier must be >= 0 (got {})", std_dev);
    }
    let middle = calculate_ma(data, period)?;

    let mut deviations = vec![f64::NAN; data.len()];
    for (i, window) in data.windows(period).enumerate() {
        let idx = i + period - 1;
        deviations[idx] = population_std_dev_about(window, middle[idx]);
    }

    let (upper, lower): (Vec<f64>, Vec<f64>) = middle
        .iter()
        .zip(&deviations)
        .map(|(m, sd)| (m + std_dev * sd, m - std_dev * sd))
        .unzip();

    Ok(BollingerBands {
        upper,
        middle,
        lower,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use statrs::statistics::Statistics;

    fn sample_prices() -> Vec<f64> {
        (0..120)
            .map(|i| 50.0 + ((i as f64) * 0.3).cos() * 4.0 + (i % 7) as f64 * 0.25)
            .collect()
    }

    #[test]
    fn bands_bracket_the_average() {
        let bands = calculate_bollinger_bands(&sample_prices(), 20, 2.0).unwrap();
        for i in 0..bands.middle.len() {
            if i < 19 {
                assert!(bands.upper[i].is_nan());
                assert!(bands.middle[i].is_nan());
                assert!(bands.lower[i].is_nan());
            } else {
                assert!(bands.lower[i] <= bands.middle[i]);
                assert!(bands.middle[i] <= bands.upper[i]);
            }
        }
    }

    #[test]
    fn width_matches_population_std_dev() {
        let prices = sample_prices();
        let period = 20;
        let bands = calculate_bollinger_bands(&prices, period, 2.5).unwrap();
        for i in (period - 1)..prices.len() {
            let window = &prices[i + 1 - period..=i];
            let sd = window.population_std_dev();
            let half_width = (bands.upper[i] - bands.lower[i]) / 2.0;
            assert!((half_width - 2.5 * sd).abs() < 1e-9, "index {i}");
        }
    }

    #[test]
    fn constant_series_collapses_bands() {
        let bands = calculate_bollinger_bands(&[3.0; 5], 3, 2.0).unwrap();
        assert_eq!(bands.upper[4], 3.0);
        assert_eq!(bands.lower[4], 3.0);
    }

    #[test]
    fn negative_multiplier_is_rejected() {
        assert!(calculate_bollinger_bands(&[1.0, 2.0], 1, -1.0).is_err());
    }
}
