use anyhow::{Result, bail};

/// RSI (Relative Strength Index) with Wilder smoothing of the average gain/loss.
///
/// The seed averages are the plain means of the first `period` deltas, so the
/// first defined value sits at index `period`. When the average loss is zero the
/// ratio is undefined: a series that only rose reads 100, a flat one reads 50.
pub fn calculate_rsi(data: &[f64], period: usize) -> Result<Vec<f64>> {
    if period == 0 {
        bail!("RSI period must be >= 1");
    }

    let mut output = vec![f64::NAN; data.len()];
    // Needs period + 1 samples; `<=` keeps usize::MAX from overflowing
    if data.len() <= period {
        return Ok(output);
    }

    let (mut gains, mut losses) = (0.0, 0.0);
    for pair in data[..=period].windows(2) {
        let delta = pair[1] - pair[0];
        if delta > 0.0 {
            gains += delta;
        } else {
            losses -= delta;
        }
    }

    let w = period as f64;
    let mut avg_gain = gains / w;
    let mut avg_loss = losses / w;
    output[period] = rsi_from_averages(avg_gain, avg_loss);

    for i in (period + 1)..data.len() {
        let delta = data[i] - data[i - 1];
        let gain = delta.max(0.0);
        let loss = (-delta).max(0.0);
        avg_gain = (avg_gain * (w - 1.0) + gain) / w;
        avg_loss = (avg_loss * (w - 1.0) + loss) / w;
        output[i] = rsi_from_averages(avg_gain, avg_loss);
    }

    Ok(output)
}

fn rsi_from_averages(avg_gain: f64, avg_loss: f64) -> f64 {
    if avg_loss == 0.0 {
        if avg_gain == 0.0 { 50.0 } else { 100.0 }
    } else {
        let rs = avg_gain / avg_loss;
        100.0 - 100.0 / (1.0 + rs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn short_series_is_all_missing() {
        let rsi = calculate_rsi(&[1.0, 2.0, 3.0], 3).unwrap();
        assert_eq!(rsi.len(), 3);
        assert!(rsi.iter().all(|v| v.is_nan()));
    }

    #[test]
    fn huge_period_is_all_missing() {
        let rsi = calculate_rsi(&[1.0, 2.0, 3.0], usize::MAX).unwrap();
        assert_eq!(rsi.len(), 3);
        assert!(rsi.iter().all(|v| v.is_nan()));
    }

    #[test]
    fn first_value_at_period_index() {
        // deltas: +1, -1, +2  => gains 3, losses 1 over period 3
        let rsi = calculate_rsi(&[10.0, 11.0, 10.0, 12.0, 11.0], 3).unwrap();
        assert!(rsi[..3].iter().all(|v| v.is_nan()));
        assert!((rsi[3] - 75.0).abs() < 1e-12);

        // next delta -1: avg_gain = (1*2 + 0)/3, avg_loss = (1/3*2 + 1)/3
        let avg_gain = 2.0 / 3.0;
        let avg_loss = (2.0 / 3.0 + 1.0) / 3.0;
        let expected = 100.0 - 100.0 / (1.0 + avg_gain / avg_loss);
        assert!((rsi[4] - expected).abs() < 1e-12);
    }

    #[test]
    fn one_sided_series_resolves_without_nan() {
        let rising: Vec<f64> = (0..30).map(|i| i as f64).collect();
        let rsi = calculate_rsi(&rising, 14).unwrap();
        assert!(rsi[14..].iter().all(|&v| v == 100.0));

        let flat = vec![5.0; 30];
        let rsi = calculate_rsi(&flat, 14).unwrap();
        assert!(rsi[14..].iter().all(|&v| v == 50.0));

        let falling: Vec<f64> = (0..30).map(|i| 100.0 - i as f64).collect();
        let rsi = calculate_rsi(&falling, 14).unwrap();
        assert!(rsi[14..].iter().all(|&v| v == 0.0));
    }

    #[test]
    fn defined_values_stay_in_range() {
        let prices: Vec<f64> = (0..500)
            .map(|i| 100.0 + ((i as f64) * 0.7).sin() * 12.0 + ((i * 31) % 17) as f64 * 0.3)
            .collect();
        let rsi = calculate_rsi(&prices, 14).unwrap();
        assert_eq!(rsi.len(), prices.len());
        for v in rsi.iter().skip(14) {
            assert!((0.0..=100.0).contains(v), "rsi out of range: {v}");
        }
    }
}
