use anyhow::{Context, Result, anyhow, bail};
use itertools::Itertools;

use super::cancel::CancelToken;
#[cfg(debug_assertions)]
use crate::config::debug::PRINT_AGGREGATED_BARS;
use crate::domain::{OhlcvBar, PricePoint};
use crate::utils::maths_utils::get_min_max;
#[cfg(debug_assertions)]
use crate::utils::time_utils::{TimeUtils, epoch_ms_to_utc};

/// Start of the bucket containing `timestamp_ms`, floored toward negative infinity.
pub fn bucket_start(timestamp_ms: i64, interval_ms: i64) -> Result<i64> {
    let offset = timestamp_ms.rem_euclid(interval_ms);
    timestamp_ms.checked_sub(offset).ok_or_else(|| {
        anyhow!(
            "timestamp {} has no representable bucket for interval {}",
            timestamp_ms,
            interval_ms
        )
    })
}

/// Group price samples into fixed-width OHLCV bars.
///
/// Samples may arrive in any order. Within a bucket `open`/`close` are the first
/// and last samples in input order, `high`/`low` the extremes and `volume` the
/// sum. Bars come out sorted by bucket start.
pub fn aggregate_price_data(
    prices: &[PricePoint],
    interval_ms: i64,
    cancel: &CancelToken,
    check_every: usize,
) -> Result<Vec<OhlcvBar>> {
    if interval_ms <= 0 {
        bail!("aggregation interval must be > 0 (got {})", interval_ms);
    }
    let check_every = check_every.max(1);

    let mut keyed = Vec::with_capacity(prices.len());
    for (i, point) in prices.iter().enumerate() {
        if i % check_every == 0 {
            cancel.check()?;
        }
        point
            .validate()
            .with_context(|| format!("invalid price point at index {}", i))?;
        keyed.push((bucket_start(point.timestamp, interval_ms)?, point));
    }

    let bars: Vec<OhlcvBar> = keyed
        .into_iter()
        .into_group_map()
        .into_iter()
        .sorted_by_key(|(bucket, _)| *bucket)
        .filter_map(|(bucket, points)| build_bar(bucket, &points))
        .collect();

    #[cfg(debug_assertions)]
    if PRINT_AGGREGATED_BARS {
        log::info!(
            "Aggregated {} samples into {} x {} bars",
            prices.len(),
            bars.len(),
            TimeUtils::interval_to_string(interval_ms)
        );
        for bar in &bars {
            log::info!("  {} {:?}", epoch_ms_to_utc(bar.timestamp), bar);
        }
    }

    Ok(bars)
}

// `points` is in input order
fn build_bar(bucket: i64, points: &[&PricePoint]) -> Option<OhlcvBar> {
    let (first, last) = (points.first()?, points.last()?);
    let prices: Vec<f64> = points.iter().map(|p| p.price).collect();
    let (low, high) = get_min_max(&prices);
    let volume = points.iter().map(|p| p.volume).sum();

    let bar = OhlcvBar::new(bucket, first.price, high, low, last.price, volume);
    debug_assert!(bar.is_consistent());
    Some(bar)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn aggregate(prices: &[PricePoint], interval: i64) -> Vec<OhlcvBar> {
        aggregate_price_data(prices, interval, &CancelToken::new(), 2).unwrap()
    }

    #[test]
    fn two_buckets() {
        let prices = [
            PricePoint::new(0, 10.0, 1.0),
            PricePoint::new(5, 12.0, 2.0),
            PricePoint::new(11, 9.0, 1.0),
        ];
        let bars = aggregate(&prices, 10);
        assert_eq!(
            bars,
            vec![
                OhlcvBar::new(0, 10.0, 12.0, 10.0, 12.0, 3.0),
                OhlcvBar::new(10, 9.0, 9.0, 9.0, 9.0, 1.0),
            ]
        );
    }

    #[test]
    fn unsorted_input_keeps_insertion_order_within_bucket() {
        let prices = [
            PricePoint::new(25, 7.0, 1.0),
            PricePoint::new(3, 4.0, 1.0),
            PricePoint::new(21, 8.0, 1.0),
            PricePoint::new(1, 5.0, 1.0),
            PricePoint::new(29, 6.5, 1.0),
        ];
        let bars = aggregate(&prices, 10);
        assert_eq!(bars.len(), 2);
        assert_eq!(bars[0], OhlcvBar::new(0, 4.0, 5.0, 4.0, 5.0, 2.0));
        assert_eq!(bars[1], OhlcvBar::new(20, 7.0, 8.0, 6.5, 6.5, 3.0));
    }

    #[test]
    fn volume_is_conserved() {
        let prices: Vec<PricePoint> = (0..1_000)
            .map(|i| PricePoint::new((i * 37) % 5_000, 100.0 + (i % 13) as f64, (i % 5) as f64 * 0.5))
            .collect();
        let bars = aggregate(&prices, 60);
        let input: f64 = prices.iter().map(|p| p.volume).sum();
        let output: f64 = bars.iter().map(|b| b.volume).sum();
        assert!((input - output).abs() < 1e-9);
        assert!(bars.iter().all(OhlcvBar::is_consistent));
        assert!(bars.windows(2).all(|w| w[0].timestamp < w[1].timestamp));
    }

    #[test]
    fn empty_and_single_point() {
        assert!(aggregate(&[], 10).is_empty());
        let bars = aggregate(&[PricePoint::new(42, 3.5, 0.25)], 10);
        assert_eq!(bars, vec![OhlcvBar::new(40, 3.5, 3.5, 3.5, 3.5, 0.25)]);
    }

    #[test]
    fn negative_timestamps_floor_downwards() {
        assert_eq!(bucket_start(-1, 10).unwrap(), -10);
        assert_eq!(bucket_start(-10, 10).unwrap(), -10);
        assert!(bucket_start(i64::MIN + 1, 10).is_err());
    }

    #[test]
    fn bad_arguments_are_rejected() {
        let token = CancelToken::new();
        assert!(aggregate_price_data(&[], 0, &token, 1).is_err());
        let bad = [PricePoint::new(0, 1.0, -1.0)];
        let err = aggregate_price_data(&bad, 10, &token, 1).unwrap_err();
        assert!(format!("{:#}", err).contains("index 0"));
    }
}
