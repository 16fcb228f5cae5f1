use serde::{Deserialize, Serialize};

// An aggregated bar for one time bucket
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq)]
pub struct OhlcvBar {
    /// Bucket start, epoch milliseconds
    pub timestamp: i64,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: f64,
}

impl OhlcvBar {
    pub fn new(timestamp: i64, open: f64, high: f64, low: f64, close: f64, volume: f64) -> Self {
        OhlcvBar {
            timestamp,
            open,
            high,
            low,
            close,
            volume,
        }
    }

    // Returns the low and high of the bar body as a tuple
    pub fn body_range(&self) -> (f64, f64) {
        if self.close >= self.open {
            (self.open, self.close)
        } else {
            (self.close, self.open)
        }
    }

    /// `low <= open, close <= high` and a non-negative volume.
    pub fn is_consistent(&self) -> bool {
        let (body_low, body_high) = self.body_range();
        self.low <= body_low && body_high <= self.high && self.volume >= 0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn body_range_orders_open_and_close() {
        let bearish = OhlcvBar::new(0, 12.0, 13.0, 9.0, 10.0, 1.0);
        assert_eq!(bearish.body_range(), (10.0, 12.0));
        assert!(bearish.is_consistent());
    }

    #[test]
    fn wick_inside_body_is_inconsistent() {
        let broken = OhlcvBar::new(0, 10.0, 11.0, 10.5, 11.0, 1.0);
        assert!(!broken.is_consistent());
    }
}
