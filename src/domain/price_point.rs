use anyhow::{Result, bail};
use serde::{Deserialize, Serialize};

/// A single price/volume sample.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq)]
pub struct PricePoint {
    /// Epoch milliseconds
    #[serde(alias = "t")]
    pub timestamp: i64,
    #[serde(alias = "p")]
    pub price: f64,
    #[serde(alias = "v")]
    pub volume: f64,
}

impl PricePoint {
    pub fn new(timestamp: i64, price: f64, volume: f64) -> Self {
        Self {
            timestamp,
            price,
            volume,
        }
    }

    /// Rejects samples that would break the bar invariants downstream.
    pub fn validate(&self) -> Result<()> {
        if !self.price.is_finite() {
            bail!(
                "price at timestamp {} is not finite ({})",
                self.timestamp,
                self.price
            );
        }
        if !self.volume.is_finite() || self.volume < 0.0 {
            bail!(
                "volume at timestamp {} must be a finite value >= 0 (got {})",
                self.timestamp,
                self.volume
            );
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_short_field_names() {
        let p: PricePoint = serde_json::from_str(r#"{"t":5,"p":12.0,"v":2.0}"#).unwrap();
        assert_eq!(p, PricePoint::new(5, 12.0, 2.0));
    }

    #[test]
    fn rejects_negative_volume_and_nan_price() {
        assert!(PricePoint::new(0, 1.0, -0.5).validate().is_err());
        assert!(PricePoint::new(0, f64::NAN, 1.0).validate().is_err());
        assert!(PricePoint::new(0, 1.0, 0.0).validate().is_ok());
    }
}
