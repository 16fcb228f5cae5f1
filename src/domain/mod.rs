// Domain types and value objects
pub mod ohlcv_bar;
pub mod price_point;

use std::sync::Arc;

// Re-export commonly used types
pub use ohlcv_bar::OhlcvBar;
pub use price_point::PricePoint;

/// A numeric series shared between the caller and the engine without copying.
/// The engine only ever reads through it and writes results into fresh vectors.
pub type SharedSeries = Arc<[f64]>;
