// Pure computation kernels. No I/O and no state kept between calls.
pub mod aggregate;
pub mod cancel;
pub mod comparator;
pub mod filter;
pub mod indicators;
pub mod predicate;
pub mod sort;

// Re-export commonly used types
pub use aggregate::aggregate_price_data;
pub use cancel::{CancelToken, Cancelled};
pub use comparator::ComparatorSpec;
pub use filter::filter_items;
pub use indicators::{BollingerBands, calculate_bollinger_bands, calculate_ma, calculate_rsi};
pub use predicate::PredicateSpec;
pub use sort::sort_large;
