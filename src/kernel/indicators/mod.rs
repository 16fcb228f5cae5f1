// Indicator calculators over whole series. Missing outputs are `f64::NAN`.
pub mod bollinger;
pub mod ma;
pub mod rsi;

pub use bollinger::{BollingerBands, calculate_bollinger_bands};
pub use ma::calculate_ma;
pub use rsi::calculate_rsi;
