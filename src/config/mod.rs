//! Configuration module for the computation engine.

pub mod debug;
pub mod engine;

// Re-export commonly used items
pub use engine::{ENGINE, EngineConfig, IndicatorDefaults, ScanSettings, SortSettings};
