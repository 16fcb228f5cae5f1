//! Computation engine configuration

/// Settings for the chunked sort/merge
#[derive(Debug, Clone, PartialEq)]
pub struct SortSettings {
    // Inputs shorter than this are sorted in a single pass
    pub direct_sort_threshold: usize,
    // Items per chunk above the threshold (last chunk may be smaller)
    pub chunk_size: usize,
    // Sort chunks on the rayon pool. The merge is always sequential.
    pub parallel_chunks: bool,
    // Merge steps between cancellation checks / progress reports
    pub merge_check_every: usize,
}

/// Defaults applied when a request omits an optional indicator parameter
#[derive(Debug, Clone, PartialEq)]
pub struct IndicatorDefaults {
    pub rsi_period: usize,
    pub bollinger_period: usize,
    pub bollinger_std_dev: f64,
}

/// Settings for the linear-scan kernels (filter, aggregation)
#[derive(Debug, Clone, PartialEq)]
pub struct ScanSettings {
    // Items between cancellation checks
    pub check_every: usize,
}

/// The Master Engine Configuration
#[derive(Debug, Clone, PartialEq)]
pub struct EngineConfig {
    // Emit interim `progress` responses for tasks that report them
    pub emit_progress: bool,

    // Sub-groups
    pub sort: SortSettings,
    pub indicators: IndicatorDefaults,
    pub scan: ScanSettings,
}

pub const ENGINE: EngineConfig = EngineConfig {
    emit_progress: true,

    sort: SortSettings {
        direct_sort_threshold: 100_000,
        chunk_size: 10_000,
        parallel_chunks: false,
        merge_check_every: 65_536,
    },

    indicators: IndicatorDefaults {
        rsi_period: 14,
        bollinger_period: 20,
        bollinger_std_dev: 2.0,
    },

    scan: ScanSettings { check_every: 65_536 },
};

impl Default for EngineConfig {
    fn default() -> Self {
        ENGINE.clone()
    }
}
