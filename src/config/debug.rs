//! Debugging feature flags.
//!
//! Toggle individual diagnostics here; keep them `false` by default so debug
//! builds stay quiet unless a developer opts in.

/// Log every task as the worker picks it up and when it finishes (with timing).
pub const PRINT_TASK_LIFECYCLE: bool = false;

/// Log chunk counts and merge statistics for the chunked sort.
pub const PRINT_SORT_STATS: bool = false;

/// Log one line per bucket produced by the OHLCV aggregator.
pub const PRINT_AGGREGATED_BARS: bool = false;

/// Log the raw JSON of every request line read by the CLI.
pub const PRINT_RAW_REQUESTS: bool = false;
