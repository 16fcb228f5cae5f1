// Core modules
pub mod config;
pub mod domain;
pub mod kernel;
pub mod utils;

// The engine
pub mod engine;

use std::io::{BufRead, Write};
use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};

// Re-export commonly used types
pub use config::{ENGINE, EngineConfig};
pub use domain::{OhlcvBar, PricePoint, SharedSeries};
pub use engine::{ComputeEngine, Dispatcher, Task, TaskKind, TaskRequest, TaskResponse};
pub use kernel::CancelToken;

#[cfg(debug_assertions)]
use config::debug::PRINT_RAW_REQUESTS;

// CLI argument parsing
use clap::Parser;

#[derive(Parser, Debug, Clone)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Read newline-delimited JSON requests from this file instead of stdin
    #[arg(long)]
    pub input: Option<PathBuf>,

    /// Sort chunks of large arrays on all cores
    #[arg(long, default_value_t = false)]
    pub parallel_chunks: bool,

    /// Arrays shorter than this are sorted in a single pass
    #[arg(long)]
    pub sort_threshold: Option<usize>,

    /// Chunk size for the chunked sort
    #[arg(long)]
    pub chunk_size: Option<usize>,

    /// Also write interim progress responses
    #[arg(long, default_value_t = false)]
    pub progress: bool,
}

impl Cli {
    /// The compiled-in defaults with any command-line overrides applied.
    pub fn engine_config(&self) -> EngineConfig {
        let mut config = ENGINE.clone();
        config.emit_progress = self.progress;
        config.sort.parallel_chunks = self.parallel_chunks;
        if let Some(threshold) = self.sort_threshold {
            config.sort.direct_sort_threshold = threshold;
        }
        if let Some(chunk_size) = self.chunk_size {
            config.sort.chunk_size = chunk_size;
        }
        config
    }
}

const POLL_INTERVAL: Duration = Duration::from_millis(50);

/// Feed newline-delimited JSON requests through an engine and write one JSON
/// response per line. Returns once every request has its terminal response.
pub fn run_stream(config: EngineConfig, input: impl BufRead, mut output: impl Write) -> Result<()> {
    let mut engine = ComputeEngine::new(config)?;
    let mut lines = 0usize;

    for line in input.lines() {
        let line = line.context("Failed to read request line")?;
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        lines += 1;

        #[cfg(debug_assertions)]
        if PRINT_RAW_REQUESTS {
            log::info!("request: {}", line);
        }

        match serde_json::from_str(line) {
            Ok(message) => {
                engine.submit_message(message);
            }
            Err(e) => {
                log::warn!("Line {} is not valid JSON: {}", lines, e);
                let response = TaskResponse::error("", format!("Malformed task message: {}", e));
                write_response(&mut output, &response)?;
            }
        }

        while let Some(response) = engine.try_recv() {
            write_response(&mut output, &response)?;
        }
    }

    while !engine.is_idle() {
        if let Some(response) = engine.recv_timeout(POLL_INTERVAL) {
            write_response(&mut output, &response)?;
        }
    }

    log::info!("Processed {} request lines", lines);
    Ok(())
}

fn write_response(output: &mut impl Write, response: &TaskResponse) -> Result<()> {
    serde_json::to_writer(&mut *output, response).context("Failed to serialize response")?;
    writeln!(output)?;
    output.flush()?;
    Ok(())
}
