use std::fs::File;
use std::io::{self, BufReader};

use anyhow::{Context, Result};
use clap::Parser;

use market_compute::{Cli, run_stream};

fn main() -> Result<()> {
    // A. Init Logging (stderr; stdout carries responses)
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    // B. Parse Args
    let args = Cli::parse();
    #[cfg(debug_assertions)]
    log::info!("Parsed arguments: {:?}", args);

    let config = args.engine_config();
    let stdout = io::stdout().lock();

    // C. Run
    match &args.input {
        Some(path) => {
            let file = File::open(path)
                .with_context(|| format!("Failed to open request file {}", path.display()))?;
            run_stream(config, BufReader::new(file), stdout)
        }
        None => run_stream(config, io::stdin().lock(), stdout),
    }
}
