//! Runtime configuration for the wallet matcher.

use std::path::PathBuf;

use clap::Parser;

/// Ethereum Vanity Wallet Matcher
#[derive(Parser, Debug, Clone)]
#[command(author, version, about, long_about = None)]
pub struct Config {
    /// Number of worker threads (default: number of CPU cores)
    #[arg(short = 'w', long)]
    pub workers: Option<usize>,

    /// Emit a progress report every N generated candidates
    #[arg(short = 'i', long, default_value = "2000")]
    pub progress_interval: u64,

    /// Append-only CSV file for match records
    #[arg(short = 'm', long, default_value = "match_log.csv")]
    pub match_log: PathBuf,

    /// Listen address for the liveness endpoint
    #[arg(short = 'l', long, default_value = "0.0.0.0:10000")]
    pub listen: String,

    /// Disable the liveness endpoint
    #[arg(long, default_value = "false")]
    pub no_liveness: bool,
}

impl Config {
    /// Returns the number of workers, defaulting to CPU count.
    pub fn worker_count(&self) -> usize {
        self.workers.unwrap_or_else(num_cpus::get)
    }

    /// Validates the configuration.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.worker_count() == 0 {
            return Err(ConfigError::NoWorkers);
        }
        if self.progress_interval == 0 {
            return Err(ConfigError::ZeroProgressInterval);
        }
        Ok(())
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("worker count must be at least 1")]
    NoWorkers,
    #[error("progress interval must be at least 1")]
    ZeroProgressInterval,
}
