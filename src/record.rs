//! Append-only CSV match log.

use std::fs::OpenOptions;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use chrono::Local;

/// Persists one line per reported match:
///
/// `YYYY-MM-DD HH:MM:SS,<tier label>,<address>,<private key>,<generated count>`
///
/// Append-only by design; no rotation or compaction. The file is opened per
/// append so an operator can rotate it externally without restarting.
#[derive(Debug)]
pub struct MatchLog {
    path: PathBuf,
}

impl MatchLog {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Appends one match record.
    pub fn append(
        &self,
        tier: &str,
        address: &str,
        private_key: &str,
        generated: u64,
    ) -> io::Result<()> {
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)?;
        let timestamp = Local::now().format("%Y-%m-%d %H:%M:%S");
        writeln!(file, "{timestamp},{tier},{address},{private_key},{generated}")
    }
}
