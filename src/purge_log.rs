use std::fs::OpenOptions;
use std::io::Write;
use std::path::{Path, PathBuf};

use chrono::NaiveDateTime;

use crate::telemetry::spawn_blocking_with_tracing;

const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Append-only plain-text record of executed purges, one line per run.
#[derive(Debug, Clone)]
pub struct PurgeLog {
    path: PathBuf,
}

impl PurgeLog {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Appends the entry for a purge that ran at local time `at`, creating the file if needed.
    #[tracing::instrument(skip(self), fields(path = %self.path.display()))]
    pub async fn append(&self, at: NaiveDateTime, deleted: u64) -> std::io::Result<()> {
        let path = self.path.clone();
        let line = format_entry(at, deleted);

        spawn_blocking_with_tracing(move || {
            let mut file = OpenOptions::new().create(true).append(true).open(path)?;
            writeln!(file, "{line}")
        })
        .await
        .map_err(std::io::Error::other)?
    }
}

pub fn format_entry(at: NaiveDateTime, deleted: u64) -> String {
    format!(
        "{} - Deleted {deleted} inactive customers",
        at.format(TIMESTAMP_FORMAT)
    )
}
