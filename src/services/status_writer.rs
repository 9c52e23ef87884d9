//! Status writer - services layer
//!
//! Only knows how to append progress lines to the status file

use anyhow::Result;
use std::fs::OpenOptions;
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// Appends `(message, percent)` progress entries for the hosting framework
pub struct StatusWriter {
    status_file: PathBuf,
}

impl StatusWriter {
    pub fn new(status_file: impl Into<PathBuf>) -> Self {
        Self {
            status_file: status_file.into(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.status_file
    }

    /// Append one status line
    ///
    /// # Arguments
    /// - `message`: human readable status
    /// - `percent`: completion, 0 for fatal errors
    pub fn write(&self, message: &str, percent: u8) -> Result<()> {
        debug!("status {}%: {}", percent, message);

        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.status_file)?;

        let line = format!(
            "{}%\t{}\t{}\n",
            percent.min(100),
            message.replace(['\n', '\t'], " "),
            chrono::Utc::now().timestamp()
        );

        file.write_all(line.as_bytes())?;

        Ok(())
    }

    /// Write a status line; failures only produce a warning
    pub fn report(&self, message: &str, percent: u8) {
        if let Err(e) = self.write(message, percent) {
            warn!(
                "Unable to write status to {}: {}",
                self.status_file.display(),
                e
            );
        }
    }
}
