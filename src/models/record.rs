use std::path::PathBuf;

use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};

/// A discovered `node_modules` folder with its size and project age.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FolderRecord {
    pub path: PathBuf,
    pub size: u64,
    /// Modification time of the directory *containing* `node_modules`.
    pub last_modified: DateTime<Utc>,
}

impl FolderRecord {
    pub fn new(path: PathBuf, size: u64, last_modified: DateTime<Utc>) -> Self {
        Self {
            path,
            size,
            last_modified,
        }
    }

    pub fn human_readable_size(&self) -> String {
        human_readable_size(self.size)
    }

    pub fn last_modified_iso(&self) -> String {
        self.last_modified
            .to_rfc3339_opts(SecondsFormat::Millis, true)
    }
}

/// Binary-scaled size with two decimals, e.g. `1.50 KB`.
pub fn human_readable_size(bytes: u64) -> String {
    const UNITS: [&str; 5] = ["B", "KB", "MB", "GB", "TB"];

    let mut size = bytes as f64;
    let mut unit = 0;
    while size >= 1024.0 && unit < UNITS.len() - 1 {
        size /= 1024.0;
        unit += 1;
    }

    format!("{:.2} {}", size, UNITS[unit])
}
