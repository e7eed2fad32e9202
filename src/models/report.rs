use std::path::PathBuf;

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use crate::error::NmscanError;

use super::record::FolderRecord;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScanError {
    pub path: PathBuf,
    pub error_type: ScanErrorType,
    pub message: String,
}

impl ScanError {
    pub fn from_io(path: PathBuf, err: &std::io::Error) -> Self {
        Self {
            path,
            error_type: ScanErrorType::from(err.kind()),
            message: err.to_string(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ScanErrorType {
    PermissionDenied,
    NotFound,
    SymlinkCycle,
    IoError,
    Other,
}

impl From<std::io::ErrorKind> for ScanErrorType {
    fn from(kind: std::io::ErrorKind) -> Self {
        match kind {
            std::io::ErrorKind::PermissionDenied => ScanErrorType::PermissionDenied,
            std::io::ErrorKind::NotFound => ScanErrorType::NotFound,
            _ => ScanErrorType::IoError,
        }
    }
}

/// Output of a directory walk: module paths in discovery order.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Discovery {
    pub root: PathBuf,
    pub modules: Vec<PathBuf>,
    pub dirs_scanned: usize,
    pub errors: Vec<ScanError>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ScanReport {
    pub records: Vec<FolderRecord>,
    pub total_size: u64,
    pub errors: Vec<ScanError>,
}

impl ScanReport {
    pub fn new(records: Vec<FolderRecord>, errors: Vec<ScanError>) -> Self {
        let total_size = records.iter().map(|r| r.size).sum();
        Self {
            records,
            total_size,
            errors,
        }
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeletionPolicy {
    pub enabled: bool,
    pub threshold_days: u32,
}

impl DeletionPolicy {
    pub fn new(threshold_days: u32) -> Result<Self, NmscanError> {
        if threshold_days == 0 {
            return Err(NmscanError::InvalidThreshold);
        }
        Ok(Self {
            enabled: true,
            threshold_days,
        })
    }

    pub fn disabled() -> Self {
        Self {
            enabled: false,
            threshold_days: 0,
        }
    }

    /// `now` minus the threshold, or `None` when that falls before the
    /// earliest representable time and so nothing can be older.
    pub fn cutoff(&self, now: DateTime<Utc>) -> Option<DateTime<Utc>> {
        now.checked_sub_signed(Duration::days(i64::from(self.threshold_days)))
    }

    /// Split `report` into `(keep, to_delete)` relative to `now`.
    ///
    /// A record is selected only when its project directory was last touched
    /// strictly before the cutoff. Non-fatal errors stay with `keep`.
    pub fn partition(&self, report: ScanReport, now: DateTime<Utc>) -> (ScanReport, ScanReport) {
        if !self.enabled {
            return (report, ScanReport::default());
        }

        let Some(cutoff) = self.cutoff(now) else {
            return (report, ScanReport::default());
        };
        let (to_delete, keep): (Vec<_>, Vec<_>) = report
            .records
            .into_iter()
            .partition(|r| r.last_modified < cutoff);

        (
            ScanReport::new(keep, report.errors),
            ScanReport::new(to_delete, Vec::new()),
        )
    }

    pub fn apply(&self, report: ScanReport) -> (ScanReport, ScanReport) {
        self.partition(report, Utc::now())
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DeletionOutcome {
    pub deleted: Vec<FolderRecord>,
    pub failed: Vec<ScanError>,
    pub dry_run: bool,
}

impl DeletionOutcome {
    pub fn deleted_count(&self) -> usize {
        self.deleted.len()
    }

    pub fn cleaned_size(&self) -> u64 {
        self.deleted.iter().map(|r| r.size).sum()
    }
}
