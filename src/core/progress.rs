use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};
use std::time::{Duration, Instant};

pub struct ProgressTracker {
    pub dirs_scanned: AtomicUsize,
    pub modules_found: AtomicUsize,
    pub modules_probed: AtomicUsize,
    pub files_probed: AtomicUsize,
    pub bytes_probed: AtomicU64,
    pub errors_count: AtomicUsize,
    pub start_time: Instant,
}

impl Default for ProgressTracker {
    fn default() -> Self {
        Self::new()
    }
}

impl ProgressTracker {
    pub fn new() -> Self {
        Self {
            dirs_scanned: AtomicUsize::new(0),
            modules_found: AtomicUsize::new(0),
            modules_probed: AtomicUsize::new(0),
            files_probed: AtomicUsize::new(0),
            bytes_probed: AtomicU64::new(0),
            errors_count: AtomicUsize::new(0),
            start_time: Instant::now(),
        }
    }

    pub fn increment_dirs(&self) {
        self.dirs_scanned.fetch_add(1, Ordering::Relaxed);
    }

    pub fn increment_modules(&self) {
        self.modules_found.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_probe(&self, files: usize, bytes: u64) {
        self.modules_probed.fetch_add(1, Ordering::Relaxed);
        self.files_probed.fetch_add(files, Ordering::Relaxed);
        self.bytes_probed.fetch_add(bytes, Ordering::Relaxed);
    }

    pub fn add_errors(&self, count: usize) {
        self.errors_count.fetch_add(count, Ordering::Relaxed);
    }

    pub fn elapsed(&self) -> Duration {
        self.start_time.elapsed()
    }

    pub fn snapshot(&self) -> ProgressSnapshot {
        ProgressSnapshot {
            dirs_scanned: self.dirs_scanned.load(Ordering::Relaxed),
            modules_found: self.modules_found.load(Ordering::Relaxed),
            modules_probed: self.modules_probed.load(Ordering::Relaxed),
            files_probed: self.files_probed.load(Ordering::Relaxed),
            bytes_probed: self.bytes_probed.load(Ordering::Relaxed),
            errors_count: self.errors_count.load(Ordering::Relaxed),
            elapsed: self.elapsed(),
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct ProgressSnapshot {
    pub dirs_scanned: usize,
    pub modules_found: usize,
    pub modules_probed: usize,
    pub files_probed: usize,
    pub bytes_probed: u64,
    pub errors_count: usize,
    pub elapsed: Duration,
}
