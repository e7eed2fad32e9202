use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::{Duration, Instant};

use crate::config::settings::Settings;
use crate::error::NmscanError;
use crate::models::report::{Discovery, ScanError, ScanErrorType};

use super::events::{report_error, Event, EventSender};
use super::progress::ProgressTracker;

pub const NODE_MODULES: &str = "node_modules";

const PROGRESS_INTERVAL: Duration = Duration::from_millis(100);

pub struct Scanner {
    event_tx: EventSender,
    progress: Arc<ProgressTracker>,
    settings: Arc<Settings>,
}

impl Scanner {
    pub fn new(settings: Settings, event_tx: EventSender) -> Self {
        Self::with_progress(settings, event_tx, Arc::new(ProgressTracker::new()))
    }

    pub fn with_progress(
        settings: Settings,
        event_tx: EventSender,
        progress: Arc<ProgressTracker>,
    ) -> Self {
        Self {
            event_tx,
            progress,
            settings: Arc::new(settings),
        }
    }

    pub fn progress(&self) -> &Arc<ProgressTracker> {
        &self.progress
    }

    /// Find every `node_modules` directory below `root` that is not itself
    /// inside another `node_modules`.
    ///
    /// Only an unusable root is fatal. Subdirectories that cannot be listed
    /// end up in [`Discovery::errors`] and the walk carries on.
    pub async fn scan(&self, root: PathBuf) -> Result<Discovery, NmscanError> {
        let metadata = match tokio::fs::metadata(&root).await {
            Ok(meta) => meta,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Err(NmscanError::RootNotFound(root));
            }
            Err(e) => return Err(e.into()),
        };
        if !metadata.is_dir() {
            return Err(NmscanError::NotADirectory(root));
        }

        tracing::debug!(root = %root.display(), "starting scan");
        let _ = self.event_tx.send(Event::ScanStarted { path: root.clone() });

        let settings = Arc::clone(&self.settings);
        let progress = Arc::clone(&self.progress);
        let event_tx = self.event_tx.clone();
        let discovery =
            tokio::task::spawn_blocking(move || walk(root, &settings, &progress, &event_tx))
                .await?;

        let _ = self.event_tx.send(Event::ScanCompleted {
            modules_found: discovery.modules.len(),
            dirs_scanned: discovery.dirs_scanned,
            duration_ms: self.progress.elapsed().as_millis() as u64,
        });

        Ok(discovery)
    }
}

struct Pending {
    path: PathBuf,
    depth: usize,
}

/// Subdirectories of one directory, split into its `node_modules` (if any)
/// and everything else.
struct Listing {
    node_modules: Option<PathBuf>,
    subdirs: Vec<PathBuf>,
    errors: Vec<ScanError>,
}

fn walk(
    root: PathBuf,
    settings: &Settings,
    progress: &ProgressTracker,
    event_tx: &EventSender,
) -> Discovery {
    let mut modules = Vec::new();
    let mut errors = Vec::new();
    let mut dirs_scanned = 0;
    let mut visited: HashSet<PathBuf> = HashSet::new();
    let mut last_progress: Option<Instant> = None;
    // A root that is itself a node_modules is walked, never reported from
    let root_is_module = root.file_name().map_or(false, |name| name == NODE_MODULES);

    let record = |error: ScanError, errors: &mut Vec<ScanError>| {
        report_error(event_tx, progress, &error);
        errors.push(error);
    };

    let mut stack = vec![Pending {
        path: root.clone(),
        depth: 0,
    }];

    while let Some(Pending { path, depth }) = stack.pop() {
        if settings.follow_symlinks {
            match std::fs::canonicalize(&path) {
                Ok(real) => {
                    if !visited.insert(real) {
                        record(
                            ScanError {
                                message: format!("Symlink cycle detected: {}", path.display()),
                                path,
                                error_type: ScanErrorType::SymlinkCycle,
                            },
                            &mut errors,
                        );
                        continue;
                    }
                }
                Err(e) => {
                    record(ScanError::from_io(path, &e), &mut errors);
                    continue;
                }
            }
        }

        dirs_scanned += 1;
        progress.increment_dirs();

        let listing = match list_subdirs(&path, settings.follow_symlinks) {
            Ok(listing) => listing,
            Err(e) => {
                record(ScanError::from_io(path, &e), &mut errors);
                continue;
            }
        };

        for error in listing.errors {
            record(error, &mut errors);
        }

        let module = listing
            .node_modules
            .filter(|_| !(depth == 0 && root_is_module));
        if let Some(module) = module {
            let duplicate = settings.follow_symlinks
                && std::fs::canonicalize(&module)
                    .map(|real| !visited.insert(real))
                    .unwrap_or(false);
            if !duplicate {
                tracing::debug!(path = %module.display(), "found node_modules");
                progress.increment_modules();
                let _ = event_tx.send(Event::ModuleFound {
                    path: module.clone(),
                });
                modules.push(module);
            }
        }

        let descend = settings.max_depth.map_or(true, |max| depth < max);
        if descend {
            // Reverse so the lexically first child is popped first
            for child in listing.subdirs.into_iter().rev() {
                stack.push(Pending {
                    path: child,
                    depth: depth + 1,
                });
            }
        }

        if last_progress.map_or(true, |t| t.elapsed() >= PROGRESS_INTERVAL) {
            last_progress = Some(Instant::now());
            let _ = event_tx.send(Event::Progress {
                dirs_scanned,
                modules_found: modules.len(),
                current_path: path,
            });
        }
    }

    Discovery {
        root,
        modules,
        dirs_scanned,
        errors,
    }
}

/// Read the immediate subdirectories of `dir`. Entry-level failures are
/// collected; failing to open `dir` itself is returned as the error.
fn list_subdirs(dir: &Path, follow_symlinks: bool) -> std::io::Result<Listing> {
    let mut listing = Listing {
        node_modules: None,
        subdirs: Vec::new(),
        errors: Vec::new(),
    };

    for entry_result in std::fs::read_dir(dir)? {
        let entry = match entry_result {
            Ok(entry) => entry,
            Err(e) => {
                listing.errors.push(ScanError::from_io(dir.to_path_buf(), &e));
                continue;
            }
        };

        let file_type = match entry.file_type() {
            Ok(ft) => ft,
            Err(e) => {
                listing.errors.push(ScanError::from_io(entry.path(), &e));
                continue;
            }
        };

        let is_dir = if file_type.is_dir() {
            true
        } else if file_type.is_symlink() && follow_symlinks {
            std::fs::metadata(entry.path())
                .map(|m| m.is_dir())
                .unwrap_or(false)
        } else {
            false
        };
        if !is_dir {
            continue;
        }

        if entry.file_name() == NODE_MODULES {
            listing.node_modules = Some(entry.path());
        } else {
            listing.subdirs.push(entry.path());
        }
    }

    listing.subdirs.sort();
    Ok(listing)
}
