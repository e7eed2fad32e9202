use std::collections::HashSet;
use std::fs::Metadata;
use std::path::{Path, PathBuf};

use crate::config::settings::SizeMode;
use crate::models::report::{ScanError, ScanErrorType};

/// Bytes counted under one directory, plus whatever could not be read.
#[derive(Debug, Default)]
pub struct ProbeOutcome {
    pub size: u64,
    pub files: usize,
    pub errors: Vec<ScanError>,
}

/// Total size of all regular files below `path`.
///
/// Best effort: entries that vanish or cannot be read are recorded and
/// skipped, so `size` is a partial sum whenever `errors` is non-empty.
pub fn probe(path: &Path, mode: SizeMode, follow_symlinks: bool) -> ProbeOutcome {
    let mut outcome = ProbeOutcome::default();
    let mut visited: HashSet<PathBuf> = HashSet::new();
    let mut stack = vec![path.to_path_buf()];

    while let Some(dir) = stack.pop() {
        if follow_symlinks {
            match std::fs::canonicalize(&dir) {
                Ok(real) if !visited.insert(real.clone()) => {
                    outcome.errors.push(ScanError {
                        message: format!("Symlink cycle detected: {}", dir.display()),
                        path: dir,
                        error_type: ScanErrorType::SymlinkCycle,
                    });
                    continue;
                }
                Ok(_) => {}
                Err(e) => {
                    outcome.errors.push(ScanError::from_io(dir, &e));
                    continue;
                }
            }
        }

        let entries = match std::fs::read_dir(&dir) {
            Ok(entries) => entries,
            Err(e) => {
                outcome.errors.push(ScanError::from_io(dir, &e));
                continue;
            }
        };

        for entry_result in entries {
            let entry = match entry_result {
                Ok(entry) => entry,
                Err(e) => {
                    outcome.errors.push(ScanError::from_io(dir.clone(), &e));
                    continue;
                }
            };

            // DirEntry::metadata does not traverse symlinks
            let metadata = match entry.metadata() {
                Ok(meta) => meta,
                Err(e) => {
                    outcome.errors.push(ScanError::from_io(entry.path(), &e));
                    continue;
                }
            };
            let file_type = metadata.file_type();

            if file_type.is_symlink() {
                if !follow_symlinks {
                    continue;
                }
                let entry_path = entry.path();
                match std::fs::metadata(&entry_path) {
                    Ok(resolved) if resolved.is_dir() => stack.push(entry_path),
                    Ok(resolved) if resolved.is_file() => outcome.add_file(&resolved, mode),
                    Ok(_) => {}
                    Err(e) => outcome.errors.push(ScanError::from_io(entry_path, &e)),
                }
            } else if file_type.is_dir() {
                stack.push(entry.path());
            } else if file_type.is_file() {
                outcome.add_file(&metadata, mode);
            }
        }
    }

    outcome
}

impl ProbeOutcome {
    fn add_file(&mut self, metadata: &Metadata, mode: SizeMode) {
        self.files += 1;
        self.size += match mode {
            SizeMode::Apparent => metadata.len(),
            SizeMode::OnDisk => allocated_size(metadata),
        };
    }
}

#[cfg(unix)]
fn allocated_size(metadata: &Metadata) -> u64 {
    use std::os::unix::fs::MetadataExt;
    metadata.blocks() * 512
}

#[cfg(not(unix))]
fn allocated_size(metadata: &Metadata) -> u64 {
    metadata.len()
}
