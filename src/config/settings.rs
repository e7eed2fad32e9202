use serde::{Deserialize, Serialize};

/// Age thresholds offered by the CLI, in days.
pub const AGE_CHOICES: [u32; 4] = [30, 45, 60, 90];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SizeMode {
    /// Sum of file lengths.
    Apparent,
    /// Sum of allocated blocks, like `du`.
    OnDisk,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    pub max_depth: Option<usize>,
    pub max_concurrent_probes: usize,
    pub follow_symlinks: bool,
    pub size_mode: SizeMode,
    pub dry_run: bool,
}

impl Default for Settings {
    fn default() -> Self {
        let parallelism = std::thread::available_parallelism()
            .map(|n| n.get())
            .unwrap_or(4);

        // Each probe holds at most one directory handle open at a time
        let max_concurrent_probes = cap_by_fd_limit(parallelism * 2);

        Self {
            max_depth: None,
            max_concurrent_probes,
            follow_symlinks: false,
            size_mode: SizeMode::Apparent,
            dry_run: false,
        }
    }
}

/// Cap concurrency based on the system's file descriptor soft limit.
/// Reserves 25% of fds for stdio, the terminal and the runtime.
fn cap_by_fd_limit(max_probes: usize) -> usize {
    #[cfg(unix)]
    {
        let mut rlim = libc::rlimit {
            rlim_cur: 0,
            rlim_max: 0,
        };
        let ret = unsafe { libc::getrlimit(libc::RLIMIT_NOFILE, &mut rlim) };
        if ret == 0 && rlim.rlim_cur != libc::RLIM_INFINITY {
            let usable = rlim.rlim_cur as usize * 3 / 4;
            return max_probes.min(usable).max(4);
        }
    }
    max_probes.max(4)
}
