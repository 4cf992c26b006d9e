//! Open-file limit handling
//!
//! Every in-flight attempt holds a socket, so a pool wider than the soft
//! `RLIMIT_NOFILE` turns open ports into "too many open files" failures.

use log::warn;

/// Descriptors kept free for stdio, the runtime and the resolver
pub const FD_HEADROOM: u64 = 64;

/// Adjust the open-file limit for a pool of `workers` attempts and return
/// the pool size that fits under it.
///
/// With `ulimit` set, the limit is set to exactly that value; otherwise the
/// soft limit is raised towards `workers + FD_HEADROOM` when the hard limit
/// allows it.
pub fn fit_workers_to_ulimit(workers: usize, ulimit: Option<u64>) -> usize {
    match soft_limit_after_adjust(workers, ulimit) {
        Some(soft) => workers_within_limit(workers, soft),
        None => workers,
    }
}

/// Largest pool size not above `workers` that fits under `soft_limit`
pub fn workers_within_limit(workers: usize, soft_limit: u64) -> usize {
    let available = soft_limit.saturating_sub(FD_HEADROOM).max(1);
    if workers as u64 <= available {
        return workers;
    }

    warn!(
        "Open file limit {} is too low for {} workers, using {} (raise it with --ulimit)",
        soft_limit, workers, available
    );
    available as usize
}

/// Descriptors a pool of `workers` attempts needs, headroom included
fn descriptors_wanted(workers: usize) -> u64 {
    (workers as u64).saturating_add(FD_HEADROOM)
}

#[cfg(unix)]
fn soft_limit_after_adjust(workers: usize, ulimit: Option<u64>) -> Option<u64> {
    use rlimit::Resource;

    if let Some(limit) = ulimit {
        match Resource::NOFILE.set(limit, limit) {
            Ok(()) => log::info!("Open file limit set to {}", limit),
            Err(e) => warn!("Failed to set open file limit to {}: {}", limit, e),
        }
    } else {
        let wanted = descriptors_wanted(workers);
        match rlimit::increase_nofile_limit(wanted) {
            Ok(soft) => log::debug!("Open file limit is {} (wanted {})", soft, wanted),
            Err(e) => log::debug!("Could not raise open file limit: {}", e),
        }
    }

    match Resource::NOFILE.get() {
        Ok((soft, _hard)) => Some(soft),
        Err(e) => {
            warn!("Could not read open file limit: {}", e);
            None
        }
    }
}

#[cfg(not(unix))]
fn soft_limit_after_adjust(_workers: usize, _ulimit: Option<u64>) -> Option<u64> {
    None
}
