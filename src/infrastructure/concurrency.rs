//! Thread pool setup for the parse and resolve phases.

use anyhow::Result;
use tracing::info;

/// Worker count: `jobs` if given, else half the cores. Never below 1.
pub fn worker_count(jobs: Option<usize>) -> usize {
    jobs.unwrap_or_else(|| num_cpus::get() / 2).max(1)
}

/// Initialize the global rayon thread pool. Returns the worker count.
pub fn init_thread_pool(jobs: Option<usize>) -> Result<usize> {
    let workers = worker_count(jobs);

    rayon::ThreadPoolBuilder::new()
        .num_threads(workers)
        .build_global()?;

    info!(
        "initialized thread pool: {} workers (system has {} cores)",
        workers,
        num_cpus::get()
    );

    Ok(workers)
}
