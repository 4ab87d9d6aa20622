use std::time::Instant;

use tracing::debug;

/// Runs a storage call on the UI thread and records how long it took.
pub fn run_blocking<F, T>(label: &'static str, f: F) -> T
where
    F: FnOnce() -> T,
{
    let started = Instant::now();
    let result = f();
    debug!(
        call = label,
        elapsed_ms = started.elapsed().as_millis() as u64,
        "blocking call finished"
    );
    result
}
