//! Tokio Runtime Bridge
//!
//! The console's views own their list state on a single thread, while remote
//! capabilities are async and need tokio. This module provides the one
//! process-wide runtime those requests run on.
//!
//! ## Pattern
//!
//! ```text
//! view thread
//!       │
//!       ▼
//! spawn_named_in_tokio(async { fetch ...; tx.send(result) })
//!       │
//!       ▼
//! tokio::Runtime::spawn()
//!       │
//!       ▼
//! completion drained back on the view thread
//! ```

use std::future::Future;
use std::sync::OnceLock;
use tokio::runtime::Runtime;

/// Global tokio runtime instance
static TOKIO_RUNTIME: OnceLock<Runtime> = OnceLock::new();

/// Get or initialize the global tokio runtime
fn get_runtime() -> &'static Runtime {
    TOKIO_RUNTIME.get_or_init(|| Runtime::new().expect("Failed to create tokio runtime"))
}

/// Spawn a detached task in the tokio runtime
///
/// The task runs independently and its result is not awaited; results travel
/// back over whatever channel the future captured.
pub fn spawn_in_tokio<F>(future: F)
where
    F: Future<Output = ()> + Send + 'static,
{
    get_runtime().spawn(future);
}

/// Spawn a detached task with a name (for debugging)
pub fn spawn_named_in_tokio<F>(name: &'static str, future: F)
where
    F: Future<Output = ()> + Send + 'static,
{
    tracing::trace!("Spawning tokio task: {}", name);
    spawn_in_tokio(async move {
        future.await;
        tracing::trace!("Tokio task completed: {}", name);
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_spawn_named_in_tokio() {
        let (tx, rx) = crossbeam_channel::bounded(1);

        spawn_named_in_tokio("test", async move {
            tokio::task::yield_now().await;
            let _ = tx.send(42);
        });

        let value = rx
            .recv_timeout(std::time::Duration::from_secs(1))
            .expect("task result");
        assert_eq!(value, 42);
    }
}
