//! Runtime access for async work.
//!
//! Work is spawned onto the tokio runtime the caller is already running in.
//! When called from outside any runtime (for example from a synchronous host
//! callback), a lazily created fallback runtime is used instead.
//!
//! # Example
//!
//! ```no_run
//! use std::time::Duration;
//! use course_toolbox_core::runtime;
//!
//! // Run a closure a short while from now.
//! runtime::spawn_later(Duration::from_millis(400), || {
//!     println!("later");
//! })
//! .expect("runtime available");
//! ```

use std::future::Future;
use std::sync::OnceLock;
use std::time::Duration;

use tokio::runtime::{Handle, Runtime};
use tokio::task::JoinHandle;

use crate::error::{CoreError, Result};
use crate::logging::targets;

static FALLBACK: OnceLock<std::result::Result<Runtime, String>> = OnceLock::new();

fn fallback() -> Result<&'static Runtime> {
    FALLBACK
        .get_or_init(|| {
            tracing::debug!(target: targets::RUNTIME, "creating fallback runtime");
            tokio::runtime::Builder::new_multi_thread()
                .worker_threads(2)
                .thread_name("course-toolbox")
                .enable_all()
                .build()
                .map_err(|e| e.to_string())
        })
        .as_ref()
        .map_err(|msg| CoreError::RuntimeUnavailable(msg.clone()))
}

/// Get a handle to the runtime work should be spawned onto.
///
/// Prefers the runtime of the calling context.
pub fn handle() -> Result<Handle> {
    match Handle::try_current() {
        Ok(handle) => Ok(handle),
        Err(_) => Ok(fallback()?.handle().clone()),
    }
}

/// Spawn a future onto the current (or fallback) runtime.
pub fn spawn<F>(future: F) -> Result<JoinHandle<F::Output>>
where
    F: Future + Send + 'static,
    F::Output: Send + 'static,
{
    Ok(handle()?.spawn(future))
}

/// Run `task` once `delay` has elapsed.
///
/// The task runs on the runtime's worker, never inline.
pub fn spawn_later<F>(delay: Duration, task: F) -> Result<JoinHandle<()>>
where
    F: FnOnce() + Send + 'static,
{
    spawn(async move {
        tokio::time::sleep(delay).await;
        tracing::trace!(target: targets::RUNTIME, ?delay, "deferred task firing");
        task();
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicBool, Ordering};

    #[tokio::test(start_paused = true)]
    async fn test_spawn_later_waits_for_delay() {
        let fired = Arc::new(AtomicBool::new(false));
        let fired_clone = fired.clone();

        let handle = spawn_later(Duration::from_millis(400), move || {
            fired_clone.store(true, Ordering::SeqCst);
        })
        .unwrap();

        tokio::time::sleep(Duration::from_millis(399)).await;
        assert!(!fired.load(Ordering::SeqCst));

        handle.await.unwrap();
        assert!(fired.load(Ordering::SeqCst));
    }

    #[tokio::test]
    async fn test_spawn_uses_current_runtime() {
        let value = spawn(async { 21 * 2 }).unwrap().await.unwrap();
        assert_eq!(value, 42);
    }

    #[test]
    fn test_spawn_outside_runtime_uses_fallback() {
        let (tx, rx) = std::sync::mpsc::channel();
        spawn(async move {
            tx.send(7).unwrap();
        })
        .unwrap();
        assert_eq!(rx.recv_timeout(Duration::from_secs(5)).unwrap(), 7);
    }
}
