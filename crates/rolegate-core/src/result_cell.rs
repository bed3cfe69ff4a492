//! One-shot, cancellation-aware result container.
//!
//! A `ResultCell` runs a unit of work on its own tokio task and lets any number
//! of callers await the outcome. The stored result is written exactly once
//! through a `watch` channel (single writer, shared readers), so waiters wake
//! on completion instead of polling.
//!
//! A waiter whose context ends gives up immediately with the context's error.
//! The work itself keeps running and its result stays available to every other
//! handle.

use std::fmt;
use std::future::Future;

use tokio::sync::watch;
use tokio::task::JoinHandle;

use crate::context::Context;
use crate::error::{Result, RoleGateError};

type Slot<T> = Option<Result<T>>;

/// Shared handle to a pending or completed result.
///
/// Cloning is cheap; the cell lives as long as any handle does.
pub struct ResultCell<T> {
    rx: watch::Receiver<Slot<T>>,
}

impl<T> Clone for ResultCell<T> {
    fn clone(&self) -> Self {
        Self {
            rx: self.rx.clone(),
        }
    }
}

impl<T> fmt::Debug for ResultCell<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ResultCell")
            .field("completed", &self.rx.borrow().is_some())
            .finish()
    }
}

impl<T> ResultCell<T>
where
    T: Clone + Send + Sync + 'static,
{
    /// Start `work` on a separate task and return a pending cell.
    ///
    /// Never blocks. Must be called from within a tokio runtime.
    pub fn spawn<F>(work: F) -> Self
    where
        F: Future<Output = Result<T>> + Send + 'static,
    {
        Self::complete_from(tokio::spawn(work))
    }

    /// Run a blocking closure on the blocking pool and return a pending cell.
    pub fn spawn_blocking<F>(work: F) -> Self
    where
        F: FnOnce() -> Result<T> + Send + 'static,
    {
        Self::complete_from(tokio::task::spawn_blocking(work))
    }

    /// Cell that is already completed with `result`.
    pub fn ready(result: Result<T>) -> Self {
        let (_tx, rx) = watch::channel(Some(result));
        Self { rx }
    }

    fn complete_from(handle: JoinHandle<Result<T>>) -> Self {
        let (tx, rx) = watch::channel(None);
        tokio::spawn(async move {
            let result = match handle.await {
                Ok(result) => result,
                Err(e) => {
                    tracing::warn!(error = %e, "result cell work did not finish");
                    Err(RoleGateError::Internal(format!("result cell work failed: {e}")))
                }
            };
            // The only write; later sends are impossible because `tx` is consumed here.
            tx.send_replace(Some(result));
        });
        Self { rx }
    }

    pub fn is_complete(&self) -> bool {
        self.rx.borrow().is_some()
    }

    /// Wait for the stored result or for `ctx` to end.
    ///
    /// A completed cell answers without consulting `ctx`.
    pub async fn get(&self, ctx: &Context) -> Result<T> {
        let stored = self.rx.borrow().clone();
        if let Some(result) = stored {
            return result;
        }

        let mut rx = self.rx.clone();
        tokio::select! {
            biased;
            stored = rx.wait_for(Option::is_some) => match stored {
                Ok(slot) => match &*slot {
                    Some(result) => result.clone(),
                    None => Err(abandoned()),
                },
                Err(_) => Err(abandoned()),
            },
            err = ctx.done() => Err(err),
        }
    }
}

// Writer task dropped without storing, e.g. the runtime shut down.
fn abandoned() -> RoleGateError {
    RoleGateError::Internal("result cell abandoned before completion".into())
}
