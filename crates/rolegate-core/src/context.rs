//! Cancellable request context.
//!
//! Every authorization request carries a `Context`. Blocking points in the
//! engine (identity lookups, [`crate::ResultCell::get`]) race their work
//! against [`Context::done`] and return the context's error as soon as it is
//! cancelled or its deadline elapses.

use std::future::Future;

use tokio::time::{Duration, Instant};
use tokio_util::sync::CancellationToken;

use crate::error::{Result, RoleGateError};

/// Cancellation scope with an optional deadline.
///
/// Clones share cancellation. Derived contexts (`child`, `with_timeout`,
/// `with_deadline`) are cancelled together with their parent, but cancelling a
/// derived context never reaches the parent or its siblings.
#[derive(Debug, Clone)]
pub struct Context {
    token: CancellationToken,
    deadline: Option<Instant>,
}

impl Default for Context {
    fn default() -> Self {
        Self::background()
    }
}

impl Context {
    /// Root context with no deadline.
    pub fn background() -> Self {
        Self {
            token: CancellationToken::new(),
            deadline: None,
        }
    }

    pub fn child(&self) -> Self {
        Self {
            token: self.token.child_token(),
            deadline: self.deadline,
        }
    }

    pub fn with_timeout(&self, timeout: Duration) -> Self {
        self.with_deadline(Instant::now() + timeout)
    }

    /// Child context expiring at `deadline`, or at the parent's deadline if
    /// that comes first.
    pub fn with_deadline(&self, deadline: Instant) -> Self {
        let deadline = match self.deadline {
            Some(parent) if parent < deadline => parent,
            _ => deadline,
        };
        Self {
            token: self.token.child_token(),
            deadline: Some(deadline),
        }
    }

    pub fn cancel(&self) {
        self.token.cancel();
    }

    pub fn deadline(&self) -> Option<Instant> {
        self.deadline
    }

    /// `None` while the context is live.
    pub fn err(&self) -> Option<RoleGateError> {
        if self.token.is_cancelled() {
            return Some(RoleGateError::Cancelled);
        }
        match self.deadline {
            Some(d) if Instant::now() >= d => Some(RoleGateError::DeadlineExceeded),
            _ => None,
        }
    }

    pub fn is_done(&self) -> bool {
        self.err().is_some()
    }

    /// Resolves once the context is cancelled or its deadline elapses.
    pub async fn done(&self) -> RoleGateError {
        match self.deadline {
            Some(deadline) => tokio::select! {
                biased;
                _ = self.token.cancelled() => RoleGateError::Cancelled,
                _ = tokio::time::sleep_until(deadline) => RoleGateError::DeadlineExceeded,
            },
            None => {
                self.token.cancelled().await;
                RoleGateError::Cancelled
            }
        }
    }

    /// Drive `fut` until it completes or the context ends, whichever is first.
    ///
    /// An already-ended context returns its error without polling `fut`.
    pub async fn run<T, F>(&self, fut: F) -> Result<T>
    where
        F: Future<Output = Result<T>>,
    {
        if let Some(err) = self.err() {
            return Err(err);
        }
        tokio::select! {
            biased;
            err = self.done() => Err(err),
            res = fut => res,
        }
    }
}
