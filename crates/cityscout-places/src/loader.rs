//! Single-flight load cell.
//!
//! [`LoadCell`] holds a value that is produced by an asynchronous load at most
//! once at a time. The first caller starts the load; every caller that arrives
//! while it is pending awaits the same shared future and observes the same
//! outcome. Success is kept for the lifetime of the cell. Failure resets the
//! cell so the next caller starts a fresh attempt.

use std::sync::{Mutex, MutexGuard, PoisonError};

use futures::future::{BoxFuture, FutureExt, Shared};
use serde::Serialize;

use crate::error::LoadError;

type PendingLoad<T> = Shared<BoxFuture<'static, Result<T, LoadError>>>;

enum LoadState<T: Clone> {
    NotStarted,
    Loading {
        attempt: u64,
        pending: PendingLoad<T>,
    },
    Ready(T),
}

struct Inner<T: Clone> {
    state: LoadState<T>,
    attempts: u64,
}

/// Observable state of a [`LoadCell`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum LoadStatus {
    NotStarted,
    Loading,
    Ready,
}

impl std::fmt::Display for LoadStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LoadStatus::NotStarted => write!(f, "not_started"),
            LoadStatus::Loading => write!(f, "loading"),
            LoadStatus::Ready => write!(f, "ready"),
        }
    }
}

pub struct LoadCell<T: Clone> {
    inner: Mutex<Inner<T>>,
}

impl<T> LoadCell<T>
where
    T: Clone + Send + Sync + 'static,
{
    #[must_use]
    pub fn new() -> Self {
        Self {
            inner: Mutex::new(Inner {
                state: LoadState::NotStarted,
                attempts: 0,
            }),
        }
    }

    #[must_use]
    pub fn status(&self) -> LoadStatus {
        match self.lock().state {
            LoadState::NotStarted => LoadStatus::NotStarted,
            LoadState::Loading { .. } => LoadStatus::Loading,
            LoadState::Ready(_) => LoadStatus::Ready,
        }
    }

    /// Returns the loaded value, starting `load` only if no attempt is in
    /// flight and no value is ready.
    ///
    /// `load` runs under the cell's lock and must only construct the future.
    ///
    /// # Errors
    ///
    /// Returns the [`LoadError`] of the attempt this call joined.
    pub async fn get_or_load<F>(&self, load: F) -> Result<T, LoadError>
    where
        F: FnOnce() -> BoxFuture<'static, Result<T, LoadError>>,
    {
        let (attempt, pending) = {
            let mut inner = self.lock();
            match &inner.state {
                LoadState::Ready(value) => return Ok(value.clone()),
                LoadState::Loading { attempt, pending } => (*attempt, pending.clone()),
                LoadState::NotStarted => {
                    inner.attempts += 1;
                    let attempt = inner.attempts;
                    let pending = load().shared();
                    inner.state = LoadState::Loading {
                        attempt,
                        pending: pending.clone(),
                    };
                    tracing::debug!(attempt, "starting provider load");
                    (attempt, pending)
                }
            }
        };

        let outcome = pending.await;

        let mut inner = self.lock();
        // Only the attempt that is still current may settle the state; a
        // later attempt may already own it.
        if matches!(inner.state, LoadState::Loading { attempt: current, .. } if current == attempt)
        {
            inner.state = match &outcome {
                Ok(value) => LoadState::Ready(value.clone()),
                Err(err) => {
                    tracing::warn!(attempt, error = %err, "provider load failed; next call will retry");
                    LoadState::NotStarted
                }
            };
        }

        outcome
    }

    fn lock(&self) -> MutexGuard<'_, Inner<T>> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl<T> Default for LoadCell<T>
where
    T: Clone + Send + Sync + 'static,
{
    fn default() -> Self {
        Self::new()
    }
}
