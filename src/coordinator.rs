//! Fetch lifecycle coordination
//!
//! One [`FetchCoordinator`] per adaptor owns at most one in-flight
//! creative fetch. Starting a new fetch supersedes the previous one and
//! cancels it; once `start` returns, the superseded fetch can no longer
//! invoke its completion closure, which is the at-most-once delivery
//! guarantee the adaptor contract requires. The worker claims the
//! generation lock across both the supersession check and the callback,
//! so a concurrent `start` cannot slip between them. Liveness and
//! destroyed-state checks are the closure's own responsibility (see
//! [`crate::adaptor`]), so the coordinator stays ignorant of adaptor
//! internals.

use crate::fetcher::{AdImage, ImageFetcher};
use crate::utils::lock;
use std::sync::{Arc, Mutex};
use tokio_util::sync::CancellationToken;

/// One outstanding creative fetch
struct FetchHandle {
    token: CancellationToken,
    task: tokio::task::JoinHandle<()>,
}

/// Owns the lifecycle of one in-flight fetch per adaptor instance
pub struct FetchCoordinator {
    fetcher: Arc<ImageFetcher>,
    /// Generation of the most recently started fetch. A completing task
    /// holds this lock from its supersession check through its callback,
    /// and `start` bumps the generation under the same lock, so the check
    /// and the delivery cannot be separated by a concurrent `start`.
    latest: Arc<Mutex<u64>>,
    current: Option<FetchHandle>,
}

impl FetchCoordinator {
    /// Create a coordinator backed by the given fetcher
    pub fn new(fetcher: Arc<ImageFetcher>) -> Self {
        Self {
            fetcher,
            latest: Arc::new(Mutex::new(0)),
            current: None,
        }
    }

    /// Begin a fetch, replacing and cancelling any previous in-flight one.
    ///
    /// `on_result` is invoked at most once, on the worker task, and only
    /// if this fetch is still the latest and was not cancelled. It
    /// receives `None` when the fetch failed for any reason. Once `start`
    /// returns, the superseded fetch can no longer deliver: if its
    /// callback is already running, `start` blocks until it returns.
    /// `on_result` must not synchronously start another fetch on the same
    /// coordinator.
    pub fn start<F>(&mut self, url: String, scale: f32, on_result: F)
    where
        F: FnOnce(Option<AdImage>) + Send + 'static,
    {
        self.cancel();

        let generation = {
            let mut latest = lock(&self.latest);
            *latest += 1;
            *latest
        };
        let token = CancellationToken::new();
        let fetcher = Arc::clone(&self.fetcher);
        let latest = Arc::clone(&self.latest);
        let task_token = token.clone();

        let task = tokio::spawn(async move {
            let fetched = tokio::select! {
                biased;
                _ = task_token.cancelled() => {
                    tracing::debug!(url, "fetch cancelled before completion");
                    return;
                }
                fetched = fetcher.fetch(&url, scale) => fetched,
            };

            // Claim the generation for the whole delivery; a newer fetch
            // starting now waits until the callback returns.
            let latest = lock(&latest);
            if task_token.is_cancelled() || *latest != generation {
                tracing::debug!(url, generation, "dropping superseded fetch result");
                return;
            }
            on_result(fetched);
        });

        self.current = Some(FetchHandle { token, task });
    }

    /// Best-effort cancellation of the in-flight fetch.
    ///
    /// If the fetch has not completed yet, no callback will fire.
    pub fn cancel(&mut self) {
        if let Some(handle) = self.current.take() {
            handle.token.cancel();
        }
    }

    /// Whether a fetch is currently outstanding
    pub fn is_in_flight(&self) -> bool {
        self.current
            .as_ref()
            .is_some_and(|handle| !handle.task.is_finished())
    }
}
