//! Polls an analysis until the server has populated its skill lists.
//!
//! States: `Pending -> Settled`, `Pending -> Abandoned`, and, only when an
//! attempt limit is configured, `Pending -> Exhausted`. Attempts are strictly
//! sequential: the next fetch waits for the previous response and for the
//! next tick. Fetch errors are indistinguishable from "still pending" to the
//! caller; they are only logged.

use async_trait::async_trait;
use std::sync::Arc;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use super::ticker::Ticker;
use super::{AnalysisHandle, AnalysisResult, SettledAnalysis};
use crate::utils::CareerLensResult;

/// Fetch-by-id side of the poller.
#[async_trait]
pub trait AnalysisSource: Send + Sync {
    async fn fetch(&self, handle: AnalysisHandle) -> CareerLensResult<AnalysisResult>;
}

#[async_trait]
impl<S: AnalysisSource + ?Sized> AnalysisSource for Arc<S> {
    async fn fetch(&self, handle: AnalysisHandle) -> CareerLensResult<AnalysisResult> {
        (**self).fetch(handle).await
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PollOutcome {
    Settled(SettledAnalysis),
    /// Cancelled before settling; no score was derived.
    Abandoned { attempts: u32 },
    /// The configured attempt limit ran out while still pending.
    Exhausted { attempts: u32 },
}

impl PollOutcome {
    pub fn settled(self) -> Option<SettledAnalysis> {
        match self {
            PollOutcome::Settled(settled) => Some(settled),
            _ => None,
        }
    }
}

/// Cooperative cancellation for a running poller. Dropping every handle
/// does not cancel.
#[derive(Clone)]
pub struct CancelHandle {
    tx: Arc<watch::Sender<bool>>,
}

impl CancelHandle {
    pub fn cancel(&self) {
        self.tx.send_replace(true);
    }

    pub fn is_cancelled(&self) -> bool {
        *self.tx.borrow()
    }
}

struct CancelSignal {
    rx: watch::Receiver<bool>,
}

impl CancelSignal {
    fn is_cancelled(&self) -> bool {
        *self.rx.borrow()
    }

    async fn cancelled(&mut self) {
        loop {
            if *self.rx.borrow_and_update() {
                return;
            }
            if self.rx.changed().await.is_err() {
                std::future::pending::<()>().await;
            }
        }
    }
}

pub struct AnalysisPoller<S, T> {
    source: S,
    ticker: T,
    handle: AnalysisHandle,
    max_attempts: Option<u32>,
    cancel_tx: Arc<watch::Sender<bool>>,
    cancel: CancelSignal,
}

impl<S: AnalysisSource, T: Ticker> AnalysisPoller<S, T> {
    pub fn new(source: S, ticker: T, handle: AnalysisHandle) -> Self {
        let (tx, rx) = watch::channel(false);
        Self {
            source,
            ticker,
            handle,
            max_attempts: None,
            cancel_tx: Arc::new(tx),
            cancel: CancelSignal { rx },
        }
    }

    pub fn with_max_attempts(mut self, max_attempts: Option<u32>) -> Self {
        self.max_attempts = max_attempts;
        self
    }

    pub fn cancel_handle(&self) -> CancelHandle {
        CancelHandle {
            tx: Arc::clone(&self.cancel_tx),
        }
    }

    pub async fn run(mut self) -> PollOutcome {
        let mut attempts = 0u32;
        let mut consecutive_failures = 0u32;

        info!("Waiting for {} to settle", self.handle);

        loop {
            if let Some(max) = self.max_attempts {
                if attempts >= max {
                    warn!("{} still pending after {} attempts, giving up", self.handle, attempts);
                    return PollOutcome::Exhausted { attempts };
                }
            }

            tokio::select! {
                biased;
                _ = self.cancel.cancelled() => return self.abandon(attempts),
                _ = self.ticker.tick() => {}
            }

            attempts += 1;
            let fetched = tokio::select! {
                biased;
                _ = self.cancel.cancelled() => return self.abandon(attempts),
                fetched = self.source.fetch(self.handle) => fetched,
            };

            // A response that raced a cancellation is discarded.
            if self.cancel.is_cancelled() {
                return self.abandon(attempts);
            }

            match fetched {
                Ok(result) if result.is_settled() => {
                    let settled = SettledAnalysis::new(self.handle, result, attempts);
                    info!(
                        "{} settled after {} attempts: score {}%",
                        self.handle, attempts, settled.score
                    );
                    return PollOutcome::Settled(settled);
                }
                Ok(_) => {
                    consecutive_failures = 0;
                    debug!("{} pending (attempt {})", self.handle, attempts);
                }
                Err(e) => {
                    consecutive_failures += 1;
                    debug!(
                        "{} fetch failed (attempt {}, {} in a row), still waiting: {}",
                        self.handle, attempts, consecutive_failures, e
                    );
                }
            }
        }
    }

    fn abandon(&self, attempts: u32) -> PollOutcome {
        info!("{} abandoned after {} attempts", self.handle, attempts);
        PollOutcome::Abandoned { attempts }
    }
}

/// A poller running on its own task.
pub struct PollTask {
    cancel: CancelHandle,
    join: JoinHandle<PollOutcome>,
}

pub fn spawn_poller<S, T>(poller: AnalysisPoller<S, T>) -> PollTask
where
    S: AnalysisSource + 'static,
    T: Ticker + 'static,
{
    let cancel = poller.cancel_handle();
    let join = tokio::spawn(poller.run());
    PollTask { cancel, join }
}

impl PollTask {
    pub fn cancel_handle(&self) -> CancelHandle {
        self.cancel.clone()
    }

    pub fn cancel(&self) {
        self.cancel.cancel();
    }

    pub async fn outcome(self) -> PollOutcome {
        match self.join.await {
            Ok(outcome) => outcome,
            Err(e) if e.is_panic() => std::panic::resume_unwind(e.into_panic()),
            Err(_) => PollOutcome::Abandoned { attempts: 0 },
        }
    }
}
