use async_trait::async_trait;
use std::time::Duration;
use tokio::sync::{mpsc, oneshot};
use tokio::time::{self, Instant, Interval, MissedTickBehavior};

/// Source of poll ticks. The poller issues at most one fetch per tick.
#[async_trait]
pub trait Ticker: Send {
    async fn tick(&mut self);
}

/// Wall-clock ticker. The first tick fires one period after creation and a
/// tick missed while a fetch was in flight is pushed back, never bunched.
/// Ticks are spaced from the previous tick, not from the previous response,
/// so a slow fetch shortens the gap before the next poll.
pub struct IntervalTicker {
    interval: Interval,
}

impl IntervalTicker {
    pub fn new(period: Duration) -> Self {
        let mut interval = time::interval_at(Instant::now() + period, period);
        interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
        Self { interval }
    }
}

#[async_trait]
impl Ticker for IntervalTicker {
    async fn tick(&mut self) {
        self.interval.tick().await;
    }
}

/// Ticker advanced by hand through its [`TickController`], for driving a
/// poller step by step.
pub struct ManualTicker {
    requests: mpsc::UnboundedSender<oneshot::Sender<()>>,
}

pub struct TickController {
    requests: mpsc::UnboundedReceiver<oneshot::Sender<()>>,
    parked: Option<oneshot::Sender<()>>,
}

impl ManualTicker {
    pub fn pair() -> (Self, TickController) {
        let (tx, rx) = mpsc::unbounded_channel();
        (
            Self { requests: tx },
            TickController {
                requests: rx,
                parked: None,
            },
        )
    }
}

#[async_trait]
impl Ticker for ManualTicker {
    async fn tick(&mut self) {
        let (tx, rx) = oneshot::channel();
        // A dropped controller means the clock stopped: no tick ever again.
        if self.requests.send(tx).is_err() || rx.await.is_err() {
            std::future::pending::<()>().await;
        }
    }
}

impl TickController {
    /// Waits until the ticker's owner is blocked on its next tick. Returns
    /// `false` once the ticker has been dropped.
    pub async fn idle(&mut self) -> bool {
        if self.parked.is_some() {
            return true;
        }
        match self.requests.recv().await {
            Some(waiter) => {
                self.parked = Some(waiter);
                true
            }
            None => false,
        }
    }

    /// Fires one tick without waiting for the owner to handle it.
    pub async fn fire(&mut self) -> bool {
        if !self.idle().await {
            return false;
        }
        match self.parked.take() {
            Some(waiter) => waiter.send(()).is_ok(),
            None => false,
        }
    }

    /// Fires one tick and waits until the owner is idle again. Returns
    /// `false` when the owner finished instead.
    pub async fn advance(&mut self) -> bool {
        self.fire().await && self.idle().await
    }
}
