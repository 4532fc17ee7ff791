use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use ethers_core::types::Address;
use serde::Serialize;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::Instant;
use tracing::{debug, warn};

use crate::models::GasStats;
use crate::service::StatsSource;

pub const DEFAULT_LOADING_FLOOR: Duration = Duration::from_millis(500);

/// What the page shows.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum View {
    Disconnected,
    Loading { address: Address },
    Populated { address: Address, stats: GasStats },
    Failed { address: Address, message: String },
}

impl View {
    /// True once a cycle has produced its outcome.
    pub fn is_settled(&self) -> bool {
        matches!(self, View::Populated { .. } | View::Failed { .. })
    }
}

/// Drives fetch cycles for the bound wallet and publishes the resulting
/// [`View`]. Only the most recent cycle may commit; older ones are aborted
/// and, should they finish anyway, discarded by generation.
pub struct Presenter<S> {
    inner: Arc<Inner<S>>,
}

impl<S> Clone for Presenter<S> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

struct Inner<S> {
    source: Arc<S>,
    loading_floor: Duration,
    view: watch::Sender<View>,
    cycle: Mutex<Cycle>,
}

#[derive(Default)]
struct Cycle {
    generation: u64,
    task: Option<JoinHandle<()>>,
}

impl<S: StatsSource> Presenter<S> {
    pub fn new(source: Arc<S>, loading_floor: Duration) -> Self {
        let (view, _) = watch::channel(View::Disconnected);
        Self {
            inner: Arc::new(Inner {
                source,
                loading_floor,
                view,
                cycle: Mutex::new(Cycle::default()),
            }),
        }
    }

    pub fn view(&self) -> View {
        self.inner.view.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<View> {
        self.inner.view.subscribe()
    }

    /// Bind a wallet. An inactive connection is the same as [`disconnect`].
    /// Otherwise a fresh cycle starts, replacing any in flight.
    ///
    /// Must be called from within a tokio runtime.
    ///
    /// [`disconnect`]: Presenter::disconnect
    pub fn connect(&self, address: Address, active: bool) {
        if !active {
            self.disconnect();
            return;
        }

        let mut cycle = self.inner.lock_cycle();
        let generation = cycle.bump();
        self.inner.view.send_replace(View::Loading { address });

        let inner = Arc::clone(&self.inner);
        cycle.task = Some(tokio::spawn(async move {
            inner.run_cycle(generation, address).await;
        }));
    }

    pub fn disconnect(&self) {
        let mut cycle = self.inner.lock_cycle();
        cycle.bump();
        self.inner.view.send_replace(View::Disconnected);
    }
}

impl Cycle {
    /// Invalidate whatever is in flight and hand out the next generation.
    fn bump(&mut self) -> u64 {
        if let Some(task) = self.task.take() {
            task.abort();
        }
        self.generation += 1;
        self.generation
    }
}

impl<S: StatsSource> Inner<S> {
    fn lock_cycle(&self) -> MutexGuard<'_, Cycle> {
        self.cycle.lock().unwrap_or_else(PoisonError::into_inner)
    }

    async fn run_cycle(&self, generation: u64, address: Address) {
        let started = Instant::now();
        let outcome = self.source.gas_stats(address).await;
        tokio::time::sleep_until(started + self.loading_floor).await;

        let next = match outcome {
            Ok(stats) => View::Populated { address, stats },
            Err(err) => {
                warn!(?address, generation, "gas stats cycle failed: {}", err);
                View::Failed {
                    address,
                    message: err.to_string(),
                }
            }
        };

        let mut cycle = self.lock_cycle();
        if cycle.generation != generation {
            debug!(generation, current = cycle.generation, "dropping stale cycle result");
            return;
        }
        cycle.task = None;
        self.view.send_replace(next);
    }
}
