//! Status Poller
//!
//! Polls the cluster status feed on a fixed period and folds each successful
//! response into two sliding windows (file count and alive node count) that
//! share one time axis.
//!
//! ## Lifecycle
//! - **Idle → Polling**: `start()` spawns the poll task; the first fetch happens
//!   immediately, not one period later.
//! - **Polling → Idle**: `stop()` (or dropping the poller) aborts the task and
//!   bumps the generation, so a fetch that was still in flight can never
//!   touch the history afterwards. Both transitions are idempotent.
//!
//! Ticks are serialized: the next tick is not taken until the current fetch
//! settles, and ticks missed meanwhile are skipped, so samples always land in
//! wall-clock order.

use super::types::SystemStatus;
use super::window::TimeSeriesWindow;
use crate::client::store::RemoteStore;

use parking_lot::{Mutex, RwLock};
use serde::Serialize;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;

pub const POLL_INTERVAL: Duration = Duration::from_millis(5000);

/// Everything the status views render.
#[derive(Debug, Clone, Default, Serialize)]
pub struct StatusHistory {
    pub file_count: TimeSeriesWindow<usize>,
    pub alive_nodes: TimeSeriesWindow<usize>,
    /// Last status received, or the unavailable placeholder after a failed tick.
    pub latest: Option<SystemStatus>,
    pub failed_ticks: u64,
}

impl StatusHistory {
    /// Appends one sample to both windows under the same label.
    ///
    /// A status reporting the master as unavailable counts as a failed tick:
    /// it becomes `latest` but the windows are not advanced.
    pub fn record(&mut self, label: &str, status: SystemStatus) {
        if !status.master_available {
            self.failed_ticks += 1;
            self.latest = Some(status);
            return;
        }
        self.file_count.push(label, status.file_count);
        self.alive_nodes.push(label, status.alive_node_count());
        self.latest = Some(status);
    }

    /// A failed tick leaves both windows as they were.
    pub fn record_failure(&mut self) {
        self.failed_ticks += 1;
        self.latest = Some(SystemStatus::unavailable());
    }
}

struct PollerControl {
    generation: u64,
    task: Option<JoinHandle<()>>,
}

struct PollerShared {
    store: Arc<dyn RemoteStore>,
    history: RwLock<StatusHistory>,
    control: Mutex<PollerControl>,
    revision: watch::Sender<u64>,
}

pub struct StatusPoller {
    shared: Arc<PollerShared>,
}

impl StatusPoller {
    pub fn new(store: Arc<dyn RemoteStore>) -> Self {
        let (revision, _) = watch::channel(0);
        Self {
            shared: Arc::new(PollerShared {
                store,
                history: RwLock::new(StatusHistory::default()),
                control: Mutex::new(PollerControl {
                    generation: 0,
                    task: None,
                }),
                revision,
            }),
        }
    }

    /// Starts polling. Must be called from within a tokio runtime.
    pub fn start(&self) {
        let mut control = self.shared.control.lock();
        if control.task.is_some() {
            return;
        }

        let generation = control.generation;
        let shared = self.shared.clone();
        control.task = Some(tokio::spawn(async move {
            shared.run(generation).await;
        }));

        tracing::info!(
            "Status poller started (every {} ms)",
            POLL_INTERVAL.as_millis()
        );
    }

    pub fn stop(&self) {
        let mut control = self.shared.control.lock();
        let Some(task) = control.task.take() else {
            return;
        };

        control.generation += 1;
        task.abort();
        tracing::info!("Status poller stopped");
    }

    pub fn is_polling(&self) -> bool {
        self.shared.control.lock().task.is_some()
    }

    pub fn history(&self) -> StatusHistory {
        self.shared.history.read().clone()
    }

    /// Yields a new revision number after every settled tick.
    pub fn subscribe(&self) -> watch::Receiver<u64> {
        self.shared.revision.subscribe()
    }
}

impl Drop for StatusPoller {
    fn drop(&mut self) {
        self.stop();
    }
}

impl PollerShared {
    async fn run(self: Arc<Self>, generation: u64) {
        let mut interval = tokio::time::interval(POLL_INTERVAL);
        interval.set_missed_tick_behavior(MissedTickBehavior::Skip);

        loop {
            interval.tick().await;
            self.poll_once(generation).await;
        }
    }

    async fn poll_once(&self, generation: u64) {
        let result = self.store.system_status().await;
        let label = chrono::Local::now().format("%H:%M:%S").to_string();

        // Holding the control lock while applying the sample makes the
        // generation check and the mutation atomic with respect to `stop()`.
        let control = self.control.lock();
        if control.generation != generation {
            tracing::debug!("Discarding status from a stopped poller");
            return;
        }

        {
            let mut history = self.history.write();
            match result {
                Ok(status) => {
                    tracing::debug!(
                        "Status sample: {} files, {} alive nodes",
                        status.file_count,
                        status.alive_node_count()
                    );
                    history.record(&label, status);
                }
                Err(e) => {
                    tracing::warn!("Status poll failed, skipping sample: {}", e);
                    history.record_failure();
                }
            }
        }

        self.revision.send_modify(|revision| *revision += 1);
        drop(control);
    }
}
