//! Scheduled status polling with an atomically replaced current snapshot.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use arc_swap::ArcSwapOption;
use tokio::sync::{Mutex, oneshot};
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use crate::ReplicaMonitor;
use crate::health::{self, HealthSummary};
use crate::types::ReplicaSetStatus;

/// Default wall-clock period between status fetches.
const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(10);

/// Configuration for the status poller
#[derive(Clone, Debug)]
pub struct PollerConfig {
    /// Interval at which to fetch a fresh status snapshot
    pub interval: Duration,
}

impl Default for PollerConfig {
    fn default() -> Self {
        Self {
            interval: DEFAULT_POLL_INTERVAL,
        }
    }
}

/// One snapshot plus its derived summary, handed to the presenter as a
/// single read-only unit.
#[derive(Clone, Debug)]
pub struct StatusView {
    /// Derived health roll-up.
    pub summary: HealthSummary,
    /// The full snapshot the summary was derived from.
    pub status: ReplicaSetStatus,
}

/// Contract for the downstream status display.
///
/// `loading` brackets every individual fetch regardless of outcome;
/// `render` / `render_error` report that fetch's result. Implementations
/// must not mutate what they are handed.
pub trait StatusPresenter: Send + Sync + 'static {
    /// Toggle the visible loading indicator.
    fn loading(&self, active: bool);

    /// Show a fresh snapshot.
    fn render(&self, view: &StatusView);

    /// Show a failed poll. Recovery is solely the next cycle.
    fn render_error(&self, message: &str);
}

/// State shared with spawned fetch tasks.
struct PollerShared {
    monitor: ReplicaMonitor,
    presenter: Arc<dyn StatusPresenter>,
    current: ArcSwapOption<StatusView>,
    running: AtomicBool,
}

impl PollerShared {
    async fn poll_once(&self) {
        self.presenter.loading(true);
        let outcome = self.monitor.fetch_status().await;
        self.presenter.loading(false);

        // A fetch that was in flight when the poller shut down resolves
        // here; its result must not be applied.
        if !self.running.load(Ordering::SeqCst) {
            debug!("discarding status result that resolved after shutdown");
            return;
        }

        match outcome {
            Ok(status) => {
                let view = Arc::new(StatusView {
                    summary: health::summarize(&status.members),
                    status,
                });
                // Last response to resolve wins; the previous snapshot is
                // dropped wholesale.
                self.current.store(Some(Arc::clone(&view)));
                self.presenter.render(&view);
            }
            Err(e) => {
                warn!("replica set status fetch failed: {}", e);
                self.presenter.render_error(&e.to_string());
            }
        }
    }
}

/// Background task state for the schedule
struct TaskState {
    tick_task: Option<JoinHandle<()>>,
    shutdown_signal: Option<oneshot::Sender<()>>,
}

/// Periodically fetches replica set status, publishes the latest snapshot,
/// and drives a [`StatusPresenter`].
///
/// Ticks fire on a fixed wall-clock period. Each tick spawns its fetch as
/// an independent task, so a slow fetch never delays or suppresses the
/// next tick; overlapping results apply last-write-wins.
pub struct StatusPoller {
    shared: Arc<PollerShared>,
    task_state: Mutex<TaskState>,
    config: PollerConfig,
}

impl StatusPoller {
    /// Create a poller with the default 10 second interval.
    pub fn new(monitor: ReplicaMonitor, presenter: Arc<dyn StatusPresenter>) -> Self {
        Self::with_config(monitor, presenter, PollerConfig::default())
    }

    /// Create a poller with custom configuration.
    pub fn with_config(
        monitor: ReplicaMonitor,
        presenter: Arc<dyn StatusPresenter>,
        config: PollerConfig,
    ) -> Self {
        Self {
            shared: Arc::new(PollerShared {
                monitor,
                presenter,
                current: ArcSwapOption::empty(),
                running: AtomicBool::new(true),
            }),
            task_state: Mutex::new(TaskState {
                tick_task: None,
                shutdown_signal: None,
            }),
            config,
        }
    }

    /// Start the fixed-interval schedule. The first fetch fires
    /// immediately.
    pub async fn start(&self) {
        let mut task_state = self.task_state.lock().await;
        if task_state.tick_task.is_some() {
            warn!("status poller already started");
            return;
        }

        self.shared.running.store(true, Ordering::SeqCst);

        let (shutdown_tx, mut shutdown_rx) = oneshot::channel();
        let shared = Arc::clone(&self.shared);
        let interval = self.config.interval;

        let task = tokio::spawn(async move {
            info!("status poller started with interval {:?}", interval);
            let mut ticker = tokio::time::interval(interval);
            loop {
                tokio::select! {
                    _ = &mut shutdown_rx => {
                        debug!("status poller received shutdown signal");
                        break;
                    }
                    _ = ticker.tick() => {
                        let shared = Arc::clone(&shared);
                        tokio::spawn(async move { shared.poll_once().await });
                    }
                }
            }
        });

        task_state.tick_task = Some(task);
        task_state.shutdown_signal = Some(shutdown_tx);
    }

    /// Stop the schedule.
    ///
    /// Prevents future ticks but does not cancel an in-flight fetch; a
    /// superseded result is discarded once it resolves.
    pub async fn shutdown(&self) {
        self.shared.running.store(false, Ordering::SeqCst);

        let mut task_state = self.task_state.lock().await;
        if let Some(shutdown_signal) = task_state.shutdown_signal.take() {
            let _ = shutdown_signal.send(());
        }
        if let Some(task) = task_state.tick_task.take() {
            match tokio::time::timeout(Duration::from_secs(5), task).await {
                Ok(Ok(())) => debug!("status poller tick task completed"),
                Ok(Err(e)) => warn!("status poller tick task failed: {}", e),
                Err(_) => warn!("status poller tick task timed out"),
            }
        }
        info!("status poller stopped");
    }

    /// Manual refresh trigger. Runs the identical poll-and-render path as
    /// a scheduled tick.
    pub async fn refresh(&self) {
        self.shared.poll_once().await;
    }

    /// The most recently applied snapshot, if any.
    #[must_use]
    pub fn current(&self) -> Option<Arc<StatusView>> {
        self.shared.current.load_full()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex as StdMutex;
    use url::Url;

    #[derive(Clone, Debug, PartialEq)]
    enum Event {
        Loading(bool),
        Rendered(String),
        Failed,
    }

    #[derive(Default)]
    struct RecordingPresenter {
        events: StdMutex<Vec<Event>>,
    }

    impl RecordingPresenter {
        fn events(&self) -> Vec<Event> {
            self.events.lock().unwrap().clone()
        }
    }

    impl StatusPresenter for RecordingPresenter {
        fn loading(&self, active: bool) {
            self.events.lock().unwrap().push(Event::Loading(active));
        }

        fn render(&self, view: &StatusView) {
            self.events
                .lock()
                .unwrap()
                .push(Event::Rendered(view.summary.headline()));
        }

        fn render_error(&self, _message: &str) {
            self.events.lock().unwrap().push(Event::Failed);
        }
    }

    // Port 1 is unassigned and closed; connections are refused immediately.
    fn refused_monitor() -> ReplicaMonitor {
        ReplicaMonitor::new(Url::parse("http://127.0.0.1:1/api/replicaset/status").unwrap())
    }

    #[tokio::test]
    async fn failed_fetch_surfaces_error_and_clears_loading() {
        let presenter = Arc::new(RecordingPresenter::default());
        let poller = StatusPoller::new(refused_monitor(), presenter.clone());

        poller.refresh().await;

        let events = presenter.events();
        assert_eq!(events[0], Event::Loading(true));
        assert_eq!(events[1], Event::Loading(false));
        assert_eq!(events[2], Event::Failed);
        assert!(poller.current().is_none());
    }

    #[tokio::test]
    async fn schedule_keeps_firing_after_failures() {
        let presenter = Arc::new(RecordingPresenter::default());
        let poller = StatusPoller::with_config(
            refused_monitor(),
            presenter.clone(),
            PollerConfig {
                interval: Duration::from_millis(20),
            },
        );

        poller.start().await;
        tokio::time::sleep(Duration::from_millis(150)).await;
        poller.shutdown().await;

        let fetches = presenter
            .events()
            .iter()
            .filter(|e| **e == Event::Loading(true))
            .count();
        assert!(fetches >= 2, "expected repeated fetches, saw {fetches}");
    }

    #[tokio::test]
    async fn results_resolving_after_shutdown_are_discarded() {
        let presenter = Arc::new(RecordingPresenter::default());
        let poller = StatusPoller::new(refused_monitor(), presenter.clone());

        poller.shutdown().await;
        poller.refresh().await;

        // The fetch still ran (loading toggled) but its outcome was not
        // applied.
        assert_eq!(
            presenter.events(),
            vec![Event::Loading(true), Event::Loading(false)]
        );
        assert!(poller.current().is_none());
    }

    #[tokio::test]
    async fn start_is_idempotent() {
        let presenter = Arc::new(RecordingPresenter::default());
        let poller = StatusPoller::with_config(
            refused_monitor(),
            presenter,
            PollerConfig {
                interval: Duration::from_secs(3600),
            },
        );

        poller.start().await;
        poller.start().await;
        poller.shutdown().await;
    }
}
