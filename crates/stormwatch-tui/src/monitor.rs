//! Polling and rotation tasks.
//!
//! Two independently scheduled tokio tasks share state only through `watch`
//! channels:
//!
//! - the poll task fetches, reconciles, dispatches cues and publishes a
//!   complete [`DashboardSnapshot`]
//! - the rotation task reads the latest snapshot's candidates, advances the
//!   cursor and publishes a [`TopBar`]
//!
//! Readers only ever see fully built values.

use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Local};
use stormwatch_audio::CueDispatcher;
use stormwatch_config::{DisplayOrder, StormwatchConfig};
use stormwatch_core::log_alert_event;
use stormwatch_engine::{
    ListOrder, Notification, ReconcileOptions, Reconciler, Reconciliation, RotationCursor, TopBar,
};
use stormwatch_feed::AlertSource;
use tokio::sync::{Notify, watch};
use tokio::task::JoinHandle;
use tokio::time::{MissedTickBehavior, interval};
use tracing::{debug, info, warn};

/// Timer periods and reconciliation settings for the two tasks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MonitorOptions {
    pub fetch_interval: Duration,
    pub rotation_interval: Duration,
    pub reconcile: ReconcileOptions,
}

impl MonitorOptions {
    pub fn from_config(config: &StormwatchConfig) -> Self {
        let order = match config.display.order {
            DisplayOrder::Recency => ListOrder::Recency,
            DisplayOrder::Priority => ListOrder::Priority,
        };
        Self {
            fetch_interval: config.polling.fetch_interval(),
            rotation_interval: config.polling.rotation_interval(),
            reconcile: ReconcileOptions {
                list_size: config.display.list_size,
                county_limit: config.display.county_limit,
                order,
            },
        }
    }
}

impl Default for MonitorOptions {
    fn default() -> Self {
        Self::from_config(&StormwatchConfig::default())
    }
}

/// Everything the dashboard renders except the top bar.
#[derive(Debug, Clone, Default)]
pub struct DashboardSnapshot {
    /// Successful reconciliations so far; 0 before the first
    pub cycle: u64,
    /// Result of the latest successful cycle
    pub result: Reconciliation,
    /// When the latest successful fetch completed
    pub fetched_at: Option<DateTime<Local>>,
    /// Short description of the latest failure, cleared on success
    pub last_error: Option<String>,
    /// Feed endpoint, for the header
    pub endpoint: String,
}

impl DashboardSnapshot {
    /// True until the first fetch completes either way.
    pub fn is_loading(&self) -> bool {
        self.cycle == 0 && self.last_error.is_none()
    }
}

/// State owned by the poll task.
pub struct PollCycle {
    source: Arc<dyn AlertSource>,
    reconciler: Reconciler,
    cues: Option<Arc<CueDispatcher>>,
    current: Arc<DashboardSnapshot>,
}

impl PollCycle {
    pub fn new(
        source: Arc<dyn AlertSource>,
        options: ReconcileOptions,
        cues: Option<Arc<CueDispatcher>>,
    ) -> Self {
        let current = Arc::new(DashboardSnapshot {
            endpoint: source.endpoint().to_string(),
            ..DashboardSnapshot::default()
        });
        Self {
            source,
            reconciler: Reconciler::new(options),
            cues,
            current,
        }
    }

    pub fn current(&self) -> Arc<DashboardSnapshot> {
        Arc::clone(&self.current)
    }

    /// Fetch and reconcile once.
    ///
    /// A failed fetch leaves alert state untouched; the previous result stays
    /// published with only `last_error` refreshed.
    pub async fn run_once(&mut self) -> Arc<DashboardSnapshot> {
        let next = match self.source.fetch_active().await {
            Ok(alerts) => {
                let result = self.reconciler.reconcile(alerts);
                self.dispatch(&result.notifications);
                DashboardSnapshot {
                    cycle: self.current.cycle + 1,
                    result,
                    fetched_at: Some(Local::now()),
                    last_error: None,
                    endpoint: self.current.endpoint.clone(),
                }
            }
            Err(e) => {
                warn!(error = %e, transient = e.is_transient(), "alert fetch failed");
                DashboardSnapshot {
                    last_error: Some(e.short_message()),
                    ..(*self.current).clone()
                }
            }
        };
        self.current = Arc::new(next);
        Arc::clone(&self.current)
    }

    fn dispatch(&self, notifications: &[Notification]) {
        for notification in notifications {
            log_alert_event!(
                notification.alert.id.as_str(),
                notification.kind.as_str(),
                event = notification.alert.event_name.as_str()
            );
            if let Some(cues) = &self.cues
                && let Err(e) = cues.notify(notification)
            {
                warn!(alert_id = %notification.alert.id, error = %e, "failed to queue cue");
            }
        }
    }
}

/// State owned by the rotation task.
#[derive(Debug, Clone, Default)]
pub struct RotationCycle {
    cursor: RotationCursor,
    county_limit: usize,
}

impl RotationCycle {
    pub fn new(county_limit: usize) -> Self {
        Self {
            cursor: RotationCursor::new(),
            county_limit,
        }
    }

    pub fn cursor(&self) -> &RotationCursor {
        &self.cursor
    }

    /// Advance once over the snapshot's candidates.
    pub fn tick(&mut self, snapshot: &DashboardSnapshot) -> TopBar {
        let selected = self.cursor.advance(&snapshot.result.candidates);
        TopBar::from_selection(selected, self.county_limit)
    }
}

/// Receivers and control for running monitor tasks. Dropping it stops them.
pub struct MonitorHandle {
    snapshots: watch::Receiver<Arc<DashboardSnapshot>>,
    top_bar: watch::Receiver<TopBar>,
    refresh: Arc<Notify>,
    tasks: Vec<JoinHandle<()>>,
}

impl MonitorHandle {
    pub fn snapshots(&self) -> watch::Receiver<Arc<DashboardSnapshot>> {
        self.snapshots.clone()
    }

    pub fn top_bar(&self) -> watch::Receiver<TopBar> {
        self.top_bar.clone()
    }

    /// Shared signal that wakes the poll task early.
    pub fn refresher(&self) -> Arc<Notify> {
        Arc::clone(&self.refresh)
    }

    /// Ask for an immediate poll.
    pub fn refresh(&self) {
        self.refresh.notify_one();
    }
}

impl Drop for MonitorHandle {
    fn drop(&mut self) {
        for task in &self.tasks {
            task.abort();
        }
    }
}

/// Spawn the poll and rotation tasks on the current tokio runtime.
pub fn spawn_monitor(
    source: Arc<dyn AlertSource>,
    options: MonitorOptions,
    cues: Option<Arc<CueDispatcher>>,
) -> MonitorHandle {
    let mut poll = PollCycle::new(source, options.reconcile, cues);
    let (snapshot_tx, snapshots) = watch::channel(poll.current());
    let (top_bar_tx, top_bar) = watch::channel(TopBar::default());
    let refresh = Arc::new(Notify::new());

    info!(
        endpoint = %poll.current().endpoint,
        fetch_ms = options.fetch_interval.as_millis() as u64,
        rotation_ms = options.rotation_interval.as_millis() as u64,
        "starting monitor"
    );

    let poll_refresh = Arc::clone(&refresh);
    let poll_task = tokio::spawn(async move {
        let mut ticker = interval(options.fetch_interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
        loop {
            tokio::select! {
                _ = ticker.tick() => {}
                _ = poll_refresh.notified() => {
                    debug!("refresh requested");
                    ticker.reset();
                }
            }
            snapshot_tx.send_replace(poll.run_once().await);
        }
    });

    let mut rotation = RotationCycle::new(options.reconcile.county_limit);
    let mut snapshot_rx = snapshots.clone();
    let rotation_task = tokio::spawn(async move {
        let mut ticker = interval(options.rotation_interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
        loop {
            let showing_nothing = matches!(*top_bar_tx.borrow(), TopBar::NoActiveWarnings);
            tokio::select! {
                _ = ticker.tick() => {}
                // Fill an empty top bar as soon as alerts arrive
                Ok(()) = snapshot_rx.changed(), if showing_nothing => {
                    if snapshot_rx.borrow().result.candidates.is_empty() {
                        continue;
                    }
                }
            }
            let snapshot = Arc::clone(&snapshot_rx.borrow_and_update());
            top_bar_tx.send_replace(rotation.tick(&snapshot));
        }
    });

    MonitorHandle {
        snapshots,
        top_bar,
        refresh,
        tasks: vec![poll_task, rotation_task],
    }
}
