//! Interval-driven snapshot sampling
//!
//! The sampler owns a recurring timer that collects a snapshot once per
//! period and appends it to an in-memory series. One tracking session runs
//! at a time; the series lives until the next `start()` clears it. Nothing
//! is persisted.

use crate::collector::SnapshotCollector;
use crate::report::Snapshot;
use log::{debug, info};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::{self, MissedTickBehavior};

/// Default sampling period: 5 minutes
pub const DEFAULT_PERIOD: Duration = Duration::from_secs(300);

/// Manages periodic, unattended snapshot collection.
///
/// Two states: Idle and Tracking. `start` and `stop` are idempotent; at
/// most one timer exists at any time. Timer-driven collections skip
/// expensive probes so sampling never forces scene redraws.
pub struct Sampler {
    collector: Arc<SnapshotCollector>,
    period: Duration,
    series: Arc<Mutex<Vec<Snapshot>>>,
    shutdown: Option<watch::Sender<bool>>,
    task: Option<JoinHandle<()>>,
}

impl Sampler {
    pub fn new(collector: Arc<SnapshotCollector>, period: Duration) -> Self {
        Self {
            collector,
            period,
            series: Arc::new(Mutex::new(Vec::new())),
            shutdown: None,
            task: None,
        }
    }

    /// Whether a tracking session is active
    pub fn is_active(&self) -> bool {
        self.task.is_some()
    }

    /// Begin a tracking session.
    ///
    /// No-op while already Tracking: the running timer and the accumulated
    /// series are left untouched. Otherwise the prior series is cleared and
    /// a recurring timer is scheduled, first firing one full period from now.
    pub fn start(&mut self) {
        if self.task.is_some() {
            debug!("Sampler already tracking, ignoring start");
            return;
        }

        info!("Starting tracking session with period {:?}", self.period);
        self.series.lock().unwrap().clear();

        let (shutdown_tx, mut shutdown_rx) = watch::channel(false);
        let collector = Arc::clone(&self.collector);
        let series = Arc::clone(&self.series);
        let period = self.period;

        let task = tokio::spawn(async move {
            let mut ticker = time::interval_at(time::Instant::now() + period, period);
            // A slow collection delays the next tick rather than bursting
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

            loop {
                tokio::select! {
                    _ = ticker.tick() => {
                        let snapshot = collector.collect(true).await;
                        debug!("Appending sample taken at {}", snapshot.timestamp());
                        series.lock().unwrap().push(snapshot);
                    }
                    _ = shutdown_rx.changed() => {
                        debug!("Tracking timer cancelled");
                        break;
                    }
                }
            }
        });

        self.shutdown = Some(shutdown_tx);
        self.task = Some(task);
    }

    /// End the tracking session.
    ///
    /// No-op while Idle. Cancels the timer and waits for the sampling task
    /// to finish, so a collection already in flight still appends its
    /// snapshot before this returns. The series stays readable.
    pub async fn stop(&mut self) {
        let Some(task) = self.task.take() else {
            debug!("Sampler already idle, ignoring stop");
            return;
        };

        info!("Stopping tracking session");
        if let Some(shutdown) = self.shutdown.take() {
            let _ = shutdown.send(true);
        }
        let _ = task.await;

        info!(
            "Tracking session ended with {} samples",
            self.series.lock().unwrap().len()
        );
    }

    /// Snapshot of the sample series collected so far
    pub fn series(&self) -> Vec<Snapshot> {
        self.series.lock().unwrap().clone()
    }
}
