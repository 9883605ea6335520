use std::time::Duration;

use tokio::sync::watch;
use tokio::time::sleep_until;
use tokio::time::Instant;
use tracing::error;
use tracing::info;

use super::job::ScanJob;
use crate::models::ScanSummary;
use crate::Result;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunMode {
    /// One pass, then return
    Once,
    /// A pass now, then one per interval until shutdown
    Repeating,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SchedulerState {
    Init,
    /// The single pass of `RunMode::Once`
    RunningOnce,
    Running,
    Waiting,
    Done,
}

/// Runs a job once or on a fixed interval
///
/// The interval is measured from the end of the previous pass, so passes never
/// overlap and a slow pass simply delays the next one. Shutdown is signalled
/// through a `watch` channel: sending `true` (or dropping the sender) stops
/// the loop, including in the middle of a pass.
pub struct Scheduler {
    mode: RunMode,
    interval: Duration,
    state: SchedulerState,
    passes: u64,
    failures: u64,
    last_summary: Option<ScanSummary>,
}

impl Scheduler {
    pub fn new(mode: RunMode, interval: Duration) -> Self {
        Self {
            mode,
            interval,
            state: SchedulerState::Init,
            passes: 0,
            failures: 0,
            last_summary: None,
        }
    }

    pub fn state(&self) -> SchedulerState {
        self.state
    }

    /// Passes that ran to completion, successful or not
    pub fn passes(&self) -> u64 {
        self.passes
    }

    pub fn failures(&self) -> u64 {
        self.failures
    }

    /// Drive `job` until done or shut down
    ///
    /// In `Once` mode a failed pass is returned as the error. In `Repeating`
    /// mode failed passes are logged and the loop carries on. The summary of
    /// the last successful pass is returned, if there was one.
    pub async fn run<J: ScanJob>(
        &mut self,
        job: &mut J,
        mut shutdown: watch::Receiver<bool>,
    ) -> Result<Option<ScanSummary>> {
        if self.mode == RunMode::Repeating {
            info!(
                "Scheduling a run every {} minutes",
                self.interval.as_secs() / 60
            );
        }

        loop {
            if *shutdown.borrow() {
                info!("Shutdown requested, not starting another pass");
                break;
            }

            self.state = match self.mode {
                RunMode::Once => SchedulerState::RunningOnce,
                RunMode::Repeating => SchedulerState::Running,
            };
            let outcome = tokio::select! {
                biased;
                outcome = job.run_pass() => Some(outcome),
                () = wait_for_shutdown(&mut shutdown) => None,
            };
            let Some(outcome) = outcome else {
                info!("Shutdown requested, abandoning the pass in progress");
                break;
            };

            self.passes += 1;
            match (self.mode, outcome) {
                (RunMode::Once, outcome) => {
                    self.state = SchedulerState::Done;
                    return outcome.map(Some);
                }
                (RunMode::Repeating, Ok(summary)) => {
                    info!(
                        "Pass {} done: {} findings",
                        self.passes,
                        summary.findings.len()
                    );
                    self.last_summary = Some(summary);
                }
                (RunMode::Repeating, Err(e)) => {
                    self.failures += 1;
                    error!("Pass {} failed: {}", self.passes, e);
                }
            }

            self.state = SchedulerState::Waiting;
            let next_run = Instant::now() + self.interval;
            let stop = tokio::select! {
                biased;
                () = wait_for_shutdown(&mut shutdown) => true,
                () = sleep_until(next_run) => false,
            };
            if stop {
                info!("Shutdown requested while waiting for the next pass");
                break;
            }
        }

        self.state = SchedulerState::Done;
        Ok(self.last_summary.take())
    }
}

/// Resolves once shutdown has been requested or the sender is gone
async fn wait_for_shutdown(shutdown: &mut watch::Receiver<bool>) {
    loop {
        if *shutdown.borrow_and_update() {
            return;
        }
        if shutdown.changed().await.is_err() {
            return;
        }
    }
}
