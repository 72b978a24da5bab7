use std::sync::Arc;
use std::time::Instant;

use crate::cancel::CancelSignal;
use crate::config::MonitorConfig;
use crate::ports::{AuthManager, ControlClient, StatusClient};
use crate::status::{RunState, RunStatus};

/// Side-effect flags for the external run model, filled in as the monitor
/// observes the run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunModel {
    pub test_failed: bool,
    pub failure_reason: Option<String>,
    pub html_report_available: bool,
}

/// Why the monitor stopped. `TimeslotExpired` is not a failure: the caller
/// re-checks the run later and must not conflate it with `Terminal`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MonitorExit {
    /// The run reached a state that is terminal for the configured
    /// post-run action.
    Terminal,
    /// A safety threshold was breached and an abort was issued.
    ThresholdBreached,
    /// The reserved time window elapsed while the run was still going.
    TimeslotExpired,
    /// Cooperative cancellation was requested.
    Cancelled,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MonitorOutcome {
    /// The last known status snapshot; `Undefined` if no fetch ever succeeded.
    pub status: RunStatus,
    pub exit: MonitorExit,
    pub run: RunModel,
}

/// Drives the monitoring state machine for one remote run.
///
/// Single-threaded and cooperative: one fetch at a time, suspension only in
/// the interval sleeps and the network calls. Transient fetch failures are
/// absorbed by retry and reauthentication and never surface; the loop only
/// ends on a terminal state, a threshold breach, timeslot expiry, or
/// cancellation.
pub struct RunStatusPoller<S, C, A> {
    run_id: u64,
    config: MonitorConfig,
    status: S,
    control: C,
    auth: A,
    cancel: Arc<CancelSignal>,
}

impl<S, C, A> RunStatusPoller<S, C, A>
where
    S: StatusClient,
    C: ControlClient,
    A: AuthManager,
{
    pub fn new(
        run_id: u64,
        config: MonitorConfig,
        status: S,
        control: C,
        auth: A,
        cancel: Arc<CancelSignal>,
    ) -> Self {
        Self {
            run_id,
            config,
            status,
            control,
            auth,
            cancel,
        }
    }

    pub async fn run(self) -> MonitorOutcome {
        let started = Instant::now();
        let mut consecutive_failures: u32 = 0;
        let mut last_logged_state: Option<RunState> = None;
        let mut last_progress_log = Instant::now();
        let mut last_known = RunStatus::default();
        let mut run = RunModel::default();

        loop {
            if self.cancel.is_cancelled() {
                log::info!("monitoring of run {} cancelled", self.run_id);
                return MonitorOutcome {
                    status: last_known,
                    exit: MonitorExit::Cancelled,
                    run,
                };
            }

            let status = match self.status.fetch_status(self.run_id).await {
                Ok(status) => status,
                Err(err) => {
                    consecutive_failures += 1;
                    log::warn!(
                        "status fetch for run {} failed ({consecutive_failures} consecutive): {err}",
                        self.run_id
                    );
                    if consecutive_failures >= self.config.max_retries {
                        if let Err(err) = self.auth.login().await {
                            log::warn!("reauthentication for run {} failed: {err}", self.run_id);
                        }
                        consecutive_failures = 0;
                    }
                    if started.elapsed() >= self.config.timeslot_duration {
                        log::info!(
                            "timeslot for run {} elapsed while unreachable; last known state: {}",
                            self.run_id,
                            last_known.run_state
                        );
                        return MonitorOutcome {
                            status: last_known,
                            exit: MonitorExit::TimeslotExpired,
                            run,
                        };
                    }
                    if self.sleep_or_cancelled(self.config.retry_delay).await {
                        return MonitorOutcome {
                            status: last_known,
                            exit: MonitorExit::Cancelled,
                            run,
                        };
                    }
                    continue;
                }
            };

            consecutive_failures = 0;
            last_known = status.clone();

            if last_logged_state != Some(status.run_state) {
                log::info!("run {} is {}", self.run_id, status.run_state);
                last_logged_state = Some(status.run_state);
                last_progress_log = Instant::now();
            } else if last_progress_log.elapsed() >= self.config.progress_log_interval {
                log::info!(
                    "run {} still {} (errors: {}, failed transactions: {})",
                    self.run_id,
                    status.run_state,
                    status.total_errors,
                    status.total_failed_transactions
                );
                last_progress_log = Instant::now();
            }

            if self.config.post_run_action.is_terminal(status.run_state) {
                if status.run_state == RunState::Finished {
                    run.html_report_available = true;
                }
                return MonitorOutcome {
                    status,
                    exit: MonitorExit::Terminal,
                    run,
                };
            }

            if status.run_state == RunState::Running {
                if let Some(reason) = self.breach_reason(&status) {
                    log::error!("aborting run {}: {reason}", self.run_id);
                    // Best effort, at most one attempt per breach. The run
                    // model is flagged failed whether or not it lands.
                    if let Err(err) = self.control.abort_run(self.run_id).await {
                        log::warn!("abort request for run {} failed: {err}", self.run_id);
                    }
                    run.test_failed = true;
                    run.failure_reason = Some(reason);
                    return MonitorOutcome {
                        status,
                        exit: MonitorExit::ThresholdBreached,
                        run,
                    };
                }
            }

            if started.elapsed() >= self.config.timeslot_duration {
                log::info!(
                    "timeslot for run {} elapsed; last state: {}",
                    self.run_id,
                    status.run_state
                );
                return MonitorOutcome {
                    status,
                    exit: MonitorExit::TimeslotExpired,
                    run,
                };
            }

            if self.sleep_or_cancelled(self.config.poll_interval).await {
                return MonitorOutcome {
                    status: last_known,
                    exit: MonitorExit::Cancelled,
                    run,
                };
            }
        }
    }

    fn breach_reason(&self, status: &RunStatus) -> Option<String> {
        if let Some(max) = self.config.max_errors {
            if status.total_errors >= max {
                return Some(format!(
                    "total errors ({}) reached the configured maximum ({max})",
                    status.total_errors
                ));
            }
        }
        if let Some(max) = self.config.max_failed_transactions {
            if status.total_failed_transactions >= max {
                return Some(format!(
                    "total failed transactions ({}) reached the configured maximum ({max})",
                    status.total_failed_transactions
                ));
            }
        }
        None
    }

    /// Sleeps for `duration`, returning true if cancellation arrived first.
    async fn sleep_or_cancelled(&self, duration: std::time::Duration) -> bool {
        tokio::select! {
            _ = tokio::time::sleep(duration) => false,
            _ = self.cancel.cancelled() => true,
        }
    }
}
