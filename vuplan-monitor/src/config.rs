use std::time::Duration;

use crate::status::PostRunAction;

/// Monitoring knobs. Values only; loading them from CLI flags or config
/// files happens elsewhere.
#[derive(Debug, Clone)]
pub struct MonitorConfig {
    /// Pause between successful polls.
    pub poll_interval: Duration,
    /// Fixed pause after a failed fetch before the next attempt.
    pub retry_delay: Duration,
    /// Consecutive fetch failures tolerated before reauthenticating.
    pub max_retries: u32,
    /// Abort the run once total errors reach this. `None` disables.
    pub max_errors: Option<u64>,
    /// Abort the run once total failed transactions reach this. `None` disables.
    pub max_failed_transactions: Option<u64>,
    /// The reserved wall-clock budget for the run. Monitoring stops when it
    /// elapses, without treating the run as failed.
    pub timeslot_duration: Duration,
    pub post_run_action: PostRunAction,
    /// Rate limit for unchanged-state progress logs.
    pub progress_log_interval: Duration,
}

impl Default for MonitorConfig {
    fn default() -> Self {
        Self {
            poll_interval: Duration::from_secs(5),
            retry_delay: Duration::from_secs(30),
            max_retries: 3,
            max_errors: None,
            max_failed_transactions: None,
            timeslot_duration: Duration::from_secs(2 * 60 * 60),
            post_run_action: PostRunAction::CollateAndAnalyze,
            progress_log_interval: Duration::from_secs(5 * 60),
        }
    }
}
