/// Remote run state as reported by the status endpoint.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, strum::EnumString, strum::Display,
)]
#[strum(ascii_case_insensitive)]
pub enum RunState {
    #[default]
    #[strum(serialize = "UNDEFINED")]
    Undefined,
    #[strum(serialize = "INITIALIZING")]
    Initializing,
    #[strum(serialize = "RUNNING")]
    Running,
    #[strum(serialize = "STOPPING")]
    Stopping,
    #[strum(serialize = "BEFORE_COLLATING_RESULTS")]
    BeforeCollatingResults,
    #[strum(serialize = "COLLATING_RESULTS")]
    CollatingResults,
    #[strum(serialize = "BEFORE_CREATING_ANALYSIS_DATA")]
    BeforeCreatingAnalysisData,
    #[strum(serialize = "CREATING_ANALYSIS_DATA")]
    CreatingAnalysisData,
    #[strum(serialize = "FINISHED")]
    Finished,
    #[strum(serialize = "FAILED")]
    Failed,
    #[strum(serialize = "CANCELED")]
    Canceled,
}

/// What the remote side does with results after the run, which decides how
/// far the monitor has to follow the run's lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, strum::EnumString, strum::Display)]
#[strum(ascii_case_insensitive)]
pub enum PostRunAction {
    #[strum(serialize = "do-not-collate")]
    DoNotCollate,
    #[strum(serialize = "collate-only")]
    CollateOnly,
    #[strum(serialize = "collate-and-analyze")]
    CollateAndAnalyze,
}

impl PostRunAction {
    /// True when the monitor is done with this run: nothing the policy still
    /// cares about can happen after `state`.
    #[must_use]
    pub fn is_terminal(self, state: RunState) -> bool {
        match state {
            RunState::Finished | RunState::Failed | RunState::Canceled => true,
            RunState::BeforeCollatingResults => self == Self::DoNotCollate,
            RunState::BeforeCreatingAnalysisData => {
                self == Self::DoNotCollate || self == Self::CollateOnly
            }
            _ => false,
        }
    }
}

/// One snapshot of the remote run, superseded by the next poll.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunStatus {
    pub run_state: RunState,
    pub total_errors: u64,
    pub total_failed_transactions: u64,
    pub timeslot_id: Option<u64>,
}
