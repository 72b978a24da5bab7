use crate::timing::GroupTimingInfo;

/// Pure conversion of a group's resolved offset and ramp figures into window
/// boundaries, both relative to test start and as absolute epoch seconds.
/// Deterministic, no clock access, safely re-callable.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeModel {
    test_start_epoch: u64,
    offset: u64,
    ramp_up: u64,
    duration: u64,
    ramp_down: u64,
}

impl TimeModel {
    #[must_use]
    pub fn new(
        test_start_epoch: u64,
        offset: u64,
        ramp_up: u64,
        duration: u64,
        ramp_down: u64,
    ) -> Self {
        Self {
            test_start_epoch,
            offset,
            ramp_up,
            duration,
            ramp_down,
        }
    }

    #[must_use]
    pub fn from_timing(test_start_epoch: u64, offset: u64, timing: &GroupTimingInfo) -> Self {
        Self::new(
            test_start_epoch,
            offset,
            timing.ramp_up_seconds,
            timing.duration_seconds,
            timing.ramp_down_seconds,
        )
    }

    /// Seconds from test start until the group starts.
    #[must_use]
    pub fn group_start(&self) -> u64 {
        self.offset
    }

    /// Seconds from test start until the full vuser count is held.
    #[must_use]
    pub fn steady_state_start(&self) -> u64 {
        self.offset + self.ramp_up
    }

    /// Seconds from test start until the steady state ends. Equal to
    /// [`Self::steady_state_start`] when the group runs until it is
    /// externally stopped; see [`Self::runs_until_stopped`].
    #[must_use]
    pub fn steady_state_end(&self) -> u64 {
        self.offset + self.ramp_up + self.duration
    }

    /// Seconds from test start until the last vuser of the group stops.
    #[must_use]
    pub fn group_end(&self) -> u64 {
        self.offset + self.ramp_up + self.duration + self.ramp_down
    }

    #[must_use]
    pub fn group_start_epoch(&self) -> u64 {
        self.test_start_epoch + self.group_start()
    }

    #[must_use]
    pub fn steady_state_start_epoch(&self) -> u64 {
        self.test_start_epoch + self.steady_state_start()
    }

    #[must_use]
    pub fn steady_state_end_epoch(&self) -> u64 {
        self.test_start_epoch + self.steady_state_end()
    }

    #[must_use]
    pub fn group_end_epoch(&self) -> u64 {
        self.test_start_epoch + self.group_end()
    }

    /// True when the group has no bounded duration and runs until the test
    /// stops it.
    #[must_use]
    pub fn runs_until_stopped(&self) -> bool {
        self.duration == 0
    }
}
