use crate::action::{Action, RunDuration, StartGroup, VuserBehavior};

/// Per-group scheduling facts derived once from a validated action list and
/// immutable thereafter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GroupTimingInfo {
    pub group_name: String,
    pub total_users: u64,
    pub start: StartGroup,
    pub ramp_up_seconds: u64,
    pub duration_seconds: u64,
    pub ramp_down_seconds: u64,
    pub delay_seconds: Option<u64>,
}

/// Derives the timing facts for one group. Only the first action of each kind
/// participates, which matters for real-world workloads where duplicates are
/// tolerated.
#[must_use]
pub fn extract_group_timing(
    group_name: &str,
    actions: &[Action],
    total_users: u64,
) -> GroupTimingInfo {
    let start = actions
        .iter()
        .find_map(|a| match a {
            Action::StartGroup(s) => Some(s.clone()),
            _ => None,
        })
        .unwrap_or(StartGroup::Immediately);

    let ramp_up_seconds = actions
        .iter()
        .find_map(|a| match a {
            Action::StartVusers(b) => Some(ramp_seconds(b, total_users)),
            _ => None,
        })
        .unwrap_or(0);

    let ramp_down_seconds = actions
        .iter()
        .find_map(|a| match a {
            Action::StopVusers(b) => Some(ramp_seconds(b, total_users)),
            _ => None,
        })
        .unwrap_or(0);

    // 0 means the group runs until it is externally stopped.
    let duration_seconds = actions
        .iter()
        .find_map(|a| match a {
            Action::Duration(RunDuration::RunFor(i)) => Some(i.total_seconds()),
            Action::Duration(RunDuration::UntilCompletion) => Some(0),
            _ => None,
        })
        .unwrap_or(0);

    let delay_seconds = match &start {
        StartGroup::WithDelay(i) => Some(i.total_seconds()),
        _ => None,
    };

    GroupTimingInfo {
        group_name: group_name.to_string(),
        total_users,
        start,
        ramp_up_seconds,
        duration_seconds,
        ramp_down_seconds,
        delay_seconds,
    }
}

/// Seconds a batched ramp takes to move every vuser: the first batch starts
/// at once, each remaining batch waits one interval.
fn ramp_seconds(behavior: &VuserBehavior, total_users: u64) -> u64 {
    match behavior {
        VuserBehavior::Simultaneously { .. } => 0,
        VuserBehavior::Gradually { count, ramp } => {
            let users = count.unwrap_or(total_users);
            if users <= 1 {
                return 0;
            }
            (users - 1).div_ceil(ramp.batch_size) * ramp.interval.total_seconds()
        }
    }
}
