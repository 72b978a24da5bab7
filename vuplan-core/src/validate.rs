use crate::action::{Action, ActionKind, Initialize, RunDuration, StartGroup, VuserBehavior};
use crate::interval::TimeInterval;
use crate::workload::{SchedulingMode, Workload, WorkloadKind};

/// Applies per-workload defaulting, dedup, and ordering rules to a parsed
/// action list for one scope (the whole test, or one group).
///
/// Never fails: duplicates are dropped with a warning and missing actions are
/// synthesized. Afterwards a basic workload holds exactly one action of each
/// applicable kind, in schedule order, with a stop-vusers action present iff
/// the duration is `run for`.
pub fn validate_action_set(
    actions: Vec<Action>,
    workload: Workload,
    total_users: u64,
) -> Vec<Action> {
    // Real-world workloads tolerate duplicates; only the first of each kind
    // participates in timing downstream.
    let mut actions = match workload.kind {
        WorkloadKind::Basic => drop_duplicates(actions),
        WorkloadKind::RealWorld => actions,
    };

    let default_count = match workload.kind {
        WorkloadKind::RealWorld => Some(total_users),
        WorkloadKind::Basic => None,
    };

    if workload.mode == SchedulingMode::ByGroup && first_of(&actions, ActionKind::StartGroup).is_none()
    {
        actions.insert(0, Action::StartGroup(StartGroup::Immediately));
    }

    if first_of(&actions, ActionKind::Initialize).is_none() {
        actions.push(Action::Initialize(Initialize::JustBeforeVuserRuns));
    }

    if first_of(&actions, ActionKind::StartVusers).is_none() {
        actions.push(Action::StartVusers(VuserBehavior::Simultaneously {
            count: default_count,
        }));
    }

    if first_of(&actions, ActionKind::Duration).is_none() {
        // A schedule that already stops vusers needs a bounded duration for
        // the stop to ever fire; everything else runs until completion.
        let duration = if first_of(&actions, ActionKind::StopVusers).is_some() {
            RunDuration::RunFor(TimeInterval::new(0, 5, 0))
        } else {
            RunDuration::UntilCompletion
        };
        actions.push(Action::Duration(duration));
    }

    let bounded = matches!(
        first_of(&actions, ActionKind::Duration),
        Some(Action::Duration(RunDuration::RunFor(_)))
    );
    if bounded && first_of(&actions, ActionKind::StopVusers).is_none() {
        actions.push(Action::StopVusers(VuserBehavior::Simultaneously {
            count: default_count,
        }));
    }

    actions.sort_by_key(|a| a.kind().rank());
    actions
}

fn first_of(actions: &[Action], kind: ActionKind) -> Option<&Action> {
    actions.iter().find(|a| a.kind() == kind)
}

fn drop_duplicates(actions: Vec<Action>) -> Vec<Action> {
    let mut seen = [false; 5];
    let mut out = Vec::with_capacity(actions.len());
    for action in actions {
        let rank = action.kind().rank();
        if seen[rank] {
            log::warn!("dropping duplicate `{}` action: {action}", action.kind());
            continue;
        }
        seen[rank] = true;
        out.push(action);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn basic_by_group() -> Workload {
        Workload::new(WorkloadKind::Basic, SchedulingMode::ByGroup)
    }

    fn real_world_by_group() -> Workload {
        Workload::new(WorkloadKind::RealWorld, SchedulingMode::ByGroup)
    }

    fn kinds(actions: &[Action]) -> Vec<ActionKind> {
        actions.iter().map(Action::kind).collect()
    }

    #[test]
    fn empty_basic_scope_gets_the_full_default_set() {
        let actions = validate_action_set(Vec::new(), basic_by_group(), 10);
        assert_eq!(
            kinds(&actions),
            vec![
                ActionKind::StartGroup,
                ActionKind::Initialize,
                ActionKind::StartVusers,
                ActionKind::Duration,
            ]
        );
        assert_eq!(actions[0], Action::StartGroup(StartGroup::Immediately));
        assert_eq!(
            actions[3],
            Action::Duration(RunDuration::UntilCompletion),
            "no stop action present, so the duration defaults to until completion"
        );
    }

    #[test]
    fn by_test_scope_never_synthesizes_start_group() {
        let workload = Workload::new(WorkloadKind::Basic, SchedulingMode::ByTest);
        let actions = validate_action_set(Vec::new(), workload, 10);
        assert_eq!(
            kinds(&actions),
            vec![
                ActionKind::Initialize,
                ActionKind::StartVusers,
                ActionKind::Duration,
            ]
        );
    }

    #[test]
    fn bounded_duration_synthesizes_a_stop() {
        let actions = validate_action_set(
            vec![Action::Duration(RunDuration::RunFor(TimeInterval::new(
                0, 10, 0,
            )))],
            real_world_by_group(),
            25,
        );
        assert_eq!(
            actions.last(),
            Some(&Action::StopVusers(VuserBehavior::Simultaneously {
                count: Some(25),
            }))
        );
    }

    #[test]
    fn explicit_stop_synthesizes_a_bounded_duration() {
        let actions = validate_action_set(
            vec![Action::StopVusers(VuserBehavior::Simultaneously {
                count: None,
            })],
            basic_by_group(),
            10,
        );
        assert_eq!(
            first_of(&actions, ActionKind::Duration),
            Some(&Action::Duration(RunDuration::RunFor(TimeInterval::new(
                0, 5, 0
            ))))
        );
    }

    #[test]
    fn basic_workloads_keep_only_the_first_of_each_kind() {
        let actions = validate_action_set(
            vec![
                Action::Duration(RunDuration::UntilCompletion),
                Action::Duration(RunDuration::RunFor(TimeInterval::new(1, 0, 0))),
                Action::StartGroup(StartGroup::Immediately),
                Action::StartGroup(StartGroup::WithDelay(TimeInterval::new(0, 0, 30))),
            ],
            basic_by_group(),
            10,
        );
        assert_eq!(
            first_of(&actions, ActionKind::Duration),
            Some(&Action::Duration(RunDuration::UntilCompletion))
        );
        assert_eq!(
            first_of(&actions, ActionKind::StartGroup),
            Some(&Action::StartGroup(StartGroup::Immediately))
        );
        assert_eq!(kinds(&actions).iter().filter(|k| **k == ActionKind::Duration).count(), 1);
    }

    #[test]
    fn real_world_workloads_tolerate_duplicates() {
        let actions = validate_action_set(
            vec![
                Action::Duration(RunDuration::UntilCompletion),
                Action::Duration(RunDuration::RunFor(TimeInterval::new(1, 0, 0))),
            ],
            real_world_by_group(),
            10,
        );
        assert_eq!(
            kinds(&actions)
                .iter()
                .filter(|k| **k == ActionKind::Duration)
                .count(),
            2
        );
        // First of the kind still wins for timing purposes.
        assert_eq!(
            first_of(&actions, ActionKind::Duration),
            Some(&Action::Duration(RunDuration::UntilCompletion))
        );
    }

    #[test]
    fn sorted_into_schedule_order() {
        let actions = validate_action_set(
            vec![
                Action::Duration(RunDuration::UntilCompletion),
                Action::StartVusers(VuserBehavior::Simultaneously { count: None }),
                Action::Initialize(Initialize::JustBeforeVuserRuns),
                Action::StartGroup(StartGroup::Immediately),
            ],
            basic_by_group(),
            10,
        );
        assert_eq!(
            kinds(&actions),
            vec![
                ActionKind::StartGroup,
                ActionKind::Initialize,
                ActionKind::StartVusers,
                ActionKind::Duration,
            ]
        );
    }
}
