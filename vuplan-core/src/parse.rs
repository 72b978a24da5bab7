use crate::action::{Action, ActionKind, Initialize, Ramp, RunDuration, StartGroup, VuserBehavior};
use crate::compile::GroupCatalog;
use crate::error::{Error, Result};
use crate::interval::TimeInterval;
use crate::workload::{Workload, WorkloadKind};

/// Parses one DSL line into a typed [`Action`].
///
/// The keyword before the first `:` picks the grammar; keywords and grammar
/// words are case- and whitespace-insensitive, payloads (group names, counts,
/// intervals) are trimmed but otherwise taken as written. Parsing is pure:
/// the same line always yields the same action.
pub fn parse_action(line: &str, workload: Workload, catalog: &GroupCatalog) -> Result<Action> {
    let raw = line.trim();
    let (head, body) = match raw.split_once(':') {
        Some((head, body)) => (head, body.trim()),
        None => (raw, ""),
    };

    let kind: ActionKind = keyword(head)
        .parse()
        .map_err(|_| Error::UnknownAction {
            line: raw.to_string(),
        })?;

    match kind {
        ActionKind::StartGroup => parse_start_group(body, raw, catalog),
        ActionKind::Initialize => parse_initialize(body, raw),
        ActionKind::StartVusers => {
            parse_vusers(ActionKind::StartVusers, body, raw, workload).map(Action::StartVusers)
        }
        ActionKind::Duration => parse_duration(body, raw),
        ActionKind::StopVusers => {
            parse_vusers(ActionKind::StopVusers, body, raw, workload).map(Action::StopVusers)
        }
    }
}

/// Lowercases and strips all whitespace, so `Start Group` matches `startgroup`.
fn keyword(s: &str) -> String {
    s.chars()
        .filter(|c| !c.is_whitespace())
        .collect::<String>()
        .to_ascii_lowercase()
}

fn parse_err(kind: ActionKind, input: &str) -> Error {
    Error::Parse {
        kind,
        input: input.to_string(),
        usage: kind.usage(),
    }
}

fn parse_start_group(body: &str, raw: &str, catalog: &GroupCatalog) -> Result<Action> {
    if keyword(body) == "immediately" {
        return Ok(Action::StartGroup(StartGroup::Immediately));
    }

    let Some((key, payload)) = body.split_once(':') else {
        return Err(parse_err(ActionKind::StartGroup, raw));
    };

    match keyword(key).as_str() {
        "withdelay" => Ok(Action::StartGroup(StartGroup::WithDelay(payload.parse()?))),
        "whengroupfinishes" => {
            let target = payload.trim();
            let canonical = catalog
                .resolve(target)
                .ok_or_else(|| Error::UnknownGroupReference {
                    target: target.to_string(),
                })?;
            Ok(Action::StartGroup(StartGroup::WhenGroupFinishes(
                canonical.to_string(),
            )))
        }
        _ => Err(parse_err(ActionKind::StartGroup, raw)),
    }
}

fn parse_initialize(body: &str, raw: &str) -> Result<Action> {
    let (main, wait) = split_wait(body);
    let wait = wait.map(str::parse::<TimeInterval>).transpose()?;

    let norm = keyword(main);
    if norm.is_empty() || norm == "justbeforevuserruns" {
        if wait.is_some() {
            return Err(parse_err(ActionKind::Initialize, raw));
        }
        return Ok(Action::Initialize(Initialize::JustBeforeVuserRuns));
    }
    if norm == "simultaneously" {
        return Ok(Action::Initialize(Initialize::Simultaneously { wait }));
    }

    if let Some((key, payload)) = main.split_once(':') {
        if keyword(key) == "gradually" {
            let Some((batch, interval)) = payload.split_once('/') else {
                return Err(parse_err(ActionKind::Initialize, raw));
            };
            return Ok(Action::Initialize(Initialize::Gradually {
                batch_size: positive(batch, ActionKind::Initialize, raw)?,
                interval: interval.trim().parse()?,
                wait,
            }));
        }
    }

    Err(parse_err(ActionKind::Initialize, raw))
}

fn parse_vusers(
    kind: ActionKind,
    body: &str,
    raw: &str,
    workload: Workload,
) -> Result<VuserBehavior> {
    if keyword(body) == "simultaneously" {
        return Ok(VuserBehavior::Simultaneously { count: None });
    }

    let Some((key, payload)) = body.split_once(':') else {
        return Err(parse_err(kind, raw));
    };

    match keyword(key).as_str() {
        "simultaneously" => Ok(VuserBehavior::Simultaneously {
            count: vuser_count(payload, kind, raw, workload)?,
        }),
        "gradually" => {
            let mut parts = payload.splitn(3, '/');
            let (Some(count), Some(batch), Some(interval)) =
                (parts.next(), parts.next(), parts.next())
            else {
                return Err(parse_err(kind, raw));
            };
            Ok(VuserBehavior::Gradually {
                count: vuser_count(count, kind, raw, workload)?,
                ramp: Ramp {
                    batch_size: positive(batch, kind, raw)?,
                    interval: interval.trim().parse()?,
                },
            })
        }
        _ => Err(parse_err(kind, raw)),
    }
}

fn parse_duration(body: &str, raw: &str) -> Result<Action> {
    let norm = keyword(body);
    if norm.is_empty() || norm == "untilcompletion" {
        return Ok(Action::Duration(RunDuration::UntilCompletion));
    }

    if let Some((key, payload)) = body.split_once(':') {
        if keyword(key) == "runfor" {
            return Ok(Action::Duration(RunDuration::RunFor(payload.parse()?)));
        }
    }

    Err(parse_err(ActionKind::Duration, raw))
}

/// Splits a trailing `:wait=<interval>` suffix off an initialize body. The
/// suffix is located by searching for the `wait` word rather than by `:`
/// because the interval payloads themselves may contain colons.
fn split_wait(body: &str) -> (&str, Option<&str>) {
    let lower = body.to_ascii_lowercase();
    if let Some(pos) = lower.rfind("wait") {
        let before = body[..pos].trim_end();
        let after = body[pos + "wait".len()..].trim_start();
        if let (Some(main), Some(value)) = (before.strip_suffix(':'), after.strip_prefix('=')) {
            return (main, Some(value.trim()));
        }
    }
    (body, None)
}

/// A vuser count is only meaningful for real-world workloads; basic workloads
/// size every group from its configured vusers, so the count is dropped with
/// a note rather than rejected.
fn vuser_count(
    s: &str,
    kind: ActionKind,
    raw: &str,
    workload: Workload,
) -> Result<Option<u64>> {
    let count: u64 = s.trim().parse().map_err(|_| parse_err(kind, raw))?;
    if workload.kind == WorkloadKind::Basic {
        log::debug!("ignoring vuser count {count} in `{raw}`: basic workloads use the group total");
        return Ok(None);
    }
    Ok(Some(count))
}

fn positive(s: &str, kind: ActionKind, raw: &str) -> Result<u64> {
    let n: u64 = s.trim().parse().map_err(|_| parse_err(kind, raw))?;
    if n == 0 {
        return Err(parse_err(kind, raw));
    }
    Ok(n)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::workload::SchedulingMode;

    fn real_world() -> Workload {
        Workload::new(WorkloadKind::RealWorld, SchedulingMode::ByGroup)
    }

    fn basic() -> Workload {
        Workload::new(WorkloadKind::Basic, SchedulingMode::ByGroup)
    }

    fn catalog() -> GroupCatalog {
        GroupCatalog::new(["Browsers", "Buyers"])
    }

    fn parse(line: &str, workload: Workload) -> Action {
        parse_action(line, workload, &catalog()).unwrap_or_else(|e| panic!("{e}"))
    }

    #[test]
    fn classifies_keywords_case_and_whitespace_insensitively() {
        let a = parse("  Start Group : Immediately ", basic());
        assert_eq!(a, Action::StartGroup(StartGroup::Immediately));

        let a = parse("STARTVUSERS:SIMULTANEOUSLY", basic());
        assert_eq!(a, Action::StartVusers(VuserBehavior::Simultaneously { count: None }));
    }

    #[test]
    fn unknown_keyword_lists_supported_actions() {
        let err = parse_action("rampup:now", basic(), &catalog());
        match err {
            Err(Error::UnknownAction { line }) => assert_eq!(line, "rampup:now"),
            other => panic!("expected UnknownAction, got {other:?}"),
        }
    }

    #[test]
    fn start_group_grammar() {
        assert_eq!(
            parse("startgroup:with delay:00:00:45", basic()),
            Action::StartGroup(StartGroup::WithDelay(TimeInterval::new(0, 0, 45)))
        );
        assert_eq!(
            parse("startgroup:when group finishes: buyers ", basic()),
            Action::StartGroup(StartGroup::WhenGroupFinishes("Buyers".to_string()))
        );
    }

    #[test]
    fn unknown_dependency_target_is_fatal() {
        let err = parse_action("startgroup:when group finishes:Ghost", basic(), &catalog());
        match err {
            Err(Error::UnknownGroupReference { target }) => assert_eq!(target, "Ghost"),
            other => panic!("expected UnknownGroupReference, got {other:?}"),
        }
    }

    #[test]
    fn initialize_grammar() {
        assert_eq!(
            parse("initialize:just before vuser runs", basic()),
            Action::Initialize(Initialize::JustBeforeVuserRuns)
        );
        assert_eq!(
            parse("initialize:simultaneously:wait=00:00:10", basic()),
            Action::Initialize(Initialize::Simultaneously {
                wait: Some(TimeInterval::new(0, 0, 10)),
            })
        );
        assert_eq!(
            parse("initialize:gradually:5/00:00:30:wait=00:01:00", basic()),
            Action::Initialize(Initialize::Gradually {
                batch_size: 5,
                interval: TimeInterval::new(0, 0, 30),
                wait: Some(TimeInterval::new(0, 1, 0)),
            })
        );
        assert_eq!(
            parse("initialize:", basic()),
            Action::Initialize(Initialize::JustBeforeVuserRuns)
        );
    }

    #[test]
    fn vuser_grammar_keeps_counts_for_real_world_only() {
        assert_eq!(
            parse("startvusers:gradually:10/2/00:00:30", real_world()),
            Action::StartVusers(VuserBehavior::Gradually {
                count: Some(10),
                ramp: Ramp {
                    batch_size: 2,
                    interval: TimeInterval::new(0, 0, 30),
                },
            })
        );
        assert_eq!(
            parse("stopvusers:simultaneously:25", real_world()),
            Action::StopVusers(VuserBehavior::Simultaneously { count: Some(25) })
        );

        // Same lines under a basic workload: counts are dropped, not fatal.
        assert_eq!(
            parse("stopvusers:simultaneously:25", basic()),
            Action::StopVusers(VuserBehavior::Simultaneously { count: None })
        );
    }

    #[test]
    fn zero_batch_size_is_rejected() {
        let err = parse_action("startvusers:gradually:10/0/00:00:30", real_world(), &catalog());
        assert!(matches!(err, Err(Error::Parse { .. })));
    }

    #[test]
    fn duration_grammar() {
        assert_eq!(
            parse("duration:until completion", basic()),
            Action::Duration(RunDuration::UntilCompletion)
        );
        assert_eq!(
            parse("duration:run for:00:10:00", basic()),
            Action::Duration(RunDuration::RunFor(TimeInterval::new(0, 10, 0)))
        );
        assert_eq!(
            parse("duration:", basic()),
            Action::Duration(RunDuration::UntilCompletion)
        );
    }

    #[test]
    fn parse_errors_carry_input_and_usage() {
        let err = parse_action("duration:run for:", basic(), &catalog());
        assert!(err.is_err());

        let err = parse_action("startvusers:gradually:10", real_world(), &catalog());
        match err {
            Err(Error::Parse { kind, input, usage }) => {
                assert_eq!(kind, ActionKind::StartVusers);
                assert_eq!(input, "startvusers:gradually:10");
                assert!(usage.contains("gradually:<count>/<batch>/<hh:mm:ss>"));
            }
            other => panic!("expected Parse error, got {other:?}"),
        }
    }

    #[test]
    fn parsing_is_idempotent() {
        let line = "startvusers:gradually:10/2/00:00:30";
        let first = parse(line, real_world());
        for _ in 0..5 {
            assert_eq!(parse(line, real_world()), first);
        }
    }
}
