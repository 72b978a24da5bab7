use std::fmt;

use crate::interval::TimeInterval;

/// The DSL keyword of an action, which doubles as its scheduling sort rank.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, strum::EnumString, strum::Display)]
pub enum ActionKind {
    #[strum(serialize = "startgroup")]
    StartGroup,
    #[strum(serialize = "initialize")]
    Initialize,
    #[strum(serialize = "startvusers")]
    StartVusers,
    #[strum(serialize = "duration")]
    Duration,
    #[strum(serialize = "stopvusers")]
    StopVusers,
}

impl ActionKind {
    /// Position of this kind in a validated action list.
    #[must_use]
    pub(crate) fn rank(self) -> usize {
        match self {
            Self::StartGroup => 0,
            Self::Initialize => 1,
            Self::StartVusers => 2,
            Self::Duration => 3,
            Self::StopVusers => 4,
        }
    }

    /// Canonical usage line quoted in parse errors.
    #[must_use]
    pub fn usage(self) -> &'static str {
        match self {
            Self::StartGroup => {
                "startgroup:immediately | startgroup:with delay:<hh:mm:ss> | startgroup:when group finishes:<group>"
            }
            Self::Initialize => {
                "initialize:just before vuser runs | initialize:simultaneously[:wait=<hh:mm:ss>] | initialize:gradually:<batch>/<hh:mm:ss>[:wait=<hh:mm:ss>]"
            }
            Self::StartVusers => {
                "startvusers:simultaneously[:<count>] | startvusers:gradually:<count>/<batch>/<hh:mm:ss>"
            }
            Self::Duration => "duration:until completion | duration:run for:<hh:mm:ss>",
            Self::StopVusers => {
                "stopvusers:simultaneously[:<count>] | stopvusers:gradually:<count>/<batch>/<hh:mm:ss>"
            }
        }
    }
}

/// When a group starts relative to the rest of the test.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StartGroup {
    Immediately,
    WithDelay(TimeInterval),
    WhenGroupFinishes(String),
}

/// How a group's vusers are initialized before they run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Initialize {
    JustBeforeVuserRuns,
    Simultaneously {
        wait: Option<TimeInterval>,
    },
    Gradually {
        batch_size: u64,
        interval: TimeInterval,
        wait: Option<TimeInterval>,
    },
}

/// A batched, interval-spaced change in running vuser count.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Ramp {
    /// Always > 0; enforced by the parser.
    pub batch_size: u64,
    pub interval: TimeInterval,
}

/// Shared shape of start-vusers and stop-vusers actions. The count is only
/// meaningful for real-world workloads; basic workloads always carry `None`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VuserBehavior {
    Simultaneously { count: Option<u64> },
    Gradually { count: Option<u64>, ramp: Ramp },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunDuration {
    UntilCompletion,
    RunFor(TimeInterval),
}

/// One parsed scheduling action. Exactly one variant is ever populated;
/// instances are only built by the parser and the validator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    StartGroup(StartGroup),
    Initialize(Initialize),
    StartVusers(VuserBehavior),
    Duration(RunDuration),
    StopVusers(VuserBehavior),
}

impl Action {
    #[must_use]
    pub fn kind(&self) -> ActionKind {
        match self {
            Self::StartGroup(_) => ActionKind::StartGroup,
            Self::Initialize(_) => ActionKind::Initialize,
            Self::StartVusers(_) => ActionKind::StartVusers,
            Self::Duration(_) => ActionKind::Duration,
            Self::StopVusers(_) => ActionKind::StopVusers,
        }
    }
}

impl fmt::Display for StartGroup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Immediately => write!(f, "immediately"),
            Self::WithDelay(i) => write!(f, "with delay:{i}"),
            Self::WhenGroupFinishes(group) => write!(f, "when group finishes:{group}"),
        }
    }
}

impl fmt::Display for Initialize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::JustBeforeVuserRuns => write!(f, "just before vuser runs"),
            Self::Simultaneously { wait: None } => write!(f, "simultaneously"),
            Self::Simultaneously { wait: Some(w) } => write!(f, "simultaneously:wait={w}"),
            Self::Gradually {
                batch_size,
                interval,
                wait,
            } => {
                write!(f, "gradually:{batch_size}/{interval}")?;
                if let Some(w) = wait {
                    write!(f, ":wait={w}")?;
                }
                Ok(())
            }
        }
    }
}

impl fmt::Display for VuserBehavior {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Simultaneously { count: None } => write!(f, "simultaneously"),
            Self::Simultaneously { count: Some(n) } => write!(f, "simultaneously:{n}"),
            Self::Gradually { count, ramp } => {
                write!(f, "gradually:")?;
                if let Some(n) = count {
                    write!(f, "{n}/")?;
                }
                write!(f, "{}/{}", ramp.batch_size, ramp.interval)
            }
        }
    }
}

impl fmt::Display for RunDuration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UntilCompletion => write!(f, "until completion"),
            Self::RunFor(i) => write!(f, "run for:{i}"),
        }
    }
}

impl fmt::Display for Action {
    /// Renders the canonical DSL line for this action.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::StartGroup(s) => write!(f, "{}:{s}", self.kind()),
            Self::Initialize(s) => write!(f, "{}:{s}", self.kind()),
            Self::StartVusers(s) => write!(f, "{}:{s}", self.kind()),
            Self::Duration(s) => write!(f, "{}:{s}", self.kind()),
            Self::StopVusers(s) => write!(f, "{}:{s}", self.kind()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kinds_sort_in_schedule_order() {
        let ranks: Vec<usize> = [
            ActionKind::StartGroup,
            ActionKind::Initialize,
            ActionKind::StartVusers,
            ActionKind::Duration,
            ActionKind::StopVusers,
        ]
        .iter()
        .map(|k| k.rank())
        .collect();
        assert_eq!(ranks, vec![0, 1, 2, 3, 4]);
    }

    #[test]
    fn renders_canonical_dsl_lines() {
        let action = Action::StartVusers(VuserBehavior::Gradually {
            count: Some(10),
            ramp: Ramp {
                batch_size: 2,
                interval: TimeInterval::new(0, 0, 30),
            },
        });
        assert_eq!(action.to_string(), "startvusers:gradually:10/2/00:00:30");

        let action = Action::Duration(RunDuration::RunFor(TimeInterval::new(0, 5, 0)));
        assert_eq!(action.to_string(), "duration:run for:00:05:00");
    }
}
