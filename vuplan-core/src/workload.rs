use std::fmt;
use std::str::FromStr;

use crate::error::Error;

/// How vusers are apportioned: `basic` workloads size every group from its
/// configured vuser count, `real-world` workloads carry explicit counts on
/// the vuser actions themselves.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, strum::EnumString, strum::Display)]
#[strum(ascii_case_insensitive)]
pub enum WorkloadKind {
    #[strum(serialize = "basic")]
    Basic,
    #[strum(serialize = "real-world", serialize = "realworld")]
    RealWorld,
}

/// Whether the schedule is written once for the whole test or per group.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, strum::EnumString, strum::Display)]
#[strum(ascii_case_insensitive)]
pub enum SchedulingMode {
    #[strum(serialize = "by test", serialize = "by-test")]
    ByTest,
    #[strum(serialize = "by group", serialize = "by-group")]
    ByGroup,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Workload {
    pub kind: WorkloadKind,
    pub mode: SchedulingMode,
}

impl Workload {
    #[must_use]
    pub const fn new(kind: WorkloadKind, mode: SchedulingMode) -> Self {
        Self { kind, mode }
    }
}

impl FromStr for Workload {
    type Err = Error;

    /// Parses the configured workload type string, e.g. `basic by test` or
    /// `real-world by group`.
    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        let norm = raw.split_whitespace().collect::<Vec<_>>().join(" ");
        let lower = norm.to_ascii_lowercase();
        let pos = lower
            .find(" by ")
            .ok_or_else(|| Error::InvalidWorkload(raw.to_string()))?;

        let kind = norm[..pos]
            .parse()
            .map_err(|_| Error::InvalidWorkload(raw.to_string()))?;
        let mode = norm[pos + 1..]
            .parse()
            .map_err(|_| Error::InvalidWorkload(raw.to_string()))?;
        Ok(Self { kind, mode })
    }
}

impl fmt::Display for Workload {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.kind, self.mode)
    }
}
