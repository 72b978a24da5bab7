use crate::action::ActionKind;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum Error {
    #[error(
        "unrecognized action `{line}` (expected `startgroup:`, `initialize:`, `startvusers:`, `duration:`, or `stopvusers:`)"
    )]
    UnknownAction { line: String },

    #[error("invalid `{kind}` action `{input}` (usage: {usage})")]
    Parse {
        kind: ActionKind,
        input: String,
        usage: &'static str,
    },

    #[error("invalid time interval `{0}` (expected `hh:mm:ss`, `mm:ss`, or whole seconds)")]
    InvalidInterval(String),

    #[error("invalid workload `{0}` (expected `<basic|real-world> by <test|group>`)")]
    InvalidWorkload(String),

    #[error("`when group finishes` references unknown group `{target}`")]
    UnknownGroupReference { target: String },

    #[error("duplicate group `{0}` in workload definition")]
    DuplicateGroup(String),

    #[error(
        "cannot resolve start offsets for group(s): {} (dependency cycle or dangling reference)",
        groups.join(", ")
    )]
    UnresolvedDependency { groups: Vec<String> },
}
