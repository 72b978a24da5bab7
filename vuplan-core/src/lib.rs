mod action;
mod compile;
mod error;
mod interval;
mod offsets;
mod parse;
mod time_model;
mod timing;
mod validate;
mod workload;

pub use action::{Action, ActionKind, Initialize, Ramp, RunDuration, StartGroup, VuserBehavior};
pub use compile::{
    CompiledGroup, CompiledWorkload, GroupCatalog, GroupDefinition, compile_workload,
};
pub use error::{Error, Result};
pub use interval::TimeInterval;
pub use offsets::resolve_offsets;
pub use parse::parse_action;
pub use time_model::TimeModel;
pub use timing::{GroupTimingInfo, extract_group_timing};
pub use validate::validate_action_set;
pub use workload::{SchedulingMode, Workload, WorkloadKind};
