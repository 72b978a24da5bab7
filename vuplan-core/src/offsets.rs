use std::collections::BTreeMap;

use crate::action::StartGroup;
use crate::error::{Error, Result};
use crate::timing::GroupTimingInfo;

/// Resolves every group's start offset (seconds from test start) via
/// dependency propagation.
///
/// Three phases: immediate groups sit at 0, delayed groups at their configured
/// delay, and dependent groups at the end of the group they wait on
/// (`offset + ramp_up + duration + ramp_down`), repeated until a pass
/// resolves nothing new. Dependencies form a DAG by convention but are not
/// guaranteed acyclic, so a stalled pass with unresolved groups left is an
/// error naming the stuck groups, covering both cycles and dangling
/// references. Deterministic and total; worst case O(N²) over N groups.
pub fn resolve_offsets(groups: &[GroupTimingInfo]) -> Result<BTreeMap<String, u64>> {
    let by_name: BTreeMap<&str, &GroupTimingInfo> = groups
        .iter()
        .map(|g| (g.group_name.as_str(), g))
        .collect();

    let mut offsets: BTreeMap<String, u64> = BTreeMap::new();
    for group in groups {
        match &group.start {
            StartGroup::Immediately => {
                offsets.insert(group.group_name.clone(), 0);
            }
            StartGroup::WithDelay(delay) => {
                offsets.insert(group.group_name.clone(), delay.total_seconds());
            }
            StartGroup::WhenGroupFinishes(_) => {}
        }
    }

    loop {
        let mut progressed = false;
        for group in groups {
            if offsets.contains_key(&group.group_name) {
                continue;
            }
            let StartGroup::WhenGroupFinishes(target) = &group.start else {
                continue;
            };
            let Some(dep) = by_name.get(target.as_str()) else {
                // Dangling reference; left unresolved and reported below.
                continue;
            };
            let Some(&dep_offset) = offsets.get(&dep.group_name) else {
                continue;
            };
            let end = dep_offset
                + dep.ramp_up_seconds
                + dep.duration_seconds
                + dep.ramp_down_seconds;
            offsets.insert(group.group_name.clone(), end);
            progressed = true;
        }
        if !progressed {
            break;
        }
    }

    let mut stuck: Vec<String> = groups
        .iter()
        .filter(|g| !offsets.contains_key(&g.group_name))
        .map(|g| g.group_name.clone())
        .collect();
    if !stuck.is_empty() {
        stuck.sort();
        return Err(Error::UnresolvedDependency { groups: stuck });
    }

    Ok(offsets)
}
