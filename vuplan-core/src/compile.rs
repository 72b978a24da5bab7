use std::collections::BTreeMap;

use crate::action::Action;
use crate::error::{Error, Result};
use crate::parse::parse_action;
use crate::time_model::TimeModel;
use crate::timing::{GroupTimingInfo, extract_group_timing};
use crate::validate::validate_action_set;
use crate::workload::Workload;

/// The declared group names of a workload. `when group finishes` targets are
/// validated against this and canonicalized to the declared casing.
#[derive(Debug, Clone, Default)]
pub struct GroupCatalog {
    names: Vec<String>,
}

impl GroupCatalog {
    pub fn new<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            names: names.into_iter().map(Into::into).collect(),
        }
    }

    /// Case-insensitive lookup returning the declared spelling.
    #[must_use]
    pub fn resolve(&self, name: &str) -> Option<&str> {
        let name = name.trim();
        self.names
            .iter()
            .find(|n| n.eq_ignore_ascii_case(name))
            .map(String::as_str)
    }

    #[must_use]
    pub fn names(&self) -> &[String] {
        &self.names
    }
}

/// One group's raw scheduling input: its declared name, its configured vuser
/// count, and its DSL lines.
#[derive(Debug, Clone)]
pub struct GroupDefinition {
    pub name: String,
    pub vusers: u64,
    pub lines: Vec<String>,
}

#[derive(Debug, Clone)]
pub struct CompiledGroup {
    pub name: String,
    pub vusers: u64,
    /// Validated, schedule-ordered actions, ready for an external serializer.
    pub actions: Vec<Action>,
    pub timing: GroupTimingInfo,
    /// Seconds from test start until this group starts.
    pub offset_seconds: u64,
}

#[derive(Debug, Clone)]
pub struct CompiledWorkload {
    pub workload: Workload,
    pub groups: Vec<CompiledGroup>,
}

/// Compiles a workload's DSL into timed, ordered actions and resolved start
/// offsets. Fails on the first compile error; a partial schedule is never
/// produced.
pub fn compile_workload(
    workload: Workload,
    definitions: &[GroupDefinition],
) -> Result<CompiledWorkload> {
    for (i, def) in definitions.iter().enumerate() {
        let clash = definitions[..i]
            .iter()
            .any(|d| d.name.eq_ignore_ascii_case(&def.name));
        if clash {
            return Err(Error::DuplicateGroup(def.name.clone()));
        }
    }

    let catalog = GroupCatalog::new(definitions.iter().map(|d| d.name.clone()));

    let mut validated: Vec<(Vec<Action>, GroupTimingInfo)> = Vec::with_capacity(definitions.len());
    for def in definitions {
        let mut actions = Vec::with_capacity(def.lines.len());
        for line in &def.lines {
            if line.trim().is_empty() {
                continue;
            }
            actions.push(parse_action(line, workload, &catalog)?);
        }
        let actions = validate_action_set(actions, workload, def.vusers);
        let timing = extract_group_timing(&def.name, &actions, def.vusers);
        validated.push((actions, timing));
    }

    let timings: Vec<GroupTimingInfo> = validated.iter().map(|(_, t)| t.clone()).collect();
    let offsets = crate::offsets::resolve_offsets(&timings)?;

    let mut groups = Vec::with_capacity(definitions.len());
    for (def, (actions, timing)) in definitions.iter().zip(validated) {
        // resolve_offsets either covers every group or errors out above.
        let offset_seconds = offsets.get(&def.name).copied().ok_or_else(|| {
            Error::UnresolvedDependency {
                groups: vec![def.name.clone()],
            }
        })?;
        groups.push(CompiledGroup {
            name: def.name.clone(),
            vusers: def.vusers,
            actions,
            timing,
            offset_seconds,
        });
    }

    Ok(CompiledWorkload { workload, groups })
}

impl CompiledWorkload {
    #[must_use]
    pub fn group(&self, name: &str) -> Option<&CompiledGroup> {
        self.groups.iter().find(|g| g.name.eq_ignore_ascii_case(name))
    }

    /// The resolved offset table, one entry per group.
    #[must_use]
    pub fn offsets(&self) -> BTreeMap<&str, u64> {
        self.groups
            .iter()
            .map(|g| (g.name.as_str(), g.offset_seconds))
            .collect()
    }

    #[must_use]
    pub fn time_model(&self, name: &str, test_start_epoch: u64) -> Option<TimeModel> {
        self.group(name)
            .map(|g| TimeModel::from_timing(test_start_epoch, g.offset_seconds, &g.timing))
    }

    /// Absolute measurement windows for every group, anchored at the given
    /// test start epoch.
    #[must_use]
    pub fn windows(&self, test_start_epoch: u64) -> Vec<(&str, TimeModel)> {
        self.groups
            .iter()
            .map(|g| {
                (
                    g.name.as_str(),
                    TimeModel::from_timing(test_start_epoch, g.offset_seconds, &g.timing),
                )
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn catalog_resolves_case_insensitively() {
        let catalog = GroupCatalog::new(["Browsers", "Buyers"]);
        assert_eq!(catalog.resolve("browsers"), Some("Browsers"));
        assert_eq!(catalog.resolve(" BUYERS "), Some("Buyers"));
        assert_eq!(catalog.resolve("ghost"), None);
    }

    #[test]
    fn duplicate_group_names_are_fatal() {
        let defs = [
            GroupDefinition {
                name: "A".to_string(),
                vusers: 1,
                lines: Vec::new(),
            },
            GroupDefinition {
                name: "a".to_string(),
                vusers: 1,
                lines: Vec::new(),
            },
        ];
        let workload: Workload = "basic by group".parse().unwrap_or_else(|e| panic!("{e}"));
        assert!(matches!(
            compile_workload(workload, &defs),
            Err(Error::DuplicateGroup(_))
        ));
    }
}
