//! Partition normalizer.
//!
//! Turns an untrusted [`RawPartition`] into a [`CanonicalGrouping`]: every
//! snapshot index in exactly one group, group names unique and non-empty.
//! Nothing is repaired. Any violation rejects the whole partition.

use std::collections::{HashMap, HashSet};

use serde::Serialize;
use serde_json::Value;
use tracing::debug;

use tabgrouper_protocols::{PartitionInvalidError, PartitionViolation, RawPartition};

#[cfg(test)]
#[path = "normalizer_tests.rs"]
mod tests;

/// A named group of snapshot indices.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Group {
    name: String,
    tab_indices: Vec<usize>,
}

impl Group {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn tab_indices(&self) -> &[usize] {
        &self.tab_indices
    }
}

/// A validated partition of `0..tab_count` into ordered, uniquely named groups.
///
/// Only [`normalize`] constructs this type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CanonicalGrouping {
    groups: Vec<Group>,
    tab_count: usize,
}

impl CanonicalGrouping {
    pub fn groups(&self) -> &[Group] {
        &self.groups
    }

    /// Size of the snapshot this grouping partitions.
    pub fn tab_count(&self) -> usize {
        self.tab_count
    }

    pub fn len(&self) -> usize {
        self.groups.len()
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    pub fn group(&self, name: &str) -> Option<&Group> {
        self.groups.iter().find(|g| g.name == name)
    }

    /// Name of the group holding a snapshot index.
    pub fn group_of(&self, index: usize) -> Option<&str> {
        self.groups
            .iter()
            .find(|g| g.tab_indices.contains(&index))
            .map(|g| g.name.as_str())
    }
}

/// Validate a raw partition against a snapshot of `tab_count` tabs.
pub fn normalize(
    raw: &RawPartition,
    tab_count: usize,
) -> Result<CanonicalGrouping, PartitionInvalidError> {
    let mut violations = Vec::new();

    let candidates = match raw {
        RawPartition::GroupMap(entries) => decode_group_map(entries, &mut violations),
        RawPartition::GroupList { groups, tabs } => decode_group_list(groups, tabs, &mut violations),
    };

    check_names(&candidates, &mut violations);
    check_coverage(&candidates, tab_count, &mut violations);

    if !violations.is_empty() {
        debug!(
            "Rejected {} partition with {} violations",
            raw.shape(),
            violations.len()
        );
        return Err(PartitionInvalidError::new(tab_count, violations));
    }

    let groups = candidates
        .into_iter()
        .map(|(name, tab_indices)| Group { name, tab_indices })
        .collect();
    Ok(CanonicalGrouping { groups, tab_count })
}

fn decode_group_map(
    entries: &[(String, Value)],
    violations: &mut Vec<PartitionViolation>,
) -> Vec<(String, Vec<usize>)> {
    let mut candidates = Vec::with_capacity(entries.len());

    for (name, value) in entries {
        let Some(items) = value.as_array() else {
            violations.push(PartitionViolation::Malformed(format!(
                "group \"{}\" is not an array of tab indices",
                name
            )));
            continue;
        };

        let mut indices = Vec::with_capacity(items.len());
        for item in items {
            match as_index(item) {
                Some(index) => indices.push(index),
                None => violations.push(PartitionViolation::Malformed(format!(
                    "group \"{}\" contains {} which is not a tab index",
                    name, item
                ))),
            }
        }
        candidates.push((name.clone(), indices));
    }

    candidates
}

fn decode_group_list(
    groups: &Value,
    tabs: &[(String, Value)],
    violations: &mut Vec<PartitionViolation>,
) -> Vec<(String, Vec<usize>)> {
    let Some(declared) = groups.as_array() else {
        violations.push(PartitionViolation::Malformed(
            "\"groups\" is not an array of group names".to_string(),
        ));
        return Vec::new();
    };

    let mut candidates: Vec<(String, Vec<usize>)> = Vec::with_capacity(declared.len());
    for item in declared {
        match item.as_str() {
            Some(name) => candidates.push((name.to_string(), Vec::new())),
            None => violations.push(PartitionViolation::Malformed(format!(
                "group name {} is not a string",
                item
            ))),
        }
    }

    // First declaration wins; repeated names are reported by check_names.
    let mut position: HashMap<String, usize> = HashMap::new();
    for (i, (name, _)) in candidates.iter().enumerate() {
        position.entry(name.clone()).or_insert(i);
    }

    for (key, value) in tabs {
        let Some(index) = parse_index_key(key) else {
            violations.push(PartitionViolation::Malformed(format!(
                "tab key \"{}\" is not a tab index",
                key
            )));
            continue;
        };
        let Some(group) = value.as_str() else {
            violations.push(PartitionViolation::Malformed(format!(
                "tab {} is assigned to {} which is not a group name",
                index, value
            )));
            continue;
        };
        match position.get(group) {
            Some(&slot) => candidates[slot].1.push(index),
            None => violations.push(PartitionViolation::UnknownGroup {
                index,
                group: group.to_string(),
            }),
        }
    }

    for (_, indices) in &mut candidates {
        indices.sort_unstable();
    }
    candidates
}

fn check_names(candidates: &[(String, Vec<usize>)], violations: &mut Vec<PartitionViolation>) {
    let mut seen = HashSet::new();
    let mut reported = HashSet::new();

    for (name, _) in candidates {
        if name.trim().is_empty() {
            violations.push(PartitionViolation::EmptyGroupName);
            continue;
        }
        if !seen.insert(name.as_str()) && reported.insert(name.as_str()) {
            violations.push(PartitionViolation::DuplicateGroupName(name.clone()));
        }
    }
}

fn check_coverage(
    candidates: &[(String, Vec<usize>)],
    tab_count: usize,
    violations: &mut Vec<PartitionViolation>,
) {
    let mut claims: Vec<Vec<&str>> = vec![Vec::new(); tab_count];

    for (name, indices) in candidates {
        for &index in indices {
            match claims.get_mut(index) {
                Some(claimants) => claimants.push(name),
                None => violations.push(PartitionViolation::OutOfRange {
                    index,
                    group: name.clone(),
                }),
            }
        }
    }

    for (index, claimants) in claims.iter().enumerate() {
        match claimants.len() {
            0 => violations.push(PartitionViolation::MissingIndex(index)),
            1 => {}
            _ => violations.push(PartitionViolation::DuplicateIndex {
                index,
                groups: claimants.iter().map(|s| s.to_string()).collect(),
            }),
        }
    }
}

fn as_index(value: &Value) -> Option<usize> {
    value.as_u64().and_then(|n| usize::try_from(n).ok())
}

/// Parse a stringified index, rejecting non-canonical forms like `"01"`.
fn parse_index_key(key: &str) -> Option<usize> {
    let index: usize = key.parse().ok()?;
    (index.to_string() == key).then_some(index)
}
