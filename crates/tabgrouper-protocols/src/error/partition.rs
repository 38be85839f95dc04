//! Partition validation errors.

use std::fmt;

/// One reason a proposed partition was rejected.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PartitionViolation {
    /// A snapshot index no group claims.
    MissingIndex(usize),
    /// An index claimed more than once; `groups` lists every claimant in order.
    DuplicateIndex { index: usize, groups: Vec<String> },
    /// An index outside `0..tab_count`.
    OutOfRange { index: usize, group: String },
    /// Two groups share a name.
    DuplicateGroupName(String),
    EmptyGroupName,
    /// A tab assigned to a group missing from the declared `groups` list.
    UnknownGroup { index: usize, group: String },
    /// An entry with the wrong JSON type or an unparsable index key.
    Malformed(String),
}

impl fmt::Display for PartitionViolation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PartitionViolation::MissingIndex(index) => write!(f, "tab {} is not in any group", index),
            PartitionViolation::DuplicateIndex { index, groups } => {
                write!(f, "tab {} appears more than once (in {})", index, groups.join(", "))
            }
            PartitionViolation::OutOfRange { index, group } => {
                write!(f, "group \"{}\" references tab {} which does not exist", group, index)
            }
            PartitionViolation::DuplicateGroupName(name) => {
                write!(f, "group name \"{}\" is used more than once", name)
            }
            PartitionViolation::EmptyGroupName => f.write_str("a group has an empty name"),
            PartitionViolation::UnknownGroup { index, group } => {
                write!(f, "tab {} is assigned to undeclared group \"{}\"", index, group)
            }
            PartitionViolation::Malformed(detail) => write!(f, "malformed entry: {}", detail),
        }
    }
}

/// A partition that failed completeness, exclusivity or uniqueness checks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PartitionInvalidError {
    pub tab_count: usize,
    pub violations: Vec<PartitionViolation>,
}

impl PartitionInvalidError {
    pub fn new(tab_count: usize, violations: Vec<PartitionViolation>) -> Self {
        Self {
            tab_count,
            violations,
        }
    }

    /// Indices reported as missing, in ascending order.
    pub fn missing(&self) -> Vec<usize> {
        self.violations
            .iter()
            .filter_map(|v| match v {
                PartitionViolation::MissingIndex(i) => Some(*i),
                _ => None,
            })
            .collect()
    }

    /// Indices reported as duplicated.
    pub fn duplicated(&self) -> Vec<usize> {
        self.violations
            .iter()
            .filter_map(|v| match v {
                PartitionViolation::DuplicateIndex { index, .. } => Some(*index),
                _ => None,
            })
            .collect()
    }
}

impl fmt::Display for PartitionInvalidError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Invalid grouping for {} tabs: ", self.tab_count)?;
        for (i, violation) in self.violations.iter().enumerate() {
            if i > 0 {
                f.write_str("; ")?;
            }
            write!(f, "{}", violation)?;
        }
        Ok(())
    }
}

impl std::error::Error for PartitionInvalidError {}
