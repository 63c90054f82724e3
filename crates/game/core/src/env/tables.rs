use std::collections::HashMap;

use crate::error::ContentError;

/// Oracle providing balance values.
///
/// Every numeric spell, affliction, and enemy magnitude originates here.
/// The engine treats the table as pure and total for valid keys; a miss on a
/// key the content requires is a [`ContentError::MissingBalanceKey`].
pub trait BalanceTable: Send + Sync {
    /// Looks up `owner.stat`, optionally at an upgrade level.
    fn get(&self, owner: &str, stat: &str, level: Option<u32>) -> Option<i32>;

    /// Looks up a value the caller cannot do without.
    fn require(&self, owner: &str, stat: &str, level: Option<u32>) -> Result<i32, ContentError> {
        self.get(owner, stat, level)
            .ok_or_else(|| ContentError::MissingBalanceKey {
                owner: owner.to_string(),
                stat: stat.to_string(),
                level,
            })
    }
}

/// A single balance entry: either level-independent or one value per level.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(untagged))]
pub enum BalanceValue {
    Flat(i32),
    PerLevel(Vec<i32>),
}

impl BalanceValue {
    /// Resolves the value for `level`.
    ///
    /// Level-less lookups read the base (level 0) entry. Levels past the end
    /// of a per-level list are treated as missing.
    pub fn at(&self, level: Option<u32>) -> Option<i32> {
        match self {
            Self::Flat(value) => Some(*value),
            Self::PerLevel(values) => values.get(level.unwrap_or(0) as usize).copied(),
        }
    }
}

/// In-memory balance table keyed by owner then stat.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct StaticBalanceTable {
    entries: HashMap<String, HashMap<String, BalanceValue>>,
}

impl StaticBalanceTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_entries(entries: HashMap<String, HashMap<String, BalanceValue>>) -> Self {
        Self { entries }
    }

    /// Inserts or replaces a value (builder pattern).
    #[must_use]
    pub fn with(mut self, owner: &str, stat: &str, value: BalanceValue) -> Self {
        self.insert(owner, stat, value);
        self
    }

    pub fn insert(&mut self, owner: &str, stat: &str, value: BalanceValue) {
        self.entries
            .entry(owner.to_string())
            .or_default()
            .insert(stat.to_string(), value);
    }

    /// Returns the number of owners with at least one entry.
    pub fn owners(&self) -> usize {
        self.entries.len()
    }
}

impl BalanceTable for StaticBalanceTable {
    fn get(&self, owner: &str, stat: &str, level: Option<u32>) -> Option<i32> {
        self.entries.get(owner)?.get(stat)?.at(level)
    }
}
