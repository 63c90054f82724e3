//! Enemy behavior tables.

use crate::choice::WeightedChoice;
use crate::error::ContentError;

use super::{BehaviorContext, BehaviorPredicate};

/// One guarded weighted choice of action keys.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize))]
pub struct BehaviorEntry {
    pub when: BehaviorPredicate,
    pub choices: WeightedChoice<String>,
}

impl BehaviorEntry {
    pub fn new(when: BehaviorPredicate, choices: WeightedChoice<String>) -> Self {
        Self { when, choices }
    }
}

/// Ordered guarded entries; every passing entry contributes to the pool.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct BehaviorTable {
    entries: Vec<BehaviorEntry>,
}

impl BehaviorTable {
    pub fn new(entries: Vec<BehaviorEntry>) -> Self {
        Self { entries }
    }

    pub fn entries(&self) -> &[BehaviorEntry] {
        &self.entries
    }

    /// Every action key any entry can ever produce.
    pub fn action_keys(&self) -> impl Iterator<Item = &str> {
        self.entries
            .iter()
            .flat_map(|entry| entry.choices.iter().map(String::as_str))
    }

    /// Candidate pool for the current state: the concatenation of every
    /// passing entry's choices. `None` when no predicate passes.
    pub fn candidates(
        &self,
        ctx: &BehaviorContext<'_>,
    ) -> Result<Option<WeightedChoice<String>>, ContentError> {
        let passing: Vec<&WeightedChoice<String>> = self
            .entries
            .iter()
            .filter(|entry| entry.when.evaluate(ctx))
            .map(|entry| &entry.choices)
            .collect();

        if passing.is_empty() {
            return Ok(None);
        }
        WeightedChoice::union(passing).map(Some)
    }
}
