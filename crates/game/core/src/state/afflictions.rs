//! Affliction stacking substrate.
//!
//! Afflictions are stacking status effects (buffs and debuffs) attached to a
//! combatant. This module only knows how stacks accumulate and decay; what an
//! affliction *does* is content-defined through
//! [`AfflictionDefinition`](crate::env::AfflictionDefinition) and queried by
//! the turn engine at well-defined points.
//!
//! # Invariants
//!
//! - At most one instance per [`AfflictionType`]; stacks accumulate into it.
//! - Stacks are never negative, and an instance with zero stacks is removed.

use arrayvec::ArrayVec;
use bitflags::bitflags;

use crate::config::CombatConfig;

/// Affliction identifiers.
#[derive(
    Clone,
    Copy,
    Debug,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    strum::Display,
    strum::EnumCount,
    strum::EnumIter,
    strum::EnumString,
    strum::IntoStaticStr,
)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum AfflictionType {
    /// Skips the owner's next cast attempt.
    Paralyze,
    /// Resolves the owner's next cast twice.
    Echo,
    Burn,
    Poison,
    Weak,
    Vulnerable,
    Power,
    Thorns,
    Intangible,
    Regeneration,
    Retain,
}

/// Whether an affliction helps or hinders its owner.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum AfflictionSign {
    Positive,
    Negative,
}

bitflags! {
    /// Set of affliction signs, used by cleanse effects.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
    #[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
    #[cfg_attr(feature = "serde", serde(transparent))]
    pub struct SignSet: u8 {
        const POSITIVE = 0b01;
        const NEGATIVE = 0b10;
    }
}

impl SignSet {
    pub fn contains_sign(self, sign: AfflictionSign) -> bool {
        match sign {
            AfflictionSign::Positive => self.contains(SignSet::POSITIVE),
            AfflictionSign::Negative => self.contains(SignSet::NEGATIVE),
        }
    }
}

/// How stacks leave an affliction.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum DecayPolicy {
    /// Loses one stack at its owner's turn end.
    ByDuration,
    /// Loses one stack each time its triggering event consumes it.
    ByActivation,
}

/// One affliction instance on a combatant.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Affliction {
    pub kind: AfflictionType,
    pub stacks: u32,
    pub sign: AfflictionSign,
    pub decay: DecayPolicy,
}

/// Result of changing an affliction's stack count.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct StackChange {
    pub kind: AfflictionType,
    pub before: u32,
    pub after: u32,
}

impl StackChange {
    pub fn removed(&self) -> bool {
        self.before > 0 && self.after == 0
    }

    pub fn is_noop(&self) -> bool {
        self.before == self.after
    }
}

/// All afflictions attached to one combatant, in application order.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Afflictions {
    entries: ArrayVec<Affliction, { CombatConfig::MAX_AFFLICTIONS }>,
}

impl Afflictions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, kind: AfflictionType) -> Option<&Affliction> {
        self.entries.iter().find(|a| a.kind == kind)
    }

    pub fn has(&self, kind: AfflictionType) -> bool {
        self.get(kind).is_some()
    }

    pub fn stacks(&self, kind: AfflictionType) -> u32 {
        self.get(kind).map(|a| a.stacks).unwrap_or(0)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Affliction> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Adds `delta` stacks (negative subtracts), clamped to `0..=u32::MAX`.
    ///
    /// A negative delta on an absent affliction is a no-op; a result of
    /// zero removes the instance.
    pub fn apply(
        &mut self,
        kind: AfflictionType,
        delta: i32,
        sign: AfflictionSign,
        decay: DecayPolicy,
    ) -> StackChange {
        if let Some(index) = self.entries.iter().position(|a| a.kind == kind) {
            let before = self.entries[index].stacks;
            let after = (before as i64 + delta as i64).clamp(0, u32::MAX as i64) as u32;
            if after == 0 {
                self.entries.remove(index);
            } else {
                self.entries[index].stacks = after;
            }
            return StackChange {
                kind,
                before,
                after,
            };
        }

        if delta <= 0 {
            return StackChange {
                kind,
                before: 0,
                after: 0,
            };
        }

        // One slot per affliction type always fits.
        debug_assert!(!self.entries.is_full(), "affliction slots exhausted");
        let _ = self.entries.try_push(Affliction {
            kind,
            stacks: delta as u32,
            sign,
            decay,
        });
        StackChange {
            kind,
            before: 0,
            after: delta as u32,
        }
    }

    /// Consumes a single stack. Returns `None` if the affliction is absent.
    pub fn consume_stack(&mut self, kind: AfflictionType) -> Option<StackChange> {
        let existing = *self.get(kind)?;
        Some(self.apply(kind, -1, existing.sign, existing.decay))
    }

    /// Removes every affliction whose sign is in `signs`, returning them.
    pub fn cleanse(&mut self, signs: SignSet) -> Vec<Affliction> {
        let mut removed = Vec::new();
        self.entries.retain(|a| {
            if signs.contains_sign(a.sign) {
                removed.push(*a);
                false
            } else {
                true
            }
        });
        removed
    }

    /// Decrements every duration-based affliction by one stack.
    pub fn tick_duration(&mut self) -> Vec<StackChange> {
        let mut changes = Vec::new();
        for affliction in self.entries.iter_mut() {
            if affliction.decay == DecayPolicy::ByDuration {
                let before = affliction.stacks;
                affliction.stacks = before.saturating_sub(1);
                changes.push(StackChange {
                    kind: affliction.kind,
                    before,
                    after: affliction.stacks,
                });
            }
        }
        self.entries.retain(|a| a.stacks > 0);
        changes
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const NEG: AfflictionSign = AfflictionSign::Negative;
    const POS: AfflictionSign = AfflictionSign::Positive;

    #[test]
    fn stacks_accumulate_into_one_instance() {
        let mut afflictions = Afflictions::new();
        afflictions.apply(AfflictionType::Burn, 2, NEG, DecayPolicy::ByDuration);
        afflictions.apply(AfflictionType::Burn, 3, NEG, DecayPolicy::ByDuration);

        assert_eq!(afflictions.len(), 1);
        assert_eq!(afflictions.stacks(AfflictionType::Burn), 5);
    }

    #[test]
    fn negative_delta_floors_and_removes() {
        let mut afflictions = Afflictions::new();
        afflictions.apply(AfflictionType::Weak, 2, NEG, DecayPolicy::ByDuration);

        let change = afflictions.apply(AfflictionType::Weak, -5, NEG, DecayPolicy::ByDuration);
        assert_eq!(change.after, 0);
        assert!(change.removed());
        assert!(!afflictions.has(AfflictionType::Weak));
    }

    #[test]
    fn negative_delta_on_absent_affliction_is_noop() {
        let mut afflictions = Afflictions::new();
        let change = afflictions.apply(AfflictionType::Power, -1, POS, DecayPolicy::ByDuration);

        assert!(change.is_noop());
        assert!(afflictions.is_empty());
    }

    #[test]
    fn stacks_never_negative_over_random_walk() {
        let mut afflictions = Afflictions::new();
        let deltas = [3, -1, -4, 2, 0, -2, 5, -10, 1, -1, 7];
        for delta in deltas {
            afflictions.apply(AfflictionType::Poison, delta, NEG, DecayPolicy::ByDuration);
            match afflictions.get(AfflictionType::Poison) {
                Some(a) => assert!(a.stacks > 0),
                None => assert_eq!(afflictions.stacks(AfflictionType::Poison), 0),
            }
        }
        assert_eq!(afflictions.stacks(AfflictionType::Poison), 7);
    }

    #[test]
    fn huge_stacks_saturate_instead_of_wrapping() {
        let mut afflictions = Afflictions::new();
        for _ in 0..3 {
            afflictions.apply(AfflictionType::Burn, i32::MAX, NEG, DecayPolicy::ByDuration);
        }
        assert_eq!(afflictions.stacks(AfflictionType::Burn), u32::MAX);

        let change = afflictions.apply(AfflictionType::Burn, -1, NEG, DecayPolicy::ByDuration);
        assert_eq!(change.before, u32::MAX);
        assert_eq!(change.after, u32::MAX - 1);
    }

    #[test]
    fn consume_stack_removes_last_stack() {
        let mut afflictions = Afflictions::new();
        afflictions.apply(AfflictionType::Paralyze, 1, NEG, DecayPolicy::ByActivation);

        let change = afflictions.consume_stack(AfflictionType::Paralyze).unwrap();
        assert!(change.removed());
        assert!(afflictions.consume_stack(AfflictionType::Paralyze).is_none());
    }

    #[test]
    fn cleanse_removes_matching_signs_only() {
        let mut afflictions = Afflictions::new();
        afflictions.apply(AfflictionType::Burn, 2, NEG, DecayPolicy::ByDuration);
        afflictions.apply(AfflictionType::Power, 1, POS, DecayPolicy::ByDuration);
        afflictions.apply(AfflictionType::Weak, 1, NEG, DecayPolicy::ByDuration);

        let removed = afflictions.cleanse(SignSet::NEGATIVE);
        assert_eq!(removed.len(), 2);
        assert!(afflictions.has(AfflictionType::Power));
        assert_eq!(afflictions.len(), 1);

        afflictions.cleanse(SignSet::all());
        assert!(afflictions.is_empty());
    }

    #[test]
    fn tick_duration_skips_activation_afflictions() {
        let mut afflictions = Afflictions::new();
        afflictions.apply(AfflictionType::Burn, 1, NEG, DecayPolicy::ByDuration);
        afflictions.apply(AfflictionType::Echo, 1, POS, DecayPolicy::ByActivation);

        let changes = afflictions.tick_duration();
        assert_eq!(changes.len(), 1);
        assert!(!afflictions.has(AfflictionType::Burn));
        assert!(afflictions.has(AfflictionType::Echo));
    }
}
