//! Spell stat tables.
//!
//! A stat table holds the base values resolved when a spell is materialized,
//! plus a ledger of transient alterations. Alterations are additive deltas
//! with explicit removal: reverting one alteration never disturbs another
//! that is still in effect, regardless of the order they were applied in.

use std::collections::BTreeMap;

/// Stat identifiers. The string form is the balance-table stat key.
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
    strum::EnumString,
    strum::IntoStaticStr,
)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum StatKey {
    OtherDamageAmount,
    SelfDamageAmount,
    SelfDamageIncrease,
    HitAmount,
    SelfWardAmount,
    OtherWardAmount,
    HealAmount,
    Aff1StackAmount,
    Aff2StackAmount,
    DrawAmount,
    ExhaustAmount,
    ManaAmount,
    GoldAmount,
    ManaCost,
    PrepTime,
}

impl StatKey {
    pub fn as_str(self) -> &'static str {
        self.into()
    }
}

/// How long an alteration stays in effect.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum AlterationWindow {
    /// Reverted when the altered spell is cast (or dropped from the queue).
    UntilCast,
    /// Reverted when combat ends or is reset.
    Combat,
}

/// Handle returned by [`StatTable::alter`], used to revert exactly that change.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct AlterationId(pub u32);

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
struct StatAlteration {
    id: AlterationId,
    key: StatKey,
    delta: i32,
    window: AlterationWindow,
}

/// Base stats plus an additive alteration ledger.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct StatTable {
    base: BTreeMap<StatKey, i32>,
    alterations: Vec<StatAlteration>,
    next_id: u32,
}

impl StatTable {
    pub fn new(base: BTreeMap<StatKey, i32>) -> Self {
        Self {
            base,
            alterations: Vec::new(),
            next_id: 0,
        }
    }

    /// Effective value: base plus every active alteration of `key`.
    ///
    /// Returns `None` only when the spell has no base value for `key`.
    pub fn get(&self, key: StatKey) -> Option<i32> {
        let base = *self.base.get(&key)?;
        let delta: i64 = self
            .alterations
            .iter()
            .filter(|a| a.key == key)
            .map(|a| a.delta as i64)
            .sum();
        Some((base as i64 + delta).clamp(i32::MIN as i64, i32::MAX as i64) as i32)
    }

    /// Effective value, or zero when the spell does not define `key`.
    pub fn get_or_zero(&self, key: StatKey) -> i32 {
        self.get(key).unwrap_or(0)
    }

    pub fn base(&self, key: StatKey) -> Option<i32> {
        self.base.get(&key).copied()
    }

    pub fn contains(&self, key: StatKey) -> bool {
        self.base.contains_key(&key)
    }

    /// Records an additive alteration. Keys without a base value start from 0.
    pub fn alter(&mut self, key: StatKey, delta: i32, window: AlterationWindow) -> AlterationId {
        let id = AlterationId(self.next_id);
        self.next_id += 1;
        self.base.entry(key).or_insert(0);
        self.alterations.push(StatAlteration {
            id,
            key,
            delta,
            window,
        });
        id
    }

    /// Reverts one alteration. Returns false if it was already reverted.
    pub fn revert(&mut self, id: AlterationId) -> bool {
        let before = self.alterations.len();
        self.alterations.retain(|a| a.id != id);
        before != self.alterations.len()
    }

    /// Reverts every alteration in `window`, returning how many were removed.
    pub fn revert_window(&mut self, window: AlterationWindow) -> usize {
        let before = self.alterations.len();
        self.alterations.retain(|a| a.window != window);
        before - self.alterations.len()
    }

    pub fn revert_all(&mut self) {
        self.alterations.clear();
    }

    pub fn active_alterations(&self) -> usize {
        self.alterations.len()
    }
}
