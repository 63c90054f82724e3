//! Spell model.
//!
//! A [`SpellDefinition`] is immutable authored data: identity, cast type,
//! stat values, cast conditions, and effects bound to callback hooks. A
//! [`Spell`] is a definition materialized at an upgrade level for one
//! combat; only its runtime trackers (cooldown, counters, stat alterations)
//! ever change.
mod amount;
mod condition;
mod effect;
mod hook;
mod stats;

use std::collections::BTreeMap;
use std::sync::Arc;

use crate::env::BalanceTable;
use crate::error::ContentError;

pub use amount::{Amount, AmountContext, Subject};
pub use condition::{CanCastCondition, CastCheck, CastError, CastFailure, CastPlan};
pub use effect::{DamageType, SpellEffect, Target};
pub use hook::{CallbackHook, HookRegistry};
pub use stats::{AlterationId, AlterationWindow, StatKey, StatTable};

/// Index of a spell within one combatant's spellbook.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SpellId(pub u16);

impl std::fmt::Display for SpellId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// How a spell is used.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, strum::Display)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum CastType {
    /// Cast from the spellbook, then on cooldown.
    Reusable,
    /// Never cast; acts only through hooks.
    Power,
    /// A deck card: must be in hand, exhausted when cast.
    SingleUse,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, strum::Display)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum SpellColor {
    #[default]
    Colorless,
    Red,
    Blue,
    Green,
    Yellow,
    Purple,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, strum::Display)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Rarity {
    #[default]
    Common,
    Uncommon,
    Rare,
    Event,
    Enemy,
}

/// Primary role, used for display and content filtering.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, strum::Display)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum SpellFunction {
    #[default]
    Damage,
    Defense,
    Buff,
    Debuff,
    Heal,
    Utility,
}

/// Authored spell data.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SpellDefinition {
    pub label: String,
    #[cfg_attr(feature = "serde", serde(default))]
    pub color: SpellColor,
    #[cfg_attr(feature = "serde", serde(default))]
    pub rarity: Rarity,
    #[cfg_attr(feature = "serde", serde(default))]
    pub function: SpellFunction,
    pub cast_type: CastType,
    #[cfg_attr(feature = "serde", serde(default))]
    pub cooldown: u32,
    /// Literal stat values.
    #[cfg_attr(feature = "serde", serde(default))]
    pub stats: BTreeMap<StatKey, i32>,
    /// Stats read from the balance table under this spell's label at its
    /// level. These override literal values.
    #[cfg_attr(feature = "serde", serde(default))]
    pub balanced: Vec<StatKey>,
    #[cfg_attr(feature = "serde", serde(default))]
    pub conditions: Vec<CanCastCondition>,
    #[cfg_attr(feature = "serde", serde(default))]
    pub hooks: Vec<(CallbackHook, Vec<SpellEffect>)>,
}

impl SpellDefinition {
    pub fn new(label: impl Into<String>, cast_type: CastType) -> Self {
        Self {
            label: label.into(),
            color: SpellColor::default(),
            rarity: Rarity::default(),
            function: SpellFunction::default(),
            cast_type,
            cooldown: 0,
            stats: BTreeMap::new(),
            balanced: Vec::new(),
            conditions: Vec::new(),
            hooks: Vec::new(),
        }
    }

    #[must_use]
    pub fn with_cooldown(mut self, cooldown: u32) -> Self {
        self.cooldown = cooldown;
        self
    }

    #[must_use]
    pub fn with_stat(mut self, key: StatKey, value: i32) -> Self {
        self.stats.insert(key, value);
        self
    }

    #[must_use]
    pub fn with_balanced(mut self, key: StatKey) -> Self {
        self.balanced.push(key);
        self
    }

    #[must_use]
    pub fn with_condition(mut self, condition: CanCastCondition) -> Self {
        self.conditions.push(condition);
        self
    }

    #[must_use]
    pub fn on(mut self, hook: CallbackHook, effects: Vec<SpellEffect>) -> Self {
        self.hooks.push((hook, effects));
        self
    }

    /// Resolves every stat at `level` and builds a fresh spell instance.
    pub fn materialize(
        self: &Arc<Self>,
        level: u32,
        balance: &dyn BalanceTable,
    ) -> Result<Spell, ContentError> {
        let mut base = self.stats.clone();
        for key in &self.balanced {
            let value = balance.require(&self.label, key.as_str(), Some(level))?;
            base.insert(*key, value);
        }

        Ok(Spell {
            definition: Arc::clone(self),
            level,
            stats: StatTable::new(base),
            cooldown: Cooldown::new(self.cooldown),
            counters: BTreeMap::new(),
            hooks: HookRegistry::from_bindings(&self.hooks),
        })
    }
}

/// Cooldown tracker: `current` turns remain until the spell is ready.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Cooldown {
    max: u32,
    current: u32,
}

impl Cooldown {
    pub fn new(max: u32) -> Self {
        Self { max, current: 0 }
    }

    pub fn max(&self) -> u32 {
        self.max
    }

    pub fn current(&self) -> u32 {
        self.current
    }

    pub fn is_ready(&self) -> bool {
        self.current == 0
    }

    pub fn start(&mut self) {
        self.current = self.max;
    }

    /// Moves the tracker `delta` turns toward ready (negative extends it).
    pub fn tick(&mut self, delta: i32) {
        self.current = (self.current as i64 - delta as i64).clamp(0, u32::MAX as i64) as u32;
    }

    pub fn reset(&mut self) {
        self.current = 0;
    }
}

/// A spell instance owned by one combatant for one combat.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Spell {
    definition: Arc<SpellDefinition>,
    level: u32,
    stats: StatTable,
    cooldown: Cooldown,
    counters: BTreeMap<String, i32>,
    hooks: HookRegistry,
}

impl Spell {
    pub fn definition(&self) -> &SpellDefinition {
        &self.definition
    }

    pub fn label(&self) -> &str {
        &self.definition.label
    }

    pub fn cast_type(&self) -> CastType {
        self.definition.cast_type
    }

    pub fn level(&self) -> u32 {
        self.level
    }

    pub fn stats(&self) -> &StatTable {
        &self.stats
    }

    pub fn stats_mut(&mut self) -> &mut StatTable {
        &mut self.stats
    }

    pub fn cooldown(&self) -> Cooldown {
        self.cooldown
    }

    pub(crate) fn cooldown_mut(&mut self) -> &mut Cooldown {
        &mut self.cooldown
    }

    /// Mana cost, never negative.
    pub fn mana_cost(&self) -> u32 {
        self.stats.get_or_zero(StatKey::ManaCost).max(0) as u32
    }

    /// Player turns the spell waits in the queue before it is cast.
    pub fn prep_time(&self) -> u32 {
        self.stats.get_or_zero(StatKey::PrepTime).max(0) as u32
    }

    /// Current value of a per-combat counter (0 when never touched).
    pub fn counter(&self, name: &str) -> i32 {
        self.counters.get(name).copied().unwrap_or(0)
    }

    pub(crate) fn alter_counter(&mut self, name: &str, delta: i32) -> i32 {
        let value = self.counters.entry(name.to_string()).or_insert(0);
        *value = value.saturating_add(delta);
        *value
    }

    pub(crate) fn reset_counter(&mut self, name: &str) {
        self.counters.remove(name);
    }

    pub fn hooks(&self) -> &HookRegistry {
        &self.hooks
    }

    pub fn effects(&self, hook: CallbackHook) -> Arc<[SpellEffect]> {
        self.hooks.effects(hook)
    }

    /// Clears every per-combat tracker: cooldown, counters, and alterations.
    pub(crate) fn clear_runtime(&mut self) {
        self.cooldown.reset();
        self.counters.clear();
        self.stats.revert_all();
    }
}

/// The spells one combatant has equipped, addressed by [`SpellId`].
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Spellbook {
    spells: Vec<Spell>,
}

impl Spellbook {
    pub fn new(spells: Vec<Spell>) -> Self {
        debug_assert!(spells.len() <= u16::MAX as usize);
        Self { spells }
    }

    pub fn get(&self, id: SpellId) -> Option<&Spell> {
        self.spells.get(id.0 as usize)
    }

    pub fn get_mut(&mut self, id: SpellId) -> Option<&mut Spell> {
        self.spells.get_mut(id.0 as usize)
    }

    /// First equipped spell with `label`.
    pub fn find(&self, label: &str) -> Option<SpellId> {
        self.spells
            .iter()
            .position(|s| s.label() == label)
            .map(|i| SpellId(i as u16))
    }

    pub fn ids(&self) -> impl Iterator<Item = SpellId> + use<> {
        (0..self.spells.len() as u16).map(SpellId)
    }

    pub fn iter(&self) -> impl Iterator<Item = (SpellId, &Spell)> {
        self.spells
            .iter()
            .enumerate()
            .map(|(i, s)| (SpellId(i as u16), s))
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut Spell> {
        self.spells.iter_mut()
    }

    pub fn len(&self) -> usize {
        self.spells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.spells.is_empty()
    }
}

/// Source of spell definitions by label.
pub trait SpellOracle: Send + Sync {
    fn definition(&self, label: &str) -> Option<Arc<SpellDefinition>>;

    /// Looks up and materializes a spell at `level`.
    fn instantiate(
        &self,
        label: &str,
        level: u32,
        balance: &dyn BalanceTable,
    ) -> Result<Spell, ContentError> {
        let definition = self
            .definition(label)
            .ok_or_else(|| ContentError::UnknownSpell(label.to_string()))?;
        definition.materialize(level, balance)
    }
}
