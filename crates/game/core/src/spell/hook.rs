//! Callback hooks and the per-spell effect registry.
//!
//! Each spell instance owns a registry mapping a [`CallbackHook`] to the
//! ordered effects bound to it. The engine iterates the registry
//! deterministically at fixed points of the turn lifecycle.

use std::collections::BTreeMap;
use std::sync::Arc;

use super::SpellEffect;

/// Named points in the combat lifecycle where bound effects fire.
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
    strum::EnumIter,
    strum::IntoStaticStr,
)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum CallbackHook {
    /// Immediately when the spell enters the queue.
    OnQueue,
    /// When the spell is cast out of the queue.
    OnCast,
    OnPlayerTurnStart,
    OnPlayerTurnEnd,
    /// After the enemy's combat-start actions resolve.
    OnCombatStart,
    /// When combat is reset; restores per-combat counters.
    OnCombatReset,
}

/// Ordered effect lists per hook.
///
/// Effect lists are shared (`Arc<[SpellEffect]>`) so the resolver can hold
/// one while mutating the owning spell's counters and stats.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct HookRegistry {
    bindings: BTreeMap<CallbackHook, Arc<[SpellEffect]>>,
}

impl HookRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a registry from authored bindings.
    ///
    /// A hook bound more than once keeps every effect, in declaration order.
    pub fn from_bindings<'a>(
        bindings: impl IntoIterator<Item = &'a (CallbackHook, Vec<SpellEffect>)>,
    ) -> Self {
        let mut merged: BTreeMap<CallbackHook, Vec<SpellEffect>> = BTreeMap::new();
        for (hook, effects) in bindings {
            merged.entry(*hook).or_default().extend(effects.iter().cloned());
        }
        Self {
            bindings: merged
                .into_iter()
                .map(|(hook, effects)| (hook, Arc::from(effects)))
                .collect(),
        }
    }

    /// Effects bound to `hook`; empty when nothing is bound.
    pub fn effects(&self, hook: CallbackHook) -> Arc<[SpellEffect]> {
        self.bindings
            .get(&hook)
            .cloned()
            .unwrap_or_else(|| Arc::from(Vec::new()))
    }

    pub fn is_bound(&self, hook: CallbackHook) -> bool {
        self.bindings.get(&hook).is_some_and(|e| !e.is_empty())
    }

    /// Appends effects to a hook.
    pub fn register(&mut self, hook: CallbackHook, effects: impl IntoIterator<Item = SpellEffect>) {
        let mut combined: Vec<SpellEffect> = self.effects(hook).to_vec();
        combined.extend(effects);
        self.bindings.insert(hook, Arc::from(combined));
    }

    /// Drops every effect bound to a hook, returning whether any were bound.
    pub fn unregister(&mut self, hook: CallbackHook) -> bool {
        self.bindings.remove(&hook).is_some()
    }

    pub fn hooks(&self) -> impl Iterator<Item = CallbackHook> + '_ {
        self.bindings.keys().copied()
    }
}
