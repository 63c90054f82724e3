//! Affliction definitions: sign, decay policy, and the reactive behavior the
//! engine consults for each affliction type.

use std::collections::BTreeMap;

use crate::error::ContentError;
use crate::state::{AfflictionSign, AfflictionType, DecayPolicy};

/// Reactive role an affliction plays in combat resolution.
///
/// The engine never switches on [`AfflictionType`]; it asks "does the owner
/// carry an affliction whose behavior is X" at fixed points of the turn.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum AfflictionBehavior {
    /// Consumed at the start of a cast attempt; the cast is cancelled.
    CancelAction,
    /// Consumed at the start of a cast; the OnCast effects resolve again.
    RepeatCast,
    /// Deals `stacks` damage to the owner at its turn end.
    DamageOverTime { bypass_ward: bool },
    /// Heals `stacks` HP at the owner's turn start.
    Regeneration,
    /// Adds `stacks` to every attack the owner makes.
    OutgoingDamageFlat,
    /// Scales attacks the owner makes by `100 + percent`.
    OutgoingDamagePercent(i32),
    /// Scales attacks the owner receives by `100 + percent`.
    IncomingDamagePercent(i32),
    /// Reflects `stacks` damage to whoever attacks the owner.
    Thorns,
    /// Caps each incoming hit at 1 damage, consuming a stack per hit.
    Intangible,
    /// Ward is kept across turn starts.
    WardRetain,
    /// No engine-level behavior (purely informational or content-read).
    None,
}

/// Static description of one affliction type.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AfflictionDefinition {
    pub kind: AfflictionType,
    pub sign: AfflictionSign,
    pub decay: DecayPolicy,
    pub behavior: AfflictionBehavior,
}

impl AfflictionDefinition {
    pub const fn new(
        kind: AfflictionType,
        sign: AfflictionSign,
        decay: DecayPolicy,
        behavior: AfflictionBehavior,
    ) -> Self {
        Self {
            kind,
            sign,
            decay,
            behavior,
        }
    }
}

/// Lookup table from affliction type to its definition.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct AfflictionCatalog {
    definitions: BTreeMap<AfflictionType, AfflictionDefinition>,
}

impl AfflictionCatalog {
    pub fn new(definitions: impl IntoIterator<Item = AfflictionDefinition>) -> Self {
        Self {
            definitions: definitions.into_iter().map(|d| (d.kind, d)).collect(),
        }
    }

    /// The stock definitions shipped with the engine.
    pub fn standard() -> Self {
        use AfflictionBehavior as B;
        use AfflictionSign::{Negative, Positive};
        use AfflictionType as T;
        use DecayPolicy::{ByActivation, ByDuration};

        Self::new([
            AfflictionDefinition::new(T::Paralyze, Negative, ByActivation, B::CancelAction),
            AfflictionDefinition::new(T::Echo, Positive, ByActivation, B::RepeatCast),
            AfflictionDefinition::new(
                T::Burn,
                Negative,
                ByDuration,
                B::DamageOverTime { bypass_ward: false },
            ),
            AfflictionDefinition::new(
                T::Poison,
                Negative,
                ByDuration,
                B::DamageOverTime { bypass_ward: true },
            ),
            AfflictionDefinition::new(T::Weak, Negative, ByDuration, B::OutgoingDamagePercent(-25)),
            AfflictionDefinition::new(
                T::Vulnerable,
                Negative,
                ByDuration,
                B::IncomingDamagePercent(50),
            ),
            AfflictionDefinition::new(T::Power, Positive, ByActivation, B::OutgoingDamageFlat),
            AfflictionDefinition::new(T::Thorns, Positive, ByDuration, B::Thorns),
            AfflictionDefinition::new(T::Intangible, Positive, ByActivation, B::Intangible),
            AfflictionDefinition::new(T::Regeneration, Positive, ByDuration, B::Regeneration),
            AfflictionDefinition::new(T::Retain, Positive, ByDuration, B::WardRetain),
        ])
    }

    pub fn get(&self, kind: AfflictionType) -> Result<&AfflictionDefinition, ContentError> {
        self.definitions
            .get(&kind)
            .ok_or(ContentError::UnknownAffliction(kind))
    }

    pub fn behavior(&self, kind: AfflictionType) -> AfflictionBehavior {
        self.definitions
            .get(&kind)
            .map(|d| d.behavior)
            .unwrap_or(AfflictionBehavior::None)
    }

    pub fn len(&self) -> usize {
        self.definitions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.definitions.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &AfflictionDefinition> {
        self.definitions.values()
    }
}
