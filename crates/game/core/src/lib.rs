//! Deterministic combat rules for the grimoire deckbuilder.
//!
//! `grimoire-core` defines the canonical combat rules (spells, afflictions,
//! enemy behavior, the turn engine) and exposes pure APIs that content
//! loaders and offline tools build on. All state mutation flows through
//! [`engine::CombatEngine`], and supporting crates depend on the types
//! re-exported here.
pub mod choice;
pub mod config;
pub mod enemy;
pub mod engine;
pub mod env;
pub mod error;
pub mod spell;
pub mod state;

pub use choice::WeightedChoice;
pub use config::CombatConfig;
pub use enemy::{
    BehaviorContext, BehaviorEntry, BehaviorPredicate, BehaviorTable, EnemyActionDefinition,
    EnemyDefinition, EnemyProfile, FlagOp,
};
pub use engine::{
    CombatEngine, CombatError, CombatEvent, CombatObserver, CombatSummary, EffectSource, EventLog,
};
pub use env::{
    AfflictionBehavior, AfflictionCatalog, AfflictionDefinition, BalanceTable, BalanceValue,
    CombatEnv, PcgRng, RngOracle, SequenceRng, StaticBalanceTable,
};
pub use error::{ContentError, ErrorSeverity, GameError};
pub use spell::{
    Amount, CallbackHook, CanCastCondition, CastError, CastFailure, CastPlan, CastType,
    DamageType, Spell, SpellDefinition, SpellEffect, SpellId, SpellOracle, Spellbook, StatKey,
    Target,
};
pub use state::{
    AfflictionSign, AfflictionType, CharacterSetup, CombatOutcome, CombatPhase, CombatState,
    Combatant, CombatantSetup, DecayPolicy, Deck, EquippedSpell, Side,
};
