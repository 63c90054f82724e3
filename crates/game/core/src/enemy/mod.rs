//! Enemy definitions and decision making.
//!
//! An enemy is data: stats, a set of named actions (each a bundle of spells
//! plus flag operations run on activation), and a behavior table whose
//! guarded weighted choices decide which action comes next.
mod behavior;
mod predicate;
mod selector;

use std::collections::BTreeSet;
use std::sync::Arc;

use crate::config::CombatConfig;
use crate::env::BalanceTable;
use crate::error::ContentError;
use crate::spell::SpellEffect;
use crate::state::CombatantSetup;

pub use behavior::{BehaviorEntry, BehaviorTable};
pub use predicate::{BehaviorContext, BehaviorPredicate};
pub use selector::{MAX_REDRAWS, select_action};

/// Mutation of a named enemy flag.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum FlagOp {
    Set(String),
    Clear(String),
    Toggle(String),
}

impl FlagOp {
    pub fn apply(&self, flags: &mut BTreeSet<String>) {
        match self {
            FlagOp::Set(flag) => {
                flags.insert(flag.clone());
            }
            FlagOp::Clear(flag) => {
                flags.remove(flag);
            }
            FlagOp::Toggle(flag) => {
                if !flags.remove(flag) {
                    flags.insert(flag.clone());
                }
            }
        }
    }
}

/// A named bundle of spells the enemy casts as one turn's intent.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct EnemyActionDefinition {
    pub key: String,
    /// Spell labels, cast in order.
    pub spells: Vec<String>,
    /// Flag operations run when the action is chosen.
    #[cfg_attr(feature = "serde", serde(default))]
    pub on_activate: Vec<FlagOp>,
}

/// Authored enemy data.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize))]
pub struct EnemyDefinition {
    pub name: String,
    #[cfg_attr(feature = "serde", serde(default))]
    pub level: u32,
    /// Read from the balance table (`<name>.MaxHp`) when omitted.
    #[cfg_attr(feature = "serde", serde(default))]
    pub max_hp: Option<u32>,
    /// Read from the balance table (`<name>.BasicAttackDamage`) when omitted.
    #[cfg_attr(feature = "serde", serde(default))]
    pub basic_attack_damage: Option<u32>,
    #[cfg_attr(feature = "serde", serde(default))]
    pub gold: u32,
    pub actions: Vec<EnemyActionDefinition>,
    pub behavior: BehaviorTable,
    /// Actions cast once when combat starts, before any turn.
    #[cfg_attr(feature = "serde", serde(default))]
    pub on_combat_start: Vec<String>,
    /// Effects resolved once at combat start, after those actions.
    #[cfg_attr(feature = "serde", serde(default))]
    pub on_combat_start_effects: Vec<SpellEffect>,
    /// Never pick the same action twice in a row.
    #[cfg_attr(feature = "serde", serde(default))]
    pub avoid_repeat: bool,
}

impl EnemyDefinition {
    pub fn action(&self, key: &str) -> Result<&EnemyActionDefinition, ContentError> {
        self.actions
            .iter()
            .find(|a| a.key == key)
            .ok_or_else(|| ContentError::UnknownAction {
                enemy: self.name.clone(),
                action: key.to_string(),
            })
    }

    /// Every spell label any action uses, in first-use order.
    pub fn spell_labels(&self) -> Vec<&str> {
        let mut labels: Vec<&str> = Vec::new();
        for label in self.actions.iter().flat_map(|a| a.spells.iter()) {
            if !labels.contains(&label.as_str()) {
                labels.push(label);
            }
        }
        labels
    }

    /// Checks that every action key referenced anywhere is defined and that
    /// every action fits in the spell queue.
    pub fn validate(&self) -> Result<(), ContentError> {
        for action in &self.actions {
            if action.spells.len() > CombatConfig::MAX_QUEUE {
                return Err(ContentError::ActionTooLong {
                    action: action.key.clone(),
                    spells: action.spells.len(),
                    capacity: CombatConfig::MAX_QUEUE,
                });
            }
        }
        for key in self
            .behavior
            .action_keys()
            .chain(self.on_combat_start.iter().map(String::as_str))
        {
            self.action(key)?;
        }
        Ok(())
    }

    /// Combat stats, falling back to the balance table for omitted values.
    pub fn setup(&self, balance: &dyn BalanceTable) -> Result<CombatantSetup, ContentError> {
        let level = Some(self.level);
        let max_hp = match self.max_hp {
            Some(hp) => hp,
            None => balance.require(&self.name, "MaxHp", level)?.max(1) as u32,
        };
        let basic_attack_damage = match self.basic_attack_damage {
            Some(damage) => damage,
            None => balance
                .require(&self.name, "BasicAttackDamage", level)?
                .max(0) as u32,
        };

        Ok(CombatantSetup {
            name: self.name.clone(),
            max_hp,
            hp: None,
            max_mana: 0,
            basic_attack_damage,
            gold: self.gold,
        })
    }
}

/// Runtime decision state of the enemy in one combat.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EnemyProfile {
    definition: Arc<EnemyDefinition>,
    flags: BTreeSet<String>,
    intent: Option<String>,
    last_action: Option<String>,
}

impl EnemyProfile {
    pub fn new(definition: Arc<EnemyDefinition>) -> Self {
        Self {
            definition,
            flags: BTreeSet::new(),
            intent: None,
            last_action: None,
        }
    }

    pub fn definition(&self) -> &EnemyDefinition {
        &self.definition
    }

    pub(crate) fn definition_arc(&self) -> &Arc<EnemyDefinition> {
        &self.definition
    }

    pub fn flags(&self) -> &BTreeSet<String> {
        &self.flags
    }

    pub fn has_flag(&self, flag: &str) -> bool {
        self.flags.contains(flag)
    }

    /// Action chosen for the upcoming enemy turn.
    pub fn intent(&self) -> Option<&str> {
        self.intent.as_deref()
    }

    pub fn last_action(&self) -> Option<&str> {
        self.last_action.as_deref()
    }

    /// Records the chosen action and runs its flag operations.
    pub(crate) fn activate(&mut self, key: &str) -> Result<(), ContentError> {
        self.run_flag_ops(key)?;
        self.intent = Some(key.to_string());
        Ok(())
    }

    pub(crate) fn run_flag_ops(&mut self, key: &str) -> Result<(), ContentError> {
        let action = self.definition.action(key)?;
        for op in &action.on_activate {
            op.apply(&mut self.flags);
        }
        Ok(())
    }

    /// Consumes the intent once the enemy acts on it.
    pub(crate) fn take_intent(&mut self) -> Option<String> {
        let intent = self.intent.take();
        if intent.is_some() {
            self.last_action.clone_from(&intent);
        }
        intent
    }

    pub(crate) fn reset(&mut self) {
        self.flags.clear();
        self.intent = None;
        self.last_action = None;
    }
}
