//! In-memory content catalogues.
//!
//! These are the oracle implementations the engine reads through. They are
//! built either from data files (see [`crate::loaders`]) or by hand in tests.

use std::collections::BTreeMap;
use std::sync::Arc;

use grimoire_core::{
    AfflictionCatalog, AfflictionType, BalanceTable, CanCastCondition, CharacterSetup,
    CombatConfig, CombatEnv, CombatState, ContentError, EnemyDefinition, RngOracle,
    SpellDefinition, SpellEffect, SpellOracle, StaticBalanceTable,
};

/// Spell definitions keyed by label.
#[derive(Clone, Debug, Default)]
pub struct SpellCatalog {
    spells: BTreeMap<String, Arc<SpellDefinition>>,
}

impl SpellCatalog {
    pub fn new(definitions: impl IntoIterator<Item = SpellDefinition>) -> Self {
        Self {
            spells: definitions
                .into_iter()
                .map(|d| (d.label.clone(), Arc::new(d)))
                .collect(),
        }
    }

    pub fn get(&self, label: &str) -> Option<&Arc<SpellDefinition>> {
        self.spells.get(label)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Arc<SpellDefinition>> {
        self.spells.values()
    }

    pub fn len(&self) -> usize {
        self.spells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.spells.is_empty()
    }
}

impl SpellOracle for SpellCatalog {
    fn definition(&self, label: &str) -> Option<Arc<SpellDefinition>> {
        self.spells.get(label).cloned()
    }
}

/// Enemy definitions keyed by name.
#[derive(Clone, Debug, Default)]
pub struct EnemyCatalog {
    enemies: BTreeMap<String, Arc<EnemyDefinition>>,
}

impl EnemyCatalog {
    pub fn new(definitions: impl IntoIterator<Item = EnemyDefinition>) -> Self {
        Self {
            enemies: definitions
                .into_iter()
                .map(|d| (d.name.clone(), Arc::new(d)))
                .collect(),
        }
    }

    pub fn get(&self, name: &str) -> Result<Arc<EnemyDefinition>, ContentError> {
        self.enemies
            .get(name)
            .cloned()
            .ok_or_else(|| ContentError::UnknownEnemy(name.to_string()))
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.enemies.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Arc<EnemyDefinition>> {
        self.enemies.values()
    }

    pub fn len(&self) -> usize {
        self.enemies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.enemies.is_empty()
    }
}

/// Everything a combat needs besides the character and a random source.
#[derive(Clone, Debug, Default)]
pub struct Content {
    pub config: CombatConfig,
    pub balance: StaticBalanceTable,
    pub afflictions: AfflictionCatalog,
    pub spells: SpellCatalog,
    pub enemies: EnemyCatalog,
}

impl Content {
    /// Environment bundle borrowing this content.
    pub fn env<'a>(&'a self, rng: &'a dyn RngOracle) -> CombatEnv<'a> {
        CombatEnv::new(&self.balance, rng, &self.afflictions, &self.config)
    }

    /// Builds a fresh combat against the enemy named `enemy`.
    pub fn build_combat(
        &self,
        character: &CharacterSetup,
        enemy: &str,
        seed: u64,
    ) -> Result<CombatState, ContentError> {
        let enemy = self.enemies.get(enemy)?;
        CombatState::build(character, enemy, seed, &self.spells, &self.balance)
    }

    /// Cross-checks the catalogues and returns every problem found.
    ///
    /// Spells are materialized at level 0, enemy spells at the enemy's level.
    pub fn problems(&self) -> Vec<ContentError> {
        let mut problems = Vec::new();

        for definition in self.spells.iter() {
            if let Err(err) = definition.materialize(0, &self.balance) {
                problems.push(err);
            }
            for kind in referenced_afflictions(definition) {
                if let Err(err) = self.afflictions.get(kind) {
                    problems.push(err);
                }
            }
        }

        for enemy in self.enemies.iter() {
            if let Err(err) = enemy.validate() {
                problems.push(err);
            }
            if let Err(err) = enemy.setup(&self.balance) {
                problems.push(err);
            }
            for label in enemy.spell_labels() {
                if let Err(err) = self.spells.instantiate(label, enemy.level, &self.balance) {
                    problems.push(err);
                }
            }
        }

        problems
    }

    /// Fails on the first problem [`Self::problems`] would report.
    pub fn validate(&self) -> Result<(), ContentError> {
        match self.problems().into_iter().next() {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }
}

fn referenced_afflictions(definition: &SpellDefinition) -> Vec<AfflictionType> {
    let mut kinds = Vec::new();
    for (_, effects) in &definition.hooks {
        for effect in effects {
            if let SpellEffect::ApplyAffliction { affliction, .. } = effect {
                kinds.push(*affliction);
            }
        }
    }
    for condition in &definition.conditions {
        if let CanCastCondition::CasterHas(kind) | CanCastCondition::TargetHas(kind) = condition {
            kinds.push(*kind);
        }
    }
    kinds
}

#[cfg(test)]
mod tests {
    use grimoire_core::{
        Amount, BehaviorEntry, BehaviorPredicate, BehaviorTable, CallbackHook, CastType,
        EnemyActionDefinition, StatKey, Target, WeightedChoice,
    };

    use super::*;

    fn shock() -> SpellDefinition {
        SpellDefinition::new("Shock", CastType::Reusable)
            .with_balanced(StatKey::OtherDamageAmount)
            .on(
                CallbackHook::OnCast,
                vec![SpellEffect::attack(
                    Amount::stat(StatKey::OtherDamageAmount),
                    Target::Other,
                )],
            )
    }

    fn wisp(spell: &str) -> EnemyDefinition {
        EnemyDefinition {
            name: "Wisp".into(),
            level: 0,
            max_hp: Some(12),
            basic_attack_damage: Some(2),
            gold: 3,
            actions: vec![EnemyActionDefinition {
                key: "zap".into(),
                spells: vec![spell.into()],
                on_activate: vec![],
            }],
            behavior: BehaviorTable::new(vec![BehaviorEntry::new(
                BehaviorPredicate::Always,
                WeightedChoice::new(vec![("zap".to_string(), 1)]).unwrap(),
            )]),
            on_combat_start: vec![],
            on_combat_start_effects: vec![],
            avoid_repeat: false,
        }
    }

    #[test]
    fn unknown_enemy_is_content_error() {
        let catalog = EnemyCatalog::new([wisp("Shock")]);
        assert!(catalog.get("Wisp").is_ok());
        assert_eq!(
            catalog.get("Golem").unwrap_err(),
            ContentError::UnknownEnemy("Golem".into())
        );
    }

    #[test]
    fn problems_report_missing_balance_and_spells() {
        let content = Content {
            spells: SpellCatalog::new([shock()]),
            enemies: EnemyCatalog::new([wisp("Gust")]),
            afflictions: AfflictionCatalog::standard(),
            ..Content::default()
        };

        let problems = content.problems();
        assert!(problems.contains(&ContentError::MissingBalanceKey {
            owner: "Shock".into(),
            stat: "OtherDamageAmount".into(),
            level: Some(0),
        }));
        assert!(problems.contains(&ContentError::UnknownSpell("Gust".into())));
        assert!(content.validate().is_err());
    }

    #[test]
    fn consistent_content_validates() {
        let balance = StaticBalanceTable::new().with(
            "Shock",
            "OtherDamageAmount",
            grimoire_core::BalanceValue::PerLevel(vec![4, 6]),
        );
        let content = Content {
            balance,
            spells: SpellCatalog::new([shock()]),
            enemies: EnemyCatalog::new([wisp("Shock")]),
            afflictions: AfflictionCatalog::standard(),
            ..Content::default()
        };
        assert_eq!(content.problems(), Vec::new());
    }
}
