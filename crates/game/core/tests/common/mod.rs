#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::Arc;

use grimoire_core::{
    AfflictionCatalog, Amount, BehaviorEntry, BehaviorPredicate, BehaviorTable, CallbackHook,
    CastType, CharacterSetup, CombatConfig, CombatEngine, CombatEnv, CombatState,
    CombatantSetup, EnemyActionDefinition, EnemyDefinition, EquippedSpell, PcgRng,
    SpellDefinition, SpellEffect, SpellOracle, StatKey, StaticBalanceTable, Target,
    WeightedChoice,
};

/// In-memory spell catalogue.
#[derive(Default)]
pub struct Library {
    spells: HashMap<String, Arc<SpellDefinition>>,
}

impl Library {
    pub fn with(mut self, definition: SpellDefinition) -> Self {
        self.spells
            .insert(definition.label.clone(), Arc::new(definition));
        self
    }
}

impl SpellOracle for Library {
    fn definition(&self, label: &str) -> Option<Arc<SpellDefinition>> {
        self.spells.get(label).cloned()
    }
}

/// Reusable spell hitting the opponent for `damage`.
pub fn bolt(label: &str, damage: i32) -> SpellDefinition {
    SpellDefinition::new(label, CastType::Reusable)
        .with_stat(StatKey::OtherDamageAmount, damage)
        .on(
            CallbackHook::OnCast,
            vec![SpellEffect::attack(
                Amount::stat(StatKey::OtherDamageAmount),
                Target::Other,
            )],
        )
}

/// Enemy spell that does nothing.
pub fn idle_spell() -> SpellDefinition {
    SpellDefinition::new("Idle", CastType::Reusable)
}

pub fn library() -> Library {
    Library::default()
        .with(bolt("Bolt", 10))
        .with(bolt("Bite", 5))
        .with(idle_spell())
}

pub fn hero(spells: &[&str]) -> CharacterSetup {
    CharacterSetup {
        stats: CombatantSetup {
            name: "Hero".into(),
            max_hp: 50,
            hp: None,
            max_mana: 3,
            basic_attack_damage: 4,
            gold: 100,
        },
        spells: spells.iter().map(|label| EquippedSpell::new(*label, 0)).collect(),
    }
}

pub fn action(key: &str, spells: &[&str]) -> EnemyActionDefinition {
    EnemyActionDefinition {
        key: key.into(),
        spells: spells.iter().map(|s| s.to_string()).collect(),
        on_activate: vec![],
    }
}

pub fn choice(entries: &[(&str, u32)]) -> WeightedChoice<String> {
    WeightedChoice::new(entries.iter().map(|(k, w)| (k.to_string(), *w)).collect()).unwrap()
}

/// Enemy that always performs a single action.
pub fn enemy(max_hp: u32, spells: &[&str]) -> EnemyDefinition {
    EnemyDefinition {
        name: "Dummy".into(),
        level: 0,
        max_hp: Some(max_hp),
        basic_attack_damage: Some(0),
        gold: 10,
        actions: vec![action("act", spells)],
        behavior: BehaviorTable::new(vec![BehaviorEntry::new(
            BehaviorPredicate::Always,
            choice(&[("act", 1)]),
        )]),
        on_combat_start: vec![],
        on_combat_start_effects: vec![],
        avoid_repeat: false,
    }
}

/// Owns everything one combat borrows.
pub struct Fixture {
    pub state: CombatState,
    pub balance: StaticBalanceTable,
    pub rng: PcgRng,
    pub afflictions: AfflictionCatalog,
    pub config: CombatConfig,
}

impl Fixture {
    pub fn new(library: &Library, character: CharacterSetup, enemy: EnemyDefinition) -> Self {
        Self::with_config(library, character, enemy, CombatConfig::default())
    }

    pub fn with_config(
        library: &Library,
        character: CharacterSetup,
        enemy: EnemyDefinition,
        config: CombatConfig,
    ) -> Self {
        let balance = StaticBalanceTable::new();
        let state = CombatState::build(&character, Arc::new(enemy), 7, library, &balance)
            .expect("content builds");
        Self {
            state,
            balance,
            rng: PcgRng,
            afflictions: AfflictionCatalog::standard(),
            config,
        }
    }

    pub fn engine(&mut self) -> CombatEngine<'_> {
        let env = CombatEnv::new(&self.balance, &self.rng, &self.afflictions, &self.config);
        CombatEngine::new(&mut self.state, env)
    }

    /// Engine with the combat already started.
    pub fn started(&mut self) -> CombatEngine<'_> {
        let mut engine = self.engine();
        engine.start_combat().expect("combat starts");
        engine
    }
}
