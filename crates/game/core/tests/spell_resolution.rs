mod common;

use common::{Fixture, bolt, enemy, hero, library};
use grimoire_core::spell::AlterationWindow;
use grimoire_core::{
    AfflictionType, Amount, CallbackHook, CastError, CastFailure, CastType, CombatConfig,
    CombatError, CombatEvent, DamageType, Side, SpellDefinition, SpellEffect, StatKey, Target,
};

fn afflict_self(kind: AfflictionType, stacks: i32) -> SpellEffect {
    SpellEffect::afflict(kind, Amount::constant(stacks), Target::Caster)
}

#[test]
fn paralyze_cancels_one_cast() {
    let lib = library().with(bolt("Zap", 10).with_cooldown(3));
    let mut fixture = Fixture::new(&lib, hero(&["Zap"]), enemy(40, &["Idle"]));
    let mut engine = fixture.started();
    engine
        .resolve_effect(&afflict_self(AfflictionType::Paralyze, 1), Side::Character)
        .unwrap();

    engine.queue_spell("Zap").unwrap();
    engine.end_player_turn().unwrap();
    assert_eq!(engine.state().enemy.hp(), 40);
    assert!(!engine.state().character.afflictions().has(AfflictionType::Paralyze));
    assert!(engine.state().events().contains(&CombatEvent::CastCancelled {
        side: Side::Character,
        spell: "Zap".into(),
        affliction: AfflictionType::Paralyze,
    }));
    let zap = engine.state().character_spells.find("Zap").unwrap();
    let cooldown = engine.state().character_spells.get(zap).unwrap().cooldown();
    assert_eq!(cooldown.current(), 0);

    engine.queue_spell("Zap").unwrap();
    engine.end_player_turn().unwrap();
    assert_eq!(engine.state().enemy.hp(), 30);
}

#[test]
fn echo_resolves_the_cast_twice() {
    let lib = library().with(bolt("Zap", 10).with_cooldown(3));
    let mut fixture = Fixture::new(&lib, hero(&["Zap"]), enemy(40, &["Idle"]));
    let mut engine = fixture.started();
    engine
        .resolve_effect(&afflict_self(AfflictionType::Echo, 1), Side::Character)
        .unwrap();

    engine.queue_spell("Zap").unwrap();
    engine.end_player_turn().unwrap();

    assert_eq!(engine.state().enemy.hp(), 20);
    assert!(!engine.state().character.afflictions().has(AfflictionType::Echo));
    assert!(engine.state().events().contains(&CombatEvent::SpellCast {
        side: Side::Character,
        spell: "Zap".into(),
        repeats: 2,
    }));
    let zap = engine.state().character_spells.find("Zap").unwrap();
    let cooldown = engine.state().character_spells.get(zap).unwrap().cooldown();
    assert_eq!(cooldown.current(), cooldown.max());
    assert_eq!(cooldown.max(), 3);
}

#[test]
fn cooldown_blocks_recast_until_it_expires() {
    let lib = library().with(
        bolt("Zap", 4)
            .with_cooldown(3)
            .with_stat(StatKey::ManaCost, 1),
    );
    let mut fixture = Fixture::new(&lib, hero(&["Zap"]), enemy(100, &["Idle"]));
    let mut engine = fixture.started();

    engine.queue_spell("Zap").unwrap();
    assert_eq!(engine.state().character.mana(), 2);
    engine.end_player_turn().unwrap();

    let zap = engine.state().character_spells.find("Zap").unwrap();
    let cooldown = engine.state().character_spells.get(zap).unwrap().cooldown();
    assert_eq!(cooldown.current(), 3);
    assert_eq!(engine.state().character.mana(), 3);

    for remaining in [3, 2, 1] {
        let err = engine.queue_spell("Zap").unwrap_err();
        assert_eq!(
            err,
            CombatError::Cast(CastError::CannotCast {
                spell: "Zap".into(),
                failures: vec![CastFailure::OnCooldown { remaining }],
            })
        );
        engine.end_player_turn().unwrap();
    }

    assert!(engine.can_cast("Zap").is_ok());
    engine.queue_spell("Zap").unwrap();
}

#[test]
fn rejected_cast_leaves_state_unchanged() {
    let lib = library().with(bolt("Meteor", 30).with_stat(StatKey::ManaCost, 5));
    let mut fixture = Fixture::new(&lib, hero(&["Meteor"]), enemy(100, &["Idle"]));
    let mut engine = fixture.started();
    let before = engine.state().clone();

    let err = engine.queue_spell("Meteor").unwrap_err();
    match err {
        CombatError::Cast(cast) => assert_eq!(
            cast.primary(),
            Some(&CastFailure::InsufficientMana {
                required: 5,
                available: 3,
            })
        ),
        other => panic!("unexpected error: {other}"),
    }
    assert_eq!(engine.state(), &before);

    assert_eq!(
        engine.queue_spell("Unknown"),
        Err(CombatError::Cast(CastError::NotEquipped("Unknown".into())))
    );
    assert_eq!(engine.state(), &before);
}

#[test]
fn spell_cannot_be_queued_twice() {
    let mut fixture = Fixture::new(&library(), hero(&["Bolt"]), enemy(100, &["Idle"]));
    let mut engine = fixture.started();
    engine.queue_spell("Bolt").unwrap();

    let err = engine.queue_spell("Bolt").unwrap_err();
    assert!(matches!(
        err,
        CombatError::Cast(CastError::CannotCast { ref failures, .. })
            if failures == &[CastFailure::AlreadyQueued]
    ));
}

#[test]
fn free_cast_skips_mana_and_cooldown() {
    let lib = library().with(
        bolt("Meteor", 30)
            .with_stat(StatKey::ManaCost, 5)
            .with_cooldown(2),
    );
    let mut fixture = Fixture::new(&lib, hero(&["Meteor"]), enemy(100, &["Idle"]));
    let mut engine = fixture.started();
    engine
        .resolve_effect(
            &SpellEffect::GrantFreeCasts {
                count: Amount::constant(1),
            },
            Side::Character,
        )
        .unwrap();

    let plan = engine.can_cast("Meteor").unwrap();
    assert!(plan.free_cast);
    assert_eq!(plan.mana_cost, 0);

    engine.queue_spell("Meteor").unwrap();
    assert_eq!(engine.state().character.mana(), 3);
    assert_eq!(engine.state().character.free_casts(), 0);

    engine.end_player_turn().unwrap();
    assert_eq!(engine.state().enemy.hp(), 70);
    let meteor = engine.state().character_spells.find("Meteor").unwrap();
    assert!(engine.state().character_spells.get(meteor).unwrap().cooldown().is_ready());
}

#[test]
fn prep_time_delays_the_cast() {
    let lib = library().with(bolt("Meteor", 30).with_stat(StatKey::PrepTime, 1));
    let mut fixture = Fixture::new(&lib, hero(&["Meteor"]), enemy(100, &["Idle"]));
    let mut engine = fixture.started();

    engine.queue_spell("Meteor").unwrap();
    engine.end_player_turn().unwrap();
    assert_eq!(engine.state().enemy.hp(), 100);
    assert_eq!(engine.state().character_queue.len(), 1);
    assert_eq!(
        engine.state().character_queue.get(0).unwrap().prep_elapsed,
        1
    );

    engine.end_player_turn().unwrap();
    assert_eq!(engine.state().enemy.hp(), 70);
    assert!(engine.state().character_queue.is_empty());
}

#[test]
fn prep_time_follows_alterations_made_while_queued() {
    let haste = SpellDefinition::new("Haste", CastType::Reusable).on(
        CallbackHook::OnQueue,
        vec![SpellEffect::AlterQueuedSpellStat {
            amount: Amount::constant(-2),
            window: AlterationWindow::UntilCast,
            stats: vec![StatKey::PrepTime],
        }],
    );
    let lib = library()
        .with(bolt("Slow", 10).with_stat(StatKey::PrepTime, 2))
        .with(haste);
    let mut fixture = Fixture::new(&lib, hero(&["Slow", "Haste"]), enemy(100, &["Idle"]));
    let mut engine = fixture.started();

    engine.queue_spell("Slow").unwrap();
    engine.queue_spell("Haste").unwrap();
    engine.end_player_turn().unwrap();

    assert_eq!(engine.state().enemy.hp(), 90);
    assert!(engine.state().character_queue.is_empty());
    let slow = engine.state().character_spells.find("Slow").unwrap();
    let spell = engine.state().character_spells.get(slow).unwrap();
    assert_eq!(spell.prep_time(), 2);
}

#[test]
fn queued_spell_alteration_lasts_until_cast() {
    let empower = SpellDefinition::new("Empower", CastType::Reusable).on(
        CallbackHook::OnQueue,
        vec![SpellEffect::AlterQueuedSpellStat {
            amount: Amount::constant(5),
            window: AlterationWindow::UntilCast,
            stats: vec![StatKey::OtherDamageAmount],
        }],
    );
    let lib = library().with(empower);
    let mut fixture = Fixture::new(&lib, hero(&["Bolt", "Empower"]), enemy(100, &["Idle"]));
    let mut engine = fixture.started();

    engine.queue_spell("Bolt").unwrap();
    engine.queue_spell("Empower").unwrap();
    let bolt = engine.state().character_spells.find("Bolt").unwrap();
    let damage = |engine: &grimoire_core::CombatEngine<'_>| {
        engine
            .state()
            .character_spells
            .get(bolt)
            .unwrap()
            .stats()
            .get(StatKey::OtherDamageAmount)
    };
    assert_eq!(damage(&engine), Some(15));

    engine.end_player_turn().unwrap();
    assert_eq!(engine.state().enemy.hp(), 85);
    assert_eq!(damage(&engine), Some(10));
}

#[test]
fn counters_grow_per_cast_and_reset_with_combat() {
    let frustration = SpellDefinition::new("Frustration", CastType::Reusable)
        .with_stat(StatKey::SelfDamageAmount, 2)
        .with_stat(StatKey::SelfDamageIncrease, 1)
        .on(
            CallbackHook::OnCast,
            vec![
                SpellEffect::AlterHp {
                    amount: Amount::negate(Amount::Sum(vec![
                        Amount::stat(StatKey::SelfDamageAmount),
                        Amount::Counter("frustration".into()),
                    ])),
                    damage_type: DamageType::Default,
                    target: Target::Caster,
                },
                SpellEffect::AlterCounter {
                    counter: "frustration".into(),
                    amount: Amount::stat(StatKey::SelfDamageIncrease),
                },
            ],
        )
        .on(
            CallbackHook::OnCombatReset,
            vec![SpellEffect::ResetCounter {
                counter: "frustration".into(),
            }],
        );
    let lib = library().with(frustration);
    let mut fixture = Fixture::new(&lib, hero(&["Frustration"]), enemy(100, &["Idle"]));
    let mut engine = fixture.started();

    engine.queue_spell("Frustration").unwrap();
    engine.end_player_turn().unwrap();
    assert_eq!(engine.state().character.hp(), 48);

    engine.queue_spell("Frustration").unwrap();
    engine.end_player_turn().unwrap();
    assert_eq!(engine.state().character.hp(), 45);

    let id = engine.state().character_spells.find("Frustration").unwrap();
    assert_eq!(
        engine.state().character_spells.get(id).unwrap().counter("frustration"),
        2
    );

    engine.reset_combat().unwrap();
    assert_eq!(
        engine.state().character_spells.get(id).unwrap().counter("frustration"),
        0
    );
}

#[test]
fn ward_absorbs_before_hp() {
    let guard = SpellDefinition::new("Guard", CastType::Reusable).on(
        CallbackHook::OnCast,
        vec![SpellEffect::ward(Amount::constant(3), Target::Caster)],
    );
    let lib = library().with(guard);
    let mut fixture = Fixture::new(&lib, hero(&["Guard"]), enemy(100, &["Bite"]));
    let mut engine = fixture.started();

    engine.queue_spell("Guard").unwrap();
    engine.end_player_turn().unwrap();

    assert_eq!(engine.state().character.ward(), 0);
    assert_eq!(engine.state().character.hp(), 48);
    assert!(engine.state().events().contains(&CombatEvent::Damage {
        target: Side::Character,
        amount: 2,
        absorbed: 3,
        damage_type: DamageType::Default,
    }));
}

#[test]
fn ward_resets_each_turn_only_when_configured() {
    let ward = SpellEffect::ward(Amount::constant(6), Target::Caster);

    let mut kept = Fixture::new(&library(), hero(&["Bolt"]), enemy(100, &["Idle"]));
    let mut engine = kept.started();
    engine.resolve_effect(&ward, Side::Character).unwrap();
    engine.end_player_turn().unwrap();
    assert_eq!(engine.state().character.ward(), 6);

    let config = CombatConfig::default().with_ward_reset(true);
    let mut reset =
        Fixture::with_config(&library(), hero(&["Bolt"]), enemy(100, &["Idle"]), config);
    let mut engine = reset.started();
    engine.resolve_effect(&ward, Side::Character).unwrap();
    engine.end_player_turn().unwrap();
    assert_eq!(engine.state().character.ward(), 0);

    engine.resolve_effect(&ward, Side::Character).unwrap();
    engine
        .resolve_effect(&afflict_self(AfflictionType::Retain, 2), Side::Character)
        .unwrap();
    engine.end_player_turn().unwrap();
    assert_eq!(engine.state().character.ward(), 6);
}

#[test]
fn resources_stay_in_bounds() {
    let mut fixture = Fixture::new(&library(), hero(&["Bolt"]), enemy(100, &["Idle"]));
    let mut engine = fixture.started();

    engine
        .resolve_effect(
            &SpellEffect::AlterHp {
                amount: Amount::constant(500),
                damage_type: DamageType::Heal,
                target: Target::Caster,
            },
            Side::Character,
        )
        .unwrap();
    assert_eq!(engine.state().character.hp(), 50);

    engine
        .resolve_effect(
            &SpellEffect::AlterMana {
                amount: Amount::constant(-10),
                target: Target::Caster,
            },
            Side::Character,
        )
        .unwrap();
    assert_eq!(engine.state().character.mana(), 0);

    engine
        .resolve_effect(
            &SpellEffect::ApplyAffliction {
                affliction: AfflictionType::Weak,
                stacks: Amount::constant(-3),
                target: Target::Caster,
            },
            Side::Character,
        )
        .unwrap();
    assert!(engine.state().character.afflictions().is_empty());
}

#[test]
fn thorns_reflect_attack_damage() {
    let mut fixture = Fixture::new(&library(), hero(&["Bolt"]), enemy(100, &["Idle"]));
    let mut engine = fixture.started();
    engine
        .resolve_effect(&afflict_self(AfflictionType::Thorns, 3), Side::Enemy)
        .unwrap();

    engine.queue_spell("Bolt").unwrap();
    engine.end_player_turn().unwrap();

    assert_eq!(engine.state().enemy.hp(), 90);
    assert_eq!(engine.state().character.hp(), 47);
    // Duration-based: one stack decays at the enemy's turn end.
    assert_eq!(
        engine.state().enemy.afflictions().stacks(AfflictionType::Thorns),
        2
    );
}

#[test]
fn poison_bypasses_ward_and_decays() {
    let mut fixture = Fixture::new(&library(), hero(&["Bolt"]), enemy(100, &["Idle"]));
    let mut engine = fixture.started();
    engine
        .resolve_effect(
            &SpellEffect::ward(Amount::constant(10), Target::Caster),
            Side::Character,
        )
        .unwrap();
    engine
        .resolve_effect(&afflict_self(AfflictionType::Poison, 3), Side::Character)
        .unwrap();

    engine.end_player_turn().unwrap();
    assert_eq!(engine.state().character.hp(), 47);
    assert_eq!(engine.state().character.ward(), 10);
    assert_eq!(
        engine.state().character.afflictions().stacks(AfflictionType::Poison),
        2
    );
}

#[test]
fn burn_is_absorbed_by_ward() {
    let mut fixture = Fixture::new(&library(), hero(&["Bolt"]), enemy(100, &["Idle"]));
    let mut engine = fixture.started();
    engine
        .resolve_effect(
            &SpellEffect::ward(Amount::constant(2), Target::Caster),
            Side::Character,
        )
        .unwrap();
    engine
        .resolve_effect(&afflict_self(AfflictionType::Burn, 5), Side::Character)
        .unwrap();

    engine.end_player_turn().unwrap();
    assert_eq!(engine.state().character.ward(), 0);
    assert_eq!(engine.state().character.hp(), 47);
}

#[test]
fn single_use_cards_come_from_the_hand_and_exhaust() {
    let spark = bolt("Spark", 7);
    let spark = SpellDefinition {
        cast_type: CastType::SingleUse,
        ..spark
    };
    let lib = library().with(spark);

    let config = CombatConfig::default().with_cards_per_turn(0);
    let mut empty_hand =
        Fixture::with_config(&lib, hero(&["Spark"]), enemy(100, &["Idle"]), config);
    let mut engine = empty_hand.started();
    let err = engine.queue_spell("Spark").unwrap_err();
    assert!(matches!(
        err,
        CombatError::Cast(CastError::CannotCast { ref failures, .. })
            if failures == &[CastFailure::NotInHand]
    ));
    drop(engine);

    let mut fixture = Fixture::new(&lib, hero(&["Spark", "Bolt"]), enemy(100, &["Idle"]));
    let mut engine = fixture.started();
    let spark = engine.state().character_spells.find("Spark").unwrap();
    assert_eq!(engine.state().deck.hand(), &[spark]);

    engine.queue_spell("Spark").unwrap();
    engine.end_player_turn().unwrap();
    assert_eq!(engine.state().enemy.hp(), 93);
    assert_eq!(engine.state().deck.exhausted(), &[spark]);
    assert!(engine.state().deck.hand().is_empty());
    assert!(engine.queue_spell("Spark").is_err());
}

#[test]
fn exhausting_from_hand_spares_queued_cards() {
    let spark = SpellDefinition {
        cast_type: CastType::SingleUse,
        ..bolt("Spark", 7)
    };
    let purge = SpellDefinition::new("Purge", CastType::SingleUse).on(
        CallbackHook::OnQueue,
        vec![SpellEffect::Exhaust {
            count: Amount::constant(1),
        }],
    );
    let dud = SpellDefinition::new("Dud", CastType::SingleUse);
    let lib = library().with(spark).with(purge).with(dud);

    let config = CombatConfig::default().with_cards_per_turn(3);
    let mut fixture = Fixture::with_config(
        &lib,
        hero(&["Spark", "Purge", "Dud"]),
        enemy(100, &["Idle"]),
        config,
    );
    let mut engine = fixture.started();
    let find = |label| engine.state().character_spells.find(label).unwrap();
    let (spark, purge, dud) = (find("Spark"), find("Purge"), find("Dud"));
    assert_eq!(engine.state().deck.hand().len(), 3);

    engine.queue_spell("Spark").unwrap();
    engine.queue_spell("Purge").unwrap();
    assert_eq!(engine.state().deck.discard(), &[dud]);

    engine.end_player_turn().unwrap();
    assert_eq!(engine.state().enemy.hp(), 93);
    assert_eq!(engine.state().deck.exhausted(), &[spark, purge]);
    assert_eq!(engine.state().deck.hand(), &[dud]);
    assert!(engine.queue_spell("Spark").is_err());
}

#[test]
fn reset_is_idempotent() {
    let lib = library().with(bolt("Zap", 4).with_cooldown(3));
    let mut fixture = Fixture::new(&lib, hero(&["Zap", "Bolt"]), enemy(100, &["Bite"]));
    let mut engine = fixture.started();
    engine
        .resolve_effect(&afflict_self(AfflictionType::Poison, 4), Side::Character)
        .unwrap();
    engine.queue_spell("Zap").unwrap();
    engine.end_player_turn().unwrap();
    engine.queue_spell("Bolt").unwrap();

    engine.reset_combat().unwrap();
    engine.take_events();
    let once = engine.state().clone();

    engine.reset_combat().unwrap();
    engine.take_events();
    assert_eq!(engine.state(), &once);

    assert_eq!(once.phase(), grimoire_core::CombatPhase::CombatStart);
    assert!(once.character.afflictions().is_empty());
    assert!(once.character_queue.is_empty());
    assert!(once.character_spells.iter().all(|(_, s)| s.cooldown().is_ready()));
    assert_eq!(once.character.mana(), 3);

    engine.start_combat().unwrap();
    assert_eq!(engine.state().turn_number(), 1);
}
