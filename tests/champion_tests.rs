use serde_json::Value;

use raidstat::analysis::{analyze_champions, AnalysisError, ChampionReport, ChampionSettings};
use raidstat::data::StaticData;

const FIXTURE: &str = include_str!("fixtures/static_data_sample.json");

fn fixture_value() -> Value {
    serde_json::from_str(FIXTURE).expect("fixture should be valid json")
}

fn analyze(value: Value) -> Result<ChampionReport, AnalysisError> {
    let data: StaticData = serde_json::from_value(value).expect("fixture should parse");
    analyze_champions(&data, &ChampionSettings::default())
}

fn report() -> ChampionReport {
    analyze(fixture_value()).expect("fixture should analyze")
}

#[test]
fn only_ascended_faction_champions_are_reported() {
    let report = report();
    assert_eq!(report.champions.len(), 1);
    let champion = &report.champions[0];
    assert_eq!(champion.id, 1006);
    assert_eq!(champion.name.as_deref(), Some("Kael"));
    assert_eq!(champion.rarity, "Rare");
    assert_eq!(champion.affinity, "Magic");
    assert_eq!(champion.role, "Attack");
    assert_eq!(champion.faction, "Dark Elves");
    assert_eq!(champion.released, "Y");
}

#[test]
fn base_stats_are_scaled_for_display() {
    let champion = &report().champions[0];
    // 20000 HP rounds down to a multiple of 15
    assert_eq!(champion.hp, 19_995);
    assert_eq!(champion.atk, 1000);
    assert_eq!(champion.def, 900);
    assert_eq!(champion.spd, 101);
    assert_eq!(champion.res, 30);
    assert_eq!(champion.acc, 0);
    assert_eq!(champion.cr_rate, 15);
    assert_eq!(champion.cr_dmg, 50);
    assert_eq!(champion.aura_stat, "Attack");
    assert_eq!(champion.aura_amt, Some(33.0));
    assert_eq!(champion.aura_area, "Dungeons");
    assert_eq!(champion.aura_affinity, "All");
}

#[test]
fn skill_summaries_carry_books_and_formulas() {
    let report = report();
    assert_eq!(report.skills.len(), 2);
    let first = &report.skills[0];
    assert_eq!(first.skill_index, "A1");
    assert_eq!(first.book_effects, "+10% Damage");
    assert_eq!(first.multipliers, "ATK*3.5, ATK**");
    assert_eq!(first.skill_desc, "Attacks 1 enemy. Places a [Decrease DEF] debuff.");

    let second = &report.skills[1];
    assert_eq!(second.skill_index, "A2");
    assert_eq!(second.skill_cd_unbooked, 4);
    assert_eq!(second.skill_cd_booked, 3);
    assert_eq!(second.book_effects, "+20% Heal, -1 Cooldown");
    // no localized description
    assert_eq!(second.skill_desc, "");
    assert_eq!(second.skill_desc_hidden, "Heals all allies.");
}

#[test]
fn malformed_formula_is_recorded_and_later_effects_still_processed() {
    let report = report();
    assert_eq!(report.formula_failures.len(), 1);
    let failure = &report.formula_failures[0];
    assert_eq!(failure.champion_id, 1006);
    assert_eq!(failure.skill_id, 10001);
    assert_eq!(failure.effect_id, Some(2));
    assert_eq!(failure.formula, "ATK**");
    assert!(failure.substituted.starts_with("(1000**)"));

    let failed_row = report
        .effects
        .iter()
        .find(|row| row.effect_id == Some(2))
        .expect("failed effect keeps its row");
    assert_eq!(failed_row.calculated_damage, None);
    assert_eq!(failed_row.damage_per_turn, None);
    assert_eq!(failed_row.multiplier, "'ATK**");

    // effects after the failure, and the whole next skill, still have rows
    assert!(report.effects.iter().any(|row| row.effect_id == Some(3)));
    assert!(report.effects.iter().any(|row| row.skill_id == 10002));
}

#[test]
fn effect_values_follow_books_and_hits() {
    let report = report();
    let by_effect = |id: i64| {
        report
            .effects
            .iter()
            .find(|row| row.effect_id == Some(id))
            .expect("effect row should exist")
    };

    let strike = by_effect(1);
    assert_eq!(strike.num_hits, 2);
    assert_eq!(strike.book_dmg_mul, 1.1);
    assert_eq!(strike.calculated_damage, Some(7700.0));
    // booked cooldown 0 counts as one turn
    assert_eq!(strike.damage_per_turn, Some(7700.0));

    let heal = by_effect(4);
    assert_eq!(heal.book_heal_mul, 1.2);
    assert_eq!(heal.calculated_damage, Some(3600.0));
    assert_eq!(heal.damage_per_turn, Some(1200.0));
    assert_eq!(heal.target_type, "All allies");

    let random = by_effect(5);
    assert_eq!(random.num_hits, 3);
    assert_eq!(random.calculated_damage, Some(1000.0));
    assert_eq!(random.target_type, "Random enemy (enemies)");
}

#[test]
fn status_effects_expand_to_one_row_each() {
    let report = report();
    assert_eq!(report.effects.len(), 7);

    let debuff: Vec<_> = report
        .effects
        .iter()
        .filter(|row| row.effect_id == Some(3))
        .collect();
    assert_eq!(debuff.len(), 1);
    assert_eq!(debuff[0].status_type.as_deref(), Some("60% Decrease DEF"));
    assert_eq!(debuff[0].status_duration, Some(2));
    assert_eq!(debuff[0].cd_minus_duration, Some(-2));
    assert_eq!(debuff[0].effect_chance_unbooked, 0.75);
    assert_eq!(debuff[0].effect_chance_booked, 0.75);
    assert_eq!(debuff[0].effect_type_desc, "Place debuff");

    let buffs: Vec<_> = report
        .effects
        .iter()
        .filter(|row| row.effect_id == Some(6))
        .collect();
    assert_eq!(buffs.len(), 2);
    assert_eq!(buffs[0].status_type.as_deref(), Some("Shield"));
    assert_eq!(buffs[0].cd_minus_duration, Some(1));
    // unknown status ids keep their row without a name
    assert_eq!(buffs[1].status_type, None);
    assert_eq!(buffs[1].status_duration, Some(1));
}

#[test]
fn unknown_effect_kind_is_fatal() {
    let mut value = fixture_value();
    value["SkillData"]["SkillTypes"][1]["Effects"][0]["KindId"] = Value::from(123_456);
    let err = analyze(value).expect_err("unknown effect kind should fail");
    assert!(matches!(err, AnalysisError::Lookup { .. }));
    let message = err.to_string();
    assert!(message.contains("effect kind"));
    assert!(message.contains("123456"));
}

#[test]
fn omitted_kind_and_target_read_as_zero() {
    let mut value = fixture_value();
    let effect = &mut value["SkillData"]["SkillTypes"][0]["Effects"][2];
    effect
        .as_object_mut()
        .expect("effect should be an object")
        .remove("KindId");
    effect["TargetParams"] = serde_json::json!({});
    let report = analyze(value).expect("omitted zero codes should analyze");

    let row = report
        .effects
        .iter()
        .find(|row| row.effect_id == Some(3))
        .expect("effect 3 should have a row");
    assert_eq!(row.effect_type_code, 0);
    assert_eq!(row.effect_type_desc, "Revive");
    assert_eq!(row.target_type_code, 0);
    assert_eq!(row.target_type, "Single Target");
}

#[test]
fn unknown_target_type_is_fatal() {
    let mut value = fixture_value();
    value["SkillData"]["SkillTypes"][0]["Effects"][0]["TargetParams"]["TargetType"] =
        Value::from(99);
    let err = analyze(value).expect_err("unknown target type should fail");
    assert!(err.to_string().contains("effect target type"));
}

#[test]
fn missing_skill_is_fatal() {
    let mut value = fixture_value();
    value["HeroData"]["HeroTypes"][0]["SkillTypeIds"] = serde_json::json!([10001, 42]);
    let err = analyze(value).expect_err("missing skill should fail");
    assert!(matches!(
        err,
        AnalysisError::MissingSkill {
            champion: 1006,
            skill_id: 42
        }
    ));
}
