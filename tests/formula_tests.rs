use raidstat::formula::{
    resolve, EffectClass, EffectScaling, FormulaConstants, FormulaError, StatValues, MAX_DEPTH,
};

fn stats(hp: f64, atk: f64, def: f64) -> StatValues {
    StatValues { hp, atk, def }
}

fn damage(hits: u32, multiplier: f64) -> EffectScaling {
    EffectScaling::new(EffectClass::Damage)
        .with_hits(hits)
        .with_multiplier(multiplier)
}

#[test]
fn attack_formula_matches_plain_replacement() {
    let res = resolve(
        "ATK*1.5",
        stats(0.0, 1000.0, 0.0),
        FormulaConstants::default(),
        damage(1, 1.0),
    )
    .expect("formula should evaluate");
    assert_eq!(res.value, 1500.0);
    assert_eq!(res.display_value(), 1500.0);
}

#[test]
fn longer_identifiers_are_left_alone() {
    let failure = resolve(
        "ATTACK*2",
        stats(0.0, 1000.0, 0.0),
        FormulaConstants::default(),
        damage(1, 1.0),
    )
    .expect_err("ATTACK is not a stat symbol");
    assert_eq!(
        failure.source,
        FormulaError::UnresolvedIdentifier("ATTACK".to_string())
    );
    assert!(failure.expression.contains("ATTACK"));
}

#[test]
fn heal_scales_by_hits_and_book_multiplier() {
    let scaling = EffectScaling::new(EffectClass::Heal)
        .with_hits(3)
        .with_multiplier(1.2);
    let res = resolve(
        "HP*0.05",
        stats(20_000.0, 0.0, 0.0),
        FormulaConstants::default(),
        scaling,
    )
    .expect("formula should evaluate");
    assert_eq!(res.display_value(), 3600.0);
}

#[test]
fn damage_kind_with_three_hits() {
    let res = resolve(
        "HP*0.05",
        stats(20_000.0, 0.0, 0.0),
        FormulaConstants::default(),
        damage(3, 1.2),
    )
    .expect("formula should evaluate");
    assert_eq!(res.display_value(), 3600.0);
}

#[test]
fn exclusive_random_damage_ignores_hit_count() {
    let base = resolve(
        "ATK*2",
        stats(0.0, 1000.0, 0.0),
        FormulaConstants::default(),
        damage(1, 1.0),
    )
    .expect("formula should evaluate")
    .value;
    for hits in [1, 2, 4] {
        let plain = resolve(
            "ATK*2",
            stats(0.0, 1000.0, 0.0),
            FormulaConstants::default(),
            damage(hits, 1.1),
        )
        .expect("formula should evaluate");
        let exclusive = resolve(
            "ATK*2",
            stats(0.0, 1000.0, 0.0),
            FormulaConstants::default(),
            damage(hits, 1.1).exclusive_random(true),
        )
        .expect("formula should evaluate");
        assert!((plain.value - f64::from(hits) * 1.1 * base).abs() < 1e-9);
        assert!((exclusive.value - 1.1 * base).abs() < 1e-9);
    }
}

#[test]
fn resolving_twice_gives_identical_results() {
    let args = (
        stats(15_345.0, 1_234.5, 987.0),
        FormulaConstants::default(),
        damage(2, 1.3),
    );
    let first = resolve("(ATK*3+DEF)*HERO_LEVEL/60", args.0, args.1, args.2);
    let second = resolve("(ATK*3+DEF)*HERO_LEVEL/60", args.0, args.1, args.2);
    assert_eq!(first, second);
}

#[test]
fn malformed_formula_reports_raw_and_substituted_text() {
    let failure = resolve(
        "ATK**",
        stats(0.0, 1000.0, 0.0),
        FormulaConstants::default(),
        damage(1, 1.0),
    )
    .expect_err("ATK** should not evaluate");
    assert_eq!(failure.raw, "ATK**");
    assert_eq!(failure.expression, "(1000**)*1*1");
    assert!(matches!(failure.source, FormulaError::UnexpectedToken { .. }));
    assert!(failure.to_string().contains("ATK**"));
}

#[test]
fn configured_constants_are_substituted() {
    let constants = FormulaConstants {
        max_stamina: 50.0,
        hero_level: 40.0,
    };
    let res = resolve(
        "MAX_STAMINA+HERO_LEVEL",
        StatValues::default(),
        constants,
        EffectScaling::new(EffectClass::Other),
    )
    .expect("formula should evaluate");
    assert_eq!(res.expression, "(50+40)*1");
    assert_eq!(res.value, 90.0);
}

#[test]
fn deeply_nested_formula_fails_without_crashing() {
    let raw = format!("{}ATK{}", "(".repeat(3_000), ")".repeat(3_000));
    let failure = resolve(
        &raw,
        stats(0.0, 1000.0, 0.0),
        FormulaConstants::default(),
        damage(1, 1.0),
    )
    .expect_err("nesting past the cap should fail");
    assert_eq!(failure.source, FormulaError::TooDeep(MAX_DEPTH));
}
