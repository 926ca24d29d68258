//! Champion, skill and effect tables.
//!
//! Each playable champion yields a summary row, one row per skill, and one
//! row per skill effect (or per applied status effect). Multiplier formulas
//! are evaluated against the champion's base stats; a formula that does not
//! parse is recorded as a failure and the row is kept without a value.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::analysis::books::BookBonuses;
use crate::analysis::AnalysisError;
use crate::data::model::{fixed_to_f64, HeroType, LeaderSkill, SkillEffect, SkillType, StaticData};
use crate::data::tables::{self, RANDOM_ENEMIES_TARGET};
use crate::formula::{
    resolve, round_to, EffectClass, EffectScaling, FormulaConstants, Resolution, StatValues,
};
use crate::report::CsvTable;

/// Champion status for visible, playable champions.
const STATUS_RELEASED: i64 = 40;

/// Divisors that turn raw base HP/ATK/DEF into displayed values.
/// Estimated from displayed legendary stats; in-game HP rounds to a multiple of 15.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StatDivisors {
    pub hp: f64,
    pub atk_def: f64,
}

impl Default for StatDivisors {
    fn default() -> Self {
        Self {
            hp: 26_002_616.5,
            atk_def: 390_039_247.5,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ChampionSettings {
    pub divisors: StatDivisors,
    pub constants: FormulaConstants,
}

/// One row of `champ_basic_info.csv`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChampionRow {
    pub id: i64,
    pub name: Option<String>,
    pub rarity: String,
    pub affinity: String,
    pub role: String,
    pub faction: String,
    pub hp: i64,
    pub atk: i64,
    pub def: i64,
    pub spd: i64,
    pub cr_rate: i64,
    pub cr_dmg: i64,
    pub res: i64,
    pub acc: i64,
    pub aura_stat: String,
    pub aura_amt: Option<f64>,
    pub aura_area: String,
    pub aura_affinity: String,
    pub champ_status: Option<i64>,
    pub released: String,
    pub hidden_name: String,
}

impl CsvTable for ChampionRow {
    const HEADERS: &'static [&'static str] = &[
        "id", "name", "rarity", "affinity", "role", "faction", "hp", "atk", "def", "spd",
        "cr_rate", "cr_dmg", "res", "acc", "aura_stat", "aura_amt", "aura_area",
        "aura_affinity", "champ_status", "released", "hidden_name",
    ];
}

/// One row of `champ_moves_basic.csv`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SkillSummaryRow {
    pub champ_name: Option<String>,
    pub rarity: String,
    pub affinity: String,
    pub role: String,
    pub faction: String,
    pub hp: i64,
    pub atk: i64,
    pub def: i64,
    pub spd: i64,
    pub cr_rate: i64,
    pub cr_dmg: i64,
    pub res: i64,
    pub acc: i64,
    pub aura_stat: String,
    pub aura_amt: Option<f64>,
    pub aura_area: String,
    pub aura_affinity: String,
    pub skill_index: String,
    pub skill_name: Option<String>,
    pub skill_cd_booked: i64,
    pub skill_cd_unbooked: i64,
    pub skill_desc: String,
    pub book_effects: String,
    #[serde(rename = "multiplier(s)")]
    pub multipliers: String,
    pub skill_name_hidden: String,
    pub skill_desc_hidden: String,
    pub champ_status: Option<i64>,
    pub released: String,
    pub hidden_name: String,
}

impl CsvTable for SkillSummaryRow {
    const HEADERS: &'static [&'static str] = &[
        "champ_name", "rarity", "affinity", "role", "faction", "hp", "atk", "def", "spd",
        "cr_rate", "cr_dmg", "res", "acc", "aura_stat", "aura_amt", "aura_area",
        "aura_affinity", "skill_index", "skill_name", "skill_cd_booked", "skill_cd_unbooked",
        "skill_desc", "book_effects", "multiplier(s)", "skill_name_hidden",
        "skill_desc_hidden", "champ_status", "released", "hidden_name",
    ];
}

/// One row of `champ_move_details.csv`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EffectRow {
    pub id: i64,
    pub name: Option<String>,
    pub rarity: String,
    pub affinity: String,
    pub role: String,
    pub faction: String,
    pub skill_index: String,
    pub skill_name: Option<String>,
    pub skill_cd_booked: i64,
    pub skill_cd_unbooked: i64,
    pub skill_desc: String,
    pub book_effects: String,
    /// Leading apostrophe keeps spreadsheets from reading the formula.
    pub multiplier: String,
    pub num_hits: u32,
    pub book_dmg_mul: f64,
    pub book_heal_mul: f64,
    pub book_shield_mul: f64,
    pub calculated_damage: Option<f64>,
    pub damage_per_turn: Option<f64>,
    pub status_type: Option<String>,
    pub status_duration: Option<i64>,
    pub cd_minus_duration: Option<i64>,
    pub effect_chance_booked: f64,
    pub effect_chance_unbooked: f64,
    pub target_type: String,
    pub target_type_code: i64,
    pub effect_type_desc: String,
    pub effect_type_code: i64,
    pub condition: Option<String>,
    pub effect_id: Option<i64>,
    pub skill_name_hidden: String,
    pub skill_desc_hidden: String,
    pub skill_id: i64,
    pub hp: i64,
    pub atk: i64,
    pub def: i64,
    pub spd: i64,
    pub cr_rate: i64,
    pub cr_dmg: i64,
    pub res: i64,
    pub acc: i64,
    pub aura_stat: String,
    pub aura_amt: Option<f64>,
    pub aura_area: String,
    pub aura_affinity: String,
    pub champ_status: Option<i64>,
    pub released: String,
    pub hidden_name: String,
}

impl CsvTable for EffectRow {
    const HEADERS: &'static [&'static str] = &[
        "id", "name", "rarity", "affinity", "role", "faction", "skill_index", "skill_name",
        "skill_cd_booked", "skill_cd_unbooked", "skill_desc", "book_effects", "multiplier",
        "num_hits", "book_dmg_mul", "book_heal_mul", "book_shield_mul", "calculated_damage",
        "damage_per_turn", "status_type", "status_duration", "cd_minus_duration",
        "effect_chance_booked", "effect_chance_unbooked", "target_type", "target_type_code",
        "effect_type_desc", "effect_type_code", "condition", "effect_id", "skill_name_hidden",
        "skill_desc_hidden", "skill_id", "hp", "atk", "def", "spd", "cr_rate", "cr_dmg", "res",
        "acc", "aura_stat", "aura_amt", "aura_area", "aura_affinity", "champ_status",
        "released", "hidden_name",
    ];
}

/// A formula that could not be evaluated, kept for manual triage.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FormulaFailureRow {
    pub champion_id: i64,
    pub champion: Option<String>,
    pub skill_id: i64,
    pub effect_id: Option<i64>,
    pub formula: String,
    pub substituted: String,
    pub error: String,
}

impl CsvTable for FormulaFailureRow {
    const HEADERS: &'static [&'static str] = &[
        "champion_id", "champion", "skill_id", "effect_id", "formula", "substituted", "error",
    ];
}

#[derive(Debug, Clone, Default)]
pub struct ChampionReport {
    pub champions: Vec<ChampionRow>,
    pub skills: Vec<SkillSummaryRow>,
    pub effects: Vec<EffectRow>,
    pub formula_failures: Vec<FormulaFailureRow>,
}

/// Fully ascended (id ending in 6) or common champions that belong to a faction.
/// Factionless heroes are bosses and NPCs.
pub fn is_reported(hero: &HeroType) -> bool {
    (hero.id % 10 == 6 || hero.rarity == 1) && hero.fraction != 0
}

pub fn analyze_champions(
    data: &StaticData,
    settings: &ChampionSettings,
) -> Result<ChampionReport, AnalysisError> {
    let skills_by_id: HashMap<i64, &SkillType> = data
        .skill_data
        .skill_types
        .iter()
        .map(|skill| (skill.id, skill))
        .collect();

    let mut report = ChampionReport::default();
    for hero in data.hero_data.hero_types.iter().filter(|hero| is_reported(hero)) {
        let champion = ChampionRow::build(hero, data, settings)?;
        tracing::debug!(champion = hero.id, name = ?champion.name, "analyzing champion");
        let stats = formula_stats(hero, settings)?;

        for (position, skill_id) in hero.skill_type_ids.iter().enumerate() {
            let skill = skills_by_id
                .get(skill_id)
                .copied()
                .ok_or(AnalysisError::MissingSkill {
                    champion: hero.id,
                    skill_id: *skill_id,
                })?;
            let context = SkillContext::build(&champion, skill, position + 1, data);
            analyze_skill(&champion, &context, skill, stats, settings, &mut report)?;
            report.skills.push(context.summary_row(&champion));
        }

        report.champions.push(champion);
    }
    Ok(report)
}

fn formula_stats(hero: &HeroType, settings: &ChampionSettings) -> Result<StatValues, AnalysisError> {
    let base = hero
        .base_stats
        .as_ref()
        .ok_or(AnalysisError::MissingBaseStats(hero.id))?;
    Ok(StatValues {
        hp: base.health / settings.divisors.hp,
        atk: base.attack / settings.divisors.atk_def,
        def: base.defence / settings.divisors.atk_def,
    })
}

fn round_int(value: f64) -> i64 {
    value.round_ties_even() as i64
}

struct Aura {
    stat: &'static str,
    amount: f64,
    area: &'static str,
    affinity: &'static str,
}

impl Aura {
    fn from_leader_skill(leader: &LeaderSkill) -> Result<Self, tables::LookupError> {
        let mut amount = fixed_to_f64(leader.amount);
        // relative auras are stored as fractions
        if leader.is_absolute == Some(0) {
            amount *= 100.0;
        }
        let affinity = match leader.element {
            Some(element) if element != 0 => tables::affinity(element)?,
            _ => "All",
        };
        let area = match leader.area {
            Some(area) if area != 0 => tables::aura_area(area)?,
            _ => "All Battles",
        };
        Ok(Self {
            stat: tables::aura_stat(leader.stat_kind_id)?,
            amount,
            area,
            affinity,
        })
    }
}

impl ChampionRow {
    fn build(
        hero: &HeroType,
        data: &StaticData,
        settings: &ChampionSettings,
    ) -> Result<Self, AnalysisError> {
        let context = format!("champion {}", hero.id);
        let base = hero
            .base_stats
            .as_ref()
            .ok_or(AnalysisError::MissingBaseStats(hero.id))?;
        let aura = hero
            .leader_skill
            .as_ref()
            .map(Aura::from_leader_skill)
            .transpose()
            .map_err(AnalysisError::lookup(context.clone()))?;

        let hp = base.health / settings.divisors.hp;
        let status = hero.status;
        Ok(Self {
            id: hero.id,
            name: data.localized(&hero.name.key).map(str::to_string),
            rarity: tables::rarity(hero.rarity)
                .map_err(AnalysisError::lookup(context.clone()))?
                .to_string(),
            affinity: tables::affinity(hero.element)
                .map_err(AnalysisError::lookup(context.clone()))?
                .to_string(),
            role: tables::role(hero.role)
                .map_err(AnalysisError::lookup(context.clone()))?
                .to_string(),
            faction: tables::faction(hero.fraction)
                .map_err(AnalysisError::lookup(context))?
                .to_string(),
            hp: round_int(hp / 15.0) * 15,
            atk: round_int(base.attack / settings.divisors.atk_def),
            def: round_int(base.defence / settings.divisors.atk_def),
            spd: round_int(fixed_to_f64(base.speed)),
            cr_rate: round_int(fixed_to_f64(base.critical_chance)),
            cr_dmg: round_int(fixed_to_f64(base.critical_damage)),
            res: round_int(fixed_to_f64(base.resistance)),
            acc: round_int(fixed_to_f64(base.accuracy)),
            aura_stat: aura.as_ref().map_or("", |a| a.stat).to_string(),
            aura_amt: aura.as_ref().map(|a| round_to(a.amount, 2)),
            aura_area: aura.as_ref().map_or("", |a| a.area).to_string(),
            aura_affinity: aura.as_ref().map_or("", |a| a.affinity).to_string(),
            champ_status: status,
            released: if status == Some(STATUS_RELEASED) { "Y" } else { "N" }.to_string(),
            hidden_name: hero.name.default_value.clone(),
        })
    }
}

/// Per-skill values shared by every effect row of that skill.
struct SkillContext {
    index: String,
    name: Option<String>,
    name_hidden: String,
    description: String,
    description_hidden: String,
    cooldown: i64,
    booked_cooldown: i64,
    books: BookBonuses,
    formulas: Vec<String>,
}

impl SkillContext {
    fn build(champion: &ChampionRow, skill: &SkillType, position: usize, data: &StaticData) -> Self {
        let description = match data.localized(&skill.description.key) {
            Some(text) => strip_color_tags(&flatten_newlines(text)),
            None => {
                tracing::warn!(
                    champion = champion.id,
                    skill_id = skill.id,
                    key = %skill.description.key,
                    "missing localized skill description"
                );
                String::new()
            }
        };
        let books = BookBonuses::from_levels(skill.id, &skill.skill_level_bonuses);
        Self {
            index: format!("A{position}"),
            name: data.localized(&skill.name.key).map(str::to_string),
            name_hidden: skill.name.default_value.clone(),
            description,
            description_hidden: flatten_newlines(&skill.description.default_value),
            cooldown: skill.cooldown,
            booked_cooldown: books.booked_cooldown(skill.cooldown),
            formulas: skill
                .effects
                .iter()
                .filter_map(SkillEffect::formula)
                .map(str::to_string)
                .collect(),
            books,
        }
    }

    fn summary_row(&self, champion: &ChampionRow) -> SkillSummaryRow {
        SkillSummaryRow {
            champ_name: champion.name.clone(),
            rarity: champion.rarity.clone(),
            affinity: champion.affinity.clone(),
            role: champion.role.clone(),
            faction: champion.faction.clone(),
            hp: champion.hp,
            atk: champion.atk,
            def: champion.def,
            spd: champion.spd,
            cr_rate: champion.cr_rate,
            cr_dmg: champion.cr_dmg,
            res: champion.res,
            acc: champion.acc,
            aura_stat: champion.aura_stat.clone(),
            aura_amt: champion.aura_amt,
            aura_area: champion.aura_area.clone(),
            aura_affinity: champion.aura_affinity.clone(),
            skill_index: self.index.clone(),
            skill_name: self.name.clone(),
            skill_cd_booked: self.booked_cooldown,
            skill_cd_unbooked: self.cooldown,
            skill_desc: self.description.clone(),
            book_effects: self.books.summary(),
            multipliers: self.formulas.join(", "),
            skill_name_hidden: self.name_hidden.clone(),
            skill_desc_hidden: self.description_hidden.clone(),
            champ_status: champion.champ_status,
            released: champion.released.clone(),
            hidden_name: champion.hidden_name.clone(),
        }
    }
}

fn analyze_skill(
    champion: &ChampionRow,
    context: &SkillContext,
    skill: &SkillType,
    stats: StatValues,
    settings: &ChampionSettings,
    report: &mut ChampionReport,
) -> Result<(), AnalysisError> {
    for effect in &skill.effects {
        let lookup_context = format!("champion {} skill {}", champion.id, skill.id);
        let target_code = effect.target_params.target_type;
        let target_type = tables::target_type(target_code)
            .map_err(AnalysisError::lookup(lookup_context.clone()))?;
        let effect_kind = tables::effect_kind(effect.kind_id)
            .map_err(AnalysisError::lookup(lookup_context))?;

        let (chance_unbooked, chance_booked) = match effect.chance {
            Some(chance) if chance != 0.0 => {
                let base = fixed_to_f64(chance);
                (round_to(base, 2), round_to(base + context.books.effect_chance, 2))
            }
            _ => (1.0, 1.0),
        };

        let resolution = match effect.formula() {
            Some(formula) => {
                evaluate_effect(champion, skill, effect, formula, stats, context, settings, report)
            }
            None => None,
        };

        let row = EffectRow {
            id: champion.id,
            name: champion.name.clone(),
            rarity: champion.rarity.clone(),
            affinity: champion.affinity.clone(),
            role: champion.role.clone(),
            faction: champion.faction.clone(),
            skill_index: context.index.clone(),
            skill_name: context.name.clone(),
            skill_cd_booked: context.booked_cooldown,
            skill_cd_unbooked: context.cooldown,
            skill_desc: context.description.clone(),
            book_effects: context.books.summary(),
            multiplier: format!("'{}", effect.multiplier_formula.as_deref().unwrap_or("")),
            num_hits: effect.hit_count(),
            book_dmg_mul: round_to(context.books.damage, 2),
            book_heal_mul: round_to(context.books.heal, 2),
            book_shield_mul: round_to(context.books.shield, 2),
            calculated_damage: resolution.as_ref().map(Resolution::display_value),
            damage_per_turn: resolution
                .as_ref()
                .map(|res| res.per_turn(context.booked_cooldown)),
            status_type: None,
            status_duration: None,
            cd_minus_duration: None,
            effect_chance_booked: chance_booked,
            effect_chance_unbooked: chance_unbooked,
            target_type: target_type.to_string(),
            target_type_code: target_code,
            effect_type_desc: effect_kind.to_string(),
            effect_type_code: effect.kind_id,
            condition: effect.condition.clone(),
            effect_id: effect.id,
            skill_name_hidden: context.name_hidden.clone(),
            skill_desc_hidden: context.description_hidden.clone(),
            skill_id: skill.id,
            hp: champion.hp,
            atk: champion.atk,
            def: champion.def,
            spd: champion.spd,
            cr_rate: champion.cr_rate,
            cr_dmg: champion.cr_dmg,
            res: champion.res,
            acc: champion.acc,
            aura_stat: champion.aura_stat.clone(),
            aura_amt: champion.aura_amt,
            aura_area: champion.aura_area.clone(),
            aura_affinity: champion.aura_affinity.clone(),
            champ_status: champion.champ_status,
            released: champion.released.clone(),
            hidden_name: champion.hidden_name.clone(),
        };

        let statuses = effect
            .apply_status_effect_params
            .as_ref()
            .map(|params| params.status_effect_infos.as_slice())
            .unwrap_or_default();
        if statuses.is_empty() {
            report.effects.push(row);
            continue;
        }
        for status in statuses {
            let status_type = tables::status_type(status.type_id);
            if status_type.is_none() {
                tracing::warn!(
                    skill_id = skill.id,
                    status_type = status.type_id,
                    "unknown status effect type"
                );
            }
            report.effects.push(EffectRow {
                status_type: status_type.map(str::to_string),
                status_duration: Some(status.duration),
                cd_minus_duration: Some(context.booked_cooldown - status.duration),
                ..row.clone()
            });
        }
    }
    Ok(())
}

#[allow(clippy::too_many_arguments)]
fn evaluate_effect(
    champion: &ChampionRow,
    skill: &SkillType,
    effect: &SkillEffect,
    formula: &str,
    stats: StatValues,
    context: &SkillContext,
    settings: &ChampionSettings,
    report: &mut ChampionReport,
) -> Option<Resolution> {
    let class = EffectClass::from_kind(effect.kind_id);
    let exclusive_random = effect.target_params.target_type == RANDOM_ENEMIES_TARGET
        && effect.target_params.exclusive == Some(1);
    let scaling = EffectScaling::new(class)
        .with_hits(effect.hit_count())
        .with_multiplier(context.books.multiplier_for(class))
        .exclusive_random(exclusive_random);

    match resolve(formula, stats, settings.constants, scaling) {
        Ok(resolution) => Some(resolution),
        Err(failure) => {
            tracing::warn!(
                champion = champion.id,
                skill_id = skill.id,
                effect_id = ?effect.id,
                "{failure}"
            );
            report.formula_failures.push(FormulaFailureRow {
                champion_id: champion.id,
                champion: champion.name.clone(),
                skill_id: skill.id,
                effect_id: effect.id,
                formula: failure.raw.clone(),
                substituted: failure.expression.clone(),
                error: failure.source.to_string(),
            });
            None
        }
    }
}

/// Replace escaped and literal line breaks with spaces.
pub fn flatten_newlines(text: &str) -> String {
    text.replace("\\r", " ")
        .replace("\\n", " ")
        .replace('\r', " ")
        .replace('\n', " ")
}

/// Remove `<color=...>` and `</color>` markup from localized text.
pub fn strip_color_tags(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut rest = text;
    while let Some(start) = rest.find('<') {
        out.push_str(&rest[..start]);
        let tail = &rest[start..];
        let is_color_tag = tail.starts_with("<color=") || tail.starts_with("</color>");
        match tail.find('>') {
            Some(end) if is_color_tag => rest = &tail[end + 1..],
            _ => {
                out.push('<');
                rest = &tail[1..];
            }
        }
    }
    out.push_str(rest);
    out
}
