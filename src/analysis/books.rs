//! Skill-level ("book") bonuses accumulated over a skill's upgrade levels.

use crate::data::model::{fixed_to_f64, SkillLevelBonus};
use crate::formula::{round_to, EffectClass};

const BONUS_DAMAGE: i64 = 0;
const BONUS_HEAL: i64 = 1;
const BONUS_EFFECT_CHANCE: i64 = 2;
const BONUS_COOLDOWN: i64 = 3;
const BONUS_SHIELD: i64 = 4;

#[derive(Debug, Clone, PartialEq)]
pub struct BookBonuses {
    pub damage: f64,
    pub heal: f64,
    pub shield: f64,
    /// Added to each effect's base chance.
    pub effect_chance: f64,
    pub cooldown_reduction: f64,
    pub descriptions: Vec<String>,
}

impl Default for BookBonuses {
    fn default() -> Self {
        Self {
            damage: 1.0,
            heal: 1.0,
            shield: 1.0,
            effect_chance: 0.0,
            cooldown_reduction: 0.0,
            descriptions: Vec::new(),
        }
    }
}

impl BookBonuses {
    pub fn from_levels(skill_id: i64, levels: &[SkillLevelBonus]) -> Self {
        let mut books = Self::default();
        for level in levels {
            let value = fixed_to_f64(level.value);
            match level.skill_bonus_type {
                Some(BONUS_DAMAGE) => {
                    books.damage += value;
                    books.descriptions.push(format!("+{}% Damage", percent(value)));
                }
                Some(BONUS_HEAL) => {
                    books.heal += value;
                    books.descriptions.push(format!("+{}% Heal", percent(value)));
                }
                Some(BONUS_EFFECT_CHANCE) => {
                    books.effect_chance += value;
                    books
                        .descriptions
                        .push(format!("+{}% Buff/Debuff Chance", percent(value)));
                }
                Some(BONUS_COOLDOWN) => {
                    books.cooldown_reduction += value;
                    books
                        .descriptions
                        .push(format!("-{} Cooldown", value.round_ties_even() as i64));
                }
                Some(BONUS_SHIELD) => {
                    books.shield += value;
                    books.descriptions.push(format!("+{}% Shield", percent(value)));
                }
                Some(other) => {
                    tracing::warn!(skill_id, bonus_type = other, "non standard book effect");
                }
                None => {}
            }
        }
        books
    }

    pub fn booked_cooldown(&self, base_cooldown: i64) -> i64 {
        base_cooldown - self.cooldown_reduction.round_ties_even() as i64
    }

    /// Book multiplier for an effect class, rounded to two places.
    pub fn multiplier_for(&self, class: EffectClass) -> f64 {
        match class {
            EffectClass::Damage => round_to(self.damage, 2),
            EffectClass::Heal => round_to(self.heal, 2),
            EffectClass::Shield => round_to(self.shield, 2),
            EffectClass::Other => 1.0,
        }
    }

    pub fn summary(&self) -> String {
        self.descriptions.join(", ")
    }
}

fn percent(fraction: f64) -> i64 {
    (fraction * 100.0).round_ties_even() as i64
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::FIXED_POINT_ONE;

    fn level(kind: i64, fraction: f64) -> SkillLevelBonus {
        SkillLevelBonus {
            skill_bonus_type: Some(kind),
            value: fraction * FIXED_POINT_ONE,
        }
    }

    #[test]
    fn accumulates_each_bonus_type() {
        let books = BookBonuses::from_levels(
            1,
            &[
                level(0, 0.05),
                level(0, 0.10),
                level(2, 0.15),
                level(3, 1.0),
                level(1, 0.1),
                level(4, 0.2),
            ],
        );
        assert!((books.damage - 1.15).abs() < 1e-12);
        assert!((books.heal - 1.1).abs() < 1e-12);
        assert!((books.shield - 1.2).abs() < 1e-12);
        assert!((books.effect_chance - 0.15).abs() < 1e-12);
        assert_eq!(books.booked_cooldown(4), 3);
        assert_eq!(
            books.summary(),
            "+5% Damage, +10% Damage, +15% Buff/Debuff Chance, -1 Cooldown, +10% Heal, +20% Shield"
        );
    }

    #[test]
    fn unknown_and_missing_types_are_ignored() {
        let books = BookBonuses::from_levels(
            1,
            &[
                level(9, 0.5),
                SkillLevelBonus {
                    skill_bonus_type: None,
                    value: FIXED_POINT_ONE,
                },
            ],
        );
        assert_eq!(books, BookBonuses::default());
    }

    #[test]
    fn other_class_has_no_book_multiplier() {
        let books = BookBonuses::from_levels(1, &[level(0, 0.3)]);
        assert_eq!(books.multiplier_for(EffectClass::Damage), 1.3);
        assert_eq!(books.multiplier_for(EffectClass::Other), 1.0);
    }
}
