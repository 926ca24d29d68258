//! Skill-effect multiplier formulas.
//!
//! A formula such as `"ATK*1.5"` is tokenized, its stat symbols are replaced
//! by the owning champion's stats, the result is scaled by hit count and book
//! multiplier according to the effect class, and the final expression is
//! evaluated with a restricted arithmetic parser.

mod eval;
mod lexer;

use serde::{Deserialize, Serialize};
use thiserror::Error;

pub use eval::{evaluate, MAX_DEPTH};
pub use lexer::{render, tokenize, Token};

/// Effect kinds whose formulas are damage (6000) or bomb/debuff damage (5000).
pub const DAMAGE_KINDS: [i64; 2] = [5000, 6000];
/// Revive (0) and heal (1000).
pub const HEAL_KINDS: [i64; 2] = [0, 1000];
/// Place buff (4000); shield values come through here.
pub const SHIELD_KINDS: [i64; 1] = [4000];

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FormulaError {
    #[error("empty formula")]
    Empty,
    #[error("unexpected character '{ch}' at offset {position}")]
    UnexpectedCharacter { ch: char, position: usize },
    #[error("invalid numeric literal '{0}'")]
    InvalidNumber(String),
    #[error("unexpected token '{token}' at token {position}")]
    UnexpectedToken { token: String, position: usize },
    #[error("unexpected end of formula")]
    UnexpectedEnd,
    #[error("unbalanced parenthesis")]
    UnbalancedParenthesis,
    #[error("unresolved identifier '{0}'")]
    UnresolvedIdentifier(String),
    #[error("division by zero")]
    DivisionByZero,
    #[error("nesting deeper than {0} levels")]
    TooDeep(usize),
}

/// Values substituted for the fixed constant symbols.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FormulaConstants {
    pub max_stamina: f64,
    pub hero_level: f64,
}

impl Default for FormulaConstants {
    fn default() -> Self {
        Self {
            max_stamina: 100.0,
            hero_level: 60.0,
        }
    }
}

/// Resolved base stats of the champion that owns the formula.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct StatValues {
    pub hp: f64,
    pub atk: f64,
    pub def: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EffectClass {
    Damage,
    Heal,
    Shield,
    Other,
}

impl EffectClass {
    pub fn from_kind(kind: i64) -> Self {
        if DAMAGE_KINDS.contains(&kind) {
            EffectClass::Damage
        } else if HEAL_KINDS.contains(&kind) {
            EffectClass::Heal
        } else if SHIELD_KINDS.contains(&kind) {
            EffectClass::Shield
        } else {
            EffectClass::Other
        }
    }
}

/// How the substituted base expression is scaled before evaluation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EffectScaling {
    pub class: EffectClass,
    pub hit_count: u32,
    /// Class multiplier (book damage/heal/shield). Ignored for `Other`.
    pub multiplier: f64,
    /// Random-enemy targeting where each enemy can be hit at most once.
    pub exclusive_random: bool,
}

impl EffectScaling {
    pub fn new(class: EffectClass) -> Self {
        Self {
            class,
            hit_count: 1,
            multiplier: 1.0,
            exclusive_random: false,
        }
    }

    pub fn with_hits(mut self, hit_count: u32) -> Self {
        self.hit_count = hit_count;
        self
    }

    pub fn with_multiplier(mut self, multiplier: f64) -> Self {
        self.multiplier = multiplier;
        self
    }

    pub fn exclusive_random(mut self, exclusive: bool) -> Self {
        self.exclusive_random = exclusive;
        self
    }

    /// Factors appended to the parenthesized base expression, in order.
    pub fn factors(&self) -> Vec<f64> {
        let count = f64::from(self.hit_count);
        match self.class {
            // each random target is hit once, so the formula is already the whole hit
            EffectClass::Damage if self.exclusive_random => vec![self.multiplier],
            EffectClass::Damage | EffectClass::Heal | EffectClass::Shield => {
                vec![count, self.multiplier]
            }
            EffectClass::Other => vec![count],
        }
    }

    /// Wrap `tokens` in parentheses and append the scaling factors.
    pub fn apply(&self, tokens: Vec<Token>) -> Vec<Token> {
        let mut scaled = Vec::with_capacity(tokens.len() + 6);
        scaled.push(Token::LParen);
        scaled.extend(tokens);
        scaled.push(Token::RParen);
        for factor in self.factors() {
            scaled.push(Token::Star);
            scaled.push(Token::Number(factor));
        }
        scaled
    }
}

/// Replace constant and stat symbols. Stats are rounded to whole numbers first.
/// Only complete identifier tokens are replaced.
pub fn substitute(tokens: Vec<Token>, stats: StatValues, constants: FormulaConstants) -> Vec<Token> {
    tokens
        .into_iter()
        .map(|token| match token {
            Token::Ident(ref name) => match name.as_str() {
                "MAX_STAMINA" => Token::Number(constants.max_stamina),
                "HERO_LEVEL" => Token::Number(constants.hero_level),
                "HP" => Token::Number(stats.hp.round_ties_even()),
                "ATK" => Token::Number(stats.atk.round_ties_even()),
                "DEF" => Token::Number(stats.def.round_ties_even()),
                _ => token,
            },
            other => other,
        })
        .collect()
}

/// Successfully evaluated formula.
#[derive(Debug, Clone, PartialEq)]
pub struct Resolution {
    /// Fully substituted and scaled expression that was evaluated.
    pub expression: String,
    pub value: f64,
}

impl Resolution {
    /// Value rounded to two places for display.
    pub fn display_value(&self) -> f64 {
        round_to(self.value, 2)
    }

    /// Value per turn of (booked) cooldown; a cooldown below one counts as one.
    pub fn per_turn(&self, cooldown: i64) -> f64 {
        round_to(self.value / cooldown.max(1) as f64, 2)
    }
}

/// A formula that could not be interpreted. Never fatal to a report run.
#[derive(Debug, Clone, PartialEq, Error)]
#[error("could not parse multiplier formula '{raw}' (substituted: '{expression}'): {source}")]
pub struct FormulaFailure {
    pub raw: String,
    pub expression: String,
    pub source: FormulaError,
}

/// Evaluate `raw` for one effect.
pub fn resolve(
    raw: &str,
    stats: StatValues,
    constants: FormulaConstants,
    scaling: EffectScaling,
) -> Result<Resolution, FormulaFailure> {
    resolve_with(raw, stats, constants, Some(scaling))
}

/// Substitute and evaluate `raw` as written, without hit or book scaling.
pub fn resolve_unscaled(
    raw: &str,
    stats: StatValues,
    constants: FormulaConstants,
) -> Result<Resolution, FormulaFailure> {
    resolve_with(raw, stats, constants, None)
}

fn resolve_with(
    raw: &str,
    stats: StatValues,
    constants: FormulaConstants,
    scaling: Option<EffectScaling>,
) -> Result<Resolution, FormulaFailure> {
    let fail = |expression: String, source: FormulaError| FormulaFailure {
        raw: raw.to_string(),
        expression,
        source,
    };

    let tokens = tokenize(raw).map_err(|err| fail(raw.to_string(), err))?;
    if tokens.is_empty() {
        return Err(fail(String::new(), FormulaError::Empty));
    }
    let substituted = substitute(tokens, stats, constants);
    let scaled = match scaling {
        Some(scaling) => scaling.apply(substituted),
        None => substituted,
    };
    let expression = render(&scaled);
    match evaluate(&scaled) {
        Ok(value) => Ok(Resolution { expression, value }),
        Err(err) => Err(fail(expression, err)),
    }
}

/// Round half away from zero to `places` decimal places.
pub fn round_to(value: f64, places: i32) -> f64 {
    let scale = 10f64.powi(places);
    (value * scale).round() / scale
}
