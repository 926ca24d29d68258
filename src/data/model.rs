//! Typed view of the static-data document. Only the fields the reports read
//! are modelled; everything else in the dump is ignored.

use std::collections::HashMap;

use serde::Deserialize;
use serde_json::{Map, Value};

/// Divisor for fixed-point fractions (2^32).
pub const FIXED_POINT_ONE: f64 = 4_294_967_296.0;

pub fn fixed_to_f64(raw: f64) -> f64 {
    raw / FIXED_POINT_ONE
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct StaticData {
    pub stage_data: StageData,
    pub hero_data: HeroData,
    pub skill_data: SkillData,
    #[serde(default)]
    pub static_data_localization: HashMap<String, String>,
}

impl StaticData {
    pub fn localized(&self, key: &str) -> Option<&str> {
        self.static_data_localization.get(key).map(String::as_str)
    }
}

/// Stages are kept raw: non-campaign stages have a different shape and are
/// only typed once they are known to be campaign stages.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct StageData {
    pub stages: Vec<Value>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct CampaignStage {
    pub id: i64,
    pub start_condition: StartCondition,
    #[serde(default)]
    pub rewards: Vec<FixedReward>,
    #[serde(default)]
    pub reward_hero_xp: Option<f64>,
    pub reward: StageReward,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct StartCondition {
    pub price: Price,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Price {
    #[serde(default)]
    pub raw_values: HashMap<String, f64>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct FixedReward {
    #[serde(rename = "Type")]
    pub kind: i64,
    #[serde(default)]
    pub min_count: f64,
    #[serde(default)]
    pub max_count: f64,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct StageReward {
    #[serde(default)]
    pub rewards: Vec<RandomReward>,
    #[serde(default)]
    pub artifact_probs_by_rank_id: HashMap<String, f64>,
    #[serde(default)]
    pub artifact_probs_by_rarity_id: HashMap<String, f64>,
    /// Document order matters: the first key is the stage's artifact kind.
    #[serde(default)]
    pub artifact_probs_by_kind_id: Map<String, Value>,
    #[serde(default)]
    pub artifact_probs_by_set_kind_id: Map<String, Value>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct RandomReward {
    #[serde(rename = "Type")]
    pub kind: i64,
    #[serde(default)]
    pub probability: f64,
    #[serde(default)]
    pub min_count: f64,
    #[serde(default)]
    pub max_count: f64,
    #[serde(default)]
    pub hero_grade: Option<i64>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct HeroData {
    pub hero_types: Vec<HeroType>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct LocalizedText {
    #[serde(default)]
    pub key: String,
    #[serde(default)]
    pub default_value: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct HeroType {
    pub id: i64,
    #[serde(default)]
    pub name: LocalizedText,
    #[serde(default)]
    pub rarity: i64,
    #[serde(default)]
    pub element: i64,
    #[serde(default)]
    pub role: i64,
    #[serde(default)]
    pub fraction: i64,
    #[serde(default)]
    pub status: Option<i64>,
    #[serde(default)]
    pub leader_skill: Option<LeaderSkill>,
    #[serde(default)]
    pub base_stats: Option<BaseStats>,
    #[serde(default)]
    pub skill_type_ids: Vec<i64>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LeaderSkill {
    #[serde(rename = "StatKindId")]
    pub stat_kind_id: i64,
    #[serde(rename = "Amount", default)]
    pub amount: f64,
    #[serde(rename = "isAbsolute", default)]
    pub is_absolute: Option<i64>,
    #[serde(rename = "Element", default)]
    pub element: Option<i64>,
    #[serde(rename = "Area", default)]
    pub area: Option<i64>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct BaseStats {
    #[serde(default)]
    pub health: f64,
    #[serde(default)]
    pub attack: f64,
    #[serde(default)]
    pub defence: f64,
    #[serde(default)]
    pub speed: f64,
    #[serde(default)]
    pub resistance: f64,
    #[serde(default)]
    pub accuracy: f64,
    #[serde(default)]
    pub critical_chance: f64,
    #[serde(default)]
    pub critical_damage: f64,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct SkillData {
    pub skill_types: Vec<SkillType>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct SkillType {
    pub id: i64,
    #[serde(default)]
    pub name: LocalizedText,
    #[serde(default)]
    pub description: LocalizedText,
    #[serde(default)]
    pub cooldown: i64,
    #[serde(default)]
    pub skill_level_bonuses: Vec<SkillLevelBonus>,
    #[serde(default)]
    pub effects: Vec<SkillEffect>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct SkillLevelBonus {
    #[serde(default)]
    pub skill_bonus_type: Option<i64>,
    #[serde(default)]
    pub value: f64,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct SkillEffect {
    #[serde(default)]
    pub id: Option<i64>,
    /// Zero-valued fields are omitted from the dump; an absent kind is 0 (revive).
    #[serde(default)]
    pub kind_id: i64,
    #[serde(default)]
    pub count: Option<u32>,
    #[serde(default)]
    pub multiplier_formula: Option<String>,
    #[serde(default)]
    pub chance: Option<f64>,
    #[serde(default)]
    pub condition: Option<String>,
    #[serde(default)]
    pub target_params: TargetParams,
    #[serde(default)]
    pub apply_status_effect_params: Option<ApplyStatusEffectParams>,
}

impl SkillEffect {
    pub fn hit_count(&self) -> u32 {
        self.count.unwrap_or(1)
    }

    /// Non-empty formula, if the effect carries one.
    pub fn formula(&self) -> Option<&str> {
        self.multiplier_formula
            .as_deref()
            .filter(|formula| !formula.is_empty())
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct TargetParams {
    #[serde(default)]
    pub target_type: i64,
    #[serde(default)]
    pub exclusive: Option<i64>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct ApplyStatusEffectParams {
    #[serde(default)]
    pub status_effect_infos: Vec<StatusEffectInfo>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct StatusEffectInfo {
    pub type_id: i64,
    #[serde(default)]
    pub duration: i64,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn effect_defaults() {
        let effect: SkillEffect = serde_json::from_value(json!({
            "KindId": 6000,
            "TargetParams": { "TargetType": 0 }
        }))
        .unwrap();
        assert_eq!(effect.hit_count(), 1);
        assert_eq!(effect.formula(), None);
        assert!(effect.apply_status_effect_params.is_none());
    }

    #[test]
    fn omitted_zero_codes_default_to_zero() {
        let effect: SkillEffect = serde_json::from_value(json!({
            "Id": 11,
            "TargetParams": {}
        }))
        .unwrap();
        assert_eq!(effect.kind_id, 0);
        assert_eq!(effect.target_params.target_type, 0);

        let effect: SkillEffect = serde_json::from_value(json!({ "KindId": 1000 })).unwrap();
        assert_eq!(effect.target_params.target_type, 0);
        assert_eq!(effect.target_params.exclusive, None);
    }

    #[test]
    fn empty_formula_is_treated_as_absent() {
        let effect: SkillEffect = serde_json::from_value(json!({
            "KindId": 4001,
            "MultiplierFormula": "",
            "TargetParams": { "TargetType": 1 }
        }))
        .unwrap();
        assert_eq!(effect.formula(), None);
    }

    #[test]
    fn kind_map_keeps_document_order() {
        let reward: StageReward = serde_json::from_value(json!({
            "ArtifactProbsByKindId": { "5": 50, "1": 50 }
        }))
        .unwrap();
        assert_eq!(
            reward.artifact_probs_by_kind_id.keys().next().map(String::as_str),
            Some("5")
        );
    }
}
