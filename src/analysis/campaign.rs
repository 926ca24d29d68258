//! Campaign drop-rate analysis: expected returns per run and per energy spent.

use std::collections::HashMap;

use serde::Serialize;
use serde_json::{Map, Value};

use crate::analysis::AnalysisError;
use crate::data::model::{CampaignStage, FixedReward, StageReward};
use crate::data::tables::{
    self, Difficulty, ITEM_RANKS, ITEM_RANK_SELL_VALUE_MULTIPLIERS, ITEM_RANK_VALUE_MULTIPLIERS,
    ITEM_RARITIES, ITEM_RARITY_VALUE_MULTIPLIERS,
};
use crate::report::CsvTable;

/// Energy resource id in stage prices.
const ENERGY_RESOURCE: &str = "1";

const FIXED_REWARD_SILVER: i64 = 3;
const FIXED_REWARD_ACCOUNT_XP: i64 = 5;

const RANDOM_REWARD_CHAMPION: i64 = 1;
const RANDOM_REWARD_SHARD: i64 = 2;
const RANDOM_REWARD_ARTIFACT: i64 = 4;

/// Energy-equivalent worth of a rare / uncommon champion drop and of one mystery shard.
const RARE_ENERGY_WORTH: f64 = 47.0 + 1.0 / 3.0;
const UNCOMMON_ENERGY_WORTH: f64 = 7.0 + 1.0 / 3.0;
const SHARD_ENERGY_WORTH: f64 = 2.452;

/// Rank-by-rarity probability matrix for artifact drops.
pub type ItemProbabilities = [[f64; ITEM_RARITIES]; ITEM_RANKS];

/// Position of a stage within the campaign, decoded from its id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StageKey {
    pub zone: String,
    pub difficulty: Difficulty,
    pub substage: String,
}

impl StageKey {
    /// Campaign stage ids start with `1`.
    pub fn is_campaign(id: &str) -> bool {
        id.starts_with('1')
    }

    /// Layout: `1`, two-digit zone, difficulty digit, one filler digit, substage.
    /// Ids too short to carry a substage get an empty one.
    pub fn parse(id: &str) -> Result<Self, AnalysisError> {
        if id.len() < 4 || !id.bytes().all(|b| b.is_ascii_digit()) || !Self::is_campaign(id) {
            return Err(AnalysisError::InvalidStageId(id.to_string()));
        }
        let difficulty_digit = id[3..4]
            .chars()
            .next()
            .ok_or_else(|| AnalysisError::InvalidStageId(id.to_string()))?;
        let difficulty =
            Difficulty::from_digit(difficulty_digit).map_err(AnalysisError::lookup(format!("stage {id}")))?;
        Ok(Self {
            zone: id[1..3].to_string(),
            difficulty,
            substage: id.get(5..).unwrap_or_default().to_string(),
        })
    }

    /// Display key such as `03-1-Br`.
    pub fn label(&self) -> String {
        format!("{}-{}-{}", self.zone, self.substage, self.difficulty.short())
    }
}

/// Raw weights of the random reward categories of one stage.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct RewardWeights {
    pub common: f64,
    pub uncommon: f64,
    pub rare: f64,
    pub shard: f64,
    pub item: f64,
}

impl RewardWeights {
    pub fn total(&self) -> f64 {
        self.common + self.uncommon + self.rare + self.shard + self.item
    }

    /// Each category as a share of the total. All zero when nothing can drop.
    pub fn normalized(&self) -> RewardWeights {
        let total = self.total();
        if total <= 0.0 {
            return RewardWeights::default();
        }
        RewardWeights {
            common: self.common / total,
            uncommon: self.uncommon / total,
            rare: self.rare / total,
            shard: self.shard / total,
            item: self.item / total,
        }
    }
}

/// One row of `raid_campaign_farming_data.csv`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CampaignRow {
    pub id: String,
    #[serde(rename = "xp/e")]
    pub xp_per_energy: f64,
    #[serde(rename = "com/e")]
    pub common_per_energy: f64,
    #[serde(rename = "unc/e")]
    pub uncommon_per_energy: f64,
    #[serde(rename = "rare/e")]
    pub rare_per_energy: f64,
    #[serde(rename = "silver/e")]
    pub silver_per_energy: f64,
    #[serde(rename = "shard/e")]
    pub shards_per_energy: f64,
    #[serde(rename = "e return/e")]
    pub energy_return_per_energy: f64,
    #[serde(rename = "real xp/e")]
    pub real_xp_per_energy: f64,
}

impl CsvTable for CampaignRow {
    const HEADERS: &'static [&'static str] = &[
        "id",
        "xp/e",
        "com/e",
        "unc/e",
        "rare/e",
        "silver/e",
        "shard/e",
        "e return/e",
        "real xp/e",
    ];
}

/// Analyze every campaign stage in `StageData.Stages`; other stages are skipped.
pub fn analyze_campaign(stages: &[Value]) -> Result<Vec<CampaignRow>, AnalysisError> {
    let mut rows = Vec::new();
    for raw in stages {
        let id = raw
            .get("Id")
            .and_then(Value::as_i64)
            .ok_or(AnalysisError::StageWithoutId)?
            .to_string();
        if !StageKey::is_campaign(&id) {
            continue;
        }
        let stage: CampaignStage =
            serde_json::from_value(raw.clone()).map_err(|source| AnalysisError::StageShape {
                stage: id.clone(),
                source,
            })?;
        rows.push(analyze_stage(&stage)?);
    }
    Ok(rows)
}

pub fn analyze_stage(stage: &CampaignStage) -> Result<CampaignRow, AnalysisError> {
    let id = stage.id.to_string();
    let key = StageKey::parse(&id)?;

    let energy = *stage
        .start_condition
        .price
        .raw_values
        .get(ENERGY_RESOURCE)
        .ok_or_else(|| AnalysisError::MissingField {
            stage: id.clone(),
            field: "StartCondition.Price.RawValues.1",
        })?;
    if energy == 0.0 {
        return Err(AnalysisError::ZeroEnergyCost { stage: id });
    }

    let silver = mean_fixed_reward(&stage.rewards, FIXED_REWARD_SILVER);
    let account_xp = mean_fixed_reward(&stage.rewards, FIXED_REWARD_ACCOUNT_XP);
    let champion_xp = stage.reward_hero_xp.unwrap_or(0.0);

    let (weights, shard_quantity) = reward_weights(&stage.reward);
    let shares = weights.normalized();

    let item_probabilities = item_probabilities(&stage.reward, shares.item, &id)?;
    let item_value = if shares.item > 0.0 {
        let kind = first_numeric_key(&stage.reward.artifact_probs_by_kind_id).ok_or_else(|| {
            AnalysisError::MissingField {
                stage: id.clone(),
                field: "Reward.ArtifactProbsByKindId",
            }
        })?;
        let set = first_numeric_key(&stage.reward.artifact_probs_by_set_kind_id).ok_or_else(|| {
            AnalysisError::MissingField {
                stage: id.clone(),
                field: "Reward.ArtifactProbsBySetKindId",
            }
        })?;
        expected_sell_value(&item_probabilities, set, kind)
            .map_err(AnalysisError::lookup(format!("stage {id}")))?
    } else {
        0.0
    };

    let shards = shares.shard * shard_quantity;
    let energy_return = shares.rare / energy * RARE_ENERGY_WORTH
        + shares.uncommon / energy * UNCOMMON_ENERGY_WORTH
        + shards / energy * SHARD_ENERGY_WORTH;

    // Two food champions share the stage XP.
    let xp_per_food = champion_xp / 2.0;

    tracing::debug!(
        stage = %key.label(),
        energy,
        account_xp,
        xp_per_food,
        commons = shares.common,
        uncommons = shares.uncommon,
        rares = shares.rare,
        silver = silver + item_value,
        shards,
        "zone {} stage {} {}",
        key.zone,
        key.substage,
        key.difficulty.as_str()
    );

    Ok(CampaignRow {
        id: key.label(),
        xp_per_energy: xp_per_food / energy,
        common_per_energy: shares.common / energy,
        uncommon_per_energy: shares.uncommon / energy,
        rare_per_energy: shares.rare / energy,
        silver_per_energy: (silver + item_value) / energy,
        shards_per_energy: shards / energy,
        energy_return_per_energy: energy_return,
        real_xp_per_energy: xp_per_food / (energy - energy_return),
    })
}

fn mean_fixed_reward(rewards: &[FixedReward], kind: i64) -> f64 {
    rewards
        .iter()
        .rev()
        .find(|reward| reward.kind == kind)
        .map(|reward| (reward.min_count + reward.max_count) / 2.0)
        .unwrap_or(0.0)
}

/// Category weights plus the mean mystery-shard quantity per shard drop.
pub fn reward_weights(reward: &StageReward) -> (RewardWeights, f64) {
    let mut weights = RewardWeights::default();
    let mut shard_quantity = 0.0;
    for entry in &reward.rewards {
        match entry.kind {
            RANDOM_REWARD_ARTIFACT => weights.item += entry.probability,
            RANDOM_REWARD_SHARD => {
                weights.shard += entry.probability;
                shard_quantity = (entry.min_count + entry.max_count) / 2.0;
            }
            RANDOM_REWARD_CHAMPION => match entry.hero_grade {
                Some(1) => weights.common += entry.probability,
                Some(2) => weights.uncommon += entry.probability,
                Some(3) => weights.rare += entry.probability,
                _ => {}
            },
            _ => {}
        }
    }
    (weights, shard_quantity)
}

/// Probability of each rank/rarity combination for one stage run.
pub fn item_probabilities(
    reward: &StageReward,
    item_share: f64,
    stage: &str,
) -> Result<ItemProbabilities, AnalysisError> {
    let ranks: [f64; ITEM_RANKS] =
        percent_table(&reward.artifact_probs_by_rank_id, "artifact rank", stage)?;
    let rarities: [f64; ITEM_RARITIES] =
        percent_table(&reward.artifact_probs_by_rarity_id, "artifact rarity", stage)?;

    let mut matrix = [[0.0; ITEM_RARITIES]; ITEM_RANKS];
    for (i, rank) in ranks.iter().enumerate() {
        for (j, rarity) in rarities.iter().enumerate() {
            matrix[i][j] = item_share * rank * rarity;
        }
    }
    Ok(matrix)
}

fn percent_table<const N: usize>(
    raw: &HashMap<String, f64>,
    table: &'static str,
    stage: &str,
) -> Result<[f64; N], AnalysisError> {
    let mut out = [0.0; N];
    for (key, percent) in raw {
        let slot = key
            .parse::<i64>()
            .ok()
            .and_then(|id| usize::try_from(id - 1).ok())
            .filter(|slot| *slot < N)
            .ok_or_else(|| AnalysisError::Lookup {
                context: format!("stage {stage}"),
                source: tables::LookupError {
                    table,
                    code: key.parse().unwrap_or(-1),
                },
            })?;
        out[slot] = percent / 100.0;
    }
    Ok(out)
}

fn first_numeric_key(map: &Map<String, Value>) -> Option<i64> {
    map.keys().next().and_then(|key| key.parse().ok())
}

/// Expected silver from selling one artifact drop, weighted by drop chances.
pub fn expected_sell_value(
    probabilities: &ItemProbabilities,
    set_id: i64,
    kind_id: i64,
) -> Result<f64, tables::LookupError> {
    let base = tables::artifact_set_price(set_id)? * tables::item_kind_multiplier(kind_id)?;
    let mut total = 0.0;
    for (rank, row) in probabilities.iter().enumerate() {
        for (rarity, probability) in row.iter().enumerate() {
            total += base
                * probability
                * ITEM_RARITY_VALUE_MULTIPLIERS[rarity]
                * ITEM_RANK_VALUE_MULTIPLIERS[rank]
                * ITEM_RANK_SELL_VALUE_MULTIPLIERS[rank];
        }
    }
    Ok(total)
}
