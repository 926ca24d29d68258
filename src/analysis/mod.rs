//! Derived tables: campaign drop efficiency and champion skill annotation.

pub mod books;
pub mod campaign;
pub mod champion;

use thiserror::Error;

use crate::data::LookupError;

pub use campaign::{analyze_campaign, CampaignRow, RewardWeights, StageKey};
pub use champion::{analyze_champions, ChampionReport, ChampionSettings, StatDivisors};

#[derive(Debug, Error)]
pub enum AnalysisError {
    #[error("stage record without a numeric Id")]
    StageWithoutId,
    #[error("stage {stage}: unexpected record shape: {source}")]
    StageShape {
        stage: String,
        source: serde_json::Error,
    },
    #[error("stage {stage}: missing {field}")]
    MissingField { stage: String, field: &'static str },
    #[error("stage {stage}: energy cost is zero")]
    ZeroEnergyCost { stage: String },
    #[error("stage id '{0}' does not follow the campaign layout 1ZZD?S")]
    InvalidStageId(String),
    #[error("{context}: {source}")]
    Lookup {
        context: String,
        source: LookupError,
    },
    #[error("champion {champion}: skill {skill_id} not found in skill data")]
    MissingSkill { champion: i64, skill_id: i64 },
    #[error("champion {0}: missing BaseStats")]
    MissingBaseStats(i64),
}

impl AnalysisError {
    pub(crate) fn lookup(context: impl Into<String>) -> impl FnOnce(LookupError) -> Self {
        let context = context.into();
        move |source| AnalysisError::Lookup { context, source }
    }
}
