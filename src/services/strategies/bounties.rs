use std::cmp::Reverse;

use super::{DataSources, PlayerSnapshot};
use crate::{
    error::AppResult,
    models::{Bounty, ChartRecommendation, RecommendationCategory},
    services::cancellation::guarded,
};

pub const LIMIT: usize = 5;

const DESCRIPTION: &str = "Be the first to record a score on this chart and earn its bounty";

pub async fn recommend(
    snapshot: &PlayerSnapshot,
    sources: &DataSources<'_>,
) -> AppResult<Vec<ChartRecommendation>> {
    let bounties = guarded(sources.cancel, sources.charts.chart_bounties()).await?;
    Ok(select(snapshot, bounties))
}

/// Highest-worth bounties on charts the player has never recorded
pub fn select(snapshot: &PlayerSnapshot, mut bounties: Vec<Bounty>) -> Vec<ChartRecommendation> {
    let category = RecommendationCategory::Bounties;

    bounties.retain(|bounty| {
        !snapshot.scores.contains_key(&bounty.chart_id)
            && !snapshot.is_hidden(&category, &bounty.chart_id)
    });
    bounties.sort_by_key(|bounty| Reverse(bounty.worth));

    bounties
        .into_iter()
        .take(LIMIT)
        .map(|bounty| {
            ChartRecommendation::new(category.clone(), bounty.chart_id, DESCRIPTION)
                .with_detail(bounty.worth.to_string())
        })
        .collect()
}
