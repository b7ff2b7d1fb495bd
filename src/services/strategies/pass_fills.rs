use std::collections::BTreeMap;

use rand::{seq::SliceRandom, Rng};
use uuid::Uuid;

use super::PlayerSnapshot;
use crate::models::{ChartRecommendation, ChartType, DifficultyLevel, RecommendationCategory};

/// Most approachable charts considered per level and chart type
pub const POOL_SIZE: usize = 6;
/// Charts drawn from each pool
pub const PER_GROUP: usize = 2;
/// How far below the competitive level fills reach
const LEVELS_BELOW: i32 = 3;

const DESCRIPTION: &str = "Fill in a missing pass near your competitive level";

pub fn recommend(snapshot: &PlayerSnapshot, rng: &mut impl Rng) -> Vec<ChartRecommendation> {
    let levels = snapshot.level.window(LEVELS_BELOW);
    let category = RecommendationCategory::FillScores;

    let mut groups: BTreeMap<(DifficultyLevel, ChartType), Vec<Uuid>> = BTreeMap::new();
    for chart_id in &snapshot.approachability {
        let Some(chart) = snapshot.catalog.get(chart_id) else {
            continue;
        };
        if !levels.contains(&chart.level)
            || !snapshot.needs_pass(chart_id)
            || snapshot.is_hidden(&category, chart_id)
        {
            continue;
        }
        groups
            .entry((chart.level, chart.chart_type))
            .or_default()
            .push(*chart_id);
    }

    let mut picks = Vec::new();
    for mut pool in groups.into_values() {
        pool.truncate(POOL_SIZE);
        pool.shuffle(rng);
        picks.extend(
            pool.into_iter()
                .take(PER_GROUP)
                .map(|chart_id| ChartRecommendation::new(category.clone(), chart_id, DESCRIPTION)),
        );
    }
    picks
}
