use super::PlayerSnapshot;
use crate::models::{ChartRecommendation, PhoenixLetterGrade, RecommendationCategory, Title};

/// Suggests the chart behind every skill title the player has an S on but
/// has not finished yet.
pub fn recommend(snapshot: &PlayerSnapshot) -> Vec<ChartRecommendation> {
    let threshold = PhoenixLetterGrade::S.min_score() as i32;
    let category = RecommendationCategory::SkillTitleCharts;

    snapshot
        .titles
        .iter()
        .filter(|progress| progress.completion_count >= threshold && !progress.is_complete())
        .filter_map(|progress| match &progress.title {
            Title::Skill { name, matcher } => snapshot
                .catalog
                .iter()
                .find(|chart| matcher.matches(chart))
                .map(|chart| (name, chart.id)),
            _ => None,
        })
        .filter(|(_, chart_id)| !snapshot.is_hidden(&category, chart_id))
        .map(|(name, chart_id)| {
            ChartRecommendation::new(
                category.clone(),
                chart_id,
                format!("Finish the {} skill title", name),
            )
        })
        .collect()
}
