use std::collections::HashMap;

use uuid::Uuid;

use super::{DataSources, PlayerSnapshot};
use crate::{
    error::AppResult,
    models::{
        Chart, ChartRecommendation, ChartType, DifficultyLevel, Mix, RecommendationCategory,
        Title, TitleProgress,
    },
    services::cancellation::guarded,
};

/// Most charts suggested per chart type
pub const PER_TYPE_LIMIT: usize = 6;

const DESCRIPTION: &str = "Pass this chart to progress towards your next difficulty title";

/// The difficulty title a player should be working towards.
///
/// Titles are ordered by level then name. Scanning down from the hardest,
/// the first completed title marks the player's current standing and the
/// title right above it is the target. A player who finished the hardest
/// title keeps it as the target; one who finished none starts at the easiest.
pub fn target_title(titles: &[TitleProgress]) -> Option<(&str, DifficultyLevel)> {
    let mut difficulty: Vec<(&str, DifficultyLevel, bool)> = titles
        .iter()
        .filter_map(|progress| match &progress.title {
            Title::Difficulty { name, level } => {
                Some((name.as_str(), *level, progress.is_complete()))
            }
            _ => None,
        })
        .collect();
    difficulty.sort_by(|a, b| a.1.cmp(&b.1).then_with(|| a.0.cmp(b.0)));

    let hardest = difficulty.len().checked_sub(1)?;
    let target = match difficulty.iter().rposition(|(_, _, complete)| *complete) {
        Some(completed) => (completed + 1).min(hardest),
        None => 0,
    };

    let (name, level, _) = difficulty[target];
    Some((name, level))
}

pub async fn recommend(
    snapshot: &PlayerSnapshot,
    sources: &DataSources<'_>,
) -> AppResult<Vec<ChartRecommendation>> {
    let Some((title, level)) = target_title(&snapshot.titles) else {
        return Ok(Vec::new());
    };

    let charts = guarded(
        sources.cancel,
        sources.charts.charts(Mix::Phoenix, Some(level)),
    )
    .await?;

    Ok(select(snapshot, title, level, &charts))
}

/// Picks unpassed charts at the target level in approachability order
pub fn select(
    snapshot: &PlayerSnapshot,
    title: &str,
    level: DifficultyLevel,
    charts: &[Chart],
) -> Vec<ChartRecommendation> {
    let at_level: HashMap<Uuid, ChartType> = charts
        .iter()
        .filter(|chart| chart.level == level)
        .map(|chart| (chart.id, chart.chart_type))
        .collect();

    let singles = RecommendationCategory::PushSingles(title.to_string());
    let doubles = RecommendationCategory::PushDoubles(title.to_string());
    let mut single_picks = Vec::new();
    let mut double_picks = Vec::new();

    for chart_id in &snapshot.approachability {
        if single_picks.len() >= PER_TYPE_LIMIT && double_picks.len() >= PER_TYPE_LIMIT {
            break;
        }
        if !snapshot.needs_pass(chart_id) {
            continue;
        }

        let (category, picks) = match at_level.get(chart_id) {
            Some(ChartType::Single) => (&singles, &mut single_picks),
            Some(ChartType::Double) => (&doubles, &mut double_picks),
            _ => continue,
        };
        if picks.len() < PER_TYPE_LIMIT && !snapshot.is_hidden(category, chart_id) {
            picks.push(ChartRecommendation::new(category.clone(), *chart_id, DESCRIPTION));
        }
    }

    single_picks.extend(double_picks);
    single_picks
}
