use std::collections::HashMap;

use chrono::Duration;
use rand::{seq::SliceRandom, Rng};
use uuid::Uuid;

use super::{DataSources, PlayerSnapshot};
use crate::{
    error::AppResult,
    models::{
        ChartRecommendation, ChartType, RecommendationCategory, RecordedScore, TierListCategory,
    },
    services::cancellation::guarded,
};

/// Scores must be strictly older than this to be revisited
pub const MIN_AGE_DAYS: i64 = 30;
/// Oldest candidates kept before sampling
pub const POOL_SIZE: usize = 30;
pub const SAMPLE_SIZE: usize = 6;
const LEVELS_BELOW: i32 = 2;

const DESCRIPTION: &str = "An old score on a chart that plays harder for you than for most";

pub async fn recommend(
    snapshot: &PlayerSnapshot,
    sources: &DataSources<'_>,
    rng: &mut impl Rng,
) -> AppResult<Vec<ChartRecommendation>> {
    let mut tiers = HashMap::new();
    for level in snapshot.level.window(LEVELS_BELOW) {
        for chart_type in ChartType::COMPETITIVE {
            let relative = guarded(
                sources.cancel,
                sources
                    .charts
                    .relative_tier_list(snapshot.user_id, chart_type, level),
            )
            .await?;
            tiers.extend(relative.into_iter().map(|tier| (tier.chart_id, tier.category)));
        }
    }

    Ok(select(snapshot, &tiers, rng))
}

/// Keeps the oldest qualifying scores, then samples from that pool
pub fn select(
    snapshot: &PlayerSnapshot,
    tiers: &HashMap<Uuid, TierListCategory>,
    rng: &mut impl Rng,
) -> Vec<ChartRecommendation> {
    let levels = snapshot.level.window(LEVELS_BELOW);
    let cutoff = snapshot.now - Duration::days(MIN_AGE_DAYS);
    let category = RecommendationCategory::RevisitOldScores;

    let mut candidates: Vec<&RecordedScore> = snapshot
        .catalog
        .iter()
        .filter(|chart| levels.contains(&chart.level))
        .filter(|chart| {
            matches!(
                tiers.get(&chart.id),
                Some(TierListCategory::Underrated | TierListCategory::VeryHard)
            )
        })
        .filter_map(|chart| snapshot.scores.get(&chart.id))
        .filter(|score| score.recorded_date < cutoff)
        .filter(|score| !snapshot.is_hidden(&category, &score.chart_id))
        .collect();

    candidates.sort_by_key(|score| (score.recorded_date, score.chart_id));
    candidates.truncate(POOL_SIZE);
    candidates.shuffle(rng);
    candidates.truncate(SAMPLE_SIZE);

    candidates
        .into_iter()
        .map(|score| {
            let age_days = (snapshot.now - score.recorded_date).num_days();
            ChartRecommendation::new(category.clone(), score.chart_id, DESCRIPTION)
                .with_detail(age_days.to_string())
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Chart, RelativeTier};
    use crate::services::providers::{MockChartDataSource, MockPlayerDataSource};
    use crate::services::strategies::test_support::{add_score, chart, hide, snapshot};
    use rand::{rngs::StdRng, SeedableRng};
    use tokio_util::sync::CancellationToken;

    fn tiers(entries: &[(&Chart, TierListCategory)]) -> HashMap<Uuid, TierListCategory> {
        entries
            .iter()
            .map(|(chart, category)| (chart.id, *category))
            .collect()
    }

    #[test]
    fn test_only_underrated_or_very_hard_and_older_than_thirty_days() {
        let old_underrated = chart(ChartType::Single, 18);
        let recent = chart(ChartType::Single, 18);
        let exactly_thirty = chart(ChartType::Single, 18);
        let medium = chart(ChartType::Double, 18);
        let charts = vec![
            old_underrated.clone(),
            recent.clone(),
            exactly_thirty.clone(),
            medium.clone(),
        ];
        let mut snapshot = snapshot(18, &charts);
        add_score(&mut snapshot, &old_underrated, Some(900_000), 40, false);
        add_score(&mut snapshot, &recent, Some(900_000), 20, false);
        add_score(&mut snapshot, &exactly_thirty, Some(900_000), 30, false);
        add_score(&mut snapshot, &medium, Some(900_000), 90, false);
        let tiers = tiers(&[
            (&old_underrated, TierListCategory::Underrated),
            (&recent, TierListCategory::VeryHard),
            (&exactly_thirty, TierListCategory::VeryHard),
            (&medium, TierListCategory::Medium),
        ]);

        let picks = select(&snapshot, &tiers, &mut StdRng::seed_from_u64(5));

        assert_eq!(picks.len(), 1);
        assert_eq!(picks[0].chart_id, old_underrated.id);
        assert_eq!(picks[0].detail.as_deref(), Some("40"));
        assert_eq!(picks[0].category.to_string(), "Revisit Old Scores");
    }

    #[test]
    fn test_samples_six_from_thirty_oldest() {
        let charts: Vec<Chart> = (0..40).map(|_| chart(ChartType::Double, 16)).collect();
        let mut snapshot = snapshot(17, &charts);
        for (age, chart) in charts.iter().enumerate() {
            add_score(&mut snapshot, chart, Some(850_000), 100 + age as i64, false);
        }
        let entries: Vec<(&Chart, TierListCategory)> = charts
            .iter()
            .map(|chart| (chart, TierListCategory::VeryHard))
            .collect();
        let tiers = tiers(&entries);

        let picks = select(&snapshot, &tiers, &mut StdRng::seed_from_u64(11));

        assert_eq!(picks.len(), SAMPLE_SIZE);
        for pick in &picks {
            let age: i64 = pick.detail.as_deref().unwrap().parse().unwrap();
            // the 30 oldest are 110..=139 days old
            assert!(age >= 110, "age {} outside the oldest pool", age);
        }
    }

    #[test]
    fn test_levels_outside_window_and_hidden_are_excluded() {
        let too_low = chart(ChartType::Single, 14);
        let hidden = chart(ChartType::Single, 15);
        let charts = vec![too_low.clone(), hidden.clone()];
        let mut snapshot = snapshot(17, &charts);
        add_score(&mut snapshot, &too_low, Some(900_000), 60, false);
        add_score(&mut snapshot, &hidden, Some(900_000), 60, false);
        hide(&mut snapshot, RecommendationCategory::RevisitOldScores, &hidden);
        let tiers = tiers(&[
            (&too_low, TierListCategory::Underrated),
            (&hidden, TierListCategory::Underrated),
        ]);

        assert!(select(&snapshot, &tiers, &mut StdRng::seed_from_u64(2)).is_empty());
    }

    #[tokio::test]
    async fn test_recommend_queries_each_level_and_type() {
        let target = chart(ChartType::Single, 20);
        let mut snapshot = snapshot(20, &[target.clone()]);
        add_score(&mut snapshot, &target, Some(920_000), 45, false);

        let mut charts = MockChartDataSource::new();
        let target_id = target.id;
        charts
            .expect_relative_tier_list()
            .times(6)
            .returning(move |_, chart_type, level| {
                if chart_type == ChartType::Single && level.value() == 20 {
                    Ok(vec![RelativeTier {
                        chart_id: target_id,
                        category: TierListCategory::VeryHard,
                    }])
                } else {
                    Ok(vec![])
                }
            });
        let players = MockPlayerDataSource::new();
        let cancel = CancellationToken::new();
        let sources = DataSources {
            players: &players,
            charts: &charts,
            cancel: &cancel,
        };

        let picks = recommend(&snapshot, &sources, &mut StdRng::seed_from_u64(9))
            .await
            .unwrap();

        assert_eq!(picks.len(), 1);
        assert_eq!(picks[0].chart_id, target.id);
    }
}
