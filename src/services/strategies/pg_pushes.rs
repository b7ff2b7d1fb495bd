use super::PlayerSnapshot;
use crate::models::{ChartRecommendation, PhoenixLetterGrade, RecommendationCategory};

pub const LIMIT: usize = 6;

const DESCRIPTION: &str = "You are close to a perfect game on this chart";

/// SSS+ scores short of a perfect game, hardest charts and smallest gaps first
pub fn recommend(snapshot: &PlayerSnapshot) -> Vec<ChartRecommendation> {
    let category = RecommendationCategory::PushPgs;

    let mut candidates: Vec<_> = snapshot
        .scores
        .values()
        .filter_map(|recorded| recorded.score.map(|score| (recorded.chart_id, score)))
        .filter(|(_, score)| {
            !score.is_max() && score.letter_grade() == PhoenixLetterGrade::SssPlus
        })
        .filter(|(chart_id, _)| !snapshot.is_hidden(&category, chart_id))
        .filter_map(|(chart_id, score)| {
            snapshot
                .catalog
                .get(&chart_id)
                .map(|chart| (chart_id, chart.level, score))
        })
        .collect();

    candidates.sort_by(|a, b| {
        b.1.cmp(&a.1)
            .then_with(|| a.2.distance_to_max().cmp(&b.2.distance_to_max()))
            .then_with(|| a.0.cmp(&b.0))
    });

    candidates
        .into_iter()
        .take(LIMIT)
        .map(|(chart_id, _, _)| ChartRecommendation::new(category.clone(), chart_id, DESCRIPTION))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Chart, ChartType};
    use crate::services::strategies::test_support::{add_score, chart, hide, snapshot};
    use uuid::Uuid;

    #[test]
    fn test_only_sss_plus_below_max() {
        let sss_plus = chart(ChartType::Single, 20);
        let perfect = chart(ChartType::Single, 20);
        let sss = chart(ChartType::Single, 20);
        let unscored = chart(ChartType::Single, 20);
        let charts = vec![sss_plus.clone(), perfect.clone(), sss.clone(), unscored.clone()];
        let mut snapshot = snapshot(20, &charts);
        add_score(&mut snapshot, &sss_plus, Some(996_000), 5, false);
        add_score(&mut snapshot, &perfect, Some(1_000_000), 5, false);
        add_score(&mut snapshot, &sss, Some(994_999), 5, false);
        add_score(&mut snapshot, &unscored, None, 5, false);

        let picks = recommend(&snapshot);

        let ids: Vec<Uuid> = picks.iter().map(|r| r.chart_id).collect();
        assert_eq!(ids, vec![sss_plus.id]);
        assert_eq!(picks[0].category.to_string(), "Push PGs");
    }

    #[test]
    fn test_orders_by_level_then_distance_and_caps_at_six() {
        let charts: Vec<Chart> = (0..8).map(|i| chart(ChartType::Double, 15 + i)).collect();
        let mut snapshot = snapshot(20, &charts);
        for chart in &charts {
            add_score(&mut snapshot, chart, Some(996_000), 1, false);
        }
        let same_level_closer = chart(ChartType::Single, 22);
        snapshot.catalog = crate::models::ChartCatalog::new(
            charts
                .iter()
                .cloned()
                .chain(std::iter::once(same_level_closer.clone()))
                .collect(),
        );
        add_score(&mut snapshot, &same_level_closer, Some(999_000), 1, false);

        let picks = recommend(&snapshot);

        assert_eq!(picks.len(), LIMIT);
        assert_eq!(picks[0].chart_id, same_level_closer.id);
        assert_eq!(picks[1].chart_id, charts[7].id);
        assert_eq!(picks[2].chart_id, charts[6].id);
    }

    #[test]
    fn test_hidden_chart_never_returned() {
        let target = chart(ChartType::Single, 19);
        let mut snapshot = snapshot(19, &[target.clone()]);
        add_score(&mut snapshot, &target, Some(998_000), 1, false);
        hide(&mut snapshot, RecommendationCategory::PushPgs, &target);

        assert!(recommend(&snapshot).is_empty());
    }
}
