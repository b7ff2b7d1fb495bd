use rand::{seq::SliceRandom, Rng};
use uuid::Uuid;

use super::{DataSources, PlayerSnapshot};
use crate::{
    error::AppResult,
    models::{ChartRecommendation, ChartType, CompetitiveScore, RecommendationCategory},
    services::cancellation::guarded,
};

/// Charts drawn per chart type
pub const PER_TYPE: usize = 3;

const DESCRIPTION: &str = "Raise a score that counts towards your competitive top 50";

pub async fn recommend(
    snapshot: &PlayerSnapshot,
    sources: &DataSources<'_>,
    rng: &mut impl Rng,
) -> AppResult<Vec<ChartRecommendation>> {
    let mut picks = Vec::new();
    for chart_type in ChartType::COMPETITIVE {
        let top = guarded(
            sources.cancel,
            sources
                .players
                .top_50_competitive(snapshot.user_id, chart_type),
        )
        .await?;
        picks.extend(select(snapshot, top, rng));
    }
    Ok(picks)
}

/// Random improvable entries from one chart type's top 50
pub fn select(
    snapshot: &PlayerSnapshot,
    top: Vec<CompetitiveScore>,
    rng: &mut impl Rng,
) -> Vec<ChartRecommendation> {
    let category = RecommendationCategory::ImproveTop50;

    let mut improvable: Vec<Uuid> = top
        .into_iter()
        .filter(|entry| entry.score.is_some_and(|score| !score.is_max()))
        .map(|entry| entry.chart_id)
        .filter(|chart_id| !snapshot.is_hidden(&category, chart_id))
        .collect();

    improvable.shuffle(rng);
    improvable
        .into_iter()
        .take(PER_TYPE)
        .map(|chart_id| ChartRecommendation::new(category.clone(), chart_id, DESCRIPTION))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::PhoenixScore;
    use crate::services::providers::{MockChartDataSource, MockPlayerDataSource};
    use crate::services::strategies::test_support::{chart, hide, snapshot};
    use rand::{rngs::StdRng, SeedableRng};
    use tokio_util::sync::CancellationToken;

    fn entry(chart_id: Uuid, score: Option<u32>) -> CompetitiveScore {
        CompetitiveScore {
            chart_id,
            score: score.and_then(PhoenixScore::new),
        }
    }

    #[test]
    fn test_excludes_missing_max_and_hidden_scores() {
        let hidden = chart(ChartType::Single, 20);
        let mut snapshot = snapshot(20, &[hidden.clone()]);
        hide(&mut snapshot, RecommendationCategory::ImproveTop50, &hidden);
        let keep = Uuid::new_v4();
        let top = vec![
            entry(Uuid::new_v4(), None),
            entry(Uuid::new_v4(), Some(1_000_000)),
            entry(hidden.id, Some(900_000)),
            entry(keep, Some(940_000)),
        ];

        let picks = select(&snapshot, top, &mut StdRng::seed_from_u64(4));

        let ids: Vec<Uuid> = picks.iter().map(|r| r.chart_id).collect();
        assert_eq!(ids, vec![keep]);
    }

    #[test]
    fn test_takes_three_from_the_list() {
        let snapshot = snapshot(20, &[]);
        let top: Vec<CompetitiveScore> = (0..50)
            .map(|_| entry(Uuid::new_v4(), Some(950_000)))
            .collect();
        let eligible: Vec<Uuid> = top.iter().map(|e| e.chart_id).collect();

        let picks = select(&snapshot, top, &mut StdRng::seed_from_u64(8));

        assert_eq!(picks.len(), PER_TYPE);
        assert!(picks.iter().all(|p| eligible.contains(&p.chart_id)));
    }

    #[tokio::test]
    async fn test_recommend_concatenates_singles_then_doubles() {
        let snapshot = snapshot(20, &[]);
        let single = Uuid::new_v4();
        let double = Uuid::new_v4();

        let mut players = MockPlayerDataSource::new();
        players
            .expect_top_50_competitive()
            .times(2)
            .returning(move |_, chart_type| {
                Ok(match chart_type {
                    ChartType::Single => vec![entry(single, Some(900_000))],
                    _ => vec![entry(double, Some(900_000))],
                })
            });
        let charts = MockChartDataSource::new();
        let cancel = CancellationToken::new();
        let sources = DataSources {
            players: &players,
            charts: &charts,
            cancel: &cancel,
        };

        let picks = recommend(&snapshot, &sources, &mut StdRng::seed_from_u64(1))
            .await
            .unwrap();

        let ids: Vec<Uuid> = picks.iter().map(|r| r.chart_id).collect();
        assert_eq!(ids, vec![single, double]);
    }
}
