use std::collections::HashMap;
use std::sync::Arc;
use std::time::Instant;

use chrono::Utc;
use rand::{rngs::StdRng, Rng, SeedableRng};
use tokio_util::sync::CancellationToken;
use uuid::Uuid;

use crate::{
    error::{AppError, AppResult},
    models::{ChartCatalog, ChartRecommendation, DifficultyLevel, Feedback, Mix},
    services::{
        approachability,
        cancellation::guarded,
        feedback::{self, SuppressionMap},
        providers::{ChartDataSource, FeedbackRepository, PlayerDataSource},
        strategies::{
            bounties, old_scores, pass_fills, pg_pushes, push_levels, skill_titles, top_50,
            DataSources, PlayerSnapshot,
        },
    },
};

/// Competitive level used when the player has no usable statistic, and the
/// lowest level ever used for level-bounded strategies
pub const MIN_COMPETITIVE_LEVEL: i32 = 10;

/// Where per-request sampling randomness comes from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RandomSource {
    Entropy,
    Seeded(u64),
}

impl RandomSource {
    pub fn rng(&self) -> StdRng {
        match self {
            RandomSource::Entropy => StdRng::from_os_rng(),
            RandomSource::Seeded(seed) => StdRng::seed_from_u64(*seed),
        }
    }
}

/// Rounds the competitive level statistic and floors it at level 10.
///
/// A missing, non-finite or out-of-range statistic falls back to level 10.
pub fn competitive_level(statistic: Option<f64>) -> DifficultyLevel {
    let floor = DifficultyLevel::clamped(MIN_COMPETITIVE_LEVEL);

    statistic
        .filter(|value| value.is_finite())
        .and_then(|value| DifficultyLevel::new(value.round() as i32))
        .map_or(floor, |level| level.max(floor))
}

/// Combines every recommendation strategy into one list per player
pub struct RecommendationEngine {
    players: Arc<dyn PlayerDataSource>,
    charts: Arc<dyn ChartDataSource>,
    feedback: Arc<dyn FeedbackRepository>,
    random: RandomSource,
}

impl RecommendationEngine {
    pub fn new(
        players: Arc<dyn PlayerDataSource>,
        charts: Arc<dyn ChartDataSource>,
        feedback: Arc<dyn FeedbackRepository>,
    ) -> Self {
        Self {
            players,
            charts,
            feedback,
            random: RandomSource::Entropy,
        }
    }

    pub fn with_random_source(mut self, random: RandomSource) -> Self {
        self.random = random;
        self
    }

    /// Builds the player's recommendation list.
    ///
    /// Strategies run concurrently but their output is concatenated in a
    /// fixed order: Push-Levels, Pass-Fills, Skill-Title-Charts, Old-Scores,
    /// PG-Pushes, Random-Top-50, Bounties. Any fetch failure or cancellation
    /// fails the whole request.
    pub async fn get_recommendations(
        &self,
        user_id: Uuid,
        cancel: &CancellationToken,
    ) -> AppResult<Vec<ChartRecommendation>> {
        let start = Instant::now();
        let sources = DataSources {
            players: self.players.as_ref(),
            charts: self.charts.as_ref(),
            cancel,
        };

        let snapshot = self.snapshot(user_id, &sources).await?;

        tracing::info!(
            user_id = %user_id,
            level = %snapshot.level,
            titles = snapshot.titles.len(),
            scores = snapshot.scores.len(),
            hidden = snapshot.suppressed.len(),
            "Player snapshot loaded"
        );

        let mut rng = self.random.rng();
        let mut pass_fill_rng = StdRng::seed_from_u64(rng.random());
        let mut old_score_rng = StdRng::seed_from_u64(rng.random());
        let mut top_50_rng = StdRng::seed_from_u64(rng.random());

        let (push_levels, pass_fills, skill_titles, old_scores, pg_pushes, top_50, bounties) =
            tokio::try_join!(
                push_levels::recommend(&snapshot, &sources),
                async { Ok::<_, AppError>(pass_fills::recommend(&snapshot, &mut pass_fill_rng)) },
                async { Ok::<_, AppError>(skill_titles::recommend(&snapshot)) },
                old_scores::recommend(&snapshot, &sources, &mut old_score_rng),
                async { Ok::<_, AppError>(pg_pushes::recommend(&snapshot)) },
                top_50::recommend(&snapshot, &sources, &mut top_50_rng),
                bounties::recommend(&snapshot, &sources),
            )?;

        if cancel.is_cancelled() {
            return Err(AppError::Cancelled);
        }

        let recommendations: Vec<ChartRecommendation> = [
            push_levels,
            pass_fills,
            skill_titles,
            old_scores,
            pg_pushes,
            top_50,
            bounties,
        ]
        .into_iter()
        .flatten()
        .collect();

        tracing::info!(
            user_id = %user_id,
            recommendations = recommendations.len(),
            processing_time_ms = start.elapsed().as_millis(),
            "Recommendations generated"
        );

        Ok(recommendations)
    }

    /// Records a show/hide signal for one recommendation
    pub async fn submit_feedback(&self, user_id: Uuid, feedback: Feedback) -> AppResult<()> {
        feedback::record_feedback(self.feedback.as_ref(), user_id, feedback).await
    }

    pub async fn feedback(&self, user_id: Uuid) -> AppResult<Vec<Feedback>> {
        self.feedback.feedback(user_id).await
    }

    /// Fetches everything the strategies share, once
    async fn snapshot(
        &self,
        user_id: Uuid,
        sources: &DataSources<'_>,
    ) -> AppResult<PlayerSnapshot> {
        let cancel = sources.cancel;

        let (statistic, titles, scores, feedback, charts) = tokio::try_join!(
            guarded(cancel, sources.players.competitive_level(user_id)),
            guarded(cancel, sources.players.title_progress(user_id, Mix::Phoenix)),
            guarded(cancel, sources.players.recorded_scores(user_id)),
            guarded(cancel, self.feedback.feedback(user_id)),
            guarded(cancel, sources.charts.charts(Mix::Phoenix, None)),
        )?;

        let catalog = ChartCatalog::new(charts);
        let approachability =
            approachability::rank_charts(user_id, sources.charts, &catalog, cancel).await?;

        let scores: HashMap<_, _> = scores
            .into_iter()
            .map(|score| (score.chart_id, score))
            .collect();

        Ok(PlayerSnapshot {
            user_id,
            level: competitive_level(statistic),
            now: Utc::now(),
            titles,
            scores,
            catalog,
            approachability,
            suppressed: SuppressionMap::from_feedback(&feedback),
        })
    }
}
