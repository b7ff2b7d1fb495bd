//! Data source abstractions the recommendation engine reads from
//!
//! The engine never talks to storage directly. Player history, the chart
//! catalog with its tier lists, and suggestion feedback each sit behind a
//! trait so the Postgres store, the in-memory store and test mocks are
//! interchangeable.

use uuid::Uuid;

use crate::{
    error::AppResult,
    models::{
        Bounty, Chart, ChartType, CompetitiveScore, DifficultyLevel, Feedback, Mix,
        RecordedScore, RelativeTier, TierListEntry, TierListName, TitleProgress,
    },
};

/// Per-player history and statistics
#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait PlayerDataSource: Send + Sync {
    /// Competitive level statistic, `None` when the player has no stats yet
    async fn competitive_level(&self, user_id: Uuid) -> AppResult<Option<f64>>;

    /// Progress on every title of the given mix, evaluated from current scores
    async fn title_progress(&self, user_id: Uuid, mix: Mix) -> AppResult<Vec<TitleProgress>>;

    /// Best recorded score per chart, at most one entry per chart
    async fn recorded_scores(&self, user_id: Uuid) -> AppResult<Vec<RecordedScore>>;

    /// The player's 50 best competitive charts of one type
    async fn top_50_competitive(
        &self,
        user_id: Uuid,
        chart_type: ChartType,
    ) -> AppResult<Vec<CompetitiveScore>>;
}

/// Chart catalog and community-maintained rankings
#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait ChartDataSource: Send + Sync {
    /// Charts of a mix, optionally restricted to one level
    async fn charts(&self, mix: Mix, level: Option<DifficultyLevel>) -> AppResult<Vec<Chart>>;

    async fn tier_list(&self, name: TierListName) -> AppResult<Vec<TierListEntry>>;

    /// How hard each chart of one type and level is for this player relative to others
    async fn relative_tier_list(
        &self,
        user_id: Uuid,
        chart_type: ChartType,
        level: DifficultyLevel,
    ) -> AppResult<Vec<RelativeTier>>;

    /// Currently open bounties
    async fn chart_bounties(&self) -> AppResult<Vec<Bounty>>;
}

/// Storage for suggestion feedback
#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait FeedbackRepository: Send + Sync {
    async fn feedback(&self, user_id: Uuid) -> AppResult<Vec<Feedback>>;

    /// Upserts by chart and category so the latest signal wins
    async fn save_feedback(&self, user_id: Uuid, feedback: Feedback) -> AppResult<()>;
}
