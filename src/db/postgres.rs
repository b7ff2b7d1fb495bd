use std::collections::HashMap;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use sqlx::{postgres::PgPoolOptions, PgPool};
use uuid::Uuid;

use crate::{
    error::{AppError, AppResult},
    models::{
        Bounty, Chart, ChartCatalog, ChartMatcher, ChartType, CompetitiveScore, DifficultyLevel,
        Feedback, Mix, PhoenixScore, RecommendationCategory, RecordedScore, RelativeTier,
        TierListCategory, TierListEntry, TierListName, Title, TitleDefinition, TitleProgress,
    },
    services::providers::{ChartDataSource, FeedbackRepository, PlayerDataSource},
};

/// Creates a PostgreSQL connection pool
///
/// Establishes a pool of database connections for efficient reuse.
pub async fn create_pool(database_url: &str) -> anyhow::Result<PgPool> {
    let pool = PgPoolOptions::new()
        .max_connections(5)
        .connect(database_url)
        .await?;

    Ok(pool)
}

/// Postgres-backed implementation of every data source the engine reads
#[derive(Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    async fn catalog(&self, mix: Mix) -> AppResult<ChartCatalog> {
        Ok(ChartCatalog::new(self.charts(mix, None).await?))
    }
}

#[derive(sqlx::FromRow)]
struct ChartRow {
    id: Uuid,
    mix: String,
    song_name: String,
    chart_type: String,
    level: i32,
}

impl TryFrom<ChartRow> for Chart {
    type Error = AppError;

    fn try_from(row: ChartRow) -> Result<Self, Self::Error> {
        Ok(Chart {
            id: row.id,
            mix: Mix::from_str(&row.mix).map_err(AppError::Internal)?,
            song_name: row.song_name,
            chart_type: ChartType::from_str(&row.chart_type).map_err(AppError::Internal)?,
            level: DifficultyLevel::new(row.level)
                .ok_or_else(|| AppError::Internal(format!("invalid level {}", row.level)))?,
        })
    }
}

#[derive(sqlx::FromRow)]
struct ScoreRow {
    chart_id: Uuid,
    score: Option<i32>,
    recorded_date: DateTime<Utc>,
    is_broken: bool,
}

impl From<ScoreRow> for RecordedScore {
    fn from(row: ScoreRow) -> Self {
        RecordedScore {
            chart_id: row.chart_id,
            score: phoenix_score(row.score),
            recorded_date: row.recorded_date,
            is_broken: row.is_broken,
        }
    }
}

#[derive(sqlx::FromRow)]
struct TitleRow {
    name: String,
    kind: String,
    level: Option<i32>,
    song_name: Option<String>,
    chart_type: Option<String>,
    completion_required: i32,
}

impl TryFrom<TitleRow> for TitleDefinition {
    type Error = AppError;

    fn try_from(row: TitleRow) -> Result<Self, Self::Error> {
        let level = || {
            row.level
                .and_then(DifficultyLevel::new)
                .ok_or_else(|| AppError::Internal(format!("title '{}' has no valid level", row.name)))
        };

        let title = match row.kind.as_str() {
            "difficulty" => Title::Difficulty {
                name: row.name.clone(),
                level: level()?,
            },
            "skill" => {
                let chart_type = row
                    .chart_type
                    .as_deref()
                    .map(ChartType::from_str)
                    .transpose()
                    .map_err(AppError::Internal)?
                    .ok_or_else(|| {
                        AppError::Internal(format!("skill title '{}' has no chart type", row.name))
                    })?;
                Title::Skill {
                    name: row.name.clone(),
                    matcher: ChartMatcher {
                        song_name: row.song_name.clone().unwrap_or_default(),
                        chart_type,
                        level: level()?,
                    },
                }
            }
            "basic" => Title::Basic {
                name: row.name.clone(),
            },
            other => return Err(AppError::Internal(format!("unknown title kind '{}'", other))),
        };

        Ok(TitleDefinition {
            title,
            completion_required: row.completion_required,
        })
    }
}

#[derive(sqlx::FromRow)]
struct TierRow {
    chart_id: Uuid,
    category: String,
}

#[derive(sqlx::FromRow)]
struct FeedbackRow {
    chart_id: Uuid,
    suggestion_category: String,
    should_hide: bool,
}

fn phoenix_score(value: Option<i32>) -> Option<PhoenixScore> {
    value
        .and_then(|v| u32::try_from(v).ok())
        .and_then(PhoenixScore::new)
}

fn tier_category(label: &str) -> TierListCategory {
    match TierListCategory::from_str(label) {
        Ok(category) => category,
        Err(never) => match never {},
    }
}

/// Converts rows, logging and skipping any the domain types reject
fn convert_rows<R, T>(rows: Vec<R>, what: &str) -> Vec<T>
where
    T: TryFrom<R, Error = AppError>,
{
    rows.into_iter()
        .filter_map(|row| match T::try_from(row) {
            Ok(value) => Some(value),
            Err(e) => {
                tracing::warn!(error = %e, kind = what, "Skipping malformed row");
                None
            }
        })
        .collect()
}

#[async_trait::async_trait]
impl PlayerDataSource for PgStore {
    async fn competitive_level(&self, user_id: Uuid) -> AppResult<Option<f64>> {
        let level: Option<Option<f64>> = sqlx::query_scalar(
            r#"
            SELECT competitive_level
            FROM player_stats
            WHERE user_id = $1
            "#,
        )
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(level.flatten())
    }

    async fn title_progress(&self, user_id: Uuid, mix: Mix) -> AppResult<Vec<TitleProgress>> {
        let rows: Vec<TitleRow> = sqlx::query_as(
            r#"
            SELECT name, kind, level, song_name, chart_type, completion_required
            FROM titles
            WHERE mix = $1
            ORDER BY id
            "#,
        )
        .bind(mix.as_str())
        .fetch_all(&self.pool)
        .await?;
        let definitions: Vec<TitleDefinition> = convert_rows(rows, "title");

        let scores: HashMap<Uuid, RecordedScore> = self
            .recorded_scores(user_id)
            .await?
            .into_iter()
            .map(|score| (score.chart_id, score))
            .collect();
        let catalog = self.catalog(mix).await?;

        Ok(TitleProgress::evaluate(&definitions, &scores, &catalog))
    }

    async fn recorded_scores(&self, user_id: Uuid) -> AppResult<Vec<RecordedScore>> {
        let rows: Vec<ScoreRow> = sqlx::query_as(
            r#"
            SELECT chart_id, score, recorded_date, is_broken
            FROM recorded_scores
            WHERE user_id = $1
            "#,
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(RecordedScore::from).collect())
    }

    async fn top_50_competitive(
        &self,
        user_id: Uuid,
        chart_type: ChartType,
    ) -> AppResult<Vec<CompetitiveScore>> {
        let rows: Vec<(Uuid, Option<i32>)> = sqlx::query_as(
            r#"
            SELECT s.chart_id, s.score
            FROM recorded_scores s
            JOIN charts c ON c.id = s.chart_id
            WHERE s.user_id = $1
              AND s.is_broken = false
              AND c.mix = $2
              AND c.chart_type = $3
            ORDER BY c.level DESC, s.score DESC NULLS LAST
            LIMIT 50
            "#,
        )
        .bind(user_id)
        .bind(Mix::Phoenix.as_str())
        .bind(chart_type.as_str())
        .fetch_all(&self.pool)
        .await?;

        Ok(rows
            .into_iter()
            .map(|(chart_id, score)| CompetitiveScore {
                chart_id,
                score: phoenix_score(score),
            })
            .collect())
    }
}

#[async_trait::async_trait]
impl ChartDataSource for PgStore {
    async fn charts(&self, mix: Mix, level: Option<DifficultyLevel>) -> AppResult<Vec<Chart>> {
        let rows: Vec<ChartRow> = sqlx::query_as(
            r#"
            SELECT id, mix, song_name, chart_type, level
            FROM charts
            WHERE mix = $1 AND ($2::INTEGER IS NULL OR level = $2)
            ORDER BY level, song_name
            "#,
        )
        .bind(mix.as_str())
        .bind(level.map(|l| l.value()))
        .fetch_all(&self.pool)
        .await?;

        Ok(convert_rows(rows, "chart"))
    }

    async fn tier_list(&self, name: TierListName) -> AppResult<Vec<TierListEntry>> {
        let rows: Vec<TierRow> = sqlx::query_as(
            r#"
            SELECT chart_id, category
            FROM tier_list_entries
            WHERE tier_list_name = $1
            "#,
        )
        .bind(name.as_str())
        .fetch_all(&self.pool)
        .await?;

        Ok(rows
            .into_iter()
            .map(|row| TierListEntry {
                chart_id: row.chart_id,
                tier_list_name: name,
                category: tier_category(&row.category),
            })
            .collect())
    }

    async fn relative_tier_list(
        &self,
        user_id: Uuid,
        chart_type: ChartType,
        level: DifficultyLevel,
    ) -> AppResult<Vec<RelativeTier>> {
        let rows: Vec<TierRow> = sqlx::query_as(
            r#"
            SELECT t.chart_id, t.category
            FROM player_relative_tiers t
            JOIN charts c ON c.id = t.chart_id
            WHERE t.user_id = $1 AND c.chart_type = $2 AND c.level = $3
            "#,
        )
        .bind(user_id)
        .bind(chart_type.as_str())
        .bind(level.value())
        .fetch_all(&self.pool)
        .await?;

        Ok(rows
            .into_iter()
            .map(|row| RelativeTier {
                chart_id: row.chart_id,
                category: tier_category(&row.category),
            })
            .collect())
    }

    async fn chart_bounties(&self) -> AppResult<Vec<Bounty>> {
        let rows: Vec<(Uuid, i32)> = sqlx::query_as(
            r#"
            SELECT chart_id, worth
            FROM chart_bounties
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(rows
            .into_iter()
            .map(|(chart_id, worth)| Bounty {
                chart_id,
                worth: u32::try_from(worth).unwrap_or(0),
            })
            .collect())
    }
}

#[async_trait::async_trait]
impl FeedbackRepository for PgStore {
    async fn feedback(&self, user_id: Uuid) -> AppResult<Vec<Feedback>> {
        let rows: Vec<FeedbackRow> = sqlx::query_as(
            r#"
            SELECT chart_id, suggestion_category, should_hide
            FROM suggestion_feedback
            WHERE user_id = $1
            ORDER BY updated_at
            "#,
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows
            .into_iter()
            .filter_map(|row| {
                match RecommendationCategory::from_str(&row.suggestion_category) {
                    Ok(suggestion_category) => Some(Feedback {
                        chart_id: row.chart_id,
                        suggestion_category,
                        should_hide: row.should_hide,
                    }),
                    Err(e) => {
                        tracing::warn!(
                            chart_id = %row.chart_id,
                            error = %e,
                            "Ignoring feedback for unknown category"
                        );
                        None
                    }
                }
            })
            .collect())
    }

    async fn save_feedback(&self, user_id: Uuid, feedback: Feedback) -> AppResult<()> {
        sqlx::query(
            r#"
            INSERT INTO suggestion_feedback (user_id, chart_id, suggestion_category, should_hide)
            VALUES ($1, $2, $3, $4)
            ON CONFLICT (user_id, chart_id, suggestion_category)
            DO UPDATE SET should_hide = EXCLUDED.should_hide, updated_at = NOW()
            "#,
        )
        .bind(user_id)
        .bind(feedback.chart_id)
        .bind(feedback.suggestion_category.to_string())
        .bind(feedback.should_hide)
        .execute(&self.pool)
        .await?;

        Ok(())
    }
}
