use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::RwLock;
use uuid::Uuid;

use crate::{
    error::AppResult,
    models::{
        Bounty, Chart, ChartCatalog, ChartType, CompetitiveScore, DifficultyLevel, Feedback, Mix,
        RecordedScore, RelativeTier, TierListCategory, TierListEntry,
        TierListName, TitleDefinition, TitleProgress,
    },
    services::providers::{ChartDataSource, FeedbackRepository, PlayerDataSource},
};

/// In-process store for local runs and tests
#[derive(Clone, Default)]
pub struct InMemoryStore {
    inner: Arc<RwLock<InMemoryStoreInner>>,
}

#[derive(Default)]
struct InMemoryStoreInner {
    charts: Vec<Chart>,
    titles: Vec<(Mix, TitleDefinition)>,
    competitive_levels: HashMap<Uuid, f64>,
    scores: HashMap<Uuid, HashMap<Uuid, RecordedScore>>,
    tier_lists: Vec<TierListEntry>,
    relative_tiers: HashMap<Uuid, HashMap<Uuid, TierListCategory>>,
    bounties: Vec<Bounty>,
    /// Insertion order kept per user
    feedback: HashMap<Uuid, Vec<Feedback>>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn add_chart(&self, chart: Chart) {
        self.inner.write().await.charts.push(chart);
    }

    pub async fn add_title(&self, mix: Mix, definition: TitleDefinition) {
        self.inner.write().await.titles.push((mix, definition));
    }

    pub async fn set_competitive_level(&self, user_id: Uuid, level: f64) {
        self.inner
            .write()
            .await
            .competitive_levels
            .insert(user_id, level);
    }

    /// Replaces the player's score on that chart
    pub async fn record_score(&self, user_id: Uuid, score: RecordedScore) {
        self.inner
            .write()
            .await
            .scores
            .entry(user_id)
            .or_default()
            .insert(score.chart_id, score);
    }

    pub async fn add_tier_list_entry(&self, entry: TierListEntry) {
        let mut inner = self.inner.write().await;
        inner
            .tier_lists
            .retain(|e| !(e.chart_id == entry.chart_id && e.tier_list_name == entry.tier_list_name));
        inner.tier_lists.push(entry);
    }

    pub async fn set_relative_tier(&self, user_id: Uuid, chart_id: Uuid, category: TierListCategory) {
        self.inner
            .write()
            .await
            .relative_tiers
            .entry(user_id)
            .or_default()
            .insert(chart_id, category);
    }

    pub async fn add_bounty(&self, bounty: Bounty) {
        self.inner.write().await.bounties.push(bounty);
    }
}

impl InMemoryStoreInner {
    fn catalog(&self, mix: Mix) -> ChartCatalog {
        ChartCatalog::new(
            self.charts
                .iter()
                .filter(|chart| chart.mix == mix)
                .cloned()
                .collect(),
        )
    }

    fn scores_for(&self, user_id: &Uuid) -> HashMap<Uuid, RecordedScore> {
        self.scores.get(user_id).cloned().unwrap_or_default()
    }
}

#[async_trait::async_trait]
impl PlayerDataSource for InMemoryStore {
    async fn competitive_level(&self, user_id: Uuid) -> AppResult<Option<f64>> {
        Ok(self.inner.read().await.competitive_levels.get(&user_id).copied())
    }

    async fn title_progress(&self, user_id: Uuid, mix: Mix) -> AppResult<Vec<TitleProgress>> {
        let inner = self.inner.read().await;
        let definitions: Vec<TitleDefinition> = inner
            .titles
            .iter()
            .filter(|(title_mix, _)| *title_mix == mix)
            .map(|(_, definition)| definition.clone())
            .collect();

        Ok(TitleProgress::evaluate(
            &definitions,
            &inner.scores_for(&user_id),
            &inner.catalog(mix),
        ))
    }

    async fn recorded_scores(&self, user_id: Uuid) -> AppResult<Vec<RecordedScore>> {
        Ok(self.inner.read().await.scores_for(&user_id).into_values().collect())
    }

    async fn top_50_competitive(
        &self,
        user_id: Uuid,
        chart_type: ChartType,
    ) -> AppResult<Vec<CompetitiveScore>> {
        let inner = self.inner.read().await;
        let catalog = inner.catalog(Mix::Phoenix);

        let mut entries: Vec<(DifficultyLevel, RecordedScore)> = inner
            .scores_for(&user_id)
            .into_values()
            .filter(|score| !score.is_broken)
            .filter_map(|score| {
                catalog
                    .get(&score.chart_id)
                    .filter(|chart| chart.chart_type == chart_type)
                    .map(|chart| (chart.level, score))
            })
            .collect();
        entries.sort_by(|a, b| b.0.cmp(&a.0).then_with(|| b.1.score.cmp(&a.1.score)));

        Ok(entries
            .into_iter()
            .take(50)
            .map(|(_, score)| CompetitiveScore {
                chart_id: score.chart_id,
                score: score.score,
            })
            .collect())
    }
}

#[async_trait::async_trait]
impl ChartDataSource for InMemoryStore {
    async fn charts(&self, mix: Mix, level: Option<DifficultyLevel>) -> AppResult<Vec<Chart>> {
        Ok(self
            .inner
            .read()
            .await
            .charts
            .iter()
            .filter(|chart| chart.mix == mix && level.map_or(true, |l| chart.level == l))
            .cloned()
            .collect())
    }

    async fn tier_list(&self, name: TierListName) -> AppResult<Vec<TierListEntry>> {
        Ok(self
            .inner
            .read()
            .await
            .tier_lists
            .iter()
            .filter(|entry| entry.tier_list_name == name)
            .cloned()
            .collect())
    }

    async fn relative_tier_list(
        &self,
        user_id: Uuid,
        chart_type: ChartType,
        level: DifficultyLevel,
    ) -> AppResult<Vec<RelativeTier>> {
        let inner = self.inner.read().await;
        let Some(tiers) = inner.relative_tiers.get(&user_id) else {
            return Ok(Vec::new());
        };

        Ok(inner
            .charts
            .iter()
            .filter(|chart| chart.chart_type == chart_type && chart.level == level)
            .filter_map(|chart| {
                tiers.get(&chart.id).map(|category| RelativeTier {
                    chart_id: chart.id,
                    category: *category,
                })
            })
            .collect())
    }

    async fn chart_bounties(&self) -> AppResult<Vec<Bounty>> {
        Ok(self.inner.read().await.bounties.clone())
    }
}

#[async_trait::async_trait]
impl FeedbackRepository for InMemoryStore {
    async fn feedback(&self, user_id: Uuid) -> AppResult<Vec<Feedback>> {
        Ok(self
            .inner
            .read()
            .await
            .feedback
            .get(&user_id)
            .cloned()
            .unwrap_or_default())
    }

    async fn save_feedback(&self, user_id: Uuid, feedback: Feedback) -> AppResult<()> {
        let mut inner = self.inner.write().await;
        let entries = inner.feedback.entry(user_id).or_default();

        let same_key = |existing: &Feedback| {
            existing.chart_id == feedback.chart_id
                && existing.suggestion_category == feedback.suggestion_category
        };
        match entries.iter_mut().find(|existing| same_key(existing)) {
            Some(existing) => existing.should_hide = feedback.should_hide,
            None => entries.push(feedback),
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{PhoenixScore, RecommendationCategory};
    use chrono::Utc;

    fn chart(chart_type: ChartType, level: i32) -> Chart {
        Chart {
            id: Uuid::new_v4(),
            mix: Mix::Phoenix,
            song_name: "Test Song".to_string(),
            chart_type,
            level: DifficultyLevel::new(level).unwrap(),
        }
    }

    fn score(chart: &Chart, value: u32, is_broken: bool) -> RecordedScore {
        RecordedScore {
            chart_id: chart.id,
            score: PhoenixScore::new(value),
            recorded_date: Utc::now(),
            is_broken,
        }
    }

    #[tokio::test]
    async fn test_save_feedback_upserts_by_chart_and_category() {
        let store = InMemoryStore::new();
        let user_id = Uuid::new_v4();
        let chart_id = Uuid::new_v4();

        for should_hide in [true, false, true] {
            store
                .save_feedback(
                    user_id,
                    Feedback {
                        chart_id,
                        suggestion_category: RecommendationCategory::Bounties,
                        should_hide,
                    },
                )
                .await
                .unwrap();
        }
        store
            .save_feedback(
                user_id,
                Feedback {
                    chart_id,
                    suggestion_category: RecommendationCategory::PushPgs,
                    should_hide: false,
                },
            )
            .await
            .unwrap();

        let stored = store.feedback(user_id).await.unwrap();
        assert_eq!(stored.len(), 2);
        assert!(stored[0].should_hide);
        assert!(store.feedback(Uuid::new_v4()).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_top_50_filters_type_and_broken_and_orders_by_level() {
        let store = InMemoryStore::new();
        let user_id = Uuid::new_v4();
        let easy = chart(ChartType::Single, 12);
        let hard = chart(ChartType::Single, 22);
        let broken = chart(ChartType::Single, 24);
        let double = chart(ChartType::Double, 23);
        for c in [&easy, &hard, &broken, &double] {
            store.add_chart(c.clone()).await;
        }
        store.record_score(user_id, score(&easy, 990_000, false)).await;
        store.record_score(user_id, score(&hard, 900_000, false)).await;
        store.record_score(user_id, score(&broken, 500_000, true)).await;
        store.record_score(user_id, score(&double, 950_000, false)).await;

        let top = store
            .top_50_competitive(user_id, ChartType::Single)
            .await
            .unwrap();

        let ids: Vec<Uuid> = top.iter().map(|entry| entry.chart_id).collect();
        assert_eq!(ids, vec![hard.id, easy.id]);
    }

    #[tokio::test]
    async fn test_charts_filtered_by_mix_and_level() {
        let store = InMemoryStore::new();
        let target = chart(ChartType::Double, 18);
        let mut other_mix = chart(ChartType::Double, 18);
        other_mix.mix = Mix::Xx;
        store.add_chart(target.clone()).await;
        store.add_chart(other_mix).await;
        store.add_chart(chart(ChartType::Double, 19)).await;

        let charts = store
            .charts(Mix::Phoenix, DifficultyLevel::new(18))
            .await
            .unwrap();

        assert_eq!(charts, vec![target]);
        assert_eq!(store.charts(Mix::Phoenix, None).await.unwrap().len(), 2);
    }
}
