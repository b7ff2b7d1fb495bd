//! Independent heuristics that each produce one bounded, labelled slice of
//! recommendations from the same per-request snapshot.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use tokio_util::sync::CancellationToken;
use uuid::Uuid;

use crate::{
    models::{ChartCatalog, DifficultyLevel, RecommendationCategory, RecordedScore, TitleProgress},
    services::{
        feedback::SuppressionMap,
        providers::{ChartDataSource, PlayerDataSource},
    },
};

pub mod bounties;
pub mod old_scores;
pub mod pass_fills;
pub mod pg_pushes;
pub mod push_levels;
pub mod skill_titles;
pub mod top_50;

/// Everything fetched once per request and shared by every strategy
#[derive(Debug, Clone)]
pub struct PlayerSnapshot {
    pub user_id: Uuid,
    /// Competitive level, already clamped
    pub level: DifficultyLevel,
    pub now: DateTime<Utc>,
    pub titles: Vec<TitleProgress>,
    pub scores: HashMap<Uuid, RecordedScore>,
    pub catalog: ChartCatalog,
    /// Approachability ranking, most approachable first
    pub approachability: Vec<Uuid>,
    pub suppressed: SuppressionMap,
}

impl PlayerSnapshot {
    /// True when the chart has no score or only a broken one
    pub fn needs_pass(&self, chart_id: &Uuid) -> bool {
        self.scores
            .get(chart_id)
            .map_or(true, |score| score.is_broken)
    }

    pub fn is_hidden(&self, category: &RecommendationCategory, chart_id: &Uuid) -> bool {
        self.suppressed.is_hidden(category, chart_id)
    }
}

/// Data sources for strategies that fetch beyond the snapshot
#[derive(Clone, Copy)]
pub struct DataSources<'a> {
    pub players: &'a dyn PlayerDataSource,
    pub charts: &'a dyn ChartDataSource,
    pub cancel: &'a CancellationToken,
}

#[cfg(test)]
pub(crate) mod test_support {
    use super::*;
    use crate::models::{Chart, ChartType, Feedback, Mix, PhoenixScore};
    use chrono::Duration;

    pub fn chart(chart_type: ChartType, level: i32) -> Chart {
        Chart {
            id: Uuid::new_v4(),
            mix: Mix::Phoenix,
            song_name: format!("Song {}", Uuid::new_v4().simple()),
            chart_type,
            level: DifficultyLevel::new(level).unwrap(),
        }
    }

    pub fn snapshot(level: i32, charts: &[Chart]) -> PlayerSnapshot {
        PlayerSnapshot {
            user_id: Uuid::new_v4(),
            level: DifficultyLevel::new(level).unwrap(),
            now: Utc::now(),
            titles: Vec::new(),
            scores: HashMap::new(),
            catalog: ChartCatalog::new(charts.to_vec()),
            approachability: charts.iter().map(|chart| chart.id).collect(),
            suppressed: SuppressionMap::default(),
        }
    }

    pub fn add_score(
        snapshot: &mut PlayerSnapshot,
        chart: &Chart,
        score: Option<u32>,
        days_ago: i64,
        is_broken: bool,
    ) {
        snapshot.scores.insert(
            chart.id,
            RecordedScore {
                chart_id: chart.id,
                score: score.and_then(PhoenixScore::new),
                recorded_date: snapshot.now - Duration::days(days_ago),
                is_broken,
            },
        );
    }

    pub fn hide(snapshot: &mut PlayerSnapshot, category: RecommendationCategory, chart: &Chart) {
        snapshot.suppressed = SuppressionMap::from_feedback(&[Feedback {
            chart_id: chart.id,
            suggestion_category: category,
            should_hide: true,
        }]);
    }
}
