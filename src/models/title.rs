use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use uuid::Uuid;

use super::{Chart, ChartCatalog, ChartType, DifficultyLevel, RecordedScore};

/// Identifies the chart a skill title is earned on
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChartMatcher {
    pub song_name: String,
    pub chart_type: ChartType,
    pub level: DifficultyLevel,
}

impl ChartMatcher {
    pub fn matches(&self, chart: &Chart) -> bool {
        chart.chart_type == self.chart_type
            && chart.level == self.level
            && chart.song_name.eq_ignore_ascii_case(&self.song_name)
    }
}

/// A title a player can earn
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Title {
    /// Earned by passing enough charts of one level
    Difficulty { name: String, level: DifficultyLevel },
    /// Earned by scoring high enough on one specific chart
    Skill { name: String, matcher: ChartMatcher },
    /// Earned by overall pass count
    Basic { name: String },
}

/// A title together with what it takes to complete it
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TitleDefinition {
    pub title: Title,
    pub completion_required: i32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TitleProgress {
    pub title: Title,
    pub completion_count: i32,
    pub completion_required: i32,
}

impl TitleProgress {
    pub fn is_complete(&self) -> bool {
        self.completion_count >= self.completion_required
    }

    /// Evaluates every definition against the player's current scores.
    ///
    /// Difficulty titles count unbroken passes at their level, skill titles
    /// take the best score on their chart and basic titles count every
    /// unbroken pass.
    pub fn evaluate(
        definitions: &[TitleDefinition],
        scores: &HashMap<Uuid, RecordedScore>,
        catalog: &ChartCatalog,
    ) -> Vec<TitleProgress> {
        let passes: Vec<&Chart> = scores
            .values()
            .filter(|score| !score.is_broken)
            .filter_map(|score| catalog.get(&score.chart_id))
            .collect();

        definitions
            .iter()
            .map(|definition| {
                let completion_count = match &definition.title {
                    Title::Difficulty { level, .. } => {
                        passes.iter().filter(|chart| chart.level == *level).count() as i32
                    }
                    Title::Skill { matcher, .. } => catalog
                        .iter()
                        .filter(|chart| matcher.matches(chart))
                        .filter_map(|chart| scores.get(&chart.id))
                        .filter_map(|score| score.score)
                        .map(|score| score.value() as i32)
                        .max()
                        .unwrap_or(0),
                    Title::Basic { .. } => passes.len() as i32,
                };

                TitleProgress {
                    title: definition.title.clone(),
                    completion_count,
                    completion_required: definition.completion_required,
                }
            })
            .collect()
    }
}
