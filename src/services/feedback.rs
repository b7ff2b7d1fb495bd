use std::collections::{HashMap, HashSet};

use uuid::Uuid;

use crate::{
    error::AppResult,
    models::{Feedback, RecommendationCategory},
    services::providers::FeedbackRepository,
};

/// Charts a player has hidden, per recommendation category
#[derive(Debug, Clone, Default)]
pub struct SuppressionMap {
    hidden: HashMap<RecommendationCategory, HashSet<Uuid>>,
}

impl SuppressionMap {
    /// Builds the map from feedback in the order it was given; a later
    /// entry for the same chart and category overrides an earlier one.
    pub fn from_feedback(feedback: &[Feedback]) -> Self {
        let mut hidden: HashMap<RecommendationCategory, HashSet<Uuid>> = HashMap::new();

        for entry in feedback {
            if entry.should_hide {
                hidden
                    .entry(entry.suggestion_category.clone())
                    .or_default()
                    .insert(entry.chart_id);
            } else if let Some(charts) = hidden.get_mut(&entry.suggestion_category) {
                charts.remove(&entry.chart_id);
            }
        }

        Self { hidden }
    }

    pub fn is_hidden(&self, category: &RecommendationCategory, chart_id: &Uuid) -> bool {
        self.hidden
            .get(category)
            .is_some_and(|charts| charts.contains(chart_id))
    }

    /// Number of hidden charts across all categories
    pub fn len(&self) -> usize {
        self.hidden.values().map(HashSet::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Persists a player's feedback on a recommendation.
///
/// The repository upserts by chart and category, so recording the same
/// signal twice leaves the same state as recording it once.
pub async fn record_feedback(
    repository: &dyn FeedbackRepository,
    user_id: Uuid,
    feedback: Feedback,
) -> AppResult<()> {
    tracing::info!(
        user_id = %user_id,
        chart_id = %feedback.chart_id,
        category = %feedback.suggestion_category,
        should_hide = feedback.should_hide,
        "Recording suggestion feedback"
    );

    repository.save_feedback(user_id, feedback).await
}
