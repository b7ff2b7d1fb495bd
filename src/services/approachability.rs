use std::collections::{hash_map::Entry, HashMap};

use tokio_util::sync::CancellationToken;
use uuid::Uuid;

use crate::{
    error::AppResult,
    models::{ChartCatalog, TierListEntry, TierListName},
    services::{cancellation::guarded, providers::ChartDataSource},
};

/// The "Scores" tier list only counts for charts below this level
const SCORES_LIST_LEVEL_CUTOFF: i32 = 20;

/// Orders charts by how ready an average player is for them, most approachable first.
///
/// Charts that appear on none of the tier lists are left out entirely.
pub async fn rank_charts(
    user_id: Uuid,
    charts: &dyn ChartDataSource,
    catalog: &ChartCatalog,
    cancel: &CancellationToken,
) -> AppResult<Vec<Uuid>> {
    let mut entries = Vec::new();
    for name in TierListName::ALL {
        entries.extend(guarded(cancel, charts.tier_list(name)).await?);
    }

    let ranked = rank_entries(&entries, catalog);

    tracing::debug!(
        user_id = %user_id,
        tier_list_entries = entries.len(),
        ranked = ranked.len(),
        "Approachability ranking computed"
    );

    Ok(ranked)
}

/// Sums each chart's weighted tier list memberships and sorts descending.
///
/// Ties keep the order in which charts were first seen.
pub fn rank_entries(entries: &[TierListEntry], catalog: &ChartCatalog) -> Vec<Uuid> {
    let mut first_seen = Vec::new();
    let mut totals: HashMap<Uuid, f64> = HashMap::new();

    for entry in entries {
        if entry.tier_list_name == TierListName::Scores
            && !catalog
                .get(&entry.chart_id)
                .is_some_and(|chart| chart.level.value() < SCORES_LIST_LEVEL_CUTOFF)
        {
            continue;
        }

        let weighted = entry.tier_list_name.weight() * entry.category.value();
        match totals.entry(entry.chart_id) {
            Entry::Occupied(mut total) => *total.get_mut() += weighted,
            Entry::Vacant(slot) => {
                first_seen.push(entry.chart_id);
                slot.insert(weighted);
            }
        }
    }

    let mut ranked: Vec<(Uuid, f64)> = first_seen
        .into_iter()
        .map(|chart_id| (chart_id, totals[&chart_id]))
        .filter(|(_, total)| *total > 0.0)
        .collect();
    ranked.sort_by(|a, b| b.1.total_cmp(&a.1));

    ranked.into_iter().map(|(chart_id, _)| chart_id).collect()
}
