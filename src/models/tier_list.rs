use serde::{Deserialize, Serialize};
use std::str::FromStr;
use uuid::Uuid;

/// Externally maintained tier lists the approachability ranking is built from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TierListName {
    Popularity,
    #[serde(rename = "Pass Count")]
    PassCount,
    Scores,
}

impl TierListName {
    pub const ALL: [TierListName; 3] = [
        TierListName::Popularity,
        TierListName::PassCount,
        TierListName::Scores,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            TierListName::Popularity => "Popularity",
            TierListName::PassCount => "Pass Count",
            TierListName::Scores => "Scores",
        }
    }

    /// Contribution of one membership in this list to a chart's approachability
    pub fn weight(&self) -> f64 {
        match self {
            TierListName::Popularity => 0.5,
            TierListName::PassCount | TierListName::Scores => 1.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TierListCategory {
    Overrated,
    Easy,
    VeryEasy,
    Medium,
    Hard,
    VeryHard,
    Underrated,
    Unrecorded,
}

impl TierListCategory {
    pub fn value(&self) -> f64 {
        match self {
            TierListCategory::Overrated => 7.0,
            TierListCategory::Easy => 6.0,
            TierListCategory::VeryEasy => 5.0,
            TierListCategory::Medium => 4.0,
            TierListCategory::Hard => 3.0,
            TierListCategory::VeryHard => 2.0,
            TierListCategory::Underrated => 1.0,
            TierListCategory::Unrecorded => 0.0,
        }
    }
}

impl FromStr for TierListCategory {
    type Err = std::convert::Infallible;

    /// Unknown labels map to `Unrecorded` so they never add weight
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s {
            "Overrated" => TierListCategory::Overrated,
            "Easy" => TierListCategory::Easy,
            "VeryEasy" => TierListCategory::VeryEasy,
            "Medium" => TierListCategory::Medium,
            "Hard" => TierListCategory::Hard,
            "VeryHard" => TierListCategory::VeryHard,
            "Underrated" => TierListCategory::Underrated,
            _ => TierListCategory::Unrecorded,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TierListEntry {
    pub chart_id: Uuid,
    pub tier_list_name: TierListName,
    pub category: TierListCategory,
}

/// A chart's position in the player's own relative tier list
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RelativeTier {
    pub chart_id: Uuid,
    pub category: TierListCategory,
}
