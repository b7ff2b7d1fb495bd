use serde::{Deserialize, Serialize};
use std::{fmt::Display, str::FromStr};
use uuid::Uuid;

const SINGLES_SUFFIX: &str = " Singles";
const DOUBLES_SUFFIX: &str = " Doubles";

/// The label a recommendation is tagged with and the key feedback is stored under.
///
/// Serialised as its display string, e.g. `"Push PGs"` or
/// `"Expert Lv.1 Singles"`, so the tag a player dismisses is always the same
/// value the strategy filters on.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum RecommendationCategory {
    PushSingles(String),
    PushDoubles(String),
    FillScores,
    SkillTitleCharts,
    RevisitOldScores,
    PushPgs,
    ImproveTop50,
    Bounties,
}

impl Display for RecommendationCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RecommendationCategory::PushSingles(title) => write!(f, "{}{}", title, SINGLES_SUFFIX),
            RecommendationCategory::PushDoubles(title) => write!(f, "{}{}", title, DOUBLES_SUFFIX),
            RecommendationCategory::FillScores => f.write_str("Fill Scores"),
            RecommendationCategory::SkillTitleCharts => f.write_str("Skill Title Charts"),
            RecommendationCategory::RevisitOldScores => f.write_str("Revisit Old Scores"),
            RecommendationCategory::PushPgs => f.write_str("Push PGs"),
            RecommendationCategory::ImproveTop50 => f.write_str("Improve Your Top 50"),
            RecommendationCategory::Bounties => f.write_str("Bounties"),
        }
    }
}

impl FromStr for RecommendationCategory {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let fixed = match s {
            "Fill Scores" => Some(RecommendationCategory::FillScores),
            "Skill Title Charts" => Some(RecommendationCategory::SkillTitleCharts),
            "Revisit Old Scores" => Some(RecommendationCategory::RevisitOldScores),
            "Push PGs" => Some(RecommendationCategory::PushPgs),
            "Improve Your Top 50" => Some(RecommendationCategory::ImproveTop50),
            "Bounties" => Some(RecommendationCategory::Bounties),
            _ => None,
        };
        if let Some(category) = fixed {
            return Ok(category);
        }

        if let Some(title) = s.strip_suffix(SINGLES_SUFFIX).filter(|t| !t.is_empty()) {
            return Ok(RecommendationCategory::PushSingles(title.to_string()));
        }
        if let Some(title) = s.strip_suffix(DOUBLES_SUFFIX).filter(|t| !t.is_empty()) {
            return Ok(RecommendationCategory::PushDoubles(title.to_string()));
        }

        Err(format!("unknown recommendation category '{}'", s))
    }
}

impl TryFrom<String> for RecommendationCategory {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<RecommendationCategory> for String {
    fn from(category: RecommendationCategory) -> Self {
        category.to_string()
    }
}

/// One suggested chart, produced by a single strategy
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChartRecommendation {
    pub category: RecommendationCategory,
    pub chart_id: Uuid,
    pub description: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
}

impl ChartRecommendation {
    pub fn new(
        category: RecommendationCategory,
        chart_id: Uuid,
        description: impl Into<String>,
    ) -> Self {
        Self {
            category,
            chart_id,
            description: description.into(),
            detail: None,
        }
    }

    pub fn with_detail(mut self, detail: impl Into<String>) -> Self {
        self.detail = Some(detail.into());
        self
    }
}

/// A player's show/hide signal for one chart within one category
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Feedback {
    pub chart_id: Uuid,
    pub suggestion_category: RecommendationCategory,
    pub should_hide: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Bounty {
    pub chart_id: Uuid,
    pub worth: u32,
}
