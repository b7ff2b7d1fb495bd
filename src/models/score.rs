use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A Phoenix score, `0..=1_000_000`
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u32", into = "u32")]
pub struct PhoenixScore(u32);

impl PhoenixScore {
    pub const MAX: u32 = 1_000_000;

    pub fn new(value: u32) -> Option<Self> {
        (value <= Self::MAX).then_some(Self(value))
    }

    pub fn value(&self) -> u32 {
        self.0
    }

    pub fn is_max(&self) -> bool {
        self.0 == Self::MAX
    }

    /// Points missing to a perfect score
    pub fn distance_to_max(&self) -> u32 {
        Self::MAX - self.0
    }

    pub fn letter_grade(&self) -> PhoenixLetterGrade {
        PhoenixLetterGrade::ALL
            .iter()
            .copied()
            .find(|grade| self.0 >= grade.min_score())
            .unwrap_or(PhoenixLetterGrade::F)
    }
}

impl TryFrom<u32> for PhoenixScore {
    type Error = String;

    fn try_from(value: u32) -> Result<Self, Self::Error> {
        PhoenixScore::new(value).ok_or_else(|| format!("score {} exceeds {}", value, Self::MAX))
    }
}

impl From<PhoenixScore> for u32 {
    fn from(score: PhoenixScore) -> Self {
        score.0
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PhoenixLetterGrade {
    #[serde(rename = "SSS+")]
    SssPlus,
    #[serde(rename = "SSS")]
    Sss,
    #[serde(rename = "SS+")]
    SsPlus,
    #[serde(rename = "SS")]
    Ss,
    #[serde(rename = "S+")]
    SPlus,
    S,
    #[serde(rename = "AAA+")]
    AaaPlus,
    #[serde(rename = "AAA")]
    Aaa,
    #[serde(rename = "AA+")]
    AaPlus,
    #[serde(rename = "AA")]
    Aa,
    #[serde(rename = "A+")]
    APlus,
    A,
    B,
    C,
    D,
    F,
}

impl PhoenixLetterGrade {
    /// Highest grade first
    const ALL: [PhoenixLetterGrade; 16] = [
        PhoenixLetterGrade::SssPlus,
        PhoenixLetterGrade::Sss,
        PhoenixLetterGrade::SsPlus,
        PhoenixLetterGrade::Ss,
        PhoenixLetterGrade::SPlus,
        PhoenixLetterGrade::S,
        PhoenixLetterGrade::AaaPlus,
        PhoenixLetterGrade::Aaa,
        PhoenixLetterGrade::AaPlus,
        PhoenixLetterGrade::Aa,
        PhoenixLetterGrade::APlus,
        PhoenixLetterGrade::A,
        PhoenixLetterGrade::B,
        PhoenixLetterGrade::C,
        PhoenixLetterGrade::D,
        PhoenixLetterGrade::F,
    ];

    /// Lowest score that earns this grade
    pub fn min_score(&self) -> u32 {
        match self {
            PhoenixLetterGrade::SssPlus => 995_000,
            PhoenixLetterGrade::Sss => 990_000,
            PhoenixLetterGrade::SsPlus => 985_000,
            PhoenixLetterGrade::Ss => 980_000,
            PhoenixLetterGrade::SPlus => 975_000,
            PhoenixLetterGrade::S => 970_000,
            PhoenixLetterGrade::AaaPlus => 960_000,
            PhoenixLetterGrade::Aaa => 950_000,
            PhoenixLetterGrade::AaPlus => 925_000,
            PhoenixLetterGrade::Aa => 900_000,
            PhoenixLetterGrade::APlus => 825_000,
            PhoenixLetterGrade::A => 750_000,
            PhoenixLetterGrade::B => 650_000,
            PhoenixLetterGrade::C => 550_000,
            PhoenixLetterGrade::D => 450_000,
            PhoenixLetterGrade::F => 0,
        }
    }
}

/// The player's best recorded attempt on one chart
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecordedScore {
    pub chart_id: Uuid,
    pub score: Option<PhoenixScore>,
    pub recorded_date: DateTime<Utc>,
    pub is_broken: bool,
}

/// One entry of a player's top 50 competitive charts
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompetitiveScore {
    pub chart_id: Uuid,
    pub score: Option<PhoenixScore>,
}
