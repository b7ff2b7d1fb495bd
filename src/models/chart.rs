use serde::{Deserialize, Serialize};
use std::{fmt::Display, str::FromStr};
use uuid::Uuid;

/// Game release a chart or title belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Mix {
    Phoenix,
    #[serde(rename = "XX")]
    Xx,
}

impl Mix {
    pub fn as_str(&self) -> &'static str {
        match self {
            Mix::Phoenix => "Phoenix",
            Mix::Xx => "XX",
        }
    }
}

impl FromStr for Mix {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Phoenix" => Ok(Mix::Phoenix),
            "XX" => Ok(Mix::Xx),
            other => Err(format!("unknown mix '{}'", other)),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum ChartType {
    Single,
    Double,
    CoOp,
}

impl ChartType {
    /// Chart types a player competes on individually
    pub const COMPETITIVE: [ChartType; 2] = [ChartType::Single, ChartType::Double];

    pub fn as_str(&self) -> &'static str {
        match self {
            ChartType::Single => "Single",
            ChartType::Double => "Double",
            ChartType::CoOp => "CoOp",
        }
    }
}

impl FromStr for ChartType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Single" => Ok(ChartType::Single),
            "Double" => Ok(ChartType::Double),
            "CoOp" => Ok(ChartType::CoOp),
            other => Err(format!("unknown chart type '{}'", other)),
        }
    }
}

/// A chart difficulty, always within `MIN..=MAX`
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "i32", into = "i32")]
pub struct DifficultyLevel(u8);

impl DifficultyLevel {
    pub const MIN: i32 = 1;
    pub const MAX: i32 = 29;

    pub fn is_valid(level: i32) -> bool {
        (Self::MIN..=Self::MAX).contains(&level)
    }

    pub fn new(level: i32) -> Option<Self> {
        Self::is_valid(level).then(|| Self(level as u8))
    }

    /// Saturates out-of-range values into the valid range
    pub fn clamped(level: i32) -> Self {
        Self(level.clamp(Self::MIN, Self::MAX) as u8)
    }

    pub fn value(&self) -> i32 {
        self.0 as i32
    }

    /// Valid levels in `[self - below, self]`, ascending
    pub fn window(&self, below: i32) -> Vec<DifficultyLevel> {
        (self.value() - below..=self.value())
            .filter_map(DifficultyLevel::new)
            .collect()
    }
}

impl TryFrom<i32> for DifficultyLevel {
    type Error = String;

    fn try_from(level: i32) -> Result<Self, Self::Error> {
        DifficultyLevel::new(level).ok_or_else(|| format!("difficulty level {} out of range", level))
    }
}

impl From<DifficultyLevel> for i32 {
    fn from(level: DifficultyLevel) -> Self {
        level.value()
    }
}

impl Display for DifficultyLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A playable song, chart type and difficulty combination
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Chart {
    pub id: Uuid,
    pub mix: Mix,
    pub song_name: String,
    pub chart_type: ChartType,
    pub level: DifficultyLevel,
}

/// Full chart list in catalog order with lookup by id
#[derive(Debug, Clone, Default)]
pub struct ChartCatalog {
    charts: Vec<Chart>,
    index: std::collections::HashMap<Uuid, usize>,
}

impl ChartCatalog {
    pub fn new(charts: Vec<Chart>) -> Self {
        let index = charts
            .iter()
            .enumerate()
            .map(|(position, chart)| (chart.id, position))
            .collect();
        Self { charts, index }
    }

    pub fn get(&self, id: &Uuid) -> Option<&Chart> {
        self.index.get(id).map(|&position| &self.charts[position])
    }

    pub fn iter(&self) -> impl Iterator<Item = &Chart> {
        self.charts.iter()
    }
}
