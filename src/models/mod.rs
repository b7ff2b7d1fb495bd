pub mod chart;
pub mod recommendation;
pub mod score;
pub mod tier_list;
pub mod title;

pub use chart::{Chart, ChartCatalog, ChartType, DifficultyLevel, Mix};
pub use recommendation::{Bounty, ChartRecommendation, Feedback, RecommendationCategory};
pub use score::{CompetitiveScore, PhoenixLetterGrade, PhoenixScore, RecordedScore};
pub use tier_list::{RelativeTier, TierListCategory, TierListEntry, TierListName};
pub use title::{ChartMatcher, Title, TitleDefinition, TitleProgress};
