pub mod activity;
pub mod types;
pub mod week;
pub mod weekly;
pub mod weights;

pub use activity::{ActivityLevel, ActivitySummary};
pub use types::{Difficulty, DifficultyCounts, SubmissionCalendar};
pub use week::WeekBounds;
pub use weekly::{BreakdownSource, BreakdownStrategy, WeeklyActivity, compute_weekly};
pub use weights::{base_score, legacy_performance_score, score_counts};
