use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Per-user gamification progress.
///
/// `level` is always `1 + points / 500`; `badges` only ever grows and keeps
/// the order in which thresholds were crossed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AchievementState {
    pub user_id: String,
    pub points: u32,
    pub streak: u32,
    pub level: u32,
    pub badges: Vec<String>,
    pub last_action_date: Option<NaiveDate>,
}

impl AchievementState {
    /// Zero state for a user seen for the first time.
    pub fn new(user_id: &str) -> Self {
        Self {
            user_id: user_id.to_string(),
            points: 0,
            streak: 0,
            level: 1,
            badges: Vec::new(),
            last_action_date: None,
        }
    }
}
