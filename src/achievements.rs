//! Points, streaks, levels and badges advanced by user actions.
//!
//! Every mutation is one `BEGIN IMMEDIATE` transaction: the row is read and
//! rewritten while holding SQLite's write lock, so concurrent actions for the
//! same user serialize instead of losing updates.

use chrono::{NaiveDate, Utc};
use rusqlite::{Connection, Transaction, TransactionBehavior};

use crate::db::repository::{get_achievement, upsert_achievement};
use crate::db::DatabaseError;
use crate::models::{AchievementState, Action, DailyRepeatPolicy};
use crate::pipeline::import::ValidationError;

/// Points needed per level.
pub const POINTS_PER_LEVEL: u32 = 500;

/// Badges awarded when points reach each threshold, in award order.
pub const BADGE_THRESHOLDS: &[(u32, &str)] = &[
    (200, "Wellness Scout"),
    (500, "Health Guardian"),
    (1000, "Vitality Hero"),
];

#[derive(Debug, thiserror::Error)]
pub enum AchievementError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("Database error: {0}")]
    Database(#[from] DatabaseError),
}

impl From<rusqlite::Error> for AchievementError {
    fn from(e: rusqlite::Error) -> Self {
        Self::Database(DatabaseError::from(e))
    }
}

/// Parse an action name exactly as clients send it (`"upload"`, `"daily"`, ...).
pub fn parse_action(name: &str) -> Result<Action, ValidationError> {
    name.parse()
        .map_err(|_| ValidationError::UnknownAction(name.to_string()))
}

pub fn level_for(points: u32) -> u32 {
    1 + points / POINTS_PER_LEVEL
}

/// Pure transition: the state after applying `action` on `today`.
pub fn advance(
    state: &AchievementState,
    action: Action,
    today: NaiveDate,
    policy: DailyRepeatPolicy,
) -> AchievementState {
    let mut next = state.clone();

    if action == Action::Daily {
        match state.last_action_date {
            None => next.streak = 1,
            Some(last) => match (today - last).num_days() {
                1 => next.streak = state.streak.saturating_add(1),
                d if d > 1 => next.streak = 1,
                _ => {
                    // Same day, or a clock that moved backwards: the streak stands.
                    if policy == DailyRepeatPolicy::AwardOncePerDay {
                        return next;
                    }
                }
            },
        }
        next.last_action_date = Some(state.last_action_date.map_or(today, |last| last.max(today)));
    }

    next.points = state.points.saturating_add(action.points());
    for (threshold, badge) in BADGE_THRESHOLDS {
        if next.points >= *threshold && !next.badges.iter().any(|b| b == badge) {
            next.badges.push((*badge).to_string());
        }
    }
    next.level = level_for(next.points);
    next
}

/// Apply one action for a user and persist the result atomically.
pub fn apply_action(
    conn: &Connection,
    user_id: &str,
    action: Action,
    today: NaiveDate,
    policy: DailyRepeatPolicy,
) -> Result<AchievementState, AchievementError> {
    if user_id.trim().is_empty() {
        return Err(ValidationError::MissingOwner.into());
    }

    let tx = Transaction::new_unchecked(conn, TransactionBehavior::Immediate)?;
    let existing = get_achievement(&tx, user_id)?;
    let current = existing
        .clone()
        .unwrap_or_else(|| AchievementState::new(user_id));
    let next = advance(&current, action, today, policy);

    if existing.is_none() || next != current {
        upsert_achievement(&tx, &next, &Utc::now())?;
    }
    tx.commit()?;

    tracing::info!(
        user_id = %user_id,
        action = action.as_str(),
        points = next.points,
        streak = next.streak,
        level = next.level,
        "Achievement action applied"
    );
    Ok(next)
}

/// Read a user's state, creating the zero state on first access.
pub fn get_or_create(conn: &Connection, user_id: &str) -> Result<AchievementState, AchievementError> {
    if user_id.trim().is_empty() {
        return Err(ValidationError::MissingOwner.into());
    }

    let tx = Transaction::new_unchecked(conn, TransactionBehavior::Immediate)?;
    let state = match get_achievement(&tx, user_id)? {
        Some(state) => state,
        None => {
            let fresh = AchievementState::new(user_id);
            upsert_achievement(&tx, &fresh, &Utc::now())?;
            fresh
        }
    };
    tx.commit()?;
    Ok(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::sqlite::{open_database, open_memory_database};
    use std::sync::{Arc, Barrier};
    use std::time::Duration;

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 3, d).unwrap()
    }

    fn apply(conn: &Connection, action: Action, today: NaiveDate) -> AchievementState {
        apply_action(conn, "u1", action, today, DailyRepeatPolicy::AwardOncePerDay).unwrap()
    }

    #[test]
    fn first_upload_awards_fifty_points() {
        let conn = open_memory_database().unwrap();
        let state = apply(&conn, Action::Upload, day(1));
        assert_eq!(state.points, 50);
        assert_eq!(state.level, 1);
        assert!(state.badges.is_empty());
        assert_eq!(state.streak, 0);
        assert!(state.last_action_date.is_none());
    }

    #[test]
    fn badges_and_levels_follow_points() {
        let conn = open_memory_database().unwrap();
        let mut state = AchievementState::new("u1");
        for i in 1..=10 {
            state = apply(&conn, Action::Upload, day(1));
            if i == 4 {
                assert_eq!(state.points, 200);
                assert_eq!(state.badges, vec!["Wellness Scout"]);
            }
        }
        assert_eq!(state.points, 500);
        assert_eq!(state.badges, vec!["Wellness Scout", "Health Guardian"]);
        assert_eq!(state.level, 2);
    }

    #[test]
    fn point_table_per_action() {
        let conn = open_memory_database().unwrap();
        assert_eq!(apply(&conn, Action::Medicine, day(1)).points, 40);
        assert_eq!(apply(&conn, Action::Ai, day(1)).points, 70);
        assert_eq!(apply(&conn, Action::Daily, day(1)).points, 90);
    }

    #[test]
    fn daily_streak_counts_consecutive_days() {
        let conn = open_memory_database().unwrap();
        assert_eq!(apply(&conn, Action::Daily, day(1)).streak, 1);
        assert_eq!(apply(&conn, Action::Daily, day(2)).streak, 2);
        let state = apply(&conn, Action::Daily, day(3));
        assert_eq!(state.streak, 3);
        assert_eq!(state.last_action_date, Some(day(3)));
    }

    #[test]
    fn skipped_day_resets_streak() {
        let conn = open_memory_database().unwrap();
        apply(&conn, Action::Daily, day(1));
        apply(&conn, Action::Daily, day(2));
        let state = apply(&conn, Action::Daily, day(4));
        assert_eq!(state.streak, 1);
        assert_eq!(state.last_action_date, Some(day(4)));
    }

    #[test]
    fn same_day_daily_awarded_once_by_default() {
        let conn = open_memory_database().unwrap();
        let first = apply(&conn, Action::Daily, day(5));
        let second = apply(&conn, Action::Daily, day(5));
        assert_eq!(first, second);
        assert_eq!(second.points, 20);
    }

    #[test]
    fn same_day_daily_awarded_every_call_when_configured() {
        let state = AchievementState::new("u1");
        let once = advance(&state, Action::Daily, day(5), DailyRepeatPolicy::AwardEveryCall);
        let twice = advance(&once, Action::Daily, day(5), DailyRepeatPolicy::AwardEveryCall);
        assert_eq!(twice.points, 40);
        assert_eq!(twice.streak, 1);
        assert_eq!(twice.last_action_date, Some(day(5)));
    }

    #[test]
    fn earlier_date_does_not_move_last_action_back() {
        let mut state = AchievementState::new("u1");
        state.streak = 3;
        state.last_action_date = Some(day(10));
        let next = advance(&state, Action::Daily, day(9), DailyRepeatPolicy::AwardEveryCall);
        assert_eq!(next.streak, 3);
        assert_eq!(next.last_action_date, Some(day(10)));
    }

    #[test]
    fn non_daily_actions_leave_streak_alone() {
        let mut state = AchievementState::new("u1");
        state.streak = 4;
        state.last_action_date = Some(day(1));
        let next = advance(&state, Action::Ai, day(20), DailyRepeatPolicy::AwardOncePerDay);
        assert_eq!(next.streak, 4);
        assert_eq!(next.last_action_date, Some(day(1)));
    }

    #[test]
    fn badges_are_never_duplicated_or_removed() {
        let mut state = AchievementState::new("u1");
        state.points = 950;
        state.badges = vec!["Wellness Scout".into(), "Health Guardian".into()];
        let next = advance(&state, Action::Upload, day(1), DailyRepeatPolicy::AwardOncePerDay);
        assert_eq!(next.points, 1000);
        assert_eq!(next.level, 3);
        assert_eq!(next.badges, vec!["Wellness Scout", "Health Guardian", "Vitality Hero"]);
    }

    #[test]
    fn get_or_create_is_lazy_and_stable() {
        let conn = open_memory_database().unwrap();
        assert!(get_achievement(&conn, "u9").unwrap().is_none());
        let created = get_or_create(&conn, "u9").unwrap();
        assert_eq!(created, AchievementState::new("u9"));
        assert!(get_achievement(&conn, "u9").unwrap().is_some());
        assert_eq!(get_or_create(&conn, "u9").unwrap(), created);
    }

    #[test]
    fn blank_user_rejected() {
        let conn = open_memory_database().unwrap();
        let err = apply_action(&conn, " ", Action::Upload, day(1), DailyRepeatPolicy::AwardOncePerDay)
            .unwrap_err();
        assert!(matches!(err, AchievementError::Validation(ValidationError::MissingOwner)));
    }

    #[test]
    fn action_names_are_case_sensitive() {
        assert_eq!(parse_action("medicine").unwrap(), Action::Medicine);
        assert_eq!(
            parse_action("Upload"),
            Err(ValidationError::UnknownAction("Upload".into()))
        );
    }

    #[test]
    fn concurrent_actions_lose_no_update() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("achievements.db");
        drop(open_database(&path, Duration::from_secs(5)).unwrap());

        for round in 0..5 {
            let user = format!("user-{round}");
            let barrier = Arc::new(Barrier::new(2));
            let handles: Vec<_> = [Action::Upload, Action::Medicine]
                .into_iter()
                .map(|action| {
                    let path = path.clone();
                    let barrier = Arc::clone(&barrier);
                    let user = user.clone();
                    std::thread::spawn(move || {
                        let conn = open_database(&path, Duration::from_secs(5)).unwrap();
                        barrier.wait();
                        apply_action(&conn, &user, action, day(1), DailyRepeatPolicy::AwardOncePerDay)
                            .unwrap();
                    })
                })
                .collect();
            for handle in handles {
                handle.join().unwrap();
            }

            let conn = open_database(&path, Duration::from_secs(5)).unwrap();
            let state = get_achievement(&conn, &user).unwrap().unwrap();
            assert_eq!(state.points, 90);
        }
    }
}
