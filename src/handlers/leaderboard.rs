// src/handlers/leaderboard.rs

use std::cmp::Ordering;

use axum::{
    Json,
    extract::{Query, State},
    response::IntoResponse,
};

use crate::{
    config::DEFAULT_LEADERBOARD_LIMIT,
    error::AppError,
    models::attempt::{LeaderboardEntry, LeaderboardQuery},
    state::AppState,
};

/// Higher percentage first, then the more recent attempt.
///
/// Percentages are compared by cross-multiplying the integer scores.
pub fn rank(a: &LeaderboardEntry, b: &LeaderboardEntry) -> Ordering {
    let lhs = b.score * a.total_questions;
    let rhs = a.score * b.total_questions;
    lhs.cmp(&rhs)
        .then_with(|| b.date_attempted.cmp(&a.date_attempted))
}

fn accepts(query: &LeaderboardQuery, entry: &LeaderboardEntry) -> bool {
    let quiz_ok = query
        .quiz_id
        .as_deref()
        .filter(|q| *q != "all")
        .is_none_or(|q| entry.quiz_id == q);
    let name_ok = query
        .search
        .as_deref()
        .is_none_or(|s| entry.user_name.to_lowercase().contains(&s.to_lowercase()));
    quiz_ok && name_ok
}

/// Ranked leaderboard, optionally for one quiz and filtered by player name.
pub async fn get_leaderboard(
    State(state): State<AppState>,
    Query(query): Query<LeaderboardQuery>,
) -> Result<impl IntoResponse, AppError> {
    let mut entries = state
        .leaderboard
        .find(&|e: &LeaderboardEntry| accepts(&query, e))
        .await?;

    entries.sort_by(rank);
    entries.truncate(query.limit.unwrap_or(DEFAULT_LEADERBOARD_LIMIT));

    Ok(Json(entries))
}
