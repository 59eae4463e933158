// src/models/attempt.rs

use serde::{Deserialize, Serialize};

/// The outcome of one completed attempt. Produced once by the engine and
/// never modified afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuizAttempt {
    pub id: String,
    pub user_id: String,
    pub quiz_id: String,
    /// Number of correctly answered questions.
    pub score: usize,
    pub total_questions: usize,
    pub date_attempted: chrono::DateTime<chrono::Utc>,
    /// Seconds between the start of the attempt and its submission.
    pub time_spent: u64,
    /// One entry per question, in quiz order.
    pub answers: Vec<AnswerRecord>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnswerRecord {
    pub question_id: String,
    /// Empty when the question was never answered.
    pub selected_option_id: String,
    pub is_correct: bool,
}

/// A row of the public leaderboard.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LeaderboardEntry {
    pub id: String,
    pub user_id: String,
    pub user_name: String,
    pub quiz_id: String,
    pub quiz_title: String,
    pub score: usize,
    pub total_questions: usize,
    pub date_attempted: chrono::DateTime<chrono::Utc>,
}

/// Query string for `GET /api/leaderboard`.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LeaderboardQuery {
    pub quiz_id: Option<String>,
    /// Substring of the player name, case-insensitive.
    pub search: Option<String>,
    pub limit: Option<usize>,
}

/// DTO for starting an attempt.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StartAttemptRequest {
    pub quiz_id: String,
}

/// DTO for choosing an option on the current question.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SelectAnswerRequest {
    pub question_id: String,
    pub option_id: String,
}
