// src/engine/scoring.rs

use std::collections::HashMap;

use crate::engine::EngineError;
use crate::models::{attempt::AnswerRecord, quiz::Quiz};

/// Grades a set of selections against a quiz.
///
/// Walks the questions in quiz order, not in the order they were answered.
/// A missing selection is recorded as an empty option id; a selection that
/// names no option of its question scores as incorrect.
///
/// Returns `(score, answers)`.
pub fn score_answers(quiz: &Quiz, selected: &HashMap<String, String>) -> (usize, Vec<AnswerRecord>) {
    let answers: Vec<AnswerRecord> = quiz
        .questions
        .iter()
        .map(|question| {
            let selected_option_id = selected.get(&question.id).cloned().unwrap_or_default();
            let is_correct = question
                .option(&selected_option_id)
                .is_some_and(|o| o.is_correct);

            AnswerRecord {
                question_id: question.id.clone(),
                selected_option_id,
                is_correct,
            }
        })
        .collect();

    let score = answers.iter().filter(|a| a.is_correct).count();
    (score, answers)
}

/// Whole-number percentage, rounding half up.
pub fn percentage(score: usize, total: usize) -> Result<u32, EngineError> {
    if total == 0 {
        return Err(EngineError::EmptyQuiz);
    }
    let pct = (score * 200 + total) / (total * 2);
    Ok(pct as u32)
}

/// Formats seconds as `MM:SS`. Minutes keep growing past 99.
pub fn format_time(seconds: u64) -> String {
    format!("{:02}:{:02}", seconds / 60, seconds % 60)
}
