// src/engine/report.rs

use serde::Serialize;

use crate::engine::{
    EngineError,
    scoring::{format_time, percentage},
};
use crate::models::{attempt::QuizAttempt, quiz::Quiz};

const NOT_ANSWERED: &str = "Not answered";

/// What the results screen shows for a completed attempt. Built once, from
/// the quiz version the attempt was scored against, and kept as is.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AttemptReport {
    pub attempt: QuizAttempt,
    pub quiz_title: String,
    pub percentage: u32,
    pub time_taken: String,
    pub questions: Vec<QuestionReport>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QuestionReport {
    pub question_id: String,
    pub question: String,
    pub your_answer: String,
    pub correct_answer: Option<String>,
    pub is_correct: bool,
    pub explanation: Option<String>,
}

impl AttemptReport {
    /// Fails with [`EngineError::UnknownQuestion`] when `quiz` is not the
    /// version `attempt` was scored against.
    pub fn build(quiz: &Quiz, attempt: QuizAttempt) -> Result<Self, EngineError> {
        let percentage = percentage(attempt.score, attempt.total_questions)?;

        let questions = attempt
            .answers
            .iter()
            .map(|answer| {
                let question = quiz.question(&answer.question_id).ok_or_else(|| {
                    EngineError::UnknownQuestion {
                        question_id: answer.question_id.clone(),
                    }
                })?;
                let your_answer = question
                    .option(&answer.selected_option_id)
                    .map(|o| o.text.clone())
                    .unwrap_or_else(|| NOT_ANSWERED.to_string());

                Ok(QuestionReport {
                    question_id: question.id.clone(),
                    question: question.question.clone(),
                    your_answer,
                    correct_answer: question.correct_option().map(|o| o.text.clone()),
                    is_correct: answer.is_correct,
                    explanation: question.explanation.clone(),
                })
            })
            .collect::<Result<Vec<_>, EngineError>>()?;

        Ok(Self {
            quiz_title: quiz.title.clone(),
            percentage,
            time_taken: format_time(attempt.time_spent),
            questions,
            attempt,
        })
    }
}
