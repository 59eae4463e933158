// src/engine/attempt.rs

use std::collections::HashMap;
use std::sync::Arc;

use serde::Serialize;

use crate::engine::{EngineError, scoring::score_answers};
use crate::models::{
    attempt::QuizAttempt,
    quiz::{Quiz, QuizQuestion},
};

/// Where an attempt currently stands.
///
/// `Submitting` only exists for the duration of the final `advance()` call,
/// while the score is computed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "state", rename_all = "camelCase")]
pub enum AttemptPhase {
    #[serde(rename_all = "camelCase")]
    InProgress { current_question_index: usize },
    Submitting,
    Results,
}

/// Outcome of a successful `advance()`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Advance {
    /// Moved on to the question at this index.
    Moved(usize),
    /// The last question was passed and the attempt has been scored.
    Completed(QuizAttempt),
}

/// Drives one user through one quiz, exactly once.
///
/// The engine owns no timer. Whoever hosts it calls
/// [`elapse_one_second`](Self::elapse_one_second) at 1 Hz until the attempt
/// reaches [`AttemptPhase::Results`].
#[derive(Debug)]
pub struct AttemptEngine {
    quiz: Arc<Quiz>,
    user_id: String,
    phase: AttemptPhase,
    selected_answers: HashMap<String, String>,
    time_spent: u64,
    result: Option<QuizAttempt>,
}

impl AttemptEngine {
    pub fn new(quiz: Arc<Quiz>, user_id: impl Into<String>) -> Result<Self, EngineError> {
        if quiz.questions.is_empty() {
            return Err(EngineError::EmptyQuiz);
        }

        Ok(Self {
            quiz,
            user_id: user_id.into(),
            phase: AttemptPhase::InProgress {
                current_question_index: 0,
            },
            selected_answers: HashMap::new(),
            time_spent: 0,
            result: None,
        })
    }

    pub fn quiz(&self) -> &Arc<Quiz> {
        &self.quiz
    }

    pub fn user_id(&self) -> &str {
        &self.user_id
    }

    pub fn phase(&self) -> AttemptPhase {
        self.phase
    }

    pub fn time_spent(&self) -> u64 {
        self.time_spent
    }

    pub fn selected_answers(&self) -> &HashMap<String, String> {
        &self.selected_answers
    }

    pub fn selected_for(&self, question_id: &str) -> Option<&str> {
        self.selected_answers.get(question_id).map(String::as_str)
    }

    /// The attempt produced on completion, if any.
    pub fn result(&self) -> Option<&QuizAttempt> {
        self.result.as_ref()
    }

    pub fn is_finished(&self) -> bool {
        self.phase == AttemptPhase::Results
    }

    pub fn current_index(&self) -> Result<usize, EngineError> {
        match self.phase {
            AttemptPhase::InProgress {
                current_question_index,
            } => Ok(current_question_index),
            _ => Err(EngineError::NotInProgress),
        }
    }

    pub fn current_question(&self) -> Result<&QuizQuestion, EngineError> {
        let index = self.current_index()?;
        Ok(&self.quiz.questions[index])
    }

    /// `true` once the advisory time limit has passed. Display only.
    pub fn over_time_limit(&self) -> bool {
        self.quiz
            .time_limit
            .is_some_and(|minutes| self.time_spent > u64::from(minutes) * 60)
    }

    /// Records `option_id` for the current question. Last choice wins.
    ///
    /// The option id is not checked against the question's options; an
    /// unknown id simply scores as incorrect.
    pub fn select_answer(&mut self, question_id: &str, option_id: &str) -> Result<(), EngineError> {
        let current = self.current_question()?;
        if current.id != question_id {
            return Err(EngineError::NotCurrentQuestion {
                expected: current.id.clone(),
                got: question_id.to_string(),
            });
        }

        self.selected_answers
            .insert(question_id.to_string(), option_id.to_string());
        Ok(())
    }

    /// Moves to the next question, or scores the attempt when called on the
    /// last one. The current question must have an answer.
    pub fn advance(&mut self) -> Result<Advance, EngineError> {
        let index = self.current_index()?;
        let question_id = &self.quiz.questions[index].id;
        if !self.selected_answers.contains_key(question_id) {
            return Err(EngineError::Unanswered {
                question_id: question_id.clone(),
            });
        }

        if index + 1 < self.quiz.questions.len() {
            self.phase = AttemptPhase::InProgress {
                current_question_index: index + 1,
            };
            return Ok(Advance::Moved(index + 1));
        }

        self.phase = AttemptPhase::Submitting;
        let attempt = self.submit();
        self.result = Some(attempt.clone());
        self.phase = AttemptPhase::Results;

        tracing::debug!(
            attempt_id = %attempt.id,
            quiz_id = %attempt.quiz_id,
            score = attempt.score,
            total = attempt.total_questions,
            "attempt scored"
        );

        Ok(Advance::Completed(attempt))
    }

    /// Steps back one question. Answers are kept.
    pub fn retreat(&mut self) -> Result<usize, EngineError> {
        let index = self.current_index()?;
        if index == 0 {
            return Err(EngineError::AtFirstQuestion);
        }

        self.phase = AttemptPhase::InProgress {
            current_question_index: index - 1,
        };
        Ok(index - 1)
    }

    pub fn elapse_one_second(&mut self) -> Result<u64, EngineError> {
        self.current_index()?;
        self.time_spent += 1;
        Ok(self.time_spent)
    }

    fn submit(&self) -> QuizAttempt {
        let (score, answers) = score_answers(&self.quiz, &self.selected_answers);

        QuizAttempt {
            id: uuid::Uuid::new_v4().to_string(),
            user_id: self.user_id.clone(),
            quiz_id: self.quiz.id.clone(),
            score,
            total_questions: self.quiz.questions.len(),
            date_attempted: chrono::Utc::now(),
            time_spent: self.time_spent,
            answers,
        }
    }
}
