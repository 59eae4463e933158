// src/engine/mod.rs

pub mod attempt;
pub mod report;
pub mod scoring;

use std::fmt;

pub use attempt::{Advance, AttemptEngine, AttemptPhase};
pub use report::AttemptReport;

/// Contract breaches by whoever drives an [`AttemptEngine`].
///
/// None of these change the engine's state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EngineError {
    /// The quiz has no questions.
    EmptyQuiz,

    /// The attempt has already been scored.
    NotInProgress,

    /// An answer was given for a question other than the current one.
    NotCurrentQuestion { expected: String, got: String },

    /// `advance()` was called before the current question was answered.
    Unanswered { question_id: String },

    /// `retreat()` was called on the first question.
    AtFirstQuestion,

    /// An attempt names a question the quiz it is reported against lacks.
    UnknownQuestion { question_id: String },
}

impl fmt::Display for EngineError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EngineError::EmptyQuiz => write!(f, "Quiz has no questions"),
            EngineError::NotInProgress => write!(f, "Attempt is already finished"),
            EngineError::NotCurrentQuestion { expected, got } => write!(
                f,
                "Question '{}' is not the current question ('{}')",
                got, expected
            ),
            EngineError::Unanswered { question_id } => {
                write!(f, "Question '{}' must be answered first", question_id)
            }
            EngineError::AtFirstQuestion => write!(f, "Already at the first question"),
            EngineError::UnknownQuestion { question_id } => {
                write!(f, "Question '{}' is not part of the quiz", question_id)
            }
        }
    }
}

impl std::error::Error for EngineError {}
