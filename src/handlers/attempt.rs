// src/handlers/attempt.rs

use std::sync::Arc;

use axum::{
    Extension, Json,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
};
use serde::Serialize;
use uuid::Uuid;

use crate::{
    engine::{
        Advance, AttemptEngine, AttemptPhase, AttemptReport,
        scoring::{format_time, percentage},
    },
    error::AppError,
    models::{
        attempt::{LeaderboardEntry, QuizAttempt, SelectAnswerRequest, StartAttemptRequest},
        quiz::{PublicQuestion, Quiz},
    },
    sessions::{AttemptSession, SharedSession},
    state::AppState,
    utils::jwt::Claims,
};

/// Snapshot of a running attempt, as the quiz screen needs it.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AttemptView {
    pub session_id: Uuid,
    pub quiz_id: String,
    pub quiz_title: String,
    pub phase: AttemptPhase,
    /// 1-based, for "Question 2 of 5".
    pub question_number: usize,
    pub total_questions: usize,
    pub question: PublicQuestion,
    pub selected_option_id: Option<String>,
    pub time_spent: u64,
    pub time_display: String,
    pub time_limit: Option<u32>,
    pub over_time_limit: bool,
    pub can_go_back: bool,
    pub can_advance: bool,
    pub is_last_question: bool,
}

impl AttemptView {
    fn of(session_id: Uuid, engine: &AttemptEngine) -> Result<Self, AppError> {
        let index = engine.current_index()?;
        let question = engine.current_question()?;
        let quiz = engine.quiz();
        let selected = engine.selected_for(&question.id).map(str::to_string);

        Ok(Self {
            session_id,
            quiz_id: quiz.id.clone(),
            quiz_title: quiz.title.clone(),
            phase: engine.phase(),
            question_number: index + 1,
            total_questions: quiz.questions.len(),
            question: PublicQuestion::from(question),
            can_advance: selected.is_some(),
            selected_option_id: selected,
            time_spent: engine.time_spent(),
            time_display: format_time(engine.time_spent()),
            time_limit: quiz.time_limit,
            over_time_limit: engine.over_time_limit(),
            can_go_back: index > 0,
            is_last_question: index + 1 == quiz.questions.len(),
        })
    }
}

/// Result of a navigation step.
#[derive(Debug, Serialize)]
#[serde(tag = "status", rename_all = "camelCase")]
pub enum StepResponse {
    InProgress { attempt: AttemptView },
    Completed { report: AttemptReport },
}

async fn owned_session(
    state: &AppState,
    session_id: &Uuid,
    claims: &Claims,
) -> Result<SharedSession, AppError> {
    let session = state
        .sessions
        .get(session_id)
        .await
        .ok_or_else(|| AppError::NotFound(format!("Attempt '{}' not found", session_id)))?;

    if session.lock().await.owner_id != claims.sub {
        return Err(AppError::Forbidden(
            "This attempt belongs to another user".to_string(),
        ));
    }
    Ok(session)
}

/// Hands a finished attempt to the attempt history, the result store and the
/// leaderboard.
async fn record_attempt(
    state: &AppState,
    quiz: &Quiz,
    report: &AttemptReport,
    user_name: &str,
) -> Result<(), AppError> {
    let attempt = &report.attempt;
    state.attempts.upsert(attempt.clone()).await?;
    state.reports.upsert(report.clone()).await?;
    state
        .leaderboard
        .upsert(LeaderboardEntry {
            id: attempt.id.clone(),
            user_id: attempt.user_id.clone(),
            user_name: user_name.to_string(),
            quiz_id: quiz.id.clone(),
            quiz_title: quiz.title.clone(),
            score: attempt.score,
            total_questions: attempt.total_questions,
            date_attempted: attempt.date_attempted,
        })
        .await?;
    Ok(())
}

/// Starts a fresh attempt at a quiz for the caller.
pub async fn start_attempt(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Json(req): Json<StartAttemptRequest>,
) -> Result<impl IntoResponse, AppError> {
    let quiz = state
        .catalog
        .get(&req.quiz_id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Quiz '{}' not found", req.quiz_id)))?;

    let engine = AttemptEngine::new(Arc::new(quiz), claims.sub.clone())?;
    let quiz_id = engine.quiz().id.clone();

    let (session_id, session) = state
        .sessions
        .insert(AttemptSession {
            owner_id: claims.sub.clone(),
            engine,
        })
        .await;
    tracing::info!(
        "User {} started attempt {} on quiz {}",
        claims.name,
        session_id,
        quiz_id
    );

    let guard = session.lock().await;
    let view = AttemptView::of(session_id, &guard.engine)?;

    Ok((StatusCode::CREATED, Json(view)))
}

pub async fn get_attempt(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Path(session_id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    let session = owned_session(&state, &session_id, &claims).await?;
    let guard = session.lock().await;
    Ok(Json(AttemptView::of(session_id, &guard.engine)?))
}

/// Records the caller's choice for the current question.
pub async fn select_answer(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Path(session_id): Path<Uuid>,
    Json(req): Json<SelectAnswerRequest>,
) -> Result<impl IntoResponse, AppError> {
    let session = owned_session(&state, &session_id, &claims).await?;
    let mut guard = session.lock().await;

    guard
        .engine
        .select_answer(&req.question_id, &req.option_id)
        .inspect_err(|e| tracing::warn!("Attempt {}: answer refused: {}", session_id, e))?;

    Ok(Json(AttemptView::of(session_id, &guard.engine)?))
}

/// Moves to the next question. On the last question this scores the attempt,
/// records it and ends the session.
pub async fn next_question(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Path(session_id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    let session = owned_session(&state, &session_id, &claims).await?;
    let mut guard = session.lock().await;

    let step = guard
        .engine
        .advance()
        .inspect_err(|e| tracing::warn!("Attempt {}: advance refused: {}", session_id, e))?;

    match step {
        Advance::Moved(_) => Ok(Json(StepResponse::InProgress {
            attempt: AttemptView::of(session_id, &guard.engine)?,
        })),
        Advance::Completed(attempt) => {
            let quiz = guard.engine.quiz().clone();
            drop(guard);
            state.sessions.remove(&session_id).await;

            let report = AttemptReport::build(&quiz, attempt)?;
            record_attempt(&state, &quiz, &report, &claims.name)
                .await
                .map_err(|e| {
                    tracing::error!("Attempt {} could not be recorded: {}", report.attempt.id, e);
                    e
                })?;

            tracing::info!(
                "User {} finished quiz {}: {}/{} in {}s",
                claims.name,
                quiz.id,
                report.attempt.score,
                report.attempt.total_questions,
                report.attempt.time_spent
            );

            Ok(Json(StepResponse::Completed { report }))
        }
    }
}

pub async fn previous_question(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Path(session_id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    let session = owned_session(&state, &session_id, &claims).await?;
    let mut guard = session.lock().await;

    guard.engine.retreat()?;

    Ok(Json(AttemptView::of(session_id, &guard.engine)?))
}

/// Drops an unfinished attempt. Nothing is recorded.
pub async fn abandon_attempt(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Path(session_id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    owned_session(&state, &session_id, &claims).await?;
    state.sessions.remove(&session_id).await;
    tracing::info!("User {} abandoned attempt {}", claims.name, session_id);

    Ok(StatusCode::NO_CONTENT)
}

/// Result breakdown of a completed attempt. Visible to its owner and admins.
///
/// Served as it was built at submission, so later edits or removal of the
/// quiz do not change it.
pub async fn get_result(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Path(attempt_id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let report = state
        .reports
        .get(&attempt_id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Result '{}' not found", attempt_id)))?;

    if report.attempt.user_id != claims.sub && !claims.is_admin() {
        return Err(AppError::Forbidden(
            "This result belongs to another user".to_string(),
        ));
    }

    Ok(Json(report))
}

/// Completed attempts of the caller, newest first.
pub async fn my_attempts(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
) -> Result<impl IntoResponse, AppError> {
    let mut attempts = state
        .attempts
        .find(&|a: &QuizAttempt| a.user_id == claims.sub)
        .await?;
    attempts.sort_by(|a, b| b.date_attempted.cmp(&a.date_attempted));

    Ok(Json(attempts))
}

/// Dashboard totals for the caller.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AttemptSummary {
    pub total_attempts: usize,
    pub quizzes_created: usize,
    /// Correct answers over all questions answered, rounded. `None` until
    /// the first attempt is completed.
    pub success_rate: Option<u32>,
}

pub async fn my_summary(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
) -> Result<impl IntoResponse, AppError> {
    let attempts = state
        .attempts
        .find(&|a: &QuizAttempt| a.user_id == claims.sub)
        .await?;
    let quizzes_created = state
        .catalog
        .find(&|q: &Quiz| q.created_by == claims.name)
        .await?
        .len();

    let success_rate = if attempts.is_empty() {
        None
    } else {
        let score = attempts.iter().map(|a| a.score).sum();
        let total = attempts.iter().map(|a| a.total_questions).sum();
        Some(percentage(score, total)?)
    };

    Ok(Json(AttemptSummary {
        total_attempts: attempts.len(),
        quizzes_created,
        success_rate,
    }))
}
