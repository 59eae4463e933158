// src/handlers/quiz.rs

use axum::{
    Extension, Json,
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
};
use validator::Validate;

use crate::{
    error::AppError,
    models::quiz::{CreateQuizRequest, PublicQuiz, Quiz, QuizFilter, QuizOption, QuizQuestion},
    state::AppState,
    utils::{html::clean_quiz_request, jwt::Claims},
};

/// Validates and sanitizes a submission, then assembles the catalog record.
///
/// Question and option ids are generated fresh every time.
pub fn build_quiz(
    id: String,
    created_by: String,
    created_at: chrono::DateTime<chrono::Utc>,
    mut req: CreateQuizRequest,
) -> Result<Quiz, AppError> {
    req.validate()?;
    clean_quiz_request(&mut req);

    let questions = req
        .questions
        .into_iter()
        .map(|q| {
            let question_id = uuid::Uuid::new_v4().to_string();
            QuizQuestion {
                options: q
                    .options
                    .into_iter()
                    .map(|o| QuizOption {
                        id: uuid::Uuid::new_v4().to_string(),
                        text: o.text,
                        is_correct: o.is_correct,
                    })
                    .collect(),
                id: question_id,
                question: q.question,
                explanation: q.explanation.filter(|e| !e.trim().is_empty()),
            }
        })
        .collect();

    Ok(Quiz {
        id,
        title: req.title,
        description: req.description,
        created_by,
        created_at,
        category: req.category,
        difficulty: req.difficulty,
        questions,
        time_limit: req.time_limit,
        tags: req.tags,
        image_url: req.image_url,
    })
}

/// Lists the catalog, optionally filtered by search term, category and
/// difficulty.
pub async fn list_quizzes(
    State(state): State<AppState>,
    Query(filter): Query<QuizFilter>,
) -> Result<impl IntoResponse, AppError> {
    let quizzes = state.catalog.find(&|q: &Quiz| filter.accepts(q)).await?;
    let public: Vec<PublicQuiz> = quizzes.iter().map(PublicQuiz::from).collect();

    Ok(Json(public))
}

/// Returns one quiz without its answer key.
pub async fn get_quiz(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let quiz = state
        .catalog
        .get(&id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Quiz '{}' not found", id)))?;

    Ok(Json(PublicQuiz::from(&quiz)))
}

/// Creates a quiz authored by the caller.
pub async fn create_quiz(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Json(payload): Json<CreateQuizRequest>,
) -> Result<impl IntoResponse, AppError> {
    let quiz = build_quiz(
        uuid::Uuid::new_v4().to_string(),
        claims.name.clone(),
        chrono::Utc::now(),
        payload,
    )?;

    let quiz = state.catalog.upsert(quiz).await?;
    tracing::info!(
        "Quiz '{}' ({}, {} questions) created by {}",
        quiz.title,
        quiz.difficulty.as_str(),
        quiz.questions.len(),
        quiz.created_by
    );

    Ok((StatusCode::CREATED, Json(PublicQuiz::from(&quiz))))
}

/// Quizzes the caller has authored, newest first.
pub async fn my_quizzes(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
) -> Result<impl IntoResponse, AppError> {
    let mut quizzes = state
        .catalog
        .find(&|q: &Quiz| q.created_by == claims.name)
        .await?;
    quizzes.sort_by(|a, b| b.created_at.cmp(&a.created_at));
    let public: Vec<PublicQuiz> = quizzes.iter().map(PublicQuiz::from).collect();

    Ok(Json(public))
}
