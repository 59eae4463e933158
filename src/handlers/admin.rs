// src/handlers/admin.rs

use axum::{
    Json,
    extract::{Extension, Path, State},
    http::StatusCode,
    response::IntoResponse,
};

use crate::{
    error::AppError,
    handlers::quiz::build_quiz,
    models::quiz::{CreateQuizRequest, PublicQuiz},
    state::AppState,
    utils::jwt::Claims,
};

/// Lists all users in the system.
/// Admin only.
pub async fn list_users(State(state): State<AppState>) -> Result<impl IntoResponse, AppError> {
    let users = state.users.list().await?;
    Ok(Json(users))
}

/// Replaces a quiz wholesale, or creates it under the given id.
/// Admin only.
///
/// Attempts already running keep the version they started with.
pub async fn update_quiz(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Path(id): Path<String>,
    Json(payload): Json<CreateQuizRequest>,
) -> Result<impl IntoResponse, AppError> {
    let existing = state.catalog.get(&id).await?;
    let (created_by, created_at, status) = match &existing {
        Some(q) => (q.created_by.clone(), q.created_at, StatusCode::OK),
        None => (claims.name.clone(), chrono::Utc::now(), StatusCode::CREATED),
    };

    let quiz = build_quiz(id, created_by, created_at, payload)?;
    let quiz = state.catalog.upsert(quiz).await?;
    tracing::info!("Admin {} saved quiz {}", claims.name, quiz.id);

    Ok((status, Json(PublicQuiz::from(&quiz))))
}

/// Removes a quiz from the catalog.
/// Admin only.
pub async fn delete_quiz(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    if !state.catalog.delete(&id).await? {
        return Err(AppError::NotFound(format!("Quiz '{}' not found", id)));
    }

    tracing::info!("Admin {} deleted quiz {}", claims.name, id);
    Ok(StatusCode::NO_CONTENT)
}
