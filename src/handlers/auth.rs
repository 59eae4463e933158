// src/handlers/auth.rs

use axum::{Json, extract::State, http::StatusCode, response::IntoResponse};
use serde_json::json;
use validator::Validate;

use crate::{
    error::AppError,
    models::user::{CreateUserRequest, User},
    state::AppState,
    utils::{
        hash::{hash_password, verify_password},
        jwt::sign_jwt,
    },
};

async fn find_by_username(state: &AppState, username: &str) -> Result<Option<User>, AppError> {
    let matches = state
        .users
        .find(&|u: &User| u.username.eq_ignore_ascii_case(username))
        .await?;
    Ok(matches.into_iter().next())
}

fn username_taken(username: &str) -> AppError {
    AppError::Conflict(format!("Username '{}' already exists", username))
}

/// Stores a new user unless the name is taken.
pub async fn create_user(
    state: &AppState,
    username: &str,
    password: &str,
    role: &str,
) -> Result<User, AppError> {
    // Skip the hash for names that are obviously taken
    if find_by_username(state, username).await?.is_some() {
        return Err(username_taken(username));
    }

    let user = User {
        id: uuid::Uuid::new_v4().to_string(),
        username: username.to_string(),
        password: hash_password(password)?,
        role: role.to_string(),
        created_at: chrono::Utc::now(),
    };

    state
        .users
        .insert_unique(user, &|u: &User| u.username.eq_ignore_ascii_case(username))
        .await?
        .ok_or_else(|| username_taken(username))
}

/// Registers a new user.
///
/// Hashes the password using Argon2 before storing it.
/// Returns 201 Created and the user object (excluding password).
pub async fn register(
    State(state): State<AppState>,
    Json(payload): Json<CreateUserRequest>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;

    let user = create_user(&state, &payload.username, &payload.password, "user").await?;
    tracing::info!("Registered user {}", user.username);

    Ok((StatusCode::CREATED, Json(user)))
}

/// Authenticates a user and returns a JWT token.
pub async fn login(
    State(state): State<AppState>,
    Json(payload): Json<CreateUserRequest>,
) -> Result<impl IntoResponse, AppError> {
    let user = find_by_username(&state, &payload.username)
        .await?
        .ok_or(AppError::AuthError("User not found".to_string()))?;

    if !verify_password(&payload.password, &user.password)? {
        return Err(AppError::AuthError("Invalid password".to_string()));
    }

    let token = sign_jwt(&user, &state.config.jwt_secret, state.config.jwt_expiration)?;

    Ok(Json(json!({
        "token": token,
        "type": "Bearer",
        "user": user,
    })))
}
