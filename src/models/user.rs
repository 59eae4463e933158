// src/models/user.rs

use serde::{Deserialize, Serialize};
use validator::Validate;

/// A registered player held by the user store.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: String,

    /// Unique display name, shown on the leaderboard.
    pub username: String,

    /// Argon2 password hash.
    /// Skipped during serialization to prevent leaking sensitive data.
    #[serde(skip)]
    pub password: String,

    /// User role: 'user' or 'admin'.
    pub role: String,

    pub created_at: chrono::DateTime<chrono::Utc>,
}

/// DTO for registration and login.
#[derive(Debug, Deserialize, Validate)]
pub struct CreateUserRequest {
    #[validate(length(
        min = 3,
        max = 50,
        message = "Username length must be between 3 and 50 characters."
    ))]
    pub username: String,
    #[validate(length(
        min = 4,
        max = 128,
        message = "Password length must be between 4 and 128 characters."
    ))]
    pub password: String,
}
