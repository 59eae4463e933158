// src/routes.rs

use axum::{
    Router,
    http::{HeaderValue, Method, header},
    middleware,
    routing::{get, post, put},
};
use tower::ServiceBuilder;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::{
    handlers::{admin, attempt, auth, leaderboard, quiz},
    state::AppState,
    utils::jwt::{admin_middleware, auth_middleware},
};

/// Assembles the main application router.
///
/// * Merges all sub-routers (auth, quizzes, attempts, leaderboard, admin).
/// * Applies global middleware (Trace, CORS).
/// * Injects global state.
pub fn create_router(state: AppState) -> Router {
    let origins = [
        HeaderValue::from_static("http://localhost:5173"),
        HeaderValue::from_static("http://127.0.0.1:5173"),
    ];

    let cors = CorsLayer::new()
        .allow_origin(origins)
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
        .allow_headers([header::AUTHORIZATION, header::CONTENT_TYPE]);

    let auth_layer = middleware::from_fn_with_state(state.clone(), auth_middleware);

    let auth_routes = Router::new()
        .route("/register", post(auth::register))
        .route("/login", post(auth::login));

    let quiz_routes = Router::new()
        .route(
            "/",
            get(quiz::list_quizzes)
                // Creating a quiz needs a signed-in author
                .merge(post(quiz::create_quiz).layer(auth_layer.clone())),
        )
        .route("/{id}", get(quiz::get_quiz));

    let attempt_routes = Router::new()
        .route("/", post(attempt::start_attempt))
        .route(
            "/{id}",
            get(attempt::get_attempt).delete(attempt::abandon_attempt),
        )
        .route("/{id}/answer", post(attempt::select_answer))
        .route("/{id}/next", post(attempt::next_question))
        .route("/{id}/previous", post(attempt::previous_question))
        .layer(auth_layer.clone());

    let result_routes = Router::new()
        .route("/{id}", get(attempt::get_result))
        .layer(auth_layer.clone());

    let me_routes = Router::new()
        .route("/attempts", get(attempt::my_attempts))
        .route("/quizzes", get(quiz::my_quizzes))
        .route("/summary", get(attempt::my_summary))
        .layer(auth_layer.clone());

    let admin_routes = Router::new()
        .route("/users", get(admin::list_users))
        .route(
            "/quizzes/{id}",
            put(admin::update_quiz).delete(admin::delete_quiz),
        )
        // Double middleware protection: Auth first, then Admin check
        .layer(middleware::from_fn(admin_middleware))
        .layer(auth_layer);

    Router::new()
        .nest("/api/auth", auth_routes)
        .nest("/api/quizzes", quiz_routes)
        .nest("/api/attempts", attempt_routes)
        .nest("/api/results", result_routes)
        .nest("/api/me", me_routes)
        .route("/api/leaderboard", get(leaderboard::get_leaderboard))
        .nest("/api/admin", admin_routes)
        // Global Middleware (applied from outside in)
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(cors),
        )
        .with_state(state)
}
