// tests/api_tests.rs

use std::time::Duration;

use quizmaker::{config::Config, routes, sessions::spawn_clock, state::AppState};
use serde_json::{Value, json};

fn test_config() -> Config {
    Config {
        jwt_secret: "test_secret_for_integration_tests".to_string(),
        jwt_expiration: 600, // 10 minutes for tests
        rust_log: "error".to_string(),
        bind_addr: "127.0.0.1:0".parse().unwrap(),
        log_dir: "logs".to_string(),
        admin_username: None,
        admin_password: None,
        seed_sample_data: true,
        clock_tick: Duration::from_secs(1),
    }
}

/// Helper function to spawn the app on a random port for testing.
/// Returns the base URL and the state, so tests can seed or inspect stores.
async fn spawn_app() -> (String, AppState) {
    let state = AppState::in_memory(test_config());
    let app = routes::create_router(state.clone());

    // Bind to port 0 to get a random available port
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind random port");

    let port = listener.local_addr().unwrap().port();
    let address = format!("http://127.0.0.1:{}", port);

    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    (address, state)
}

/// Registers and logs in a fresh user, returning the bearer token.
async fn sign_up(client: &reqwest::Client, address: &str) -> (String, String) {
    let username = format!("u_{}", &uuid::Uuid::new_v4().to_string()[..8]);
    let password = "password123";

    let resp = client
        .post(format!("{}/api/auth/register", address))
        .json(&json!({ "username": username, "password": password }))
        .send()
        .await
        .expect("Register failed");
    assert_eq!(resp.status().as_u16(), 201);

    let login: Value = client
        .post(format!("{}/api/auth/login", address))
        .json(&json!({ "username": username, "password": password }))
        .send()
        .await
        .expect("Login failed")
        .json()
        .await
        .expect("Failed to parse login json");

    let token = login["token"].as_str().expect("Token not found").to_string();
    (username, token)
}

/// Creates an admin account directly in the store and logs it in.
async fn admin_bearer(client: &reqwest::Client, address: &str, state: &AppState) -> String {
    quizmaker::handlers::auth::create_user(state, "root", "rootpass", "admin")
        .await
        .unwrap();

    let login: Value = client
        .post(format!("{}/api/auth/login", address))
        .json(&json!({ "username": "root", "password": "rootpass" }))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    format!("Bearer {}", login["token"].as_str().unwrap())
}

/// Runs a whole attempt, answering each question with the given option, and
/// returns the final report.
async fn complete_quiz(
    client: &reqwest::Client,
    address: &str,
    bearer: &str,
    quiz_id: &str,
    picks: &[(&str, &str)],
) -> Value {
    let view: Value = client
        .post(format!("{}/api/attempts", address))
        .header("Authorization", bearer)
        .json(&json!({ "quizId": quiz_id }))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    let session = view["sessionId"].as_str().unwrap().to_string();

    let mut last = Value::Null;
    for (question, option) in picks {
        client
            .post(format!("{}/api/attempts/{}/answer", address, session))
            .header("Authorization", bearer)
            .json(&json!({ "questionId": question, "optionId": option }))
            .send()
            .await
            .unwrap();
        last = client
            .post(format!("{}/api/attempts/{}/next", address, session))
            .header("Authorization", bearer)
            .send()
            .await
            .unwrap()
            .json()
            .await
            .unwrap();
    }

    assert_eq!(last["status"], "completed");
    last["report"].clone()
}

async fn fetch_result(
    client: &reqwest::Client,
    address: &str,
    bearer: &str,
    attempt_id: &str,
) -> reqwest::Response {
    client
        .get(format!("{}/api/results/{}", address, attempt_id))
        .header("Authorization", bearer)
        .send()
        .await
        .unwrap()
}

#[tokio::test]
async fn health_check_404() {
    let (address, _) = spawn_app().await;
    let client = reqwest::Client::new();

    let response = client
        .get(format!("{}/random_path_that_does_not_exist", address))
        .send()
        .await
        .expect("Failed to execute request");

    assert_eq!(response.status().as_u16(), 404);
}

#[tokio::test]
async fn register_fails_validation() {
    let (address, _) = spawn_app().await;
    let client = reqwest::Client::new();

    let response = client
        .post(format!("{}/api/auth/register", address))
        .json(&json!({ "username": "yo", "password": "password123" }))
        .send()
        .await
        .expect("Failed to execute request");

    assert_eq!(response.status().as_u16(), 400);
}

#[tokio::test]
async fn duplicate_username_conflicts() {
    let (address, _) = spawn_app().await;
    let client = reqwest::Client::new();
    let body = json!({ "username": "QuizFan", "password": "password123" });

    let first = client
        .post(format!("{}/api/auth/register", address))
        .json(&body)
        .send()
        .await
        .unwrap();
    let second = client
        .post(format!("{}/api/auth/register", address))
        .json(&body)
        .send()
        .await
        .unwrap();

    assert_eq!(first.status().as_u16(), 201);
    assert_eq!(second.status().as_u16(), 409);
}

#[tokio::test]
async fn catalog_hides_answer_key_and_supports_search() {
    let (address, _) = spawn_app().await;
    let client = reqwest::Client::new();

    let all: Vec<Value> = client
        .get(format!("{}/api/quizzes", address))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(all.len(), 3);

    let quiz: Value = client
        .get(format!("{}/api/quizzes/1", address))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(quiz["questionCount"], 3);
    assert!(quiz["questions"][0]["options"][0].get("isCorrect").is_none());
    assert!(quiz["questions"][0].get("explanation").is_none());

    let hits: Vec<Value> = client
        .get(format!("{}/api/quizzes?search=CINEMA", address))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(hits.len(), 1);
    assert_eq!(hits[0]["title"], "Movie Trivia");

    let hard: Vec<Value> = client
        .get(format!("{}/api/quizzes?difficulty=hard", address))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(hard.len(), 1);
    assert_eq!(hard[0]["id"], "2");

    let missing = client
        .get(format!("{}/api/quizzes/nope", address))
        .send()
        .await
        .unwrap();
    assert_eq!(missing.status().as_u16(), 404);
}

#[tokio::test]
async fn attempts_require_a_token() {
    let (address, _) = spawn_app().await;
    let client = reqwest::Client::new();

    let response = client
        .post(format!("{}/api/attempts", address))
        .json(&json!({ "quizId": "1" }))
        .send()
        .await
        .unwrap();

    assert_eq!(response.status().as_u16(), 401);
}

#[tokio::test]
async fn full_attempt_flow_scores_and_ranks() {
    let (address, state) = spawn_app().await;
    let client = reqwest::Client::new();
    let (username, token) = sign_up(&client, &address).await;
    let bearer = format!("Bearer {}", token);

    // 1. Start the General Knowledge quiz
    let start = client
        .post(format!("{}/api/attempts", address))
        .header("Authorization", &bearer)
        .json(&json!({ "quizId": "1" }))
        .send()
        .await
        .unwrap();
    assert_eq!(start.status().as_u16(), 201);
    let view: Value = start.json().await.unwrap();
    let session = view["sessionId"].as_str().unwrap().to_string();
    assert_eq!(view["questionNumber"], 1);
    assert_eq!(view["canAdvance"], false);
    assert_eq!(view["canGoBack"], false);

    // 2. Next is refused until an option is chosen
    let blocked = client
        .post(format!("{}/api/attempts/{}/next", address, session))
        .header("Authorization", &bearer)
        .send()
        .await
        .unwrap();
    assert_eq!(blocked.status().as_u16(), 409);

    // 3. Three ticks of the clock
    for _ in 0..3 {
        state.sessions.tick().await;
    }

    // 4. Q1 right, Q2 wrong, Q3 right
    let picks = [("1-1", "1-1-3"), ("1-2", "1-2-1"), ("1-3", "1-3-4")];
    let mut last: Value = Value::Null;
    for (question, option) in picks {
        let answered = client
            .post(format!("{}/api/attempts/{}/answer", address, session))
            .header("Authorization", &bearer)
            .json(&json!({ "questionId": question, "optionId": option }))
            .send()
            .await
            .unwrap();
        assert_eq!(answered.status().as_u16(), 200);

        last = client
            .post(format!("{}/api/attempts/{}/next", address, session))
            .header("Authorization", &bearer)
            .send()
            .await
            .unwrap()
            .json()
            .await
            .unwrap();
    }

    assert_eq!(last["status"], "completed");
    let report = &last["report"];
    assert_eq!(report["attempt"]["score"], 2);
    assert_eq!(report["attempt"]["totalQuestions"], 3);
    assert_eq!(report["attempt"]["timeSpent"], 3);
    assert_eq!(report["percentage"], 67);
    assert_eq!(report["timeTaken"], "00:03");
    assert_eq!(report["questions"][1]["isCorrect"], false);
    assert_eq!(report["questions"][1]["yourAnswer"], "Venus");
    assert_eq!(report["questions"][1]["correctAnswer"], "Mars");

    // 5. The session is gone; the result is kept
    assert_eq!(state.sessions.len().await, 0);
    let gone = client
        .get(format!("{}/api/attempts/{}", address, session))
        .header("Authorization", &bearer)
        .send()
        .await
        .unwrap();
    assert_eq!(gone.status().as_u16(), 404);

    let attempt_id = report["attempt"]["id"].as_str().unwrap();
    let result: Value = client
        .get(format!("{}/api/results/{}", address, attempt_id))
        .header("Authorization", &bearer)
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(result["attempt"]["score"], 2);

    let mine: Vec<Value> = client
        .get(format!("{}/api/me/attempts", address))
        .header("Authorization", &bearer)
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(mine.len(), 1);

    // 6. The leaderboard picked it up
    let board: Vec<Value> = client
        .get(format!("{}/api/leaderboard?quizId=1&search={}", address, username))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(board.len(), 1);
    assert_eq!(board[0]["userName"], username.as_str());
    assert_eq!(board[0]["score"], 2);
}

#[tokio::test]
async fn navigation_keeps_answers_and_guards_ownership() {
    let (address, _) = spawn_app().await;
    let client = reqwest::Client::new();
    let (_, owner) = sign_up(&client, &address).await;
    let (_, intruder) = sign_up(&client, &address).await;
    let owner = format!("Bearer {}", owner);

    let view: Value = client
        .post(format!("{}/api/attempts", address))
        .header("Authorization", &owner)
        .json(&json!({ "quizId": "2" }))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    let session = view["sessionId"].as_str().unwrap().to_string();

    // Previous on the first question is refused
    let back = client
        .post(format!("{}/api/attempts/{}/previous", address, session))
        .header("Authorization", &owner)
        .send()
        .await
        .unwrap();
    assert_eq!(back.status().as_u16(), 409);

    // Answering out of order is refused
    let out_of_order = client
        .post(format!("{}/api/attempts/{}/answer", address, session))
        .header("Authorization", &owner)
        .json(&json!({ "questionId": "2-2", "optionId": "2-2-4" }))
        .send()
        .await
        .unwrap();
    assert_eq!(out_of_order.status().as_u16(), 409);

    client
        .post(format!("{}/api/attempts/{}/answer", address, session))
        .header("Authorization", &owner)
        .json(&json!({ "questionId": "2-1", "optionId": "2-1-2" }))
        .send()
        .await
        .unwrap();
    client
        .post(format!("{}/api/attempts/{}/next", address, session))
        .header("Authorization", &owner)
        .send()
        .await
        .unwrap();

    let back: Value = client
        .post(format!("{}/api/attempts/{}/previous", address, session))
        .header("Authorization", &owner)
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(back["questionNumber"], 1);
    assert_eq!(back["selectedOptionId"], "2-1-2");

    // Someone else cannot touch it
    let stolen = client
        .get(format!("{}/api/attempts/{}", address, session))
        .header("Authorization", format!("Bearer {}", intruder))
        .send()
        .await
        .unwrap();
    assert_eq!(stolen.status().as_u16(), 403);

    // Abandoning ends the session without a result
    let abandoned = client
        .delete(format!("{}/api/attempts/{}", address, session))
        .header("Authorization", &owner)
        .send()
        .await
        .unwrap();
    assert_eq!(abandoned.status().as_u16(), 204);

    let mine: Vec<Value> = client
        .get(format!("{}/api/me/attempts", address))
        .header("Authorization", &owner)
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert!(mine.is_empty());
}

#[tokio::test]
async fn created_quiz_must_have_one_correct_option_per_question() {
    let (address, _) = spawn_app().await;
    let client = reqwest::Client::new();
    let (username, token) = sign_up(&client, &address).await;
    let bearer = format!("Bearer {}", token);

    let invalid = client
        .post(format!("{}/api/quizzes", address))
        .header("Authorization", &bearer)
        .json(&json!({
            "title": "Two answers",
            "description": "Broken",
            "category": "Testing",
            "difficulty": "easy",
            "questions": [{
                "question": "Pick one",
                "options": [
                    { "text": "A", "isCorrect": true },
                    { "text": "B", "isCorrect": true }
                ]
            }]
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(invalid.status().as_u16(), 400);

    let no_questions = client
        .post(format!("{}/api/quizzes", address))
        .header("Authorization", &bearer)
        .json(&json!({
            "title": "Empty",
            "description": "Nothing here",
            "category": "Testing",
            "difficulty": "easy",
            "questions": []
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(no_questions.status().as_u16(), 400);

    let created = client
        .post(format!("{}/api/quizzes", address))
        .header("Authorization", &bearer)
        .json(&json!({
            "title": "<script>x</script>Rust Basics",
            "description": "Ownership and borrowing",
            "category": "Programming",
            "difficulty": "medium",
            "timeLimit": 5,
            "tags": ["rust"],
            "questions": [{
                "question": "Which keyword declares a mutable binding?",
                "options": [
                    { "text": "let mut", "isCorrect": true },
                    { "text": "var" }
                ],
                "explanation": "Bindings are immutable unless marked mut."
            }]
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(created.status().as_u16(), 201);
    let quiz: Value = created.json().await.unwrap();
    assert_eq!(quiz["title"], "Rust Basics");
    assert_eq!(quiz["createdBy"], username.as_str());
    assert_eq!(quiz["questionCount"], 1);

    let all: Vec<Value> = client
        .get(format!("{}/api/quizzes", address))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(all.len(), 4);
}

#[tokio::test]
async fn admin_routes_reject_regular_users() {
    let (address, _) = spawn_app().await;
    let client = reqwest::Client::new();
    let (_, token) = sign_up(&client, &address).await;

    let response = client
        .delete(format!("{}/api/admin/quizzes/1", address))
        .header("Authorization", format!("Bearer {}", token))
        .send()
        .await
        .unwrap();

    assert_eq!(response.status().as_u16(), 403);
}

#[tokio::test]
async fn admin_can_delete_quizzes() {
    let (address, state) = spawn_app().await;
    let client = reqwest::Client::new();
    let bearer = admin_bearer(&client, &address, &state).await;

    let deleted = client
        .delete(format!("{}/api/admin/quizzes/3", address))
        .header("Authorization", &bearer)
        .send()
        .await
        .unwrap();
    assert_eq!(deleted.status().as_u16(), 204);

    let again = client
        .delete(format!("{}/api/admin/quizzes/3", address))
        .header("Authorization", &bearer)
        .send()
        .await
        .unwrap();
    assert_eq!(again.status().as_u16(), 404);
}

#[tokio::test]
async fn results_survive_quiz_replacement_and_removal() {
    let (address, state) = spawn_app().await;
    let client = reqwest::Client::new();
    let admin = admin_bearer(&client, &address, &state).await;
    let (_, token) = sign_up(&client, &address).await;
    let bearer = format!("Bearer {}", token);

    let report = complete_quiz(
        &client,
        &address,
        &bearer,
        "3",
        &[("3-1", "3-1-3"), ("3-2", "3-2-2")],
    )
    .await;
    assert_eq!(report["attempt"]["score"], 2);
    let attempt_id = report["attempt"]["id"].as_str().unwrap().to_string();

    let replaced = client
        .put(format!("{}/api/admin/quizzes/3", address))
        .header("Authorization", &admin)
        .json(&json!({
            "title": "Movie Trivia II",
            "description": "All new questions",
            "category": "Entertainment",
            "difficulty": "medium",
            "questions": [{
                "question": "Who directed Jaws?",
                "options": [
                    { "text": "Steven Spielberg", "isCorrect": true },
                    { "text": "George Lucas" }
                ]
            }]
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(replaced.status().as_u16(), 200);

    let result: Value = fetch_result(&client, &address, &bearer, &attempt_id)
        .await
        .json()
        .await
        .unwrap();
    assert_eq!(result["quizTitle"], "Movie Trivia");
    assert_eq!(result["percentage"], 100);
    let questions = result["questions"].as_array().unwrap();
    assert_eq!(questions.len(), 2);
    assert_eq!(questions[0]["yourAnswer"], "Parasite");
    assert_eq!(questions[1]["correctAnswer"], "Robert Downey Jr.");

    let deleted = client
        .delete(format!("{}/api/admin/quizzes/3", address))
        .header("Authorization", &admin)
        .send()
        .await
        .unwrap();
    assert_eq!(deleted.status().as_u16(), 204);

    let after_delete = fetch_result(&client, &address, &bearer, &attempt_id).await;
    assert_eq!(after_delete.status().as_u16(), 200);
    let result: Value = after_delete.json().await.unwrap();
    assert_eq!(result["questions"].as_array().unwrap().len(), 2);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_registrations_keep_usernames_unique() {
    let state = AppState::in_memory(test_config());

    let tasks: Vec<_> = (0..4)
        .map(|_| {
            let state = state.clone();
            tokio::spawn(async move {
                quizmaker::handlers::auth::create_user(&state, "alice", "password123", "user")
                    .await
            })
        })
        .collect();

    let mut created = 0;
    for task in tasks {
        match task.await.unwrap() {
            Ok(_) => created += 1,
            Err(quizmaker::error::AppError::Conflict(_)) => {}
            Err(other) => panic!("unexpected error: {}", other),
        }
    }

    assert_eq!(created, 1);
    let users = state.users.list().await.unwrap();
    assert_eq!(users.iter().filter(|u| u.username == "alice").count(), 1);
}

#[tokio::test]
async fn dashboard_lists_own_quizzes_and_success_rate() {
    let (address, _) = spawn_app().await;
    let client = reqwest::Client::new();
    let (_, token) = sign_up(&client, &address).await;
    let bearer = format!("Bearer {}", token);

    let summary: Value = client
        .get(format!("{}/api/me/summary", address))
        .header("Authorization", &bearer)
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(summary["totalAttempts"], 0);
    assert!(summary["successRate"].is_null());

    let created = client
        .post(format!("{}/api/quizzes", address))
        .header("Authorization", &bearer)
        .json(&json!({
            "title": "Capitals",
            "description": "European capitals",
            "category": "Geography",
            "difficulty": "easy",
            "questions": [{
                "question": "Capital of Portugal?",
                "options": [
                    { "text": "Lisbon", "isCorrect": true },
                    { "text": "Porto" }
                ]
            }]
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(created.status().as_u16(), 201);

    // 2/3 on General Knowledge and 2/2 on Movie Trivia: 4 of 5 overall
    complete_quiz(
        &client,
        &address,
        &bearer,
        "1",
        &[("1-1", "1-1-3"), ("1-2", "1-2-1"), ("1-3", "1-3-4")],
    )
    .await;
    complete_quiz(
        &client,
        &address,
        &bearer,
        "3",
        &[("3-1", "3-1-3"), ("3-2", "3-2-2")],
    )
    .await;

    let mine: Vec<Value> = client
        .get(format!("{}/api/me/quizzes", address))
        .header("Authorization", &bearer)
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(mine.len(), 1);
    assert_eq!(mine[0]["title"], "Capitals");

    let summary: Value = client
        .get(format!("{}/api/me/summary", address))
        .header("Authorization", &bearer)
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(summary["totalAttempts"], 2);
    assert_eq!(summary["quizzesCreated"], 1);
    assert_eq!(summary["successRate"], 80);
}

#[tokio::test]
async fn clock_task_advances_running_attempts() {
    let mut config = test_config();
    config.clock_tick = Duration::from_millis(20);
    let state = AppState::in_memory(config.clone());

    let quiz = state.catalog.get("1").await.unwrap().unwrap();
    let engine = quizmaker::engine::AttemptEngine::new(std::sync::Arc::new(quiz), "u1").unwrap();
    let (_, session) = state
        .sessions
        .insert(quizmaker::sessions::AttemptSession {
            owner_id: "u1".to_string(),
            engine,
        })
        .await;

    let clock = spawn_clock(state.sessions.clone(), config.clock_tick);
    tokio::time::sleep(Duration::from_millis(200)).await;
    clock.abort();

    assert!(session.lock().await.engine.time_spent() >= 3);
}
