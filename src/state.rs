use std::sync::Arc;

use axum::extract::FromRef;

use crate::{
    config::Config,
    engine::AttemptReport,
    models::{
        attempt::{LeaderboardEntry, QuizAttempt},
        quiz::Quiz,
        user::User,
    },
    sessions::AttemptRegistry,
    store::{InMemoryStore, Repository, seed},
};

#[derive(Clone)]
pub struct AppState {
    pub catalog: Arc<dyn Repository<Quiz>>,
    pub users: Arc<dyn Repository<User>>,
    pub attempts: Arc<dyn Repository<QuizAttempt>>,
    /// Result breakdowns, keyed by attempt id.
    pub reports: Arc<dyn Repository<AttemptReport>>,
    pub leaderboard: Arc<dyn Repository<LeaderboardEntry>>,
    pub sessions: Arc<AttemptRegistry>,
    pub config: Config,
}

impl AppState {
    /// Builds a state backed by in-memory stores, seeded with the sample
    /// catalog and leaderboard when the config asks for it.
    pub fn in_memory(config: Config) -> Self {
        let (quizzes, entries) = if config.seed_sample_data {
            (seed::sample_quizzes(), seed::sample_leaderboard())
        } else {
            (Vec::new(), Vec::new())
        };

        Self {
            catalog: Arc::new(InMemoryStore::with_items(quizzes)),
            users: Arc::new(InMemoryStore::<User>::new()),
            attempts: Arc::new(InMemoryStore::<QuizAttempt>::new()),
            reports: Arc::new(InMemoryStore::<AttemptReport>::new()),
            leaderboard: Arc::new(InMemoryStore::with_items(entries)),
            sessions: Arc::new(AttemptRegistry::new()),
            config,
        }
    }
}

impl FromRef<AppState> for Config {
    fn from_ref(state: &AppState) -> Self {
        state.config.clone()
    }
}
