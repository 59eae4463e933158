// src/main.rs

use dotenvy::dotenv;
use quizmaker::config::Config;
use quizmaker::handlers::auth::create_user;
use quizmaker::routes;
use quizmaker::sessions::spawn_clock;
use quizmaker::state::AppState;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() {
    // Load .env file (if present)
    dotenv().ok();

    // Load configuration from environment
    let config = Config::from_env();

    let file_appender = tracing_appender::rolling::daily(&config.log_dir, "app.log");
    let (non_blocking, _guard) = tracing_appender::non_blocking(file_appender);
    let env_filter = EnvFilter::new(&config.rust_log);
    let stdout_layer = fmt::layer().with_writer(std::io::stdout).with_target(false);
    let file_layer = fmt::layer().with_writer(non_blocking).with_ansi(false);

    // Initialize Tracing (Logging)
    tracing_subscriber::registry()
        .with(env_filter)
        .with(stdout_layer)
        .with(file_layer)
        .init();

    let state = AppState::in_memory(config.clone());
    tracing::info!(
        "Catalog ready (sample data: {})",
        if config.seed_sample_data { "on" } else { "off" }
    );

    // Seed Admin User
    if let Err(e) = seed_admin_user(&state, &config).await {
        tracing::error!("Failed to seed admin user: {:?}", e);
    }

    // The attempt clock lives for the whole process.
    let _clock = spawn_clock(state.sessions.clone(), config.clock_tick);

    // Create the Axum application router
    let app = routes::create_router(state);

    tracing::info!("Listening on {}", config.bind_addr);

    let listener = match tokio::net::TcpListener::bind(config.bind_addr).await {
        Ok(listener) => listener,
        Err(e) => {
            tracing::error!("Failed to bind {}: {}", config.bind_addr, e);
            return;
        }
    };

    // Start the server
    if let Err(e) = axum::serve(listener, app).await {
        tracing::error!("Server error: {}", e);
    }
}

async fn seed_admin_user(state: &AppState, config: &Config) -> Result<(), Box<dyn std::error::Error>> {
    if let (Some(username), Some(password)) = (&config.admin_username, &config.admin_password) {
        tracing::info!("Seeding admin user: {}", username);
        create_user(state, username, password, "admin").await?;
        tracing::info!("Admin user created successfully.");
    }
    Ok(())
}
