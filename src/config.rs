// src/config.rs

use dotenvy::dotenv;
use std::env;
use std::net::SocketAddr;
use std::time::Duration;

/// Default number of leaderboard rows returned when no limit is given.
pub const DEFAULT_LEADERBOARD_LIMIT: usize = 10;

#[derive(Debug, Clone)]
pub struct Config {
    pub jwt_secret: String,
    pub jwt_expiration: u64,
    pub rust_log: String,
    pub bind_addr: SocketAddr,
    pub log_dir: String,
    pub admin_username: Option<String>,
    pub admin_password: Option<String>,
    pub seed_sample_data: bool,
    /// Period of the attempt clock. One tick adds one second to every
    /// in-progress attempt.
    pub clock_tick: Duration,
}

impl Config {
    pub fn from_env() -> Self {
        dotenv().ok();

        let jwt_secret = env::var("JWT_SECRET").expect("JWT_SECRET must be set");

        let jwt_expiration = env::var("JWT_EXPIRATION")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(86_400);

        let rust_log = env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string());

        let bind_addr = env::var("BIND_ADDR")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or_else(|| SocketAddr::from(([0, 0, 0, 0], 3000)));

        let log_dir = env::var("LOG_DIR").unwrap_or_else(|_| "logs".to_string());

        let seed_sample_data = env::var("SEED_SAMPLE_DATA")
            .map(|v| !matches!(v.to_ascii_lowercase().as_str(), "0" | "false" | "no"))
            .unwrap_or(true);

        let clock_tick = env::var("CLOCK_TICK_MS")
            .ok()
            .and_then(|v| v.parse().ok())
            .map(Duration::from_millis)
            .unwrap_or(Duration::from_secs(1));

        Self {
            jwt_secret,
            jwt_expiration,
            rust_log,
            bind_addr,
            log_dir,
            admin_username: env::var("ADMIN_USERNAME").ok(),
            admin_password: env::var("ADMIN_PASSWORD").ok(),
            seed_sample_data,
            clock_tick,
        }
    }
}
