use std::env;

/// Application configuration parsed from environment variables.
///
/// A required `DATABASE_URL`, everything else defaulted and silently
/// overridable.
#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub env: String,
    pub port: u16,
    pub worker_concurrency: usize,
    pub claim_batch_size: i64,
    pub poll_interval_ms: u64,
    pub shutdown_grace_secs: u64,
    pub dashboard_recent_limit: i64,
    pub timeline_default_limit: i64,
    pub mastery_max_score: f64,
    pub max_retries: i32,
}

fn parse_env<T: std::str::FromStr>(key: &str, default: T) -> Result<T, String> {
    match env::var(key) {
        Ok(v) => v
            .parse()
            .map_err(|_| format!("{key} must be a valid value, got {v:?}")),
        Err(_) => Ok(default),
    }
}

impl Config {
    pub fn from_env() -> Result<Self, String> {
        let database_url =
            env::var("DATABASE_URL").map_err(|_| "DATABASE_URL must be set".to_string())?;

        let env_name = env::var("ENV").unwrap_or_else(|_| "production".to_string());

        Ok(Config {
            database_url,
            env: env_name,
            port: parse_env("PORT", 8080)?,
            worker_concurrency: parse_env("WORKER_CONCURRENCY", 4)?,
            claim_batch_size: parse_env("CLAIM_BATCH_SIZE", 10)?,
            poll_interval_ms: parse_env("POLL_INTERVAL_MS", 2_000)?,
            shutdown_grace_secs: parse_env("SHUTDOWN_GRACE_SECS", 10)?,
            dashboard_recent_limit: parse_env("DASHBOARD_RECENT_LIMIT", 20)?,
            timeline_default_limit: parse_env("TIMELINE_DEFAULT_LIMIT", 50)?,
            mastery_max_score: parse_env("MASTERY_MAX_SCORE", 100.0)?,
            max_retries: parse_env("MAX_RETRIES", 3)?,
        })
    }

    pub fn is_development(&self) -> bool {
        self.env.eq_ignore_ascii_case("development")
    }
}
