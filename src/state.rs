use std::sync::Arc;

use sqlx::PgPool;

use crate::config::AppConfig;
use crate::services::github::GithubClient;

/// Shared application state: the connection pool, the immutable startup
/// configuration, and the outbound GitHub client.
#[derive(Clone)]
pub struct AppState {
    pub pool: PgPool,
    pub config: Arc<AppConfig>,
    pub github: GithubClient,
}

impl AppState {
    pub fn new(config: AppConfig, pool: PgPool) -> Result<Self, reqwest::Error> {
        let github = GithubClient::new(&config.github)?;

        Ok(Self {
            pool,
            config: Arc::new(config),
            github,
        })
    }
}
