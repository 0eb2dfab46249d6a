//! Application state - shared across all handlers.

use std::sync::Arc;

use yatube_core::ports::{
    GroupRepository, Mailer, PasswordResetTokenService, PasswordService, PostRepository,
    TokenService, UserRepository,
};
use yatube_infra::{
    Argon2PasswordService, AuthConfig, ConsoleMailer, InMemoryGroupRepository,
    InMemoryPostRepository, InMemoryUserRepository, JwtPasswordResetTokenService,
    JwtTokenService,
};

#[cfg(feature = "postgres")]
use yatube_infra::{
    DatabaseConnections, PostgresGroupRepository, PostgresPostRepository, PostgresUserRepository,
};

use crate::config::AppConfig;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub users: Arc<dyn UserRepository>,
    pub groups: Arc<dyn GroupRepository>,
    pub posts: Arc<dyn PostRepository>,
    pub passwords: Arc<dyn PasswordService>,
    pub tokens: Arc<dyn TokenService>,
    pub reset_tokens: Arc<dyn PasswordResetTokenService>,
    pub mailer: Arc<dyn Mailer>,
    pub site_url: String,
    #[cfg(feature = "postgres")]
    pub db: Option<Arc<DatabaseConnections>>,
}

impl AppState {
    /// Build the application state with appropriate implementations.
    pub async fn new(config: &AppConfig) -> Self {
        #[cfg_attr(not(feature = "postgres"), allow(unused_mut))]
        let mut state = Self::in_memory(
            config.auth.clone(),
            Arc::new(ConsoleMailer),
            config.site_url.clone(),
        );

        #[cfg(feature = "postgres")]
        match &config.database {
            Some(db_config) => match DatabaseConnections::init(db_config).await {
                Ok(connections) => {
                    let conn = Arc::new(connections);
                    state.users = Arc::new(PostgresUserRepository::new(conn.main.clone()));
                    state.groups = Arc::new(PostgresGroupRepository::new(conn.main.clone()));
                    state.posts = Arc::new(PostgresPostRepository::new(conn.main.clone()));
                    state.db = Some(conn);
                }
                Err(e) => {
                    tracing::error!(
                        error = %e,
                        "Failed to connect to database. Using in-memory fallback."
                    );
                }
            },
            None => {
                tracing::warn!("DATABASE_URL not set. Running without database (in-memory mode).");
            }
        }

        #[cfg(not(feature = "postgres"))]
        tracing::info!("Running without postgres feature - using in-memory repositories");

        tracing::info!("Application state initialized");

        state
    }

    /// State backed entirely by in-memory repositories.
    pub fn in_memory(auth: AuthConfig, mailer: Arc<dyn Mailer>, site_url: String) -> Self {
        Self {
            users: Arc::new(InMemoryUserRepository::new()),
            groups: Arc::new(InMemoryGroupRepository::new()),
            posts: Arc::new(InMemoryPostRepository::new()),
            passwords: Arc::new(Argon2PasswordService::new()),
            tokens: Arc::new(JwtTokenService::new(auth.clone())),
            reset_tokens: Arc::new(JwtPasswordResetTokenService::new(auth)),
            mailer,
            site_url,
            #[cfg(feature = "postgres")]
            db: None,
        }
    }
}
