//! Application state - shared across all handlers.

use std::sync::Arc;

use blog_core::ports::{AuthorRepository, PostRepository};
use blog_infra::database::DatabaseConfig;
use blog_infra::memory::InMemoryStore;

#[cfg(feature = "postgres")]
use blog_infra::database::{DatabaseConnections, PostgresAuthorRepository, PostgresPostRepository};

use crate::admin::AdminSite;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub posts: Arc<dyn PostRepository>,
    pub authors: Arc<dyn AuthorRepository>,
    pub admin: Arc<AdminSite>,
    /// Which record store backs the repositories, reported by the health check.
    pub store: &'static str,
}

impl AppState {
    /// Build the application state with appropriate implementations.
    pub async fn new(db_config: Option<&DatabaseConfig>, admin: AdminSite) -> Self {
        #[cfg(feature = "postgres")]
        {
            if let Some(config) = db_config {
                match DatabaseConnections::init(config).await {
                    Ok(connections) => {
                        tracing::info!("Application state initialized (postgres)");
                        return Self {
                            posts: Arc::new(PostgresPostRepository::new(connections.main.clone())),
                            authors: Arc::new(PostgresAuthorRepository::new(connections.main)),
                            admin: Arc::new(admin),
                            store: "postgres",
                        };
                    }
                    Err(e) => {
                        tracing::error!(
                            "Failed to connect to database: {}. Using in-memory fallback.",
                            e
                        );
                    }
                }
            } else {
                tracing::warn!("DATABASE_URL not set. Running without database (in-memory mode).");
            }
        }

        #[cfg(not(feature = "postgres"))]
        {
            if db_config.is_some() {
                tracing::warn!("Built without postgres feature - ignoring DATABASE_URL");
            }
        }

        tracing::info!("Application state initialized (in-memory)");
        Self::in_memory(admin)
    }

    /// State over a fresh in-memory store.
    pub fn in_memory(admin: AdminSite) -> Self {
        let store = InMemoryStore::new();
        Self {
            posts: Arc::new(store.posts()),
            authors: Arc::new(store.authors()),
            admin: Arc::new(admin),
            store: "in-memory",
        }
    }
}
