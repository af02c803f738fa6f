//! Account access consent REST API server.

use consent_api::config::ApiConfig;
use consent_api::server::{self, AppState};
use consent_service::DefaultConsentService;
use consent_store::{InMemoryConsentStore, SqliteConsentStore};
use consent_types::ConsentService;
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "info".into()),
        ))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = ApiConfig::from_env()?;
    let service: Arc<dyn ConsentService + Send + Sync> = match &config.db_path {
        Some(path) => {
            tracing::info!(path = %path.display(), "using sqlite consent store");
            Arc::new(DefaultConsentService::new(SqliteConsentStore::new(path)?))
        }
        None => {
            tracing::info!("using in-memory consent store");
            Arc::new(DefaultConsentService::new(InMemoryConsentStore::new()))
        }
    };

    let app = server::router(Arc::new(AppState { service }));
    tracing::info!("consent API listening on {}", config.listen);
    axum::serve(
        tokio::net::TcpListener::bind(config.listen).await?,
        app.into_make_service(),
    )
    .await?;
    Ok(())
}
