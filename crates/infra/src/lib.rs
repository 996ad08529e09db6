mod config;
mod repos;
mod services;
mod system;

pub use config::Config;
pub use repos::{ISettingsRepo, InMemorySettingsRepo, Repos};
pub use services::*;
use std::sync::Arc;
pub use system::{ISys, RealSys, StaticTimeSys};

#[derive(Clone)]
pub struct StatementContext {
    pub repos: Repos,
    pub services: Services,
    pub config: Config,
    pub sys: Arc<dyn ISys>,
}

struct ContextParams {
    pub postgres_connection_string: String,
}

impl StatementContext {
    async fn create(params: ContextParams) -> anyhow::Result<Self> {
        let repos = Repos::create_postgres(&params.postgres_connection_string).await?;
        let config = Config::new();
        let services = Services::create_backend(BackendProvider::new(
            config.backend_api_url.clone(),
            config.backend_api_key.clone(),
        ));
        Ok(Self {
            repos,
            services,
            config,
            sys: Arc::new(RealSys {}),
        })
    }

    /// Context backed entirely by in-memory collaborators
    pub fn create_inmemory() -> Self {
        Self {
            repos: Repos::create_inmemory(),
            services: Services::create_inmemory(),
            config: Config::new(),
            sys: Arc::new(RealSys {}),
        }
    }
}

/// Will setup the infrastructure context given the environment
pub async fn setup_context() -> anyhow::Result<StatementContext> {
    StatementContext::create(ContextParams {
        postgres_connection_string: get_psql_connection_string()?,
    })
    .await
}

fn get_psql_connection_string() -> anyhow::Result<String> {
    const PSQL_CONNECTION_STRING: &str = "DATABASE_URL";

    std::env::var(PSQL_CONNECTION_STRING)
        .map_err(|_| anyhow::anyhow!("{} env var to be present.", PSQL_CONNECTION_STRING))
}
