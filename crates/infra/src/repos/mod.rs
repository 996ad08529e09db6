mod settings;

use settings::PostgresSettingsRepo;
use sqlx::postgres::PgPoolOptions;
use std::sync::Arc;
use tracing::info;

pub use settings::{ISettingsRepo, InMemorySettingsRepo};

#[derive(Clone)]
pub struct Repos {
    pub settings: Arc<dyn ISettingsRepo>,
}

impl Repos {
    pub async fn create_postgres(connection_string: &str) -> anyhow::Result<Self> {
        info!("DB CHECKING CONNECTION ...");
        let pool = PgPoolOptions::new()
            .max_connections(5)
            .connect(connection_string)
            .await?;
        info!("DB CHECKING CONNECTION ... [done]");

        info!("DB RUNNING MIGRATIONS ...");
        sqlx::migrate!().run(&pool).await?;
        info!("DB RUNNING MIGRATIONS ... [done]");

        Ok(Self {
            settings: Arc::new(PostgresSettingsRepo::new(pool)),
        })
    }

    pub fn create_inmemory() -> Self {
        Self::with_settings(Arc::new(InMemorySettingsRepo::new()))
    }

    pub fn with_settings(settings: Arc<dyn ISettingsRepo>) -> Self {
        Self { settings }
    }
}
