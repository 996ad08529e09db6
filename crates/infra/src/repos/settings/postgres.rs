use super::ISettingsRepo;
use sqlx::{FromRow, PgPool};
use tracing::error;

pub struct PostgresSettingsRepo {
    pool: PgPool,
}

impl PostgresSettingsRepo {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(Debug, FromRow)]
struct SettingRaw {
    value: String,
}

#[async_trait::async_trait]
impl ISettingsRepo for PostgresSettingsRepo {
    async fn get(&self, key: &str) -> anyhow::Result<Option<String>> {
        let res: Option<SettingRaw> = sqlx::query_as(
            r#"
            SELECT value FROM settings
            WHERE key = $1
            "#,
        )
        .bind(key)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            error!(
                "Find setting with key: {} failed. DB returned error: {:?}",
                key, e
            );
            e
        })?;

        Ok(res.map(|s| s.value))
    }

    async fn set(&self, key: &str, value: &str, modified_by: &str) -> anyhow::Result<()> {
        sqlx::query(
            r#"
            INSERT INTO settings(key, value, modified_by, modified_at)
            VALUES($1, $2, $3, now())
            ON CONFLICT (key) DO UPDATE
            SET value = EXCLUDED.value,
            modified_by = EXCLUDED.modified_by,
            modified_at = EXCLUDED.modified_at
            "#,
        )
        .bind(key)
        .bind(value)
        .bind(modified_by)
        .execute(&self.pool)
        .await
        .map_err(|e| {
            error!(
                "Unable to save setting with key: {} and value: {}. DB returned error: {:?}",
                key, value, e
            );
            e
        })?;
        Ok(())
    }
}
