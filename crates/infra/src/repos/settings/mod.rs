mod inmemory;
mod postgres;

pub use inmemory::InMemorySettingsRepo;
pub use postgres::PostgresSettingsRepo;

/// Durable key-value settings shared with the rest of the shop backend
#[async_trait::async_trait]
pub trait ISettingsRepo: Send + Sync {
    async fn get(&self, key: &str) -> anyhow::Result<Option<String>>;
    /// Inserts or overwrites the value stored at `key`
    async fn set(&self, key: &str, value: &str, modified_by: &str) -> anyhow::Result<()>;
}
