use super::ISettingsRepo;
use std::collections::HashMap;
use std::sync::Mutex;

#[derive(Debug, Clone)]
struct SettingValue {
    value: String,
    modified_by: String,
}

pub struct InMemorySettingsRepo {
    settings: Mutex<HashMap<String, SettingValue>>,
}

impl InMemorySettingsRepo {
    pub fn new() -> Self {
        Self {
            settings: Mutex::new(HashMap::new()),
        }
    }

    /// Who last wrote `key`, if anyone
    pub fn modified_by(&self, key: &str) -> Option<String> {
        self.lock().get(key).map(|s| s.modified_by.clone())
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, HashMap<String, SettingValue>> {
        // A poisoned lock still holds consistent data since every write is a single insert
        self.settings
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl Default for InMemorySettingsRepo {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait::async_trait]
impl ISettingsRepo for InMemorySettingsRepo {
    async fn get(&self, key: &str) -> anyhow::Result<Option<String>> {
        Ok(self.lock().get(key).map(|s| s.value.clone()))
    }

    async fn set(&self, key: &str, value: &str, modified_by: &str) -> anyhow::Result<()> {
        self.lock().insert(
            key.to_string(),
            SettingValue {
                value: value.to_string(),
                modified_by: modified_by.to_string(),
            },
        );
        Ok(())
    }
}
