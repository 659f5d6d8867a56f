use crate::core::resource_data::ResourceData;
use crate::core::Storage;
use crate::utils::error::{ResourceError, Result};
use serde::{Deserialize, Serialize};

pub const STATE_FILE_NAME: &str = "address_webhook.state.json";
const STATE_VERSION: u32 = 1;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StateFile {
    pub version: u32,
    pub resource_type: String,
    pub resource: Option<ResourceData>,
}

/// 透過 `Storage` 讀寫 JSON 狀態檔
pub struct StateStore<S: Storage> {
    storage: S,
    resource_type: String,
}

impl<S: Storage> StateStore<S> {
    pub fn new(storage: S, resource_type: impl Into<String>) -> Self {
        Self {
            storage,
            resource_type: resource_type.into(),
        }
    }

    pub async fn load(&self) -> Result<Option<ResourceData>> {
        if !self.storage.exists(STATE_FILE_NAME).await {
            tracing::debug!("No state file found, starting empty");
            return Ok(None);
        }

        let data = self.storage.read_file(STATE_FILE_NAME).await?;
        let state: StateFile = serde_json::from_slice(&data)?;

        if state.version != STATE_VERSION {
            return Err(ResourceError::StateError {
                message: format!(
                    "Unsupported state version {} (expected {})",
                    state.version, STATE_VERSION
                ),
            });
        }
        if state.resource_type != self.resource_type {
            return Err(ResourceError::StateError {
                message: format!(
                    "State belongs to resource type '{}', not '{}'",
                    state.resource_type, self.resource_type
                ),
            });
        }

        Ok(state.resource.filter(ResourceData::exists))
    }

    pub async fn save(&self, resource: Option<&ResourceData>) -> Result<()> {
        let state = StateFile {
            version: STATE_VERSION,
            resource_type: self.resource_type.clone(),
            resource: resource.cloned(),
        };
        let json = serde_json::to_vec_pretty(&state)?;
        self.storage.write_file(STATE_FILE_NAME, &json).await?;
        tracing::debug!("State saved ({} bytes)", json.len());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::storage::LocalStorage;
    use serde_json::json;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_state_round_trip() {
        let temp_dir = TempDir::new().unwrap();
        let store = StateStore::new(LocalStorage::new(temp_dir.path()), "test_type");

        assert!(store.load().await.unwrap().is_none());

        let mut d = ResourceData::default();
        d.set_id("IG1");
        d.set("sid", "IG1");
        d.set("webhook_filters", json!(["onMessageAdded"]));
        store.save(Some(&d)).await.unwrap();

        let loaded = store.load().await.unwrap().unwrap();
        assert_eq!(loaded.id(), "IG1");
        assert_eq!(loaded.get("webhook_filters"), Some(&json!(["onMessageAdded"])));

        store.save(None).await.unwrap();
        assert!(store.load().await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_state_for_other_resource_type_is_rejected() {
        let temp_dir = TempDir::new().unwrap();
        let mut d = ResourceData::default();
        d.set_id("IG1");
        StateStore::new(LocalStorage::new(temp_dir.path()), "other_type")
            .save(Some(&d))
            .await
            .unwrap();

        let store = StateStore::new(LocalStorage::new(temp_dir.path()), "test_type");
        let err = store.load().await.unwrap_err();
        assert!(matches!(err, ResourceError::StateError { .. }));
    }
}
