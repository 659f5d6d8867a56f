use crate::core::plan::{self, Plan};
use crate::core::resource::AddressConfigurationWebhook;
use crate::core::resource_data::ResourceData;
use crate::core::state::StateStore;
use crate::core::{AddressConfigurationApi, Attributes, Storage};
use crate::utils::error::{ResourceError, Result};

/// 串接 state、資源操作與計畫：CLI 的 plan / apply / refresh / destroy / import
pub struct ResourceRunner<A: AddressConfigurationApi, S: Storage> {
    resource: AddressConfigurationWebhook<A>,
    state: StateStore<S>,
    desired: Attributes,
}

impl<A: AddressConfigurationApi, S: Storage> ResourceRunner<A, S> {
    pub fn new(resource: AddressConfigurationWebhook<A>, storage: S, mut desired: Attributes) -> Self {
        let schema = resource.schema();
        schema.apply_defaults(&mut desired);
        Self {
            state: StateStore::new(storage, schema.type_name),
            resource,
            desired,
        }
    }

    /// 讀取狀態並向遠端刷新；遠端已不存在時回傳 `None`
    async fn refreshed_state(&self) -> Result<Option<ResourceData>> {
        let Some(mut d) = self.state.load().await? else {
            return Ok(None);
        };
        self.resource.read(&mut d).await?;
        Ok(Some(d).filter(ResourceData::exists))
    }

    pub async fn plan(&self) -> Result<Plan> {
        let state = self.refreshed_state().await?;
        let plan = plan::plan(self.resource.schema(), state.as_ref(), &self.desired);
        tracing::info!("📋 Plan: {}", plan);
        Ok(plan)
    }

    pub async fn apply(&self) -> Result<(Plan, Option<ResourceData>)> {
        let state = self.refreshed_state().await?;
        let plan = plan::plan(self.resource.schema(), state.as_ref(), &self.desired);

        let result = plan::apply(&self.resource, &plan, state, &self.desired).await;
        match result {
            Ok(new_state) => {
                self.state.save(new_state.as_ref()).await?;
                Ok((plan, new_state))
            }
            Err(e) => {
                tracing::error!("❌ Apply failed: {}", e);
                Err(e)
            }
        }
    }

    pub async fn refresh(&self) -> Result<Option<ResourceData>> {
        let state = self.refreshed_state().await?;
        self.state.save(state.as_ref()).await?;
        Ok(state)
    }

    pub async fn destroy(&self) -> Result<Plan> {
        let state = self.refreshed_state().await?;
        let plan = plan::plan_destroy(state.as_ref());
        let new_state = plan::apply(&self.resource, &plan, state, &self.desired).await?;
        self.state.save(new_state.as_ref()).await?;
        Ok(plan)
    }

    pub async fn import(&self, import_id: &str) -> Result<ResourceData> {
        if let Some(existing) = self.state.load().await? {
            return Err(ResourceError::StateError {
                message: format!(
                    "Resource already managed with id {}; destroy or remove the state first",
                    existing.id()
                ),
            });
        }

        let mut d = self.resource.import(import_id)?;
        self.resource.read(&mut d).await?;
        if !d.exists() {
            return Err(ResourceError::StateError {
                message: format!("Cannot import non-existent remote object ({})", import_id),
            });
        }

        self.state.save(Some(&d)).await?;
        Ok(d)
    }
}
