use crate::core::resource_data::ResourceData;
use crate::domain::model::{
    AddressConfigurationResponse, AutoCreationInput, CreateAddressInput, UpdateAddressInput,
    WEBHOOK_INTEGRATION_TYPE,
};
use crate::domain::ports::AddressConfigurationApi;
use crate::domain::schema::{Schema, Timeouts, ADDRESS_CONFIGURATION_WEBHOOK};
use crate::utils::error::{ResourceError, Result};
use chrono::SecondsFormat;
use regex::Regex;
use std::future::Future;
use std::sync::OnceLock;
use std::time::Duration;

pub const IMPORT_ID_FORMAT: &str = "/Configuration/Addresses/(.*)";

fn import_id_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(IMPORT_ID_FORMAT).expect("static regex"))
}

/// Conversations address configuration (webhook 整合) 的 CRUD 與 import
pub struct AddressConfigurationWebhook<A: AddressConfigurationApi> {
    api: A,
    timeouts: Timeouts,
}

impl<A: AddressConfigurationApi> AddressConfigurationWebhook<A> {
    pub fn new(api: A) -> Self {
        Self {
            api,
            timeouts: Timeouts::default(),
        }
    }

    pub fn with_timeouts(mut self, timeouts: Timeouts) -> Self {
        self.timeouts = timeouts;
        self
    }

    pub fn schema(&self) -> &'static Schema {
        &ADDRESS_CONFIGURATION_WEBHOOK
    }

    pub async fn create(&self, d: &mut ResourceData) -> Result<()> {
        with_timeout("create", self.timeouts.create, self.create_inner(d)).await
    }

    pub async fn read(&self, d: &mut ResourceData) -> Result<()> {
        with_timeout("read", self.timeouts.read, self.read_inner(d)).await
    }

    pub async fn update(&self, d: &mut ResourceData) -> Result<()> {
        with_timeout("update", self.timeouts.update, self.update_inner(d)).await
    }

    pub async fn delete(&self, d: &mut ResourceData) -> Result<()> {
        with_timeout("delete", self.timeouts.delete, self.delete_inner(d)).await
    }

    /// 解析 `/Configuration/Addresses/<sid>` 形式的 import ID
    pub fn import(&self, import_id: &str) -> Result<ResourceData> {
        let sid = import_id_regex()
            .captures(import_id)
            .and_then(|caps| caps.get(1))
            .map(|m| m.as_str().to_string())
            .filter(|sid| !sid.is_empty())
            .ok_or_else(|| ResourceError::ImportIdError {
                id: import_id.to_string(),
                format: IMPORT_ID_FORMAT.to_string(),
            })?;

        tracing::info!("📥 Importing address configuration {}", sid);
        let mut d = ResourceData::default();
        d.set("sid", sid.clone());
        d.set_id(sid);
        Ok(d)
    }

    async fn create_inner(&self, d: &mut ResourceData) -> Result<()> {
        let input = CreateAddressInput {
            address: d.get_string("address"),
            auto_creation: Some(auto_creation_input(d)),
            friendly_name: d.optional_string_with_empty_string_on_change("friendly_name"),
            r#type: d.get_string("type"),
        };

        tracing::debug!("Create input: {:?}", input);
        let created = self
            .api
            .create(&input)
            .await
            .map_err(|e| ResourceError::operation("create", e))?;

        tracing::info!("✅ Created address configuration {}", created.sid);
        d.set_id(created.sid);
        self.read_inner(d).await
    }

    async fn read_inner(&self, d: &mut ResourceData) -> Result<()> {
        let response = match self.api.fetch(d.id()).await {
            Ok(response) => response,
            Err(e) if e.is_not_found() => {
                tracing::warn!(
                    "⚠️ Address configuration {} no longer exists, removing from state",
                    d.id()
                );
                d.set_id("");
                return Ok(());
            }
            Err(e) => return Err(ResourceError::operation("read", e)),
        };

        apply_response(d, response);
        Ok(())
    }

    async fn update_inner(&self, d: &mut ResourceData) -> Result<()> {
        let input = UpdateAddressInput {
            auto_creation: Some(auto_creation_input(d)),
            friendly_name: d.optional_string_with_empty_string_on_change("friendly_name"),
        };

        tracing::debug!("Update input for {}: {:?}", d.id(), input);
        let updated = self
            .api
            .update(d.id(), &input)
            .await
            .map_err(|e| ResourceError::operation("update", e))?;

        tracing::info!("✅ Updated address configuration {}", updated.sid);
        d.set_id(updated.sid);
        self.read_inner(d).await
    }

    async fn delete_inner(&self, d: &mut ResourceData) -> Result<()> {
        self.api
            .delete(d.id())
            .await
            .map_err(|e| ResourceError::operation("delete", e))?;

        tracing::info!("🗑️ Deleted address configuration {}", d.id());
        d.set_id("");
        Ok(())
    }
}

fn auto_creation_input(d: &ResourceData) -> AutoCreationInput {
    AutoCreationInput {
        conversation_service_sid: d.optional_string_with_empty_string_on_change("service_sid"),
        enabled: d.optional_bool("enabled"),
        r#type: Some(WEBHOOK_INTEGRATION_TYPE.to_string()),
        webhook_filters: d.optional_string_slice("webhook_filters"),
        webhook_method: d.optional_string("webhook_method"),
        webhook_url: d.optional_string("webhook_url"),
    }
}

/// 將 API 回應逐欄寫回資源狀態
fn apply_response(d: &mut ResourceData, response: AddressConfigurationResponse) {
    let auto_creation = response.auto_creation;

    d.set("sid", response.sid);
    d.set("account_sid", response.account_sid);
    d.set("address", response.address);
    d.set_optional("service_sid", auto_creation.conversation_service_sid);
    d.set_optional("friendly_name", response.friendly_name);
    d.set("enabled", auto_creation.enabled);
    d.set("integration_type", auto_creation.r#type);
    d.set("type", response.r#type);
    d.set_optional("webhook_filters", auto_creation.webhook_filters);
    d.set_optional("webhook_method", auto_creation.webhook_method);
    d.set_optional("webhook_url", auto_creation.webhook_url);
    d.set(
        "date_created",
        response
            .date_created
            .to_rfc3339_opts(SecondsFormat::Secs, true),
    );

    if let Some(date_updated) = response.date_updated {
        d.set(
            "date_updated",
            date_updated.to_rfc3339_opts(SecondsFormat::Secs, true),
        );
    }

    d.set("url", response.url);
}

async fn with_timeout<T>(
    operation: &'static str,
    limit: Duration,
    fut: impl Future<Output = Result<T>>,
) -> Result<T> {
    match tokio::time::timeout(limit, fut).await {
        Ok(result) => result,
        Err(_) => Err(ResourceError::operation(
            operation,
            ResourceError::TimeoutError {
                operation,
                seconds: limit.as_secs(),
            },
        )),
    }
}
