use crate::domain::model::{
    AddressConfigurationResponse, AutoCreationInput, CreateAddressInput, TwilioErrorBody,
    UpdateAddressInput,
};
use crate::domain::ports::AddressConfigurationApi;
use crate::utils::error::{ResourceError, Result};
use async_trait::async_trait;
use reqwest::{Client, Response};
use std::time::Duration;

pub const DEFAULT_BASE_URL: &str = "https://conversations.twilio.com";

/// Basic auth 帳密：Account SID + Auth Token，或 API Key + Secret
#[derive(Debug, Clone)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

/// Twilio Conversations v1 REST client
#[derive(Debug, Clone)]
pub struct TwilioConversationsClient {
    client: Client,
    base_url: String,
    credentials: Credentials,
}

impl TwilioConversationsClient {
    pub fn new(credentials: Credentials) -> Result<Self> {
        Self::with_base_url(credentials, DEFAULT_BASE_URL, None)
    }

    pub fn with_base_url(
        credentials: Credentials,
        base_url: &str,
        request_timeout: Option<Duration>,
    ) -> Result<Self> {
        let mut builder = Client::builder().user_agent(concat!(
            env!("CARGO_PKG_NAME"),
            "/",
            env!("CARGO_PKG_VERSION")
        ));
        if let Some(timeout) = request_timeout {
            builder = builder.timeout(timeout);
        }

        Ok(Self {
            client: builder.build()?,
            base_url: base_url.trim_end_matches('/').to_string(),
            credentials,
        })
    }

    fn addresses_url(&self) -> String {
        format!("{}/v1/Configuration/Addresses", self.base_url)
    }

    fn address_url(&self, sid: &str) -> String {
        format!("{}/v1/Configuration/Addresses/{}", self.base_url, sid)
    }

    async fn post_form(
        &self,
        url: &str,
        form: &[(&'static str, String)],
    ) -> Result<AddressConfigurationResponse> {
        tracing::debug!("📡 POST {} ({} form fields)", url, form.len());
        let response = self
            .client
            .post(url)
            .basic_auth(&self.credentials.username, Some(&self.credentials.password))
            .form(form)
            .send()
            .await?;

        let response = check_status(response).await?;
        Ok(response.json().await?)
    }
}

fn push_auto_creation(form: &mut Vec<(&'static str, String)>, input: &AutoCreationInput) {
    if let Some(sid) = &input.conversation_service_sid {
        form.push(("AutoCreation.ConversationServiceSid", sid.clone()));
    }
    if let Some(enabled) = input.enabled {
        form.push(("AutoCreation.Enabled", enabled.to_string()));
    }
    if let Some(t) = &input.r#type {
        form.push(("AutoCreation.Type", t.clone()));
    }
    if let Some(filters) = &input.webhook_filters {
        for filter in filters {
            form.push(("AutoCreation.WebhookFilters", filter.clone()));
        }
    }
    if let Some(method) = &input.webhook_method {
        form.push(("AutoCreation.WebhookMethod", method.clone()));
    }
    if let Some(url) = &input.webhook_url {
        form.push(("AutoCreation.WebhookUrl", url.clone()));
    }
}

pub fn create_form(input: &CreateAddressInput) -> Vec<(&'static str, String)> {
    let mut form = vec![
        ("Type", input.r#type.clone()),
        ("Address", input.address.clone()),
    ];
    if let Some(name) = &input.friendly_name {
        form.push(("FriendlyName", name.clone()));
    }
    if let Some(auto_creation) = &input.auto_creation {
        push_auto_creation(&mut form, auto_creation);
    }
    form
}

pub fn update_form(input: &UpdateAddressInput) -> Vec<(&'static str, String)> {
    let mut form = Vec::new();
    if let Some(name) = &input.friendly_name {
        form.push(("FriendlyName", name.clone()));
    }
    if let Some(auto_creation) = &input.auto_creation {
        push_auto_creation(&mut form, auto_creation);
    }
    form
}

/// 非 2xx 時解析 Twilio 錯誤內容
async fn check_status(response: Response) -> Result<Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let body = response.text().await.unwrap_or_default();
    tracing::debug!("Twilio API responded {}: {}", status, body);

    let parsed: Option<TwilioErrorBody> = serde_json::from_str(&body).ok();
    let (code, message, more_info) = match parsed {
        Some(err) => (
            err.code.unwrap_or_default(),
            err.message
                .unwrap_or_else(|| status.canonical_reason().unwrap_or("Unknown error").to_string()),
            err.more_info,
        ),
        None => (
            0,
            status.canonical_reason().unwrap_or("Unknown error").to_string(),
            None,
        ),
    };

    Err(ResourceError::ApiError {
        status: status.as_u16(),
        code,
        message,
        more_info,
    })
}

#[async_trait]
impl AddressConfigurationApi for TwilioConversationsClient {
    async fn create(&self, input: &CreateAddressInput) -> Result<AddressConfigurationResponse> {
        self.post_form(&self.addresses_url(), &create_form(input)).await
    }

    async fn fetch(&self, sid: &str) -> Result<AddressConfigurationResponse> {
        let url = self.address_url(sid);
        tracing::debug!("📡 GET {}", url);
        let response = self
            .client
            .get(&url)
            .basic_auth(&self.credentials.username, Some(&self.credentials.password))
            .send()
            .await?;

        let response = check_status(response).await?;
        Ok(response.json().await?)
    }

    async fn update(
        &self,
        sid: &str,
        input: &UpdateAddressInput,
    ) -> Result<AddressConfigurationResponse> {
        self.post_form(&self.address_url(sid), &update_form(input))
            .await
    }

    async fn delete(&self, sid: &str) -> Result<()> {
        let url = self.address_url(sid);
        tracing::debug!("📡 DELETE {}", url);
        let response = self
            .client
            .delete(&url)
            .basic_auth(&self.credentials.username, Some(&self.credentials.password))
            .send()
            .await?;

        check_status(response).await?;
        Ok(())
    }
}
