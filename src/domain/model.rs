use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// 自動建立 Conversation 時使用的整合類型，本資源固定為 webhook
pub const WEBHOOK_INTEGRATION_TYPE: &str = "webhook";

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct AutoCreationInput {
    pub conversation_service_sid: Option<String>,
    pub enabled: Option<bool>,
    pub r#type: Option<String>,
    pub webhook_filters: Option<Vec<String>>,
    pub webhook_method: Option<String>,
    pub webhook_url: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CreateAddressInput {
    pub address: String,
    pub auto_creation: Option<AutoCreationInput>,
    pub friendly_name: Option<String>,
    pub r#type: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct UpdateAddressInput {
    pub auto_creation: Option<AutoCreationInput>,
    pub friendly_name: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AutoCreationResponse {
    pub conversation_service_sid: Option<String>,
    pub enabled: bool,
    pub r#type: String,
    pub webhook_filters: Option<Vec<String>>,
    pub webhook_method: Option<String>,
    pub webhook_url: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AddressConfigurationResponse {
    pub sid: String,
    pub account_sid: String,
    pub address: String,
    pub auto_creation: AutoCreationResponse,
    pub date_created: DateTime<Utc>,
    pub date_updated: Option<DateTime<Utc>>,
    pub friendly_name: Option<String>,
    pub r#type: String,
    pub url: String,
}

/// Twilio 錯誤回應格式
#[derive(Debug, Clone, Deserialize)]
pub struct TwilioErrorBody {
    pub code: Option<i64>,
    pub message: Option<String>,
    pub more_info: Option<String>,
    pub status: Option<u16>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deserialize_fetch_response() {
        let body = serde_json::json!({
            "sid": "IGaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaa",
            "account_sid": "ACaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaa",
            "type": "sms",
            "address": "+15017122661",
            "friendly_name": "My Test Configuration",
            "auto_creation": {
                "enabled": true,
                "type": "webhook",
                "conversation_service_sid": "ISaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaa",
                "webhook_url": "https://example.com",
                "webhook_method": "POST",
                "webhook_filters": ["onParticipantAdded", "onMessageAdded"]
            },
            "date_created": "2016-03-24T21:05:50Z",
            "date_updated": null,
            "url": "https://conversations.twilio.com/v1/Configuration/Addresses/IGaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaa"
        });

        let response: AddressConfigurationResponse = serde_json::from_value(body).unwrap();
        assert_eq!(response.r#type, "sms");
        assert_eq!(response.auto_creation.r#type, WEBHOOK_INTEGRATION_TYPE);
        assert_eq!(
            response.auto_creation.webhook_filters.as_deref(),
            Some(&["onParticipantAdded".to_string(), "onMessageAdded".to_string()][..])
        );
        assert!(response.date_updated.is_none());
    }
}
