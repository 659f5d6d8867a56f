//! `twilio_conversations_address_configuration_webhook` 的靜態 schema

use crate::utils::error::{ResourceError, Result};
use crate::utils::validation::{validate_one_of, validate_service_sid, validate_url};
use serde::Serialize;
use serde_json::Value;
use std::collections::HashMap;
use std::time::Duration;

pub type Attributes = HashMap<String, Value>;

pub const ADDRESS_TYPES: &[&str] = &["sms", "whatsapp"];

pub const WEBHOOK_FILTERS: &[&str] = &[
    "onMessageAdded",
    "onMessageUpdated",
    "onMessageRemoved",
    "onConversationUpdated",
    "onConversationStateUpdated",
    "onConversationRemoved",
    "onParticipantAdded",
    "onParticipantUpdated",
    "onParticipantRemoved",
    "onDeliveryUpdated",
];

pub const WEBHOOK_METHODS: &[&str] = &["GET", "POST"];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ValueType {
    String,
    Bool,
    StringList,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Presence {
    Required,
    Optional,
    Computed,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(untagged)]
pub enum DefaultValue {
    Bool(bool),
    Str(&'static str),
}

impl DefaultValue {
    fn to_value(self) -> Value {
        match self {
            Self::Bool(b) => Value::Bool(b),
            Self::Str(s) => Value::String(s.to_string()),
        }
    }
}

/// 單值驗證規則；list 型別套用在每個元素上
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Rule {
    OneOf(&'static [&'static str]),
    HttpUrl,
    ServiceSid,
}

impl Rule {
    fn check(&self, field: &str, value: &str) -> Result<()> {
        match self {
            Self::OneOf(allowed) => validate_one_of(field, value, allowed),
            Self::HttpUrl => validate_url(field, value),
            Self::ServiceSid => validate_service_sid(field, value),
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize)]
pub struct Attribute {
    pub name: &'static str,
    pub value_type: ValueType,
    pub presence: Presence,
    pub force_new: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default: Option<DefaultValue>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rule: Option<Rule>,
}

impl Attribute {
    const fn computed(name: &'static str) -> Self {
        Self {
            name,
            value_type: ValueType::String,
            presence: Presence::Computed,
            force_new: false,
            default: None,
            rule: None,
        }
    }

    pub fn is_configurable(&self) -> bool {
        self.presence != Presence::Computed
    }

    fn check_type(&self, value: &Value) -> bool {
        match self.value_type {
            ValueType::String => value.is_string(),
            ValueType::Bool => value.is_boolean(),
            ValueType::StringList => value
                .as_array()
                .map(|items| items.iter().all(Value::is_string))
                .unwrap_or(false),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Timeouts {
    pub create: Duration,
    pub read: Duration,
    pub update: Duration,
    pub delete: Duration,
}

impl Default for Timeouts {
    fn default() -> Self {
        Self {
            create: Duration::from_secs(10 * 60),
            read: Duration::from_secs(5 * 60),
            update: Duration::from_secs(10 * 60),
            delete: Duration::from_secs(10 * 60),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct Schema {
    pub type_name: &'static str,
    pub attributes: &'static [Attribute],
}

pub static ADDRESS_CONFIGURATION_WEBHOOK: Schema = Schema {
    type_name: "twilio_conversations_address_configuration_webhook",
    attributes: &[
        Attribute::computed("sid"),
        Attribute::computed("account_sid"),
        Attribute {
            name: "address",
            value_type: ValueType::String,
            presence: Presence::Required,
            force_new: true,
            default: None,
            rule: None,
        },
        Attribute {
            name: "service_sid",
            value_type: ValueType::String,
            presence: Presence::Optional,
            force_new: false,
            default: None,
            rule: Some(Rule::ServiceSid),
        },
        Attribute {
            name: "friendly_name",
            value_type: ValueType::String,
            presence: Presence::Optional,
            force_new: false,
            default: None,
            rule: None,
        },
        Attribute::computed("integration_type"),
        Attribute {
            name: "enabled",
            value_type: ValueType::Bool,
            presence: Presence::Optional,
            force_new: false,
            default: Some(DefaultValue::Bool(true)),
            rule: None,
        },
        Attribute {
            name: "type",
            value_type: ValueType::String,
            presence: Presence::Required,
            force_new: true,
            default: None,
            rule: Some(Rule::OneOf(ADDRESS_TYPES)),
        },
        Attribute {
            name: "webhook_filters",
            value_type: ValueType::StringList,
            presence: Presence::Required,
            force_new: false,
            default: None,
            rule: Some(Rule::OneOf(WEBHOOK_FILTERS)),
        },
        Attribute {
            name: "webhook_method",
            value_type: ValueType::String,
            presence: Presence::Optional,
            force_new: false,
            default: Some(DefaultValue::Str("POST")),
            rule: Some(Rule::OneOf(WEBHOOK_METHODS)),
        },
        Attribute {
            name: "webhook_url",
            value_type: ValueType::String,
            presence: Presence::Required,
            force_new: false,
            default: None,
            rule: Some(Rule::HttpUrl),
        },
        Attribute::computed("date_created"),
        Attribute::computed("date_updated"),
        Attribute::computed("url"),
    ],
};

/// `Null` 視同未設定
fn lookup<'a>(attrs: &'a Attributes, name: &str) -> Option<&'a Value> {
    attrs.get(name).filter(|v| !v.is_null())
}

/// 比較用：空字串與未設定相同 (API 對清空的欄位回傳 null)
fn comparable<'a>(attrs: &'a Attributes, name: &str) -> Option<&'a Value> {
    lookup(attrs, name).filter(|v| v.as_str() != Some(""))
}

impl Schema {
    pub fn attribute(&self, name: &str) -> Option<&'static Attribute> {
        self.attributes.iter().find(|a| a.name == name)
    }

    /// 檢查使用者設定，回報所有錯誤而非只有第一個
    pub fn validate(&self, config: &Attributes) -> Result<()> {
        let mut problems = Vec::new();

        let mut keys: Vec<&String> = config.keys().collect();
        keys.sort();
        for key in keys {
            match self.attribute(key) {
                None => problems.push(format!("{}: unsupported attribute", key)),
                Some(attr) if !attr.is_configurable() => {
                    problems.push(format!("{}: computed attribute cannot be set", key))
                }
                Some(_) => {}
            }
        }

        for attr in self.attributes.iter().filter(|a| a.is_configurable()) {
            let Some(value) = lookup(config, attr.name) else {
                if attr.presence == Presence::Required {
                    problems.push(format!("{}: required attribute is missing", attr.name));
                }
                continue;
            };

            if !attr.check_type(value) {
                problems.push(format!(
                    "{}: expected {:?}, got {}",
                    attr.name, attr.value_type, value
                ));
                continue;
            }

            let Some(rule) = attr.rule else { continue };
            let candidates: Vec<&str> = match value {
                Value::Array(items) => items.iter().filter_map(Value::as_str).collect(),
                other => other.as_str().into_iter().collect(),
            };
            for (index, candidate) in candidates.iter().enumerate() {
                let field = if attr.value_type == ValueType::StringList {
                    format!("{}.{}", attr.name, index)
                } else {
                    attr.name.to_string()
                };
                if let Err(e) = rule.check(&field, candidate) {
                    problems.push(e.to_string());
                }
            }
        }

        if problems.is_empty() {
            return Ok(());
        }

        tracing::debug!("Schema validation found {} problem(s)", problems.len());
        Err(ResourceError::ConfigValidationError {
            field: self.type_name.to_string(),
            message: problems.join("; "),
        })
    }

    pub fn apply_defaults(&self, config: &mut Attributes) {
        for attr in self.attributes {
            if let Some(default) = attr.default {
                if lookup(config, attr.name).is_none() {
                    config.insert(attr.name.to_string(), default.to_value());
                }
            }
        }
    }

    /// 可設定欄位中，prior 與 desired 不同者
    pub fn changed_attributes(&self, prior: &Attributes, desired: &Attributes) -> Vec<&'static str> {
        self.attributes
            .iter()
            .filter(|a| a.is_configurable())
            .filter(|a| comparable(prior, a.name) != comparable(desired, a.name))
            .map(|a| a.name)
            .collect()
    }

    pub fn force_new_changes(&self, prior: &Attributes, desired: &Attributes) -> Vec<&'static str> {
        self.changed_attributes(prior, desired)
            .into_iter()
            .filter(|name| self.attribute(name).map(|a| a.force_new).unwrap_or(false))
            .collect()
    }
}
