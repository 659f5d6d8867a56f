use crate::adapters::twilio::{Credentials, DEFAULT_BASE_URL};
use crate::domain::schema::{Attributes, Timeouts};
use crate::utils::error::{ResourceError, Result};
use crate::utils::validation::{validate_non_empty_string, validate_url, Validate};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

/// 資源設定檔 (TOML)
///
/// ```toml
/// [provider]
/// account_sid = "${TWILIO_ACCOUNT_SID}"
/// auth_token = "${TWILIO_AUTH_TOKEN}"
///
/// [resource]
/// address = "+15017122661"
/// type = "sms"
/// webhook_filters = ["onMessageAdded"]
/// webhook_url = "https://example.com/hook"
///
/// [timeouts]
/// create_seconds = 120
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ResourceFile {
    #[serde(default)]
    pub provider: ProviderConfig,
    pub resource: Attributes,
    pub timeouts: Option<TimeoutsConfig>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProviderConfig {
    pub account_sid: Option<String>,
    pub auth_token: Option<String>,
    pub api_key: Option<String>,
    pub api_secret: Option<String>,
    pub base_url: Option<String>,
    pub request_timeout_seconds: Option<u64>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TimeoutsConfig {
    pub create_seconds: Option<u64>,
    pub read_seconds: Option<u64>,
    pub update_seconds: Option<u64>,
    pub delete_seconds: Option<u64>,
}

impl ResourceFile {
    /// 從 TOML 檔案載入配置
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path).map_err(ResourceError::IoError)?;
        Self::from_toml_str(&content)
    }

    /// 從 TOML 字串解析配置
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content);

        toml::from_str(&processed_content).map_err(|e| ResourceError::ConfigValidationError {
            field: "toml_parsing".to_string(),
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// 替換環境變數 (例如 ${TWILIO_AUTH_TOKEN})，未定義者保留原樣
    fn substitute_env_vars(content: &str) -> String {
        use regex::Regex;
        use std::sync::OnceLock;

        static RE: OnceLock<Regex> = OnceLock::new();
        let re = RE.get_or_init(|| Regex::new(r"\$\{([^}]+)\}").expect("static regex"));

        re.replace_all(content, |caps: &regex::Captures| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
        })
        .into_owned()
    }

    pub fn timeouts(&self) -> Timeouts {
        let defaults = Timeouts::default();
        let Some(cfg) = &self.timeouts else {
            return defaults;
        };
        Timeouts {
            create: cfg.create_seconds.map(Duration::from_secs).unwrap_or(defaults.create),
            read: cfg.read_seconds.map(Duration::from_secs).unwrap_or(defaults.read),
            update: cfg.update_seconds.map(Duration::from_secs).unwrap_or(defaults.update),
            delete: cfg.delete_seconds.map(Duration::from_secs).unwrap_or(defaults.delete),
        }
    }
}

fn env_or(value: &Option<String>, var: &str) -> Option<String> {
    value
        .clone()
        .filter(|v| !v.trim().is_empty())
        .or_else(|| std::env::var(var).ok().filter(|v| !v.trim().is_empty()))
}

impl ProviderConfig {
    pub fn base_url(&self) -> &str {
        self.base_url.as_deref().unwrap_or(DEFAULT_BASE_URL)
    }

    pub fn request_timeout(&self) -> Option<Duration> {
        self.request_timeout_seconds.map(Duration::from_secs)
    }

    /// API Key 優先，否則使用 Account SID + Auth Token；設定檔未提供時讀取環境變數
    pub fn credentials(&self) -> Result<Credentials> {
        let api_key = env_or(&self.api_key, "TWILIO_API_KEY");
        let api_secret = env_or(&self.api_secret, "TWILIO_API_SECRET");
        if let (Some(username), Some(password)) = (api_key, api_secret) {
            return Ok(Credentials { username, password });
        }

        let account_sid = env_or(&self.account_sid, "TWILIO_ACCOUNT_SID");
        let auth_token = env_or(&self.auth_token, "TWILIO_AUTH_TOKEN");
        let username = crate::utils::validation::validate_required_field(
            "provider.account_sid",
            &account_sid,
        )?;
        let password =
            crate::utils::validation::validate_required_field("provider.auth_token", &auth_token)?;

        Ok(Credentials {
            username: username.clone(),
            password: password.clone(),
        })
    }
}

impl Validate for ProviderConfig {
    fn validate(&self) -> Result<()> {
        validate_url("provider.base_url", self.base_url())?;
        let credentials = self.credentials()?;
        validate_non_empty_string("provider.username", &credentials.username)?;
        Ok(())
    }
}

impl Validate for ResourceFile {
    fn validate(&self) -> Result<()> {
        self.provider.validate()?;

        if let Some(cfg) = &self.timeouts {
            let all = [
                ("timeouts.create_seconds", cfg.create_seconds),
                ("timeouts.read_seconds", cfg.read_seconds),
                ("timeouts.update_seconds", cfg.update_seconds),
                ("timeouts.delete_seconds", cfg.delete_seconds),
            ];
            for (field, value) in all {
                if value == Some(0) {
                    return Err(ResourceError::InvalidConfigValueError {
                        field: field.to_string(),
                        value: "0".to_string(),
                        reason: "Timeout must be at least 1 second".to_string(),
                    });
                }
            }
        }

        crate::domain::schema::ADDRESS_CONFIGURATION_WEBHOOK.validate(&self.resource)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::io::Write;
    use tempfile::NamedTempFile;

    const BASIC: &str = r#"
[provider]
account_sid = "ACxxxxxxxxxxxxxxxxxxxxxxxxxxxxxxxx"
auth_token = "token"

[resource]
address = "+15017122661"
type = "whatsapp"
enabled = false
webhook_filters = ["onMessageAdded", "onDeliveryUpdated"]
webhook_url = "https://example.com/hook"

[timeouts]
create_seconds = 30
"#;

    #[test]
    fn test_parse_basic_resource_file() {
        let config = ResourceFile::from_toml_str(BASIC).unwrap();

        assert_eq!(config.resource.get("type"), Some(&json!("whatsapp")));
        assert_eq!(config.resource.get("enabled"), Some(&json!(false)));
        assert_eq!(
            config.resource.get("webhook_filters"),
            Some(&json!(["onMessageAdded", "onDeliveryUpdated"]))
        );
        assert_eq!(config.provider.base_url(), DEFAULT_BASE_URL);
        assert!(config.validate().is_ok());

        let timeouts = config.timeouts();
        assert_eq!(timeouts.create, Duration::from_secs(30));
        assert_eq!(timeouts.read, Duration::from_secs(300));
    }

    #[test]
    fn test_env_var_substitution() {
        std::env::set_var("ADDRESS_WEBHOOK_TEST_URL", "https://hooks.example.com/in");

        let toml_content = r#"
[resource]
address = "+15017122661"
type = "sms"
webhook_filters = ["onMessageAdded"]
webhook_url = "${ADDRESS_WEBHOOK_TEST_URL}"
friendly_name = "${ADDRESS_WEBHOOK_UNDEFINED_VAR}"
"#;

        let config = ResourceFile::from_toml_str(toml_content).unwrap();
        assert_eq!(
            config.resource.get("webhook_url"),
            Some(&json!("https://hooks.example.com/in"))
        );
        assert_eq!(
            config.resource.get("friendly_name"),
            Some(&json!("${ADDRESS_WEBHOOK_UNDEFINED_VAR}"))
        );

        std::env::remove_var("ADDRESS_WEBHOOK_TEST_URL");
    }

    #[test]
    fn test_api_key_credentials_take_precedence() {
        let provider = ProviderConfig {
            account_sid: Some("ACxxxx".to_string()),
            auth_token: Some("token".to_string()),
            api_key: Some("SKxxxx".to_string()),
            api_secret: Some("secret".to_string()),
            ..ProviderConfig::default()
        };
        let credentials = provider.credentials().unwrap();
        assert_eq!(credentials.username, "SKxxxx");
        assert_eq!(credentials.password, "secret");
    }

    #[test]
    fn test_invalid_resource_fails_validation() {
        let content = BASIC.replace("https://example.com/hook", "not a url");
        let config = ResourceFile::from_toml_str(&content).unwrap();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_zero_timeout_fails_validation() {
        let content = BASIC.replace("create_seconds = 30", "create_seconds = 0");
        let config = ResourceFile::from_toml_str(&content).unwrap();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_config_from_file() {
        let mut temp_file = NamedTempFile::new().unwrap();
        temp_file.write_all(BASIC.as_bytes()).unwrap();

        let config = ResourceFile::from_file(temp_file.path()).unwrap();
        assert_eq!(config.resource.get("address"), Some(&json!("+15017122661")));
    }
}
