use crate::domain::schema::Attributes;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// 單一資源實例的狀態：id、目前的屬性值、以及變更前的屬性值
///
/// `id` 為空代表遠端資源不存在 (尚未建立或已被刪除)。
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ResourceData {
    pub id: String,
    pub values: Attributes,
    #[serde(skip)]
    pub prior: Attributes,
}

impl ResourceData {
    pub fn new(values: Attributes) -> Self {
        Self {
            id: String::new(),
            values,
            prior: Attributes::new(),
        }
    }

    /// 以既有狀態為 prior、新設定為 values
    pub fn with_prior(id: impl Into<String>, prior: Attributes, desired: Attributes) -> Self {
        Self {
            id: id.into(),
            values: desired,
            prior,
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn set_id(&mut self, id: impl Into<String>) {
        self.id = id.into();
    }

    pub fn exists(&self) -> bool {
        !self.id.is_empty()
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.values.get(key).filter(|v| !v.is_null())
    }

    pub fn get_str(&self, key: &str) -> Option<&str> {
        self.get(key).and_then(Value::as_str)
    }

    pub fn get_string(&self, key: &str) -> String {
        self.get_str(key).unwrap_or_default().to_string()
    }

    pub fn set(&mut self, key: &str, value: impl Into<Value>) {
        self.values.insert(key.to_string(), value.into());
    }

    /// `None` 時移除欄位
    pub fn set_optional<T: Into<Value>>(&mut self, key: &str, value: Option<T>) {
        match value {
            Some(v) => self.set(key, v),
            None => {
                self.values.remove(key);
            }
        }
    }

    pub fn has_change(&self, key: &str) -> bool {
        let prior = self.prior.get(key).filter(|v| !v.is_null());
        prior != self.get(key)
    }

    /// 有設定且非空字串才回傳
    pub fn optional_string(&self, key: &str) -> Option<String> {
        self.get_str(key)
            .filter(|s| !s.is_empty())
            .map(str::to_string)
    }

    /// 未設定但與 prior 不同時送出空字串，讓遠端清除該欄位
    pub fn optional_string_with_empty_string_on_change(&self, key: &str) -> Option<String> {
        if let Some(value) = self.optional_string(key) {
            return Some(value);
        }
        if self.has_change(key) {
            return Some(String::new());
        }
        None
    }

    pub fn optional_bool(&self, key: &str) -> Option<bool> {
        self.get(key).and_then(Value::as_bool)
    }

    pub fn optional_string_slice(&self, key: &str) -> Option<Vec<String>> {
        let items = self.get(key)?.as_array()?;
        Some(
            items
                .iter()
                .filter_map(Value::as_str)
                .map(str::to_string)
                .collect(),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_optional_string_with_empty_string_on_change() {
        let mut prior = Attributes::new();
        prior.insert("friendly_name".to_string(), json!("old name"));

        let data = ResourceData::with_prior("IG123", prior.clone(), Attributes::new());
        assert_eq!(
            data.optional_string_with_empty_string_on_change("friendly_name"),
            Some(String::new())
        );
        assert_eq!(data.optional_string_with_empty_string_on_change("service_sid"), None);

        let mut desired = Attributes::new();
        desired.insert("friendly_name".to_string(), json!("new name"));
        let data = ResourceData::with_prior("IG123", prior, desired);
        assert_eq!(
            data.optional_string_with_empty_string_on_change("friendly_name"),
            Some("new name".to_string())
        );
    }

    #[test]
    fn test_set_optional_removes_on_none() {
        let mut data = ResourceData::default();
        data.set("date_updated", "2021-01-01T00:00:00Z");
        data.set_optional::<String>("date_updated", None);
        assert!(data.get("date_updated").is_none());
    }

    #[test]
    fn test_optional_accessors() {
        let mut values = Attributes::new();
        values.insert("enabled".to_string(), json!(false));
        values.insert("webhook_filters".to_string(), json!(["onMessageAdded", "onDeliveryUpdated"]));
        values.insert("friendly_name".to_string(), json!(""));
        let data = ResourceData::new(values);

        assert_eq!(data.optional_bool("enabled"), Some(false));
        assert_eq!(
            data.optional_string_slice("webhook_filters"),
            Some(vec!["onMessageAdded".to_string(), "onDeliveryUpdated".to_string()])
        );
        assert_eq!(data.optional_string("friendly_name"), None);
        assert!(!data.exists());
    }
}
